//! Chat history between one user and an assistant.

use chrono::{DateTime, Utc};
use henry_common::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::templates::welcome_message;
use crate::{Assistant, ChatContext};

/// Name used when the user has no full name on file.
pub const FALLBACK_USER_NAME: &str = "Usuario";

const ERROR_REPLY: &str =
    "Lo siento, hubo un error al procesar tu mensaje. Por favor, inténtalo de nuevo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry in the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Set on the fallback reply recorded when the assistant fails
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    fn new(sender: Sender, content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content,
            timestamp,
            is_error: false,
        }
    }
}

/// Ordered message history, opened with a role-specific welcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    role: Role,
    full_name: Option<String>,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Start a conversation for a user with `role` and, optionally, a full name.
    pub fn new(role: Role, full_name: Option<&str>) -> Self {
        let full_name = full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let greeting = welcome_message(role, full_name.as_deref().unwrap_or(FALLBACK_USER_NAME));

        Self {
            role,
            full_name,
            messages: vec![ChatMessage::new(Sender::Assistant, greeting, Utc::now())],
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// First word of the full name, as the assistant addresses the user.
    pub fn first_name(&self) -> &str {
        self.full_name
            .as_deref()
            .and_then(|n| n.split_whitespace().next())
            .unwrap_or(FALLBACK_USER_NAME)
    }

    /// Send `text` and record the reply.
    ///
    /// Blank input is ignored and returns `None`. An assistant failure is
    /// recorded as an apology flagged `is_error`; it never propagates.
    pub async fn send(&mut self, assistant: &dyn Assistant, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.messages
            .push(ChatMessage::new(Sender::User, text.to_string(), Utc::now()));

        let context = ChatContext::with_user_name(self.first_name());
        let reply = match assistant.respond(text, self.role.as_str(), &context).await {
            Ok(reply) => ChatMessage::new(Sender::Assistant, reply.text, reply.timestamp),
            Err(e) => {
                tracing::error!(error = %e, assistant = assistant.name(), "Assistant reply failed");
                ChatMessage {
                    is_error: true,
                    ..ChatMessage::new(Sender::Assistant, ERROR_REPLY.to_string(), Utc::now())
                }
            }
        };

        self.messages.push(reply);
        self.messages.last()
    }
}
