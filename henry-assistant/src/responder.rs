//! Keyword-driven chat replies.

use chrono::Utc;
use henry_common::util::char_len;
use henry_common::Role;

use crate::templates::{self, templates_for};
use crate::{AssistantReply, ChatContext, TokenUsage};

/// Maps a message and a role tag to a canned reply.
///
/// Pure and synchronous; [`crate::MockAssistant`] wraps it with latency.
#[derive(Debug, Clone)]
pub struct ContentResponder {
    model: String,
}

impl ContentResponder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Template for `message`: the first matching rule of the role's table,
    /// else its default. Unknown role tags use the student table.
    pub fn select(&self, message: &str, role: &str) -> &'static str {
        let table = templates_for(Role::parse_or_default(role));
        let lowered = message.to_lowercase();
        match table.select(&lowered) {
            Some(rule) => {
                tracing::debug!(role = %role, topic = rule.topic, "Matched reply rule");
                rule.template
            }
            None => table.default,
        }
    }

    /// Build the reply for `message`.
    ///
    /// With a user name in `context` the reply becomes
    /// `"Hola {name}, "` followed by the whole template in lower case.
    pub fn respond(&self, message: &str, role: &str, context: &ChatContext) -> AssistantReply {
        let template = self.select(message, role);
        let text = match context.user_name.as_deref() {
            Some(name) => format!("Hola {name}, {}", template.to_lowercase()),
            None => template.to_string(),
        };

        let prompt = char_len(message);
        let completion = char_len(&text);
        AssistantReply {
            text,
            model: self.model.clone(),
            usage: TokenUsage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt + completion,
            },
            timestamp: Utc::now(),
        }
    }

    /// Greeting for a freshly opened chat.
    pub fn welcome_message(&self, role: &str, name: &str) -> String {
        templates::welcome_message(Role::parse_or_default(role), name)
    }
}
