//! HENRY Assistant - Mock AI tutor for the HENRY platform.
//!
//! This crate provides:
//! - The `Assistant` trait that real backends can implement
//! - `ContentResponder`: role-aware canned replies chosen by keyword
//! - Structured content generation (presentations, quizzes, lesson plans, summaries)
//! - `MockAssistant`: the responder plus simulated network latency
//! - `Conversation`: ordered chat history with error fallbacks

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod content;
pub mod conversation;
pub mod error;
pub mod mock;
pub mod responder;
pub mod templates;

pub use content::{ContentBody, ContentKind, GeneratedContent, GenerationParams};
pub use conversation::{ChatMessage, Conversation, Sender, FALLBACK_USER_NAME};
pub use error::AssistantError;
pub use mock::MockAssistant;
pub use responder::ContentResponder;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Assistant Trait
// ============================================================================

/// Unified interface for assistant backends.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Model reported in replies.
    fn model(&self) -> &str;

    /// Reply to a chat message from a user with the given role tag.
    async fn respond(
        &self,
        message: &str,
        role: &str,
        context: &ChatContext,
    ) -> Result<AssistantReply, AssistantError>;

    /// Build structured teaching content. Unknown kinds produce an error body,
    /// not an `Err`.
    async fn generate_content(
        &self,
        kind: &str,
        topic: &str,
        params: &GenerationParams,
    ) -> Result<GeneratedContent, AssistantError>;

    /// Report reachability and capabilities.
    async fn check_connection(&self) -> Result<ConnectionStatus, AssistantError>;
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Per-call context for chat replies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl ChatContext {
    pub fn with_user_name(name: impl Into<String>) -> Self {
        Self {
            user_name: Some(name.into()),
        }
    }
}

/// A chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    #[serde(rename = "response")]
    pub text: String,
    pub model: String,
    pub usage: TokenUsage,
    pub timestamp: DateTime<Utc>,
}

/// Token usage, counted in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Result of a connection check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub service: String,
    pub version: String,
    pub features: Vec<String>,
}
