//! Assistant error types.

use henry_common::Locale;
use thiserror::Error;

/// Errors from the assistant backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistantError {
    /// Content kind outside presentation, quiz, lesson_plan and summary.
    #[error("Unsupported content kind: {0}")]
    UnsupportedKind(String),

    /// The backend could not be reached.
    #[error("[{service}] unavailable: {message}")]
    Unavailable { service: String, message: String },
}

impl AssistantError {
    pub fn unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedKind(_) => "assistant/unsupported-kind",
            Self::Unavailable { .. } => "assistant/unavailable",
        }
    }

    pub fn user_message(&self, locale: Locale) -> String {
        match (self, locale) {
            (Self::UnsupportedKind(_), Locale::Es) => "Tipo de contenido no soportado".into(),
            (Self::UnsupportedKind(_), Locale::En) => "Unsupported content type".into(),
            (Self::Unavailable { .. }, Locale::Es) => {
                "El asistente no está disponible en este momento.".into()
            }
            (Self::Unavailable { .. }, Locale::En) => {
                "The assistant is not available right now.".into()
            }
        }
    }
}
