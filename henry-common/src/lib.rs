//! HENRY Common - Shared types, utilities, and configuration for the HENRY platform.
//!
//! This crate provides:
//! - Configuration types, loading, and validation
//! - Error types and handling utilities
//! - Logging setup
//! - Roles and permissions
//! - Locale for user-facing messages
//! - Simulated latency for the in-memory services

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod latency;
pub mod locale;
pub mod logging;
pub mod roles;
pub mod util;
pub mod validation;

pub use config::{AssistantConfig, AuthConfig, AuthLatencyConfig, Config, ObservabilityConfig};
pub use error::{Error, Result};
pub use latency::Latency;
pub use locale::Locale;
pub use roles::{Permission, Role};
pub use validation::{Validate, ValidationError, ValidationResult};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{AssistantConfig, AuthConfig, Config};
    pub use crate::error::{Error, Result};
    pub use crate::latency::Latency;
    pub use crate::locale::Locale;
    pub use crate::logging::init_logging;
    pub use crate::roles::{Permission, Role};
}
