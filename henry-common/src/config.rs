//! Configuration for HENRY services.
//!
//! All crates share one JSON file at `~/.henry/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (HENRY_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `HENRY_LOG_LEVEL` → observability.log_level
//! - `HENRY_LOG_FORMAT` → observability.log_format
//! - `HENRY_LOCALE` → locale
//! - `HENRY_AUTH_LATENCY_MS` → fixed latency for every auth operation
//! - `HENRY_ASSISTANT_MODEL` → assistant.model
//! - `HENRY_NO_LATENCY` → disable every simulated delay

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ResultExt};
use crate::latency::Latency;
use crate::locale::Locale;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".henry"),
        |dirs| dirs.home_dir().join(".henry"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Auth
// ============================================================================

/// Simulated delays of the auth services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthLatencyConfig {
    #[serde(default = "default_sign_in_latency")]
    pub sign_in: Latency,
    #[serde(default = "default_sign_in_latency")]
    pub sign_up: Latency,
    #[serde(default = "default_write_latency")]
    pub sign_out: Latency,
    #[serde(default = "default_read_latency")]
    pub profile_read: Latency,
    #[serde(default = "default_write_latency")]
    pub profile_write: Latency,
}

impl AuthLatencyConfig {
    /// Every auth operation returns immediately.
    pub fn none() -> Self {
        Self::uniform(Latency::none())
    }

    /// Same delay for every auth operation.
    pub fn uniform(latency: Latency) -> Self {
        Self {
            sign_in: latency,
            sign_up: latency,
            sign_out: latency,
            profile_read: latency,
            profile_write: latency,
        }
    }
}

impl Default for AuthLatencyConfig {
    fn default() -> Self {
        Self {
            sign_in: default_sign_in_latency(),
            sign_up: default_sign_in_latency(),
            sign_out: default_write_latency(),
            profile_read: default_read_latency(),
            profile_write: default_write_latency(),
        }
    }
}

fn default_sign_in_latency() -> Latency {
    Latency::fixed(1000)
}

fn default_write_latency() -> Latency {
    Latency::fixed(500)
}

fn default_read_latency() -> Latency {
    Latency::fixed(300)
}

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum secret length accepted at sign-up and password change
    #[serde(default = "default_min_secret_len")]
    pub min_secret_len: usize,

    /// Argon2 memory cost in KiB
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,

    /// Argon2 iteration count
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    /// Seed the directory with the demo accounts
    #[serde(default = "default_true")]
    pub seed_sample_accounts: bool,

    #[serde(default)]
    pub latency: AuthLatencyConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_secret_len: default_min_secret_len(),
            hash_memory_kib: default_hash_memory_kib(),
            hash_iterations: default_hash_iterations(),
            seed_sample_accounts: true,
            latency: AuthLatencyConfig::default(),
        }
    }
}

fn default_min_secret_len() -> usize {
    6
}

fn default_hash_memory_kib() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Assistant
// ============================================================================

/// Mock assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Model name reported in replies
    #[serde(default = "default_model")]
    pub model: String,

    /// Service name reported by the connection check
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Service version reported by the connection check
    #[serde(default = "default_service_version")]
    pub service_version: String,

    #[serde(default = "default_chat_latency")]
    pub chat_latency: Latency,

    #[serde(default = "default_generation_latency")]
    pub generation_latency: Latency,

    #[serde(default = "default_status_latency")]
    pub status_latency: Latency,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            service_name: default_service_name(),
            service_version: default_service_version(),
            chat_latency: default_chat_latency(),
            generation_latency: default_generation_latency(),
            status_latency: default_status_latency(),
        }
    }
}

fn default_model() -> String {
    "gemini-pro-mock".into()
}

fn default_service_name() -> String {
    "Gemini API Mock".into()
}

fn default_service_version() -> String {
    "1.0.0".into()
}

fn default_chat_latency() -> Latency {
    Latency::between(1000, 3000)
}

fn default_generation_latency() -> Latency {
    Latency::between(2000, 5000)
}

fn default_status_latency() -> Latency {
    Latency::fixed(500)
}

// ============================================================================
// Observability
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format: "json" or "pretty"
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to hold at `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Language of user-facing messages
    #[serde(default)]
    pub locale: Locale,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .context(format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration from `path` (or the default path), apply
    /// environment variable overrides, then validate.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("HENRY_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("HENRY_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(locale) = lookup("HENRY_LOCALE") {
            match locale.parse() {
                Ok(l) => self.locale = l,
                Err(e) => tracing::warn!(error = %e, "Ignoring HENRY_LOCALE"),
            }
        }
        if let Some(ms) = lookup("HENRY_AUTH_LATENCY_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.auth.latency = AuthLatencyConfig::uniform(Latency::fixed(ms)),
                Err(_) => tracing::warn!(value = %ms, "Ignoring HENRY_AUTH_LATENCY_MS"),
            }
        }
        if let Some(model) = lookup("HENRY_ASSISTANT_MODEL") {
            self.assistant.model = model;
        }
        if let Some(flag) = lookup("HENRY_NO_LATENCY") {
            if matches!(flag.as_str(), "1" | "true" | "yes") {
                self.disable_latency();
            }
        }
    }

    /// Turn off every simulated delay.
    pub fn disable_latency(&mut self) {
        self.auth.latency = AuthLatencyConfig::none();
        self.assistant.chat_latency = Latency::none();
        self.assistant.generation_latency = Latency::none();
        self.assistant.status_latency = Latency::none();
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).context(format!(
                    "Failed to create config directory {}",
                    dir.display()
                ))?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).context(format!("Failed to write config to {}", path.display()))
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::from(e).with_context("Invalid config JSON"))
    }
}
