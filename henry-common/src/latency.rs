//! Simulated network latency for the in-memory services.
//!
//! The stores stand in for remote calls, so each operation can sleep for a
//! configurable, optionally jittered delay before doing its work.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A delay range in milliseconds. `min_ms == max_ms` gives a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Latency {
    #[serde(default)]
    pub min_ms: u64,
    #[serde(default)]
    pub max_ms: u64,
}

impl Latency {
    /// No delay at all.
    pub const fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    /// Always wait exactly `ms` milliseconds.
    pub const fn fixed(ms: u64) -> Self {
        Self { min_ms: ms, max_ms: ms }
    }

    /// Wait a uniformly random time in `[min_ms, max_ms]`.
    pub const fn between(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn is_none(&self) -> bool {
        self.max_ms == 0
    }

    /// Pick the delay for one call.
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    /// Sleep for a sampled delay. Returns immediately when the range is empty.
    pub async fn simulate(&self) {
        if self.is_none() {
            return;
        }
        tokio::time::sleep(self.sample()).await;
    }
}
