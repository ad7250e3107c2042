//! Locale used for user-facing messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of user-facing messages. Spanish is the platform default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    /// Accepts bare tags and region-qualified ones (`es-CO`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            _ => Err(format!("Unsupported locale: {s}")),
        }
    }
}
