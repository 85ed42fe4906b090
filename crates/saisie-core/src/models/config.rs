//! Configuration structures for the field-fill engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration for a saisie session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaisieConfig {
    /// Field classification configuration.
    pub classifier: ClassifierConfig,

    /// Field navigation configuration.
    pub navigation: NavigationConfig,

    /// Operator feedback configuration.
    pub feedback: FeedbackConfig,
}

/// Value classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Treat `heure` and `minute` fields as cardinal numbers.
    ///
    /// When disabled they fall through to the substring rules and end up as
    /// plain text.
    pub numeric_time_fields: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            numeric_time_fields: true,
        }
    }
}

/// Navigation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Delay between writing a value and focusing the next field (ms).
    pub focus_delay_ms: u64,

    /// Delay before focusing the first field of a freshly opened form (ms).
    pub initial_focus_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            focus_delay_ms: 100,
            initial_focus_delay_ms: 500,
        }
    }
}

impl NavigationConfig {
    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn initial_focus_delay(&self) -> Duration {
        Duration::from_millis(self.initial_focus_delay_ms)
    }
}

/// Status message configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// How long the host should keep a status message visible (ms).
    pub status_expiry_ms: u64,

    /// Characters of the source text quoted in a "converted" message.
    pub converted_preview_chars: usize,

    /// Characters of the value quoted in a "copied" message.
    pub copied_preview_chars: usize,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            status_expiry_ms: 3000,
            converted_preview_chars: 10,
            copied_preview_chars: 15,
        }
    }
}

impl FeedbackConfig {
    pub fn status_expiry(&self) -> Duration {
        Duration::from_millis(self.status_expiry_ms)
    }
}

impl SaisieConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
