#![forbid(unsafe_code)]

//! Panel presentation settings.
//!
//! [`PanelConfig`] carries the class markers and slide timing used by the
//! registry. The defaults reproduce the stock popup stylesheet contract, so
//! `PanelConfig::default()` needs no file at all.
//!
//! # Loading
//!
//! ```toml
//! # slidepanel.toml
//! active_class = "active"
//! entering_class = "new_active"
//! slide_duration_ms = 180
//! slide_distance_percent = 100
//! ```
//!
//! ```rust,ignore
//! let config = PanelConfig::from_toml_file("slidepanel.toml")?.validated()?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

use crate::direction::MAX_SLIDE_DISTANCE_PERCENT;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Class applied to the displayed panel.
pub const DEFAULT_ACTIVE_CLASS: &str = "active";
/// Class applied to the incoming panel while it slides in.
pub const DEFAULT_ENTERING_CLASS: &str = "new_active";
pub const DEFAULT_SLIDE_DURATION_MS: u64 = 180;
pub const DEFAULT_SLIDE_DISTANCE_PERCENT: u16 = 100;

/// Class markers and slide timing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelConfig {
    /// Marker for the displayed panel(s).
    pub active_class: String,
    /// Marker for the panel currently sliding in.
    pub entering_class: String,
    /// Slide animation length.
    pub slide_duration_ms: u64,
    /// Starting offset of the slide, in percent of the panel width.
    pub slide_distance_percent: u16,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
            entering_class: DEFAULT_ENTERING_CLASS.to_string(),
            slide_duration_ms: DEFAULT_SLIDE_DURATION_MS,
            slide_distance_percent: DEFAULT_SLIDE_DISTANCE_PERCENT,
        }
    }
}

impl PanelConfig {
    #[must_use]
    pub fn slide_duration(&self) -> Duration {
        Duration::from_millis(self.slide_duration_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Check that all settings are usable.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.active_class.trim().is_empty() {
            errors.push("active_class must not be empty".into());
        }
        if self.entering_class.trim().is_empty() {
            errors.push("entering_class must not be empty".into());
        }
        if self.active_class == self.entering_class {
            errors.push(format!(
                "active_class and entering_class must differ, both are {:?}",
                self.active_class
            ));
        }
        if self.slide_duration_ms == 0 {
            errors.push("slide_duration_ms must be > 0".into());
        }
        if !(1..=MAX_SLIDE_DISTANCE_PERCENT).contains(&self.slide_distance_percent) {
            errors.push(format!(
                "slide_distance_percent must be in 1..=100, got {}",
                self.slide_distance_percent
            ));
        }

        errors
    }

    /// Consume the config, returning it only if [`validate`](Self::validate)
    /// reports no problems.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PanelConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.slide_duration(), Duration::from_millis(180));
        assert_eq!(config.active_class, "active");
        assert_eq!(config.entering_class, "new_active");
    }

    #[test]
    fn validate_catches_shared_class_names() {
        let config = PanelConfig {
            entering_class: "active".into(),
            ..PanelConfig::default()
        };
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("must differ")));
    }

    #[test]
    fn validate_catches_zero_duration_and_bad_distance() {
        let config = PanelConfig {
            slide_duration_ms: 0,
            slide_distance_percent: 0,
            ..PanelConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Validation(list)) if list.len() == 2
        ));
    }
}
