//! Engine Settings
//!
//! Tunables for keyword extraction, keyword lifecycle timing and plain-text
//! auto-timing. Every field has a default that reproduces the stock behavior,
//! so an empty `{}` settings document is valid.
//!
//! Settings are plain JSON (camelCase). Loading is tolerant: out-of-range values
//! are clamped by [`EngineSettings::normalize`] instead of failing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::CoreResult;

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    /// Keyword extraction settings
    #[serde(default)]
    pub keywords: KeywordSettings,

    /// Keyword lifecycle settings
    #[serde(default)]
    pub lifecycle: LifecycleSettings,

    /// Plain-text auto-timing settings
    #[serde(default)]
    pub plain_text: PlainTextSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            keywords: KeywordSettings::default(),
            lifecycle: LifecycleSettings::default(),
            plain_text: PlainTextSettings::default(),
        }
    }
}

impl EngineSettings {
    /// Normalizes and clamps settings so every value is usable.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        self.keywords.max_per_utterance = self.keywords.max_per_utterance.clamp(1, 50);
        self.keywords.min_length = self.keywords.min_length.clamp(1, 64);

        self.lifecycle.grace_secs = clamp_f64(
            self.lifecycle.grace_secs,
            0.0,
            60.0,
            default_grace_secs(),
        );
        self.lifecycle.step_min_ms = self.lifecycle.step_min_ms.clamp(1, 10_000);
        self.lifecycle.step_max_ms = self
            .lifecycle
            .step_max_ms
            .clamp(self.lifecycle.step_min_ms, 10_000);
        self.lifecycle.double_step_chance = clamp_f64(
            self.lifecycle.double_step_chance,
            0.0,
            1.0,
            default_double_step_chance(),
        );

        self.plain_text.sentence_secs = clamp_f64(
            self.plain_text.sentence_secs,
            0.1,
            3600.0,
            default_sentence_secs(),
        );
    }

    /// Loads settings from a JSON file, returning defaults if it doesn't exist
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            info!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut settings: Self = serde_json::from_str(&content)?;
        settings.normalize();
        Ok(settings)
    }

    /// Saves normalized settings as pretty JSON
    pub fn save(&self, path: &Path) -> CoreResult<Self> {
        let mut normalized = self.clone();
        normalized.normalize();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(normalized)
    }
}

fn clamp_f64(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, max)
}

/// Keyword extraction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSettings {
    /// Maximum keywords kept per utterance
    #[serde(default = "default_max_keywords")]
    pub max_per_utterance: usize,

    /// Minimum keyword length in characters (shorter tokens are dropped)
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            max_per_utterance: default_max_keywords(),
            min_length: default_min_length(),
        }
    }
}

fn default_max_keywords() -> usize {
    5
}

fn default_min_length() -> usize {
    4
}

/// Keyword lifecycle settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleSettings {
    /// Seconds a keyword stays visible after its own end time
    #[serde(default = "default_grace_secs")]
    pub grace_secs: f64,

    /// Shortest delay between reveal steps (milliseconds)
    #[serde(default = "default_step_min_ms")]
    pub step_min_ms: u64,

    /// Longest delay between reveal steps (milliseconds)
    #[serde(default = "default_step_max_ms")]
    pub step_max_ms: u64,

    /// Probability that a reveal step adds two characters instead of one
    #[serde(default = "default_double_step_chance")]
    pub double_step_chance: f64,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            grace_secs: default_grace_secs(),
            step_min_ms: default_step_min_ms(),
            step_max_ms: default_step_max_ms(),
            double_step_chance: default_double_step_chance(),
        }
    }
}

fn default_grace_secs() -> f64 {
    2.0
}

fn default_step_min_ms() -> u64 {
    50
}

fn default_step_max_ms() -> u64 {
    80
}

fn default_double_step_chance() -> f64 {
    0.3
}

/// Plain-text auto-timing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlainTextSettings {
    /// Synthetic duration assigned to each sentence
    #[serde(default = "default_sentence_secs")]
    pub sentence_secs: f64,
}

impl Default for PlainTextSettings {
    fn default() -> Self {
        Self {
            sentence_secs: default_sentence_secs(),
        }
    }
}

fn default_sentence_secs() -> f64 {
    5.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.keywords.max_per_utterance, 5);
        assert_eq!(settings.keywords.min_length, 4);
        assert_eq!(settings.lifecycle.grace_secs, 2.0);
        assert_eq!(settings.lifecycle.step_min_ms, 50);
        assert_eq!(settings.lifecycle.step_max_ms, 80);
        assert_eq!(settings.plain_text.sentence_secs, 5.0);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings: EngineSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"lifecycle": {"graceSecs": 3.5}}"#).unwrap();
        assert_eq!(settings.lifecycle.grace_secs, 3.5);
        assert_eq!(settings.lifecycle.step_max_ms, 80);
        assert_eq!(settings.keywords, KeywordSettings::default());
    }

    #[test]
    fn test_normalization_clamps_values() {
        let mut settings = EngineSettings::default();
        settings.keywords.max_per_utterance = 0;
        settings.lifecycle.step_min_ms = 90;
        settings.lifecycle.step_max_ms = 10;
        settings.lifecycle.double_step_chance = 4.0;

        settings.normalize();

        assert_eq!(settings.keywords.max_per_utterance, 1);
        assert_eq!(settings.lifecycle.step_max_ms, 90);
        assert_eq!(settings.lifecycle.double_step_chance, 1.0);
    }

    #[test]
    fn test_normalization_handles_non_finite_values() {
        let mut settings = EngineSettings::default();
        settings.lifecycle.grace_secs = f64::NAN;
        settings.plain_text.sentence_secs = f64::INFINITY;

        settings.normalize();

        assert_eq!(settings.lifecycle.grace_secs, 2.0);
        assert_eq!(settings.plain_text.sentence_secs, 5.0);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = EngineSettings::load(&temp_dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut settings = EngineSettings::default();
        settings.keywords.max_per_utterance = 3;
        settings.save(&path).unwrap();

        let loaded = EngineSettings::load(&path).unwrap();
        assert_eq!(loaded.keywords.max_per_utterance, 3);
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(EngineSettings::load(&path).is_err());
    }
}
