use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::alerts::engine::DEFAULT_ALERT_THRESHOLD;
use super::signals::DEFAULT_NEED_PROBABILITY;

/// Mocked suggestion lookup behaviour.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SuggestionSettings {
    pub latency_ms: u64,
    /// Probability in [0, 1] that a lookup fails
    pub failure_rate: f64,
    pub timeout_ms: u64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            latency_ms: 1_200,
            failure_rate: 0.0,
            timeout_ms: 10_000,
        }
    }
}

impl SuggestionSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Monitor settings, persisted as settings.json.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub signal_interval_ms: u64,
    pub passive_tick_ms: u64,
    pub need_probability: f64,
    pub passive_increment: u8,
    pub signal_boost: u8,
    pub alert_threshold: u8,
    /// Fixed seed for reproducible signal sequences
    pub signal_seed: Option<u64>,
    pub suggestions: SuggestionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            signal_interval_ms: 5_000,
            passive_tick_ms: 2_000,
            need_probability: DEFAULT_NEED_PROBABILITY,
            passive_increment: 1,
            signal_boost: 50,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            signal_seed: None,
            suggestions: SuggestionSettings::default(),
        }
    }
}

impl Settings {
    pub fn signal_interval(&self) -> Duration {
        Duration::from_millis(self.signal_interval_ms.max(1))
    }

    pub fn passive_tick_interval(&self) -> Duration {
        Duration::from_millis(self.passive_tick_ms.max(1))
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Load settings, falling back to defaults when the file is missing or invalid.
    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            match fs::read_to_string(&self.config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => log::warn!("Ignoring invalid {:?}: {}", self.config_path, e),
                },
                Err(e) => log::warn!("Failed to read {:?}: {}", self.config_path, e),
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
