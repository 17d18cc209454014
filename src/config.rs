//! Configuration handling for the form controllers

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Number of target items a respondent must pick
pub const DEFAULT_CAPACITY: usize = 5;
/// Primary choice value that makes the secondary rating required
pub const DEFAULT_TRIGGER_VALUE: &str = "Stereotype";
/// Id prefix of the per-question rating container, followed by the question index
pub const DEFAULT_RATING_CONTAINER_PREFIX: &str = "rating_container_";
/// Checkbox group name on the selection page
pub const DEFAULT_SELECTION_INPUT_NAME: &str = "selected_states";
/// Lifetime of the strong emphasis on the first failing group
pub const DEFAULT_EMPHASIS_MS: u64 = 3500;

/// User configuration as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Required number of selected items
    pub capacity: Option<usize>,
    /// Classification that activates the secondary rating
    pub trigger_value: Option<String>,
    /// Rating container id prefix
    pub rating_container_prefix: Option<String>,
    /// Emphasis duration in milliseconds
    pub emphasis_ms: Option<u64>,
    /// Name shared by the selectable checkboxes
    pub selection_input_name: Option<String>,
}

impl FormConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "stereo-quiz", "quiz-form")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: FormConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the platform config directory
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Resolve optional settings into the rules every controller works with
    pub fn rules(&self) -> FormRules {
        let defaults = FormRules::default();
        FormRules {
            // A zero capacity could never be satisfied by any selection
            capacity: self.capacity.filter(|c| *c > 0).unwrap_or(defaults.capacity),
            trigger_value: self
                .trigger_value
                .clone()
                .unwrap_or(defaults.trigger_value),
            rating_container_prefix: self
                .rating_container_prefix
                .clone()
                .unwrap_or(defaults.rating_container_prefix),
            emphasis: self
                .emphasis_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.emphasis),
            selection_input_name: self
                .selection_input_name
                .clone()
                .unwrap_or(defaults.selection_input_name),
        }
    }
}

/// Resolved contract values shared by the controllers and the validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRules {
    pub capacity: usize,
    pub trigger_value: String,
    pub rating_container_prefix: String,
    pub emphasis: Duration,
    pub selection_input_name: String,
}

impl FormRules {
    /// Id of the rating container belonging to a question
    pub fn rating_container_id(&self, question_index: usize) -> String {
        format!("{}{}", self.rating_container_prefix, question_index)
    }
}

impl Default for FormRules {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            trigger_value: DEFAULT_TRIGGER_VALUE.to_string(),
            rating_container_prefix: DEFAULT_RATING_CONTAINER_PREFIX.to_string(),
            emphasis: Duration::from_millis(DEFAULT_EMPHASIS_MS),
            selection_input_name: DEFAULT_SELECTION_INPUT_NAME.to_string(),
        }
    }
}
