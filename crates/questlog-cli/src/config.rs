//! Application configuration.
//!
//! Holds the save location, the daily focus rotation, and the leisure reward
//! catalog. Configuration can be loaded from and saved to a TOML file.

use questlog_progression::LeisureReward;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "questlog.toml";

/// Save file name inside the data directory.
const SAVE_FILE: &str = "save.json";

/// Application configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Save file location (None = platform data directory)
    pub save_path: Option<PathBuf>,
    /// Daily focus rotation, one category per day
    pub focus_categories: Vec<String>,
    /// Rewards that can be bought with gold
    pub rewards: Vec<LeisureReward>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_path: None,
            focus_categories: ["Work", "Health", "Learning", "Personal", "Social", "Creative"]
                .into_iter()
                .map(String::from)
                .collect(),
            rewards: vec![
                LeisureReward::new("Coffee break", 20),
                LeisureReward::new("Episode of a show", 50),
                LeisureReward::new("Movie night", 100),
                LeisureReward::new("Gaming session", 150),
                LeisureReward::new("Day off", 500),
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join("questlog").join(CONFIG_FILE),
        )
    }

    /// Save file path, falling back to the platform data directory.
    pub fn resolved_save_path(&self) -> PathBuf {
        if let Some(path) = &self.save_path {
            return path.clone();
        }
        dirs::data_dir().map_or_else(
            || PathBuf::from(SAVE_FILE),
            |dir| dir.join("questlog").join(SAVE_FILE),
        )
    }

    /// Normalize user-edited values.
    ///
    /// Trims names, drops blank or duplicate focus categories, and drops
    /// rewards without a name.
    pub fn validate(&mut self) {
        let mut seen = Vec::with_capacity(self.focus_categories.len());
        for category in self.focus_categories.drain(..) {
            let category = category.trim().to_string();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        self.focus_categories = seen;

        self.rewards.retain_mut(|reward| {
            reward.name = reward.name.trim().to_string();
            !reward.name.is_empty()
        });
    }
}
