//! Site configuration
//!
//! A site describes the providers who may sign in, the shift schedules they
//! sign in to, and how much board history to keep. Loaded from
//! `.pat/site.toml` under the site root.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{PatError, Provider, Result, Role, Schedule};

/// Smallest history window a board can keep
pub const MIN_EVENT_LIMIT: usize = 1;

/// Site-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site identifier, also the store key for the board
    #[serde(default = "default_site_id")]
    pub id: String,

    /// Number of recent events kept on the board (and undoable)
    #[serde(default = "default_event_limit")]
    pub event_limit: usize,

    /// Providers who may sign in
    #[serde(default)]
    pub providers: Vec<Provider>,

    /// Shift templates offered at sign-in
    #[serde(default = "default_schedule")]
    pub schedule: Vec<Schedule>,
}

/// Engine settings derived from the site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub event_limit: usize,
}

fn default_site_id() -> String {
    "default".to_string()
}

fn default_event_limit() -> usize {
    25
}

fn default_schedule() -> Vec<Schedule> {
    vec![
        Schedule::new("6a-3p", Role::Physician)
            .with_bonus(2)
            .with_zones(["main"]),
        Schedule::new("6a-3p APP", Role::App).with_zones(["fasttrack"]),
    ]
}

impl SiteConfig {
    /// Load configuration from `.pat/site.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".pat/site.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| PatError::Config(format!("Failed to parse site config: {}", e)))
    }

    /// Write default configuration to `.pat/site.toml`
    pub fn write_default(root: &Path) -> Result<()> {
        let config_dir = root.join(".pat");
        std::fs::create_dir_all(&config_dir)?;

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| PatError::Config(format!("Failed to serialize site config: {}", e)))?;
        std::fs::write(config_dir.join("site.toml"), content)?;
        Ok(())
    }

    /// Find a schedule by name
    pub fn schedule(&self, name: &str) -> Option<&Schedule> {
        self.schedule.iter().find(|s| s.name == name)
    }

    /// Engine settings for this site
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            event_limit: self.event_limit.max(MIN_EVENT_LIMIT),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            id: default_site_id(),
            event_limit: default_event_limit(),
            providers: Vec::new(),
            schedule: default_schedule(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        SiteConfig::default().engine()
    }
}
