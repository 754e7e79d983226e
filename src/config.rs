//! Global configuration parsing and validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::lifecycle::transitions::{CargoCatalog, RobotPool};
use crate::models::Area;
use crate::{AppError, Result};

/// Dispatch timer delays.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimerConfig {
    /// Delay before an in-queue mission becomes active.
    #[serde(default = "default_in_queue_to_active_ms")]
    pub in_queue_to_active_ms: u64,
    /// Delay before an active mission completes.
    #[serde(default = "default_active_to_completed_ms")]
    pub active_to_completed_ms: u64,
    /// How often the watcher re-reads the mission store.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            in_queue_to_active_ms: default_in_queue_to_active_ms(),
            active_to_completed_ms: default_active_to_completed_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TimerConfig {
    /// Delay for the `In queue → Active` transition.
    #[must_use]
    pub fn in_queue_to_active(&self) -> Duration {
        Duration::from_millis(self.in_queue_to_active_ms)
    }

    /// Delay for the `Active → Completed` transition.
    #[must_use]
    pub fn active_to_completed(&self) -> Duration {
        Duration::from_millis(self.active_to_completed_ms)
    }

    /// Store polling interval for the watcher.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_in_queue_to_active_ms() -> u64 {
    5000
}

fn default_active_to_completed_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("mission-board.db")
}

fn default_robot_names() -> Vec<String> {
    ["AMR-01", "AMR-02", "Fetcher-01", "MiR-100", "Locus-Bot"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Cargo capabilities and display name of one physical area.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AreaConfig {
    /// Operator-facing name shown instead of the code.
    #[serde(default)]
    pub label: Option<String>,
    /// Cargo types that may leave this area.
    #[serde(default)]
    pub send: Vec<String>,
    /// Cargo types that may arrive at this area.
    #[serde(default)]
    pub receive: Vec<String>,
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// `SQLite` database file holding missions and panels.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Dispatch timer delays.
    #[serde(default)]
    pub timers: TimerConfig,
    /// Robots available for dispatch.
    #[serde(default = "default_robot_names")]
    pub robot_names: Vec<String>,
    /// Area catalog keyed by area code.
    #[serde(default)]
    pub areas: BTreeMap<String, AreaConfig>,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the cargo capability catalog from the `[areas]` table.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if an area key is not a valid area code.
    pub fn cargo_catalog(&self) -> Result<CargoCatalog> {
        let mut catalog = CargoCatalog::default();
        for (code, area) in &self.areas {
            let parsed = Area::parse(code)
                .map_err(|err| AppError::Config(format!("areas.{code}: {err}")))?;
            catalog.insert(parsed, area.clone());
        }
        Ok(catalog)
    }

    /// Robot pool used when dispatching accepted missions.
    #[must_use]
    pub fn robot_pool(&self) -> RobotPool {
        RobotPool::new(self.robot_names.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.robot_names.iter().all(|name| name.trim().is_empty()) {
            return Err(AppError::Config("robot_names must not be empty".into()));
        }

        let timers = &self.timers;
        if timers.in_queue_to_active_ms == 0
            || timers.active_to_completed_ms == 0
            || timers.poll_interval_ms == 0
        {
            return Err(AppError::Config(
                "timer delays must be greater than zero".into(),
            ));
        }

        self.cargo_catalog()?;
        Ok(())
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            timers: TimerConfig::default(),
            robot_names: default_robot_names(),
            areas: BTreeMap::new(),
        }
    }
}
