//! Mock daemon configuration.
//!
//! Precedence, lowest first: built-in defaults, `~/.mocksync/config.yaml`,
//! the `MOCKSYNC_SYSTEM_BUS` environment variable, then CLI flags (applied by
//! the caller on the returned value).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mocksync_core::ProfileSet;

use crate::error::{io_err, DaemonError};
use crate::paths::{config_path, SYSTEM_BUS_ENV};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Attach to the system bus instead of the session bus.
    pub system_bus: bool,
    pub schedule: ScheduleConfig,
    /// Directory of extra `*.xml` profile fixtures.
    pub profiles_dir: Option<PathBuf>,
}

/// Relative delays, from the `startSync` call, of each scripted status event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub queued_ms: u64,
    pub running_ms: u64,
    pub progress_ms: u64,
    pub done_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            queued_ms: 200,
            running_ms: 400,
            progress_ms: 600,
            done_ms: 800,
        }
    }
}

impl ScheduleConfig {
    /// Delays in script order: queued, running, progress, done.
    pub fn delays(&self) -> [Duration; 4] {
        [
            Duration::from_millis(self.queued_ms),
            Duration::from_millis(self.running_ms),
            Duration::from_millis(self.progress_ms),
            Duration::from_millis(self.done_ms),
        ]
    }

    /// The first delay must be non-zero and the rest strictly increasing, so
    /// each start's events keep their order.
    pub fn validate(&self) -> Result<(), DaemonError> {
        if self.queued_ms == 0 {
            return Err(DaemonError::InvalidSchedule(
                "queued_ms must be greater than 0".to_string(),
            ));
        }
        let delays = [
            ("queued_ms", self.queued_ms),
            ("running_ms", self.running_ms),
            ("progress_ms", self.progress_ms),
            ("done_ms", self.done_ms),
        ];
        for pair in delays.windows(2) {
            let (prev_name, prev) = pair[0];
            let (name, value) = pair[1];
            if value <= prev {
                return Err(DaemonError::InvalidSchedule(format!(
                    "{name} ({value}) must be greater than {prev_name} ({prev})"
                )));
            }
        }
        Ok(())
    }
}

impl MockConfig {
    /// Load `<home>/.mocksync/config.yaml` (defaults when absent) and apply the environment.
    pub fn load_at(home: &Path) -> Result<Self, DaemonError> {
        Self::resolve(home, std::env::var(SYSTEM_BUS_ENV).ok().as_deref())
    }

    fn resolve(home: &Path, system_bus_env: Option<&str>) -> Result<Self, DaemonError> {
        let path = config_path(home);
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_value(system_bus_env);
        Ok(config)
    }

    /// `load_at` convenience wrapper rooted at the user's home directory.
    pub fn load() -> Result<Self, DaemonError> {
        let home = dirs::home_dir().ok_or_else(|| {
            io_err(
                "$HOME",
                std::io::Error::new(std::io::ErrorKind::NotFound, "cannot determine home directory"),
            )
        })?;
        Self::load_at(&home)
    }

    /// Parse one YAML file. No environment overrides are applied.
    pub fn load_from(path: &Path) -> Result<Self, DaemonError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let config: Self = serde_yaml::from_str(&contents).map_err(|source| DaemonError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.schedule.validate()?;
        Ok(config)
    }

    /// Apply a `MOCKSYNC_SYSTEM_BUS` value. Unrecognized values are ignored.
    pub fn apply_env_value(&mut self, value: Option<&str>) {
        let Some(raw) = value else { return };
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => self.system_bus = true,
            "" | "0" | "false" | "no" | "off" => self.system_bus = false,
            other => {
                tracing::warn!(value = %other, "ignoring unrecognized {SYSTEM_BUS_ENV} value");
            }
        }
    }

    /// Profile fixtures: the built-in document plus any directory fixtures.
    pub fn profile_set(&self) -> Result<ProfileSet, DaemonError> {
        match &self.profiles_dir {
            Some(dir) => Ok(ProfileSet::load_dir(dir)?),
            None => Ok(ProfileSet::builtin()),
        }
    }
}
