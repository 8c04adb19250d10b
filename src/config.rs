use crate::app_dirs::AppDirs;
use crate::error::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Coaching intensity; only decides the countdown shown while typing.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Adaptive,
}

impl Difficulty {
    pub fn session_secs(&self) -> u64 {
        match self {
            Difficulty::Easy => 60,
            Difficulty::Medium => 90,
            Difficulty::Hard => 120,
            Difficulty::Adaptive => 75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub target_wpm: u32,
    pub difficulty: Difficulty,
    pub recent_limit: usize,
    pub streak_hours: u64,
    pub coach_interval_secs: u64,
    pub coach_initial_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_wpm: 45,
            difficulty: Difficulty::Medium,
            recent_limit: 20,
            streak_hours: 24,
            coach_interval_secs: 5,
            coach_initial_delay_secs: 2,
        }
    }
}

impl Config {
    pub fn coach_interval(&self) -> Duration {
        Duration::from_secs(self.coach_interval_secs.max(1))
    }

    pub fn coach_initial_delay(&self) -> Duration {
        Duration::from_secs(self.coach_initial_delay_secs)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
