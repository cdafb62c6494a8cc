//! Schedule configuration loading.
//!
//! Layers, later wins: built-in defaults (Monday-Friday 09:00-17:00 UTC),
//! `<config dir>/workhours/config.toml`, the `--config` file, then
//! `WORKHOURS_*` environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use schedule_engine::AvailabilityWindow;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// The working schedule to evaluate against.
    #[serde(flatten)]
    pub schedule: AvailabilityWindow,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("days", &self.schedule.day_list())
            .field("start", &self.schedule.start.to_string())
            .field("end", &self.schedule.end.to_string())
            .field("timezone", &self.schedule.timezone)
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // WORKHOURS_DAYS, WORKHOURS_START, WORKHOURS_END, WORKHOURS_TIMEZONE
        figment = figment.merge(Env::prefixed("WORKHOURS_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for workhours.
///
/// On Linux: `~/.config/workhours`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("workhours"))
}
