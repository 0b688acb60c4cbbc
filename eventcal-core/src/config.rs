//! Global eventcal configuration.

use std::path::{Path, PathBuf};

use chrono::Duration;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CATEGORY, DEFAULT_COLOR, DEFAULT_DURATION};
use crate::error::{CalendarError, CalendarResult};

static DEFAULT_DATA_FILE: &str = "~/.local/share/eventcal/events.json";

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn is_default_data_file(p: &PathBuf) -> bool {
    *p == default_data_file()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

/// Configuration at ~/.config/eventcal/config.toml
///
/// Any key can be overridden with an `EVENTCAL_`-prefixed environment
/// variable, e.g. `EVENTCAL_DATA_FILE`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventcalConfig {
    #[serde(default = "default_data_file", skip_serializing_if = "is_default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_color")]
    pub default_color: String,

    #[serde(default = "default_category")]
    pub default_category: String,

    /// humantime duration, e.g. "30m" or "1h 30m"
    #[serde(default = "default_duration")]
    pub default_duration: String,
}

impl Default for EventcalConfig {
    fn default() -> Self {
        EventcalConfig {
            data_file: default_data_file(),
            default_color: default_color(),
            default_category: default_category(),
            default_duration: default_duration(),
        }
    }
}

impl EventcalConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("eventcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first use.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from a specific file (missing file means defaults).
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        let config: EventcalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("EVENTCAL"))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Data file path with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Parsed `default_duration`.
    pub fn event_duration(&self) -> CalendarResult<Duration> {
        let std_dur = humantime::parse_duration(&self.default_duration).map_err(|e| {
            CalendarError::Config(format!(
                "Invalid default_duration '{}': {}",
                self.default_duration, e
            ))
        })?;

        Duration::from_std(std_dur)
            .map_err(|_| CalendarError::Config("default_duration is too large".into()))
    }

    pub fn save(&self, path: &Path) -> CalendarResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# eventcal configuration

# Where events are stored:
# data_file = \"{}\"

# Defaults for new events:
# default_color = \"{}\"
# default_category = \"{}\"
# default_duration = \"{}\"
",
            DEFAULT_DATA_FILE, DEFAULT_COLOR, DEFAULT_CATEGORY, DEFAULT_DURATION
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
