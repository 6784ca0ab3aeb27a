//! Settings file at `<config_dir>/giza-agent/config.toml`.
//!
//! Every field is optional; missing ones take the built-in defaults.
//! Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::agent::ollama::{DEFAULT_MAX_TURNS, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_TEMPERATURE};
use crate::geo::providers::{DEFAULT_GEOCODER_USER_AGENT, DEFAULT_NOMINATIM_URL};
use crate::weather::{DEFAULT_WEATHER_FORMAT, DEFAULT_WEATHER_URL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub weather_url: String,
    pub weather_format: String,
    pub ollama_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_turns: u32,
    pub probe_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub agent_timeout_secs: u64,
    /// Resolve cities through Nominatim first instead of the built-in table only.
    pub geocoding: bool,
    pub nominatim_url: String,
    pub geocoder_user_agent: String,
    /// Pause between the weather and geocoding calls of one query.
    pub courtesy_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            weather_format: DEFAULT_WEATHER_FORMAT.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_turns: DEFAULT_MAX_TURNS,
            probe_timeout_secs: 2,
            http_timeout_secs: 15,
            agent_timeout_secs: 120,
            geocoding: false,
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            geocoder_user_agent: DEFAULT_GEOCODER_USER_AGENT.to_string(),
            courtesy_delay_ms: 1000,
        }
    }
}

impl Settings {
    /// Load from an explicit path, or from the default path if that file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("giza-agent").join("config.toml"))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }

    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.ollama_url, "http://localhost:11434");
        assert_eq!(s.model, "llama3.2:latest");
        assert_eq!(s.weather_url, "https://wttr.in");
        assert_eq!(s.probe_timeout(), Duration::from_secs(2));
        assert!(!s.geocoding);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "geocoding = true\nmodel = \"qwen3\"\ncourtesy_delay_ms = 0\n").unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert!(s.geocoding);
        assert_eq!(s.model, "qwen3");
        assert_eq!(s.courtesy_delay(), Duration::ZERO);
        assert_eq!(s.weather_url, DEFAULT_WEATHER_URL);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "temperature = \"hot\"\n").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let s = Settings { geocoding: true, max_turns: 8, ..Settings::default() };
        let text = toml::to_string(&s).unwrap();
        assert_eq!(toml::from_str::<Settings>(&text).unwrap(), s);
    }
}
