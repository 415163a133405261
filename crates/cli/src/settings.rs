use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatewatch_core::shared::constants::{
    CONFIDENCE_THRESHOLD, DEFAULT_POLL_INTERVAL, DEFAULT_PROXIMITY_PX, RECOGNIZED_HOLD,
    UNCONFIRMED_HOLD,
};
use gatewatch_core::shared::engine_config::{EngineConfig, RestartPolicy};
use gatewatch_core::shared::http_service_config::HttpServiceConfig;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted operator preferences. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overrides `GATEWATCH_SERVICE_URL` when set.
    pub service_url: Option<String>,
    pub service_timeout_secs: Option<u64>,
    pub entry_source: Option<PathBuf>,
    pub exit_source: Option<PathBuf>,
    pub poll_interval_ms: u64,
    pub recognized_hold_secs: u64,
    pub unconfirmed_hold_secs: u64,
    pub confidence_threshold: f64,
    pub proximity_px: f64,
    pub auto_restart: bool,
    pub recommendations: bool,
    pub fallback_file: Option<PathBuf>,
    pub registration_inbox: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: None,
            service_timeout_secs: None,
            entry_source: None,
            exit_source: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            recognized_hold_secs: RECOGNIZED_HOLD.as_secs(),
            unconfirmed_hold_secs: UNCONFIRMED_HOLD.as_secs(),
            confidence_threshold: CONFIDENCE_THRESHOLD,
            proximity_px: DEFAULT_PROXIMITY_PX,
            auto_restart: false,
            recommendations: true,
            fallback_file: None,
            registration_inbox: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Gatewatch").join("settings.json"))
    }

    /// Reads settings from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            recognized_hold: Duration::from_secs(self.recognized_hold_secs),
            unconfirmed_hold: Duration::from_secs(self.unconfirmed_hold_secs),
            confidence_threshold: self.confidence_threshold,
            proximity_px: self.proximity_px,
            restart_policy: if self.auto_restart {
                RestartPolicy::Automatic
            } else {
                RestartPolicy::Manual
            },
        }
    }

    /// Environment first, then whatever the settings file pins.
    pub fn service_config(&self) -> HttpServiceConfig {
        let mut config = HttpServiceConfig::from_env();
        if let Some(url) = &self.service_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.service_timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}
