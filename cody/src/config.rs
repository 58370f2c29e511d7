//! User configuration for cody.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/cody/config.toml` (falling back
//! to `~/.config/cody/config.toml`). Every key is optional. Config errors are
//! soft failures: they are printed to stderr before the terminal is taken over
//! and the defaults are used instead.
//!
//! ```toml
//! server_url = "http://localhost:8000"
//! request_timeout_secs = 120
//! interview_minutes = 45
//! theme = "catppuccin-mocha"
//! log_file = "/tmp/cody.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Environment variable that overrides `server_url`.
pub const SERVER_URL_ENV: &str = "CODY_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the interview service.
    pub server_url: String,
    /// Per-request timeout. Model-backed replies can be slow.
    pub request_timeout_secs: u64,
    /// Length of the interview countdown.
    pub interview_minutes: u64,
    /// Theme name, see [`crate::theme::Theme::from_name`].
    pub theme: String,
    /// Where tracing output goes. Defaults to the XDG state directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_owned(),
            request_timeout_secs: 120,
            interview_minutes: 45,
            theme: "catppuccin-mocha".to_owned(),
            log_file: None,
        }
    }
}

impl Config {
    /// Loads the config file and applies environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_path(&config_path());
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                config.server_url = url.trim().to_owned();
            }
        }
        config
    }

    /// Reads `path`, returning defaults when it is missing or malformed.
    pub fn from_path(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        Self::parse(&raw).unwrap_or_else(|e| {
            eprintln!("cody: config parse error in {:?}: {}", path, e);
            Self::default()
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn interview_duration(&self) -> Duration {
        Duration::from_secs(self.interview_minutes.max(1).saturating_mul(60))
    }

    /// Resolved log file path.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_path)
    }
}

fn home_relative(var: &str, fallback: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(fallback))
        })
}

/// Returns the path to the cody config file.
///
/// Prefers `$XDG_CONFIG_HOME/cody/config.toml`; falls back to
/// `~/.config/cody/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    home_relative("XDG_CONFIG_HOME", ".config")
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("cody")
        .join("config.toml")
}

/// `$XDG_STATE_HOME/cody/cody.log`, `~/.local/state/cody/cody.log`, or
/// `./cody.log` when neither is available.
fn default_log_path() -> PathBuf {
    home_relative("XDG_STATE_HOME", ".local/state")
        .map(|dir| dir.join("cody").join("cody.log"))
        .unwrap_or_else(|| PathBuf::from("cody.log"))
}
