//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite work log database.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("wl.db"),
        }
    }
}

impl Config {
    /// Loads configuration: defaults, then `config.toml` in the config
    /// directory, then `config_path` if given, then `WL_*` variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(file) = dirs::config_dir().map(|dir| dir.join("wl").join("config.toml")) {
            figment = figment.merge(Toml::file(file));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("WL_")).extract()
    }
}

/// `~/.local/share/wl` on Linux.
fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("wl"))
}
