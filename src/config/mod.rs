//! Host configuration for `routelit.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── serve      # [serve]
//! │   ├── session    # [session]
//! │   └── lifecycle  # [lifecycle]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section         | Purpose                                          |
//! |-----------------|--------------------------------------------------|
//! | `[serve]`       | Demo host interface and port                     |
//! | `[session]`     | Session cookie, clear and fragment query params  |
//! | `[lifecycle]`   | Rerun guard                                      |
//!
//! A missing config file is not an error: every section has defaults.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{LifecycleConfig, ServeConfig, SessionConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing routelit.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Demo host settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Session naming
    #[serde(default)]
    pub session: SessionConfig,

    /// Request lifecycle limits
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

impl AppConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    pub fn load(config_name: &Path) -> Result<Self> {
        let mut config = match find_config_file(config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                let cwd = std::env::current_dir().context("Failed to get current working directory")?;
                Self {
                    config_path: cwd.join(config_name),
                    ..Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// CLI flags override the `[serve]` section.
    pub fn apply_serve_options(&mut self, interface: Option<IpAddr>, port: Option<u16>) {
        if let Some(interface) = interface {
            self.serve.interface = interface;
        }
        if let Some(port) = port {
            self.serve.port = port;
        }
    }

    /// Reject settings the host cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serve.port == 0 {
            return Err(ConfigError::Validation("[serve] port must not be 0".into()));
        }
        for (name, value) in [
            ("cookie", &self.session.cookie),
            ("clear_param", &self.session.clear_param),
            ("fragment_param", &self.session.fragment_param),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("[session] {name} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
