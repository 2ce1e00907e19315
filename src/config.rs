//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/regiontree/regiontree.toml`
//! 3. Local config: `--config <file>` or `./regiontree.toml`
//! 4. Environment variables: `REGIONTREE_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::SiblingOrder;

/// Export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    /// Sibling order in reports and graphs: received, id or name
    pub sibling_order: SiblingOrder,
}

/// Unified configuration for regiontree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// GeoNames account name sent with every request
    pub username: String,
    /// Delay before each request, in seconds
    pub throttle_secs: f64,
    /// GeoNames API host
    pub host: String,
    /// Use https instead of http
    pub secure: bool,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// Default directory for exported files
    pub output_dir: PathBuf,
    pub export: ExportConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: "demo".into(),
            throttle_secs: 1.0,
            host: "api.geonames.org".into(),
            secure: false,
            timeout_secs: 30,
            output_dir: PathBuf::from("."),
            export: ExportConfig::default(),
        }
    }
}

/// Raw export config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExportConfig {
    pub sibling_order: Option<SiblingOrder>,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub username: Option<String>,
    pub throttle_secs: Option<f64>,
    pub host: Option<String>,
    pub secure: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub export: RawExportConfig,
}

/// Get the XDG config directory for regiontree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "regiontree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("regiontree.toml"))
}

/// Local config file looked up in the working directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from("regiontree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// `http(s)://<host>/`
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}/", scheme, self.host.trim_end_matches('/'))
    }

    /// Throttle as a duration; rejects negative and non-finite values.
    pub fn throttle(&self) -> Result<Duration, ApplicationError> {
        Duration::try_from_secs_f64(self.throttle_secs).map_err(|e| ApplicationError::Config {
            message: format!("throttle_secs = {}: {e}", self.throttle_secs),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Expand shell variables and tilde in `output_dir`.
    fn expand_paths(&mut self) {
        let raw = self.output_dir.to_string_lossy().to_string();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        self.output_dir = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            username: overlay
                .username
                .clone()
                .unwrap_or_else(|| self.username.clone()),
            throttle_secs: overlay.throttle_secs.unwrap_or(self.throttle_secs),
            host: overlay.host.clone().unwrap_or_else(|| self.host.clone()),
            secure: overlay.secure.unwrap_or(self.secure),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            export: ExportConfig {
                sibling_order: overlay
                    .export
                    .sibling_order
                    .unwrap_or(self.export.sibling_order),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; must exist when given.
    ///   Without it `./regiontree.toml` is used if present.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        match local {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                let path = local_config_path();
                if path.exists() {
                    current = current.merge_with(&load_raw_settings(&path)?);
                }
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.throttle()?;
        Ok(current)
    }

    /// Apply REGIONTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("REGIONTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("username") {
            settings.username = val;
        }
        if let Ok(val) = config.get_float("throttle_secs") {
            settings.throttle_secs = val;
        }
        if let Ok(val) = config.get_string("host") {
            settings.host = val;
        }
        if let Ok(val) = config.get_bool("secure") {
            settings.secure = val;
        }
        if let Ok(val) = config.get_int("timeout_secs") {
            settings.timeout_secs = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("REGIONTREE_TIMEOUT_SECS must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("export.sibling_order") {
            settings.export.sibling_order = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("REGIONTREE_EXPORT__SIBLING_ORDER: {e}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# regiontree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/regiontree/regiontree.toml
#   Local:  ./regiontree.toml or --config <file>
#   Env:    REGIONTREE_* environment variables (REGIONTREE_EXPORT__SIBLING_ORDER for nested keys)

# GeoNames account (register at https://www.geonames.org/login)
# username = "demo"

# Seconds to wait before every request (free accounts are rate limited)
# throttle_secs = 1.0

# host = "api.geonames.org"
# secure = false
# timeout_secs = 30

# Directory for exported files
# output_dir = "."

[export]
# Sibling order in reports and graphs: "received", "id" or "name"
# sibling_order = "received"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
