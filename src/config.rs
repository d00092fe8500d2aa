//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <file>`, else `$XDG_CONFIG_HOME/pwnlook/pwnlook.toml`
//! 3. Environment variables: `PWNLOOK_*` prefix
//! 4. Command-line flags (see [`SettingsOverrides`])

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{ParseMode, DEFAULT_RESULTS_SELECTOR};

/// Search form endpoint of the service.
pub const DEFAULT_ENDPOINT: &str = "https://pwndb2am4tzkvold.tor2web.io/";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Username of the sentinel record the service appends to every result.
pub const DEFAULT_PLACEHOLDER_USER: &str = "donate";

/// Unified configuration for pwnlook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Search form URL
    pub endpoint: String,
    /// Overall request timeout in seconds
    pub timeout_secs: u64,
    /// Trust any TLS certificate presented by the endpoint (default: verify)
    pub accept_invalid_certs: bool,
    /// Proxy URL, e.g. `socks5h://127.0.0.1:9050`
    pub proxy: Option<String>,
    /// CSS selector of the results block
    pub results_selector: String,
    /// Abort on malformed records (strict) or skip them (lenient)
    pub parse_mode: ParseMode,
    /// Records with this user are hidden from table output
    pub placeholder_user: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
            proxy: None,
            results_selector: DEFAULT_RESULTS_SELECTOR.into(),
            parse_mode: ParseMode::Strict,
            placeholder_user: DEFAULT_PLACEHOLDER_USER.into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
    pub proxy: Option<String>,
    pub results_selector: Option<String>,
    pub parse_mode: Option<ParseMode>,
    pub placeholder_user: Option<String>,
}

/// Values given on the command line. They win over every other layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub proxy: Option<String>,
    /// `--insecure`; only ever switches verification off
    pub accept_invalid_certs: bool,
    /// `--lenient`; only ever switches to lenient parsing
    pub lenient: bool,
}

/// Get the XDG config directory for pwnlook.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pwnlook").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pwnlook.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path given by the user.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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
    /// Merge overlay config onto self (base): overlay wins if specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            endpoint: overlay
                .endpoint
                .clone()
                .unwrap_or_else(|| self.endpoint.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            accept_invalid_certs: overlay
                .accept_invalid_certs
                .unwrap_or(self.accept_invalid_certs),
            proxy: overlay.proxy.clone().or_else(|| self.proxy.clone()),
            results_selector: overlay
                .results_selector
                .clone()
                .unwrap_or_else(|| self.results_selector.clone()),
            parse_mode: overlay.parse_mode.unwrap_or(self.parse_mode),
            placeholder_user: overlay
                .placeholder_user
                .clone()
                .unwrap_or_else(|| self.placeholder_user.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist when given.
    ///   Without it the XDG config file is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        match config_file {
            Some(path) => {
                let path = expand_path(path);
                debug!("loading config file {}", path.display());
                current = current.merge_with(&load_raw_settings(&path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        debug!("loading config file {}", global_path.display());
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        // 3. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply PWNLOOK_* environment variables as explicit overrides.
    ///
    /// Settings are flat: `PWNLOOK_TIMEOUT_SECS` maps to `timeout_secs`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PWNLOOK")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("endpoint") {
            settings.endpoint = val;
        }
        if let Ok(val) = config.get::<u64>("timeout_secs") {
            settings.timeout_secs = val;
        }
        if let Ok(val) = config.get_bool("accept_invalid_certs") {
            settings.accept_invalid_certs = val;
        }
        if let Ok(val) = config.get_string("proxy") {
            settings.proxy = Some(val);
        }
        if let Ok(val) = config.get_string("results_selector") {
            settings.results_selector = val;
        }
        if let Ok(val) = config.get::<ParseMode>("parse_mode") {
            settings.parse_mode = val;
        }
        if let Ok(val) = config.get_string("placeholder_user") {
            settings.placeholder_user = val;
        }

        Ok(settings)
    }

    /// Apply command-line overrides on top of the loaded layers.
    pub fn apply_overrides(mut self, overrides: &SettingsOverrides) -> Result<Self, ApplicationError> {
        if let Some(endpoint) = &overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(proxy) = &overrides.proxy {
            self.proxy = Some(proxy.clone());
        }
        if overrides.accept_invalid_certs {
            self.accept_invalid_certs = true;
        }
        if overrides.lenient {
            self.parse_mode = ParseMode::Lenient;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.endpoint.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "endpoint must not be empty".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "timeout_secs must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# pwnlook configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/pwnlook/pwnlook.toml (or --config <file>)
#   Env:  PWNLOOK_* environment variables, e.g. PWNLOOK_TIMEOUT_SECS=60
#   CLI:  --endpoint, --timeout, --proxy, --insecure, --lenient

# Search form URL
# endpoint = "{DEFAULT_ENDPOINT}"

# Overall request timeout in seconds
# timeout_secs = {DEFAULT_TIMEOUT_SECS}

# Trust any TLS certificate presented by the endpoint.
# This removes protection against interception; enable only for endpoints
# with a self-issued certificate chain you have decided to trust.
# accept_invalid_certs = false

# Route requests through a proxy, e.g. a local Tor daemon
# proxy = "socks5h://127.0.0.1:9050"

# CSS selector of the block holding the records
# results_selector = "{DEFAULT_RESULTS_SELECTOR}"

# "strict": a malformed record aborts the search
# "lenient": malformed records are skipped with a warning
# parse_mode = "strict"

# Sentinel user hidden from table output
# placeholder_user = "{DEFAULT_PLACEHOLDER_USER}"
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
