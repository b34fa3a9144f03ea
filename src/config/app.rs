//! Application configuration loading from config.toml
//!
//! The file names the spreadsheets a user may pick from, store settings, and
//! the fixed option lists offered by the expense form. Secrets never live here;
//! they are read from the environment (see `config::store`).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "FINANCE_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Selectable backing spreadsheets; the first one is the default
    pub spreadsheets: Vec<String>,
    /// Backing store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Options offered by the expense form
    #[serde(default)]
    pub form: FormOptions,
}

/// `[store]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// Store URL; `FINANCE_STORE_URL` takes precedence when set
    pub url: Option<String>,
    /// Lifetime of a cached table read, in seconds
    pub cache_ttl_secs: u64,
    /// Create missing worksheets at startup instead of failing
    pub provision: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            cache_ttl_secs: 60,
            provision: false,
        }
    }
}

impl StoreConfig {
    /// Cache time-to-live as a `Duration`.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// `[form]` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FormOptions {
    /// Categories always offered, merged with the Budgets categories
    pub categories: Vec<String>,
    /// Payment methods offered
    pub payment_methods: Vec<String>,
    /// People who can be recorded as payer
    pub payers: Vec<String>,
}

impl Default for FormOptions {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(ToString::to_string).collect();
        Self {
            categories: owned(&["Food", "Utilities", "Transportation", "Entertainment", "Other"]),
            payment_methods: owned(&["Amex", "Visa", "Checking", "Cash", "Other"]),
            payers: owned(&["You", "Partner"]),
        }
    }
}

impl AppConfig {
    /// Resolves the spreadsheet an interaction targets.
    ///
    /// `None` selects the first configured spreadsheet. Names outside the
    /// configured list are rejected.
    pub fn resolve_spreadsheet<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str> {
        match requested {
            None => self
                .spreadsheets
                .first()
                .map(String::as_str)
                .ok_or_else(|| Error::Config {
                    message: "No spreadsheets configured".to_string(),
                }),
            Some(name) if self.spreadsheets.iter().any(|s| s == name) => Ok(name),
            Some(name) => Err(Error::UnknownSpreadsheet {
                name: name.to_string(),
            }),
        }
    }

    fn validate(self) -> Result<Self> {
        if self.spreadsheets.is_empty() {
            return Err(Error::Config {
                message: "At least one spreadsheet must be listed under `spreadsheets`".to_string(),
            });
        }
        if self.spreadsheets.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::Config {
                message: "Spreadsheet names cannot be empty".to_string(),
            });
        }
        Ok(self)
    }
}

/// Parses and validates configuration from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid or no spreadsheet is listed.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The spreadsheet list is empty
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `$FINANCE_CONFIG`, falling back to `./config.toml`.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
