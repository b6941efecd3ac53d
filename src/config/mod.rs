use serde::{Deserialize, Serialize};
use std::{
    env, io,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use crate::{
    advisory::generative::DEFAULT_MODEL,
    ledger::{default_ingredients, CatalogItem, CustomCategories, Ingredient},
    utils::{
        paths,
        persistence::{read_json_if_exists, write_json_atomic},
    },
};

pub const ADVISORY_KEY_ENV: &str = "COOP_CORE_ADVISORY_KEY";
pub const STORE_URL_ENV: &str = "COOP_CORE_STORE_URL";
pub const STORE_KEY_ENV: &str = "COOP_CORE_STORE_KEY";

pub const DEFAULT_FEED_GRAMS_PER_BIRD: f64 = 110.0;

/// Keys accepted by [`Config::set`].
pub const SETTABLE_KEYS: &[&str] = &[
    "locale",
    "currency",
    "store_url",
    "store_api_key",
    "advisory_api_key",
    "advisory_base_url",
    "advisory_model",
    "admin_email",
    "default_feed_grams_per_bird",
    "request_timeout_secs",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serde(String),
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}

fn default_feed_grams() -> f64 {
    DEFAULT_FEED_GRAMS_PER_BIRD
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

/// Local settings plus the per-device lists the farm keeps outside the
/// hosted store (custom categories, catalog, ingredient prices).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory_base_url: Option<String>,
    #[serde(default = "default_model")]
    pub advisory_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,
    /// Email of the last session, restored on start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_email: Option<String>,
    #[serde(default = "default_feed_grams")]
    pub default_feed_grams_per_bird: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub custom_categories: CustomCategories,
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    #[serde(default = "default_ingredients")]
    pub ingredients: Vec<Ingredient>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            store_url: None,
            store_api_key: None,
            advisory_api_key: None,
            advisory_base_url: None,
            advisory_model: default_model(),
            admin_email: None,
            last_email: None,
            default_feed_grams_per_bird: DEFAULT_FEED_GRAMS_PER_BIRD,
            request_timeout_secs: None,
            custom_categories: CustomCategories::default(),
            catalog: Vec::new(),
            ingredients: default_ingredients(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Environment variables win over the file for secrets and endpoints.
    pub fn apply_env_overrides(&mut self) {
        let read = |name: &str| env::var(name).ok().filter(|value| !value.trim().is_empty());
        if let Some(key) = read(ADVISORY_KEY_ENV) {
            self.advisory_api_key = Some(key);
        }
        if let Some(url) = read(STORE_URL_ENV) {
            self.store_url = Some(url);
        }
        if let Some(key) = read(STORE_KEY_ENV) {
            self.store_api_key = Some(key);
        }
    }

    /// Updates one setting from text; an empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = || Some(value.to_string()).filter(|text| !text.is_empty());
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_uppercase(),
            "store_url" => self.store_url = optional(),
            "store_api_key" => self.store_api_key = optional(),
            "advisory_api_key" => self.advisory_api_key = optional(),
            "advisory_base_url" => self.advisory_base_url = optional(),
            "advisory_model" => {
                self.advisory_model = optional().unwrap_or_else(default_model);
            }
            "admin_email" => self.admin_email = optional().map(|email| email.to_lowercase()),
            "default_feed_grams_per_bird" => {
                let grams: f64 = value.replace(',', ".").parse().map_err(|_| invalid(key, "expected a number"))?;
                if !grams.is_finite() || grams <= 0.0 {
                    return Err(invalid(key, "must be greater than zero"));
                }
                self.default_feed_grams_per_bird = grams;
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid(key, "expected whole seconds"))?)
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Settings rendered for display, secrets masked.
    pub fn display_entries(&self) -> Vec<(&'static str, String)> {
        let plain = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("store_url", plain(&self.store_url)),
            ("store_api_key", mask_secret(self.store_api_key.as_deref())),
            ("advisory_api_key", mask_secret(self.advisory_api_key.as_deref())),
            ("advisory_base_url", plain(&self.advisory_base_url)),
            ("advisory_model", self.advisory_model.clone()),
            ("admin_email", plain(&self.admin_email)),
            (
                "default_feed_grams_per_bird",
                format!("{}", self.default_feed_grams_per_bird),
            ),
            (
                "request_timeout_secs",
                self.request_timeout_secs
                    .map(|secs| secs.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
        ]
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        None => "-".into(),
        Some(value) if value.chars().count() <= 4 => "****".into(),
        Some(value) => {
            let tail: String = value
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{tail}")
        }
    }
}

/// Loads and atomically saves [`Config`] under the data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        std::fs::create_dir_all(&base)?;
        Ok(Self {
            config_path: paths::config_file_in(&base),
            base_dir: base,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// File contents or defaults, without environment overrides.
    pub fn load(&self) -> Result<Config, ConfigError> {
        Ok(read_json_if_exists::<Config, ConfigError>(&self.config_path)?.unwrap_or_default())
    }

    /// File contents with environment overrides applied; what the shell runs with.
    pub fn load_effective(&self) -> Result<Config, ConfigError> {
        let mut config = self.load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        write_json_atomic::<_, ConfigError>(config, &self.config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_brazilian_farm() {
        let config = Config::default();
        assert_eq!(config.currency, "BRL");
        assert_eq!(config.default_feed_grams_per_bird, 110.0);
        assert_eq!(config.ingredients.len(), 5);
        assert_eq!(config.advisory_model, DEFAULT_MODEL);
    }

    #[test]
    fn set_validates_numbers() {
        let mut config = Config::default();
        config.set("default_feed_grams_per_bird", "95,5").unwrap();
        assert_eq!(config.default_feed_grams_per_bird, 95.5);
        assert!(matches!(
            config.set("default_feed_grams_per_bird", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("theme", "dark"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn empty_value_clears_optional_key() {
        let mut config = Config::default();
        config.set("store_url", "https://x.supabase.co").unwrap();
        config.set("store_url", "").unwrap();
        assert!(config.store_url.is_none());
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_secret(Some("abcdefgh1234")), "****1234");
        assert_eq!(mask_secret(Some("abc")), "****");
        assert_eq!(mask_secret(None), "-");
    }

    #[test]
    fn zero_timeout_means_transport_default() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Config::default()
        };
        assert!(config.request_timeout().is_none());
    }
}
