//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Catalog endpoint, letters to fetch and request timeout
//! - What to do when a preference write fails
//! - Challenge defaults (mode and countdown length)
//!
//! Configuration is stored at `~/.config/mixology/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use super::preferences::WritePolicy;
use crate::challenge::{ChallengeMode, MAX_COUNTDOWN_SECS};
use crate::error::ConfigError;

/// Remote catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// First letters to page through; one request per letter.
    #[serde(default = "default_letters")]
    pub letters: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub write_policy: WritePolicy,
}

/// Challenge mode defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeConfig {
    #[serde(default = "default_countdown_secs")]
    pub default_countdown_secs: u32,
    #[serde(default)]
    pub default_mode: ChallengeMode,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mixology/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub challenge: ChallengeConfig,
}

fn default_base_url() -> String {
    "https://www.thecocktaildb.com/api/json/v1/1/".into()
}
fn default_letters() -> String {
    ('a'..='z').collect()
}
fn default_request_timeout_secs() -> u64 {
    15
}
fn default_countdown_secs() -> u32 {
    60
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            letters: default_letters(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            default_countdown_secs: default_countdown_secs(),
            default_mode: ChallengeMode::default(),
        }
    }
}

impl CatalogConfig {
    /// Distinct letters in configured order, whitespace ignored.
    pub fn letters(&self) -> Vec<char> {
        let mut out: Vec<char> = Vec::new();
        for c in self.letters.chars().filter(|c| !c.is_whitespace()) {
            let c = c.to_ascii_lowercase();
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("only leaf keys can be set".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the config file inside [`data_dir`].
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Rejects unknown keys and
    /// values that do not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check values serde alone cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.letters().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "catalog.letters".into(),
                message: "at least one letter is required".into(),
            });
        }
        if !(1..=MAX_COUNTDOWN_SECS).contains(&self.challenge.default_countdown_secs) {
            return Err(ConfigError::InvalidValue {
                key: "challenge.default_countdown_secs".into(),
                message: format!("must be between 1 and {MAX_COUNTDOWN_SECS}"),
            });
        }
        url::Url::parse(&self.catalog.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "catalog.base_url".into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.challenge.default_countdown_secs, 60);
        assert_eq!(parsed.storage.write_policy, WritePolicy::FireAndForget);
        assert_eq!(parsed.catalog.letters().len(), 26);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[storage]\nwrite_policy = \"surface\"\n").unwrap();
        assert_eq!(parsed.storage.write_policy, WritePolicy::Surface);
        assert_eq!(parsed.catalog.request_timeout_secs, 15);
        assert_eq!(parsed.challenge.default_mode, ChallengeMode::CountUp);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("challenge.default_countdown_secs").as_deref(), Some("60"));
        assert_eq!(cfg.get("storage.write_policy").as_deref(), Some("fire_and_forget"));
        assert!(cfg.get("catalog.missing_key").is_none());
    }

    #[test]
    fn set_updates_enum_and_number() {
        let mut cfg = Config::default();
        cfg.set("storage.write_policy", "surface").unwrap();
        cfg.set("challenge.default_mode", "count_down").unwrap();
        cfg.set("catalog.request_timeout_secs", "5").unwrap();
        assert_eq!(cfg.storage.write_policy, WritePolicy::Surface);
        assert_eq!(cfg.challenge.default_mode, ChallengeMode::CountDown);
        assert_eq!(cfg.catalog.request_timeout_secs, 5);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("catalog.nope", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("storage.write_policy", "sometimes").is_err());
        assert!(cfg.set("challenge.default_countdown_secs", "0").is_err());
        assert!(cfg.set("challenge.default_countdown_secs", "-3").is_err());
        assert!(matches!(
            cfg.set("challenge.default_countdown_secs", "100000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        cfg.set("challenge.default_countdown_secs", "99999").unwrap();
        cfg.set("challenge.default_countdown_secs", "60").unwrap();
        assert!(cfg.set("catalog", "x").is_err());
        assert_eq!(cfg.challenge.default_countdown_secs, 60);
    }

    #[test]
    fn letters_are_deduplicated_and_lowercased() {
        let catalog = CatalogConfig {
            letters: "aBb c".into(),
            ..CatalogConfig::default()
        };
        assert_eq!(catalog.letters(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.catalog.base_url, default_base_url());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "catalog = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn load_from_rejects_out_of_range_countdown() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[challenge]\ndefault_countdown_secs = 120000\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
