use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AmplifyError, Result};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const MODEL_VAR: &str = "GEMINI_MODEL";
const TIMEOUT_VAR: &str = "X_AMPLIFY_TIMEOUT_SECS";
const RETRIES_VAR: &str = "X_AMPLIFY_MAX_RETRIES";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Config {
    /// Config with default model, timeout and retry settings.
    pub fn new(gemini_api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Resolve settings from the process environment first, then the secret store files.
    pub fn from_env() -> Result<Self> {
        let store = secret_store_paths();

        let gemini_api_key = lookup(API_KEY_VAR, &store).ok_or_else(|| {
            AmplifyError::Config(format!(
                "{} not found in the environment or in any of: {}",
                API_KEY_VAR,
                store
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let mut config = Self::new(gemini_api_key);

        if let Some(model) = lookup(MODEL_VAR, &store) {
            config.model = model;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR, &store) {
            let secs = parse_positive(TIMEOUT_VAR, &raw)?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(RETRIES_VAR, &store) {
            config.max_retries = raw.trim().parse().map_err(|_| {
                AmplifyError::Config(format!(
                    "{} must be a non-negative integer, got {:?}",
                    RETRIES_VAR, raw
                ))
            })?;
        }

        Ok(config)
    }
}

/// Secret store locations, in order of preference.
pub fn secret_store_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".env")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("x-amplify").join(".env"));
    }

    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".env"));
    }

    paths
}

fn lookup(key: &str, store: &[PathBuf]) -> Option<String> {
    resolve(env::var(key).ok(), key, store)
}

/// The environment value wins; otherwise the first store file defining `key`.
fn resolve(env_value: Option<String>, key: &str, store: &[PathBuf]) -> Option<String> {
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(value);
    }

    store.iter().find_map(|path| read_from_file(path, key))
}

fn read_from_file(path: &Path, key: &str) -> Option<String> {
    if !path.exists() {
        return None;
    }

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            return None;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .find(|(k, v)| k == key && !v.trim().is_empty())
        .map(|(_, v)| v)
}

fn parse_positive(var: &str, raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AmplifyError::Config(format!(
            "{} must be a positive number of seconds, got {:?}",
            var, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_env_value_takes_priority_over_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join(".env");
        fs::write(&store, "GEMINI_API_KEY=from-file\n").unwrap();

        let value = resolve(Some("from-env".to_string()), API_KEY_VAR, &[store]);
        assert_eq!(value.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_store_used_when_env_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.env");
        let store = dir.path().join(".env");
        fs::write(&store, "OTHER=1\nGEMINI_API_KEY=from-file\n").unwrap();

        let value = resolve(None, API_KEY_VAR, &[missing, store]);
        assert_eq!(value.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.env");
        let second = dir.path().join("second.env");
        fs::write(&first, "GEMINI_API_KEY=\n").unwrap();
        fs::write(&second, "GEMINI_API_KEY=second\n").unwrap();

        let value = resolve(Some("  ".to_string()), API_KEY_VAR, &[first, second]);
        assert_eq!(value.as_deref(), Some("second"));
    }

    #[test]
    fn test_missing_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let value = resolve(None, API_KEY_VAR, &[dir.path().join(".env")]);
        assert!(value.is_none());
    }

    #[test]
    fn test_parse_positive_rejects_zero_and_garbage() {
        assert_eq!(parse_positive(TIMEOUT_VAR, "30").unwrap(), 30);
        assert!(matches!(
            parse_positive(TIMEOUT_VAR, "0"),
            Err(AmplifyError::Config(_))
        ));
        assert!(matches!(
            parse_positive(TIMEOUT_VAR, "soon"),
            Err(AmplifyError::Config(_))
        ));
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
    }
}
