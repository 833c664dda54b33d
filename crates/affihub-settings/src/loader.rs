//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`AffihubSettings::default()`]
//! 2. If `~/.affihub/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `AFFIHUB_*` environment overrides (highest priority)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::AffihubSettings;

/// Resolve the path to the settings file (`~/.affihub/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".affihub").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<AffihubSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. A file with invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<AffihubSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults merged with the file at `path`, without env overrides.
pub fn load_file_layer(path: &Path) -> Result<AffihubSettings> {
    let defaults = serde_json::to_value(AffihubSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut AffihubSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Recognised keys:
/// - `AFFIHUB_DATA_DIR`, `AFFIHUB_LOG_LEVEL`: non-empty strings
/// - `AFFIHUB_PERSIST`: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`
/// - `AFFIHUB_{LOGIN,REGISTER,UPGRADE}_LATENCY_MS`: `0..=60000`
///
/// Invalid values are logged and ignored.
pub fn apply_overrides<F>(settings: &mut AffihubSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    if let Some(v) = env.string("AFFIHUB_DATA_DIR") {
        settings.storage.data_dir = v;
    }
    if let Some(v) = env.bool("AFFIHUB_PERSIST") {
        settings.storage.persist = v;
    }
    if let Some(v) = env.u64("AFFIHUB_LOGIN_LATENCY_MS", 0, MAX_LATENCY_MS) {
        settings.latency.login_ms = v;
    }
    if let Some(v) = env.u64("AFFIHUB_REGISTER_LATENCY_MS", 0, MAX_LATENCY_MS) {
        settings.latency.register_ms = v;
    }
    if let Some(v) = env.u64("AFFIHUB_UPGRADE_LATENCY_MS", 0, MAX_LATENCY_MS) {
        settings.latency.upgrade_ms = v;
    }
    if let Some(v) = env.string("AFFIHUB_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

const MAX_LATENCY_MS: u64 = 60_000;

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn bool(&self, name: &str) -> Option<bool> {
        let val = (self.lookup)(name)?;
        let result = parse_bool(&val);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
        }
        result
    }

    fn u64(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        let val = (self.lookup)(name)?;
        let result = parse_u64_range(&val, min, max);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
        }
        result
    }
}
