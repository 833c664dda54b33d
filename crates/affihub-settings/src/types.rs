//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so partial
//! JSON is accepted and missing fields take their [`Default`] value.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root settings for AffiHub.
///
/// ```json
/// {
///   "storage": { "dataDir": "/home/me/.affihub", "persist": true },
///   "latency": { "upgradeMs": 0 },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffihubSettings {
    /// Where the current user record lives.
    pub storage: StorageSettings,
    /// Simulated latency for session operations.
    pub latency: LatencySettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Identity store location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Directory holding the user record.
    pub data_dir: String,
    /// Record key; the file is `<dataDir>/<recordName>.json`.
    pub record_name: String,
    /// When `false`, the session keeps the user in memory only.
    pub persist: bool,
}

impl StorageSettings {
    /// Full path of the persisted user record.
    pub fn record_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(format!("{}.json", self.record_name))
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        Self {
            data_dir: PathBuf::from(home)
                .join(".affihub")
                .to_string_lossy()
                .into_owned(),
            record_name: "affihub_user".to_string(),
            persist: true,
        }
    }
}

/// Simulated round-trip latency, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatencySettings {
    /// Delay before a login resolves.
    pub login_ms: u64,
    /// Delay before a registration resolves.
    pub register_ms: u64,
    /// Delay before a membership upgrade resolves.
    pub upgrade_ms: u64,
}

impl LatencySettings {
    /// Login delay as a [`Duration`].
    pub fn login(&self) -> Duration {
        Duration::from_millis(self.login_ms)
    }

    /// Registration delay as a [`Duration`].
    pub fn register(&self) -> Duration {
        Duration::from_millis(self.register_ms)
    }

    /// Upgrade delay as a [`Duration`].
    pub fn upgrade(&self) -> Duration {
        Duration::from_millis(self.upgrade_ms)
    }
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            login_ms: 1000,
            register_ms: 1000,
            upgrade_ms: 2000,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
