//! # affihub-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`AffihubSettings::default()`]
//! 2. **User file**: `~/.affihub/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `AFFIHUB_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{AffihubSettings, LatencySettings, LoggingSettings, StorageSettings};

use std::sync::OnceLock;

/// Global settings, loaded on first access.
static SETTINGS: OnceLock<AffihubSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads `~/.affihub/settings.json` with env var overrides.
/// If loading fails, logs the error and returns compiled defaults.
pub fn get_settings() -> &'static AffihubSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            AffihubSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns the settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: AffihubSettings) -> std::result::Result<(), AffihubSettings> {
    SETTINGS.set(settings)
}
