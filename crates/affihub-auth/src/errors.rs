//! Auth error types.
//!
//! These never cross the boolean session API; they surface only through the
//! `try_*` variants and the identity store.

use affihub_core::Tier;

/// Errors that can occur during session and storage operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Email or password was empty.
    #[error("email and password are required")]
    MissingCredentials,

    /// An upgrade was requested with nobody signed in.
    #[error("no user is signed in")]
    NoActiveSession,

    /// The requested tier is below the user's current tier.
    #[error("cannot move from {current} to {requested}")]
    NotAnUpgrade {
        /// Tier the user holds.
        current: Tier,
        /// Tier that was requested.
        requested: Tier,
    },

    /// The user signed out (or was replaced) while the operation was pending.
    #[error("session changed before the operation completed")]
    SessionChanged,

    /// The session was used before its saved user was restored.
    #[error("session used before initialization")]
    NotInitialized,

    /// The runtime shut down or the operation panicked before it committed.
    #[error("operation interrupted before commit")]
    Interrupted,
}
