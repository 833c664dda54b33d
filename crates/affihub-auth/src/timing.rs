//! Injectable latency and clock.
//!
//! Session operations pause through a [`Latency`] before they commit. In
//! production the pause is a [`tokio::time::sleep`] standing in for a network
//! round trip; tests use [`NoLatency`] or a paused tokio clock.

use std::time::Duration;

use affihub_settings::LatencySettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The session operation that is about to wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOp {
    /// `login`
    Login,
    /// `register`
    Register,
    /// `upgrade_membership`
    Upgrade,
}

/// Delay applied before a session operation commits.
#[async_trait]
pub trait Latency: Send + Sync {
    /// Suspend for the time `op` is configured to take.
    async fn pause(&self, op: SessionOp);
}

/// Sleeps on the tokio timer for a per-operation duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokioLatency {
    login: Duration,
    register: Duration,
    upgrade: Duration,
}

impl TokioLatency {
    /// Per-operation durations.
    pub fn new(login: Duration, register: Duration, upgrade: Duration) -> Self {
        Self {
            login,
            register,
            upgrade,
        }
    }

    /// Duration configured for `op`.
    pub fn duration(&self, op: SessionOp) -> Duration {
        match op {
            SessionOp::Login => self.login,
            SessionOp::Register => self.register,
            SessionOp::Upgrade => self.upgrade,
        }
    }
}

impl Default for TokioLatency {
    fn default() -> Self {
        Self::from(&LatencySettings::default())
    }
}

impl From<&LatencySettings> for TokioLatency {
    fn from(settings: &LatencySettings) -> Self {
        Self::new(settings.login(), settings.register(), settings.upgrade())
    }
}

#[async_trait]
impl Latency for TokioLatency {
    async fn pause(&self, op: SessionOp) {
        let duration = self.duration(op);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Resolves immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn pause(&self, _op: SessionOp) {}
}

/// Source of `memberSince` timestamps.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
