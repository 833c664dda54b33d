//! # affihub-auth
//!
//! Simulated authentication and membership upgrades.
//!
//! There is no credential check and no payment: any non-empty email and
//! password sign in, and upgrades succeed after a simulated delay. The
//! signed-in user is mirrored to a single local JSON record so a restart
//! restores the session.
//!
//! - [`SessionManager`]: owns the current user and serializes mutations
//! - [`IdentityStore`]: durable record ([`FileIdentityStore`]) or in-memory
//!   ([`MemoryIdentityStore`])
//! - [`Latency`] / [`Clock`]: injectable delay and time sources
//! - [`SessionEvent`]: broadcast to subscribers on every change

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod session;
pub mod storage;
pub mod timing;

pub use errors::AuthError;
pub use events::{SessionEmitter, SessionEvent};
pub use session::{SessionManager, SessionPhase};
pub use storage::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
pub use timing::{Clock, FixedClock, Latency, NoLatency, SessionOp, SystemClock, TokioLatency};
