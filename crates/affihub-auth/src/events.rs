//! Session change notifications.

use affihub_core::{Tier, User};
use tokio::sync::broadcast;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 64;

/// Something observable changed on the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Start-up restore finished.
    Restored {
        /// The recovered user, if any.
        user: Option<User>,
    },
    /// An operation began or finished its pending phase.
    LoadingChanged {
        /// New value of the `loading` flag.
        loading: bool,
    },
    /// A user signed in through login or registration.
    SignedIn {
        /// The newly created user.
        user: User,
    },
    /// The current user signed out.
    SignedOut,
    /// The current user's membership moved up.
    MembershipChanged {
        /// Updated user.
        user: User,
        /// Tier held before the upgrade.
        previous: Tier,
    },
    /// Saving failed; the session keeps state in memory only from now on.
    PersistenceLost,
}

/// Broadcast channel for [`SessionEvent`]s.
#[derive(Debug)]
pub struct SessionEmitter {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEmitter {
    /// Create a new emitter with the default channel capacity.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { tx }
    }

    /// Send to every subscriber. Returns how many received it.
    pub fn emit(&self, event: SessionEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Receive every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SessionEmitter {
    fn default() -> Self {
        Self::new()
    }
}
