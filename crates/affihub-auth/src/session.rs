//! Session manager: the single owner of "who is signed in".
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──restore()──▶ Restoring ──▶ Authenticated | Anonymous
//!                                               │      ▲
//!                          login/register/upgrade ▼      │ commit
//!                                              Mutating
//! ```
//!
//! Mutations (`login`, `register`, `upgrade_membership`) are serialized: each
//! one takes the mutation lock, pauses through the injected [`Latency`], then
//! commits in-memory state and the identity store together under the state
//! lock. A second call queues until the first has committed. The pending part
//! runs on a spawned task, so once an operation has started it always
//! completes and commits even if the caller stops waiting.
//!
//! Reads never wait on a pending mutation. They observe the pre-mutation
//! state until the commit.
//!
//! Every mutation has a boolean form that never fails loudly, and a `try_*`
//! form that reports why it returned `false`.
//!
//! Storage failures do not fail operations. The first failed write switches
//! the session to memory-only for the rest of the process and emits
//! [`SessionEvent::PersistenceLost`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use affihub_core::{PaidTier, Tier, User, UserId};
use affihub_settings::AffihubSettings;
use parking_lot::RwLock;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, instrument, warn};

use crate::errors::AuthError;
use crate::events::{SessionEmitter, SessionEvent};
use crate::storage::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
use crate::timing::{Clock, Latency, SessionOp, SystemClock, TokioLatency};

/// Externally visible session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// [`SessionManager::restore`] has not run yet.
    Uninitialized,
    /// Loading the saved user.
    Restoring,
    /// A user is signed in and nothing is pending.
    Authenticated,
    /// Nobody is signed in and nothing is pending.
    Anonymous,
    /// A login, registration or upgrade is pending.
    Mutating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Restoring,
    Ready,
}

#[derive(Debug)]
struct SessionState {
    lifecycle: Lifecycle,
    user: Option<User>,
    pending: Option<SessionOp>,
}

struct SessionInner {
    state: RwLock<SessionState>,
    mutation: Mutex<()>,
    store: Arc<dyn IdentityStore>,
    persistent: AtomicBool,
    latency: Arc<dyn Latency>,
    clock: Arc<dyn Clock>,
    emitter: SessionEmitter,
}

/// Cheaply cloneable handle to one session.
///
/// Clones share state; pass a clone to every component that needs to read
/// or act on the current user.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("phase", &self.phase())
            .field("persistent", &self.is_persistent())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Uninitialized session over `store` with default latency and the
    /// system clock. Call [`restore`](Self::restore) before use.
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState {
                    lifecycle: Lifecycle::Uninitialized,
                    user: None,
                    pending: None,
                }),
                mutation: Mutex::new(()),
                store,
                persistent: AtomicBool::new(true),
                latency: Arc::new(TokioLatency::default()),
                clock: Arc::new(SystemClock),
                emitter: SessionEmitter::new(),
            }),
        }
    }

    /// Uninitialized session configured from settings: file store (or memory
    /// store when `storage.persist` is off) and configured latency.
    pub fn from_settings(settings: &AffihubSettings) -> Self {
        let store: Arc<dyn IdentityStore> = if settings.storage.persist {
            Arc::new(FileIdentityStore::from_settings(&settings.storage))
        } else {
            Arc::new(MemoryIdentityStore::new())
        };
        Self::new(store).with_latency(Arc::new(TokioLatency::from(&settings.latency)))
    }

    /// Replace the latency source. Only valid before the handle is cloned.
    #[must_use]
    pub fn with_latency(self, latency: Arc<dyn Latency>) -> Self {
        self.rebuild(|inner| inner.latency = latency)
    }

    /// Replace the clock. Only valid before the handle is cloned.
    #[must_use]
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        self.rebuild(|inner| inner.clock = clock)
    }

    fn rebuild(self, f: impl FnOnce(&mut SessionInner)) -> Self {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => {
                f(&mut inner);
                Self {
                    inner: Arc::new(inner),
                }
            }
            Err(shared) => {
                warn!("session already shared, ignoring reconfiguration");
                Self { inner: shared }
            }
        }
    }

    // ── Initialization ──────────────────────────────────────────────

    /// Restore the previously saved user, if any. One-shot: later calls
    /// return the current user without touching storage.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Option<User> {
        let inner = &self.inner;
        {
            let mut state = inner.state.write();
            if state.lifecycle != Lifecycle::Uninitialized {
                debug!("session already restored");
                return state.user.clone();
            }
            state.lifecycle = Lifecycle::Restoring;
        }
        let _ = inner.emitter.emit(SessionEvent::LoadingChanged { loading: true });

        let user = inner.store.load();
        {
            let mut state = inner.state.write();
            state.user.clone_from(&user);
            state.lifecycle = Lifecycle::Ready;
        }
        debug!(restored = user.is_some(), "session restored");

        let _ = inner.emitter.emit(SessionEvent::Restored { user: user.clone() });
        let _ = inner.emitter.emit(SessionEvent::LoadingChanged { loading: false });
        user
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Current state machine phase.
    pub fn phase(&self) -> SessionPhase {
        let state = self.inner.state.read();
        match (state.lifecycle, state.pending, state.user.is_some()) {
            (Lifecycle::Uninitialized, _, _) => SessionPhase::Uninitialized,
            (Lifecycle::Restoring, _, _) => SessionPhase::Restoring,
            (Lifecycle::Ready, Some(_), _) => SessionPhase::Mutating,
            (Lifecycle::Ready, None, true) => SessionPhase::Authenticated,
            (Lifecycle::Ready, None, false) => SessionPhase::Anonymous,
        }
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.inner.state.read().user.clone()
    }

    /// The signed-in user's tier, or `None` for an anonymous visitor.
    pub fn membership(&self) -> Option<Tier> {
        self.inner.state.read().user.as_ref().map(User::membership)
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().user.is_some()
    }

    /// Whether a restore or mutation is pending.
    pub fn loading(&self) -> bool {
        let state = self.inner.state.read();
        state.lifecycle == Lifecycle::Restoring || state.pending.is_some()
    }

    /// Which mutation is pending, if any.
    pub fn pending(&self) -> Option<SessionOp> {
        self.inner.state.read().pending
    }

    /// Whether changes are still written to the identity store.
    pub fn is_persistent(&self) -> bool {
        self.inner.persistent.load(Ordering::Acquire)
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.emitter.subscribe()
    }

    // ── Mutations (boolean API) ─────────────────────────────────────

    /// Sign in. Any non-empty email and password are accepted and produce a
    /// new `free` user. Returns `false` on empty input.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        report("login", self.try_login(email, password).await)
    }

    /// Create an account and sign in as a new `free` user. `name` defaults
    /// to the local part of `email`.
    pub async fn register(&self, email: &str, password: &str, name: Option<&str>) -> bool {
        report("register", self.try_register(email, password, name).await)
    }

    /// Set the signed-in user's membership to `tier` and persist it. Returns
    /// `false` when nobody is signed in or `tier` is below the current tier.
    /// Asking for the current tier re-saves the record and returns `true`.
    pub async fn upgrade_membership(&self, tier: PaidTier) -> bool {
        report("upgrade", self.try_upgrade_membership(tier).await)
    }

    /// Sign out and remove the saved user. Idempotent.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        let inner = &self.inner;
        let had_user = {
            let mut state = inner.state.write();
            if state.lifecycle != Lifecycle::Ready {
                warn!("logout before session restore, ignoring");
                return;
            }
            let had_user = state.user.take().is_some();
            if inner.persistent.load(Ordering::Acquire) {
                if let Err(e) = inner.store.clear() {
                    inner.degrade(&e);
                }
            }
            had_user
        };
        if had_user {
            debug!("signed out");
            let _ = inner.emitter.emit(SessionEvent::SignedOut);
        }
    }

    // ── Mutations (detailed API) ────────────────────────────────────

    /// [`login`](Self::login), reporting why it failed.
    #[instrument(skip(self, password))]
    pub async fn try_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.inner.ensure_ready()?;
        let valid = !email.is_empty() && !password.is_empty();
        let email = email.to_owned();
        self.run(SessionOp::Login, move |inner| {
            if !valid {
                return Err(AuthError::MissingCredentials);
            }
            Ok(inner.commit_sign_in(User::new(&email, None, inner.clock.now())))
        })
        .await
    }

    /// [`register`](Self::register), reporting why it failed.
    #[instrument(skip(self, _password))]
    pub async fn try_register(
        &self,
        email: &str,
        _password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        self.inner.ensure_ready()?;
        let email = email.to_owned();
        let name = name.map(str::to_owned);
        self.run(SessionOp::Register, move |inner| {
            let user = User::new(&email, name.as_deref(), inner.clock.now());
            Ok(inner.commit_sign_in(user))
        })
        .await
    }

    /// [`upgrade_membership`](Self::upgrade_membership), reporting why it
    /// failed.
    #[instrument(skip(self))]
    pub async fn try_upgrade_membership(&self, tier: PaidTier) -> Result<User, AuthError> {
        self.inner.ensure_ready()?;
        let user = self.current_user().ok_or(AuthError::NoActiveSession)?;
        if Tier::from(tier) < user.membership() {
            return Err(AuthError::NotAnUpgrade {
                current: user.membership(),
                requested: tier.into(),
            });
        }
        let expected = user.id().clone();
        self.run(SessionOp::Upgrade, move |inner| {
            inner.commit_upgrade(&expected, tier)
        })
        .await
    }

    /// Serialize, mark pending, pause, commit, clear pending.
    async fn run<F>(&self, op: SessionOp, commit: F) -> Result<User, AuthError>
    where
        F: FnOnce(&SessionInner) -> Result<User, AuthError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let _serial = inner.mutation.lock().await;
            inner.set_pending(Some(op));
            inner.latency.pause(op).await;
            let result = commit(&inner);
            inner.set_pending(None);
            result
        });
        task.await.unwrap_or_else(|e| {
            warn!(?op, "session operation did not complete: {e}");
            Err(AuthError::Interrupted)
        })
    }
}

impl SessionInner {
    fn ensure_ready(&self) -> Result<(), AuthError> {
        if self.state.read().lifecycle == Lifecycle::Ready {
            Ok(())
        } else {
            Err(AuthError::NotInitialized)
        }
    }

    fn set_pending(&self, op: Option<SessionOp>) {
        self.state.write().pending = op;
        let _ = self.emitter.emit(SessionEvent::LoadingChanged {
            loading: op.is_some(),
        });
    }

    fn commit_sign_in(&self, user: User) -> User {
        {
            let mut state = self.state.write();
            self.persist(&user);
            state.user = Some(user.clone());
        }
        debug!(user_id = %user.id(), "signed in");
        let _ = self.emitter.emit(SessionEvent::SignedIn { user: user.clone() });
        user
    }

    fn commit_upgrade(&self, expected: &UserId, tier: PaidTier) -> Result<User, AuthError> {
        let (updated, previous) = {
            let mut state = self.state.write();
            let current = state
                .user
                .as_ref()
                .filter(|u| u.id() == expected)
                .ok_or(AuthError::SessionChanged)?;
            let previous = current.membership();
            let updated = current.upgraded(tier).ok_or(AuthError::NotAnUpgrade {
                current: previous,
                requested: tier.into(),
            })?;
            self.persist(&updated);
            state.user = Some(updated.clone());
            (updated, previous)
        };
        if previous == updated.membership() {
            debug!(tier = %previous, "membership unchanged");
        } else {
            debug!(from = %previous, to = %tier, "membership upgraded");
            let _ = self.emitter.emit(SessionEvent::MembershipChanged {
                user: updated.clone(),
                previous,
            });
        }
        Ok(updated)
    }

    /// Write-through to the store. Call with the state lock held so store
    /// writes are ordered with in-memory changes.
    fn persist(&self, user: &User) {
        if !self.persistent.load(Ordering::Acquire) {
            return;
        }
        if let Err(e) = self.store.save(user) {
            self.degrade(&e);
        }
    }

    fn degrade(&self, error: &AuthError) {
        if self.persistent.swap(false, Ordering::AcqRel) {
            warn!("identity store unavailable, continuing in memory only: {error}");
            let _ = self.emitter.emit(SessionEvent::PersistenceLost);
        }
    }
}

/// Collapse a detailed result to the boolean contract, logging the reason.
fn report(op: &str, result: Result<User, AuthError>) -> bool {
    match result {
        Ok(_) => true,
        Err(
            e @ (AuthError::MissingCredentials
            | AuthError::NoActiveSession
            | AuthError::NotAnUpgrade { .. }),
        ) => {
            debug!(op, "rejected: {e}");
            false
        }
        Err(e) => {
            warn!(op, "failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{FixedClock, NoLatency};
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    struct BrokenStore;

    impl IdentityStore for BrokenStore {
        fn load(&self) -> Option<User> {
            None
        }

        fn save(&self, _user: &User) -> Result<(), AuthError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn clear(&self) -> Result<(), AuthError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn ready(store: Arc<dyn IdentityStore>) -> SessionManager {
        let session = SessionManager::new(store).with_latency(Arc::new(NoLatency));
        let _ = session.restore();
        session
    }

    fn memory_session() -> (SessionManager, Arc<MemoryIdentityStore>) {
        let store = Arc::new(MemoryIdentityStore::new());
        (ready(store.clone()), store)
    }

    #[test]
    fn starts_uninitialized() {
        let session = SessionManager::new(Arc::new(MemoryIdentityStore::new()));
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert!(!session.loading());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn restore_without_record_is_anonymous() {
        let (session, _) = memory_session();
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert!(!session.is_authenticated());
        assert!(!session.loading());
    }

    #[test]
    fn restore_recovers_saved_user() {
        let saved = User::new("a@b.com", None, Utc::now());
        let session = ready(Arc::new(MemoryIdentityStore::with_user(saved.clone())));
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert_eq!(session.current_user(), Some(saved));
    }

    #[test]
    fn restore_is_one_shot() {
        let store = Arc::new(MemoryIdentityStore::new());
        let session = ready(store.clone());
        store.save(&User::new("late@b.com", None, Utc::now())).unwrap();
        assert!(session.restore().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn mutations_before_restore_fail_soft() {
        let session = SessionManager::new(Arc::new(MemoryIdentityStore::new()))
            .with_latency(Arc::new(NoLatency));
        assert_matches!(
            session.try_login("a@b.com", "x").await,
            Err(AuthError::NotInitialized)
        );
        assert!(!session.register("a@b.com", "x", None).await);
        session.logout();
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
    }

    #[tokio::test]
    async fn login_creates_free_user() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let store = Arc::new(MemoryIdentityStore::new());
        let session = SessionManager::new(store.clone())
            .with_latency(Arc::new(NoLatency))
            .with_clock(Arc::new(FixedClock(at)));
        let _ = session.restore();

        assert!(session.login("a@b.com", "x").await);
        let user = session.current_user().unwrap();
        assert_eq!(user.membership(), Tier::Free);
        assert_eq!(user.name(), "a");
        assert_eq!(user.member_since(), at);
        assert_eq!(store.load(), Some(user));
        assert_eq!(session.phase(), SessionPhase::Authenticated);
    }

    #[tokio::test]
    async fn login_with_empty_fields_changes_nothing() {
        let (session, store) = memory_session();
        assert_matches!(
            session.try_login("", "x").await,
            Err(AuthError::MissingCredentials)
        );
        assert!(!session.login("a@b.com", "").await);
        assert!(session.current_user().is_none());
        assert!(store.load().is_none());
        assert!(!session.loading());
    }

    #[tokio::test]
    async fn login_replaces_previous_user() {
        let (session, _) = memory_session();
        assert!(session.login("a@b.com", "x").await);
        let first = session.current_user().unwrap();
        assert!(session.login("c@d.com", "y").await);
        let second = session.current_user().unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(second.email(), "c@d.com");
    }

    #[tokio::test]
    async fn register_uses_given_name() {
        let (session, _) = memory_session();
        assert!(session.register("a@b.com", "x", Some("Alice")).await);
        assert_eq!(session.current_user().unwrap().name(), "Alice");
    }

    #[tokio::test]
    async fn register_defaults_name_and_skips_validation() {
        let (session, _) = memory_session();
        assert!(session.register("bob@b.com", "", None).await);
        let user = session.current_user().unwrap();
        assert_eq!(user.name(), "bob");
        assert_eq!(user.membership(), Tier::Free);
    }

    #[tokio::test]
    async fn upgrade_while_anonymous_is_rejected() {
        let (session, store) = memory_session();
        assert_matches!(
            session.try_upgrade_membership(PaidTier::Premium).await,
            Err(AuthError::NoActiveSession)
        );
        assert!(!session.upgrade_membership(PaidTier::Vip).await);
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn upgrade_persists_new_tier() {
        let (session, store) = memory_session();
        assert!(session.login("a@b.com", "x").await);
        let id = session.current_user().unwrap().id().clone();

        assert!(session.upgrade_membership(PaidTier::Premium).await);
        assert_eq!(session.membership(), Some(Tier::Premium));
        assert!(session.upgrade_membership(PaidTier::Vip).await);

        let saved = store.load().unwrap();
        assert_eq!(saved.membership(), Tier::Vip);
        assert_eq!(saved.id(), &id);
    }

    #[tokio::test]
    async fn downgrade_is_rejected() {
        let (session, _) = memory_session();
        assert!(session.login("a@b.com", "x").await);
        assert!(session.upgrade_membership(PaidTier::Vip).await);

        assert_matches!(
            session.try_upgrade_membership(PaidTier::Premium).await,
            Err(AuthError::NotAnUpgrade { current: Tier::Vip, requested: Tier::Premium })
        );
        assert!(!session.upgrade_membership(PaidTier::Premium).await);
        assert_eq!(session.membership(), Some(Tier::Vip));
    }

    #[tokio::test]
    async fn downgrade_rejection_logs_at_debug() {
        let (session, _) = memory_session();
        assert!(session.login("a@b.com", "x").await);
        assert!(session.upgrade_membership(PaidTier::Vip).await);

        let (logs, _guard) = affihub_core::logging::capture_logs();
        assert!(!session.upgrade_membership(PaidTier::Premium).await);

        assert!(logs.has_event(tracing::Level::DEBUG, "cannot move from vip to premium"));
        assert_eq!(logs.count_at_level(tracing::Level::WARN), 0);
    }

    #[tokio::test]
    async fn same_tier_upgrade_succeeds_and_persists() {
        let (session, store) = memory_session();
        assert!(session.login("a@b.com", "x").await);
        assert!(session.upgrade_membership(PaidTier::Premium).await);
        store.clear().unwrap();
        let mut rx = session.subscribe();

        assert!(session.upgrade_membership(PaidTier::Premium).await);
        assert_eq!(session.membership(), Some(Tier::Premium));
        assert_eq!(store.load(), session.current_user());

        while let Ok(event) = rx.try_recv() {
            assert!(!matches!(event, SessionEvent::MembershipChanged { .. }));
        }
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let (session, store) = memory_session();
        assert!(session.login("a@b.com", "x").await);

        session.logout();
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert!(store.load().is_none());

        session.logout();
        assert_eq!(session.phase(), SessionPhase::Anonymous);
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn broken_store_degrades_to_memory() {
        let session = ready(Arc::new(BrokenStore));
        let mut rx = session.subscribe();

        assert!(session.login("a@b.com", "x").await);
        assert!(session.is_authenticated());
        assert!(!session.is_persistent());
        assert!(session.upgrade_membership(PaidTier::Premium).await);
        assert_eq!(session.membership(), Some(Tier::Premium));

        session.logout();
        assert!(!session.is_authenticated());

        let mut lost = 0;
        while let Ok(event) = rx.try_recv() {
            if event == SessionEvent::PersistenceLost {
                lost += 1;
            }
        }
        assert_eq!(lost, 1);
    }

    #[tokio::test]
    async fn storage_failure_is_logged_once() {
        let (logs, _guard) = affihub_core::logging::capture_logs();
        let session = ready(Arc::new(BrokenStore));

        assert!(session.login("a@b.com", "x").await);
        assert!(session.login("c@d.com", "y").await);

        assert!(logs.has_event(tracing::Level::WARN, "continuing in memory only"));
        assert_eq!(logs.count_at_level(tracing::Level::WARN), 1);
    }

    #[tokio::test]
    async fn events_follow_operation() {
        let (session, _) = memory_session();
        let mut rx = session.subscribe();

        assert!(session.login("a@b.com", "x").await);

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoadingChanged { loading: true });
        assert_matches!(rx.recv().await.unwrap(), SessionEvent::SignedIn { user } if user.email() == "a@b.com");
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoadingChanged { loading: false });
    }

    #[tokio::test]
    async fn signed_out_emitted_once() {
        let (session, _) = memory_session();
        assert!(session.login("a@b.com", "x").await);
        let mut rx = session.subscribe();

        session.logout();
        session.logout();

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::SignedOut);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn report_maps_results() {
        let user = User::new("a@b.com", None, Utc::now());
        assert!(report("login", Ok(user)));
        assert!(!report("login", Err(AuthError::MissingCredentials)));
        assert!(!report("upgrade", Err(AuthError::SessionChanged)));
    }
}
