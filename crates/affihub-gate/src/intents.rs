//! User intents and their translation into session calls.

use std::fmt;

use affihub_auth::{AuthError, SessionManager};
use affihub_core::{PaidTier, User};
use tracing::debug;

/// Something the visitor asked for, however the UI collected it.
#[derive(Clone, PartialEq, Eq)]
pub enum Intent {
    /// Sign in with existing credentials.
    Login {
        /// Email address.
        email: String,
        /// Password (not checked).
        password: String,
    },
    /// Create an account.
    Register {
        /// Email address.
        email: String,
        /// Password (not checked).
        password: String,
        /// Display name; defaults to the email's local part.
        name: Option<String>,
    },
    /// Sign out.
    Logout,
    /// Move up to a paid tier.
    Upgrade(PaidTier),
}

impl fmt::Debug for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::Register { email, name, .. } => f
                .debug_struct("Register")
                .field("email", email)
                .field("name", name)
                .finish_non_exhaustive(),
            Self::Logout => f.write_str("Logout"),
            Self::Upgrade(tier) => f.debug_tuple("Upgrade").field(tier).finish(),
        }
    }
}

/// Result of dispatching an [`Intent`], for the UI to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Login or registration succeeded.
    SignedIn(User),
    /// The visitor is now anonymous.
    SignedOut,
    /// The membership moved up.
    Upgraded(User),
    /// An anonymous visitor asked to upgrade; show the sign-up flow.
    SignUpRequired,
    /// Nothing changed.
    Rejected(String),
}

impl Outcome {
    /// Whether the intent changed the session.
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            Self::SignedIn(_) | Self::SignedOut | Self::Upgraded(_)
        )
    }
}

/// Run `intent` against `session`.
pub async fn dispatch(session: &SessionManager, intent: Intent) -> Outcome {
    debug!(?intent, "dispatching intent");
    match intent {
        Intent::Login { email, password } => {
            signed_in(session.try_login(&email, &password).await)
        }
        Intent::Register {
            email,
            password,
            name,
        } => signed_in(
            session
                .try_register(&email, &password, name.as_deref())
                .await,
        ),
        Intent::Logout => {
            session.logout();
            Outcome::SignedOut
        }
        Intent::Upgrade(tier) => match session.try_upgrade_membership(tier).await {
            Ok(user) => Outcome::Upgraded(user),
            Err(AuthError::NoActiveSession) => Outcome::SignUpRequired,
            Err(e) => Outcome::Rejected(e.to_string()),
        },
    }
}

fn signed_in(result: Result<User, AuthError>) -> Outcome {
    match result {
        Ok(user) => Outcome::SignedIn(user),
        Err(e) => Outcome::Rejected(e.to_string()),
    }
}
