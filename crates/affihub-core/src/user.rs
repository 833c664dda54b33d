//! The authenticated principal.
//!
//! A [`User`] is created once (at login or registration) and afterwards only
//! its membership can change, and only upwards through [`User::upgraded`].
//! Fields are private so `id`, `email` and `member_since` cannot be edited in
//! place.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "id": "0192f0c1-...",
//!   "email": "a@b.com",
//!   "name": "a",
//!   "membership": "free",
//!   "memberSince": "2024-05-01T12:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::tier::{PaidTier, Tier};

/// A signed-in user as held by the session and mirrored to local storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: String,
    name: String,
    membership: Tier,
    member_since: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
}

impl User {
    /// Create a new `free` user with a fresh ID.
    ///
    /// An empty `name` falls back to the local part of `email`.
    #[must_use]
    pub fn new(email: &str, name: Option<&str>, member_since: DateTime<Utc>) -> Self {
        let name = match name {
            Some(n) if !n.is_empty() => n.to_owned(),
            _ => Self::local_part(email).to_owned(),
        };
        Self {
            id: UserId::new(),
            email: email.to_owned(),
            name,
            membership: Tier::Free,
            member_since,
            avatar: None,
        }
    }

    /// Everything before the first `@`, or the whole string if there is none.
    #[must_use]
    pub fn local_part(email: &str) -> &str {
        email.split('@').next().unwrap_or(email)
    }

    /// Copy of this user at `tier`.
    ///
    /// Returns `None` when `tier` is below the current membership, which keeps
    /// membership monotonic. Asking for the current tier yields an equal copy.
    #[must_use]
    pub fn upgraded(&self, tier: PaidTier) -> Option<Self> {
        let tier = Tier::from(tier);
        (tier >= self.membership).then(|| Self {
            membership: tier,
            ..self.clone()
        })
    }

    /// Attach a display avatar URL.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login/display email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current membership tier.
    pub fn membership(&self) -> Tier {
        self.membership
    }

    /// Creation timestamp.
    pub fn member_since(&self) -> DateTime<Utc> {
        self.member_since
    }

    /// Avatar URL, if any.
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }
}
