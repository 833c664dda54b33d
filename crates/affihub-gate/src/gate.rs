//! The gate a presentation layer holds: one session handle plus render helpers.

use affihub_auth::SessionManager;
use affihub_core::{BillingPeriod, GatedItem, PaidTier, Tier, User};
use serde::Serialize;

use crate::dashboard::{PlanSummary, plan_summary};
use crate::intents::{Intent, Outcome, dispatch};
use crate::lock::{ContentView, LockOptions, item_view, lock_view};
use crate::pricing::{PricingCard, pricing_cards};

/// What the presentation layer reads on each render.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    /// Signed-in user, if any.
    pub user: Option<User>,
    /// A mutation is in flight; show a busy indicator.
    pub loading: bool,
}

impl Viewer {
    /// Tier used by the policy functions.
    pub fn tier(&self) -> Option<Tier> {
        self.user.as_ref().map(User::membership)
    }

    /// Whether anyone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Read side and intent side of one session.
#[derive(Clone, Debug)]
pub struct Gate {
    session: SessionManager,
}

impl Gate {
    /// Wrap a session. The session should already be restored.
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    /// The wrapped session.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Snapshot of the current user and busy flag.
    pub fn viewer(&self) -> Viewer {
        Viewer {
            user: self.session.current_user(),
            loading: self.session.loading(),
        }
    }

    /// Render decision for content that requires `required`.
    pub fn lock(&self, required: PaidTier, options: &LockOptions) -> ContentView {
        lock_view(self.session.membership(), required, options)
    }

    /// Render decisions for a list of items, in order.
    pub fn content<'a>(&self, items: &'a [GatedItem]) -> Vec<(&'a GatedItem, ContentView)> {
        let viewer = self.session.membership();
        let options = LockOptions::default();
        items
            .iter()
            .map(|item| (item, item_view(viewer, item, &options)))
            .collect()
    }

    /// Pricing page cards.
    pub fn pricing(&self, billing: BillingPeriod) -> Vec<PricingCard> {
        pricing_cards(self.session.membership(), billing)
    }

    /// Dashboard status card, absent when nobody is signed in.
    pub fn plan(&self) -> Option<PlanSummary> {
        self.session.membership().map(plan_summary)
    }

    /// Forward a user intent to the session.
    pub async fn submit(&self, intent: Intent) -> Outcome {
        dispatch(&self.session, intent).await
    }
}
