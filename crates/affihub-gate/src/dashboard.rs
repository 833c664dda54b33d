//! Dashboard greeting and membership status card.

use affihub_core::{Tier, User, next_tier};
use serde::Serialize;

use crate::intents::Intent;
use crate::lock::UpgradeButton;

/// Membership status card for a signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Badge tier.
    pub tier: Tier,
    /// Badge text.
    pub badge: &'static str,
    /// Status line under the badge.
    pub message: &'static str,
    /// Next step up, absent for VIP.
    pub next: Option<UpgradeButton>,
}

/// Build the status card for `tier`.
#[must_use]
pub fn plan_summary(tier: Tier) -> PlanSummary {
    let (message, label) = match tier {
        Tier::Free => (
            "Upgrade to unlock premium features and exclusive content.",
            "Upgrade Now",
        ),
        Tier::Premium => (
            "You're enjoying Premium benefits! Consider VIP for even more features.",
            "Upgrade to VIP",
        ),
        Tier::Vip => (
            "You're a VIP member with access to all premium features!",
            "",
        ),
    };
    PlanSummary {
        tier,
        badge: tier.display_name(),
        message,
        next: next_tier(tier).map(|paid| UpgradeButton {
            label: label.to_string(),
            intent: Intent::Upgrade(paid),
        }),
    }
}

/// `"Welcome back, {name}!"`.
#[must_use]
pub fn greeting(user: &User) -> String {
    format!("Welcome back, {}!", user.name())
}

/// `"Member since YYYY-MM-DD"`.
#[must_use]
pub fn member_since_line(user: &User) -> String {
    format!("Member since {}", user.member_since().format("%Y-%m-%d"))
}
