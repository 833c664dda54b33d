//! Pricing page cards.

use affihub_core::{
    BillingPeriod, MembershipTier, PaidTier, Tier, can_upgrade_to, catalog, format_price,
    is_current_plan,
};
use serde::Serialize;

/// The button at the bottom of a pricing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "tier")]
pub enum PlanCta {
    /// The viewer is on this plan (disabled).
    CurrentPlan,
    /// Free plan offered to an anonymous visitor.
    GetStarted,
    /// Upgrade to this paid plan.
    Upgrade(PaidTier),
    /// A VIP viewer looking at Premium (disabled).
    Downgrade,
    /// Any other unavailable move (disabled).
    NotAvailable,
}

impl PlanCta {
    /// Button text.
    pub fn label(self) -> String {
        match self {
            Self::CurrentPlan => "Current Plan".to_string(),
            Self::GetStarted => "Get Started".to_string(),
            Self::Upgrade(tier) => format!("Upgrade to {}", tier.display_name()),
            Self::Downgrade => "Downgrade".to_string(),
            Self::NotAvailable => "Not Available".to_string(),
        }
    }

    /// Whether the button can be pressed.
    pub fn enabled(self) -> bool {
        matches!(self, Self::GetStarted | Self::Upgrade(_))
    }
}

/// One rendered pricing card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCard {
    /// Catalog row.
    pub tier: MembershipTier,
    /// Formatted price, e.g. `"$9.99"`.
    pub price: String,
    /// Viewer is on this plan.
    pub is_current: bool,
    /// `"Save $x/month"` on yearly paid plans.
    pub savings: Option<String>,
    /// Bottom button.
    pub cta: PlanCta,
}

/// Choose the button for `tier` as seen by `viewer`.
pub fn plan_cta(viewer: Option<Tier>, tier: Tier) -> PlanCta {
    if is_current_plan(viewer, tier) {
        return PlanCta::CurrentPlan;
    }
    if can_upgrade_to(viewer, tier) {
        return match tier.as_paid() {
            Some(paid) => PlanCta::Upgrade(paid),
            None => PlanCta::GetStarted,
        };
    }
    if viewer == Some(Tier::Vip) && tier == Tier::Premium {
        PlanCta::Downgrade
    } else {
        PlanCta::NotAvailable
    }
}

/// Build all pricing cards for `viewer`.
pub fn pricing_cards(viewer: Option<Tier>, billing: BillingPeriod) -> Vec<PricingCard> {
    catalog(billing)
        .into_iter()
        .map(|row| {
            let savings = match billing {
                BillingPeriod::Yearly => row
                    .yearly_savings_per_month_cents()
                    .map(|c| format!("Save {}/month", format_price(c))),
                BillingPeriod::Monthly => None,
            };
            PricingCard {
                price: format_price(row.price_cents),
                is_current: is_current_plan(viewer, row.id),
                savings,
                cta: plan_cta(viewer, row.id),
                tier: row,
            }
        })
        .collect()
}
