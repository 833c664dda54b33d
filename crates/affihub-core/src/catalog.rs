//! Static membership catalog.
//!
//! Read-only configuration: one record per [`Tier`], priced in integer cents
//! for the selected [`BillingPeriod`].

use serde::Serialize;

use crate::tier::{BillingPeriod, Tier};

/// One row of the pricing table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipTier {
    /// Which tier this row describes.
    pub id: Tier,
    /// Display name.
    pub name: &'static str,
    /// Price in cents for the selected period.
    pub price_cents: u32,
    /// Human-readable billing period (`"forever"`, `"per month"`, `"per year"`).
    pub period: &'static str,
    /// Ordered feature list.
    pub features: &'static [&'static str],
    /// Highlighted as the most popular plan.
    pub popular: bool,
}

const FREE_FEATURES: &[&str] = &[
    "Access to basic product reviews",
    "Limited daily searches (10 per day)",
    "Standard newsletter",
    "Community access (read-only)",
    "Basic product comparisons",
];

const PREMIUM_FEATURES: &[&str] = &[
    "Unlimited access to all reviews",
    "Exclusive premium reviews with detailed analysis",
    "Early access to new product reviews",
    "Ad-free browsing experience",
    "Priority email support",
    "Advanced product comparison tools",
    "Detailed buying guides and tutorials",
    "Comment and interact in community",
];

const VIP_FEATURES: &[&str] = &[
    "All Premium features included",
    "Personal product recommendations",
    "Direct 1-on-1 expert consultations",
    "Exclusive VIP deals and discount codes",
    "VIP-only community access",
    "Custom product review requests",
    "Monthly video calls with experts",
    "Beta access to new features",
    "Dedicated account manager",
];

/// Catalog row for a single tier.
#[must_use]
pub fn tier_info(tier: Tier, billing: BillingPeriod) -> MembershipTier {
    let paid_period = match billing {
        BillingPeriod::Monthly => "per month",
        BillingPeriod::Yearly => "per year",
    };
    match tier {
        Tier::Free => MembershipTier {
            id: Tier::Free,
            name: Tier::Free.display_name(),
            price_cents: 0,
            period: "forever",
            features: FREE_FEATURES,
            popular: false,
        },
        Tier::Premium => MembershipTier {
            id: Tier::Premium,
            name: Tier::Premium.display_name(),
            price_cents: match billing {
                BillingPeriod::Monthly => 999,
                BillingPeriod::Yearly => 9999,
            },
            period: paid_period,
            features: PREMIUM_FEATURES,
            popular: true,
        },
        Tier::Vip => MembershipTier {
            id: Tier::Vip,
            name: Tier::Vip.display_name(),
            price_cents: match billing {
                BillingPeriod::Monthly => 1999,
                BillingPeriod::Yearly => 19999,
            },
            period: paid_period,
            features: VIP_FEATURES,
            popular: false,
        },
    }
}

/// The full catalog in ascending tier order.
#[must_use]
pub fn catalog(billing: BillingPeriod) -> [MembershipTier; 3] {
    Tier::ALL.map(|t| tier_info(t, billing))
}

/// Format cents as dollars, e.g. `999` → `"$9.99"`.
#[must_use]
pub fn format_price(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

impl MembershipTier {
    /// Monthly saving advertised for yearly plans (two months free), rounded
    /// to the nearest cent. `None` for free rows.
    #[must_use]
    pub fn yearly_savings_per_month_cents(&self) -> Option<u32> {
        (self.price_cents > 0).then(|| (self.price_cents * 2 + 6) / 12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_and_complete() {
        let rows = catalog(BillingPeriod::Monthly);
        let ids: Vec<Tier> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, Tier::ALL);
    }

    #[test]
    fn monthly_prices() {
        let rows = catalog(BillingPeriod::Monthly);
        assert_eq!(rows[0].price_cents, 0);
        assert_eq!(rows[0].period, "forever");
        assert_eq!(rows[1].price_cents, 999);
        assert_eq!(rows[1].period, "per month");
        assert_eq!(rows[2].price_cents, 1999);
    }

    #[test]
    fn yearly_prices() {
        let rows = catalog(BillingPeriod::Yearly);
        assert_eq!(rows[0].price_cents, 0);
        assert_eq!(rows[1].price_cents, 9999);
        assert_eq!(rows[2].price_cents, 19999);
        assert_eq!(rows[2].period, "per year");
    }

    #[test]
    fn only_premium_is_popular() {
        let popular: Vec<Tier> = catalog(BillingPeriod::Monthly)
            .iter()
            .filter(|r| r.popular)
            .map(|r| r.id)
            .collect();
        assert_eq!(popular, vec![Tier::Premium]);
    }

    #[test]
    fn feature_lists_are_non_empty() {
        for row in catalog(BillingPeriod::Monthly) {
            assert!(!row.features.is_empty(), "{} has no features", row.name);
        }
        assert_eq!(tier_info(Tier::Vip, BillingPeriod::Monthly).features.len(), 9);
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(0), "$0.00");
        assert_eq!(format_price(999), "$9.99");
        assert_eq!(format_price(19999), "$199.99");
    }

    #[test]
    fn yearly_savings() {
        let premium = tier_info(Tier::Premium, BillingPeriod::Yearly);
        assert_eq!(premium.yearly_savings_per_month_cents(), Some(1667));
        let free = tier_info(Tier::Free, BillingPeriod::Yearly);
        assert_eq!(free.yearly_savings_per_month_cents(), None);
    }
}
