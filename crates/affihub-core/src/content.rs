//! Gated content items.

use serde::{Deserialize, Serialize};

use crate::policy::has_access;
use crate::tier::{PaidTier, Tier};

/// What a visitor needs to see an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "access", content = "tier")]
pub enum ContentRequirement {
    /// Visible to everyone, including anonymous visitors.
    #[default]
    Open,
    /// Visible only at or above the given tier.
    Gated(PaidTier),
}

impl ContentRequirement {
    /// Build from the `premium`/`vip` flags used by content feeds.
    ///
    /// When both are set the stricter requirement (VIP) wins.
    #[must_use]
    pub const fn from_flags(premium: bool, vip: bool) -> Self {
        match (premium, vip) {
            (_, true) => Self::Gated(PaidTier::Vip),
            (true, false) => Self::Gated(PaidTier::Premium),
            (false, false) => Self::Open,
        }
    }

    /// Whether a visitor at `user` can view content with this requirement.
    #[must_use]
    pub fn is_visible_to(self, user: Option<Tier>) -> bool {
        match self {
            Self::Open => true,
            Self::Gated(required) => has_access(user, required),
        }
    }

    /// The gating tier, if any.
    #[must_use]
    pub const fn required_tier(self) -> Option<PaidTier> {
        match self {
            Self::Open => None,
            Self::Gated(tier) => Some(tier),
        }
    }
}

/// A piece of content annotated with its access requirement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatedItem {
    /// Stable item identifier.
    pub id: u32,
    /// Headline.
    pub title: String,
    /// Product category.
    pub category: String,
    /// Short teaser shown on cards.
    pub excerpt: String,
    /// Who may read it.
    pub requirement: ContentRequirement,
}

impl GatedItem {
    fn new(
        id: u32,
        title: &str,
        category: &str,
        excerpt: &str,
        requirement: ContentRequirement,
    ) -> Self {
        Self {
            id,
            title: title.to_owned(),
            category: category.to_owned(),
            excerpt: excerpt.to_owned(),
            requirement,
        }
    }
}

/// Featured reviews shown on the landing page.
#[must_use]
pub fn featured_reviews() -> Vec<GatedItem> {
    vec![
        GatedItem::new(
            1,
            "iPhone 15 Pro Max Complete Review",
            "Smartphones",
            "Comprehensive analysis of Apple's latest flagship with detailed performance benchmarks...",
            ContentRequirement::from_flags(false, false),
        ),
        GatedItem::new(
            2,
            "Best Gaming Laptops 2024: Expert Analysis",
            "Laptops",
            "In-depth comparison of top gaming laptops with exclusive performance data...",
            ContentRequirement::from_flags(true, false),
        ),
        GatedItem::new(
            3,
            "Smart Home Setup: Complete VIP Guide",
            "Smart Home",
            "Step-by-step guide with exclusive supplier contacts and bulk pricing...",
            ContentRequirement::from_flags(false, true),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_resolve_to_strictest_tier() {
        assert_eq!(ContentRequirement::from_flags(false, false), ContentRequirement::Open);
        assert_eq!(
            ContentRequirement::from_flags(true, false),
            ContentRequirement::Gated(PaidTier::Premium)
        );
        assert_eq!(
            ContentRequirement::from_flags(true, true),
            ContentRequirement::Gated(PaidTier::Vip)
        );
    }

    #[test]
    fn open_content_is_visible_to_anonymous() {
        assert!(ContentRequirement::Open.is_visible_to(None));
    }

    #[test]
    fn gated_content_follows_policy() {
        let premium = ContentRequirement::Gated(PaidTier::Premium);
        assert!(!premium.is_visible_to(None));
        assert!(!premium.is_visible_to(Some(Tier::Free)));
        assert!(premium.is_visible_to(Some(Tier::Vip)));
    }

    #[test]
    fn featured_reviews_cover_every_requirement() {
        let reviews = featured_reviews();
        let reqs: Vec<Option<PaidTier>> = reviews
            .iter()
            .map(|r| r.requirement.required_tier())
            .collect();
        assert_eq!(reqs, vec![None, Some(PaidTier::Premium), Some(PaidTier::Vip)]);
    }

    #[test]
    fn requirement_json_shape() {
        let v = serde_json::to_value(ContentRequirement::Gated(PaidTier::Vip)).unwrap();
        assert_eq!(v, serde_json::json!({"access": "gated", "tier": "vip"}));
        let v = serde_json::to_value(ContentRequirement::Open).unwrap();
        assert_eq!(v, serde_json::json!({"access": "open"}));
    }
}
