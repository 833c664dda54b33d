//! Membership tiers.
//!
//! [`Tier`] is totally ordered by privilege: `Free < Premium < Vip`. Access
//! and upgrade decisions compare tiers through this ordering instead of
//! matching on names.
//!
//! [`PaidTier`] is the subset a piece of content can require and a user can
//! upgrade to. There is no way to gate content behind, or upgrade to, `Free`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A membership tier. Serialized as `"free"`, `"premium"`, `"vip"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Default tier for every new account.
    Free,
    /// First paid tier.
    Premium,
    /// Highest tier; includes everything in Premium.
    Vip,
}

impl Tier {
    /// All tiers in ascending privilege order.
    pub const ALL: [Self; 3] = [Self::Free, Self::Premium, Self::Vip];

    /// Wire name (`free`, `premium`, `vip`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Vip => "vip",
        }
    }

    /// Human-facing name used on badges and buttons.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Premium => "Premium",
            Self::Vip => "VIP",
        }
    }

    /// The paid tier this corresponds to, if any.
    #[must_use]
    pub const fn as_paid(self) -> Option<PaidTier> {
        match self {
            Self::Free => None,
            Self::Premium => Some(PaidTier::Premium),
            Self::Vip => Some(PaidTier::Vip),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "vip" => Ok(Self::Vip),
            _ => Err(ParseTierError(s.to_owned())),
        }
    }
}

/// A tier that content can require and users can upgrade to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaidTier {
    /// See [`Tier::Premium`].
    Premium,
    /// See [`Tier::Vip`].
    Vip,
}

impl PaidTier {
    /// Both paid tiers in ascending order.
    pub const ALL: [Self; 2] = [Self::Premium, Self::Vip];

    /// Widen to a [`Tier`].
    #[must_use]
    pub const fn tier(self) -> Tier {
        match self {
            Self::Premium => Tier::Premium,
            Self::Vip => Tier::Vip,
        }
    }

    /// Human-facing name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        self.tier().display_name()
    }
}

impl From<PaidTier> for Tier {
    fn from(paid: PaidTier) -> Self {
        paid.tier()
    }
}

impl TryFrom<Tier> for PaidTier {
    type Error = ParseTierError;

    fn try_from(tier: Tier) -> Result<Self, Self::Error> {
        tier.as_paid()
            .ok_or_else(|| ParseTierError(tier.as_str().to_owned()))
    }
}

impl fmt::Display for PaidTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tier().as_str())
    }
}

impl FromStr for PaidTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Tier>()?.try_into()
    }
}

/// Returned when a string does not name a (paid) tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a valid membership tier: {0}")]
pub struct ParseTierError(pub String);

/// Billing cadence shown on the pricing page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    /// Charged every month.
    #[default]
    Monthly,
    /// Charged once a year at a discount.
    Yearly,
}

impl BillingPeriod {
    /// Label for the period toggle.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// Promotional badge next to the toggle, if any.
    #[must_use]
    pub const fn promo(self) -> Option<&'static str> {
        match self {
            Self::Monthly => None,
            Self::Yearly => Some("Save 17%"),
        }
    }
}
