//! # affihub-core
//!
//! Shared vocabulary for the AffiHub membership site:
//!
//! - **Branded IDs**: [`UserId`] newtype over a UUID v7 string
//! - **Tiers**: [`Tier`] (`free < premium < vip`) and [`PaidTier`] for gated
//!   requirements and upgrade targets
//! - **Users**: [`User`], the persisted principal record
//! - **Catalog**: the read-only [`MembershipTier`] price/feature table
//! - **Policy**: pure access and upgrade decisions in [`policy`]
//! - **Content**: [`GatedItem`] annotated with a [`ContentRequirement`]
//! - **Logging**: `tracing` subscriber setup and test capture

#![deny(unsafe_code)]

pub mod catalog;
pub mod content;
pub mod ids;
pub mod logging;
pub mod policy;
pub mod tier;
pub mod user;

pub use catalog::{MembershipTier, catalog, format_price, tier_info};
pub use content::{ContentRequirement, GatedItem, featured_reviews};
pub use ids::UserId;
pub use policy::{can_upgrade_to, has_access, is_current_plan, next_tier};
pub use tier::{BillingPeriod, PaidTier, ParseTierError, Tier};
pub use user::User;
