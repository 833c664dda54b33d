//! # affihub-gate
//!
//! Presentation boundary. Reads session state, asks the policy functions in
//! `affihub-core` what to show, and turns user intents back into session
//! calls. Nothing here mutates a user directly.
//!
//! - [`Gate`]: session handle plus render helpers
//! - [`lock_view`] / [`item_view`]: locked placeholder vs. real content
//! - [`pricing_cards`]: pricing page with per-viewer buttons
//! - [`plan_summary`]: dashboard membership card
//! - [`Intent`] / [`dispatch`]: user actions in, [`Outcome`] out

#![deny(unsafe_code)]

pub mod dashboard;
pub mod gate;
pub mod intents;
pub mod lock;
pub mod pricing;

pub use dashboard::{PlanSummary, greeting, member_since_line, plan_summary};
pub use gate::{Gate, Viewer};
pub use intents::{Intent, Outcome, dispatch};
pub use lock::{ContentView, LockOptions, LockedPlaceholder, UpgradeButton, item_view, lock_view};
pub use pricing::{PlanCta, PricingCard, plan_cta, pricing_cards};
