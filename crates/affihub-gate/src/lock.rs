//! Locked placeholders for gated content.

use affihub_core::{GatedItem, PaidTier, Tier, has_access};
use serde::Serialize;

use crate::intents::Intent;

/// Optional overrides for the placeholder copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockOptions {
    /// Replaces `"{Tier} Content"`.
    pub title: Option<String>,
    /// Replaces the default explanation.
    pub description: Option<String>,
    /// Whether to offer an upgrade button.
    pub show_upgrade: bool,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            show_upgrade: true,
        }
    }
}

/// What to draw in place of content the viewer cannot see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedPlaceholder {
    /// Tier that unlocks the content.
    pub required: PaidTier,
    /// Headline.
    pub title: String,
    /// Explanation.
    pub description: String,
    /// `"Requires {Tier} Membership"`.
    pub requirement: String,
    /// Upgrade button, if enabled.
    pub upgrade: Option<UpgradeButton>,
}

/// A call-to-action button bound to an intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeButton {
    /// Button text.
    pub label: String,
    /// Intent sent when pressed.
    #[serde(skip)]
    pub intent: Intent,
}

/// Either the real content or a placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "view")]
pub enum ContentView {
    /// Render the content.
    Unlocked,
    /// Render the placeholder instead.
    Locked(LockedPlaceholder),
}

impl ContentView {
    /// Whether the viewer sees the real content.
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

/// Decide how to render content that requires `required`.
pub fn lock_view(viewer: Option<Tier>, required: PaidTier, options: &LockOptions) -> ContentView {
    if has_access(viewer, required) {
        return ContentView::Unlocked;
    }

    let name = required.display_name();
    ContentView::Locked(LockedPlaceholder {
        required,
        title: options
            .title
            .clone()
            .unwrap_or_else(|| format!("{name} Content")),
        description: options.description.clone().unwrap_or_else(|| {
            format!(
                "This content is exclusively available to {name} members. \
                 Upgrade your membership to unlock this feature."
            )
        }),
        requirement: format!("Requires {name} Membership"),
        upgrade: options.show_upgrade.then(|| UpgradeButton {
            label: format!("Upgrade to {name}"),
            intent: Intent::Upgrade(required),
        }),
    })
}

/// Decide how to render a content item. Open items are always unlocked.
pub fn item_view(viewer: Option<Tier>, item: &GatedItem, options: &LockOptions) -> ContentView {
    match item.requirement.required_tier() {
        None => ContentView::Unlocked,
        Some(required) => lock_view(viewer, required, options),
    }
}
