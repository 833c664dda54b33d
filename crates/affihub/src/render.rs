//! Plain-text rendering of gate models.

use std::fmt::Write as _;

use affihub_core::{BillingPeriod, GatedItem};
use affihub_gate::{
    ContentView, Outcome, PlanSummary, PricingCard, Viewer, greeting, member_since_line,
};

/// Signed-in user plus membership card, or a sign-in hint.
pub fn status(viewer: &Viewer, plan: Option<&PlanSummary>) -> String {
    let mut out = String::new();
    match (&viewer.user, plan) {
        (Some(user), Some(plan)) => {
            let _ = writeln!(out, "{}", greeting(user));
            let _ = writeln!(out, "{}", member_since_line(user));
            let _ = writeln!(out, "Email: {}", user.email());
            let _ = writeln!(out, "Membership: {}", plan.badge);
            let _ = writeln!(out, "{}", plan.message);
            if let Some(next) = &plan.next {
                let _ = writeln!(out, "Next: {}", next.label);
            }
        }
        _ => {
            let _ = writeln!(out, "Not signed in.");
            let _ = writeln!(out, "Run `affihub login` or `affihub register` to get started.");
        }
    }
    out
}

/// One line describing what an intent did.
pub fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::SignedIn(user) => format!(
            "Signed in as {} <{}> ({})",
            user.name(),
            user.email(),
            user.membership().display_name()
        ),
        Outcome::SignedOut => "Signed out.".to_string(),
        Outcome::Upgraded(user) => format!(
            "Welcome to {}! Your membership is now active.",
            user.membership().display_name()
        ),
        Outcome::SignUpRequired => {
            "Sign in or register before upgrading your membership.".to_string()
        }
        Outcome::Rejected(reason) => format!("Nothing changed: {reason}"),
    }
}

/// Pricing table, one block per card.
pub fn pricing(cards: &[PricingCard], billing: BillingPeriod) -> String {
    let mut out = String::new();
    let _ = write!(out, "Billing: {}", billing.label());
    if let Some(promo) = billing.promo() {
        let _ = write!(out, " ({promo})");
    }
    out.push('\n');
    for card in cards {
        out.push('\n');
        let _ = write!(out, "{} - {} {}", card.tier.name, card.price, card.tier.period);
        if card.tier.popular {
            out.push_str("  [Most Popular]");
        }
        out.push('\n');
        if let Some(savings) = &card.savings {
            let _ = writeln!(out, "  {savings}");
        }
        for feature in card.tier.features {
            let _ = writeln!(out, "  * {feature}");
        }
        let marker = if card.cta.enabled() { ">" } else { "-" };
        let _ = writeln!(out, "  {marker} {}", card.cta.label());
    }
    out
}

/// Content list with locked placeholders in place of gated items.
pub fn content(items: &[(&GatedItem, ContentView)]) -> String {
    let mut out = String::new();
    for (item, view) in items {
        let _ = writeln!(out, "#{} {} [{}]", item.id, item.title, item.category);
        match view {
            ContentView::Unlocked => {
                let _ = writeln!(out, "  {}", item.excerpt);
            }
            ContentView::Locked(lock) => {
                let _ = writeln!(out, "  LOCKED: {}", lock.title);
                let _ = writeln!(out, "  {}", lock.description);
                let _ = writeln!(out, "  {}", lock.requirement);
                if let Some(button) = &lock.upgrade {
                    let _ = writeln!(out, "  > {}", button.label);
                }
            }
        }
        out.push('\n');
    }
    out
}
