//! Membership policy engine.
//!
//! Pure decisions over tier values. `None` stands for an anonymous visitor.
//! Every function is total and keeps no state, so the presentation layer can
//! call them on every render.

use crate::tier::{PaidTier, Tier};

/// Whether a visitor at `user` may view content that requires `required`.
///
/// Anonymous visitors never have access.
#[must_use]
pub fn has_access(user: Option<Tier>, required: PaidTier) -> bool {
    match user {
        None => false,
        Some(tier) => tier >= Tier::from(required),
    }
}

/// Whether the upgrade call to action for `target` should be enabled.
///
/// Anonymous visitors always get `true` (the CTA starts sign-up). Nobody can
/// upgrade to `Free`, and signed-in users can only move strictly upwards.
#[must_use]
pub fn can_upgrade_to(user: Option<Tier>, target: Tier) -> bool {
    match (user, target) {
        (None, _) => true,
        (Some(_), Tier::Free) => false,
        (Some(current), target) => target > current,
    }
}

/// Whether `tier` is the visitor's current plan.
#[must_use]
pub fn is_current_plan(user: Option<Tier>, tier: Tier) -> bool {
    user == Some(tier)
}

/// The next tier up from `tier`, if there is one.
#[must_use]
pub fn next_tier(tier: Tier) -> Option<PaidTier> {
    match tier {
        Tier::Free => Some(PaidTier::Premium),
        Tier::Premium => Some(PaidTier::Vip),
        Tier::Vip => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISITORS: [Option<Tier>; 4] =
        [None, Some(Tier::Free), Some(Tier::Premium), Some(Tier::Vip)];

    #[test]
    fn premium_content_access() {
        assert!(!has_access(None, PaidTier::Premium));
        assert!(!has_access(Some(Tier::Free), PaidTier::Premium));
        assert!(has_access(Some(Tier::Premium), PaidTier::Premium));
        assert!(has_access(Some(Tier::Vip), PaidTier::Premium));
    }

    #[test]
    fn vip_content_access() {
        assert!(!has_access(None, PaidTier::Vip));
        assert!(!has_access(Some(Tier::Free), PaidTier::Vip));
        assert!(!has_access(Some(Tier::Premium), PaidTier::Vip));
        assert!(has_access(Some(Tier::Vip), PaidTier::Vip));
    }

    #[test]
    fn anonymous_can_always_start_signup() {
        for target in Tier::ALL {
            assert!(can_upgrade_to(None, target));
        }
    }

    #[test]
    fn nobody_upgrades_to_free() {
        for tier in Tier::ALL {
            assert!(!can_upgrade_to(Some(tier), Tier::Free));
        }
    }

    #[test]
    fn premium_target() {
        assert!(can_upgrade_to(Some(Tier::Free), Tier::Premium));
        assert!(!can_upgrade_to(Some(Tier::Premium), Tier::Premium));
        assert!(!can_upgrade_to(Some(Tier::Vip), Tier::Premium));
    }

    #[test]
    fn vip_target() {
        assert!(can_upgrade_to(Some(Tier::Free), Tier::Vip));
        assert!(can_upgrade_to(Some(Tier::Premium), Tier::Vip));
        assert!(!can_upgrade_to(Some(Tier::Vip), Tier::Vip));
    }

    #[test]
    fn current_plan_is_strict_equality() {
        for tier in Tier::ALL {
            assert!(!is_current_plan(None, tier));
            for other in Tier::ALL {
                assert_eq!(is_current_plan(Some(tier), other), tier == other);
            }
        }
    }

    #[test]
    fn next_tier_walks_up() {
        assert_eq!(next_tier(Tier::Free), Some(PaidTier::Premium));
        assert_eq!(next_tier(Tier::Premium), Some(PaidTier::Vip));
        assert_eq!(next_tier(Tier::Vip), None);
    }

    #[test]
    fn next_tier_is_always_upgradable() {
        for tier in Tier::ALL {
            if let Some(next) = next_tier(tier) {
                assert!(can_upgrade_to(Some(tier), next.into()));
            }
        }
    }

    #[test]
    fn decisions_are_deterministic() {
        for user in VISITORS {
            for required in PaidTier::ALL {
                assert_eq!(has_access(user, required), has_access(user, required));
            }
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_tier() -> impl Strategy<Value = Tier> {
            prop_oneof![Just(Tier::Free), Just(Tier::Premium), Just(Tier::Vip)]
        }

        fn any_paid() -> impl Strategy<Value = PaidTier> {
            prop_oneof![Just(PaidTier::Premium), Just(PaidTier::Vip)]
        }

        proptest! {
            #[test]
            fn access_matches_tier_order(user in any_tier(), required in any_paid()) {
                let expected = match required {
                    PaidTier::Premium => matches!(user, Tier::Premium | Tier::Vip),
                    PaidTier::Vip => user == Tier::Vip,
                };
                prop_assert_eq!(has_access(Some(user), required), expected);
            }

            #[test]
            fn access_is_monotonic_in_tier(a in any_tier(), b in any_tier(), required in any_paid()) {
                if a <= b && has_access(Some(a), required) {
                    prop_assert!(has_access(Some(b), required));
                }
            }

            #[test]
            fn upgrade_targets_are_above_current(user in any_tier(), target in any_tier()) {
                if can_upgrade_to(Some(user), target) {
                    prop_assert!(target > user);
                }
            }

            #[test]
            fn current_plan_never_upgradable(user in any_tier()) {
                prop_assert!(is_current_plan(Some(user), user));
                prop_assert!(!can_upgrade_to(Some(user), user));
            }
        }
    }
}
