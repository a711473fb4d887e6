//! Property-based tests for aggregation.
//!
//! - The user limit is the maximum granted, whatever the license order
//! - Features no license grants always end up disabled

mod common;

use common::{license, now, with_features};
use entitle_license::{Claims, Usage, evaluate};
use entitle_types::{Enablements, Entitlement, FeatureName};
use proptest::prelude::*;

fn limits_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-5i64..1_000, 1..8)
}

fn enablements_strategy() -> impl Strategy<Value = Enablements> {
    prop::collection::vec(any::<bool>(), FeatureName::ALL.len())
        .prop_map(|flags| FeatureName::ALL.into_iter().zip(flags).collect())
}

fn licenses_with_limits(limits: &[i64]) -> Vec<Claims> {
    limits
        .iter()
        .map(|&limit| with_features(license(), &[("user_limit", limit)]))
        .collect()
}

proptest! {
    #[test]
    fn user_limit_is_order_independent_maximum(
        limits in limits_strategy(),
        active_users in 0i64..2_000,
    ) {
        let usage = Usage { active_users, replicas: 1, external_auth_providers: 1 };

        let forward = evaluate(now(), &licenses_with_limits(&limits), &usage, &Enablements::new());
        let mut reversed_limits = limits.clone();
        reversed_limits.reverse();
        let reversed = evaluate(now(), &licenses_with_limits(&reversed_limits), &usage, &Enablements::new());

        let expected = limits.iter().copied().filter(|l| *l > 0).max();
        prop_assert_eq!(forward.feature(FeatureName::UserLimit).limit, expected);
        prop_assert_eq!(reversed.feature(FeatureName::UserLimit).limit, expected);
        prop_assert_eq!(
            forward.warnings.len(),
            usize::from(expected.is_some_and(|limit| active_users > limit))
        );
    }

    #[test]
    fn ungranted_features_are_always_disabled(
        enablements in enablements_strategy(),
        replicas in 0i64..4,
        providers in 0i64..4,
    ) {
        let claims = with_features(license(), &[("audit_log", 1)]);
        let usage = Usage { active_users: 1, replicas, external_auth_providers: providers };
        let result = evaluate(now(), [&claims], &usage, &enablements);

        for name in FeatureName::ALL {
            if name == FeatureName::AuditLog {
                continue;
            }
            prop_assert_eq!(result.entitlement(name), Entitlement::NotEntitled);
            prop_assert!(!result.is_enabled(name));
        }
    }
}
