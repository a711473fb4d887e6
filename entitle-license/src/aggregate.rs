//! Folds verified licenses and live usage into an [`Entitlements`] snapshot.

use chrono::{DateTime, Utc};
use entitle_types::{Enablements, Entitlement, Entitlements, Feature, FeatureName};
use serde::{Deserialize, Serialize};

use crate::claims::Claims;

/// Live usage counters measured by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Active user accounts.
    pub active_users: i64,
    /// Running server replicas.
    pub replicas: i64,
    /// Configured external authentication providers.
    pub external_auth_providers: i64,
}

/// Computes the entitlements granted by `licenses` at `now`.
///
/// Every license must already have passed verification and must not be
/// past its hard expiry. Aggregation never fails; mismatches between usage
/// and license become warnings or errors on the snapshot.
///
/// Boolean features take the strength of the last license that grants them,
/// while the user limit takes the largest limit granted by any license.
#[must_use]
pub fn evaluate<'a, I>(
    now: DateTime<Utc>,
    licenses: I,
    usage: &Usage,
    enablements: &Enablements,
) -> Entitlements
where
    I: IntoIterator<Item = &'a Claims>,
{
    let mut entitlements = Entitlements::new(enablements);
    let mut all_features = false;

    for claims in licenses {
        let strength = claims.strength_at(now);
        entitlements.has_license = true;
        entitlements.trial |= claims.trial;
        entitlements.require_telemetry |= claims.require_telemetry;

        for (name, value) in claims.granted_features() {
            match name {
                FeatureName::UserLimit => {
                    let prior = entitlements.feature(name).limit;
                    let limit = prior.map_or(value, |prior| prior.max(value));
                    *entitlements.feature_mut(name) = Feature {
                        entitlement: strength,
                        enabled: true,
                        limit: Some(limit),
                        actual: Some(usage.active_users),
                    };
                }
                _ => {
                    *entitlements.feature_mut(name) = Feature {
                        entitlement: strength,
                        enabled: enablements.get(&name).copied().unwrap_or(false)
                            || name.always_enable(),
                        ..Feature::default()
                    };
                }
            }
        }

        all_features |= claims.all_features;
    }

    if all_features {
        for name in FeatureName::ALL {
            if name == FeatureName::UserLimit {
                continue;
            }
            entitlements.feature_mut(name).entitlement = Entitlement::Entitled;
        }
    }

    if entitlements.has_license {
        check_usage(&mut entitlements, usage);
    }
    check_high_availability(&mut entitlements, usage.replicas);
    check_multiple_external_auth(&mut entitlements, usage.external_auth_providers);

    for feature in entitlements.features.values_mut() {
        if feature.entitlement == Entitlement::NotEntitled {
            feature.enabled = false;
        }
    }

    entitlements
}

/// Warns about user-limit overruns and features enabled without a license.
fn check_usage(entitlements: &mut Entitlements, usage: &Usage) {
    if let Some(limit) = entitlements.feature(FeatureName::UserLimit).limit
        && usage.active_users > limit
    {
        entitlements.warnings.push(format!(
            "Your deployment has {} active users but is only licensed for {limit}.",
            usage.active_users
        ));
    }

    for name in FeatureName::ALL {
        // These have dedicated checks.
        if matches!(
            name,
            FeatureName::UserLimit
                | FeatureName::HighAvailability
                | FeatureName::MultipleExternalAuth
        ) {
            continue;
        }
        let feature = entitlements.feature(name);
        if !feature.enabled {
            continue;
        }
        match feature.entitlement {
            Entitlement::NotEntitled => entitlements.warnings.push(format!(
                "{} is enabled but your license is not entitled to this feature.",
                name.humanize()
            )),
            Entitlement::GracePeriod => entitlements.warnings.push(format!(
                "{} is enabled but your license for this feature is expired.",
                name.humanize()
            )),
            Entitlement::Entitled => {}
        }
    }
}

fn check_high_availability(entitlements: &mut Entitlements, replicas: i64) {
    if replicas <= 1 {
        return;
    }
    match entitlements.entitlement(FeatureName::HighAvailability) {
        Entitlement::NotEntitled if entitlements.has_license => entitlements.errors.push(
            "You have multiple replicas but your license is not entitled to high availability. \
             You will be unable to connect to workspaces."
                .to_string(),
        ),
        Entitlement::NotEntitled => entitlements.errors.push(
            "You have multiple replicas but high availability is an Enterprise feature. \
             You will be unable to connect to workspaces."
                .to_string(),
        ),
        Entitlement::GracePeriod => entitlements.warnings.push(
            "You have multiple replicas but your license for high availability is expired. \
             Reduce to one replica or workspace connections will stop working."
                .to_string(),
        ),
        Entitlement::Entitled => {}
    }
}

fn check_multiple_external_auth(entitlements: &mut Entitlements, providers: i64) {
    if providers <= 1 {
        return;
    }
    match entitlements.entitlement(FeatureName::MultipleExternalAuth) {
        Entitlement::NotEntitled if entitlements.has_license => entitlements.errors.push(
            "You have multiple external auth providers configured but your license is limited at one."
                .to_string(),
        ),
        Entitlement::NotEntitled => entitlements.errors.push(
            "You have multiple external auth providers configured but this is an Enterprise feature. \
             Reduce to one."
                .to_string(),
        ),
        Entitlement::GracePeriod => entitlements.warnings.push(
            "You have multiple external auth providers configured but your license is expired. \
             Reduce to one."
                .to_string(),
        ),
        Entitlement::Entitled => {}
    }
}
