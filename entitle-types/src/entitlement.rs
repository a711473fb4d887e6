//! Entitlement strength, per-feature state, and the aggregated snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::FeatureName;

/// Operator-configured feature toggles, independent of licensing.
///
/// Features missing from the map are treated as disabled.
pub type Enablements = BTreeMap<FeatureName, bool>;

/// How strongly a feature is licensed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entitlement {
    /// Fully licensed.
    Entitled,
    /// Licensed, but past the nominal expiry and inside the grace window.
    /// Fully functional, flagged to the operator.
    GracePeriod,
    /// Not licensed.
    #[default]
    NotEntitled,
}

impl Entitlement {
    /// Returns true for `Entitled` and `GracePeriod`.
    #[must_use]
    pub fn is_licensed(&self) -> bool {
        matches!(self, Self::Entitled | Self::GracePeriod)
    }
}

/// The entitlement state of a single feature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Feature {
    pub entitlement: Entitlement,
    /// Whether the feature is switched on for this deployment.
    pub enabled: bool,
    /// Licensed limit. Only set for [`FeatureName::UserLimit`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Measured usage. Only set for [`FeatureName::UserLimit`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<i64>,
}

/// A point-in-time view of what the deployment is licensed to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlements {
    /// State of every known feature.
    pub features: BTreeMap<FeatureName, Feature>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
    /// Findings where the deployment will not operate correctly.
    pub errors: Vec<String>,
    /// At least one license verified.
    pub has_license: bool,
    pub trial: bool,
    pub require_telemetry: bool,
}

impl Entitlements {
    /// Creates a snapshot with every feature unlicensed and enabled per the
    /// given enablements.
    #[must_use]
    pub fn new(enablements: &Enablements) -> Self {
        let features = FeatureName::ALL
            .into_iter()
            .map(|name| {
                let feature = Feature {
                    enabled: enablements.get(&name).copied().unwrap_or(false),
                    ..Feature::default()
                };
                (name, feature)
            })
            .collect();

        Self {
            features,
            warnings: Vec::new(),
            errors: Vec::new(),
            has_license: false,
            trial: false,
            require_telemetry: false,
        }
    }

    /// Creates the fallback snapshot: nothing licensed, nothing enabled.
    #[must_use]
    pub fn all_disabled() -> Self {
        Self::new(&Enablements::new())
    }

    /// Returns the state of a feature.
    ///
    /// Snapshots built by this crate contain every catalogue entry; a
    /// deserialized snapshot missing one reads as the default state.
    #[must_use]
    pub fn feature(&self, name: FeatureName) -> Feature {
        self.features.get(&name).cloned().unwrap_or_default()
    }

    /// Returns a mutable reference to the state of a feature, inserting the
    /// default state if absent.
    pub fn feature_mut(&mut self, name: FeatureName) -> &mut Feature {
        self.features.entry(name).or_default()
    }

    /// Returns the entitlement strength of a feature.
    #[must_use]
    pub fn entitlement(&self, name: FeatureName) -> Entitlement {
        self.features
            .get(&name)
            .map(|f| f.entitlement)
            .unwrap_or_default()
    }

    /// Returns true if the feature is enabled.
    #[must_use]
    pub fn is_enabled(&self, name: FeatureName) -> bool {
        self.features.get(&name).is_some_and(|f| f.enabled)
    }
}

impl Default for Entitlements {
    fn default() -> Self {
        Self::all_disabled()
    }
}
