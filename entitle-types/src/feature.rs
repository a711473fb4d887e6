//! The feature catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A licensable product feature.
///
/// The serialized form is the snake_case wire name used both in license
/// tokens and in the entitlement snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    /// Maximum number of active users. The only numeric feature.
    UserLimit,
    AuditLog,
    BrowserOnly,
    Scim,
    WorkspaceQuota,
    TemplateRbac,
    /// Running more than one server replica.
    HighAvailability,
    /// Configuring more than one external auth provider.
    MultipleExternalAuth,
    ExternalProvisionerDaemons,
    Appearance,
}

impl FeatureName {
    /// Every known feature, in catalogue order.
    pub const ALL: [FeatureName; 10] = [
        Self::UserLimit,
        Self::AuditLog,
        Self::BrowserOnly,
        Self::Scim,
        Self::WorkspaceQuota,
        Self::TemplateRbac,
        Self::HighAvailability,
        Self::MultipleExternalAuth,
        Self::ExternalProvisionerDaemons,
        Self::Appearance,
    ];

    /// Returns the wire name of this feature.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserLimit => "user_limit",
            Self::AuditLog => "audit_log",
            Self::BrowserOnly => "browser_only",
            Self::Scim => "scim",
            Self::WorkspaceQuota => "workspace_quota",
            Self::TemplateRbac => "template_rbac",
            Self::HighAvailability => "high_availability",
            Self::MultipleExternalAuth => "multiple_external_auth",
            Self::ExternalProvisionerDaemons => "external_provisioner_daemons",
            Self::Appearance => "appearance",
        }
    }

    /// Returns a human-readable name for operator-facing messages.
    #[must_use]
    pub fn humanize(&self) -> String {
        match self {
            Self::Scim => "SCIM".to_string(),
            Self::TemplateRbac => "Template RBAC".to_string(),
            _ => self
                .as_str()
                .split('_')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<String>>()
                .join(" "),
        }
    }

    /// Returns true if the feature is switched on whenever a license grants
    /// it, regardless of operator enablement.
    #[must_use]
    pub fn always_enable(&self) -> bool {
        matches!(
            self,
            Self::MultipleExternalAuth | Self::ExternalProvisionerDaemons | Self::Appearance
        )
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::UnknownFeature(s.to_string()))
    }
}
