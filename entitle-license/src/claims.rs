//! The rights payload carried by a license token.

use chrono::{DateTime, Utc};
use entitle_types::{Entitlement, FeatureName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The only schema version accepted.
pub const CURRENT_VERSION: u64 = 3;

/// Name of the schema version claim.
pub const VERSION_CLAIM: &str = "version";

/// `account_type` value for licenses issued through Salesforce.
pub const ACCOUNT_TYPE_SALESFORCE: &str = "salesforce";

/// Feature grants keyed by wire name.
///
/// Boolean features are granted by any positive value; `user_limit` carries
/// the limit itself.
pub type Features = BTreeMap<String, i64>;

/// Decoded claims of one license.
///
/// `license_expires` ends full entitlement and starts the grace period.
/// The registered `exp` claim ends the grace period, and equals
/// `license_expires` when no grace is granted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "exp", default, with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "nbf", default, with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,
    #[serde(rename = "iat", default, with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,

    #[serde(default, with = "numeric_date", skip_serializing_if = "Option::is_none")]
    pub license_expires: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default)]
    pub trial: bool,
    #[serde(default)]
    pub all_features: bool,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub features: Features,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub require_telemetry: bool,
}

impl Claims {
    /// End of the grace period: `exp`, or `license_expires` when absent.
    #[must_use]
    pub fn hard_expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at.or(self.license_expires)
    }

    /// Returns true once the grace period has ended.
    #[must_use]
    pub fn is_past_hard_expiry(&self, now: DateTime<Utc>) -> bool {
        self.hard_expiry().is_some_and(|exp| now >= exp)
    }

    /// Returns true if `nbf` or `iat` lies after `now`.
    #[must_use]
    pub fn is_not_yet_valid(&self, now: DateTime<Utc>) -> bool {
        self.not_before.is_some_and(|nbf| nbf > now) || self.issued_at.is_some_and(|iat| iat > now)
    }

    /// Entitlement strength this license confers at `now`.
    ///
    /// Past `license_expires` the license can only be in its grace period,
    /// since a license past its hard expiry never reaches aggregation.
    #[must_use]
    pub fn strength_at(&self, now: DateTime<Utc>) -> Entitlement {
        match self.license_expires {
            Some(expires) if now < expires => Entitlement::Entitled,
            _ => Entitlement::GracePeriod,
        }
    }

    /// Known features granted with a positive value.
    ///
    /// Non-positive values and names outside the catalogue are skipped.
    pub fn granted_features(&self) -> impl Iterator<Item = (FeatureName, i64)> + '_ {
        self.features.iter().filter_map(|(name, &value)| {
            if value <= 0 {
                return None;
            }
            match name.parse::<FeatureName>() {
                Ok(feature) => Some((feature, value)),
                Err(_) => {
                    tracing::debug!(feature = %name, "ignoring unknown feature grant");
                    None
                }
            }
        })
    }
}

/// JWT NumericDate: seconds since the Unix epoch.
///
/// Whole-second precision: fractional values are truncated on decode.
mod numeric_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_i64(time.timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let time = if let Some(secs) = number.as_i64() {
            DateTime::from_timestamp(secs, 0)
        } else {
            number
                .as_f64()
                .and_then(|secs| DateTime::from_timestamp(secs.floor() as i64, 0))
        };
        time.map(Some)
            .ok_or_else(|| D::Error::custom(format!("NumericDate out of range: {number}")))
    }
}
