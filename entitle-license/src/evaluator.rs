//! Batch verification and store-backed evaluation.

use chrono::{DateTime, Utc};
use entitle_types::{Enablements, Entitlements};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{self, Usage};
use crate::claims::Claims;
use crate::config::EvaluatorConfig;
use crate::error::{EvaluationError, LicenseError, LicenseResult, VerifyResult};
use crate::keyring::KeyRing;
use crate::token;

/// A stored license as handed to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Identifier used in diagnostics only.
    pub id: i64,
    /// The signed token.
    pub token: String,
}

impl LicenseRecord {
    #[must_use]
    pub fn new(id: i64, token: impl Into<String>) -> Self {
        Self {
            id,
            token: token.into(),
        }
    }
}

/// Durable storage of licenses and usage counters.
pub trait LicenseStore {
    /// Returns licenses whose hard expiry has not passed.
    fn unexpired_licenses(&self) -> LicenseResult<Vec<LicenseRecord>>;

    /// Returns the number of active user accounts.
    fn active_user_count(&self) -> LicenseResult<i64>;
}

/// Verifies licenses against a key ring and aggregates them.
///
/// Holds only immutable configuration, so one evaluator can serve
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    keys: KeyRing,
    enablements: Enablements,
}

impl Evaluator {
    #[must_use]
    pub fn new(keys: KeyRing, enablements: Enablements) -> Self {
        Self { keys, enablements }
    }

    /// Builds an evaluator from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured key fails to decode.
    pub fn from_config(config: &EvaluatorConfig) -> LicenseResult<Self> {
        Ok(Self::new(config.key_ring()?, config.enablements.clone()))
    }

    #[must_use]
    pub fn keys(&self) -> &KeyRing {
        &self.keys
    }

    #[must_use]
    pub fn enablements(&self) -> &Enablements {
        &self.enablements
    }

    /// Verifies a single token.
    ///
    /// # Errors
    ///
    /// Returns the reason the token was rejected.
    pub fn verify(&self, raw: &str) -> VerifyResult<Claims> {
        token::parse_claims(raw, &self.keys)
    }

    /// Verifies every record, keeping the claims of those that pass and are
    /// valid at `now`: not past their hard expiry, and neither `nbf` nor
    /// `iat` in the future.
    ///
    /// Rejected records are logged and dropped; one bad token never hides
    /// the grants of the others.
    #[must_use]
    pub fn verify_records(&self, records: &[LicenseRecord], now: DateTime<Utc>) -> Vec<Claims> {
        records
            .iter()
            .filter_map(|record| match self.verify(&record.token) {
                Ok(claims) if claims.is_past_hard_expiry(now) => {
                    debug!(id = record.id, "skipping license past hard expiry");
                    None
                }
                Ok(claims) if claims.is_not_yet_valid(now) => {
                    debug!(id = record.id, "skipping license not valid yet");
                    None
                }
                Ok(claims) => Some(claims),
                Err(error) => {
                    debug!(id = record.id, %error, "skipping invalid license");
                    None
                }
            })
            .collect()
    }

    /// Verifies `records` and aggregates the survivors.
    #[must_use]
    pub fn evaluate_records(
        &self,
        records: &[LicenseRecord],
        now: DateTime<Utc>,
        usage: &Usage,
    ) -> Entitlements {
        let licenses = self.verify_records(records, now);
        let entitlements = aggregate::evaluate(now, &licenses, usage, &self.enablements);
        debug!(
            records = records.len(),
            verified = licenses.len(),
            warnings = entitlements.warnings.len(),
            errors = entitlements.errors.len(),
            "evaluated entitlements"
        );
        entitlements
    }

    /// Reads licenses and the active user count from `store` and evaluates
    /// them.
    ///
    /// # Errors
    ///
    /// Store failures abort the call. The returned error carries an
    /// all-disabled fallback snapshot.
    pub fn entitlements<S>(
        &self,
        store: &S,
        now: DateTime<Utc>,
        replicas: i64,
        external_auth_providers: i64,
    ) -> Result<Entitlements, EvaluationError>
    where
        S: LicenseStore + ?Sized,
    {
        let records = store.unexpired_licenses()?;
        let active_users = store
            .active_user_count()
            .map_err(|e| LicenseError::Store(format!("query active user count: {e}")))?;

        let usage = Usage {
            active_users,
            replicas,
            external_auth_providers,
        };
        Ok(self.evaluate_records(&records, now, &usage))
    }
}
