//! Evaluator configuration.
//!
//! Loaded once at startup, typically from a JSON file:
//!
//! ```json
//! {
//!   "keys": { "2022-08-12": "<base64 Ed25519 public key>" },
//!   "enablements": { "audit_log": true, "scim": false }
//! }
//! ```

use entitle_types::Enablements;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{LicenseError, LicenseResult};
use crate::keyring::KeyRing;

/// Trusted keys and operator feature toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Key identifier to standard base64 encoded Ed25519 public key.
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
    /// Features the operator has switched on.
    #[serde(default)]
    pub enablements: Enablements,
}

impl EvaluatorConfig {
    /// Parses configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown feature.
    pub fn from_json(json: &str) -> LicenseResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Decodes the configured keys.
    ///
    /// # Errors
    ///
    /// Returns an error if no keys are configured or a key fails to decode.
    pub fn key_ring(&self) -> LicenseResult<KeyRing> {
        if self.keys.is_empty() {
            return Err(LicenseError::Config(
                "at least one verification key is required".to_string(),
            ));
        }
        KeyRing::from_encoded(self.keys.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}
