//! Error types for license verification and evaluation.

use entitle_types::Entitlements;
use thiserror::Error;

/// Reasons a single license token is rejected.
///
/// None of these abort an evaluation: the token is dropped and the
/// remaining licenses still apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Token is not three base64url segments, or a segment fails to decode.
    #[error("malformed license token: {0}")]
    Malformed(String),

    /// Signing algorithm is not in the allow-list.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Header carries no key identifier.
    #[error("token header must contain kid")]
    MissingKeyId,

    /// Key identifier is not in the key ring.
    #[error("no key with ID {0}")]
    UnknownKey(String),

    /// Ed25519 signature verification failed.
    #[error("license signature invalid")]
    InvalidSignature,

    /// Schema version is not the current one.
    #[error("license must be version {expected}")]
    InvalidVersion { expected: u64 },

    /// `license_expires` claim is absent.
    #[error("license missing license_expires")]
    MissingExpiry,

    /// Claims JSON is malformed or has fields of the wrong type.
    #[error("invalid license claims: {0}")]
    InvalidClaims(String),
}

/// Result type for token verification.
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Errors that abort an evaluation call or configuration step.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// A single token failed verification.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The license store could not be read.
    #[error("license store error: {0}")]
    Store(String),

    /// Key ring material is not a valid Ed25519 public key.
    #[error("invalid verification key {kid}: {reason}")]
    InvalidKey { kid: String, reason: String },

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// A failed store-backed evaluation.
///
/// Carries the fallback snapshot so the caller can choose between failing
/// closed and degrading.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct EvaluationError {
    #[source]
    pub source: LicenseError,
    /// Nothing licensed, nothing enabled.
    pub fallback: Entitlements,
}

impl From<LicenseError> for EvaluationError {
    fn from(source: LicenseError) -> Self {
        Self {
            source,
            fallback: Entitlements::all_disabled(),
        }
    }
}
