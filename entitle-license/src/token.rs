//! License token parsing and Ed25519 signature verification.
//!
//! Tokens are compact JWS strings:
//! `base64url(header).base64url(claims).base64url(signature)`
//!
//! The header is a JSON object carrying `alg` (always `EdDSA`) and `kid`,
//! the identifier of the signing key in the [`KeyRing`]. The signature
//! covers the ASCII bytes `header_b64 + "." + claims_b64`.
//!
//! Verification does not look at the clock. Filtering on hard expiry is
//! left to the caller.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{Signature, Verifier};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::claims::{CURRENT_VERSION, Claims, VERSION_CLAIM};
use crate::error::{VerificationError, VerifyResult};
use crate::keyring::KeyRing;

/// Name of the header field holding the signing key identifier.
pub const HEADER_KEY_ID: &str = "kid";

/// Signing algorithms accepted in the `alg` header.
pub const VALID_ALGORITHMS: &[&str] = &["EdDSA"];

/// The JOSE header of a license token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    /// A `kid` that is not a string reads as absent.
    #[serde(
        default,
        deserialize_with = "string_or_absent",
        skip_serializing_if = "Option::is_none"
    )]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Header {
    /// The header license tokens are issued with.
    #[must_use]
    pub fn eddsa(kid: impl Into<String>) -> Self {
        Self {
            alg: "EdDSA".to_string(),
            kid: Some(kid.into()),
            typ: Some("JWT".to_string()),
        }
    }
}

/// Verifies a token and decodes its claims.
///
/// # Errors
///
/// Returns the first failed check: structure, algorithm, key identifier,
/// signature, claim decoding, schema version, then `license_expires`.
pub fn parse_claims(raw: &str, keys: &KeyRing) -> VerifyResult<Claims> {
    let payload = verified_payload(raw, keys)?;

    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| VerificationError::InvalidClaims(e.to_string()))?;

    if claims.version != CURRENT_VERSION {
        return Err(VerificationError::InvalidVersion {
            expected: CURRENT_VERSION,
        });
    }
    if claims.license_expires.is_none() {
        return Err(VerificationError::MissingExpiry);
    }
    Ok(claims)
}

/// Verifies a token and returns its claims as an untyped JSON object.
///
/// Intended for display. Only the signature and schema version are checked;
/// the remaining claims are not interpreted.
///
/// # Errors
///
/// Returns an error if the signature does not verify, the claims are not a
/// JSON object, or the version claim is missing or not current.
pub fn parse_raw(raw: &str, keys: &KeyRing) -> VerifyResult<Map<String, Value>> {
    let payload = verified_payload(raw, keys)?;

    let claims: Map<String, Value> = serde_json::from_slice(&payload)
        .map_err(|e| VerificationError::InvalidClaims(e.to_string()))?;

    let version = claims.get(VERSION_CLAIM).and_then(Value::as_f64);
    match version {
        Some(v) if v as i64 == CURRENT_VERSION as i64 => Ok(claims),
        _ => Err(VerificationError::InvalidVersion {
            expected: CURRENT_VERSION,
        }),
    }
}

/// Checks structure, header and signature, returning the decoded claims bytes.
fn verified_payload(raw: &str, keys: &KeyRing) -> VerifyResult<Vec<u8>> {
    let raw = raw.trim();

    let parts: Vec<&str> = raw.split('.').collect();
    let [header_b64, claims_b64, signature_b64] = parts.as_slice() else {
        return Err(VerificationError::Malformed(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    };

    let header_json = decode_segment("header", header_b64)?;
    let header: Header = serde_json::from_slice(&header_json)
        .map_err(|e| VerificationError::Malformed(format!("invalid header JSON: {e}")))?;

    if !VALID_ALGORITHMS.contains(&header.alg.as_str()) {
        return Err(VerificationError::UnsupportedAlgorithm(header.alg));
    }

    let kid = header.kid.ok_or(VerificationError::MissingKeyId)?;
    let key = keys
        .get(&kid)
        .ok_or_else(|| VerificationError::UnknownKey(kid.clone()))?;

    let signature_bytes = decode_segment("signature", signature_b64)?;
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|_| VerificationError::Malformed("invalid signature length".to_string()))?;

    let signing_input_len = header_b64.len() + 1 + claims_b64.len();
    key.verify(raw[..signing_input_len].as_bytes(), &signature)
        .map_err(|_| VerificationError::InvalidSignature)?;

    decode_segment("claims", claims_b64)
}

fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(kid)) => Some(kid),
        _ => None,
    })
}

fn decode_segment(what: &str, segment: &str) -> VerifyResult<Vec<u8>> {
    if segment.is_empty() {
        return Err(VerificationError::Malformed(format!("empty {what} segment")));
    }
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| VerificationError::Malformed(format!("invalid {what} base64: {e}")))
}
