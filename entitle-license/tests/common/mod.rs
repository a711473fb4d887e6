//! Shared test helpers for license tests.

#![allow(dead_code)]

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, TimeZone, Utc};
use ed25519_dalek::{Signer, SigningKey};
use entitle_license::{CURRENT_VERSION, Claims, Header, KeyRing};

pub const KID: &str = "2022-08-12";

/// Fixed evaluation time: 2024-06-01T00:00:00Z.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// Returns a deterministic Ed25519 signing key from a seed byte.
pub fn signing_key(seed: u8) -> SigningKey {
    let mut bytes = [0u8; 32];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = seed.wrapping_add(i as u8);
    }
    SigningKey::from_bytes(&bytes)
}

/// Returns the signing key for [`KID`] and a key ring trusting it.
pub fn test_keyring() -> (SigningKey, KeyRing) {
    let sk = signing_key(1);
    let ring = KeyRing::new().with_key(KID, sk.verifying_key());
    (sk, ring)
}

/// Signs arbitrary header and claims JSON into a compact token.
pub fn sign_raw(signing_key: &SigningKey, header_json: &str, claims_json: &str) -> String {
    let header_b64 = URL_SAFE_NO_PAD.encode(header_json.as_bytes());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());
    let signing_input = format!("{header_b64}.{claims_b64}");
    let signature = signing_key.sign(signing_input.as_bytes());
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature.to_bytes()))
}

/// Signs claims with the standard `EdDSA` header for `kid`.
pub fn sign_claims(signing_key: &SigningKey, kid: &str, claims: &Claims) -> String {
    let header = serde_json::to_string(&Header::eddsa(kid)).unwrap();
    let body = serde_json::to_string(claims).unwrap();
    sign_raw(signing_key, &header, &body)
}

/// Current-version claims valid for 30 days past [`now`] with no grace.
pub fn license() -> Claims {
    let expires = now() + Duration::days(30);
    Claims {
        version: CURRENT_VERSION,
        license_expires: Some(expires),
        expires_at: Some(expires),
        issued_at: Some(now() - Duration::days(335)),
        ..Claims::default()
    }
}

/// Claims whose nominal expiry has passed but whose grace window is open.
pub fn grace_license() -> Claims {
    Claims {
        license_expires: Some(now() - Duration::days(1)),
        expires_at: Some(now() + Duration::days(6)),
        ..license()
    }
}

/// Adds feature grants to claims.
pub fn with_features(mut claims: Claims, features: &[(&str, i64)]) -> Claims {
    for (name, value) in features {
        claims.features.insert((*name).to_string(), *value);
    }
    claims
}
