//! Trusted verification keys indexed by key identifier.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use ed25519_dalek::VerifyingKey;
use std::collections::BTreeMap;

use crate::error::{LicenseError, LicenseResult};

/// Public keys trusted to sign licenses.
///
/// Rotated keys coexist under distinct identifiers; a token names the key it
/// was signed with in its `kid` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRing {
    keys: BTreeMap<String, VerifyingKey>,
}

impl KeyRing {
    /// Creates an empty key ring.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, replacing any key with the same identifier.
    pub fn insert(&mut self, kid: impl Into<String>, key: VerifyingKey) {
        self.keys.insert(kid.into(), key);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_key(mut self, kid: impl Into<String>, key: VerifyingKey) -> Self {
        self.insert(kid, key);
        self
    }

    /// Adds a key from its raw 32-byte encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid Ed25519 point.
    pub fn insert_bytes(&mut self, kid: impl Into<String>, bytes: &[u8; 32]) -> LicenseResult<()> {
        let kid = kid.into();
        let key = VerifyingKey::from_bytes(bytes).map_err(|_| LicenseError::InvalidKey {
            kid: kid.clone(),
            reason: "not a valid Ed25519 public key".to_string(),
        })?;
        self.keys.insert(kid, key);
        Ok(())
    }

    /// Builds a key ring from standard base64 encoded 32-byte public keys.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first key that fails to decode.
    pub fn from_encoded<'a, I>(entries: I) -> LicenseResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut ring = Self::new();
        for (kid, encoded) in entries {
            let bytes = BASE64.decode(encoded.trim()).map_err(|e| LicenseError::InvalidKey {
                kid: kid.to_string(),
                reason: format!("invalid base64: {e}"),
            })?;
            let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| LicenseError::InvalidKey {
                kid: kid.to_string(),
                reason: format!("expected 32 bytes, got {}", b.len()),
            })?;
            ring.insert_bytes(kid, &bytes)?;
        }
        Ok(ring)
    }

    /// Looks up a key by identifier.
    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&VerifyingKey> {
        self.keys.get(kid)
    }

    /// Returns the key identifiers in sorted order.
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
