//! License verification and entitlement evaluation.
//!
//! This crate turns signed license tokens into an [`Entitlements`] snapshot:
//! - Ed25519 token verification against a key ring ([`parse_claims`])
//! - Aggregation of any number of licenses with live usage ([`evaluate`])
//! - Store-backed evaluation with a fallback snapshot ([`Evaluator`])
//!
//! # Design Principles
//!
//! - **Pure evaluation**: no network calls, no durable state, `now` injected
//! - **Partial success**: an invalid token is logged and skipped, the rest
//!   still count
//! - **Findings are data**: usage beyond the license becomes warnings and
//!   errors on the snapshot, never a failed call
//!
//! # License Token Format
//!
//! Tokens are compact JWS strings signed with `EdDSA` (Ed25519), carrying
//! a `kid` header and claims of schema version [`CURRENT_VERSION`].
//!
//! [`Entitlements`]: entitle_types::Entitlements

mod aggregate;
mod claims;
mod config;
mod error;
mod evaluator;
mod keyring;
mod token;

pub use aggregate::{Usage, evaluate};
pub use claims::{ACCOUNT_TYPE_SALESFORCE, CURRENT_VERSION, Claims, Features, VERSION_CLAIM};
pub use config::EvaluatorConfig;
pub use error::{EvaluationError, LicenseError, LicenseResult, VerificationError, VerifyResult};
pub use evaluator::{Evaluator, LicenseRecord, LicenseStore};
pub use keyring::KeyRing;
pub use token::{HEADER_KEY_ID, Header, VALID_ALGORITHMS, parse_claims, parse_raw};
