//! Core type definitions for entitlement evaluation.
//!
//! This crate defines the license-independent vocabulary shared by the
//! evaluator and its consumers:
//! - The feature catalogue ([`FeatureName`])
//! - Entitlement strength and per-feature state
//! - The aggregated [`Entitlements`] snapshot
//!
//! Token parsing and aggregation live in `entitle-license`.

mod entitlement;
mod feature;

pub use entitlement::{Enablements, Entitlement, Entitlements, Feature};
pub use feature::FeatureName;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
}
