//! # edp-core — Foundational Types for the Extended Dataset Profile
//!
//! This crate is the leaf of the EDP workspace. It defines the primitive
//! value types that every schema revision builds on and the error
//! taxonomy shared by the whole workspace. It depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes.** `Language`, `JsonReference` and `Version`
//!    validate at construction *and* at deserialization. An invalid value
//!    cannot be observed.
//!
//! 2. **Major-version compatibility.** `Version::is_compatible_with` is the
//!    single rule gating schema evolution: equal major versions are
//!    compatible, everything else is not checked.
//!
//! 3. **Verbatim error messages.** Messages in [`error`] are part of the
//!    public contract and are asserted verbatim by tests.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `edp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

/// Implement `Deserialize` for string newtypes that must validate their
/// contents. Deserializes as a plain `String`, then routes through the
/// type's `new()` constructor so that invalid values are rejected at
/// deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod error;
mod iso639_3;
pub mod language;
pub mod reference;
pub mod temporal;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use error::{EdpError, SchemaVersionError, ValidationError, VersionError};
pub use language::{is_iso639_3, Language};
pub use reference::{FileReference, JsonReference};
pub use temporal::Duration;
pub use version::{Version, CURRENT_VERSION};
