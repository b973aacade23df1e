//! # edp-cli — Extended Dataset Profile Command-Line Interface
//!
//! Publishes the current Extended Dataset Profile schema so that tools
//! outside Rust can validate profiles without linking this workspace.
//!
//! ## Usage
//!
//! ```text
//! edp-schema -o schemas/                  # writes schemas/edp_schema.json
//! edp-schema -o edp.schema.json           # writes the given file
//! edp-schema -o docs/ --format markdown   # writes docs/edp_schema.md
//! ```
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `edp-schema`; no schema logic here.

pub mod export;
