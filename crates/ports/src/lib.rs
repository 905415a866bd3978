//! # form-resolver-ports
//!
//! Port traits for the form-resolver hexagonal architecture.
//!
//! This crate defines the interfaces between the resolution pipeline and its
//! collaborators (config store, field registry, entity metadata, logging).
//! It depends only on `domain` and `shared`.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod config_store;
pub mod entity_metadata;
pub mod field_registry;
pub mod logger;

pub use config_store::*;
pub use entity_metadata::*;
pub use field_registry::*;
pub use logger::*;

// Re-export domain types used in port signatures, so adapter crates
// can implement ports without directly depending on `form-resolver-domain`.
pub use form_resolver_domain::FieldDefinition;
