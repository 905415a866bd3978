//! # form-resolver-domain
//!
//! Domain types for form configuration resolution.
//!
//! - **Page** - `PageIdentity` and the store keys derived from it
//! - **Context** - `ValidationContext` (list, form, full)
//! - **Field** - `FieldDefinition` as served by the field registry
//! - **Diagnostics** - `DevCode`, `ValidationError`, `ValidationResult`
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use form_resolver_shared::shared_crate_version;

pub mod context;
pub mod diagnostics;
pub mod field;
pub mod page;

pub use context::{InvalidContextError, ValidationContext};
pub use diagnostics::{DevCode, ValidationError, ValidationResult};
pub use field::{FORM_SECTION, FieldDefinition, LIST_SECTION, VALIDATORS_SECTION};
pub use page::{PageIdentity, PageIdentityError};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
