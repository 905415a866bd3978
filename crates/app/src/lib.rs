//! # form-resolver-app
//!
//! Application use case resolving a page's form configuration.
//! This crate depends on `config`, `ports`, `domain`, and `shared`.

pub mod resolve_form_config;

pub use resolve_form_config::{ConfigResolutionError, ResolveFormConfigDeps, resolve_form_config};

/// Returns the app crate version.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
