//! # form-resolver-adapters
//!
//! Adapter implementations for ports (config store, field registry, entity
//! metadata, logging).
//! This crate depends on `ports`, `domain` and `shared`.

/// Static entity metadata catalog.
pub mod entity_catalog;
/// Layered field registry.
pub mod field_registry;

pub mod config_store;
pub mod log_sink;
pub mod logger;
pub mod tracing_logger;

pub use config_store::DirectoryConfigStore;
pub use entity_catalog::{EntityEntry, StaticEntityMetadata};
pub use field_registry::{FieldCatalog, LayeredFieldRegistry, PageFields, parse_field_catalog_json};
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::JsonLogger;
pub use tracing_logger::TracingLogger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
