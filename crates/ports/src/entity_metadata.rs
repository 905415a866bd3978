//! Entity metadata boundary contract.

use form_resolver_shared::Result;

/// Resolves entity names and answers field ownership questions.
pub trait EntityMetadataPort: Send + Sync {
    /// Resolve a short entity name to its fully qualified class name.
    ///
    /// Fails when the entity is unknown.
    fn resolve_entity(&self, entity_name: &str) -> Result<String>;

    /// True when the entity exposes `field_name` as a property or getter.
    fn has_field(&self, fqcn: &str, field_name: &str) -> bool;
}
