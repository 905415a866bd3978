//! Field registry boundary contract.

use form_resolver_domain::FieldDefinition;
use form_resolver_shared::Result;

/// Resolves field definitions through page, entity and common fallbacks.
pub trait FieldRegistryPort: Send + Sync {
    /// Look up a field definition, trying the page first and falling back
    /// to the entity and shared definitions. `Ok(None)` when nothing matches.
    fn field_with_fallbacks(
        &self,
        field_name: &str,
        page_key: &str,
        entity_name: &str,
    ) -> Result<Option<FieldDefinition>>;

    /// Keep only the names that resolve, in input order and without duplicates.
    fn filter_and_validate_fields(
        &self,
        field_names: &[String],
        page_key: &str,
        entity_name: &str,
    ) -> Result<Vec<String>>;
}
