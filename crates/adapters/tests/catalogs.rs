//! Integration tests for the field and entity catalogs over testkit fixtures.

use form_resolver_adapters::{LayeredFieldRegistry, StaticEntityMetadata};
use form_resolver_ports::{EntityMetadataPort, FieldRegistryPort};
use form_resolver_shared::{ErrorCode, Result};
use form_resolver_testkit::fixtures::{entity_catalog_path, field_catalog_path};
use serde_json::json;

#[test]
fn field_catalog_resolves_through_page_parents() -> Result<()> {
    let registry = LayeredFieldRegistry::from_json_file(&field_catalog_path())?;

    let title = registry
        .field_with_fallbacks("title", "testy_edit", "testy")?
        .ok_or_else(|| missing("title"))?;
    assert_eq!(
        title.form().and_then(|form| form.pointer("/attributes/placeholder")),
        Some(&json!("Edit title"))
    );

    let description = registry
        .field_with_fallbacks("description", "testy_edit", "testy")?
        .ok_or_else(|| missing("description"))?;
    assert_eq!(
        description.form().and_then(|form| form.pointer("/attributes/rows")),
        Some(&json!(6)),
        "parent page layer wins over the entity layer"
    );

    let common = registry
        .field_with_fallbacks("title", "testy_list", "other")?
        .ok_or_else(|| missing("title"))?;
    assert_eq!(
        common.form().and_then(|form| form.pointer("/attributes/placeholder")),
        Some(&json!("Title"))
    );
    Ok(())
}

#[test]
fn field_catalog_filters_names() -> Result<()> {
    let registry = LayeredFieldRegistry::from_json_file(&field_catalog_path())?;
    let names = ["phone", "ghost", "id", "phone"].map(String::from);

    let kept = registry.filter_and_validate_fields(&names, "testy_edit", "testy")?;
    assert_eq!(kept, vec!["phone".to_owned(), "id".to_owned()]);
    Ok(())
}

#[test]
fn entity_catalog_checks_properties_and_getters() -> Result<()> {
    let metadata = StaticEntityMetadata::from_json_file(&entity_catalog_path())?;
    let fqcn = metadata.resolve_entity("testy")?;

    assert_eq!(fqcn, "App\\Features\\Testy\\Entity\\Testy");
    assert!(metadata.has_field(&fqcn, "quantity"));
    assert!(metadata.has_field(&fqcn, "full_name"));
    assert!(metadata.has_field(&fqcn, "archived"));
    assert!(!metadata.has_field(&fqcn, "not_on_entity"));

    let unknown = metadata.resolve_entity("ghost");
    assert!(unknown.is_err_and(|error| error.has_code(&ErrorCode::new("entity", "not_found"))));
    Ok(())
}

fn missing(field: &str) -> form_resolver_shared::ErrorEnvelope {
    form_resolver_shared::ErrorEnvelope::expected(ErrorCode::not_found(), format!("missing {field}"))
}
