//! End-to-end form resolution over the directory store and catalog fixtures.

use form_resolver_adapters::{DirectoryConfigStore, LayeredFieldRegistry, StaticEntityMetadata};
use form_resolver_app::{ConfigResolutionError, ResolveFormConfigDeps, resolve_form_config};
use form_resolver_domain::{DevCode, PageIdentity};
use form_resolver_shared::ErrorCode;
use form_resolver_testkit::fixtures::{entity_catalog_path, field_catalog_path, store_fixture_root};
use form_resolver_testkit::in_memory::NoopLogger;
use serde_json::json;
use std::error::Error;
use std::sync::Arc;

fn deps() -> Result<ResolveFormConfigDeps, Box<dyn Error>> {
    Ok(ResolveFormConfigDeps::new(
        Arc::new(DirectoryConfigStore::new(store_fixture_root())),
        Arc::new(LayeredFieldRegistry::from_json_file(&field_catalog_path())?),
        Arc::new(StaticEntityMetadata::from_json_file(&entity_catalog_path())?),
        Arc::new(NoopLogger),
    ))
}

fn page(action: &str, entity: &str) -> Result<PageIdentity, Box<dyn Error>> {
    Ok(PageIdentity::new(
        format!("testy_{action}"),
        "testy",
        action,
        "Testy",
        entity,
    )?)
}

#[test]
fn edit_page_merges_normalizes_and_validates() -> Result<(), Box<dyn Error>> {
    let config = resolve_form_config(&deps()?, &page("edit", "testy")?)?;
    let options = config.render_options().ok_or("missing render options")?;

    assert_eq!(options.get("ajax_save"), Some(&json!(true)));
    assert_eq!(options.get("layout_type"), Some(&json!("fieldsets")));
    assert_eq!(options.get("security_level"), Some(&json!("medium")));
    assert_eq!(options.get("error_display"), Some(&json!("inline")));
    assert_eq!(
        options.get("buttons"),
        Some(&json!([{ "type": "submit", "label": "Update" }])),
        "lists are replaced, never merged"
    );
    assert_eq!(
        options.get("themes"),
        Some(&json!({ "default": { "primary": "green", "spacing": "normal" } }))
    );

    assert_eq!(config.form_layout().map(<[_]>::len), Some(2));
    assert_eq!(config.get("form_hidden_fields"), Some(&json!(["id"])));
    assert_eq!(config.get("form_extra_fields"), Some(&json!(["full_name"])));
    Ok(())
}

#[test]
fn toml_page_config_resolves() -> Result<(), Box<dyn Error>> {
    let config = resolve_form_config(&deps()?, &page("list", "testy")?)?;
    let options = config.render_options().ok_or("missing render options")?;

    assert_eq!(options.get("auto_save"), Some(&json!(true)));
    assert_eq!(options.get("error_display"), Some(&json!("summary")));
    assert_eq!(
        config.form_layout(),
        Some(&[json!({ "title": "Summary", "fields": ["title"] })][..])
    );
    Ok(())
}

#[test]
fn missing_page_config_uses_base_only() -> Result<(), Box<dyn Error>> {
    let config = resolve_form_config(&deps()?, &page("show", "testy")?)?;

    assert_eq!(
        config.form_layout(),
        Some(&[json!({ "title": "Main", "fields": ["title", "description"] })][..])
    );
    assert_eq!(
        config
            .render_options()
            .and_then(|options| options.get("ajax_save")),
        Some(&json!(false))
    );
    Ok(())
}

#[test]
fn broken_page_reports_every_problem() -> Result<(), Box<dyn Error>> {
    let Err(error) = resolve_form_config(&deps()?, &page("broken", "testy")?) else {
        return Err("broken page should fail validation".into());
    };

    assert!(matches!(error, ConfigResolutionError::Validation { .. }));
    assert!(
        error
            .to_string()
            .starts_with("Form 'Testy/Config/testy_broken_view.php' Configuration Validation Failed")
    );

    let codes: Vec<DevCode> = error.errors().iter().map(|error| error.dev_code).collect();
    assert_eq!(codes.len(), 8, "unexpected errors: {codes:?}");
    assert_eq!(codes.first(), Some(&DevCode::TopLevelUnknownKey));
    for code in [
        DevCode::RenderOptionUnknown,
        DevCode::RenderOptionSecurityLevel,
        DevCode::RenderOptionErrorDisplay,
        DevCode::LayoutSectionMissingFields,
        DevCode::FieldNotFound,
        DevCode::FieldAttributeValueNotAllowed,
        DevCode::HiddenFieldNotOnEntity,
    ] {
        assert!(codes.contains(&code), "missing {code}");
    }

    let step = error
        .errors()
        .iter()
        .find(|error| error.dev_code == DevCode::FieldAttributeValueNotAllowed)
        .ok_or("missing step error")?;
    assert!(step.message.contains("expected one of [1, 5, 10]"));
    Ok(())
}

#[test]
fn unknown_entity_short_circuits() -> Result<(), Box<dyn Error>> {
    let Err(error) = resolve_form_config(&deps()?, &page("broken", "ghost")?) else {
        return Err("unknown entity should fail".into());
    };

    let codes: Vec<DevCode> = error.errors().iter().map(|error| error.dev_code).collect();
    assert_eq!(codes, vec![DevCode::TopLevelEntityUnresolved]);
    Ok(())
}

#[test]
fn malformed_page_file_is_a_collaborator_error() -> Result<(), Box<dyn Error>> {
    let Err(ConfigResolutionError::Collaborator(error)) =
        resolve_form_config(&deps()?, &page("garbled", "testy")?)
    else {
        return Err("garbled page should fail to parse".into());
    };

    assert_eq!(error.code, ErrorCode::new("config", "invalid_json"));
    Ok(())
}
