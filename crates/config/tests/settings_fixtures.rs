//! Integration tests for parsing resolver settings fixtures from the testkit.

use form_resolver_config::{parse_resolver_settings_json, parse_resolver_settings_toml};
use form_resolver_shared::ErrorCode;
use form_resolver_testkit::fixtures::fixture_root;
use serde_json::json;
use std::error::Error;
use std::fs;

fn read_fixture(relative: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(fixture_root().join(relative))?)
}

#[test]
fn parses_toml_fixture_and_normalizes_key_lists() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("settings/resolver.valid.toml")?;
    let settings = parse_resolver_settings_toml(&contents)?;

    assert_eq!(settings.base_config_key, "view.form", "key should be trimmed");
    assert_eq!(
        settings.normalizer.boolean_keys,
        vec![
            "ajax_save",
            "auto_save",
            "force_captcha",
            "html5_validation",
            "inline_help",
            "show_error_container",
        ]
    );
    assert!(settings.normalizer.is_boolean_key("inline_help"));
    assert_eq!(
        settings.normalizer.defaults.get("security_level"),
        Some(&json!("medium"))
    );
    assert_eq!(
        settings.render_options.extra_keys,
        vec!["analytics", "tracking_code"]
    );
    Ok(())
}

#[test]
fn parses_json_fixture_with_defaults() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("settings/resolver.valid.json")?;
    let settings = parse_resolver_settings_json(&contents)?;

    assert_eq!(settings.schema_key, "forms/schema");
    assert!(settings.normalizer.is_boolean_key("ajax_save"));
    assert_eq!(
        settings.normalizer.defaults.get("layout_type"),
        Some(&json!("sequential"))
    );
    Ok(())
}

#[test]
fn rejects_enum_default_outside_its_values() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("settings/resolver.invalid-default.json")?;
    let Err(error) = parse_resolver_settings_json(&contents) else {
        return Err("invalid default should be rejected".into());
    };

    assert_eq!(error.code, ErrorCode::new("config", "invalid_settings"));
    assert_eq!(
        error.metadata.get("key").map(String::as_str),
        Some("security_level")
    );
    Ok(())
}

#[test]
fn rejects_unknown_settings_fields() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("settings/resolver.unknown-field.json")?;
    let Err(error) = parse_resolver_settings_json(&contents) else {
        return Err("unknown field should be rejected".into());
    };

    assert_eq!(error.code, ErrorCode::new("config", "invalid_json"));
    assert!(error.message.contains("pageConfigSuffix"));
    Ok(())
}
