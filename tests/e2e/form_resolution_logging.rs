//! End-to-end logging of form resolution through the JSON logger.

use form_resolver_adapters::{
    DirectoryConfigStore, JsonLogger, LayeredFieldRegistry, MemoryLogSink, StaticEntityMetadata,
};
use form_resolver_app::{ResolveFormConfigDeps, resolve_form_config};
use form_resolver_domain::PageIdentity;
use form_resolver_ports::LogLevel;
use form_resolver_testkit::fixtures::{entity_catalog_path, field_catalog_path, store_fixture_root};
use serde_json::{Value, json};
use std::error::Error;
use std::sync::Arc;

fn deps(sink: Arc<MemoryLogSink>) -> Result<ResolveFormConfigDeps, Box<dyn Error>> {
    Ok(ResolveFormConfigDeps::new(
        Arc::new(DirectoryConfigStore::new(store_fixture_root())),
        Arc::new(LayeredFieldRegistry::from_json_file(&field_catalog_path())?),
        Arc::new(StaticEntityMetadata::from_json_file(&entity_catalog_path())?),
        Arc::new(JsonLogger::new(sink).with_min_level(LogLevel::Debug)),
    ))
}

fn payloads(sink: &MemoryLogSink) -> Result<Vec<Value>, serde_json::Error> {
    sink.take()
        .iter()
        .map(|line| serde_json::from_str(line.trim()))
        .collect()
}

#[test]
fn coercion_emits_one_warning_per_key() -> Result<(), Box<dyn Error>> {
    let sink = Arc::new(MemoryLogSink::new());
    let page = PageIdentity::new("testy_edit", "testy", "edit", "Testy", "testy")?;
    resolve_form_config(&deps(sink.clone())?, &page)?;

    let payloads = payloads(&sink)?;
    assert_eq!(payloads.len(), 1, "unexpected log lines: {payloads:?}");
    let warning = payloads.first().ok_or("missing warning")?;
    assert_eq!(warning.get("level"), Some(&json!("warn")));
    assert_eq!(warning.get("event"), Some(&json!("formConfig.normalize.coerced")));
    assert!(
        warning
            .get("message")
            .and_then(Value::as_str)
            .is_some_and(|message| message.contains("ajax_save"))
    );
    Ok(())
}

#[test]
fn validation_failures_are_logged_at_critical() -> Result<(), Box<dyn Error>> {
    let sink = Arc::new(MemoryLogSink::new());
    let page = PageIdentity::new("testy_broken", "testy", "broken", "Testy", "testy")?;
    let Err(error) = resolve_form_config(&deps(sink.clone())?, &page) else {
        return Err("broken page should fail".into());
    };

    let critical: Vec<Value> = payloads(&sink)?
        .into_iter()
        .filter(|payload| payload.get("level") == Some(&json!("critical")))
        .collect();
    assert_eq!(critical.len(), error.errors().len());
    for payload in &critical {
        assert_eq!(payload.get("event"), Some(&json!("formConfig.validate.failed")));
        assert_eq!(
            payload.pointer("/fields/config_identifier"),
            Some(&json!("Testy/Config/testy_broken_view.php"))
        );
        assert_eq!(payload.pointer("/fields/pageKey"), Some(&json!("testy_broken")));
        assert_eq!(payload.pointer("/fields/entityName"), Some(&json!("testy")));
        assert!(payload.pointer("/fields/dev_code").is_some());
        assert!(payload.pointer("/fields/suggestion").is_some());
    }
    Ok(())
}
