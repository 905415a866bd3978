//! Resolve a page's form configuration: load, merge, normalize, validate.

use form_resolver_config::{
    ConfigNormalizer, FieldSchemaValidator, NormalizedConfig, RenderOptionRules, ResolverSettings,
    TOP_LEVEL_KEYS, TopLevelConfigValidator, deep_merge, empty_top_level_value, value_kind,
};
use form_resolver_domain::{PageIdentity, ValidationError};
use form_resolver_ports::{ConfigStorePort, EntityMetadataPort, FieldRegistryPort, LoggerPort};
use form_resolver_shared::{ErrorCode, ErrorEnvelope};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Dependencies required by form config resolution.
#[derive(Clone)]
pub struct ResolveFormConfigDeps {
    /// Source of base config, page config and field schema.
    pub config_store: Arc<dyn ConfigStorePort>,
    /// Field lookup with page/entity/common fallbacks.
    pub field_registry: Arc<dyn FieldRegistryPort>,
    /// Entity class resolution and field ownership.
    pub entity_metadata: Arc<dyn EntityMetadataPort>,
    /// Receives coercion warnings and validation failures.
    pub logger: Arc<dyn LoggerPort>,
    /// Validated resolver settings.
    pub settings: ResolverSettings,
}

impl ResolveFormConfigDeps {
    /// Build dependencies with default settings.
    pub fn new(
        config_store: Arc<dyn ConfigStorePort>,
        field_registry: Arc<dyn FieldRegistryPort>,
        entity_metadata: Arc<dyn EntityMetadataPort>,
        logger: Arc<dyn LoggerPort>,
    ) -> Self {
        Self {
            config_store,
            field_registry,
            entity_metadata,
            logger,
            settings: ResolverSettings::default(),
        }
    }

    /// Replace the settings after validating them.
    pub fn with_settings(mut self, settings: ResolverSettings) -> Result<Self, ErrorEnvelope> {
        self.settings = settings.validate_and_normalize()?;
        Ok(self)
    }
}

/// Failure of a resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResolutionError {
    /// The resolved configuration failed validation.
    Validation {
        /// `{pageFeature}/Config/{pageKey}_view.php`.
        config_identifier: String,
        /// Every accumulated error, in discovery order.
        errors: Vec<ValidationError>,
    },
    /// A collaborator failed or returned a malformed payload.
    Collaborator(ErrorEnvelope),
}

impl ConfigResolutionError {
    /// Validation errors, empty for collaborator failures.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation { errors, .. } => errors,
            Self::Collaborator(_) => &[],
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::new("formConfig", "validation_failed"),
            Self::Collaborator(error) => error.code.clone(),
        }
    }
}

impl fmt::Display for ConfigResolutionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation {
                config_identifier,
                errors,
            } => write!(
                formatter,
                "Form '{config_identifier}' Configuration Validation Failed: {} error(s)",
                errors.len()
            ),
            Self::Collaborator(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for ConfigResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Collaborator(error) => Some(error),
            Self::Validation { .. } => None,
        }
    }
}

impl From<ErrorEnvelope> for ConfigResolutionError {
    fn from(error: ErrorEnvelope) -> Self {
        Self::Collaborator(error)
    }
}

impl From<ConfigResolutionError> for ErrorEnvelope {
    fn from(error: ConfigResolutionError) -> Self {
        let code = error.error_code();
        match error {
            ConfigResolutionError::Collaborator(envelope) => envelope,
            ConfigResolutionError::Validation {
                ref config_identifier,
                ref errors,
            } => {
                let dev_codes = errors
                    .iter()
                    .map(|error| error.dev_code.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                Self::expected(code, error.to_string())
                    .with_metadata("configIdentifier", config_identifier.as_str())
                    .with_metadata("errorCount", errors.len().to_string())
                    .with_metadata("devCodes", dev_codes)
            },
        }
    }
}

/// Load, merge, normalize and validate the form configuration of `page`.
///
/// Returns the normalized configuration only when validation produced no
/// errors.
#[tracing::instrument(
    name = "resolve_form_config",
    skip_all,
    fields(page_key = page.page_key(), feature = page.page_feature())
)]
pub fn resolve_form_config(
    deps: &ResolveFormConfigDeps,
    page: &PageIdentity,
) -> Result<NormalizedConfig, ConfigResolutionError> {
    let settings = &deps.settings;

    let base_key = settings.base_config_key.as_str();
    let base = payload_map(deps.config_store.get(base_key)?, base_key)?;
    let page_key = page.page_config_key();
    let page_config = payload_map(
        deps.config_store
            .get_from_feature(page.page_feature(), &page_key)?,
        &page_key,
    )?;

    let merged = deep_merge(with_top_level_defaults(base), page_config);
    let normalized = ConfigNormalizer::new(settings.normalizer.clone(), Arc::clone(&deps.logger))
        .normalize(merged);

    let validator = TopLevelConfigValidator::new(
        Arc::clone(&deps.field_registry),
        Arc::clone(&deps.entity_metadata),
        FieldSchemaValidator::new(Arc::clone(&deps.config_store), settings.schema_key.clone()),
        RenderOptionRules::from_settings(settings),
        Arc::clone(&deps.logger),
    );
    let config_identifier = page.config_identifier();
    let result = validator.validate(
        &normalized,
        page.page_key(),
        page.page_entity(),
        &config_identifier,
    )?;

    if result.is_valid() {
        tracing::debug!(config_identifier = %config_identifier, "form configuration resolved");
        Ok(normalized)
    } else {
        Err(ConfigResolutionError::Validation {
            config_identifier,
            errors: result.into_errors(),
        })
    }
}

/// Absent or null payloads are empty; anything but a map is malformed.
fn payload_map(payload: Option<Value>, key: &str) -> Result<Map<String, Value>, ErrorEnvelope> {
    match payload {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_payload"),
            format!("config '{key}' must be a map"),
        )
        .with_metadata("key", key)
        .with_metadata("found", value_kind(&other))),
    }
}

/// Fills absent recognized keys. Base side only: an injected `[]` in the
/// override would replace the base list.
fn with_top_level_defaults(mut config: Map<String, Value>) -> Map<String, Value> {
    for key in TOP_LEVEL_KEYS {
        if !config.contains_key(key) {
            if let Some(empty) = empty_top_level_value(key) {
                config.insert(key.to_owned(), empty);
            }
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_resolver_domain::DevCode;
    use form_resolver_ports::LogLevel;
    use form_resolver_testkit::errors::store_io_error;
    use form_resolver_testkit::in_memory::{
        InMemoryConfigStore, InMemoryEntityMetadata, InMemoryFieldRegistry, RecordingLogger,
    };
    use serde_json::json;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn page() -> std::result::Result<PageIdentity, Box<dyn std::error::Error>> {
        Ok(PageIdentity::new("testy_edit", "testy", "edit", "Testy", "testy")?)
    }

    fn schema() -> Value {
        json!({
            "global": { "placeholder": { "values": "string" } },
            "text": { "maxlength": { "values": "int" } }
        })
    }

    fn deps(store: InMemoryConfigStore, logger: &RecordingLogger) -> ResolveFormConfigDeps {
        ResolveFormConfigDeps::new(
            Arc::new(store),
            Arc::new(
                InMemoryFieldRegistry::new()
                    .with_common_field("title", json!({ "form": { "type": "text" } })),
            ),
            Arc::new(InMemoryEntityMetadata::new().with_entity(
                "testy",
                "App\\Entity\\Testy",
                ["id", "title"],
            )),
            Arc::new(logger.clone()),
        )
    }

    #[test]
    fn empty_store_resolves_to_defaults() -> TestResult {
        let logger = RecordingLogger::new();
        let deps = deps(InMemoryConfigStore::new().with("forms/schema", schema()), &logger);

        let config = resolve_form_config(&deps, &page()?)?;
        for key in TOP_LEVEL_KEYS {
            assert!(config.get(key).is_some(), "missing {key}");
        }
        assert_eq!(
            config.render_options().and_then(|options| options.get("security_level")),
            Some(&json!("low"))
        );
        assert!(logger.events().is_empty());
        Ok(())
    }

    #[test]
    fn page_override_merges_over_base() -> TestResult {
        let logger = RecordingLogger::new();
        let store = InMemoryConfigStore::new()
            .with("forms/schema", schema())
            .with(
                "view.form",
                json!({
                    "render_options": { "buttons": [1, 2], "themes": { "a": { "x": 1 } } },
                    "form_layout": [{ "title": "Base", "fields": ["title"] }],
                    "form_hidden_fields": ["id"]
                }),
            )
            .with_feature(
                "Testy",
                "testy_view_edit",
                json!({ "render_options": { "buttons": [3], "themes": { "a": { "y": 2 } } } }),
            );
        let deps = deps(store, &logger);

        let config = resolve_form_config(&deps, &page()?)?;
        let options = config.render_options().ok_or("missing render options")?;
        assert_eq!(options.get("buttons"), Some(&json!([3])));
        assert_eq!(options.get("themes"), Some(&json!({ "a": { "x": 1, "y": 2 } })));
        assert_eq!(config.get("form_hidden_fields"), Some(&json!(["id"])));
        Ok(())
    }

    #[test]
    fn page_without_layout_keeps_base_layout() -> TestResult {
        let logger = RecordingLogger::new();
        let store = InMemoryConfigStore::new()
            .with("forms/schema", schema())
            .with(
                "view.form",
                json!({
                    "form_layout": [{ "title": "Base", "fields": ["title"] }],
                    "form_hidden_fields": ["id"],
                    "form_extra_fields": ["title"]
                }),
            )
            .with_feature(
                "Testy",
                "testy_view_edit",
                json!({ "render_options": { "ajax_save": true } }),
            );
        let deps = deps(store, &logger);

        let config = resolve_form_config(&deps, &page()?)?;
        assert_eq!(
            config.get("form_layout"),
            Some(&json!([{ "title": "Base", "fields": ["title"] }]))
        );
        assert_eq!(config.get("form_hidden_fields"), Some(&json!(["id"])));
        assert_eq!(config.get("form_extra_fields"), Some(&json!(["title"])));
        Ok(())
    }

    #[test]
    fn broken_base_config_is_validated_without_page_config() -> TestResult {
        let logger = RecordingLogger::new();
        let store = InMemoryConfigStore::new().with("forms/schema", schema()).with(
            "view.form",
            json!({
                "form_layout": [{
                    "title": "Base",
                    "fields": ["title"]
                }],
                "form_hidden_fields": ["secret"]
            }),
        );
        let deps = deps(store, &logger);

        let Err(error) = resolve_form_config(&deps, &page()?) else {
            return Err("expected a validation failure".into());
        };
        assert!(error.errors().iter().any(|error| error.dev_code == DevCode::HiddenFieldNotOnEntity));
        Ok(())
    }

    #[test]
    fn validation_failure_carries_every_error() -> TestResult {
        let logger = RecordingLogger::new();
        let store = InMemoryConfigStore::new()
            .with("forms/schema", schema())
            .with_feature(
                "Testy",
                "testy_view_edit",
                json!({
                    "render_options": { "security_level": "extreme" },
                    "form_layout": [{ "title": "A", "fields": [] }],
                    "surprise_key": "x"
                }),
            );
        let deps = deps(store, &logger);

        let Err(error) = resolve_form_config(&deps, &page()?) else {
            return Err("expected a validation failure".into());
        };
        assert_eq!(
            error.to_string(),
            "Form 'Testy/Config/testy_edit_view.php' Configuration Validation Failed: 3 error(s)"
        );
        let codes: Vec<DevCode> = error.errors().iter().map(|error| error.dev_code).collect();
        assert_eq!(
            codes,
            vec![
                DevCode::TopLevelUnknownKey,
                DevCode::RenderOptionSecurityLevel,
                DevCode::LayoutEmpty,
            ]
        );
        assert_eq!(logger.events_at(LogLevel::Critical).len(), 3);

        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.code, ErrorCode::new("formConfig", "validation_failed"));
        assert_eq!(envelope.metadata.get("errorCount").map(String::as_str), Some("3"));
        Ok(())
    }

    #[test]
    fn non_map_payload_is_a_collaborator_error() -> TestResult {
        let logger = RecordingLogger::new();
        let store = InMemoryConfigStore::new()
            .with("forms/schema", schema())
            .with("view.form", json!(["not", "a", "map"]));
        let deps = deps(store, &logger);

        let result = resolve_form_config(&deps, &page()?);
        assert!(matches!(
            result,
            Err(ConfigResolutionError::Collaborator(ref error))
                if error.has_code(&ErrorCode::new("config", "invalid_payload"))
        ));
        Ok(())
    }

    #[test]
    fn store_failures_propagate_unchanged() -> TestResult {
        let logger = RecordingLogger::new();
        let store = InMemoryConfigStore::new().with_failure("view.form", store_io_error("view.form"));
        let deps = deps(store, &logger);

        let Err(ConfigResolutionError::Collaborator(error)) = resolve_form_config(&deps, &page()?)
        else {
            return Err("expected a collaborator failure".into());
        };
        assert_eq!(error.code, ErrorCode::io());
        Ok(())
    }

    #[test]
    fn missing_schema_fails_the_call() -> TestResult {
        let logger = RecordingLogger::new();
        let store = InMemoryConfigStore::new().with(
            "view.form",
            json!({ "form_layout": [{ "title": "A", "fields": ["title"] }] }),
        );
        let deps = deps(store, &logger);

        let Err(ConfigResolutionError::Collaborator(error)) = resolve_form_config(&deps, &page()?)
        else {
            return Err("expected a collaborator failure".into());
        };
        assert!(error.message.contains("forms/schema"));
        Ok(())
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let logger = RecordingLogger::new();
        let settings = ResolverSettings {
            schema_key: " ".to_owned(),
            ..ResolverSettings::default()
        };
        let result = deps(InMemoryConfigStore::new(), &logger).with_settings(settings);
        assert!(result.is_err());
    }
}
