//! Structural validation of a normalized form configuration.
//!
//! Checks accumulate into one [`ValidationResult`]; none short-circuits the
//! others. The only early exit is an unresolvable entity, which yields a
//! single `ERR-DEV-TL-004` error. Collaborator failures (store, registry)
//! propagate as `ErrorEnvelope`.

use crate::field_schema::{FieldSchemaError, FieldSchemaValidator};
use crate::normalize::{
    FORM_EXTRA_FIELDS, FORM_HIDDEN_FIELDS, FORM_LAYOUT, NormalizedConfig, RENDER_OPTIONS,
    TOP_LEVEL_KEYS,
};
use crate::render_options::{RenderOptionRules, value_kind};
use form_resolver_domain::{DevCode, ValidationContext, ValidationError, ValidationResult};
use form_resolver_ports::{EntityMetadataPort, FieldRegistryPort, LogFields, LoggerPort};
use form_resolver_shared::ErrorEnvelope;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

const FAILED_EVENT: &str = "formConfig.validate.failed";
const ENTITY_UNRESOLVED_EVENT: &str = "formConfig.validate.entityUnresolved";

/// Where a validation call comes from, carried into logs and messages.
#[derive(Debug, Clone, Copy)]
struct ValidationTarget<'a> {
    page_key: &'a str,
    entity_name: &'a str,
    config_identifier: &'a str,
}

/// Validates structural invariants of a normalized configuration.
pub struct TopLevelConfigValidator {
    field_registry: Arc<dyn FieldRegistryPort>,
    entity_metadata: Arc<dyn EntityMetadataPort>,
    field_schema: FieldSchemaValidator,
    render_options: RenderOptionRules,
    logger: Arc<dyn LoggerPort>,
}

impl TopLevelConfigValidator {
    /// Create a validator.
    #[must_use]
    pub fn new(
        field_registry: Arc<dyn FieldRegistryPort>,
        entity_metadata: Arc<dyn EntityMetadataPort>,
        field_schema: FieldSchemaValidator,
        render_options: RenderOptionRules,
        logger: Arc<dyn LoggerPort>,
    ) -> Self {
        Self {
            field_registry,
            entity_metadata,
            field_schema,
            render_options,
            logger,
        }
    }

    /// Validate `config` for a page and entity.
    pub fn validate(
        &self,
        config: &NormalizedConfig,
        page_key: &str,
        entity_name: &str,
        config_identifier: &str,
    ) -> Result<ValidationResult, ErrorEnvelope> {
        let target = ValidationTarget {
            page_key,
            entity_name,
            config_identifier,
        };

        let fqcn = match self.entity_metadata.resolve_entity(entity_name) {
            Ok(fqcn) => fqcn,
            Err(error) => return Ok(self.entity_unresolved(target, &error)),
        };

        let mut errors = Vec::new();
        check_top_level_keys(config, &mut errors);
        if let Some(render_options) = config.render_options() {
            self.render_options.check(render_options, &mut errors);
        }
        let layout_fields = check_layout(config, &mut errors);
        self.check_fields(&layout_fields, target, &mut errors)?;
        self.check_entity_fields(config, FORM_HIDDEN_FIELDS, &fqcn, &mut errors);
        self.check_entity_fields(config, FORM_EXTRA_FIELDS, &fqcn, &mut errors);

        let mut result = ValidationResult::new();
        result.extend(errors);
        if !result.is_valid() {
            self.log_failures(&result, target);
        }
        Ok(result)
    }

    fn entity_unresolved(&self, target: ValidationTarget<'_>, error: &ErrorEnvelope) -> ValidationResult {
        let validation_error = ValidationError::new(
            DevCode::TopLevelEntityUnresolved,
            format!(
                "Entity '{}' for form '{}' could not be resolved: {}",
                target.entity_name, target.config_identifier, error.message
            ),
        );

        let mut fields = context_fields(&validation_error, target);
        fields.insert("error_code".into(), Value::from(error.code.to_string()));
        self.logger.critical(
            ENTITY_UNRESOLVED_EVENT,
            &validation_error.message,
            Some(fields),
        );

        ValidationResult::single(validation_error)
    }

    fn check_fields(
        &self,
        field_names: &[String],
        target: ValidationTarget<'_>,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), ErrorEnvelope> {
        for name in field_names {
            let definition =
                self.field_registry
                    .field_with_fallbacks(name, target.page_key, target.entity_name)?;
            let Some(definition) = definition else {
                errors.push(ValidationError::new(
                    DevCode::FieldNotFound,
                    format!(
                        "Field '{name}' in form_layout could not be found via FieldRegistryService (page '{}', entity '{}').",
                        target.page_key, target.entity_name
                    ),
                ));
                continue;
            };

            match self.field_schema.validate(
                &definition,
                name,
                target.page_key,
                target.entity_name,
                ValidationContext::Full,
            ) {
                Ok(()) => {},
                Err(FieldSchemaError::Violation(violation)) => {
                    errors.push(ValidationError::new(
                        violation.category.dev_code(),
                        violation.message,
                    ));
                },
                Err(other) => return Err(other.into()),
            }
        }
        Ok(())
    }

    fn check_entity_fields(
        &self,
        config: &NormalizedConfig,
        key: &str,
        fqcn: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let Some(Value::Array(entries)) = config.get(key) else {
            return;
        };
        let (code, label) = if key == FORM_HIDDEN_FIELDS {
            (DevCode::HiddenFieldNotOnEntity, "Hidden")
        } else {
            (DevCode::ExtraFieldNotOnEntity, "Extra")
        };

        for (index, entry) in entries.iter().enumerate() {
            let Some(name) = entry.as_str().filter(|name| !name.trim().is_empty()) else {
                errors.push(ValidationError::new(
                    code,
                    format!("{key}[{index}] must be a field name, got {entry}."),
                ));
                continue;
            };
            if !self.entity_metadata.has_field(fqcn, name) {
                errors.push(ValidationError::new(
                    code,
                    format!(
                        "{label} field '{name}' in {key} not found as a property/getter on entity '{fqcn}'."
                    ),
                ));
            }
        }
    }

    fn log_failures(&self, result: &ValidationResult, target: ValidationTarget<'_>) {
        for error in result.errors() {
            self.logger.critical(
                FAILED_EVENT,
                &error.message,
                Some(context_fields(error, target)),
            );
        }
    }
}

fn context_fields(error: &ValidationError, target: ValidationTarget<'_>) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert("dev_code".into(), Value::from(error.dev_code.as_str()));
    fields.insert("suggestion".into(), Value::from(error.suggestion.as_str()));
    fields.insert(
        "config_identifier".into(),
        Value::from(target.config_identifier),
    );
    fields.insert("pageKey".into(), Value::from(target.page_key));
    fields.insert("entityName".into(), Value::from(target.entity_name));
    fields
}

fn check_top_level_keys(config: &NormalizedConfig, errors: &mut Vec<ValidationError>) {
    for key in config.as_map().keys() {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            errors.push(ValidationError::new(
                DevCode::TopLevelUnknownKey,
                format!("Unexpected top-level key '{key}' in form configuration."),
            ));
        }
    }

    for (key, expected_map) in [
        (RENDER_OPTIONS, true),
        (FORM_HIDDEN_FIELDS, false),
        (FORM_EXTRA_FIELDS, false),
    ] {
        let Some(value) = config.get(key) else {
            continue;
        };
        let fits = if expected_map {
            value.is_object()
        } else {
            value.is_array()
        };
        if !fits {
            errors.push(ValidationError::new(
                DevCode::TopLevelShape,
                format!(
                    "Top-level key '{key}' must be {}, got {}.",
                    if expected_map { "a map" } else { "a list" },
                    value_kind(value)
                ),
            ));
        }
    }
}

/// Check layout structure and return the referenced field names in order,
/// without duplicates.
fn check_layout(config: &NormalizedConfig, errors: &mut Vec<ValidationError>) -> Vec<String> {
    let mut names = Vec::new();
    let Some(layout) = config.get(FORM_LAYOUT) else {
        return names;
    };
    let Some(sections) = layout.as_array() else {
        errors.push(ValidationError::new(
            DevCode::LayoutNotSequence,
            format!("'form_layout' must be a list of sections, got {}.", value_kind(layout)),
        ));
        return names;
    };

    let mut seen = BTreeSet::new();
    let mut has_fields = false;
    for (index, section) in sections.iter().enumerate() {
        let Some(section) = section.as_object() else {
            errors.push(ValidationError::new(
                DevCode::LayoutSectionNotMap,
                format!("form_layout[{index}] must be a map, got {}.", value_kind(section)),
            ));
            continue;
        };

        let label = match section.get("title") {
            None => format!("form_layout[{index}]"),
            Some(Value::String(title)) => format!("Section '{title}' (form_layout[{index}])"),
            Some(other) => {
                errors.push(ValidationError::new(
                    DevCode::LayoutSectionTitle,
                    format!(
                        "form_layout[{index}].title must be a string, got {}.",
                        value_kind(other)
                    ),
                ));
                format!("form_layout[{index}]")
            },
        };

        let Some(fields) = section.get("fields") else {
            errors.push(ValidationError::new(
                DevCode::LayoutSectionMissingFields,
                format!("{label} is missing 'fields'."),
            ));
            continue;
        };
        let Some(fields) = fields.as_array() else {
            errors.push(ValidationError::new(
                DevCode::LayoutFieldsNotSequence,
                format!("{label}: 'fields' must be a list, got {}.", value_kind(fields)),
            ));
            continue;
        };
        has_fields |= !fields.is_empty();

        for (position, entry) in fields.iter().enumerate() {
            let Some(name) = entry.as_str().filter(|name| !name.trim().is_empty()) else {
                errors.push(ValidationError::new(
                    DevCode::LayoutFieldEntry,
                    format!("{label}: fields[{position}] must be a non-empty field name, got {entry}."),
                ));
                continue;
            };
            if seen.insert(name.to_owned()) {
                names.push(name.to_owned());
            } else {
                errors.push(ValidationError::new(
                    DevCode::LayoutDuplicateField,
                    format!("Field '{name}' appears more than once in form_layout."),
                ));
            }
        }
    }

    if !sections.is_empty() && !has_fields {
        errors.push(ValidationError::new(
            DevCode::LayoutEmpty,
            "form_layout has no section with fields; the form would render nothing.",
        ));
    }

    names
}
