//! Per-field schema validation.
//!
//! One field definition is checked against the type-keyed [`FormSchema`] for a
//! [`ValidationContext`]. The first structural violation ends the check; the
//! caller decides whether to continue with other fields.
//!
//! Pass order:
//! 1. load the schema (missing schema is a contract failure)
//! 2. `list` section (contexts `list`, `full`)
//! 3. `form` section (contexts `form`, `full`)
//! 4. `validators` section (contexts `form`, `full`)

use crate::form_schema::{AttributeResolution, FormSchema, Rule, RuleMismatch};
use form_resolver_domain::{DevCode, FieldDefinition, ValidationContext};
use form_resolver_ports::ConfigStorePort;
use form_resolver_shared::{ErrorCode, ErrorEnvelope};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const LIST_KEYS: &[&str] = &["sortable", "formatter", "formatters"];

/// Keys allowed directly under `form` besides attributes.
const FORM_STRUCTURAL_KEYS: &[&str] = &[
    "type",
    "attributes",
    "region",
    "label",
    "help_text",
    "options",
    "default_value",
    "show_label",
    "formatters",
];

/// Rules accepted under `validators.<type>` for every type.
const GENERIC_VALIDATOR_RULES: &[&str] = &["required", "message", "nullable", "trim"];

const MESSAGE_SUFFIX: &str = "_message";

/// Logical category of a field schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationCategory {
    /// Unknown keys under `list`.
    ListUnknownKeys,
    /// `formatter` and `formatters` both under `list`.
    ListFormatterConflict,
    /// `list.sortable` not a boolean.
    ListSortableType,
    /// No `form` section.
    FormSectionMissing,
    /// No `form.type`.
    FormTypeMissing,
    /// `form.type` not in the schema.
    FormTypeUnknown,
    /// Attribute placed directly under `form`.
    AttributeMisplaced,
    /// Attribute explicitly disallowed for the type.
    AttributeDisallowed,
    /// Attribute unknown to type and global rules.
    AttributeUnknown,
    /// Attribute value of the wrong primitive type.
    AttributeValueType,
    /// Attribute value outside the enumerated literals.
    AttributeValueNotAllowed,
    /// `form.formatters` on a non-`tel` type.
    FormattersNotAllowed,
    /// Unknown form-level key under `form`.
    FormKeyUnknown,
    /// Unknown rule under `validators.<type>`.
    ValidatorUnknown,
    /// Validator rule value of the wrong type.
    ValidatorValue,
    /// Rule declared as attribute and validator.
    ValidationRuleDuplicated,
    /// A section that must be a map is not.
    SectionShape,
}

impl ViolationCategory {
    /// Developer code reported for the category.
    #[must_use]
    pub const fn dev_code(self) -> DevCode {
        match self {
            Self::ListUnknownKeys => DevCode::FieldListUnknownKeys,
            Self::ListFormatterConflict => DevCode::FieldListFormatterConflict,
            Self::ListSortableType => DevCode::FieldListSortableType,
            Self::FormSectionMissing => DevCode::FieldFormSectionMissing,
            Self::FormTypeMissing => DevCode::FieldFormTypeMissing,
            Self::FormTypeUnknown => DevCode::FieldFormTypeUnknown,
            Self::AttributeMisplaced => DevCode::FieldAttributeMisplaced,
            Self::AttributeDisallowed => DevCode::FieldAttributeDisallowed,
            Self::AttributeUnknown => DevCode::FieldAttributeUnknown,
            Self::AttributeValueType => DevCode::FieldAttributeValueType,
            Self::AttributeValueNotAllowed => DevCode::FieldAttributeValueNotAllowed,
            Self::FormattersNotAllowed => DevCode::FieldFormattersNotAllowed,
            Self::FormKeyUnknown => DevCode::FieldFormKeyUnknown,
            Self::ValidatorUnknown => DevCode::FieldValidatorUnknown,
            Self::ValidatorValue => DevCode::FieldValidatorValue,
            Self::ValidationRuleDuplicated => DevCode::FieldValidationRuleDuplicated,
            Self::SectionShape => DevCode::FieldSectionShape,
        }
    }

    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListUnknownKeys => "list_unknown_keys",
            Self::ListFormatterConflict => "list_formatter_conflict",
            Self::ListSortableType => "list_sortable_type",
            Self::FormSectionMissing => "form_section_missing",
            Self::FormTypeMissing => "form_type_missing",
            Self::FormTypeUnknown => "form_type_unknown",
            Self::AttributeMisplaced => "attribute_misplaced",
            Self::AttributeDisallowed => "attribute_disallowed",
            Self::AttributeUnknown => "attribute_unknown",
            Self::AttributeValueType => "attribute_value_type",
            Self::AttributeValueNotAllowed => "attribute_value_not_allowed",
            Self::FormattersNotAllowed => "formatters_not_allowed",
            Self::FormKeyUnknown => "form_key_unknown",
            Self::ValidatorUnknown => "validator_unknown",
            Self::ValidatorValue => "validator_value",
            Self::ValidationRuleDuplicated => "validation_rule_duplicated",
            Self::SectionShape => "section_shape",
        }
    }
}

/// A structural violation found in one field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name.
    pub field: String,
    /// Page key the field was resolved for.
    pub page_key: String,
    /// Entity name the field was resolved for.
    pub entity_name: String,
    /// Logical category.
    pub category: ViolationCategory,
    /// Human-readable message.
    pub message: String,
}

/// Failures raised while validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSchemaError {
    /// The schema key resolved to nothing.
    SchemaNotFound {
        /// Store key of the schema.
        key: String,
    },
    /// The schema payload does not describe rules.
    InvalidSchema {
        /// Store key of the schema.
        key: String,
        /// Parse failure.
        reason: String,
    },
    /// The config store failed.
    Store(ErrorEnvelope),
    /// The field definition breaks the schema.
    Violation(FieldViolation),
}

impl FieldSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::SchemaNotFound { .. } => ErrorCode::new("config", "schema_not_found"),
            Self::InvalidSchema { .. } => ErrorCode::new("config", "invalid_schema"),
            Self::Store(envelope) => envelope.code.clone(),
            Self::Violation(_) => ErrorCode::new("config", "field_schema_violation"),
        }
    }
}

impl fmt::Display for FieldSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaNotFound { key } => write!(formatter, "Form schema ({key}.php) not found"),
            Self::InvalidSchema { key, reason } => {
                write!(formatter, "Form schema ({key}) is invalid: {reason}")
            },
            Self::Store(envelope) => write!(formatter, "{envelope}"),
            Self::Violation(violation) => formatter.write_str(&violation.message),
        }
    }
}

impl std::error::Error for FieldSchemaError {}

impl From<FieldSchemaError> for ErrorEnvelope {
    fn from(error: FieldSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        match error {
            FieldSchemaError::SchemaNotFound { key } => {
                Self::expected(code, message).with_metadata("schemaKey", key)
            },
            FieldSchemaError::InvalidSchema { key, .. } => {
                Self::expected(code, message).with_metadata("schemaKey", key)
            },
            FieldSchemaError::Store(envelope) => envelope,
            FieldSchemaError::Violation(violation) => Self::expected(code, message)
                .with_metadata("field", violation.field)
                .with_metadata("pageKey", violation.page_key)
                .with_metadata("entityName", violation.entity_name)
                .with_metadata("category", violation.category.as_str())
                .with_metadata("dev_code", violation.category.dev_code().as_str()),
        }
    }
}

type Checked = Result<(), (ViolationCategory, String)>;

fn fail(category: ViolationCategory, message: String) -> Checked {
    Err((category, message))
}

/// Validates single field definitions against the stored schema.
#[derive(Clone)]
pub struct FieldSchemaValidator {
    store: Arc<dyn ConfigStorePort>,
    schema_key: String,
}

impl FieldSchemaValidator {
    /// Create a validator reading the schema at `schema_key`.
    pub fn new(store: Arc<dyn ConfigStorePort>, schema_key: impl Into<String>) -> Self {
        Self {
            store,
            schema_key: schema_key.into(),
        }
    }

    /// Load and parse the schema.
    pub fn load_schema(&self) -> Result<FormSchema, FieldSchemaError> {
        let raw = self
            .store
            .get(&self.schema_key)
            .map_err(FieldSchemaError::Store)?
            .ok_or_else(|| FieldSchemaError::SchemaNotFound {
                key: self.schema_key.clone(),
            })?;

        FormSchema::from_value(raw).map_err(|error| FieldSchemaError::InvalidSchema {
            key: self.schema_key.clone(),
            reason: error.to_string(),
        })
    }

    /// Validate one field definition for `context`.
    pub fn validate(
        &self,
        field: &FieldDefinition,
        field_name: &str,
        page_key: &str,
        entity_name: &str,
        context: ValidationContext,
    ) -> Result<(), FieldSchemaError> {
        let schema = self.load_schema()?;

        check_field(&schema, field, field_name, context).map_err(|(category, message)| {
            FieldSchemaError::Violation(FieldViolation {
                field: field_name.to_owned(),
                page_key: page_key.to_owned(),
                entity_name: entity_name.to_owned(),
                category,
                message,
            })
        })
    }
}

fn check_field(
    schema: &FormSchema,
    field: &FieldDefinition,
    name: &str,
    context: ValidationContext,
) -> Checked {
    if context.includes_list() {
        if let Some(list) = field.list() {
            check_list(list, name)?;
        }
    }

    if context.includes_form() {
        let form = check_form(schema, field.form(), name, context)?;
        if let Some(validators) = field.validators() {
            check_validators(schema, validators, form, name)?;
        }
    }

    Ok(())
}

fn check_list(list: &Value, name: &str) -> Checked {
    let Some(list) = list.as_object() else {
        return fail(
            ViolationCategory::SectionShape,
            format!("Field '{name}': section 'list' must be a map, got {list}."),
        );
    };

    let unknown: Vec<&str> = list
        .keys()
        .map(String::as_str)
        .filter(|key| !LIST_KEYS.contains(key))
        .collect();
    if !unknown.is_empty() {
        return fail(
            ViolationCategory::ListUnknownKeys,
            format!(
                "Field '{name}' has unknown keys in 'list': {}. Allowed: {}.",
                bracketed(&unknown),
                LIST_KEYS.join(", ")
            ),
        );
    }

    if list.contains_key("formatter") && list.contains_key("formatters") {
        return fail(
            ViolationCategory::ListFormatterConflict,
            format!(
                "Field '{name}' declares BOTH 'formatter' (singular) AND 'formatters' (plural) under 'list'; keep only one."
            ),
        );
    }

    if let Some(sortable) = list.get("sortable") {
        if !sortable.is_boolean() {
            return fail(
                ViolationCategory::ListSortableType,
                format!("Field '{name}': 'list.sortable' must be a boolean, got {sortable}."),
            );
        }
    }

    Ok(())
}

fn check_form<'a>(
    schema: &FormSchema,
    form: Option<&'a Value>,
    name: &str,
    context: ValidationContext,
) -> Result<&'a Map<String, Value>, (ViolationCategory, String)> {
    let Some(form) = form else {
        return Err((
            ViolationCategory::FormSectionMissing,
            format!("Field '{name}' is missing 'form' section (required for context '{context}')."),
        ));
    };
    let Some(form) = form.as_object() else {
        return Err((
            ViolationCategory::SectionShape,
            format!("Field '{name}': section 'form' must be a map, got {form}."),
        ));
    };

    let form_type = form
        .get("type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let Some(form_type) = form_type else {
        return Err((
            ViolationCategory::FormTypeMissing,
            format!("Field '{name}' has a 'form' section but no 'type' defined."),
        ));
    };
    if schema.form_type(form_type).is_none() {
        let known: Vec<&str> = schema.types.keys().map(String::as_str).collect();
        return Err((
            ViolationCategory::FormTypeUnknown,
            format!(
                "Field '{name}' uses unknown form type '{form_type}'. Known types: {}.",
                bracketed(&known)
            ),
        ));
    }

    let stray: Vec<&str> = form
        .keys()
        .map(String::as_str)
        .filter(|key| !FORM_STRUCTURAL_KEYS.contains(key))
        .collect();
    let (misplaced, unknown_keys): (Vec<&str>, Vec<&str>) = stray.into_iter().partition(|key| {
        schema.resolve_attribute(form_type, key) != AttributeResolution::Unknown
    });
    if !misplaced.is_empty() {
        return Err((
            ViolationCategory::AttributeMisplaced,
            format!(
                "Field '{name}': attribute(s) {} found directly under 'form'; move them under 'form.attributes'.",
                bracketed(&misplaced)
            ),
        ));
    }

    if let Some(attributes) = form.get("attributes") {
        check_attributes(schema, form_type, attributes, name)?;
    }

    if form.contains_key("formatters") && form_type != "tel" {
        return Err((
            ViolationCategory::FormattersNotAllowed,
            format!(
                "Field '{name}': 'form.formatters' is only allowed for 'tel' type (got '{form_type}')."
            ),
        ));
    }

    if !unknown_keys.is_empty() {
        return Err((
            ViolationCategory::FormKeyUnknown,
            format!(
                "Field '{name}' has unknown form-level configuration key(s) under 'form': {}.",
                bracketed(&unknown_keys)
            ),
        ));
    }

    Ok(form)
}

fn check_attributes(schema: &FormSchema, form_type: &str, attributes: &Value, name: &str) -> Checked {
    let Some(attributes) = attributes.as_object() else {
        return fail(
            ViolationCategory::SectionShape,
            format!("Field '{name}': 'form.attributes' must be a map, got {attributes}."),
        );
    };

    let mut resolved: Vec<(&str, &Rule, &Value)> = Vec::new();
    let mut unknown: Vec<&str> = Vec::new();
    for (attribute, value) in attributes {
        match schema.resolve_attribute(form_type, attribute) {
            AttributeResolution::Disallowed => {
                return fail(
                    ViolationCategory::AttributeDisallowed,
                    format!(
                        "Field '{name}': attribute '{attribute}' is explicitly disallowed for type '{form_type}'."
                    ),
                );
            },
            AttributeResolution::Unknown => unknown.push(attribute.as_str()),
            AttributeResolution::Rule(rule) => resolved.push((attribute.as_str(), rule, value)),
        }
    }

    if !unknown.is_empty() {
        return fail(
            ViolationCategory::AttributeUnknown,
            format!(
                "Field '{name}' has unknown attributes in 'form.attributes': {} (type '{form_type}').",
                bracketed(&unknown)
            ),
        );
    }

    for (attribute, rule, value) in resolved {
        rule.check(value).or_else(|mismatch| {
            let (category, detail) = match mismatch {
                RuleMismatch::Type(detail) => (ViolationCategory::AttributeValueType, detail),
                RuleMismatch::NotAllowed(detail) => {
                    (ViolationCategory::AttributeValueNotAllowed, detail)
                },
            };
            fail(
                category,
                format!("Field '{name}': Invalid value for '{attribute}': {detail}."),
            )
        })?;
    }

    Ok(())
}

fn check_validators(
    schema: &FormSchema,
    validators: &Value,
    form: &Map<String, Value>,
    name: &str,
) -> Checked {
    let Some(validators) = validators.as_object() else {
        return fail(
            ViolationCategory::SectionShape,
            format!("Field '{name}': section 'validators' must be a map, got {validators}."),
        );
    };
    let attributes = form.get("attributes").and_then(Value::as_object);

    for (validator_type, rules) in validators {
        let Some(rules) = rules.as_object() else {
            return fail(
                ViolationCategory::SectionShape,
                format!("Field '{name}': 'validators.{validator_type}' must be a map, got {rules}."),
            );
        };
        let type_rules = schema
            .form_type(validator_type)
            .map(|type_schema| &type_schema.default_validation_rules);

        let unknown: Vec<&str> = rules
            .keys()
            .map(String::as_str)
            .filter(|rule| !is_accepted_rule(type_rules, rule))
            .collect();
        if !unknown.is_empty() {
            return fail(
                ViolationCategory::ValidatorUnknown,
                format!(
                    "Field '{name}' has unknown validator options in 'validators.{validator_type}': {}.",
                    bracketed(&unknown)
                ),
            );
        }

        for (rule_name, value) in rules {
            check_validator_value(type_rules, validator_type, rule_name, value, name)?;
        }

        if let Some(attributes) = attributes {
            let duplicated: Vec<&str> = rules
                .keys()
                .map(String::as_str)
                .filter(|rule| attributes.contains_key(*rule))
                .collect();
            if !duplicated.is_empty() {
                return fail(
                    ViolationCategory::ValidationRuleDuplicated,
                    format!(
                        "Field '{name}': Duplicated validation rule(s) {} declared in both 'form.attributes' and 'validators.{validator_type}'.",
                        bracketed(&duplicated)
                    ),
                );
            }
        }
    }

    Ok(())
}

fn is_accepted_rule(type_rules: Option<&BTreeMap<String, Rule>>, rule: &str) -> bool {
    let known = |candidate: &str| {
        GENERIC_VALIDATOR_RULES.contains(&candidate)
            || type_rules.is_some_and(|rules| rules.contains_key(candidate))
    };
    if known(rule) {
        return true;
    }
    rule.strip_suffix(MESSAGE_SUFFIX)
        .is_some_and(|base| !base.is_empty() && known(base))
}

fn check_validator_value(
    type_rules: Option<&BTreeMap<String, Rule>>,
    validator_type: &str,
    rule_name: &str,
    value: &Value,
    name: &str,
) -> Checked {
    let detail = if rule_name == "message" || rule_name.ends_with(MESSAGE_SUFFIX) {
        (!value.is_string()).then(|| format!("expected string, got {value}"))
    } else if let Some(rule) = type_rules.and_then(|rules| rules.get(rule_name)) {
        rule.check(value).err().map(|mismatch| match mismatch {
            RuleMismatch::Type(detail) | RuleMismatch::NotAllowed(detail) => detail,
        })
    } else {
        None
    };

    match detail {
        None => Ok(()),
        Some(detail) => fail(
            ViolationCategory::ValidatorValue,
            format!(
                "Field '{name}': Invalid value for 'validators.{validator_type}.{rule_name}': {detail}."
            ),
        ),
    }
}

fn bracketed(items: &[&str]) -> String {
    format!("[{}]", items.join(", "))
}
