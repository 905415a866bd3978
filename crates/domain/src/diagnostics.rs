//! Validation diagnostics: stable developer codes, errors and results.
//!
//! A `DevCode` is greppable and namespaced by the check that raised it:
//! `RO` render options, `FL` form layout, `TL` top level, `FN` field lookup,
//! `FS` field schema. Entity ownership checks use the bare `ERR-DEV-0xx` form.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Stable identifier for a validation failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DevCode {
    /// Unrecognized key under `render_options`.
    RenderOptionUnknown,
    /// Known render option holding a value of the wrong kind.
    RenderOptionType,
    /// `security_level` outside `{low, medium, high}`.
    RenderOptionSecurityLevel,
    /// `layout_type` outside `{sequential, fieldsets, sections}`.
    RenderOptionLayoutType,
    /// `error_display` outside `{inline, summary}`.
    RenderOptionErrorDisplay,
    /// `form_layout` is not a sequence.
    LayoutNotSequence,
    /// A layout section is not a map.
    LayoutSectionNotMap,
    /// A section `title` is present but not a string.
    LayoutSectionTitle,
    /// A section `fields` value is not a sequence.
    LayoutFieldsNotSequence,
    /// A `fields` entry is not a non-empty string.
    LayoutFieldEntry,
    /// A section has no `fields` key.
    LayoutSectionMissingFields,
    /// No section of a non-empty layout lists any field.
    LayoutEmpty,
    /// The same field appears more than once in the layout.
    LayoutDuplicateField,
    /// Unexpected top-level key.
    TopLevelUnknownKey,
    /// Recognized top-level key with the wrong container type.
    TopLevelShape,
    /// The target entity could not be resolved.
    TopLevelEntityUnresolved,
    /// Layout field unknown to the field registry.
    FieldNotFound,
    /// `form_hidden_fields` entry missing on the entity.
    HiddenFieldNotOnEntity,
    /// `form_extra_fields` entry missing on the entity.
    ExtraFieldNotOnEntity,
    /// Unknown keys under `list`.
    FieldListUnknownKeys,
    /// `list.formatter` and `list.formatters` declared together.
    FieldListFormatterConflict,
    /// `list.sortable` is not a boolean.
    FieldListSortableType,
    /// `form` section required by context but absent.
    FieldFormSectionMissing,
    /// `form.type` absent.
    FieldFormTypeMissing,
    /// `form.type` not defined in the schema.
    FieldFormTypeUnknown,
    /// Attribute placed directly under `form`.
    FieldAttributeMisplaced,
    /// Attribute explicitly disallowed for the form type.
    FieldAttributeDisallowed,
    /// Attribute unknown to both the type and the global rules.
    FieldAttributeUnknown,
    /// Attribute value of the wrong primitive type.
    FieldAttributeValueType,
    /// Attribute value outside its enumerated literals.
    FieldAttributeValueNotAllowed,
    /// `form.formatters` on a type other than `tel`.
    FieldFormattersNotAllowed,
    /// Unknown form-level key under `form`.
    FieldFormKeyUnknown,
    /// Unknown rule under `validators.<type>`.
    FieldValidatorUnknown,
    /// Validator rule value of the wrong type.
    FieldValidatorValue,
    /// Rule declared both as attribute and validator.
    FieldValidationRuleDuplicated,
    /// A field section is not a map.
    FieldSectionShape,
}

impl DevCode {
    /// Stable string form (e.g. `ERR-DEV-RO-003`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RenderOptionUnknown => "ERR-DEV-RO-001",
            Self::RenderOptionType => "ERR-DEV-RO-002",
            Self::RenderOptionSecurityLevel => "ERR-DEV-RO-003",
            Self::RenderOptionLayoutType => "ERR-DEV-RO-004",
            Self::RenderOptionErrorDisplay => "ERR-DEV-RO-005",
            Self::LayoutNotSequence => "ERR-DEV-FL-001",
            Self::LayoutSectionNotMap => "ERR-DEV-FL-002",
            Self::LayoutSectionTitle => "ERR-DEV-FL-003",
            Self::LayoutFieldsNotSequence => "ERR-DEV-FL-004",
            Self::LayoutFieldEntry => "ERR-DEV-FL-005",
            Self::LayoutSectionMissingFields => "ERR-DEV-FL-006",
            Self::LayoutEmpty => "ERR-DEV-FL-007",
            Self::LayoutDuplicateField => "ERR-DEV-FL-008",
            Self::TopLevelUnknownKey => "ERR-DEV-TL-001",
            Self::TopLevelShape => "ERR-DEV-TL-002",
            Self::TopLevelEntityUnresolved => "ERR-DEV-TL-004",
            Self::FieldNotFound => "ERR-DEV-FN-032",
            Self::HiddenFieldNotOnEntity => "ERR-DEV-005",
            Self::ExtraFieldNotOnEntity => "ERR-DEV-007",
            Self::FieldListUnknownKeys => "ERR-DEV-FS-001",
            Self::FieldListFormatterConflict => "ERR-DEV-FS-002",
            Self::FieldListSortableType => "ERR-DEV-FS-003",
            Self::FieldFormSectionMissing => "ERR-DEV-FS-004",
            Self::FieldFormTypeMissing => "ERR-DEV-FS-005",
            Self::FieldFormTypeUnknown => "ERR-DEV-FS-006",
            Self::FieldAttributeMisplaced => "ERR-DEV-FS-007",
            Self::FieldAttributeDisallowed => "ERR-DEV-FS-008",
            Self::FieldAttributeUnknown => "ERR-DEV-FS-009",
            Self::FieldAttributeValueType => "ERR-DEV-FS-010",
            Self::FieldAttributeValueNotAllowed => "ERR-DEV-FS-011",
            Self::FieldFormattersNotAllowed => "ERR-DEV-FS-012",
            Self::FieldFormKeyUnknown => "ERR-DEV-FS-013",
            Self::FieldValidatorUnknown => "ERR-DEV-FS-014",
            Self::FieldValidatorValue => "ERR-DEV-FS-015",
            Self::FieldValidationRuleDuplicated => "ERR-DEV-FS-016",
            Self::FieldSectionShape => "ERR-DEV-FS-017",
        }
    }

    /// Fixed remediation hint for the category.
    #[must_use]
    pub const fn default_suggestion(self) -> &'static str {
        match self {
            Self::RenderOptionUnknown => {
                "Remove the key or check its spelling against the supported render options."
            },
            Self::RenderOptionType => "Use the value type documented for this render option.",
            Self::RenderOptionSecurityLevel => "Use one of: low, medium, high.",
            Self::RenderOptionLayoutType => "Use one of: sequential, fieldsets, sections.",
            Self::RenderOptionErrorDisplay => "Use one of: inline, summary.",
            Self::LayoutNotSequence => "Declare 'form_layout' as a list of sections.",
            Self::LayoutSectionNotMap => {
                "Declare each section as a map with 'title' and 'fields'."
            },
            Self::LayoutSectionTitle => "Use a string for the section 'title'.",
            Self::LayoutFieldsNotSequence => "Declare 'fields' as a list of field names.",
            Self::LayoutFieldEntry => "List fields by their non-empty string name.",
            Self::LayoutSectionMissingFields => "Add a 'fields' list to the section.",
            Self::LayoutEmpty => "Add at least one field to one of the layout sections.",
            Self::LayoutDuplicateField => "List each field in only one section.",
            Self::TopLevelUnknownKey => {
                "Allowed top-level keys: render_options, form_layout, form_hidden_fields, form_extra_fields."
            },
            Self::TopLevelShape => {
                "Use a map for render_options and lists for form_layout, form_hidden_fields, form_extra_fields."
            },
            Self::TopLevelEntityUnresolved => {
                "Check the page entity name and that its metadata is registered."
            },
            Self::FieldNotFound => {
                "Define the field in the page, entity or common field definitions, or remove it from the layout."
            },
            Self::HiddenFieldNotOnEntity => {
                "Add the property/getter to the entity or remove it from form_hidden_fields."
            },
            Self::ExtraFieldNotOnEntity => {
                "Add the property/getter to the entity or remove it from form_extra_fields."
            },
            Self::FieldListUnknownKeys => "Allowed 'list' keys: sortable, formatter, formatters.",
            Self::FieldListFormatterConflict => {
                "Keep either 'formatter' or 'formatters' under 'list', not both."
            },
            Self::FieldListSortableType => "Set 'list.sortable' to true or false.",
            Self::FieldFormSectionMissing => "Add a 'form' section with at least a 'type'.",
            Self::FieldFormTypeMissing => "Set 'form.type' to one of the schema form types.",
            Self::FieldFormTypeUnknown => "Use a form type defined in forms/schema.",
            Self::FieldAttributeMisplaced => "Move HTML attributes under 'form.attributes'.",
            Self::FieldAttributeDisallowed => {
                "Remove the attribute; this form type does not support it."
            },
            Self::FieldAttributeUnknown => {
                "Remove the attribute or add a rule for it in forms/schema."
            },
            Self::FieldAttributeValueType => "Use the value type declared by the schema rule.",
            Self::FieldAttributeValueNotAllowed => "Use one of the values listed by the schema.",
            Self::FieldFormattersNotAllowed => {
                "Move formatters to 'list' or change the form type to 'tel'."
            },
            Self::FieldFormKeyUnknown => "Remove the key or nest it where it belongs.",
            Self::FieldValidatorUnknown => {
                "Use a rule from the type's default_validation_rules or a generic rule."
            },
            Self::FieldValidatorValue => "Use the value type declared for the validation rule.",
            Self::FieldValidationRuleDuplicated => {
                "Declare each rule once, either in 'form.attributes' or in 'validators'."
            },
            Self::FieldSectionShape => "Declare the field section as a map.",
        }
    }
}

impl fmt::Display for DevCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for DevCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One accumulated validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Human-readable message.
    pub message: String,
    /// Stable category code.
    pub dev_code: DevCode,
    /// Remediation hint.
    pub suggestion: String,
}

impl ValidationError {
    /// Build an error carrying the code's default suggestion.
    pub fn new(dev_code: DevCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            dev_code,
            suggestion: dev_code.default_suggestion().to_owned(),
        }
    }

    /// Replace the suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}] {}", self.dev_code, self.message)
    }
}

/// Outcome of a validation pass. Errors accumulate; validity is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// An empty (valid) result.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// A result holding exactly one error.
    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// True when no error was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Recorded errors in discovery order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consume and return the errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// True when any recorded error carries `code`.
    #[must_use]
    pub fn has_code(&self, code: DevCode) -> bool {
        self.errors.iter().any(|error| error.dev_code == code)
    }
}

impl Extend<ValidationError> for ValidationResult {
    fn extend<T: IntoIterator<Item = ValidationError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("isValid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}
