//! Render option descriptor table and its checks.

use crate::settings::ResolverSettings;
use form_resolver_domain::{DevCode, ValidationError};
use serde_json::{Map, Value};

const SECURITY_LEVELS: &[&str] = &["low", "medium", "high"];
const LAYOUT_TYPES: &[&str] = &["sequential", "fieldsets", "sections"];
const ERROR_DISPLAYS: &[&str] = &["inline", "summary"];

/// Render options restricted to a fixed set of string values.
pub const ENUM_RENDER_OPTIONS: &[&str] = &["security_level", "layout_type", "error_display"];

/// Allowed values of an enum render option (empty for other keys).
#[must_use]
pub fn enum_values(key: &str) -> &'static [&'static str] {
    match key {
        "security_level" => SECURITY_LEVELS,
        "layout_type" => LAYOUT_TYPES,
        "error_display" => ERROR_DISPLAYS,
        _ => &[],
    }
}

/// Declared kind of a render option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Boolean flag.
    Bool,
    /// One of a fixed set of strings; mismatches report the given code.
    Enum(&'static [&'static str], DevCode),
    /// Free string.
    String,
    /// Integer.
    Int,
    /// Nested map.
    Map,
    /// Sequence.
    List,
    /// Accepted without a type check.
    Any,
}

impl OptionKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Bool => "a boolean",
            Self::Enum(..) | Self::String => "a string",
            Self::Int => "an integer",
            Self::Map => "a map",
            Self::List => "a list",
            Self::Any => "any value",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Enum(allowed, _) => value
                .as_str()
                .is_some_and(|candidate| allowed.contains(&candidate)),
            Self::String => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Map => value.is_object(),
            Self::List => value.is_array(),
            Self::Any => true,
        }
    }
}

const KNOWN_OPTIONS: &[(&str, OptionKind)] = &[
    ("security_level", OptionKind::Enum(SECURITY_LEVELS, DevCode::RenderOptionSecurityLevel)),
    ("layout_type", OptionKind::Enum(LAYOUT_TYPES, DevCode::RenderOptionLayoutType)),
    ("error_display", OptionKind::Enum(ERROR_DISPLAYS, DevCode::RenderOptionErrorDisplay)),
    ("form_id", OptionKind::String),
    ("css_class", OptionKind::String),
    ("action_url", OptionKind::String),
    ("submit_button_text", OptionKind::String),
    ("cancel_button_text", OptionKind::String),
    ("theme", OptionKind::String),
    ("auto_save_interval", OptionKind::Int),
    ("themes", OptionKind::Map),
    ("attributes", OptionKind::Map),
    ("buttons", OptionKind::List),
];

/// Render option acceptance rules derived from settings.
#[derive(Debug, Clone)]
pub struct RenderOptionRules {
    boolean_keys: Vec<String>,
    extra_keys: Vec<String>,
}

impl RenderOptionRules {
    /// Build the rules for a settings instance.
    #[must_use]
    pub fn from_settings(settings: &ResolverSettings) -> Self {
        Self {
            boolean_keys: settings.normalizer.boolean_keys.clone(),
            extra_keys: settings.render_options.extra_keys.clone(),
        }
    }

    /// Declared kind of `key`, or `None` when the key is not recognized.
    #[must_use]
    pub fn kind_of(&self, key: &str) -> Option<OptionKind> {
        if self.boolean_keys.iter().any(|candidate| candidate == key) {
            return Some(OptionKind::Bool);
        }
        if let Some((_, kind)) = KNOWN_OPTIONS.iter().find(|(name, _)| *name == key) {
            return Some(*kind);
        }
        self.extra_keys
            .iter()
            .any(|candidate| candidate == key)
            .then_some(OptionKind::Any)
    }

    /// Check every render option and append failures to `errors`.
    pub fn check(&self, render_options: &Map<String, Value>, errors: &mut Vec<ValidationError>) {
        for (key, value) in render_options {
            let Some(kind) = self.kind_of(key) else {
                errors.push(ValidationError::new(
                    DevCode::RenderOptionUnknown,
                    format!("Unknown render option '{key}' under 'render_options'."),
                ));
                continue;
            };

            if kind.accepts(value) {
                continue;
            }

            let error = match kind {
                OptionKind::Enum(allowed, code) => ValidationError::new(
                    code,
                    format!(
                        "Invalid value {value} for 'render_options.{key}'; expected one of [{}].",
                        allowed.join(", ")
                    ),
                ),
                _ => ValidationError::new(
                    DevCode::RenderOptionType,
                    format!(
                        "'render_options.{key}' must be {}, got {}.",
                        kind.label(),
                        value_kind(value)
                    ),
                ),
            };
            errors.push(error);
        }
    }
}

/// Short label for a JSON value kind, used in messages.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(options: Value) -> Vec<ValidationError> {
        let rules = RenderOptionRules::from_settings(&ResolverSettings::default());
        let mut errors = Vec::new();
        if let Value::Object(map) = options {
            rules.check(&map, &mut errors);
        }
        errors
    }

    #[test]
    fn valid_options_pass() {
        let errors = check(json!({
            "security_level": "high",
            "layout_type": "fieldsets",
            "error_display": "summary",
            "ajax_save": true,
            "buttons": ["save"],
            "themes": {}
        }));
        assert!(errors.is_empty());
    }

    #[test]
    fn enum_violations_carry_their_own_codes() {
        let errors = check(json!({
            "security_level": "extreme",
            "layout_type": "grid",
            "error_display": 3
        }));
        let codes: Vec<DevCode> = errors.iter().map(|error| error.dev_code).collect();
        assert_eq!(
            codes,
            vec![
                DevCode::RenderOptionErrorDisplay,
                DevCode::RenderOptionLayoutType,
                DevCode::RenderOptionSecurityLevel,
            ]
        );
        assert!(
            errors
                .get(2)
                .is_some_and(|error| error.message.contains("[low, medium, high]"))
        );
    }

    #[test]
    fn unknown_and_mistyped_options_are_reported() {
        let errors = check(json!({ "colour": "red", "ajax_save": "maybe" }));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|error| error.dev_code == DevCode::RenderOptionUnknown
            && error.message.contains("colour")));
        assert!(errors.iter().any(|error| error.dev_code == DevCode::RenderOptionType
            && error.message.contains("ajax_save")));
    }

    #[test]
    fn extra_keys_from_settings_are_accepted() {
        let mut settings = ResolverSettings::default();
        settings.render_options.extra_keys = vec!["data_source".to_owned()];
        let rules = RenderOptionRules::from_settings(&settings);
        assert_eq!(rules.kind_of("data_source"), Some(OptionKind::Any));
        assert_eq!(rules.kind_of("nope"), None);
    }
}
