//! Normalization of a merged configuration into its canonical shape.

use crate::settings::NormalizerSettings;
use form_resolver_ports::{LogFields, LoggerPort};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Top-level key holding render options (map).
pub const RENDER_OPTIONS: &str = "render_options";
/// Top-level key holding layout sections (sequence).
pub const FORM_LAYOUT: &str = "form_layout";
/// Top-level key holding hidden field names (sequence).
pub const FORM_HIDDEN_FIELDS: &str = "form_hidden_fields";
/// Top-level key holding extra field names (sequence).
pub const FORM_EXTRA_FIELDS: &str = "form_extra_fields";

/// The recognized top-level keys, in canonical order.
pub const TOP_LEVEL_KEYS: [&str; 4] = [
    RENDER_OPTIONS,
    FORM_LAYOUT,
    FORM_HIDDEN_FIELDS,
    FORM_EXTRA_FIELDS,
];

const COERCED_EVENT: &str = "formConfig.normalize.coerced";
const NESTED_MAP_OPTIONS: &[&str] = &["themes"];

/// Empty value of a recognized top-level key (`{}` or `[]`), `None` otherwise.
#[must_use]
pub fn empty_top_level_value(key: &str) -> Option<Value> {
    match key {
        RENDER_OPTIONS => Some(Value::Object(Map::new())),
        FORM_LAYOUT | FORM_HIDDEN_FIELDS | FORM_EXTRA_FIELDS => Some(Value::Array(Vec::new())),
        _ => None,
    }
}

/// A configuration with every recognized key present and booleans coerced.
///
/// Unrecognized top-level keys are carried through untouched so that the
/// top-level validator can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedConfig(Map<String, Value>);

impl NormalizedConfig {
    /// Value of a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `render_options`, when it is a map.
    #[must_use]
    pub fn render_options(&self) -> Option<&Map<String, Value>> {
        self.0.get(RENDER_OPTIONS).and_then(Value::as_object)
    }

    /// `form_layout`, when it is a sequence.
    #[must_use]
    pub fn form_layout(&self) -> Option<&[Value]> {
        self.0
            .get(FORM_LAYOUT)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume and return the underlying map.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for NormalizedConfig {
    /// Wrap a map that is already in canonical shape.
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Applies defaults and boolean coercion, warning on every correction.
pub struct ConfigNormalizer {
    settings: NormalizerSettings,
    logger: Arc<dyn LoggerPort>,
}

impl ConfigNormalizer {
    /// Create a normalizer.
    #[must_use]
    pub fn new(settings: NormalizerSettings, logger: Arc<dyn LoggerPort>) -> Self {
        Self { settings, logger }
    }

    /// Normalize a merged configuration.
    #[must_use]
    pub fn normalize(&self, mut config: Map<String, Value>) -> NormalizedConfig {
        for key in TOP_LEVEL_KEYS {
            self.ensure_container(&mut config, key);
        }

        if let Some(Value::Object(render_options)) = config.get_mut(RENDER_OPTIONS) {
            self.apply_defaults(render_options);
            self.coerce_booleans(render_options);
            self.ensure_nested_maps(render_options);
        }

        NormalizedConfig(config)
    }

    fn ensure_container(&self, config: &mut Map<String, Value>, key: &str) {
        let Some(empty) = empty_top_level_value(key) else {
            return;
        };
        match config.get(key) {
            None => {
                config.insert(key.to_owned(), empty);
            },
            Some(Value::Null) => {
                self.warn(
                    &format!("Top-level key '{key}' was null, defaulting to {empty}"),
                    key,
                    &Value::Null,
                    false,
                );
                config.insert(key.to_owned(), empty);
            },
            Some(_) => {},
        }
    }

    fn apply_defaults(&self, render_options: &mut Map<String, Value>) {
        for (key, value) in &self.settings.defaults {
            if !render_options.contains_key(key) {
                render_options.insert(key.clone(), value.clone());
            }
        }
    }

    fn coerce_booleans(&self, render_options: &mut Map<String, Value>) {
        for key in &self.settings.boolean_keys {
            let Some(value) = render_options.get_mut(key) else {
                continue;
            };
            if value.is_boolean() {
                continue;
            }

            let original = value.clone();
            let coerced = coerce_bool(&original);
            if let Some(flag) = coerced {
                *value = Value::Bool(flag);
            }
            self.warn(
                &format!("Render option '{key}' was not a boolean, casting to boolean"),
                key,
                &original,
                coerced.is_some(),
            );
        }
    }

    fn ensure_nested_maps(&self, render_options: &mut Map<String, Value>) {
        for key in NESTED_MAP_OPTIONS {
            if render_options.get(*key).is_some_and(Value::is_null) {
                self.warn(
                    &format!("Render option '{key}' was null, defaulting to {{}}"),
                    key,
                    &Value::Null,
                    false,
                );
                render_options.insert((*key).to_owned(), Value::Object(Map::new()));
            }
        }
    }

    fn warn(&self, message: &str, key: &str, original: &Value, coerced: bool) {
        let mut fields = LogFields::new();
        fields.insert("key".into(), Value::from(key));
        fields.insert("original".into(), original.clone());
        fields.insert("coerced".into(), Value::Bool(coerced));
        self.logger.warn(COERCED_EVENT, message, Some(fields));
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value.as_str() {
        Some("true" | "1") => Some(true),
        Some("false" | "0") => Some(false),
        _ => None,
    }
}
