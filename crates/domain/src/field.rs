//! Field definitions as returned by the field registry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Section key for list-display configuration.
pub const LIST_SECTION: &str = "list";
/// Section key for form-edit configuration.
pub const FORM_SECTION: &str = "form";
/// Section key for validator declarations.
pub const VALIDATORS_SECTION: &str = "validators";

/// One field's definition: optional `list`, `form` and `validators` sections.
///
/// The tree is kept untyped; the field schema validator decides what is legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldDefinition(Map<String, Value>);

impl FieldDefinition {
    /// Wrap an existing map.
    #[must_use]
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build from a JSON value; `None` unless the value is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Raw `list` section.
    #[must_use]
    pub fn list(&self) -> Option<&Value> {
        self.0.get(LIST_SECTION)
    }

    /// Raw `form` section.
    #[must_use]
    pub fn form(&self) -> Option<&Value> {
        self.0.get(FORM_SECTION)
    }

    /// Raw `validators` section.
    #[must_use]
    pub fn validators(&self) -> Option<&Value> {
        self.0.get(VALIDATORS_SECTION)
    }

    /// Declared `form.type`, when it is a string.
    #[must_use]
    pub fn form_type(&self) -> Option<&str> {
        self.form()
            .and_then(|form| form.get("type"))
            .and_then(Value::as_str)
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

impl From<Map<String, Value>> for FieldDefinition {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sections_are_exposed() -> Result<(), Box<dyn std::error::Error>> {
        let field = FieldDefinition::from_value(json!({
            "list": { "sortable": true },
            "form": { "type": "text" },
            "validators": { "text": { "required": true } }
        }))
        .ok_or("expected object input")?;

        assert_eq!(field.form_type(), Some("text"));
        assert!(field.list().is_some());
        assert!(field.validators().is_some());
        Ok(())
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(FieldDefinition::from_value(json!(["form"])).is_none());
    }
}
