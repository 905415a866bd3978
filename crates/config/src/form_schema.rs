//! Type-keyed field schema: `global` attribute rules plus one entry per form type.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Primitive value type a rule can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Any string.
    String,
    /// Integer number.
    Int,
    /// Boolean.
    Bool,
    /// Any number.
    Float,
}

impl PrimitiveKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "bool" => Some(Self::Bool),
            "float" => Some(Self::Float),
            _ => None,
        }
    }

    /// True when `value` has this primitive type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Bool => value.is_boolean(),
            Self::Float => value.is_number(),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float => "float",
        })
    }
}

/// Allowed values of a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValues {
    /// Any value of a primitive type.
    Primitive(PrimitiveKind),
    /// One of an enumerated set of literals.
    OneOf(Vec<Value>),
}

impl TryFrom<Value> for RuleValues {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(raw) => PrimitiveKind::parse(&raw)
                .map(Self::Primitive)
                .ok_or_else(|| {
                    format!("unknown primitive '{raw}'; expected string, int, bool or float")
                }),
            Value::Array(literals) => Ok(Self::OneOf(literals)),
            other => Err(format!("rule values must be a primitive name or a list, got {other}")),
        }
    }
}

/// One attribute or validation rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Allowed values; `None` accepts anything.
    #[serde(default, deserialize_with = "deserialize_rule_values")]
    pub values: Option<RuleValues>,
}

fn deserialize_rule_values<'de, D>(deserializer: D) -> Result<Option<RuleValues>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    RuleValues::try_from(raw)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Why a value does not satisfy a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMismatch {
    /// Wrong primitive type.
    Type(String),
    /// Not one of the enumerated literals.
    NotAllowed(String),
}

impl Rule {
    /// Check a value against the rule.
    pub fn check(&self, value: &Value) -> Result<(), RuleMismatch> {
        match &self.values {
            None => Ok(()),
            Some(RuleValues::Primitive(kind)) => {
                if kind.matches(value) {
                    Ok(())
                } else {
                    Err(RuleMismatch::Type(format!("expected {kind}, got {value}")))
                }
            },
            Some(RuleValues::OneOf(literals)) => {
                if literals.iter().any(|literal| literal_matches(literal, value)) {
                    Ok(())
                } else {
                    Err(RuleMismatch::NotAllowed(format!(
                        "expected one of {}, got {value}",
                        render_literals(literals)
                    )))
                }
            },
        }
    }
}

fn literal_matches(literal: &Value, value: &Value) -> bool {
    match (literal, value) {
        (Value::Number(left), Value::Number(right)) => {
            left == right
                || matches!(
                    (left.as_f64(), right.as_f64()),
                    (Some(a), Some(b)) if (a - b).abs() < f64::EPSILON
                )
        },
        _ => literal == value,
    }
}

fn render_literals(literals: &[Value]) -> String {
    let rendered: Vec<String> = literals.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// Entry for an attribute under a form type.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeEntry {
    /// The attribute is allowed with this rule.
    Allowed(Rule),
    /// Literal `false`: explicitly disallowed for the type.
    Disallowed,
}

impl TryFrom<Value> for AttributeEntry {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(false) => Ok(Self::Disallowed),
            Value::Object(_) => serde_json::from_value(value)
                .map(Self::Allowed)
                .map_err(|error| error.to_string()),
            other => Err(format!("attribute entry must be a rule map or false, got {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for AttributeEntry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Rules of one form type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TypeSchema {
    /// Rules accepted under `validators.<type>`.
    #[serde(default)]
    pub default_validation_rules: BTreeMap<String, Rule>,
    /// Attribute entries for the type.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeEntry>,
}

/// How an attribute name resolves for a form type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeResolution<'a> {
    /// The type or `global` supplies a rule.
    Rule(&'a Rule),
    /// The type maps the attribute to `false`.
    Disallowed,
    /// Neither the type nor `global` knows the attribute.
    Unknown,
}

/// The complete field schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormSchema {
    /// Attribute rules shared by every form type.
    #[serde(default)]
    pub global: BTreeMap<String, Rule>,
    /// Per-type rules keyed by form type.
    #[serde(flatten)]
    pub types: BTreeMap<String, TypeSchema>,
}

impl FormSchema {
    /// Parse a schema from a store payload.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Rules of a form type, when the type exists.
    #[must_use]
    pub fn form_type(&self, name: &str) -> Option<&TypeSchema> {
        self.types.get(name)
    }

    /// Resolve an attribute: the type's own entry wins over `global`.
    #[must_use]
    pub fn resolve_attribute(&self, form_type: &str, attribute: &str) -> AttributeResolution<'_> {
        let own = self
            .types
            .get(form_type)
            .and_then(|schema| schema.attributes.get(attribute));
        match own {
            Some(AttributeEntry::Disallowed) => AttributeResolution::Disallowed,
            Some(AttributeEntry::Allowed(rule)) => AttributeResolution::Rule(rule),
            None => self
                .global
                .get(attribute)
                .map_or(AttributeResolution::Unknown, AttributeResolution::Rule),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Result<FormSchema, serde_json::Error> {
        FormSchema::from_value(json!({
            "global": {
                "placeholder": { "values": "string" },
                "readonly": { "values": "bool" }
            },
            "text": {
                "maxlength": { "values": "int" },
                "step": { "values": [1, 5, 10] },
                "readonly": false,
                "default_validation_rules": {
                    "maxlength": { "values": "int" },
                    "pattern": { "values": "string" }
                }
            },
            "choice": {
                "mode": { "values": ["single", "multiple"] }
            }
        }))
    }

    #[test]
    fn types_and_global_are_separated() -> Result<(), serde_json::Error> {
        let schema = schema()?;
        assert!(schema.form_type("text").is_some());
        assert!(schema.form_type("choice").is_some());
        assert!(schema.form_type("global").is_none());
        assert_eq!(schema.global.len(), 2);
        Ok(())
    }

    #[test]
    fn attribute_resolution_prefers_type_entry() -> Result<(), serde_json::Error> {
        let schema = schema()?;
        assert_eq!(
            schema.resolve_attribute("text", "readonly"),
            AttributeResolution::Disallowed
        );
        assert!(matches!(
            schema.resolve_attribute("choice", "readonly"),
            AttributeResolution::Rule(_)
        ));
        assert!(matches!(
            schema.resolve_attribute("text", "placeholder"),
            AttributeResolution::Rule(_)
        ));
        assert_eq!(
            schema.resolve_attribute("text", "nope"),
            AttributeResolution::Unknown
        );
        Ok(())
    }

    #[test]
    fn enumerated_rule_lists_expected_values() -> Result<(), Box<dyn std::error::Error>> {
        let schema = schema()?;
        let AttributeResolution::Rule(rule) = schema.resolve_attribute("text", "step") else {
            return Err("'step' should resolve to a rule for 'text'".into());
        };
        assert_eq!(rule.check(&json!(5)), Ok(()));
        assert_eq!(rule.check(&json!(5.0)), Ok(()));
        assert_eq!(
            rule.check(&json!(3)),
            Err(RuleMismatch::NotAllowed(
                "expected one of [1, 5, 10], got 3".to_owned()
            ))
        );
        Ok(())
    }

    #[test]
    fn primitive_rules_check_types() {
        let rule = Rule {
            values: Some(RuleValues::Primitive(PrimitiveKind::Int)),
        };
        assert_eq!(rule.check(&json!(7)), Ok(()));
        assert!(matches!(rule.check(&json!("7")), Err(RuleMismatch::Type(_))));

        let float = Rule {
            values: Some(RuleValues::Primitive(PrimitiveKind::Float)),
        };
        assert_eq!(float.check(&json!(1)), Ok(()));
        assert_eq!(float.check(&json!(1.5)), Ok(()));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert!(FormSchema::from_value(json!({ "text": { "size": true } })).is_err());
        assert!(FormSchema::from_value(json!({ "text": { "size": { "values": "array" } } })).is_err());
    }
}
