//! Resolver settings: store keys, normalizer allow-lists and defaults.
//!
//! - Deserialization uses `serde` (JSON or TOML).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims, sorts and de-duplicates key lists.

use crate::render_options::{ENUM_RENDER_OPTIONS, enum_values};
use form_resolver_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Default store key of the shared form configuration.
pub const DEFAULT_BASE_CONFIG_KEY: &str = "view.form";
/// Default store key of the field schema.
pub const DEFAULT_SCHEMA_KEY: &str = "forms/schema";

const DEFAULT_BOOLEAN_KEYS: &[&str] = &[
    "ajax_save",
    "auto_save",
    "force_captcha",
    "html5_validation",
    "show_error_container",
    "show_required_indicator",
    "submit_button_enabled",
];

/// Settings governing one resolution pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ResolverSettings {
    /// Store key of the base configuration.
    pub base_config_key: String,
    /// Store key of the field schema.
    pub schema_key: String,
    /// Normalizer allow-lists and defaults.
    pub normalizer: NormalizerSettings,
    /// Render option acceptance.
    pub render_options: RenderOptionSettings,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            base_config_key: DEFAULT_BASE_CONFIG_KEY.to_owned(),
            schema_key: DEFAULT_SCHEMA_KEY.to_owned(),
            normalizer: NormalizerSettings::default(),
            render_options: RenderOptionSettings::default(),
        }
    }
}

/// Normalizer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct NormalizerSettings {
    /// Render option keys whose values must be booleans.
    pub boolean_keys: Vec<String>,
    /// Render option defaults, applied only to absent keys.
    pub defaults: BTreeMap<String, Value>,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("security_level".to_owned(), Value::from("low"));
        defaults.insert("layout_type".to_owned(), Value::from("sequential"));
        defaults.insert("error_display".to_owned(), Value::from("inline"));
        for (key, enabled) in [
            ("ajax_save", false),
            ("auto_save", false),
            ("force_captcha", false),
            ("html5_validation", true),
            ("show_error_container", true),
            ("show_required_indicator", true),
            ("submit_button_enabled", true),
        ] {
            defaults.insert(key.to_owned(), Value::Bool(enabled));
        }

        Self {
            boolean_keys: DEFAULT_BOOLEAN_KEYS
                .iter()
                .map(|key| (*key).to_owned())
                .collect(),
            defaults,
        }
    }
}

impl NormalizerSettings {
    /// True when `key` is an allow-listed boolean render option.
    #[must_use]
    pub fn is_boolean_key(&self, key: &str) -> bool {
        self.boolean_keys.iter().any(|candidate| candidate == key)
    }
}

/// Extra render option keys accepted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RenderOptionSettings {
    /// Keys accepted without a type check.
    pub extra_keys: Vec<String>,
}

impl ResolverSettings {
    /// Validate the settings and normalize key lists.
    pub fn validate_and_normalize(mut self) -> Result<Self, SettingsError> {
        self.base_config_key = required_key("baseConfigKey", &self.base_config_key)?;
        self.schema_key = required_key("schemaKey", &self.schema_key)?;
        self.normalizer.boolean_keys =
            normalize_keys("normalizer.booleanKeys", &self.normalizer.boolean_keys)?;
        self.render_options.extra_keys =
            normalize_keys("renderOptions.extraKeys", &self.render_options.extra_keys)?;

        for (key, value) in &self.normalizer.defaults {
            if key.trim().is_empty() {
                return Err(SettingsError::EmptyKey {
                    field: "normalizer.defaults",
                });
            }
            self.validate_default(key, value)?;
        }

        Ok(self)
    }

    fn validate_default(&self, key: &str, value: &Value) -> Result<(), SettingsError> {
        if self.normalizer.is_boolean_key(key) && !value.is_boolean() {
            return Err(SettingsError::InvalidDefault {
                key: key.to_owned(),
                reason: "boolean render option requires a boolean default".to_owned(),
            });
        }

        if ENUM_RENDER_OPTIONS.contains(&key) {
            let allowed = enum_values(key);
            let is_member = value
                .as_str()
                .is_some_and(|candidate| allowed.contains(&candidate));
            if !is_member {
                return Err(SettingsError::InvalidDefault {
                    key: key.to_owned(),
                    reason: format!("expected one of [{}]", allowed.join(", ")),
                });
            }
        }

        Ok(())
    }
}

fn required_key(field: &'static str, raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SettingsError::EmptyKey { field });
    }
    Ok(trimmed.to_owned())
}

fn normalize_keys(field: &'static str, keys: &[String]) -> Result<Vec<String>, SettingsError> {
    let mut normalized = BTreeSet::new();
    for key in keys {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(SettingsError::EmptyKey { field });
        }
        normalized.insert(trimmed.to_owned());
    }
    Ok(normalized.into_iter().collect())
}

/// Typed validation errors for resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A key or key-list entry is empty after trimming.
    EmptyKey {
        /// Settings field (e.g. `normalizer.booleanKeys`).
        field: &'static str,
    },
    /// A render option default does not fit the option.
    InvalidDefault {
        /// Render option key.
        key: String,
        /// Human readable reason.
        reason: String,
    },
}

impl SettingsError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyKey { .. } | Self::InvalidDefault { .. } => {
                ErrorCode::new("config", "invalid_settings")
            },
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey { field } => write!(formatter, "{field} must not contain empty keys"),
            Self::InvalidDefault { key, reason } => {
                write!(formatter, "invalid default for render option '{key}': {reason}")
            },
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<SettingsError> for ErrorEnvelope {
    fn from(error: SettingsError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            SettingsError::EmptyKey { field } => envelope.with_metadata("field", field),
            SettingsError::InvalidDefault { key, .. } => envelope.with_metadata("key", key),
        }
    }
}

/// Parse resolver settings from a JSON string, applying validation and normalization.
pub fn parse_resolver_settings_json(input: &str) -> Result<ResolverSettings, ErrorEnvelope> {
    let settings: ResolverSettings = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid settings JSON: {error}"),
        )
    })?;

    settings.validate_and_normalize().map_err(Into::into)
}

/// Parse resolver settings from a TOML string, applying validation and normalization.
pub fn parse_resolver_settings_toml(input: &str) -> Result<ResolverSettings, ErrorEnvelope> {
    let settings: ResolverSettings = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid settings TOML: {error}"),
        )
    })?;

    settings.validate_and_normalize().map_err(Into::into)
}
