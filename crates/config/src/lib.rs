//! # form-resolver-config
//!
//! Merge, normalization and validation of form configuration trees, plus the
//! settings that govern them. This crate depends on `domain`, `ports` and
//! `shared` only.

/// Field schema validation for single field definitions.
pub mod field_schema;
/// Type-keyed field schema model.
pub mod form_schema;
/// Deep merge of base and page configuration.
pub mod merge;
/// Normalization into the canonical shape.
pub mod normalize;
/// Render option descriptor table.
pub mod render_options;
/// Resolver settings and parsers.
pub mod settings;
/// Top-level structural validation.
pub mod top_level;

pub use field_schema::{FieldSchemaError, FieldSchemaValidator, FieldViolation, ViolationCategory};
pub use form_schema::{AttributeEntry, FormSchema, PrimitiveKind, Rule, RuleValues, TypeSchema};
pub use merge::{deep_merge, merge_into};
pub use normalize::{
    ConfigNormalizer, FORM_EXTRA_FIELDS, FORM_HIDDEN_FIELDS, FORM_LAYOUT, NormalizedConfig,
    RENDER_OPTIONS, TOP_LEVEL_KEYS, empty_top_level_value,
};
pub use render_options::{OptionKind, RenderOptionRules, value_kind};
pub use settings::{
    NormalizerSettings, RenderOptionSettings, ResolverSettings, SettingsError,
    parse_resolver_settings_json, parse_resolver_settings_toml,
};
pub use top_level::TopLevelConfigValidator;

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_resolver_domain::domain_crate_version;
    use form_resolver_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        let version = config_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn config_can_use_domain_and_shared() {
        let domain_version = domain_crate_version();
        let shared_version = shared_crate_version();

        assert!(!domain_version.is_empty());
        assert!(!shared_version.is_empty());
    }
}
