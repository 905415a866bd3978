//! Entity metadata backed by a static catalog.

use form_resolver_ports::EntityMetadataPort;
use form_resolver_shared::{ErrorCode, ErrorEnvelope, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const GETTER_PREFIXES: [&str; 3] = ["get", "is", "has"];

/// One entity class with its properties and getters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityEntry {
    /// Fully qualified class name.
    pub class: String,
    /// Property names.
    #[serde(default)]
    pub properties: BTreeSet<String>,
    /// Getter method names (e.g. `getFullName`, `isArchived`).
    #[serde(default)]
    pub getters: BTreeSet<String>,
}

impl EntityEntry {
    fn exposes(&self, field_name: &str) -> bool {
        if self.properties.contains(field_name) {
            return true;
        }
        let pascal = pascal_case(field_name);
        GETTER_PREFIXES
            .iter()
            .any(|prefix| self.getters.contains(&format!("{prefix}{pascal}")))
    }
}

/// Entity metadata over an in-process catalog keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct StaticEntityMetadata {
    entities: BTreeMap<String, EntityEntry>,
}

impl StaticEntityMetadata {
    /// Create metadata from a catalog.
    #[must_use]
    pub const fn new(entities: BTreeMap<String, EntityEntry>) -> Self {
        Self { entities }
    }

    /// Read a JSON catalog file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| {
            ErrorEnvelope::from(error).with_metadata("path", path.to_string_lossy().to_string())
        })?;
        let entities = serde_json::from_str(&text).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("entity", "invalid_json"),
                format!("invalid entity catalog JSON: {error}"),
            )
            .with_metadata("path", path.to_string_lossy().to_string())
        })?;
        Ok(Self::new(entities))
    }
}

impl EntityMetadataPort for StaticEntityMetadata {
    fn resolve_entity(&self, entity_name: &str) -> Result<String> {
        self.entities
            .get(entity_name)
            .map(|entry| entry.class.clone())
            .ok_or_else(|| {
                ErrorEnvelope::expected(
                    ErrorCode::new("entity", "not_found"),
                    format!("entity '{entity_name}' is not registered"),
                )
                .with_metadata("entityName", entity_name)
            })
    }

    fn has_field(&self, fqcn: &str, field_name: &str) -> bool {
        self.entities
            .values()
            .filter(|entry| entry.class == fqcn)
            .any(|entry| entry.exposes(field_name))
    }
}

/// `full_name` -> `FullName`, `title` -> `Title`.
fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect()
}
