//! Field registry backed by a layered field catalog.
//!
//! Lookups walk an explicit chain of layers and stop at the first hit:
//! page-local fields, then each ancestor page through `parent`, then the
//! entity's fields, then common fields.

use form_resolver_domain::FieldDefinition;
use form_resolver_ports::FieldRegistryPort;
use form_resolver_shared::{ErrorCode, ErrorEnvelope, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Serialized catalog of field definitions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FieldCatalog {
    /// Fields visible to every page and entity.
    pub common: BTreeMap<String, Value>,
    /// Fields per entity name.
    pub entities: BTreeMap<String, BTreeMap<String, Value>>,
    /// Fields per page key.
    pub pages: BTreeMap<String, PageFields>,
}

/// Page-local fields and the page they inherit from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PageFields {
    /// Page key consulted after this one.
    pub parent: Option<String>,
    /// Field definitions local to the page.
    pub fields: BTreeMap<String, Value>,
}

type FieldMap = BTreeMap<String, FieldDefinition>;

#[derive(Debug, Clone, Default)]
struct PageLayer {
    parent: Option<String>,
    fields: FieldMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer<'a> {
    Page(&'a str),
    Entity(&'a str),
    Common,
}

/// Registry resolving fields through page, ancestor, entity and common layers.
#[derive(Debug, Clone, Default)]
pub struct LayeredFieldRegistry {
    common: FieldMap,
    entities: BTreeMap<String, FieldMap>,
    pages: BTreeMap<String, PageLayer>,
}

impl LayeredFieldRegistry {
    /// Build a registry, rejecting non-map definitions, unknown parents and parent cycles.
    pub fn from_catalog(catalog: FieldCatalog) -> Result<Self> {
        let common = definitions("common", catalog.common)?;
        let entities = catalog
            .entities
            .into_iter()
            .map(|(entity, fields)| {
                let fields = definitions(&format!("entities.{entity}"), fields)?;
                Ok((entity, fields))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        let pages = catalog
            .pages
            .into_iter()
            .map(|(page, layer)| {
                let fields = definitions(&format!("pages.{page}"), layer.fields)?;
                Ok((
                    page,
                    PageLayer {
                        parent: layer.parent,
                        fields,
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let registry = Self {
            common,
            entities,
            pages,
        };
        registry.check_parents()?;
        Ok(registry)
    }

    /// Read a JSON catalog file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|error| {
            ErrorEnvelope::from(error).with_metadata("path", path.to_string_lossy().to_string())
        })?;
        let catalog = parse_field_catalog_json(&text)
            .map_err(|error| error.with_metadata("path", path.to_string_lossy().to_string()))?;
        Self::from_catalog(catalog)
    }

    fn check_parents(&self) -> Result<()> {
        for start in self.pages.keys() {
            let mut seen = BTreeSet::from([start.as_str()]);
            let mut current = start.as_str();
            while let Some(parent) = self.pages.get(current).and_then(|page| page.parent.as_deref()) {
                if !self.pages.contains_key(parent) {
                    return Err(registry_error(
                        "unknown_parent",
                        format!("page '{current}' inherits from unknown page '{parent}'"),
                    )
                    .with_metadata("pageKey", current));
                }
                if !seen.insert(parent) {
                    return Err(registry_error(
                        "parent_cycle",
                        format!("page '{start}' has a cyclic parent chain"),
                    )
                    .with_metadata("pageKey", start.as_str()));
                }
                current = parent;
            }
        }
        Ok(())
    }

    fn layers<'a>(&'a self, page_key: &'a str, entity_name: &'a str) -> Vec<Layer<'a>> {
        let mut layers = Vec::new();
        let mut next = Some(page_key);
        while let Some(page) = next {
            if layers.contains(&Layer::Page(page)) {
                break;
            }
            layers.push(Layer::Page(page));
            next = self.pages.get(page).and_then(|layer| layer.parent.as_deref());
        }
        layers.push(Layer::Entity(entity_name));
        layers.push(Layer::Common);
        layers
    }

    fn lookup(&self, layer: Layer<'_>, field_name: &str) -> Option<&FieldDefinition> {
        match layer {
            Layer::Page(page) => self
                .pages
                .get(page)
                .and_then(|layer| layer.fields.get(field_name)),
            Layer::Entity(entity) => self
                .entities
                .get(entity)
                .and_then(|fields| fields.get(field_name)),
            Layer::Common => self.common.get(field_name),
        }
    }
}

impl FieldRegistryPort for LayeredFieldRegistry {
    fn field_with_fallbacks(
        &self,
        field_name: &str,
        page_key: &str,
        entity_name: &str,
    ) -> Result<Option<FieldDefinition>> {
        Ok(self
            .layers(page_key, entity_name)
            .into_iter()
            .find_map(|layer| self.lookup(layer, field_name))
            .cloned())
    }

    fn filter_and_validate_fields(
        &self,
        field_names: &[String],
        page_key: &str,
        entity_name: &str,
    ) -> Result<Vec<String>> {
        let layers = self.layers(page_key, entity_name);
        let mut seen = BTreeSet::new();
        Ok(field_names
            .iter()
            .filter(|name| layers.iter().any(|layer| self.lookup(*layer, name).is_some()))
            .filter(|name| seen.insert(*name))
            .cloned()
            .collect())
    }
}

/// Parse a field catalog from JSON.
pub fn parse_field_catalog_json(input: &str) -> Result<FieldCatalog> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("registry", "invalid_json"),
            format!("invalid field catalog JSON: {error}"),
        )
    })
}

fn definitions(scope: &str, raw: BTreeMap<String, Value>) -> Result<FieldMap> {
    raw.into_iter()
        .map(|(name, value)| match FieldDefinition::from_value(value) {
            Some(definition) => Ok((name, definition)),
            None => Err(registry_error(
                "invalid_definition",
                format!("field '{name}' in {scope} must be a map"),
            )
            .with_metadata("field", name)),
        })
        .collect()
}

fn registry_error(code: &str, message: String) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::new("registry", code), message)
}
