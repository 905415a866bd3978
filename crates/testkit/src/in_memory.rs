//! In-memory collaborator implementations for port contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests of the resolution pipeline
//! - Deterministic contract tests for the ports layer

use crate::errors::unknown_entity_error;
use form_resolver_domain::FieldDefinition;
use form_resolver_ports::{
    ConfigStorePort, EntityMetadataPort, FieldRegistryPort, LogEvent, LogFields, LogLevel,
    LoggerPort,
};
use form_resolver_shared::{ErrorEnvelope, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// A no-op logger implementation.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn log(&self, _event: LogEvent) {}

    fn child(&self, _fields: LogFields) -> Box<dyn LoggerPort> {
        Box::new(Self)
    }
}

/// Logger that keeps every event for later assertions.
///
/// Clones and children share the same event buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    events: Arc<Mutex<Vec<LogEvent>>>,
    base_fields: LogFields,
}

impl RecordingLogger {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Recorded events at `level`.
    pub fn events_at(&self, level: LogLevel) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }

    /// Recorded events with the given event name.
    pub fn events_named(&self, name: &str) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|event| &*event.event == name)
            .collect()
    }

    /// Forget every recorded event.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl LoggerPort for RecordingLogger {
    fn log(&self, mut event: LogEvent) {
        if !self.base_fields.is_empty() {
            let mut fields = self.base_fields.clone();
            fields.extend(event.fields.take().unwrap_or_default());
            event.fields = Some(fields);
        }
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self {
            events: Arc::clone(&self.events),
            base_fields,
        })
    }
}

/// Config store backed by maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    global: BTreeMap<String, Value>,
    features: BTreeMap<(String, String), Value>,
    failures: BTreeMap<String, ErrorEnvelope>,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a global entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.global.insert(key.into(), value);
        self
    }

    /// Add a feature-scoped entry.
    #[must_use]
    pub fn with_feature(
        mut self,
        feature: impl Into<String>,
        key: impl Into<String>,
        value: Value,
    ) -> Self {
        self.features.insert((feature.into(), key.into()), value);
        self
    }

    /// Make every read of `key` (global or feature-scoped) fail with `error`.
    #[must_use]
    pub fn with_failure(mut self, key: impl Into<String>, error: ErrorEnvelope) -> Self {
        self.failures.insert(key.into(), error);
        self
    }

    fn check_failure(&self, key: &str) -> Result<()> {
        match self.failures.get(key) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl ConfigStorePort for InMemoryConfigStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        self.check_failure(key)?;
        Ok(self.global.get(key).cloned())
    }

    fn get_from_feature(&self, feature: &str, key: &str) -> Result<Option<Value>> {
        self.check_failure(key)?;
        Ok(self
            .features
            .get(&(feature.to_owned(), key.to_owned()))
            .cloned())
    }
}

/// Field registry with page, entity and common scopes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFieldRegistry {
    page: BTreeMap<(String, String), FieldDefinition>,
    entity: BTreeMap<(String, String), FieldDefinition>,
    common: BTreeMap<String, FieldDefinition>,
}

impl InMemoryFieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field visible to every page and entity.
    #[must_use]
    pub fn with_common_field(mut self, name: impl Into<String>, definition: Value) -> Self {
        self.common.insert(name.into(), to_definition(definition));
        self
    }

    /// Add a field scoped to one entity.
    #[must_use]
    pub fn with_entity_field(
        mut self,
        entity: impl Into<String>,
        name: impl Into<String>,
        definition: Value,
    ) -> Self {
        self.entity
            .insert((entity.into(), name.into()), to_definition(definition));
        self
    }

    /// Add a field scoped to one page.
    #[must_use]
    pub fn with_page_field(
        mut self,
        page_key: impl Into<String>,
        name: impl Into<String>,
        definition: Value,
    ) -> Self {
        self.page
            .insert((page_key.into(), name.into()), to_definition(definition));
        self
    }
}

fn to_definition(value: Value) -> FieldDefinition {
    FieldDefinition::from_value(value).unwrap_or_default()
}

impl FieldRegistryPort for InMemoryFieldRegistry {
    fn field_with_fallbacks(
        &self,
        field_name: &str,
        page_key: &str,
        entity_name: &str,
    ) -> Result<Option<FieldDefinition>> {
        let found = self
            .page
            .get(&(page_key.to_owned(), field_name.to_owned()))
            .or_else(|| {
                self.entity
                    .get(&(entity_name.to_owned(), field_name.to_owned()))
            })
            .or_else(|| self.common.get(field_name));
        Ok(found.cloned())
    }

    fn filter_and_validate_fields(
        &self,
        field_names: &[String],
        page_key: &str,
        entity_name: &str,
    ) -> Result<Vec<String>> {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();
        for name in field_names {
            if self
                .field_with_fallbacks(name, page_key, entity_name)?
                .is_some()
                && seen.insert(name.clone())
            {
                kept.push(name.clone());
            }
        }
        Ok(kept)
    }
}

/// Entity metadata backed by a map of entity name to class and fields.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityMetadata {
    entities: BTreeMap<String, (String, BTreeSet<String>)>,
}

impl InMemoryEntityMetadata {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity with its class name and field names.
    #[must_use]
    pub fn with_entity<I, S>(mut self, name: impl Into<String>, fqcn: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities.insert(
            name.into(),
            (fqcn.into(), fields.into_iter().map(Into::into).collect()),
        );
        self
    }
}

impl EntityMetadataPort for InMemoryEntityMetadata {
    fn resolve_entity(&self, entity_name: &str) -> Result<String> {
        self.entities
            .get(entity_name)
            .map(|(fqcn, _)| fqcn.clone())
            .ok_or_else(|| unknown_entity_error(entity_name))
    }

    fn has_field(&self, fqcn: &str, field_name: &str) -> bool {
        self.entities
            .values()
            .any(|(class, fields)| class == fqcn && fields.contains(field_name))
    }
}
