//! Bridge from [`LoggerPort`] events to the `tracing` ecosystem.
//!
//! `tracing` has no critical level; critical events are emitted at `ERROR`
//! with `critical = true`.

use form_resolver_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use serde_json::{Map, Value};

/// Logger forwarding events to the current `tracing` subscriber.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Create a logger without base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let mut fields = self.base_fields.clone();
        fields.extend(event.fields.unwrap_or_default());
        let fields = render_fields(fields);
        let error = event.error.map(|error| error.to_string()).unwrap_or_default();
        let name = &*event.event;
        let message = &*event.message;

        match event.level {
            LogLevel::Debug => tracing::debug!(event = name, fields = %fields, "{message}"),
            LogLevel::Info => tracing::info!(event = name, fields = %fields, "{message}"),
            LogLevel::Warn => tracing::warn!(event = name, fields = %fields, "{message}"),
            LogLevel::Error => {
                tracing::error!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Critical => tracing::error!(
                event = name,
                critical = true,
                fields = %fields,
                error = %error,
                "{message}"
            ),
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self { base_fields })
    }
}

fn render_fields(fields: LogFields) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(key, value)| (key.into_string(), value))
            .collect::<Map<String, Value>>(),
    )
}
