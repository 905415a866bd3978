//! Test fixtures for error codes and envelopes raised by collaborators.

use form_resolver_shared::{ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::io(),
        ErrorCode::internal(),
        entity_not_found_code(),
    ]
}

/// Code raised when an entity name does not resolve.
pub fn entity_not_found_code() -> ErrorCode {
    ErrorCode::new("entity", "not_found")
}

/// An unresolvable entity error fixture.
pub fn unknown_entity_error(entity_name: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(
        entity_not_found_code(),
        format!("entity '{entity_name}' is not registered"),
    )
    .with_metadata("entityName", entity_name)
}

/// An I/O failure from the config store.
pub fn store_io_error(key: &str) -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::io(), format!("failed to read '{key}'"))
        .with_metadata("key", key)
}
