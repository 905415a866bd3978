//! Result alias for shared error handling.

use crate::errors::ErrorEnvelope;

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn result_defaults_to_error_envelope() {
        let value: Result<i32> = Err(ErrorEnvelope::expected(ErrorCode::not_found(), "missing"));
        let mapped = value.map_err(|error| error.with_metadata("key", "view.form"));

        assert!(mapped.is_err());
        if let Err(error) = mapped {
            assert_eq!(
                error.metadata.get("key").map(String::as_str),
                Some("view.form")
            );
        }
    }
}
