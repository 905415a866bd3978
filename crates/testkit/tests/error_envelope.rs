//! Integration tests for shared error propagation.

use form_resolver_shared::{ErrorCode, ErrorKind};
use form_resolver_testkit::errors::{entity_not_found_code, store_io_error, unknown_entity_error};

#[test]
fn error_envelope_crosses_crates() {
    let error = unknown_entity_error("ghost");
    assert!(error.has_code(&entity_not_found_code()));
    assert_eq!(error.kind, ErrorKind::Expected);
    assert_eq!(error.metadata.get("entityName").map(String::as_str), Some("ghost"));

    let boxed: Box<dyn std::error::Error> = Box::new(error);
    assert!(boxed.to_string().contains("ghost"));
}

#[test]
fn store_failures_are_unexpected_io_errors() {
    let error = store_io_error("view.form");
    assert_eq!(error.code, ErrorCode::io());
    assert_eq!(error.kind, ErrorKind::Unexpected);
    assert_eq!(error.metadata.get("key").map(String::as_str), Some("view.form"));
}
