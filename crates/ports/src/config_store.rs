//! Configuration store boundary contract.

use form_resolver_shared::Result;
use serde_json::Value;

/// Key/value access to configuration trees.
///
/// A missing key is `Ok(None)`; `Err` is reserved for store failures
/// (unreadable file, malformed payload).
pub trait ConfigStorePort: Send + Sync {
    /// Fetch a global configuration tree (e.g. `view.form`, `forms/schema`).
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Fetch a feature-scoped configuration tree (e.g. `testy_view_edit` under `Testy`).
    fn get_from_feature(&self, feature: &str, key: &str) -> Result<Option<Value>>;
}
