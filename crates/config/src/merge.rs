//! Deep merge of a base configuration with a page override.
//!
//! Policy: recurse only when both sides are maps; any other pairing is
//! replaced wholesale by the override (arrays are never concatenated).

use serde_json::{Map, Value};

/// Merge `overrides` into `base` and return the result.
///
/// Keys only in `base` are kept, keys only in `overrides` are added, and a
/// shared key is merged recursively when both values are maps.
#[must_use]
pub fn deep_merge(mut base: Map<String, Value>, overrides: Map<String, Value>) -> Map<String, Value> {
    merge_into(&mut base, overrides);
    base
}

/// In-place form of [`deep_merge`].
pub fn merge_into(base: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
            },
            (_, value) => {
                base.insert(key, value);
            },
        }
    }
}
