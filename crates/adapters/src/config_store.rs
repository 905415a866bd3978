//! Directory-backed config store.
//!
//! Layout under the root directory:
//! - `get("view.form")` reads `view/form.json` or `view/form.toml`
//! - `get("forms/schema")` reads `forms/schema.json` or `forms/schema.toml`
//! - `get_from_feature("Testy", "testy_view_edit")` reads
//!   `features/Testy/testy_view_edit.json` or `.toml`
//!
//! JSON wins when both files exist. A missing file is `Ok(None)`.

use form_resolver_ports::ConfigStorePort;
use form_resolver_shared::{ErrorCode, ErrorEnvelope, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

const FEATURES_DIR: &str = "features";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    const ALL: [Self; 2] = [Self::Json, Self::Toml];

    const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// Config store reading JSON or TOML files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryConfigStore {
    root: PathBuf,
}

impl DirectoryConfigStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, base: PathBuf) -> Result<Option<Value>> {
        for format in ConfigFormat::ALL {
            let path = base.with_extension(format.extension());
            if let Some(text) = read_optional(&path)? {
                return parse(&text, format, &path).map(Some);
            }
        }
        Ok(None)
    }
}

impl ConfigStorePort for DirectoryConfigStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let relative = key_path(key)?;
        self.read(self.root.join(relative))
    }

    fn get_from_feature(&self, feature: &str, key: &str) -> Result<Option<Value>> {
        let feature = segment("feature", feature)?;
        let relative = key_path(key)?;
        self.read(self.root.join(FEATURES_DIR).join(feature).join(relative))
    }
}

/// Map a store key to a relative path; `.` and `/` both separate segments.
fn key_path(key: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    for part in key.split(['.', '/']) {
        path.push(segment("key", part).map_err(|error| error.with_metadata("key", key))?);
    }
    Ok(path)
}

fn segment<'a>(label: &str, raw: &'a str) -> Result<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed != raw || trimmed.contains(['\\', ':', '/', '.']) {
        return Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_key"),
            format!("invalid {label} segment '{raw}'"),
        ));
    }
    Ok(trimmed)
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => {
            let code = match error.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    ErrorCode::new("config", "config_file_permission_denied")
                },
                _ => ErrorCode::new("config", "config_file_io"),
            };
            Err(
                ErrorEnvelope::unexpected(code, format!("failed to read config file: {error}"))
                    .with_metadata("path", path.to_string_lossy().to_string()),
            )
        },
    }
}

fn parse(text: &str, format: ConfigFormat, path: &Path) -> Result<Value> {
    let parsed = match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
        }),
        ConfigFormat::Toml => toml::from_str(text).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
        }),
    };
    parsed.map_err(|error| error.with_metadata("path", path.to_string_lossy().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_split_on_dots_and_slashes() -> Result<()> {
        assert_eq!(key_path("view.form")?, PathBuf::from("view").join("form"));
        assert_eq!(key_path("forms/schema")?, PathBuf::from("forms").join("schema"));
        assert_eq!(key_path("testy_view_edit")?, PathBuf::from("testy_view_edit"));
        Ok(())
    }

    #[test]
    fn traversal_and_empty_segments_are_rejected() {
        for key in ["../secrets", "view..form", "/etc/passwd", "", "view/ form", "c:\\x"] {
            let result = key_path(key);
            assert!(
                result.is_err_and(|error| error.has_code(&ErrorCode::new("config", "invalid_key"))),
                "{key} should be rejected"
            );
        }
    }
}
