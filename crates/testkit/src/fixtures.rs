//! JSON fixture loading for integration tests.
//!
//! Fixtures live under `crates/testkit/fixtures/`:
//! - `store/` is a directory-backed config store root
//! - `registry/fields.json` is a field catalog
//! - `entities/catalog.json` is an entity catalog

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::{fmt, fs};

/// Errors raised while loading fixtures.
#[derive(Debug)]
pub enum FixtureError {
    /// Fixture file does not exist.
    MissingFixture {
        /// Path that could not be found.
        path: PathBuf,
    },
    /// Fixture file could not be read.
    FixtureRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Fixture file could not be parsed.
    FixtureParse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFixture { path } => {
                write!(formatter, "missing fixture: {}", path.display())
            },
            Self::FixtureRead { path, source } => {
                write!(
                    formatter,
                    "failed to read fixture {}: {}",
                    path.display(),
                    source
                )
            },
            Self::FixtureParse { path, source } => {
                write!(
                    formatter,
                    "failed to parse fixture {}: {}",
                    path.display(),
                    source
                )
            },
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FixtureRead { source, .. } => Some(source),
            Self::FixtureParse { source, .. } => Some(source),
            Self::MissingFixture { .. } => None,
        }
    }
}

/// Root directory of the testkit fixtures.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Root directory of the config store fixture.
pub fn store_fixture_root() -> PathBuf {
    fixture_root().join("store")
}

/// Path of the field catalog fixture.
pub fn field_catalog_path() -> PathBuf {
    fixture_root().join("registry").join("fields.json")
}

/// Path of the entity catalog fixture.
pub fn entity_catalog_path() -> PathBuf {
    fixture_root().join("entities").join("catalog.json")
}

/// Load and deserialize a JSON fixture relative to [`fixture_root`].
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> Result<T, FixtureError> {
    let path = fixture_root().join(relative_path);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(FixtureError::MissingFixture { path });
        },
        Err(error) => {
            return Err(FixtureError::FixtureRead {
                path,
                source: error,
            });
        },
    };

    serde_json::from_str(&contents).map_err(|error| FixtureError::FixtureParse {
        path,
        source: error,
    })
}
