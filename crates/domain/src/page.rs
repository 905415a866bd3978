//! Page identity primitives and the config keys derived from them.

use form_resolver_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation failures for page identity components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageIdentityError {
    /// A component is empty after trimming.
    EmptyComponent {
        /// Component name (e.g. `pageKey`).
        component: &'static str,
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// A component contains a path separator or traversal segment.
    UnsafeComponent {
        /// Component name (e.g. `pageFeature`).
        component: &'static str,
        /// Trimmed value that failed validation.
        input: String,
    },
}

impl PageIdentityError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyComponent { .. } => ErrorCode::new("domain", "empty_page_component"),
            Self::UnsafeComponent { .. } => ErrorCode::new("domain", "unsafe_page_component"),
        }
    }
}

impl fmt::Display for PageIdentityError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyComponent { component, .. } => {
                write!(formatter, "{component} must be non-empty")
            },
            Self::UnsafeComponent { component, input } => write!(
                formatter,
                "{component} must not contain path separators or '..' (got '{input}')"
            ),
        }
    }
}

impl std::error::Error for PageIdentityError {}

impl From<PageIdentityError> for ErrorEnvelope {
    fn from(error: PageIdentityError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            PageIdentityError::EmptyComponent {
                component,
                input_length,
            } => envelope
                .with_metadata("component", component)
                .with_metadata("input_length", input_length.to_string()),
            PageIdentityError::UnsafeComponent { component, input } => envelope
                .with_metadata("component", component)
                .with_metadata("input", input),
        }
    }
}

/// Identity of the page whose form configuration is being resolved.
///
/// Every component is trimmed and non-empty. The feature, name and action
/// are used to build store keys and must not contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIdentity {
    page_key: Box<str>,
    page_name: Box<str>,
    page_action: Box<str>,
    page_feature: Box<str>,
    page_entity: Box<str>,
}

impl PageIdentity {
    /// Build a validated page identity.
    pub fn new(
        page_key: impl AsRef<str>,
        page_name: impl AsRef<str>,
        page_action: impl AsRef<str>,
        page_feature: impl AsRef<str>,
        page_entity: impl AsRef<str>,
    ) -> Result<Self, PageIdentityError> {
        Ok(Self {
            page_key: key_component("pageKey", page_key.as_ref())?,
            page_name: key_component("pageName", page_name.as_ref())?,
            page_action: key_component("pageAction", page_action.as_ref())?,
            page_feature: key_component("pageFeature", page_feature.as_ref())?,
            page_entity: non_empty("pageEntity", page_entity.as_ref())?,
        })
    }

    /// Page key (e.g. `testy_edit`).
    #[must_use]
    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    /// Page name (e.g. `testy`).
    #[must_use]
    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// Page action (e.g. `edit`).
    #[must_use]
    pub fn page_action(&self) -> &str {
        &self.page_action
    }

    /// Owning feature (e.g. `Testy`).
    #[must_use]
    pub fn page_feature(&self) -> &str {
        &self.page_feature
    }

    /// Entity backing the form (e.g. `testy`).
    #[must_use]
    pub fn page_entity(&self) -> &str {
        &self.page_entity
    }

    /// Feature-scoped store key of the page override: `{pageName}_view_{pageAction}`.
    #[must_use]
    pub fn page_config_key(&self) -> String {
        format!("{}_view_{}", self.page_name, self.page_action)
    }

    /// Human-facing identifier used in diagnostics: `{pageFeature}/Config/{pageKey}_view.php`.
    #[must_use]
    pub fn config_identifier(&self) -> String {
        format!("{}/Config/{}_view.php", self.page_feature, self.page_key)
    }
}

impl fmt::Display for PageIdentity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{} ({}/{}, entity {})",
            self.page_feature, self.page_key, self.page_name, self.page_action, self.page_entity
        )
    }
}

fn non_empty(component: &'static str, raw: &str) -> Result<Box<str>, PageIdentityError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PageIdentityError::EmptyComponent {
            component,
            input_length: raw.len(),
        });
    }
    Ok(trimmed.to_owned().into_boxed_str())
}

fn key_component(component: &'static str, raw: &str) -> Result<Box<str>, PageIdentityError> {
    let value = non_empty(component, raw)?;
    if value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(PageIdentityError::UnsafeComponent {
            component,
            input: value.into_string(),
        });
    }
    Ok(value)
}
