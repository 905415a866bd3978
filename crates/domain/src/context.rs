//! Validation context selecting which sections of a field definition are checked.

use form_resolver_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which part of a field definition is schema-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationContext {
    /// List display only (`list` section).
    List,
    /// Form editing only (`form` and `validators` sections).
    Form,
    /// Both list and form.
    Full,
}

impl ValidationContext {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Form => "form",
            Self::Full => "full",
        }
    }

    /// True for `list` and `full`.
    #[must_use]
    pub const fn includes_list(self) -> bool {
        matches!(self, Self::List | Self::Full)
    }

    /// True for `form` and `full`.
    #[must_use]
    pub const fn includes_form(self) -> bool {
        matches!(self, Self::Form | Self::Full)
    }
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A context string outside `{list, form, full}`.
///
/// This is a caller contract violation, not a data problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidContextError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for InvalidContextError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Invalid validation context '{}'. Must be one of: list, form, full.",
            self.input
        )
    }
}

impl std::error::Error for InvalidContextError {}

impl From<InvalidContextError> for ErrorEnvelope {
    fn from(error: InvalidContextError) -> Self {
        let message = error.to_string();
        Self::invariant(ErrorCode::invalid_input(), message).with_metadata("context", error.input)
    }
}

impl FromStr for ValidationContext {
    type Err = InvalidContextError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "list" => Ok(Self::List),
            "form" => Ok(Self::Form),
            "full" => Ok(Self::Full),
            other => Err(InvalidContextError {
                input: other.to_owned(),
            }),
        }
    }
}
