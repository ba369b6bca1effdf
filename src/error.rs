//! Error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaginationError>;

/// Errors surfaced to callers.
///
/// Only caller misuse ends up here: malformed content handed to a slot, a
/// node placed where the schema forbids it, or a step addressing a node that
/// does not exist. Container invariant violations are repaired silently and
/// never produce an error.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("malformed content fragment: {0}")]
    MalformedFragment(#[from] roxmltree::Error),

    #[error("unsupported element <{tag}> in content fragment")]
    UnsupportedElement { tag: String },

    #[error("schema violation: {message}")]
    Schema { message: String },

    #[error("no node at path {path:?}")]
    InvalidPath { path: Vec<usize> },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaginationError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Whether this error reports a schema violation rather than a lookup failure.
    #[must_use]
    pub fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            Self::MalformedFragment(_) | Self::UnsupportedElement { .. } | Self::Schema { .. }
        )
    }
}
