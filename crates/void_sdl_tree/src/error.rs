//! Error types for tree navigation and editing

use thiserror::Error;
use void_prc::{MarkupError, TagError};

/// Result type for tree navigation
pub type Result<T> = std::result::Result<T, TreeError>;

/// Structural errors: a request that does not address a node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Values are leaves
    #[error("Value nodes have no children")]
    NoChildren,

    /// Row or column outside the parent's bounds
    #[error("Row {row}, column {column} is out of range (node has {count} children, 2 columns)")]
    IndexOutOfRange {
        row: usize,
        column: usize,
        count: usize,
    },

    /// Handle not issued by this model
    #[error("Handle was not issued by this model")]
    InvalidHandle,

    /// Every handle value is in use
    #[error("No handles left to issue")]
    HandlesExhausted,
}

/// Where in the edit pipeline a rejection happened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditStage {
    /// The target cell is not an editable value
    Request,
    /// Scalar text failed to parse or is out of range
    Validation,
    /// Composite text is not well-formed markup
    Markup,
    /// Markup is well-formed but does not describe the target value
    Semantic,
}

/// Reasons an edit is rejected. A rejected edit never mutates the record.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Only the data column of a value is editable")]
    NotEditable,

    #[error("Handle was not issued by this model")]
    InvalidHandle,

    #[error("'{0}' is neither True nor False")]
    InvalidBool(String),

    #[error("'{0}' is not an integer")]
    InvalidInteger(String),

    #[error("'{0}' is outside the byte range 0-255")]
    ByteOutOfRange(String),

    #[error("'{0}' is not a number")]
    InvalidFloat(String),

    #[error("'{0}' is not a single Latin-1 character")]
    InvalidChar(String),

    #[error("Malformed markup: {0}")]
    Markup(#[from] MarkupError),

    #[error("Invalid tag content: {0}")]
    Tag(#[from] TagError),

    #[error("Unhandled SDL Var Type ({0})")]
    UnhandledType(u8),

    #[error("Null creatable has no value to edit")]
    NullCreatable,
}

impl EditError {
    /// Pipeline stage that rejected the edit
    pub fn stage(&self) -> EditStage {
        match self {
            EditError::NotEditable | EditError::InvalidHandle | EditError::UnhandledType(_) => {
                EditStage::Request
            }
            EditError::InvalidBool(_)
            | EditError::InvalidInteger(_)
            | EditError::ByteOutOfRange(_)
            | EditError::InvalidFloat(_)
            | EditError::InvalidChar(_) => EditStage::Validation,
            EditError::Markup(_) => EditStage::Markup,
            EditError::Tag(_) | EditError::NullCreatable => EditStage::Semantic,
        }
    }
}

impl From<TreeError> for EditError {
    fn from(_: TreeError) -> Self {
        EditError::InvalidHandle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages() {
        assert_eq!(EditError::NotEditable.stage(), EditStage::Request);
        assert_eq!(EditError::ByteOutOfRange("300".into()).stage(), EditStage::Validation);
        assert_eq!(
            EditError::from(MarkupError::EmptyDocument).stage(),
            EditStage::Markup
        );
        assert_eq!(
            EditError::from(TagError::wrong_tag("hsVector3", "hsQuat")).stage(),
            EditStage::Semantic
        );
    }

    #[test]
    fn test_unhandled_message_carries_code() {
        assert_eq!(EditError::UnhandledType(59).to_string(), "Unhandled SDL Var Type (59)");
    }
}
