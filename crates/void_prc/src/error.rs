//! Error types for PRC reading

use thiserror::Error;

/// The markup itself is not well-formed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// No root tag in the input
    #[error("Document has no root tag")]
    EmptyDocument,

    /// Input bytes are not UTF-8
    #[error("Document is not valid UTF-8")]
    InvalidUtf8,

    /// Input ended inside a construct
    #[error("Unexpected end of input on line {line}")]
    UnexpectedEof { line: usize },

    /// A character that cannot appear here
    #[error("Unexpected character '{found}' on line {line}")]
    UnexpectedChar { found: char, line: usize },

    /// Closing tag does not match the open one
    #[error("Mismatched closing tag on line {line}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        line: usize,
    },

    /// Tag was opened but never closed
    #[error("Tag <{name}> opened on line {line} is never closed")]
    UnclosedTag { name: String, line: usize },

    /// Unknown `&...;` entity
    #[error("Unknown entity '&{entity};' on line {line}")]
    UnknownEntity { entity: String, line: usize },

    /// The same parameter appears twice on one tag
    #[error("Duplicate parameter '{param}' on line {line}")]
    DuplicateParam { param: String, line: usize },

    /// Anything but whitespace or comments after the root tag
    #[error("Content after the root tag on line {line}")]
    TrailingContent { line: usize },

    /// Tags nested deeper than the parser allows
    #[error("Tags nested too deeply on line {line}")]
    TooDeep { line: usize },
}

impl MarkupError {
    /// Line the error was detected on, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            MarkupError::EmptyDocument | MarkupError::InvalidUtf8 => None,
            MarkupError::UnexpectedEof { line }
            | MarkupError::UnexpectedChar { line, .. }
            | MarkupError::MismatchedTag { line, .. }
            | MarkupError::UnclosedTag { line, .. }
            | MarkupError::UnknownEntity { line, .. }
            | MarkupError::DuplicateParam { line, .. }
            | MarkupError::TrailingContent { line }
            | MarkupError::TooDeep { line } => Some(*line),
        }
    }
}

/// The markup is well-formed but does not describe the expected value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Root tag name is not what the target type writes
    #[error("Expected <{expected}> tag, found <{found}>")]
    WrongTag { expected: String, found: String },

    /// Required parameter missing
    #[error("Tag <{tag}> is missing parameter '{param}'")]
    MissingParam { tag: String, param: String },

    /// Parameter present but unparsable
    #[error("Tag <{tag}> has invalid {param}=\"{value}\"")]
    InvalidParam {
        tag: String,
        param: String,
        value: String,
    },

    /// Required child tag missing
    #[error("Tag <{tag}> is missing child <{child}>")]
    MissingChild { tag: String, child: String },

    /// Any other content problem
    #[error("Invalid content in <{tag}>: {message}")]
    Invalid { tag: String, message: String },
}

impl TagError {
    /// Create a wrong-tag error
    pub fn wrong_tag(expected: impl Into<String>, found: impl Into<String>) -> Self {
        TagError::WrongTag {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a free-form content error
    pub fn invalid(tag: impl Into<String>, message: impl Into<String>) -> Self {
        TagError::Invalid {
            tag: tag.into(),
            message: message.into(),
        }
    }
}
