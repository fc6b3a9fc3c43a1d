//! Error types for state descriptors and records

use std::path::PathBuf;
use thiserror::Error;

/// Result type for state descriptor operations
pub type Result<T> = std::result::Result<T, SdlError>;

/// Errors raised while loading descriptors or reading/writing records
#[derive(Debug, Error)]
pub enum SdlError {
    /// Stream ended before a value was complete
    #[error("Unexpected end of stream: needed {needed} bytes at offset {offset}, {remaining} left")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// String data is not UTF-8
    #[error("Invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    /// Length does not fit the on-disk field
    #[error("{what} is too long to encode ({len} bytes)")]
    TooLong { what: &'static str, len: usize },

    /// No descriptor registered under that name/version
    #[error("Unknown state descriptor '{name}' version {version}")]
    UnknownDescriptor { name: String, version: u16 },

    /// No descriptor registered under that name at all
    #[error("Unknown state descriptor '{0}'")]
    UnknownDescriptorName(String),

    /// Descriptor registered twice
    #[error("State descriptor '{name}' version {version} is already registered")]
    DuplicateDescriptor { name: String, version: u16 },

    /// STATEDESC variable without a descriptor name
    #[error("Nested variable '{0}' names no state descriptor")]
    MissingNestedDescriptor(String),

    /// Value does not match the variable's declared type
    #[error("Type mismatch in '{variable}': expected {expected}, found {found}")]
    TypeMismatch {
        variable: String,
        expected: crate::types::VarType,
        found: crate::types::VarType,
    },

    /// Element count of a fixed-length variable cannot change
    #[error("Variable '{0}' has a fixed length")]
    FixedLength(String),

    /// Variable type code outside the type table
    #[error("Unknown variable type code {0}")]
    UnknownTypeCode(u8),

    /// Creatable class not registered with the factory
    #[error("Unknown creatable class 0x{0:04X}")]
    UnknownCreatable(u16),

    /// Nested descriptors recurse without end
    #[error("State descriptor '{0}' nests itself too deeply")]
    RecursionLimit(String),

    /// Element count no descriptor or stream can back
    #[error("Variable '{variable}' has too many elements ({count})")]
    CountTooLarge { variable: String, count: usize },

    /// Bad `.sdl` source
    #[error("SDL syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Default value does not parse for its type
    #[error("Invalid default '{value}' for variable '{variable}'")]
    InvalidDefault { variable: String, value: String },

    /// IO error
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SdlError {
    /// Create a syntax error
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        SdlError::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create an IO error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SdlError::Io {
            path: path.into(),
            source,
        }
    }
}
