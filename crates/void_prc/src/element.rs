//! Parsed tag tree

use core::str::FromStr;

use crate::error::TagError;

/// One parsed tag with its parameters, text and children
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PrcElement {
    /// Tag name
    pub name: String,
    /// Parameters in source order
    pub params: Vec<(String, String)>,
    /// Concatenated text content, trimmed
    pub text: String,
    /// Child tags in source order
    pub children: Vec<PrcElement>,
    /// Line the tag was opened on (1-based)
    pub line: usize,
}

impl PrcElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Builder: add a child
    pub fn with_child(mut self, child: PrcElement) -> Self {
        self.children.push(child);
        self
    }

    /// Get a parameter value
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get a parameter value or report it missing
    pub fn require_param(&self, name: &str) -> Result<&str, TagError> {
        self.param(name).ok_or_else(|| TagError::MissingParam {
            tag: self.name.clone(),
            param: name.to_string(),
        })
    }

    /// Get and parse a required parameter
    pub fn parse_param<T: FromStr>(&self, name: &str) -> Result<T, TagError> {
        let raw = self.require_param(name)?;
        raw.trim().parse().map_err(|_| self.invalid_param(name, raw))
    }

    /// Get and parse a required hexadecimal (`0x` prefixed) parameter
    pub fn parse_hex_param(&self, name: &str) -> Result<u32, TagError> {
        let raw = self.require_param(name)?;
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| self.invalid_param(name, raw))?;
        u32::from_str_radix(digits, 16).map_err(|_| self.invalid_param(name, raw))
    }

    /// Check the tag name
    pub fn expect_name(&self, expected: &str) -> Result<(), TagError> {
        if self.name == expected {
            Ok(())
        } else {
            Err(TagError::wrong_tag(expected, self.name.clone()))
        }
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&PrcElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First child with the given name or report it missing
    pub fn require_child(&self, name: &str) -> Result<&PrcElement, TagError> {
        self.child(name).ok_or_else(|| TagError::MissingChild {
            tag: self.name.clone(),
            child: name.to_string(),
        })
    }

    fn invalid_param(&self, name: &str, value: &str) -> TagError {
        TagError::InvalidParam {
            tag: self.name.clone(),
            param: name.to_string(),
            value: value.to_string(),
        }
    }
}
