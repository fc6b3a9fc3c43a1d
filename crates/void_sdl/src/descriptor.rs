//! State descriptors: the field layout of a record

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::VarType;

/// Largest element count a fixed-length variable may declare
pub const MAX_FIXED_COUNT: usize = 0xFFFF;

/// Layout of one variable in a descriptor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarDescriptor {
    /// Variable name
    pub name: String,
    /// Declared element type
    pub var_type: VarType,
    /// Element count for fixed-length variables (0 when variable-length)
    pub count: usize,
    /// Whether the count is read from the stream
    pub variable_length: bool,
    /// Nested descriptor name for STATEDESC variables
    pub state_desc: Option<String>,
    /// Default value text from the source
    pub default: Option<String>,
    /// `DEFAULTOPTION=` flag (e.g. `VAULT`)
    pub default_option: Option<String>,
    /// `DISPLAYOPTION=` flag (e.g. `hidden`, `red`)
    pub display_option: Option<String>,
}

impl VarDescriptor {
    /// Create a fixed-length variable
    pub fn new(name: impl Into<String>, var_type: VarType, count: usize) -> Self {
        Self {
            name: name.into(),
            var_type,
            count,
            variable_length: false,
            state_desc: None,
            default: None,
            default_option: None,
            display_option: None,
        }
    }

    /// Create a variable-length variable
    pub fn variable(name: impl Into<String>, var_type: VarType) -> Self {
        Self {
            variable_length: true,
            ..Self::new(name, var_type, 0)
        }
    }

    /// Create a nested-record variable
    pub fn nested(name: impl Into<String>, descriptor: impl Into<String>, count: Option<usize>) -> Self {
        let mut var = match count {
            Some(count) => Self::new(name, VarType::StateDescriptor, count),
            None => Self::variable(name, VarType::StateDescriptor),
        };
        var.state_desc = Some(descriptor.into());
        var
    }

    /// Builder: set the default value text
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether elements are nested records
    #[inline]
    pub fn is_state_descriptor(&self) -> bool {
        self.var_type.is_state_descriptor()
    }
}

/// A named, versioned record layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDescriptor {
    pub name: String,
    pub version: u16,
    pub vars: Vec<Arc<VarDescriptor>>,
}

impl StateDescriptor {
    /// Create an empty descriptor
    pub fn new(name: impl Into<String>, version: u16) -> Self {
        Self {
            name: name.into(),
            version,
            vars: Vec::new(),
        }
    }

    /// Builder: append a variable
    pub fn with_var(mut self, var: VarDescriptor) -> Self {
        self.vars.push(Arc::new(var));
        self
    }

    /// Number of variables
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// Find a variable by name
    pub fn find_var(&self, name: &str) -> Option<(usize, &VarDescriptor)> {
        self.vars
            .iter()
            .enumerate()
            .find(|(_, v)| v.name == name)
            .map(|(i, v)| (i, v.as_ref()))
    }
}
