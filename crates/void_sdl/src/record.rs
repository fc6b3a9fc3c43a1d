//! Records and variables: the in-memory form of a state blob

use std::sync::Arc;

use crate::creatable::CreatableFactory;
use crate::descriptor::{StateDescriptor, VarDescriptor, MAX_FIXED_COUNT};
use crate::error::{Result, SdlError};
use crate::registry::DescriptorRegistry;
use crate::stream::{StreamReader, StreamWriter};
use crate::value::SdlValue;

/// Nested records deeper than this are rejected
pub const MAX_NESTING_DEPTH: usize = 32;

/// Collaborators needed to decode a record
#[derive(Clone, Copy, Debug)]
pub struct ReadContext<'a> {
    pub registry: &'a DescriptorRegistry,
    pub factory: &'a CreatableFactory,
}

impl<'a> ReadContext<'a> {
    pub fn new(registry: &'a DescriptorRegistry, factory: &'a CreatableFactory) -> Self {
        Self { registry, factory }
    }
}

/// Elements of a variable
#[derive(Debug)]
pub enum VarData {
    /// Nested records of a STATEDESC variable
    Records(Vec<Record>),
    /// Typed leaf values of every other variable
    Values(Vec<SdlValue>),
}

/// A named, typed sequence of elements inside a record
#[derive(Debug)]
pub struct Variable {
    descriptor: Arc<VarDescriptor>,
    nested: Option<Arc<StateDescriptor>>,
    data: VarData,
}

impl Variable {
    fn with_defaults(
        descriptor: Arc<VarDescriptor>,
        registry: &DescriptorRegistry,
        depth: usize,
    ) -> Result<Self> {
        let count = if descriptor.variable_length { 0 } else { descriptor.count };
        if count > MAX_FIXED_COUNT {
            return Err(SdlError::CountTooLarge {
                variable: descriptor.name.clone(),
                count,
            });
        }

        if descriptor.is_state_descriptor() {
            let nested = resolve_nested(&descriptor, registry)?;
            let records = (0..count)
                .map(|_| Record::with_depth(nested.clone(), registry, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self {
                descriptor,
                nested: Some(nested),
                data: VarData::Records(records),
            });
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(default_value(&descriptor)?);
        }
        Ok(Self {
            descriptor,
            nested: None,
            data: VarData::Values(values),
        })
    }

    fn read(
        descriptor: Arc<VarDescriptor>,
        s: &mut StreamReader<'_>,
        ctx: ReadContext<'_>,
        depth: usize,
    ) -> Result<Self> {
        let count = if descriptor.variable_length {
            s.read_u32()? as usize
        } else {
            descriptor.count
        };

        if descriptor.is_state_descriptor() {
            let nested = resolve_nested(&descriptor, ctx.registry)?;
            let mut records = Vec::with_capacity(count.min(s.remaining()));
            for _ in 0..count {
                let start = s.position();
                records.push(Record::read_body(nested.clone(), s, ctx, depth + 1)?);
                // Empty bodies consume nothing, so the stream cannot bound their count
                if s.position() == start && count > s.remaining().max(MAX_FIXED_COUNT) {
                    return Err(SdlError::CountTooLarge {
                        variable: descriptor.name.clone(),
                        count,
                    });
                }
            }
            return Ok(Self {
                descriptor,
                nested: Some(nested),
                data: VarData::Records(records),
            });
        }

        let mut values = Vec::with_capacity(count.min(s.remaining()));
        for _ in 0..count {
            let value = SdlValue::read(descriptor.var_type, s, ctx.factory)?
                .ok_or(SdlError::UnknownTypeCode(descriptor.var_type.code()))?;
            values.push(value);
        }
        Ok(Self {
            descriptor,
            nested: None,
            data: VarData::Values(values),
        })
    }

    fn write(&self, s: &mut StreamWriter) -> Result<()> {
        if self.descriptor.variable_length {
            s.write_count(self.count())?;
        }
        match &self.data {
            VarData::Records(records) => {
                for record in records {
                    record.write_body(s)?;
                }
            }
            VarData::Values(values) => {
                for value in values {
                    value.write(s)?;
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<VarDescriptor> {
        &self.descriptor
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Descriptor of nested records, for STATEDESC variables
    pub fn nested_descriptor(&self) -> Option<&Arc<StateDescriptor>> {
        self.nested.as_ref()
    }

    /// Number of elements currently held
    pub fn count(&self) -> usize {
        match &self.data {
            VarData::Records(records) => records.len(),
            VarData::Values(values) => values.len(),
        }
    }

    #[inline]
    pub fn is_variable_length(&self) -> bool {
        self.descriptor.variable_length
    }

    #[inline]
    pub fn data(&self) -> &VarData {
        &self.data
    }

    pub fn records(&self) -> Option<&[Record]> {
        match &self.data {
            VarData::Records(records) => Some(records),
            VarData::Values(_) => None,
        }
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records()?.get(index)
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut Record> {
        match &mut self.data {
            VarData::Records(records) => records.get_mut(index),
            VarData::Values(_) => None,
        }
    }

    pub fn values(&self) -> Option<&[SdlValue]> {
        match &self.data {
            VarData::Values(values) => Some(values),
            VarData::Records(_) => None,
        }
    }

    pub fn value(&self, index: usize) -> Option<&SdlValue> {
        self.values()?.get(index)
    }

    pub fn value_mut(&mut self, index: usize) -> Option<&mut SdlValue> {
        match &mut self.data {
            VarData::Values(values) => values.get_mut(index),
            VarData::Records(_) => None,
        }
    }

    /// Append a value to a variable-length variable
    pub fn push_value(&mut self, value: SdlValue) -> Result<()> {
        if !self.descriptor.variable_length {
            return Err(SdlError::FixedLength(self.descriptor.name.clone()));
        }
        if value.var_type() != self.descriptor.var_type {
            return Err(SdlError::TypeMismatch {
                variable: self.descriptor.name.clone(),
                expected: self.descriptor.var_type,
                found: value.var_type(),
            });
        }
        match &mut self.data {
            VarData::Values(values) => {
                values.push(value);
                Ok(())
            }
            VarData::Records(_) => Err(SdlError::TypeMismatch {
                variable: self.descriptor.name.clone(),
                expected: self.descriptor.var_type,
                found: value.var_type(),
            }),
        }
    }
}

/// A named, versioned set of variables laid out by its descriptor
#[derive(Debug)]
pub struct Record {
    descriptor: Arc<StateDescriptor>,
    vars: Vec<Variable>,
}

impl Record {
    /// Create a record holding every variable's default value
    pub fn new(descriptor: Arc<StateDescriptor>, registry: &DescriptorRegistry) -> Result<Self> {
        Self::with_depth(descriptor, registry, 0)
    }

    fn with_depth(
        descriptor: Arc<StateDescriptor>,
        registry: &DescriptorRegistry,
        depth: usize,
    ) -> Result<Self> {
        if depth > MAX_NESTING_DEPTH {
            return Err(SdlError::RecursionLimit(descriptor.name.clone()));
        }
        let vars = descriptor
            .vars
            .iter()
            .map(|var| Variable::with_defaults(var.clone(), registry, depth))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { descriptor, vars })
    }

    /// Read `name` and `version` from the front of a blob
    pub fn read_stream_header(s: &mut StreamReader<'_>) -> Result<(String, u16)> {
        let name = s.read_string()?;
        let version = s.read_u16()?;
        Ok((name, version))
    }

    /// Write this record's `name` and `version`
    pub fn write_stream_header(&self, s: &mut StreamWriter) -> Result<()> {
        s.write_string(&self.descriptor.name)?;
        s.write_u16(self.descriptor.version);
        Ok(())
    }

    /// Read a record body laid out by `descriptor`
    pub fn read_body(
        descriptor: Arc<StateDescriptor>,
        s: &mut StreamReader<'_>,
        ctx: ReadContext<'_>,
        depth: usize,
    ) -> Result<Self> {
        if depth > MAX_NESTING_DEPTH {
            return Err(SdlError::RecursionLimit(descriptor.name.clone()));
        }
        let mut vars = Vec::with_capacity(descriptor.num_vars());
        for var in &descriptor.vars {
            vars.push(Variable::read(var.clone(), s, ctx, depth)?);
        }
        Ok(Self { descriptor, vars })
    }

    /// Write the body (no header)
    pub fn write_body(&self, s: &mut StreamWriter) -> Result<()> {
        for var in &self.vars {
            var.write(s)?;
        }
        Ok(())
    }

    /// Decode a complete blob: header, then body
    pub fn read_blob(data: &[u8], ctx: ReadContext<'_>) -> Result<Self> {
        let mut s = StreamReader::new(data);
        let (name, version) = Self::read_stream_header(&mut s)?;
        let descriptor = ctx.registry.get(&name, version)?;
        let record = Self::read_body(descriptor, &mut s, ctx, 0)?;
        if !s.is_at_end() {
            log::warn!(
                "{} bytes left after reading {} v{}",
                s.remaining(),
                name,
                version
            );
        }
        log::debug!("Read record {} v{} ({} bytes)", name, version, s.position());
        Ok(record)
    }

    /// Encode header and body
    pub fn write_blob(&self) -> Result<Vec<u8>> {
        let mut s = StreamWriter::new();
        self.write_stream_header(&mut s)?;
        self.write_body(&mut s)?;
        Ok(s.into_bytes())
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<StateDescriptor> {
        &self.descriptor
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    #[inline]
    pub fn version(&self) -> u16 {
        self.descriptor.version
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn var(&self, index: usize) -> Option<&Variable> {
        self.vars.get(index)
    }

    pub fn var_mut(&mut self, index: usize) -> Option<&mut Variable> {
        self.vars.get_mut(index)
    }

    pub fn find_var(&self, name: &str) -> Option<&Variable> {
        self.vars.iter().find(|v| v.name() == name)
    }
}

fn resolve_nested(var: &VarDescriptor, registry: &DescriptorRegistry) -> Result<Arc<StateDescriptor>> {
    let name = var
        .state_desc
        .as_deref()
        .ok_or_else(|| SdlError::MissingNestedDescriptor(var.name.clone()))?;
    registry.latest(name)
}

fn default_value(var: &VarDescriptor) -> Result<SdlValue> {
    if let Some(text) = &var.default {
        if let Some(value) = SdlValue::from_default(var.var_type, text) {
            return Ok(value);
        }
        log::warn!("Ignoring invalid default '{}' for {}", text, var.name);
    }
    SdlValue::default_for(var.var_type).ok_or(SdlError::UnknownTypeCode(var.var_type.code()))
}
