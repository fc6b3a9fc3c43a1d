//! Polymorphic objects embedded in state variables
//!
//! A creatable is written as a class index followed by the object's own
//! body. The [`CreatableFactory`] maps class indices to constructors so
//! records can be read without knowing the concrete types up front.

use core::fmt;
use std::collections::BTreeMap;

use void_prc::{PrcElement, PrcSerializable, PrcWriter, TagError};

use crate::error::{Result, SdlError};
use crate::stream::{StreamReader, StreamWriter};

/// Class index written for an absent object
pub const NULL_CLASS_INDEX: u16 = 0x8000;

/// An object that can live inside a CREATABLE variable
pub trait Creatable: PrcSerializable + fmt::Debug + Send + Sync {
    /// Class index written ahead of the body
    fn class_index(&self) -> u16;

    /// Class name, also the root tag in markup
    fn class_name(&self) -> &'static str;

    /// Read the body (the class index has already been consumed)
    fn read(&mut self, s: &mut StreamReader<'_>) -> Result<()>;

    /// Write the body (without the class index)
    fn write(&self, s: &mut StreamWriter) -> Result<()>;
}

type Constructor = Box<dyn Fn() -> Box<dyn Creatable> + Send + Sync>;

/// Constructs creatables by class index
pub struct CreatableFactory {
    constructors: BTreeMap<u16, (&'static str, Constructor)>,
}

impl CreatableFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Create a factory with the built-in classes registered
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register::<GenericValue>();
        factory
    }

    /// Register a class. Its default instance supplies the index and name.
    pub fn register<T: Creatable + Default + 'static>(&mut self) -> &mut Self {
        let probe = T::default();
        let index = probe.class_index();
        let name = probe.class_name();
        if self
            .constructors
            .insert(index, (name, Box::new(|| Box::new(T::default()))))
            .is_some()
        {
            log::warn!("Creatable class 0x{:04X} ({}) registered twice", index, name);
        }
        self
    }

    /// Whether a class index is known
    pub fn contains(&self, class_index: u16) -> bool {
        self.constructors.contains_key(&class_index)
    }

    /// Name of a registered class
    pub fn class_name(&self, class_index: u16) -> Option<&'static str> {
        self.constructors.get(&class_index).map(|(name, _)| *name)
    }

    /// Construct a default instance
    pub fn create(&self, class_index: u16) -> Result<Box<dyn Creatable>> {
        self.constructors
            .get(&class_index)
            .map(|(_, ctor)| ctor())
            .ok_or(SdlError::UnknownCreatable(class_index))
    }

    /// Read a class index and, unless null, the object body
    pub fn read_creatable(&self, s: &mut StreamReader<'_>) -> Result<Option<Box<dyn Creatable>>> {
        let class_index = s.read_u16()?;
        if class_index == NULL_CLASS_INDEX {
            return Ok(None);
        }
        let mut object = self.create(class_index)?;
        object.read(s)?;
        Ok(Some(object))
    }

    /// Write a class index and, unless null, the object body
    pub fn write_creatable(s: &mut StreamWriter, object: Option<&dyn Creatable>) -> Result<()> {
        match object {
            Some(object) => {
                s.write_u16(object.class_index());
                object.write(s)
            }
            None => {
                s.write_u16(NULL_CLASS_INDEX);
                Ok(())
            }
        }
    }
}

impl Default for CreatableFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CreatableFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.constructors.iter().map(|(index, (name, _))| (index, name)))
            .finish()
    }
}

/// Payload of a [`GenericValue`]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GenericType {
    #[default]
    None,
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Double(f64),
}

impl GenericType {
    fn kind(&self) -> u8 {
        match self {
            GenericType::None => 0,
            GenericType::Int(_) => 1,
            GenericType::Float(_) => 2,
            GenericType::Bool(_) => 3,
            GenericType::String(_) => 4,
            GenericType::Double(_) => 5,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            GenericType::None => "none",
            GenericType::Int(_) => "int",
            GenericType::Float(_) => "float",
            GenericType::Bool(_) => "bool",
            GenericType::String(_) => "string",
            GenericType::Double(_) => "double",
        }
    }
}

/// A single typed value wrapped as a creatable
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericValue {
    pub value: GenericType,
}

impl GenericValue {
    pub const CLASS_INDEX: u16 = 0x0387;
    pub const CLASS_NAME: &'static str = "plCreatableGenericValue";
    const VALUE_TAG: &'static str = "plGenericType";

    pub fn new(value: GenericType) -> Self {
        Self { value }
    }
}

impl Creatable for GenericValue {
    fn class_index(&self) -> u16 {
        Self::CLASS_INDEX
    }

    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn read(&mut self, s: &mut StreamReader<'_>) -> Result<()> {
        let offset = s.position();
        self.value = match s.read_u8()? {
            0 => GenericType::None,
            1 => GenericType::Int(s.read_i32()?),
            2 => GenericType::Float(s.read_f32()?),
            3 => GenericType::Bool(s.read_bool()?),
            4 => GenericType::String(s.read_string()?),
            5 => GenericType::Double(s.read_f64()?),
            other => {
                log::warn!("Unknown generic value kind {} at offset {}", other, offset);
                return Err(SdlError::UnknownTypeCode(other));
            }
        };
        Ok(())
    }

    fn write(&self, s: &mut StreamWriter) -> Result<()> {
        s.write_u8(self.value.kind());
        match &self.value {
            GenericType::None => {}
            GenericType::Int(v) => s.write_i32(*v),
            GenericType::Float(v) => s.write_f32(*v),
            GenericType::Bool(v) => s.write_bool(*v),
            GenericType::String(v) => s.write_string(v)?,
            GenericType::Double(v) => s.write_f64(*v),
        }
        Ok(())
    }
}

impl PrcSerializable for GenericValue {
    fn prc_write(&self, prc: &mut PrcWriter) {
        prc.start_tag(Self::CLASS_NAME);
        prc.end_tag(false);

        prc.start_tag(Self::VALUE_TAG);
        prc.write_param("Type", self.value.kind_name());
        match &self.value {
            GenericType::None => {}
            GenericType::Int(v) => prc.write_param("Value", v),
            GenericType::Float(v) => prc.write_param("Value", v),
            GenericType::Bool(v) => prc.write_param("Value", v),
            GenericType::String(v) => prc.write_param("Value", v),
            GenericType::Double(v) => prc.write_param("Value", v),
        }
        prc.end_tag(true);

        prc.close_tag();
    }

    fn prc_parse(&mut self, tag: &PrcElement) -> core::result::Result<(), TagError> {
        tag.expect_name(Self::CLASS_NAME)?;
        let child = tag.require_child(Self::VALUE_TAG)?;

        let value = match child.require_param("Type")? {
            "none" => GenericType::None,
            "int" => GenericType::Int(child.parse_param("Value")?),
            "float" => GenericType::Float(child.parse_param("Value")?),
            "bool" => GenericType::Bool(child.parse_param("Value")?),
            "string" => GenericType::String(child.require_param("Value")?.to_string()),
            "double" => GenericType::Double(child.parse_param("Value")?),
            other => {
                return Err(TagError::InvalidParam {
                    tag: child.name.clone(),
                    param: "Type".into(),
                    value: other.to_string(),
                })
            }
        };
        self.value = value;
        Ok(())
    }
}
