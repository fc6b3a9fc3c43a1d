//! # void_sdl - State Descriptors and Records
//!
//! A state descriptor is a named, versioned field layout. A record is one
//! snapshot laid out by such a descriptor:
//! - Variables of 25 element types, fixed- or variable-length
//! - Nested records through `$Descriptor` variables
//! - Composite values (keys, colors, vectors, creatables) with PRC markup
//! - A little-endian binary stream format for whole records
//!
//! Descriptors are loaded from `.sdl` source into a [`DescriptorRegistry`];
//! records are decoded with [`Record::read_blob`] and saved back with
//! [`Record::write_blob`].

pub mod creatable;
pub mod descriptor;
pub mod error;
pub mod key;
pub mod math;
pub mod record;
pub mod registry;
pub mod sdl_parser;
pub mod stream;
pub mod types;
pub mod value;

pub use creatable::{Creatable, CreatableFactory, GenericType, GenericValue, NULL_CLASS_INDEX};
pub use descriptor::{StateDescriptor, VarDescriptor, MAX_FIXED_COUNT};
pub use error::{Result, SdlError};
pub use key::{Location, Uoid};
pub use math::{Color32, ColorRgba, Matrix44, Quat, UnifiedTime, Vector3};
pub use record::{ReadContext, Record, VarData, Variable, MAX_NESTING_DEPTH};
pub use registry::DescriptorRegistry;
pub use stream::{StreamReader, StreamWriter};
pub use types::VarType;
pub use value::SdlValue;

/// Prelude
pub mod prelude {
    pub use crate::{
        Creatable, CreatableFactory, DescriptorRegistry, ReadContext, Record, SdlError, SdlValue,
        StateDescriptor, VarDescriptor, VarType, Variable,
    };
}
