//! Variable type table

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SdlError};

/// Declared element type of a state variable.
///
/// Discriminants are the on-disk type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VarType {
    Int = 0,
    Float = 1,
    Bool = 2,
    String = 3,
    Key = 4,
    StateDescriptor = 5,
    Creatable = 6,
    Double = 7,
    Time = 8,
    Byte = 9,
    Short = 10,
    AgeTimeOfDay = 11,
    Vector3 = 50,
    Point3 = 51,
    Rgb = 52,
    Rgba = 53,
    Quaternion = 54,
    Rgb8 = 55,
    Rgba8 = 56,
    Uint = 57,
    Char = 58,
    Matrix44 = 59,
    Buffer = 60,
    AgeTimeElapsed = 61,
    GameTimeElapsed = 62,
}

impl VarType {
    /// Every type in code order
    pub const ALL: [VarType; 25] = [
        VarType::Int,
        VarType::Float,
        VarType::Bool,
        VarType::String,
        VarType::Key,
        VarType::StateDescriptor,
        VarType::Creatable,
        VarType::Double,
        VarType::Time,
        VarType::Byte,
        VarType::Short,
        VarType::AgeTimeOfDay,
        VarType::Vector3,
        VarType::Point3,
        VarType::Rgb,
        VarType::Rgba,
        VarType::Quaternion,
        VarType::Rgb8,
        VarType::Rgba8,
        VarType::Uint,
        VarType::Char,
        VarType::Matrix44,
        VarType::Buffer,
        VarType::AgeTimeElapsed,
        VarType::GameTimeElapsed,
    ];

    /// Raw type code
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a type by code
    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or(SdlError::UnknownTypeCode(code))
    }

    /// Upper-case name as written in `.sdl` sources and the Type column
    pub const fn name(self) -> &'static str {
        match self {
            VarType::Int => "INT",
            VarType::Float => "FLOAT",
            VarType::Bool => "BOOL",
            VarType::String => "STRING",
            VarType::Key => "KEY",
            VarType::StateDescriptor => "STATEDESC",
            VarType::Creatable => "CREATABLE",
            VarType::Double => "DOUBLE",
            VarType::Time => "TIME",
            VarType::Byte => "BYTE",
            VarType::Short => "SHORT",
            VarType::AgeTimeOfDay => "AGETIMEOFDAY",
            VarType::Vector3 => "VECTOR3",
            VarType::Point3 => "POINT3",
            VarType::Rgb => "RGB",
            VarType::Rgba => "RGBA",
            VarType::Quaternion => "QUATERNION",
            VarType::Rgb8 => "RGB8",
            VarType::Rgba8 => "RGBA8",
            VarType::Uint => "UINT",
            VarType::Char => "CHAR",
            VarType::Matrix44 => "MATRIX44",
            VarType::Buffer => "BUFFER",
            VarType::AgeTimeElapsed => "AGETIMEELAPSED",
            VarType::GameTimeElapsed => "GAMETIMEELAPSED",
        }
    }

    /// Look up a type by its `.sdl` name (case-insensitive).
    ///
    /// `$Name` nested descriptor references are not handled here.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            // Short aliases seen in older sources
            "PLKEY" => Some(VarType::Key),
            "POINT" => Some(VarType::Point3),
            "VECTOR" => Some(VarType::Vector3),
            "QUAT" => Some(VarType::Quaternion),
            _ => Self::ALL.iter().copied().find(|t| t.name() == upper),
        }
    }

    /// Whether elements are nested records rather than values
    #[inline]
    pub const fn is_state_descriptor(self) -> bool {
        matches!(self, VarType::StateDescriptor)
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for ty in VarType::ALL {
            assert_eq!(VarType::from_code(ty.code()).unwrap(), ty);
            assert_eq!(VarType::from_name(ty.name()), Some(ty));
        }
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(VarType::StateDescriptor.code(), 5);
        assert_eq!(VarType::Vector3.code(), 50);
        assert_eq!(VarType::GameTimeElapsed.code(), 62);
        assert!(matches!(VarType::from_code(20), Err(SdlError::UnknownTypeCode(20))));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(VarType::from_name("point"), Some(VarType::Point3));
        assert_eq!(VarType::from_name("Quat"), Some(VarType::Quaternion));
        assert_eq!(VarType::from_name("NOPE"), None);
    }
}
