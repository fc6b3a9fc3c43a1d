//! Typed leaf values held by state variables

use crate::creatable::{Creatable, CreatableFactory};
use crate::error::Result;
use crate::key::Uoid;
use crate::math::{Color32, ColorRgba, Matrix44, Quat, UnifiedTime, Vector3};
use crate::stream::{StreamReader, StreamWriter};
use crate::types::VarType;

/// One element of a non-STATEDESC variable.
///
/// The variant always matches the declared type of the owning variable.
#[derive(Debug)]
pub enum SdlValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Key(Uoid),
    Creatable(Option<Box<dyn Creatable>>),
    Double(f64),
    Time(UnifiedTime),
    Byte(u8),
    Short(i16),
    AgeTimeOfDay(f32),
    Vector3(Vector3),
    Point3(Vector3),
    Rgb(ColorRgba),
    Rgba(ColorRgba),
    Quaternion(Quat),
    Rgb8(Color32),
    Rgba8(Color32),
    Uint(u32),
    /// Single byte, shown as a Latin-1 character
    Char(u8),
    Matrix44(Matrix44),
    Buffer(Vec<u8>),
    AgeTimeElapsed(f64),
    GameTimeElapsed(f64),
}

impl SdlValue {
    /// Zero value for a type. `None` for STATEDESC, which holds records.
    pub fn default_for(var_type: VarType) -> Option<Self> {
        Some(match var_type {
            VarType::Int => SdlValue::Int(0),
            VarType::Float => SdlValue::Float(0.0),
            VarType::Bool => SdlValue::Bool(false),
            VarType::String => SdlValue::String(String::new()),
            VarType::Key => SdlValue::Key(Uoid::default()),
            VarType::StateDescriptor => return None,
            VarType::Creatable => SdlValue::Creatable(None),
            VarType::Double => SdlValue::Double(0.0),
            VarType::Time => SdlValue::Time(UnifiedTime::default()),
            VarType::Byte => SdlValue::Byte(0),
            VarType::Short => SdlValue::Short(0),
            VarType::AgeTimeOfDay => SdlValue::AgeTimeOfDay(0.0),
            VarType::Vector3 => SdlValue::Vector3(Vector3::default()),
            VarType::Point3 => SdlValue::Point3(Vector3::default()),
            VarType::Rgb => SdlValue::Rgb(ColorRgba::default()),
            VarType::Rgba => SdlValue::Rgba(ColorRgba::default()),
            VarType::Quaternion => SdlValue::Quaternion(Quat::default()),
            VarType::Rgb8 => SdlValue::Rgb8(Color32::default()),
            VarType::Rgba8 => SdlValue::Rgba8(Color32::default()),
            VarType::Uint => SdlValue::Uint(0),
            VarType::Char => SdlValue::Char(0),
            VarType::Matrix44 => SdlValue::Matrix44(Matrix44::default()),
            VarType::Buffer => SdlValue::Buffer(Vec::new()),
            VarType::AgeTimeElapsed => SdlValue::AgeTimeElapsed(0.0),
            VarType::GameTimeElapsed => SdlValue::GameTimeElapsed(0.0),
        })
    }

    /// Parse a `DEFAULT=` value from a descriptor source.
    ///
    /// `nil` and `empty` give the zero value for every type. Vectors,
    /// quaternions and colors take a parenthesized tuple: `(1, 0, 0)`.
    pub fn from_default(var_type: VarType, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("nil") || text.eq_ignore_ascii_case("empty") {
            return Self::default_for(var_type);
        }

        Some(match var_type {
            VarType::Int => SdlValue::Int(text.parse().ok()?),
            VarType::Short => SdlValue::Short(text.parse().ok()?),
            VarType::Uint => SdlValue::Uint(text.parse().ok()?),
            VarType::Byte => SdlValue::Byte(text.parse().ok()?),
            VarType::Float => SdlValue::Float(text.parse().ok()?),
            VarType::AgeTimeOfDay => SdlValue::AgeTimeOfDay(text.parse().ok()?),
            VarType::Double => SdlValue::Double(text.parse().ok()?),
            VarType::AgeTimeElapsed => SdlValue::AgeTimeElapsed(text.parse().ok()?),
            VarType::GameTimeElapsed => SdlValue::GameTimeElapsed(text.parse().ok()?),
            VarType::Bool => SdlValue::Bool(match text.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => return None,
            }),
            VarType::String => SdlValue::String(text.to_string()),
            VarType::Char => {
                let mut chars = text.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                SdlValue::Char(u8::try_from(u32::from(c)).ok()?)
            }
            VarType::Vector3 | VarType::Point3 => {
                let [x, y, z] = parse_tuple::<f32, 3>(text)?;
                let v = Vector3::new(x, y, z);
                if var_type == VarType::Vector3 {
                    SdlValue::Vector3(v)
                } else {
                    SdlValue::Point3(v)
                }
            }
            VarType::Quaternion => {
                let [x, y, z, w] = parse_tuple::<f32, 4>(text)?;
                SdlValue::Quaternion(Quat::new(x, y, z, w))
            }
            VarType::Rgb => {
                let [r, g, b] = parse_tuple::<f32, 3>(text)?;
                SdlValue::Rgb(ColorRgba::new(r, g, b, 1.0))
            }
            VarType::Rgba => {
                let [r, g, b, a] = parse_tuple::<f32, 4>(text)?;
                SdlValue::Rgba(ColorRgba::new(r, g, b, a))
            }
            VarType::Rgb8 => {
                let [r, g, b] = parse_tuple::<u8, 3>(text)?;
                SdlValue::Rgb8(Color32::new(r, g, b, u8::MAX))
            }
            VarType::Rgba8 => {
                let [r, g, b, a] = parse_tuple::<u8, 4>(text)?;
                SdlValue::Rgba8(Color32::new(r, g, b, a))
            }
            VarType::Key
            | VarType::Creatable
            | VarType::Time
            | VarType::Matrix44
            | VarType::Buffer
            | VarType::StateDescriptor => return None,
        })
    }

    /// Type this value was created for
    pub fn var_type(&self) -> VarType {
        match self {
            SdlValue::Int(_) => VarType::Int,
            SdlValue::Float(_) => VarType::Float,
            SdlValue::Bool(_) => VarType::Bool,
            SdlValue::String(_) => VarType::String,
            SdlValue::Key(_) => VarType::Key,
            SdlValue::Creatable(_) => VarType::Creatable,
            SdlValue::Double(_) => VarType::Double,
            SdlValue::Time(_) => VarType::Time,
            SdlValue::Byte(_) => VarType::Byte,
            SdlValue::Short(_) => VarType::Short,
            SdlValue::AgeTimeOfDay(_) => VarType::AgeTimeOfDay,
            SdlValue::Vector3(_) => VarType::Vector3,
            SdlValue::Point3(_) => VarType::Point3,
            SdlValue::Rgb(_) => VarType::Rgb,
            SdlValue::Rgba(_) => VarType::Rgba,
            SdlValue::Quaternion(_) => VarType::Quaternion,
            SdlValue::Rgb8(_) => VarType::Rgb8,
            SdlValue::Rgba8(_) => VarType::Rgba8,
            SdlValue::Uint(_) => VarType::Uint,
            SdlValue::Char(_) => VarType::Char,
            SdlValue::Matrix44(_) => VarType::Matrix44,
            SdlValue::Buffer(_) => VarType::Buffer,
            SdlValue::AgeTimeElapsed(_) => VarType::AgeTimeElapsed,
            SdlValue::GameTimeElapsed(_) => VarType::GameTimeElapsed,
        }
    }

    /// Read one element of the given type. `None` for STATEDESC.
    pub fn read(
        var_type: VarType,
        s: &mut StreamReader<'_>,
        factory: &CreatableFactory,
    ) -> Result<Option<Self>> {
        Ok(Some(match var_type {
            VarType::Int => SdlValue::Int(s.read_i32()?),
            VarType::Float => SdlValue::Float(s.read_f32()?),
            VarType::Bool => SdlValue::Bool(s.read_bool()?),
            VarType::String => SdlValue::String(s.read_string()?),
            VarType::Key => SdlValue::Key(Uoid::read(s)?),
            VarType::StateDescriptor => return Ok(None),
            VarType::Creatable => SdlValue::Creatable(factory.read_creatable(s)?),
            VarType::Double => SdlValue::Double(s.read_f64()?),
            VarType::Time => SdlValue::Time(UnifiedTime::read(s)?),
            VarType::Byte => SdlValue::Byte(s.read_u8()?),
            VarType::Short => SdlValue::Short(s.read_i16()?),
            VarType::AgeTimeOfDay => SdlValue::AgeTimeOfDay(s.read_f32()?),
            VarType::Vector3 => SdlValue::Vector3(Vector3::read(s)?),
            VarType::Point3 => SdlValue::Point3(Vector3::read(s)?),
            VarType::Rgb => SdlValue::Rgb(ColorRgba::read_rgb(s)?),
            VarType::Rgba => SdlValue::Rgba(ColorRgba::read_rgba(s)?),
            VarType::Quaternion => SdlValue::Quaternion(Quat::read(s)?),
            VarType::Rgb8 => SdlValue::Rgb8(Color32::read_rgb(s)?),
            VarType::Rgba8 => SdlValue::Rgba8(Color32::read_rgba(s)?),
            VarType::Uint => SdlValue::Uint(s.read_u32()?),
            VarType::Char => SdlValue::Char(s.read_u8()?),
            VarType::Matrix44 => SdlValue::Matrix44(Matrix44::read(s)?),
            VarType::Buffer => SdlValue::Buffer(s.read_buffer()?),
            VarType::AgeTimeElapsed => SdlValue::AgeTimeElapsed(s.read_f64()?),
            VarType::GameTimeElapsed => SdlValue::GameTimeElapsed(s.read_f64()?),
        }))
    }

    /// Write this element
    pub fn write(&self, s: &mut StreamWriter) -> Result<()> {
        match self {
            SdlValue::Int(v) => s.write_i32(*v),
            SdlValue::Float(v) | SdlValue::AgeTimeOfDay(v) => s.write_f32(*v),
            SdlValue::Bool(v) => s.write_bool(*v),
            SdlValue::String(v) => s.write_string(v)?,
            SdlValue::Key(v) => v.write(s)?,
            SdlValue::Creatable(v) => CreatableFactory::write_creatable(s, v.as_deref())?,
            SdlValue::Double(v) | SdlValue::AgeTimeElapsed(v) | SdlValue::GameTimeElapsed(v) => {
                s.write_f64(*v)
            }
            SdlValue::Time(v) => v.write(s),
            SdlValue::Byte(v) | SdlValue::Char(v) => s.write_u8(*v),
            SdlValue::Short(v) => s.write_i16(*v),
            SdlValue::Vector3(v) | SdlValue::Point3(v) => v.write(s),
            SdlValue::Rgb(v) => v.write_rgb(s),
            SdlValue::Rgba(v) => v.write_rgba(s),
            SdlValue::Quaternion(v) => v.write(s),
            SdlValue::Rgb8(v) => v.write_rgb(s),
            SdlValue::Rgba8(v) => v.write_rgba(s),
            SdlValue::Uint(v) => s.write_u32(*v),
            SdlValue::Matrix44(v) => v.write(s),
            SdlValue::Buffer(v) => s.write_buffer(v)?,
        }
        Ok(())
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            SdlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            SdlValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            SdlValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SdlValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<u8> {
        match self {
            SdlValue::Byte(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<u8> {
        match self {
            SdlValue::Char(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SdlValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Vector3> {
        match self {
            SdlValue::Vector3(v) | SdlValue::Point3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&Uoid> {
        match self {
            SdlValue::Key(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_creatable(&self) -> Option<&dyn Creatable> {
        match self {
            SdlValue::Creatable(v) => v.as_deref(),
            _ => None,
        }
    }
}

fn parse_tuple<T: core::str::FromStr, const N: usize>(text: &str) -> Option<[T; N]> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    let parts: Vec<T> = inner
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<Vec<T>>>()?;
    parts.try_into().ok()
}
