//! Composite value types stored in state variables

use void_prc::{PrcElement, PrcSerializable, PrcWriter, TagError};

use crate::error::Result;
use crate::stream::{StreamReader, StreamWriter};

/// 3-component vector (also used for points)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Tag name in markup
    pub const TAG: &'static str = "hsVector3";

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn read(s: &mut StreamReader<'_>) -> Result<Self> {
        Ok(Self::new(s.read_f32()?, s.read_f32()?, s.read_f32()?))
    }

    pub fn write(&self, s: &mut StreamWriter) {
        s.write_f32(self.x);
        s.write_f32(self.y);
        s.write_f32(self.z);
    }
}

impl PrcSerializable for Vector3 {
    fn prc_write(&self, prc: &mut PrcWriter) {
        prc.start_tag(Self::TAG);
        prc.write_param("X", self.x);
        prc.write_param("Y", self.y);
        prc.write_param("Z", self.z);
        prc.end_tag(true);
    }

    fn prc_parse(&mut self, tag: &PrcElement) -> core::result::Result<(), TagError> {
        tag.expect_name(Self::TAG)?;
        let parsed = Self::new(tag.parse_param("X")?, tag.parse_param("Y")?, tag.parse_param("Z")?);
        *self = parsed;
        Ok(())
    }
}

/// Rotation quaternion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// Tag name in markup
    pub const TAG: &'static str = "hsQuat";

    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn read(s: &mut StreamReader<'_>) -> Result<Self> {
        Ok(Self::new(s.read_f32()?, s.read_f32()?, s.read_f32()?, s.read_f32()?))
    }

    pub fn write(&self, s: &mut StreamWriter) {
        s.write_f32(self.x);
        s.write_f32(self.y);
        s.write_f32(self.z);
        s.write_f32(self.w);
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PrcSerializable for Quat {
    fn prc_write(&self, prc: &mut PrcWriter) {
        prc.start_tag(Self::TAG);
        prc.write_param("X", self.x);
        prc.write_param("Y", self.y);
        prc.write_param("Z", self.z);
        prc.write_param("W", self.w);
        prc.end_tag(true);
    }

    fn prc_parse(&mut self, tag: &PrcElement) -> core::result::Result<(), TagError> {
        tag.expect_name(Self::TAG)?;
        let parsed = Self::new(
            tag.parse_param("X")?,
            tag.parse_param("Y")?,
            tag.parse_param("Z")?,
            tag.parse_param("W")?,
        );
        *self = parsed;
        Ok(())
    }
}

/// Floating point color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    /// Tag name in markup
    pub const TAG: &'static str = "hsColorRGBA";

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Read three components; alpha is left opaque
    pub fn read_rgb(s: &mut StreamReader<'_>) -> Result<Self> {
        Ok(Self::new(s.read_f32()?, s.read_f32()?, s.read_f32()?, 1.0))
    }

    pub fn read_rgba(s: &mut StreamReader<'_>) -> Result<Self> {
        Ok(Self::new(s.read_f32()?, s.read_f32()?, s.read_f32()?, s.read_f32()?))
    }

    pub fn write_rgb(&self, s: &mut StreamWriter) {
        s.write_f32(self.r);
        s.write_f32(self.g);
        s.write_f32(self.b);
    }

    pub fn write_rgba(&self, s: &mut StreamWriter) {
        self.write_rgb(s);
        s.write_f32(self.a);
    }
}

impl Default for ColorRgba {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

impl PrcSerializable for ColorRgba {
    fn prc_write(&self, prc: &mut PrcWriter) {
        prc.start_tag(Self::TAG);
        prc.write_param("red", self.r);
        prc.write_param("green", self.g);
        prc.write_param("blue", self.b);
        prc.write_param("alpha", self.a);
        prc.end_tag(true);
    }

    fn prc_parse(&mut self, tag: &PrcElement) -> core::result::Result<(), TagError> {
        tag.expect_name(Self::TAG)?;
        let parsed = Self::new(
            tag.parse_param("red")?,
            tag.parse_param("green")?,
            tag.parse_param("blue")?,
            tag.parse_param("alpha")?,
        );
        *self = parsed;
        Ok(())
    }
}

/// 8-bit per channel color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    /// Tag name in markup
    pub const TAG: &'static str = "hsColor32";

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read three channels; alpha is left opaque
    pub fn read_rgb(s: &mut StreamReader<'_>) -> Result<Self> {
        Ok(Self::new(s.read_u8()?, s.read_u8()?, s.read_u8()?, u8::MAX))
    }

    pub fn read_rgba(s: &mut StreamReader<'_>) -> Result<Self> {
        Ok(Self::new(s.read_u8()?, s.read_u8()?, s.read_u8()?, s.read_u8()?))
    }

    pub fn write_rgb(&self, s: &mut StreamWriter) {
        s.write_u8(self.r);
        s.write_u8(self.g);
        s.write_u8(self.b);
    }

    pub fn write_rgba(&self, s: &mut StreamWriter) {
        self.write_rgb(s);
        s.write_u8(self.a);
    }
}

impl Default for Color32 {
    fn default() -> Self {
        Self::new(0, 0, 0, u8::MAX)
    }
}

impl PrcSerializable for Color32 {
    fn prc_write(&self, prc: &mut PrcWriter) {
        prc.start_tag(Self::TAG);
        prc.write_param("red", self.r);
        prc.write_param("green", self.g);
        prc.write_param("blue", self.b);
        prc.write_param("alpha", self.a);
        prc.end_tag(true);
    }

    fn prc_parse(&mut self, tag: &PrcElement) -> core::result::Result<(), TagError> {
        tag.expect_name(Self::TAG)?;
        let parsed = Self::new(
            tag.parse_param("red")?,
            tag.parse_param("green")?,
            tag.parse_param("blue")?,
            tag.parse_param("alpha")?,
        );
        *self = parsed;
        Ok(())
    }
}

/// Row-major 4x4 matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix44(pub [[f32; 4]; 4]);

impl Matrix44 {
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub fn read(s: &mut StreamReader<'_>) -> Result<Self> {
        let mut m = [[0.0f32; 4]; 4];
        for row in m.iter_mut() {
            for cell in row.iter_mut() {
                *cell = s.read_f32()?;
            }
        }
        Ok(Self(m))
    }

    pub fn write(&self, s: &mut StreamWriter) {
        for row in &self.0 {
            for cell in row {
                s.write_f32(*cell);
            }
        }
    }
}

impl Default for Matrix44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Seconds + microseconds since the epoch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnifiedTime {
    pub secs: u32,
    pub micros: u32,
}

impl UnifiedTime {
    #[inline]
    pub const fn new(secs: u32, micros: u32) -> Self {
        Self { secs, micros }
    }

    pub fn read(s: &mut StreamReader<'_>) -> Result<Self> {
        Ok(Self::new(s.read_u32()?, s.read_u32()?))
    }

    pub fn write(&self, s: &mut StreamWriter) {
        s.write_u32(self.secs);
        s.write_u32(self.micros);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_prc::PrcParser;

    fn reparse<T: PrcSerializable>(value: &T, target: &mut T) -> core::result::Result<(), TagError> {
        let mut prc = PrcWriter::new();
        value.prc_write(&mut prc);
        let tag = PrcParser::parse_bytes(prc.as_bytes()).expect("writer emits well-formed markup");
        target.prc_parse(&tag)
    }

    #[test]
    fn test_vector_markup() {
        let v = Vector3::new(1.5, -2.0, 0.125);
        let mut out = Vector3::default();
        reparse(&v, &mut out).unwrap();
        assert_eq!(out, v);
    }

    #[test]
    fn test_wrong_tag_leaves_value() {
        let q = Quat::new(0.0, 0.0, 1.0, 0.0);
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        let mut prc = PrcWriter::new();
        q.prc_write(&mut prc);
        let tag = PrcParser::parse_bytes(prc.as_bytes()).unwrap();

        assert!(matches!(v.prc_parse(&tag), Err(TagError::WrongTag { .. })));
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_partial_params_leave_value() {
        let tag = PrcParser::parse("<hsColorRGBA red=\"0.5\" green=\"0.5\" blue=\"x\" alpha=\"1\" />").unwrap();
        let mut c = ColorRgba::new(1.0, 1.0, 1.0, 1.0);
        assert!(c.prc_parse(&tag).is_err());
        assert_eq!(c, ColorRgba::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_color32_channel_range() {
        let tag = PrcParser::parse("<hsColor32 red=\"256\" green=\"0\" blue=\"0\" alpha=\"0\" />").unwrap();
        let mut c = Color32::default();
        assert!(matches!(c.prc_parse(&tag), Err(TagError::InvalidParam { .. })));
    }

    #[test]
    fn test_rgb_stream_keeps_alpha_opaque() {
        let mut out = StreamWriter::new();
        ColorRgba::new(0.1, 0.2, 0.3, 0.4).write_rgb(&mut out);
        assert_eq!(out.len(), 12);

        let bytes = out.into_bytes();
        let c = ColorRgba::read_rgb(&mut StreamReader::new(&bytes)).unwrap();
        assert_eq!(c, ColorRgba::new(0.1, 0.2, 0.3, 1.0));
    }
}
