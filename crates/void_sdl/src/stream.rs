//! Little-endian binary stream used by the record format

use crate::error::{Result, SdlError};

/// Cursor over a borrowed byte slice
#[derive(Debug)]
pub struct StreamReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StreamReader<'a> {
    /// Create a reader at offset 0
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the whole stream has been consumed
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Read raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(SdlError::UnexpectedEof {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Read a `u16` length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let start = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SdlError::InvalidUtf8(start))
    }

    /// Read a `u32` length-prefixed byte buffer
    pub fn read_buffer(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32()? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }
}

/// Growable output stream
#[derive(Debug, Default)]
pub struct StreamWriter {
    buf: Vec<u8>,
}

impl StreamWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the written bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Write a `u16` length-prefixed UTF-8 string
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        let len = u16::try_from(s.len()).map_err(|_| SdlError::TooLong {
            what: "string",
            len: s.len(),
        })?;
        self.write_u16(len);
        self.write_bytes(s.as_bytes());
        Ok(())
    }

    /// Write a `u32` length-prefixed byte buffer
    pub fn write_buffer(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| SdlError::TooLong {
            what: "buffer",
            len: bytes.len(),
        })?;
        self.write_u32(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Write a count as `u32`
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| SdlError::TooLong {
            what: "variable",
            len: count,
        })?;
        self.write_u32(count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        let mut out = StreamWriter::new();
        out.write_u8(7);
        out.write_i16(-2);
        out.write_i32(-70000);
        out.write_f32(1.25);
        out.write_f64(-0.5);
        out.write_string("hello").unwrap();

        let bytes = out.into_bytes();
        let mut s = StreamReader::new(&bytes);
        assert_eq!(s.read_u8().unwrap(), 7);
        assert_eq!(s.read_i16().unwrap(), -2);
        assert_eq!(s.read_i32().unwrap(), -70000);
        assert_eq!(s.read_f32().unwrap(), 1.25);
        assert_eq!(s.read_f64().unwrap(), -0.5);
        assert_eq!(s.read_string().unwrap(), "hello");
        assert!(s.is_at_end());
    }

    #[test]
    fn test_little_endian() {
        let mut out = StreamWriter::new();
        out.write_u32(0x0102_0304);
        assert_eq!(out.as_bytes(), &[4, 3, 2, 1]);
    }

    #[test]
    fn test_truncated() {
        let mut s = StreamReader::new(&[1, 2]);
        match s.read_u32() {
            Err(SdlError::UnexpectedEof { offset, needed, remaining }) => {
                assert_eq!((offset, needed, remaining), (0, 4, 2));
            }
            other => panic!("expected eof, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_utf8() {
        let mut s = StreamReader::new(&[2, 0, 0xFF, 0xFE]);
        assert!(matches!(s.read_string(), Err(SdlError::InvalidUtf8(2))));
    }
}
