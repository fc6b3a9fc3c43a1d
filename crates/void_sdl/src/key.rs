//! Object keys referenced from state variables

use core::fmt;
use void_prc::{PrcElement, PrcSerializable, PrcWriter, TagError};

use crate::error::Result;
use crate::stream::{StreamReader, StreamWriter};

/// Page an object lives in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub sequence: u32,
    pub flags: u16,
}

impl Location {
    #[inline]
    pub const fn new(sequence: u32, flags: u16) -> Self {
        Self { sequence, flags }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.sequence, self.flags)
    }
}

impl core::str::FromStr for Location {
    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let (seq, flags) = s.split_once(';').ok_or(())?;
        Ok(Self::new(
            seq.trim().parse().map_err(|_| ())?,
            flags.trim().parse().map_err(|_| ())?,
        ))
    }
}

/// Unique object identifier
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Uoid {
    pub location: Location,
    pub class_type: u16,
    pub name: String,
    pub id: u32,
}

impl Uoid {
    /// Tag name in markup
    pub const TAG: &'static str = "plKey";

    pub fn new(location: Location, class_type: u16, name: impl Into<String>, id: u32) -> Self {
        Self {
            location,
            class_type,
            name: name.into(),
            id,
        }
    }

    pub fn read(s: &mut StreamReader<'_>) -> Result<Self> {
        let sequence = s.read_u32()?;
        let flags = s.read_u16()?;
        let class_type = s.read_u16()?;
        let name = s.read_string()?;
        let id = s.read_u32()?;
        Ok(Self::new(Location::new(sequence, flags), class_type, name, id))
    }

    pub fn write(&self, s: &mut StreamWriter) -> Result<()> {
        s.write_u32(self.location.sequence);
        s.write_u16(self.location.flags);
        s.write_u16(self.class_type);
        s.write_string(&self.name)?;
        s.write_u32(self.id);
        Ok(())
    }
}

impl PrcSerializable for Uoid {
    fn prc_write(&self, prc: &mut PrcWriter) {
        prc.start_tag(Self::TAG);
        prc.write_param("Name", &self.name);
        prc.write_hex_param("Type", self.class_type as u32, 4);
        prc.write_param("Location", self.location);
        prc.write_param("ID", self.id);
        prc.end_tag(true);
    }

    fn prc_parse(&mut self, tag: &PrcElement) -> core::result::Result<(), TagError> {
        tag.expect_name(Self::TAG)?;
        let name = tag.require_param("Name")?.to_string();
        let class_type = tag.parse_hex_param("Type")?;
        let class_type = u16::try_from(class_type).map_err(|_| TagError::InvalidParam {
            tag: tag.name.clone(),
            param: "Type".into(),
            value: format!("0x{:X}", class_type),
        })?;
        let location: Location = tag.parse_param("Location")?;
        let id = tag.parse_param("ID")?;

        *self = Self::new(location, class_type, name, id);
        Ok(())
    }
}
