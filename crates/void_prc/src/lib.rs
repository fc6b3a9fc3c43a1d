//! # void_prc - Tagged Markup for State Values
//!
//! PRC is a line-oriented, XML-flavoured markup used to show composite
//! state values (keys, colors, vectors, creatables) as editable text.
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <!-- PRC fragment -->
//! <hsVector3 X="1" Y="2" Z="3" />
//! ```
//!
//! Writing goes through [`PrcWriter`], an in-memory sink whose byte length
//! can be queried. Reading happens in two stages that fail differently:
//! - [`PrcParser`] checks well-formedness and yields a [`PrcElement`] tree
//!   ([`MarkupError`] on failure)
//! - a [`PrcSerializable`] type then interprets that tree
//!   ([`TagError`] on failure)

pub mod element;
pub mod error;
pub mod parser;
pub mod writer;

pub use element::PrcElement;
pub use error::{MarkupError, TagError};
pub use parser::{PrcParser, MAX_DEPTH};
pub use writer::PrcWriter;

/// A value that can be written as, and updated in place from, a PRC tag.
pub trait PrcSerializable {
    /// Write this value as a single tag (with children, if any)
    fn prc_write(&self, prc: &mut PrcWriter);

    /// Update this value from a parsed tag.
    ///
    /// Implementations must leave `self` untouched when they return an error.
    fn prc_parse(&mut self, tag: &PrcElement) -> Result<(), TagError>;
}

/// Prelude
pub mod prelude {
    pub use crate::{MarkupError, PrcElement, PrcParser, PrcSerializable, PrcWriter, TagError};
}
