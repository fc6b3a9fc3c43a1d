//! PRC reader
//!
//! Parses a single-rooted tag document into a [`PrcElement`] tree. The
//! declaration and comments are skipped, so both full documents and bare
//! fragments are accepted.

use core::iter::Peekable;
use core::str::Chars;

use crate::element::PrcElement;
use crate::error::MarkupError;

/// Deepest tag nesting the parser accepts
pub const MAX_DEPTH: usize = 64;

/// Markup parser
pub struct PrcParser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    depth: usize,
}

impl<'a> PrcParser<'a> {
    /// Parse a document from text
    pub fn parse(input: &'a str) -> Result<PrcElement, MarkupError> {
        let mut parser = Self {
            chars: input.chars().peekable(),
            line: 1,
            depth: 0,
        };
        parser.parse_document()
    }

    /// Parse a document from raw bytes
    pub fn parse_bytes(input: &[u8]) -> Result<PrcElement, MarkupError> {
        let text = core::str::from_utf8(input).map_err(|_| MarkupError::InvalidUtf8)?;
        PrcParser::parse(text)
    }

    fn parse_document(&mut self) -> Result<PrcElement, MarkupError> {
        self.skip_misc()?;
        match self.bump() {
            None => return Err(MarkupError::EmptyDocument),
            Some('<') => {}
            Some(found) => return Err(self.unexpected(found)),
        }
        let root = self.parse_element()?;

        self.skip_misc()?;
        if self.chars.peek().is_some() {
            return Err(MarkupError::TrailingContent { line: self.line });
        }
        Ok(root)
    }

    /// Parse an element; the opening `<` has been consumed
    fn parse_element(&mut self) -> Result<PrcElement, MarkupError> {
        if self.depth >= MAX_DEPTH {
            return Err(MarkupError::TooDeep { line: self.line });
        }
        self.depth += 1;
        let result = self.parse_element_body();
        self.depth -= 1;
        result
    }

    fn parse_element_body(&mut self) -> Result<PrcElement, MarkupError> {
        let line = self.line;
        let name = self.read_name()?;
        let mut element = PrcElement {
            name,
            line,
            ..Default::default()
        };

        // Parameters
        loop {
            self.skip_whitespace();
            match self.chars.peek().copied() {
                None => return Err(self.eof()),
                Some('/') => {
                    self.bump();
                    self.expect('>')?;
                    return Ok(element);
                }
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(c) if is_name_char(c) => {
                    let (key, value) = self.read_param()?;
                    if element.param(&key).is_some() {
                        return Err(MarkupError::DuplicateParam {
                            param: key,
                            line: self.line,
                        });
                    }
                    element.params.push((key, value));
                }
                Some(found) => return Err(self.unexpected(found)),
            }
        }

        // Content
        let mut text = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(MarkupError::UnclosedTag {
                        name: element.name,
                        line,
                    })
                }
                Some('<') => match self.chars.peek().copied() {
                    Some('/') => {
                        self.bump();
                        let closing = self.read_name()?;
                        self.skip_whitespace();
                        self.expect('>')?;
                        if closing != element.name {
                            return Err(MarkupError::MismatchedTag {
                                expected: element.name,
                                found: closing,
                                line: self.line,
                            });
                        }
                        break;
                    }
                    Some('!') => self.skip_comment()?,
                    Some('?') => self.skip_declaration()?,
                    _ => {
                        let child = self.parse_element()?;
                        element.children.push(child);
                    }
                },
                Some('&') => text.push(self.read_entity()?),
                Some(c) => text.push(c),
            }
        }

        element.text = text.trim().to_string();
        Ok(element)
    }

    fn read_param(&mut self) -> Result<(String, String), MarkupError> {
        let key = self.read_name()?;
        self.skip_whitespace();
        self.expect('=')?;
        self.skip_whitespace();

        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            Some(found) => return Err(self.unexpected(found)),
            None => return Err(self.eof()),
        };

        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.eof()),
                Some(c) if c == quote => break,
                Some('&') => value.push(self.read_entity()?),
                Some('<') => return Err(self.unexpected('<')),
                Some(c) => value.push(c),
            }
        }
        Ok((key, value))
    }

    fn read_name(&mut self) -> Result<String, MarkupError> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_name_char(c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        if name.is_empty() {
            return Err(match self.chars.peek().copied() {
                Some(found) => self.unexpected(found),
                None => self.eof(),
            });
        }
        Ok(name)
    }

    /// Decode an entity; the `&` has been consumed
    fn read_entity(&mut self) -> Result<char, MarkupError> {
        let mut entity = String::new();
        loop {
            match self.bump() {
                None => return Err(self.eof()),
                Some(';') => break,
                Some(c) if entity.len() < 10 => entity.push(c),
                Some(_) => {
                    return Err(MarkupError::UnknownEntity {
                        entity,
                        line: self.line,
                    })
                }
            }
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().ok().and_then(char::from_u32)
                } else {
                    None
                }
            }
        };
        decoded.ok_or(MarkupError::UnknownEntity {
            entity,
            line: self.line,
        })
    }

    /// Skip whitespace, comments and declarations between tags
    fn skip_misc(&mut self) -> Result<(), MarkupError> {
        loop {
            self.skip_whitespace();
            let mut lookahead = self.chars.clone();
            if lookahead.next() != Some('<') {
                return Ok(());
            }
            match lookahead.next() {
                Some('!') => {
                    self.bump();
                    self.skip_comment()?;
                }
                Some('?') => {
                    self.bump();
                    self.skip_declaration()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skip `<!-- ... -->`; the `<` has been consumed
    fn skip_comment(&mut self) -> Result<(), MarkupError> {
        self.expect('!')?;
        self.expect('-')?;
        self.expect('-')?;
        let mut dashes = 0;
        loop {
            match self.bump() {
                None => return Err(self.eof()),
                Some('-') => dashes += 1,
                Some('>') if dashes >= 2 => return Ok(()),
                Some(_) => dashes = 0,
            }
        }
    }

    /// Skip `<? ... ?>`; the `<` has been consumed
    fn skip_declaration(&mut self) -> Result<(), MarkupError> {
        self.expect('?')?;
        let mut question = false;
        loop {
            match self.bump() {
                None => return Err(self.eof()),
                Some('?') => question = true,
                Some('>') if question => return Ok(()),
                Some(_) => question = false,
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), MarkupError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(found) => Err(self.unexpected(found)),
            None => Err(self.eof()),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn unexpected(&self, found: char) -> MarkupError {
        MarkupError::UnexpectedChar {
            found,
            line: self.line,
        }
    }

    fn eof(&self) -> MarkupError {
        MarkupError::UnexpectedEof { line: self.line }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::PrcWriter;

    #[test]
    fn test_parse_empty_tag() {
        let tag = PrcParser::parse("<hsVector3 X=\"1\" Y=\"2\" Z='3' />").unwrap();
        assert_eq!(tag.name, "hsVector3");
        assert_eq!(tag.param("X"), Some("1"));
        assert_eq!(tag.param("Z"), Some("3"));
        assert!(tag.children.is_empty());
    }

    #[test]
    fn test_parse_full_document() {
        let mut prc = PrcWriter::new();
        prc.start_tag("Outer");
        prc.write_param("Name", "a & b");
        prc.end_tag(false);
        prc.start_tag("Inner");
        prc.end_tag(true);
        prc.write_text("line one\nline two");
        prc.close_tag();

        let tag = PrcParser::parse_bytes(prc.as_bytes()).unwrap();
        assert_eq!(tag.name, "Outer");
        assert_eq!(tag.param("Name"), Some("a & b"));
        assert_eq!(tag.children.len(), 1);
        assert_eq!(tag.children[0].name, "Inner");
        assert_eq!(tag.text, "line one\nline two");
    }

    #[test]
    fn test_mismatched_close() {
        let err = PrcParser::parse("<A>\n<B></C>\n</A>").unwrap_err();
        assert_eq!(
            err,
            MarkupError::MismatchedTag {
                expected: "B".into(),
                found: "C".into(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert!(PrcParser::parse(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(
            PrcParser::parse(&nested(MAX_DEPTH + 1)),
            Err(MarkupError::TooDeep { line: 1 })
        );
        assert!(matches!(
            PrcParser::parse(&"<a>".repeat(200_000)),
            Err(MarkupError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_unclosed_and_truncated() {
        assert!(matches!(
            PrcParser::parse("<A>"),
            Err(MarkupError::UnclosedTag { .. })
        ));
        assert!(matches!(
            PrcParser::parse("<A X=\"1"),
            Err(MarkupError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            PrcParser::parse("<hsVector3 X=1 />"),
            Err(MarkupError::UnexpectedChar { found: '1', .. })
        ));
    }

    #[test]
    fn test_empty_and_trailing() {
        assert_eq!(PrcParser::parse("  "), Err(MarkupError::EmptyDocument));
        assert_eq!(
            PrcParser::parse("<!-- only a comment -->"),
            Err(MarkupError::EmptyDocument)
        );
        assert!(matches!(
            PrcParser::parse("<A /><B />"),
            Err(MarkupError::TrailingContent { .. })
        ));
        assert!(matches!(PrcParser::parse("hello"), Err(MarkupError::UnexpectedChar { .. })));
    }

    #[test]
    fn test_entities_and_duplicates() {
        let tag = PrcParser::parse("<T V=\"&lt;&#65;&#x42;&gt;\" />").unwrap();
        assert_eq!(tag.param("V"), Some("<AB>"));

        assert!(matches!(
            PrcParser::parse("<T V=\"&bogus;\" />"),
            Err(MarkupError::UnknownEntity { .. })
        ));
        assert!(matches!(
            PrcParser::parse("<T V=\"1\" V=\"2\" />"),
            Err(MarkupError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(PrcParser::parse_bytes(&[0x3C, 0xFF, 0xFE]), Err(MarkupError::InvalidUtf8));
    }
}
