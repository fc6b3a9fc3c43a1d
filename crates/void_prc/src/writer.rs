//! PRC writer
//!
//! Writes one tag per line into an in-memory byte sink. Every document
//! starts with a two-line preamble (declaration and comment) so readers
//! that only want the value body can drop the first two lines.

use core::fmt::Display;

/// XML declaration written as the first preamble line
pub const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";
/// Comment written as the second preamble line
pub const PREAMBLE_COMMENT: &str = "<!-- PRC fragment -->";
/// Number of preamble lines at the top of every document
pub const PREAMBLE_LINES: usize = 2;

const INDENT: &str = "    ";

/// Streaming PRC writer backed by a byte buffer
#[derive(Debug)]
pub struct PrcWriter {
    buf: Vec<u8>,
    open_tags: Vec<String>,
    in_tag: bool,
}

impl PrcWriter {
    /// Create a writer and emit the document preamble
    pub fn new() -> Self {
        let mut writer = Self {
            buf: Vec::with_capacity(128),
            open_tags: Vec::new(),
            in_tag: false,
        };
        writer.write_line(DECLARATION);
        writer.write_line(PREAMBLE_COMMENT);
        writer
    }

    /// Begin a tag; follow with parameters and then [`end_tag`](Self::end_tag)
    pub fn start_tag(&mut self, name: &str) {
        if self.in_tag {
            log::warn!("PRC tag <{}> started before the previous one was ended", name);
            self.end_tag(true);
        }
        self.write_indent();
        self.buf.push(b'<');
        self.buf.extend_from_slice(name.as_bytes());
        self.open_tags.push(name.to_string());
        self.in_tag = true;
    }

    /// Write a parameter on the tag being started
    pub fn write_param(&mut self, name: &str, value: impl Display) {
        if !self.in_tag {
            log::warn!("PRC parameter '{}' written outside a tag", name);
            return;
        }
        self.buf.push(b' ');
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(b"=\"");
        escape_into(&value.to_string(), &mut self.buf);
        self.buf.push(b'"');
    }

    /// Write a parameter formatted as `0x`-prefixed hex
    pub fn write_hex_param(&mut self, name: &str, value: u32, digits: usize) {
        self.write_param(name, format_args!("0x{:0width$X}", value, width = digits));
    }

    /// Finish the tag header. An empty tag is closed immediately.
    pub fn end_tag(&mut self, is_empty: bool) {
        if !self.in_tag {
            return;
        }
        self.in_tag = false;
        if is_empty {
            self.open_tags.pop();
            self.buf.extend_from_slice(b" />\n");
        } else {
            self.buf.extend_from_slice(b">\n");
        }
    }

    /// Close the innermost open (non-empty) tag
    pub fn close_tag(&mut self) {
        if self.in_tag {
            self.end_tag(false);
        }
        match self.open_tags.pop() {
            Some(name) => {
                self.write_indent();
                self.buf.extend_from_slice(b"</");
                self.buf.extend_from_slice(name.as_bytes());
                self.buf.extend_from_slice(b">\n");
            }
            None => log::warn!("PRC close_tag with no open tag"),
        }
    }

    /// Write escaped text content on its own line
    pub fn write_text(&mut self, text: &str) {
        if self.in_tag {
            self.end_tag(false);
        }
        self.write_indent();
        escape_into(text, &mut self.buf);
        self.buf.push(b'\n');
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written (never true after `new`)
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the written bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning the written bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Consume the writer, returning the document as text
    pub fn into_string(self) -> String {
        // Only `&str` input and ASCII syntax are ever written
        String::from_utf8(self.buf).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }

    fn write_line(&mut self, line: &str) {
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.push(b'\n');
    }

    fn write_indent(&mut self) {
        let depth = self.open_tags.len();
        for _ in 0..depth {
            self.buf.extend_from_slice(INDENT.as_bytes());
        }
    }
}

impl Default for PrcWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(text: &str, out: &mut Vec<u8>) {
    for c in text.chars() {
        match c {
            '&' => out.extend_from_slice(b"&amp;"),
            '<' => out.extend_from_slice(b"&lt;"),
            '>' => out.extend_from_slice(b"&gt;"),
            '"' => out.extend_from_slice(b"&quot;"),
            '\n' => out.extend_from_slice(b"&#10;"),
            _ => {
                let mut tmp = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_and_empty_tag() {
        let mut prc = PrcWriter::new();
        prc.start_tag("hsVector3");
        prc.write_param("X", 1.0f32);
        prc.write_param("Y", 2.5f32);
        prc.write_param("Z", -3.0f32);
        prc.end_tag(true);

        let text = prc.into_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], DECLARATION);
        assert_eq!(lines[1], PREAMBLE_COMMENT);
        assert_eq!(lines[2], "<hsVector3 X=\"1\" Y=\"2.5\" Z=\"-3\" />");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_nested_tags_are_indented() {
        let mut prc = PrcWriter::new();
        prc.start_tag("Outer");
        prc.end_tag(false);
        prc.start_tag("Inner");
        prc.write_param("Value", "a<b");
        prc.end_tag(true);
        prc.close_tag();

        let text = prc.into_string();
        let body: Vec<&str> = text.lines().skip(PREAMBLE_LINES).collect();
        assert_eq!(body, vec!["<Outer>", "    <Inner Value=\"a&lt;b\" />", "</Outer>"]);
    }

    #[test]
    fn test_len_tracks_bytes() {
        let mut prc = PrcWriter::new();
        let before = prc.len();
        prc.write_text("abc");
        assert_eq!(prc.len(), before + 4);
        assert_eq!(prc.as_bytes().len(), prc.len());
    }

    #[test]
    fn test_hex_param() {
        let mut prc = PrcWriter::new();
        prc.start_tag("plKey");
        prc.write_hex_param("Type", 0xA2, 4);
        prc.end_tag(true);
        assert!(prc.into_string().contains("Type=\"0x00A2\""));
    }
}
