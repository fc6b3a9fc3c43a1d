//! `.sdl` descriptor source parser
//!
//! ```text
//! # comment
//! STATEDESC Door
//! {
//!     VERSION 2
//!     VAR BOOL    open[1]     DEFAULT=false DEFAULTOPTION=VAULT
//!     VAR POINT3  hinge[1]    DEFAULT=(0, 0, 1)
//!     VAR $Lock   locks[]
//! }
//! ```

use crate::descriptor::{StateDescriptor, VarDescriptor, MAX_FIXED_COUNT};
use crate::error::{Result, SdlError};
use crate::types::VarType;
use crate::value::SdlValue;

/// Token type
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// Bare word, `KEY=VALUE` option, or `name[count]`
    Word(String),
    /// `{`
    Open,
    /// `}`
    Close,
}

/// Parse every descriptor in a source file
pub fn parse(source: &str) -> Result<Vec<StateDescriptor>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_file()
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                // Comment to end of line
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '{' => {
                chars.next();
                tokens.push((Token::Open, line));
            }
            '}' => {
                chars.next();
                tokens.push((Token::Close, line));
            }
            _ => {
                let start_line = line;
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    match c {
                        c if c.is_whitespace() || c == '{' || c == '}' || c == '#' => break,
                        '"' => {
                            chars.next();
                            let mut closed = false;
                            for c in chars.by_ref() {
                                if c == '"' {
                                    closed = true;
                                    break;
                                }
                                if c == '\n' {
                                    line += 1;
                                }
                                word.push(c);
                            }
                            if !closed {
                                return Err(SdlError::syntax(start_line, "unclosed quote"));
                            }
                        }
                        '(' => {
                            let mut closed = false;
                            for c in chars.by_ref() {
                                if c == '\n' {
                                    line += 1;
                                }
                                word.push(c);
                                if c == ')' {
                                    closed = true;
                                    break;
                                }
                            }
                            if !closed {
                                return Err(SdlError::syntax(start_line, "unclosed parenthesis"));
                            }
                        }
                        _ => {
                            word.push(c);
                            chars.next();
                        }
                    }
                }
                tokens.push((Token::Word(word), start_line));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn parse_file(&mut self) -> Result<Vec<StateDescriptor>> {
        let mut descriptors = Vec::new();
        while let Some((token, line)) = self.next() {
            match token {
                Token::Word(w) if w.eq_ignore_ascii_case("STATEDESC") => {
                    descriptors.push(self.parse_descriptor(line)?);
                }
                other => {
                    return Err(SdlError::syntax(line, format!("expected STATEDESC, found {:?}", other)));
                }
            }
        }
        Ok(descriptors)
    }

    fn parse_descriptor(&mut self, line: usize) -> Result<StateDescriptor> {
        let name = self.expect_word(line, "descriptor name")?;
        match self.next() {
            Some((Token::Open, _)) => {}
            Some((other, line)) => {
                return Err(SdlError::syntax(line, format!("expected '{{' after {}, found {:?}", name, other)))
            }
            None => return Err(SdlError::syntax(line, "unexpected end of file")),
        }

        let mut version = None;
        let mut vars = Vec::new();
        loop {
            let Some((token, line)) = self.next() else {
                return Err(SdlError::syntax(line, format!("descriptor {} is never closed", name)));
            };
            match token {
                Token::Close => break,
                Token::Word(w) if w.eq_ignore_ascii_case("VERSION") => {
                    let text = self.expect_word(line, "version number")?;
                    let parsed = text
                        .parse::<u16>()
                        .map_err(|_| SdlError::syntax(line, format!("invalid version '{}'", text)))?;
                    version = Some(parsed);
                }
                Token::Word(w) if w.eq_ignore_ascii_case("VAR") => {
                    vars.push(self.parse_var(line)?);
                }
                other => {
                    return Err(SdlError::syntax(line, format!("unexpected {:?} in descriptor {}", other, name)));
                }
            }
        }

        let version = version.ok_or_else(|| SdlError::syntax(line, format!("descriptor {} has no VERSION", name)))?;
        let mut descriptor = StateDescriptor::new(name, version);
        for var in vars {
            descriptor = descriptor.with_var(var);
        }
        Ok(descriptor)
    }

    fn parse_var(&mut self, line: usize) -> Result<VarDescriptor> {
        let type_word = self.expect_word(line, "variable type")?;
        let decl = self.expect_word(line, "variable name")?;

        let (name, count) = parse_declaration(&decl).ok_or_else(|| {
            SdlError::syntax(line, format!("invalid variable declaration '{}'", decl))
        })?;
        if let Some(count) = count.filter(|&c| c > MAX_FIXED_COUNT) {
            return Err(SdlError::CountTooLarge { variable: name, count });
        }

        let mut var = if let Some(nested) = type_word.strip_prefix('$') {
            VarDescriptor::nested(name, nested, count)
        } else {
            let var_type = VarType::from_name(&type_word)
                .ok_or_else(|| SdlError::syntax(line, format!("unknown type '{}'", type_word)))?;
            match count {
                Some(count) => VarDescriptor::new(name, var_type, count),
                None => VarDescriptor::variable(name, var_type),
            }
        };

        // Trailing KEY=VALUE options
        while let Some((Token::Word(word), opt_line)) = self.peek() {
            let Some((key, value)) = word.split_once('=') else {
                break;
            };
            let (key, value, opt_line) = (key.to_ascii_uppercase(), value.to_string(), *opt_line);
            self.pos += 1;
            match key.as_str() {
                "DEFAULT" => var.default = Some(value),
                "DEFAULTOPTION" => var.default_option = Some(value),
                "DISPLAYOPTION" => var.display_option = Some(value),
                _ => log::warn!("Ignoring unknown option '{}' on line {}", key, opt_line),
            }
        }

        if let Some(default) = &var.default {
            if !var.is_state_descriptor() && SdlValue::from_default(var.var_type, default).is_none() {
                return Err(SdlError::InvalidDefault {
                    variable: var.name.clone(),
                    value: default.clone(),
                });
            }
        }

        Ok(var)
    }

    fn expect_word(&mut self, line: usize, what: &str) -> Result<String> {
        match self.next() {
            Some((Token::Word(w), _)) => Ok(w),
            Some((other, line)) => Err(SdlError::syntax(line, format!("expected {}, found {:?}", what, other))),
            None => Err(SdlError::syntax(line, format!("expected {}, found end of file", what))),
        }
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<(&Token, &usize)> {
        self.tokens.get(self.pos).map(|(t, l)| (t, l))
    }
}

/// Split `name[3]` / `name[]` into the name and an optional fixed count
fn parse_declaration(decl: &str) -> Option<(String, Option<usize>)> {
    let (name, rest) = decl.split_once('[')?;
    let inner = rest.strip_suffix(']')?;
    if name.is_empty() {
        return None;
    }
    let count = if inner.trim().is_empty() {
        None
    } else {
        Some(inner.trim().parse().ok()?)
    };
    Some((name.to_string(), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOOR: &str = r#"
# Door state
STATEDESC Door
{
    VERSION 2
    VAR BOOL    open[1]     DEFAULT=false DEFAULTOPTION=VAULT
    VAR POINT3  hinge[1]    DEFAULT=(0, 0, 1)
    VAR STRING  label[1]    DEFAULT="front door"
    VAR $Lock   locks[]
    VAR INT     counts[3]
}
"#;

    #[test]
    fn test_parse_descriptor() {
        let parsed = parse(DOOR).unwrap();
        assert_eq!(parsed.len(), 1);

        let door = &parsed[0];
        assert_eq!(door.name, "Door");
        assert_eq!(door.version, 2);
        assert_eq!(door.num_vars(), 5);

        let open = &door.vars[0];
        assert_eq!(open.var_type, VarType::Bool);
        assert_eq!(open.count, 1);
        assert_eq!(open.default.as_deref(), Some("false"));
        assert_eq!(open.default_option.as_deref(), Some("VAULT"));

        assert_eq!(door.vars[1].default.as_deref(), Some("(0, 0, 1)"));
        assert_eq!(door.vars[2].default.as_deref(), Some("front door"));

        let locks = &door.vars[3];
        assert!(locks.is_state_descriptor());
        assert!(locks.variable_length);
        assert_eq!(locks.state_desc.as_deref(), Some("Lock"));

        assert_eq!(door.vars[4].count, 3);
        assert!(!door.vars[4].variable_length);
    }

    #[test]
    fn test_declarations() {
        assert_eq!(parse_declaration("x[3]"), Some(("x".into(), Some(3))));
        assert_eq!(parse_declaration("x[]"), Some(("x".into(), None)));
        assert_eq!(parse_declaration("x"), None);
        assert_eq!(parse_declaration("[2]"), None);
        assert_eq!(parse_declaration("x[two]"), None);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("STATEDESC A { VAR INT x[1] }"),
            Err(SdlError::Syntax { .. })
        ));
        assert!(matches!(
            parse("STATEDESC A { VERSION 1 VAR WIDGET x[1] }"),
            Err(SdlError::Syntax { .. })
        ));
        assert!(matches!(
            parse("STATEDESC A { VERSION 1 VAR BYTE x[1] DEFAULT=300 }"),
            Err(SdlError::InvalidDefault { .. })
        ));
        assert!(matches!(
            parse("STATEDESC A { VERSION 1 VAR INT x[4000000000] }"),
            Err(SdlError::CountTooLarge { .. })
        ));
        assert!(matches!(
            parse("STATEDESC A { VERSION 1"),
            Err(SdlError::Syntax { .. })
        ));
        match parse("\n\nVERSION 1") {
            Err(SdlError::Syntax { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }
}
