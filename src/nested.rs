//! Decoder for the serialized list-of-objects cells in `genres` and `production_companies`.
//!
//! Cells hold structured literals such as `[{'id': 28, 'name': 'Action'}]`. They are parsed
//! into a [`Literal`] tree by a small recursive-descent parser and then narrowed to
//! [`NamedEntity`] values. Absent and empty cells decode to an empty list; anything else that
//! does not parse is an error.

use thiserror::Error;

/// One `{id, name}` object from a nested list cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    pub id: Option<i64>,
    pub name: String,
}

impl NamedEntity {
    pub fn new(id: Option<i64>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Parsed structured literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    fn kind(&self) -> &'static str {
        match self {
            Literal::None => "None",
            Literal::Bool(_) => "a boolean",
            Literal::Int(_) => "an integer",
            Literal::Float(_) => "a float",
            Literal::Str(_) => "a string",
            Literal::List(_) => "a list",
            Literal::Tuple(_) => "a tuple",
            Literal::Dict(_) => "an object",
        }
    }

    /// Value for a string key of a dict literal.
    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Dict(entries) => entries.iter().find_map(|(k, v)| match k {
                Literal::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NestedFieldError {
    #[error("unexpected end of input at byte {offset}, expected {expected}")]
    UnexpectedEnd {
        offset: usize,
        expected: &'static str,
    },
    #[error("unexpected character {found:?} at byte {offset}, expected {expected}")]
    UnexpectedChar {
        offset: usize,
        found: char,
        expected: &'static str,
    },
    #[error("unexpected trailing input at byte {offset}")]
    TrailingInput { offset: usize },
    #[error("invalid escape sequence at byte {offset}")]
    InvalidEscape { offset: usize },
    #[error("invalid number {text:?} at byte {offset}")]
    InvalidNumber { offset: usize, text: String },
    #[error("expected a list of objects, found {found}")]
    NotAList { found: &'static str },
    #[error("element {index} is {found}, expected an object")]
    NotAnObject { index: usize, found: &'static str },
    #[error("element {index} has no string 'name'")]
    MissingName { index: usize },
}

/// Decode one cell. `None` and `""` are the empty list.
pub fn decode_named_list(cell: Option<&str>) -> Result<Vec<NamedEntity>, NestedFieldError> {
    let text = match cell {
        None => return Ok(Vec::new()),
        Some("") => return Ok(Vec::new()),
        Some(text) => text,
    };

    let items = match parse_literal(text)? {
        Literal::List(items) | Literal::Tuple(items) => items,
        other => return Err(NestedFieldError::NotAList { found: other.kind() }),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| entity_from_literal(index, item))
        .collect()
}

fn entity_from_literal(index: usize, item: &Literal) -> Result<NamedEntity, NestedFieldError> {
    if !matches!(item, Literal::Dict(_)) {
        return Err(NestedFieldError::NotAnObject {
            index,
            found: item.kind(),
        });
    }
    let name = match item.get("name") {
        Some(Literal::Str(name)) => name.clone(),
        _ => return Err(NestedFieldError::MissingName { index }),
    };
    // Only `name` is required; an `id` of any other shape is dropped.
    let id = match item.get("id") {
        Some(Literal::Int(id)) => Some(*id),
        _ => None,
    };
    Ok(NamedEntity { id, name })
}

/// Parse a complete literal. Surrounding whitespace is allowed, anything else after the value
/// is an error.
pub fn parse_literal(text: &str) -> Result<Literal, NestedFieldError> {
    let mut parser = Parser::new(text);
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(NestedFieldError::TrailingInput { offset: parser.pos });
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), NestedFieldError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == want => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(NestedFieldError::UnexpectedChar {
                offset: self.pos,
                found,
                expected,
            }),
            None => Err(NestedFieldError::UnexpectedEnd {
                offset: self.pos,
                expected,
            }),
        }
    }

    fn value(&mut self) -> Result<Literal, NestedFieldError> {
        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return Err(NestedFieldError::UnexpectedEnd {
                offset: self.pos,
                expected: "a value",
            });
        };
        match c {
            '[' => {
                self.bump();
                self.sequence(']').map(Literal::List)
            }
            '(' => self.tuple_or_group(),
            '{' => self.dict(),
            '\'' | '"' => self.strings().map(Literal::Str),
            '-' | '+' | '.' | '0'..='9' => self.number(),
            _ if self.string_prefix().is_some() => self.strings().map(Literal::Str),
            c if c.is_alphabetic() || c == '_' => self.keyword(),
            found => Err(NestedFieldError::UnexpectedChar {
                offset: self.pos,
                found,
                expected: "a value",
            }),
        }
    }

    /// Comma-separated values up to `close`; a trailing comma is allowed.
    fn sequence(&mut self, close: char) -> Result<Vec<Literal>, NestedFieldError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(found) => {
                    return Err(NestedFieldError::UnexpectedChar {
                        offset: self.pos,
                        found,
                        expected: "',' or a closing bracket",
                    })
                }
                None => {
                    return Err(NestedFieldError::UnexpectedEnd {
                        offset: self.pos,
                        expected: "',' or a closing bracket",
                    })
                }
            }
        }
    }

    fn tuple_or_group(&mut self) -> Result<Literal, NestedFieldError> {
        self.bump();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Literal::Tuple(Vec::new()));
        }
        let first = self.value()?;
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.bump();
            let mut items = vec![first];
            items.extend(self.sequence(')')?);
            return Ok(Literal::Tuple(items));
        }
        self.expect(')', "')'")?;
        Ok(first)
    }

    fn dict(&mut self) -> Result<Literal, NestedFieldError> {
        self.bump();
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Literal::Dict(entries));
            }
            let key = self.value()?;
            self.expect(':', "':'")?;
            let value = self.value()?;
            entries.push((key, value));
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(Literal::Dict(entries));
                }
                Some(found) => {
                    return Err(NestedFieldError::UnexpectedChar {
                        offset: self.pos,
                        found,
                        expected: "',' or '}'",
                    })
                }
                None => {
                    return Err(NestedFieldError::UnexpectedEnd {
                        offset: self.pos,
                        expected: "',' or '}'",
                    })
                }
            }
        }
    }

    /// Length of a `u`/`r`/`b` prefix (or `br`/`rb`) directly before a quote, and whether it
    /// makes the string raw.
    fn string_prefix(&self) -> Option<(usize, bool)> {
        let rest = &self.src[self.pos..];
        let letters: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .take(3)
            .collect();
        if letters.is_empty() || letters.len() > 2 {
            return None;
        }
        if !matches!(rest[letters.len()..].chars().next(), Some('\'' | '"')) {
            return None;
        }
        match letters.to_ascii_lowercase().as_str() {
            "u" | "b" => Some((letters.len(), false)),
            "r" | "br" | "rb" => Some((letters.len(), true)),
            _ => None,
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> Result<String, NestedFieldError> {
        let mut out = String::new();
        loop {
            let raw = match self.string_prefix() {
                Some((len, raw)) => {
                    self.pos += len;
                    raw
                }
                None => false,
            };
            out.push_str(&self.string(raw)?);

            let end = self.pos;
            self.skip_whitespace();
            let next_is_string =
                matches!(self.peek(), Some('\'' | '"')) || self.string_prefix().is_some();
            if !next_is_string {
                self.pos = end;
                return Ok(out);
            }
        }
    }

    fn string(&mut self, raw: bool) -> Result<String, NestedFieldError> {
        let quote = self.bump().unwrap_or('\'');
        let mut out = String::new();
        loop {
            let offset = self.pos;
            match self.bump() {
                None => {
                    return Err(NestedFieldError::UnexpectedEnd {
                        offset,
                        expected: "closing quote",
                    })
                }
                Some(c) if c == quote => return Ok(out),
                Some('\n') => {
                    return Err(NestedFieldError::UnexpectedChar {
                        offset,
                        found: '\n',
                        expected: "closing quote",
                    })
                }
                Some('\\') if raw => {
                    out.push('\\');
                    match self.bump() {
                        Some(c) => out.push(c),
                        None => {
                            return Err(NestedFieldError::UnexpectedEnd {
                                offset: self.pos,
                                expected: "closing quote",
                            })
                        }
                    }
                }
                Some('\\') => self.escape(offset, &mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, offset: usize, out: &mut String) -> Result<(), NestedFieldError> {
        let Some(c) = self.bump() else {
            return Err(NestedFieldError::InvalidEscape { offset });
        };
        match c {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '0' => out.push('\0'),
            'x' => out.push(self.hex_char(2, offset)?),
            'u' => out.push(self.hex_char(4, offset)?),
            'U' => out.push(self.hex_char(8, offset)?),
            // Unknown escapes keep the backslash.
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_char(&mut self, digits: usize, offset: usize) -> Result<char, NestedFieldError> {
        let end = self.pos + digits;
        let hex = self
            .src
            .get(self.pos..end)
            .ok_or(NestedFieldError::InvalidEscape { offset })?;
        let code =
            u32::from_str_radix(hex, 16).map_err(|_| NestedFieldError::InvalidEscape { offset })?;
        self.pos = end;
        char::from_u32(code).ok_or(NestedFieldError::InvalidEscape { offset })
    }

    fn number(&mut self) -> Result<Literal, NestedFieldError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-') | Some('+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let text = &self.src[start..self.pos];
        let cleaned = text.replace('_', "");
        let invalid = || NestedFieldError::InvalidNumber {
            offset: start,
            text: text.to_string(),
        };
        if is_float {
            cleaned.parse::<f64>().map(Literal::Float).map_err(|_| invalid())
        } else {
            cleaned.parse::<i64>().map(Literal::Int).map_err(|_| invalid())
        }
    }

    fn keyword(&mut self) -> Result<Literal, NestedFieldError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            word => Err(NestedFieldError::UnexpectedChar {
                offset: start,
                found: word.chars().next().unwrap_or('?'),
                expected: "a value",
            }),
        }
    }
}
