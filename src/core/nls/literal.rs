//! Constant evaluation of `localize` key and message arguments.
//!
//! Arguments are read back from their source text and evaluated with a small
//! dedicated grammar, never with a general expression evaluator:
//!
//! ```text
//! key     := value | object
//! value   := string ('+' string)*
//! string  := '...' | "..." | `...`        (templates without ${})
//! object  := '{' (prop (',' prop)* ','?)? '}'
//! prop    := (ident | string) ':' (value | array)
//! array   := '[' (value (',' value)* ','?)? ']'
//! ```
//!
//! Whitespace and `//` / `/* */` comments are allowed between tokens.

use thiserror::Error;

use super::entry::LocalizeKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),

    #[error("template literal at offset {0} contains an interpolation")]
    InterpolatedTemplate(usize),

    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    #[error("object key has no `key` property")]
    MissingKey,
}

/// Evaluate the key argument of a `localize` call.
pub fn parse_localize_key(text: &str) -> Result<LocalizeKey, LiteralError> {
    let mut parser = LiteralParser::new(text);
    parser.skip_trivia()?;
    let key = if parser.peek() == Some('{') {
        parser.parse_key_object()?
    } else {
        LocalizeKey::Plain(parser.parse_value()?)
    };
    parser.expect_end()?;
    Ok(key)
}

/// Evaluate the message argument of a `localize` call.
pub fn parse_localize_value(text: &str) -> Result<String, LiteralError> {
    let mut parser = LiteralParser::new(text);
    let value = parser.parse_value()?;
    parser.expect_end()?;
    Ok(value)
}

/// Property values seen inside a key object.
enum PropValue {
    Str(String),
    List(Vec<String>),
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(ahead)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::Unexpected {
                found,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        self.skip_trivia()?;
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_end(&mut self) -> Result<(), LiteralError> {
        self.skip_trivia()?;
        if self.pos == self.src.len() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), LiteralError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.src[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => {
                            return Err(LiteralError::Unexpected {
                                found: '/',
                                offset: start,
                            });
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// `string ('+' string)*`
    fn parse_value(&mut self) -> Result<String, LiteralError> {
        self.skip_trivia()?;
        let mut value = self.parse_string()?;
        loop {
            self.skip_trivia()?;
            if self.peek() != Some('+') {
                return Ok(value);
            }
            self.bump();
            self.skip_trivia()?;
            value.push_str(&self.parse_string()?);
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(q @ ('\'' | '"' | '`')) => q,
            _ => return Err(self.unexpected()),
        };
        self.bump();

        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(LiteralError::UnterminatedString(start));
            };
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.parse_escape(&mut out)?,
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(LiteralError::InterpolatedTemplate(start));
                }
                '\n' | '\r' if quote != '`' => {
                    return Err(LiteralError::UnterminatedString(start));
                }
                c => out.push(c),
            }
        }
    }

    /// Decode the escape following a consumed backslash.
    fn parse_escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let at = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(LiteralError::UnexpectedEnd);
        };
        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            // Line continuation.
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            'x' => {
                let code = self.hex_digits(2).ok_or(LiteralError::InvalidEscape(at))?;
                out.push(char::from_u32(code).ok_or(LiteralError::InvalidEscape(at))?);
            }
            'u' => {
                let unit = self.unicode_escape().ok_or(LiteralError::InvalidEscape(at))?;
                if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate; must be followed by `\uDC00`-`\uDFFF`.
                    if self.peek() != Some('\\') || self.peek_at(1) != Some('u') {
                        return Err(LiteralError::InvalidEscape(at));
                    }
                    self.pos += 2;
                    let low = self.unicode_escape().ok_or(LiteralError::InvalidEscape(at))?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(LiteralError::InvalidEscape(at));
                    }
                    let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(code).ok_or(LiteralError::InvalidEscape(at))?);
                } else {
                    out.push(char::from_u32(unit).ok_or(LiteralError::InvalidEscape(at))?);
                }
            }
            c if c.is_ascii_digit() => return Err(LiteralError::InvalidEscape(at)),
            c => out.push(c),
        }
        Ok(())
    }

    /// `XXXX` or `{X...}` after `\u`.
    fn unicode_escape(&mut self) -> Option<u32> {
        if self.peek() == Some('{') {
            self.bump();
            let rest = &self.src[self.pos..];
            let end = rest.find('}')?;
            let code = u32::from_str_radix(&rest[..end], 16).ok()?;
            self.pos += end + 1;
            (code <= 0x10FFFF).then_some(code)
        } else {
            self.hex_digits(4)
        }
    }

    fn hex_digits(&mut self, count: usize) -> Option<u32> {
        let digits = self.src.get(self.pos..self.pos + count)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        self.pos += count;
        u32::from_str_radix(digits, 16).ok()
    }

    /// `{ key: '...', comment: ['...'] }`
    fn parse_key_object(&mut self) -> Result<LocalizeKey, LiteralError> {
        self.expect('{')?;

        let mut key = None;
        let mut comment = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                break;
            }

            let name = self.parse_prop_name()?;
            self.expect(':')?;
            self.skip_trivia()?;
            let value = if self.peek() == Some('[') {
                PropValue::List(self.parse_array()?)
            } else {
                PropValue::Str(self.parse_value()?)
            };

            match (name.as_str(), value) {
                ("key", PropValue::Str(s)) => key = Some(s),
                ("key", PropValue::List(_)) => return Err(LiteralError::MissingKey),
                ("comment", PropValue::Str(s)) => comment = vec![s],
                ("comment", PropValue::List(list)) => comment = list,
                _ => {}
            }

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.unexpected()),
            }
        }

        let key = key.ok_or(LiteralError::MissingKey)?;
        Ok(LocalizeKey::Structured { key, comment })
    }

    fn parse_prop_name(&mut self) -> Result<String, LiteralError> {
        match self.peek() {
            Some('\'' | '"') => self.parse_string(),
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
                {
                    self.bump();
                }
                Ok(self.src[start..self.pos].to_string())
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_array(&mut self) -> Result<Vec<String>, LiteralError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.bump();
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                _ => return Err(self.unexpected()),
            }
        }
    }
}
