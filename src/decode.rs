use std::fmt;

use crate::error::DecodeError;
use crate::value::{Dictionary, Value};

type Result<T> = ::std::result::Result<T, DecodeError>;

/// Classification of the byte under a [`Decoder`]'s cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    ByteString,
    List,
    Dictionary,
    /// The `e` byte closing an integer, list or dictionary.
    Terminator,
    /// Any other byte, or the end of the buffer.
    Invalid,
}

impl Kind {
    /// Classifies a lead byte. `None` stands for the end of the buffer.
    pub fn of(byte: Option<u8>) -> Kind {
        match byte {
            Some(b'0'..=b'9') => Kind::ByteString,
            Some(b'i') => Kind::Integer,
            Some(b'l') => Kind::List,
            Some(b'd') => Kind::Dictionary,
            Some(b'e') => Kind::Terminator,
            _ => Kind::Invalid,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Integer => "integer",
            Kind::ByteString => "byte string",
            Kind::List => "list",
            Kind::Dictionary => "dictionary",
            Kind::Terminator => "terminator",
            Kind::Invalid => "invalid byte",
        })
    }
}

/// Recursive-descent bencode parser over an in-memory buffer.
///
/// The decoder copies everything it returns out of the buffer. If any of the
/// `decode_*` methods fails, the cursor is left where that call started.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Offset of the next unconsumed byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn peek_kind(&self) -> Kind {
        Kind::of(self.peek())
    }

    pub fn decode_value(&mut self) -> Result<Value> {
        self.attempt(Self::value)
    }

    pub fn decode_integer(&mut self) -> Result<i64> {
        self.attempt(Self::integer)
    }

    pub fn decode_string(&mut self) -> Result<Vec<u8>> {
        self.attempt(Self::string)
    }

    pub fn decode_list(&mut self) -> Result<Vec<Value>> {
        self.attempt(Self::list)
    }

    pub fn decode_dictionary(&mut self) -> Result<Dictionary> {
        self.attempt(Self::dictionary)
    }

    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.pos;
        f(self).map_err(|error| {
            tracing::trace!(offset = start, %error, "bencode decode failed");
            self.pos = start;
            error
        })
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn expect_lead(&mut self, lead: u8, expected: &'static str) -> Result<()> {
        match self.peek() {
            Some(b) if b == lead => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(DecodeError::Structural {
                offset: self.pos,
                expected,
                found,
            }),
            None => Err(DecodeError::TruncatedStream {
                offset: self.pos,
                expected,
            }),
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.peek_kind() {
            Kind::Integer => self.integer().map(Value::Integer),
            Kind::ByteString => self.string().map(Value::ByteString),
            Kind::List => self.list().map(Value::List),
            Kind::Dictionary => self.dictionary().map(Value::Dictionary),
            Kind::Terminator | Kind::Invalid => match self.peek() {
                Some(found) => Err(DecodeError::Structural {
                    offset: self.pos,
                    expected: "value",
                    found,
                }),
                None => Err(DecodeError::TruncatedStream {
                    offset: self.pos,
                    expected: "value",
                }),
            },
        }
    }

    fn integer(&mut self) -> Result<i64> {
        let start = self.pos;
        self.expect_lead(b'i', "integer")?;

        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }

        // Negative literals accumulate downwards so i64::MIN is reachable.
        let mut acc = Some(0i64);
        let mut digits = 0usize;
        let mut leading_zero = false;
        loop {
            match self.peek() {
                Some(b'e') => break,
                Some(c @ b'0'..=b'9') => {
                    if leading_zero {
                        return Err(DecodeError::Normalization { offset: start });
                    }
                    if digits == 0 && c == b'0' {
                        leading_zero = true;
                    }
                    let d = i64::from(c - b'0');
                    acc = acc.and_then(|v| v.checked_mul(10)).and_then(|v| {
                        if negative {
                            v.checked_sub(d)
                        } else {
                            v.checked_add(d)
                        }
                    });
                    digits += 1;
                }
                Some(found) => {
                    return Err(DecodeError::Syntax {
                        offset: self.pos,
                        found,
                    })
                }
                None => {
                    return Err(DecodeError::TruncatedStream {
                        offset: self.pos,
                        expected: "integer terminator",
                    })
                }
            }
            self.pos += 1;
        }

        if digits == 0 {
            return Err(DecodeError::Syntax {
                offset: self.pos,
                found: b'e',
            });
        }
        if negative && leading_zero {
            return Err(DecodeError::Normalization { offset: start });
        }
        let value = acc.ok_or(DecodeError::NumericRange { offset: start })?;

        self.pos += 1;
        Ok(value)
    }

    fn string(&mut self) -> Result<Vec<u8>> {
        let start = self.pos;
        match self.peek() {
            Some(b'0'..=b'9') => {}
            Some(found) => {
                return Err(DecodeError::Syntax {
                    offset: self.pos,
                    found,
                })
            }
            None => {
                return Err(DecodeError::TruncatedStream {
                    offset: self.pos,
                    expected: "byte string length",
                })
            }
        }

        let mut len = Some(0usize);
        loop {
            match self.peek() {
                Some(b':') => break,
                Some(c @ b'0'..=b'9') => {
                    len = len
                        .and_then(|l| l.checked_mul(10))
                        .and_then(|l| l.checked_add(usize::from(c - b'0')));
                }
                Some(found) => {
                    return Err(DecodeError::Syntax {
                        offset: self.pos,
                        found,
                    })
                }
                None => {
                    return Err(DecodeError::TruncatedStream {
                        offset: self.pos,
                        expected: "':' after byte string length",
                    })
                }
            }
            self.pos += 1;
        }
        let len = len.ok_or(DecodeError::NumericRange { offset: start })?;
        self.pos += 1;

        let bytes = self
            .pos
            .checked_add(len)
            .and_then(|end| self.buf.get(self.pos..end))
            .ok_or(DecodeError::TruncatedStream {
                offset: self.buf.len(),
                expected: "byte string contents",
            })?;
        self.pos += len;
        Ok(bytes.to_vec())
    }

    fn list(&mut self) -> Result<Vec<Value>> {
        self.expect_lead(b'l', "list")?;
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(b'e') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => items.push(self.value()?),
                None => {
                    return Err(DecodeError::TruncatedStream {
                        offset: self.pos,
                        expected: "list terminator",
                    })
                }
            }
        }
    }

    fn dictionary(&mut self) -> Result<Dictionary> {
        self.expect_lead(b'd', "dictionary")?;
        let mut entries = Dictionary::new();
        loop {
            match self.peek() {
                Some(b'e') => {
                    self.pos += 1;
                    return Ok(entries);
                }
                Some(b'0'..=b'9') => {
                    let key_offset = self.pos;
                    let key = self.string()?;
                    let value = self.value()?;
                    // Input order is not checked; the last duplicate wins.
                    if entries.insert(key, value).is_some() {
                        tracing::debug!(offset = key_offset, "duplicate dictionary key replaced");
                    }
                }
                Some(found) => {
                    return Err(DecodeError::Structural {
                        offset: self.pos,
                        expected: "dictionary key",
                        found,
                    })
                }
                None => {
                    return Err(DecodeError::TruncatedStream {
                        offset: self.pos,
                        expected: "dictionary terminator",
                    })
                }
            }
        }
    }
}

/// Classifies the first byte of `buf`.
pub fn peek_kind(buf: &[u8]) -> Kind {
    Decoder::new(buf).peek_kind()
}

/// Decodes the value at the start of `buf`. Bytes after it are ignored.
pub fn decode(buf: &[u8]) -> Result<Value> {
    Decoder::new(buf).decode_value()
}

/// Decodes an integer at the start of `buf`.
pub fn decode_integer(buf: &[u8]) -> Result<i64> {
    Decoder::new(buf).decode_integer()
}

/// Decodes a byte string at the start of `buf`.
pub fn decode_string(buf: &[u8]) -> Result<Vec<u8>> {
    Decoder::new(buf).decode_string()
}

/// Decodes a list at the start of `buf`.
pub fn decode_list(buf: &[u8]) -> Result<Vec<Value>> {
    Decoder::new(buf).decode_list()
}

/// Decodes a dictionary at the start of `buf`.
pub fn decode_dictionary(buf: &[u8]) -> Result<Dictionary> {
    Decoder::new(buf).decode_dictionary()
}
