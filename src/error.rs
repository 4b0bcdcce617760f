/// Reasons a byte buffer could not be decoded as Bencode.
///
/// Every variant records the byte offset at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, ::thiserror::Error)]
pub enum DecodeError {
    /// The lead byte does not start the construct that was requested.
    #[error("expected {expected} at offset {offset}, found byte {found:#04x}")]
    Structural {
        offset: usize,
        expected: &'static str,
        found: u8,
    },

    /// The buffer ended before a terminator or a declared length was satisfied.
    #[error("stream truncated at offset {offset} while reading {expected}")]
    TruncatedStream {
        offset: usize,
        expected: &'static str,
    },

    /// A non-digit byte where a decimal digit was required.
    #[error("expected a decimal digit at offset {offset}, found byte {found:#04x}")]
    Syntax { offset: usize, found: u8 },

    /// An integer with a leading zero, or negative zero.
    #[error("non-canonical integer at offset {offset}")]
    Normalization { offset: usize },

    /// A number that does not fit the type it is decoded into.
    #[error("number at offset {offset} is out of range")]
    NumericRange { offset: usize },
}

impl DecodeError {
    /// Byte offset into the input where decoding failed.
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::Structural { offset, .. }
            | DecodeError::TruncatedStream { offset, .. }
            | DecodeError::Syntax { offset, .. }
            | DecodeError::Normalization { offset }
            | DecodeError::NumericRange { offset } => offset,
        }
    }
}

/// Error type for this crate, shared by the serde bridge and the I/O helpers.
#[derive(Debug, ::thiserror::Error)]
pub enum Error {
    /// Errors that don't fit into any other category.
    #[error("{0}")]
    Generic(String),

    /// Errors related to IO operations
    #[error("{0}")]
    Io(::std::io::Error),

    /// Errors related to usage of types bencode cannot represent.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Errors related to values that are not valid for the given type.
    #[error("invalid {0}")]
    Invalid(String),

    /// The input bytes were not well-formed bencode.
    #[error("{0}")]
    Decode(#[from] DecodeError),
}

/// Result type for this crate.
pub type Result<T> = ::std::result::Result<T, Error>;

impl ::serde::de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Generic(msg.to_string())
    }
}

impl ::serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        Self::Generic(msg.to_string())
    }
}
