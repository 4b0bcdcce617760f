#![forbid(unsafe_code)]
//! # Bencode value tree codec with a `serde` bridge.
//!
//! Bencode is the serialization format BitTorrent uses for metainfo files and
//! several wire messages. It has four kinds of values:
//!
//! - integers, `i42e`, signed 64-bit with no leading zeros and no `-0`;
//! - byte strings, `4:spam`, a decimal length followed by that many raw bytes;
//! - lists, `l4:spami42ee`;
//! - dictionaries, `d3:cow3:mooe`, byte string keys in ascending byte order.
//!
//! [`decode`] turns a buffer into a [`Value`] tree and [`encode`] turns a tree
//! back into canonical bytes. Decoding is lenient about dictionary key order
//! and duplicate keys (the last one wins); encoding always sorts.
//!
//! ```
//! use serde_bencode_value::{decode, encode, Value};
//!
//! let value = decode(b"d4:spaml1:a1:bee").unwrap();
//! assert_eq!(value.get(b"spam").and_then(Value::as_list).map(|l| l.len()), Some(2));
//! assert_eq!(encode(&value), b"d4:spaml1:a1:bee");
//! ```
//!
//! The `serde` bridge maps Rust types onto the tree: see [`Serializer`] for
//! the mapping. Floats and `None` have no bencode representation.
//!
//! Decoding performs no depth limiting; nesting depth of the input becomes
//! recursion depth.

/// Decoding of bencode bytes into values.
pub mod decode;
/// Deserialization of values into Rust types.
mod de;
/// Canonical encoding of values into bytes.
pub mod encode;
/// Error types and functions.
pub mod error;
/// Serialization of Rust types into values.
pub mod ser;
/// The bencode value tree.
pub mod value;


pub use crate::decode::{
    decode, decode_dictionary, decode_integer, decode_list, decode_string, peek_kind, Decoder,
    Kind,
};
pub use crate::encode::{encode, encode_to_writer, encoded_len};
pub use crate::error::{DecodeError, Error};
pub use crate::ser::Serializer;
pub use crate::value::{Dictionary, Value};

/// Convert a value into a bencode [`Value`] tree.
pub fn to_value<V>(v: V) -> crate::error::Result<Value>
where
    V: ::serde::Serialize,
{
    v.serialize(crate::ser::Serializer)
}

/// Convert a bencode [`Value`] tree into a value.
pub fn from_value<V>(value: Value) -> crate::error::Result<V>
where
    V: ::serde::de::DeserializeOwned,
{
    V::deserialize(value)
}

/// Get the number of bytes required to encode a value.
pub fn encoded_size<V>(v: V) -> crate::error::Result<usize>
where
    V: ::serde::Serialize,
{
    Ok(encoded_len(&to_value(v)?))
}

/// Encode a value into a writer.
pub fn to_writer<V, W>(v: V, w: W) -> crate::error::Result<()>
where
    V: ::serde::Serialize,
    W: ::std::io::Write,
{
    encode_to_writer(&to_value(v)?, w).map_err(crate::error::Error::Io)
}

/// Encode a value into a byte vector.
pub fn to_bytes<V>(v: V) -> crate::error::Result<Vec<u8>>
where
    V: ::serde::Serialize,
{
    Ok(encode(&to_value(v)?))
}

/// Decode a value from a reader. The reader is consumed to its end.
pub fn from_reader<V, R>(mut r: R) -> crate::error::Result<V>
where
    V: ::serde::de::DeserializeOwned,
    R: ::std::io::Read,
{
    let mut buf = Vec::new();
    r.read_to_end(&mut buf).map_err(crate::error::Error::Io)?;
    from_bytes(&buf)
}

/// Decode a value from a byte slice.
pub fn from_bytes<V>(buf: &[u8]) -> crate::error::Result<V>
where
    V: ::serde::de::DeserializeOwned,
{
    from_value(decode(buf)?)
}
