use std::collections::BTreeMap;

use crate::decode::Kind;

/// Dictionary storage. `Vec<u8>` orders byte-lexicographically, which is the
/// canonical bencode key order.
///
/// The encoder writes entries in iteration order, so this map type must keep
/// its keys sorted. Switching to an unordered map breaks canonical output.
pub type Dictionary = BTreeMap<Vec<u8>, Value>;

/// A bencode value.
///
/// Values own all of their data; nothing borrows from the buffer they were
/// decoded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// Raw bytes, not necessarily UTF-8.
    ByteString(Vec<u8>),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A mapping from byte string keys to values.
    Dictionary(Dictionary),
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::ByteString(s.as_bytes().to_vec())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::ByteString(_) => Kind::ByteString,
            Value::List(_) => Kind::List,
            Value::Dictionary(_) => Kind::Dictionary,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as `&str` if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn into_dictionary(self) -> Option<Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dictionary()?.get(key)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::ByteString(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::ByteString(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::ByteString(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dictionary> for Value {
    fn from(d: Dictionary) -> Self {
        Value::Dictionary(d)
    }
}

struct ByteKey<'a>(&'a [u8]);

impl<'a> ::serde::Serialize for ByteKey<'a> {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        serializer.serialize_bytes(self.0)
    }
}

impl ::serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: ::serde::Serializer,
    {
        use ::serde::ser::SerializeMap;

        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::ByteString(b) => serializer.serialize_bytes(b),
            Value::List(l) => serializer.collect_seq(l),
            Value::Dictionary(d) => {
                let mut map = serializer.serialize_map(Some(d.len()))?;
                for (k, v) in d {
                    map.serialize_entry(&ByteKey(k), v)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> ::serde::de::Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a bencode value")
    }

    fn visit_bool<E>(self, v: bool) -> ::std::result::Result<Value, E> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn visit_i64<E>(self, v: i64) -> ::std::result::Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> ::std::result::Result<Value, E>
    where
        E: ::serde::de::Error,
    {
        i64::try_from(v).map(Value::Integer).map_err(|_| {
            E::invalid_value(::serde::de::Unexpected::Unsigned(v), &"a signed 64-bit integer")
        })
    }

    fn visit_str<E>(self, v: &str) -> ::std::result::Result<Value, E> {
        Ok(Value::string(v))
    }

    fn visit_string<E>(self, v: String) -> ::std::result::Result<Value, E> {
        Ok(Value::ByteString(v.into_bytes()))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> ::std::result::Result<Value, E> {
        Ok(Value::ByteString(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> ::std::result::Result<Value, E> {
        Ok(Value::ByteString(v))
    }

    fn visit_unit<E>(self) -> ::std::result::Result<Value, E> {
        Ok(Value::List(Vec::new()))
    }

    fn visit_some<D>(self, d: D) -> ::std::result::Result<Value, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        ::serde::Deserialize::deserialize(d)
    }

    fn visit_newtype_struct<D>(self, d: D) -> ::std::result::Result<Value, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        ::serde::Deserialize::deserialize(d)
    }

    fn visit_seq<A>(self, mut seq: A) -> ::std::result::Result<Value, A::Error>
    where
        A: ::serde::de::SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> ::std::result::Result<Value, A::Error>
    where
        A: ::serde::de::MapAccess<'de>,
    {
        let mut entries = Dictionary::new();
        while let Some(key) = map.next_key::<Value>()? {
            let key = match key {
                Value::ByteString(b) => b,
                other => {
                    return Err(::serde::de::Error::custom(format!(
                        "dictionary key must be a byte string, found {}",
                        other.kind()
                    )))
                }
            };
            let value = map.next_value()?;
            entries.insert(key, value);
        }
        Ok(Value::Dictionary(entries))
    }
}

impl<'de> ::serde::Deserialize<'de> for Value {
    fn deserialize<D>(d: D) -> ::std::result::Result<Self, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        d.deserialize_any(ValueVisitor)
    }
}
