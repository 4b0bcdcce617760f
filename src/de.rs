use ::serde::de::{Error as _, Unexpected};

use crate::error::{Error, Result};
use crate::value::{Dictionary, Value};

impl Value {
    fn unexpected(&self) -> Unexpected<'_> {
        match self {
            Value::Integer(i) => Unexpected::Signed(*i),
            Value::ByteString(b) => Unexpected::Bytes(b),
            Value::List(_) => Unexpected::Seq,
            Value::Dictionary(_) => Unexpected::Map,
        }
    }
}

struct DeserializeList {
    iter: ::std::vec::IntoIter<Value>,
}

impl<'de> ::serde::de::SeqAccess<'de> for DeserializeList {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(item) => seed.deserialize(item).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct DeserializeDictionary {
    iter: ::std::collections::btree_map::IntoIter<Vec<u8>, Value>,
    value: Option<Value>,
}

impl<'de> ::serde::de::MapAccess<'de> for DeserializeDictionary {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: serde::de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Value::ByteString(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::Generic("map value requested before its key".into()))?;
        seed.deserialize(value)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

fn visit_list<'de, V>(items: Vec<Value>, v: V) -> Result<V::Value>
where
    V: serde::de::Visitor<'de>,
{
    let len = items.len();
    let mut access = DeserializeList {
        iter: items.into_iter(),
    };
    let out = v.visit_seq(&mut access)?;
    if access.iter.len() == 0 {
        Ok(out)
    } else {
        Err(Error::invalid_length(len, &"fewer elements in list"))
    }
}

fn visit_dictionary<'de, V>(entries: Dictionary, v: V) -> Result<V::Value>
where
    V: serde::de::Visitor<'de>,
{
    v.visit_map(DeserializeDictionary {
        iter: entries.into_iter(),
        value: None,
    })
}

/// Hands a byte string to the visitor as text when it is valid UTF-8.
fn visit_text<'de, V>(bytes: Vec<u8>, v: V) -> Result<V::Value>
where
    V: serde::de::Visitor<'de>,
{
    match String::from_utf8(bytes) {
        Ok(s) => v.visit_string(s),
        Err(e) => v.visit_byte_buf(e.into_bytes()),
    }
}

struct DeserializeEnum {
    variant: Vec<u8>,
    payload: Option<Value>,
}

impl<'de> ::serde::de::EnumAccess<'de> for DeserializeEnum {
    type Error = Error;

    type Variant = DeserializeEnumVariant;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Value::ByteString(self.variant))?;
        Ok((
            variant,
            DeserializeEnumVariant {
                payload: self.payload,
            },
        ))
    }
}

struct DeserializeEnumVariant {
    payload: Option<Value>,
}

impl<'de> ::serde::de::VariantAccess<'de> for DeserializeEnumVariant {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.payload {
            None => Ok(()),
            Some(Value::List(l)) if l.is_empty() => Ok(()),
            Some(other) => Err(Error::invalid_type(other.unexpected(), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        match self.payload {
            Some(value) => seed.deserialize(value),
            None => Err(Error::invalid_type(
                Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, _: usize, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self.payload {
            Some(Value::List(items)) => visit_list(items, v),
            Some(other) => Err(Error::invalid_type(other.unexpected(), &"tuple variant")),
            None => Err(Error::invalid_type(Unexpected::UnitVariant, &"tuple variant")),
        }
    }

    fn struct_variant<V>(self, _: &'static [&'static str], v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self.payload {
            Some(Value::Dictionary(entries)) => visit_dictionary(entries, v),
            Some(other) => Err(Error::invalid_type(other.unexpected(), &"struct variant")),
            None => Err(Error::invalid_type(Unexpected::UnitVariant, &"struct variant")),
        }
    }
}

/// Reads a [`Value`] tree back into any `serde::Deserialize` type, inverting
/// the mapping used by [`crate::Serializer`].
impl<'de> ::serde::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Value::Integer(i) => v.visit_i64(i),
            Value::ByteString(b) => v.visit_byte_buf(b),
            Value::List(items) => visit_list(items, v),
            Value::Dictionary(entries) => visit_dictionary(entries, v),
        }
    }

    fn deserialize_bool<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Value::Integer(0) => v.visit_bool(false),
            Value::Integer(1) => v.visit_bool(true),
            other => Err(Error::invalid_type(other.unexpected(), &v)),
        }
    }

    fn deserialize_char<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        self.deserialize_string(v)
    }

    fn deserialize_str<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        self.deserialize_string(v)
    }

    fn deserialize_string<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Value::ByteString(b) => visit_text(b, v),
            other => other.deserialize_any(v),
        }
    }

    fn deserialize_bytes<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        self.deserialize_byte_buf(v)
    }

    fn deserialize_byte_buf<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Value::ByteString(b) => v.visit_byte_buf(b),
            other => Err(Error::invalid_type(other.unexpected(), &v)),
        }
    }

    fn deserialize_option<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        v.visit_some(self)
    }

    fn deserialize_unit<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Value::List(items) if items.is_empty() => v.visit_unit(),
            other => Err(Error::invalid_type(other.unexpected(), &v)),
        }
    }

    fn deserialize_unit_struct<V>(self, _: &'static str, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        self.deserialize_unit(v)
    }

    fn deserialize_newtype_struct<V>(self, _: &'static str, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        v.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        v: V,
    ) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self {
            Value::ByteString(variant) => v.visit_enum(DeserializeEnum {
                variant,
                payload: None,
            }),
            Value::Dictionary(entries) => {
                let mut iter = entries.into_iter();
                match (iter.next(), iter.next()) {
                    (Some((variant, payload)), None) => v.visit_enum(DeserializeEnum {
                        variant,
                        payload: Some(payload),
                    }),
                    _ => Err(Error::invalid_value(
                        Unexpected::Map,
                        &"dictionary with a single key",
                    )),
                }
            }
            other => Err(Error::invalid_type(
                other.unexpected(),
                &"byte string or single-key dictionary",
            )),
        }
    }

    fn deserialize_identifier<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        self.deserialize_string(v)
    }

    fn deserialize_ignored_any<V>(self, v: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        v.visit_unit()
    }

    fn is_human_readable(&self) -> bool {
        false
    }

    ::serde::forward_to_deserialize_any! {
        i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 seq tuple tuple_struct map struct
    }
}
