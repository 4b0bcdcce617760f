use crate::error::{Error, Result};
use crate::value::{Dictionary, Value};

/// Wraps an enum variant's payload as `{name: payload}`.
fn variant_entry(variant: &'static str, payload: Value) -> Value {
    let mut entries = Dictionary::new();
    entries.insert(variant.as_bytes().to_vec(), payload);
    Value::Dictionary(entries)
}

fn dictionary_key(key: Value) -> Result<Vec<u8>> {
    match key {
        Value::ByteString(b) => Ok(b),
        other => Err(Error::Invalid(format!(
            "dictionary key: expected byte string, found {}",
            other.kind()
        ))),
    }
}

pub struct CollectionSerializer {
    items: Vec<Value>,
}

impl ::serde::ser::SerializeSeq for CollectionSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        self.items.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::List(self.items))
    }
}

impl ::serde::ser::SerializeTuple for CollectionSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        ::serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        ::serde::ser::SerializeSeq::end(self)
    }
}

impl ::serde::ser::SerializeTupleStruct for CollectionSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        ::serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        ::serde::ser::SerializeSeq::end(self)
    }
}

pub struct TupleVariantSerializer {
    variant: &'static str,
    items: Vec<Value>,
}

impl ::serde::ser::SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        self.items.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(variant_entry(self.variant, Value::List(self.items)))
    }
}

pub struct DictionarySerializer {
    entries: Dictionary,
    pending_key: Option<Vec<u8>>,
}

impl ::serde::ser::SerializeMap for DictionarySerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        self.pending_key = Some(dictionary_key(key.serialize(Serializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::Generic("map value serialized before its key".into()))?;
        self.entries.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Dictionary(self.entries))
    }
}

impl ::serde::ser::SerializeStruct for DictionarySerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        self.entries
            .insert(key.as_bytes().to_vec(), value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Dictionary(self.entries))
    }
}

pub struct StructVariantSerializer {
    variant: &'static str,
    entries: Dictionary,
}

impl ::serde::ser::SerializeStructVariant for StructVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        self.entries
            .insert(key.as_bytes().to_vec(), value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(variant_entry(self.variant, Value::Dictionary(self.entries)))
    }
}

/// Serializes any `serde::Serialize` type into a [`Value`] tree.
///
/// Booleans become the integers 0 and 1, units become empty lists and enum
/// variants carrying data become single-entry dictionaries keyed by the
/// variant name. Floats and `None` have no bencode form and are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

impl ::serde::ser::Serializer for Serializer {
    type Error = Error;
    type Ok = Value;

    type SerializeSeq = CollectionSerializer;

    type SerializeTuple = CollectionSerializer;

    type SerializeTupleStruct = CollectionSerializer;

    type SerializeTupleVariant = TupleVariantSerializer;

    type SerializeMap = DictionarySerializer;

    type SerializeStruct = DictionarySerializer;

    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        let signed = i64::try_from(v)
            .map_err(|_| Error::Invalid(format!("integer {v}: exceeds signed 64-bit range")))?;
        self.serialize_i64(signed)
    }

    fn serialize_f32(self, _: f32) -> Result<Self::Ok> {
        Err(Error::Unsupported("serialize f32".into()))
    }

    fn serialize_f64(self, _: f64) -> Result<Self::Ok> {
        Err(Error::Unsupported("serialize f64".into()))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        let mut buf = [0u8; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Value::string(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        Ok(Value::ByteString(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Err(Error::Unsupported("serialize none".into()))
    }

    fn serialize_some<T: ?Sized>(self, value: &T) -> Result<Self::Ok>
    where
        T: serde::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(Value::List(Vec::new()))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized>(self, _: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: serde::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: serde::Serialize,
    {
        Ok(variant_entry(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(CollectionSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(TupleVariantSerializer {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(DictionarySerializer {
            entries: Dictionary::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(StructVariantSerializer {
            variant,
            entries: Dictionary::new(),
        })
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}
