//! JSON record encoding.
//!
//! `serde_json` writes NaN and infinities as `null`, which then fails to
//! decode back into the float field. Records are walked once with
//! [`FiniteFloats`] first so such values are refused instead of stored.

use serde::Serialize;
use serde::ser::{self, Error as _};

/// Encode a record as JSON, refusing non-finite floats
pub fn to_json_vec<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    value.serialize(FiniteFloats)?;
    serde_json::to_vec(value)
}

/// Serializer that produces nothing and fails on NaN or infinite floats
struct FiniteFloats;

fn check_finite(v: f64) -> serde_json::Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!(
            "non-finite float {v} cannot be encoded as JSON"
        )))
    }
}

impl ser::Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> serde_json::Result<()> {
        check_finite(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> serde_json::Result<()> {
        check_finite(v)
    }

    fn serialize_char(self, _v: char) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_none(self) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> serde_json::Result<()> {
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T>(&mut self, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(Self)
    }

    fn end(self) -> serde_json::Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T>(&mut self, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(Self)
    }

    fn end(self) -> serde_json::Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(Self)
    }

    fn end(self) -> serde_json::Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(Self)
    }

    fn end(self) -> serde_json::Result<()> {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T>(&mut self, key: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        key.serialize(Self)
    }

    fn serialize_value<T>(&mut self, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(Self)
    }

    fn end(self) -> serde_json::Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(Self)
    }

    fn end(self) -> serde_json::Result<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> serde_json::Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(Self)
    }

    fn end(self) -> serde_json::Result<()> {
        Ok(())
    }
}
