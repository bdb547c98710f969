//! Serialization.
//!
//! Integers are always written with the narrowest tag that holds their value. Containers are
//! encoded into a scratch buffer first, so their total size is exact.
//!
//! Enum variants, when mapped, are:
//! - Unit - Just the variant name as a String
//! - Newtype - Object with one entry. Key is variant name, content is the value
//! - Tuple - Object with one entry. Key is variant name, content is the tuple as a List
//! - Struct - Object with one entry. Key is variant name, content is the struct as an Object
//!
//! Maps with integer keys become a Map, maps with string keys become an Object. An empty map has
//! no keys to go by and is written as an empty Object.

use std::{convert::TryFrom, mem};

use serde::ser::{
    self, Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
};

use crate::depth_tracking::DepthTracker;
use crate::element::*;
use crate::error::{Error, Result};
use crate::hooks::RAW_TOKEN;
use crate::options::EncodeOptions;

/// Encodes values into a byte vector.
pub struct Serializer {
    depth_tracking: DepthTracker,
    buf: Vec<u8>,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::with_options(&EncodeOptions::default())
    }
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: &EncodeOptions) -> Self {
        Serializer {
            depth_tracking: DepthTracker::new(options.max_depth),
            buf: Vec::new(),
        }
    }

    /// Take the encoded bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    fn encode_element(&mut self, elem: Element) -> Result<()> {
        serialize_elem(&mut self.buf, elem)
    }

    /// Start a container by swapping in an empty buffer for its items. The returned buffer must
    /// be handed back to [`close`](Self::close).
    fn open(&mut self) -> Result<Vec<u8>> {
        self.depth_tracking.enter()?;
        Ok(mem::take(&mut self.buf))
    }

    /// Finish a container: swap the outer buffer back in, write the header, then the items.
    fn close(
        &mut self,
        outer: Vec<u8>,
        count: usize,
        kind: fn(Container) -> Element<'static>,
    ) -> Result<()> {
        let items = mem::replace(&mut self.buf, outer);
        serialize_elem(
            &mut self.buf,
            kind(Container {
                count,
                len: items.len(),
            }),
        )?;
        self.buf.extend_from_slice(&items);
        self.depth_tracking.exit();
        Ok(())
    }

    /// Copy an already-encoded value through untouched, after making sure it is exactly one
    /// value.
    fn write_raw(&mut self, raw: &[u8]) -> Result<()> {
        let len = value_len(raw)?;
        if len != raw.len() {
            return Err(Error::BadEncode(format!(
                "self-encoded value is {} bytes, but its header covers {}",
                raw.len(),
                len
            )));
        }
        self.buf.extend_from_slice(raw);
        Ok(())
    }

    /// Start the one-entry Object that wraps a non-unit enum variant.
    fn open_variant(&mut self, variant: &'static str) -> Result<Vec<u8>> {
        let outer = self.open()?;
        serialize_object_key(&mut self.buf, variant)?;
        Ok(outer)
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = ListSerializer<'a>;
    type SerializeTuple = ListSerializer<'a>;
    type SerializeTupleStruct = ListSerializer<'a>;
    type SerializeTupleVariant = ListSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructSerializer<'a>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.encode_element(Element::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.encode_element(Element::int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        match i64::try_from(v) {
            Ok(v) => self.serialize_i64(v),
            Err(_) => match u64::try_from(v) {
                Ok(v) => self.serialize_u64(v),
                Err(_) => Err(Error::UnsupportedShape(format!(
                    "integer {} doesn't fit in 64 bits",
                    v
                ))),
            },
        }
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.encode_element(Element::int(v))
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        let v = u64::try_from(v).map_err(|_| {
            Error::UnsupportedShape(format!("integer {} doesn't fit in 64 bits", v))
        })?;
        self.serialize_u64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.encode_element(Element::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.encode_element(Element::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut tmp = [0u8; 4];
        self.encode_element(Element::Str(v.encode_utf8(&mut tmp)))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.encode_element(Element::Str(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.encode_element(Element::Bin(v))
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_some<T: Serialize + ?Sized>(self, v: &T) -> Result<()> {
        v.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.encode_element(Element::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        v: &T,
    ) -> Result<()> {
        if name == RAW_TOKEN {
            v.serialize(RawSerializer { se: self })
        } else {
            v.serialize(self)
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()> {
        let outer = self.open_variant(variant)?;
        value.serialize(&mut *self)?;
        self.close(outer, 1, Element::Object)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        ListSerializer::new(self, None)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        ListSerializer::new(self, None)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        // Tuple structs usually just discard the name
        ListSerializer::new(self, None)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        let variant = self.open_variant(variant)?;
        ListSerializer::new(self, Some(variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        MapSerializer::new(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        StructSerializer::new(self, None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        let variant = self.open_variant(variant)?;
        StructSerializer::new(self, Some(variant))
    }
}

/// Encode a List. Also used for tuples, tuple structs, and tuple variants.
///
/// The item count is only known once [`end`](SerializeSeq::end) is called, so the items go into
/// a swapped-in buffer until then. For tuple variants, `variant` holds the buffer of the
/// enclosing one-entry Object, which gets closed right after the List.
pub struct ListSerializer<'a> {
    se: &'a mut Serializer,
    outer: Vec<u8>,
    count: usize,
    variant: Option<Vec<u8>>,
}

impl<'a> ListSerializer<'a> {
    fn new(se: &'a mut Serializer, variant: Option<Vec<u8>>) -> Result<Self> {
        let outer = se.open()?;
        Ok(Self {
            se,
            outer,
            count: 0,
            variant,
        })
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.count += 1;
        value.serialize(&mut *self.se)
    }

    fn finish(self) -> Result<()> {
        self.se.close(self.outer, self.count, Element::List)?;
        if let Some(variant) = self.variant {
            self.se.close(variant, 1, Element::Object)?;
        }
        Ok(())
    }
}

impl<'a> SerializeSeq for ListSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> SerializeTuple for ListSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> SerializeTupleStruct for ListSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> SerializeTupleVariant for ListSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyKind {
    Int,
    Str,
}

enum MapKey {
    Int(i32),
    Str(String),
}

/// Encode a map as either a Map or an Object, depending on the first key. All later keys must
/// be of the same kind.
pub struct MapSerializer<'a> {
    se: &'a mut Serializer,
    outer: Vec<u8>,
    count: usize,
    kind: Option<KeyKind>,
}

impl<'a> MapSerializer<'a> {
    fn new(se: &'a mut Serializer) -> Result<Self> {
        let outer = se.open()?;
        Ok(Self {
            se,
            outer,
            count: 0,
            kind: None,
        })
    }
}

impl<'a> SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = value.serialize(KeySerializer)?;
        let kind = match key {
            MapKey::Int(_) => KeyKind::Int,
            MapKey::Str(_) => KeyKind::Str,
        };
        match self.kind {
            None => self.kind = Some(kind),
            Some(prev) if prev != kind => {
                return Err(Error::UnsupportedShape(
                    "map mixes integer and string keys".to_string(),
                ))
            }
            Some(_) => (),
        }
        match key {
            MapKey::Int(k) => serialize_map_key(&mut self.se.buf, k),
            MapKey::Str(k) => serialize_object_key(&mut self.se.buf, &k)?,
        }
        self.count += 1;
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.se)
    }

    fn end(self) -> Result<()> {
        match self.kind {
            Some(KeyKind::Int) => self.se.close(self.outer, self.count, Element::Map),
            _ => self.se.close(self.outer, self.count, Element::Object),
        }
    }
}

/// Encode a struct as an Object, keyed by field name in declaration order. For struct variants,
/// `variant` holds the buffer of the enclosing one-entry Object.
pub struct StructSerializer<'a> {
    se: &'a mut Serializer,
    outer: Vec<u8>,
    count: usize,
    variant: Option<Vec<u8>>,
}

impl<'a> StructSerializer<'a> {
    fn new(se: &'a mut Serializer, variant: Option<Vec<u8>>) -> Result<Self> {
        let outer = se.open()?;
        Ok(Self {
            se,
            outer,
            count: 0,
            variant,
        })
    }

    fn serialize_field_inner<T: Serialize + ?Sized>(
        &mut self,
        field: &'static str,
        value: &T,
    ) -> Result<()> {
        serialize_object_key(&mut self.se.buf, field)?;
        value.serialize(&mut *self.se)?;
        self.count += 1;
        Ok(())
    }

    fn end_inner(self) -> Result<()> {
        self.se.close(self.outer, self.count, Element::Object)?;
        if let Some(variant) = self.variant {
            self.se.close(variant, 1, Element::Object)?;
        }
        Ok(())
    }
}

impl<'a> SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        field: &'static str,
        value: &T,
    ) -> Result<()> {
        self.serialize_field_inner(field, value)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

impl<'a> SerializeStructVariant for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        field: &'static str,
        value: &T,
    ) -> Result<()> {
        self.serialize_field_inner(field, value)
    }

    fn end(self) -> Result<()> {
        self.end_inner()
    }
}

/// Accepts the bytes produced by a self-encoding hook and copies them straight into the output.
struct RawSerializer<'a> {
    se: &'a mut Serializer,
}

impl<'a> RawSerializer<'a> {
    fn ser_fail(&self, received: &'static str) -> Error {
        Error::UnsupportedShape(format!(
            "expected self-encoded bytes, received {}",
            received
        ))
    }
}

impl<'a> ser::Serializer for RawSerializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.se.write_raw(v)
    }

    fn serialize_bool(self, _: bool) -> Result<()> {
        Err(self.ser_fail("bool"))
    }

    fn serialize_i8(self, _: i8) -> Result<()> {
        Err(self.ser_fail("i8"))
    }

    fn serialize_i16(self, _: i16) -> Result<()> {
        Err(self.ser_fail("i16"))
    }

    fn serialize_i32(self, _: i32) -> Result<()> {
        Err(self.ser_fail("i32"))
    }

    fn serialize_i64(self, _: i64) -> Result<()> {
        Err(self.ser_fail("i64"))
    }

    fn serialize_u8(self, _: u8) -> Result<()> {
        Err(self.ser_fail("u8"))
    }

    fn serialize_u16(self, _: u16) -> Result<()> {
        Err(self.ser_fail("u16"))
    }

    fn serialize_u32(self, _: u32) -> Result<()> {
        Err(self.ser_fail("u32"))
    }

    fn serialize_u64(self, _: u64) -> Result<()> {
        Err(self.ser_fail("u64"))
    }

    fn serialize_f32(self, _: f32) -> Result<()> {
        Err(self.ser_fail("f32"))
    }

    fn serialize_f64(self, _: f64) -> Result<()> {
        Err(self.ser_fail("f64"))
    }

    fn serialize_char(self, _: char) -> Result<()> {
        Err(self.ser_fail("char"))
    }

    fn serialize_str(self, _: &str) -> Result<()> {
        Err(self.ser_fail("str"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(self.ser_fail("none"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _: &T) -> Result<()> {
        Err(self.ser_fail("some"))
    }

    fn serialize_unit(self) -> Result<()> {
        Err(self.ser_fail("unit"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<()> {
        Err(self.ser_fail("unit_struct"))
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Result<()> {
        Err(self.ser_fail("unit_variant"))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: &T,
    ) -> Result<()> {
        Err(self.ser_fail("newtype_struct"))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<()> {
        Err(self.ser_fail("newtype_variant"))
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.ser_fail("seq"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        Err(self.ser_fail("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.ser_fail("tuple_struct"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.ser_fail("tuple_variant"))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.ser_fail("map"))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct> {
        Err(self.ser_fail("struct"))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.ser_fail("struct_variant"))
    }
}

/// Turns a map key into either a Map key (an `i32`) or an Object key (a string).
struct KeySerializer;

impl KeySerializer {
    fn ser_fail(&self, received: &'static str) -> Error {
        Error::UnsupportedShape(format!(
            "map keys must be strings or integers, received {}",
            received
        ))
    }

    fn int<T>(&self, v: T) -> Result<MapKey>
    where
        T: Copy + std::fmt::Display,
        i32: TryFrom<T>,
    {
        i32::try_from(v).map(MapKey::Int).map_err(|_| {
            Error::UnsupportedShape(format!("map key {} doesn't fit in 32 bits", v))
        })
    }
}

impl ser::Serializer for KeySerializer {
    type Ok = MapKey;
    type Error = Error;

    type SerializeSeq = Impossible<MapKey, Error>;
    type SerializeTuple = Impossible<MapKey, Error>;
    type SerializeTupleStruct = Impossible<MapKey, Error>;
    type SerializeTupleVariant = Impossible<MapKey, Error>;
    type SerializeMap = Impossible<MapKey, Error>;
    type SerializeStruct = Impossible<MapKey, Error>;
    type SerializeStructVariant = Impossible<MapKey, Error>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_i8(self, v: i8) -> Result<MapKey> {
        Ok(MapKey::Int(v as i32))
    }

    fn serialize_i16(self, v: i16) -> Result<MapKey> {
        Ok(MapKey::Int(v as i32))
    }

    fn serialize_i32(self, v: i32) -> Result<MapKey> {
        Ok(MapKey::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<MapKey> {
        self.int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<MapKey> {
        Ok(MapKey::Int(v as i32))
    }

    fn serialize_u16(self, v: u16) -> Result<MapKey> {
        Ok(MapKey::Int(v as i32))
    }

    fn serialize_u32(self, v: u32) -> Result<MapKey> {
        self.int(v)
    }

    fn serialize_u64(self, v: u64) -> Result<MapKey> {
        self.int(v)
    }

    fn serialize_char(self, v: char) -> Result<MapKey> {
        Ok(MapKey::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<MapKey> {
        Ok(MapKey::Str(v.to_string()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<MapKey> {
        Ok(MapKey::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        v: &T,
    ) -> Result<MapKey> {
        v.serialize(self)
    }

    fn serialize_bool(self, _: bool) -> Result<MapKey> {
        Err(self.ser_fail("bool"))
    }

    fn serialize_f32(self, _: f32) -> Result<MapKey> {
        Err(self.ser_fail("f32"))
    }

    fn serialize_f64(self, _: f64) -> Result<MapKey> {
        Err(self.ser_fail("f64"))
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<MapKey> {
        Err(self.ser_fail("bytes"))
    }

    fn serialize_none(self) -> Result<MapKey> {
        Err(self.ser_fail("none"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _: &T) -> Result<MapKey> {
        Err(self.ser_fail("some"))
    }

    fn serialize_unit(self) -> Result<MapKey> {
        Err(self.ser_fail("unit"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<MapKey> {
        Err(self.ser_fail("unit_struct"))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<MapKey> {
        Err(self.ser_fail("newtype_variant"))
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.ser_fail("seq"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        Err(self.ser_fail("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.ser_fail("tuple_struct"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.ser_fail("tuple_variant"))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.ser_fail("map"))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct> {
        Err(self.ser_fail("struct"))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.ser_fail("struct_variant"))
    }
}
