//! Deserialization.
//!
//! The tags in the data drive decoding. Typed requests (`deserialize_u16`, `deserialize_str`,
//! ...) check that the wire kind fits and convert numbers with range checks, while
//! `deserialize_any` hands the visitor whatever the wire holds, at its wire width.

use std::convert::TryFrom;

use serde::de::{
    self,
    value::{BorrowedStrDeserializer, I32Deserializer},
    DeserializeSeed, IntoDeserializer, Visitor,
};

use crate::depth_tracking::DepthTracker;
use crate::element::*;
use crate::error::{Error, Result};
use crate::hooks::RAW_TOKEN;
use crate::integer::Integer;
use crate::marker::Marker;
use crate::options::DecodeOptions;
use crate::registry::Registry;

/// Decodes values out of a byte slice.
pub struct Deserializer<'de> {
    parser: Parser<'de>,
    depth_tracking: DepthTracker,
    deny_unknown_fields: bool,
}

impl<'de> Deserializer<'de> {
    pub fn from_slice(data: &'de [u8]) -> Self {
        Self::with_options(data, &DecodeOptions::default())
    }

    pub fn with_options(data: &'de [u8], options: &DecodeOptions) -> Self {
        Self::with_registry(data, Registry::global(), options)
    }

    /// Decode using a specific decoder registry instead of the process-wide one.
    pub fn with_registry(
        data: &'de [u8],
        registry: &'de Registry,
        options: &DecodeOptions,
    ) -> Self {
        Self {
            parser: Parser::with_registry(data, registry),
            depth_tracking: DepthTracker::new(options.max_depth),
            deny_unknown_fields: options.deny_unknown_fields,
        }
    }

    /// Verify that every byte has been consumed.
    pub fn end(&self) -> Result<()> {
        if self.parser.is_empty() {
            Ok(())
        } else {
            Err(Error::TrailingBytes(self.parser.remaining().len()))
        }
    }

    fn next_elem(&mut self) -> Result<Element<'de>> {
        self.parser.next_elem()
    }

    fn next_int<T: TryFrom<Integer>>(&mut self, target: &'static str) -> Result<T> {
        let elem = self.next_elem()?;
        let int = elem
            .integer()
            .ok_or_else(|| Error::kind_mismatch(target, elem.name()))?;
        T::try_from(int).map_err(|_| Error::out_of_range(int, target))
    }

    fn visit_elem<V: Visitor<'de>>(&mut self, elem: Element<'de>, visitor: V) -> Result<V::Value> {
        match elem {
            Element::Null => visitor.visit_unit(),
            Element::Bool(v) => visitor.visit_bool(v),
            Element::U8(v) => visitor.visit_u8(v),
            Element::I8(v) => visitor.visit_i8(v),
            Element::U16(v) => visitor.visit_u16(v),
            Element::I16(v) => visitor.visit_i16(v),
            Element::U32(v) => visitor.visit_u32(v),
            Element::I32(v) => visitor.visit_i32(v),
            Element::U64(v) => visitor.visit_u64(v),
            Element::I64(v) => visitor.visit_i64(v),
            Element::F32(v) => visitor.visit_f32(v),
            Element::F64(v) => visitor.visit_f64(v),
            Element::Str(v) => visitor.visit_borrowed_str(v),
            Element::Bin(v) => visitor.visit_borrowed_bytes(v),
            Element::List(c) => self.visit_list(c, visitor),
            Element::Map(c) => self.visit_map(c, visitor),
            Element::Object(c) => self.visit_object(c, None, visitor),
        }
    }

    fn visit_list<V: Visitor<'de>>(&mut self, c: Container, visitor: V) -> Result<V::Value> {
        self.depth_tracking.enter()?;
        let items = Items::new("List", c, self.parser.position());
        let mut access = SeqAccess { de: self, items };
        let value = visitor.visit_seq(&mut access)?;
        access.items.finish(access.de.parser.position())?;
        self.depth_tracking.exit();
        Ok(value)
    }

    fn visit_map<V: Visitor<'de>>(&mut self, c: Container, visitor: V) -> Result<V::Value> {
        self.depth_tracking.enter()?;
        let items = Items::new("Map", c, self.parser.position());
        let mut access = MapAccess { de: self, items };
        let value = visitor.visit_map(&mut access)?;
        access.items.finish(access.de.parser.position())?;
        self.depth_tracking.exit();
        Ok(value)
    }

    fn visit_object<V: Visitor<'de>>(
        &mut self,
        c: Container,
        fields: Option<&'static [&'static str]>,
        visitor: V,
    ) -> Result<V::Value> {
        self.depth_tracking.enter()?;
        let items = Items::new("Object", c, self.parser.position());
        let mut access = ObjectAccess {
            de: self,
            items,
            fields,
        };
        let value = visitor.visit_map(&mut access)?;
        access.items.finish(access.de.parser.position())?;
        self.depth_tracking.exit();
        Ok(value)
    }
}

macro_rules! deserialize_int {
    ($method:ident, $visit:ident, $t:ty) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
            let v: $t = self.next_int(stringify!($t))?;
            visitor.$visit(v)
        }
    };
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let elem = self.next_elem()?;
        self.visit_elem(elem, visitor)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Bool(v) => visitor.visit_bool(v),
            elem => Err(Error::kind_mismatch("bool", elem.name())),
        }
    }

    deserialize_int!(deserialize_i8, visit_i8, i8);
    deserialize_int!(deserialize_i16, visit_i16, i16);
    deserialize_int!(deserialize_i32, visit_i32, i32);
    deserialize_int!(deserialize_i64, visit_i64, i64);
    deserialize_int!(deserialize_u8, visit_u8, u8);
    deserialize_int!(deserialize_u16, visit_u16, u16);
    deserialize_int!(deserialize_u32, visit_u32, u32);
    deserialize_int!(deserialize_u64, visit_u64, u64);

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = match self.next_elem()? {
            Element::F32(v) => v,
            Element::F64(v) => {
                let n = v as f32;
                if n as f64 != v && !v.is_nan() {
                    return Err(Error::out_of_range(v, "f32"));
                }
                n
            }
            elem => match elem.integer() {
                Some(int) => int.as_f64() as f32,
                None => return Err(Error::kind_mismatch("f32", elem.name())),
            },
        };
        visitor.visit_f32(v)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = match self.next_elem()? {
            Element::F32(v) => v as f64,
            Element::F64(v) => v,
            elem => match elem.integer() {
                Some(int) => int.as_f64(),
                None => return Err(Error::kind_mismatch("f64", elem.name())),
            },
        };
        visitor.visit_f64(v)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Str(v) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(Error::out_of_range(format!("{:?}", v), "char")),
                }
            }
            elem => Err(Error::kind_mismatch("char", elem.name())),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Str(v) => visitor.visit_borrowed_str(v),
            elem => Err(Error::kind_mismatch("String", elem.name())),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Bin(v) => visitor.visit_borrowed_bytes(v),
            elem => Err(Error::kind_mismatch("Blob", elem.name())),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let marker = self
            .parser
            .peek_marker()?
            .ok_or_else(|| Error::too_short("decode optional value", 0, 1))?;
        if marker == Marker::Null {
            self.next_elem()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Null => visitor.visit_unit(),
            elem => Err(Error::kind_mismatch("Null", elem.name())),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == RAW_TOKEN {
            let raw = self.parser.next_raw()?;
            visitor.visit_borrowed_bytes(raw)
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.next_elem()? {
            Element::List(c) => self.visit_list(c, visitor),
            elem => Err(Error::kind_mismatch("List", elem.name())),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Map(c) => self.visit_map(c, visitor),
            Element::Object(c) => self.visit_object(c, None, visitor),
            elem => Err(Error::kind_mismatch("Map", elem.name())),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Object(c) => self.visit_object(c, Some(fields), visitor),
            Element::List(c) => self.visit_list(c, visitor),
            elem => Err(Error::kind_mismatch("Object", elem.name())),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.next_elem()? {
            Element::Str(v) => visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(v)),
            Element::Object(c) if c.count == 1 => {
                self.depth_tracking.enter()?;
                let mut items = Items::new("Object", c, self.parser.position());
                items.next_item(self.parser.position())?;
                let value = visitor.visit_enum(EnumAccess { de: &mut *self })?;
                items.finish(self.parser.position())?;
                self.depth_tracking.exit();
                Ok(value)
            }
            elem => Err(Error::kind_mismatch(
                "variant name or one-entry Object",
                elem.name(),
            )),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_any(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.parser.skip_value()?;
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        i128 u128
    }
}

/// Item bookkeeping for one container: how many items are left, and where its data must end.
struct Items {
    kind: &'static str,
    count: usize,
    left: usize,
    end: usize,
}

impl Items {
    fn new(kind: &'static str, c: Container, start: usize) -> Self {
        Self {
            kind,
            count: c.count,
            left: c.count,
            end: start + c.len,
        }
    }

    /// Claim the next item. Returns false once the count has been reached.
    fn next_item(&mut self, pos: usize) -> Result<bool> {
        if self.left == 0 {
            return Ok(false);
        }
        if pos >= self.end {
            return Err(Error::BadEncode(format!(
                "{} ran out of data after {} of {} items",
                self.kind,
                self.count - self.left,
                self.count
            )));
        }
        self.left -= 1;
        Ok(true)
    }

    /// Check that an item didn't run past the container.
    fn check(&self, pos: usize) -> Result<()> {
        if pos > self.end {
            return Err(Error::BadEncode(format!(
                "{} items ran {} bytes past its declared size",
                self.kind,
                pos - self.end
            )));
        }
        Ok(())
    }

    fn finish(&self, pos: usize) -> Result<()> {
        if self.left > 0 {
            return Err(de::Error::invalid_length(
                self.count,
                &format!("{} items", self.count - self.left).as_str(),
            ));
        }
        if pos != self.end {
            return Err(Error::BadEncode(format!(
                "{} has {} bytes left over after its {} items",
                self.kind,
                self.end.saturating_sub(pos),
                self.count
            )));
        }
        Ok(())
    }
}

struct SeqAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    items: Items,
}

impl<'a, 'de> de::SeqAccess<'de> for SeqAccess<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if !self.items.next_item(self.de.parser.position())? {
            return Ok(None);
        }
        let val = seed.deserialize(&mut *self.de)?;
        self.items.check(self.de.parser.position())?;
        Ok(Some(val))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.left)
    }
}

/// Access to a Map, whose keys are 32-bit integers.
struct MapAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    items: Items,
}

impl<'a, 'de> de::MapAccess<'de> for MapAccess<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if !self.items.next_item(self.de.parser.position())? {
            return Ok(None);
        }
        let key: I32Deserializer<Error> = self.de.parser.read_map_key()?.into_deserializer();
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let val = seed.deserialize(&mut *self.de)?;
        self.items.check(self.de.parser.position())?;
        Ok(val)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.left)
    }
}

/// Access to an Object, whose keys are names. When decoding into a struct, `fields` holds the
/// struct's field names.
struct ObjectAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
    items: Items,
    fields: Option<&'static [&'static str]>,
}

impl<'a, 'de> de::MapAccess<'de> for ObjectAccess<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if !self.items.next_item(self.de.parser.position())? {
            return Ok(None);
        }
        let key = self.de.parser.read_object_key()?;
        if let Some(fields) = self.fields {
            if self.de.deny_unknown_fields && !fields.contains(&key) {
                return Err(Error::FieldNotFound(key.to_string()));
            }
        }
        seed.deserialize(BorrowedStrDeserializer::<Error>::new(key))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let val = seed.deserialize(&mut *self.de)?;
        self.items.check(self.de.parser.position())?;
        Ok(val)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.left)
    }
}

/// Access to a one-entry Object holding an enum variant.
struct EnumAccess<'a, 'de> {
    de: &'a mut Deserializer<'de>,
}

impl<'a, 'de> de::EnumAccess<'de> for EnumAccess<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let key = self.de.parser.read_object_key()?;
        let val = seed.deserialize(BorrowedStrDeserializer::<Error>::new(key))?;
        Ok((val, self))
    }
}

impl<'a, 'de> de::VariantAccess<'de> for EnumAccess<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        de::Deserialize::deserialize(self.de)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(self.de, len, visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(self.de, "", fields, visitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn dec<'de, T: Deserialize<'de>>(data: &'de [u8]) -> Result<T> {
        let mut de = Deserializer::from_slice(data);
        let v = T::deserialize(&mut de)?;
        de.end()?;
        Ok(v)
    }

    mod scalar {
        use super::*;

        #[test]
        fn widening() {
            assert_eq!(dec::<i64>(&[0x20, 0x7b]).unwrap(), 123);
            assert_eq!(dec::<i32>(&[0x41, 0xcf, 0xc7]).unwrap(), -12345);
            assert_eq!(dec::<u64>(&[0x40, 0x03, 0x15]).unwrap(), 789);
            assert_eq!(dec::<f64>(&[0x20, 0x02]).unwrap(), 2.0);
            assert_eq!(dec::<f64>(&[0x62, 0x3f, 0x80, 0x00, 0x00]).unwrap(), 1.0);
        }

        #[test]
        fn out_of_range() {
            assert!(matches!(
                dec::<u8>(&[0x40, 0x01, 0x00]),
                Err(Error::OutOfRange { target: "u8", .. })
            ));
            assert!(matches!(
                dec::<u32>(&[0x21, 0xff]),
                Err(Error::OutOfRange { target: "u32", .. })
            ));
            // 0.1 can't survive a trip through f32
            let data = [0x82, 0x3f, 0xb9, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a];
            assert!(matches!(dec::<f32>(&data), Err(Error::OutOfRange { .. })));
            let data = [0x82, 0x3f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
            assert_eq!(dec::<f32>(&data).unwrap(), 1.5);
        }

        #[test]
        fn kind_mismatch() {
            assert!(matches!(
                dec::<i32>(&[0x01]),
                Err(Error::KindMismatch {
                    expected: "i32",
                    found: "Bool"
                })
            ));
            assert!(matches!(
                dec::<bool>(&[0x20, 0x01]),
                Err(Error::KindMismatch { found: "UInt8", .. })
            ));
            assert!(matches!(
                dec::<String>(&[0xc0, 0x00]),
                Err(Error::KindMismatch { found: "Blob", .. })
            ));
            assert!(matches!(
                dec::<Vec<u8>>(&[0x00]),
                Err(Error::KindMismatch { found: "Null", .. })
            ));
        }

        #[test]
        fn option() {
            assert_eq!(dec::<Option<u8>>(&[0x00]).unwrap(), None);
            assert_eq!(dec::<Option<u8>>(&[0x20, 0x03]).unwrap(), Some(3));
            assert!(dec::<Option<u8>>(&[]).is_err());
        }

        #[test]
        fn chars() {
            assert_eq!(dec::<char>(&[0xa0, 0x01, b'x', 0x00]).unwrap(), 'x');
            assert!(matches!(
                dec::<char>(&[0xa0, 0x02, b'x', b'y', 0x00]),
                Err(Error::OutOfRange { .. })
            ));
        }

        #[test]
        fn borrowed() {
            let data = [0xa0, 0x02, b'h', b'i', 0x00];
            let s: &str = dec(&data).unwrap();
            assert_eq!(s, "hi");
            let data = [0xc0, 0x02, 0x01, 0x02];
            let b: &[u8] = dec(&data).unwrap();
            assert_eq!(b, &[1, 2]);
        }

        #[test]
        fn trailing_bytes() {
            assert!(matches!(
                dec::<u8>(&[0x20, 0x01, 0x00]),
                Err(Error::TrailingBytes(1))
            ));
        }

        #[test]
        fn unknown_tag() {
            assert!(matches!(dec::<u8>(&[0xff]), Err(Error::UnknownType(0xff))));
        }
    }

    mod containers {
        use super::*;

        #[test]
        fn list() {
            let data = [0xe0, 0x0b, 0x03, 0x20, 0x7b, 0x41, 0xfe, 0x38, 0x40, 0x03, 0x15];
            assert_eq!(dec::<Vec<i32>>(&data).unwrap(), vec![123, -456, 789]);
        }

        #[test]
        fn map() {
            let data = [0xe1, 0x09, 0x01, 0x00, 0x00, 0x00, 0x09, 0x20, 0x09];
            let map: BTreeMap<i32, u8> = dec(&data).unwrap();
            assert_eq!(map.get(&9), Some(&9));
        }

        #[test]
        fn count_exceeds_data() {
            // Claims 2 items, but only holds one
            let data = [0xe0, 0x05, 0x02, 0x20, 0x01];
            assert!(matches!(dec::<Vec<u8>>(&data), Err(Error::BadEncode(_))));
        }

        #[test]
        fn data_exceeds_count() {
            // Claims 1 item, but holds two
            let data = [0xe0, 0x07, 0x01, 0x20, 0x01, 0x20, 0x02];
            assert!(matches!(dec::<Vec<u8>>(&data), Err(Error::BadEncode(_))));
        }

        #[test]
        fn item_overruns_size() {
            // Declared size covers one byte of the two-byte item
            let data = [0xe0, 0x04, 0x01, 0x20, 0x01];
            assert!(dec::<Vec<u8>>(&data).is_err());
        }

        #[test]
        fn tuple_too_short_for_list() {
            let data = [0xe0, 0x09, 0x03, 0x20, 0x01, 0x20, 0x02, 0x20, 0x03];
            assert!(dec::<(u8, u8)>(&data).is_err());
        }

        #[test]
        fn depth_limit() {
            let data = [0xe0, 0x06, 0x01, 0xe0, 0x03, 0x00];
            let options = DecodeOptions::default().max_depth(1);
            let mut de = Deserializer::with_options(&data, &options);
            assert!(matches!(
                Vec::<Vec<u8>>::deserialize(&mut de),
                Err(Error::DepthLimit(1))
            ));
            let options = DecodeOptions::default().max_depth(2);
            let mut de = Deserializer::with_options(&data, &options);
            assert_eq!(
                Vec::<Vec<u8>>::deserialize(&mut de).unwrap(),
                vec![Vec::<u8>::new()]
            );
        }

        #[test]
        fn ignored_any_skips() {
            let data = [0xe0, 0x0a, 0x02, 0xe0, 0x05, 0x01, 0x20, 0x01, 0x20, 0x07];
            let (_, second): (serde::de::IgnoredAny, u8) = dec(&data).unwrap();
            assert_eq!(second, 7);
        }
    }

    mod structs {
        use super::*;

        #[derive(Deserialize, Debug, PartialEq)]
        struct Point {
            x: u8,
            y: u8,
        }

        fn point_data(extra: bool) -> Vec<u8> {
            let mut items = vec![0x01, b'x', 0x20, 0x01, 0x01, b'y', 0x20, 0x02];
            let mut count = 2;
            if extra {
                items.extend_from_slice(&[0x01, b'z', 0xa0, 0x01, b'q', 0x00]);
                count += 1;
            }
            let mut data = vec![0xe2, (items.len() + 3) as u8, count];
            data.extend_from_slice(&items);
            data
        }

        #[test]
        fn object_into_struct() {
            let data = point_data(false);
            assert_eq!(dec::<Point>(&data).unwrap(), Point { x: 1, y: 2 });
        }

        #[test]
        fn unknown_field_rejected() {
            let data = point_data(true);
            match dec::<Point>(&data) {
                Err(Error::FieldNotFound(name)) => assert_eq!(name, "z"),
                other => panic!("expected FieldNotFound, got {:?}", other),
            }
        }

        #[test]
        fn unknown_field_skipped() {
            let data = point_data(true);
            let options = DecodeOptions::default().deny_unknown_fields(false);
            let mut de = Deserializer::with_options(&data, &options);
            assert_eq!(Point::deserialize(&mut de).unwrap(), Point { x: 1, y: 2 });
            de.end().unwrap();
        }

        #[test]
        fn struct_from_scalar() {
            assert!(matches!(
                dec::<Point>(&[0x20, 0x01]),
                Err(Error::KindMismatch {
                    expected: "Object",
                    ..
                })
            ));
        }
    }

    mod enums {
        use super::*;

        #[derive(Deserialize, Debug, PartialEq)]
        enum Shape {
            Empty,
            Circle(u8),
            Point(u8, u8),
            Rect { w: u8 },
        }

        #[test]
        fn all_variants() {
            let data = [0xa0, 0x05, b'E', b'm', b'p', b't', b'y', 0x00];
            assert_eq!(dec::<Shape>(&data).unwrap(), Shape::Empty);
            let data = [
                0xe2, 0x0c, 0x01, 0x06, b'C', b'i', b'r', b'c', b'l', b'e', 0x20, 0x03,
            ];
            assert_eq!(dec::<Shape>(&data).unwrap(), Shape::Circle(3));
            let data = [
                0xe2, 0x10, 0x01, 0x05, b'P', b'o', b'i', b'n', b't', 0xe0, 0x07, 0x02, 0x20,
                0x01, 0x20, 0x02,
            ];
            assert_eq!(dec::<Shape>(&data).unwrap(), Shape::Point(1, 2));
            let data = [
                0xe2, 0x0f, 0x01, 0x04, b'R', b'e', b'c', b't', 0xe2, 0x07, 0x01, 0x01, b'w',
                0x20, 0x04,
            ];
            assert_eq!(dec::<Shape>(&data).unwrap(), Shape::Rect { w: 4 });
        }

        #[test]
        fn bad_variant_shape() {
            assert!(matches!(
                dec::<Shape>(&[0x20, 0x01]),
                Err(Error::KindMismatch { .. })
            ));
        }
    }

    #[test]
    fn local_registry() {
        let registry = Registry::new();
        let data = [0xe0, 0x05, 0x01, 0x20, 0x05];
        let mut de = Deserializer::with_registry(&data, &registry, &DecodeOptions::default());
        assert_eq!(Vec::<u8>::deserialize(&mut de).unwrap(), vec![5]);
        assert_eq!(registry.built(), 2);
    }
}
