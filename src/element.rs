use std::convert::TryFrom;

use byteorder::{BigEndian, ReadBytesExt};

use crate::{
    error::{Error, Result},
    integer::{get_int_internal, IntPriv, Integer},
    marker::{Marker, StorageClass},
    registry::Registry,
    size,
};

/// Header of a List, Map, or Object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Container {
    /// Number of items.
    pub count: usize,
    /// Bytes of item data following the count field.
    pub len: usize,
}

/// A single wire item. Containers appear as their header only; their items follow as further
/// elements.
#[derive(Clone, Debug, PartialEq)]
pub enum Element<'a> {
    Null,
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(&'a str),
    Bin(&'a [u8]),
    List(Container),
    Map(Container),
    Object(Container),
}

impl<'a> Element<'a> {
    /// The element for an integer, using the narrowest tag that holds it.
    pub fn int(v: impl Into<Integer>) -> Element<'static> {
        let v = v.into();
        match (get_int_internal(&v), v.marker()) {
            (IntPriv::PosInt(n), Marker::UInt8) => Element::U8(n as u8),
            (IntPriv::PosInt(n), Marker::UInt16) => Element::U16(n as u16),
            (IntPriv::PosInt(n), Marker::UInt32) => Element::U32(n as u32),
            (IntPriv::PosInt(n), _) => Element::U64(n),
            (IntPriv::NegInt(n), Marker::Int8) => Element::I8(n as i8),
            (IntPriv::NegInt(n), Marker::Int16) => Element::I16(n as i16),
            (IntPriv::NegInt(n), Marker::Int32) => Element::I32(n as i32),
            (IntPriv::NegInt(n), _) => Element::I64(n),
        }
    }

    pub fn marker(&self) -> Marker {
        use self::Element::*;
        match self {
            Null => Marker::Null,
            Bool(true) => Marker::True,
            Bool(false) => Marker::False,
            U8(_) => Marker::UInt8,
            I8(_) => Marker::Int8,
            U16(_) => Marker::UInt16,
            I16(_) => Marker::Int16,
            U32(_) => Marker::UInt32,
            I32(_) => Marker::Int32,
            U64(_) => Marker::UInt64,
            I64(_) => Marker::Int64,
            F32(_) => Marker::Float32,
            F64(_) => Marker::Float64,
            Str(_) => Marker::Str(crate::marker::TextKind::Plain),
            Bin(_) => Marker::Blob,
            List(_) => Marker::List,
            Map(_) => Marker::Map,
            Object(_) => Marker::Object,
        }
    }

    pub fn name(&self) -> &'static str {
        self.marker().name()
    }

    /// The value of an integer element, regardless of its wire width.
    pub fn integer(&self) -> Option<Integer> {
        use self::Element::*;
        Some(match *self {
            U8(v) => v.into(),
            I8(v) => v.into(),
            U16(v) => v.into(),
            I16(v) => v.into(),
            U32(v) => v.into(),
            I32(v) => v.into(),
            U64(v) => v.into(),
            I64(v) => v.into(),
            _ => return None,
        })
    }
}

/// Serialize an element onto a byte vector. For containers, only the header is written, and the
/// caller is responsible for following it with exactly `len` bytes of items.
pub fn serialize_elem(buf: &mut Vec<u8>, elem: Element) -> Result<()> {
    use self::Element::*;
    buf.push(elem.marker().into());
    match elem {
        Null | Bool(_) => (),
        U8(v) => buf.push(v),
        I8(v) => buf.push(v as u8),
        U16(v) => buf.extend_from_slice(&v.to_be_bytes()),
        I16(v) => buf.extend_from_slice(&v.to_be_bytes()),
        U32(v) => buf.extend_from_slice(&v.to_be_bytes()),
        I32(v) => buf.extend_from_slice(&v.to_be_bytes()),
        U64(v) => buf.extend_from_slice(&v.to_be_bytes()),
        I64(v) => buf.extend_from_slice(&v.to_be_bytes()),
        F32(v) => buf.extend_from_slice(&v.to_bits().to_be_bytes()),
        F64(v) => buf.extend_from_slice(&v.to_bits().to_be_bytes()),
        Str(v) => {
            size::write_size(buf, v.len())?;
            buf.extend_from_slice(v.as_bytes());
            buf.push(0);
        }
        Bin(v) => {
            size::write_size(buf, v.len())?;
            buf.extend_from_slice(v);
        }
        List(c) | Map(c) | Object(c) => {
            let total = size::container_size(size::size_len(c.count) + c.len)?;
            size::write_size(buf, total)?;
            size::write_size(buf, c.count)?;
        }
    }
    Ok(())
}

/// Write a Map item key.
pub fn serialize_map_key(buf: &mut Vec<u8>, key: i32) {
    buf.extend_from_slice(&key.to_be_bytes());
}

/// Write an Object item key. Names longer than 255 bytes can't be represented.
pub fn serialize_object_key(buf: &mut Vec<u8>, key: &str) -> Result<()> {
    let len = u8::try_from(key.len()).map_err(|_| {
        Error::UnsupportedShape(format!(
            "Object key is {} bytes long, the limit is 255",
            key.len()
        ))
    })?;
    buf.push(len);
    buf.extend_from_slice(key.as_bytes());
    Ok(())
}

/// Total length of the value at the start of `data`, found by reading only its tag and size
/// fields. Nothing inside the value is checked.
pub fn value_len(data: &[u8]) -> Result<usize> {
    let (&tag, mut rest) = data
        .split_first()
        .ok_or_else(|| Error::too_short("decode type tag", 0, 1))?;
    let marker = Marker::from_u8(tag).ok_or(Error::UnknownType(tag))?;
    let len = match marker.storage_class() {
        StorageClass::String => {
            let (n, used) = size::read_size(&mut rest)?;
            1 + used + n + 1
        }
        StorageClass::Blob => {
            let (n, used) = size::read_size(&mut rest)?;
            1 + used + n
        }
        StorageClass::Container => {
            let (total, _) = size::read_size(&mut rest)?;
            if total < 3 {
                return Err(Error::BadEncode(format!(
                    "{} declares a total size of {}, too small for its header",
                    marker.name(),
                    total
                )));
            }
            total
        }
        class => 1 + class.fixed_len().unwrap_or(0),
    };
    if len > data.len() {
        return Err(Error::too_short("slice value", data.len(), len));
    }
    Ok(len)
}

/// Reads elements out of a borrowed byte slice, using a [`Registry`] to find the decode function
/// for each tag.
#[derive(Clone, Debug)]
pub struct Parser<'a> {
    data: &'a [u8],
    total: usize,
    registry: &'a Registry,
}

impl<'a> Parser<'a> {
    pub fn new(data: &'a [u8]) -> Parser<'a> {
        Self::with_registry(data, Registry::global())
    }

    pub fn with_registry(data: &'a [u8], registry: &'a Registry) -> Parser<'a> {
        Self {
            data,
            total: data.len(),
            registry,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.total - self.data.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Look at the next tag without consuming it.
    pub fn peek_marker(&self) -> Result<Option<Marker>> {
        match self.data.first() {
            None => Ok(None),
            Some(&tag) => Marker::from_u8(tag)
                .map(Some)
                .ok_or(Error::UnknownType(tag)),
        }
    }

    /// Parse the next element.
    pub fn next_elem(&mut self) -> Result<Element<'a>> {
        let (&tag, rest) = self
            .data
            .split_first()
            .ok_or_else(|| Error::too_short("decode type tag", 0, 1))?;
        let decode = self.registry.decoder(tag)?;
        self.data = rest;
        decode(self)
    }

    /// Take the entire next value, tag included, without decoding it.
    pub fn next_raw(&mut self) -> Result<&'a [u8]> {
        let len = value_len(self.data)?;
        self.take("slice value", len)
    }

    pub fn skip_value(&mut self) -> Result<()> {
        self.next_raw().map(|_| ())
    }

    pub fn read_map_key(&mut self) -> Result<i32> {
        self.read_with("decode Map key", 4, |d| d.read_i32::<BigEndian>())
    }

    pub fn read_object_key(&mut self) -> Result<&'a str> {
        let len = self.read_with("decode Object key length", 1, |d| d.read_u8())?;
        let bytes = self.take("decode Object key", len as usize)?;
        std::str::from_utf8(bytes)
            .map_err(|e| Error::BadEncode(format!("Object key isn't valid UTF-8: {}", e)))
    }

    pub(crate) fn take(&mut self, step: &'static str, len: usize) -> Result<&'a [u8]> {
        if self.data.len() < len {
            return Err(Error::too_short(step, self.data.len(), len));
        }
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    pub(crate) fn read_with<T>(
        &mut self,
        step: &'static str,
        len: usize,
        read: impl FnOnce(&mut &'a [u8]) -> std::io::Result<T>,
    ) -> Result<T> {
        let actual = self.data.len();
        read(&mut self.data).map_err(|_| Error::too_short(step, actual, len))
    }

    pub(crate) fn read_size(&mut self) -> Result<usize> {
        size::read_size(&mut self.data).map(|(v, _)| v)
    }

    pub(crate) fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read_size()?;
        let bytes = self.take("decode String", len)?;
        let term = self.read_with("decode String terminator", 1, |d| d.read_u8())?;
        if term != 0 {
            return Err(Error::BadEncode(format!(
                "String should end with a 0x00 terminator, found 0x{:02x}",
                term
            )));
        }
        std::str::from_utf8(bytes)
            .map_err(|e| Error::BadEncode(format!("String isn't valid UTF-8: {}", e)))
    }

    pub(crate) fn read_bin(&mut self) -> Result<&'a [u8]> {
        let len = self.read_size()?;
        self.take("decode Blob", len)
    }

    /// Read a container header, with the tag already consumed.
    pub(crate) fn read_container(&mut self, step: &'static str) -> Result<Container> {
        let (total, size_used) = size::read_size(&mut self.data)?;
        let (count, count_used) = size::read_size(&mut self.data)?;
        let header = 1 + size_used + count_used;
        if total < header {
            return Err(Error::BadEncode(format!(
                "{}: total size {} is smaller than the {}-byte header",
                step, total, header
            )));
        }
        let len = total - header;
        if len > self.data.len() {
            return Err(Error::too_short(step, self.data.len(), len));
        }
        if count > len {
            return Err(Error::BadEncode(format!(
                "{}: {} items can't fit in {} bytes",
                step, count, len
            )));
        }
        Ok(Container { count, len })
    }
}

impl<'a> std::iter::Iterator for Parser<'a> {
    type Item = Result<Element<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let result = self.next_elem();
        if result.is_err() {
            self.data = &[];
        }
        Some(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode(elem: Element) -> Vec<u8> {
        let mut enc = Vec::new();
        serialize_elem(&mut enc, elem).unwrap();
        enc
    }

    fn roundtrip(elem: Element) {
        let enc = encode(elem.clone());
        let mut parser = Parser::new(&enc);
        let val = parser.next().unwrap().unwrap();
        assert!(parser.next().is_none());
        assert_eq!(val, elem);
    }

    #[test]
    fn unknown_tag() {
        for tag in [0x03u8, 0x22, 0xa8, 0xe3, 0xff] {
            let data = [tag, 0x00];
            let mut parser = Parser::new(&data);
            match parser.next().unwrap() {
                Err(Error::UnknownType(t)) => assert_eq!(t, tag),
                other => panic!("0x{:02x} should be an unknown tag, got {:?}", tag, other),
            }
            assert!(parser.next().is_none());
        }
    }

    mod null {
        use super::*;

        #[test]
        fn roundtrip() {
            super::roundtrip(Element::Null);
        }

        #[test]
        fn wire_bytes() {
            assert_eq!(encode(Element::Null), &[0x00]);
        }
    }

    mod bool {
        use super::*;

        #[test]
        fn roundtrip() {
            super::roundtrip(Element::Bool(true));
            super::roundtrip(Element::Bool(false));
        }

        #[test]
        fn wire_bytes() {
            assert_eq!(encode(Element::Bool(true)), &[0x01]);
            assert_eq!(encode(Element::Bool(false)), &[0x02]);
        }
    }

    mod integer {
        use super::*;

        #[test]
        fn roundtrip_edges() {
            let cases = vec![
                Element::U8(0),
                Element::U8(u8::MAX),
                Element::I8(i8::MIN),
                Element::U16(u16::MAX),
                Element::I16(i16::MIN),
                Element::U32(u32::MAX),
                Element::I32(i32::MIN),
                Element::U64(u64::MAX),
                Element::I64(i64::MIN),
            ];
            for case in cases {
                super::roundtrip(case);
            }
        }

        #[test]
        fn wire_bytes() {
            assert_eq!(encode(Element::int(123)), &[0x20, 0x7b]);
            assert_eq!(encode(Element::int(-12345)), &[0x41, 0xcf, 0xc7]);
            assert_eq!(encode(Element::int(-456)), &[0x41, 0xfe, 0x38]);
            assert_eq!(encode(Element::int(789)), &[0x40, 0x03, 0x15]);
            assert_eq!(
                encode(Element::int(9223372036854775806i64)),
                &[0x80, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]
            );
            assert_eq!(encode(Element::int(-20)), &[0x21, 0xec]);
        }

        #[test]
        fn narrowing() {
            assert_eq!(Element::int(200u64), Element::U8(200));
            assert_eq!(Element::int(-1i64), Element::I8(-1));
            assert_eq!(Element::int(70000i32), Element::U32(70000));
            assert_eq!(Element::int(-70000i64), Element::I32(-70000));
            assert_eq!(Element::int(1u64 << 40), Element::U64(1 << 40));
        }

        #[test]
        fn not_enough_bytes() {
            let cases: Vec<&[u8]> = vec![
                &[0x20],
                &[0x41, 0x01],
                &[0x60, 0x01, 0x02, 0x03],
                &[0x81, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07],
            ];
            for (index, case) in cases.iter().enumerate() {
                let mut parser = Parser::new(case);
                let result = parser.next().unwrap();
                assert!(
                    matches!(result, Err(Error::LengthTooShort { .. })),
                    "Failed test #{}: {:?}",
                    index,
                    result
                );
            }
        }
    }

    mod float {
        use super::*;

        #[test]
        fn roundtrip() {
            super::roundtrip(Element::F32(1.5));
            super::roundtrip(Element::F32(f32::MIN_POSITIVE));
            super::roundtrip(Element::F64(-2.25e300));
            super::roundtrip(Element::F64(f64::INFINITY));
        }

        #[test]
        fn wire_bytes() {
            assert_eq!(encode(Element::F32(1.0)), &[0x62, 0x3f, 0x80, 0x00, 0x00]);
            assert_eq!(
                encode(Element::F64(1.0)),
                &[0x82, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
            );
        }
    }

    mod str {
        use super::*;

        #[test]
        fn wire_bytes() {
            assert_eq!(
                encode(Element::Str("hello")),
                &[0xa0, 0x05, b'h', b'e', b'l', b'l', b'o', 0x00]
            );
            assert_eq!(encode(Element::Str("")), &[0xa0, 0x00, 0x00]);
        }

        #[test]
        fn roundtrip_long() {
            let long = "x".repeat(300);
            let enc = encode(Element::Str(&long));
            assert_eq!(&enc[..5], &[0xa0, 0x80, 0x00, 0x01, 0x2c]);
            assert_eq!(enc.len(), 1 + 4 + 300 + 1);
            super::roundtrip(Element::Str(&long));
        }

        #[test]
        fn text_subtypes() {
            for tag in 0xa1..=0xa7u8 {
                let data = [tag, 0x02, b'o', b'k', 0x00];
                let mut parser = Parser::new(&data);
                assert_eq!(parser.next().unwrap().unwrap(), Element::Str("ok"));
            }
        }

        #[test]
        fn bad_terminator() {
            let data = [0xa0, 0x02, b'o', b'k', 0x01];
            let mut parser = Parser::new(&data);
            assert!(matches!(parser.next().unwrap(), Err(Error::BadEncode(_))));
        }

        #[test]
        fn bad_utf8() {
            let data = [0xa0, 0x02, 0xc3, 0x28, 0x00];
            let mut parser = Parser::new(&data);
            assert!(matches!(parser.next().unwrap(), Err(Error::BadEncode(_))));
        }

        #[test]
        fn not_enough_bytes() {
            let data = [0xa0, 0x05, b'h', b'e', b'l'];
            let mut parser = Parser::new(&data);
            assert!(matches!(
                parser.next().unwrap(),
                Err(Error::LengthTooShort { .. })
            ));
        }
    }

    mod bin {
        use super::*;

        #[test]
        fn roundtrip() {
            super::roundtrip(Element::Bin(&[]));
            super::roundtrip(Element::Bin(&[1, 2, 3, 255]));
            let long = vec![0xa5u8; 1000];
            super::roundtrip(Element::Bin(&long));
        }

        #[test]
        fn wire_bytes() {
            assert_eq!(encode(Element::Bin(&[9, 8])), &[0xc0, 0x02, 0x09, 0x08]);
        }
    }

    mod container {
        use super::*;

        #[test]
        fn list_header() {
            // [123, -456, 789]
            let items = [0x20, 0x7b, 0x41, 0xfe, 0x38, 0x40, 0x03, 0x15];
            let mut enc = encode(Element::List(Container {
                count: 3,
                len: items.len(),
            }));
            assert_eq!(enc, &[0xe0, 0x0b, 0x03]);
            enc.extend_from_slice(&items);

            let mut parser = Parser::new(&enc);
            assert_eq!(
                parser.next_elem().unwrap(),
                Element::List(Container { count: 3, len: 8 })
            );
            assert_eq!(parser.next_elem().unwrap(), Element::U8(123));
            assert_eq!(parser.next_elem().unwrap(), Element::I16(-456));
            assert_eq!(parser.next_elem().unwrap(), Element::U16(789));
            assert!(parser.is_empty());
        }

        #[test]
        fn long_header() {
            let c = Container {
                count: 200,
                len: 200,
            };
            let enc = encode(Element::List(c));
            // 1 + 4 + 4 + 200 with both size fields in the long form
            assert_eq!(enc, &[0xe0, 0x80, 0x00, 0x00, 0xd1, 0x80, 0x00, 0x00, 0xc8]);
        }

        #[test]
        fn map_and_object_keys() {
            let mut enc = Vec::new();
            serialize_map_key(&mut enc, -20);
            serialize_object_key(&mut enc, "hello").unwrap();
            let mut parser = Parser::new(&enc);
            assert_eq!(parser.read_map_key().unwrap(), -20);
            assert_eq!(parser.read_object_key().unwrap(), "hello");
            assert!(parser.is_empty());
        }

        #[test]
        fn object_key_too_long() {
            let mut enc = Vec::new();
            let key = "k".repeat(256);
            assert!(matches!(
                serialize_object_key(&mut enc, &key),
                Err(Error::UnsupportedShape(_))
            ));
        }

        #[test]
        fn size_smaller_than_header() {
            let data = [0xe0, 0x02, 0x00];
            let mut parser = Parser::new(&data);
            assert!(matches!(parser.next().unwrap(), Err(Error::BadEncode(_))));
        }

        #[test]
        fn size_past_end() {
            let data = [0xe0, 0x09, 0x01, 0x20];
            let mut parser = Parser::new(&data);
            assert!(matches!(
                parser.next().unwrap(),
                Err(Error::LengthTooShort { .. })
            ));
        }

        #[test]
        fn count_larger_than_data() {
            let data = [0xe0, 0x05, 0x03, 0x20, 0x01];
            let mut parser = Parser::new(&data);
            assert!(matches!(parser.next().unwrap(), Err(Error::BadEncode(_))));
        }
    }

    mod raw {
        use super::*;

        #[test]
        fn lengths() {
            let cases: Vec<(&[u8], usize)> = vec![
                (&[0x00, 0xff], 1),
                (&[0x20, 0x01, 0xff], 2),
                (&[0x82, 0, 0, 0, 0, 0, 0, 0, 0, 0xff], 9),
                (&[0xa0, 0x01, b'a', 0x00, 0xff], 4),
                (&[0xc0, 0x02, 0x01, 0x02, 0xff], 4),
                (&[0xe0, 0x05, 0x01, 0x20, 0x01, 0xff], 5),
            ];
            for (index, (data, len)) in cases.iter().enumerate() {
                assert_eq!(value_len(data).unwrap(), *len, "Failed test #{}", index);
                let mut parser = Parser::new(data);
                assert_eq!(parser.next_raw().unwrap(), &data[..*len]);
                assert_eq!(parser.remaining(), &[0xff]);
            }
        }

        #[test]
        fn truncated() {
            assert!(value_len(&[0xe0, 0x05, 0x01, 0x20]).is_err());
            assert!(value_len(&[0xa0, 0x03, b'a']).is_err());
            assert!(value_len(&[]).is_err());
            assert!(matches!(value_len(&[0xff]), Err(Error::UnknownType(0xff))));
        }
    }
}
