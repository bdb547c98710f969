//! Memoized per-tag decode functions.
//!
//! Every tag byte gets one slot. The first lookup for a tag builds its entry; concurrent lookups
//! of the same tag wait for that single build and then share the result, while lookups of other
//! tags proceed independently. Entries are never invalidated.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use byteorder::{BigEndian, ReadBytesExt};
use log::trace;

use crate::{
    element::{Element, Parser},
    error::{Error, Result},
    marker::Marker,
};

/// Decodes the payload following a tag byte, with the tag already consumed.
pub type TagDecoder = for<'a> fn(&mut Parser<'a>) -> Result<Element<'a>>;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

pub struct Registry {
    slots: [OnceLock<Option<TagDecoder>>; 256],
    built: AtomicUsize,
}

impl Registry {
    /// Create an empty, independent registry.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| OnceLock::new()),
            built: AtomicUsize::new(0),
        }
    }

    /// The process-wide registry used by default.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Look up the decode function for a tag, building it on first use.
    pub fn decoder(&self, tag: u8) -> Result<TagDecoder> {
        let entry = self.slots[tag as usize].get_or_init(|| {
            self.built.fetch_add(1, Ordering::Relaxed);
            let entry = build(tag);
            trace!(
                "registry: built entry for tag 0x{:02x} ({})",
                tag,
                if entry.is_some() { "known" } else { "unknown" }
            );
            entry
        });
        (*entry).ok_or(Error::UnknownType(tag))
    }

    /// Number of tags that have an entry so far.
    pub fn built(&self) -> usize {
        self.built.load(Ordering::Relaxed)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("built", &self.built())
            .finish()
    }
}

fn build(tag: u8) -> Option<TagDecoder> {
    let marker = Marker::from_u8(tag)?;
    let decoder: TagDecoder = match marker {
        Marker::Null => null,
        Marker::True => bool_true,
        Marker::False => bool_false,
        Marker::UInt8 => uint8,
        Marker::Int8 => int8,
        Marker::UInt16 => uint16,
        Marker::Int16 => int16,
        Marker::UInt32 => uint32,
        Marker::Int32 => int32,
        Marker::UInt64 => uint64,
        Marker::Int64 => int64,
        Marker::Float32 => float32,
        Marker::Float64 => float64,
        Marker::Str(_) => string,
        Marker::Blob => blob,
        Marker::List => list,
        Marker::Map => map,
        Marker::Object => object,
    };
    Some(decoder)
}

fn null<'a>(_: &mut Parser<'a>) -> Result<Element<'a>> {
    Ok(Element::Null)
}

fn bool_true<'a>(_: &mut Parser<'a>) -> Result<Element<'a>> {
    Ok(Element::Bool(true))
}

fn bool_false<'a>(_: &mut Parser<'a>) -> Result<Element<'a>> {
    Ok(Element::Bool(false))
}

fn uint8<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode UInt8", 1, |d| d.read_u8())
        .map(Element::U8)
}

fn int8<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode Int8", 1, |d| d.read_i8())
        .map(Element::I8)
}

fn uint16<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode UInt16", 2, |d| d.read_u16::<BigEndian>())
        .map(Element::U16)
}

fn int16<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode Int16", 2, |d| d.read_i16::<BigEndian>())
        .map(Element::I16)
}

fn uint32<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode UInt32", 4, |d| d.read_u32::<BigEndian>())
        .map(Element::U32)
}

fn int32<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode Int32", 4, |d| d.read_i32::<BigEndian>())
        .map(Element::I32)
}

fn uint64<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode UInt64", 8, |d| d.read_u64::<BigEndian>())
        .map(Element::U64)
}

fn int64<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode Int64", 8, |d| d.read_i64::<BigEndian>())
        .map(Element::I64)
}

fn float32<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode Float32", 4, |d| d.read_f32::<BigEndian>())
        .map(Element::F32)
}

fn float64<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_with("decode Float64", 8, |d| d.read_f64::<BigEndian>())
        .map(Element::F64)
}

fn string<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_str().map(Element::Str)
}

fn blob<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_bin().map(Element::Bin)
}

fn list<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_container("decode List").map(Element::List)
}

fn map<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_container("decode Map").map(Element::Map)
}

fn object<'a>(p: &mut Parser<'a>) -> Result<Element<'a>> {
    p.read_container("decode Object").map(Element::Object)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn lazy_build() {
        let registry = Registry::new();
        assert_eq!(registry.built(), 0);
        registry.decoder(0x20).unwrap();
        registry.decoder(0x20).unwrap();
        assert_eq!(registry.built(), 1);
        registry.decoder(0xa0).unwrap();
        assert_eq!(registry.built(), 2);
    }

    #[test]
    fn unknown_tag_is_cached() {
        let registry = Registry::new();
        assert!(matches!(registry.decoder(0xff), Err(Error::UnknownType(0xff))));
        assert!(matches!(registry.decoder(0xff), Err(Error::UnknownType(0xff))));
        assert_eq!(registry.built(), 1);
    }

    #[test]
    fn every_known_tag_has_an_entry() {
        let registry = Registry::new();
        for tag in 0..=255u8 {
            assert_eq!(
                registry.decoder(tag).is_ok(),
                Marker::from_u8(tag).is_some(),
                "Tag 0x{:02x} disagrees with the tag table",
                tag
            );
        }
        assert_eq!(registry.built(), 256);
    }

    #[test]
    fn concurrent_single_build() {
        let registry = Arc::new(Registry::new());
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..100 {
                        registry.decoder(0xe2).unwrap();
                        registry.decoder(0x20 + (i % 2)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // Object, UInt8, and Int8, each built once
        assert_eq!(registry.built(), 3);
    }

    #[test]
    fn independent_of_global() {
        let local = Registry::new();
        let data = [0x20, 0x07];
        let mut parser = Parser::with_registry(&data, &local);
        assert_eq!(parser.next_elem().unwrap(), Element::U8(7));
        assert_eq!(local.built(), 1);
    }
}
