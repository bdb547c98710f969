//! Custom encoding hooks.
//!
//! A type can take over its own representation in two ways, checked before the structural
//! mapping:
//!
//! 1. [`SelfCodec`]: the type produces and consumes complete binn values itself. Wrap it in
//!    [`SelfCoded`], or put `#[serde(with = "binn_pack::self_codec")]` on the field.
//! 2. Text: any `Display + FromStr` type can be written as a String. Wrap it in [`Text`], or put
//!    `#[serde(with = "binn_pack::text")]` on the field.
//!
//! Everything else goes through its ordinary `Serialize` / `Deserialize` implementation.
//!
//! Hook failures are reported as [`Error::Hook`], naming the type and the hook that failed.

use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, HookError, Result};

/// Newtype name that tells the binn encoder and decoder to pass a value's bytes through
/// untouched.
pub(crate) const RAW_TOKEN: &str = "$binn_pack::private::Raw";

/// A type that encodes itself straight to binn bytes.
///
/// `encode_binn` must produce exactly one complete binn value (tag through last payload byte),
/// and `decode_binn` receives exactly that slice back.
pub trait SelfCodec: Sized {
    fn encode_binn(&self) -> std::result::Result<Vec<u8>, HookError>;
    fn decode_binn(data: &[u8]) -> std::result::Result<Self, HookError>;
}

/// Run a type's encode hook, wrapping any failure.
pub fn encode_self<T: SelfCodec>(value: &T) -> Result<Vec<u8>> {
    value
        .encode_binn()
        .map_err(|e| Error::hook::<T>("encode_binn", e))
}

/// Run a type's decode hook, wrapping any failure.
pub fn decode_self<T: SelfCodec>(data: &[u8]) -> Result<T> {
    T::decode_binn(data).map_err(|e| Error::hook::<T>("decode_binn", e))
}

/// Wrapper that encodes and decodes the inner value through its [`SelfCodec`] implementation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelfCoded<T>(pub T);

impl<T: SelfCodec> Serialize for SelfCoded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self_codec::serialize(&self.0, serializer)
    }
}

impl<'de, T: SelfCodec> Deserialize<'de> for SelfCoded<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        self_codec::deserialize(deserializer).map(SelfCoded)
    }
}

/// Use with `#[serde(with = "binn_pack::self_codec")]`.
pub mod self_codec {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        T: SelfCodec,
        S: Serializer,
    {
        let bytes = encode_self(value).map_err(ser::Error::custom)?;
        serializer.serialize_newtype_struct(RAW_TOKEN, serde_bytes::Bytes::new(&bytes))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
    where
        T: SelfCodec,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(RAW_TOKEN, RawVisitor(PhantomData))
    }

    struct RawVisitor<T>(PhantomData<T>);

    impl<'de, T: SelfCodec> de::Visitor<'de> for RawVisitor<T> {
        type Value = T;

        fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(fmt, "a self-encoded binn value")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<T, E> {
            decode_self(v).map_err(E::custom)
        }

        fn visit_newtype_struct<D: Deserializer<'de>>(
            self,
            deserializer: D,
        ) -> std::result::Result<T, D::Error> {
            let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
            decode_self(&bytes).map_err(de::Error::custom)
        }
    }
}

/// Wrapper that encodes the inner value as a String through `Display`, and decodes it through
/// `FromStr`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Text<T>(pub T);

impl<T: Display> Serialize for Text<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        text::serialize(&self.0, serializer)
    }
}

impl<'de, T> Deserialize<'de> for Text<T>
where
    T: FromStr,
    T::Err: Into<HookError>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        text::deserialize(deserializer).map(Text)
    }
}

/// Use with `#[serde(with = "binn_pack::text")]`.
pub mod text {
    use super::*;

    pub fn serialize<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Into<HookError>,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TextVisitor(PhantomData))
    }

    /// Parse text the way the decode hook does, wrapping any failure.
    pub fn parse<T>(v: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Into<HookError>,
    {
        v.parse::<T>().map_err(|e| Error::hook::<T>("from_str", e))
    }

    struct TextVisitor<T>(PhantomData<T>);

    impl<'de, T> de::Visitor<'de> for TextVisitor<T>
    where
        T: FromStr,
        T::Err: Into<HookError>,
    {
        type Value = T;

        fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(fmt, "a string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<T, E> {
            parse(v).map_err(E::custom)
        }
    }
}
