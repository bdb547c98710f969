//! A serde codec for binn, a compact self-describing binary format.
//!
//! Every binn value starts with a one-byte type tag. The tag's top three bits name its storage
//! class, which alone tells a reader how long the payload is:
//!
//! - No payload: Null, True, False
//! - Fixed 1, 2, 4, or 8 bytes: integers and floats, big-endian
//! - String: size field, UTF-8 bytes, then a 0x00 terminator not counted by the size
//! - Blob: size field, then raw bytes
//! - Container: total size, item count, then the items. A List holds bare values, a Map holds
//!   values keyed by 32-bit signed integers, and an Object holds values keyed by short strings.
//!
//! Size fields take one byte for values up to 127, and four big-endian bytes with the top bit
//! set otherwise.
//!
//! Encoding maps Rust types onto this model through serde:
//!
//! - Integers are written with the narrowest tag that holds them: unsigned for non-negative
//!   values, signed for negative ones. A `u64` holding 123 and an `i8` holding 123 produce the
//!   same two bytes.
//! - Structs become Objects with their fields in declaration order, and honor `#[serde(rename)]`.
//! - Sequences and tuples become Lists.
//! - Maps become Maps when keyed by integers and Objects when keyed by strings.
//! - Byte buffers become Blobs when serialized as bytes (see `serde_bytes`).
//!
//! Decoding is driven by the tags in the data. Typed destinations check that the wire kind fits
//! and range-check numbers; [`Value`] accepts anything.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Person {
//!     id: u8,
//!     name: String,
//! }
//!
//! let john = Person { id: 1, name: "John".into() };
//! let bytes = binn_pack::to_vec(&john).unwrap();
//! assert_eq!(bytes[0], 0xe2);
//! let back: Person = binn_pack::from_slice(&bytes).unwrap();
//! assert_eq!(back, john);
//! ```
//!
//! Types that need their own representation can implement [`SelfCodec`] or go through
//! [`Text`]; see the [`hooks`] module.

mod depth_tracking;
mod error;
mod integer;
mod marker;

pub mod de;
pub mod element;
pub mod hooks;
pub mod options;
pub mod registry;
pub mod ser;
pub mod size;
pub mod stream;
pub mod value;

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

pub use de::Deserializer;
pub use error::{Error, HookError, Result};
pub use hooks::{self_codec, text, SelfCodec, SelfCoded, Text};
pub use integer::Integer;
pub use marker::{Marker, StorageClass, TextKind};
pub use options::{DecodeOptions, EncodeOptions};
pub use registry::Registry;
pub use ser::Serializer;
pub use value::Value;

/// Default limit on container nesting, for both encode and decode.
pub const MAX_DEPTH: usize = 100;

/// Encode a value into a new byte vector.
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    to_vec_with(value, &EncodeOptions::default())
}

/// Encode a value with non-default settings.
pub fn to_vec_with<T: Serialize + ?Sized>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut ser = Serializer::with_options(options);
    value.serialize(&mut ser)?;
    Ok(ser.into_inner())
}

/// Encode a value into a writer.
pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    stream::to_writer(writer, value)
}

/// Decode a value from a byte slice. The slice must hold exactly one value.
pub fn from_slice<'de, T: Deserialize<'de>>(data: &'de [u8]) -> Result<T> {
    from_slice_with(data, &DecodeOptions::default())
}

/// Decode a value with non-default settings.
pub fn from_slice_with<'de, T: Deserialize<'de>>(
    data: &'de [u8],
    options: &DecodeOptions,
) -> Result<T> {
    let mut de = Deserializer::with_options(data, options);
    let value = T::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Decode a single value from a reader. Anything after the value is an error.
pub fn from_reader<R: Read, T: serde::de::DeserializeOwned>(reader: R) -> Result<T> {
    stream::from_reader(reader)
}
