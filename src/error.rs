use std::fmt;

use serde::{de, ser};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error returned by a custom hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// Input ended before a value was complete.
    #[error("Expected data length {expected}, but got {actual} on step [{step}]")]
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// A length doesn't fit in the size field, or a decoded value exceeded a configured limit.
    #[error("Data too long: was {actual} bytes, maximum allowed is {max}")]
    LengthTooLong { max: usize, actual: usize },
    /// The tag byte isn't part of the type table.
    #[error("Unknown type tag 0x{0:02x}")]
    UnknownType(u8),
    /// Basic binn encoding failure: bad terminator, invalid UTF-8, container bounds that don't
    /// agree with their contents.
    #[error("Basic data encoding failure: {0}")]
    BadEncode(String),
    /// Bytes were left over after the top-level value.
    #[error("{0} trailing bytes after the value")]
    TrailingBytes(usize),
    /// The destination can't hold the kind of value found on the wire.
    #[error("Expected {expected}, but found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A numeric value doesn't fit the destination type.
    #[error("Value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    /// The value being encoded has no mapping onto the wire format.
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),
    /// An object key didn't match any field of the destination record.
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    /// Containers were nested deeper than allowed.
    #[error("Depth limit of {0} exceeded")]
    DepthLimit(usize),
    /// A custom encode/decode hook reported failure.
    #[error("{type_name}::{hook} failed: {source}")]
    Hook {
        type_name: &'static str,
        hook: &'static str,
        #[source]
        source: HookError,
    },
    /// Reading from or writing to a stream failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Failure reported through serde's custom error hooks.
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn kind_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::KindMismatch { expected, found }
    }

    pub(crate) fn out_of_range(value: impl fmt::Display, target: &'static str) -> Self {
        Error::OutOfRange {
            value: value.to_string(),
            target,
        }
    }

    pub(crate) fn too_short(step: &'static str, actual: usize, expected: usize) -> Self {
        Error::LengthTooShort {
            step,
            actual,
            expected,
        }
    }

    pub(crate) fn hook<T: ?Sized>(hook: &'static str, source: impl Into<HookError>) -> Self {
        Error::Hook {
            type_name: std::any::type_name::<T>(),
            hook,
            source: source.into(),
        }
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
