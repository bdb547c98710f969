use std::cmp::{self, Ordering};
use std::convert::TryFrom;
use std::fmt::{self, Debug, Display};

use crate::marker::Marker;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum IntPriv {
    /// Always non-less than zero.
    PosInt(u64),
    /// Always less than zero.
    NegInt(i64),
}

/// A binn integer, whether signed or unsigned.
///
/// The wire width is never stored: encoding always picks the narrowest tag that holds the value,
/// preferring the unsigned tags for anything non-negative.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    n: IntPriv,
}

impl Integer {
    /// Minimum possible integer that can be represented. Equivalent to `i64::MIN`.
    pub fn min_value() -> Integer {
        Integer {
            n: IntPriv::NegInt(i64::MIN),
        }
    }

    /// Maximum possible integer that can be represented. Equivalent to `u64::MAX`.
    pub fn max_value() -> Integer {
        Integer {
            n: IntPriv::PosInt(u64::MAX),
        }
    }

    /// Returns `true` if the integer can be represented as `i64`.
    #[inline]
    pub fn is_i64(&self) -> bool {
        match self.n {
            IntPriv::PosInt(n) => n <= i64::MAX as u64,
            IntPriv::NegInt(..) => true,
        }
    }

    /// Returns `true` if the integer can be represented as `u64`.
    #[inline]
    pub fn is_u64(&self) -> bool {
        matches!(self.n, IntPriv::PosInt(..))
    }

    /// Returns the integer represented as `i64` if possible, or else `None`.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            IntPriv::PosInt(n) => i64::try_from(n).ok(),
            IntPriv::NegInt(n) => Some(n),
        }
    }

    /// Returns the integer represented as `u64` if possible, or else `None`.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            IntPriv::PosInt(n) => Some(n),
            IntPriv::NegInt(_) => None,
        }
    }

    /// Returns the integer as `f64`. Large magnitudes lose precision.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self.n {
            IntPriv::PosInt(n) => n as f64,
            IntPriv::NegInt(n) => n as f64,
        }
    }

    /// The narrowest tag able to hold this value.
    pub fn marker(&self) -> Marker {
        match self.n {
            IntPriv::PosInt(v) => {
                if v <= u8::MAX as u64 {
                    Marker::UInt8
                } else if v <= u16::MAX as u64 {
                    Marker::UInt16
                } else if v <= u32::MAX as u64 {
                    Marker::UInt32
                } else {
                    Marker::UInt64
                }
            }
            IntPriv::NegInt(v) => {
                if v >= i8::MIN as i64 {
                    Marker::Int8
                } else if v >= i16::MIN as i64 {
                    Marker::Int16
                } else if v >= i32::MIN as i64 {
                    Marker::Int32
                } else {
                    Marker::Int64
                }
            }
        }
    }
}

pub(crate) fn get_int_internal(val: &Integer) -> IntPriv {
    val.n
}

impl std::default::Default for Integer {
    fn default() -> Self {
        Self {
            n: IntPriv::PosInt(0),
        }
    }
}

impl cmp::Ord for Integer {
    fn cmp(&self, other: &Integer) -> Ordering {
        match (self.n, other.n) {
            (IntPriv::NegInt(lhs), IntPriv::NegInt(ref rhs)) => lhs.cmp(rhs),
            (IntPriv::NegInt(_), IntPriv::PosInt(_)) => Ordering::Less,
            (IntPriv::PosInt(_), IntPriv::NegInt(_)) => Ordering::Greater,
            (IntPriv::PosInt(lhs), IntPriv::PosInt(ref rhs)) => lhs.cmp(rhs),
        }
    }
}

impl cmp::PartialOrd for Integer {
    fn partial_cmp(&self, other: &Integer) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for Integer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        Debug::fmt(&self.n, fmt)
    }
}

impl Display for Integer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self.n {
            IntPriv::PosInt(v) => Display::fmt(&v, fmt),
            IntPriv::NegInt(v) => Display::fmt(&v, fmt),
        }
    }
}

macro_rules! impl_from_unsigned {
    ($t: ty) => {
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                Integer {
                    n: IntPriv::PosInt(n as u64),
                }
            }
        }
    };
}

macro_rules! impl_from_signed {
    ($t: ty) => {
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                if n < 0 {
                    Integer {
                        n: IntPriv::NegInt(n as i64),
                    }
                } else {
                    Integer {
                        n: IntPriv::PosInt(n as u64),
                    }
                }
            }
        }
    };
}

impl_from_unsigned!(u8);
impl_from_unsigned!(u16);
impl_from_unsigned!(u32);
impl_from_unsigned!(u64);
impl_from_unsigned!(usize);
impl_from_signed!(i8);
impl_from_signed!(i16);
impl_from_signed!(i32);
impl_from_signed!(i64);
impl_from_signed!(isize);

macro_rules! impl_try_from {
    ($t: ty) => {
        impl TryFrom<Integer> for $t {
            type Error = Integer;
            fn try_from(v: Integer) -> Result<Self, Self::Error> {
                match v.n {
                    IntPriv::PosInt(n) => TryFrom::try_from(n).map_err(|_| v),
                    IntPriv::NegInt(n) => TryFrom::try_from(n).map_err(|_| v),
                }
            }
        }
    };
}

impl_try_from!(u8);
impl_try_from!(u16);
impl_try_from!(u32);
impl_try_from!(u64);
impl_try_from!(usize);
impl_try_from!(i8);
impl_try_from!(i16);
impl_try_from!(i32);
impl_try_from!(i64);
impl_try_from!(isize);

use serde::{
    de::{Deserialize, Deserializer},
    ser::{Serialize, Serializer},
};

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.n {
            IntPriv::PosInt(v) => serializer.serialize_u64(v),
            IntPriv::NegInt(v) => serializer.serialize_i64(v),
        }
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IntVisitor;
        impl<'de> serde::de::Visitor<'de> for IntVisitor {
            type Value = Integer;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
                write!(fmt, "an integer")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Integer::from(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Integer::from(v))
            }
        }

        deserializer.deserialize_any(IntVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn marker_of(v: impl Into<Integer>) -> Marker {
        v.into().marker()
    }

    #[test]
    fn narrowing_ignores_declared_width() {
        assert_eq!(marker_of(5u64), Marker::UInt8);
        assert_eq!(marker_of(5i64), Marker::UInt8);
        assert_eq!(marker_of(0i32), Marker::UInt8);
        assert_eq!(marker_of(-1i64), Marker::Int8);
        assert_eq!(marker_of(-12345i16), Marker::Int16);
        assert_eq!(marker_of(1099511892096u64), Marker::UInt64);
    }

    #[test]
    fn narrowing_boundaries() {
        let cases: Vec<(Integer, Marker)> = vec![
            (u8::MAX.into(), Marker::UInt8),
            ((u8::MAX as u64 + 1).into(), Marker::UInt16),
            (u16::MAX.into(), Marker::UInt16),
            ((u16::MAX as u64 + 1).into(), Marker::UInt32),
            (u32::MAX.into(), Marker::UInt32),
            ((u32::MAX as u64 + 1).into(), Marker::UInt64),
            (u64::MAX.into(), Marker::UInt64),
            (i8::MIN.into(), Marker::Int8),
            ((i8::MIN as i64 - 1).into(), Marker::Int16),
            (i16::MIN.into(), Marker::Int16),
            ((i16::MIN as i64 - 1).into(), Marker::Int32),
            (i32::MIN.into(), Marker::Int32),
            ((i32::MIN as i64 - 1).into(), Marker::Int64),
            (i64::MIN.into(), Marker::Int64),
        ];
        for (index, (value, marker)) in cases.iter().enumerate() {
            assert_eq!(value.marker(), *marker, "Failed test #{}: {}", index, value);
        }
    }

    #[test]
    fn sign_decides_family() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let v: i64 = rng.gen();
            let marker = marker_of(v);
            let unsigned = matches!(
                marker,
                Marker::UInt8 | Marker::UInt16 | Marker::UInt32 | Marker::UInt64
            );
            assert_eq!(unsigned, v >= 0, "Wrong tag family for {}: {:?}", v, marker);
        }
    }

    #[test]
    fn conversions() {
        let x = Integer::from(300u16);
        assert_eq!(u8::try_from(x), Err(x));
        assert_eq!(i16::try_from(x), Ok(300));
        let y = Integer::from(-1i8);
        assert!(u64::try_from(y).is_err());
        assert_eq!(y.as_i64(), Some(-1));
        assert_eq!(y.as_u64(), None);
        assert!(Integer::min_value() < Integer::from(0));
        assert!(Integer::max_value() > Integer::from(i64::MAX));
    }
}
