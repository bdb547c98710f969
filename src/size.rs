//! The variable-length size field.
//!
//! Sizes up to 127 take a single byte. Anything larger is written as a 4-byte big-endian integer
//! with the top bit forced on, which is how a reader tells the two forms apart.

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// Largest value a size field can carry.
pub const MAX_SIZE: usize = 0x7FFF_FFFF;

const MAX_SHORT: usize = 127;
const LONG_FLAG: u32 = 0x8000_0000;

/// Number of bytes the size field for `value` occupies.
#[inline]
pub fn size_len(value: usize) -> usize {
    if value <= MAX_SHORT {
        1
    } else {
        4
    }
}

pub fn write_size(buf: &mut Vec<u8>, value: usize) -> Result<()> {
    if value > MAX_SIZE {
        return Err(Error::LengthTooLong {
            max: MAX_SIZE,
            actual: value,
        });
    }
    if value <= MAX_SHORT {
        buf.push(value as u8);
    } else {
        buf.extend_from_slice(&((value as u32) | LONG_FLAG).to_be_bytes());
    }
    Ok(())
}

/// Read a size field, returning the value and the number of bytes it took up.
pub fn read_size(data: &mut &[u8]) -> Result<(usize, usize)> {
    let first = *data
        .first()
        .ok_or_else(|| Error::too_short("decode size field", 0, 1))?;
    if first & 0x80 == 0 {
        *data = &data[1..];
        return Ok((first as usize, 1));
    }
    let available = data.len();
    let v = data
        .read_u32::<BigEndian>()
        .map_err(|_| Error::too_short("decode long size field", available, 4))?;
    Ok(((v & !LONG_FLAG) as usize, 4))
}

/// Total-size field value of a container whose count field and items take up `body_len`
/// bytes. The total covers the tag, the size field itself, the count field, and every item.
pub fn container_size(body_len: usize) -> Result<usize> {
    let without_size = 1 + body_len;
    let total = if without_size + 1 <= MAX_SHORT {
        without_size + 1
    } else {
        without_size + 4
    };
    if total > MAX_SIZE {
        return Err(Error::LengthTooLong {
            max: MAX_SIZE,
            actual: total,
        });
    }
    Ok(total)
}
