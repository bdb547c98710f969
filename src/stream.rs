//! Reading and writing binn values on byte streams.
//!
//! Binn values are self-delimiting, so a stream is just values written back to back. The
//! [`Decoder`] reads the tag and size field of each value to learn how many more bytes to pull
//! from the reader, then decodes the buffered value.
//!
//! ```
//! use binn_pack::stream::{Decoder, Encoder};
//!
//! let mut enc = Encoder::new(Vec::new());
//! enc.encode(&"first").unwrap();
//! enc.encode(&[1u8, 2, 3]).unwrap();
//! let bytes = enc.into_inner().unwrap();
//!
//! let mut dec = Decoder::new(bytes.as_slice());
//! assert_eq!(dec.decode::<String>().unwrap().as_deref(), Some("first"));
//! assert_eq!(dec.decode::<Vec<u8>>().unwrap(), Some(vec![1, 2, 3]));
//! assert_eq!(dec.decode::<u8>().unwrap(), None);
//! ```

use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::marker::{Marker, StorageClass};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::size;

const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Largest value the [`Decoder`] will buffer unless told otherwise (64 MiB).
pub const DEFAULT_MAX_VALUE_SIZE: usize = 64 * 1024 * 1024;

/// Writes binn values to a byte stream.
pub struct Encoder<W: Write> {
    inner: BufWriter<W>,
    options: EncodeOptions,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, EncodeOptions::default())
    }

    pub fn with_options(writer: W, options: EncodeOptions) -> Self {
        Self {
            inner: BufWriter::with_capacity(DEFAULT_BUFFER_CAPACITY, writer),
            options,
        }
    }

    /// Encode one value and write it out.
    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let buf = crate::to_vec_with(value, &self.options)?;
        self.inner.write_all(&buf)?;
        log::trace!("wrote {} byte value to stream", buf.len());
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(Error::from)
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Flush any buffered values and hand back the writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| Error::from(e.into_error()))
    }
}

/// Reads binn values from a byte stream.
pub struct Decoder<R: Read> {
    inner: BufReader<R>,
    options: DecodeOptions,
    max_value_size: usize,
    failed: bool,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Self {
            inner: BufReader::with_capacity(DEFAULT_BUFFER_CAPACITY, reader),
            options,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
            failed: false,
        }
    }

    /// Set the largest value, in bytes, the decoder will accept. Larger values fail with
    /// [`Error::LengthTooLong`] before anything past their header is read.
    pub fn max_value_size(mut self, max: usize) -> Self {
        self.max_value_size = max;
        self
    }

    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    /// Read and decode the next value. Returns `Ok(None)` if the stream ended cleanly before
    /// another value began.
    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.next_value()? {
            Some(buf) => crate::from_slice_with(&buf, &self.options).map(Some),
            None => Ok(None),
        }
    }

    /// Read the raw bytes of the next value without decoding them.
    pub fn next_value(&mut self) -> Result<Option<Vec<u8>>> {
        let mut tag = [0u8; 1];
        if !self.fill_or_eof(&mut tag)? {
            return Ok(None);
        }
        let marker = Marker::from_u8(tag[0]).ok_or(Error::UnknownType(tag[0]))?;
        let mut buf = vec![tag[0]];

        let rest = match marker.storage_class() {
            StorageClass::String | StorageClass::Blob | StorageClass::Container => {
                let (value, used) = self.read_size_field(&mut buf)?;
                match marker.storage_class() {
                    StorageClass::String => value + 1,
                    StorageClass::Blob => value,
                    _ => value.checked_sub(1 + used).ok_or_else(|| {
                        Error::BadEncode(format!(
                            "{} declares a total size of {}, smaller than its header",
                            marker.name(),
                            value
                        ))
                    })?,
                }
            }
            class => class.fixed_len().unwrap_or(0),
        };

        let total = buf.len() + rest;
        if total > self.max_value_size {
            return Err(Error::LengthTooLong {
                max: self.max_value_size,
                actual: total,
            });
        }
        let start = buf.len();
        buf.resize(total, 0);
        self.inner.read_exact(&mut buf[start..]).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                Error::too_short("read value from stream", start, total)
            } else {
                Error::Io(e)
            }
        })?;
        log::debug!("read {} value of {} bytes from stream", marker.name(), total);
        Ok(Some(buf))
    }

    /// Fill `buf` completely, or return false if the stream was already at its end.
    fn fill_or_eof(&mut self, buf: &mut [u8]) -> Result<bool> {
        loop {
            match self.inner.read(buf) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.inner.read_exact(&mut buf[n..])?;
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read a size field, appending its bytes to `buf`.
    fn read_size_field(&mut self, buf: &mut Vec<u8>) -> Result<(usize, usize)> {
        let mut field = [0u8; 4];
        read_header(&mut self.inner, &mut field[..1])?;
        if field[0] & 0x80 != 0 {
            read_header(&mut self.inner, &mut field[1..])?;
        }
        let mut slice = &field[..];
        let (value, used) = size::read_size(&mut slice)?;
        buf.extend_from_slice(&field[..used]);
        Ok((value, used))
    }
}

fn read_header<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => Error::too_short("read size field from stream", 0, buf.len()),
        _ => Error::Io(e),
    })
}

/// Yields the raw bytes of each value. Iteration ends after the first error, since the reader's
/// position within the stream is unknown from then on.
impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_value().transpose();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

/// Decode a single value from a reader, failing if anything follows it.
pub fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T> {
    let mut dec = Decoder::new(reader);
    let value = dec
        .decode()?
        .ok_or_else(|| Error::too_short("decode type tag", 0, 1))?;
    let mut extra = Vec::new();
    dec.inner.read_to_end(&mut extra)?;
    if !extra.is_empty() {
        return Err(Error::TrailingBytes(extra.len()));
    }
    Ok(value)
}

/// Encode a single value into a writer.
pub fn to_writer<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut enc = Encoder::new(writer);
    enc.encode(value)?;
    enc.flush()
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Record {
        id: u32,
        name: String,
        tags: Vec<String>,
    }

    fn record(id: u32) -> Record {
        Record {
            id,
            name: format!("record {}", id),
            tags: vec!["a".into(); id as usize % 4],
        }
    }

    #[test]
    fn back_to_back() {
        let mut enc = Encoder::new(Vec::new());
        for i in 0..20 {
            enc.encode(&record(i)).unwrap();
        }
        let bytes = enc.into_inner().unwrap();

        let mut dec = Decoder::new(bytes.as_slice());
        for i in 0..20 {
            assert_eq!(dec.decode::<Record>().unwrap(), Some(record(i)));
        }
        assert_eq!(dec.decode::<Record>().unwrap(), None);
    }

    #[test]
    fn every_storage_class() {
        let mut map = BTreeMap::new();
        map.insert(1i32, "x".to_string());
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&()).unwrap();
        enc.encode(&7u8).unwrap();
        enc.encode(&-300i16).unwrap();
        enc.encode(&1.5f32).unwrap();
        enc.encode(&u64::MAX).unwrap();
        enc.encode("text").unwrap();
        enc.encode(serde_bytes::Bytes::new(&[9; 200])).unwrap();
        enc.encode(&map).unwrap();
        let bytes = enc.into_inner().unwrap();

        let mut dec = Decoder::new(bytes.as_slice());
        assert_eq!(dec.decode::<()>().unwrap(), Some(()));
        assert_eq!(dec.decode::<u8>().unwrap(), Some(7));
        assert_eq!(dec.decode::<i16>().unwrap(), Some(-300));
        assert_eq!(dec.decode::<f32>().unwrap(), Some(1.5));
        assert_eq!(dec.decode::<u64>().unwrap(), Some(u64::MAX));
        assert_eq!(dec.decode::<String>().unwrap().as_deref(), Some("text"));
        assert_eq!(
            dec.decode::<serde_bytes::ByteBuf>().unwrap().unwrap().as_slice(),
            &[9; 200][..]
        );
        assert_eq!(dec.decode::<BTreeMap<i32, String>>().unwrap(), Some(map));
        assert!(dec.decode::<u8>().unwrap().is_none());
    }

    #[test]
    fn large_container() {
        let big: Vec<u32> = (0..10_000).collect();
        let mut buf = Vec::new();
        to_writer(&mut buf, &big).unwrap();
        let back: Vec<u32> = from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, big);
    }

    #[test]
    fn truncated() {
        let bytes = crate::to_vec(&record(3)).unwrap();
        let cut = &bytes[..bytes.len() - 2];
        let mut dec = Decoder::new(cut);
        assert!(matches!(
            dec.decode::<Record>(),
            Err(Error::LengthTooShort { .. })
        ));

        // Long size field cut off partway
        let mut dec = Decoder::new(&[0xc0, 0x80, 0x00][..]);
        assert!(matches!(
            dec.next_value(),
            Err(Error::LengthTooShort { .. })
        ));
    }

    #[test]
    fn size_limit() {
        let bytes = crate::to_vec(serde_bytes::Bytes::new(&[0; 1000])).unwrap();
        let mut dec = Decoder::new(bytes.as_slice()).max_value_size(512);
        assert!(matches!(
            dec.next_value(),
            Err(Error::LengthTooLong { max: 512, .. })
        ));
    }

    #[test]
    fn unknown_tag() {
        let mut dec = Decoder::new(&[0xff, 0x00][..]);
        assert!(matches!(dec.next_value(), Err(Error::UnknownType(0xff))));
    }

    #[test]
    fn undersized_container() {
        let mut dec = Decoder::new(&[0xe0, 0x01, 0x00][..]);
        assert!(matches!(dec.next_value(), Err(Error::BadEncode(_))));
    }

    #[test]
    fn raw_iteration() {
        let mut buf = Vec::new();
        let mut enc = Encoder::new(&mut buf);
        enc.encode(&1u8).unwrap();
        enc.encode("two").unwrap();
        enc.flush().unwrap();
        drop(enc);
        let values: Vec<Vec<u8>> = Decoder::new(buf.as_slice())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(values, vec![vec![0x20, 0x01], b"\xa0\x03two\x00".to_vec()]);
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut iter = Decoder::new(&[0x20, 0x01, 0xff, 0x20, 0x02][..]);
        assert_eq!(iter.next().unwrap().unwrap(), vec![0x20, 0x01]);
        assert!(matches!(iter.next(), Some(Err(Error::UnknownType(0xff)))));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn trailing_after_single() {
        let mut buf = crate::to_vec(&1u8).unwrap();
        buf.push(0x00);
        assert!(matches!(
            from_reader::<_, u8>(buf.as_slice()),
            Err(Error::TrailingBytes(1))
        ));
    }
}
