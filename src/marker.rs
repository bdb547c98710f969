/// Storage classes, held in the top 3 bits of a type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageClass {
    NoBytes,
    Byte,
    Word,
    DWord,
    QWord,
    String,
    Blob,
    Container,
}

impl StorageClass {
    pub const MASK: u8 = 0xE0;

    pub fn from_tag(tag: u8) -> StorageClass {
        match tag & Self::MASK {
            0x00 => StorageClass::NoBytes,
            0x20 => StorageClass::Byte,
            0x40 => StorageClass::Word,
            0x60 => StorageClass::DWord,
            0x80 => StorageClass::QWord,
            0xA0 => StorageClass::String,
            0xC0 => StorageClass::Blob,
            _ => StorageClass::Container,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            StorageClass::NoBytes => 0x00,
            StorageClass::Byte => 0x20,
            StorageClass::Word => 0x40,
            StorageClass::DWord => 0x60,
            StorageClass::QWord => 0x80,
            StorageClass::String => 0xA0,
            StorageClass::Blob => 0xC0,
            StorageClass::Container => 0xE0,
        }
    }

    /// Payload length implied by the class alone, for the fixed-width classes.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            StorageClass::NoBytes => Some(0),
            StorageClass::Byte => Some(1),
            StorageClass::Word => Some(2),
            StorageClass::DWord => Some(4),
            StorageClass::QWord => Some(8),
            _ => None,
        }
    }
}

/// Text subtypes of the string storage class. They all decode as plain strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    Plain,
    DateTime,
    Date,
    Time,
    Decimal,
    CurrencyStr,
    SingleStr,
    DoubleStr,
}

/// A known binn type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Null,
    True,
    False,
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    UInt64,
    Int64,
    Float64,
    Str(TextKind),
    Blob,
    List,
    Map,
    Object,
}

impl Marker {
    /// Construct a marker from a single byte, if the byte is a known tag.
    pub fn from_u8(n: u8) -> Option<Marker> {
        Some(match n {
            0x00 => Marker::Null,
            0x01 => Marker::True,
            0x02 => Marker::False,
            0x20 => Marker::UInt8,
            0x21 => Marker::Int8,
            0x40 => Marker::UInt16,
            0x41 => Marker::Int16,
            0x60 => Marker::UInt32,
            0x61 => Marker::Int32,
            0x62 => Marker::Float32,
            0x80 => Marker::UInt64,
            0x81 => Marker::Int64,
            0x82 => Marker::Float64,
            0xA0 => Marker::Str(TextKind::Plain),
            0xA1 => Marker::Str(TextKind::DateTime),
            0xA2 => Marker::Str(TextKind::Date),
            0xA3 => Marker::Str(TextKind::Time),
            0xA4 => Marker::Str(TextKind::Decimal),
            0xA5 => Marker::Str(TextKind::CurrencyStr),
            0xA6 => Marker::Str(TextKind::SingleStr),
            0xA7 => Marker::Str(TextKind::DoubleStr),
            0xC0 => Marker::Blob,
            0xE0 => Marker::List,
            0xE1 => Marker::Map,
            0xE2 => Marker::Object,
            _ => return None,
        })
    }

    /// Converts a marker into its single-byte tag.
    pub fn into_u8(self) -> u8 {
        match self {
            Marker::Null => 0x00,
            Marker::True => 0x01,
            Marker::False => 0x02,
            Marker::UInt8 => 0x20,
            Marker::Int8 => 0x21,
            Marker::UInt16 => 0x40,
            Marker::Int16 => 0x41,
            Marker::UInt32 => 0x60,
            Marker::Int32 => 0x61,
            Marker::Float32 => 0x62,
            Marker::UInt64 => 0x80,
            Marker::Int64 => 0x81,
            Marker::Float64 => 0x82,
            Marker::Str(kind) => match kind {
                TextKind::Plain => 0xA0,
                TextKind::DateTime => 0xA1,
                TextKind::Date => 0xA2,
                TextKind::Time => 0xA3,
                TextKind::Decimal => 0xA4,
                TextKind::CurrencyStr => 0xA5,
                TextKind::SingleStr => 0xA6,
                TextKind::DoubleStr => 0xA7,
            },
            Marker::Blob => 0xC0,
            Marker::List => 0xE0,
            Marker::Map => 0xE1,
            Marker::Object => 0xE2,
        }
    }

    pub fn storage_class(self) -> StorageClass {
        StorageClass::from_tag(self.into_u8())
    }

    pub fn is_container(self) -> bool {
        matches!(self, Marker::List | Marker::Map | Marker::Object)
    }

    pub fn name(self) -> &'static str {
        match self {
            Marker::Null => "Null",
            Marker::True | Marker::False => "Bool",
            Marker::UInt8 => "UInt8",
            Marker::Int8 => "Int8",
            Marker::UInt16 => "UInt16",
            Marker::Int16 => "Int16",
            Marker::UInt32 => "UInt32",
            Marker::Int32 => "Int32",
            Marker::Float32 => "Float32",
            Marker::UInt64 => "UInt64",
            Marker::Int64 => "Int64",
            Marker::Float64 => "Float64",
            Marker::Str(_) => "String",
            Marker::Blob => "Blob",
            Marker::List => "List",
            Marker::Map => "Map",
            Marker::Object => "Object",
        }
    }
}

impl From<Marker> for u8 {
    fn from(val: Marker) -> u8 {
        val.into_u8()
    }
}
