//! AMF0 type markers
//!
//! The one table shared by the encoder, the per-variant decoders and the
//! factory dispatch.

use crate::error::AmfError;

/// AMF0 type marker byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Marker {
    Number = 0x00,
    Boolean = 0x01,
    String = 0x02,
    Object = 0x03,
    /// Reserved, never emitted
    MovieClip = 0x04,
    Null = 0x05,
    Undefined = 0x06,
    Reference = 0x07,
    EcmaArray = 0x08,
    ObjectEnd = 0x09,
    StrictArray = 0x0A,
    Date = 0x0B,
    LongString = 0x0C,
    Unsupported = 0x0D,
    /// Reserved, never emitted
    RecordSet = 0x0E,
    XmlDocument = 0x0F,
    TypedObject = 0x10,
    /// Switch to AMF3
    AvmPlus = 0x11,
}

impl Marker {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this codec can decode and encode values carrying this marker
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            Marker::Number
                | Marker::Boolean
                | Marker::String
                | Marker::Object
                | Marker::Null
                | Marker::Undefined
                | Marker::EcmaArray
                | Marker::ObjectEnd
                | Marker::StrictArray
        )
    }
}

impl TryFrom<u8> for Marker {
    type Error = AmfError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        let marker = match b {
            0x00 => Marker::Number,
            0x01 => Marker::Boolean,
            0x02 => Marker::String,
            0x03 => Marker::Object,
            0x04 => Marker::MovieClip,
            0x05 => Marker::Null,
            0x06 => Marker::Undefined,
            0x07 => Marker::Reference,
            0x08 => Marker::EcmaArray,
            0x09 => Marker::ObjectEnd,
            0x0A => Marker::StrictArray,
            0x0B => Marker::Date,
            0x0C => Marker::LongString,
            0x0D => Marker::Unsupported,
            0x0E => Marker::RecordSet,
            0x0F => Marker::XmlDocument,
            0x10 => Marker::TypedObject,
            0x11 => Marker::AvmPlus,
            other => return Err(AmfError::UnknownMarker(other)),
        };
        Ok(marker)
    }
}

impl From<Marker> for u8 {
    fn from(m: Marker) -> Self {
        m.as_u8()
    }
}
