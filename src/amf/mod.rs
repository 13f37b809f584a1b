//! AMF0 (Action Message Format) implementation
//!
//! AMF0 is Adobe's binary serialization format used in RTMP for encoding
//! command parameters and metadata. Values form owned trees: objects hold
//! arrays hold objects hold numbers, and so on.

pub mod amf0;
pub mod config;
pub mod marker;
pub mod value;

pub use amf0::{create_value, Amf0Decoder, Amf0Encoder};
pub use config::DecoderConfig;
pub use marker::Marker;
pub use value::{Amf0Value, Properties};
