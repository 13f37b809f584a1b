//! amf0-rs: AMF0 value model and binary codec
//!
//! This library provides:
//! - A cursor-based big-endian [`ByteBuffer`] used as the exchange medium
//! - The AMF0 value tree ([`Amf0Value`]) with insertion-ordered objects
//! - A marker-driven decoder and a recursive encoder
//!
//! AMF3, reference tables and the date/XML/typed-object/long-string markers
//! are not handled.
//!
//! # Example
//!
//! ```
//! use amf0_rs::{Amf0Decoder, Amf0Value, ByteBuffer};
//!
//! let mut info = Amf0Value::object();
//! info.put("app", "live").unwrap();
//! info.put("fpad", false).unwrap();
//!
//! let mut buf = ByteBuffer::new();
//! Amf0Value::from("connect").write(&mut buf);
//! Amf0Value::Number(1.0).write(&mut buf);
//! info.write(&mut buf);
//!
//! let values = Amf0Decoder::new().decode_all(&mut buf).unwrap();
//! assert_eq!(values[0].as_str(), Some("connect"));
//! assert_eq!(values[2].get_string("app"), Some("live"));
//! ```

pub mod amf;
pub mod buffer;
pub mod error;

// Re-export main types for convenience
pub use amf::amf0::{decode, decode_all, encode, encode_all};
pub use amf::{create_value, Amf0Decoder, Amf0Encoder, Amf0Value, DecoderConfig, Marker, Properties};
pub use buffer::ByteBuffer;
pub use error::{AmfError, BufferError, Error, Result};
