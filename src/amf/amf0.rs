//! AMF0 encoder and decoder
//!
//! AMF0 is the original Action Message Format used in Flash/RTMP.
//! Reference: AMF0 File Format Specification (amf0-file-format-specification.pdf)
//!
//! Supported type markers:
//! ```text
//! 0x00 - Number (IEEE 754 double)
//! 0x01 - Boolean
//! 0x02 - String (UTF-8, 16-bit length prefix)
//! 0x03 - Object (key-value pairs until 0x000009)
//! 0x05 - Null
//! 0x06 - Undefined
//! 0x08 - ECMA Array (32-bit count hint + key-value pairs until 0x000009)
//! 0x09 - Object End (only after a zero-length key)
//! 0x0A - Strict Array (32-bit count + values, no terminator)
//! ```
//!
//! The remaining AMF0 markers (reference, date, long string, XML, typed
//! object, AVM+) are recognised and rejected with
//! [`AmfError::UnsupportedMarker`].
//!
//! Decoding goes through [`Amf0Decoder::decode`], which peeks the marker and
//! hands off to the matching `read_*` method. Each `read_*` method consumes
//! and checks its own marker, so it can also be called directly when the
//! caller knows which type comes next.

use bytes::Bytes;

use super::config::DecoderConfig;
use super::marker::Marker;
use super::value::{Amf0Value, Properties};
use crate::buffer::ByteBuffer;
use crate::error::AmfError;

/// Terminator that closes Object and ECMA Array encodings
const OBJECT_END_SEQUENCE: [u8; 3] = [0x00, 0x00, Marker::ObjectEnd as u8];

/// Cap on preallocation driven by untrusted element counts
const MAX_PREALLOC: usize = 1024;

/// AMF0 decoder
pub struct Amf0Decoder {
    config: DecoderConfig,
    /// Current nesting depth
    depth: usize,
}

impl Amf0Decoder {
    /// Create a new decoder with default (strict) settings
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Create decoder with explicit lenient mode setting
    pub fn with_lenient(lenient: bool) -> Self {
        Self::with_config(DecoderConfig::default().with_lenient(lenient))
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a single AMF0 value at the buffer cursor
    ///
    /// On failure the cursor is left wherever the failing read stopped.
    pub fn decode(&mut self, buf: &mut ByteBuffer) -> Result<Amf0Value, AmfError> {
        ensure(buf, 1)?;
        let marker = buf.read_1byte();
        buf.skip(-1);
        let marker = Marker::try_from(marker)?;

        if self.depth >= self.config.max_depth {
            return Err(AmfError::NestingTooDeep);
        }
        self.depth += 1;
        let result = self.decode_value(marker, buf);
        self.depth -= 1;
        result
    }

    /// Decode all values from buffer until exhausted
    pub fn decode_all(&mut self, buf: &mut ByteBuffer) -> Result<Vec<Amf0Value>, AmfError> {
        let mut values = Vec::new();
        while !buf.empty() {
            values.push(self.decode(buf)?);
        }
        Ok(values)
    }

    fn decode_value(
        &mut self,
        marker: Marker,
        buf: &mut ByteBuffer,
    ) -> Result<Amf0Value, AmfError> {
        match marker {
            Marker::Number => self.read_number(buf).map(Amf0Value::Number),
            Marker::Boolean => self.read_boolean(buf).map(Amf0Value::Boolean),
            Marker::String => self.read_string(buf).map(Amf0Value::String),
            Marker::Object => self.read_object(buf).map(Amf0Value::Object),
            Marker::Null => self.read_null(buf).map(|_| Amf0Value::Null),
            Marker::Undefined => self.read_undefined(buf).map(|_| Amf0Value::Undefined),
            Marker::EcmaArray => self.read_ecma_array(buf).map(Amf0Value::EcmaArray),
            Marker::StrictArray => self.read_strict_array(buf).map(Amf0Value::StrictArray),
            Marker::ObjectEnd => Err(AmfError::UnexpectedObjectEnd),
            Marker::MovieClip
            | Marker::Reference
            | Marker::Date
            | Marker::LongString
            | Marker::Unsupported
            | Marker::RecordSet
            | Marker::XmlDocument
            | Marker::TypedObject
            | Marker::AvmPlus => Err(AmfError::UnsupportedMarker(marker)),
        }
    }

    pub fn read_number(&mut self, buf: &mut ByteBuffer) -> Result<f64, AmfError> {
        expect_marker(buf, Marker::Number)?;
        ensure(buf, 8)?;
        Ok(buf.read_f64())
    }

    /// Any nonzero payload byte reads as `true`
    pub fn read_boolean(&mut self, buf: &mut ByteBuffer) -> Result<bool, AmfError> {
        expect_marker(buf, Marker::Boolean)?;
        ensure(buf, 1)?;
        Ok(buf.read_1byte() != 0)
    }

    pub fn read_string(&mut self, buf: &mut ByteBuffer) -> Result<String, AmfError> {
        expect_marker(buf, Marker::String)?;
        read_utf8(buf)
    }

    pub fn read_null(&mut self, buf: &mut ByteBuffer) -> Result<(), AmfError> {
        expect_marker(buf, Marker::Null)
    }

    pub fn read_undefined(&mut self, buf: &mut ByteBuffer) -> Result<(), AmfError> {
        expect_marker(buf, Marker::Undefined)
    }

    /// Read a bare object end marker
    ///
    /// Inside containers the preceding zero-length key has already been
    /// consumed by the property loop.
    pub fn read_object_end(&mut self, buf: &mut ByteBuffer) -> Result<(), AmfError> {
        expect_marker(buf, Marker::ObjectEnd)
    }

    pub fn read_object(&mut self, buf: &mut ByteBuffer) -> Result<Properties, AmfError> {
        expect_marker(buf, Marker::Object)?;
        self.read_properties(buf)
    }

    pub fn read_ecma_array(&mut self, buf: &mut ByteBuffer) -> Result<Properties, AmfError> {
        expect_marker(buf, Marker::EcmaArray)?;
        ensure(buf, 4)?;

        // ECMA array count hint (not always accurate)
        let declared = buf.read_4bytes();
        let properties = self.read_properties(buf)?;

        if declared as usize != properties.len() {
            tracing::debug!(
                declared = declared,
                decoded = properties.len(),
                "ECMA array count hint does not match property count"
            );
        }
        Ok(properties)
    }

    pub fn read_strict_array(
        &mut self,
        buf: &mut ByteBuffer,
    ) -> Result<Vec<Amf0Value>, AmfError> {
        expect_marker(buf, Marker::StrictArray)?;
        ensure(buf, 4)?;

        let count = buf.read_4bytes() as usize;
        let mut elements = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            if buf.empty() {
                if self.config.lenient {
                    tracing::trace!(
                        declared = count,
                        decoded = elements.len(),
                        "Strict array truncated by end of input"
                    );
                    break;
                }
                return Err(AmfError::UnexpectedEof {
                    needed: 1,
                    remaining: 0,
                });
            }
            elements.push(self.decode(buf)?);
        }
        Ok(elements)
    }

    /// Property loop shared by Object and ECMA Array
    fn read_properties(&mut self, buf: &mut ByteBuffer) -> Result<Properties, AmfError> {
        let mut properties = Properties::new();

        while !buf.empty() {
            ensure(buf, 2)?;
            let len = buf.read_2bytes() as usize;

            // Empty key: object end
            if len == 0 {
                ensure(buf, 1)?;
                let end_marker = buf.read_1byte();
                if end_marker != Marker::ObjectEnd.as_u8() {
                    return Err(AmfError::InvalidObjectEnd(end_marker));
                }
                return Ok(properties);
            }

            ensure(buf, len)?;
            let key = buf
                .read_string(len)
                .map_err(|_| AmfError::InvalidUtf8)?;
            let value = self.decode(buf)?;
            properties.put(key, value);
        }

        if self.config.lenient {
            tracing::trace!(
                properties = properties.len(),
                "Object ended without object end marker"
            );
            Ok(properties)
        } else {
            Err(AmfError::MissingObjectEnd)
        }
    }
}

impl Default for Amf0Decoder {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure(buf: &ByteBuffer, needed: usize) -> Result<(), AmfError> {
    if buf.require(needed) {
        Ok(())
    } else {
        Err(AmfError::UnexpectedEof {
            needed,
            remaining: buf.remaining(),
        })
    }
}

/// Consume one byte and check it against `expected`
fn expect_marker(buf: &mut ByteBuffer, expected: Marker) -> Result<(), AmfError> {
    ensure(buf, 1)?;
    let found = buf.read_1byte();
    if found != expected.as_u8() {
        return Err(AmfError::MarkerMismatch { expected, found });
    }
    Ok(())
}

/// Read UTF-8 string with 16-bit length prefix
fn read_utf8(buf: &mut ByteBuffer) -> Result<String, AmfError> {
    ensure(buf, 2)?;
    let len = buf.read_2bytes() as usize;
    ensure(buf, len)?;
    buf.read_string(len).map_err(|_| AmfError::InvalidUtf8)
}

/// Write UTF-8 string with 16-bit length prefix (no type marker)
///
/// Lengths above 0xFFFF wrap; AMF0 short strings cannot carry them.
fn write_utf8(buf: &mut ByteBuffer, s: &str) {
    if s.len() > usize::from(u16::MAX) {
        tracing::warn!(
            len = s.len(),
            "AMF0 string exceeds 65535 bytes, length field wraps"
        );
    }
    buf.write_2bytes(s.len() as u16);
    buf.write_string(s);
}

fn write_properties(buf: &mut ByteBuffer, properties: &Properties) {
    for (key, value) in properties.iter() {
        write_utf8(buf, key);
        value.write(buf);
    }
    buf.append(&OBJECT_END_SEQUENCE);
}

impl Amf0Value {
    /// Append the AMF0 encoding of this value to `buf`
    ///
    /// [`Amf0Value::ObjectEnd`] writes the full `00 00 09` terminator.
    pub fn write(&self, buf: &mut ByteBuffer) {
        match self {
            Amf0Value::Number(n) => {
                buf.write_1byte(Marker::Number.as_u8());
                buf.write_f64(*n);
            }
            Amf0Value::Boolean(b) => {
                buf.write_1byte(Marker::Boolean.as_u8());
                buf.write_1byte(u8::from(*b));
            }
            Amf0Value::String(s) => {
                buf.write_1byte(Marker::String.as_u8());
                write_utf8(buf, s);
            }
            Amf0Value::Object(props) => {
                buf.write_1byte(Marker::Object.as_u8());
                write_properties(buf, props);
            }
            Amf0Value::Null => {
                buf.write_1byte(Marker::Null.as_u8());
            }
            Amf0Value::Undefined => {
                buf.write_1byte(Marker::Undefined.as_u8());
            }
            Amf0Value::EcmaArray(props) => {
                buf.write_1byte(Marker::EcmaArray.as_u8());
                buf.write_4bytes(props.len() as u32);
                write_properties(buf, props);
            }
            Amf0Value::StrictArray(elements) => {
                buf.write_1byte(Marker::StrictArray.as_u8());
                buf.write_4bytes(elements.len() as u32);
                for elem in elements {
                    elem.write(buf);
                }
            }
            Amf0Value::ObjectEnd => {
                buf.append(&OBJECT_END_SEQUENCE);
            }
        }
    }
}

/// AMF0 encoder
pub struct Amf0Encoder {
    buf: ByteBuffer,
}

impl Amf0Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create encoder with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: ByteBuffer::with_capacity(capacity),
        }
    }

    /// Get the encoded bytes and reset encoder
    pub fn finish(&mut self) -> Bytes {
        std::mem::take(&mut self.buf).freeze()
    }

    /// Get current encoded length
    pub fn len(&self) -> usize {
        self.buf.size()
    }

    /// Check if encoder is empty
    pub fn is_empty(&self) -> bool {
        self.buf.size() == 0
    }

    /// Encode a single AMF0 value
    pub fn encode(&mut self, value: &Amf0Value) {
        value.write(&mut self.buf);
    }

    /// Encode multiple values
    pub fn encode_all(&mut self, values: &[Amf0Value]) {
        for value in values {
            self.encode(value);
        }
    }
}

impl Default for Amf0Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode the value at the cursor, or `None` if the input is malformed
///
/// The cursor position after a failed decode is unspecified.
pub fn create_value(buf: &mut ByteBuffer) -> Option<Amf0Value> {
    match Amf0Decoder::new().decode(buf) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, pos = buf.pos(), "AMF0 decode failed");
            None
        }
    }
}

/// Convenience function to encode a single value
pub fn encode(value: &Amf0Value) -> Bytes {
    let mut encoder = Amf0Encoder::new();
    encoder.encode(value);
    encoder.finish()
}

/// Convenience function to encode multiple values
pub fn encode_all(values: &[Amf0Value]) -> Bytes {
    let mut encoder = Amf0Encoder::new();
    encoder.encode_all(values);
    encoder.finish()
}

/// Convenience function to decode a single value
pub fn decode(data: &[u8]) -> Result<Amf0Value, AmfError> {
    let mut decoder = Amf0Decoder::new();
    let mut buf = ByteBuffer::from(data);
    decoder.decode(&mut buf)
}

/// Convenience function to decode all values
pub fn decode_all(data: &[u8]) -> Result<Vec<Amf0Value>, AmfError> {
    let mut decoder = Amf0Decoder::new();
    let mut buf = ByteBuffer::from(data);
    decoder.decode_all(&mut buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: [u8; 8] = [0x3F, 0xF0, 0, 0, 0, 0, 0, 0];
    const TWO: [u8; 8] = [0x40, 0x00, 0, 0, 0, 0, 0, 0];
    const THREE: [u8; 8] = [0x40, 0x08, 0, 0, 0, 0, 0, 0];

    fn number_bytes(n: [u8; 8]) -> Vec<u8> {
        let mut v = vec![0x00];
        v.extend_from_slice(&n);
        v
    }

    fn nested_tree() -> Amf0Value {
        let mut inner = Amf0Value::object();
        inner.put("flag", true).unwrap();
        inner.put("nothing", Amf0Value::Null).unwrap();

        let mut meta = Amf0Value::ecma_array();
        meta.put("width", 1920.0).unwrap();
        meta.put("codec", "avc1").unwrap();

        let mut list = Amf0Value::strict_array();
        list.push(1.0).unwrap();
        list.push(inner).unwrap();
        list.push(Amf0Value::Undefined).unwrap();
        list.push(Amf0Value::strict_array()).unwrap();

        let mut root = Amf0Value::object();
        root.put("app", "live").unwrap();
        root.put("meta", meta).unwrap();
        root.put("list", list).unwrap();
        root.put("empty", Amf0Value::object()).unwrap();
        root
    }

    #[test]
    fn test_number_encoding() {
        let encoded = encode(&Amf0Value::Number(10.0));
        assert_eq!(
            encoded.as_ref(),
            &[0x00, 0x40, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, Amf0Value::Number(10.0));
        assert_eq!(encode(&decoded), encoded);
    }

    #[test]
    fn test_number_reencode_matches_hex() {
        let mut expect = ByteBuffer::new();
        Amf0Value::Number(10.0).write(&mut expect);

        let number = Amf0Decoder::new().read_number(&mut expect).unwrap();
        let mut actual = ByteBuffer::new();
        Amf0Value::Number(number).write(&mut actual);

        assert_eq!(format!("{:x}", actual), format!("{:x}", expect));
        assert_eq!(format!("{:x}", actual), "004024000000000000");
    }

    #[test]
    fn test_nan_roundtrip_is_bit_exact() {
        let nan = f64::from_bits(0x7FF8_0000_0000_0001);
        let encoded = encode(&Amf0Value::Number(nan));
        assert_eq!(&encoded[1..], &nan.to_bits().to_be_bytes());

        let decoded = decode(&encoded).unwrap().as_number().unwrap();
        assert!(decoded.is_nan());
        assert_eq!(decoded.to_bits(), nan.to_bits());
        assert_eq!(encode(&Amf0Value::Number(decoded)), encoded);
    }

    #[test]
    fn test_large_object_decode() {
        let mut value = Amf0Value::object();
        for i in 0..100_000 {
            value.put(format!("key{}", i), Amf0Value::Null).unwrap();
        }
        let encoded = encode(&value);

        let decoded = decode(&encoded).unwrap();
        let props = decoded.as_object().unwrap();
        assert_eq!(props.len(), 100_000);
        assert_eq!(props.key_at(0), Some("key0"));
        assert_eq!(props.key_at(99_999), Some("key99999"));
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_invalid_utf8_property_name() {
        assert_eq!(
            decode(&[0x03, 0x00, 0x01, 0xFF, 0x05, 0x00, 0x00, 0x09]),
            Err(AmfError::InvalidUtf8)
        );
    }

    #[test]
    fn test_empty_object_encoding() {
        let encoded = encode(&Amf0Value::object());
        assert_eq!(encoded.as_ref(), &[0x03, 0x00, 0x00, 0x09]);

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.as_object().map(Properties::len), Some(0));
        assert!(decoded.is_object());
    }

    #[test]
    fn test_boolean_roundtrip() {
        for b in [false, true] {
            let value = Amf0Value::Boolean(b);
            let encoded = encode(&value);
            assert_eq!(encoded.as_ref(), &[0x01, u8::from(b)]);
            assert_eq!(decode(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn test_boolean_nonzero_is_true() {
        assert_eq!(decode(&[0x01, 0x7F]).unwrap(), Amf0Value::Boolean(true));
    }

    #[test]
    fn test_string_roundtrip() {
        let value = Amf0Value::String("hello world".into());
        let encoded = encode(&value);
        assert_eq!(&encoded[..3], &[0x02, 0x00, 0x0B]);
        assert_eq!(&encoded[3..], b"hello world");
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_string_length_is_bytes() {
        let encoded = encode(&Amf0Value::from("héllo"));
        assert_eq!(&encoded[..3], &[0x02, 0x00, 0x06]);
        assert_eq!(decode(&encoded).unwrap(), Amf0Value::from("héllo"));
    }

    #[test]
    fn test_empty_string() {
        let encoded = encode(&Amf0Value::from(""));
        assert_eq!(encoded.as_ref(), &[0x02, 0x00, 0x00]);
        assert_eq!(decode(&encoded).unwrap(), Amf0Value::from(""));
    }

    #[test]
    fn test_oversized_string_length_wraps() {
        let long = "x".repeat(0x10001);
        let encoded = encode(&Amf0Value::String(long));
        assert_eq!(encoded.len(), 1 + 2 + 0x10001);
        assert_eq!(&encoded[..3], &[0x02, 0x00, 0x01]);
    }

    #[test]
    fn test_invalid_utf8_string() {
        assert_eq!(
            decode(&[0x02, 0x00, 0x02, 0xC3, 0x28]),
            Err(AmfError::InvalidUtf8)
        );
    }

    #[test]
    fn test_null_and_undefined() {
        assert_eq!(encode(&Amf0Value::Null).as_ref(), &[0x05]);
        assert_eq!(encode(&Amf0Value::Undefined).as_ref(), &[0x06]);
        assert_eq!(decode(&[0x05]).unwrap(), Amf0Value::Null);
        assert_eq!(decode(&[0x06]).unwrap(), Amf0Value::Undefined);
    }

    #[test]
    fn test_object_encoding_layout() {
        let mut value = Amf0Value::object();
        value.put("a", 1.0).unwrap();

        let mut expected = vec![0x03, 0x00, 0x01, b'a'];
        expected.extend(number_bytes(ONE));
        expected.extend_from_slice(&[0x00, 0x00, 0x09]);

        assert_eq!(encode(&value).as_ref(), expected.as_slice());
    }

    #[test]
    fn test_ecma_array_encoding_layout() {
        let mut value = Amf0Value::ecma_array();
        value.put("a", 1.0).unwrap();
        value.put("b", 2.0).unwrap();

        let mut expected = vec![0x08, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, b'a'];
        expected.extend(number_bytes(ONE));
        expected.extend_from_slice(&[0x00, 0x01, b'b']);
        expected.extend(number_bytes(TWO));
        expected.extend_from_slice(&[0x00, 0x00, 0x09]);

        let encoded = encode(&value);
        assert_eq!(encoded.as_ref(), expected.as_slice());
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_ecma_array_count_is_only_a_hint() {
        // Declares 0 entries, carries 1
        let mut data = vec![0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, b'a'];
        data.extend(number_bytes(ONE));
        data.extend_from_slice(&[0x00, 0x00, 0x09]);

        let decoded = decode(&data).unwrap();
        assert!(decoded.is_ecma_array());
        assert_eq!(decoded.get_number("a"), Some(1.0));

        // Re-encoding writes the live count
        assert_eq!(&encode(&decoded)[1..5], &[0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_strict_array_encoding_layout() {
        let value = Amf0Value::from(vec![1.0, 2.0]);

        let mut expected = vec![0x0A, 0x00, 0x00, 0x00, 0x02];
        expected.extend(number_bytes(ONE));
        expected.extend(number_bytes(TWO));

        let encoded = encode(&value);
        assert_eq!(encoded.as_ref(), expected.as_slice());
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_strict_array_requires_its_own_marker() {
        // An ECMA array marker in front of a strict array body is rejected
        let mut buf = ByteBuffer::from(&[0x08, 0x00, 0x00, 0x00, 0x00][..]);
        let err = Amf0Decoder::new().read_strict_array(&mut buf).unwrap_err();
        assert_eq!(
            err,
            AmfError::MarkerMismatch {
                expected: Marker::StrictArray,
                found: 0x08
            }
        );

        let mut buf = ByteBuffer::from(&[0x0A, 0x00, 0x00, 0x00, 0x00][..]);
        assert_eq!(
            Amf0Decoder::new().read_strict_array(&mut buf).unwrap(),
            Vec::<Amf0Value>::new()
        );
    }

    #[test]
    fn test_strict_array_short_count() {
        let mut data = vec![0x0A, 0x00, 0x00, 0x00, 0x03];
        data.extend(number_bytes(ONE));

        assert_eq!(
            decode(&data),
            Err(AmfError::UnexpectedEof {
                needed: 1,
                remaining: 0
            })
        );

        let mut buf = ByteBuffer::from(data);
        let value = Amf0Decoder::with_lenient(true).decode(&mut buf).unwrap();
        assert_eq!(value, Amf0Value::StrictArray(vec![Amf0Value::Number(1.0)]));
    }

    #[test]
    fn test_nested_roundtrip() {
        let value = nested_tree();
        let encoded = encode(&value);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(encode(&decoded), encoded);

        let keys: Vec<&str> = decoded.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["app", "meta", "list", "empty"]);
        assert_eq!(
            decoded.get("meta").and_then(|m| m.get_string("codec")),
            Some("avc1")
        );
    }

    #[test]
    fn test_decode_advances_cursor_by_encoded_length() {
        let value = nested_tree();
        let encoded = encode(&value);

        let mut buf = ByteBuffer::from(encoded.as_ref());
        buf.append(&[0x05]);

        let decoded = Amf0Decoder::new().decode(&mut buf).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(buf.pos(), encoded.len());
        assert_eq!(buf.unread(), &[0x05]);
    }

    #[test]
    fn test_truncated_input_always_fails() {
        let mut values = vec![
            Amf0Value::Number(3.5),
            Amf0Value::Boolean(true),
            Amf0Value::from("truncate me"),
            nested_tree(),
        ];
        values.push(Amf0Value::from(vec![nested_tree(), Amf0Value::Null]));

        for value in &values {
            let encoded = encode(value);
            for cut in 0..encoded.len() {
                let mut buf = ByteBuffer::from(&encoded[..cut]);
                let result = Amf0Decoder::new().decode(&mut buf);
                assert!(
                    result.is_err(),
                    "prefix of {} bytes decoded: {:?}",
                    cut,
                    result
                );
                assert!(buf.pos() <= cut);
            }
        }
    }

    #[test]
    fn test_missing_terminator_strict_and_lenient() {
        let mut data = vec![0x03, 0x00, 0x01, b'a'];
        data.extend(number_bytes(ONE));

        assert_eq!(decode(&data), Err(AmfError::MissingObjectEnd));

        let mut buf = ByteBuffer::from(data.as_slice());
        let value = Amf0Decoder::with_lenient(true).decode(&mut buf).unwrap();
        assert_eq!(value.get_number("a"), Some(1.0));
        assert!(buf.empty());

        // Zero-length key with nothing after it fails in both modes
        let mut buf = ByteBuffer::from(&[0x03, 0x00, 0x00][..]);
        assert!(Amf0Decoder::with_lenient(true).decode(&mut buf).is_err());
    }

    #[test]
    fn test_marker_mismatch() {
        let mut buf = ByteBuffer::from(&[0x01, 0x01][..]);
        let err = Amf0Decoder::new().read_number(&mut buf).unwrap_err();
        assert_eq!(
            err,
            AmfError::MarkerMismatch {
                expected: Marker::Number,
                found: 0x01
            }
        );
    }

    #[test]
    fn test_per_variant_readers() {
        let mut decoder = Amf0Decoder::new();

        let mut buf = ByteBuffer::from(encode(&Amf0Value::from("abc")));
        assert_eq!(decoder.read_string(&mut buf).unwrap(), "abc");

        let mut buf = ByteBuffer::from(&[0x05, 0x06, 0x09][..]);
        decoder.read_null(&mut buf).unwrap();
        decoder.read_undefined(&mut buf).unwrap();
        decoder.read_object_end(&mut buf).unwrap();
        assert!(buf.empty());

        let mut buf = ByteBuffer::from(&[0x06][..]);
        assert!(decoder.read_null(&mut buf).is_err());

        let mut buf = ByteBuffer::from(encode(&nested_tree()));
        let props = decoder.read_object(&mut buf).unwrap();
        assert_eq!(props.len(), 4);

        let mut buf = ByteBuffer::from(&[0x03, 0x00, 0x00, 0x09][..]);
        assert!(decoder.read_ecma_array(&mut buf).is_err());
    }

    #[test]
    fn test_invalid_object_end() {
        assert_eq!(
            decode(&[0x03, 0x00, 0x00, 0x02]),
            Err(AmfError::InvalidObjectEnd(0x02))
        );
        assert_eq!(
            decode(&[0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05]),
            Err(AmfError::InvalidObjectEnd(0x05))
        );

        let mut buf = ByteBuffer::from(&[0x03, 0x00, 0x00, 0x02][..]);
        assert_eq!(
            Amf0Decoder::with_lenient(true).decode(&mut buf),
            Err(AmfError::InvalidObjectEnd(0x02))
        );
    }

    #[test]
    fn test_duplicate_put_encode_order() {
        let mut value = Amf0Value::object();
        value.put("a", 1.0).unwrap();
        value.put("b", 2.0).unwrap();
        value.put("a", 3.0).unwrap();

        let mut expected = vec![0x03, 0x00, 0x01, b'b'];
        expected.extend(number_bytes(TWO));
        expected.extend_from_slice(&[0x00, 0x01, b'a']);
        expected.extend(number_bytes(THREE));
        expected.extend_from_slice(&[0x00, 0x00, 0x09]);

        assert_eq!(encode(&value).as_ref(), expected.as_slice());
    }

    #[test]
    fn test_duplicate_key_on_the_wire() {
        let mut data = vec![0x03, 0x00, 0x01, b'a'];
        data.extend(number_bytes(ONE));
        data.extend_from_slice(&[0x00, 0x01, b'b']);
        data.extend(number_bytes(TWO));
        data.extend_from_slice(&[0x00, 0x01, b'a']);
        data.extend(number_bytes(THREE));
        data.extend_from_slice(&[0x00, 0x00, 0x09]);

        let decoded = decode(&data).unwrap();
        let props = decoded.as_object().unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(props.get("a"), Some(&Amf0Value::Number(3.0)));
    }

    #[test]
    fn test_unknown_and_unsupported_markers() {
        assert_eq!(decode(&[0x12]), Err(AmfError::UnknownMarker(0x12)));
        assert_eq!(
            decode(&[0x0B, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(AmfError::UnsupportedMarker(Marker::Date))
        );
        assert_eq!(
            decode(&[0x07, 0x00, 0x00]),
            Err(AmfError::UnsupportedMarker(Marker::Reference))
        );
        assert_eq!(decode(&[0x09]), Err(AmfError::UnexpectedObjectEnd));
    }

    #[test]
    fn test_unknown_marker_leaves_cursor() {
        let mut buf = ByteBuffer::from(&[0xFF][..]);
        assert!(Amf0Decoder::new().decode(&mut buf).is_err());
        assert_eq!(buf.pos(), 0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            decode(&[]),
            Err(AmfError::UnexpectedEof {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn test_create_value() {
        let mut buf = ByteBuffer::from(&[0x05, 0x12][..]);
        assert_eq!(create_value(&mut buf), Some(Amf0Value::Null));
        assert_eq!(create_value(&mut buf), None);

        let mut buf = ByteBuffer::new();
        assert_eq!(create_value(&mut buf), None);
    }

    #[test]
    fn test_nesting_limit() {
        let mut value = Amf0Value::object();
        for _ in 0..3 {
            let mut outer = Amf0Value::object();
            outer.put("child", value).unwrap();
            value = outer;
        }
        let encoded = encode(&value);

        let config = DecoderConfig::default().max_depth(3);
        let mut decoder = Amf0Decoder::with_config(config);
        let mut buf = ByteBuffer::from(encoded.as_ref());
        assert_eq!(decoder.decode(&mut buf), Err(AmfError::NestingTooDeep));

        // Depth is unwound after the failure
        let mut buf = ByteBuffer::from(&[0x05][..]);
        assert_eq!(decoder.decode(&mut buf), Ok(Amf0Value::Null));

        let mut decoder = Amf0Decoder::with_config(DecoderConfig::default().max_depth(4));
        let mut buf = ByteBuffer::from(encoded.as_ref());
        assert_eq!(decoder.decode(&mut buf), Ok(value));
    }

    #[test]
    fn test_object_end_value() {
        let encoded = encode(&Amf0Value::ObjectEnd);
        assert_eq!(encoded.as_ref(), &[0x00, 0x00, 0x09]);
    }

    #[test]
    fn test_multiple_values() {
        let mut command_object = Amf0Value::object();
        command_object.put("app", "live").unwrap();
        command_object.put("tcUrl", "rtmp://localhost/live").unwrap();

        let values = vec![
            Amf0Value::String("connect".into()),
            Amf0Value::Number(1.0),
            command_object,
            Amf0Value::Null,
        ];

        let encoded = encode_all(&values);
        let decoded = decode_all(&encoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_encoder_finish_resets() {
        let mut encoder = Amf0Encoder::default();
        assert!(encoder.is_empty());

        encoder.encode(&Amf0Value::Null);
        assert_eq!(encoder.len(), 1);
        assert_eq!(encoder.finish().as_ref(), &[0x05]);
        assert!(encoder.is_empty());

        encoder.encode(&Amf0Value::Undefined);
        assert_eq!(encoder.finish().as_ref(), &[0x06]);
    }

    #[test]
    fn test_write_appends_to_buffer() {
        let mut buf = ByteBuffer::from(&[0xAA][..]);
        Amf0Value::Boolean(false).write(&mut buf);
        assert_eq!(buf.as_bytes(), &[0xAA, 0x01, 0x00]);
    }
}
