//! Value codecs: conversion between a record's raw payload
//! and a typed [`PrimitiveValue`], one codec per value representation.
//!
//! Decoding is permissive and never fails:
//! malformed input yields a best-effort value.
//! Encoding validates the value against the rules of its VR
//! (maximum length, character set, fixed patterns, numeric range)
//! and always produces a payload of even length,
//! padded with the VR's padding byte.
//!
//! ```
//! # use dcmtree_encoding::codec::CodecRegistry;
//! # use dcmtree_core::{PrimitiveValue, VR};
//! let codecs = CodecRegistry::little_endian();
//! let ui = codecs.codec(VR::UI);
//! let bytes = ui.encode(&PrimitiveValue::from("1.2.840.10008.1.2.1"))?;
//! assert_eq!(bytes.len(), 20);
//! assert_eq!(bytes[19], 0);
//! assert_eq!(ui.decode(&bytes, 0), PrimitiveValue::from("1.2.840.10008.1.2.1"));
//!
//! // unknown type tags resolve to the pass-through codec
//! assert_eq!(codecs.resolve("XY").vr(), VR::UN);
//! # Ok::<(), dcmtree_encoding::codec::EncodeValueError>(())
//! ```

use byteordered::Endianness;
use dcmtree_core::{PrimitiveValue, VR};
use snafu::{Backtrace, Snafu};
use tracing::debug;

mod binary;
mod text;

/// An error raised when a value cannot be encoded
/// with the codec of a given value representation.
///
/// Values are never silently truncated or coerced.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum EncodeValueError {
    /// The text is longer than the VR admits.
    #[snafu(display("{} value is {} characters long, at most {} allowed", vr, len, max))]
    TooLong {
        /// the value representation
        vr: VR,
        /// the length of the offending value, in characters
        len: usize,
        /// the maximum admitted length
        max: usize,
        /// backtrace
        backtrace: Backtrace,
    },
    /// A number does not fit in the VR's numeric range.
    #[snafu(display("{} cannot represent the value {}", vr, value))]
    OutOfRange {
        /// the value representation
        vr: VR,
        /// the offending value
        value: String,
        /// backtrace
        backtrace: Backtrace,
    },
    /// The text does not follow the VR's format.
    #[snafu(display("invalid {} value {:?}: expected {}", vr, value, expected))]
    BadPattern {
        /// the value representation
        vr: VR,
        /// the offending value
        value: String,
        /// a description of the expected format
        expected: &'static str,
        /// backtrace
        backtrace: Backtrace,
    },
    /// The text has the shape of a date but is not a calendar date.
    #[snafu(display("{:?} is not a valid calendar date", value))]
    InvalidDate {
        /// the offending value
        value: String,
        /// backtrace
        backtrace: Backtrace,
    },
    /// The kind of value given cannot be encoded in this VR at all.
    #[snafu(display("{} value cannot be encoded as {}", kind, vr))]
    IncompatibleValue {
        /// the value representation
        vr: VR,
        /// the kind of value given
        kind: &'static str,
        /// backtrace
        backtrace: Backtrace,
    },
    /// The binary payload could not be written.
    #[snafu(display("could not write {} value", vr))]
    WriteValue {
        /// the value representation
        vr: VR,
        /// the underlying I/O error
        source: std::io::Error,
        /// backtrace
        backtrace: Backtrace,
    },
}

/// Alias for the result of encoding a value.
pub type Result<T, E = EncodeValueError> = std::result::Result<T, E>;

/// The codec of one value representation in one byte order.
///
/// Codecs are stateless and cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueCodec {
    vr: VR,
    endianness: Endianness,
}

impl ValueCodec {
    /// Create the codec of a value representation in the given byte order.
    pub fn new(vr: VR, endianness: Endianness) -> Self {
        ValueCodec { vr, endianness }
    }

    /// The value representation of this codec.
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// The byte order of this codec's binary numbers.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Whether the VR uses the wide length field in explicit VR encoding.
    pub fn is_wide(&self) -> bool {
        self.vr.is_wide()
    }

    /// The byte used to pad values to an even length.
    pub fn padding(&self) -> u8 {
        self.vr.padding()
    }

    /// Decode the value starting at `offset` in the given payload.
    ///
    /// An offset past the end of the payload yields an empty value.
    pub fn decode(&self, bytes: &[u8], offset: usize) -> PrimitiveValue {
        let bytes = bytes.get(offset..).unwrap_or_default();
        if bytes.is_empty() {
            return PrimitiveValue::Empty;
        }
        if text::is_text(self.vr) {
            text::decode(self.vr, bytes)
        } else {
            binary::decode(self.vr, self.endianness, bytes)
        }
    }

    /// Encode a value into a payload of even length.
    ///
    /// Sequences are framed by the tree encoder:
    /// the SQ codec only passes raw bytes through.
    pub fn encode(&self, value: &PrimitiveValue) -> Result<Vec<u8>> {
        let mut bytes = match value {
            PrimitiveValue::Empty => return Ok(Vec::new()),
            _ if text::is_text(self.vr) => text::encode(self.vr, value)?,
            _ => binary::encode(self.vr, self.endianness, value)?,
        };
        if bytes.len() % 2 == 1 {
            bytes.push(self.padding());
        }
        Ok(bytes)
    }
}

/// The registry of value codecs for one byte order.
///
/// Resolves a value representation,
/// or its two-character code, to its codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecRegistry {
    endianness: Endianness,
}

impl CodecRegistry {
    /// Create a codec registry for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        CodecRegistry { endianness }
    }

    /// Codecs for little endian data.
    pub fn little_endian() -> Self {
        Self::new(Endianness::Little)
    }

    /// Codecs for big endian data.
    pub fn big_endian() -> Self {
        Self::new(Endianness::Big)
    }

    /// The byte order of the codecs.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Retrieve the codec of the given value representation.
    pub fn codec(&self, vr: VR) -> ValueCodec {
        ValueCodec::new(vr, self.endianness)
    }

    /// Resolve a two-character type tag to its codec.
    ///
    /// Unknown type tags resolve to the pass-through codec of UN.
    pub fn resolve(&self, name: &str) -> ValueCodec {
        let vr = name.trim().parse().unwrap_or_else(|_| {
            debug!("Unknown value representation {:?}, using UN", name);
            VR::UN
        });
        self.codec(vr)
    }

    /// Iterate over the codecs of all supported value representations.
    pub fn iter(&self) -> impl Iterator<Item = ValueCodec> + '_ {
        VR::ALL.iter().map(move |vr| self.codec(*vr))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::little_endian()
    }
}

/// The name of the kind of value held, for error reporting.
fn kind_of(value: &PrimitiveValue) -> &'static str {
    match value {
        PrimitiveValue::Empty => "empty",
        PrimitiveValue::Str(_) => "text",
        PrimitiveValue::Tags(_) => "tag",
        PrimitiveValue::U8(_) => "byte",
        PrimitiveValue::I16(_) => "i16",
        PrimitiveValue::U16(_) => "u16",
        PrimitiveValue::I32(_) => "i32",
        PrimitiveValue::U32(_) => "u32",
        PrimitiveValue::I64(_) => "integer",
        PrimitiveValue::F32(_) => "f32",
        PrimitiveValue::F64(_) => "f64",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_all_value_representations() {
        let codecs = CodecRegistry::little_endian();
        assert_eq!(codecs.iter().count(), 31);
        assert_eq!(codecs.iter().filter(|c| c.is_wide()).count(), 10);
        for codec in codecs.iter() {
            assert_eq!(codecs.resolve(&codec.vr().to_string()), codec);
        }
    }

    #[test]
    fn unknown_type_tags_resolve_to_un() {
        let codecs = CodecRegistry::big_endian();
        for name in ["", "XX", "us", "SQQ", "OV"] {
            let codec = codecs.resolve(name);
            assert_eq!(codec.vr(), VR::UN);
            assert_eq!(codec.endianness(), Endianness::Big);
        }
        // pass-through
        let un = codecs.resolve("??");
        let raw = PrimitiveValue::from(vec![1_u8, 2, 3]);
        let bytes = un.encode(&raw).unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 0]);
        assert_eq!(un.decode(&bytes, 0), PrimitiveValue::from(vec![1_u8, 2, 3, 0]));
    }

    #[test]
    fn payloads_are_always_even() {
        let codecs = CodecRegistry::little_endian();
        let cases: Vec<(VR, PrimitiveValue)> = vec![
            (VR::AE, "STORESCP".into()),
            (VR::CS, "O".into()),
            (VR::LO, "abc".into()),
            (VR::PN, "Doe^John^A".into()),
            (VR::UI, "1.2.3".into()),
            (VR::UT, "x".into()),
            (VR::UR, "http://a".into()),
            (VR::OB, vec![1_u8, 2, 3, 4, 5].into()),
            (VR::UN, vec![9_u8].into()),
            (VR::US, 7_u16.into()),
            (VR::FD, 0.5_f64.into()),
        ];
        for (vr, value) in cases {
            let codec = codecs.codec(vr);
            let plain = match &value {
                PrimitiveValue::Str(s) => s.len(),
                PrimitiveValue::U8(b) => b.len(),
                _ => 0,
            };
            let bytes = codec.encode(&value).unwrap();
            assert_eq!(bytes.len() % 2, 0, "{} payload must be even", vr);
            if plain % 2 == 1 {
                assert_eq!(bytes.len(), plain + 1);
                assert_eq!(bytes[plain], vr.padding(), "{} pad byte", vr);
            }
        }
    }

    #[test]
    fn decode_with_offset() {
        let codec = CodecRegistry::little_endian().codec(VR::US);
        let bytes = [0x01, 0x00, 0x02, 0x00];
        assert_eq!(codec.decode(&bytes, 2), PrimitiveValue::from(2_u16));
        assert_eq!(codec.decode(&bytes, 4), PrimitiveValue::Empty);
        assert_eq!(codec.decode(&bytes, 10), PrimitiveValue::Empty);
    }

    #[test]
    fn empty_values_encode_to_nothing() {
        for codec in CodecRegistry::little_endian().iter() {
            assert_eq!(codec.encode(&PrimitiveValue::Empty).unwrap(), Vec::<u8>::new());
        }
    }
}
