//! Transfer syntax specifiers.
//!
//! A [`TransferSyntax`] fixes the two axes of the record grammar:
//! the byte order of binary numbers,
//! and whether the value representation is carried on the wire
//! (explicit VR) or resolved through a data dictionary (implicit VR).
//! From it one obtains the matching header decoder and encoder,
//! as well as the registry of value codecs in its byte order.
//!
//! Only the native transfer syntaxes are supported.
//! Deflated and encapsulated transfer syntaxes are recognized
//! so that they can be reported as such.

use crate::codec::CodecRegistry;
use crate::decode::{self, Decode, ExplicitVRDecoder, ImplicitVRDecoder};
use crate::encode::{self, Encode, ExplicitVREncoder, ImplicitVREncoder};
use dcmtree_core::dictionary::DataDictionary;
use dcmtree_core::header::{DataElementHeader, SequenceItemHeader};
use dcmtree_core::Tag;
use snafu::{Backtrace, Snafu};
use std::fmt;
use std::io::{Read, Write};

pub use byteordered::Endianness;

const IMPLICIT_VR_LE_UID: &str = "1.2.840.10008.1.2";
const EXPLICIT_VR_LE_UID: &str = "1.2.840.10008.1.2.1";
const DEFLATED_EXPLICIT_VR_LE_UID: &str = "1.2.840.10008.1.2.1.99";
const EXPLICIT_VR_BE_UID: &str = "1.2.840.10008.1.2.2";

/// An error raised when resolving a transfer syntax by UID.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum TransferSyntaxError {
    /// The transfer syntax is known, but requires a codec
    /// (deflate or pixel data encapsulation) which is not available.
    #[snafu(display("Unsupported transfer syntax {}", uid))]
    Unsupported { uid: String, backtrace: Backtrace },
    /// The UID does not identify a known transfer syntax.
    #[snafu(display("Unknown transfer syntax {:?}", uid))]
    Unknown { uid: String, backtrace: Backtrace },
}

/// A native transfer syntax: a byte order and a VR explicitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferSyntax {
    endianness: Endianness,
    explicit_vr: bool,
}

impl TransferSyntax {
    /// Implicit VR Little Endian, the default transfer syntax.
    pub const IMPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax {
        endianness: Endianness::Little,
        explicit_vr: false,
    };

    /// Explicit VR Little Endian,
    /// also used for the file meta group.
    pub const EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax {
        endianness: Endianness::Little,
        explicit_vr: true,
    };

    /// Explicit VR Big Endian (retired).
    pub const EXPLICIT_VR_BIG_ENDIAN: TransferSyntax = TransferSyntax {
        endianness: Endianness::Big,
        explicit_vr: true,
    };

    /// Create a transfer syntax from its two parameters.
    ///
    /// Implicit VR big endian has no UID of its own,
    /// but is still a valid combination for the codec.
    pub fn new(endianness: Endianness, explicit_vr: bool) -> Self {
        TransferSyntax {
            endianness,
            explicit_vr,
        }
    }

    /// Resolve a transfer syntax by its UID.
    ///
    /// Trailing null or space padding in `uid` is ignored.
    pub fn from_uid(uid: &str) -> Result<Self, TransferSyntaxError> {
        let uid = uid.trim_end_matches(|c| c == '\0' || c == ' ').trim();
        match uid {
            IMPLICIT_VR_LE_UID => Ok(Self::IMPLICIT_VR_LITTLE_ENDIAN),
            EXPLICIT_VR_LE_UID => Ok(Self::EXPLICIT_VR_LITTLE_ENDIAN),
            EXPLICIT_VR_BE_UID => Ok(Self::EXPLICIT_VR_BIG_ENDIAN),
            DEFLATED_EXPLICIT_VR_LE_UID => UnsupportedSnafu { uid }.fail(),
            // JPEG, JPEG-LS, JPEG 2000, MPEG, HEVC and RLE encapsulations
            _ if uid.starts_with("1.2.840.10008.1.2.4.") || uid == "1.2.840.10008.1.2.5" => {
                UnsupportedSnafu { uid }.fail()
            }
            _ => UnknownSnafu { uid }.fail(),
        }
    }

    /// The UID of this transfer syntax,
    /// or `None` for implicit VR big endian.
    pub fn uid(&self) -> Option<&'static str> {
        match (self.endianness, self.explicit_vr) {
            (Endianness::Little, false) => Some(IMPLICIT_VR_LE_UID),
            (Endianness::Little, true) => Some(EXPLICIT_VR_LE_UID),
            (Endianness::Big, true) => Some(EXPLICIT_VR_BE_UID),
            (Endianness::Big, false) => None,
        }
    }

    /// A human readable name of this transfer syntax.
    pub fn name(&self) -> &'static str {
        match (self.endianness, self.explicit_vr) {
            (Endianness::Little, false) => "Implicit VR Little Endian",
            (Endianness::Little, true) => "Explicit VR Little Endian",
            (Endianness::Big, true) => "Explicit VR Big Endian",
            (Endianness::Big, false) => "Implicit VR Big Endian",
        }
    }

    /// The byte order of binary numbers.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Whether value representations are written in record headers.
    pub fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// The value codecs in this transfer syntax' byte order.
    pub fn codecs(&self) -> CodecRegistry {
        CodecRegistry::new(self.endianness)
    }

    /// Obtain a record header decoder for this transfer syntax.
    ///
    /// The dictionary is only consulted in implicit VR mode.
    pub fn decoder<D>(&self, dict: D) -> HeaderDecoder<D>
    where
        D: DataDictionary,
    {
        if self.explicit_vr {
            HeaderDecoder::Explicit(ExplicitVRDecoder::new(self.endianness))
        } else {
            HeaderDecoder::Implicit(ImplicitVRDecoder::new(self.endianness, dict))
        }
    }

    /// Obtain a record header encoder for this transfer syntax.
    pub fn encoder(&self) -> HeaderEncoder {
        if self.explicit_vr {
            HeaderEncoder::Explicit(ExplicitVREncoder::new(self.endianness))
        } else {
            HeaderEncoder::Implicit(ImplicitVREncoder::new(self.endianness))
        }
    }
}

impl Default for TransferSyntax {
    fn default() -> Self {
        Self::IMPLICIT_VR_LITTLE_ENDIAN
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The header decoder of a transfer syntax,
/// chosen at run time.
#[derive(Debug, Clone)]
pub enum HeaderDecoder<D> {
    /// explicit VR, in either byte order
    Explicit(ExplicitVRDecoder),
    /// implicit VR, resolving VRs through a dictionary
    Implicit(ImplicitVRDecoder<D>),
}

impl<D> Decode for HeaderDecoder<D>
where
    D: DataDictionary,
{
    fn decode_header<S>(&self, source: &mut S) -> decode::Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        match self {
            HeaderDecoder::Explicit(d) => d.decode_header(source),
            HeaderDecoder::Implicit(d) => d.decode_header(source),
        }
    }

    fn decode_item_header<S>(&self, source: &mut S) -> decode::Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        match self {
            HeaderDecoder::Explicit(d) => d.decode_item_header(source),
            HeaderDecoder::Implicit(d) => d.decode_item_header(source),
        }
    }

    fn decode_tag<S>(&self, source: &mut S) -> decode::Result<Tag>
    where
        S: ?Sized + Read,
    {
        match self {
            HeaderDecoder::Explicit(d) => d.decode_tag(source),
            HeaderDecoder::Implicit(d) => d.decode_tag(source),
        }
    }
}

/// The header encoder of a transfer syntax,
/// chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderEncoder {
    /// explicit VR, in either byte order
    Explicit(ExplicitVREncoder),
    /// implicit VR
    Implicit(ImplicitVREncoder),
}

impl Encode for HeaderEncoder {
    fn encode_tag<W>(&self, to: W, tag: Tag) -> encode::Result<()>
    where
        W: Write,
    {
        match self {
            HeaderEncoder::Explicit(e) => e.encode_tag(to, tag),
            HeaderEncoder::Implicit(e) => e.encode_tag(to, tag),
        }
    }

    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> encode::Result<usize>
    where
        W: Write,
    {
        match self {
            HeaderEncoder::Explicit(e) => e.encode_element_header(to, de),
            HeaderEncoder::Implicit(e) => e.encode_element_header(to, de),
        }
    }

    fn encode_item_header<W>(&self, to: W, len: u32) -> encode::Result<()>
    where
        W: Write,
    {
        match self {
            HeaderEncoder::Explicit(e) => e.encode_item_header(to, len),
            HeaderEncoder::Implicit(e) => e.encode_item_header(to, len),
        }
    }

    fn encode_item_delimiter<W>(&self, to: W) -> encode::Result<()>
    where
        W: Write,
    {
        match self {
            HeaderEncoder::Explicit(e) => e.encode_item_delimiter(to),
            HeaderEncoder::Implicit(e) => e.encode_item_delimiter(to),
        }
    }

    fn encode_sequence_delimiter<W>(&self, to: W) -> encode::Result<()>
    where
        W: Write,
    {
        match self {
            HeaderEncoder::Explicit(e) => e.encode_sequence_delimiter(to),
            HeaderEncoder::Implicit(e) => e.encode_sequence_delimiter(to),
        }
    }
}
