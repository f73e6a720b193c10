//! Implicit VR header encoding.

use crate::encode::basic::BasicEncoder;
use crate::encode::{
    Encode, Result, WriteHeaderSnafu, WriteItemDelimiterSnafu, WriteItemHeaderSnafu,
    WriteSequenceDelimiterSnafu, WriteTagSnafu,
};
use byteordered::Endianness;
use dcmtree_core::header::{DataElementHeader, HasLength, Header};
use dcmtree_core::Tag;
use snafu::ResultExt;
use std::io::Write;

/// A record header encoder for implicit VR transfer syntaxes.
/// Every header is a tag followed by a 4-byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitVREncoder {
    basic: BasicEncoder,
}

impl ImplicitVREncoder {
    /// Create an encoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        ImplicitVREncoder {
            basic: BasicEncoder::new(endianness),
        }
    }
}

impl Default for ImplicitVREncoder {
    fn default() -> Self {
        Self::new(Endianness::Little)
    }
}

impl Encode for ImplicitVREncoder {
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        self.basic.encode_tag(to, tag).context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, mut to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, de.tag())
            .context(WriteHeaderSnafu)?;
        self.basic
            .encode_ul(&mut to, de.length().0)
            .context(WriteHeaderSnafu)?;
        Ok(8)
    }

    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, Tag::ITEM)
            .context(WriteItemHeaderSnafu)?;
        self.basic
            .encode_ul(&mut to, len)
            .context(WriteItemHeaderSnafu)
    }

    fn encode_item_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, Tag::ITEM_DELIMITER)
            .context(WriteItemDelimiterSnafu)?;
        to.write_all(&[0u8; 4]).context(WriteItemDelimiterSnafu)
    }

    fn encode_sequence_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_tag(&mut to, Tag::SEQUENCE_DELIMITER)
            .context(WriteSequenceDelimiterSnafu)?;
        to.write_all(&[0u8; 4])
            .context(WriteSequenceDelimiterSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::ImplicitVREncoder;
    use crate::encode::Encode;
    use dcmtree_core::header::{DataElementHeader, Length};
    use dcmtree_core::{Tag, VR};

    #[test]
    fn encode_implicit_headers() {
        let enc = ImplicitVREncoder::default();
        let mut out = Vec::new();
        let bytes = enc
            .encode_element_header(
                &mut out,
                DataElementHeader::new(Tag(0x0010, 0x0010), VR::PN, Length(8)),
            )
            .unwrap();
        assert_eq!(bytes, 8);
        enc.encode_element_header(
            &mut out,
            DataElementHeader::new(Tag(0x0008, 0x1140), VR::SQ, Length::UNDEFINED),
        )
        .unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x10, 0x00, 0x10, 0x00, // (0010,0010)
                0x08, 0x00, 0x00, 0x00, // Length: 8
            0x08, 0x00, 0x40, 0x11, // (0008,1140)
                0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
        ];
        assert_eq!(&out[..], expected);
    }
}
