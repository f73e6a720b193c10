//! Explicit VR header encoding, in either byte order.

use crate::encode::basic::BasicEncoder;
use crate::encode::{
    Encode, LengthOverflowSnafu, Result, WriteHeaderSnafu, WriteItemDelimiterSnafu,
    WriteItemHeaderSnafu, WriteSequenceDelimiterSnafu, WriteTagSnafu,
};
use byteordered::Endianness;
use dcmtree_core::header::{DataElementHeader, HasLength, Header};
use dcmtree_core::Tag;
use snafu::{ensure, ResultExt};
use std::io::Write;

/// A record header encoder for explicit VR transfer syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplicitVREncoder {
    basic: BasicEncoder,
}

impl ExplicitVREncoder {
    /// Create an encoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        ExplicitVREncoder {
            basic: BasicEncoder::new(endianness),
        }
    }

    /// Create an encoder for explicit VR little endian,
    /// the encoding of the file meta group.
    pub fn little_endian() -> Self {
        Self::new(Endianness::Little)
    }
}

impl Default for ExplicitVREncoder {
    fn default() -> Self {
        Self::little_endian()
    }
}

impl Encode for ExplicitVREncoder {
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
        if de.tag().is_structural() {
            self.basic
                .encode_tag(&mut to, de.tag())
                .context(WriteHeaderSnafu)?;
            self.basic
                .encode_ul(&mut to, de.length().0)
                .context(WriteHeaderSnafu)?;
            return Ok(8);
        }

        let vr = de.vr();
        self.basic
            .encode_tag(&mut to, de.tag())
            .context(WriteHeaderSnafu)?;
        to.write_all(&vr.to_bytes()).context(WriteHeaderSnafu)?;

        if vr.is_wide() {
            // 2 reserved bytes, then 4 bytes for data length
            to.write_all(&[0, 0]).context(WriteHeaderSnafu)?;
            self.basic
                .encode_ul(&mut to, de.length().0)
                .context(WriteHeaderSnafu)?;
            Ok(12)
        } else {
            let len = de.length().0;
            ensure!(
                len <= u32::from(u16::MAX) && de.length().is_defined(),
                LengthOverflowSnafu {
                    tag: de.tag(),
                    vr,
                    len
                }
            );
            self.basic
                .encode_us(&mut to, len as u16)
                .context(WriteHeaderSnafu)?;
            Ok(8)
        }
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
