//! Explicit VR header decoding, in either byte order.

use crate::decode::basic::BasicDecoder;
use crate::decode::{
    BadSequenceHeaderSnafu, Decode, ReadHeaderTagSnafu, ReadItemHeaderSnafu, ReadItemLengthSnafu,
    ReadLengthSnafu, ReadReservedSnafu, ReadTagSnafu, ReadVrSnafu, Result,
};
use byteordered::Endianness;
use dcmtree_core::header::{DataElementHeader, Length, SequenceItemHeader};
use dcmtree_core::{Tag, VR};
use snafu::ResultExt;
use std::io::Read;
use tracing::warn;

/// A record header decoder for explicit VR transfer syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplicitVRDecoder {
    basic: BasicDecoder,
}

impl ExplicitVRDecoder {
    /// Create a decoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        ExplicitVRDecoder {
            basic: BasicDecoder::new(endianness),
        }
    }

    /// Create a decoder for explicit VR little endian,
    /// the encoding of the file meta group.
    pub fn little_endian() -> Self {
        Self::new(Endianness::Little)
    }

    /// The byte order of this decoder.
    pub fn endianness(&self) -> Endianness {
        self.basic.endianness()
    }
}

impl Default for ExplicitVRDecoder {
    fn default() -> Self {
        Self::little_endian()
    }
}

impl Decode for ExplicitVRDecoder {
    fn decode_header<S>(&self, mut source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        // retrieve tag
        let tag = self
            .basic
            .decode_tag(&mut source)
            .context(ReadHeaderTagSnafu)?;

        if tag.is_structural() {
            // item delimiters do not have VR or reserved field
            let len = self
                .basic
                .decode_ul(&mut source)
                .context(ReadItemLengthSnafu)?;
            return Ok((
                DataElementHeader::new(tag, VR::UN, Length(len)),
                8, // tag + len
            ));
        }

        // retrieve explicit VR
        let mut buf = [0u8; 2];
        source.read_exact(&mut buf).context(ReadVrSnafu)?;
        let vr = VR::from_binary(buf);

        match vr {
            Some(vr) if vr.is_wide() => {
                // read 2 reserved bytes, then 4 bytes for data length
                source.read_exact(&mut buf).context(ReadReservedSnafu)?;
                let len = self
                    .basic
                    .decode_ul(&mut source)
                    .context(ReadLengthSnafu)?;
                Ok((DataElementHeader::new(tag, vr, Length(len)), 12))
            }
            _ => {
                if vr.is_none() {
                    warn!(
                        "Unrecognized VR {:?} in {}, reading it as UN",
                        String::from_utf8_lossy(&buf),
                        tag
                    );
                }
                // read 2 bytes for the data length
                let len = self
                    .basic
                    .decode_us(&mut source)
                    .context(ReadLengthSnafu)?;
                Ok((
                    DataElementHeader::new(tag, vr.unwrap_or(VR::UN), Length(u32::from(len))),
                    8,
                ))
            }
        }
    }

    fn decode_item_header<S>(&self, mut source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut source)
            .context(ReadItemHeaderSnafu)?;
        let len = self
            .basic
            .decode_ul(&mut source)
            .context(ReadItemHeaderSnafu)?;
        SequenceItemHeader::new(tag, Length(len)).context(BadSequenceHeaderSnafu)
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        self.basic.decode_tag(source).context(ReadTagSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRDecoder;
    use crate::decode::Decode;
    use byteordered::Endianness;
    use dcmtree_core::header::{HasLength, Header, Length, SequenceItemHeader};
    use dcmtree_core::{Tag, VR};
    use std::io::{Cursor, Seek, SeekFrom};

    // manually crafting some records
    #[rustfmt::skip]
    const RAW_LE: &[u8] = &[
        0x02, 0x00, 0x02, 0x00,     // (0002,0002) (LE) Media Storage SOP Class UID
            b'U', b'I',             // VR: UI (UID)
            0x1A, 0x00,             // Length: 26 bytes (LE)
                // UID: 1.2.840.10008.5.1.4.1.1.1
                b'1', b'.', b'2', b'.', b'8', b'4', b'0', b'.', b'1', b'0', b'0', b'0', b'8', b'.',
                b'5', b'.', b'1', b'.', b'4', b'.', b'1', b'.', b'1', b'.', b'1',
                0x00,               // Padding to make length even
        0x08, 0x00, 0x1B, 0x04,     // (0008,041B) (LE) RecordKey
            b'O', b'B',             // VR: OB (Other Byte)
            0x00, 0x00,             // Reserved, always 0
            0x02, 0x00, 0x00, 0x00, // Length: 2 bytes (LE)
                0x12, 0x34,
        0x08, 0x00, 0x40, 0x11,     // (0008,1140) (LE) Referenced Image Sequence
            b'S', b'Q',             // VR: SQ
            0x00, 0x00,             // Reserved, always 0
            0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
        0xFE, 0xFF, 0x00, 0xE0,     // (FFFE,E000) Item
            0x00, 0x00, 0x00, 0x00, // Length: 0
        0xFE, 0xFF, 0xDD, 0xE0,     // (FFFE,E0DD) Sequence Delimitation Item
            0x00, 0x00, 0x00, 0x00, // Length: 0
    ];

    #[test]
    fn decode_data_elements_le() {
        let dec = ExplicitVRDecoder::default();
        let mut cursor = Cursor::new(RAW_LE);
        {
            let (elem, bytes_read) = dec
                .decode_header(&mut cursor)
                .expect("should find an element");
            assert_eq!(elem.tag(), Tag(2, 2));
            assert_eq!(elem.vr(), VR::UI);
            assert_eq!(elem.length(), Length(26));
            assert_eq!(bytes_read, 8);
            // read only half of the value data
            let mut buffer = [0; 13];
            std::io::Read::read_exact(&mut cursor, &mut buffer).unwrap();
            assert_eq!(&buffer, b"1.2.840.10008");
        }
        // cursor should now be @ #21 (there is no automatic skipping)
        assert_eq!(cursor.seek(SeekFrom::Current(0)).unwrap(), 21);
        // cursor should now be @ #34 after skipping
        assert_eq!(cursor.seek(SeekFrom::Current(13)).unwrap(), 34);
        {
            let (elem, bytes_read) = dec.decode_header(&mut cursor).unwrap();
            assert_eq!(elem.tag(), Tag(0x0008, 0x041B));
            assert_eq!(elem.vr(), VR::OB);
            assert_eq!(elem.length(), Length(2));
            assert_eq!(bytes_read, 12);
        }
        cursor.seek(SeekFrom::Current(2)).unwrap();
        {
            let (elem, _) = dec.decode_header(&mut cursor).unwrap();
            assert_eq!(elem.tag(), Tag(0x0008, 0x1140));
            assert_eq!(elem.vr(), VR::SQ);
            assert!(elem.length().is_undefined());
        }
        {
            let (elem, bytes_read) = dec.decode_header(&mut cursor).unwrap();
            assert!(elem.is_item());
            assert_eq!(elem.length(), Length(0));
            assert_eq!(bytes_read, 8);
        }
        {
            let item = dec.decode_item_header(&mut cursor).unwrap();
            assert_eq!(item, SequenceItemHeader::SequenceDelimiter);
        }
    }

    #[rustfmt::skip]
    const RAW_BE: &[u8] = &[
        0x00, 0x10, 0x10, 0x10,     // (0010,1010) (BE) Patient's Age
            b'A', b'S',             // VR: AS
            0x00, 0x04,             // Length: 4 bytes (BE)
                b'0', b'6', b'5', b'Y',
        0x7F, 0xE0, 0x00, 0x10,     // (7FE0,0010) (BE) Pixel Data
            b'O', b'W',             // VR: OW
            0x00, 0x00,             // Reserved, always 0
            0x00, 0x00, 0x00, 0x04, // Length: 4 bytes (BE)
                0x12, 0x34, 0x56, 0x78,
    ];

    #[test]
    fn decode_data_elements_be() {
        let dec = ExplicitVRDecoder::new(Endianness::Big);
        let mut cursor = Cursor::new(RAW_BE);
        let (elem, bytes_read) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x0010, 0x1010));
        assert_eq!(elem.vr(), VR::AS);
        assert_eq!(elem.length(), Length(4));
        assert_eq!(bytes_read, 8);
        cursor.seek(SeekFrom::Current(4)).unwrap();
        let (elem, bytes_read) = dec.decode_header(&mut cursor).unwrap();
        assert_eq!(elem.tag(), Tag(0x7FE0, 0x0010));
        assert_eq!(elem.vr(), VR::OW);
        assert_eq!(elem.length(), Length(4));
        assert_eq!(bytes_read, 12);
    }

    #[test]
    fn unknown_vr_is_read_as_narrow_un() {
        #[rustfmt::skip]
        let raw: &[u8] = &[
            0x09, 0x00, 0x01, 0x10, // (0009,1001) (LE)
            b'Z', b'Z',             // VR: unknown
            0x02, 0x00,             // Length: 2 bytes (LE)
            0xAB, 0xCD,
        ];
        let dec = ExplicitVRDecoder::default();
        let (elem, bytes_read) = dec.decode_header(&mut Cursor::new(raw)).unwrap();
        assert_eq!(elem.vr(), VR::UN);
        assert_eq!(elem.length(), Length(2));
        assert_eq!(bytes_read, 8);
    }

    #[test]
    fn truncated_header_fails() {
        let dec = ExplicitVRDecoder::default();
        assert!(dec.decode_header(&mut Cursor::new(&RAW_LE[..6])).is_err());
        assert!(dec.decode_header(&mut Cursor::new(&RAW_LE[34..42])).is_err());
    }
}
