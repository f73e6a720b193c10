//! This module contains the recursive writer of a data set.
//!
//! The output is built in memory,
//! so that the defined lengths of sequences and items
//! can be back-patched once their content is known.
use super::{DataSet, Element, Item, Node, Sequence};
use crate::error::{
    ContentTooLongSnafu, PatchLengthSnafu, Result, WriteHeaderSnafu, WriteItemSnafu,
    WriteOutputSnafu, WriteSequenceDelimiterSnafu,
};
use byteordered::{ByteOrdered, Endianness};
use dcmtree_core::header::{DataElementHeader, HasLength, Header, Length};
use dcmtree_core::{Tag, VR};
use dcmtree_encoding::encode::Encode;
use dcmtree_encoding::transfer_syntax::{HeaderEncoder, TransferSyntax};
use snafu::{ensure, ResultExt};
use std::io::Write;

/// How sequences and items are framed when written.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum LengthMode {
    /// Keep the framing of each sequence and item:
    /// undefined lengths stay undefined,
    /// defined lengths are recomputed.
    #[default]
    AsIs,
    /// Write every sequence and item with a defined length.
    Defined,
    /// Write every sequence and item with an undefined length
    /// and a closing delimiter.
    Undefined,
}

/// The set of options for the data set writer.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
    /// the framing of sequences and items
    pub length_mode: LengthMode,
}

impl WriteOptions {
    /// Replace the length framing mode of the options.
    pub fn length_mode(mut self, length_mode: LengthMode) -> Self {
        self.length_mode = length_mode;
        self
    }
}

/// A writer of data sets in one transfer syntax.
#[derive(Debug, Clone, Copy)]
pub struct DataSetWriter {
    encoder: HeaderEncoder,
    endianness: Endianness,
    explicit_vr: bool,
    options: WriteOptions,
}

impl DataSetWriter {
    pub fn new(ts: TransferSyntax) -> Self {
        Self::with_options(ts, WriteOptions::default())
    }

    pub fn with_options(ts: TransferSyntax, options: WriteOptions) -> Self {
        DataSetWriter {
            encoder: ts.encoder(),
            endianness: ts.endianness(),
            explicit_vr: ts.is_explicit_vr(),
            options,
        }
    }

    /// Encode the data set into a new buffer.
    pub fn encode(&self, dataset: &DataSet) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_dataset(&mut out, dataset)?;
        Ok(out)
    }

    /// Encode the data set and write it to the given destination.
    pub fn write_to<W>(&self, mut to: W, dataset: &DataSet) -> Result<()>
    where
        W: Write,
    {
        let bytes = self.encode(dataset)?;
        to.write_all(&bytes).context(WriteOutputSnafu)
    }

    fn write_dataset(&self, out: &mut Vec<u8>, dataset: &DataSet) -> Result<()> {
        for node in dataset {
            self.write_node(out, node)?;
        }
        Ok(())
    }

    fn write_node(&self, out: &mut Vec<u8>, node: &Node) -> Result<()> {
        match node {
            Node::Element(e) => self.write_element(out, e),
            Node::Sequence(s) => self.write_sequence(out, s),
            Node::Item(i) => self.write_item(out, i),
        }
    }

    fn write_element(&self, out: &mut Vec<u8>, element: &Element) -> Result<()> {
        let tag = element.tag();
        let data = element.data();
        // payloads are always even
        let padded = data.len() + data.len() % 2;
        ensure!(
            padded < Length::UNDEFINED.0 as usize,
            ContentTooLongSnafu { tag, len: padded }
        );
        let header = DataElementHeader::new(tag, element.vr(), Length(padded as u32));
        self.encoder
            .encode_element_header(&mut *out, header)
            .context(WriteHeaderSnafu { tag })?;
        out.extend_from_slice(data);
        if padded > data.len() {
            out.push(element.vr().padding());
        }
        Ok(())
    }

    fn write_sequence(&self, out: &mut Vec<u8>, sequence: &Sequence) -> Result<()> {
        let tag = sequence.tag();
        // a narrow VR cannot hold a 4-byte length
        let vr = if self.explicit_vr && !sequence.vr().is_wide() {
            VR::SQ
        } else {
            sequence.vr()
        };
        // only SQ is read back as a sequence when its length is defined
        let undefined = vr != VR::SQ || self.is_undefined(sequence.length());
        let len = if undefined { Length::UNDEFINED } else { Length(0) };
        self.encoder
            .encode_element_header(&mut *out, DataElementHeader::new(tag, vr, len))
            .context(WriteHeaderSnafu { tag })?;

        let content_start = out.len();
        for child in sequence.children() {
            self.write_node(out, child)?;
        }

        if undefined {
            self.encoder
                .encode_sequence_delimiter(&mut *out)
                .context(WriteSequenceDelimiterSnafu { tag })
        } else {
            self.patch_length(out, content_start, tag)
        }
    }

    fn write_item(&self, out: &mut Vec<u8>, item: &Item) -> Result<()> {
        let undefined = self.is_undefined(item.length());
        let len = if undefined { Length::UNDEFINED } else { Length(0) };
        self.encoder
            .encode_item_header(&mut *out, len.0)
            .context(WriteItemSnafu)?;

        let content_start = out.len();
        self.write_dataset(out, item.dataset())?;

        if undefined {
            self.encoder
                .encode_item_delimiter(&mut *out)
                .context(WriteItemSnafu)
        } else {
            self.patch_length(out, content_start, Tag::ITEM)
        }
    }

    fn is_undefined(&self, len: Length) -> bool {
        match self.options.length_mode {
            LengthMode::AsIs => len.is_undefined(),
            LengthMode::Defined => false,
            LengthMode::Undefined => true,
        }
    }

    /// Write the length of the content since `content_start`
    /// into the 4 bytes right before it.
    fn patch_length(&self, out: &mut [u8], content_start: usize, tag: Tag) -> Result<()> {
        let len = out.len() - content_start;
        ensure!(
            len < Length::UNDEFINED.0 as usize,
            ContentTooLongSnafu { tag, len }
        );
        let field = &mut out[content_start - 4..content_start];
        ByteOrdered::runtime(field, self.endianness)
            .write_u32(len as u32)
            .context(PatchLengthSnafu { tag })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use dcmtree_dictionary_std::tags;

    fn referenced_images() -> DataSet {
        let mut item = DataSet::new();
        item.push(Element::new(
            tags::REFERENCED_SOP_CLASS_UID,
            VR::UI,
            b"1.2\0".to_vec(),
        ));
        let mut ds = DataSet::new();
        ds.push(Sequence::new(
            tags::REFERENCED_IMAGE_SEQUENCE,
            vec![Item::new(item)],
        ));
        ds
    }

    #[test]
    fn odd_payloads_are_padded() {
        let mut ds = DataSet::new();
        ds.push(Element::new(tags::PATIENT_NAME, VR::PN, b"Doe".to_vec()));
        ds.push(Element::new(tags::SOP_INSTANCE_UID, VR::UI, b"1.2.3".to_vec()));
        let out = DataSetWriter::new(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)
            .encode(&ds)
            .unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x10, 0x00, 0x10, 0x00, // (0010,0010) PatientName
                b'P', b'N',             // VR: PN
                0x04, 0x00,             // Length: 4
                b'D', b'o', b'e', b' ',
            0x08, 0x00, 0x18, 0x00, // (0008,0018) SOPInstanceUID
                b'U', b'I',             // VR: UI
                0x06, 0x00,             // Length: 6
                b'1', b'.', b'2', b'.', b'3', 0x00,
        ];
        assert_eq!(&out[..], expected);
    }

    #[test]
    fn defined_lengths_are_back_patched() {
        let writer = DataSetWriter::with_options(
            TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN,
            WriteOptions::default().length_mode(LengthMode::Defined),
        );
        let out = writer.encode(&referenced_images()).unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x08, 0x00, 0x40, 0x11, // (0008,1140) ReferencedImageSequence
                b'S', b'Q',             // VR: SQ
                0x00, 0x00,             // Reserved
                0x14, 0x00, 0x00, 0x00, // Length: 20
            0xFE, 0xFF, 0x00, 0xE0, // Item
                0x0C, 0x00, 0x00, 0x00, // Length: 12
            0x08, 0x00, 0x50, 0x11, // (0008,1150) ReferencedSOPClassUID
                b'U', b'I',             // VR: UI
                0x04, 0x00,             // Length: 4
                b'1', b'.', b'2', 0x00,
        ];
        assert_eq!(&out[..], expected);
    }

    #[test]
    fn undefined_lengths_are_delimited() {
        let writer = DataSetWriter::with_options(
            TransferSyntax::EXPLICIT_VR_BIG_ENDIAN,
            WriteOptions::default().length_mode(LengthMode::Undefined),
        );
        let out = writer.encode(&referenced_images()).unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x00, 0x08, 0x11, 0x40, // (0008,1140) ReferencedImageSequence
                b'S', b'Q',             // VR: SQ
                0x00, 0x00,             // Reserved
                0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
            0xFF, 0xFE, 0xE0, 0x00, // Item
                0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
            0x00, 0x08, 0x11, 0x50, // (0008,1150) ReferencedSOPClassUID
                b'U', b'I',             // VR: UI
                0x00, 0x04,             // Length: 4
                b'1', b'.', b'2', 0x00,
            0xFF, 0xFE, 0xE0, 0x0D, // Item Delimitation Item
                0x00, 0x00, 0x00, 0x00,
            0xFF, 0xFE, 0xE0, 0xDD, // Sequence Delimitation Item
                0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(&out[..], expected);
    }

    #[test]
    fn mixed_framing_is_kept_per_node() {
        let mut ds = referenced_images();
        match ds.get_mut(tags::REFERENCED_IMAGE_SEQUENCE) {
            Some(Node::Sequence(seq)) => seq.set_length(Length(0)),
            other => panic!("expected a sequence, got {:?}", other),
        }
        let out = DataSetWriter::new(TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN)
            .encode(&ds)
            .unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x08, 0x00, 0x40, 0x11, // (0008,1140) ReferencedImageSequence
                0x1C, 0x00, 0x00, 0x00, // Length: 28
            0xFE, 0xFF, 0x00, 0xE0, // Item
                0xFF, 0xFF, 0xFF, 0xFF, // Length: undefined
            0x08, 0x00, 0x50, 0x11, // (0008,1150) ReferencedSOPClassUID
                0x04, 0x00, 0x00, 0x00, // Length: 4
                b'1', b'.', b'2', 0x00,
            0xFE, 0xFF, 0x0D, 0xE0, // Item Delimitation Item
                0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(&out[..], expected);
    }

    #[test]
    fn narrow_length_overflow_is_an_error() {
        let mut ds = DataSet::new();
        ds.push(Element::new(Tag(0x0010, 0x4000), VR::LT, vec![b'x'; 70_000]));
        let res = DataSetWriter::new(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN).encode(&ds);
        assert!(matches!(res, Err(Error::WriteHeader { .. })));

        // implicit VR has room for it
        let res = DataSetWriter::new(TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN).encode(&ds);
        assert_eq!(res.unwrap().len(), 70_008);
    }
}
