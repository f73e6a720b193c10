//! Encoding then decoding whole trees,
//! in every transfer syntax and length framing.

use dcmtree_core::header::{HasLength, Header};
use dcmtree_core::{PrimitiveValue, Tag, VR};
use dcmtree_dictionary_std::{tags, StandardDataDictionary};
use dcmtree_encoding::{CodecRegistry, Endianness, TransferSyntax};
use dcmtree_parser::{
    DataSet, DataSetReader, DataSetWriter, Item, LengthMode, Node, Sequence, WriteOptions,
};
use rstest::rstest;

fn sample(codecs: &CodecRegistry) -> DataSet {
    let mut ds = DataSet::new();
    ds.put_value(tags::SOP_CLASS_UID, VR::UI, "1.2.840.10008.5.1.4.1.1.7", codecs)
        .unwrap();
    ds.put_value(tags::PATIENT_NAME, VR::PN, "Doe^John", codecs)
        .unwrap();
    ds.put_value(tags::PATIENT_AGE, VR::AS, "065Y", codecs).unwrap();
    ds.put_value(tags::ROWS, VR::US, 512_u16, codecs).unwrap();

    let items = (0..2).map(|i| {
        let mut item = DataSet::new();
        item.put_value(
            tags::REFERENCED_SOP_CLASS_UID,
            VR::UI,
            "1.2.840.10008.5.1.4.1.1.2",
            codecs,
        )
        .unwrap();
        item.put_value(
            tags::REFERENCED_SOP_INSTANCE_UID,
            VR::UI,
            format!("1.2.3.4.{}", i),
            codecs,
        )
        .unwrap();
        Item::new(item)
    });
    ds.push(Sequence::new(tags::REFERENCED_IMAGE_SEQUENCE, items));
    ds
}

/// The tags, VRs and values of a tree in depth-first order.
fn flatten(ds: &DataSet, codecs: &CodecRegistry, out: &mut Vec<(Tag, Option<VR>, PrimitiveValue)>) {
    for node in ds {
        match node {
            Node::Element(e) => out.push((e.tag(), Some(e.vr()), e.value(codecs))),
            Node::Sequence(s) => {
                out.push((s.tag(), Some(VR::SQ), PrimitiveValue::Empty));
                for item in s.items() {
                    out.push((Tag::ITEM, None, PrimitiveValue::Empty));
                    flatten(item.dataset(), codecs, out);
                }
            }
            Node::Item(i) => {
                out.push((Tag::ITEM, None, PrimitiveValue::Empty));
                flatten(i.dataset(), codecs, out);
            }
        }
    }
}

#[rstest]
fn roundtrip(
    #[values(
        TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN,
        TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN,
        TransferSyntax::EXPLICIT_VR_BIG_ENDIAN,
        TransferSyntax::new(Endianness::Big, false)
    )]
    ts: TransferSyntax,
    #[values(LengthMode::AsIs, LengthMode::Defined, LengthMode::Undefined)] mode: LengthMode,
) {
    let codecs = ts.codecs();
    let original = sample(&codecs);

    let writer = DataSetWriter::with_options(ts, WriteOptions::default().length_mode(mode));
    let bytes = writer.encode(&original).unwrap();
    assert_eq!(bytes.len() % 2, 0);

    let outcome = DataSetReader::new(ts, StandardDataDictionary).read(&bytes);
    assert!(outcome.is_complete(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.bytes_read, bytes.len() as u64);

    let mut expected = Vec::new();
    flatten(&original, &codecs, &mut expected);
    let mut decoded = Vec::new();
    flatten(&outcome.dataset, &codecs, &mut decoded);
    assert_eq!(decoded, expected);

    let seq = outcome
        .dataset
        .sequence(tags::REFERENCED_IMAGE_SEQUENCE)
        .unwrap();
    assert_eq!(seq.len(), 2);
    let undefined = mode != LengthMode::Defined;
    assert_eq!(seq.length().is_undefined(), undefined);
    for item in seq.items() {
        assert_eq!(item.length().is_undefined(), undefined);
    }

    // writing back as read reproduces the same bytes
    let again = DataSetWriter::new(ts).encode(&outcome.dataset).unwrap();
    assert_eq!(again, bytes);
}

#[test]
fn sequence_of_two_items_with_undefined_length() {
    let ts = TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN;
    let codecs = ts.codecs();
    let original = sample(&codecs);
    let writer =
        DataSetWriter::with_options(ts, WriteOptions::default().length_mode(LengthMode::Undefined));
    let bytes = writer.encode(&original).unwrap();

    // the sequence is the last record, closed by its delimiters
    #[rustfmt::skip]
    let tail: &[u8] = &[
        0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, // Item Delimitation Item
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00, // Sequence Delimitation Item
    ];
    assert!(bytes.ends_with(tail));

    let outcome = DataSetReader::new(ts, StandardDataDictionary).read(&bytes);
    assert!(outcome.is_complete());
    let seq = outcome
        .dataset
        .sequence(tags::REFERENCED_IMAGE_SEQUENCE)
        .unwrap();
    let values: Vec<_> = seq
        .items()
        .flat_map(|item| item.dataset().iter())
        .map(|node| {
            let e = node.as_element().unwrap();
            (e.tag(), e.vr(), e.value(&codecs))
        })
        .collect();
    assert_eq!(
        values,
        vec![
            (
                tags::REFERENCED_SOP_CLASS_UID,
                VR::UI,
                PrimitiveValue::from("1.2.840.10008.5.1.4.1.1.2")
            ),
            (
                tags::REFERENCED_SOP_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from("1.2.3.4.0")
            ),
            (
                tags::REFERENCED_SOP_CLASS_UID,
                VR::UI,
                PrimitiveValue::from("1.2.840.10008.5.1.4.1.1.2")
            ),
            (
                tags::REFERENCED_SOP_INSTANCE_UID,
                VR::UI,
                PrimitiveValue::from("1.2.3.4.1")
            ),
        ]
    );
}

#[rstest]
#[case(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)]
#[case(TransferSyntax::EXPLICIT_VR_BIG_ENDIAN)]
fn length_field_widths(#[case] ts: TransferSyntax) {
    let codecs = ts.codecs();
    for vr in VR::ALL.iter().copied().filter(|vr| *vr != VR::SQ) {
        let mut ds = DataSet::new();
        ds.push(dcmtree_parser::Element::new(Tag(0x0009, 0x1000), vr, vec![0; 6]));
        let bytes = DataSetWriter::new(ts).encode(&ds).unwrap();
        if codecs.codec(vr).is_wide() {
            assert_eq!(bytes.len(), 12 + 6, "{}", vr);
            assert_eq!(&bytes[6..8], &[0, 0], "{} reserved bytes", vr);
            let len = match ts.endianness() {
                Endianness::Little => u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
                Endianness::Big => u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            };
            assert_eq!(len, 6);
        } else {
            assert_eq!(bytes.len(), 8 + 6, "{}", vr);
        }
    }
}

#[test]
fn implicit_records_absent_from_the_dictionary() {
    #[rustfmt::skip]
    static RAW: &[u8] = &[
        0x11, 0x00, 0x10, 0x00, // (0011,0010) unknown
            0x03, 0x00, 0x00, 0x00, // Length: 3
            0x01, 0x02, 0x03,
    ];
    let ts = TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN;
    let outcome = DataSetReader::new(ts, StandardDataDictionary).read(RAW);
    assert!(outcome.is_complete());
    let element = outcome.dataset.element(Tag(0x0011, 0x0010)).unwrap();
    assert_eq!(element.vr(), VR::UN);
    assert_eq!(element.data(), &[1, 2, 3]);
    assert_eq!(
        element.value(&ts.codecs()),
        PrimitiveValue::from(vec![1_u8, 2, 3])
    );
}
