use crate::in_mem::InMemDataDictionary;
use crate::loader;
use dcmtree_core::dictionary::{DataDictionary, DictionaryEntryBuf};
use dcmtree_core::header::Tag;
use once_cell::sync::Lazy;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The built-in dictionary resource, in the line-oriented text format.
pub const STANDARD_DICTIONARY_TEXT: &str = include_str!("../dict/standard.dic");

static DICT: Lazy<InMemDataDictionary> = Lazy::new(|| loader::parse_str(STANDARD_DICTIONARY_TEXT));

/// Retrieve a singleton instance of the standard dictionary registry.
///
/// Note that one does not generally have to call this
/// unless when retrieving the underlying registry is important.
/// The unit type [`StandardDataDictionary`]
/// already provides a lazy loaded singleton implementing the necessary traits.
#[inline]
pub fn registry() -> &'static InMemDataDictionary {
    &DICT
}

/// A data element dictionary which consults
/// the library's global attribute registry.
///
/// This is the type which would generally be used
/// whenever a data element dictionary is needed,
/// such as when reading implicit VR data.
///
/// The dictionary index is automatically initialized upon the first use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    type Entry = DictionaryEntryBuf;

    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntryBuf> {
        registry().by_tag(tag)
    }

    fn by_keyword(&self, keyword: &str) -> Option<&DictionaryEntryBuf> {
        registry().by_keyword(keyword)
    }
}

impl Display for StandardDataDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard Attribute Dictionary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmtree_core::{DictionaryEntry, VR};

    // tests for just a few attributes to make sure that the entries
    // were well installed into the crate
    #[test]
    fn smoke_test() {
        let dict = StandardDataDictionary;

        assert_eq!(registry().skipped_lines(), 0);

        let patient_name = dict.by_keyword("PatientName").unwrap();
        assert_eq!(patient_name.tag(), Tag(0x0010, 0x0010));
        assert_eq!(patient_name.name(), "Patient's Name");
        assert_eq!(patient_name.vr(), Some(VR::PN));

        let seq = dict
            .by_tag(Tag(0x0008, 0x1140))
            .expect("Referenced Image Sequence should exist");
        assert_eq!(seq.keyword(), "ReferencedImageSequence");
        assert_eq!(seq.vr(), Some(VR::SQ));

        assert_eq!(dict.resolve_vr(Tag(0x0008, 0x1155)), VR::UI);
        assert_eq!(dict.resolve_vr(Tag(0x0010, 0x1010)), VR::AS);
    }

    #[test]
    fn retired_entries() {
        let dict = StandardDataDictionary;
        assert!(dict.by_keyword("DataSetType").unwrap().is_retired());
        assert!(!dict.by_keyword("Modality").unwrap().is_retired());
    }

    #[test]
    fn repeating_overlay_group() {
        let dict = StandardDataDictionary;
        let overlay_data = dict
            .by_tag(Tag(0x60EE, 0x3000))
            .expect("Repeated Overlay Data attribute should exist");
        assert_eq!(overlay_data.keyword(), "OverlayData");
        // "OB or OW"
        assert_eq!(dict.resolve_vr(Tag(0x60EE, 0x3000)), VR::OW);
    }

    #[test]
    fn group_length_and_unknown_tags() {
        let dict = StandardDataDictionary;
        assert_eq!(dict.resolve_vr(Tag(0x0002, 0x0000)), VR::UL);
        assert_eq!(dict.resolve_vr(Tag(0x7FE0, 0x0000)), VR::UL);
        assert_eq!(dict.resolve_vr(Tag(0x0009, 0x1001)), VR::UN);
    }

    #[test]
    fn tag_constants_match_entries() {
        use crate::tags::*;
        let dict = StandardDataDictionary;
        for (tag, keyword) in [
            (PATIENT_NAME, "PatientName"),
            (TRANSFER_SYNTAX_UID, "TransferSyntaxUID"),
            (REFERENCED_IMAGE_SEQUENCE, "ReferencedImageSequence"),
            (PIXEL_DATA, "PixelData"),
        ] {
            assert_eq!(dict.by_keyword(keyword).map(|e| e.tag()), Some(tag));
        }
    }
}
