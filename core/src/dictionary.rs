//! This module contains the concept of a data dictionary,
//! which maps an attribute tag to a dictionary entry
//! containing its name, typical value representation and multiplicity.
//!
//! Dictionaries are read-only once built.
//! Absence of an entry is not an error:
//! callers fall back to a default value representation
//! (usually [`VR::UN`]).

use crate::header::{Tag, VR};
use std::fmt::Debug;

/// Type trait for a dictionary of attributes.
///
/// The methods herein have no generic parameters, so as to enable being
/// used as a trait object.
pub trait DataDictionary: Debug {
    /// The type of the dictionary entry.
    type Entry: DictionaryEntry;

    /// Fetch an entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;

    /// Fetch an entry by its keyword (e.g. "PatientName").
    /// Keywords are case sensitive and not separated by spaces.
    fn by_keyword(&self, keyword: &str) -> Option<&Self::Entry>;

    /// Resolve the value representation to use for the given tag
    /// when it is not present in the encoded data.
    ///
    /// Group length tags always resolve to UL.
    /// Entries with more than one possible VR (e.g. "US or SS")
    /// resolve to OW, and absent entries resolve to UN.
    fn resolve_vr(&self, tag: Tag) -> VR {
        match self.by_tag(tag) {
            Some(entry) => entry.vr().unwrap_or(VR::OW),
            None if tag.is_group_length() => VR::UL,
            None => VR::UN,
        }
    }
}

impl<D: ?Sized + DataDictionary> DataDictionary for &D {
    type Entry = D::Entry;

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        (**self).by_tag(tag)
    }

    fn by_keyword(&self, keyword: &str) -> Option<&Self::Entry> {
        (**self).by_keyword(keyword)
    }
}

impl<D: ?Sized + DataDictionary> DataDictionary for std::sync::Arc<D> {
    type Entry = D::Entry;

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        (**self).by_tag(tag)
    }

    fn by_keyword(&self, keyword: &str) -> Option<&Self::Entry> {
        (**self).by_keyword(keyword)
    }
}

/// The dictionary entry data type, describing an attribute.
pub trait DictionaryEntry {
    /// The attribute tag.
    fn tag(&self) -> Tag;
    /// The display name of the attribute, e.g. "Patient's Name".
    fn name(&self) -> &str;
    /// The keyword of the attribute, with no spaces, usually in UpperCamelCase.
    fn keyword(&self) -> &str;
    /// The value representation text as written in the dictionary,
    /// which may list alternatives (e.g. "OB or OW").
    fn vr_str(&self) -> &str;
    /// The value multiplicity, e.g. "1", "1-n", "2-2n".
    fn vm(&self) -> &str;
    /// Whether the attribute has been retired from the standard.
    fn is_retired(&self) -> bool;

    /// The value representation of the attribute,
    /// if the dictionary names exactly one.
    fn vr(&self) -> Option<VR> {
        self.vr_str().trim().parse().ok()
    }
}

/// A data type for a dictionary entry with full ownership.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryBuf {
    /// The attribute tag
    pub tag: Tag,
    /// The display name of the attribute
    pub name: String,
    /// The keyword of the attribute
    pub keyword: String,
    /// The value representation text
    pub vr: String,
    /// The value multiplicity
    pub vm: String,
    /// Whether the attribute is retired
    pub retired: bool,
}

impl DictionaryEntry for DictionaryEntryBuf {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn keyword(&self) -> &str {
        &self.keyword
    }
    fn vr_str(&self) -> &str {
        &self.vr
    }
    fn vm(&self) -> &str {
        &self.vm
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
}

/// A data type for a dictionary entry with string slices,
/// suitable for static tables.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag
    pub tag: Tag,
    /// The display name of the attribute
    pub name: &'a str,
    /// The keyword of the attribute
    pub keyword: &'a str,
    /// The value representation text
    pub vr: &'a str,
    /// The value multiplicity
    pub vm: &'a str,
    /// Whether the attribute is retired
    pub retired: bool,
}

impl<'a> DictionaryEntry for DictionaryEntryRef<'a> {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn name(&self) -> &str {
        self.name
    }
    fn keyword(&self) -> &str {
        self.keyword
    }
    fn vr_str(&self) -> &str {
        self.vr
    }
    fn vm(&self) -> &str {
        self.vm
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
}

impl<'a> From<DictionaryEntryRef<'a>> for DictionaryEntryBuf {
    fn from(e: DictionaryEntryRef<'a>) -> Self {
        DictionaryEntryBuf {
            tag: e.tag,
            name: e.name.to_owned(),
            keyword: e.keyword.to_owned(),
            vr: e.vr.to_owned(),
            vm: e.vm.to_owned(),
            retired: e.retired,
        }
    }
}

/// An empty attribute dictionary.
///
/// Every lookup misses, so implicit VR data decoded with it
/// comes out as UN.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StubDataDictionary;

impl DataDictionary for StubDataDictionary {
    type Entry = DictionaryEntryRef<'static>;

    fn by_tag(&self, _: Tag) -> Option<&DictionaryEntryRef<'static>> {
        None
    }

    fn by_keyword(&self, _: &str) -> Option<&DictionaryEntryRef<'static>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct OneEntry(DictionaryEntryRef<'static>);

    impl DataDictionary for OneEntry {
        type Entry = DictionaryEntryRef<'static>;

        fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
            Some(&self.0).filter(|e| e.tag == tag)
        }

        fn by_keyword(&self, keyword: &str) -> Option<&Self::Entry> {
            Some(&self.0).filter(|e| e.keyword == keyword)
        }
    }

    #[test]
    fn stub_resolves_unknown() {
        assert_eq!(StubDataDictionary.resolve_vr(Tag(0x0010, 0x0010)), VR::UN);
        assert_eq!(StubDataDictionary.resolve_vr(Tag(0x0018, 0x0000)), VR::UL);
    }

    #[test]
    fn ambiguous_vr_resolves_to_ow() {
        let dict = OneEntry(DictionaryEntryRef {
            tag: Tag(0x0028, 0x0106),
            name: "Smallest Image Pixel Value",
            keyword: "SmallestImagePixelValue",
            vr: "US or SS",
            vm: "1",
            retired: false,
        });
        assert_eq!(dict.resolve_vr(Tag(0x0028, 0x0106)), VR::OW);
        assert!(dict.by_keyword("SmallestImagePixelValue").is_some());
        assert_eq!((&dict).resolve_vr(Tag(0x0028, 0x0107)), VR::UN);
    }
}
