//! Stacking of one dictionary on top of another.

use dcmtree_core::dictionary::DataDictionary;
use dcmtree_core::Tag;

/// A data dictionary which consults an overlay dictionary first,
/// then falls back to a base dictionary.
///
/// This is the usual way to add private attributes
/// to the standard dictionary:
///
/// ```
/// # use dcmtree_dictionary_std::{loader, LayeredDictionary, StandardDataDictionary};
/// # use dcmtree_core::{DataDictionary, Tag, VR};
/// let private = loader::parse_str("(0009,1001)\tVendor Flag\tVendorFlag\tCS\t1\n");
/// let dict = LayeredDictionary::new(private, StandardDataDictionary);
/// assert_eq!(dict.resolve_vr(Tag(0x0009, 0x1001)), VR::CS);
/// assert_eq!(dict.resolve_vr(Tag(0x0010, 0x0010)), VR::PN);
/// ```
#[derive(Debug, Clone)]
pub struct LayeredDictionary<O, B> {
    overlay: O,
    base: B,
}

impl<O, B> LayeredDictionary<O, B> {
    /// Stack `overlay` on top of `base`.
    pub fn new(overlay: O, base: B) -> Self {
        LayeredDictionary { overlay, base }
    }

    /// Retrieve the overlay dictionary.
    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Retrieve the base dictionary.
    pub fn base(&self) -> &B {
        &self.base
    }
}

impl<O, B> DataDictionary for LayeredDictionary<O, B>
where
    O: DataDictionary,
    B: DataDictionary<Entry = O::Entry>,
{
    type Entry = O::Entry;

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        self.overlay.by_tag(tag).or_else(|| self.base.by_tag(tag))
    }

    fn by_keyword(&self, keyword: &str) -> Option<&Self::Entry> {
        self.overlay
            .by_keyword(keyword)
            .or_else(|| self.base.by_keyword(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader, StandardDataDictionary};
    use dcmtree_core::{DictionaryEntry, VR};

    #[test]
    fn overlay_shadows_base() {
        let overlay = loader::parse_str("(0010,0010)\tAlias Name\tAliasName\tLO\t1\n");
        let dict = LayeredDictionary::new(overlay, StandardDataDictionary);
        assert_eq!(dict.resolve_vr(Tag(0x0010, 0x0010)), VR::LO);
        assert_eq!(
            dict.by_keyword("PatientName").map(|e| e.tag()),
            Some(Tag(0x0010, 0x0010))
        );
        assert_eq!(dict.by_keyword("AliasName").map(|e| e.name()), Some("Alias Name"));
        assert_eq!(dict.resolve_vr(Tag(0x0011, 0x0001)), VR::UN);
    }
}
