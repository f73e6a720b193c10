//! An attribute dictionary held entirely in memory.

use crate::loader::TagPattern;
use dcmtree_core::dictionary::{DataDictionary, DictionaryEntryBuf};
use dcmtree_core::Tag;
use std::collections::{HashMap, HashSet};

/// A data dictionary owning all of its entries.
///
/// Usually built from the text resource format
/// (see [`crate::loader`]), but entries may also be inserted directly.
/// Once built, it is not expected to change.
#[derive(Debug, Default, Clone)]
pub struct InMemDataDictionary {
    entries: Vec<DictionaryEntryBuf>,
    /// mapping: tag → entry index
    by_tag: HashMap<Tag, usize>,
    /// mapping: keyword → entry index
    by_keyword: HashMap<String, usize>,
    /// repeating elements of the form (ggxx, eeee). The `xx` portion is zeroed.
    repeating_ggxx: HashSet<Tag>,
    /// repeating elements of the form (gggg, eexx). The `xx` portion is zeroed.
    repeating_eexx: HashSet<Tag>,
    skipped: usize,
}

impl InMemDataDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the given entry.
    /// An entry with the same tag or keyword replaces the previous one.
    pub fn insert(&mut self, pattern: TagPattern, entry: DictionaryEntryBuf) {
        let tag = pattern.inner();
        let index = match self.by_tag.get(&tag) {
            Some(&i) => {
                let old = std::mem::replace(&mut self.entries[i], entry);
                self.by_keyword.remove(&old.keyword);
                i
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        self.by_tag.insert(tag, index);
        let keyword = &self.entries[index].keyword;
        if !keyword.is_empty() {
            self.by_keyword.insert(keyword.clone(), index);
        }
        match pattern {
            TagPattern::Group100(tag) => {
                self.repeating_ggxx.insert(tag);
            }
            TagPattern::Element100(tag) => {
                self.repeating_eexx.insert(tag);
            }
            TagPattern::Single(_) => {}
        }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of resource lines which could not be parsed
    /// when building this dictionary.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    pub(crate) fn count_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DictionaryEntryBuf> {
        self.entries.iter()
    }

    fn index_of(&self, tag: Tag) -> Option<usize> {
        if let Some(i) = self.by_tag.get(&tag) {
            return Some(*i);
        }
        // check tags repeating in different groups
        let group_trimmed = Tag(tag.0 & 0xFF00, tag.1);
        if self.repeating_ggxx.contains(&group_trimmed) {
            return self.by_tag.get(&group_trimmed).copied();
        }
        // check tags repeating in different elements
        let elem_trimmed = Tag(tag.0, tag.1 & 0xFF00);
        if self.repeating_eexx.contains(&elem_trimmed) {
            return self.by_tag.get(&elem_trimmed).copied();
        }
        None
    }
}

impl DataDictionary for InMemDataDictionary {
    type Entry = DictionaryEntryBuf;

    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntryBuf> {
        self.index_of(tag).map(|i| &self.entries[i])
    }

    fn by_keyword(&self, keyword: &str) -> Option<&DictionaryEntryBuf> {
        self.by_keyword.get(keyword).map(|i| &self.entries[*i])
    }
}

impl Extend<(TagPattern, DictionaryEntryBuf)> for InMemDataDictionary {
    fn extend<I: IntoIterator<Item = (TagPattern, DictionaryEntryBuf)>>(&mut self, iter: I) {
        for (pattern, entry) in iter {
            self.insert(pattern, entry);
        }
    }
}

impl FromIterator<(TagPattern, DictionaryEntryBuf)> for InMemDataDictionary {
    fn from_iter<I: IntoIterator<Item = (TagPattern, DictionaryEntryBuf)>>(iter: I) -> Self {
        let mut dict = InMemDataDictionary::new();
        dict.extend(iter);
        dict
    }
}
