//! The composite tree of a data set.
//!
//! A [`DataSet`] is an ordered list of [`Node`]s.
//! Leaf records are [`Element`]s holding their raw payload,
//! a [`Sequence`] holds [`Item`]s,
//! and each item holds a nested data set.
//! Wire order is preserved throughout.
//!
//! Sequences and items remember the length framing they were read with
//! (a defined byte count or the undefined length),
//! so that they can be written back the same way.
use crate::error::{EncodeValueSnafu, Result};
use dcmtree_core::header::{DataElementHeader, HasLength, Header, Length};
use dcmtree_core::{PrimitiveValue, Tag, VR};
use dcmtree_encoding::codec::CodecRegistry;
use snafu::ResultExt;
use std::slice;

pub mod read;
pub mod write;

pub use self::read::{DataSetReader, Diagnostic, DiagnosticKind, ParseOutcome, ReadOptions};
pub use self::write::{DataSetWriter, LengthMode, WriteOptions};

/// A node of the composite tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// a leaf record
    Element(Element),
    /// a sequence of items
    Sequence(Sequence),
    /// an item, which only appears directly in a data set
    /// when the input was not well formed
    Item(Item),
}

impl Node {
    /// The tag of the node.
    /// Items report the item tag (FFFE,E000).
    pub fn tag(&self) -> Tag {
        match self {
            Node::Element(e) => e.tag(),
            Node::Sequence(s) => s.tag(),
            Node::Item(_) => Tag::ITEM,
        }
    }

    /// The value representation of the node, if it has one.
    pub fn vr(&self) -> Option<VR> {
        match self {
            Node::Element(e) => Some(e.vr()),
            Node::Sequence(s) => Some(s.vr()),
            Node::Item(_) => None,
        }
    }

    /// The length of the node as last read or set.
    pub fn length(&self) -> Length {
        match self {
            Node::Element(e) => e.length(),
            Node::Sequence(s) => s.length(),
            Node::Item(i) => i.length(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Node::Item(i) => Some(i),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<Sequence> for Node {
    fn from(s: Sequence) -> Self {
        Node::Sequence(s)
    }
}

impl From<Item> for Node {
    fn from(i: Item) -> Self {
        Node::Item(i)
    }
}

/// A leaf record: header and raw payload bytes.
///
/// The typed value is decoded on demand,
/// unless the reader was asked to decode it eagerly.
#[derive(Debug, Clone)]
pub struct Element {
    header: DataElementHeader,
    data: Vec<u8>,
    value: Option<PrimitiveValue>,
}

fn payload_length(len: usize) -> Length {
    Length(u32::try_from(len).unwrap_or(Length::UNDEFINED.0 - 1))
}

impl Element {
    /// Create an element from its raw payload.
    /// The length is taken from the payload,
    /// saturating at the largest defined length.
    pub fn new(tag: Tag, vr: VR, data: Vec<u8>) -> Self {
        let len = payload_length(data.len());
        Element {
            header: DataElementHeader::new(tag, vr, len),
            data,
            value: None,
        }
    }

    /// Create an element by encoding a value with the codec of its VR.
    ///
    /// The value is validated and padded to an even length.
    pub fn from_value(
        tag: Tag,
        vr: VR,
        value: &PrimitiveValue,
        codecs: &CodecRegistry,
    ) -> Result<Self> {
        let data = codecs
            .codec(vr)
            .encode(value)
            .context(EncodeValueSnafu { tag })?;
        Ok(Element::new(tag, vr, data))
    }

    pub(crate) fn with_value(mut self, value: PrimitiveValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn header(&self) -> DataElementHeader {
        self.header
    }

    pub fn vr(&self) -> VR {
        self.header.vr
    }

    /// The raw payload bytes, exactly as read or encoded.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the raw payload bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Obtain the typed value of this element.
    ///
    /// Decoding never fails: malformed payloads yield a best-effort value.
    pub fn value(&self, codecs: &CodecRegistry) -> PrimitiveValue {
        match &self.value {
            Some(v) => v.clone(),
            None => codecs.codec(self.vr()).decode(&self.data, 0),
        }
    }

    /// The value decoded at read time, if any.
    pub fn cached_value(&self) -> Option<&PrimitiveValue> {
        self.value.as_ref()
    }
}

impl HasLength for Element {
    fn length(&self) -> Length {
        self.header.len
    }
}

impl Header for Element {
    fn tag(&self) -> Tag {
        self.header.tag
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.header.tag == other.header.tag
            && self.header.vr == other.header.vr
            && self.header.len.inner_eq(other.header.len)
            && self.data == other.data
    }
}

/// A sequence record: an ordered list of items.
///
/// In well formed data, every child is an item.
/// Other records found directly inside a sequence are kept in place,
/// so that they can be inspected and written back verbatim.
#[derive(Debug, Clone)]
pub struct Sequence {
    tag: Tag,
    vr: VR,
    len: Length,
    children: Vec<Node>,
}

impl Sequence {
    /// Create a sequence with the given items
    /// and an undefined length.
    pub fn new<I>(tag: Tag, items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Sequence {
            tag,
            vr: VR::SQ,
            len: Length::UNDEFINED,
            children: items.into_iter().map(Node::Item).collect(),
        }
    }

    pub(crate) fn with_framing(tag: Tag, vr: VR, len: Length) -> Self {
        Sequence {
            tag,
            vr,
            len,
            children: Vec::new(),
        }
    }

    /// The value representation, which is SQ
    /// unless an undefined length UN record was read as a sequence.
    pub fn vr(&self) -> VR {
        self.vr
    }

    /// Set the length framing of this sequence
    /// for writing with [`LengthMode::AsIs`].
    /// Any defined length is recomputed when writing.
    pub fn set_length(&mut self, len: Length) {
        self.len = len;
    }

    /// Iterate over the items of the sequence.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.children.iter().filter_map(Node::as_item)
    }

    /// Iterate mutably over the items of the sequence.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Item(i) => Some(i),
            _ => None,
        })
    }

    /// Retrieve the item at the given index.
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items().nth(index)
    }

    /// Append an item.
    pub fn push_item(&mut self, item: Item) {
        self.children.push(Node::Item(item));
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// All children in wire order, items or otherwise.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HasLength for Sequence {
    fn length(&self) -> Length {
        self.len
    }
}

impl Header for Sequence {
    fn tag(&self) -> Tag {
        self.tag
    }
}

/// Undefined lengths are equal here.
impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.vr == other.vr
            && self.len.inner_eq(other.len)
            && self.children == other.children
    }
}

/// An item of a sequence: a nested data set
/// bounded by its length or by an item delimiter.
#[derive(Debug, Clone)]
pub struct Item {
    len: Length,
    dataset: DataSet,
}

impl Item {
    /// Create an item with an undefined length.
    pub fn new(dataset: DataSet) -> Self {
        Item {
            len: Length::UNDEFINED,
            dataset,
        }
    }

    pub(crate) fn with_length(len: Length, dataset: DataSet) -> Self {
        Item { len, dataset }
    }

    /// Set the length framing of this item
    /// for writing with [`LengthMode::AsIs`].
    pub fn set_length(&mut self, len: Length) {
        self.len = len;
    }

    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    pub fn dataset_mut(&mut self) -> &mut DataSet {
        &mut self.dataset
    }

    pub fn into_dataset(self) -> DataSet {
        self.dataset
    }
}

impl HasLength for Item {
    fn length(&self) -> Length {
        self.len
    }
}

/// Undefined lengths are equal here.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.len.inner_eq(other.len) && self.dataset == other.dataset
    }
}

/// An ordered list of nodes.
///
/// Lookup by tag is linear and returns the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    nodes: Vec<Node>,
}

impl DataSet {
    pub fn new() -> Self {
        DataSet::default()
    }

    /// Append a node at the end of the data set.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Node> {
        self.nodes.iter_mut()
    }

    /// Retrieve the first node with the given tag.
    pub fn get(&self, tag: Tag) -> Option<&Node> {
        self.nodes.iter().find(|n| n.tag() == tag)
    }

    /// Retrieve the first node with the given tag, mutably.
    pub fn get_mut(&mut self, tag: Tag) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.tag() == tag)
    }

    /// Retrieve the first leaf element with the given tag.
    pub fn element(&self, tag: Tag) -> Option<&Element> {
        self.get(tag).and_then(Node::as_element)
    }

    /// Retrieve the first sequence with the given tag.
    pub fn sequence(&self, tag: Tag) -> Option<&Sequence> {
        self.get(tag).and_then(Node::as_sequence)
    }

    /// Retrieve the first sequence with the given tag, mutably.
    pub fn sequence_mut(&mut self, tag: Tag) -> Option<&mut Sequence> {
        match self.get_mut(tag) {
            Some(Node::Sequence(s)) => Some(s),
            _ => None,
        }
    }

    /// Remove the first node with the given tag.
    pub fn remove(&mut self, tag: Tag) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.tag() == tag)?;
        Some(self.nodes.remove(index))
    }

    /// Retrieve the first node with the given tag,
    /// or append a new empty one.
    ///
    /// A new node is an empty sequence if `vr` is SQ,
    /// otherwise an element with no payload.
    pub fn entry_or_insert(&mut self, tag: Tag, vr: VR) -> &mut Node {
        let index = match self.nodes.iter().position(|n| n.tag() == tag) {
            Some(index) => index,
            None => {
                let node = if vr == VR::SQ {
                    Node::Sequence(Sequence::new(tag, None))
                } else {
                    Node::Element(Element::new(tag, vr, Vec::new()))
                };
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[index]
    }

    /// Set the value of the first node with the given tag,
    /// or append a new element if there is none.
    ///
    /// The value is encoded and validated first:
    /// on failure the data set is left unchanged.
    pub fn put_value(
        &mut self,
        tag: Tag,
        vr: VR,
        value: impl Into<PrimitiveValue>,
        codecs: &CodecRegistry,
    ) -> Result<()> {
        let element = Element::from_value(tag, vr, &value.into(), codecs)?;
        match self.get_mut(tag) {
            Some(node) => *node = Node::Element(element),
            None => self.nodes.push(Node::Element(element)),
        }
        Ok(())
    }

    /// Decode the value of the first leaf element with the given tag.
    pub fn value(&self, tag: Tag, codecs: &CodecRegistry) -> Option<PrimitiveValue> {
        self.element(tag).map(|e| e.value(codecs))
    }
}

impl FromIterator<Node> for DataSet {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        DataSet {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DataSet {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a Node;
    type IntoIter = slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use dcmtree_dictionary_std::tags;

    #[test]
    fn lookup_returns_first_match() {
        let mut ds = DataSet::new();
        ds.push(Element::new(tags::PATIENT_ID, VR::LO, b"A1".to_vec()));
        ds.push(Element::new(tags::PATIENT_ID, VR::LO, b"B2".to_vec()));
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.element(tags::PATIENT_ID).unwrap().data(), b"A1");

        let removed = ds.remove(tags::PATIENT_ID).unwrap();
        assert_eq!(removed.as_element().unwrap().data(), b"A1");
        assert_eq!(ds.element(tags::PATIENT_ID).unwrap().data(), b"B2");
        assert!(ds.remove(tags::PATIENT_NAME).is_none());
    }

    #[test]
    fn payload_lengths_saturate() {
        assert_eq!(payload_length(6), Length(6));
        assert_eq!(payload_length(0xFFFF_FFFE), Length(0xFFFF_FFFE));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(payload_length(0x1_0000_0004), Length(0xFFFF_FFFE));
        let element = Element::new(tags::ROWS, VR::US, vec![0, 2]);
        assert_eq!(element.length(), Length(2));
    }

    #[test]
    fn put_value_validates_first() {
        let codecs = CodecRegistry::little_endian();
        let mut ds = DataSet::new();
        ds.put_value(tags::PATIENT_AGE, VR::AS, "065Y", &codecs).unwrap();
        assert_eq!(
            ds.value(tags::PATIENT_AGE, &codecs),
            Some(PrimitiveValue::from("065Y"))
        );

        let err = ds.put_value(tags::PATIENT_AGE, VR::AS, "65 years", &codecs);
        assert!(matches!(err, Err(Error::EncodeValue { .. })));
        // left unchanged
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.element(tags::PATIENT_AGE).unwrap().data(), b"065Y");

        // replace in place, keeping the position
        ds.put_value(tags::PATIENT_NAME, VR::PN, "Doe^John", &codecs)
            .unwrap();
        ds.put_value(tags::PATIENT_AGE, VR::AS, "012M", &codecs).unwrap();
        let order: Vec<_> = ds.iter().map(Node::tag).collect();
        assert_eq!(order, vec![tags::PATIENT_AGE, tags::PATIENT_NAME]);
        assert_eq!(ds.element(tags::PATIENT_AGE).unwrap().data(), b"012M");
    }

    #[test]
    fn entry_or_insert_creates_once() {
        let mut ds = DataSet::new();
        match ds.entry_or_insert(tags::REFERENCED_IMAGE_SEQUENCE, VR::SQ) {
            Node::Sequence(seq) => seq.push_item(Item::new(DataSet::new())),
            other => panic!("expected a sequence, got {:?}", other),
        }
        let node = ds.entry_or_insert(tags::REFERENCED_IMAGE_SEQUENCE, VR::SQ);
        assert_eq!(node.as_sequence().map(Sequence::len), Some(1));
        assert_eq!(ds.len(), 1);

        let node = ds.entry_or_insert(tags::PATIENT_ID, VR::LO);
        assert_eq!(node.vr(), Some(VR::LO));
        assert_eq!(node.length(), Length(0));
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn undefined_lengths_compare_equal() {
        let item = Item::new(DataSet::new());
        assert_eq!(item.clone(), item);
        let seq = Sequence::new(tags::REFERENCED_IMAGE_SEQUENCE, vec![item]);
        assert_eq!(seq.clone(), seq);
        assert_eq!(Node::from(seq).tag(), tags::REFERENCED_IMAGE_SEQUENCE);
    }
}
