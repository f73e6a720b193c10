//! This module contains the recursive reader of a data set.
//!
//! The whole input is expected in memory.
//! Reading never fails as a whole:
//! when a record is malformed, the reader stops there
//! and hands over everything decoded so far,
//! along with [`Diagnostic`]s describing what went wrong.
//! Recoverable structural problems (stray delimiters,
//! records out of place) are reported and reading continues.
use super::{DataSet, Element, Item, Node, Sequence};
use dcmtree_core::dictionary::DataDictionary;
use dcmtree_core::header::{DataElementHeader, Length};
use dcmtree_core::{Tag, VR};
use dcmtree_encoding::codec::CodecRegistry;
use dcmtree_encoding::decode::Decode;
use dcmtree_encoding::transfer_syntax::{HeaderDecoder, TransferSyntax};
use std::fmt;
use std::io::Cursor;
use tracing::{debug, trace, warn};

/// A strategy for obtaining the typed values of leaf elements.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ValueReadStrategy {
    /// Keep the raw payload only.
    /// Values are decoded on demand with [`Element::value`].
    #[default]
    Raw,
    /// Also decode every value while reading.
    Decoded,
}

/// The set of options for the data set reader.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct ReadOptions {
    /// the maximum number of diagnostics collected,
    /// the rest are only counted
    pub max_diagnostics: usize,
    /// the value reading strategy
    pub value_read: ValueReadStrategy,
    /// the position of the buffer in the original source,
    /// added to the positions reported in diagnostics
    pub base_offset: u64,
    /// the maximum nesting of sequences and items
    pub max_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            max_diagnostics: 1024,
            value_read: ValueReadStrategy::default(),
            base_offset: 0,
            max_depth: 64,
        }
    }
}

impl ReadOptions {
    /// Replace the maximum number of collected diagnostics.
    pub fn max_diagnostics(mut self, max_diagnostics: usize) -> Self {
        self.max_diagnostics = max_diagnostics;
        self
    }
    /// Replace the value reading strategy of the options.
    pub fn value_read(mut self, value_read: ValueReadStrategy) -> Self {
        self.value_read = value_read;
        self
    }
    /// Replace the base offset of the options.
    pub fn base_offset(mut self, base_offset: u64) -> Self {
        self.base_offset = base_offset;
        self
    }
    /// Replace the maximum nesting depth of the options.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A problem found while reading a data set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// the byte position of the offending record
    pub position: u64,
    /// the tag of the offending record, if it could be read
    pub tag: Option<Tag>,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at byte {}", self.position)?;
        if let Some(tag) = self.tag {
            write!(f, ", {}", tag)?;
        }
        write!(f, ": {}", self.kind)
    }
}

/// The kinds of problems found while reading a data set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// Not enough bytes left for a record header. Reading stopped.
    TruncatedHeader,
    /// The value length goes past the end of the input. Reading stopped.
    ValueOutOfBounds { len: u32, available: usize },
    /// A record other than an item was found directly inside a sequence.
    /// It was kept as a child of the sequence.
    UnexpectedInSequence,
    /// An item was found outside of a sequence.
    /// It was kept as a node of the data set.
    UnexpectedItem,
    /// A delimiter was found where nothing was open to close.
    /// It was skipped.
    StrayDelimiter,
    /// The input ended before the delimiter
    /// of an undefined length sequence or item.
    MissingDelimiter,
    /// The content of a sequence or item
    /// ended past its declared length.
    InconsistentLength { end: u64, reached: u64 },
    /// Sequences and items are nested too deeply. Reading stopped.
    TooDeep,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::TruncatedHeader => f.write_str("truncated record header"),
            DiagnosticKind::ValueOutOfBounds { len, available } => write!(
                f,
                "value of {} bytes exceeds the {} bytes available",
                len, available
            ),
            DiagnosticKind::UnexpectedInSequence => f.write_str("record is not an item"),
            DiagnosticKind::UnexpectedItem => f.write_str("item outside of a sequence"),
            DiagnosticKind::StrayDelimiter => f.write_str("stray delimiter"),
            DiagnosticKind::MissingDelimiter => f.write_str("missing delimiter"),
            DiagnosticKind::InconsistentLength { end, reached } => write!(
                f,
                "content should end at byte {} but reached byte {}",
                end, reached
            ),
            DiagnosticKind::TooDeep => f.write_str("nesting is too deep"),
        }
    }
}

/// The result of reading a data set.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// everything that could be read
    pub dataset: DataSet,
    /// the problems found, up to the configured maximum
    pub diagnostics: Vec<Diagnostic>,
    /// the number of problems found beyond the configured maximum
    pub suppressed: usize,
    /// the number of bytes consumed
    pub bytes_read: u64,
}

impl ParseOutcome {
    /// Whether the input was read in full without any problem.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty() && self.suppressed == 0
    }

    /// The total number of problems found.
    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.len() + self.suppressed
    }
}

/// A reader of data sets in one transfer syntax.
///
/// The dictionary is only consulted for implicit VR transfer syntaxes.
#[derive(Debug, Clone)]
pub struct DataSetReader<D> {
    decoder: HeaderDecoder<D>,
    codecs: CodecRegistry,
    options: ReadOptions,
}

impl<D> DataSetReader<D>
where
    D: DataDictionary,
{
    /// Create a reader with the default options.
    pub fn new(ts: TransferSyntax, dict: D) -> Self {
        Self::with_options(ts, dict, ReadOptions::default())
    }

    pub fn with_options(ts: TransferSyntax, dict: D, options: ReadOptions) -> Self {
        DataSetReader {
            decoder: ts.decoder(dict),
            codecs: ts.codecs(),
            options,
        }
    }

    /// Read a data set spanning the whole buffer.
    pub fn read(&self, bytes: &[u8]) -> ParseOutcome {
        let mut session = Session {
            reader: self,
            cursor: Cursor::new(bytes),
            diagnostics: Vec::new(),
            suppressed: 0,
            depth: 0,
            halted: false,
        };
        let (dataset, _) = session.read_dataset(None, Scope::TopLevel);
        debug!(
            "Read {} top level records, {} problems",
            dataset.len(),
            session.diagnostics.len() + session.suppressed
        );
        ParseOutcome {
            dataset,
            diagnostics: session.diagnostics,
            suppressed: session.suppressed,
            bytes_read: session.cursor.position(),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Scope {
    TopLevel,
    Item { undefined: bool },
}

/// The state of one read call.
struct Session<'a, 'r, D> {
    reader: &'r DataSetReader<D>,
    cursor: Cursor<&'a [u8]>,
    diagnostics: Vec<Diagnostic>,
    suppressed: usize,
    depth: usize,
    /// set when a record could not be read,
    /// stops all enclosing loops
    halted: bool,
}

impl<'a, 'r, D> Session<'a, 'r, D>
where
    D: DataDictionary,
{
    fn data(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    fn seek(&mut self, position: usize) {
        self.cursor.set_position(position as u64);
    }

    fn remaining(&self) -> usize {
        self.data().len().saturating_sub(self.position())
    }

    fn report(&mut self, position: usize, tag: Option<Tag>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            position: self.reader.options.base_offset + position as u64,
            tag,
            kind,
        };
        warn!("{}", diagnostic);
        if self.diagnostics.len() < self.reader.options.max_diagnostics {
            self.diagnostics.push(diagnostic);
        } else {
            self.suppressed += 1;
        }
    }

    /// Report a fatal problem, rewinding to the start of the offending record.
    fn halt(&mut self, start: usize, tag: Option<Tag>, kind: DiagnosticKind) {
        self.report(start, tag, kind);
        self.seek(start);
        self.halted = true;
    }

    fn read_header(&mut self) -> Option<DataElementHeader> {
        let start = self.position();
        if self.remaining() < 8 {
            self.halt(start, None, DiagnosticKind::TruncatedHeader);
            return None;
        }
        match self.reader.decoder.decode_header(&mut self.cursor) {
            Ok((header, _)) => {
                trace!("{} {} {:?} at {}", header.tag, header.vr, header.len, start);
                Some(header)
            }
            Err(e) => {
                debug!("Could not decode header: {}", e);
                self.halt(start, None, DiagnosticKind::TruncatedHeader);
                None
            }
        }
    }

    /// The end position of content with the given length.
    /// A length past the end of the input is clamped to it.
    fn content_end(&mut self, start: usize, tag: Tag, len: Length) -> Option<usize> {
        let len = len.get()?;
        let position = self.position();
        let available = self.remaining();
        if len as usize > available {
            self.report(start, Some(tag), DiagnosticKind::ValueOutOfBounds { len, available });
            return Some(position + available);
        }
        Some(position + len as usize)
    }

    /// Check whether a bounded read stopped at its end.
    fn reached_end(&mut self, end: Option<usize>, tag: Tag) -> bool {
        let (end, position) = match end {
            Some(end) => (end, self.position()),
            None => return false,
        };
        if position > end {
            self.report(
                position,
                Some(tag),
                DiagnosticKind::InconsistentLength {
                    end: self.reader.options.base_offset + end as u64,
                    reached: self.reader.options.base_offset + position as u64,
                },
            );
        }
        position >= end
    }

    /// Read records until the end of the input or of the bound,
    /// or until an item delimiter when inside an item.
    /// Returns whether the data set was closed by an item delimiter.
    fn read_dataset(&mut self, end: Option<usize>, scope: Scope) -> (DataSet, bool) {
        let mut dataset = DataSet::new();
        loop {
            if self.halted || self.reached_end(end, Tag::ITEM) {
                return (dataset, false);
            }
            let start = self.position();
            if self.remaining() == 0 {
                if scope == (Scope::Item { undefined: true }) {
                    self.report(start, Some(Tag::ITEM), DiagnosticKind::MissingDelimiter);
                }
                return (dataset, false);
            }
            let header = match self.read_header() {
                Some(header) => header,
                None => return (dataset, false),
            };
            match (header.tag, scope) {
                (Tag::ITEM_DELIMITER, Scope::Item { .. }) => return (dataset, true),
                (Tag::SEQUENCE_DELIMITER, Scope::Item { undefined: true }) => {
                    // leave it for the enclosing sequence
                    self.report(start, Some(Tag::ITEM), DiagnosticKind::MissingDelimiter);
                    self.seek(start);
                    return (dataset, false);
                }
                (Tag::ITEM_DELIMITER, _) | (Tag::SEQUENCE_DELIMITER, _) => {
                    self.report(start, Some(header.tag), DiagnosticKind::StrayDelimiter);
                }
                (Tag::ITEM, _) => {
                    self.report(start, Some(header.tag), DiagnosticKind::UnexpectedItem);
                    let item = self.read_item(start, header.len);
                    dataset.push(item);
                }
                _ => {
                    if let Some(node) = self.read_record(start, header) {
                        dataset.push(node);
                    }
                }
            }
        }
    }

    /// Read the rest of a record whose header was just read.
    fn read_record(&mut self, start: usize, header: DataElementHeader) -> Option<Node> {
        // undefined length records other than SQ are read as sequences too
        if header.vr == VR::SQ || header.len.is_undefined() {
            return Some(Node::Sequence(self.read_sequence(start, header)));
        }

        let len = header.len.0;
        let available = self.remaining();
        if len as usize > available {
            self.halt(
                start,
                Some(header.tag),
                DiagnosticKind::ValueOutOfBounds { len, available },
            );
            return None;
        }
        let position = self.position();
        let end = position + len as usize;
        let data = self.data()[position..end].to_vec();
        self.seek(end);

        let element = Element::new(header.tag, header.vr, data);
        let element = match self.reader.options.value_read {
            ValueReadStrategy::Raw => element,
            ValueReadStrategy::Decoded => {
                let value = self.reader.codecs.codec(header.vr).decode(element.data(), 0);
                element.with_value(value)
            }
        };
        Some(Node::Element(element))
    }

    fn read_sequence(&mut self, start: usize, header: DataElementHeader) -> Sequence {
        let mut sequence = Sequence::with_framing(header.tag, header.vr, header.len);
        if self.depth >= self.reader.options.max_depth {
            self.halt(start, Some(header.tag), DiagnosticKind::TooDeep);
            return sequence;
        }
        self.depth += 1;

        let end = self.content_end(start, header.tag, header.len);
        loop {
            if self.halted || self.reached_end(end, header.tag) {
                break;
            }
            let position = self.position();
            if self.remaining() == 0 {
                // only reachable in undefined length mode
                self.report(position, Some(header.tag), DiagnosticKind::MissingDelimiter);
                break;
            }
            let child = match self.read_header() {
                Some(child) => child,
                None => break,
            };
            match child.tag {
                Tag::ITEM => {
                    let item = self.read_item(position, child.len);
                    sequence.push_item(item);
                }
                // bounded sequences end by position only
                Tag::SEQUENCE_DELIMITER if end.is_none() => break,
                Tag::SEQUENCE_DELIMITER | Tag::ITEM_DELIMITER => {
                    self.report(position, Some(child.tag), DiagnosticKind::StrayDelimiter);
                }
                _ => {
                    self.report(
                        position,
                        Some(child.tag),
                        DiagnosticKind::UnexpectedInSequence,
                    );
                    if let Some(node) = self.read_record(position, child) {
                        sequence.push_node(node);
                    }
                }
            }
        }

        self.depth -= 1;
        sequence
    }

    fn read_item(&mut self, start: usize, len: Length) -> Item {
        if self.depth >= self.reader.options.max_depth {
            self.halt(start, Some(Tag::ITEM), DiagnosticKind::TooDeep);
            return Item::with_length(len, DataSet::new());
        }
        self.depth += 1;

        let end = self.content_end(start, Tag::ITEM, len);
        let scope = Scope::Item {
            undefined: end.is_none(),
        };
        let (dataset, delimited) = self.read_dataset(end, scope);
        if let (true, Some(end)) = (delimited, end) {
            // an early item delimiter closes a bounded item as well
            if self.position() < end {
                self.seek(end);
            }
        }

        self.depth -= 1;
        Item::with_length(len, dataset)
    }
}
