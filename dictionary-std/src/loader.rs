//! Reader for the line-oriented dictionary resource format.
//!
//! Each non-empty line describes one attribute with tab separated fields:
//!
//! ```text
//! (GGGG,EEEE)	Name	Keyword	VR	VM	[RET]
//! ```
//!
//! Blank lines and lines starting with `//` or `#` are ignored.
//! A group or element may contain the placeholder `xx`
//! in its lower byte (e.g. `(60xx,3000)`),
//! which declares an attribute repeating over a range of groups or elements.

use crate::in_mem::InMemDataDictionary;
use dcmtree_core::dictionary::DictionaryEntryBuf;
use dcmtree_core::Tag;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::BufRead;
use std::path::Path;
use tracing::warn;

/// An error which may occur when loading a dictionary resource.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum LoadError {
    /// Could not open the dictionary file
    OpenFile {
        /// the path to the file
        filename: std::path::PathBuf,
        /// the underlying I/O error
        source: std::io::Error,
        /// backtrace
        backtrace: Backtrace,
    },
    /// Could not read from the dictionary source
    ReadLine {
        /// the line number where reading failed
        line: usize,
        /// the underlying I/O error
        source: std::io::Error,
        /// backtrace
        backtrace: Backtrace,
    },
}

/// Alias for the result of loading a dictionary.
pub type Result<T, E = LoadError> = std::result::Result<T, E>;

/// How a parsed tag applies to concrete tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagPattern {
    /// Exactly one tag.
    Single(Tag),
    /// Repeating over the groups `gg00..=ggFF`. The lower byte is zeroed.
    Group100(Tag),
    /// Repeating over the elements `ee00..=eeFF`. The lower byte is zeroed.
    Element100(Tag),
}

impl TagPattern {
    /// The representative tag (lower placeholder byte zeroed).
    pub fn inner(self) -> Tag {
        match self {
            TagPattern::Single(tag) | TagPattern::Group100(tag) | TagPattern::Element100(tag) => {
                tag
            }
        }
    }
}

/// Parse a single line of the dictionary resource.
///
/// Returns `None` if the line is not a valid entry.
/// The caller is expected to have filtered out blank and comment lines.
pub fn parse_line(line: &str) -> Option<(TagPattern, DictionaryEntryBuf)> {
    let line: String = line
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect();
    let parts: Vec<&str> = line.split('\t').map(str::trim).collect();
    if parts.len() < 4 {
        return None;
    }

    let pattern = parse_tag_pattern(parts[0])?;
    let field = |i: usize| parts.get(i).copied().unwrap_or_default();
    let keyword: String = field(2)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let retired = field(5);
    let retired = retired.contains("RET") || retired.to_lowercase().contains("retired");

    Some((
        pattern,
        DictionaryEntryBuf {
            tag: pattern.inner(),
            name: field(1).to_owned(),
            keyword,
            vr: field(3).to_owned(),
            vm: field(4).to_owned(),
            retired,
        },
    ))
}

fn parse_tag_pattern(text: &str) -> Option<TagPattern> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    let (group, element) = inner.split_once(',')?;
    let (group, group_repeats) = parse_hex_part(group.trim())?;
    let (element, element_repeats) = parse_hex_part(element.trim())?;
    let tag = Tag(group, element);
    match (group_repeats, element_repeats) {
        (false, false) => Some(TagPattern::Single(tag)),
        (true, false) => Some(TagPattern::Group100(tag)),
        (false, true) => Some(TagPattern::Element100(tag)),
        (true, true) => None,
    }
}

/// Parse four hex digits, where the last two may be `xx`.
fn parse_hex_part(text: &str) -> Option<(u16, bool)> {
    if text.len() != 4 || !text.is_ascii() {
        return None;
    }
    let (high, low) = text.split_at(2);
    if low.eq_ignore_ascii_case("xx") {
        let high = u16::from_str_radix(high, 16).ok()?;
        Some((high << 8, true))
    } else {
        Some((u16::from_str_radix(text, 16).ok()?, false))
    }
}

fn is_ignored(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with("//") || line.starts_with('#')
}

/// Parse a whole dictionary text into an in-memory dictionary.
///
/// Malformed lines are skipped with a warning
/// and counted in [`InMemDataDictionary::skipped_lines`].
pub fn parse_str(text: &str) -> InMemDataDictionary {
    let mut dict = InMemDataDictionary::new();
    for (i, line) in text.lines().enumerate() {
        consume_line(&mut dict, i + 1, line);
    }
    dict
}

/// Read a dictionary from a buffered source.
pub fn from_reader<R: BufRead>(reader: R) -> Result<InMemDataDictionary> {
    let mut dict = InMemDataDictionary::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.context(ReadLineSnafu { line: i + 1 })?;
        consume_line(&mut dict, i + 1, &line);
    }
    Ok(dict)
}

/// Read a dictionary from a file in the resource format.
pub fn from_file(path: impl AsRef<Path>) -> Result<InMemDataDictionary> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).context(OpenFileSnafu { filename: path })?;
    from_reader(std::io::BufReader::new(file))
}

fn consume_line(dict: &mut InMemDataDictionary, line_number: usize, line: &str) {
    if is_ignored(line) {
        return;
    }
    match parse_line(line) {
        Some((pattern, entry)) => dict.insert(pattern, entry),
        None => {
            warn!("Skipping malformed dictionary line {}: {:?}", line_number, line);
            dict.count_skipped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmtree_core::{DataDictionary, DictionaryEntry, VR};

    #[test]
    fn parses_a_full_line() {
        let (pattern, entry) =
            parse_line("(0010,0010)\tPatient's Name\tPatientName\tPN\t1").unwrap();
        assert_eq!(pattern, TagPattern::Single(Tag(0x0010, 0x0010)));
        assert_eq!(entry.name(), "Patient's Name");
        assert_eq!(entry.keyword(), "PatientName");
        assert_eq!(entry.vr(), Some(VR::PN));
        assert_eq!(entry.vm(), "1");
        assert!(!entry.is_retired());
    }

    #[test]
    fn keyword_is_sanitized_and_retired_flag_read() {
        let (_, entry) =
            parse_line("(0008,0040)\tData Set Type\tData-Set Type\u{200b}\tUS\t1\tRET").unwrap();
        assert_eq!(entry.keyword(), "DataSetType");
        assert!(entry.is_retired());
    }

    #[test]
    fn repeating_groups() {
        let (pattern, entry) =
            parse_line("(60xx,3000)\tOverlay Data\tOverlayData\tOB or OW\t1").unwrap();
        assert_eq!(pattern, TagPattern::Group100(Tag(0x6000, 0x3000)));
        assert_eq!(entry.vr(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse_line("(0010,0010)\tPatient's Name"), None);
        assert_eq!(parse_line("0010,0010\tA\tB\tPN\t1"), None);
        assert_eq!(parse_line("(001G,0010)\tA\tB\tPN\t1"), None);
        assert_eq!(parse_line("(xxxx,xxxx)\tA\tB\tPN\t1"), None);
    }

    #[test]
    fn parse_str_skips_comments_and_counts_bad_lines() {
        let text = "// header comment\n\
                    \n\
                    # another comment\n\
                    (0010,0020)\tPatient ID\tPatientID\tLO\t1\n\
                    this line is garbage\n\
                    (0010,1010)\tPatient's Age\tPatientAge\tAS\t1\n";
        let dict = parse_str(text);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.skipped_lines(), 1);
        assert_eq!(dict.resolve_vr(Tag(0x0010, 0x1010)), VR::AS);
        assert!(dict.by_keyword("PatientID").is_some());
    }

    #[test]
    fn from_reader_reads_lines() {
        let text = b"(0008,0060)\tModality\tModality\tCS\t1\n" as &[u8];
        let dict = from_reader(text).unwrap();
        assert_eq!(dict.resolve_vr(Tag(0x0008, 0x0060)), VR::CS);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = from_file("/definitely/not/here.dic").unwrap_err();
        assert!(matches!(err, LoadError::OpenFile { .. }));
    }
}
