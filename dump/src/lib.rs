//! Data set dumping library
//!
//! This is a helper library
//! for dumping the contents of files and data sets
//! in a human readable way.
//! Every record takes one line:
//!
//! ```text
//! (0010,0010) PN PatientName [Doe^John] # 8
//! (0008,1140) SQ ReferencedImageSequence # u/l
//! >(FFFE,E000) na Item # u/l
//! >>(0008,1150) UI ReferencedSOPClassUID [1.2.840.10008.5.1.4.1.1.2] # 26
//! ```
//!
//! Each level of nesting adds one `>` in front of the line.
//!
//! ```no_run
//! use dcmtree_object::open_file;
//! use dcmtree_dump::DumpOptions;
//!
//! let obj = open_file("path/to/file.dcm")?;
//! let mut options = DumpOptions::new();
//! options.width(100).dump_file(&obj)?;
//! # Result::<(), Box<dyn std::error::Error>>::Ok(())
//! ```
use dcmtree_core::dictionary::{DataDictionary, DictionaryEntry};
use dcmtree_core::header::{HasLength, Header};
use dcmtree_core::{Length, PrimitiveValue, Tag, VR};
use dcmtree_dictionary_std::StandardDataDictionary;
use dcmtree_encoding::{CodecRegistry, TransferSyntax};
use dcmtree_object::{FileMetaTable, FileObject};
use dcmtree_parser::{DataSet, Element, Item, Node, Sequence};
use owo_colors::{OwoColorize, Stream};
use std::borrow::Cow;
use std::fmt;
use std::io::{stdout, Result as IoResult, Write};
use std::str::FromStr;

/// Options and flags to configure how to dump a file or data set.
///
/// Text written to a writer other than standard output
/// is never colored in [`ColorMode::Auto`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DumpOptions {
    /// the console width to assume when trimming long values,
    /// `None` to check the terminal
    pub width: Option<u32>,
    /// the maximum number of characters of a single value
    pub max_value_len: Option<usize>,
    /// whether to print the file meta group
    pub meta: bool,
    /// whether to produce colored output
    pub color: ColorMode,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            width: None,
            max_value_len: Some(64),
            meta: true,
            color: ColorMode::Auto,
        }
    }
}

impl DumpOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the maximum output width in number of characters.
    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = Some(width);
        self
    }

    /// Set the maximum output width to automatic,
    /// based on terminal size.
    ///
    /// This is the default behavior.
    /// If a terminal width could not be determined,
    /// the default width of 120 characters is used.
    pub fn width_auto(&mut self) -> &mut Self {
        self.width = None;
        self
    }

    /// Set the maximum number of characters printed per value,
    /// or `None` to print values to the end.
    pub fn max_value_len(&mut self, max_value_len: Option<usize>) -> &mut Self {
        self.max_value_len = max_value_len;
        self
    }

    /// Set whether to print the file meta group before the data set.
    pub fn meta(&mut self, meta: bool) -> &mut Self {
        self.meta = meta;
        self
    }

    /// Set the output color mode.
    pub fn color_mode(&mut self, color: ColorMode) -> &mut Self {
        self.color = color;
        self
    }

    /// Dump the contents of a file to standard output.
    pub fn dump_file(&self, obj: &FileObject) -> IoResult<()> {
        self.set_color_override(true);
        self.dump_file_impl(stdout().lock(), obj)
    }

    /// Dump the contents of a file to the given writer.
    pub fn dump_file_to(&self, to: impl Write, obj: &FileObject) -> IoResult<()> {
        self.set_color_override(false);
        self.dump_file_impl(to, obj)
    }

    fn dump_file_impl(&self, mut to: impl Write, obj: &FileObject) -> IoResult<()> {
        if self.meta {
            match obj.meta() {
                Some(meta) => meta_dump(&mut to, meta)?,
                None => writeln!(
                    to,
                    "{}: {} (no file meta group)",
                    "Transfer Syntax".if_supports_color(Stream::Stdout, |v| v.bold()),
                    obj.transfer_syntax().name(),
                )?,
            }
            writeln!(to, "{:-<58}", "")?;
        }
        self.dump_dataset_impl(&mut to, obj.dataset(), &obj.transfer_syntax().codecs())
    }

    /// Dump a data set to the given writer,
    /// decoding values with the given codecs.
    pub fn dump_dataset_to(
        &self,
        mut to: impl Write,
        dataset: &DataSet,
        codecs: &CodecRegistry,
    ) -> IoResult<()> {
        self.set_color_override(false);
        self.dump_dataset_impl(&mut to, dataset, codecs)
    }

    fn dump_dataset_impl<W>(
        &self,
        to: &mut W,
        dataset: &DataSet,
        codecs: &CodecRegistry,
    ) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        let printer = Printer {
            width: determine_width(self.width),
            max_value_len: self.max_value_len,
            codecs,
        };
        printer.dump(to, dataset, 0)
    }

    fn set_color_override(&self, to_stdout: bool) {
        match (self.color, to_stdout) {
            (ColorMode::Never, _) | (ColorMode::Auto, false) => owo_colors::set_override(false),
            (ColorMode::Always, _) => owo_colors::set_override(true),
            (ColorMode::Auto, true) => owo_colors::unset_override(),
        }
    }
}

/// Dump the contents of a file to stdout with the default options.
pub fn dump_file(obj: &FileObject) -> IoResult<()> {
    DumpOptions::new().dump_file(obj)
}

/// Enumeration of output coloring modes.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ColorMode {
    /// Produce colored output if the destination is a terminal.
    #[default]
    Auto,
    /// Never produce colored output.
    Never,
    /// Always produce colored output.
    Always,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Never => f.write_str("never"),
            ColorMode::Auto => f.write_str("auto"),
            ColorMode::Always => f.write_str("always"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = ColorModeError;
    fn from_str(color: &str) -> Result<Self, Self::Err> {
        match color {
            "never" => Ok(ColorMode::Never),
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            _ => Err(ColorModeError),
        }
    }
}

/// The error raised when providing an invalid color mode.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct ColorModeError;

impl fmt::Display for ColorModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid color mode")
    }
}

impl std::error::Error for ColorModeError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DumpValue<T> {
    TagNum(T),
    Alias(T),
    Num(T),
    Str(T),
    Nothing,
}

impl<T> fmt::Display for DumpValue<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DumpValue::TagNum(v) => {
                write!(f, "{}", v.if_supports_color(Stream::Stdout, |v| v.dimmed()))
            }
            DumpValue::Alias(v) => {
                write!(f, "{}", v.if_supports_color(Stream::Stdout, |v| v.bold()))
            }
            DumpValue::Num(v) => {
                write!(f, "[{}]", v.if_supports_color(Stream::Stdout, |v| v.cyan()))
            }
            DumpValue::Str(v) => {
                write!(f, "[{}]", v.if_supports_color(Stream::Stdout, |v| v.yellow()))
            }
            DumpValue::Nothing => {
                let value = "(no value)".if_supports_color(Stream::Stdout, |v| v.italic());
                write!(f, "{}", value)
            }
        }
    }
}

#[inline]
fn whitespace_or_null(c: char) -> bool {
    c.is_whitespace() || c == '\0'
}

fn meta_dump<W>(to: &mut W, meta: &FileMetaTable) -> IoResult<()>
where
    W: ?Sized + Write,
{
    let mut field = |label: &str, value: &str| {
        writeln!(
            to,
            "{}: {}",
            label.if_supports_color(Stream::Stdout, |v| v.bold()),
            value.trim_end_matches(whitespace_or_null),
        )
    };

    field(
        "Media Storage SOP Class UID",
        &meta.media_storage_sop_class_uid,
    )?;
    field(
        "Media Storage SOP Instance UID",
        &meta.media_storage_sop_instance_uid,
    )?;
    let ts_name = match TransferSyntax::from_uid(&meta.transfer_syntax) {
        Ok(ts) => ts.name(),
        Err(_) => "«UNKNOWN»",
    };
    field(
        "Transfer Syntax",
        &format!("{} ({})", meta.transfer_syntax, ts_name),
    )?;
    field("Implementation Class UID", &meta.implementation_class_uid)?;
    if let Some(v) = &meta.implementation_version_name {
        field("Implementation Version Name", v)?;
    }
    if let Some(v) = &meta.source_application_entity_title {
        field("Source Application Entity Title", v)?;
    }
    if let Some(v) = &meta.private_information_creator_uid {
        field("Private Information Creator UID", v)?;
    }
    if let Some(v) = &meta.private_information {
        let hex: Vec<_> = v.iter().map(|b| format!("{:02X}", b)).collect();
        field("Private Information", &cut_str(&hex.join("\\"), 64))?;
    }
    writeln!(to)?;
    Ok(())
}

struct Printer<'a> {
    width: u32,
    max_value_len: Option<usize>,
    codecs: &'a CodecRegistry,
}

impl Printer<'_> {
    fn dump<W>(&self, to: &mut W, dataset: &DataSet, depth: usize) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        for node in dataset {
            self.dump_node(to, node, depth)?;
        }
        Ok(())
    }

    fn dump_node<W>(&self, to: &mut W, node: &Node, depth: usize) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        match node {
            Node::Element(elem) => self.dump_element(to, elem, depth),
            Node::Sequence(seq) => self.dump_sequence(to, seq, depth),
            Node::Item(item) => self.dump_item(to, item, depth),
        }
    }

    fn dump_element<W>(&self, to: &mut W, elem: &Element, depth: usize) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        let vr = elem.vr();
        let alias = tag_alias(elem.tag());
        let length = format_length(elem.length());
        // the value takes whatever the rest of the line leaves
        let taken = depth + 11 + 1 + 2 + 1 + alias.len() + 1 + 2 + 3 + length.len();
        let budget = (self.width as usize).saturating_sub(taken);
        let max = match self.max_value_len {
            Some(max) => max.min(budget),
            None => budget,
        };
        writeln!(
            to,
            "{}{} {} {} {} # {}",
            ">".repeat(depth),
            DumpValue::TagNum(elem.tag()),
            vr,
            DumpValue::Alias(alias),
            value_summary(&elem.value(self.codecs), vr, max),
            length,
        )
    }

    fn dump_sequence<W>(&self, to: &mut W, seq: &Sequence, depth: usize) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        writeln!(
            to,
            "{}{} {} {} # {}",
            ">".repeat(depth),
            DumpValue::TagNum(seq.tag()),
            seq.vr(),
            DumpValue::Alias(tag_alias(seq.tag())),
            format_length(seq.length()),
        )?;
        // records out of place in the sequence are shown where they were found
        for child in seq.children() {
            self.dump_node(to, child, depth + 1)?;
        }
        Ok(())
    }

    fn dump_item<W>(&self, to: &mut W, item: &Item, depth: usize) -> IoResult<()>
    where
        W: ?Sized + Write,
    {
        writeln!(
            to,
            "{}{} na {} # {}",
            ">".repeat(depth),
            DumpValue::TagNum(Tag::ITEM),
            DumpValue::Alias("Item"),
            format_length(item.length()),
        )?;
        self.dump(to, item.dataset(), depth + 1)
    }
}

fn tag_alias(tag: Tag) -> Cow<'static, str> {
    match StandardDataDictionary.by_tag(tag) {
        Some(entry) => Cow::Owned(entry.keyword().to_string()),
        None if tag.is_group_length() => Cow::Borrowed("GroupLength"),
        None if tag.is_private() => Cow::Borrowed("«Private Attribute»"),
        None => Cow::Borrowed("«Unknown Attribute»"),
    }
}

fn format_length(len: Length) -> String {
    match len.get() {
        Some(len) => len.to_string(),
        None => "u/l".to_string(),
    }
}

fn value_summary(value: &PrimitiveValue, vr: VR, max_characters: usize) -> DumpValue<String> {
    use PrimitiveValue::*;
    match (value, vr) {
        (Empty, _) => DumpValue::Nothing,
        (U8(values), _) => DumpValue::Num(cut_list(
            values.iter().map(|n| format!("{:02X}", n)),
            max_characters,
        )),
        (U16(values), VR::OW) => DumpValue::Num(cut_list(
            values.iter().map(|n| format!("{:04X}", n)),
            max_characters,
        )),
        (Str(s), _) => DumpValue::Str(cut_str(&sanitize(s), max_characters).into_owned()),
        (Tags(_), _) => DumpValue::Str(cut_str(&value.to_string(), max_characters).into_owned()),
        (other, _) => DumpValue::Num(cut_str(&other.to_string(), max_characters).into_owned()),
    }
}

fn sanitize(s: &str) -> String {
    s.trim_end_matches(whitespace_or_null)
        .replace('\n', "␊")
        .replace('\r', "␍")
        .replace('\0', "␀")
        .replace(|c: char| c.is_control(), "�")
}

/// Join values with a backslash,
/// stopping early once the text would not be shown in full.
fn cut_list<I>(values: I, max_characters: usize) -> String
where
    I: Iterator<Item = String>,
{
    let mut out = String::new();
    for (i, piece) in values.enumerate() {
        if i > 0 {
            out.push('\\');
        }
        out.push_str(&piece);
        if out.len() > max_characters {
            break;
        }
    }
    cut_str(&out, max_characters).into_owned()
}

fn cut_str(s: &str, max_characters: usize) -> Cow<str> {
    let len = s.chars().count();
    if len > max_characters {
        let max = max_characters.saturating_sub(3);
        s.chars()
            .take(max)
            .chain("...".chars())
            .collect::<String>()
            .into()
    } else {
        s.into()
    }
}

fn determine_width(user_width: Option<u32>) -> u32 {
    user_width
        .or_else(|| terminal_size::terminal_size().map(|(width, _)| width.0 as u32))
        .unwrap_or(120)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmtree_dictionary_std::{tags, uids};
    use dcmtree_object::FileMetaTableBuilder;

    fn lines(out: &[u8]) -> Vec<&str> {
        std::str::from_utf8(out)
            .expect("output is not valid UTF-8")
            .lines()
            .collect()
    }

    #[test]
    fn trims_all_whitespace() {
        assert_eq!("   ".trim_end_matches(whitespace_or_null), "");
        assert_eq!("\0".trim_end_matches(whitespace_or_null), "");
        assert_eq!("1.4.5.6\0".trim_end_matches(whitespace_or_null), "1.4.5.6");
    }

    #[test]
    fn cuts_long_values() {
        assert_eq!(cut_str("ABCDEFGHIJ", 10), "ABCDEFGHIJ");
        assert_eq!(cut_str("ABCDEFGHIJK", 10), "ABCDEFG...");
        assert_eq!(
            cut_list((0..100).map(|n| n.to_string()), 12),
            "0\\1\\2\\3\\4..."
        );
    }

    #[test]
    fn one_line_per_record() {
        let codecs = CodecRegistry::little_endian();
        let mut ds = DataSet::new();
        ds.put_value(tags::PATIENT_NAME, VR::PN, "Doe^John", &codecs)
            .unwrap();
        ds.put_value(tags::ROWS, VR::US, 512_u16, &codecs).unwrap();
        ds.push(Element::new(Tag(0x0009, 0x1001), VR::OB, vec![0xCA, 0xFE]));
        ds.push(Element::new(tags::PATIENT_ID, VR::LO, Vec::new()));
        let mut item = DataSet::new();
        item.put_value(
            tags::REFERENCED_SOP_CLASS_UID,
            VR::UI,
            uids::CT_IMAGE_STORAGE,
            &codecs,
        )
        .unwrap();
        ds.push(Sequence::new(
            tags::REFERENCED_IMAGE_SEQUENCE,
            vec![Item::new(item)],
        ));

        let mut out = Vec::new();
        DumpOptions::new()
            .width(120)
            .color_mode(ColorMode::Never)
            .dump_dataset_to(&mut out, &ds, &codecs)
            .unwrap();

        assert_eq!(
            lines(&out),
            vec![
                "(0010,0010) PN PatientName [Doe^John] # 8",
                "(0028,0010) US Rows [512] # 2",
                "(0009,1001) OB «Private Attribute» [CA\\FE] # 2",
                "(0010,0020) LO PatientID (no value) # 0",
                "(0008,1140) SQ ReferencedImageSequence # u/l",
                ">(FFFE,E000) na Item # u/l",
                ">>(0008,1150) UI ReferencedSOPClassUID [1.2.840.10008.5.1.4.1.1.2] # 26",
            ]
        );
    }

    #[test]
    fn value_length_is_bounded() {
        let codecs = CodecRegistry::little_endian();
        let mut ds = DataSet::new();
        ds.push(Element::new(tags::PATIENT_NAME, VR::PN, b"A".repeat(100)));

        let mut out = Vec::new();
        DumpOptions::new()
            .width(200)
            .max_value_len(Some(10))
            .color_mode(ColorMode::Never)
            .dump_dataset_to(&mut out, &ds, &codecs)
            .unwrap();
        assert_eq!(
            lines(&out),
            vec!["(0010,0010) PN PatientName [AAAAAAA...] # 100"]
        );
    }

    #[test]
    fn file_meta_group_comes_first() {
        let codecs = CodecRegistry::little_endian();
        let mut ds = DataSet::new();
        ds.put_value(tags::SOP_INSTANCE_UID, VR::UI, "1.2.888.123", &codecs)
            .unwrap();
        let meta = FileMetaTableBuilder::new()
            .transfer_syntax(uids::IMPLICIT_VR_LITTLE_ENDIAN)
            .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.1")
            .media_storage_sop_instance_uid("1.2.888.123")
            .build()
            .unwrap();
        let file = FileObject::with_meta(meta, ds).unwrap();

        let mut out = Vec::new();
        DumpOptions::new()
            .color_mode(ColorMode::Never)
            .dump_file_to(&mut out, &file)
            .unwrap();
        let lines = lines(&out);
        assert_eq!(
            lines[0],
            "Media Storage SOP Class UID: 1.2.840.10008.5.1.4.1.1.1"
        );
        assert_eq!(lines[1], "Media Storage SOP Instance UID: 1.2.888.123");
        assert_eq!(
            lines[2],
            "Transfer Syntax: 1.2.840.10008.1.2 (Implicit VR Little Endian)"
        );
        assert!(lines[3].starts_with("Implementation Class UID: "));
        assert!(lines[4].starts_with("Implementation Version Name: "));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "-".repeat(58));
        assert!(lines[7].starts_with("(0008,0018) UI SOPInstanceUID [1.2.888.123]"));
    }
}
