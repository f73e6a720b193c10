//! This crate reads and writes whole files:
//! an optional 128-byte preamble, the `DICM` magic code,
//! the file meta group, and the data set that follows it
//! in the transfer syntax declared by the meta group.
//!
//! Loading a file can be done with ease via the function [`open_file`].
//! For additional reading options, use [`OpenFileOptions`].
//!
//! ```no_run
//! use dcmtree_dictionary_std::tags;
//! use dcmtree_object::open_file;
//! # fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let obj = open_file("0001.dcm")?;
//! let codecs = obj.transfer_syntax().codecs();
//! let patient_name = obj.dataset().value(tags::PATIENT_NAME, &codecs);
//! # Ok(())
//! # }
//! ```
//!
//! Files without the magic code are still accepted:
//! their transfer syntax is then guessed from the content.
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]

pub mod file;
pub mod meta;

pub use crate::file::{from_bytes, from_reader, open_file, OpenFileOptions, ReadPreamble};
pub use crate::meta::{FileMetaTable, FileMetaTableBuilder};
pub use dcmtree_core::{Tag, VR};
pub use dcmtree_parser::{DataSet, Diagnostic};

use dcmtree_dictionary_std::tags;
use dcmtree_encoding::transfer_syntax::TransferSyntaxError;
use dcmtree_encoding::TransferSyntax;
use dcmtree_parser::{DataSetWriter, ParseOutcome, WriteOptions};
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// An error which may occur when loading a file
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ReadError {
    #[snafu(display("Could not open file '{}'", filename.display()))]
    OpenFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not read from source"))]
    ReadSource {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    /// The magic code was required but not found.
    #[snafu(display("Missing magic code `DICM`"))]
    NotDicom { backtrace: Backtrace },
    #[snafu(display("Could not parse meta group data set"))]
    ParseMetaDataSet {
        #[snafu(backtrace)]
        source: meta::Error,
    },
    #[snafu(display("Could not resolve the transfer syntax of the data set"))]
    ReadTransferSyntax {
        #[snafu(backtrace)]
        source: TransferSyntaxError,
    },
}

/// An error which may occur when writing a file
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum WriteError {
    #[snafu(display("Could not write to file '{}'", filename.display()))]
    WriteFile {
        filename: std::path::PathBuf,
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not write object preamble"))]
    WritePreamble {
        backtrace: Backtrace,
        source: std::io::Error,
    },
    #[snafu(display("Could not build file meta group"))]
    BuildMeta {
        #[snafu(backtrace)]
        source: meta::Error,
    },
    #[snafu(display("Could not print meta group data set"))]
    PrintMetaDataSet {
        #[snafu(backtrace)]
        source: meta::Error,
    },
    #[snafu(display("Could not print data set"))]
    PrintDataSet {
        #[snafu(backtrace)]
        source: dcmtree_parser::Error,
    },
    #[snafu(display("Transfer syntax `{}` has no UID to declare", name))]
    WriteUnsupportedTransferSyntax {
        name: &'static str,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not resolve the transfer syntax of the meta group"))]
    WriteTransferSyntax {
        #[snafu(backtrace)]
        source: TransferSyntaxError,
    },
}

pub type Result<T, E = ReadError> = std::result::Result<T, E>;

/// A data set read from or bound to a file,
/// along with its file meta group and transfer syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct FileObject {
    meta: Option<FileMetaTable>,
    transfer_syntax: TransferSyntax,
    dataset: DataSet,
    diagnostics: Vec<Diagnostic>,
    suppressed: usize,
}

impl FileObject {
    /// Create a file object without a meta group.
    ///
    /// A meta group is derived from the data set upon writing.
    pub fn new(dataset: DataSet, transfer_syntax: TransferSyntax) -> Self {
        FileObject {
            meta: None,
            transfer_syntax,
            dataset,
            diagnostics: Vec::new(),
            suppressed: 0,
        }
    }

    /// Create a file object with the given meta group,
    /// the data set being encoded in the transfer syntax it declares.
    pub fn with_meta(
        meta: FileMetaTable,
        dataset: DataSet,
    ) -> std::result::Result<Self, TransferSyntaxError> {
        let transfer_syntax = meta.resolve_transfer_syntax()?;
        Ok(FileObject {
            meta: Some(meta),
            transfer_syntax,
            dataset,
            diagnostics: Vec::new(),
            suppressed: 0,
        })
    }

    pub(crate) fn from_outcome(
        meta: Option<FileMetaTable>,
        transfer_syntax: TransferSyntax,
        outcome: ParseOutcome,
    ) -> Self {
        FileObject {
            meta,
            transfer_syntax,
            dataset: outcome.dataset,
            diagnostics: outcome.diagnostics,
            suppressed: outcome.suppressed,
        }
    }

    /// The file meta group, if the file had one.
    pub fn meta(&self) -> Option<&FileMetaTable> {
        self.meta.as_ref()
    }

    pub fn transfer_syntax(&self) -> TransferSyntax {
        self.transfer_syntax
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

    /// Structural problems found while reading the data set.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The total number of problems found while reading,
    /// including those not retained.
    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.len() + self.suppressed
    }

    /// Whether the data set was read without any problem.
    pub fn is_complete(&self) -> bool {
        self.diagnostic_count() == 0
    }

    /// Obtain the meta group to write,
    /// deriving one from the data set if there is none.
    fn meta_for_writing(&self) -> Result<FileMetaTable, WriteError> {
        if let Some(meta) = &self.meta {
            return Ok(meta.clone());
        }
        let uid = self
            .transfer_syntax
            .uid()
            .context(WriteUnsupportedTransferSyntaxSnafu {
                name: self.transfer_syntax.name(),
            })?;
        let codecs = self.transfer_syntax.codecs();
        let text = |tag: Tag| {
            self.dataset
                .value(tag, &codecs)
                .map(|v| v.to_str().into_owned())
                .unwrap_or_default()
        };
        let mut builder = FileMetaTableBuilder::new().transfer_syntax(uid);
        let class_uid = text(tags::SOP_CLASS_UID);
        if !class_uid.is_empty() {
            builder = builder.media_storage_sop_class_uid(class_uid);
        }
        let instance_uid = text(tags::SOP_INSTANCE_UID);
        if !instance_uid.is_empty() {
            builder = builder.media_storage_sop_instance_uid(instance_uid);
        }
        builder.build().context(BuildMetaSnafu)
    }

    /// Write the whole file: a zeroed preamble, the magic code,
    /// the meta group with a recomputed group length, then the data set.
    pub fn write_to<W: Write>(&self, to: W) -> Result<(), WriteError> {
        self.write_with_options(to, WriteOptions::default())
    }

    /// Write the whole file, framing the data set as configured.
    pub fn write_with_options<W: Write>(
        &self,
        mut to: W,
        options: WriteOptions,
    ) -> Result<(), WriteError> {
        let mut meta = self.meta_for_writing()?;
        let ts = meta
            .resolve_transfer_syntax()
            .context(WriteTransferSyntaxSnafu)?;

        to.write_all(&[0; 128]).context(WritePreambleSnafu)?;
        to.write_all(&meta::DICM_MAGIC_CODE)
            .context(WritePreambleSnafu)?;
        meta.write(&mut to).context(PrintMetaDataSetSnafu)?;
        DataSetWriter::with_options(ts, options)
            .write_to(&mut to, &self.dataset)
            .context(PrintDataSetSnafu)
    }

    /// Write the whole file to the given path.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteError> {
        let path = path.as_ref();
        let file = File::create(path).context(WriteFileSnafu { filename: path })?;
        let mut to = BufWriter::new(file);
        self.write_to(&mut to)?;
        to.flush().context(WriteFileSnafu { filename: path })
    }
}
