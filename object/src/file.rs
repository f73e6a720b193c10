use crate::meta::{FileMetaTable, DICM_MAGIC_CODE};
use crate::{
    FileObject, NotDicomSnafu, OpenFileSnafu, ParseMetaDataSetSnafu, ReadSourceSnafu,
    ReadTransferSyntaxSnafu, Result,
};
use dcmtree_core::DataDictionary;
use dcmtree_dictionary_std::StandardDataDictionary;
use dcmtree_encoding::TransferSyntax;
use dcmtree_parser::{DataSetReader, ParseOutcome, ReadOptions};
use snafu::{ensure, ResultExt};
use std::io::Read;
use std::path::Path;
use tracing::debug;

const PREAMBLE_LEN: usize = 128;

/// Create a file object by reading from a byte source.
pub fn from_reader<R>(source: R) -> Result<FileObject>
where
    R: Read,
{
    OpenFileOptions::new().from_reader(source)
}

/// Create a file object from the bytes of a whole file.
pub fn from_bytes(bytes: &[u8]) -> Result<FileObject> {
    OpenFileOptions::new().from_bytes(bytes)
}

/// Create a file object by reading a file.
pub fn open_file<P>(path: P) -> Result<FileObject>
where
    P: AsRef<Path>,
{
    OpenFileOptions::new().open_file(path)
}

/// A builder type for opening a file with additional options.
///
/// # Example
///
/// ```no_run
/// # use dcmtree_object::{OpenFileOptions, ReadPreamble};
/// let file = OpenFileOptions::new()
///     .read_preamble(ReadPreamble::Always)
///     .open_file("path/to/file.dcm")?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct OpenFileOptions<D = StandardDataDictionary> {
    dictionary: D,
    read_preamble: ReadPreamble,
    read_options: ReadOptions,
}

impl OpenFileOptions {
    pub fn new() -> Self {
        OpenFileOptions::default()
    }
}

impl<D> OpenFileOptions<D> {
    /// Set whether to expect the 128-byte preamble and the magic code.
    pub fn read_preamble(mut self, option: ReadPreamble) -> Self {
        self.read_preamble = option;
        self
    }

    /// Set the options of the data set reader.
    ///
    /// The base offset is overridden
    /// with the position of the data set in the file.
    pub fn read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }

    /// Set the data element dictionary to use
    /// for resolving the VR of implicit VR records.
    pub fn dictionary<Di>(self, dictionary: Di) -> OpenFileOptions<Di>
    where
        Di: DataDictionary,
    {
        OpenFileOptions {
            dictionary,
            read_preamble: self.read_preamble,
            read_options: self.read_options,
        }
    }

    /// Open the file at the given path.
    pub fn open_file<P>(self, path: P) -> Result<FileObject>
    where
        P: AsRef<Path>,
        D: DataDictionary,
    {
        let path = path.as_ref();
        let bytes = std::fs::read(path).context(OpenFileSnafu { filename: path })?;
        self.from_bytes(&bytes)
    }

    /// Obtain a file object by reading a byte source to its end.
    pub fn from_reader<R>(self, mut source: R) -> Result<FileObject>
    where
        R: Read,
        D: DataDictionary,
    {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes).context(ReadSourceSnafu)?;
        self.from_bytes(&bytes)
    }

    /// Obtain a file object from the bytes of a whole file.
    pub fn from_bytes(self, bytes: &[u8]) -> Result<FileObject>
    where
        D: DataDictionary,
    {
        let magic_at = |offset: usize| {
            bytes.get(offset..offset + DICM_MAGIC_CODE.len()) == Some(&DICM_MAGIC_CODE[..])
        };
        let meta_start = match self.read_preamble {
            ReadPreamble::Auto if magic_at(PREAMBLE_LEN) => Some(PREAMBLE_LEN + 4),
            ReadPreamble::Auto if magic_at(0) => Some(4),
            ReadPreamble::Auto => None,
            ReadPreamble::Always => {
                ensure!(magic_at(PREAMBLE_LEN), NotDicomSnafu);
                Some(PREAMBLE_LEN + 4)
            }
            ReadPreamble::Never => {
                ensure!(magic_at(0), NotDicomSnafu);
                Some(4)
            }
        };

        let meta_start = match meta_start {
            Some(start) => start,
            None => return Ok(self.read_without_meta(bytes)),
        };

        let (meta, meta_len) =
            FileMetaTable::from_bytes(&bytes[meta_start..]).context(ParseMetaDataSetSnafu)?;
        let ts = meta
            .resolve_transfer_syntax()
            .context(ReadTransferSyntaxSnafu)?;
        let start = meta_start + meta_len;
        debug!("Reading data set at offset {} as {}", start, ts);
        let outcome = self.reader(ts, start).read(&bytes[start..]);
        Ok(FileObject::from_outcome(Some(meta), ts, outcome))
    }

    fn reader(&self, ts: TransferSyntax, start: usize) -> DataSetReader<&D>
    where
        D: DataDictionary,
    {
        DataSetReader::with_options(
            ts,
            &self.dictionary,
            self.read_options.base_offset(start as u64),
        )
    }

    /// Read a bare data set, trying implicit VR little endian first,
    /// then explicit VR little endian.
    fn read_without_meta(&self, bytes: &[u8]) -> FileObject
    where
        D: DataDictionary,
    {
        let clean = |outcome: &ParseOutcome| outcome.is_complete() && !outcome.dataset.is_empty();

        let implicit_ts = TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN;
        let implicit = self.reader(implicit_ts, 0).read(bytes);
        if clean(&implicit) {
            debug!("No magic code, read as {}", implicit_ts);
            return FileObject::from_outcome(None, implicit_ts, implicit);
        }
        let explicit_ts = TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN;
        let explicit = self.reader(explicit_ts, 0).read(bytes);
        if clean(&explicit) || explicit.dataset.len() > implicit.dataset.len() {
            debug!("No magic code, read as {}", explicit_ts);
            FileObject::from_outcome(None, explicit_ts, explicit)
        } else {
            debug!("No magic code, read as {}", implicit_ts);
            FileObject::from_outcome(None, implicit_ts, implicit)
        }
    }
}

/// An enumerate of supported options for
/// whether to expect the 128-byte preamble.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ReadPreamble {
    /// Detect the magic code after a preamble or at the very start.
    /// Without it, the data set is read on its own
    /// in a transfer syntax guessed from the content.
    #[default]
    Auto,
    /// Require the magic code at the very start, with no preamble.
    Never,
    /// Require the preamble followed by the magic code.
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReadError;

    #[rustfmt::skip]
    static IMPLICIT: &[u8] = &[
        0x10, 0x00, 0x10, 0x00, // (0010,0010) PatientName
            0x04, 0x00, 0x00, 0x00, // Length: 4
            b'D', b'o', b'e', b' ',
        0x10, 0x00, 0x20, 0x00, // (0010,0020) PatientID
            0x02, 0x00, 0x00, 0x00, // Length: 2
            b'4', b'2',
    ];

    #[rustfmt::skip]
    static EXPLICIT: &[u8] = &[
        0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x04, 0x00, // (0010,0010) PN, len 4
            b'D', b'o', b'e', b' ',
        0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x02, 0x00, // (0028,0010) US, len 2
            0x00, 0x02,
    ];

    #[test]
    fn bare_implicit_data_set() {
        let obj = from_bytes(IMPLICIT).unwrap();
        assert!(obj.meta().is_none());
        assert_eq!(obj.transfer_syntax(), TransferSyntax::IMPLICIT_VR_LITTLE_ENDIAN);
        assert!(obj.is_complete());
        assert_eq!(obj.dataset().len(), 2);
    }

    #[test]
    fn bare_explicit_data_set() {
        let obj = from_bytes(EXPLICIT).unwrap();
        assert!(obj.meta().is_none());
        assert_eq!(obj.transfer_syntax(), TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN);
        assert!(obj.is_complete());
        let codecs = obj.transfer_syntax().codecs();
        assert_eq!(
            obj.dataset()
                .value(dcmtree_dictionary_std::tags::ROWS, &codecs)
                .unwrap(),
            dcmtree_core::PrimitiveValue::from(512_u16)
        );
    }

    #[test]
    fn required_magic_code() {
        let err = OpenFileOptions::new()
            .read_preamble(ReadPreamble::Always)
            .from_bytes(IMPLICIT)
            .unwrap_err();
        assert!(matches!(err, ReadError::NotDicom { .. }));
    }

    #[test]
    fn missing_file() {
        let err = open_file("/nonexistent/file.dcm").unwrap_err();
        assert!(matches!(err, ReadError::OpenFile { .. }));
    }
}
