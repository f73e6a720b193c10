//! Module containing the file meta information table,
//! along with its reader and writer.
//!
//! The file meta group is always encoded in explicit VR little endian,
//! regardless of the transfer syntax of the data set that follows it.
use byteordered::byteorder::{ByteOrder, LittleEndian};
use dcmtree_core::header::HasLength;
use dcmtree_core::{Tag, VR};
use dcmtree_dictionary_std::{tags, StandardDataDictionary};
use dcmtree_encoding::transfer_syntax::TransferSyntaxError;
use dcmtree_encoding::{CodecRegistry, Decode, TransferSyntax};
use dcmtree_parser::{DataSet, DataSetWriter, Element, Node};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{Cursor, Write};
use tracing::{debug, warn};

/// The magic code following the preamble.
pub const DICM_MAGIC_CODE: [u8; 4] = *b"DICM";

/// Implementation Class UID written by default.
pub const IMPLEMENTATION_CLASS_UID: &str = "2.25.137038125948464847900039011591283709926";

/// Implementation Version Name written by default.
pub const IMPLEMENTATION_VERSION_NAME: &str = "DCMTREE_0_1";

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// An issue occurred while decoding the next record header
    /// of the file meta group.
    #[snafu(display("Could not decode file meta element header: {}", source))]
    DecodeElement {
        #[snafu(backtrace)]
        source: dcmtree_encoding::decode::Error,
    },

    /// A record of the file meta group declared more bytes
    /// than what is available.
    #[snafu(display("Value of file meta element {} goes past the end of the data", tag))]
    UnexpectedEnd { tag: Tag, backtrace: Backtrace },

    /// The value length of a data element is undefined,
    /// but knowing the length is required in its context.
    #[snafu(display("Undefined value length for data element tagged {}", tag))]
    UndefinedValueLength { tag: Tag, backtrace: Backtrace },

    /// A data element outside of the file meta group was given.
    #[snafu(display("Unexpected data element tagged {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },

    /// A required file meta data element is missing.
    #[snafu(display("Missing data element `{}`", alias))]
    MissingElement {
        alias: &'static str,
        backtrace: Backtrace,
    },

    /// The value of a data element in the file meta group was rejected.
    #[snafu(display("Could not build file meta element"))]
    BuildElement {
        #[snafu(backtrace)]
        source: dcmtree_parser::Error,
    },

    /// The file meta group data set could not be written.
    #[snafu(display("Could not write file meta group data set"))]
    WriteSet {
        #[snafu(backtrace)]
        source: dcmtree_parser::Error,
    },

    #[snafu(display("Could not write file meta group bytes"))]
    WriteBytes {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// File meta information table.
///
/// Text values are kept without their trailing padding.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaTable {
    /// File Meta Information Group Length, as last read or written
    pub information_group_length: u32,
    /// File Meta Information Version
    pub information_version: [u8; 2],
    /// Media Storage SOP Class UID
    pub media_storage_sop_class_uid: String,
    /// Media Storage SOP Instance UID
    pub media_storage_sop_instance_uid: String,
    /// Transfer Syntax UID
    pub transfer_syntax: String,
    /// Implementation Class UID
    pub implementation_class_uid: String,

    /// Implementation Version Name
    pub implementation_version_name: Option<String>,
    /// Source Application Entity Title
    pub source_application_entity_title: Option<String>,
    /// Private Information Creator UID
    pub private_information_creator_uid: Option<String>,
    /// Private Information
    pub private_information: Option<Vec<u8>>,
}

impl FileMetaTable {
    /// Read the file meta group at the start of the given bytes,
    /// which begin right after the `DICM` magic code.
    ///
    /// Records are consumed for as long as they belong to group 0x0002.
    /// Returns the table and the number of bytes it occupies.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        let decoder = TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN.decoder(StandardDataDictionary);
        let mut cursor = Cursor::new(bytes);
        let mut dataset = DataSet::new();

        loop {
            let start = cursor.position() as usize;
            let rest = &bytes[start..];
            if rest.len() < 8 || LittleEndian::read_u16(rest) != 0x0002 {
                break;
            }
            let (header, _) = decoder
                .decode_header(&mut cursor)
                .context(DecodeElementSnafu)?;
            let len = header
                .length()
                .get()
                .context(UndefinedValueLengthSnafu { tag: header.tag })?;
            let data_start = cursor.position() as usize;
            let data_end = data_start + len as usize;
            ensure!(
                data_end <= bytes.len(),
                UnexpectedEndSnafu { tag: header.tag }
            );
            dataset.push(Element::new(
                header.tag,
                header.vr,
                bytes[data_start..data_end].to_vec(),
            ));
            cursor.set_position(data_end as u64);
        }

        let consumed = cursor.position() as usize;
        let table = FileMetaTable::from_dataset(&dataset)?;
        // the group length covers every record after its own
        if dataset
            .element(tags::FILE_META_INFORMATION_GROUP_LENGTH)
            .is_some()
            && table.information_group_length as usize + 12 != consumed
        {
            warn!(
                "File meta group length is {}, but {} bytes were found",
                table.information_group_length,
                consumed.saturating_sub(12)
            );
        }
        debug!("Read file meta group of {} bytes", consumed);
        Ok((table, consumed))
    }

    /// Extract the table from a data set of file meta elements.
    pub fn from_dataset(dataset: &DataSet) -> Result<Self> {
        let codecs = CodecRegistry::little_endian();
        let text = |tag: Tag| -> Option<String> {
            dataset
                .value(tag, &codecs)
                .map(|v| v.to_str().into_owned())
                .filter(|s| !s.is_empty())
        };

        for node in dataset {
            ensure!(
                node.tag().group() == 0x0002,
                UnexpectedTagSnafu { tag: node.tag() }
            );
        }

        let information_group_length = dataset
            .element(tags::FILE_META_INFORMATION_GROUP_LENGTH)
            .map(|e| e.data())
            .filter(|data| data.len() == 4)
            .map(LittleEndian::read_u32)
            .unwrap_or(0);

        let information_version = match dataset
            .element(tags::FILE_META_INFORMATION_VERSION)
            .map(|e| e.data())
        {
            Some(&[a, b]) => [a, b],
            Some(other) => {
                warn!(
                    "File meta information version has {} bytes instead of 2",
                    other.len()
                );
                [0, 1]
            }
            None => [0, 1],
        };

        Ok(FileMetaTable {
            information_group_length,
            information_version,
            media_storage_sop_class_uid: text(tags::MEDIA_STORAGE_SOP_CLASS_UID).context(
                MissingElementSnafu {
                    alias: "MediaStorageSOPClassUID",
                },
            )?,
            media_storage_sop_instance_uid: text(tags::MEDIA_STORAGE_SOP_INSTANCE_UID).context(
                MissingElementSnafu {
                    alias: "MediaStorageSOPInstanceUID",
                },
            )?,
            transfer_syntax: text(tags::TRANSFER_SYNTAX_UID).context(MissingElementSnafu {
                alias: "TransferSyntaxUID",
            })?,
            implementation_class_uid: text(tags::IMPLEMENTATION_CLASS_UID)
                .unwrap_or_else(|| IMPLEMENTATION_CLASS_UID.to_string()),
            implementation_version_name: text(tags::IMPLEMENTATION_VERSION_NAME),
            source_application_entity_title: text(tags::SOURCE_APPLICATION_ENTITY_TITLE),
            private_information_creator_uid: text(tags::PRIVATE_INFORMATION_CREATOR_UID),
            private_information: dataset
                .element(tags::PRIVATE_INFORMATION)
                .map(|e| e.data().to_vec()),
        })
    }

    /// Resolve the transfer syntax declared in the table.
    pub fn resolve_transfer_syntax(&self) -> Result<TransferSyntax, TransferSyntaxError> {
        TransferSyntax::from_uid(&self.transfer_syntax)
    }

    /// Build the data set of file meta elements,
    /// starting with a freshly computed group length.
    pub fn to_dataset(&self) -> Result<DataSet> {
        let codecs = CodecRegistry::little_endian();
        let mut body = DataSet::new();
        body.push(Element::new(
            tags::FILE_META_INFORMATION_VERSION,
            VR::OB,
            self.information_version.to_vec(),
        ));

        let mut put = |tag: Tag, vr: VR, value: &str| {
            body.put_value(tag, vr, value, &codecs)
                .context(BuildElementSnafu)
        };
        put(
            tags::MEDIA_STORAGE_SOP_CLASS_UID,
            VR::UI,
            &self.media_storage_sop_class_uid,
        )?;
        put(
            tags::MEDIA_STORAGE_SOP_INSTANCE_UID,
            VR::UI,
            &self.media_storage_sop_instance_uid,
        )?;
        put(tags::TRANSFER_SYNTAX_UID, VR::UI, &self.transfer_syntax)?;
        put(
            tags::IMPLEMENTATION_CLASS_UID,
            VR::UI,
            &self.implementation_class_uid,
        )?;
        if let Some(v) = &self.implementation_version_name {
            put(tags::IMPLEMENTATION_VERSION_NAME, VR::SH, v)?;
        }
        if let Some(v) = &self.source_application_entity_title {
            put(tags::SOURCE_APPLICATION_ENTITY_TITLE, VR::AE, v)?;
        }
        if let Some(v) = &self.private_information_creator_uid {
            put(tags::PRIVATE_INFORMATION_CREATOR_UID, VR::UI, v)?;
        }
        if let Some(v) = &self.private_information {
            body.push(Element::new(tags::PRIVATE_INFORMATION, VR::OB, v.clone()));
        }

        let group_length = DataSetWriter::new(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)
            .encode(&body)
            .context(WriteSetSnafu)?
            .len() as u32;
        let group_length = Element::from_value(
            tags::FILE_META_INFORMATION_GROUP_LENGTH,
            VR::UL,
            &group_length.into(),
            &codecs,
        )
        .context(BuildElementSnafu)?;

        Ok(std::iter::once(Node::from(group_length))
            .chain(body)
            .collect())
    }

    /// Encode the file meta group in explicit VR little endian,
    /// updating the recorded group length.
    pub fn encode(&mut self) -> Result<Vec<u8>> {
        let dataset = self.to_dataset()?;
        let bytes = DataSetWriter::new(TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN)
            .encode(&dataset)
            .context(WriteSetSnafu)?;
        self.information_group_length = (bytes.len() - 12) as u32;
        Ok(bytes)
    }

    /// Write the file meta group to the given writer.
    pub fn write<W: Write>(&mut self, mut to: W) -> Result<()> {
        let bytes = self.encode()?;
        to.write_all(&bytes).context(WriteBytesSnafu)
    }
}

/// A builder for file meta information tables.
#[derive(Debug, Default, Clone)]
pub struct FileMetaTableBuilder {
    information_version: Option<[u8; 2]>,
    media_storage_sop_class_uid: Option<String>,
    media_storage_sop_instance_uid: Option<String>,
    transfer_syntax: Option<String>,
    implementation_class_uid: Option<String>,
    implementation_version_name: Option<String>,
    source_application_entity_title: Option<String>,
}

impl FileMetaTableBuilder {
    /// Create a new, empty builder.
    pub fn new() -> FileMetaTableBuilder {
        FileMetaTableBuilder::default()
    }

    /// Define the meta information version.
    pub fn information_version(mut self, value: [u8; 2]) -> Self {
        self.information_version = Some(value);
        self
    }

    /// Define the media storage SOP class UID.
    pub fn media_storage_sop_class_uid(mut self, value: impl Into<String>) -> Self {
        self.media_storage_sop_class_uid = Some(value.into());
        self
    }

    /// Define the media storage SOP instance UID.
    pub fn media_storage_sop_instance_uid(mut self, value: impl Into<String>) -> Self {
        self.media_storage_sop_instance_uid = Some(value.into());
        self
    }

    /// Define the transfer syntax UID.
    pub fn transfer_syntax(mut self, value: impl Into<String>) -> Self {
        self.transfer_syntax = Some(value.into());
        self
    }

    /// Define the implementation class UID.
    pub fn implementation_class_uid(mut self, value: impl Into<String>) -> Self {
        self.implementation_class_uid = Some(value.into());
        self
    }

    /// Define the implementation version name.
    pub fn implementation_version_name(mut self, value: impl Into<String>) -> Self {
        self.implementation_version_name = Some(value.into());
        self
    }

    /// Define the source application entity title.
    pub fn source_application_entity_title(mut self, value: impl Into<String>) -> Self {
        self.source_application_entity_title = Some(value.into());
        self
    }

    /// Build the table.
    ///
    /// The SOP class, SOP instance and transfer syntax UIDs are required.
    /// The implementation class UID and version name
    /// default to those of this crate.
    pub fn build(self) -> Result<FileMetaTable> {
        let media_storage_sop_class_uid =
            self.media_storage_sop_class_uid
                .context(MissingElementSnafu {
                    alias: "MediaStorageSOPClassUID",
                })?;
        let media_storage_sop_instance_uid =
            self.media_storage_sop_instance_uid
                .context(MissingElementSnafu {
                    alias: "MediaStorageSOPInstanceUID",
                })?;
        let transfer_syntax = self.transfer_syntax.context(MissingElementSnafu {
            alias: "TransferSyntaxUID",
        })?;
        let implementation_version_name = match self.implementation_class_uid {
            Some(_) => self.implementation_version_name,
            None => self
                .implementation_version_name
                .or_else(|| Some(IMPLEMENTATION_VERSION_NAME.to_string())),
        };

        let mut table = FileMetaTable {
            information_group_length: 0,
            information_version: self.information_version.unwrap_or([0, 1]),
            media_storage_sop_class_uid,
            media_storage_sop_instance_uid,
            transfer_syntax,
            implementation_class_uid: self
                .implementation_class_uid
                .unwrap_or_else(|| IMPLEMENTATION_CLASS_UID.to_string()),
            implementation_version_name,
            source_application_entity_title: self.source_application_entity_title,
            private_information_creator_uid: None,
            private_information: None,
        };
        table.encode()?;
        Ok(table)
    }
}
