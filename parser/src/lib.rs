//! This crate works on data sets as a whole:
//! the composite tree of elements, sequences and items,
//! its recursive reader and its recursive writer.
//!
//! Reading is best effort.
//! A [`ParseOutcome`] holds whatever could be read,
//! along with the diagnostics of any problem found on the way.
//!
//! ```
//! # use dcmtree_core::{PrimitiveValue, VR};
//! # use dcmtree_dictionary_std::{tags, StandardDataDictionary};
//! # use dcmtree_encoding::TransferSyntax;
//! # use dcmtree_parser::{DataSet, DataSetReader, DataSetWriter};
//! let ts = TransferSyntax::EXPLICIT_VR_LITTLE_ENDIAN;
//! let mut ds = DataSet::new();
//! ds.put_value(tags::PATIENT_AGE, VR::AS, "065Y", &ts.codecs())?;
//!
//! let bytes = DataSetWriter::new(ts).encode(&ds)?;
//! let outcome = DataSetReader::new(ts, StandardDataDictionary).read(&bytes);
//! assert!(outcome.is_complete());
//! assert_eq!(
//!     outcome.dataset.value(tags::PATIENT_AGE, &ts.codecs()),
//!     Some(PrimitiveValue::from("065Y")),
//! );
//! # Ok::<(), dcmtree_parser::error::Error>(())
//! ```
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]

pub mod dataset;
pub mod error;

pub use dataset::read::ValueReadStrategy;
pub use dataset::{
    DataSet, DataSetReader, DataSetWriter, Diagnostic, DiagnosticKind, Element, Item,
    LengthMode, Node, ParseOutcome, ReadOptions, Sequence, WriteOptions,
};
pub use error::{Error, Result};
