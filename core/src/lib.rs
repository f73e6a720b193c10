#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of dcmtree containing the concepts
//! and data structures shared by every layer of the codec.
//!
//! The current structure of this crate is as follows:
//!
//! - [`header`] comprises the data types of a record header,
//!   including the attribute tag, the value representation (type tag)
//!   and the value length.
//! - [`dictionary`] describes common behavior of data dictionaries,
//!   which translate tags to an entry containing relevant information
//!   about the attribute.
//! - [`value`] holds the typed values obtained from decoding
//!   a leaf record's payload.

pub mod dictionary;
pub mod header;
pub mod prelude;
pub mod value;

pub use dictionary::{DataDictionary, DictionaryEntry};
pub use header::{DataElementHeader, Length, SequenceItemHeader, Tag, VR};
pub use value::PrimitiveValue;

// re-export crates that are part of the public API
pub use smallvec;
