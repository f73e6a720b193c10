//! Encoding and decoding primitives of the dcmtree codec.
//!
//! This crate provides the pieces that turn bytes into records
//! and back, one record at a time:
//!
//! - [`decode`] and [`encode`] read and write record headers
//!   (tag, value representation and length)
//!   in explicit or implicit VR, in either byte order;
//! - [`codec`] holds one value codec per value representation,
//!   converting a record's payload to and from a [`PrimitiveValue`];
//! - [`transfer_syntax`] ties both axes of the grammar together.
//!
//! Recursion into sequences and items is left to `dcmtree-parser`.
//!
//! [`PrimitiveValue`]: dcmtree_core::PrimitiveValue
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    unused_qualifications,
    unused_import_braces,
    missing_debug_implementations
)]

pub mod codec;
pub mod decode;
pub mod encode;
pub mod transfer_syntax;

pub use byteordered::Endianness;
pub use codec::{CodecRegistry, EncodeValueError, ValueCodec};
pub use decode::Decode;
pub use encode::Encode;
pub use transfer_syntax::TransferSyntax;
