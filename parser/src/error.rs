//! Errors raised while building or writing a data set.
//!
//! Reading never fails as a whole:
//! framing problems are reported as [diagnostics](crate::dataset::Diagnostic).

use dcmtree_core::Tag;
use dcmtree_encoding::codec::EncodeValueError;
use dcmtree_encoding::encode::Error as EncodeError;
use snafu::{Backtrace, Snafu};
use std::io;

#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The value cannot be encoded in the element's VR.
    #[snafu(display("Invalid value for element {}", tag))]
    EncodeValue {
        tag: Tag,
        #[snafu(backtrace)]
        source: EncodeValueError,
    },
    #[snafu(display("Could not write header of element {}", tag))]
    WriteHeader {
        tag: Tag,
        #[snafu(backtrace)]
        source: EncodeError,
    },
    #[snafu(display("Could not write item framing"))]
    WriteItem {
        #[snafu(backtrace)]
        source: EncodeError,
    },
    #[snafu(display("Could not write sequence delimiter of {}", tag))]
    WriteSequenceDelimiter {
        tag: Tag,
        #[snafu(backtrace)]
        source: EncodeError,
    },
    /// The encoded content does not fit in a 32-bit length field.
    #[snafu(display("Content of {} is {} bytes long, too long for a defined length", tag, len))]
    ContentTooLong {
        tag: Tag,
        len: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not back-patch the length of {}", tag))]
    PatchLength {
        tag: Tag,
        source: io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write encoded data set"))]
    WriteOutput {
        source: io::Error,
        backtrace: Backtrace,
    },
}

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
