//! Implicit VR header decoding.
//!
//! The value representation is not present in the data,
//! so it is resolved from a data dictionary by tag.

use crate::decode::basic::BasicDecoder;
use crate::decode::{
    BadSequenceHeaderSnafu, Decode, ReadHeaderTagSnafu, ReadItemHeaderSnafu, ReadLengthSnafu,
    ReadTagSnafu, Result,
};
use byteordered::Endianness;
use dcmtree_core::dictionary::DataDictionary;
use dcmtree_core::header::{DataElementHeader, Length, SequenceItemHeader};
use dcmtree_core::{Tag, VR};
use snafu::ResultExt;
use std::io::Read;

/// A record header decoder for implicit VR transfer syntaxes.
///
/// Tags absent from the dictionary are reported as [`VR::UN`].
#[derive(Debug, Clone)]
pub struct ImplicitVRDecoder<D> {
    basic: BasicDecoder,
    dict: D,
}

impl<D> ImplicitVRDecoder<D> {
    /// Create an implicit VR decoder for the given byte order,
    /// resolving value representations with the given dictionary.
    pub fn new(endianness: Endianness, dict: D) -> Self {
        ImplicitVRDecoder {
            basic: BasicDecoder::new(endianness),
            dict,
        }
    }

    /// Create an implicit VR little endian decoder.
    pub fn little_endian(dict: D) -> Self {
        Self::new(Endianness::Little, dict)
    }

    /// The byte order of this decoder.
    pub fn endianness(&self) -> Endianness {
        self.basic.endianness()
    }
}

impl<D> Decode for ImplicitVRDecoder<D>
where
    D: DataDictionary,
{
    fn decode_header<S>(&self, mut source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut source)
            .context(ReadHeaderTagSnafu)?;
        let len = self
            .basic
            .decode_ul(&mut source)
            .context(ReadLengthSnafu)?;

        let vr = if tag.is_structural() {
            VR::UN
        } else {
            self.dict.resolve_vr(tag)
        };
        Ok((DataElementHeader::new(tag, vr, Length(len)), 8))
    }

    fn decode_item_header<S>(&self, mut source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut source)
            .context(ReadItemHeaderSnafu)?;
        let len = self
            .basic
            .decode_ul(&mut source)
            .context(ReadItemHeaderSnafu)?;
        SequenceItemHeader::new(tag, Length(len)).context(BadSequenceHeaderSnafu)
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        self.basic.decode_tag(source).context(ReadTagSnafu)
    }
}
