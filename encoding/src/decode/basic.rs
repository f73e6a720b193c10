//! This module provides the primitive decoder of binary numbers, which
//! may be in either Little Endian or Big Endian.

use byteordered::{ByteOrdered, Endianness};
use dcmtree_core::Tag;
use std::io::Read;

type Result<T> = std::io::Result<T>;

/// A basic decoder of primitive binary values,
/// with the byte order chosen at run time.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BasicDecoder {
    endianness: Endianness,
}

impl BasicDecoder {
    /// Create a basic decoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        BasicDecoder { endianness }
    }

    /// Retrieve the source's endianness, as expected by this decoder.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Decode an unsigned short value from the given source.
    pub fn decode_us<S: Read>(&self, source: S) -> Result<u16> {
        ByteOrdered::runtime(source, self.endianness).read_u16()
    }

    /// Decode a sequence of unsigned shorts into the given slice.
    pub fn decode_us_into<S: Read>(&self, source: S, target: &mut [u16]) -> Result<()> {
        ByteOrdered::runtime(source, self.endianness).read_u16_into(target)
    }

    /// Decode an unsigned long value from the given source.
    pub fn decode_ul<S: Read>(&self, source: S) -> Result<u32> {
        ByteOrdered::runtime(source, self.endianness).read_u32()
    }

    /// Decode a sequence of unsigned longs into the given slice.
    pub fn decode_ul_into<S: Read>(&self, source: S, target: &mut [u32]) -> Result<()> {
        ByteOrdered::runtime(source, self.endianness).read_u32_into(target)
    }

    /// Decode a sequence of signed shorts into the given slice.
    pub fn decode_ss_into<S: Read>(&self, source: S, target: &mut [i16]) -> Result<()> {
        ByteOrdered::runtime(source, self.endianness).read_i16_into(target)
    }

    /// Decode a sequence of signed longs into the given slice.
    pub fn decode_sl_into<S: Read>(&self, source: S, target: &mut [i32]) -> Result<()> {
        ByteOrdered::runtime(source, self.endianness).read_i32_into(target)
    }

    /// Decode a sequence of single precision floats into the given slice.
    pub fn decode_fl_into<S: Read>(&self, source: S, target: &mut [f32]) -> Result<()> {
        ByteOrdered::runtime(source, self.endianness).read_f32_into(target)
    }

    /// Decode a sequence of double precision floats into the given slice.
    pub fn decode_fd_into<S: Read>(&self, source: S, target: &mut [f64]) -> Result<()> {
        ByteOrdered::runtime(source, self.endianness).read_f64_into(target)
    }

    /// Decode an attribute tag: the group, then the element,
    /// each in this decoder's byte order.
    pub fn decode_tag<S: Read>(&self, source: S) -> Result<Tag> {
        let mut source = ByteOrdered::runtime(source, self.endianness);
        let group = source.read_u16()?;
        let element = source.read_u16()?;
        Ok(Tag(group, element))
    }
}

impl From<Endianness> for BasicDecoder {
    fn from(endianness: Endianness) -> Self {
        BasicDecoder::new(endianness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_integers() {
        let data: &[u8] = &[0xC3, 0x3C, 0x33, 0xCC, 0x55, 0xAA, 0x55, 0xAA];

        let le = BasicDecoder::new(Endianness::Little);
        let be = BasicDecoder::new(Endianness::Big);

        assert_eq!(le.decode_us(data).unwrap(), 0x3CC3);
        assert_eq!(be.decode_us(data).unwrap(), 0xC33C);
        assert_eq!(le.decode_ul(data).unwrap(), 0xCC333CC3);
        assert_eq!(be.decode_ul(data).unwrap(), 0xC33C33CC);
        assert_eq!(le.decode_tag(data).unwrap(), Tag(0x3CC3, 0xCC33));
        assert_eq!(be.decode_tag(data).unwrap(), Tag(0xC33C, 0x33CC));
    }

    #[test]
    fn test_read_integers_into() {
        let data: &[u8] = &[0xC3, 0x3C, 0x33, 0xCC, 0x55, 0xAA, 0x55, 0xAA];

        let le = BasicDecoder::new(Endianness::Little);
        let be = BasicDecoder::new(Endianness::Big);

        let mut out_le = [0; 4];
        le.decode_us_into(data, &mut out_le).unwrap();
        assert_eq!(out_le, [0x3CC3, 0xCC33, 0xAA55, 0xAA55]);

        let mut out_be = [0; 4];
        be.decode_us_into(data, &mut out_be).unwrap();
        assert_eq!(out_be, [0xC33C, 0x33CC, 0x55AA, 0x55AA]);

        let mut out_le = [0; 2];
        le.decode_ul_into(data, &mut out_le).unwrap();
        assert_eq!(out_le, [0xCC33_3CC3, 0xAA55_AA55]);

        let mut out_be = [0; 2];
        be.decode_ul_into(data, &mut out_be).unwrap();
        assert_eq!(out_be, [0xC33C_33CC, 0x55AA_55AA]);
    }

    #[test]
    fn test_read_short_source_fails() {
        let data: &[u8] = &[0x01, 0x02, 0x03];
        let le = BasicDecoder::new(Endianness::Little);
        assert!(le.decode_ul(data).is_err());
        assert!(le.decode_tag(data).is_err());
    }
}
