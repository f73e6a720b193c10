//! This module provides the primitive encoder of binary numbers:
//! little endian or big endian, chosen at run time.

use byteordered::{ByteOrdered, Endianness};
use dcmtree_core::Tag;
use std::io::Write;

type Result<T> = std::io::Result<T>;

/// A basic encoder of primitive binary values.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub struct BasicEncoder {
    endianness: Endianness,
}

impl BasicEncoder {
    /// Create a basic encoder for the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        BasicEncoder { endianness }
    }

    /// Retrieve the destination's endianness, as expected by this encoder.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Encode an unsigned short value to the given writer.
    pub fn encode_us<W: Write>(&self, to: W, value: u16) -> Result<()> {
        ByteOrdered::runtime(to, self.endianness).write_u16(value)
    }

    /// Encode an unsigned long value to the given writer.
    pub fn encode_ul<W: Write>(&self, to: W, value: u32) -> Result<()> {
        ByteOrdered::runtime(to, self.endianness).write_u32(value)
    }

    /// Encode a signed short value to the given writer.
    pub fn encode_ss<W: Write>(&self, to: W, value: i16) -> Result<()> {
        ByteOrdered::runtime(to, self.endianness).write_i16(value)
    }

    /// Encode a signed long value to the given writer.
    pub fn encode_sl<W: Write>(&self, to: W, value: i32) -> Result<()> {
        ByteOrdered::runtime(to, self.endianness).write_i32(value)
    }

    /// Encode a single precision float value to the given writer.
    pub fn encode_fl<W: Write>(&self, to: W, value: f32) -> Result<()> {
        ByteOrdered::runtime(to, self.endianness).write_f32(value)
    }

    /// Encode a double precision float value to the given writer.
    pub fn encode_fd<W: Write>(&self, to: W, value: f64) -> Result<()> {
        ByteOrdered::runtime(to, self.endianness).write_f64(value)
    }

    /// Encode an attribute tag, group first.
    pub fn encode_tag<W: Write>(&self, to: W, tag: Tag) -> Result<()> {
        let mut to = ByteOrdered::runtime(to, self.endianness);
        to.write_u16(tag.group())?;
        to.write_u16(tag.element())
    }
}

impl From<Endianness> for BasicEncoder {
    fn from(endianness: Endianness) -> Self {
        BasicEncoder::new(endianness)
    }
}
