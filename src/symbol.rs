//! Code units that can be counted, coded and persisted.
//!
//! A symbol is one code unit of the source: a byte, a 16-bit unit, or a
//! Unicode scalar value. Each symbol type has a fixed width on the wire, and
//! that width doubles as the fixed-width baseline for savings reports.

use std::fmt::Debug;
use std::hash::Hash;
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// A single code unit of a source sequence.
pub trait Symbol: Copy + Eq + Hash + Debug {
    /// Number of bytes one symbol occupies in a persisted header.
    const WIDTH: usize;

    /// Bits per symbol in a fixed-width encoding.
    const BITS: u32 = (Self::WIDTH as u32) * 8;

    /// Write the symbol in its persisted form.
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    /// Read a symbol previously written by [`Symbol::write_to`].
    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self>;
}

impl Symbol for u8 {
    const WIDTH: usize = 1;

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(*self)
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u8()
    }
}

impl Symbol for u16 {
    const WIDTH: usize = 2;

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(*self)
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u16::<LittleEndian>()
    }
}

impl Symbol for u32 {
    const WIDTH: usize = 4;

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(*self)
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_u32::<LittleEndian>()
    }
}

impl Symbol for char {
    const WIDTH: usize = 4;

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(u32::from(*self))
    }

    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let raw = reader.read_u32::<LittleEndian>()?;
        char::from_u32(raw).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{raw:#x} is not a unicode scalar value"),
            )
        })
    }
}
