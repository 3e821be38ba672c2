//! Bit packing.
//!
//! Codewords are bit sequences but storage is byte-granular. [`BitWriter`]
//! packs bits most-significant-first into bytes and, on [`BitWriter::finish`],
//! pads the last byte with zero bits and reports how many it added.
//! [`BitReader`] replays the same bits and stops at the unpadded boundary.

use std::iter::FusedIterator;

use crate::code::Code;
use crate::error::{Error, Result};

/// Byte storage plus the number of trailing padding bits in the last byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBits {
    /// Packed bytes.
    pub bytes: Vec<u8>,
    /// Zero bits appended to fill the last byte (0..=7).
    pub padding_bits: u8,
}

impl PackedBits {
    /// Number of meaningful bits.
    pub fn bit_len(&self) -> u64 {
        ((self.bytes.len() as u64) * 8).saturating_sub(u64::from(self.padding_bits))
    }
}

/// Bit writer.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bits` bits.
    pub fn with_capacity(bits: u64) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8) as usize),
            ..Self::default()
        }
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | u8::from(bit);
        self.filled += 1;
        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    /// Append a sequence of bits.
    pub fn write_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.write_bit(bit);
        }
    }

    /// Append a codeword.
    pub fn write_code(&mut self, code: &Code) {
        self.write_bits(code.bits());
    }

    /// Bits written so far.
    pub fn bit_len(&self) -> u64 {
        (self.bytes.len() as u64) * 8 + u64::from(self.filled)
    }

    /// Pad the last partial byte with zeros and return the storage.
    pub fn finish(mut self) -> PackedBits {
        let mut padding_bits = 0;
        if self.filled > 0 {
            padding_bits = 8 - self.filled;
            self.bytes.push(self.current << padding_bits);
        }
        PackedBits {
            bytes: self.bytes,
            padding_bits,
        }
    }
}

/// Bit reader over packed storage.
///
/// A reader only moves forward; once it returns `None` it keeps returning
/// `None`. Not `Clone`: bits can be consumed only once.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: u64,
    end: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader that yields all but the last `padding_bits` bits.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` if `padding_bits` exceeds 7, is nonzero
    /// for empty storage, or the padding bits themselves are not zero.
    pub fn new(bytes: &'a [u8], padding_bits: u8) -> Result<Self> {
        if padding_bits > 7 {
            return Err(Error::corrupt(
                0,
                format!("padding bit count {padding_bits} exceeds 7"),
            ));
        }
        match bytes.last() {
            None if padding_bits > 0 => {
                return Err(Error::corrupt(0, "padding declared for an empty payload"));
            }
            Some(&last) if last & ((1u8 << padding_bits) - 1) != 0 => {
                return Err(Error::corrupt(
                    bytes.len() as u64 - 1,
                    "nonzero padding bits",
                ));
            }
            _ => {}
        }
        Ok(Self {
            bytes,
            position: 0,
            end: (bytes.len() as u64) * 8 - u64::from(padding_bits),
        })
    }

    /// Index of the next bit.
    pub fn bit_position(&self) -> u64 {
        self.position
    }

    /// Byte offset of the next bit.
    pub fn byte_offset(&self) -> u64 {
        self.position / 8
    }

    /// Bits left before the padding boundary.
    pub fn remaining(&self) -> u64 {
        self.end - self.position
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.position >= self.end {
            return None;
        }
        let byte = self.bytes[(self.position / 8) as usize];
        let shift = 7 - (self.position % 8);
        self.position += 1;
        Some((byte >> shift) & 1 == 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitReader<'_> {}

impl FusedIterator for BitReader<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_msb_first_with_padding() {
        let mut writer = BitWriter::new();
        writer.write_bits(&[true, false, true, true, false, false, false, false, true, true]);
        assert_eq!(writer.bit_len(), 10);
        let packed = writer.finish();
        assert_eq!(packed.bytes, vec![0b1011_0000, 0b1100_0000]);
        assert_eq!(packed.padding_bits, 6);
        assert_eq!(packed.bit_len(), 10);
    }

    #[test]
    fn test_whole_bytes_need_no_padding() {
        let mut writer = BitWriter::with_capacity(16);
        for _ in 0..16 {
            writer.write_bit(true);
        }
        let packed = writer.finish();
        assert_eq!(packed.bytes, vec![0xff, 0xff]);
        assert_eq!(packed.padding_bits, 0);
    }

    #[test]
    fn test_empty_writer() {
        let packed = BitWriter::new().finish();
        assert!(packed.bytes.is_empty());
        assert_eq!(packed.padding_bits, 0);
        assert_eq!(BitReader::new(&packed.bytes, 0).unwrap().count(), 0);
    }

    #[test]
    fn test_reader_stops_at_padding() {
        let bytes = [0b1010_0000u8];
        let mut reader = BitReader::new(&bytes, 5).unwrap();
        assert_eq!(reader.len(), 3);
        assert_eq!(reader.next(), Some(true));
        assert_eq!(reader.next(), Some(false));
        assert_eq!(reader.next(), Some(true));
        assert_eq!(reader.next(), None);
        assert_eq!(reader.next(), None);
        assert_eq!(reader.bit_position(), 3);
    }

    #[test]
    fn test_reader_rejects_bad_padding() {
        assert!(matches!(
            BitReader::new(&[0u8], 8),
            Err(Error::CorruptStream { .. })
        ));
        assert!(matches!(
            BitReader::new(&[], 3),
            Err(Error::CorruptStream { .. })
        ));
        assert!(matches!(
            BitReader::new(&[0x00, 0b0000_0001], 2),
            Err(Error::CorruptStream { offset: 1, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_bits_replay_in_order(bits in prop::collection::vec(any::<bool>(), 0..300)) {
            let mut writer = BitWriter::new();
            writer.write_bits(&bits);
            let packed = writer.finish();
            prop_assert_eq!(packed.bytes.len(), bits.len().div_ceil(8));
            let read: Vec<bool> = BitReader::new(&packed.bytes, packed.padding_bits)
                .unwrap()
                .collect();
            prop_assert_eq!(read, bits);
        }
    }
}
