//! Persisted stream layout.
//!
//! ```text
//! u32 LE   symbol_count
//! repeat symbol_count times:
//!   symbol (Symbol::WIDTH bytes, LE)
//!   u64 LE frequency
//! u8       padding_bit_count
//! ...      payload (rest of the stream)
//! ```
//!
//! Entries appear in the order that seeded tie-breaking, so rebuilding the
//! tree from a parsed header reproduces the encoder's tree exactly.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

const ENTRY_FREQ_WIDTH: usize = 8;

/// Header: the frequency table the code was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<S: Symbol> {
    frequencies: FrequencyTable<S>,
}

impl<S: Symbol> Header<S> {
    /// Wrap a frequency table.
    pub fn new(frequencies: FrequencyTable<S>) -> Self {
        Self { frequencies }
    }

    /// Number of distinct symbols.
    pub fn symbol_count(&self) -> usize {
        self.frequencies.len()
    }

    /// The persisted frequencies, in tie-break order.
    pub fn frequencies(&self) -> &FrequencyTable<S> {
        &self.frequencies
    }

    /// Serialized size in bytes, excluding the padding count.
    pub fn encoded_len(&self) -> usize {
        4 + self.symbol_count() * (S::WIDTH + ENTRY_FREQ_WIDTH)
    }

    /// Write the header fields.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let count = u32::try_from(self.symbol_count()).map_err(|_| {
            Error::Configuration(format!(
                "{} distinct symbols do not fit a u32 header count",
                self.symbol_count()
            ))
        })?;
        writer.write_u32::<LittleEndian>(count)?;
        for entry in self.frequencies.iter() {
            entry.symbol.write_to(writer)?;
            writer.write_u64::<LittleEndian>(entry.count)?;
        }
        Ok(())
    }

    fn read_from(cursor: &mut Cursor<&[u8]>, config: &CodecConfig) -> Result<Self> {
        let count_offset = cursor.position();
        let count = cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| Error::corrupt(count_offset, "truncated symbol count"))?
            as usize;

        let remaining = cursor.get_ref().len() as u64 - cursor.position();
        let needed = (count as u64) * (S::WIDTH + ENTRY_FREQ_WIDTH) as u64 + 1;
        if count > config.max_symbols || needed > remaining {
            return Err(Error::corrupt(
                cursor.position(),
                format!(
                    "symbol count {count} inconsistent with {remaining} remaining bytes"
                ),
            ));
        }

        let mut frequencies = FrequencyTable::new();
        for _ in 0..count {
            let offset = cursor.position();
            let symbol = S::read_from(cursor)
                .map_err(|e| Error::corrupt(offset, format!("bad symbol: {e}")))?;
            let freq_offset = cursor.position();
            let frequency = cursor
                .read_u64::<LittleEndian>()
                .map_err(|_| Error::corrupt(freq_offset, "truncated frequency"))?;
            frequencies
                .insert(symbol, frequency)
                .map_err(|e| Error::corrupt(offset, e.to_string()))?;
        }

        if frequencies.total() > config.max_output_symbols {
            return Err(Error::corrupt(
                cursor.position(),
                format!(
                    "declared length {} exceeds limit {}",
                    frequencies.total(),
                    config.max_output_symbols
                ),
            ));
        }
        Ok(Self { frequencies })
    }
}

/// An encoded source: header, padding count and packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream<S: Symbol> {
    /// Frequencies the code was built from.
    pub header: Header<S>,
    /// Zero bits padding the last payload byte.
    pub padding_bits: u8,
    /// Packed codewords.
    pub payload: Vec<u8>,
}

impl<S: Symbol> EncodedStream<S> {
    /// Meaningful payload bits.
    ///
    /// Saturates at 0 for a hand-built stream whose padding exceeds its payload.
    pub fn payload_bits(&self) -> u64 {
        ((self.payload.len() as u64) * 8).saturating_sub(u64::from(self.padding_bits))
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len() + 1 + self.payload.len()
    }

    /// Write the full stream to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.header.write_to(writer)?;
        writer.write_u8(self.padding_bits)?;
        writer.write_all(&self.payload)?;
        Ok(())
    }

    /// Serialize to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Parse a stream with the default limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &CodecConfig::default())
    }

    /// Parse a stream, enforcing the limits in `config`.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` with the offending byte offset if the
    /// header is truncated or inconsistent.
    pub fn from_bytes_with(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let header = Header::read_from(&mut cursor, config)?;

        let padding_offset = cursor.position();
        let padding_bits = cursor
            .read_u8()
            .map_err(|_| Error::corrupt(padding_offset, "missing padding bit count"))?;
        if padding_bits > 7 {
            return Err(Error::corrupt(
                padding_offset,
                format!("padding bit count {padding_bits} exceeds 7"),
            ));
        }

        let payload_offset = cursor.position();
        let payload = bytes[payload_offset as usize..].to_vec();
        if header.symbol_count() == 0 && (!payload.is_empty() || padding_bits != 0) {
            return Err(Error::corrupt(
                padding_offset,
                "payload present for an empty alphabet",
            ));
        }
        match payload.last() {
            None if padding_bits > 0 => {
                return Err(Error::corrupt(
                    padding_offset,
                    "padding declared for an empty payload",
                ));
            }
            Some(&last) if last & ((1u8 << padding_bits) - 1) != 0 => {
                return Err(Error::corrupt(
                    payload_offset + payload.len() as u64 - 1,
                    "nonzero padding bits",
                ));
            }
            _ => {}
        }

        Ok(Self {
            header,
            padding_bits,
            payload,
        })
    }

    /// Read and parse a whole stream from `reader`.
    ///
    /// # Errors
    /// Read failures surface as `Error::SourceUnavailable`.
    pub fn read_from<R: Read>(reader: &mut R, config: &CodecConfig) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(Error::SourceUnavailable)?;
        Self::from_bytes_with(&bytes, config)
    }

    /// Size accounting against a fixed-width encoding of `baseline_bits` per symbol.
    ///
    /// The source length is the header total, which holds for streams whose
    /// code was built from their own source.
    pub fn stats(&self, baseline_bits: u32) -> CompressionStats {
        self.stats_for_length(self.header.frequencies().total(), baseline_bits)
    }

    /// Size accounting for a source of `symbols` symbols.
    pub fn stats_for_length(&self, symbols: u64, baseline_bits: u32) -> CompressionStats {
        CompressionStats {
            symbols,
            distinct: self.header.symbol_count(),
            input_bits: symbols * u64::from(baseline_bits),
            payload_bits: self.payload_bits(),
            header_bytes: self.header.encoded_len() + 1,
        }
    }
}

/// Size accounting for one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    /// Source length in symbols.
    pub symbols: u64,
    /// Distinct symbols.
    pub distinct: usize,
    /// Source size under the fixed-width baseline.
    pub input_bits: u64,
    /// Meaningful payload bits.
    pub payload_bits: u64,
    /// Header and padding-count bytes.
    pub header_bytes: usize,
}

impl CompressionStats {
    /// Bits saved by the payload relative to the baseline. Negative if it grew.
    pub fn saved_bits(&self) -> i128 {
        i128::from(self.input_bits) - i128::from(self.payload_bits)
    }

    /// Payload bits per baseline bit; 0 for an empty source.
    pub fn ratio(&self) -> f64 {
        if self.input_bits == 0 {
            return 0.0;
        }
        self.payload_bits as f64 / self.input_bits as f64
    }
}
