//! Two-pass encoder.
//!
//! The first pass counts symbols; the tree and code table are derived from
//! those counts; the second pass writes each symbol's codeword into a
//! [`BitWriter`]. The header carries the counts in first-seen order so a
//! decoder can rebuild the identical tree.

use std::io::Read;

use crate::bits::{BitWriter, PackedBits};
use crate::code::CodeTable;
use crate::config::CodecConfig;
use crate::decoder::Decoder;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::stream::{EncodedStream, Header};
use crate::symbol::Symbol;
use crate::tree::PrefixTree;

/// Prefix-code encoder.
///
/// Holds only configuration; every call builds its own table, tree and code.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    /// Create an encoder with the given settings.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Fixed-width bits per symbol used for savings reports.
    pub fn baseline_bits<S: Symbol>(&self) -> u32 {
        self.config.baseline_bits.unwrap_or(S::BITS)
    }

    /// Encode `source`.
    ///
    /// An empty source yields a header with zero symbols and an empty payload.
    ///
    /// # Errors
    /// Returns `Error::InternalConsistency` if a symbol has no code on the
    /// second pass, or if round-trip verification is enabled and fails.
    pub fn encode<S: Symbol>(&self, source: &[S]) -> Result<EncodedStream<S>> {
        let frequencies = FrequencyTable::from_symbols(source.iter().copied());
        let stream = build_stream(frequencies, source, |symbol, _| {
            Error::consistency(format!("symbol {symbol:?} missing from code table"))
        })?;

        if self.config.verify_round_trip {
            let decoder = Decoder::new(self.config.clone());
            verify(source, decoder.decode(&stream))?;
        }
        self.log_stats(&stream, source.len());
        Ok(stream)
    }

    /// Encode `source` with a code built from `table` instead of from `source`.
    ///
    /// `table` usually comes from a separate training corpus. The header
    /// carries `table` unchanged, so the decoded length is not the header
    /// total; decode such streams with [`Decoder::decode_with_table`].
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` for the first symbol of `source` that
    /// `table` does not contain.
    pub fn encode_with_table<S: Symbol>(
        &self,
        table: &FrequencyTable<S>,
        source: &[S],
    ) -> Result<EncodedStream<S>> {
        let stream = build_stream(table.clone(), source, |symbol, position| {
            Error::UnknownSymbol {
                symbol: format!("{symbol:?}"),
                position,
            }
        })?;

        if self.config.verify_round_trip {
            let decoder = Decoder::new(self.config.clone());
            verify(source, decoder.decode_with_table(&stream))?;
        }
        self.log_stats(&stream, source.len());
        Ok(stream)
    }

    /// Read all bytes from `reader` and encode them.
    ///
    /// # Errors
    /// Read failures surface as `Error::SourceUnavailable`.
    pub fn encode_reader<R: Read>(&self, reader: &mut R) -> Result<EncodedStream<u8>> {
        let mut source = Vec::new();
        reader
            .read_to_end(&mut source)
            .map_err(Error::SourceUnavailable)?;
        self.encode(&source)
    }

    fn log_stats<S: Symbol>(&self, stream: &EncodedStream<S>, symbols: usize) {
        let stats = stream.stats_for_length(symbols as u64, self.baseline_bits::<S>());
        log::debug!(
            "encoded {} symbols ({} distinct): {} payload bits vs {} baseline bits, saved {}",
            stats.symbols,
            stats.distinct,
            stats.payload_bits,
            stats.input_bits,
            stats.saved_bits()
        );
    }
}

fn build_stream<S, F>(
    frequencies: FrequencyTable<S>,
    source: &[S],
    missing: F,
) -> Result<EncodedStream<S>>
where
    S: Symbol,
    F: Fn(&S, usize) -> Error,
{
    let packed = match PrefixTree::build(&frequencies) {
        None => match source.first() {
            Some(symbol) => return Err(missing(symbol, 0)),
            None => PackedBits::default(),
        },
        Some(tree) => {
            let codes = CodeTable::from_tree(&tree);
            if log::log_enabled!(log::Level::Trace) {
                for line in codes.listing(&frequencies) {
                    log::trace!("code {}", line);
                }
            }
            pack(&codes, source, missing)?
        }
    };
    Ok(EncodedStream {
        header: Header::new(frequencies),
        padding_bits: packed.padding_bits,
        payload: packed.bytes,
    })
}

fn pack<S, F>(codes: &CodeTable<S>, source: &[S], missing: F) -> Result<PackedBits>
where
    S: Symbol,
    F: Fn(&S, usize) -> Error,
{
    let mut writer = BitWriter::with_capacity(source.len() as u64);
    for (position, symbol) in source.iter().enumerate() {
        let code = codes.get(symbol).ok_or_else(|| missing(symbol, position))?;
        writer.write_code(code);
    }
    Ok(writer.finish())
}

fn verify<S: Symbol>(source: &[S], decoded: Result<Vec<S>>) -> Result<()> {
    let decoded =
        decoded.map_err(|e| Error::consistency(format!("verification decode failed: {e}")))?;
    if decoded != source {
        return Err(Error::consistency(
            "verification decode does not match the source",
        ));
    }
    Ok(())
}
