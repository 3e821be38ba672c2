//! Decoder.
//!
//! Rebuilds the encoder's tree from the header frequencies (same builder,
//! same tie-break order) and walks it one payload bit at a time.

use std::io::Read;

use crate::bits::BitReader;
use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::stream::{EncodedStream, Header};
use crate::symbol::Symbol;
use crate::tree::{Node, PrefixTree};

/// Prefix-code decoder.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    /// Create a decoder; `config` limits apply when parsing serialized streams.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a parsed stream.
    pub fn decode<S: Symbol>(&self, stream: &EncodedStream<S>) -> Result<Vec<S>> {
        self.decode_parts(&stream.header, &stream.payload, stream.padding_bits)
    }

    /// Parse and decode a serialized stream.
    pub fn decode_bytes<S: Symbol>(&self, bytes: &[u8]) -> Result<Vec<S>> {
        EncodedStream::from_bytes_with(bytes, &self.config)
            .and_then(|stream| self.decode(&stream))
            .map_err(|e| {
                log::warn!("rejected encoded stream: {}", e);
                e
            })
    }

    /// Read, parse and decode a serialized stream.
    ///
    /// # Errors
    /// Read failures surface as `Error::SourceUnavailable`.
    pub fn decode_reader<S: Symbol, R: Read>(&self, reader: &mut R) -> Result<Vec<S>> {
        let stream = EncodedStream::read_from(reader, &self.config)?;
        self.decode(&stream)
    }

    /// Decode `payload` against `header`, ignoring the last `padding_bits` bits.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` (offsets relative to `payload`) if the
    /// bits end inside a codeword, the decoded length disagrees with the
    /// header, or the padding is invalid.
    pub fn decode_parts<S: Symbol>(
        &self,
        header: &Header<S>,
        payload: &[u8],
        padding_bits: u8,
    ) -> Result<Vec<S>> {
        decode_payload(header, payload, padding_bits, Length::HeaderTotal)
    }

    /// Decode a stream produced by [`Encoder::encode_with_table`].
    ///
    /// The header holds the training frequencies rather than the source
    /// counts, so the output length is whatever the payload decodes to.
    ///
    /// [`Encoder::encode_with_table`]: crate::Encoder::encode_with_table
    pub fn decode_with_table<S: Symbol>(&self, stream: &EncodedStream<S>) -> Result<Vec<S>> {
        decode_payload(
            &stream.header,
            &stream.payload,
            stream.padding_bits,
            Length::Payload,
        )
    }
}

/// Where the decoded length comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Length {
    /// The header total; any other decoded length is corrupt.
    HeaderTotal,
    /// The payload bits alone.
    Payload,
}

fn decode_payload<S: Symbol>(
    header: &Header<S>,
    payload: &[u8],
    padding_bits: u8,
    length: Length,
) -> Result<Vec<S>> {
    let reader = BitReader::new(payload, padding_bits)?;
    let frequencies = header.frequencies();

    let Some(tree) = PrefixTree::build(frequencies) else {
        if reader.remaining() != 0 {
            return Err(Error::corrupt(0, "payload present for an empty alphabet"));
        }
        return Ok(Vec::new());
    };

    let decoded = match tree.root() {
        Node::Leaf { symbol, weight } => {
            let count = match length {
                Length::HeaderTotal => *weight,
                Length::Payload => reader.remaining(),
            };
            repeat_single(*symbol, count, payload, &reader)?
        }
        root => walk(root, reader, frequencies.total())?,
    };

    if length == Length::HeaderTotal && decoded.len() as u64 != frequencies.total() {
        return Err(Error::corrupt(
            payload.len() as u64,
            format!(
                "decoded {} symbols, header declares {}",
                decoded.len(),
                frequencies.total()
            ),
        ));
    }
    log::debug!(
        "decoded {} symbols from {} payload bytes",
        decoded.len(),
        payload.len()
    );
    Ok(decoded)
}

/// The one-symbol alphabet: every codeword is a single `0` bit.
fn repeat_single<S: Symbol>(
    symbol: S,
    count: u64,
    payload: &[u8],
    reader: &BitReader<'_>,
) -> Result<Vec<S>> {
    if reader.remaining() != count {
        return Err(Error::corrupt(
            0,
            format!(
                "single-symbol payload holds {} bits, expected {}",
                reader.remaining(),
                count
            ),
        ));
    }
    if let Some(pos) = payload.iter().position(|&b| b != 0) {
        return Err(Error::corrupt(
            pos as u64,
            "nonzero bit in a single-symbol payload",
        ));
    }
    let count = usize::try_from(count)
        .map_err(|_| Error::corrupt(0, "declared length exceeds addressable memory"))?;
    Ok(vec![symbol; count])
}

fn walk<S: Symbol>(root: &Node<S>, mut reader: BitReader<'_>, total: u64) -> Result<Vec<S>> {
    let mut out = Vec::with_capacity(total.min(reader.remaining()) as usize);
    let mut node = root;
    let mut codeword_start = 0;

    while let Some(bit) = reader.next() {
        if let Node::Internal { left, right, .. } = node {
            node = if bit { right } else { left };
        }
        if let Node::Leaf { symbol, .. } = node {
            out.push(*symbol);
            node = root;
            codeword_start = reader.bit_position();
        }
    }

    if codeword_start != reader.bit_position() {
        return Err(Error::corrupt(
            codeword_start / 8,
            format!(
                "bit sequence ended inside a codeword starting at bit {}",
                codeword_start
            ),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::frequency::FrequencyTable;
    use proptest::prelude::*;

    fn header(entries: &[(u8, u64)]) -> Header<u8> {
        let mut table = FrequencyTable::new();
        for &(symbol, count) in entries {
            table.insert(symbol, count).unwrap();
        }
        Header::new(table)
    }

    #[test]
    fn test_decode_parts() {
        // b = 0, a = 1
        let decoded = Decoder::default()
            .decode_parts(&header(&[(b'a', 3), (b'b', 1)]), &[0b1011_0000], 4)
            .unwrap();
        assert_eq!(decoded, b"abaa");
    }

    #[test]
    fn test_empty_header() {
        let decoded = Decoder::default()
            .decode_parts(&header(&[]), &[], 0)
            .unwrap();
        assert!(decoded.is_empty());
        assert!(matches!(
            Decoder::default().decode_parts(&header(&[]), &[0], 0),
            Err(Error::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_single_symbol_uses_frequency() {
        let h = header(&[(b'a', 4)]);
        assert_eq!(
            Decoder::default().decode_parts(&h, &[0], 4).unwrap(),
            b"aaaa"
        );
        assert!(matches!(
            Decoder::default().decode_parts(&h, &[0], 5),
            Err(Error::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_truncated_codeword() {
        // a:1 b:1 c:2 -> c = 0, a = 10, b = 11; "c" then half of "a".
        let h = header(&[(b'a', 1), (b'b', 1), (b'c', 2)]);
        let err = Decoder::default()
            .decode_parts(&h, &[0b0100_0000], 6)
            .unwrap_err();
        assert!(matches!(err, Error::CorruptStream { offset: 0, .. }));
    }

    #[test]
    fn test_length_mismatch() {
        // Two `b`s where the header declares three `a`s and one `b`.
        let h = header(&[(b'a', 3), (b'b', 1)]);
        assert!(matches!(
            Decoder::default().decode_parts(&h, &[0b0000_0000], 6),
            Err(Error::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_decode_bytes_roundtrip() {
        let source = "naïve café".chars().collect::<Vec<char>>();
        let bytes = Encoder::default().encode(&source).unwrap().to_bytes().unwrap();
        let decoded: Vec<char> = Decoder::default().decode_bytes(&bytes).unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn test_table_stream_length_from_payload() {
        // Training counts a:3 b:1 -> b = 0, a = 1; payload "ab".
        let stream = EncodedStream {
            header: header(&[(b'a', 3), (b'b', 1)]),
            padding_bits: 6,
            payload: vec![0b1000_0000],
        };
        assert_eq!(Decoder::default().decode_with_table(&stream).unwrap(), b"ab");
        assert!(matches!(
            Decoder::default().decode(&stream),
            Err(Error::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_table_stream_still_rejects_truncation() {
        // a:1 b:1 c:2 -> c = 0, a = 10, b = 11; payload ends inside "a".
        let stream = EncodedStream {
            header: header(&[(b'a', 1), (b'b', 1), (b'c', 2)]),
            padding_bits: 6,
            payload: vec![0b0100_0000],
        };
        assert!(matches!(
            Decoder::default().decode_with_table(&stream),
            Err(Error::CorruptStream { offset: 0, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_table_roundtrip(
            corpus in prop::collection::vec(0u8..16, 1..200),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..200),
        ) {
            let table: FrequencyTable<u8> = corpus.iter().copied().collect();
            let source: Vec<u8> = picks.iter().map(|i| *i.get(&corpus)).collect();
            let stream = Encoder::default().encode_with_table(&table, &source).unwrap();
            let parsed = EncodedStream::<u8>::from_bytes(&stream.to_bytes().unwrap()).unwrap();
            prop_assert_eq!(Decoder::default().decode_with_table(&parsed).unwrap(), source);
        }

        #[test]
        fn prop_roundtrip_u16(input in prop::collection::vec(0u16..40, 0..300)) {
            let stream = Encoder::default().encode(&input).unwrap();
            let bytes = stream.to_bytes().unwrap();
            let decoded: Vec<u16> = Decoder::default().decode_reader(&mut &bytes[..]).unwrap();
            prop_assert_eq!(decoded, input);
        }

        #[test]
        fn prop_garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = Decoder::default().decode_bytes::<u8>(&bytes);
        }
    }
}
