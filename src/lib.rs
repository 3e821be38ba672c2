//! # Huffman Prefix Coding
//!
//! *Frequency-driven variable-length codes with reproducible tables.*
//!
//! ## Intuition First
//!
//! Morse code gives `E` a single dot and `Q` four symbols because `E` is far
//! more common. Huffman coding does the same thing optimally for a known set
//! of symbol counts: it repeatedly joins the two rarest candidates into one,
//! so rare symbols end up deep in a binary tree (long codes) and common
//! symbols stay near the root (short codes).
//!
//! ## The Problem
//!
//! Fixed-width encodings spend the same number of bits on every symbol. When
//! the distribution is skewed, that wastes space. A prefix code (no codeword
//! is a prefix of another) can be decoded without separators, and Huffman's
//! construction yields the prefix code with minimal total length.
//!
//! Two practical details matter as much as the algorithm:
//! - **Tie-breaking**: equal weights make the tree ambiguous. This crate
//!   resolves ties by first-seen order, so an encoder and a decoder that see
//!   the same frequency list always build the same tree.
//! - **Bit packing**: codewords are bits, storage is bytes. Codes are packed
//!   eight to a byte with an explicit padding count for the last byte.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon     Entropy as the fundamental limit
//! 1949  Fano        Shannon-Fano coding: top-down splitting, not optimal
//! 1952  Huffman     Bottom-up merging: optimal prefix codes
//! 1964  Schwartz    Canonical codes: reconstruct a table from lengths alone
//! 1993  PKZIP       DEFLATE pairs LZ77 with Huffman-coded literals
//! ```
//!
//! ## Mathematical Formulation
//!
//! For symbol counts $f_s$ and code lengths $\ell_s$, Huffman minimizes the
//! payload size $\sum_s f_s \ell_s$ subject to Kraft's inequality
//!
//! ```text
//! sum_s 2^(-l_s) <= 1
//! ```
//!
//! The tree is full (every internal node has two children), so with two or
//! more symbols the sum is exactly 1.
//!
//! ## Complexity Analysis
//!
//! - **Tree construction**: $O(k \log k)$ for $k$ distinct symbols (binary heap).
//! - **Encoding**: $O(n + \text{payload bits})$.
//! - **Decoding**: one tree step per payload bit.
//!
//! ## Failure Modes
//!
//! 1. **Corrupt payloads**: a truncated payload ends inside a codeword and is
//!    reported as [`Error::CorruptStream`] with a byte offset.
//! 2. **Degenerate alphabets**: zero or one distinct symbol has no tree to
//!    walk. Both are handled explicitly rather than treated as errors.
//!
//! ## Usage
//!
//! ```rust
//! # fn main() -> huffcode::Result<()> {
//! let packed = huffcode::compress(b"abracadabra")?;
//! assert_eq!(huffcode::decompress(&packed)?, b"abracadabra");
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! - Huffman, D. A. (1952). "A Method for the Construction of Minimum-Redundancy Codes."
//! - Kraft, L. G. (1949). "A device for quantizing, grouping, and coding amplitude-modulated pulses."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bits;
pub mod code;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod stream;
pub mod symbol;
pub mod tree;

pub use bits::{BitReader, BitWriter, PackedBits};
pub use code::{Code, CodeTable};
pub use config::CodecConfig;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use frequency::{FrequencyEntry, FrequencyTable};
pub use stream::{CompressionStats, EncodedStream, Header};
pub use symbol::Symbol;
pub use tree::{Node, PrefixTree};

/// Encode bytes and serialize the stream with default settings.
pub fn compress(source: &[u8]) -> Result<Vec<u8>> {
    Encoder::default().encode(source)?.to_bytes()
}

/// Parse and decode a stream produced by [`compress`].
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    Decoder::default().decode_bytes(bytes)
}
