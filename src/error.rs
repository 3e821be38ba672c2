//! Error types for prefix coding.

use thiserror::Error;

/// Error variants for encode and decode operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The source sequence could not be read.
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[source] std::io::Error),

    /// A symbol seen while encoding has no code. Indicates a logic defect.
    #[error("internal consistency violation: {message}")]
    InternalConsistency {
        /// What went wrong.
        message: String,
    },

    /// A source symbol has no code in the supplied frequency table.
    #[error("symbol {symbol} at position {position} is not in the code table")]
    UnknownSymbol {
        /// Debug rendering of the symbol.
        symbol: String,
        /// Index of the symbol in the source.
        position: usize,
    },

    /// The encoded stream is truncated or malformed.
    #[error("corrupt stream at byte {offset}: {reason}")]
    CorruptStream {
        /// Byte offset where the problem was detected.
        offset: u64,
        /// Description of the problem.
        reason: String,
    },

    /// A frequency entry was rejected (zero count, duplicate symbol or overflow).
    #[error("invalid frequency for symbol {symbol}: {reason}")]
    InvalidFrequency {
        /// Debug rendering of the offending symbol.
        symbol: String,
        /// Why the entry was rejected.
        reason: &'static str,
    },

    /// Configuration failed validation or could not be loaded.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An I/O error occurred while writing to a sink.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptStream {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn consistency(message: impl Into<String>) -> Self {
        Error::InternalConsistency {
            message: message.into(),
        }
    }
}

/// A specialized Result type for prefix coding operations.
pub type Result<T> = std::result::Result<T, Error>;
