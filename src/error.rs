//! Error type shared by every stage of the compressor.

use thiserror::Error;

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while compressing or decompressing a stream.
#[derive(Error, Debug)]
pub enum Error {
    /// The leading 32-bit word is not the tree-header magic number.
    #[error("illegal header starts with {}", describe_magic(.found))]
    BadMagic {
        /// The word actually read, `None` if the stream ended first
        found: Option<u32>,
    },

    /// The stream ended while a tree-header bit or symbol was expected.
    #[error("truncated tree header after {bits_read} bits")]
    TruncatedHeader {
        /// Bits consumed from the start of the stream, magic included
        bits_read: u64,
    },

    /// The stream ended before the end-of-stream code was decoded.
    #[error("bad input, no PSEUDO_EOF after {symbols_decoded} symbols ({bits_read} bits read)")]
    TruncatedBody {
        /// Bits consumed from the start of the stream
        bits_read: u64,
        /// Bytes already written to the sink
        symbols_decoded: u64,
    },

    /// The tree header is complete but cannot describe a usable code tree.
    #[error("malformed tree header: {0}")]
    MalformedHeader(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether the error was caused by corrupt compressed data rather than
    /// by the caller or the underlying stream.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. }
                | Error::TruncatedHeader { .. }
                | Error::TruncatedBody { .. }
                | Error::MalformedHeader(_)
        )
    }
}

fn describe_magic(found: &Option<u32>) -> String {
    match found {
        Some(word) => format!("{:#010x}", word),
        None => "end of stream".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_magic_message_is_hex() {
        let err = Error::BadMagic {
            found: Some(0xface_8200),
        };
        assert_eq!(err.to_string(), "illegal header starts with 0xface8200");
        assert!(err.is_corrupt_input());
    }

    #[test]
    fn test_missing_magic_message() {
        let err = Error::BadMagic { found: None };
        assert_eq!(err.to_string(), "illegal header starts with end of stream");
        assert!(err.is_corrupt_input());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_corrupt_input());
    }
}
