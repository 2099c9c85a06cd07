//! Error types for the puzzle engine.
//!
//! Errors fall into two groups. Recoverable ones (an infeasible render, an
//! encoding over the display ceiling, a bitstream that does not pack into
//! letters) are absorbed by the puzzle search, which simply tries other
//! parameters. Everything else means internal data broke a contract and is
//! surfaced to the caller unchanged.

use thiserror::Error;

/// Top-level error type for all operations in the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The word cannot be drawn in this alphabet at this bitmap width
    #[error("cannot render {word:?} in {alphabet} at width {width}")]
    InfeasibleRender {
        word: String,
        alphabet: &'static str,
        width: usize,
    },

    /// The encoded display string is longer than the cipher allows
    #[error("encoding is {length} letters, ceiling is {ceiling}")]
    OverLengthEncoding { length: usize, ceiling: usize },

    /// Bitstream could not be turned into display letters
    #[error("letter serialization error: {0}")]
    Serialize(#[from] SerializeError),

    /// Internal data violated a codec's input contract
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInput),

    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Decoding the arithmetic coder's own output gave a different word
    #[error("arithmetic round trip mismatch: encoded {expected:?}, decoded {actual:?}")]
    ArithmeticRoundTripMismatch { expected: String, actual: String },

    /// The word source has nothing in the requested length range
    #[error("no word of length {min}..={max} in word source")]
    NoWordInRange { min: usize, max: usize },

    /// The search hit its attempt cap
    #[error("no puzzle found after {attempts} attempts")]
    SearchExhausted { attempts: usize },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the puzzle search may discard this candidate and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InfeasibleRender { .. } | Error::OverLengthEncoding { .. } | Error::Serialize(_)
        )
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the stream
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Character other than '0' or '1' in a textual bit string
    #[error("invalid bit character {0:?}")]
    InvalidBitChar(char),
}

/// Letter serialization errors.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The tail of the bitstream is too short for the next letter code
    #[error("insufficient bits: next letter needs {needed}, {available} left")]
    InsufficientBits { needed: usize, available: usize },

    /// Display string contains a character outside A-Z
    #[error("invalid display letter {0:?}")]
    InvalidLetter(char),
}

/// Contract violations on internal data. Never retried.
#[derive(Debug, Error)]
pub enum MalformedInput {
    /// The sprite codec works on bit pairs
    #[error("bitmap has odd length {0}")]
    OddLengthBitmap(usize),

    /// Relabeling a tree needs exactly one letter per leaf
    #[error("tree has {leaves} leaves but alphabet has {letters} letters")]
    AlphabetLengthMismatch { leaves: usize, letters: usize },

    /// Ciphers only carry the letters A-Z
    #[error("letter {0:?} is not in A-Z")]
    InvalidLetter(char),

    /// Letter does not occur in the tree
    #[error("letter {0:?} missing from tree")]
    LetterNotInTree(char),

    /// Weight list for a tree or frequency table is empty or contains zero
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// Bitmap bit count does not match width * height + 1
    #[error("bitmap of width {width} cannot hold {len} bits")]
    BitmapShape { width: usize, len: usize },

    /// A codeword refers to a dictionary entry that does not exist yet
    #[error("codeword {index} outside dictionary of {size} entries")]
    UnknownCodeword { index: usize, size: usize },

    /// A decoder ran past the data without reaching its end condition
    #[error("stream does not decode: {0}")]
    Undecodable(String),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let render = Error::InfeasibleRender {
            word: "WORD".into(),
            alphabet: "Morse",
            width: 2,
        };
        assert!(render.is_recoverable());
        assert!(Error::OverLengthEncoding { length: 8, ceiling: 7 }.is_recoverable());
        assert!(Error::from(SerializeError::InsufficientBits { needed: 4, available: 2 }).is_recoverable());

        assert!(!Error::from(MalformedInput::OddLengthBitmap(9)).is_recoverable());
        assert!(!Error::ArithmeticRoundTripMismatch {
            expected: "ABC".into(),
            actual: "ABD".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = Error::from(MalformedInput::AlphabetLengthMismatch { leaves: 26, letters: 25 });
        assert_eq!(
            err.to_string(),
            "malformed input: tree has 26 leaves but alphabet has 25 letters"
        );
    }
}
