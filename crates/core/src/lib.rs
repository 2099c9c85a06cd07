//! compression-ciphers-core: hand-decodable compression puzzles
//!
//! This library generates small puzzles whose answer is a word hidden behind
//! a classic binary code. A solver works the code backwards by hand from a
//! short string of letters.
//!
//! - Huffman trees built from shown letter weights, or sent as a shape
//!   labelled by a keyword alphabet
//! - 20-bit arithmetic coding with a shown frequency table
//! - LZ78 dictionary coding of a word drawn in a symbol alphabet
//! - XOR-delta and pair run-length coding of the same kind of bitmap
//!
//! # Architecture
//!
//! - `bitio`: Boolean bitstream reading/writing
//! - `fonts`, `alphabet`, `bitmap`: Glyph tables and word rendering
//! - `serializer`: Bitstream to display letters (4/5-bit prefix code)
//! - `huffman`, `arithmetic`, `lz78`, `sprite`: The codecs
//! - `words`: Answer and keyword sources
//! - `puzzle`: The finished artifact and the answer check
//! - `builder`: Generate-and-reject search over words and parameters
//! - `stats`: Search statistics
//!
//! # Design Principles
//!
//! - **No panics**: Contract violations are structured errors
//! - **Deterministic**: Every random choice comes from a caller-supplied RNG
//! - **Bounded**: All searches have attempt caps
//! - **Verifiable**: Every puzzle carries a diagnostic trace of its encoding
//!
//! # Example
//!
//! ```
//! use compression_ciphers_core::{seeded_rng, BuilderConfig, CipherKind, PuzzleBuilder, Verdict, WordList};
//!
//! let mut builder = PuzzleBuilder::new(WordList::builtin(), BuilderConfig::default()).unwrap();
//! let puzzle = builder.build(CipherKind::Arithmetic, &mut seeded_rng(42)).unwrap();
//! assert!(puzzle.encoded().len() <= 9);
//! assert_eq!(puzzle.submit(puzzle.answer()), Verdict::Correct);
//! ```

pub mod alphabet;
pub mod arithmetic;
pub mod bitio;
pub mod bitmap;
pub mod builder;
pub mod error;
mod fonts;
pub mod huffman;
pub mod lz78;
pub mod puzzle;
pub mod serializer;
pub mod sprite;
pub mod stats;
pub mod words;

// Re-export commonly used types
pub use alphabet::{Alphabet, AlphabetKind};
pub use bitmap::Bitmap;
pub use builder::{seeded_rng, BitmapCodec, BuilderConfig, CodecOutput, PuzzleBuilder};
pub use error::{Error, Result};
pub use huffman::KeyPlacement;
pub use puzzle::{CipherKind, Puzzle, PuzzleDetail, Verdict};
pub use stats::SearchStats;
pub use words::{WordList, WordSource};
