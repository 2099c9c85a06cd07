//! Finished puzzles and the answer check.
//!
//! A [`Puzzle`] is created once by the builder and is read-only afterwards.
//! It carries everything a front end needs: the screens to show, the answer
//! to check submissions against, and the diagnostic trace a solver can
//! follow step by step.

use std::fmt;
use std::str::FromStr;

use crate::alphabet::AlphabetKind;
use crate::arithmetic::FrequencyTable;
use crate::bitmap::Bitmap;
use crate::error::Error;
use crate::huffman::{CombineStep, HuffmanTree, KeyPlacement};
use crate::lz78::{Codeword, DictEntry};
use crate::serializer::{EncodedPiece, Packed};

/// The five puzzle ciphers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherKind {
    /// Huffman tree rebuilt from on-screen letter weights
    WeightedHuffman,
    /// Tree shape sent in the stream, leaves labelled by a keyword alphabet
    KeyedHuffman,
    Arithmetic,
    /// LZ78 over a rendered bitmap
    LempelZiv,
    /// XOR-delta and pair RLE over a rendered bitmap
    Sprite,
}

impl CipherKind {
    pub const ALL: [CipherKind; 5] = [
        CipherKind::WeightedHuffman,
        CipherKind::KeyedHuffman,
        CipherKind::Arithmetic,
        CipherKind::LempelZiv,
        CipherKind::Sprite,
    ];

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            CipherKind::WeightedHuffman => "weighted-huffman",
            CipherKind::KeyedHuffman => "keyed-huffman",
            CipherKind::Arithmetic => "arithmetic",
            CipherKind::LempelZiv => "lempel-ziv",
            CipherKind::Sprite => "sprite",
        }
    }

    /// Whether the cipher encodes a rendered bitmap rather than the word.
    pub fn is_bitmap(self) -> bool {
        matches!(self, CipherKind::LempelZiv | CipherKind::Sprite)
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weighted-huffman" | "weighted" | "blue" => Ok(CipherKind::WeightedHuffman),
            "keyed-huffman" | "keyed" | "yellow" => Ok(CipherKind::KeyedHuffman),
            "arithmetic" => Ok(CipherKind::Arithmetic),
            "lempel-ziv" | "lz78" | "lz" => Ok(CipherKind::LempelZiv),
            "sprite" | "rle" => Ok(CipherKind::Sprite),
            other => Err(Error::Config(format!("unknown cipher {other:?}"))),
        }
    }
}

/// Outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Bits `start..end` of the stream decode to `letter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterSpan {
    pub start: usize,
    pub end: usize,
    pub letter: char,
}

impl fmt::Display for LetterSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.start, self.end, self.letter)
    }
}

/// Cipher-specific artifacts behind the encoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleDetail {
    WeightedHuffman {
        weights: Vec<u32>,
        tree: HuffmanTree,
        steps: Vec<CombineStep>,
        spans: Vec<LetterSpan>,
    },
    KeyedHuffman {
        keyword: String,
        placement: KeyPlacement,
        /// Keyed alphabet the leaves were labelled with
        alphabet: String,
        tree: HuffmanTree,
        /// Number of leading tree-structure bits
        structure_len: usize,
        spans: Vec<LetterSpan>,
    },
    Arithmetic {
        table: FrequencyTable,
    },
    LempelZiv {
        dictionary: Vec<DictEntry>,
        codewords: Vec<Codeword>,
    },
    Sprite {
        /// Bitmap bits after the XOR-delta step, marker included
        delta: Vec<bool>,
    },
}

/// A generated puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    kind: CipherKind,
    answer: String,
    alphabet: Option<AlphabetKind>,
    bitmap: Option<Bitmap>,
    bits: Vec<bool>,
    encoded: String,
    pieces: Vec<EncodedPiece>,
    screens: Vec<String>,
    diagnostics: Vec<String>,
    detail: PuzzleDetail,
}

impl Puzzle {
    pub(crate) fn new(
        kind: CipherKind,
        answer: String,
        bits: Vec<bool>,
        packed: Packed,
        detail: PuzzleDetail,
        diagnostics: Vec<String>,
    ) -> Self {
        let screens = screens_for(&packed.text, &detail);
        Self {
            kind,
            answer,
            alphabet: None,
            bitmap: None,
            bits,
            encoded: packed.text,
            pieces: packed.pieces,
            screens,
            diagnostics,
            detail,
        }
    }

    pub(crate) fn with_bitmap(mut self, alphabet: AlphabetKind, bitmap: Bitmap) -> Self {
        self.alphabet = Some(alphabet);
        self.bitmap = Some(bitmap);
        self
    }

    pub fn kind(&self) -> CipherKind {
        self.kind
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Alphabet the answer was drawn in (bitmap ciphers only).
    pub fn alphabet(&self) -> Option<AlphabetKind> {
        self.alphabet
    }

    pub fn alphabet_name(&self) -> Option<&'static str> {
        self.alphabet.map(AlphabetKind::name)
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Raw codec output before letter packing.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// The encoded display string.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn pieces(&self) -> &[EncodedPiece] {
        &self.pieces
    }

    /// Display fragments, in paging order.
    pub fn screens(&self) -> &[String] {
        &self.screens
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn detail(&self) -> &PuzzleDetail {
        &self.detail
    }

    /// Exact, case-sensitive comparison against the answer.
    pub fn submit(&self, candidate: &str) -> Verdict {
        if candidate == self.answer {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    /// CRC-32 of the encoded string, pieces and diagnostics.
    ///
    /// Two runs with the same seed produce the same fingerprint.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(self.encoded.as_bytes());
        for piece in &self.pieces {
            hasher.update(b"\n");
            hasher.update(piece.to_string().as_bytes());
        }
        for line in &self.diagnostics {
            hasher.update(b"\n");
            hasher.update(line.as_bytes());
        }
        hasher.finalize()
    }
}

/// Split `text` into `parts` near-equal consecutive fragments.
///
/// Boundaries are `round(i * len / parts)`, ties to even.
pub fn split_even(text: &str, parts: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let per = chars.len() as f64 / parts as f64;
    (0..parts)
        .map(|i| {
            let start = (i as f64 * per).round_ties_even() as usize;
            let end = ((i + 1) as f64 * per).round_ties_even() as usize;
            chars[start..end].iter().collect()
        })
        .collect()
}

fn chunks_of(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Weights shown as letters, `A` = 1 … `Z` = 26.
pub(crate) fn weight_letters(weights: &[u32]) -> String {
    weights
        .iter()
        .map(|&w| char::from(b'A' + (w.clamp(1, 26) - 1) as u8))
        .collect()
}

fn screens_for(encoded: &str, detail: &PuzzleDetail) -> Vec<String> {
    match detail {
        PuzzleDetail::WeightedHuffman { weights, .. } => {
            let mut screens = chunks_of(&weight_letters(weights), 6);
            screens.push(encoded.to_string());
            screens
        }
        PuzzleDetail::KeyedHuffman { keyword, .. } => {
            let mut screens = split_even(encoded, 4);
            screens.push(keyword.clone());
            screens
        }
        PuzzleDetail::Arithmetic { table } => {
            let mut screens = vec![encoded.to_string()];
            screens.extend(chunks_of(&table.letters(), 6));
            if let Some(last) = screens.last_mut() {
                last.push_str(&format!(" {}", table.total()));
            }
            screens
        }
        PuzzleDetail::LempelZiv { .. } | PuzzleDetail::Sprite { .. } => split_even(encoded, 4),
    }
}
