//! Generate-and-reject puzzle search.
//!
//! Every cipher draws random parameters, encodes, packs the bits into
//! letters and throws the result away if it does not fit the cipher's
//! display ceiling. Recoverable errors (see [`Error::is_recoverable`]) only
//! discard the current candidate; anything else aborts the build.
//!
//! # Bitmap ciphers
//!
//! ```text
//! loop over words
//!   for alphabet in shuffled alphabets
//!     for width in PRIME_SIZES
//!       render -> encode -> pack -> keep if short enough
//!       stop widening after two single-line renders in a row
//!     any candidates? pick one uniformly at random
//! ```
//!
//! The search is capped by [`BuilderConfig::max_word_attempts`] and
//! [`BuilderConfig::max_table_attempts`], ending in
//! [`Error::SearchExhausted`].

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};

use crate::alphabet::{AlphabetKind, Rendering, PRIME_SIZES};
use crate::arithmetic::{self, FrequencyTable};
use crate::bitio::format_bits;
use crate::bitmap::Bitmap;
use crate::error::{Error, MalformedInput, Result};
use crate::huffman::{keyed_alphabet, HuffmanTree, KeyPlacement};
use crate::lz78::LempelZivCodec;
use crate::puzzle::{weight_letters, CipherKind, LetterSpan, Puzzle, PuzzleDetail};
use crate::serializer::{pack, pack_padded, unpack, EncodedPiece, Packed};
use crate::sprite::SpriteCodec;
use crate::stats::SearchStats;
use crate::words::WordSource;

/// Result of running a bitmap codec, before letter packing.
#[derive(Debug, Clone)]
pub struct CodecOutput {
    pub bits: Vec<bool>,
    /// Codec-specific diagnostic lines
    pub trace: Vec<String>,
    pub detail: PuzzleDetail,
}

/// A codec that turns a rendered bitmap into a bitstream.
pub trait BitmapCodec {
    fn kind(&self) -> CipherKind;

    /// Longest acceptable display string, in letters.
    fn ceiling(&self) -> usize;

    /// Whether this bitmap can be encoded at all. Rejected bitmaps are
    /// skipped by the search.
    fn accepts(&self, _bitmap: &Bitmap) -> bool {
        true
    }

    fn encode(&self, bitmap: &Bitmap) -> Result<CodecOutput>;
}

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Answer length for LZ78 and sprite puzzles
    pub bitmap_word_len: RangeInclusive<usize>,
    pub weighted_word_len: RangeInclusive<usize>,
    pub keyed_answer_len: RangeInclusive<usize>,
    pub keyword_len: RangeInclusive<usize>,
    pub arithmetic_word_len: RangeInclusive<usize>,

    // === Display ceilings (letters) ===
    pub weighted_ceiling: usize,
    pub keyed_ceiling: usize,
    pub arithmetic_ceiling: usize,
    pub lz78_ceiling: usize,
    pub sprite_ceiling: usize,

    // === Caps ===
    /// Words tried by the bitmap search before giving up
    pub max_word_attempts: usize,
    /// Weight lists or frequency tables drawn per word before giving up
    pub max_table_attempts: usize,

    /// Keyword position in the keyed alphabet; random per puzzle when unset
    pub key_placement: Option<KeyPlacement>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            bitmap_word_len: 4..=8,
            weighted_word_len: 5..=8,
            keyed_answer_len: 4..=8,
            keyword_len: 7..=8,
            arithmetic_word_len: 4..=6,
            weighted_ceiling: 7,
            keyed_ceiling: 20,
            arithmetic_ceiling: 9,
            lz78_ceiling: crate::lz78::DEFAULT_CEILING,
            sprite_ceiling: crate::sprite::DEFAULT_CEILING,
            max_word_attempts: 1_000,
            max_table_attempts: 100_000,
            key_placement: None,
        }
    }
}

impl BuilderConfig {
    /// Answer length range used by `kind`.
    pub fn word_len(&self, kind: CipherKind) -> RangeInclusive<usize> {
        match kind {
            CipherKind::WeightedHuffman => self.weighted_word_len.clone(),
            CipherKind::KeyedHuffman => self.keyed_answer_len.clone(),
            CipherKind::Arithmetic => self.arithmetic_word_len.clone(),
            CipherKind::LempelZiv | CipherKind::Sprite => self.bitmap_word_len.clone(),
        }
    }

    /// Override the answer length range of `kind`.
    pub fn set_word_len(&mut self, kind: CipherKind, range: RangeInclusive<usize>) {
        match kind {
            CipherKind::WeightedHuffman => self.weighted_word_len = range,
            CipherKind::KeyedHuffman => self.keyed_answer_len = range,
            CipherKind::Arithmetic => self.arithmetic_word_len = range,
            CipherKind::LempelZiv | CipherKind::Sprite => self.bitmap_word_len = range,
        }
    }

    pub fn ceiling(&self, kind: CipherKind) -> usize {
        match kind {
            CipherKind::WeightedHuffman => self.weighted_ceiling,
            CipherKind::KeyedHuffman => self.keyed_ceiling,
            CipherKind::Arithmetic => self.arithmetic_ceiling,
            CipherKind::LempelZiv => self.lz78_ceiling,
            CipherKind::Sprite => self.sprite_ceiling,
        }
    }

    /// # Errors
    /// `Error::Config` for empty ranges, zero lengths, zero ceilings or caps.
    pub fn validate(&self) -> Result<()> {
        for kind in CipherKind::ALL {
            let range = self.word_len(kind);
            if range.is_empty() || *range.start() == 0 {
                return Err(Error::Config(format!(
                    "{kind}: word length range {}..={} is empty",
                    range.start(),
                    range.end()
                )));
            }
            if self.ceiling(kind) == 0 {
                return Err(Error::Config(format!("{kind}: display ceiling is zero")));
            }
        }
        if self.keyword_len.is_empty() || *self.keyword_len.start() == 0 {
            return Err(Error::Config("keyword length range is empty".into()));
        }
        if self.max_word_attempts == 0 || self.max_table_attempts == 0 {
            return Err(Error::Config("attempt caps must be positive".into()));
        }
        Ok(())
    }
}

/// Deterministic generator for a seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Builds puzzles from a word source.
pub struct PuzzleBuilder<W: WordSource> {
    words: W,
    config: BuilderConfig,
    stats: SearchStats,
}

impl<W: WordSource> PuzzleBuilder<W> {
    /// # Errors
    /// `Error::Config` if the configuration does not validate.
    pub fn new(words: W, config: BuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            words,
            config,
            stats: SearchStats::new(),
        })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn into_stats(self) -> SearchStats {
        self.stats
    }

    /// Build a puzzle of the given cipher.
    pub fn build<R: Rng>(&mut self, kind: CipherKind, rng: &mut R) -> Result<Puzzle> {
        match kind {
            CipherKind::WeightedHuffman => self.weighted_huffman(rng),
            CipherKind::KeyedHuffman => self.keyed_huffman(rng),
            CipherKind::Arithmetic => self.arithmetic(rng),
            CipherKind::LempelZiv => {
                let codec = LempelZivCodec::new(self.config.lz78_ceiling);
                self.bitmap_puzzle(&codec, rng)
            }
            CipherKind::Sprite => {
                let codec = SpriteCodec::new(self.config.sprite_ceiling);
                self.bitmap_puzzle(&codec, rng)
            }
        }
    }

    fn choose_word<R: Rng>(&mut self, range: RangeInclusive<usize>, rng: &mut R) -> Result<String> {
        self.stats.words_tried += 1;
        self.words.choose_word(*range.start(), *range.end(), rng)
    }

    /// Huffman puzzle whose tree the solver rebuilds from shown weights.
    pub fn weighted_huffman<R: Rng>(&mut self, rng: &mut R) -> Result<Puzzle> {
        let word = self.choose_word(self.config.weighted_word_len.clone(), rng)?;
        self.weighted_huffman_for_word(&word, rng)
    }

    /// Weighted Huffman puzzle for a fixed answer.
    pub fn weighted_huffman_for_word<R: Rng>(&mut self, word: &str, rng: &mut R) -> Result<Puzzle> {
        check_word(word)?;
        let ceiling = self.config.weighted_ceiling;

        for attempt in 1..=self.config.max_table_attempts {
            self.stats.tables_tried += 1;
            let weights: Vec<u32> = (0..26).map(|_| rng.gen_range(1..=26)).collect();
            let (tree, steps) = HuffmanTree::build(&weights)?;
            let (bits, spans) = encode_word(&tree, word, 0)?;

            let Some(packed) = self.pack_within(&bits, ceiling)? else {
                continue;
            };

            let mut diagnostics = vec![format!("Letters {}", weight_letters(&weights))];
            diagnostics.extend(steps.iter().map(|s| format!("Combining {s}")));
            diagnostics.push(format!("Tree {tree}"));
            diagnostics.push(format!("Binary {}", join_pieces(&packed.pieces)));
            diagnostics.extend(spans.iter().map(|s| format!("Decode {s}")));
            diagnostics.push(format!("Solution {word}"));

            self.finish(CipherKind::WeightedHuffman, word, attempt);
            return Ok(Puzzle::new(
                CipherKind::WeightedHuffman,
                word.to_string(),
                bits,
                packed,
                PuzzleDetail::WeightedHuffman {
                    weights,
                    tree,
                    steps,
                    spans,
                },
                diagnostics,
            ));
        }

        Err(Error::SearchExhausted {
            attempts: self.config.max_table_attempts,
        })
    }

    /// Huffman puzzle sending the tree shape, labelled by a keyed alphabet.
    pub fn keyed_huffman<R: Rng>(&mut self, rng: &mut R) -> Result<Puzzle> {
        // Only the answer counts towards `words_tried`
        let (min, max) = (*self.config.keyword_len.start(), *self.config.keyword_len.end());
        let keyword = self.words.choose_word(min, max, rng)?;
        let answer = self.choose_word(self.config.keyed_answer_len.clone(), rng)?;
        self.keyed_huffman_for_word(&answer, &keyword, rng)
    }

    /// Keyed Huffman puzzle for a fixed answer and keyword.
    pub fn keyed_huffman_for_word<R: Rng>(&mut self, answer: &str, keyword: &str, rng: &mut R) -> Result<Puzzle> {
        check_word(answer)?;
        check_word(keyword)?;
        let placement = self.config.key_placement.unwrap_or_else(|| {
            if rng.gen() {
                KeyPlacement::Back
            } else {
                KeyPlacement::Front
            }
        });
        let alphabet = keyed_alphabet(keyword, placement);
        let ceiling = self.config.keyed_ceiling;

        for attempt in 1..=self.config.max_table_attempts {
            self.stats.tables_tried += 1;
            let weights: Vec<u32> = (0..26).map(|_| rng.gen_range(1..=26)).collect();
            let (mut tree, _) = HuffmanTree::build(&weights)?;
            tree.populate(&alphabet)?;

            let mut bits = tree.encode_tree_structure();
            let structure_len = bits.len();
            let (word_bits, spans) = encode_word(&tree, answer, structure_len)?;
            bits.extend(word_bits);

            let Some(packed) = self.pack_within(&bits, ceiling)? else {
                continue;
            };

            // The solver only has the stream and the keyword
            let (rebuilt, used) = HuffmanTree::from_structure(&bits, &alphabet)?;
            if rebuilt.decode(&bits[used..]).as_deref() != Some(answer) {
                error!(answer, keyword, "keyed tree does not decode its own stream");
                return Err(MalformedInput::Undecodable(format!("keyed stream for {answer:?}")).into());
            }

            let diagnostics = vec![
                format!("Keyword: {keyword}"),
                format!("Keyed alphabet: {alphabet}"),
                format!("Letters {}", packed.text),
                format!("Binary {}", join_pieces(&packed.pieces)),
                format!("Structure {}", format_bits(&bits[..structure_len])),
                format!("Tree {tree}"),
            ]
            .into_iter()
            .chain(spans.iter().map(|s| format!("Decode {s}")))
            .chain(std::iter::once(format!("Solution {answer}")))
            .collect();

            self.finish(CipherKind::KeyedHuffman, answer, attempt);
            return Ok(Puzzle::new(
                CipherKind::KeyedHuffman,
                answer.to_string(),
                bits,
                packed,
                PuzzleDetail::KeyedHuffman {
                    keyword: keyword.to_string(),
                    placement,
                    alphabet,
                    tree,
                    structure_len,
                    spans,
                },
                diagnostics,
            ));
        }

        Err(Error::SearchExhausted {
            attempts: self.config.max_table_attempts,
        })
    }

    /// Arithmetic-coded puzzle with a random frequency table.
    pub fn arithmetic<R: Rng>(&mut self, rng: &mut R) -> Result<Puzzle> {
        let word = self.choose_word(self.config.arithmetic_word_len.clone(), rng)?;
        self.arithmetic_for_word(&word, rng)
    }

    /// Arithmetic-coded puzzle for a fixed answer.
    pub fn arithmetic_for_word<R: Rng>(&mut self, word: &str, rng: &mut R) -> Result<Puzzle> {
        check_word(word)?;
        let ceiling = self.config.arithmetic_ceiling;

        for attempt in 1..=self.config.max_table_attempts {
            self.stats.tables_tried += 1;
            let table = FrequencyTable::random(rng);
            let bits = arithmetic::encode(word, &table)?;
            let packed = pack_padded(&bits);
            if packed.len() > ceiling {
                self.stats.over_length += 1;
                continue;
            }

            let stream = unpack(&packed.text)?;
            let (decoded, trace) = arithmetic::decode_with_trace(&stream, &table)?;
            if decoded != word {
                error!(word, decoded = %decoded, "arithmetic coder failed its own round trip");
                return Err(Error::ArithmeticRoundTripMismatch {
                    expected: word.to_string(),
                    actual: decoded,
                });
            }

            let mut diagnostics = vec![
                format!("Encoded word: {}", packed.text),
                format!("Letters on module: {}", table.letters()),
                format!("Binary stream: {}", format_bits(&stream)),
                format!("Frequency table: {}", join_numbers(table.weights())),
                format!("Cumulative: {}", join_numbers(&table.boundaries())),
            ];
            diagnostics.extend(trace);
            diagnostics.push(format!("Solution: {word}"));

            self.finish(CipherKind::Arithmetic, word, attempt);
            return Ok(Puzzle::new(
                CipherKind::Arithmetic,
                word.to_string(),
                bits,
                packed,
                PuzzleDetail::Arithmetic { table },
                diagnostics,
            ));
        }

        Err(Error::SearchExhausted {
            attempts: self.config.max_table_attempts,
        })
    }

    /// Search words, alphabets and widths for a bitmap puzzle.
    pub fn bitmap_puzzle<C, R>(&mut self, codec: &C, rng: &mut R) -> Result<Puzzle>
    where
        C: BitmapCodec + ?Sized,
        R: Rng,
    {
        let range = self.config.bitmap_word_len.clone();

        for attempt in 1..=self.config.max_word_attempts {
            let word = self.choose_word(range.clone(), rng)?;
            let mut order = AlphabetKind::ALL;
            order.shuffle(rng);

            for kind in order {
                self.stats.alphabets_tried += 1;
                let mut candidates = self.collect_candidates(codec, &word, kind)?;
                if candidates.is_empty() {
                    debug!(word = %word, alphabet = %kind, "no candidates");
                    continue;
                }
                let pick = rng.gen_range(0..candidates.len());
                let puzzle = candidates.swap_remove(pick);
                self.finish(codec.kind(), &word, attempt);
                return Ok(puzzle);
            }
        }

        Err(Error::SearchExhausted {
            attempts: self.config.max_word_attempts,
        })
    }

    fn collect_candidates<C>(&mut self, codec: &C, word: &str, kind: AlphabetKind) -> Result<Vec<Puzzle>>
    where
        C: BitmapCodec + ?Sized,
    {
        let alphabet = kind.alphabet();
        let mut candidates = Vec::new();
        let mut prev_single_line = false;

        for &width in &PRIME_SIZES {
            self.stats.widths_tried += 1;
            let rendering = match alphabet.render(word, width) {
                Ok(rendering) => rendering,
                Err(e) if e.is_recoverable() => {
                    self.stats.renders_rejected += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if codec.accepts(&rendering.bitmap) {
                if let Some(puzzle) = self.encode_rendering(codec, word, kind, &rendering)? {
                    self.stats.candidates_collected += 1;
                    debug!(word, alphabet = %kind, width, "candidate collected");
                    candidates.push(puzzle);
                }
            } else {
                self.stats.codec_skips += 1;
            }

            if rendering.single_line && prev_single_line {
                break;
            }
            prev_single_line = rendering.single_line;
        }

        Ok(candidates)
    }

    fn encode_rendering<C>(&mut self, codec: &C, word: &str, kind: AlphabetKind, rendering: &Rendering) -> Result<Option<Puzzle>>
    where
        C: BitmapCodec + ?Sized,
    {
        let output = codec.encode(&rendering.bitmap)?;
        let Some(packed) = self.pack_within(&output.bits, codec.ceiling())? else {
            return Ok(None);
        };

        let mut diagnostics = vec![
            format!("Alphabet: {kind}"),
            format!("Glyphs: {}", rendering.units.join(" ")),
        ];
        diagnostics.extend(output.trace);
        diagnostics.push(format!("Binary {}", join_pieces(&packed.pieces)));
        diagnostics.push(format!("Encoded: {}", packed.text));
        diagnostics.push(format!("Solution: {word}"));

        let puzzle = Puzzle::new(codec.kind(), word.to_string(), output.bits, packed, output.detail, diagnostics)
            .with_bitmap(kind, rendering.bitmap.clone());
        Ok(Some(puzzle))
    }

    /// Strict packing plus the ceiling check; `None` discards the candidate.
    fn pack_within(&mut self, bits: &[bool], ceiling: usize) -> Result<Option<Packed>> {
        let packed = match pack(bits) {
            Ok(packed) => packed,
            Err(e) if e.is_recoverable() => {
                self.stats.unpackable += 1;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        if packed.len() > ceiling {
            self.stats.over_length += 1;
            let reason = Error::OverLengthEncoding {
                length: packed.len(),
                ceiling,
            };
            debug!(%reason, "candidate discarded");
            return Ok(None);
        }
        Ok(Some(packed))
    }

    fn finish(&mut self, kind: CipherKind, answer: &str, attempts: usize) {
        self.stats.puzzles_built += 1;
        info!(cipher = %kind, answer, attempts, "puzzle built");
    }
}

fn check_word(word: &str) -> Result<()> {
    match word.chars().find(|c| !c.is_ascii_uppercase()) {
        Some(bad) => Err(MalformedInput::InvalidLetter(bad).into()),
        None if word.is_empty() => Err(MalformedInput::Undecodable("empty word".into()).into()),
        None => Ok(()),
    }
}

/// Concatenated tree paths of `word`, with each letter's bit range.
fn encode_word(tree: &HuffmanTree, word: &str, offset: usize) -> Result<(Vec<bool>, Vec<LetterSpan>)> {
    let mut bits = Vec::new();
    let mut spans = Vec::with_capacity(word.len());
    for letter in word.chars() {
        let path = tree
            .encode_bits(letter)
            .ok_or(MalformedInput::LetterNotInTree(letter))?;
        let start = offset + bits.len();
        bits.extend(path);
        spans.push(LetterSpan {
            start,
            end: offset + bits.len(),
            letter,
        });
    }
    Ok((bits, spans))
}

fn join_pieces(pieces: &[EncodedPiece]) -> String {
    pieces.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(";")
}

fn join_numbers(values: &[u32]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}
