//! Symbolic alphabets and word rendering.
//!
//! An alphabet is an ordered list of glyphs. A glyph covers one letter or,
//! for Braille contractions, several letters at once. Rendering walks the
//! word left to right, always taking the longest glyph whose text matches
//! at the cursor, and lays glyphs out on lines of a fixed pixel width.
//!
//! # Rendering rules
//!
//! - A glyph flagged as non-initial may not start the word; one flagged as
//!   non-final may not end it.
//! - If a glyph overflows the line, rendering wraps to a new line below the
//!   tallest glyph so far, or fails when the alphabet does not wrap.
//! - A glyph wider than the whole line always fails.
//! - The bitmap height is rounded up to the next entry of [`PRIME_SIZES`].

use std::fmt;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::fonts;

/// Candidate bitmap widths and heights.
pub const PRIME_SIZES: [usize; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// The five symbolic alphabets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphabetKind {
    English,
    Pigpen,
    Semaphore,
    Braille,
    Morse,
}

impl AlphabetKind {
    /// All alphabets, in the order the puzzle search starts from before shuffling.
    pub const ALL: [AlphabetKind; 5] = [
        AlphabetKind::Braille,
        AlphabetKind::English,
        AlphabetKind::Pigpen,
        AlphabetKind::Morse,
        AlphabetKind::Semaphore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlphabetKind::English => "English",
            AlphabetKind::Pigpen => "Pigpen",
            AlphabetKind::Semaphore => "Semaphore",
            AlphabetKind::Braille => "Braille",
            AlphabetKind::Morse => "Morse",
        }
    }

    /// Morse letters must stay on one line.
    pub fn allows_wrap(self) -> bool {
        !matches!(self, AlphabetKind::Morse)
    }

    /// Build the alphabet's glyph set.
    pub fn alphabet(self) -> Alphabet {
        Alphabet {
            kind: self,
            glyphs: fonts::glyphs(self),
        }
    }
}

impl fmt::Display for AlphabetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed pixel drawing of one glyph unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    text: String,
    width: usize,
    height: usize,
    pixels: Vec<bool>,
    can_be_initial: bool,
    can_be_final: bool,
}

impl Glyph {
    /// Create a glyph usable anywhere in a word.
    ///
    /// `pixels` is row-major and must hold `width * height` entries.
    pub fn new(text: impl Into<String>, width: usize, height: usize, pixels: Vec<bool>) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            text: text.into(),
            width,
            height,
            pixels,
            can_be_initial: true,
            can_be_final: true,
        }
    }

    /// Restrict where in a word the glyph may appear.
    pub fn with_placement(mut self, can_be_initial: bool, can_be_final: bool) -> Self {
        self.can_be_initial = can_be_initial;
        self.can_be_final = can_be_final;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn can_be_initial(&self) -> bool {
        self.can_be_initial
    }

    pub fn can_be_final(&self) -> bool {
        self.can_be_final
    }

    /// Pixel at column `x`, row `y`; false outside the glyph.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[x + self.width * y]
    }

    fn blit(&self, canvas: &mut [bool], canvas_width: usize, x: usize, y: usize) {
        for (i, &set) in self.pixels.iter().enumerate() {
            if set {
                canvas[x + i % self.width + canvas_width * (y + i / self.width)] = true;
            }
        }
    }
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    /// Pixels plus marker bit
    pub bitmap: Bitmap,
    /// Height actually covered by glyphs, before prime rounding
    pub height: usize,
    /// Whether all glyphs fit on the first line
    pub single_line: bool,
    /// Text of every glyph used, in order
    pub units: Vec<String>,
}

/// A symbolic alphabet ready to render words.
#[derive(Debug, Clone)]
pub struct Alphabet {
    kind: AlphabetKind,
    glyphs: Vec<Glyph>,
}

impl Alphabet {
    pub fn kind(&self) -> AlphabetKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Render `word` into a bitmap `width` pixels wide.
    ///
    /// # Errors
    /// `Error::InfeasibleRender` when no glyph matches at some position, a
    /// glyph does not fit and wrapping is not allowed, a single glyph is
    /// wider than `width`, or the height exceeds the largest prime size.
    pub fn render(&self, word: &str, width: usize) -> Result<Rendering> {
        let infeasible = || Error::InfeasibleRender {
            word: word.to_string(),
            alphabet: self.name(),
            width,
        };

        let mut placed: Vec<(&Glyph, usize, usize)> = Vec::new();
        let (mut x, mut y, mut h, mut i) = (0, 0, 0, 0);
        while i < word.len() {
            let glyph = self.longest_match(word.as_bytes(), i).ok_or_else(infeasible)?;
            if x + glyph.width > width {
                if !self.kind.allows_wrap() {
                    return Err(infeasible());
                }
                x = 0;
                y = h;
            }
            if x == 0 && glyph.width > width {
                return Err(infeasible());
            }
            placed.push((glyph, x, y));
            x += glyph.width;
            h = h.max(y + glyph.height);
            i += glyph.text.len();
        }

        let rows = PRIME_SIZES
            .iter()
            .copied()
            .find(|&p| p >= h)
            .ok_or_else(infeasible)?;
        let mut bits = vec![false; width * rows + 1];
        for &(glyph, gx, gy) in &placed {
            glyph.blit(&mut bits, width, gx, gy);
        }
        bits[width * rows] = width > h;

        Ok(Rendering {
            bitmap: Bitmap::new(width, bits)?,
            height: h,
            single_line: y == 0,
            units: placed.iter().map(|(g, _, _)| g.text.clone()).collect(),
        })
    }

    /// Longest eligible glyph matching at byte offset `at`; the first one
    /// in table order wins among equally long matches.
    fn longest_match(&self, word: &[u8], at: usize) -> Option<&Glyph> {
        let rest = &word[at..];
        let mut best: Option<&Glyph> = None;
        for glyph in &self.glyphs {
            let len = glyph.text.len();
            if !rest.starts_with(glyph.text.as_bytes())
                || (at == 0 && !glyph.can_be_initial)
                || (len == rest.len() && !glyph.can_be_final)
            {
                continue;
            }
            if best.map_or(true, |b| len > b.text.len()) {
                best = Some(glyph);
            }
        }
        best
    }
}
