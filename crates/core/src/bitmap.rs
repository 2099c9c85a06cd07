//! Rendered word bitmaps.
//!
//! A bitmap is a flat row-major pixel array followed by one marker bit, so
//! `bits().len() == width * height + 1`. The marker records whether the
//! bitmap is wider than the rendered glyphs are tall, which the solver uses
//! as a hint for where to break rows.

use std::fmt;

use crate::error::{MalformedInput, Result};

/// Immutable word bitmap plus trailing marker bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    bits: Vec<bool>,
}

impl Bitmap {
    /// Wrap a bit array of `width * rows + 1` bits.
    ///
    /// # Errors
    /// `MalformedInput::BitmapShape` if the length does not fit the width.
    pub fn new(width: usize, bits: Vec<bool>) -> Result<Self> {
        if width == 0 || bits.is_empty() || (bits.len() - 1) % width != 0 {
            return Err(MalformedInput::BitmapShape {
                width,
                len: bits.len(),
            }
            .into());
        }
        Ok(Self { width, bits })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of pixel rows (the marker bit is not a row).
    pub fn height(&self) -> usize {
        (self.bits.len() - 1) / self.width
    }

    /// Every bit including the trailing marker.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Pixel bits only.
    pub fn pixels(&self) -> &[bool] {
        &self.bits[..self.bits.len() - 1]
    }

    /// The trailing marker bit.
    pub fn marker(&self) -> bool {
        self.bits[self.bits.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.len() <= 1
    }

    /// Pixel at column `x`, row `y`; false outside the bitmap.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height() && self.bits[x + self.width * y]
    }

    /// Pixel rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels().chunks(self.width)
    }

    /// Block drawing, one text line per row.
    pub fn draw(&self) -> String {
        draw_rows(self.pixels(), self.width)
    }
}

impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.draw())
    }
}

/// Draw a flat pixel array as rows of `█` and `░`.
pub fn draw_rows(pixels: &[bool], width: usize) -> String {
    pixels
        .chunks(width.max(1))
        .map(|row| row.iter().map(|&b| if b { '█' } else { '░' }).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Bitmap {
        // 3x2 pixels + marker
        Bitmap::new(3, vec![true, false, true, false, true, false, true]).unwrap()
    }

    #[test]
    fn test_shape() {
        let bitmap = sample();
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
        assert_eq!(bitmap.len(), 7);
        assert_eq!(bitmap.pixels().len(), 6);
        assert!(bitmap.marker());
        assert!(bitmap.get(0, 0));
        assert!(bitmap.get(1, 1));
        assert!(!bitmap.get(3, 0));
        assert!(!bitmap.get(0, 2));
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert!(Bitmap::new(3, vec![false; 6]).is_err());
        assert!(Bitmap::new(0, vec![false]).is_err());
        assert!(Bitmap::new(3, Vec::new()).is_err());
    }

    #[test]
    fn test_draw() {
        assert_eq!(sample().draw(), "█░█\n░█░");
        assert_eq!(sample().rows().count(), 2);
    }
}
