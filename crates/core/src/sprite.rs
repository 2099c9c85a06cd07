//! XOR-delta plus pair run-length coding of bitmaps.
//!
//! First every bit that does not start a row is replaced by itself XOR the
//! pixel to its left. The result is read as 2-bit pairs and split into
//! alternating runs:
//!
//! - raw runs: nonzero pairs copied as-is, closed by a `00` pair;
//! - zero runs: a count `n` of zero pairs, written as `n + 1` in an
//!   Elias-gamma style bucket code (one `1` per doubling past 2, a `0`, then
//!   the offset into the bucket in as many bits as the bucket's power).
//!
//! The stream starts with a single mode bit, `1` when the first run is raw.
//!
//! ```text
//! n + 1 = 2..3   0 x
//! n + 1 = 4..7   1 0 xx
//! n + 1 = 8..15  1 1 0 xxx
//! ```
//!
//! The whole bit array is coded, marker included, so it must have even length.

use crate::bitio::{BitReader, BitWriter};
use crate::bitmap::{draw_rows, Bitmap};
use crate::builder::{BitmapCodec, CodecOutput};
use crate::error::{MalformedInput, Result};
use crate::puzzle::{CipherKind, PuzzleDetail};

/// Display ceiling of a sprite puzzle, in letters.
pub const DEFAULT_CEILING: usize = 25;

/// Replace each bit after a row start with its XOR against the bit before it.
///
/// A zero `width` has no rows and returns the bits unchanged.
pub fn xor_delta(bits: &[bool], width: usize) -> Vec<bool> {
    if width == 0 {
        return bits.to_vec();
    }
    bits.iter()
        .enumerate()
        .map(|(i, &bit)| if i % width == 0 { bit } else { bit ^ bits[i - 1] })
        .collect()
}

/// Inverse of [`xor_delta`].
pub fn undo_xor_delta(delta: &[bool], width: usize) -> Vec<bool> {
    if width == 0 {
        return delta.to_vec();
    }
    let mut out: Vec<bool> = Vec::with_capacity(delta.len());
    for (i, &bit) in delta.iter().enumerate() {
        let restored = if i % width == 0 { bit } else { bit ^ out[i - 1] };
        out.push(restored);
    }
    out
}

fn pair_is_zero(bits: &[bool], at: usize) -> bool {
    !bits[at] && !bits[at + 1]
}

fn write_zero_run(out: &mut BitWriter, pairs: usize) {
    let n = pairs + 1;
    let mut power = 1;
    while (1usize << (power + 1)) <= n {
        power += 1;
        out.write_bit(true);
    }
    out.write_bit(false);
    let offset = n - (1 << power);
    for shift in (0..power).rev() {
        out.write_bit((offset >> shift) & 1 == 1);
    }
}

/// Run-length code an even-length bit array.
///
/// # Errors
/// `MalformedInput::OddLengthBitmap` for odd-length input.
pub fn rle_encode(bits: &[bool]) -> Result<Vec<bool>> {
    if bits.len() % 2 != 0 {
        return Err(MalformedInput::OddLengthBitmap(bits.len()).into());
    }
    let mut out = BitWriter::new();
    if bits.is_empty() {
        return Ok(out.finish());
    }

    let mut raw = !pair_is_zero(bits, 0);
    out.write_bit(raw);
    let mut pos = 0;
    while pos < bits.len() {
        if raw {
            while pos < bits.len() && !pair_is_zero(bits, pos) {
                out.extend_from_slice(&bits[pos..pos + 2]);
                pos += 2;
            }
            out.write_repeated(false, 2);
        } else {
            let mut pairs = 0;
            while pos < bits.len() && pair_is_zero(bits, pos) {
                pairs += 1;
                pos += 2;
            }
            write_zero_run(&mut out, pairs);
        }
        raw = !raw;
    }
    Ok(out.finish())
}

/// Rebuild `len` bits of XOR-delta data from a run-length stream.
///
/// # Errors
/// `BitIoError::UnexpectedEof` if the stream ends early,
/// `MalformedInput::Undecodable` if the runs overrun `len`.
pub fn rle_decode(stream: &[bool], len: usize) -> Result<Vec<bool>> {
    let mut reader = BitReader::new(stream);
    let mut out = Vec::with_capacity(len);
    if len == 0 {
        return Ok(out);
    }

    let mut raw = reader.read_bit()?;
    while out.len() < len {
        if raw {
            loop {
                let (a, b) = (reader.read_bit()?, reader.read_bit()?);
                if !a && !b {
                    break;
                }
                out.push(a);
                out.push(b);
            }
        } else {
            let mut power = 1;
            while reader.read_bit()? {
                power += 1;
                if power >= usize::BITS as usize - 1 {
                    return Err(MalformedInput::Undecodable("zero run bucket too large".into()).into());
                }
            }
            let offset = reader.read_bits(power)? as usize;
            let pairs = (1usize << power) + offset - 1;
            out.resize(out.len() + 2 * pairs, false);
        }
        if out.len() > len {
            return Err(MalformedInput::Undecodable(format!("runs overrun {len} bits")).into());
        }
        raw = !raw;
    }
    Ok(out)
}

/// Full sprite decode: run-length stream back to the original bit array.
pub fn decode(stream: &[bool], len: usize, width: usize) -> Result<Vec<bool>> {
    Ok(undo_xor_delta(&rle_decode(stream, len)?, width))
}

/// XOR-delta plus RLE over a rendered bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteCodec {
    ceiling: usize,
}

impl SpriteCodec {
    pub fn new(ceiling: usize) -> Self {
        Self { ceiling }
    }
}

impl Default for SpriteCodec {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING)
    }
}

impl BitmapCodec for SpriteCodec {
    fn kind(&self) -> CipherKind {
        CipherKind::Sprite
    }

    fn ceiling(&self) -> usize {
        self.ceiling
    }

    fn accepts(&self, bitmap: &Bitmap) -> bool {
        bitmap.len() % 2 == 0
    }

    fn encode(&self, bitmap: &Bitmap) -> Result<CodecOutput> {
        let delta = xor_delta(bitmap.bits(), bitmap.width());
        let bits = rle_encode(&delta)?;

        let trace = vec![
            format!("Bitmap ({}×{}):", bitmap.width(), bitmap.height()),
            bitmap.draw(),
            "After XOR:".to_string(),
            draw_rows(&delta[..delta.len() - 1], bitmap.width()),
            format!("Marker: {}", u8::from(delta[delta.len() - 1])),
        ];

        Ok(CodecOutput {
            bits,
            trace,
            detail: PuzzleDetail::Sprite { delta },
        })
    }
}
