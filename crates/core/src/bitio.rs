//! Bit-level I/O over boolean bitstreams.
//!
//! Every codec in this crate produces a short sequence of bits that a human
//! reads off letter by letter, so streams are kept as `Vec<bool>` rather than
//! packed bytes. `BitWriter` and `BitReader` both work MSB-first: writing
//! value=0b101 with count=3 appends 1, 0, 1.
//!
//! # Example
//! ```
//! use compression_ciphers_core::bitio::{format_bits, BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bit(true);
//! let bits = writer.finish();
//! assert_eq!(format_bits(&bits), "1011");
//!
//! let mut reader = BitReader::new(&bits);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert!(reader.read_bit().unwrap());
//! ```

use crate::error::{BitIoError, Result};

/// Appends bits MSB-first to a growing stream.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bits: Vec<bool>,
}

impl BitWriter {
    /// Empty stream.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` for more than 64 bits.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        for shift in (0..count).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
        Ok(())
    }

    /// Append `count` copies of `bit`.
    pub fn write_repeated(&mut self, bit: bool, count: usize) {
        self.bits.extend(std::iter::repeat(bit).take(count));
    }

    /// Append a slice of bits verbatim.
    pub fn extend_from_slice(&mut self, bits: &[bool]) {
        self.bits.extend_from_slice(bits);
    }

    /// Bits written so far.
    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// The written stream.
    pub fn finish(self) -> Vec<bool> {
        self.bits
    }
}

/// Reads bits MSB-first from a borrowed stream.
///
/// # Invariants
/// - `position` never exceeds `data.len()`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [bool],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [bool]) -> Self {
        Self { data, position: 0 }
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        let bit = *self
            .data
            .get(self.position)
            .ok_or(BitIoError::UnexpectedEof)?;
        self.position += 1;
        Ok(bit)
    }

    /// Read a single bit, or `default` once the stream is exhausted.
    pub fn read_bit_or(&mut self, default: bool) -> bool {
        self.read_bit().unwrap_or(default)
    }

    /// Read up to 64 bits as an unsigned value.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let value = self.data[self.position..self.position + count]
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | bit as u64);
        self.position += count;
        Ok(value)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Unread bits.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }
}

/// Render bits as a string of '0' and '1'.
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parse a string of '0' and '1' characters.
pub fn parse_bits(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .map(|ch| match ch {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(BitIoError::InvalidBitChar(other).into()),
        })
        .collect()
}
