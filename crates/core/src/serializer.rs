//! Letter serialization of bitstreams.
//!
//! Bitstreams are shown to the solver as letters A-Z using a prefix-free
//! code of 4- and 5-bit words:
//!
//! ```text
//! A-T  5 bits  00000 .. 10011   (value 0..19)
//! U-Z  4 bits  1010  .. 1111    (value 10..15, letter = value + 10)
//! ```
//!
//! A stream starting with `1` followed by a `1` in either of the next two
//! positions takes the 4-bit form; everything else takes 5 bits.
//!
//! Two packers share the table. [`pack`] fails when the tail is too short
//! for the next code, which sends the puzzle search off to try other
//! parameters. [`pack_padded`] instead appends `1` bits until the tail forms
//! a code; the arithmetic cipher relies on that because its decoder reads
//! missing bits as `1` anyway.

use std::fmt;

use crate::bitio::format_bits;
use crate::error::{Result, SerializeError};

/// One display letter and the bits it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPiece {
    pub letter: char,
    pub bits: Vec<bool>,
}

impl fmt::Display for EncodedPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.letter, format_bits(&self.bits))
    }
}

/// Packed display string with its per-letter breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    pub text: String,
    pub pieces: Vec<EncodedPiece>,
}

impl Packed {
    /// Number of display letters.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// Code length of the letter starting with these bits (at least 3 needed).
fn code_len(head: &[bool]) -> usize {
    if head[0] && (head[1] || head[2]) {
        4
    } else {
        5
    }
}

fn letter_for(code: &[bool]) -> char {
    let value = code.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8);
    let index = if code.len() == 4 { value + 10 } else { value };
    char::from(b'A' + index)
}

/// Pack bits into letters, failing if the stream does not end on a letter boundary.
///
/// # Errors
/// `SerializeError::InsufficientBits` when fewer bits remain than the next
/// letter needs.
pub fn pack(bits: &[bool]) -> Result<Packed> {
    let mut text = String::new();
    let mut pieces = Vec::new();
    let mut rest = bits;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(SerializeError::InsufficientBits {
                needed: 4,
                available: rest.len(),
            }
            .into());
        }
        let len = code_len(rest);
        if rest.len() < len {
            return Err(SerializeError::InsufficientBits {
                needed: len,
                available: rest.len(),
            }
            .into());
        }
        let (code, tail) = rest.split_at(len);
        let letter = letter_for(code);
        text.push(letter);
        pieces.push(EncodedPiece {
            letter,
            bits: code.to_vec(),
        });
        rest = tail;
    }
    Ok(Packed { text, pieces })
}

/// Pack bits into letters, completing a short tail with `1` bits.
pub fn pack_padded(bits: &[bool]) -> Packed {
    let mut padded = bits.to_vec();
    let mut text = String::new();
    let mut pieces = Vec::new();
    let mut pos = 0;
    while pos < bits.len() {
        // Padding to five bits always decides the code length
        while padded.len() - pos < 5 {
            padded.push(true);
        }
        let len = code_len(&padded[pos..]);
        let code = &padded[pos..pos + len];
        let letter = letter_for(code);
        text.push(letter);
        pieces.push(EncodedPiece {
            letter,
            bits: code.to_vec(),
        });
        pos += len;
    }
    Packed { text, pieces }
}

/// Bits for a single display letter.
pub fn letter_bits(letter: char) -> Result<Vec<bool>> {
    if !letter.is_ascii_uppercase() {
        return Err(SerializeError::InvalidLetter(letter).into());
    }
    let index = letter as u8 - b'A';
    let (value, len) = if index >= 20 { (index - 10, 4) } else { (index, 5) };
    Ok((0..len).rev().map(|shift| (value >> shift) & 1 == 1).collect())
}

/// Expand a display string back into its bitstream.
pub fn unpack(text: &str) -> Result<Vec<bool>> {
    let mut bits = Vec::new();
    for letter in text.chars() {
        bits.extend(letter_bits(letter)?);
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::parse_bits;
    use proptest::prelude::*;

    #[test]
    fn test_table_endpoints() {
        assert_eq!(format_bits(&letter_bits('A').unwrap()), "00000");
        assert_eq!(format_bits(&letter_bits('T').unwrap()), "10011");
        assert_eq!(format_bits(&letter_bits('U').unwrap()), "1010");
        assert_eq!(format_bits(&letter_bits('Z').unwrap()), "1111");
        assert!(letter_bits('a').is_err());
    }

    #[test]
    fn test_pack_mixed_lengths() {
        let bits = parse_bits("1010" /* U */).unwrap();
        assert_eq!(pack(&bits).unwrap().text, "U");

        let bits = parse_bits("10011" /* T */).unwrap();
        assert_eq!(pack(&bits).unwrap().text, "T");

        let bits = parse_bits("00111111100000").unwrap();
        let packed = pack(&bits).unwrap();
        assert_eq!(packed.text, "HZA");
        assert_eq!(packed.len(), 3);
        assert_eq!(packed.pieces[1].to_string(), "Z=1111");
    }

    #[test]
    fn test_pack_rejects_short_tail() {
        assert!(pack(&parse_bits("101").unwrap()).is_err());
        // 1000 needs a fifth bit
        let err = pack(&parse_bits("1000").unwrap()).unwrap_err();
        assert!(err.is_recoverable());
        assert!(pack(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_pack_padded_tails() {
        // "0" -> 01111 = P
        assert_eq!(pack_padded(&parse_bits("0").unwrap()).text, "P");
        // "10" -> 1011 = V
        assert_eq!(pack_padded(&parse_bits("10").unwrap()).text, "V");
        // "100" -> 10011 = T
        assert_eq!(pack_padded(&parse_bits("100").unwrap()).text, "T");
        // "1" -> 1111 = Z
        assert_eq!(pack_padded(&parse_bits("1").unwrap()).text, "Z");
        // full codes are untouched
        assert_eq!(pack_padded(&parse_bits("000001010").unwrap()).text, "AU");
        assert!(pack_padded(&[]).is_empty());
    }

    #[test]
    fn test_unpack_rejects_lowercase() {
        assert!(unpack("AbC").is_err());
    }

    proptest! {
        #[test]
        fn pack_unpack_roundtrip(letters in prop::collection::vec(0u8..26, 0..30)) {
            // Any concatenation of codes packs back to the same letters
            let text: String = letters.iter().map(|&i| char::from(b'A' + i)).collect();
            let bits = unpack(&text).unwrap();
            let packed = pack(&bits).unwrap();
            prop_assert_eq!(&packed.text, &text);
            prop_assert_eq!(unpack(&packed.text).unwrap(), bits);
        }

        #[test]
        fn padded_is_prefix_extension(bits in prop::collection::vec(any::<bool>(), 0..80)) {
            let packed = pack_padded(&bits);
            let back = unpack(&packed.text).unwrap();
            prop_assert!(back.len() >= bits.len());
            prop_assert!(back.len() - bits.len() < 5);
            prop_assert_eq!(&back[..bits.len()], &bits[..]);
            prop_assert!(back[bits.len()..].iter().all(|&b| b));
        }
    }
}
