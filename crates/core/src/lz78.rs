//! LZ78 dictionary coding of bitmap pixels.
//!
//! The dictionary starts as `[0, 1]`. Each step emits the index of the
//! longest entry matching at the cursor (the latest index wins ties) in the
//! current codeword width, then appends the matched pattern extended by the
//! following input bit. The width starts at one bit and grows by one after
//! any emission made while the dictionary size is a power of two.
//!
//! ```text
//! pixels 0 1 1 0 1
//! step 0: match "0"  -> index 0 (width 1), add "01" (size 3)
//! step 1: match "1"  -> index 1 (width 2), add "11" (size 4)
//! step 2: match "1"  -> index 1 (width 2), add "10" (size 5)
//! step 3: match "01" -> index 2 (width 3)
//! ```
//!
//! The bitmap's marker bit is not encoded.

use std::fmt;

use crate::bitio::{format_bits, BitReader, BitWriter};
use crate::bitmap::Bitmap;
use crate::builder::{BitmapCodec, CodecOutput};
use crate::error::{MalformedInput, Result};
use crate::puzzle::{CipherKind, PuzzleDetail};

/// Display ceiling of an LZ78 puzzle, in letters.
pub const DEFAULT_CEILING: usize = 25;

/// One dictionary pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictEntry {
    bits: Vec<bool>,
}

impl DictEntry {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Pattern as an integer, for patterns of at most 64 bits.
    pub fn value(&self) -> Option<u64> {
        (self.bits.len() <= 64).then(|| self.bits.iter().fold(0u64, |acc, &b| (acc << 1) | b as u64))
    }

    fn extended(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Self { bits }
    }
}

impl fmt::Display for DictEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_bits(&self.bits))
    }
}

/// An emitted dictionary index and the width it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    pub index: usize,
    pub width: usize,
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.index, width = self.width)
    }
}

/// Output of [`encode`]: the bitstream and the state a solver rebuilds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lz78Encoding {
    pub bits: Vec<bool>,
    pub codewords: Vec<Codeword>,
    /// Final dictionary, in index order
    pub dictionary: Vec<DictEntry>,
}

fn seed_dictionary() -> Vec<DictEntry> {
    vec![DictEntry::new(vec![false]), DictEntry::new(vec![true])]
}

/// Whether an emission at this dictionary size widens the next codeword.
fn widens_after(dict_len: usize) -> bool {
    dict_len.is_power_of_two()
}

/// Encode a pixel sequence.
///
/// # Errors
/// `BitIoError::InvalidBitCount` if the codeword width passes 64 bits.
pub fn encode(input: &[bool]) -> Result<Lz78Encoding> {
    let mut dictionary = seed_dictionary();
    let mut codewords = Vec::new();
    let mut out = BitWriter::new();
    let mut width = 1;
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        // Both seed entries are single bits, so something always matches
        let mut index = 0;
        for (i, entry) in dictionary.iter().enumerate() {
            if rest.starts_with(entry.bits()) && entry.len() >= dictionary[index].len() {
                index = i;
            }
        }
        let matched = dictionary[index].clone();

        out.write_bits(index as u64, width)?;
        codewords.push(Codeword { index, width });
        if widens_after(dictionary.len()) {
            width += 1;
        }

        pos += matched.len();
        if pos < input.len() {
            dictionary.push(matched.extended(input[pos]));
        }
    }

    Ok(Lz78Encoding {
        bits: out.finish(),
        codewords,
        dictionary,
    })
}

/// Rebuild `len` pixels from an LZ78 bitstream.
///
/// # Errors
/// `BitIoError::UnexpectedEof` if the stream ends early,
/// `MalformedInput::UnknownCodeword` for an index the dictionary does not
/// hold yet, `MalformedInput::Undecodable` if the patterns overrun `len`.
pub fn decode(bits: &[bool], len: usize) -> Result<Vec<bool>> {
    let mut reader = BitReader::new(bits);
    let mut dictionary = seed_dictionary();
    let mut output: Vec<bool> = Vec::with_capacity(len);
    let mut width = 1;
    // Entry created by the previous step, waiting for its last bit
    let mut pending: Option<DictEntry> = None;

    while output.len() < len {
        let index = reader.read_bits(width)? as usize;
        // The pending entry counts towards the dictionary size at emission
        let size = dictionary.len() + pending.is_some() as usize;

        let pattern = match &pending {
            _ if index < dictionary.len() => dictionary[index].clone(),
            // Referenced in the step that creates it: its last bit is its own first bit
            Some(prev) if index == dictionary.len() => prev.extended(prev.bits()[0]),
            _ => return Err(MalformedInput::UnknownCodeword { index, size }.into()),
        };

        if let Some(prefix) = pending.take() {
            dictionary.push(prefix.extended(pattern.bits()[0]));
        }

        output.extend_from_slice(pattern.bits());
        if output.len() > len {
            return Err(MalformedInput::Undecodable(format!(
                "pattern overruns {len} pixels"
            ))
            .into());
        }

        if widens_after(size) {
            width += 1;
        }
        if output.len() < len {
            pending = Some(pattern);
        }
    }

    Ok(output)
}

/// LZ78 over a rendered bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LempelZivCodec {
    ceiling: usize,
}

impl LempelZivCodec {
    pub fn new(ceiling: usize) -> Self {
        Self { ceiling }
    }
}

impl Default for LempelZivCodec {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING)
    }
}

impl BitmapCodec for LempelZivCodec {
    fn kind(&self) -> CipherKind {
        CipherKind::LempelZiv
    }

    fn ceiling(&self) -> usize {
        self.ceiling
    }

    fn encode(&self, bitmap: &Bitmap) -> Result<CodecOutput> {
        let encoding = encode(bitmap.pixels())?;

        let mut trace = vec![
            format!("Bitmap ({}×{}):", bitmap.width(), bitmap.height()),
            bitmap.draw(),
            "Dictionary:".to_string(),
        ];
        trace.extend(
            encoding
                .dictionary
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("{i}: {entry}")),
        );
        trace.push(format!(
            "Output: {}",
            encoding
                .codewords
                .iter()
                .map(|c| format!("{}={}", c.index, c))
                .collect::<Vec<_>>()
                .join(" ")
        ));

        Ok(CodecOutput {
            bits: encoding.bits,
            trace,
            detail: PuzzleDetail::LempelZiv {
                dictionary: encoding.dictionary,
                codewords: encoding.codewords,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::parse_bits;
    use proptest::prelude::*;

    #[test]
    fn test_first_steps() {
        let input = parse_bits("01101").unwrap();
        let enc = encode(&input).unwrap();
        let indices: Vec<_> = enc.codewords.iter().map(|c| c.index).collect();
        let widths: Vec<_> = enc.codewords.iter().map(|c| c.width).collect();
        assert_eq!(indices[0], 0);
        assert_eq!(widths[0], 1);
        assert_eq!(widths[1], 2);
        assert_eq!(enc.dictionary[2].to_string(), "01");
        assert_eq!(enc.dictionary[3].to_string(), "11");
        assert_eq!(decode(&enc.bits, input.len()).unwrap(), input);
    }

    #[test]
    fn test_prefers_longest_then_latest() {
        // "0", "00", "000", then only "0" fits the last pixel
        let input = parse_bits("0000000").unwrap();
        let enc = encode(&input).unwrap();
        let indices: Vec<_> = enc.codewords.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2, 3, 0]);
        // widths 1, 2, 2, 3
        assert_eq!(format_bits(&enc.bits), "01011000");
        assert_eq!(enc.dictionary[2].to_string(), "00");
        assert_eq!(enc.dictionary[4].to_string(), "0000");
        assert_eq!(decode(&enc.bits, input.len()).unwrap(), input);
    }

    #[test]
    fn test_width_grows_at_powers_of_two() {
        let input: Vec<bool> = (0..200).map(|i| (i * 7 / 3) % 2 == 0).collect();
        let enc = encode(&input).unwrap();
        for (step, codeword) in enc.codewords.iter().enumerate() {
            // Dictionary size at emission is 2 + step
            let expected = 1 + (0..step).filter(|j| (2 + j).is_power_of_two()).count();
            assert_eq!(codeword.width, expected, "step {step}");
            assert!(codeword.index < 2 + step);
        }
        // One entry per emission except the last
        assert_eq!(enc.dictionary.len(), 2 + enc.codewords.len() - 1);
    }

    #[test]
    fn test_empty_input() {
        let enc = encode(&[]).unwrap();
        assert!(enc.bits.is_empty());
        assert!(enc.codewords.is_empty());
        assert_eq!(enc.dictionary.len(), 2);
        assert_eq!(decode(&[], 0).unwrap(), Vec::<bool>::new());
    }

    #[test]
    fn test_decode_rejects_unknown_index() {
        // width 1 then width 2: index 3 is not yet known (size 3)
        let bits = parse_bits("011").unwrap();
        assert!(decode(&bits, 10).is_err());
        // truncated stream
        assert!(decode(&parse_bits("0").unwrap(), 5).is_err());
    }

    #[test]
    fn test_entry_value() {
        let entry = DictEntry::new(parse_bits("1011").unwrap());
        assert_eq!(entry.value(), Some(11));
        assert_eq!(entry.to_string(), "1011");
        assert_eq!(Codeword { index: 3, width: 4 }.to_string(), "0011");
    }

    #[test]
    fn test_codec_skips_marker() {
        let bitmap = Bitmap::new(2, vec![true, false, false, true, true]).unwrap();
        let out = LempelZivCodec::default().encode(&bitmap).unwrap();
        assert_eq!(decode(&out.bits, 4).unwrap(), bitmap.pixels());
        assert!(matches!(out.detail, PuzzleDetail::LempelZiv { .. }));
        assert!(out.trace.iter().any(|l| l == "Dictionary:"));
    }

    proptest! {
        #[test]
        fn encode_decode_roundtrip(input in prop::collection::vec(any::<bool>(), 0..400)) {
            let enc = encode(&input).unwrap();
            prop_assert_eq!(decode(&enc.bits, input.len()).unwrap(), input);
        }

        #[test]
        fn dictionary_grows_one_per_match(input in prop::collection::vec(any::<bool>(), 1..300)) {
            let enc = encode(&input).unwrap();
            prop_assert_eq!(enc.dictionary.len(), enc.codewords.len() + 1);
            let total: usize = enc.codewords.iter().map(|c| c.width).sum();
            prop_assert_eq!(total, enc.bits.len());
        }
    }
}
