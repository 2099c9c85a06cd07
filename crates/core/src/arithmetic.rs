//! 20-bit integer arithmetic coding over A-Z plus an end-of-word symbol.
//!
//! The coder keeps two 20-bit registers `low` and `high`. Each symbol
//! narrows them to its share of the frequency table:
//!
//! ```text
//! range   = high - low + 1
//! low'    = range * cum / total + low
//! high'   = range * (cum + freq) / total + low - 1
//! ```
//!
//! Matching top bits are shifted out as output. When `low` is `01…` and
//! `high` is `10…` the interval straddles the midpoint; the second bit is
//! removed from both and a pending underflow bit is counted, to be emitted
//! (inverted) after the next resolved bit.
//!
//! # Termination
//!
//! After the end-of-word symbol the encoder writes the second bit of `low`,
//! one more than the pending underflow count of its complement, then the
//! leftover bits of `low`; trailing `1` bits are dropped because the decoder
//! reads past the end of the stream as `1`. This flush is specific to this
//! cipher, so its only guarantee is that `decode(encode(w)) == w`, which is
//! checked for every generated puzzle.

use rand::Rng;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{MalformedInput, Result};

/// Register width in bits.
pub const PRECISION: u32 = 20;

/// Symbol index of end-of-word.
pub const EOF_SYMBOL: usize = 26;

/// Number of symbols: A-Z plus end-of-word.
pub const SYMBOLS: usize = 27;

/// Largest table total the registers can resolve.
pub const MAX_TOTAL: u32 = 1 << (PRECISION - 2);

const MASK: u64 = (1 << PRECISION) - 1;
const TOP: u64 = 1 << (PRECISION - 1);
const SECOND: u64 = 1 << (PRECISION - 2);
const HALF_MASK: u64 = (1 << (PRECISION - 1)) - 1;

/// Decoder stops with an error after this many letters.
const MAX_DECODED_LETTERS: usize = 64;

/// Per-symbol weights shown to the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    weights: [u32; SYMBOLS],
}

impl FrequencyTable {
    /// # Errors
    /// `MalformedInput::InvalidWeights` if a weight is zero or the total
    /// exceeds [`MAX_TOTAL`].
    pub fn new(weights: [u32; SYMBOLS]) -> Result<Self> {
        if weights.iter().any(|&w| w == 0) {
            return Err(MalformedInput::InvalidWeights("zero symbol weight".into()).into());
        }
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total > MAX_TOTAL as u64 {
            return Err(MalformedInput::InvalidWeights(format!(
                "total {total} exceeds {MAX_TOTAL}"
            ))
            .into());
        }
        Ok(Self { weights })
    }

    /// Fresh table with every weight drawn from 1..=26.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut weights = [0u32; SYMBOLS];
        for w in weights.iter_mut() {
            *w = rng.gen_range(1..=26);
        }
        Self { weights }
    }

    pub fn weights(&self) -> &[u32; SYMBOLS] {
        &self.weights
    }

    pub fn weight(&self, symbol: usize) -> u32 {
        self.weights[symbol]
    }

    pub fn total(&self) -> u32 {
        self.weights.iter().sum()
    }

    /// Sum of the weights of all symbols before `symbol`.
    pub fn cumulative(&self, symbol: usize) -> u32 {
        self.weights[..symbol].iter().sum()
    }

    /// Cumulative boundaries 0, w0, w0+w1, …, total.
    pub fn boundaries(&self) -> Vec<u32> {
        (0..=SYMBOLS).map(|s| self.cumulative(s)).collect()
    }

    /// Weights written as letters (`A` = 1 … `Z` = 26), as displayed.
    pub fn letters(&self) -> String {
        self.weights
            .iter()
            .map(|&w| match w {
                1..=26 => char::from(b'A' + (w - 1) as u8),
                _ => '?',
            })
            .collect()
    }
}

fn symbol_name(symbol: usize) -> String {
    if symbol == EOF_SYMBOL {
        "EOF".to_string()
    } else {
        char::from(b'A' + symbol as u8).to_string()
    }
}

fn register(value: u64) -> String {
    format!("{:020b}", value)
}

/// Narrow `[low, high]` to `symbol`'s share of the table.
fn narrow(low: u64, high: u64, table: &FrequencyTable, symbol: usize) -> (u64, u64) {
    let total = table.total() as u64;
    let range = high - low + 1;
    let cum = table.cumulative(symbol) as u64;
    let freq = table.weight(symbol) as u64;
    let new_low = range * cum / total + low;
    let new_high = range * (cum + freq) / total + low - 1;
    (new_low, new_high)
}

/// Arithmetic-code `word` (letters A-Z) followed by end-of-word.
///
/// # Errors
/// `MalformedInput::InvalidLetter` for characters outside A-Z.
pub fn encode(word: &str, table: &FrequencyTable) -> Result<Vec<bool>> {
    let mut symbols = Vec::with_capacity(word.len() + 1);
    for ch in word.chars() {
        if !ch.is_ascii_uppercase() {
            return Err(MalformedInput::InvalidLetter(ch).into());
        }
        symbols.push((ch as u8 - b'A') as usize);
    }
    symbols.push(EOF_SYMBOL);

    let mut out = BitWriter::new();
    let (mut low, mut high) = (0u64, MASK);
    let mut underflow = 0usize;

    for symbol in symbols {
        (low, high) = narrow(low, high, table, symbol);

        while (high & TOP) == (low & TOP) {
            let bit = (high & TOP) != 0;
            out.write_bit(bit);
            out.write_repeated(!bit, underflow);
            underflow = 0;
            high = ((high << 1) & MASK) | 1;
            low = (low << 1) & MASK;
        }

        while (low & SECOND) != 0 && (high & SECOND) == 0 {
            underflow += 1;
            high = ((high & HALF_MASK) << 1) | TOP | 1;
            low = (low << 1) & HALF_MASK;
        }
    }

    let bit = (low & SECOND) != 0;
    out.write_bit(bit);
    out.write_repeated(!bit, underflow + 1);
    while low > 0 {
        out.write_bit((low & TOP) == 0);
        low = (low << 1) & HALF_MASK;
    }

    let mut bits = out.finish();
    while bits.last() == Some(&true) {
        bits.pop();
    }
    Ok(bits)
}

/// Decode a stream produced by [`encode`].
pub fn decode(bits: &[bool], table: &FrequencyTable) -> Result<String> {
    decode_with_trace(bits, table).map(|(word, _)| word)
}

/// Decode and record the register walkthrough a solver would follow.
///
/// Bits past the end of the stream read as `1`.
pub fn decode_with_trace(bits: &[bool], table: &FrequencyTable) -> Result<(String, Vec<String>)> {
    let mut reader = BitReader::new(bits);
    let total = table.total() as u64;
    let (mut low, mut high) = (0u64, MASK);
    let mut code = 0u64;
    for _ in 0..PRECISION {
        code = (code << 1) | reader.read_bit_or(true) as u64;
    }

    let mut trace = vec![format!(
        "start: high={} low={} code={}",
        register(high),
        register(low),
        register(code)
    )];
    let mut word = String::new();

    loop {
        if code < low || code > high {
            return Err(MalformedInput::Undecodable("code register left the interval".into()).into());
        }
        let pos = ((code - low + 1) * total - 1) / (high - low + 1);

        let mut symbol = 0;
        let mut cum = 0u64;
        while symbol < SYMBOLS && cum + table.weight(symbol) as u64 <= pos {
            cum += table.weight(symbol) as u64;
            symbol += 1;
        }
        if symbol == SYMBOLS {
            return Err(MalformedInput::Undecodable(format!("value {pos} beyond table total")).into());
        }
        trace.push(format!("value {pos} => {}", symbol_name(symbol)));

        if symbol == EOF_SYMBOL {
            break;
        }
        if word.len() >= MAX_DECODED_LETTERS {
            return Err(MalformedInput::Undecodable("no end-of-word symbol".into()).into());
        }
        word.push(char::from(b'A' + symbol as u8));

        (low, high) = narrow(low, high, table, symbol);

        let mut shifted = 0;
        while (high & TOP) == (low & TOP) {
            high = ((high << 1) & MASK) | 1;
            low = (low << 1) & MASK;
            code = ((code << 1) & MASK) | reader.read_bit_or(true) as u64;
            shifted += 1;
        }

        let mut underflows = 0;
        while (low & SECOND) != 0 && (high & SECOND) == 0 {
            high = ((high & HALF_MASK) << 1) | TOP | 1;
            low = (low << 1) & HALF_MASK;
            code = (((code & HALF_MASK) ^ SECOND) << 1) | reader.read_bit_or(true) as u64;
            underflows += 1;
        }

        trace.push(format!(
            "shifts {shifted},{underflows}: high={} low={} code={}",
            register(high),
            register(low),
            register(code)
        ));
    }

    Ok((word, trace))
}
