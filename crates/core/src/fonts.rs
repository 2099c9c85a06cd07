//! Glyph tables for the five symbolic alphabets.
//!
//! Block fonts are drawn row by row with `#` for a set pixel and `.` for a
//! clear one. Braille cells list their raised dots (1-3 down the left
//! column, 4-6 down the right). Morse letters become a one-pixel-wide
//! vertical strip: a dot is one pixel, a dash three, with a clear pixel
//! between symbols.

use crate::alphabet::{AlphabetKind, Glyph};

use Placement::{Anywhere, Medial, NotInitial};

/// Where in a word a Braille cell may appear.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Anywhere,
    /// Neither first nor last
    Medial,
    NotInitial,
}

const ENGLISH: [[&str; 4]; 26] = [
    ["#.", ".#", "##", "##"],
    ["#..", "##.", "#.#", "##."],
    ["..", "##", "#.", "##"],
    ["..#", ".##", "#.#", ".##"],
    ["##", "##", "#.", ".#"],
    [".#", "#.", "##", "#."],
    ["##", "##", ".#", "#."],
    ["#..", "##.", "#.#", "#.#"],
    ["#", ".", "#", "#"],
    [".#", "..", ".#", "##"],
    ["#..", "#.#", "##.", "#.#"],
    ["#.", "#.", "#.", ".#"],
    [".....", "##.#.", "#.#.#", "#.#.#"],
    ["...", "##.", "#.#", "#.#"],
    ["...", ".#.", "#.#", ".#."],
    ["##.", "#.#", "##.", "#.."],
    [".##", "#.#", ".##", "..#"],
    ["..", "##", "#.", "#."],
    [".#", "#.", ".#", "#."],
    ["#.", "##", "#.", ".#"],
    ["...", "#.#", "#.#", ".##"],
    ["...", "#.#", "#.#", ".#."],
    [".....", "#...#", "#.#.#", ".#.#."],
    ["...", "#.#", ".#.", "#.#"],
    ["#.#", ".##", "..#", "##."],
    ["##", ".#", "#.", "##"],
];

const PIGPEN: [[&str; 3]; 26] = [
    ["..#", "..#", "###"],
    ["#.#", "#.#", "###"],
    ["#..", "#..", "###"],
    ["###", "..#", "###"],
    ["###", "#.#", "###"],
    ["###", "#..", "###"],
    ["###", "..#", "..#"],
    ["###", "#.#", "#.#"],
    ["###", "#..", "#.."],
    ["..#", ".##", "###"],
    ["#.#", "###", "###"],
    ["#..", "##.", "###"],
    ["###", ".##", "###"],
    ["###", "###", "###"],
    ["###", "##.", "###"],
    ["###", ".##", "..#"],
    ["###", "###", "#.#"],
    ["###", "##.", "#.."],
    ["...", "#.#", ".#."],
    [".#.", "..#", ".#."],
    [".#.", "#..", ".#."],
    [".#.", "#.#", "..."],
    ["...", "###", ".#."],
    [".#.", ".##", ".#."],
    [".#.", "##.", ".#."],
    [".#.", "###", "..."],
];

const SEMAPHORE: [[&str; 3]; 26] = [
    ["...", ".#.", "##."],
    ["...", "##.", ".#."],
    ["#..", ".#.", ".#."],
    [".#.", ".#.", ".#."],
    ["..#", ".#.", ".#."],
    ["...", ".##", ".#."],
    ["...", ".#.", ".##"],
    ["...", "##.", "#.."],
    ["#..", ".#.", "#.."],
    [".#.", ".##", "..."],
    [".#.", ".#.", "#.."],
    ["..#", ".#.", "#.."],
    ["...", ".##", "#.."],
    ["...", ".#.", "#.#"],
    ["#..", "##.", "..."],
    [".#.", "##.", "..."],
    ["..#", "##.", "..."],
    ["...", "###", "..."],
    ["...", "##.", "..#"],
    ["##.", ".#.", "..."],
    ["#.#", ".#.", "..."],
    [".#.", ".#.", "..#"],
    ["..#", ".##", "..."],
    ["..#", ".#.", "..#"],
    ["#..", ".##", "..."],
    ["...", ".##", "..#"],
];

const BRAILLE: &[(&str, &str, Placement)] = &[
    ("A", "1", Anywhere),
    ("B", "12", Anywhere),
    ("C", "14", Anywhere),
    ("D", "145", Anywhere),
    ("E", "15", Anywhere),
    ("F", "124", Anywhere),
    ("G", "1245", Anywhere),
    ("H", "125", Anywhere),
    ("I", "24", Anywhere),
    ("J", "245", Anywhere),
    ("K", "13", Anywhere),
    ("L", "123", Anywhere),
    ("M", "134", Anywhere),
    ("N", "1345", Anywhere),
    ("O", "135", Anywhere),
    ("P", "1234", Anywhere),
    ("Q", "12345", Anywhere),
    ("R", "1235", Anywhere),
    ("S", "234", Anywhere),
    ("T", "2345", Anywhere),
    ("U", "136", Anywhere),
    ("V", "1236", Anywhere),
    ("W", "2456", Anywhere),
    ("X", "1346", Anywhere),
    ("Y", "13456", Anywhere),
    ("Z", "1356", Anywhere),
    ("AND", "12346", Anywhere),
    ("FOR", "123456", Anywhere),
    ("THE", "2346", Anywhere),
    ("WITH", "23456", Anywhere),
    ("AR", "345", Anywhere),
    ("BB", "23", Medial),
    ("CC", "25", Medial),
    ("CH", "16", Anywhere),
    ("EA", "2", Medial),
    ("ED", "1246", Anywhere),
    ("EN", "26", Anywhere),
    ("ER", "12456", Anywhere),
    ("FF", "235", Medial),
    ("GG", "2356", Medial),
    ("GH", "126", Anywhere),
    ("IN", "35", Anywhere),
    ("ING", "346", NotInitial),
    ("OF", "12356", Anywhere),
    ("OU", "1256", Anywhere),
    ("OW", "246", Anywhere),
    ("SH", "146", Anywhere),
    ("ST", "34", Anywhere),
    ("TH", "1456", Anywhere),
    ("WH", "156", Anywhere),
];

const MORSE: [&str; 26] = [
    ".-", "-...", "-.-.", "-..", ".", "..-.", "--.", "....", "..", ".---", "-.-", ".-..", "--",
    "-.", "---", ".--.", "--.-", ".-.", "...", "-", "..-", "...-", ".--", "-..-", "-.--", "--..",
];

/// Build the glyph list for an alphabet, in matching priority order.
pub(crate) fn glyphs(kind: AlphabetKind) -> Vec<Glyph> {
    match kind {
        AlphabetKind::English => block_font(&ENGLISH),
        AlphabetKind::Pigpen => block_font(&PIGPEN),
        AlphabetKind::Semaphore => block_font(&SEMAPHORE),
        AlphabetKind::Braille => braille(),
        AlphabetKind::Morse => morse(),
    }
}

fn block_font<const H: usize>(table: &[[&str; H]; 26]) -> Vec<Glyph> {
    table
        .iter()
        .zip('A'..='Z')
        .map(|(rows, letter)| {
            let width = rows[0].len();
            let pixels = rows.iter().flat_map(|row| row.chars().map(|ch| ch == '#')).collect();
            Glyph::new(letter.to_string(), width, H, pixels)
        })
        .collect()
}

fn braille() -> Vec<Glyph> {
    BRAILLE
        .iter()
        .map(|&(text, dots, placement)| {
            // Row-major over a 2x3 cell: pixel ix sits at column ix % 2, row ix / 2
            let pixels = (0..6)
                .map(|ix| {
                    let dot = 1 + ix / 2 + 3 * (ix % 2);
                    dots.contains(char::from(b'0' + dot as u8))
                })
                .collect();
            let (initial, terminal) = match placement {
                Anywhere => (true, true),
                Medial => (false, false),
                NotInitial => (false, true),
            };
            Glyph::new(text, 2, 3, pixels).with_placement(initial, terminal)
        })
        .collect()
}

fn morse() -> Vec<Glyph> {
    MORSE
        .iter()
        .zip('A'..='Z')
        .map(|(code, letter)| {
            let mut pixels = Vec::new();
            for (i, symbol) in code.chars().enumerate() {
                if i > 0 {
                    pixels.push(false);
                }
                let run = if symbol == '-' { 3 } else { 1 };
                pixels.extend(std::iter::repeat(true).take(run));
            }
            let height = pixels.len();
            Glyph::new(letter.to_string(), 1, height, pixels)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_fonts_are_rectangular() {
        for kind in [AlphabetKind::English, AlphabetKind::Pigpen, AlphabetKind::Semaphore] {
            let glyphs = glyphs(kind);
            assert_eq!(glyphs.len(), 26);
            for glyph in &glyphs {
                assert_eq!(glyph.pixels().len(), glyph.width() * glyph.height());
            }
        }
    }

    #[test]
    fn test_english_letter_shape() {
        let glyphs = glyphs(AlphabetKind::English);
        let m = &glyphs[12];
        assert_eq!(m.text(), "M");
        assert_eq!((m.width(), m.height()), (5, 4));
        assert!(!m.get(0, 0));
        assert!(m.get(0, 1) && m.get(1, 1) && !m.get(2, 1) && m.get(3, 1));
    }

    #[test]
    fn test_braille_dots() {
        let glyphs = glyphs(AlphabetKind::Braille);
        // D = dots 1, 4, 5
        let d = glyphs.iter().find(|g| g.text() == "D").unwrap();
        assert!(d.get(0, 0) && d.get(1, 0));
        assert!(!d.get(0, 1) && d.get(1, 1));
        assert!(!d.get(0, 2) && !d.get(1, 2));

        let bb = glyphs.iter().find(|g| g.text() == "BB").unwrap();
        assert!(!bb.can_be_initial() && !bb.can_be_final());
        let ing = glyphs.iter().find(|g| g.text() == "ING").unwrap();
        assert!(!ing.can_be_initial() && ing.can_be_final());
    }

    #[test]
    fn test_morse_strip() {
        let glyphs = glyphs(AlphabetKind::Morse);
        // A = .- -> # . # # #
        let a = &glyphs[0];
        assert_eq!((a.width(), a.height()), (1, 5));
        assert_eq!(a.pixels(), &[true, false, true, true, true]);
        // E = . -> single pixel
        assert_eq!(glyphs[4].height(), 1);
    }
}
