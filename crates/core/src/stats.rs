//! Search statistics for the puzzle builder.
//!
//! Counts how much of the generate-and-reject search was spent where:
//! - words and alphabets tried
//! - bitmap widths rendered or rejected
//! - candidates discarded for length or packing
//! - random tables and trees drawn by the word ciphers
//!
//! Counters are plain fields updated by the builder as it goes. The struct
//! is not shared between threads; one builder owns one `SearchStats`.

use std::time::{Duration, Instant};

/// Counters for one builder's lifetime.
#[derive(Debug, Clone)]
pub struct SearchStats {
    /// When the builder was created
    pub start_time: Instant,

    /// Set by [`SearchStats::complete`]
    pub end_time: Option<Instant>,

    // === Bitmap search ===
    /// Answer words drawn from the word source
    pub words_tried: u64,

    /// Alphabets tried across all words
    pub alphabets_tried: u64,

    /// Bitmap widths attempted
    pub widths_tried: u64,

    /// Widths where the word could not be drawn
    pub renders_rejected: u64,

    /// Renders the codec could not take (odd length for the sprite codec)
    pub codec_skips: u64,

    // === Candidates ===
    /// Candidates whose display string exceeded the ceiling
    pub over_length: u64,

    /// Bitstreams that did not end on a letter boundary
    pub unpackable: u64,

    /// Random weight lists or frequency tables drawn
    pub tables_tried: u64,

    /// Valid candidates collected before selection
    pub candidates_collected: u64,

    /// Finished puzzles
    pub puzzles_built: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            words_tried: 0,
            alphabets_tried: 0,
            widths_tried: 0,
            renders_rejected: 0,
            codec_skips: 0,
            over_length: 0,
            unpackable: 0,
            tables_tried: 0,
            candidates_collected: 0,
            puzzles_built: 0,
        }
    }

    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration, or time elapsed so far if not complete.
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Fraction of rendered widths that produced a usable candidate.
    pub fn acceptance_rate(&self) -> f64 {
        let rendered = self.widths_tried.saturating_sub(self.renders_rejected);
        if rendered == 0 {
            0.0
        } else {
            self.candidates_collected as f64 / rendered as f64
        }
    }

    /// Mean number of discarded attempts per finished puzzle.
    pub fn rejections_per_puzzle(&self) -> f64 {
        if self.puzzles_built == 0 {
            0.0
        } else {
            (self.renders_rejected + self.codec_skips + self.over_length + self.unpackable) as f64
                / self.puzzles_built as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Search Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!("Puzzles built: {}", self.puzzles_built);
        println!();

        println!("=== Bitmap Search ===");
        println!("Words tried: {}", self.words_tried);
        println!("Alphabets tried: {}", self.alphabets_tried);
        println!("Widths tried: {}", self.widths_tried);
        println!("Renders rejected: {}", self.renders_rejected);
        println!("Codec skips: {}", self.codec_skips);
        println!();

        println!("=== Candidates ===");
        println!("Tables/trees drawn: {}", self.tables_tried);
        println!("Over length: {}", self.over_length);
        println!("Unpackable: {}", self.unpackable);
        println!("Collected: {}", self.candidates_collected);
        println!("Acceptance: {:.1}%", self.acceptance_rate() * 100.0);
        println!("Rejections per puzzle: {:.1}", self.rejections_per_puzzle());
        println!();
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             words_tried={}\n\
             alphabets_tried={}\n\
             widths_tried={}\n\
             renders_rejected={}\n\
             codec_skips={}\n\
             over_length={}\n\
             unpackable={}\n\
             tables_tried={}\n\
             candidates_collected={}\n\
             puzzles_built={}\n\
             acceptance_rate={:.4}\n",
            self.duration().as_millis(),
            self.words_tried,
            self.alphabets_tried,
            self.widths_tried,
            self.renders_rejected,
            self.codec_skips,
            self.over_length,
            self.unpackable,
            self.tables_tried,
            self.candidates_collected,
            self.puzzles_built,
            self.acceptance_rate(),
        )
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_creation() {
        let stats = SearchStats::new();
        assert!(stats.end_time.is_none());
        assert_eq!(stats.acceptance_rate(), 0.0);
        assert_eq!(stats.rejections_per_puzzle(), 0.0);
    }

    #[test]
    fn test_acceptance_rate() {
        let mut stats = SearchStats::new();
        stats.widths_tried = 25;
        stats.renders_rejected = 5;
        stats.candidates_collected = 5;
        assert_eq!(stats.acceptance_rate(), 0.25);
    }

    #[test]
    fn test_rejections_per_puzzle() {
        let mut stats = SearchStats::new();
        stats.renders_rejected = 3;
        stats.over_length = 4;
        stats.unpackable = 1;
        stats.puzzles_built = 2;
        assert_eq!(stats.rejections_per_puzzle(), 4.0);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut stats = SearchStats::new();
        stats.complete();
        let first = stats.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stats.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut stats = SearchStats::new();
        stats.words_tried = 3;
        stats.puzzles_built = 1;
        let text = stats.export_text();
        assert!(text.contains("words_tried=3\n"));
        assert!(text.contains("puzzles_built=1\n"));
        assert!(text.lines().all(|l| l.contains('=')));
    }
}
