//! Configuration for the compression-ciphers application.
//!
//! Flags are parsed by hand. The tool runs with zero arguments: it picks a
//! time-based seed, draws one puzzle of a random cipher from the built-in
//! word list, and prints the seed so the run can be repeated.

use std::path::PathBuf;

use compression_ciphers_core::{BuilderConfig, CipherKind, KeyPlacement};

/// Complete configuration for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // === Puzzles ===
    /// Cipher to build (None = random per puzzle)
    pub cipher: Option<CipherKind>,

    /// Number of puzzles to build
    pub count: usize,

    /// Seed for every random choice
    pub seed: u64,

    // === Words ===
    /// Word file, one word per line (None = built-in list)
    pub words_file: Option<PathBuf>,

    /// Override the lower answer length bound of the selected cipher
    /// (every cipher when none is selected)
    pub min_len: Option<usize>,

    /// Override the upper answer length bound, same scope as `min_len`
    pub max_len: Option<usize>,

    // === Search ===
    /// Words tried by the bitmap search before giving up
    pub max_attempts: Option<usize>,

    /// Keyword placement for keyed Huffman (None = random per puzzle)
    pub key_placement: Option<KeyPlacement>,

    // === Behavior ===
    /// Guess to check against every puzzle
    pub answer: Option<String>,

    pub show_diagnostics: bool,
    pub print_stats: bool,
    pub print_config: bool,

    /// Number of `-v` flags
    pub verbose: u8,
    pub quiet: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (without the
    /// program name).
    ///
    /// If --seed is not given, a time-based seed is used and printed.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut cipher = None;
        let mut count = 1;
        let mut seed: Option<u64> = None;
        let mut words_file = None;
        let mut min_len = None;
        let mut max_len = None;
        let mut max_attempts = None;
        let mut key_placement = None;
        let mut answer = None;
        let mut show_diagnostics = true;
        let mut print_stats = false;
        let mut print_config = false;
        let mut verbose = 0u8;
        let mut quiet = false;

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--cipher" => {
                    let name = value(&mut args, "--cipher", "a cipher name")?;
                    cipher = Some(name.parse::<CipherKind>().map_err(|e| e.to_string())?);
                }
                "--seed" => {
                    seed = Some(number(&mut args, "--seed")?);
                }
                "--count" => {
                    count = number(&mut args, "--count")?;
                }
                "--words" => {
                    words_file = Some(PathBuf::from(value(&mut args, "--words", "a path")?));
                }
                "--min-len" => {
                    min_len = Some(number(&mut args, "--min-len")?);
                }
                "--max-len" => {
                    max_len = Some(number(&mut args, "--max-len")?);
                }
                "--max-attempts" => {
                    max_attempts = Some(number(&mut args, "--max-attempts")?);
                }
                "--key-front" => {
                    key_placement = Some(KeyPlacement::Front);
                }
                "--key-back" => {
                    key_placement = Some(KeyPlacement::Back);
                }
                "--answer" => {
                    answer = Some(value(&mut args, "--answer", "a word")?.to_string());
                }
                "--no-diagnostics" => {
                    show_diagnostics = false;
                }
                "--stats" => {
                    print_stats = true;
                }
                "--print-config" => {
                    print_config = true;
                }
                "-v" | "--verbose" => {
                    verbose = verbose.saturating_add(1);
                }
                "-vv" => {
                    verbose = verbose.saturating_add(2);
                }
                "-q" | "--quiet" => {
                    quiet = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    return Err(format!("unknown argument: {other}"));
                }
            }
        }

        if count == 0 {
            return Err("--count must be at least 1".to_string());
        }

        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let config = Config {
            cipher,
            count,
            seed,
            words_file,
            min_len,
            max_len,
            max_attempts,
            key_placement,
            answer,
            show_diagnostics,
            print_stats,
            print_config,
            verbose,
            quiet,
        };
        config.builder_config()?;
        Ok(config)
    }

    /// Search parameters with the command-line overrides applied.
    pub fn builder_config(&self) -> Result<BuilderConfig, String> {
        let mut builder = BuilderConfig {
            key_placement: self.key_placement,
            ..BuilderConfig::default()
        };
        if self.min_len.is_some() || self.max_len.is_some() {
            let kinds = match self.cipher {
                Some(kind) => vec![kind],
                None => CipherKind::ALL.to_vec(),
            };
            for kind in kinds {
                let range = builder.word_len(kind);
                let min = self.min_len.unwrap_or(*range.start());
                let max = self.max_len.unwrap_or(*range.end());
                builder.set_word_len(kind, min..=max);
            }
        }
        if let Some(attempts) = self.max_attempts {
            builder.max_word_attempts = attempts;
        }
        builder.validate().map_err(|e| e.to_string())?;
        Ok(builder)
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        let builder = self.builder_config().unwrap_or_default();
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        println!("Cipher: {}", self.cipher.map_or("(random)", CipherKind::name));
        println!("Count: {}", self.count);
        println!(
            "Words: {}",
            self.words_file
                .as_ref()
                .map_or_else(|| "(built-in)".to_string(), |p| p.display().to_string())
        );
        println!();
        println!("=== Search ===");
        for kind in CipherKind::ALL {
            let range = builder.word_len(kind);
            println!(
                "{:<17} length {}-{}, ceiling {} letters",
                kind.name(),
                range.start(),
                range.end(),
                builder.ceiling(kind)
            );
        }
        println!("Keyword length: {}-{}", builder.keyword_len.start(), builder.keyword_len.end());
        println!("Key placement: {}", match self.key_placement {
            Some(KeyPlacement::Front) => "front",
            Some(KeyPlacement::Back) => "back",
            None => "(random)",
        });
        println!("Max word attempts: {}", builder.max_word_attempts);
        println!("Max table attempts: {}", builder.max_table_attempts);
        println!();
    }
}

fn value<'a>(args: &mut impl Iterator<Item = &'a String>, flag: &str, what: &str) -> Result<&'a str, String> {
    args.next()
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires {what}"))
}

fn number<'a, T: std::str::FromStr>(args: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<T, String> {
    let raw = value(args, flag, "a number")?;
    raw.parse().map_err(|_| format!("invalid {}: {raw}", flag.trim_start_matches('-')))
}

fn print_help() {
    println!("compression-ciphers: Hand-decodable compression puzzles");
    println!();
    println!("USAGE:");
    println!("    compression-ciphers [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --cipher <NAME>         weighted-huffman, keyed-huffman, arithmetic,");
    println!("                            lempel-ziv or sprite (default: random)");
    println!("    --seed <N>              Random seed for determinism");
    println!("    --count <N>             Puzzles to build (default: 1)");
    println!();
    println!("    --words <PATH>          Word file, one per line (default: built-in list)");
    println!("    --min-len <N>           Shortest answer (selected cipher, or all)");
    println!("    --max-len <N>           Longest answer (selected cipher, or all)");
    println!("    --max-attempts <N>      Words tried by the bitmap search (default: 1000)");
    println!("    --key-front             Keyword first in the keyed alphabet");
    println!("    --key-back              Keyword last in the keyed alphabet");
    println!();
    println!("    --answer <WORD>         Check a guess against each puzzle");
    println!("    --no-diagnostics        Don't print the solution trace");
    println!("    --stats                 Print search statistics");
    println!("    --print-config          Print resolved configuration");
    println!("    -v, -vv                 More logging (RUST_LOG is used otherwise)");
    println!("    -q                      Errors only");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    compression-ciphers --seed 42                     # Deterministic run");
    println!("    compression-ciphers --cipher sprite --count 3     # Three sprite puzzles");
    println!("    compression-ciphers --cipher arithmetic --no-diagnostics --answer QUIZ");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(&args(&["--seed", "7"])).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.count, 1);
        assert!(config.cipher.is_none());
        assert!(config.show_diagnostics);
        assert!(!config.print_stats);
        assert_eq!(config.builder_config().unwrap(), BuilderConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let config = Config::from_args(&args(&[
            "--cipher", "lz78", "--seed", "3", "--count", "4", "--words", "words.txt", "--max-attempts", "50",
            "--key-back", "--answer", "CODE", "--no-diagnostics", "--stats", "--print-config", "-v", "-v",
        ]))
        .unwrap();
        assert_eq!(config.cipher, Some(CipherKind::LempelZiv));
        assert_eq!(config.count, 4);
        assert_eq!(config.words_file, Some(PathBuf::from("words.txt")));
        assert_eq!(config.key_placement, Some(KeyPlacement::Back));
        assert_eq!(config.answer.as_deref(), Some("CODE"));
        assert!(!config.show_diagnostics);
        assert!(config.print_stats && config.print_config);
        assert_eq!(config.verbose, 2);

        let builder = config.builder_config().unwrap();
        assert_eq!(builder.max_word_attempts, 50);
        assert_eq!(builder.key_placement, Some(KeyPlacement::Back));
    }

    #[test]
    fn test_length_overrides_apply_to_every_cipher() {
        let config = Config::from_args(&args(&["--seed", "1", "--min-len", "5"])).unwrap();
        let builder = config.builder_config().unwrap();
        assert_eq!(builder.word_len(CipherKind::Arithmetic), 5..=6);
        assert_eq!(builder.word_len(CipherKind::Sprite), 5..=8);

        let config = Config::from_args(&args(&["--seed", "1", "--min-len", "4", "--max-len", "4"])).unwrap();
        let builder = config.builder_config().unwrap();
        for kind in CipherKind::ALL {
            assert_eq!(builder.word_len(kind), 4..=4);
        }
    }

    #[test]
    fn test_length_overrides_follow_selected_cipher() {
        let config = Config::from_args(&args(&["--seed", "1", "--cipher", "lz78", "--min-len", "7"])).unwrap();
        let builder = config.builder_config().unwrap();
        assert_eq!(builder.word_len(CipherKind::LempelZiv), 7..=8);
        assert_eq!(builder.word_len(CipherKind::Arithmetic), 4..=6);
        assert_eq!(builder.word_len(CipherKind::WeightedHuffman), 5..=8);

        // A range the selected cipher cannot use is still an error
        assert!(Config::from_args(&args(&["--cipher", "arithmetic", "--min-len", "7"])).is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Config::from_args(&args(&["--cipher", "enigma"])).is_err());
        assert!(Config::from_args(&args(&["--seed"])).is_err());
        assert!(Config::from_args(&args(&["--count", "zero"])).is_err());
        assert!(Config::from_args(&args(&["--count", "0"])).is_err());
        assert!(Config::from_args(&args(&["--bogus"])).is_err());
        // Arithmetic answers are at most 6 letters by default
        assert!(Config::from_args(&args(&["--min-len", "7"])).is_err());
        assert!(Config::from_args(&args(&["--max-attempts", "0"])).is_err());
    }

    #[test]
    fn test_missing_value_message() {
        let err = Config::from_args(&args(&["--words"])).unwrap_err();
        assert_eq!(err, "--words requires a path");
        let err = Config::from_args(&args(&["--count", "x"])).unwrap_err();
        assert_eq!(err, "invalid count: x");
    }
}
