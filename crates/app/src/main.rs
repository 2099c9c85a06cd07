//! compression-ciphers: generate hand-decodable compression puzzles.
//!
//! Builds `--count` puzzles from one seeded generator and prints each
//! puzzle's screens, its fingerprint and (unless `--no-diagnostics`) the
//! step-by-step solution trace.

mod config;
mod wordlist;

use compression_ciphers_core::{seeded_rng, CipherKind, Puzzle, PuzzleBuilder, Verdict, WordList};
use rand::seq::SliceRandom;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use config::Config;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run with --help for usage");
            std::process::exit(2);
        }
    };

    init_tracing(&config);

    if let Err(e) = run(&config) {
        error!(seed = config.seed, "run failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    let filter = if config.quiet {
        EnvFilter::new("error")
    } else {
        match config.verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &Config) -> Result<(), String> {
    println!("Seed: {}", config.seed);
    if config.print_config {
        config.print();
    }

    let words = match &config.words_file {
        Some(path) => wordlist::load_word_list(path)?,
        None => WordList::builtin(),
    };
    info!(words = words.len(), "word list ready");

    let mut builder = PuzzleBuilder::new(words, config.builder_config()?).map_err(|e| e.to_string())?;
    let mut rng = seeded_rng(config.seed);

    for n in 1..=config.count {
        let kind = match config.cipher {
            Some(kind) => kind,
            None => *CipherKind::ALL.choose(&mut rng).ok_or("no ciphers")?,
        };
        let puzzle = builder.build(kind, &mut rng).map_err(|e| format!("{kind}: {e}"))?;
        print_puzzle(n, &puzzle, config);
    }

    if config.print_stats {
        let mut stats = builder.into_stats();
        stats.complete();
        stats.print_summary();
    }

    Ok(())
}

fn print_puzzle(n: usize, puzzle: &Puzzle, config: &Config) {
    println!();
    match puzzle.alphabet_name() {
        Some(alphabet) => println!("=== Puzzle {n}: {} ({alphabet}) ===", puzzle.kind()),
        None => println!("=== Puzzle {n}: {} ===", puzzle.kind()),
    }
    for (i, screen) in puzzle.screens().iter().enumerate() {
        println!("Screen {}: {screen}", i + 1);
    }
    println!("Encoded: {} ({} letters)", puzzle.encoded(), puzzle.encoded().len());
    println!("Fingerprint: {:08x}", puzzle.fingerprint());

    if config.show_diagnostics {
        println!();
        for line in puzzle.diagnostics() {
            println!("  {line}");
        }
    }

    if let Some(guess) = &config.answer {
        match puzzle.submit(guess) {
            Verdict::Correct => println!("Answer {guess}: correct"),
            Verdict::Incorrect => println!("Answer {guess}: incorrect"),
        }
    }
}
