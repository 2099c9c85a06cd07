//! Integration tests for the full puzzle pipeline.
//!
//! These tests go through the public API only: word -> render -> codec ->
//! letters -> puzzle, then work each puzzle backwards the way a solver
//! would and check the answer comes out.

use rand::Rng;

use compression_ciphers_core::{
    alphabet::AlphabetKind,
    arithmetic,
    huffman::HuffmanTree,
    lz78, seeded_rng,
    serializer::{pack, unpack},
    sprite, BuilderConfig, CipherKind, Error, PuzzleBuilder, PuzzleDetail, Verdict, WordList,
};

const SMALL_DICTIONARY: &[&str] = &["CODE", "SOLVE", "FACADE", "PUZZLE", "KEYBOARD", "TREASURE"];

fn small_builder() -> PuzzleBuilder<WordList> {
    PuzzleBuilder::new(WordList::new(SMALL_DICTIONARY.iter().copied()), BuilderConfig::default())
        .expect("default config is valid")
}

/// FACADE in English fits on one line at width 13 and Huffman-codes into
/// at most 7 letters whose logged spans walk back to the word.
#[test]
fn test_facade_end_to_end() {
    // F A C A D E = 2+2+2+2+3+2 pixels
    let rendering = AlphabetKind::English.alphabet().render("FACADE", 13).unwrap();
    assert!(rendering.single_line);
    assert_eq!(rendering.bitmap.width(), 13);
    assert_eq!(rendering.bitmap.height(), 5);
    assert_eq!(rendering.bitmap.len(), 13 * 5 + 1);

    let mut builder = small_builder();
    let mut rng = seeded_rng(2024);
    let puzzle = builder.weighted_huffman_for_word("FACADE", &mut rng).unwrap();
    assert!(puzzle.encoded().len() <= 7, "{}", puzzle.encoded());

    let PuzzleDetail::WeightedHuffman { weights, spans, .. } = puzzle.detail() else {
        panic!("expected weighted Huffman detail");
    };

    // Rebuild the tree from the shown weights alone, as the solver does
    let (tree, _) = HuffmanTree::build(weights).unwrap();
    let bits = unpack(puzzle.encoded()).unwrap();
    let mut word = String::new();
    for span in spans {
        let letter = tree.decode(&bits[span.start..span.end]).unwrap();
        assert_eq!(letter, span.letter.to_string());
        word.push_str(&letter);
    }
    assert_eq!(word, "FACADE");
    assert_eq!(puzzle.submit(&word), Verdict::Correct);
}

/// Worked example: FACADE sent through a six-leaf tree labelled by the
/// keyword CABDEF, tree shape first. Weights are redrawn until the stream
/// packs exactly into letters.
#[test]
fn test_facade_keyed_worked_example() {
    let rendering = AlphabetKind::English.alphabet().render("FACADE", 13).unwrap();
    assert_eq!(rendering.units.concat(), "FACADE");

    let mut rng = seeded_rng(174);
    let (bits, packed) = (0..1_000)
        .find_map(|_| {
            let weights: Vec<u32> = (0..6).map(|_| rng.gen_range(1..=26)).collect();
            let (mut tree, _) = HuffmanTree::build(&weights).ok()?;
            tree.populate("CABDEF").ok()?;
            let mut bits = tree.encode_tree_structure();
            for letter in "FACADE".chars() {
                bits.extend(tree.encode_bits(letter)?);
            }
            let packed = pack(&bits).ok()?;
            Some((bits, packed))
        })
        .expect("some weights pack exactly");

    // Six leaves take eleven structure bits
    let (tree, used) = HuffmanTree::from_structure(&unpack(&packed.text).unwrap(), "CABDEF").unwrap();
    assert_eq!(used, 11);
    assert_eq!(tree.leaf_letters(), "CABDEF");
    assert_eq!(tree.decode(&bits[used..]).as_deref(), Some("FACADE"));
}

/// Every cipher finishes quickly on a small dictionary.
#[test]
fn test_search_terminates_for_every_cipher() {
    for seed in 0..3 {
        let mut builder = small_builder();
        let mut rng = seeded_rng(seed);
        for kind in CipherKind::ALL {
            let puzzle = builder
                .build(kind, &mut rng)
                .unwrap_or_else(|e| panic!("{kind} with seed {seed}: {e}"));
            assert_eq!(puzzle.kind(), kind);
            assert!(SMALL_DICTIONARY.contains(&puzzle.answer()));
            assert!(puzzle.encoded().len() <= builder.config().ceiling(kind));
            assert!(!puzzle.screens().is_empty());
        }
        let stats = builder.stats();
        assert_eq!(stats.puzzles_built, 5);
        assert!(stats.words_tried < 200, "words tried: {}", stats.words_tried);
    }
}

#[test]
fn test_same_seed_same_puzzle() {
    for kind in CipherKind::ALL {
        let a = small_builder().build(kind, &mut seeded_rng(99)).unwrap();
        let b = small_builder().build(kind, &mut seeded_rng(99)).unwrap();
        assert_eq!(a.encoded(), b.encoded());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a, b);
    }
}

#[test]
fn test_bitmap_puzzles_decode_to_their_bitmap() {
    let mut builder = small_builder();
    let mut rng = seeded_rng(7);

    let puzzle = builder.build(CipherKind::LempelZiv, &mut rng).unwrap();
    let bitmap = puzzle.bitmap().unwrap();
    let bits = unpack(puzzle.encoded()).unwrap();
    assert_eq!(lz78::decode(&bits, bitmap.pixels().len()).unwrap(), bitmap.pixels());
    let rerender = puzzle
        .alphabet()
        .unwrap()
        .alphabet()
        .render(puzzle.answer(), bitmap.width())
        .unwrap();
    assert_eq!(&rerender.bitmap, bitmap);

    let puzzle = builder.build(CipherKind::Sprite, &mut rng).unwrap();
    let bitmap = puzzle.bitmap().unwrap();
    let bits = unpack(puzzle.encoded()).unwrap();
    let decoded = sprite::decode(&bits, bitmap.len(), bitmap.width()).unwrap();
    assert_eq!(decoded, bitmap.bits());
    let PuzzleDetail::Sprite { delta } = puzzle.detail() else {
        panic!("expected sprite detail");
    };
    assert_eq!(sprite::undo_xor_delta(delta, bitmap.width()), bitmap.bits());
}

#[test]
fn test_keyed_huffman_solves_from_stream_and_keyword() {
    let mut builder = small_builder();
    let puzzle = builder.build(CipherKind::KeyedHuffman, &mut seeded_rng(31)).unwrap();
    let PuzzleDetail::KeyedHuffman {
        keyword, alphabet, ..
    } = puzzle.detail()
    else {
        panic!("expected keyed Huffman detail");
    };
    assert!(SMALL_DICTIONARY.contains(&keyword.as_str()));
    assert_eq!(puzzle.screens().last().unwrap(), keyword);

    let bits = unpack(&puzzle.screens()[..4].concat()).unwrap();
    let (tree, used) = HuffmanTree::from_structure(&bits, alphabet).unwrap();
    assert_eq!(used, 51);
    assert_eq!(tree.decode(&bits[used..]).unwrap(), puzzle.answer());
}

#[test]
fn test_arithmetic_decodes_from_screens() {
    let mut builder = small_builder();
    let puzzle = builder.build(CipherKind::Arithmetic, &mut seeded_rng(12)).unwrap();
    let PuzzleDetail::Arithmetic { table } = puzzle.detail() else {
        panic!("expected arithmetic detail");
    };
    let shown: String = puzzle.screens()[1..]
        .concat()
        .chars()
        .take_while(|c| c.is_ascii_uppercase())
        .collect();
    assert_eq!(shown, table.letters());

    let bits = unpack(&puzzle.screens()[0]).unwrap();
    assert_eq!(arithmetic::decode(&bits, table).unwrap(), puzzle.answer());
    assert!(puzzle
        .diagnostics()
        .iter()
        .any(|line| line.ends_with("=> EOF")));
}

#[test]
fn test_pieces_match_encoded_string() {
    let mut builder = small_builder();
    let mut rng = seeded_rng(5);
    for kind in CipherKind::ALL {
        let puzzle = builder.build(kind, &mut rng).unwrap();
        let letters: String = puzzle.pieces().iter().map(|p| p.letter).collect();
        assert_eq!(letters, puzzle.encoded());
        if kind != CipherKind::Arithmetic {
            // Strict packing: the pieces are exactly the codec output
            let rebuilt: Vec<bool> = puzzle.pieces().iter().flat_map(|p| p.bits.clone()).collect();
            assert_eq!(rebuilt, puzzle.bits());
            assert_eq!(pack(puzzle.bits()).unwrap().text, puzzle.encoded());
        }
        assert!(puzzle
            .diagnostics()
            .iter()
            .any(|line| line.contains(puzzle.answer()) && line.starts_with("Solution")));
    }
}

#[test]
fn test_submit_is_case_sensitive() {
    let mut builder = small_builder();
    let puzzle = builder.build(CipherKind::LempelZiv, &mut seeded_rng(8)).unwrap();
    assert_eq!(puzzle.submit(puzzle.answer()), Verdict::Correct);
    assert_eq!(puzzle.submit(&puzzle.answer().to_lowercase()), Verdict::Incorrect);
    assert_eq!(puzzle.submit("NOTAWORD"), Verdict::Incorrect);
}

#[test]
fn test_empty_word_source_fails_cleanly() {
    let mut builder = PuzzleBuilder::new(WordList::new(Vec::<String>::new()), BuilderConfig::default()).unwrap();
    for kind in CipherKind::ALL {
        let err = builder.build(kind, &mut seeded_rng(1)).unwrap_err();
        assert!(matches!(err, Error::NoWordInRange { .. }), "{kind}: {err}");
        assert!(!err.is_recoverable());
    }
}
