//! Word sources for puzzle answers and keywords.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::error::{Error, Result};

/// Supplies random words in a length range.
pub trait WordSource {
    /// A random uppercase A-Z word with `min..=max` letters.
    ///
    /// # Errors
    /// `Error::NoWordInRange` when the source has no such word.
    fn choose_word(&self, min: usize, max: usize, rng: &mut dyn RngCore) -> Result<String>;
}

const BUILTIN: &[&str] = &[
    "ABSORB", "ACCOUNT", "ADVANCE", "AIRPORT", "ALPHA", "ANCHOR", "ANSWER", "ARCHIVE", "ATTIC",
    "BALLAD", "BANDIT", "BASKET", "BEACON", "BINARY", "BISCUIT", "BLANKET", "BOTTLE", "BRIDGE",
    "BUCKET", "CABINET", "CACTUS", "CANDLE", "CANYON", "CARPET", "CASTLE", "CIPHER", "CLOCK",
    "COBALT", "COMPASS", "CONDOR", "COPPER", "CRYSTAL", "DAGGER", "DECODE", "DESERT", "DIAMOND",
    "DOLPHIN", "DRAGON", "EAGLE", "ECLIPSE", "ELEMENT", "EMBER", "ENCODE", "ENGINE", "FABRIC",
    "FACADE", "FALCON", "FIGURE", "FLAME", "FOREST", "FORTUNE", "FROST", "GADGET", "GALAXY",
    "GARDEN", "GLACIER", "GOBLIN", "GRAVITY", "HAMMER", "HARBOR", "HELMET", "HORIZON", "ICICLE",
    "IMAGE", "INDIGO", "ISLAND", "JACKET", "JIGSAW", "JUNGLE", "KERNEL", "KETTLE", "KINGDOM",
    "LADDER", "LANTERN", "LEMON", "LOCKET", "MAGNET", "MARBLE", "MEADOW", "MIRROR", "MONSOON",
    "NEEDLE", "NEBULA", "NOTEBOOK", "OCTAVE", "ORANGE", "ORBIT", "OXYGEN", "PALACE", "PEBBLE",
    "PENGUIN", "PILLOW", "PLANET", "POCKET", "PUZZLE", "PYRAMID", "QUARTZ", "QUILL", "RABBIT",
    "RADIO", "RIDDLE", "ROCKET", "SADDLE", "SHADOW", "SIGNAL", "SOLVE", "SPIRAL", "STATUE",
    "SUNSET", "TABLET", "TEMPLE", "THUNDER", "TIMBER", "TUNNEL", "UMBRELLA", "UNICORN", "VALLEY",
    "VELVET", "VIOLIN", "VOLCANO", "WALNUT", "WARRIOR", "WHISPER", "WIZARD", "YELLOW", "ZEPHYR",
    "ABSTRACT", "BACKPACK", "CHEMICAL", "DINOSAUR", "ENVELOPE", "FIREWORK", "HEADLINE",
    "KEYBOARD", "MOUNTAIN", "PAINTING", "SANDWICH", "TREASURE", "VAMPIRE", "SNOWFALL",
    "BEAR", "CODE", "DUST", "FERN", "GOLD", "HAWK", "IRON", "JADE", "KITE", "LAMP", "MOTH",
    "NEST", "OPAL", "PINE", "RUBY", "SAND", "TIDE", "VASE", "WOLF", "YARN",
];

/// In-memory list of uppercase words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Wrap caller-supplied words, uppercased; entries with characters
    /// outside A-Z are dropped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_uppercase()))
            .collect();
        Self { words }
    }

    /// The built-in English list.
    pub fn builtin() -> Self {
        Self::new(BUILTIN.iter().copied())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordSource for WordList {
    fn choose_word(&self, min: usize, max: usize, rng: &mut dyn RngCore) -> Result<String> {
        let candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|w| (min..=max).contains(&w.len()))
            .collect();
        candidates
            .choose(rng)
            .map(|w| (*w).clone())
            .ok_or(Error::NoWordInRange { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_builtin_is_clean() {
        let list = WordList::builtin();
        assert_eq!(list.len(), BUILTIN.len());
        for word in list.words() {
            assert!((4..=8).contains(&word.len()), "{word}");
        }
        // Keyword lengths are covered
        assert!(list.words().iter().filter(|w| w.len() >= 7).count() > 20);
    }

    #[test]
    fn test_choose_respects_range() {
        let list = WordList::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let word = list.choose_word(4, 6, &mut rng).unwrap();
            assert!((4..=6).contains(&word.len()));
        }
    }

    #[test]
    fn test_new_normalizes() {
        let list = WordList::new(["facade", " Cipher ", "two words", "x1", ""]);
        assert_eq!(list.words(), &["FACADE".to_string(), "CIPHER".to_string()]);
    }

    #[test]
    fn test_no_word_in_range() {
        let list = WordList::new(["ABC"]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = list.choose_word(4, 8, &mut rng).unwrap_err();
        assert!(matches!(err, Error::NoWordInRange { min: 4, max: 8 }));
    }

    #[test]
    fn test_seeded_choice_is_reproducible() {
        let list = WordList::builtin();
        let a = list.choose_word(4, 8, &mut ChaCha8Rng::seed_from_u64(11)).unwrap();
        let b = list.choose_word(4, 8, &mut ChaCha8Rng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }
}
