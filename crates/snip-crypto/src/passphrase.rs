//! Human-memorable passphrase identifiers
//!
//! An identifier is N words drawn uniformly from a fixed 7776-entry list,
//! concatenated with no separator, each word's first letter uppercased.
//! The uppercase count doubles as the lifetime-class signal, so the word
//! count is load-bearing: 2 words = ephemeral, 3 words = prolonged.

use rand::Rng;
use std::sync::OnceLock;

/// 6^5 entries, diceware-sized
pub const WORDLIST_SIZE: usize = 7776;

/// Ephemeral snippets get the short form.
pub const DEFAULT_WORD_COUNT: usize = 2;

static WORDLIST_RAW: &str = include_str!("wordlist.txt");
static WORDLIST: OnceLock<Vec<&'static str>> = OnceLock::new();

fn wordlist() -> &'static [&'static str] {
    WORDLIST.get_or_init(|| {
        let words: Vec<&'static str> = WORDLIST_RAW.lines().collect();
        assert_eq!(words.len(), WORDLIST_SIZE, "embedded wordlist is damaged");
        words
    })
}

/// Generate a passphrase identifier of `word_count` words.
///
/// Indices are drawn independently, so repeated words are permitted; the
/// entropy is `word_count * log2(7776)` ≈ 12.9 bits per word regardless.
pub fn generate(word_count: usize) -> String {
    let words = wordlist();
    let mut rng = rand::thread_rng();

    let mut phrase = String::new();
    for _ in 0..word_count {
        let word = words[rng.gen_range(0..WORDLIST_SIZE)];
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            phrase.push(first.to_ascii_uppercase());
            phrase.push_str(chars.as_str());
        }
    }
    phrase
}

/// Short-form passphrase for ephemeral snippets.
pub fn generate_default() -> String {
    generate(DEFAULT_WORD_COUNT)
}
