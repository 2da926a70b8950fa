//! Character and affix n-grams over detection-normalized text.
//!
//! Grams are padded with [`PAD`] on both sides; affix grams additionally wrap
//! the word in [`ST`]/[`EN`] so that word starts and ends become features.

use crate::unicode::is_letter;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const PAD: char = '\u{2}';
pub const ST: char = '\u{1}';
pub const EN: char = '\u{3}';
/// Separator between the language code and the gram in a trie key.
pub const SEP: char = '\u{1}';

/// Letter runs, optionally joined by a single apostrophe or hyphen.
pub static RX_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}+(?:['’\-]\p{L}+)*").unwrap());

/// Ordered so that sums over the counts are reproducible bit for bit.
pub type GramCounts = BTreeMap<String, usize>;

#[inline]
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    RX_WORD.find_iter(text).map(|m| m.as_str())
}

/// All `n`-char windows over `text` padded with `n - 1` [`PAD`]s per side.
pub fn char_ngrams(text: &str, n: usize) -> Vec<String> {
    let pad = n.saturating_sub(1);
    let buf: Vec<char> = std::iter::repeat_n(PAD, pad)
        .chain(text.chars())
        .chain(std::iter::repeat_n(PAD, pad))
        .collect();
    if n == 0 || buf.len() < n {
        return Vec::new();
    }
    buf.windows(n).map(|w| w.iter().collect()).collect()
}

/// [`char_ngrams`] of `word` framed by [`ST`] and [`EN`].
pub fn affix_ngrams(word: &str, n: usize) -> Vec<String> {
    let mut framed = String::with_capacity(word.len() + 2);
    framed.push(ST);
    framed.push_str(word);
    framed.push(EN);
    char_ngrams(&framed, n)
}

pub fn count_char_ngrams(text: &str, n: usize) -> GramCounts {
    let mut counts = GramCounts::new();
    for g in char_ngrams(text, n) {
        *counts.entry(g).or_default() += 1;
    }
    counts
}

/// Affix grams of every word of at least two chars long enough to fill an
/// `n`-window once framed.
pub fn count_affix_ngrams<'a>(tokens: impl IntoIterator<Item = &'a str>, n: usize) -> GramCounts {
    let mut counts = GramCounts::new();
    for w in tokens {
        let len = w.chars().count();
        if len < 2 || len + 2 < n {
            continue;
        }
        for g in affix_ngrams(w, n) {
            *counts.entry(g).or_default() += 1;
        }
    }
    counts
}

/// Padded grams made of exactly `n` letters; sentinels and non-letters drop
/// the whole window.
pub fn letter_ngrams(text: &str, n: usize) -> GramCounts {
    let mut counts = GramCounts::new();
    for g in char_ngrams(text, n) {
        if g.chars().all(is_letter) {
            *counts.entry(g).or_default() += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_and_windows() {
        let g = char_ngrams("ab", 3);
        assert_eq!(
            g,
            ["\u{2}\u{2}a", "\u{2}ab", "ab\u{2}", "b\u{2}\u{2}"]
                .map(String::from)
                .to_vec()
        );
        assert_eq!(char_ngrams("", 2), vec!["\u{2}\u{2}".to_string()]);
        assert_eq!(char_ngrams("é", 1), vec!["é".to_string()]);
    }

    #[test]
    fn affixes_frame_the_word() {
        let g = affix_ngrams("ok", 2);
        assert_eq!(g.first().map(String::as_str), Some("\u{2}\u{1}"));
        assert!(g.contains(&"\u{1}o".to_string()));
        assert!(g.contains(&"k\u{3}".to_string()));
    }

    #[test]
    fn affix_counts_skip_short_words() {
        let c = count_affix_ngrams(["a", "on"], 5);
        assert!(c.is_empty());
        let c = count_affix_ngrams(["a", "ons"], 5);
        assert!(c.contains_key("\u{1}ons\u{3}"));
    }

    #[test]
    fn letter_grams_drop_sentinels_and_spaces() {
        let c = letter_ngrams("ab ab", 2);
        assert_eq!(c.len(), 1);
        assert_eq!(c["ab"], 2);
    }

    #[test]
    fn word_regex() {
        let w: Vec<&str> = words("l'école, twenty-one 42 it’s").collect();
        assert_eq!(w, ["l'école", "twenty-one", "it’s"]);
    }
}
