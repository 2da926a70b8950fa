//! Character predicates shared by the normalization stages, the tokenizer and
//! the scoring features.
//!
//! General-category tests go through `regex` Unicode classes compiled once.
//! ASCII is answered inline because it dominates real input.

use regex::Regex;
use std::sync::LazyLock;

pub const SOFT_HYPHEN: char = '\u{00AD}';
pub const ZWSP: char = '\u{200B}';
pub const ZWNJ: char = '\u{200C}';
pub const ZWJ: char = '\u{200D}';
pub const WORD_JOINER: char = '\u{2060}';
pub const VARIATION_SELECTOR_16: char = '\u{FE0F}';
pub const MIDDLE_DOT: char = '\u{00B7}';

/// Apostrophe variants folded to ASCII `'` before lookups.
pub const APOSTROPHES: &[char] = &['\'', '\u{2019}', '\u{02BC}'];

/// Double-quote variants that may sit between two word characters.
pub const QUOTES: &[char] = &['"', '\u{201C}', '\u{201D}', '\u{201E}', '\u{00AB}', '\u{00BB}'];

/// Characters that glue two word runs together when followed by a word character.
pub const JOINERS: &[char] = &[
    '.', '_', ':', '-', '\u{2010}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}',
    '\u{05BE}', '\u{05F3}', '\u{05F4}', MIDDLE_DOT,
];

static LETTER: LazyLock<Regex> = LazyLock::new(|| class(r"\p{L}"));
static CORE: LazyLock<Regex> = LazyLock::new(|| class(r"[\p{L}\p{M}\p{N}\p{Cf}]"));
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| class(r"\p{P}"));
static MARK_LIKE: LazyLock<Regex> = LazyLock::new(|| class(r"[\p{Mn}\p{Me}\p{Cf}]"));
static OTHER: LazyLock<Regex> = LazyLock::new(|| class(r"\p{C}"));
static PICTOGRAPHIC: LazyLock<Regex> = LazyLock::new(|| class(r"\p{Extended_Pictographic}"));

fn class(body: &str) -> Regex {
    Regex::new(&format!("^{body}$")).unwrap()
}

#[inline(always)]
fn matches(re: &Regex, c: char) -> bool {
    let mut buf = [0u8; 4];
    re.is_match(c.encode_utf8(&mut buf))
}

/// General category `L*`.
#[inline]
pub fn is_letter(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic();
    }
    matches(&LETTER, c)
}

/// Letter, mark, number or format control: the characters a word is made of.
#[inline]
pub fn is_core(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric();
    }
    matches(&CORE, c)
}

/// General category `P*`.
#[inline]
pub fn is_punctuation(c: char) -> bool {
    matches(&PUNCTUATION, c)
}

/// Non-spacing mark, enclosing mark or format control.
#[inline]
pub fn is_mark_like(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }
    matches(&MARK_LIKE, c)
}

/// General category `C*` (controls, format, unassigned, private use, surrogates).
#[inline]
pub fn is_other(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_control();
    }
    matches(&OTHER, c)
}

#[inline]
pub fn is_pictographic(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }
    matches(&PICTOGRAPHIC, c)
}

#[inline(always)]
pub fn is_apostrophe(c: char) -> bool {
    APOSTROPHES.contains(&c)
}

#[inline(always)]
pub fn is_quote(c: char) -> bool {
    QUOTES.contains(&c)
}

#[inline(always)]
pub fn is_joiner(c: char) -> bool {
    JOINERS.contains(&c)
}

/// Whitespace that separates tokens. No-break, narrow no-break and thin spaces
/// are kept as potential token content.
#[inline(always)]
pub fn is_separator_space(c: char) -> bool {
    !matches!(c, '\u{00A0}' | '\u{202F}' | '\u{2009}') && c.is_whitespace()
}

/// Variation selector 16 or ZWJ, the glue of emoji sequences.
#[inline(always)]
pub const fn is_emoji_glue(c: char) -> bool {
    matches!(c, VARIATION_SELECTOR_16 | ZWJ)
}

#[inline]
pub fn is_punctuation_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_punctuation)
}

#[inline]
pub fn is_marks_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_mark_like)
}

#[inline]
pub fn is_emoji_glue_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_emoji_glue)
}

/// True when `s` contains ZWNJ or ZWJ.
#[inline]
pub fn has_zero_width_joiner(s: &str) -> bool {
    // Both encode as E2 80 8C / E2 80 8D.
    memchr::memmem::find(s.as_bytes(), "\u{200C}".as_bytes()).is_some()
        || memchr::memmem::find(s.as_bytes(), "\u{200D}".as_bytes()).is_some()
}

#[inline]
pub fn has_word_joiner(s: &str) -> bool {
    memchr::memmem::find(s.as_bytes(), "\u{2060}".as_bytes()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_covers_letters_marks_numbers_and_format() {
        assert!(is_core('a'));
        assert!(is_core('7'));
        assert!(is_core('é'));
        assert!(is_core('\u{0301}'));
        assert!(is_core('\u{200C}'));
        assert!(is_core('٣'));
        assert!(!is_core('-'));
        assert!(!is_core(' '));
    }

    #[test]
    fn punctuation_excludes_symbols() {
        assert!(is_punctuation('.'));
        assert!(is_punctuation('«'));
        assert!(is_punctuation('_'));
        assert!(!is_punctuation('+'));
        assert!(!is_punctuation('$'));
    }

    #[test]
    fn separator_space_keeps_no_break_variants() {
        assert!(is_separator_space(' '));
        assert!(is_separator_space('\t'));
        assert!(!is_separator_space('\u{00A0}'));
        assert!(!is_separator_space('\u{202F}'));
        assert!(!is_separator_space('\u{2009}'));
    }

    #[test]
    fn pictographic_and_glue() {
        assert!(is_pictographic('😀'));
        assert!(is_pictographic('❤'));
        assert!(!is_pictographic('a'));
        assert!(is_emoji_glue_only("\u{FE0F}\u{200D}"));
        assert!(!is_emoji_glue_only(""));
    }

    #[test]
    fn zero_width_detection() {
        assert!(has_zero_width_joiner("می\u{200C}خواهم"));
        assert!(!has_zero_width_joiner("plain"));
        assert!(has_word_joiner("wo\u{2060}rd"));
    }

    #[test]
    fn marks_only() {
        assert!(is_marks_only("\u{0301}\u{0302}"));
        assert!(is_marks_only("\u{200D}"));
        assert!(!is_marks_only("a\u{0301}"));
        assert!(!is_marks_only(""));
    }
}
