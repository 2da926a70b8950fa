//! Unicode scripts and the per-line script share used to gate candidates.

use crate::model::ngram::{EN, PAD, ST};
use crate::unicode::is_letter;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Cyrillic,
    Greek,
    Arabic,
    Devanagari,
    Bengali,
    Ethiopic,
    Tibetan,
    Gujarati,
    Gurmukhi,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Sinhala,
    Hebrew,
    Armenian,
    Georgian,
    Khmer,
    Thai,
    Lao,
    Myanmar,
    Han,
    Hiragana,
    Katakana,
    Hangul,
    Yi,
    Thaana,
    CanadianAboriginal,
}

impl Script {
    pub const ALL: [Script; 30] = [
        Script::Latin,
        Script::Cyrillic,
        Script::Greek,
        Script::Arabic,
        Script::Devanagari,
        Script::Bengali,
        Script::Ethiopic,
        Script::Tibetan,
        Script::Gujarati,
        Script::Gurmukhi,
        Script::Oriya,
        Script::Tamil,
        Script::Telugu,
        Script::Kannada,
        Script::Malayalam,
        Script::Sinhala,
        Script::Hebrew,
        Script::Armenian,
        Script::Georgian,
        Script::Khmer,
        Script::Thai,
        Script::Lao,
        Script::Myanmar,
        Script::Han,
        Script::Hiragana,
        Script::Katakana,
        Script::Hangul,
        Script::Yi,
        Script::Thaana,
        Script::CanadianAboriginal,
    ];

    /// Unicode `Script=` property value.
    pub const fn property(self) -> &'static str {
        match self {
            Script::Latin => "Latin",
            Script::Cyrillic => "Cyrillic",
            Script::Greek => "Greek",
            Script::Arabic => "Arabic",
            Script::Devanagari => "Devanagari",
            Script::Bengali => "Bengali",
            Script::Ethiopic => "Ethiopic",
            Script::Tibetan => "Tibetan",
            Script::Gujarati => "Gujarati",
            Script::Gurmukhi => "Gurmukhi",
            Script::Oriya => "Oriya",
            Script::Tamil => "Tamil",
            Script::Telugu => "Telugu",
            Script::Kannada => "Kannada",
            Script::Malayalam => "Malayalam",
            Script::Sinhala => "Sinhala",
            Script::Hebrew => "Hebrew",
            Script::Armenian => "Armenian",
            Script::Georgian => "Georgian",
            Script::Khmer => "Khmer",
            Script::Thai => "Thai",
            Script::Lao => "Lao",
            Script::Myanmar => "Myanmar",
            Script::Han => "Han",
            Script::Hiragana => "Hiragana",
            Script::Katakana => "Katakana",
            Script::Hangul => "Hangul",
            Script::Yi => "Yi",
            Script::Thaana => "Thaana",
            Script::CanadianAboriginal => "Canadian_Aboriginal",
        }
    }

    #[inline]
    pub fn contains(self, c: char) -> bool {
        if c.is_ascii() {
            return self == Script::Latin && c.is_ascii_alphabetic();
        }
        let mut buf = [0u8; 4];
        SCRIPT_CLASSES[self as usize].is_match(c.encode_utf8(&mut buf))
    }

    /// Punctuation-like letters the script uses inside running text.
    pub const fn neutral(self) -> &'static [char] {
        match self {
            Script::Arabic => ARABIC_NEUTRAL,
            Script::Tibetan => &['\u{0F0B}', '\u{0F0C}'],
            Script::Devanagari => &['\u{0964}', '\u{0965}'],
            Script::Han | Script::Hiragana | Script::Katakana => CJK_NEUTRAL,
            Script::Khmer => &['\u{17D4}', '\u{17D5}'],
            Script::Thai => &['\u{0E2F}', '\u{0E46}'],
            Script::Lao => &['\u{0EAF}'],
            Script::Myanmar => &['\u{104A}', '\u{104B}'],
            _ => &[],
        }
    }
}

pub const ARABIC_NEUTRAL: &[char] = &['\u{060C}', '\u{061B}', '\u{061F}', '\u{0640}'];
pub const HEBREW_NEUTRAL: &[char] = &['\u{05BE}'];
const CJK_NEUTRAL: &[char] = &['\u{3001}', '\u{3002}', '\u{30FB}', '\u{FF0C}', '\u{FF0E}'];
const BASE_NEUTRAL: &[char] = &[PAD, ST, EN, ' ', '\t'];

static SCRIPT_CLASSES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    Script::ALL
        .iter()
        .map(|s| Regex::new(&format!(r"^\p{{Script={}}}$", s.property())).unwrap())
        .collect()
});

static INHERITED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Script=Inherited}$").unwrap());

#[inline]
pub fn is_neutral(c: char, scripts: &[Script], extra: &[char]) -> bool {
    BASE_NEUTRAL.contains(&c)
        || extra.contains(&c)
        || scripts.iter().any(|s| s.neutral().contains(&c))
}

/// Fraction of the letters in `text` (neutral letters excluded) that belong to
/// one of `scripts` or to the Inherited script.
///
/// No script constraint yields `1.0`; a text without letters yields `0.0`.
pub fn line_script_share(text: &str, scripts: &[Script], extra: &[char]) -> f64 {
    if scripts.is_empty() {
        return 1.0;
    }
    let mut total = 0usize;
    let mut ok = 0usize;
    for c in text.chars() {
        if !is_letter(c) || is_neutral(c, scripts, extra) {
            continue;
        }
        total += 1;
        if scripts.iter().any(|s| s.contains(c)) || is_inherited(c) {
            ok += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    ok as f64 / total as f64
}

#[inline]
fn is_inherited(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }
    let mut buf = [0u8; 4];
    INHERITED.is_match(c.encode_utf8(&mut buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_counts_only_letters() {
        let s = line_script_share("Hello, мир!", &[Script::Latin], &[]);
        assert!((s - 5.0 / 8.0).abs() < 1e-9);
        assert_eq!(line_script_share("12 34", &[Script::Latin], &[]), 0.0);
        assert_eq!(line_script_share("abc", &[], &[]), 1.0);
    }

    #[test]
    fn japanese_mixes_three_scripts() {
        let ja = [Script::Han, Script::Hiragana, Script::Katakana];
        assert_eq!(line_script_share("日本語のテキスト", &ja, &[]), 1.0);
    }

    #[test]
    fn neutral_marks_are_ignored() {
        // ـ is a letter-like tatweel but neutral for Arabic-script languages.
        assert!(is_neutral('\u{0640}', &[Script::Arabic], &[]));
        assert!(!is_neutral('\u{0640}', &[Script::Latin], &[]));
        assert!(is_neutral('\u{05BE}', &[Script::Hebrew], HEBREW_NEUTRAL));
    }

    #[test]
    fn script_membership() {
        assert!(Script::Cyrillic.contains('ж'));
        assert!(!Script::Cyrillic.contains('z'));
        assert!(Script::Latin.contains('ß'));
        assert!(Script::CanadianAboriginal.contains('ᐃ'));
    }
}
