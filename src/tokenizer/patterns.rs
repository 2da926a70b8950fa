//! Special-token patterns shared by the tokenizer and the correctness analyzer.
//!
//! Each [`Pattern`] is compiled twice: anchored at the start of a haystack for
//! scanning (`&text[pos..]`), and anchored at both ends for whole-token tests.

use regex::Regex;
use std::sync::LazyLock;

pub struct Pattern {
    prefix: Regex,
    full: Regex,
}

impl Pattern {
    fn new(body: &str) -> Self {
        Pattern {
            prefix: Regex::new(&format!("^(?:{body})")).unwrap(),
            full: Regex::new(&format!("^(?:{body})$")).unwrap(),
        }
    }

    /// Byte length of a non-empty match starting at the beginning of `s`.
    #[inline]
    pub fn prefix_len(&self, s: &str) -> Option<usize> {
        self.prefix.find(s).map(|m| m.end()).filter(|&n| n > 0)
    }

    #[inline]
    pub fn is_full(&self, s: &str) -> bool {
        self.full.is_match(s)
    }
}

const DIGIT_GROUP: &str = r"\p{Nd}+(?:[,.\x{202F}\x{2009}\x{00A0}\x{066B}\x{066C}']\p{Nd}+)*";

/// Grouped numbers with an optional en-dash range: `1,234`, `3.14159`, `10–12`.
pub static NUMBER: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(&format!(r"{DIGIT_GROUP}(?:\x{{2013}}{DIGIT_GROUP})?")));

/// `HH:MM` or `HH:MM:SS`, 24-hour.
pub static TIME: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"(?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d)?"));

pub static URL: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"https?://\S+"));

pub static EMAIL: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(
        r"[\p{L}\p{N}\p{M}\p{Pc}\p{Pd}.'+\p{Cf}]+@[\p{L}\p{N}\p{M}\p{Pc}\p{Pd}.\-]+\.\p{L}{2,}",
    )
});

/// Hashtags and mentions.
pub static HASH: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"[#@][\p{L}\p{N}\p{M}_\p{Pd}]+"));

/// Absolute Unix or drive-letter paths.
pub static PATH: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"(?:[A-Za-z]:)?[/\\]\S+"));

/// Pictographic emoji joined by ZWJ, each optionally followed by VS16.
pub static EMOJI_SEQUENCE: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(
        r"\p{Extended_Pictographic}\x{FE0F}?(?:\x{200D}\p{Extended_Pictographic}\x{FE0F}?)*",
    )
});

pub static ASCII_LETTERS: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"[A-Za-z]+"));

// ────────────────────────────────────────────────────────────────────────────
// Japanese
// ────────────────────────────────────────────────────────────────────────────

/// Maximal run of kanji, kana and iteration marks.
pub static JA_RUN: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"[\p{Han}\p{Hiragana}\p{Katakana}ー々ゝゞ]+"));

pub static HALFWIDTH_KATAKANA: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"[\x{FF66}-\x{FF9F}]+"));

/// Full-width digits and Latin letters.
pub static FULLWIDTH_LATIN: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"[\x{FF10}-\x{FF19}\x{FF21}-\x{FF3A}\x{FF41}-\x{FF5A}]+")
});

// ────────────────────────────────────────────────────────────────────────────
// Machine-generated artifacts never accepted as words
// ────────────────────────────────────────────────────────────────────────────

static BASE64: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"(?:[A-Za-z0-9+/]{4})+(?:==|=)?"));
static HEX_LITERAL: LazyLock<Pattern> = LazyLock::new(|| Pattern::new(r"0x[0-9A-Fa-f]{6,}"));
static UUID: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::new(r"[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}")
});
static FILE_NAME: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"[A-Za-z0-9_+\-]+\.[A-Za-z0-9]{2,6}"));
static DOTTED_IDENT: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::new(r"[A-Za-z0-9]+(?:\.[A-Za-z0-9]+){2,}"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Base64,
    HexLiteral,
    Uuid,
    FileName,
    DottedIdentifier,
}

/// Classify `s` as a machine-generated artifact, if it looks like one.
pub fn artifact(s: &str) -> Option<Artifact> {
    if s.len() >= 12 && BASE64.is_full(s) {
        Some(Artifact::Base64)
    } else if HEX_LITERAL.is_full(s) {
        Some(Artifact::HexLiteral)
    } else if UUID.is_full(s) {
        Some(Artifact::Uuid)
    } else if FILE_NAME.is_full(s) {
        Some(Artifact::FileName)
    } else if DOTTED_IDENT.is_full(s) {
        Some(Artifact::DottedIdentifier)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_times() {
        for ok in ["1,234", "3.14159", "42", "10–12", "1\u{202F}000", "٣٤"] {
            assert!(NUMBER.is_full(ok), "{ok}");
        }
        assert!(!NUMBER.is_full("1,"));
        assert!(!NUMBER.is_full("1-2"));
        assert!(TIME.is_full("23:59"));
        assert!(TIME.is_full("07:05:30"));
        assert!(!TIME.is_full("24:00"));
    }

    #[test]
    fn prefix_matching_is_anchored() {
        assert_eq!(URL.prefix_len("https://a.b/c rest"), Some(13));
        assert_eq!(URL.prefix_len("see https://a.b"), None);
        assert_eq!(EMAIL.prefix_len("test@example.com,"), Some(16));
        assert_eq!(HASH.prefix_len("#rust-lang!"), Some(10));
        assert_eq!(PATH.prefix_len("C:\\tmp\\x y"), Some(8));
        assert_eq!(ASCII_LETTERS.prefix_len("abc1"), Some(3));
    }

    #[test]
    fn emoji_sequences() {
        let family = "👨\u{200D}👩\u{200D}👧";
        assert_eq!(EMOJI_SEQUENCE.prefix_len(family), Some(family.len()));
        assert!(EMOJI_SEQUENCE.is_full("❤\u{FE0F}"));
        assert!(!EMOJI_SEQUENCE.is_full("a"));
    }

    #[test]
    fn japanese_runs() {
        assert_eq!(JA_RUN.prefix_len("東京タワーです。"), Some("東京タワーです".len()));
        assert!(HALFWIDTH_KATAKANA.is_full("ｶﾀｶﾅ"));
        assert!(FULLWIDTH_LATIN.is_full("ＡＢＣ１２３"));
    }

    #[test]
    fn artifacts() {
        assert_eq!(artifact("QUJDREVGR0hJSktM"), Some(Artifact::Base64));
        assert_eq!(artifact("0xDEADBEEF"), Some(Artifact::HexLiteral));
        assert_eq!(
            artifact("123e4567-e89b-12d3-a456-426614174000"),
            Some(Artifact::Uuid)
        );
        assert_eq!(artifact("report.pdf"), Some(Artifact::FileName));
        assert_eq!(artifact("com.example.app"), Some(Artifact::DottedIdentifier));
        assert_eq!(artifact("hello"), None);
        assert_eq!(artifact("abcd"), None);
    }
}
