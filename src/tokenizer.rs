//! Script-aware word tokenizer.
//!
//! Three segmenters share one token model:
//!
//! * **joined** (default): maximal runs of letters, marks, digits and format
//!   controls, glued across a single apostrophe or quote and across joiner
//!   runs (`-`, `.`, `:`, `·`, …) that are followed by another word character;
//! * **Chinese**: `jieba-rs` with HMM;
//! * **Japanese**: longest-prefix match against the Japanese dictionary trie.
//!
//! Whitespace always separates tokens; no-break, narrow no-break and thin
//! spaces do not. URLs, e-mail addresses, hashtags, mentions, paths and emoji
//! sequences come out as single tokens.
pub mod japanese;
pub mod patterns;

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::lang::base_code;
use crate::profile::{ProfileError, preset};
use crate::unicode::{
    is_apostrophe, is_core, is_emoji_glue, is_joiner, is_marks_only, is_mark_like, is_other,
    is_pictographic, is_punctuation, is_punctuation_only, is_quote, is_separator_space,
};
use jieba_rs::Jieba;
use patterns::{EMAIL, EMOJI_SEQUENCE, HASH, NUMBER, PATH, TIME, URL};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("language `{0}` needs its dictionary for segmentation")]
    DictionaryRequired(String),
    #[error(transparent)]
    Normalize(#[from] ProfileError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,
    Url,
    Email,
    Hashtag,
    Mention,
    Path,
    Number,
    Time,
    Emoji,
    Punctuation,
    Marks,
    Symbol,
}

impl TokenKind {
    /// URL, e-mail, hashtag, mention, path, number, time or emoji.
    pub fn is_special(self) -> bool {
        !matches!(
            self,
            TokenKind::Word | TokenKind::Punctuation | TokenKind::Marks | TokenKind::Symbol
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    /// Byte offset in the tokenized text.
    pub start: usize,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segmenter {
    Joined,
    Chinese,
    Japanese,
}

impl Segmenter {
    pub fn for_lang(lang: &str) -> Self {
        match base_code(lang).to_ascii_lowercase().as_str() {
            "zh" => Segmenter::Chinese,
            "ja" => Segmenter::Japanese,
            _ => Segmenter::Joined,
        }
    }
}

pub(crate) enum Step {
    Skip(usize),
    Emit(TokenKind, usize),
}

/// Stateless apart from the lazily built Chinese segmenter.
#[derive(Default)]
pub struct Tokenizer {
    jieba: OnceLock<Jieba>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("jieba_loaded", &self.jieba.get().is_some())
            .finish()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn jieba(&self) -> &Jieba {
        self.jieba.get_or_init(Jieba::new)
    }

    /// Tokenize `text`, which should already have gone through
    /// [`preset::tokenizer_input`]. Japanese requires `dict`.
    pub fn tokenize<'t, 'a>(
        &'a self,
        text: &'t str,
        lang: &str,
        dict: Option<&'a Dictionary>,
    ) -> Result<Tokens<'t, 'a>, TokenizeError> {
        let mode = match Segmenter::for_lang(lang) {
            Segmenter::Joined => Mode::Joined,
            Segmenter::Chinese => Mode::Segmented(self.jieba().cut(text, true).into_iter()),
            Segmenter::Japanese => {
                Mode::Japanese(dict.ok_or_else(|| TokenizeError::DictionaryRequired("ja".into()))?)
            }
        };
        Ok(Tokens { text, pos: 0, mode })
    }

    /// Normalize, tokenize and collect the token strings.
    pub fn words(
        &self,
        text: &str,
        lang: &str,
        dict: Option<&Dictionary>,
    ) -> Result<Vec<String>, TokenizeError> {
        let prepared = preset::tokenizer_input().apply(text, &Context::default())?;
        Ok(self
            .tokenize(&prepared, lang, dict)?
            .map(|t| t.text.to_owned())
            .collect())
    }
}

enum Mode<'t, 'a> {
    Joined,
    Japanese(&'a Dictionary),
    Segmented(std::vec::IntoIter<&'t str>),
}

/// Lazy token stream over one input.
pub struct Tokens<'t, 'a> {
    text: &'t str,
    pos: usize,
    mode: Mode<'t, 'a>,
}

impl<'t> Iterator for Tokens<'t, '_> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Token<'t>> {
        if let Mode::Segmented(words) = &mut self.mode {
            let base = self.text.as_ptr() as usize;
            return words.find(|w| !w.chars().all(char::is_whitespace)).map(|w| Token {
                text: w,
                start: w.as_ptr() as usize - base,
                kind: classify_segment(w),
            });
        }
        loop {
            let rest = &self.text[self.pos..];
            let step = match self.mode {
                Mode::Japanese(dict) => japanese::step(rest, dict)?,
                _ => joined_step(rest)?,
            };
            let start = self.pos;
            match step {
                Step::Skip(n) => self.pos += n,
                Step::Emit(kind, n) => {
                    self.pos += n;
                    return Some(Token {
                        text: &self.text[start..self.pos],
                        start,
                        kind,
                    });
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scanning
// ────────────────────────────────────────────────────────────────────────────

fn joined_step(rest: &str) -> Option<Step> {
    let ch = rest.chars().next()?;
    if is_separator_space(ch) {
        return Some(Step::Skip(ch.len_utf8()));
    }
    if let Some(len) = EMOJI_SEQUENCE.prefix_len(rest) {
        return Some(Step::Emit(TokenKind::Emoji, len));
    }
    if let Some(special) = special_at(rest) {
        return Some(special);
    }
    if is_emoji_glue(ch) {
        return Some(Step::Skip(ch.len_utf8()));
    }
    if is_core(ch) {
        let len = core_run_len(rest);
        return Some(Step::Emit(classify_run(&rest[..len]), len));
    }
    Some(single_char(ch))
}

pub(crate) fn special_at(rest: &str) -> Option<Step> {
    if let Some(len) = URL.prefix_len(rest) {
        return Some(Step::Emit(TokenKind::Url, len));
    }
    if let Some(len) = EMAIL.prefix_len(rest) {
        return Some(Step::Emit(TokenKind::Email, len));
    }
    if let Some(len) = HASH.prefix_len(rest) {
        let kind = if rest.starts_with('#') {
            TokenKind::Hashtag
        } else {
            TokenKind::Mention
        };
        return Some(Step::Emit(kind, len));
    }
    PATH.prefix_len(rest).map(|len| Step::Emit(TokenKind::Path, len))
}

/// A lone visible character; control and other `C*` characters are dropped.
pub(crate) fn single_char(ch: char) -> Step {
    if is_other(ch) {
        return Step::Skip(ch.len_utf8());
    }
    let kind = if is_pictographic(ch) {
        TokenKind::Emoji
    } else if is_punctuation(ch) {
        TokenKind::Punctuation
    } else if is_mark_like(ch) {
        TokenKind::Marks
    } else {
        TokenKind::Symbol
    };
    Step::Emit(kind, ch.len_utf8())
}

#[inline]
fn char_at(s: &str, i: usize) -> Option<char> {
    s.get(i..)?.chars().next()
}

/// End of a run of `pred` characters starting at byte `i`, and its length in chars.
#[inline]
fn run_end(s: &str, i: usize, pred: fn(char) -> bool) -> (usize, usize) {
    let mut end = i;
    let mut count = 0;
    while let Some(c) = char_at(s, end).filter(|&c| pred(c)) {
        end += c.len_utf8();
        count += 1;
    }
    (end, count)
}

/// Byte length of the word run at the start of `s` (first char is core).
fn core_run_len(s: &str) -> usize {
    let mut j = char_at(s, 0).map_or(0, char::len_utf8);
    while let Some(c) = char_at(s, j) {
        if is_core(c) {
            j += c.len_utf8();
            continue;
        }
        let glue: fn(char) -> bool = if is_apostrophe(c) {
            is_apostrophe
        } else if is_quote(c) {
            is_quote
        } else if is_joiner(c) {
            is_joiner
        } else {
            break;
        };
        let (k, count) = run_end(s, j, glue);
        // Doubled apostrophes or quotes end the word; joiner runs of any
        // length may glue.
        if count >= 2 && glue != is_joiner as fn(char) -> bool {
            break;
        }
        match char_at(s, k) {
            Some(next) if is_core(next) => j = k + next.len_utf8(),
            _ => break,
        }
    }
    j
}

fn classify_run(run: &str) -> TokenKind {
    if NUMBER.is_full(run) {
        TokenKind::Number
    } else if TIME.is_full(run) {
        TokenKind::Time
    } else if is_marks_only(run) {
        TokenKind::Marks
    } else {
        TokenKind::Word
    }
}

fn classify_segment(seg: &str) -> TokenKind {
    if URL.is_full(seg) {
        TokenKind::Url
    } else if EMAIL.is_full(seg) {
        TokenKind::Email
    } else if HASH.is_full(seg) {
        if seg.starts_with('#') {
            TokenKind::Hashtag
        } else {
            TokenKind::Mention
        }
    } else if PATH.is_full(seg) {
        TokenKind::Path
    } else if EMOJI_SEQUENCE.is_full(seg) {
        TokenKind::Emoji
    } else if seg.chars().any(is_core) {
        classify_run(seg)
    } else if is_punctuation_only(seg) {
        TokenKind::Punctuation
    } else {
        TokenKind::Symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str, lang: &str) -> Vec<String> {
        Tokenizer::new().words(text, lang, None).unwrap()
    }

    fn kinds(text: &str) -> Vec<(&str, TokenKind)> {
        Tokenizer::new()
            .tokenize(text, "en", None)
            .unwrap()
            .map(|t| (t.text, t.kind))
            .collect()
    }

    #[test]
    fn apostrophes_and_quotes_glue_once() {
        assert_eq!(words("It's l'homme", "en"), ["It's", "l'homme"]);
        assert_eq!(words("rock''n", "en"), ["rock", "'", "'", "n"]);
        assert_eq!(words("dogs' day", "en"), ["dogs", "'", "day"]);
        assert_eq!(words("a\"b", "en"), ["a\"b"]);
        assert_eq!(words("“quoted”", "en"), ["“", "quoted", "”"]);
    }

    #[test]
    fn joiners_need_a_following_word_char() {
        assert_eq!(words("well-known e.g. end-", "en"), ["well-known", "e.g", ".", "end", "-"]);
        assert_eq!(words("col·lecció", "ca"), ["col·lecció"]);
        assert_eq!(words("a--b", "en"), ["a--b"]);
        assert_eq!(words("12:30", "en"), ["12:30"]);
    }

    #[test]
    fn soft_hyphen_and_typographic_apostrophe() {
        assert_eq!(words("co\u{00AD}operate don’t", "en"), ["cooperate", "don't"]);
    }

    #[test]
    fn specials_are_atomic() {
        let toks = kinds("see https://x.org/a?b=1 or mail test@example.com #tag @bob /usr/bin");
        assert!(toks.contains(&("https://x.org/a?b=1", TokenKind::Url)));
        assert!(toks.contains(&("test@example.com", TokenKind::Email)));
        assert!(toks.contains(&("#tag", TokenKind::Hashtag)));
        assert!(toks.contains(&("@bob", TokenKind::Mention)));
        assert!(toks.contains(&("/usr/bin", TokenKind::Path)));
    }

    #[test]
    fn numbers_times_and_punctuation() {
        // Commas do not glue; whole-block number checks happen before tokenizing.
        let toks = kinds("1,234 3.14159 07:30 !");
        assert_eq!(
            toks,
            [
                ("1", TokenKind::Number),
                (",", TokenKind::Punctuation),
                ("234", TokenKind::Number),
                ("3.14159", TokenKind::Number),
                ("07:30", TokenKind::Time),
                ("!", TokenKind::Punctuation),
            ]
        );
    }

    #[test]
    fn emoji_sequences_and_glue() {
        let family = "👨\u{200D}👩\u{200D}👧";
        let text = format!("hi {family} \u{FE0F}");
        let toks = kinds(&text);
        assert_eq!(toks, [("hi", TokenKind::Word), (family, TokenKind::Emoji)]);
    }

    #[test]
    fn no_break_space_stays_inside_numbers() {
        assert_eq!(words("1\u{202F}000 x", "fr"), ["1", "\u{202F}", "000", "x"]);
        let toks = kinds("10\u{00A0}000");
        assert_eq!(toks[0].0, "10");
    }

    #[test]
    fn offsets_point_into_input() {
        let text = "ab  cd";
        let toks: Vec<_> = Tokenizer::new().tokenize(text, "en", None).unwrap().collect();
        assert_eq!(toks[1].start, 4);
        assert_eq!(&text[toks[1].start..][..2], "cd");
    }

    #[test]
    fn japanese_requires_dictionary() {
        let tokenizer = Tokenizer::new();
        let res = tokenizer.tokenize("日本", "ja_JP", None);
        assert!(matches!(res, Err(TokenizeError::DictionaryRequired(ref l)) if l == "ja"));
    }

    #[test]
    fn japanese_longest_prefix_then_run() {
        let dict = Dictionary::from_words("ja", ["東京", "東京都", "に", "住む"]).unwrap();
        let t = Tokenizer::new();
        let out = t.words("東京都に住む。ｶﾀｶﾅ ＡＢＣ abc 大阪府", "ja", Some(&dict)).unwrap();
        assert_eq!(
            out,
            ["東京都", "に", "住む", "。", "ｶﾀｶﾅ", "ＡＢＣ", "abc", "大阪府"]
        );
    }

    #[test]
    fn chinese_segments_without_whitespace_tokens() {
        let t = Tokenizer::new();
        let toks: Vec<_> = t.tokenize("我们 在 学习", "zh_CN", None).unwrap().collect();
        assert!(!toks.is_empty());
        assert!(toks.iter().all(|tok| !tok.text.trim().is_empty()));
        let joined: String = toks.iter().map(|tok| tok.text).collect();
        assert_eq!(joined, "我们在学习");
    }

    #[test]
    fn segmenter_selection() {
        assert_eq!(Segmenter::for_lang("ZH_tw"), Segmenter::Chinese);
        assert_eq!(Segmenter::for_lang("ja-JP"), Segmenter::Japanese);
        assert_eq!(Segmenter::for_lang("en"), Segmenter::Joined);
    }
}
