//! Dictionary-backed spelling check.
//!
//! Input is split on whitespace into blocks. Each block is accepted if it is
//! a special (URL, e-mail, path, number, time, hashtag, mention, emoji), or if
//! the whole block is a dictionary word. Otherwise it is tokenized and every
//! token is checked on its own; the failing tokens are reported with their
//! original casing.

use crate::context::Context;
use crate::dictionary::{Dictionary, DictionaryError, DictionaryStore};
use crate::profile::{ProfileError, preset};
use crate::tokenizer::patterns::{self, EMAIL, EMOJI_SEQUENCE, NUMBER, PATH, TIME, URL};
use crate::tokenizer::{Segmenter, TokenizeError, Tokenizer};
use crate::unicode::{
    has_word_joiner, has_zero_width_joiner, is_apostrophe, is_core, is_emoji_glue_only,
    is_marks_only, is_pictographic, is_punctuation_only,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectnessReport {
    pub errors_count: usize,
    pub errors: Vec<String>,
}

impl CorrectnessReport {
    pub fn new(errors: Vec<String>) -> Self {
        Self {
            errors_count: errors.len(),
            errors,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors_count == 0
    }
}

/// Strip leading and trailing characters that are not letters, marks,
/// digits or format controls.
#[inline]
pub fn edge_trim(s: &str) -> &str {
    s.trim_matches(|c: char| !is_core(c))
}

#[inline]
fn trimmed_or_self(s: &str) -> &str {
    match edge_trim(s) {
        "" => s,
        t => t,
    }
}

/// Whole blocks that never need a dictionary.
pub fn is_special_block(s: &str) -> bool {
    if has_word_joiner(s) {
        return false;
    }
    s.starts_with(['#', '@'])
        || PATH.is_full(s)
        || URL.is_full(s)
        || EMAIL.is_full(s)
        || NUMBER.is_full(s)
        || TIME.is_full(s)
        || EMOJI_SEQUENCE.is_full(s)
        || is_emoji_glue_only(s)
        || is_marks_only(s)
}

pub struct CorrectnessAnalyzer {
    lang: String,
    ctx: Context,
    dict: Arc<Dictionary>,
    tokenizer: Arc<Tokenizer>,
}

impl std::fmt::Debug for CorrectnessAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectnessAnalyzer")
            .field("lang", &self.lang)
            .field("dict", &self.dict)
            .finish_non_exhaustive()
    }
}

impl CorrectnessAnalyzer {
    /// Analyzer over the store's dictionary for `lang`.
    pub fn load(store: &DictionaryStore, lang: &str) -> Result<Self, DictionaryError> {
        Ok(Self::new(lang, store.load(lang)?))
    }

    pub fn new(lang: &str, dict: Arc<Dictionary>) -> Self {
        Self::with_tokenizer(lang, dict, Arc::new(Tokenizer::new()))
    }

    /// Share one tokenizer (and its Chinese segmenter) between analyzers.
    pub fn with_tokenizer(lang: &str, dict: Arc<Dictionary>, tokenizer: Arc<Tokenizer>) -> Self {
        Self {
            lang: lang.to_owned(),
            ctx: Context::for_code(lang),
            dict,
            tokenizer,
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn run(&self, text: &str) -> Result<CorrectnessReport, TokenizeError> {
        let prepared = preset::tokenizer_input().apply(text, &self.ctx)?;
        let mut errors = Vec::new();
        for block in prepared.split_whitespace() {
            if is_special_block(block) || self.whole_block_in_dict(block)? {
                continue;
            }
            let tokens = self.tokens(block)?;
            if tokens.is_empty() {
                errors.push(trimmed_or_self(block).to_owned());
                continue;
            }
            self.scan_tokens(&tokens, &mut errors)?;
        }
        tracing::trace!(lang = %self.lang, errors = errors.len(), "correctness run");
        Ok(CorrectnessReport::new(errors))
    }

    fn tokens<'t>(&self, block: &'t str) -> Result<Vec<&'t str>, TokenizeError> {
        let dict = (Segmenter::for_lang(&self.lang) == Segmenter::Japanese).then_some(&*self.dict);
        Ok(self
            .tokenizer
            .tokenize(block, &self.lang, dict)?
            .map(|t| t.text)
            .filter(|t| !t.trim().is_empty() && !is_emoji_glue_only(t) && !is_marks_only(t))
            .collect())
    }

    fn scan_tokens(&self, toks: &[&str], errors: &mut Vec<String>) -> Result<(), ProfileError> {
        let mut i = 0;
        while i < toks.len() {
            let tok = toks[i];
            if is_punctuation_only(tok) || is_marks_only(tok) {
                i += 1;
                continue;
            }
            if let Some(&trailer) = toks.get(i + 1)
                && is_trailer(trailer)
                && self.is_token_ok(tok, Some(trailer))?
            {
                i += 2;
                continue;
            }
            if !self.is_token_ok(tok, None)? {
                let base = trimmed_or_self(tok);
                if !is_marks_only(base) {
                    errors.push(base.to_owned());
                }
            }
            i += 1;
        }
        Ok(())
    }

    fn in_dict<'a>(&self, variants: impl IntoIterator<Item = &'a str>) -> Result<bool, ProfileError> {
        let key = preset::dictionary_key();
        for v in variants.into_iter().filter(|v| !v.is_empty()) {
            if self.dict.contains(&key.apply(v, &self.ctx)?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Lookup with every ZWJ/ZWNJ dropped.
    fn in_dict_tolerant<'a>(
        &self,
        variants: impl IntoIterator<Item = &'a str>,
    ) -> Result<bool, ProfileError> {
        let key = preset::lookup_key();
        for v in variants.into_iter().filter(|v| !v.is_empty()) {
            if self.dict.contains(&key.apply(v, &self.ctx)?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn surface_variants<'a>(&self, raw: &'a str, base: &'a str) -> Result<[Cow<'a, str>; 4], ProfileError> {
        let surface = preset::surface();
        Ok([
            Cow::Borrowed(raw),
            Cow::Borrowed(base),
            surface.apply(raw, &self.ctx)?,
            surface.apply(base, &self.ctx)?,
        ])
    }

    fn whole_block_in_dict(&self, block: &str) -> Result<bool, ProfileError> {
        if block.is_empty() || has_word_joiner(block) {
            return Ok(false);
        }
        let variants = self.surface_variants(block, trimmed_or_self(block))?;
        if self.in_dict(variants.iter().map(AsRef::as_ref))? {
            return Ok(true);
        }
        if variants.iter().any(|v| has_zero_width_joiner(v)) {
            return self.in_dict_tolerant(variants.iter().map(AsRef::as_ref));
        }
        Ok(false)
    }

    fn is_token_ok(&self, tok: &str, trailer: Option<&str>) -> Result<bool, ProfileError> {
        let base = edge_trim(tok);
        if base.is_empty() {
            return Ok(true);
        }
        if has_word_joiner(base) {
            return Ok(false);
        }
        if tok.starts_with(['#', '@'])
            || PATH.is_full(tok)
            || PATH.is_full(base)
            || URL.is_full(base)
            || EMAIL.is_full(base)
            || NUMBER.is_full(base)
            || TIME.is_full(base)
            || base.chars().any(is_pictographic)
        {
            return Ok(true);
        }

        let variants = self.surface_variants(tok, base)?;
        if self.in_dict(variants.iter().map(AsRef::as_ref))? {
            return Ok(true);
        }
        // Inflectional trailer: only the exact attached form counts.
        if let Some(trailer) = trailer
            && self.in_dict([format!("{base}{trailer}").as_str()])?
        {
            return Ok(true);
        }
        if (has_zero_width_joiner(tok) || has_zero_width_joiner(base))
            && self.in_dict_tolerant([tok, base])?
        {
            return Ok(true);
        }
        if let Some(kind) = patterns::artifact(base) {
            tracing::trace!(token = base, ?kind, "machine-generated artifact");
        }
        Ok(false)
    }
}

/// A single apostrophe or period directly after a word.
fn is_trailer(tok: &str) -> bool {
    let mut chars = tok.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c == '.' || is_apostrophe(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer(lang: &str, words: &[&str]) -> CorrectnessAnalyzer {
        let keys: Vec<String> = words
            .iter()
            .map(|w| {
                preset::dictionary_key()
                    .apply(w, &Context::default())
                    .unwrap()
                    .into_owned()
            })
            .collect();
        CorrectnessAnalyzer::new(lang, Arc::new(Dictionary::from_words(lang, keys).unwrap()))
    }

    #[test]
    fn clean_sentence_with_specials() {
        let a = analyzer("en", &["hello", "world", "it's", "fine"]);
        let text = "Hello world It's fine 1,234 3.14159 test@example.com";
        assert_eq!(a.run(text).unwrap(), CorrectnessReport::default());

        let report = a.run(&format!("{text} INTENTIONAL_ERROR_ABCxyz")).unwrap();
        assert_eq!(report.errors_count, 1);
        assert_eq!(report.errors, ["INTENTIONAL_ERROR_ABCxyz"]);
    }

    #[test]
    fn empty_input() {
        let a = analyzer("en", &["a"]);
        assert_eq!(a.run("").unwrap(), CorrectnessReport::default());
        assert_eq!(a.run("   \n\t").unwrap(), CorrectnessReport::default());
    }

    #[test]
    fn duplicates_are_preserved_with_original_case() {
        let a = analyzer("en", &["ok"]);
        let r = a.run("Foo ok Foo").unwrap();
        assert_eq!(r.errors, ["Foo", "Foo"]);
    }

    #[test]
    fn punctuation_is_trimmed_from_errors() {
        let a = analyzer("en", &["fine"]);
        let r = a.run("fine, (wrogn).").unwrap();
        assert_eq!(r.errors, ["wrogn"]);
    }

    #[test]
    fn trailer_requires_exact_form() {
        let a = analyzer("en", &["etc."]);
        assert!(a.run("(etc.)").unwrap().is_clean());
        let b = analyzer("en", &["etc"]);
        assert!(b.run("(etc.)").unwrap().is_clean());
        let c = analyzer("en", &["rock"]);
        assert_eq!(c.run("(rocks.)").unwrap().errors, ["rocks"]);
    }

    #[test]
    fn word_joiner_is_corruption() {
        let a = analyzer("en", &["word"]);
        assert_eq!(a.run("wo\u{2060}rd").unwrap().errors, ["wo\u{2060}rd"]);
    }

    #[test]
    fn zero_width_tolerant_lookup() {
        let a = analyzer("fa", &["میخواهم"]);
        assert!(a.run("می\u{200C}خواهم").unwrap().is_clean());
    }

    #[test]
    fn typographic_dashes_and_apostrophes() {
        let a = analyzer("en", &["well-known", "don't"]);
        assert!(a.run("well‐known don’t").unwrap().is_clean());
    }

    #[test]
    fn artifacts_are_errors() {
        let a = analyzer("en", &["see"]);
        let r = a.run("see report.pdf 0xDEADBEEF").unwrap();
        assert_eq!(r.errors, ["report.pdf", "0xDEADBEEF"]);
    }

    #[test]
    fn hashtags_mentions_times_and_paths() {
        let a = analyzer("en", &["at"]);
        assert!(a.run("#rust @bob at 23:59 /etc/hosts C:\\tmp").unwrap().is_clean());
    }

    #[test]
    fn japanese_uses_dictionary_segmentation() {
        let a = analyzer("ja", &["東京", "に", "住む"]);
        assert!(a.run("東京に住む。").unwrap().is_clean());
        assert_eq!(a.run("東京に住むccc").unwrap().errors, ["ccc"]);
    }

    #[test]
    fn report_serializes_flat() {
        let json = serde_json::to_string(&CorrectnessReport::new(vec!["x".into()])).unwrap();
        assert_eq!(json, r#"{"errors_count":1,"errors":["x"]}"#);
    }
}
