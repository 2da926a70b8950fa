// src/context.rs
// Language configuration handed to every normalization stage.
// Tiny, Copy, and contains only 'static data.

use crate::lang::{Lang, LangEntry, base_code, data::LANG_TABLE, from_code};

/// Runtime context passed to every normalization stage.
///
/// Contains:
/// - `lang`: the language the text is normalized for, if any
/// - `lang_entry`: the static rules of that language; unknown or absent
///   languages get [`LangEntry::UNSCRIPTED`]
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub lang: Option<Lang>,
    pub lang_entry: LangEntry,
}

impl Default for Context {
    #[inline(always)]
    fn default() -> Self {
        Self {
            lang: None,
            lang_entry: LangEntry::UNSCRIPTED,
        }
    }
}

impl Context {
    /// Create a context using the canonical static data for a language.
    #[inline(always)]
    pub fn new(lang: Lang) -> Self {
        let lang_entry = LANG_TABLE
            .get(lang.code())
            .copied()
            .unwrap_or(LangEntry::UNSCRIPTED);
        Self {
            lang: Some(lang),
            lang_entry,
        }
    }

    /// Context for a free-form code such as `pt_BR` or `gu_IN`. The base code
    /// decides the language rules; codes outside the registry yield the
    /// language-neutral default.
    pub fn for_code(code: &str) -> Self {
        from_code(code)
            .or_else(|| from_code(base_code(code)))
            .map_or_else(Self::default, Self::new)
    }

    /// Create a context and allow the caller to mutate any field before use.
    #[inline(always)]
    pub fn with_modified(lang: Lang, f: impl FnOnce(&mut LangEntry)) -> Self {
        let mut ctx = Self::new(lang);
        f(&mut ctx.lang_entry);
        ctx
    }

    #[inline(always)]
    pub fn code(&self) -> Option<&'static str> {
        self.lang.map(|l| l.code())
    }

    /// ZWNJ is meaningful in this language and must survive normalization.
    #[inline(always)]
    pub fn keep_zwnj(&self) -> bool {
        self.lang_entry.keep_zwnj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::data::{FA, PT};

    #[test]
    fn for_code_falls_back_to_base() {
        let ctx = Context::for_code("pt_BR");
        assert_eq!(ctx.lang, Some(PT));
        let ctx = Context::for_code("FA");
        assert_eq!(ctx.lang, Some(FA));
        assert!(ctx.keep_zwnj());
    }

    #[test]
    fn unknown_code_is_neutral() {
        let ctx = Context::for_code("zz_ZZ");
        assert!(ctx.lang.is_none());
        assert!(!ctx.keep_zwnj());
        assert!(ctx.lang_entry.scripts.is_empty());
    }

    #[test]
    fn with_modified_overrides_entry() {
        let ctx = Context::with_modified(PT, |e| e.keep_zwnj = true);
        assert!(ctx.keep_zwnj());
        assert_eq!(ctx.code(), Some("pt"));
    }
}
