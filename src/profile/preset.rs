use crate::{
    process::Process,
    profile::Profile,
    stage::{
        CANON_APOSTROPHES, CANON_DASHES, DETECT_QUOTES, FoldCase, NFC, NFKC, NormalizeWhitespace,
        STRIP_SOFT_HYPHEN, STRIP_ZWSP, STRIP_ZWSP_WJ, StripAnnotation,
        joiners::{COLLAPSE_JOINERS, COLLAPSE_OR_DROP_JOINERS, DROP_JOINERS},
    },
};

/// Input to language detection: canonical quotes, compatibility-folded,
/// zero-width noise removed, single-spaced, case-folded.
/// ZWNJ survives only for languages whose context keeps it.
pub fn detection() -> Profile<impl Process> {
    Profile::builder("detection")
        .add_stage(DETECT_QUOTES)
        .add_stage(NFKC)
        .add_stage(COLLAPSE_OR_DROP_JOINERS)
        .add_stage(STRIP_ZWSP_WJ)
        .add_stage(NormalizeWhitespace)
        .add_stage(FoldCase)
        .build()
}

/// Key under which a word is stored in, and looked up from, a spelling
/// dictionary. The middle dot and the word joiner are left untouched.
pub fn dictionary_key() -> Profile<impl Process> {
    Profile::builder("dictionary_key")
        .add_stage(NFKC)
        .add_stage(StripAnnotation)
        .add_stage(COLLAPSE_JOINERS)
        .add_stage(CANON_APOSTROPHES)
        .add_stage(STRIP_ZWSP)
        .add_stage(FoldCase)
        .build()
}

/// Dictionary key with every ZWJ/ZWNJ removed, for tolerant lookups.
pub fn lookup_key() -> Profile<impl Process> {
    Profile::builder("lookup_key")
        .add_stage(NFKC)
        .add_stage(StripAnnotation)
        .add_stage(COLLAPSE_JOINERS)
        .add_stage(CANON_APOSTROPHES)
        .add_stage(STRIP_ZWSP)
        .add_stage(FoldCase)
        .add_stage(DROP_JOINERS)
        .build()
}

/// Light canonicalization of a surface form before lookup.
pub fn surface() -> Profile<impl Process> {
    Profile::builder("surface")
        .add_stage(NFC)
        .add_stage(CANON_DASHES)
        .add_stage(CANON_APOSTROPHES)
        .build()
}

/// Applied once before tokenizing.
pub fn tokenizer_input() -> Profile<impl Process> {
    Profile::builder("tokenizer_input")
        .add_stage(STRIP_SOFT_HYPHEN)
        .add_stage(CANON_APOSTROPHES)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::lang::data::{EN, FA};

    #[test]
    fn detection_profile() {
        let ctx = Context::new(EN);
        let out = detection().apply("  Ｈｅｌｌｏ   WORLD’s\u{200B} ", &ctx).unwrap();
        assert_eq!(out, "hello world's");
        let fa = Context::new(FA);
        let out = detection().apply("می\u{200D}خواهم", &fa).unwrap();
        assert_eq!(out, "می\u{200C}خواهم");
        let out = detection().apply("می\u{200D}خواهم", &ctx).unwrap();
        assert_eq!(out, "میخواهم");
    }

    #[test]
    fn dictionary_and_lookup_keys() {
        let ctx = Context::default();
        assert_eq!(dictionary_key().apply("Casa/FS|", &ctx).unwrap(), "casa");
        assert_eq!(dictionary_key().apply("It’s", &ctx).unwrap(), "it's");
        assert_eq!(
            dictionary_key().apply("a\u{200D}\u{200D}b", &ctx).unwrap(),
            "a\u{200C}b"
        );
        assert_eq!(lookup_key().apply("a\u{200D}b", &ctx).unwrap(), "ab");
        assert_eq!(dictionary_key().apply("l·l", &ctx).unwrap(), "l·l");
    }

    #[test]
    fn clean_input_stays_borrowed() {
        let ctx = Context::default();
        let s = "already clean";
        let out = dictionary_key().apply(s, &ctx).unwrap();
        assert!(matches!(out, std::borrow::Cow::Borrowed(_)));
        let out = tokenizer_input().apply(s, &ctx).unwrap();
        assert!(matches!(out, std::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn surface_and_tokenizer_input() {
        let ctx = Context::default();
        assert_eq!(surface().apply("e\u{0301}—x’", &ctx).unwrap(), "é-x'");
        assert_eq!(tokenizer_input().apply("co\u{00AD}op’s", &ctx).unwrap(), "coop's");
    }
}
