use crate::{
    context::Context,
    stage::{Stage, StageError},
    unicode::{SOFT_HYPHEN, WORD_JOINER, ZWSP},
};
#[cfg(test)]
use crate::{
    lang::{ALL_LANGS, Lang},
    testing::stage_contract::StageTestConfig,
};
use std::borrow::Cow;

/// Remove every occurrence of a fixed set of invisible characters.
#[derive(Debug, Clone, Copy)]
pub struct StripChars {
    pub name: &'static str,
    pub chars: &'static [char],
}

pub const STRIP_SOFT_HYPHEN: StripChars = StripChars {
    name: "strip_soft_hyphen",
    chars: &[SOFT_HYPHEN],
};

pub const STRIP_ZWSP: StripChars = StripChars {
    name: "strip_zwsp",
    chars: &[ZWSP],
};

/// Zero-width space and word joiner. Correctness keeps U+2060 visible
/// because it marks corrupted words; detection drops it.
pub const STRIP_ZWSP_WJ: StripChars = StripChars {
    name: "strip_zwsp_wj",
    chars: &[ZWSP, WORD_JOINER],
};

impl Stage for StripChars {
    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn needs_apply(&self, text: &str, _ctx: &Context) -> Result<bool, StageError> {
        if text.is_ascii() {
            return Ok(false);
        }
        Ok(text.contains(self.chars))
    }

    fn apply<'a>(&self, text: Cow<'a, str>, _ctx: &Context) -> Result<Cow<'a, str>, StageError> {
        Ok(Cow::Owned(text.replace(self.chars, "")))
    }
}

#[cfg(test)]
impl StageTestConfig for StripChars {
    fn one_to_one_languages() -> &'static [Lang] {
        ALL_LANGS
    }

    fn samples(_lang: Lang) -> &'static [&'static str] {
        &["co\u{00AD}operate", "a\u{200B}b", "wo\u{2060}rd", "\u{200B}", "plain", ""]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_listed_chars() {
        let ctx = Context::default();
        let out = STRIP_ZWSP.apply(Cow::Borrowed("a\u{200B}b\u{2060}c"), &ctx).unwrap();
        assert_eq!(out, "ab\u{2060}c");
        let out = STRIP_ZWSP_WJ.apply(Cow::Borrowed("a\u{200B}b\u{2060}c"), &ctx).unwrap();
        assert_eq!(out, "abc");
        let out = STRIP_SOFT_HYPHEN.apply(Cow::Borrowed("co\u{00AD}op"), &ctx).unwrap();
        assert_eq!(out, "coop");
    }
}
