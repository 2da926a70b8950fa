use crate::{
    context::Context,
    stage::{Stage, StageError},
};
#[cfg(test)]
use crate::{
    lang::{ALL_LANGS, Lang},
    testing::stage_contract::StageTestConfig,
};
use std::borrow::Cow;

/// Full Unicode case folding for caseless matching.
///
/// Lowercasing alone is not enough: `ß` must match `ss` and final sigma must
/// match medial sigma. Folding is language-independent; dictionary keys are
/// built with the same rules, so Turkish dotted/dotless `i` follow the default
/// mapping here.
#[derive(Debug, Default, Clone, Copy)]
pub struct FoldCase;

/// Characters whose fold differs from `char::to_lowercase`.
const SPECIAL_FOLDS: &[(char, &str)] = &[
    ('ß', "ss"),
    ('ẞ', "ss"),
    ('ς', "σ"),
    ('ŉ', "ʼn"),
    ('ſ', "s"),
    ('µ', "μ"),
    ('ϐ', "β"),
    ('ϑ', "θ"),
    ('ϕ', "φ"),
    ('ϖ', "π"),
    ('ϰ', "κ"),
    ('ϱ', "ρ"),
    ('ϵ', "ε"),
    ('ẛ', "ṡ"),
    ('\u{1FBE}', "ι"),
    ('ﬀ', "ff"),
    ('ﬁ', "fi"),
    ('ﬂ', "fl"),
    ('ﬃ', "ffi"),
    ('ﬄ', "ffl"),
    ('ﬅ', "st"),
    ('ﬆ', "st"),
];

#[inline]
fn special_fold(c: char) -> Option<&'static str> {
    SPECIAL_FOLDS.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
}

/// Cherokee folds to uppercase: the lowercase letters were encoded later.
#[inline]
fn cherokee_fold(c: char) -> Option<char> {
    match c {
        '\u{AB70}'..='\u{ABBF}' => char::from_u32(c as u32 - 0xAB70 + 0x13A0),
        '\u{13F8}'..='\u{13FD}' => char::from_u32(c as u32 - 8),
        '\u{13A0}'..='\u{13F5}' => Some(c),
        _ => None,
    }
}

#[inline]
fn folds(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_uppercase();
    }
    if let Some(f) = cherokee_fold(c) {
        return f != c;
    }
    if special_fold(c).is_some() {
        return true;
    }
    let mut lower = c.to_lowercase();
    !(lower.next() == Some(c) && lower.next().is_none())
}

fn push_folded(out: &mut String, c: char) {
    if let Some(f) = cherokee_fold(c) {
        out.push(f);
    } else if let Some(s) = special_fold(c) {
        out.push_str(s);
    } else {
        for l in c.to_lowercase() {
            // Lowercasing may surface a final sigma or sharp s (e.g. from ẞ).
            match special_fold(l) {
                Some(s) => out.push_str(s),
                None => out.push(l),
            }
        }
    }
}

impl Stage for FoldCase {
    fn name(&self) -> &'static str {
        "fold_case"
    }

    #[inline]
    fn needs_apply(&self, text: &str, _ctx: &Context) -> Result<bool, StageError> {
        if text.is_ascii() {
            return Ok(text.bytes().any(|b| b.is_ascii_uppercase()));
        }
        Ok(text.chars().any(folds))
    }

    fn apply<'a>(&self, text: Cow<'a, str>, _ctx: &Context) -> Result<Cow<'a, str>, StageError> {
        if text.is_ascii() {
            return Ok(Cow::Owned(text.to_ascii_lowercase()));
        }
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            push_folded(&mut out, c);
        }
        Ok(Cow::Owned(out))
    }
}

#[cfg(test)]
impl StageTestConfig for FoldCase {
    fn one_to_one_languages() -> &'static [Lang] {
        ALL_LANGS
    }

    fn samples(_lang: Lang) -> &'static [&'static str] {
        &["Hello WORLD", "Straße", "ΣΟΦΟΣ", "İstanbul", "ᏣᎳᎩ ꮳꮃꭹ", "ǅ", ""]
    }

    fn should_transform(_lang: Lang) -> &'static [(&'static str, &'static str)] {
        &[
            ("HELLO", "hello"),
            ("Straße", "strasse"),
            ("ΟΔΟΣ", "οδοσ"),
            ("ꮳꮃꭹ", "ᏣᎳᎩ"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_stage_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_stage_contract!(FoldCase);
    }
}
