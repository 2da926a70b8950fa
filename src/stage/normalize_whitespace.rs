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

/// Collapse every whitespace run (ASCII and Unicode `White_Space`) into one
/// ASCII space and trim both edges.
///
/// Zero-copy whenever the text already has single-space separators and no
/// edge whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeWhitespace;

impl Stage for NormalizeWhitespace {
    fn name(&self) -> &'static str {
        "normalize_whitespace"
    }

    fn needs_apply(&self, text: &str, _ctx: &Context) -> Result<bool, StageError> {
        let mut chars = text.chars();
        match (chars.next(), text.chars().next_back()) {
            (None, _) => return Ok(false),
            (Some(first), Some(last)) if first.is_whitespace() || last.is_whitespace() => {
                return Ok(true);
            }
            _ => {}
        }
        let mut prev_ws = false;
        for c in text.chars() {
            let ws = c.is_whitespace();
            if ws && (c != ' ' || prev_ws) {
                return Ok(true);
            }
            prev_ws = ws;
        }
        Ok(false)
    }

    fn apply<'a>(&self, text: Cow<'a, str>, _ctx: &Context) -> Result<Cow<'a, str>, StageError> {
        let mut out = String::with_capacity(text.len());
        for word in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        Ok(Cow::Owned(out))
    }
}

#[cfg(test)]
impl StageTestConfig for NormalizeWhitespace {
    fn one_to_one_languages() -> &'static [Lang] {
        ALL_LANGS
    }

    fn samples(_lang: Lang) -> &'static [&'static str] {
        &["  padded  ", "a\t\tb", "x\u{00A0}y", "one two", "\u{3000}", ""]
    }

    fn should_transform(_lang: Lang) -> &'static [(&'static str, &'static str)] {
        &[(" a  b\n", "a b"), ("x\u{202F}y", "x y")]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_stage_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_stage_contract!(NormalizeWhitespace);
    }
}
