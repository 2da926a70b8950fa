use crate::{
    context::Context,
    stage::{Stage, StageError},
    unicode::{ZWJ, ZWNJ},
};
#[cfg(test)]
use crate::{
    lang::{ALL_LANGS, Lang},
    testing::stage_contract::StageTestConfig,
};
use std::borrow::Cow;

/// What happens to runs of ZWJ/ZWNJ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinerPolicy {
    /// Every run becomes one ZWNJ.
    Collapse,
    /// Collapse, then drop the ZWNJ unless the context language keeps it.
    CollapseOrDrop,
    /// Remove every ZWJ and ZWNJ.
    Drop,
}

/// Normalize zero-width joiners and non-joiners.
///
/// Persian-family orthographies use ZWNJ between morphemes, so a detection
/// pipeline keeps one for them and drops the rest.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeJoiners {
    pub policy: JoinerPolicy,
}

pub const COLLAPSE_JOINERS: NormalizeJoiners = NormalizeJoiners {
    policy: JoinerPolicy::Collapse,
};
pub const COLLAPSE_OR_DROP_JOINERS: NormalizeJoiners = NormalizeJoiners {
    policy: JoinerPolicy::CollapseOrDrop,
};
pub const DROP_JOINERS: NormalizeJoiners = NormalizeJoiners {
    policy: JoinerPolicy::Drop,
};

#[inline(always)]
fn is_zw(c: char) -> bool {
    c == ZWJ || c == ZWNJ
}

impl NormalizeJoiners {
    #[inline]
    fn keeps_zwnj(&self, ctx: &Context) -> bool {
        match self.policy {
            JoinerPolicy::Collapse => true,
            JoinerPolicy::CollapseOrDrop => ctx.keep_zwnj(),
            JoinerPolicy::Drop => false,
        }
    }
}

impl Stage for NormalizeJoiners {
    fn name(&self) -> &'static str {
        "normalize_joiners"
    }

    fn needs_apply(&self, text: &str, ctx: &Context) -> Result<bool, StageError> {
        if text.is_ascii() {
            return Ok(false);
        }
        if !self.keeps_zwnj(ctx) {
            return Ok(text.contains(is_zw));
        }
        // Kept: only a ZWJ or a run longer than one changes the text.
        let mut prev_zw = false;
        for c in text.chars() {
            if c == ZWJ || (c == ZWNJ && prev_zw) {
                return Ok(true);
            }
            prev_zw = c == ZWNJ;
        }
        Ok(false)
    }

    fn apply<'a>(&self, text: Cow<'a, str>, ctx: &Context) -> Result<Cow<'a, str>, StageError> {
        let keep = self.keeps_zwnj(ctx);
        let mut out = String::with_capacity(text.len());
        let mut in_run = false;
        for c in text.chars() {
            if is_zw(c) {
                if keep && !in_run {
                    out.push(ZWNJ);
                }
                in_run = true;
            } else {
                out.push(c);
                in_run = false;
            }
        }
        Ok(Cow::Owned(out))
    }
}

#[cfg(test)]
impl StageTestConfig for NormalizeJoiners {
    fn one_to_one_languages() -> &'static [Lang] {
        ALL_LANGS
    }

    fn samples(_lang: Lang) -> &'static [&'static str] {
        &[
            "می\u{200C}خواهم",
            "a\u{200D}\u{200C}b",
            "x\u{200C}\u{200C}\u{200C}y",
            "\u{200D}",
            "plain",
            "",
        ]
    }
}
