use crate::{
    context::Context,
    stage::{Stage, StageError},
};
#[cfg(test)]
use crate::{
    lang::{ALL_LANGS, Lang},
    testing::stage_contract::StageTestConfig,
};
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// Trailing `/…|` morphology annotation left over from word-list sources.
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^/[^|]+\||/[^|]+\|)$").unwrap());

/// Strip a trailing `/flags|` annotation from a dictionary entry or query.
#[derive(Debug, Default, Clone, Copy)]
pub struct StripAnnotation;

impl Stage for StripAnnotation {
    fn name(&self) -> &'static str {
        "strip_annotation"
    }

    #[inline]
    fn needs_apply(&self, text: &str, _ctx: &Context) -> Result<bool, StageError> {
        if !text.ends_with('|') {
            return Ok(false);
        }
        Ok(ANNOTATION.is_match(text))
    }

    fn apply<'a>(&self, text: Cow<'a, str>, _ctx: &Context) -> Result<Cow<'a, str>, StageError> {
        match ANNOTATION.find(&text) {
            Some(m) => Ok(Cow::Owned(text[..m.start()].to_owned())),
            None => Ok(text),
        }
    }
}

#[cfg(test)]
impl StageTestConfig for StripAnnotation {
    fn one_to_one_languages() -> &'static [Lang] {
        ALL_LANGS
    }

    fn samples(_lang: Lang) -> &'static [&'static str] {
        &["word/NS|", "/abc|", "a|b", "plain", ""]
    }

    fn should_transform(_lang: Lang) -> &'static [(&'static str, &'static str)] {
        &[("casa/FS|", "casa"), ("/x|", "")]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_stage_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_stage_contract!(StripAnnotation);
    }
}
