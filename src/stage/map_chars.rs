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

/// One-to-one character replacement from a static table.
///
/// Targets never appear as sources, so the mapping is idempotent.
#[derive(Debug, Clone, Copy)]
pub struct MapChars {
    pub name: &'static str,
    pub table: &'static [(char, char)],
}

/// Typographic apostrophes to ASCII `'`.
pub const CANON_APOSTROPHES: MapChars = MapChars {
    name: "canon_apostrophes",
    table: &[('\u{2019}', '\''), ('\u{02BC}', '\'')],
};

/// Apostrophe-like marks and the backtick to ASCII `'`, for detection input.
pub const DETECT_QUOTES: MapChars = MapChars {
    name: "detect_quotes",
    table: &[
        ('\u{2019}', '\''),
        ('\u{201B}', '\''),
        ('\u{02BB}', '\''),
        ('`', '\''),
        ('\u{02BC}', '\''),
    ],
};

/// Hyphen and dash variants to ASCII `-`. The middle dot is left alone.
pub const CANON_DASHES: MapChars = MapChars {
    name: "canon_dashes",
    table: &[
        ('\u{2010}', '-'),
        ('\u{2011}', '-'),
        ('\u{2012}', '-'),
        ('\u{2013}', '-'),
        ('\u{2014}', '-'),
        ('\u{2212}', '-'),
    ],
};

impl MapChars {
    #[inline(always)]
    fn lookup(&self, c: char) -> Option<char> {
        self.table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
    }
}

impl Stage for MapChars {
    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn needs_apply(&self, text: &str, _ctx: &Context) -> Result<bool, StageError> {
        let ascii_sources = self.table.iter().any(|(from, _)| from.is_ascii());
        if !ascii_sources && text.is_ascii() {
            return Ok(false);
        }
        Ok(text.chars().any(|c| self.lookup(c).is_some()))
    }

    fn apply<'a>(&self, text: Cow<'a, str>, _ctx: &Context) -> Result<Cow<'a, str>, StageError> {
        let out: String = text
            .chars()
            .map(|c| self.lookup(c).unwrap_or(c))
            .collect();
        Ok(Cow::Owned(out))
    }
}

#[cfg(test)]
impl StageTestConfig for MapChars {
    fn one_to_one_languages() -> &'static [Lang] {
        ALL_LANGS
    }

    fn samples(_lang: Lang) -> &'static [&'static str] {
        &["it’s", "l`arbre", "ʻokina", "well‐known – yes", "a·b", "plain", ""]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_stage_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_stage_contract!(CANON_APOSTROPHES);
        assert_stage_contract!(DETECT_QUOTES);
        assert_stage_contract!(CANON_DASHES);
    }
}
