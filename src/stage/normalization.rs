use crate::{
    context::Context,
    stage::{Stage, StageError},
};
#[cfg(test)]
use crate::{
    lang::{ALL_LANGS, Lang},
    testing::stage_contract::StageTestConfig,
};
use std::{borrow::Cow, sync::LazyLock};

use icu_normalizer::{ComposingNormalizer, ComposingNormalizerBorrowed};

// ── ICU4X ──
static ICU4X_NFC: LazyLock<ComposingNormalizerBorrowed> =
    LazyLock::new(ComposingNormalizer::new_nfc);
static ICU4X_NFKC: LazyLock<ComposingNormalizerBorrowed> =
    LazyLock::new(ComposingNormalizer::new_nfkc);

/// Unicode Normalization Form C (Canonical Composition).
/// Used for surface canonicalization, where compatibility folding would
/// hide the spelling a dictionary lists.
#[derive(Default, Clone, Copy)]
pub struct NfcStage;

/// Unicode Normalization Form KC (Compatibility Composition).
#[derive(Default, Clone, Copy)]
pub struct NfkcStage;

pub const NFC: NfcStage = NfcStage;
pub const NFKC: NfkcStage = NfkcStage;

macro_rules! impl_normalization_stage {
    ($stage:ty, $name:literal, $norm:ident) => {
        impl Stage for $stage {
            fn name(&self) -> &'static str {
                $name
            }

            #[inline(always)]
            fn needs_apply(&self, text: &str, _ctx: &Context) -> Result<bool, StageError> {
                Ok(!$norm.is_normalized(text))
            }

            #[inline(always)]
            fn apply<'a>(
                &self,
                text: Cow<'a, str>,
                _ctx: &Context,
            ) -> Result<Cow<'a, str>, StageError> {
                Ok($norm.normalize(text.as_ref()).into_owned().into())
            }
        }

        #[cfg(test)]
        impl StageTestConfig for $stage {
            fn one_to_one_languages() -> &'static [Lang] {
                ALL_LANGS
            }
            fn samples(_lang: Lang) -> &'static [&'static str] {
                &["café", "naïve", "e\u{0301}", "ﬁle", "①②③", "ｶﾞ", ""]
            }
            fn should_pass_through(_lang: Lang) -> &'static [&'static str] {
                &["hello", "world123", "it's", "日本語", ""]
            }
        }
    };
}

impl_normalization_stage!(NfcStage, "nfc", ICU4X_NFC);
impl_normalization_stage!(NfkcStage, "nfkc", ICU4X_NFKC);

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_stage_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_stage_contract!(NFC);
        assert_stage_contract!(NFKC);
    }
}
