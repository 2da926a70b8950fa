//! Additive corrections applied to a candidate's average n-gram quality.
//!
//! Each correction is one [`Adjustment`]. The [`AdjustmentRegistry`] runs
//! them in a fixed order and lets callers drop an adjustment entirely or for
//! a single language.

use super::features::TextFeatures;
use crate::calibration::hints::HintScores;
use crate::lang::{ARABIC_GROUP, IBERIAN, LangEntry, SOUTH_SLAVIC, TIBETAN_PAIR, Tier, in_group};
use crate::model::Model;
use std::collections::{HashMap, HashSet};

/// Everything an adjustment may read about the current call.
#[derive(Debug)]
pub struct ScoreContext<'a> {
    pub model: &'a Model,
    pub features: &'a TextFeatures<'a>,
    pub candidates: &'a [&'a str],
    pub diacritic_hits: HashMap<&'a str, usize>,
    pub signature_letter_hits: HashMap<&'a str, usize>,
    pub signature_bonus: HashMap<String, f64>,
    pub iberian: Option<HintScores>,
    pub south_slavic: Option<HintScores>,
}

impl ScoreContext<'_> {
    #[inline]
    pub fn text(&self) -> &str {
        self.features.text
    }

    /// `short` when the input is short, `long` otherwise.
    #[inline]
    pub fn by_len(&self, short: f64, long: f64) -> f64 {
        if self.features.short { short } else { long }
    }

    pub fn has_candidate(&self, lang: &str) -> bool {
        self.candidates.contains(&lang)
    }
}

pub trait Adjustment: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cheap pre-check. Returning `false` skips [`Adjustment::delta`].
    fn applies(&self, _lang: &str, _cx: &ScoreContext<'_>) -> bool {
        true
    }

    /// Signed change to the average quality; negative favors `lang`.
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64;
}

// ────────────────────────────────────────────────────────────────────────────
// Character evidence
// ────────────────────────────────────────────────────────────────────────────

pub struct UniqueSignature;

impl Adjustment for UniqueSignature {
    fn name(&self) -> &'static str {
        "unique_signature"
    }
    fn applies(&self, lang: &str, _: &ScoreContext<'_>) -> bool {
        !LangEntry::lookup(lang).unique_signature.is_empty()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let hits = LangEntry::lookup(lang).unique_signature_hits(cx.text());
        -cx.by_len(2.6, 1.4) * hits as f64
    }
}

pub struct IberianHints;

impl Adjustment for IberianHints {
    fn name(&self) -> &'static str {
        "iberian_hints"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        cx.iberian.is_some() && in_group(IBERIAN, lang)
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let n = cx.iberian.as_ref().map_or(0, |h| h.get(lang));
        -cx.by_len(0.75, 0.45) * f64::from(n)
    }
}

pub struct SouthSlavicHints;

impl Adjustment for SouthSlavicHints {
    fn name(&self) -> &'static str {
        "south_slavic_hints"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        cx.south_slavic.is_some() && in_group(SOUTH_SLAVIC, lang)
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let n = cx.south_slavic.as_ref().map_or(0, |h| h.get(lang));
        -cx.by_len(0.80, 0.50) * f64::from(n)
    }
}

/// Cyrillic languages whose bigram model covers too little of the text.
pub struct CyrillicCoverage;

impl Adjustment for CyrillicCoverage {
    fn name(&self) -> &'static str {
        "cyrillic_coverage"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        LangEntry::lookup(lang).is_cyrillic() && cx.model.has_order(2)
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let cov2 = super::features::coverage_ratio(cx.model, &cx.features.letter_bigrams, lang, 2);
        let thr = cx.by_len(0.50, 0.62);
        if cov2 < thr {
            cx.by_len(0.8, 1.8) * (thr - cov2) + 0.3
        } else {
            0.0
        }
    }
}

pub struct HardDiacritics;

impl Adjustment for HardDiacritics {
    fn name(&self) -> &'static str {
        "hard_diacritics"
    }
    fn applies(&self, lang: &str, _: &ScoreContext<'_>) -> bool {
        !LangEntry::lookup(lang).hard_diacritics.is_empty()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let hits = LangEntry::lookup(lang).hard_diacritic_hits(cx.text());
        -cx.by_len(2.8, 1.6) * hits as f64
    }
}

/// Characters a language never writes.
pub struct NegativeChars;

impl Adjustment for NegativeChars {
    fn name(&self) -> &'static str {
        "negative_chars"
    }
    fn applies(&self, lang: &str, _: &ScoreContext<'_>) -> bool {
        !LangEntry::lookup(lang).negative_chars.is_empty()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let hits = LangEntry::lookup(lang).negative_hits(cx.text());
        cx.by_len(2.2, 1.3) * hits as f64
    }
}

pub struct DiacriticHits;

impl Adjustment for DiacriticHits {
    fn name(&self) -> &'static str {
        "diacritic_hits"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        cx.diacritic_hits.contains_key(lang)
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let hits = cx.diacritic_hits.get(lang).copied().unwrap_or(0);
        -cx.by_len(0.7, 0.4) * hits as f64
    }
}

pub struct ExclusiveLetters;

impl Adjustment for ExclusiveLetters {
    fn name(&self) -> &'static str {
        "exclusive_letters"
    }
    fn applies(&self, lang: &str, _: &ScoreContext<'_>) -> bool {
        !LangEntry::lookup(lang).exclusive_letters.is_empty()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let hits = LangEntry::lookup(lang).exclusive_hits(cx.text());
        -cx.by_len(2.2, 1.1) * hits as f64
    }
}

/// Arabic-script languages: reward own signature letters, and nudge the
/// others away when someone else's letters appear.
pub struct ArabicSignature;

impl Adjustment for ArabicSignature {
    fn name(&self) -> &'static str {
        "arabic_signature"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        in_group(ARABIC_GROUP, lang) && !cx.signature_letter_hits.is_empty()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let own = cx.signature_letter_hits.get(lang).copied().unwrap_or(0);
        if own > 0 {
            -cx.by_len(0.9, 0.6) * own as f64
        } else if cx.signature_letter_hits.values().any(|&n| n > 0) {
            0.2
        } else {
            0.0
        }
    }
}

pub struct TibetanSignature;

impl Adjustment for TibetanSignature {
    fn name(&self) -> &'static str {
        "tibetan_signature"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        in_group(TIBETAN_PAIR, lang)
            && !cx.signature_bonus.is_empty()
            && TIBETAN_PAIR.iter().all(|l| cx.has_candidate(l))
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let bonus = cx.signature_bonus.get(lang).copied().unwrap_or(0.0);
        -cx.by_len(0.08, 0.16) * bonus
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Script shares
// ────────────────────────────────────────────────────────────────────────────

/// Kana share backs Japanese over Chinese for Han-heavy text.
pub struct JapaneseKana;

impl Adjustment for JapaneseKana {
    fn name(&self) -> &'static str {
        "japanese_kana"
    }
    fn applies(&self, lang: &str, _: &ScoreContext<'_>) -> bool {
        lang == "ja"
    }
    fn delta(&self, _: &str, cx: &ScoreContext<'_>) -> f64 {
        let f = cx.features;
        -0.6 * (f.hiragana_share + f.katakana_share - 0.10).max(0.0)
    }
}

pub struct KoreanHangul;

impl Adjustment for KoreanHangul {
    fn name(&self) -> &'static str {
        "korean_hangul"
    }
    fn applies(&self, lang: &str, _: &ScoreContext<'_>) -> bool {
        lang == "ko"
    }
    fn delta(&self, _: &str, cx: &ScoreContext<'_>) -> f64 {
        -0.8 * (cx.features.hangul_share - 0.08).max(0.0)
    }
}

pub struct VietnameseDensity;

impl Adjustment for VietnameseDensity {
    fn name(&self) -> &'static str {
        "vietnamese_density"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        lang == "vi" && cx.features.vi_density >= 0.12
    }
    fn delta(&self, _: &str, cx: &ScoreContext<'_>) -> f64 {
        -cx.by_len(1.2, 0.8) * (cx.features.vi_density - 0.12) * 5.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Addon statistics
// ────────────────────────────────────────────────────────────────────────────

pub struct LetterFrequency;

impl Adjustment for LetterFrequency {
    fn name(&self) -> &'static str {
        "letter_frequency"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        cx.features.letters >= 8 && cx.model.addons.letter_freq.contains_key(lang)
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let Some(freq) = cx.model.addons.letter_freq.get(lang) else {
            return 0.0;
        };
        cx.by_len(0.002, 0.005) * super::features::chi_square(&cx.features.letter_hist, freq)
    }
}

/// Density of the language's frequent word bigrams among the text's pairs.
pub struct StopPairs;

impl Adjustment for StopPairs {
    fn name(&self) -> &'static str {
        "stop_pairs"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        !cx.features.word_pairs.is_empty()
            && cx.model.addons.profile(lang).is_some_and(|p| !p.stop_pairs.is_empty())
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let Some(profile) = cx.model.addons.profile(lang) else {
            return 0.0;
        };
        let pairs = &cx.features.word_pairs;
        let hits: usize = profile
            .stop_pairs
            .iter()
            .filter_map(|(a, b)| pairs.get(&(a.as_str(), b.as_str())))
            .sum();
        let density = hits as f64 / cx.features.pair_total().max(1) as f64;
        -cx.by_len(1.2, 0.8) * density
    }
}

/// Distance between text and language char-bigram entropy and n80.
pub struct BigramShape;

impl Adjustment for BigramShape {
    fn name(&self) -> &'static str {
        "bigram_shape"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        cx.model.addons.profile(lang).is_some()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let Some(stats) = cx.model.addons.profile(lang).map(|p| p.bigrams) else {
            return 0.0;
        };
        let f = cx.features;
        let mut d = 0.0;
        if stats.entropy_bits != 0.0 {
            d += cx.by_len(0.08, 0.12) * (f.bigram_entropy - stats.entropy_bits).abs();
        }
        if f.bigram_n80 != 0 && stats.n80 != 0 {
            d += cx.by_len(0.002, 0.003) * (f.bigram_n80 as f64 - f64::from(stats.n80)).abs();
        }
        d
    }
}

/// Languages whose frequent vocabulary covers little of typical text.
pub struct TfidfCoverage;

impl Adjustment for TfidfCoverage {
    fn name(&self) -> &'static str {
        "tfidf_coverage"
    }
    fn applies(&self, _: &str, cx: &ScoreContext<'_>) -> bool {
        !cx.model.addons.profiles.is_empty()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let cov = cx.model.addons.profile(lang).map_or(0.0, |p| p.tfidf_cov);
        cx.by_len(0.15, 0.5) * (1.0 - cov)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Priors on rare languages and morphology
// ────────────────────────────────────────────────────────────────────────────

pub struct RareCyrillic;

impl Adjustment for RareCyrillic {
    fn name(&self) -> &'static str {
        "rare_cyrillic"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        let entry = LangEntry::lookup(lang);
        entry.tier == Tier::RareCyrillic && entry.hard_diacritic_hits(cx.text()) == 0
    }
    fn delta(&self, _: &str, cx: &ScoreContext<'_>) -> f64 {
        cx.by_len(1.2, 1.6)
    }
}

/// Short inputs only: distinctive inflectional endings.
pub struct Morphology;

impl Adjustment for Morphology {
    fn name(&self) -> &'static str {
        "morphology"
    }
    fn applies(&self, lang: &str, cx: &ScoreContext<'_>) -> bool {
        cx.features.short && !LangEntry::lookup(lang).morph_suffixes.is_empty()
    }
    fn delta(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        let entry = LangEntry::lookup(lang);
        -entry.morph_bonus * cx.features.morph_hits(entry) as f64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

pub struct AdjustmentRegistry {
    adjustments: Vec<Box<dyn Adjustment>>,
    disabled: HashSet<(&'static str, String)>,
}

impl Default for AdjustmentRegistry {
    fn default() -> Self {
        Self::empty()
            .push(UniqueSignature)
            .push(IberianHints)
            .push(SouthSlavicHints)
            .push(CyrillicCoverage)
            .push(HardDiacritics)
            .push(NegativeChars)
            .push(DiacriticHits)
            .push(ExclusiveLetters)
            .push(ArabicSignature)
            .push(TibetanSignature)
            .push(JapaneseKana)
            .push(KoreanHangul)
            .push(VietnameseDensity)
            .push(LetterFrequency)
            .push(StopPairs)
            .push(BigramShape)
            .push(TfidfCoverage)
            .push(RareCyrillic)
            .push(Morphology)
    }
}

impl std::fmt::Debug for AdjustmentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdjustmentRegistry")
            .field("adjustments", &self.names())
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl AdjustmentRegistry {
    pub fn empty() -> Self {
        Self {
            adjustments: Vec::new(),
            disabled: HashSet::new(),
        }
    }

    pub fn push<A: Adjustment + 'static>(mut self, adjustment: A) -> Self {
        self.adjustments.push(Box::new(adjustment));
        self
    }

    /// Remove an adjustment for every language.
    pub fn without(mut self, name: &str) -> Self {
        self.adjustments.retain(|a| a.name() != name);
        self
    }

    /// Skip adjustment `name` when scoring `lang`.
    pub fn disable_for(mut self, name: &str, lang: &str) -> Self {
        if let Some(a) = self.adjustments.iter().find(|a| a.name() == name) {
            self.disabled.insert((a.name(), lang.to_owned()));
        }
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.adjustments.iter().map(|a| a.name()).collect()
    }

    /// Names of the adjustments that fire for `lang`, in order.
    pub fn active_for(&self, lang: &str, cx: &ScoreContext<'_>) -> Vec<&'static str> {
        self.enabled(lang)
            .filter(|a| a.applies(lang, cx))
            .map(|a| a.name())
            .collect()
    }

    /// Sum of every enabled adjustment's delta for `lang`.
    pub fn total(&self, lang: &str, cx: &ScoreContext<'_>) -> f64 {
        self.enabled(lang)
            .filter(|a| a.applies(lang, cx))
            .map(|a| a.delta(lang, cx))
            .sum()
    }

    fn enabled<'s>(&'s self, lang: &'s str) -> impl Iterator<Item = &'s dyn Adjustment> + 's {
        self.adjustments
            .iter()
            .map(|a| a.as_ref())
            .filter(move |a| !self.disabled.contains(&(a.name(), lang.to_owned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::ModelFixture;

    struct Constant(f64);

    impl Adjustment for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }
        fn delta(&self, _: &str, _: &ScoreContext<'_>) -> f64 {
            self.0
        }
    }

    fn context<'a>(
        model: &'a Model,
        features: &'a TextFeatures<'a>,
        candidates: &'a [&'a str],
    ) -> ScoreContext<'a> {
        ScoreContext {
            model,
            features,
            candidates,
            diacritic_hits: HashMap::new(),
            signature_letter_hits: HashMap::new(),
            signature_bonus: HashMap::new(),
            iberian: None,
            south_slavic: None,
        }
    }

    #[test]
    fn default_order_is_fixed() {
        let names = AdjustmentRegistry::default().names();
        assert_eq!(names.len(), 19);
        assert_eq!(names.first(), Some(&"unique_signature"));
        assert_eq!(names.last(), Some(&"morphology"));
        let kana = names.iter().position(|n| *n == "japanese_kana").unwrap();
        let hangul = names.iter().position(|n| *n == "korean_hangul").unwrap();
        assert!(kana < hangul);
    }

    #[test]
    fn without_and_disable_for() {
        let reg = AdjustmentRegistry::default().without("morphology");
        assert!(!reg.names().contains(&"morphology"));

        let model = ModelFixture::new().langs(&["ja", "en"]).build();
        let features = TextFeatures::new("ひらがなとカタカナ");
        let candidates = ["ja", "en"];
        let cx = context(&model, &features, &candidates);

        let reg = AdjustmentRegistry::default();
        assert!(reg.active_for("ja", &cx).contains(&"japanese_kana"));
        assert!(!reg.active_for("en", &cx).contains(&"japanese_kana"));

        let reg = reg.disable_for("japanese_kana", "ja");
        assert!(!reg.active_for("ja", &cx).contains(&"japanese_kana"));
        // unknown names are ignored
        let reg = reg.disable_for("no_such_adjustment", "ja");
        assert_eq!(reg.names().len(), 19);
    }

    #[test]
    fn kana_share_rewards_japanese() {
        let model = ModelFixture::new().langs(&["ja"]).build();
        let features = TextFeatures::new("ひらがなとカタカナ");
        let candidates = ["ja"];
        let cx = context(&model, &features, &candidates);
        assert!(JapaneseKana.delta("ja", &cx) < -0.5);

        let latin = TextFeatures::new("romaji only");
        let cx = context(&model, &latin, &candidates);
        assert_eq!(JapaneseKana.delta("ja", &cx), 0.0);
    }

    #[test]
    fn total_sums_enabled_deltas() {
        let model = ModelFixture::new().langs(&["en", "de"]).build();
        let features = TextFeatures::new("hello");
        let candidates = ["en", "de"];
        let cx = context(&model, &features, &candidates);
        let reg = AdjustmentRegistry::empty()
            .push(Constant(-1.5))
            .push(Constant(0.5))
            .disable_for("constant", "de");
        assert_eq!(reg.total("en", &cx), -1.0);
        assert_eq!(reg.total("de", &cx), 0.0);
    }
}
