//! Candidate scoring: weighted multi-order n-gram quality plus an ordered
//! battery of heuristic adjustments. Lower is better.
pub mod adjust;
pub mod features;

use crate::calibration::hints::{iberian_hints, south_slavic_hints};
use crate::lang::{IBERIAN, SOUTH_SLAVIC, SOUTH_SLAVIC_LATIN, in_group};
use crate::model::{KeyBuf, Model, SIGNATURE_ORDERS};
pub use adjust::{Adjustment, AdjustmentRegistry, ScoreContext};
use features::{ORDERS, TextFeatures, diacritic_hits, signature_bonus, signature_letter_hits};

const BIGRAM_WEIGHT_ULTRA: f64 = 1.8;
const BIGRAM_WEIGHT_SHORT: f64 = 1.35;
const BIGRAM_WEIGHT_LONG: f64 = 1.10;
const AFFIX_WEIGHT_SHORT: f64 = 1.15;
const AFFIX_WEIGHT_LONG: f64 = 1.00;

/// A candidate and its adjusted average quality.
pub type Scored<'c> = (&'c str, f64);

#[derive(Debug, Default)]
pub struct Scorer {
    registry: AdjustmentRegistry,
}

impl Scorer {
    pub fn new(registry: AdjustmentRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AdjustmentRegistry {
        &self.registry
    }

    /// Score every candidate and sort ascending (best first). A candidate
    /// without any lookups scores `+inf`.
    pub fn score<'c>(
        &self,
        model: &Model,
        features: &TextFeatures<'_>,
        candidates: &[&'c str],
    ) -> Vec<Scored<'c>> {
        let cx = ScoreContext {
            model,
            features,
            candidates,
            diacritic_hits: diacritic_hits(features.text, &model.addons.diacritics),
            signature_letter_hits: signature_letter_hits(
                features.text,
                &model.addons.arabic_signatures,
            ),
            signature_bonus: signature_bonus(model, features.text, candidates, &SIGNATURE_ORDERS),
            iberian: candidates
                .iter()
                .any(|l| in_group(IBERIAN, l))
                .then(|| iberian_hints(features.text)),
            south_slavic: candidates
                .iter()
                .any(|l| in_group(SOUTH_SLAVIC, l))
                .then(|| south_slavic_hints(features.text)),
        };
        let cluster = candidates
            .iter()
            .filter(|l| in_group(SOUTH_SLAVIC_LATIN, l))
            .count()
            >= 2;

        let mut key = KeyBuf::default();
        let mut scored: Vec<Scored<'c>> = candidates
            .iter()
            .map(|&lang| {
                let base = base_quality(model, features, lang, cluster, &mut key);
                (lang, base + self.registry.total(lang, &cx))
            })
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored
    }
}

fn order_weight(features: &TextFeatures<'_>, n: usize) -> f64 {
    match n {
        2 if features.ultra_short => BIGRAM_WEIGHT_ULTRA,
        2 if features.short => BIGRAM_WEIGHT_SHORT,
        2 => BIGRAM_WEIGHT_LONG,
        _ => 1.0,
    }
}

/// Weighted mean quality of char and affix grams over the loaded orders.
fn base_quality(
    model: &Model,
    features: &TextFeatures<'_>,
    lang: &str,
    south_slavic_cluster: bool,
    key: &mut KeyBuf,
) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;

    for &n in &ORDERS {
        if !model.has_order(n) {
            continue;
        }
        let w = order_weight(features, n);
        if let Some((_, grams)) = features.char_grams.iter().find(|(o, _)| *o == n) {
            for (g, &c) in grams {
                let q = f64::from(model.quality_with(key, lang, g, n));
                total += w * q * c as f64;
                count += c;
            }
        }
        if let Some((_, grams)) = features.affix_grams.iter().find(|(o, _)| *o == n) {
            let mut mult = if features.short {
                AFFIX_WEIGHT_SHORT
            } else {
                AFFIX_WEIGHT_LONG
            };
            if south_slavic_cluster && (n == 4 || n == 5) {
                mult *= if features.short { 1.20 } else { 1.10 };
            }
            for (g, &c) in grams {
                let q = f64::from(model.quality_with(key, lang, g, n));
                total += w * mult * q * c as f64;
                count += c;
            }
        }
    }

    if count == 0 {
        f64::INFINITY
    } else {
        total / count as f64
    }
}

/// Score `candidates` with the default adjustment battery.
pub fn score_text<'c>(model: &Model, text: &str, candidates: &[&'c str]) -> Vec<Scored<'c>> {
    Scorer::default().score(model, &TextFeatures::new(text), candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::ModelFixture;

    fn model() -> Model {
        ModelFixture::new()
            .grams("en", &["th", "he", "e ", " t"], 20)
            .grams("fr", &["th", "he"], 80)
            .grams("en", &["the"], 15)
            .build()
    }

    #[test]
    fn lower_quality_wins() {
        let m = model();
        let scored = score_text(&m, "the the the", &["fr", "en"]);
        assert_eq!(scored[0].0, "en");
        assert!(scored[0].1 < scored[1].1);
    }

    #[test]
    fn unloaded_orders_score_infinity() {
        let m = ModelFixture::new().langs(&["en"]).build();
        let scored = score_text(&m, "abc", &["en"]);
        assert_eq!(scored, [("en", f64::INFINITY)]);
    }

    #[test]
    fn empty_registry_is_plain_average() {
        let m = ModelFixture::new().grams("en", &["ab"], 10).build();
        let scorer = Scorer::new(AdjustmentRegistry::empty());
        let f = TextFeatures::new("ab");
        // "ab" pads to three bigrams: \x02a, ab, b\x02.
        let expected = (255.0 + 10.0 + 255.0) / 3.0 * BIGRAM_WEIGHT_ULTRA;
        let scored = scorer.score(&m, &f, &["en"]);
        assert!((scored[0].1 - expected).abs() < 1e-9);
    }

    #[test]
    fn repeated_scores_are_bitwise_equal() {
        let m = ModelFixture::new()
            .train("en", "the cat sat on the mat with another cat")
            .train("de", "die Katze sitzt auf der Matte mit einer Katze")
            .build();
        let text = "the cat sits on a mat";
        let first: Vec<u64> = score_text(&m, text, &["en", "de"])
            .iter()
            .map(|(_, q)| q.to_bits())
            .collect();
        for _ in 0..20 {
            let again: Vec<u64> = score_text(&m, text, &["en", "de"])
                .iter()
                .map(|(_, q)| q.to_bits())
                .collect();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn hard_diacritics_favor_their_language() {
        let m = ModelFixture::new()
            .langs(&["cs", "sk"])
            .grams("cs", &["ře"], 100)
            .grams("sk", &["ře"], 100)
            .build();
        let scored = score_text(&m, "řeka", &["sk", "cs"]);
        assert_eq!(scored[0].0, "cs");
    }
}
