//! Evidence-adaptive softmax over candidate scores.
//!
//! Quality gaps are divided by a temperature that shrinks as evidence grows,
//! and per-language priors are raised to an exponent (`beta`) that shrinks
//! with it. Confusable clusters additionally get log-linear hint features.
pub mod hints;

use crate::lang::{IBERIAN, LangEntry, Tier, in_group};
use crate::model::Model;
use crate::scoring::Scored;
use crate::scoring::features::{TextFeatures, coverage_ratio};
use hints::{HintFlags, HintWeights, LogLinearHints, iberian_hints};
use regex::Regex;
use std::sync::LazyLock;

/// Clusters of easily confused languages. Hint features are used when at
/// least two members of one cluster are candidates.
pub const CONFUSION_SETS: &[&[&str]] = &[
    &["bs", "hr", "sr", "sl", "cs"],
    &["id", "ms", "su"],
    &["oc", "pt", "fr", "ca"],
    &["nn", "no"],
    &["ty", "mi", "to"],
    &["rn", "rw"],
    &["pl", "cs", "sk"],
    &["tr", "az"],
    &["vi", "id", "ms"],
    &["af", "nl"],
    &["tl", "id", "ms"],
    &["hi", "mr", "ne", "sa"],
];

const EN_STOPS: [&str; 10] = ["the", "is", "of", "and", "to", "in", "that", "it", "for", "on"];
const EN_BIGRAMS: [&str; 6] = ["th", "he", "in", "er", "an", "re"];
const NON_ENGLISH_MARKS: &str = "ñçàèìòùáéíóúäöüßœğşłřńśžčćđțșîâă";

static RX_ASCII_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]+").unwrap());

/// Tuning constants of the calibration step.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    pub base_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Temperature drop per unit of evidence.
    pub evidence_cooling: f64,
    /// Temperature drop per quality point of top-2 margin.
    pub margin_cooling: f64,
    pub beta_base: f64,
    pub beta_slope: f64,
    /// Upper bound of `beta` when the text carries a non-Spanish Iberian
    /// signal.
    pub non_spanish_beta_cap: f64,
    /// Margin used when there is a single candidate.
    pub lone_margin: f64,
    /// ASCII inputs below this evidence are narrowed to major languages.
    pub ascii_narrow_evidence: f64,
    pub major_prior: f64,
    pub micro_ascii_letters: usize,
    pub english_micro_boost: f64,
    /// `(evidence below, prior factor)` steps for rare Latin languages
    /// without hard diacritic support.
    pub rare_latin_damping: [(f64, f64); 2],
    pub rare_cyrillic_damping: [(f64, f64); 2],
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            base_temperature: 10.0,
            min_temperature: 6.0,
            max_temperature: 12.0,
            evidence_cooling: 3.0,
            margin_cooling: 0.08,
            beta_base: 2.0,
            beta_slope: 1.2,
            non_spanish_beta_cap: 0.6,
            lone_margin: 999.0,
            ascii_narrow_evidence: 0.40,
            major_prior: 1.5,
            micro_ascii_letters: 6,
            english_micro_boost: 1.8,
            rare_latin_damping: [(0.25, 0.20), (0.45, 0.35)],
            rare_cyrillic_damping: [(0.25, 0.30), (0.55, 0.45)],
        }
    }
}

/// Evidence strength in `[0, 1]` from letter count, top-2 margin `dq`,
/// bigram coverage of the leading language and bigram diversity.
pub fn evidence_strength(model: &Model, features: &TextFeatures<'_>, top1: &str, dq: f64) -> f64 {
    let bigrams = &features.letter_bigrams;
    let e_len = (features.letters as f64 / 24.0).min(1.0);
    let e_margin = 1.0 - (-dq.max(0.0) / 12.0).exp();
    let e_cov = if bigrams.is_empty() {
        0.0
    } else {
        coverage_ratio(model, bigrams, top1, 2)
    };
    let e_uniq = (bigrams.len() as f64 / 28.0).min(1.0);
    (0.30 * e_len + 0.30 * e_margin + 0.25 * e_cov + 0.15 * e_uniq).clamp(0.0, 1.0)
}

/// Text-level facts the effective prior depends on.
#[derive(Debug, Clone, Copy)]
pub struct PriorInputs<'t> {
    pub text: &'t str,
    pub evidence: f64,
    pub non_spanish: bool,
    pub micro_ascii: bool,
}

#[derive(Debug, Clone, Copy)]
struct Temper {
    best: f64,
    evidence: f64,
    temperature: f64,
    beta: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    pub config: CalibrationConfig,
    hints: LogLinearHints,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig, weights: HintWeights) -> Self {
        Self {
            config,
            hints: LogLinearHints::new(weights),
        }
    }

    /// Turn ascending `scored` candidates into the `top_k` most probable
    /// languages. Probabilities sum to one over the returned entries.
    pub fn calibrate<'c>(
        &self,
        model: &Model,
        features: &TextFeatures<'_>,
        mut scored: Vec<Scored<'c>>,
        top_k: usize,
    ) -> Vec<(&'c str, f64)> {
        if scored.is_empty() || top_k == 0 {
            return Vec::new();
        }
        let text = features.text;
        let non_spanish = non_spanish_signal(text);
        let mut temper = self.temper(model, features, &scored, non_spanish);

        if temper.evidence < self.config.ascii_narrow_evidence && text.is_ascii() {
            let major = |l: &str| {
                LangEntry::lookup(l).prior >= self.config.major_prior
                    || LangEntry::lookup(l).has_hard_evidence(text)
            };
            let keep = scored.iter().filter(|(l, _)| major(l)).count();
            if keep > 0 && keep < scored.len() {
                scored.retain(|(l, _)| major(l));
                temper = self.temper(model, features, &scored, non_spanish);
                tracing::trace!(kept = keep, "ascii low-evidence narrowing");
            }
        }

        let inputs = PriorInputs {
            text,
            evidence: temper.evidence,
            non_spanish,
            micro_ascii: text.is_ascii() && features.letters <= self.config.micro_ascii_letters,
        };
        let flags = clusters_active(&scored).then(|| HintFlags::detect(text));

        let mut logits: Vec<(&'c str, f64)> = scored
            .iter()
            .map(|&(lang, q)| {
                let gap = if q == temper.best { 0.0 } else { q - temper.best };
                let prior = self.effective_prior(lang, &inputs);
                let mut logit = -gap / temper.temperature + temper.beta * prior.ln();
                if let Some(flags) = &flags {
                    logit += self.hints.features(flags, lang);
                }
                (lang, logit)
            })
            .collect();
        logits.sort_by(|a, b| b.1.total_cmp(&a.1));
        logits.truncate(top_k);

        let max = logits[0].1;
        let mut exps: Vec<f64> = logits.iter().map(|(_, l)| (l - max).exp()).collect();
        let z: f64 = exps.iter().sum();
        let z = if z > 0.0 { z } else { 1.0 };
        for e in &mut exps {
            *e /= z;
        }
        tracing::trace!(
            evidence = temper.evidence,
            temperature = temper.temperature,
            beta = temper.beta,
            "calibrated"
        );
        logits
            .into_iter()
            .zip(exps)
            .map(|((lang, _), p)| (lang, p))
            .collect()
    }

    fn temper(
        &self,
        model: &Model,
        features: &TextFeatures<'_>,
        scored: &[Scored<'_>],
        non_spanish: bool,
    ) -> Temper {
        let c = &self.config;
        let best = scored[0].1;
        let dq = scored.get(1).map_or(c.lone_margin, |s| s.1 - best);
        let evidence = evidence_strength(model, features, scored[0].0, dq);
        let temperature = (c.base_temperature
            - c.evidence_cooling * evidence
            - c.margin_cooling * dq.max(0.0))
        .clamp(c.min_temperature, c.max_temperature);
        let mut beta = c.beta_base - c.beta_slope * evidence;
        if non_spanish {
            beta = beta.min(c.non_spanish_beta_cap);
        }
        Temper {
            best,
            evidence,
            temperature,
            beta,
        }
    }

    /// Registry prior adjusted for the evidence at hand.
    pub fn effective_prior(&self, lang: &str, inputs: &PriorInputs<'_>) -> f64 {
        let c = &self.config;
        let entry = LangEntry::lookup(lang);
        let mut p = entry.prior;
        if inputs.non_spanish && in_group(IBERIAN, lang) {
            p = 1.0;
        }
        let damping = match entry.tier {
            Tier::RareLatin => Some(&c.rare_latin_damping),
            Tier::RareCyrillic => Some(&c.rare_cyrillic_damping),
            _ => None,
        };
        if let Some(steps) = damping
            && !entry.has_hard_evidence(inputs.text)
            && let Some(&(_, factor)) = steps.iter().find(|(below, _)| inputs.evidence < *below)
        {
            p *= factor;
        }
        if inputs.micro_ascii
            && lang == "en"
            && !inputs.text.contains(|ch| NON_ENGLISH_MARKS.contains(ch))
            && looks_english(inputs.text)
        {
            p *= c.english_micro_boost;
        }
        p
    }
}

/// Galician, Aragonese or Catalan evidence strong enough to stop favoring
/// Spanish.
pub fn non_spanish_signal(text: &str) -> bool {
    let ib = iberian_hints(text);
    ib.get("gl") >= 2
        || ib.get("an") >= 2
        || ib.get("ca") >= 2
        || text.contains('·')
        || text.split(' ').any(|w| w == "ny")
}

fn looks_english(text: &str) -> bool {
    RX_ASCII_WORD
        .find_iter(text)
        .any(|m| EN_STOPS.contains(&m.as_str()))
        || EN_BIGRAMS.iter().any(|b| text.contains(b))
}

fn clusters_active(scored: &[Scored<'_>]) -> bool {
    CONFUSION_SETS.iter().any(|set| {
        scored
            .iter()
            .filter(|(l, _)| set.contains(l))
            .count()
            >= 2
    })
}
