use thiserror::Error;

use crate::{
    calibration::{CalibrationConfig, Calibrator, hints::HintWeights},
    context::Context,
    correctness::{CorrectnessAnalyzer, CorrectnessReport},
    dictionary::{DictionaryError, DictionaryStore, StoreConfig},
    gating::candidate_langs,
    model::{Model, ModelError},
    profile::{ProfileError, preset},
    scoring::{AdjustmentRegistry, Scorer, features::TextFeatures},
    tokenizer::{TokenizeError, Tokenizer},
};
use std::{path::Path, sync::Arc};

/// Number of languages returned when the caller does not say otherwise.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum GlottaError {
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
    #[error("tokenize error: {0}")]
    Tokenize(#[from] TokenizeError),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error("no language model configured")]
    NoModel,
}

// ────────────────────────────────────────────────────────────────────────────
// Language detection
// ────────────────────────────────────────────────────────────────────────────

/// Gate, score and calibrate over one shared model.
pub struct LanguageDetector {
    model: Arc<Model>,
    scorer: Scorer,
    calibrator: Calibrator,
}

impl std::fmt::Debug for LanguageDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageDetector")
            .field("langs", &self.model.langs().len())
            .field("scorer", &self.scorer)
            .field("calibration", &self.calibrator.config)
            .finish()
    }
}

impl LanguageDetector {
    pub fn new(model: Arc<Model>) -> Self {
        Self::builder(model).build()
    }

    pub fn builder(model: Arc<Model>) -> DetectorBuilder {
        DetectorBuilder {
            model,
            registry: AdjustmentRegistry::default(),
            calibration: CalibrationConfig::default(),
            hint_weights: HintWeights::default(),
        }
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// The `top_k` most probable languages, best first. Empty input gives an
    /// empty list.
    pub fn detect(&self, text: &str, top_k: usize) -> Result<Vec<(String, f64)>, GlottaError> {
        run_detection(&self.model, &self.scorer, &self.calibrator, text, top_k)
    }

    pub fn detect_top1(&self, text: &str) -> Result<Option<String>, GlottaError> {
        Ok(self.detect(text, 1)?.into_iter().next().map(|(l, _)| l))
    }
}

pub struct DetectorBuilder {
    model: Arc<Model>,
    registry: AdjustmentRegistry,
    calibration: CalibrationConfig,
    hint_weights: HintWeights,
}

impl DetectorBuilder {
    pub fn adjustments(mut self, registry: AdjustmentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn calibration(mut self, config: CalibrationConfig) -> Self {
        self.calibration = config;
        self
    }

    pub fn hint_weights(mut self, weights: HintWeights) -> Self {
        self.hint_weights = weights;
        self
    }

    pub fn build(self) -> LanguageDetector {
        LanguageDetector {
            model: self.model,
            scorer: Scorer::new(self.registry),
            calibrator: Calibrator::new(self.calibration, self.hint_weights),
        }
    }
}

fn run_detection(
    model: &Model,
    scorer: &Scorer,
    calibrator: &Calibrator,
    text: &str,
    top_k: usize,
) -> Result<Vec<(String, f64)>, GlottaError> {
    let normalized = preset::detection().apply(text, &Context::default())?;
    if normalized.is_empty() {
        return Ok(Vec::new());
    }
    let candidates = candidate_langs(model, &normalized);
    if candidates.is_empty() {
        return Ok(Vec::new());
    }
    let features = TextFeatures::new(&normalized);
    let scored = scorer.score(model, &features, &candidates);
    Ok(calibrator
        .calibrate(model, &features, scored, top_k)
        .into_iter()
        .map(|(lang, p)| (lang.to_owned(), p))
        .collect())
}

/// One-shot detection with default tuning.
pub fn detect_language(
    model: &Model,
    text: &str,
    top_k: usize,
) -> Result<Vec<(String, f64)>, GlottaError> {
    run_detection(model, &Scorer::default(), &Calibrator::default(), text, top_k)
}

pub fn detect_top1(model: &Model, text: &str) -> Result<Option<String>, GlottaError> {
    Ok(detect_language(model, text, 1)?.into_iter().next().map(|(l, _)| l))
}

// ────────────────────────────────────────────────────────────────────────────
// Spell-checking
// ────────────────────────────────────────────────────────────────────────────

/// Shared dictionary store, tokenizer and optional detector.
#[derive(Debug)]
pub struct Glotta {
    store: Arc<DictionaryStore>,
    tokenizer: Arc<Tokenizer>,
    detector: Option<LanguageDetector>,
}

impl Glotta {
    pub fn builder() -> GlottaBuilder {
        GlottaBuilder::default()
    }

    pub fn store(&self) -> &Arc<DictionaryStore> {
        &self.store
    }

    /// Analyzer for `lang` sharing this instance's tokenizer.
    pub fn analyzer(&self, lang: &str) -> Result<CorrectnessAnalyzer, GlottaError> {
        let dict = self.store.load(lang)?;
        Ok(CorrectnessAnalyzer::with_tokenizer(
            lang,
            dict,
            Arc::clone(&self.tokenizer),
        ))
    }

    pub fn correctness(&self, text: &str, lang: &str) -> Result<CorrectnessReport, GlottaError> {
        if text.trim().is_empty() {
            return Ok(CorrectnessReport::default());
        }
        Ok(self.analyzer(lang)?.run(text)?)
    }

    pub fn detect(&self, text: &str, top_k: usize) -> Result<Vec<(String, f64)>, GlottaError> {
        self.detector.as_ref().ok_or(GlottaError::NoModel)?.detect(text, top_k)
    }
}

#[derive(Default)]
pub struct GlottaBuilder {
    store: Option<Arc<DictionaryStore>>,
    store_config: StoreConfig,
    detector: Option<LanguageDetector>,
}

impl GlottaBuilder {
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Share an existing store (and its cache) instead of building one.
    pub fn store(mut self, store: Arc<DictionaryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn model(mut self, model: Arc<Model>) -> Self {
        self.detector = Some(LanguageDetector::new(model));
        self
    }

    pub fn detector(mut self, detector: LanguageDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn build(self) -> Glotta {
        Glotta {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(DictionaryStore::new(self.store_config))),
            tokenizer: Arc::new(Tokenizer::new()),
            detector: self.detector,
        }
    }
}

/// One-shot spell-check. With `dict_dir` the dictionary must already be
/// there; without it the data dir is resolved from the environment and a
/// missing dictionary may be downloaded.
pub fn correctness(
    text: &str,
    lang: &str,
    dict_dir: Option<&Path>,
    use_mmap: bool,
) -> Result<CorrectnessReport, GlottaError> {
    let mut config = StoreConfig::builder().use_mmap(use_mmap);
    if let Some(dir) = dict_dir {
        config = config.data_dir(dir).allow_network(false);
    }
    Glotta::builder().store_config(config).build().correctness(text, lang)
}
