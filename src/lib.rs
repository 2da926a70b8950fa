pub mod calibration;
pub mod context;
pub mod correctness;
pub mod dictionary;
pub mod gating;
pub mod glotta;
pub mod lang;
pub mod model;
pub mod process;
pub mod profile;
pub mod scoring;
pub mod stage;
pub mod tokenizer;
pub mod unicode;

#[cfg(any(test, feature = "testing"))]
#[doc(hidden)]
pub mod testing;

pub use calibration::{CalibrationConfig, Calibrator};
pub use correctness::{CorrectnessAnalyzer, CorrectnessReport};
pub use dictionary::{Dictionary, DictionaryError, DictionaryStore, StoreConfig};
pub use glotta::{
    DEFAULT_TOP_K, Glotta, GlottaError, LanguageDetector, correctness, detect_language,
    detect_top1,
};
pub use lang::{Lang, LangEntry, Resolution};
pub use model::{Model, ModelConfig, ModelError};
pub use scoring::{Adjustment, AdjustmentRegistry, Scorer};
pub use tokenizer::{Token, TokenKind, TokenizeError, Tokenizer};
