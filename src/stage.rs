//! Core normalization stage abstraction.
//!
//! Every stage answers two questions: does this text need work
//! (`needs_apply`), and what is the transformed text (`apply`). The pipeline
//! only calls `apply` when `needs_apply` says so, which keeps clean input
//! borrowed end to end.
//!
//! `needs_apply` must be exact: it returns `true` if and only if `apply`
//! would produce different text. The stage contract harness checks this for
//! every stage.

pub mod fold_case;
pub mod joiners;
pub mod map_chars;
pub mod normalization;
pub mod normalize_whitespace;
pub mod strip_annotation;
pub mod strip_chars;

use crate::context::Context;
use std::borrow::Cow;
use thiserror::Error;

pub use fold_case::FoldCase;
pub use joiners::{JoinerPolicy, NormalizeJoiners};
pub use map_chars::{CANON_APOSTROPHES, CANON_DASHES, DETECT_QUOTES, MapChars};
pub use normalization::{NFC, NFKC, NfcStage, NfkcStage};
pub use normalize_whitespace::NormalizeWhitespace;
pub use strip_annotation::StripAnnotation;
pub use strip_chars::{STRIP_SOFT_HYPHEN, STRIP_ZWSP, STRIP_ZWSP_WJ, StripChars};

/// Public error type for every stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Normalization failed at stage `{0}`: {1}")]
    Failed(&'static str, String),
}

/// A single normalisation step.
pub trait Stage: Send + Sync {
    /// Human-readable name – used for error messages.
    fn name(&self) -> &'static str;

    /// Fast pre-check.  Returning `Ok(false)` skips the whole stage.
    fn needs_apply(&self, text: &str, ctx: &Context) -> Result<bool, StageError>;

    /// Allocation-aware transformation.  Must always be correct.
    fn apply<'a>(&self, text: Cow<'a, str>, ctx: &Context) -> Result<Cow<'a, str>, StageError>;
}
