pub mod data;
pub mod script;

use crate::lang::data::LANG_TABLE;
use smallvec::SmallVec;

pub use data::{ALL_LANGS, from_code};
pub use script::Script;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lang {
    pub code: &'static str,
    pub name: &'static str,
}

impl Lang {
    #[inline(always)]
    pub const fn code(&self) -> &'static str {
        self.code
    }
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Static data for this language.
    #[inline]
    pub fn entry(&self) -> &'static LangEntry {
        LangEntry::lookup(self.code)
    }
}

/// How common a language is within its script family. Drives the short-input
/// shortlist and the low-evidence prior damping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    CoreLatin,
    CoreCyrillic,
    RareLatin,
    RareCyrillic,
    Regular,
}

#[derive(Clone, Copy, Debug)]
pub struct LangEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub scripts: &'static [Script],
    /// Minimum fraction of letters that must belong to `scripts` for the
    /// language to survive gating.
    pub min_line_script_share: f64,
    pub enable_affixes: bool,
    /// Letters ignored when computing the script share.
    pub neutral_extra: &'static [char],
    pub prior: f64,
    /// ZWNJ carries meaning in this orthography and survives normalization.
    pub keep_zwnj: bool,
    pub tier: Tier,
    pub hard_diacritics: &'static [&'static str],
    pub exclusive_letters: &'static [char],
    pub negative_chars: &'static [&'static str],
    pub unique_signature: &'static [&'static str],
    pub morph_suffixes: &'static [&'static str],
    pub morph_bonus: f64,
}

impl LangEntry {
    pub const BASE: LangEntry = LangEntry {
        code: "",
        name: "",
        scripts: &[Script::Latin],
        min_line_script_share: 0.60,
        enable_affixes: true,
        neutral_extra: &[],
        prior: 1.0,
        keep_zwnj: false,
        tier: Tier::Regular,
        hard_diacritics: &[],
        exclusive_letters: &[],
        negative_chars: &[],
        unique_signature: &[],
        morph_suffixes: &[],
        morph_bonus: 0.0,
    };

    /// Entry used for codes outside the registry: no script constraint.
    pub const UNSCRIPTED: LangEntry = LangEntry {
        scripts: &[],
        ..LangEntry::BASE
    };

    #[inline]
    pub fn lookup(code: &str) -> &'static LangEntry {
        LANG_TABLE.get(code).unwrap_or(&LangEntry::UNSCRIPTED)
    }

    #[inline]
    pub fn has_script(&self, script: Script) -> bool {
        self.scripts.contains(&script)
    }

    #[inline]
    pub fn is_cyrillic(&self) -> bool {
        self.has_script(Script::Cyrillic)
    }

    /// Occurrences of this language's hard diacritics in `text`.
    pub fn hard_diacritic_hits(&self, text: &str) -> usize {
        count_all(text, self.hard_diacritics)
    }

    /// Occurrences of this language's script-exclusive letters in `text`.
    pub fn exclusive_hits(&self, text: &str) -> usize {
        if self.exclusive_letters.is_empty() {
            return 0;
        }
        text.chars()
            .filter(|c| self.exclusive_letters.contains(c))
            .count()
    }

    pub fn negative_hits(&self, text: &str) -> usize {
        count_all(text, self.negative_chars)
    }

    pub fn unique_signature_hits(&self, text: &str) -> usize {
        count_all(text, self.unique_signature)
    }

    /// Hard diacritics or exclusive letters present.
    #[inline]
    pub fn has_hard_evidence(&self, text: &str) -> bool {
        self.hard_diacritic_hits(text) > 0 || self.exclusive_hits(text) > 0
    }

    #[inline]
    pub fn is_neutral(&self, c: char) -> bool {
        script::is_neutral(c, self.scripts, self.neutral_extra)
    }
}

fn count_all(text: &str, needles: &[&str]) -> usize {
    needles.iter().map(|n| text.matches(n).count()).sum()
}

// ────────────────────────────────────────────────────────────────────────────
// Language groups used by the gating, scoring and calibration layers
// ────────────────────────────────────────────────────────────────────────────
pub const IBERIAN: &[&str] = &["es", "gl", "an", "ca"];
pub const SOUTH_SLAVIC: &[&str] = &["bs", "hr", "sr", "sl", "cs"];
pub const SOUTH_SLAVIC_LATIN: &[&str] = &["bs", "hr", "sr", "sl"];
pub const TIBETAN_PAIR: &[&str] = &["dz", "bo"];
pub const ARABIC_GROUP: &[&str] = &["ar", "fa", "ur", "ps", "sd", "ug", "ks", "ku"];

#[inline]
pub fn in_group(group: &[&str], code: &str) -> bool {
    group.contains(&code)
}

// ────────────────────────────────────────────────────────────────────────────
// Code resolution
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of resolving a user-supplied language code against a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Unsupported,
}

impl Resolution {
    pub fn key(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(k) => Some(k),
            Resolution::Unsupported => None,
        }
    }
}

/// Candidate keys tried in order: the full code (case-folded, `-` unified to
/// `_`), then the base code before the first `_`, `-` or `.`.
pub fn fallback_chain(code: &str) -> SmallVec<[String; 2]> {
    let full = code.trim().to_lowercase().replace('-', "_");
    let mut chain = SmallVec::new();
    if full.is_empty() {
        return chain;
    }
    let base = base_code(&full).to_owned();
    chain.push(full);
    if chain[0] != base {
        chain.push(base);
    }
    chain
}

/// `pt_BR.UTF-8` → `pt`.
#[inline]
pub fn base_code(code: &str) -> &str {
    code.split(['_', '-', '.']).next().unwrap_or(code)
}

/// Walk [`fallback_chain`] and return the first key accepted by `is_supported`.
pub fn resolve(code: &str, is_supported: impl Fn(&str) -> bool) -> Resolution {
    fallback_chain(code)
        .into_iter()
        .find(|k| is_supported(k))
        .map_or(Resolution::Unsupported, Resolution::Resolved)
}
