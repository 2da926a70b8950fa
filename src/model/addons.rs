//! Auxiliary per-language signal tables shipped next to the n-gram tries.
//!
//! Every document is optional. A missing, unreadable or malformed file
//! yields an empty table and the heuristics that read it stay silent.

use crate::dictionary::codec;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const DIACRITIC_MAP: &str = "diacritic_map.json";
pub const LETTER_FREQ: &str = "letter_freq.json";
pub const PROFILES: &str = "profiles.json";
pub const ARABIC_SIGNATURES: &str = "arabic_signature_letters.json";
pub const SIGNATURE_DIR: &str = "profiles_trie_signature";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BigramStats {
    pub entropy_bits: f64,
    pub distinct_bigrams: u32,
    pub n80: u32,
}

/// Lexical statistics for one language.
#[derive(Debug, Clone, Default)]
pub struct LangProfile {
    /// Share of running text covered by the 5000 most frequent words.
    pub tfidf_cov: f64,
    pub stop_pairs: HashSet<(String, String)>,
    pub bigrams: BigramStats,
}

#[derive(Debug, Default)]
pub struct Addons {
    pub diacritics: HashMap<String, HashSet<char>>,
    pub letter_freq: HashMap<String, HashMap<char, f64>>,
    pub profiles: HashMap<String, LangProfile>,
    pub arabic_signatures: HashMap<String, HashSet<char>>,
}

// ── wire shapes ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawProfile {
    tfidf_unigram: HashMap<String, f64>,
    stop_pairs: Vec<RawPair>,
    char_bigram: RawBigrams,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawPair {
    a: String,
    b: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawBigrams {
    entropy_bits: f64,
    distinct_bigrams: u32,
    n80: u32,
}

impl Addons {
    /// Read every addon document under `dir` for the languages in `langs`.
    pub fn load(dir: &Path, langs: &[String]) -> Self {
        let diacritics: HashMap<String, String> = read_document(&dir.join(DIACRITIC_MAP));
        let diacritics = if diacritics.is_empty() {
            HashMap::new()
        } else {
            langs
                .iter()
                .map(|l| {
                    let set = diacritics.get(l).map(|s| s.chars().collect()).unwrap_or_default();
                    (l.clone(), set)
                })
                .collect()
        };

        let letter_freq: HashMap<String, HashMap<String, f64>> =
            read_document(&dir.join(LETTER_FREQ));
        let letter_freq = letter_freq
            .into_iter()
            .map(|(lang, freqs)| {
                let freqs = freqs
                    .into_iter()
                    .filter_map(|(k, v)| single_char(&k).map(|c| (c, v)))
                    .collect();
                (lang, freqs)
            })
            .collect();

        let raw: HashMap<String, RawProfile> = read_document(&dir.join(PROFILES));
        let profiles = if raw.is_empty() {
            HashMap::new()
        } else {
            let mut raw = raw;
            langs
                .iter()
                .map(|l| (l.clone(), raw.remove(l).map(LangProfile::from).unwrap_or_default()))
                .collect()
        };

        let arabic: HashMap<String, Vec<String>> = read_document(&dir.join(ARABIC_SIGNATURES));
        let arabic_signatures = langs
            .iter()
            .filter_map(|l| {
                let set: HashSet<char> = arabic.get(l)?.iter().filter_map(|s| single_char(s)).collect();
                (!set.is_empty()).then(|| (l.clone(), set))
            })
            .collect();

        Addons {
            diacritics,
            letter_freq,
            profiles,
            arabic_signatures,
        }
    }

    pub fn profile(&self, lang: &str) -> Option<&LangProfile> {
        self.profiles.get(lang)
    }
}

impl From<RawProfile> for LangProfile {
    fn from(raw: RawProfile) -> Self {
        LangProfile {
            tfidf_cov: raw.tfidf_unigram.get("cov@5000").copied().unwrap_or(0.0),
            stop_pairs: raw
                .stop_pairs
                .into_iter()
                .filter(|p| !p.a.is_empty() && !p.b.is_empty())
                .map(|p| (p.a, p.b))
                .collect(),
            bigrams: BigramStats {
                entropy_bits: raw.char_bigram.entropy_bits,
                distinct_bigrams: raw.char_bigram.distinct_bigrams,
                n80: raw.char_bigram.n80,
            },
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut it = s.chars();
    let c = it.next()?;
    it.next().is_none().then_some(c)
}

/// Parse a JSON document that may be zstd-compressed and may not be UTF-8.
/// Any failure yields `T::default()`.
pub fn read_document<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "addon absent");
        return T::default();
    }
    let bytes = match codec::read_maybe_compressed(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable addon; ignoring");
            return T::default();
        }
    };
    let text = decode_text(bytes);
    serde_json::from_str(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "malformed addon; ignoring");
        T::default()
    })
}

/// UTF-8 when valid, Latin-1 otherwise.
#[cfg(feature = "simd")]
fn decode_text(bytes: Vec<u8>) -> String {
    if simdutf8::basic::from_utf8(&bytes).is_ok() {
        // SAFETY: validated just above.
        return unsafe { String::from_utf8_unchecked(bytes) };
    }
    latin1(&bytes)
}

#[cfg(not(feature = "simd"))]
fn decode_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| latin1(e.as_bytes()))
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let a = Addons::load(&dir.path().join("nope"), &langs(&["en"]));
        assert!(a.diacritics.is_empty());
        assert!(a.letter_freq.is_empty());
        assert!(a.profiles.is_empty());
        assert!(a.arabic_signatures.is_empty());
    }

    #[test]
    fn parses_every_document() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path();
        std::fs::write(p.join(DIACRITIC_MAP), r#"{"fr":"éèà","xx":"q"}"#).unwrap();
        std::fs::write(p.join(LETTER_FREQ), r#"{"fr":{"e":0.15,"ab":0.1}}"#).unwrap();
        std::fs::write(
            p.join(PROFILES),
            r#"{"fr":{"tfidf_unigram":{"cov@5000":0.8},
                      "stop_pairs":[{"a":"de","b":"la"},{"a":"","b":"x"}],
                      "char_bigram":{"entropy_bits":7.5,"distinct_bigrams":400,"n80":120}}}"#,
        )
        .unwrap();
        std::fs::write(p.join(ARABIC_SIGNATURES), r#"{"fa":["پ","چ"],"ar":[]}"#).unwrap();

        let a = Addons::load(p, &langs(&["fr", "en", "fa", "ar"]));
        assert_eq!(a.diacritics["fr"].len(), 3);
        assert!(a.diacritics["en"].is_empty());
        assert!(!a.diacritics.contains_key("xx"));
        assert_eq!(a.letter_freq["fr"].len(), 1);

        let fr = a.profile("fr").unwrap();
        assert_eq!(fr.tfidf_cov, 0.8);
        assert_eq!(fr.stop_pairs.len(), 1);
        assert!(fr.stop_pairs.contains(&("de".into(), "la".into())));
        assert_eq!(fr.bigrams.n80, 120);
        assert_eq!(a.profile("en").unwrap().tfidf_cov, 0.0);

        assert_eq!(a.arabic_signatures.len(), 1);
        assert!(a.arabic_signatures["fa"].contains(&'پ'));
    }

    #[test]
    fn compressed_and_latin1_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let packed = zstd::encode_all(&br#"{"k":"v"}"#[..], 3).unwrap();
        std::fs::write(&path, packed).unwrap();
        let m: HashMap<String, String> = read_document(&path);
        assert_eq!(m["k"], "v");

        let path = dir.path().join("latin1.json");
        std::fs::write(&path, b"{\"k\":\"caf\xe9\"}").unwrap();
        let m: HashMap<String, String> = read_document(&path);
        assert_eq!(m["k"], "café");
    }

    #[test]
    fn malformed_document_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let m: HashMap<String, String> = read_document(&path);
        assert!(m.is_empty());
    }
}
