//! Builders for real on-disk assets: zstd-compressed fst dictionaries and
//! model directories, plus in-memory models for unit tests.

use crate::context::Context;
use crate::dictionary::{TrieBytes, ValueTrie};
use crate::model::addons::{self, Addons};
use crate::model::ngram::{GramCounts, SEP, count_affix_ngrams, count_char_ngrams, words};
use crate::model::{Meta, Model, ModelConfig};
use crate::profile::preset;
use crate::scoring::features::ORDERS;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Quality given to the most frequent gram of a trained language.
const TRAIN_BEST: f64 = 0.0;
/// Quality given to a gram seen once in a large sample.
const TRAIN_WORST: f64 = 200.0;

fn fst_map_bytes(entries: &BTreeMap<Vec<u8>, u64>) -> Vec<u8> {
    let map = fst::Map::from_iter(entries.iter().map(|(k, v)| (k, *v))).unwrap();
    map.into_fst().into_inner()
}

fn write_zstd(path: &Path, raw: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, zstd::encode_all(raw, 3).unwrap()).unwrap();
}

/// Write `{dir}/{base}.fst.zst` holding the dictionary keys of `words`.
pub fn write_dictionary(dir: &Path, base: &str, words: &[&str]) -> PathBuf {
    let ctx = Context::default();
    let key = preset::dictionary_key();
    let mut keys: Vec<String> = words
        .iter()
        .map(|w| key.apply(w, &ctx).unwrap().into_owned())
        .collect();
    keys.sort_unstable();
    keys.dedup();
    let set = fst::Set::from_iter(keys).unwrap();
    let path = dir.join(format!("{base}.fst.zst"));
    write_zstd(&path, set.as_fst().as_bytes());
    path
}

/// Write a plain `meta.json` into `dir`.
pub fn write_meta(dir: &Path, orders: &[usize], langs: &[&str]) {
    let doc = serde_json::json!({ "orders": orders, "SCALE": 100, "langs": langs });
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("meta.json"), doc.to_string()).unwrap();
}

/// Model builder. Orders are inferred from gram lengths; languages are the
/// explicitly declared ones followed by every language that owns a gram.
#[derive(Debug, Default, Clone)]
pub struct ModelFixture {
    langs: Vec<String>,
    grams: BTreeMap<usize, BTreeMap<Vec<u8>, u64>>,
    signatures: BTreeMap<usize, BTreeMap<Vec<u8>, u64>>,
    addons: Vec<(String, String)>,
}

fn key(lang: &str, gram: &str) -> Vec<u8> {
    let mut k = String::with_capacity(lang.len() + gram.len() + 1);
    k.push_str(lang);
    k.push(SEP);
    k.push_str(gram);
    k.into_bytes()
}

impl ModelFixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(&mut self, lang: &str) {
        if !self.langs.iter().any(|l| l == lang) {
            self.langs.push(lang.to_owned());
        }
    }

    pub fn langs(mut self, langs: &[&str]) -> Self {
        for l in langs {
            self.declare(l);
        }
        self
    }

    pub fn gram(mut self, lang: &str, gram: &str, quality: u8) -> Self {
        self.declare(lang);
        let n = gram.chars().count();
        self.grams
            .entry(n)
            .or_default()
            .insert(key(lang, gram), u64::from(quality));
        self
    }

    pub fn grams(self, lang: &str, grams: &[&str], quality: u8) -> Self {
        grams.iter().fold(self, |fx, g| fx.gram(lang, g, quality))
    }

    pub fn signature(mut self, lang: &str, gram: &str, n: usize, value: u64) -> Self {
        self.signatures
            .entry(n)
            .or_default()
            .insert(key(lang, gram), value);
        self
    }

    /// Add an addon document (`diacritic_map.json`, `profiles.json`, ...).
    pub fn addon(mut self, file: &str, json: &str) -> Self {
        self.addons.push((file.to_owned(), json.to_owned()));
        self
    }

    /// Learn char and affix grams of every order from `sample`, mapping
    /// frequency ranks onto qualities (frequent grams score lower).
    pub fn train(mut self, lang: &str, sample: &str) -> Self {
        self.declare(lang);
        let text = preset::detection()
            .apply(sample, &Context::default())
            .unwrap()
            .into_owned();
        let tokens: Vec<&str> = words(&text).collect();
        for n in ORDERS {
            let mut counts: GramCounts = count_char_ngrams(&text, n);
            for (g, c) in count_affix_ngrams(tokens.iter().copied(), n) {
                *counts.entry(g).or_default() += c;
            }
            let max = counts.values().copied().max().unwrap_or(1) as f64;
            let trie = self.grams.entry(n).or_default();
            for (g, c) in counts {
                let share = (c as f64).ln_1p() / max.ln_1p();
                let q = TRAIN_WORST - (TRAIN_WORST - TRAIN_BEST) * share;
                trie.insert(key(lang, &g), q.round() as u64);
            }
        }
        self
    }

    fn meta(&self) -> Meta {
        Meta {
            orders: ORDERS.to_vec(),
            scale: 100,
            langs: self.langs.clone(),
        }
    }

    fn memory_tries(tries: &BTreeMap<usize, BTreeMap<Vec<u8>, u64>>) -> BTreeMap<usize, ValueTrie> {
        tries
            .iter()
            .map(|(&n, entries)| {
                let trie = ValueTrie::new(TrieBytes::Heap(fst_map_bytes(entries))).unwrap();
                (n, trie)
            })
            .collect()
    }

    /// In-memory model; addon documents go through a scratch directory.
    pub fn build(&self) -> Model {
        let addons = if self.addons.is_empty() {
            Addons::default()
        } else {
            let dir = tempfile::tempdir().unwrap();
            self.write_addons(dir.path());
            Addons::load(dir.path(), &self.langs)
        };
        Model::from_parts(
            self.meta(),
            Self::memory_tries(&self.grams),
            Self::memory_tries(&self.signatures),
            addons,
        )
    }

    fn write_addons(&self, dir: &Path) {
        std::fs::create_dir_all(dir).unwrap();
        for (file, json) in &self.addons {
            std::fs::write(dir.join(file), json).unwrap();
        }
    }

    /// Write profiles and addon directories under a fresh temp dir.
    pub fn write(&self) -> WrittenModel {
        let root = tempfile::tempdir().unwrap();
        let written = WrittenModel { root };
        let profiles = written.profiles_dir();
        let langs: Vec<&str> = self.langs.iter().map(String::as_str).collect();
        write_meta(&profiles, &ORDERS, &langs);
        for (n, entries) in &self.grams {
            write_zstd(
                &profiles.join(n.to_string()).join("fused.fst.zst"),
                &fst_map_bytes(entries),
            );
        }

        let addon_dir = written.addon_dir();
        self.write_addons(&addon_dir);
        for (n, entries) in &self.signatures {
            write_zstd(
                &addon_dir
                    .join(addons::SIGNATURE_DIR)
                    .join(n.to_string())
                    .join("fused.sig.fst.zst"),
                &fst_map_bytes(entries),
            );
        }
        written
    }
}

/// Model directories on disk; removed on drop.
#[derive(Debug)]
pub struct WrittenModel {
    root: TempDir,
}

impl WrittenModel {
    pub fn profiles_dir(&self) -> PathBuf {
        self.root.path().join("profiles")
    }

    pub fn addon_dir(&self) -> PathBuf {
        self.root.path().join("addons")
    }

    pub fn config(&self) -> ModelConfig {
        ModelConfig::new(self.profiles_dir()).addon_dir(self.addon_dir())
    }
}

/// Small training samples for integration tests and benches.
pub mod samples {
    pub const EN: &str = "The quick brown fox jumps over the lazy dog. It is a truth universally \
        acknowledged that the weather in the north of the country is often cold and wet, and \
        that people there like to talk about it over a cup of tea in the afternoon.";
    pub const FR: &str = "Le chat est sur la table avec le chien. Il fait beau aujourd'hui et \
        nous allons nous promener dans le parc. Les enfants jouent dans le jardin pendant que \
        leurs parents discutent de la pluie et du beau temps.";
    pub const DE: &str = "Der Hund schläft unter dem Tisch und die Katze sitzt auf dem Stuhl. \
        Heute ist das Wetter schön, deshalb gehen wir im Park spazieren. Die Kinder spielen im \
        Garten, während die Eltern über das Wetter sprechen.";
    pub const IT: &str = "Il gatto dorme sul divano e il cane gioca nel giardino. Oggi il tempo \
        è bello e andiamo a fare una passeggiata nel parco. I bambini giocano mentre i genitori \
        parlano del tempo e della cena.";
}

/// A model trained on [`samples`] for en, fr, de and it.
pub fn sample_model() -> Model {
    ModelFixture::new()
        .train("en", samples::EN)
        .train("fr", samples::FR)
        .train("de", samples::DE)
        .train("it", samples::IT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OOV;

    #[test]
    fn trained_grams_are_ranked() {
        let m = ModelFixture::new().train("en", "the the the cat").build();
        assert!(m.has_order(2) && m.has_order(5));
        let common = m.quality("en", "th", 2);
        let rare = m.quality("en", "ca", 2);
        assert!(common < rare);
        assert_eq!(m.quality("en", "zz", 2), OOV);
    }

    #[test]
    fn written_dictionary_is_zstd() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_dictionary(dir.path(), "en", &["Hello", "hello"]);
        assert!(crate::dictionary::codec::is_zstd_file(&p));
    }
}
