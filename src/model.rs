//! Per-order n-gram language model backed by fst maps.
//!
//! Layout of a profiles directory:
//!
//! ```text
//! meta.json[.zst]          {"orders": [...], "SCALE": int, "langs": [...]}
//! {n}/fused.fst.zst        one map per order, key = lang \x01 gram, value = quality byte
//! ```
//!
//! Addon documents and signature tries live in a separate addon directory
//! (see [`addons`]).
pub mod addons;
pub mod ngram;

use crate::dictionary::codec;
use crate::dictionary::{TrieBytes, ValueTrie};
pub use addons::Addons;
use ngram::SEP;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Quality of a gram never observed for a language.
pub const OOV: u8 = 255;
pub const SIGNATURE_ORDERS: [usize; 3] = [2, 3, 4];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model metadata not found or unreadable in {0} (meta.json[.zst])")]
    MetadataMissing(PathBuf),
    #[error("model metadata incomplete, missing keys: {0:?}")]
    MetadataIncomplete(Vec<&'static str>),
    #[error("invalid model configuration: {0}")]
    Config(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid model trie: {0}")]
    Trie(#[from] fst::Error),
}

impl ModelError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub profiles_dir: PathBuf,
    pub addon_dir: Option<PathBuf>,
    /// Where raw tries are written when memory mapping.
    pub cache_dir: Option<PathBuf>,
    pub use_mmap: bool,
    pub signature_orders: Vec<usize>,
}

impl ModelConfig {
    pub fn new(profiles_dir: impl Into<PathBuf>) -> Self {
        Self {
            profiles_dir: profiles_dir.into(),
            addon_dir: None,
            cache_dir: None,
            use_mmap: false,
            signature_orders: SIGNATURE_ORDERS.to_vec(),
        }
    }

    pub fn addon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.addon_dir = Some(dir.into());
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn use_mmap(mut self, yes: bool) -> Self {
        self.use_mmap = yes;
        self
    }

    pub fn signature_orders(mut self, orders: impl Into<Vec<usize>>) -> Self {
        self.signature_orders = orders.into();
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metadata
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub orders: Vec<usize>,
    pub scale: i64,
    pub langs: Vec<String>,
}

/// On-disk shape of `meta.json`; every key optional so absent ones can be named.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMeta {
    orders: Option<Vec<usize>>,
    #[serde(rename = "SCALE")]
    scale: Option<i64>,
    langs: Option<Vec<String>>,
}

impl RawMeta {
    fn is_empty(&self) -> bool {
        self.orders.is_none() && self.scale.is_none() && self.langs.is_none()
    }
}

impl Meta {
    /// Read `meta.json.zst`, falling back to `meta.json`.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let raw = [dir.join("meta.json.zst"), dir.join("meta.json")]
            .iter()
            .map(|p| addons::read_document::<RawMeta>(p))
            .find(|m| !m.is_empty())
            .ok_or_else(|| ModelError::MetadataMissing(dir.to_path_buf()))?;

        match raw {
            RawMeta {
                orders: Some(orders),
                scale: Some(scale),
                langs: Some(langs),
            } => Ok(Meta {
                orders,
                scale,
                langs,
            }),
            RawMeta {
                orders,
                scale,
                langs,
            } => {
                let missing = [
                    ("orders", orders.is_none()),
                    ("SCALE", scale.is_none()),
                    ("langs", langs.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                Err(ModelError::MetadataIncomplete(missing))
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-order tries
// ────────────────────────────────────────────────────────────────────────────

/// Loader for the compressed per-order tries of one directory.
#[derive(Debug)]
pub struct OrderTries<'c> {
    dir: PathBuf,
    file_name: &'static str,
    cache_dir: Option<&'c Path>,
    use_mmap: bool,
}

impl<'c> OrderTries<'c> {
    pub fn profiles(config: &'c ModelConfig) -> Self {
        Self {
            dir: config.profiles_dir.clone(),
            file_name: "fused.fst.zst",
            cache_dir: config.cache_dir.as_deref(),
            use_mmap: config.use_mmap,
        }
    }

    /// Signature tries are small and always decoded into memory.
    pub fn signatures(addon_dir: &Path) -> OrderTries<'static> {
        OrderTries {
            dir: addon_dir.join(addons::SIGNATURE_DIR),
            file_name: "fused.sig.fst.zst",
            cache_dir: None,
            use_mmap: false,
        }
    }

    /// Load the trie of `order`, or `None` when its file does not exist.
    pub fn load(&self, order: usize) -> Result<Option<ValueTrie>, ModelError> {
        let packed = self.dir.join(order.to_string()).join(self.file_name);
        if !packed.is_file() {
            return Ok(None);
        }
        let bytes = if self.use_mmap {
            let cache = self.cache_dir.ok_or_else(|| {
                ModelError::Config("memory mapping requested without a cache dir".into())
            })?;
            let raw_dir = cache.join(order.to_string());
            std::fs::create_dir_all(&raw_dir).map_err(|e| ModelError::io(&raw_dir, e))?;
            let raw = raw_dir.join(self.file_name.trim_end_matches(".zst"));
            tracing::debug!(order, path = %raw.display(), "decompressing model trie for mmap");
            codec::decompress_to_file(&packed, &raw).map_err(|e| ModelError::io(&raw, e))?;
            TrieBytes::map(&raw).map_err(|e| ModelError::io(&raw, e))?
        } else {
            tracing::debug!(order, path = %packed.display(), "decompressing model trie");
            let data = std::fs::read(&packed)
                .and_then(|b| codec::decompress_bytes(&b))
                .map_err(|e| ModelError::io(&packed, e))?;
            TrieBytes::Heap(data)
        };
        Ok(Some(ValueTrie::new(bytes)?))
    }

    /// Load every available order; missing orders are skipped.
    pub fn preload(&self, orders: &[usize]) -> Result<BTreeMap<usize, ValueTrie>, ModelError> {
        let mut out = BTreeMap::new();
        for &n in orders {
            match self.load(n)? {
                Some(t) => {
                    out.insert(n, t);
                }
                None => tracing::debug!(order = n, dir = %self.dir.display(), "order not shipped"),
            }
        }
        Ok(out)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model
// ────────────────────────────────────────────────────────────────────────────

/// Immutable language model. Build once with [`Model::load`] and share it
/// behind an `Arc`.
#[derive(Debug)]
pub struct Model {
    meta: Meta,
    tries: BTreeMap<usize, ValueTrie>,
    signatures: BTreeMap<usize, ValueTrie>,
    pub addons: Addons,
}

impl Model {
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        let meta = Meta::load(&config.profiles_dir)?;
        let tries = OrderTries::profiles(config).preload(&meta.orders)?;

        let (addons, signatures) = match &config.addon_dir {
            Some(dir) => {
                let addons = Addons::load(dir, &meta.langs);
                let signatures = OrderTries::signatures(dir)
                    .preload(&config.signature_orders)
                    .unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "signature tries unreadable; ignoring");
                        BTreeMap::new()
                    });
                (addons, signatures)
            }
            None => (Addons::default(), BTreeMap::new()),
        };

        tracing::debug!(
            langs = meta.langs.len(),
            orders = ?tries.keys().collect::<Vec<_>>(),
            signatures = signatures.len(),
            "language model loaded"
        );
        Ok(Self::from_parts(meta, tries, signatures, addons))
    }

    pub fn from_parts(
        meta: Meta,
        tries: BTreeMap<usize, ValueTrie>,
        signatures: BTreeMap<usize, ValueTrie>,
        addons: Addons,
    ) -> Self {
        Self {
            meta,
            tries,
            signatures,
            addons,
        }
    }

    #[inline]
    pub fn langs(&self) -> &[String] {
        &self.meta.langs
    }

    #[inline]
    pub fn has_lang(&self, lang: &str) -> bool {
        self.meta.langs.iter().any(|l| l == lang)
    }

    /// Orders declared by the metadata, loaded or not.
    pub fn orders(&self) -> &[usize] {
        &self.meta.orders
    }

    pub fn scale(&self) -> i64 {
        self.meta.scale
    }

    pub fn has_order(&self, n: usize) -> bool {
        self.tries.contains_key(&n)
    }

    pub fn has_signatures(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Quantized quality of `gram` for `lang`, or [`OOV`].
    pub fn quality(&self, lang: &str, gram: &str, n: usize) -> u8 {
        let mut key = KeyBuf::default();
        self.quality_with(&mut key, lang, gram, n)
    }

    /// [`Model::quality`] reusing a caller-owned key buffer.
    #[inline]
    pub fn quality_with(&self, key: &mut KeyBuf, lang: &str, gram: &str, n: usize) -> u8 {
        let Some(trie) = self.tries.get(&n) else {
            return OOV;
        };
        trie.get(key.build(lang, gram))
            .map_or(OOV, |v| v.min(OOV as u64) as u8)
    }

    /// Raw signature value of `gram` for `lang` in the order-`n` signature trie.
    pub fn signature_value(&self, lang: &str, gram: &str, n: usize) -> Option<u64> {
        let trie = self.signatures.get(&n)?;
        trie.get(KeyBuf::default().build(lang, gram))
    }
}

/// Reusable buffer for `lang \x01 gram` trie keys.
#[derive(Debug, Default)]
pub struct KeyBuf(String);

impl KeyBuf {
    #[inline]
    pub fn build(&mut self, lang: &str, gram: &str) -> &[u8] {
        self.0.clear();
        self.0.push_str(lang);
        self.0.push(SEP);
        self.0.push_str(gram);
        self.0.as_bytes()
    }
}
