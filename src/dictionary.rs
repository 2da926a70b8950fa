//! Per-language spelling dictionaries: resolution, download, integrity
//! checks, decompression and a shared in-process cache.
//!
//! Asset layout under the data directory, for a dictionary base name `b`:
//!
//! ```text
//! b.fst.zst   compressed asset (downloaded or shipped)
//! b.fst       raw trie, materialized on demand for memory mapping
//! .b.lock     advisory lock serializing first-time download/decompression
//! ```
pub mod codec;
pub mod fetch;
pub mod lock;
pub mod trie;

use crate::lang::{Resolution, resolve};
use fetch::Fetcher;
use lock::AssetLock;
use parking_lot::Mutex;
use phf::{Map, phf_map};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
pub use trie::{TrieBytes, ValueTrie, WordTrie};

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("unsupported language for spell-check: `{0}`")]
    UnsupportedLanguage(String),
    #[error("dictionary not found: {0} (network download disabled)")]
    DictionaryMissing(PathBuf),
    #[error("dictionary asset `{asset}` unavailable: {reason}")]
    DictionaryUnavailable { asset: String, reason: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid trie: {0}")]
    Trie(#[from] fst::Error),
    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no data directory: set GLOTTA_DATA_DIR or pass an explicit directory")]
    NoDataDir,
}

impl DictionaryError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Registered dictionaries: resolved language key to asset base name.
pub static DICTIONARY_ASSETS: Map<&'static str, &'static str> = phf_map! {
    "af" => "af", "ar" => "ar", "bg" => "bg", "bn" => "bn", "ca" => "ca",
    "cs" => "cs", "cy" => "cy", "da" => "da", "de" => "de", "el" => "el",
    "en" => "en", "en_gb" => "en_GB", "eo" => "eo", "es" => "es", "et" => "et",
    "eu" => "eu", "fa" => "fa", "fi" => "fi", "fr" => "fr", "ga" => "ga",
    "gl" => "gl", "gu_in" => "gu_IN", "he" => "he", "hi" => "hi", "hr" => "hr",
    "hu" => "hu", "hy" => "hy", "id" => "id", "is" => "is", "it" => "it",
    "ja" => "ja", "ka" => "ka", "ko" => "ko", "lt" => "lt", "lv" => "lv",
    "mk" => "mk", "ml" => "ml", "mn" => "mn", "nb" => "nb", "nl" => "nl",
    "nn" => "nn", "pl" => "pl", "pt" => "pt", "pt_br" => "pt_BR", "ro" => "ro",
    "ru" => "ru", "sk" => "sk", "sl" => "sl", "sq" => "sq", "sr" => "sr",
    "sv" => "sv", "sw" => "sw", "ta" => "ta", "te" => "te", "th" => "th",
    "tr" => "tr", "uk" => "uk", "ur" => "ur", "vi" => "vi", "zh" => "zh",
};

pub const DATA_DIR_ENV: [&str; 3] = ["GLOTTA_DATA_DIR", "GLOTTA_DICT_DIR", "GLOTTA_HOME"];
pub const REMOTE_BASE_ENV: &str = "GLOTTA_REMOTE_BASE";
pub const CHECKSUMS_FILE: &str = "checksums.json";

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StoreConfig {
    data_dir: Option<PathBuf>,
    allow_network: bool,
    use_mmap: bool,
    remote_base: Option<String>,
    user_agent: String,
    timeout: Duration,
    head_timeout: Duration,
    attempts: u32,
    chunk_size: usize,
    extra_assets: HashMap<String, String>,
    checksums: HashMap<String, String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            allow_network: true,
            use_mmap: false,
            remote_base: None,
            user_agent: concat!("glotta/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Duration::from_secs(60),
            head_timeout: Duration::from_secs(20),
            attempts: 3,
            chunk_size: 64 * 1024,
            extra_assets: HashMap::new(),
            checksums: HashMap::new(),
        }
    }
}

impl StoreConfig {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn allow_network(mut self, allow: bool) -> Self {
        self.allow_network = allow;
        self
    }

    pub fn use_mmap(mut self, mmap: bool) -> Self {
        self.use_mmap = mmap;
        self
    }

    pub fn remote_base(mut self, url: impl Into<String>) -> Self {
        self.remote_base = Some(url.into());
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn head_timeout(mut self, timeout: Duration) -> Self {
        self.head_timeout = timeout;
        self
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes;
        self
    }

    /// Register (or override) the asset base name for a language key.
    pub fn register_asset(mut self, lang: &str, base: impl Into<String>) -> Self {
        self.extra_assets.insert(lang.to_lowercase(), base.into());
        self
    }

    /// Expected CRC-32 (lowercase hex) for an asset file name.
    pub fn checksum(mut self, file: impl Into<String>, crc32: impl Into<String>) -> Self {
        self.checksums.insert(file.into(), crc32.into());
        self
    }

    pub fn build(self) -> DictionaryStore {
        DictionaryStore::new(self)
    }

    fn asset_base(&self, key: &str) -> Option<&str> {
        self.extra_assets
            .get(key)
            .map(String::as_str)
            .or_else(|| DICTIONARY_ASSETS.get(key).copied())
    }

    fn is_registered(&self, key: &str) -> bool {
        self.asset_base(key).is_some()
    }

    fn resolved_remote_base(&self) -> Option<String> {
        self.remote_base
            .clone()
            .or_else(|| std::env::var(REMOTE_BASE_ENV).ok())
            .filter(|s| !s.is_empty())
    }
}

/// Resolve the data directory: explicit override, then the environment
/// variables in [`DATA_DIR_ENV`] order, then the platform data dir.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, DictionaryError> {
    data_dir_from(explicit, |var| std::env::var(var).ok(), dirs::data_dir())
}

fn data_dir_from(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    platform: Option<PathBuf>,
) -> Result<PathBuf, DictionaryError> {
    let chosen = explicit.map(Path::to_path_buf).or_else(|| {
        DATA_DIR_ENV
            .iter()
            .find_map(|var| env(var).filter(|v| !v.is_empty()))
            .map(PathBuf::from)
    });
    let dir = match chosen {
        Some(dir) => dir,
        None => platform.ok_or(DictionaryError::NoDataDir)?.join("glotta"),
    };
    std::path::absolute(&dir).map_err(|e| DictionaryError::io(&dir, e))
}

// ────────────────────────────────────────────────────────────────────────────
// Dictionary handle
// ────────────────────────────────────────────────────────────────────────────

/// One loaded spelling dictionary. Keys are stored in dictionary-key form;
/// callers normalize before querying.
#[derive(Debug)]
pub struct Dictionary {
    lang: String,
    trie: WordTrie,
}

impl Dictionary {
    pub fn new(lang: impl Into<String>, trie: WordTrie) -> Self {
        Self {
            lang: lang.into(),
            trie,
        }
    }

    pub fn from_words<I, S>(lang: impl Into<String>, words: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::new(lang, WordTrie::from_words(words)?))
    }

    /// Load a trie file directly: `.zst` assets are decompressed into memory,
    /// raw tries are mapped or read according to `use_mmap`.
    pub fn from_file(
        lang: impl Into<String>,
        path: &Path,
        use_mmap: bool,
    ) -> Result<Self, DictionaryError> {
        let bytes = if codec::is_zstd_file(path) {
            let packed = std::fs::read(path).map_err(|e| DictionaryError::io(path, e))?;
            TrieBytes::Heap(codec::decompress_bytes(&packed).map_err(|e| DictionaryError::io(path, e))?)
        } else if use_mmap {
            TrieBytes::map(path).map_err(|e| DictionaryError::io(path, e))?
        } else {
            TrieBytes::read(path).map_err(|e| DictionaryError::io(path, e))?
        };
        Ok(Self::new(lang, WordTrie::new(bytes)?))
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.trie.contains(key)
    }

    #[inline]
    pub fn longest_prefix<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.trie.longest_prefix(text)
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn is_mapped(&self) -> bool {
        self.trie.is_mapped()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

/// Shared, lazily populated dictionary cache. Clone the surrounding `Arc`
/// to share it between analyzers.
pub struct DictionaryStore {
    config: StoreConfig,
    cache: Mutex<HashMap<String, Arc<Dictionary>>>,
}

impl std::fmt::Debug for DictionaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictionaryStore")
            .field("config", &self.config)
            .field("cached", &self.cached_languages())
            .finish()
    }
}

struct AssetPaths {
    file: String,
    packed: PathBuf,
    raw: PathBuf,
    lock: PathBuf,
}

impl AssetPaths {
    fn new(dir: &Path, base: &str) -> Self {
        let file = format!("{base}.fst.zst");
        Self {
            packed: dir.join(&file),
            raw: dir.join(format!("{base}.fst")),
            lock: dir.join(format!(".{base}.lock")),
            file,
        }
    }
}

fn non_empty(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

impl DictionaryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Resolve a user-supplied code to a registered dictionary key.
    pub fn resolve(&self, lang: &str) -> Resolution {
        resolve(lang, |k| self.config.is_registered(k))
    }

    pub fn data_dir(&self) -> Result<PathBuf, DictionaryError> {
        resolve_data_dir(self.config.data_dir.as_deref())
    }

    pub fn is_cached(&self, lang: &str) -> bool {
        match self.resolve(lang) {
            Resolution::Resolved(key) => self.cache.lock().contains_key(&key),
            Resolution::Unsupported => false,
        }
    }

    pub fn cached_languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self.cache.lock().keys().cloned().collect();
        langs.sort_unstable();
        langs
    }

    /// Insert an already built dictionary under its resolved key, keeping
    /// any entry that is already cached.
    pub fn insert(&self, dict: Dictionary) -> Arc<Dictionary> {
        let key = dict.lang().to_lowercase();
        self.cache
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(dict))
            .clone()
    }

    /// Load (or fetch from cache) the dictionary for `lang`.
    pub fn load(&self, lang: &str) -> Result<Arc<Dictionary>, DictionaryError> {
        let Resolution::Resolved(key) = self.resolve(lang) else {
            return Err(DictionaryError::UnsupportedLanguage(lang.to_owned()));
        };
        if let Some(hit) = self.cache.lock().get(&key) {
            tracing::debug!(lang = %key, "dictionary cache hit");
            return Ok(Arc::clone(hit));
        }
        let base = self
            .config
            .asset_base(&key)
            .ok_or_else(|| DictionaryError::UnsupportedLanguage(lang.to_owned()))?
            .to_owned();

        let dir = self.data_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| DictionaryError::io(&dir, e))?;
        tracing::debug!(dir = %dir.display(), "dictionary data dir");

        let paths = AssetPaths::new(&dir, &base);
        let dict = self.materialize(&key, &dir, &paths)?;

        let mut cache = self.cache.lock();
        Ok(cache.entry(key).or_insert_with(|| Arc::new(dict)).clone())
    }

    fn materialize(
        &self,
        key: &str,
        dir: &Path,
        paths: &AssetPaths,
    ) -> Result<Dictionary, DictionaryError> {
        let use_mmap = self.config.use_mmap;

        if non_empty(&paths.raw) {
            tracing::debug!(path = %paths.raw.display(), mmap = use_mmap, "loading raw trie");
            return match Dictionary::from_file(key, &paths.raw, use_mmap) {
                Err(DictionaryError::Trie(e)) => Err(discard(paths, format!("corrupt trie: {e}"))),
                other => other,
            };
        }

        if !paths.packed.exists() {
            self.fetch(paths)?;
        }

        if !codec::is_zstd_file(&paths.packed) {
            tracing::warn!(path = %paths.packed.display(), "invalid zstd asset; deleting");
            remove_quietly(&paths.packed);
            return Err(DictionaryError::DictionaryUnavailable {
                asset: paths.file.clone(),
                reason: "not a zstd stream".into(),
            });
        }

        if let Some(expected) = self.expected_checksum(dir, &paths.file) {
            let actual =
                codec::crc32_file(&paths.packed).map_err(|e| DictionaryError::io(&paths.packed, e))?;
            if !actual.eq_ignore_ascii_case(&expected) {
                tracing::warn!(file = %paths.file, %expected, %actual, "checksum mismatch; deleting");
                remove_quietly(&paths.packed);
                return Err(DictionaryError::DictionaryUnavailable {
                    asset: paths.file.clone(),
                    reason: format!("checksum mismatch (expected {expected}, got {actual})"),
                });
            }
        }

        if use_mmap && !non_empty(&paths.raw) {
            let _guard =
                AssetLock::acquire(&paths.lock).map_err(|e| DictionaryError::io(&paths.lock, e))?;
            if !non_empty(&paths.raw) {
                tracing::debug!(path = %paths.raw.display(), "decompressing for mmap");
                match codec::decompress_to_file(&paths.packed, &paths.raw) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                        return Err(discard(paths, format!("damaged zstd stream: {e}")));
                    }
                    Err(e) => return Err(DictionaryError::io(&paths.raw, e)),
                }
            }
        }

        let bytes = if use_mmap {
            TrieBytes::map(&paths.raw).map_err(|e| DictionaryError::io(&paths.raw, e))?
        } else {
            tracing::debug!(path = %paths.packed.display(), "decompressing into memory");
            let packed =
                std::fs::read(&paths.packed).map_err(|e| DictionaryError::io(&paths.packed, e))?;
            match codec::decompress_bytes(&packed) {
                Ok(raw) => TrieBytes::Heap(raw),
                Err(e) => return Err(discard(paths, format!("damaged zstd stream: {e}"))),
            }
        };
        match WordTrie::new(bytes) {
            Ok(trie) => Ok(Dictionary::new(key, trie)),
            Err(e) => Err(discard(paths, format!("corrupt trie: {e}"))),
        }
    }

    fn fetch(&self, paths: &AssetPaths) -> Result<(), DictionaryError> {
        let remote = match self.config.resolved_remote_base() {
            Some(base) if self.config.allow_network => base,
            _ => return Err(DictionaryError::DictionaryMissing(paths.packed.clone())),
        };
        let url = format!("{}/{}", remote.trim_end_matches('/'), paths.file);
        let fetcher = Fetcher::new(
            &self.config.user_agent,
            self.config.timeout,
            self.config.head_timeout,
            self.config.attempts,
            self.config.chunk_size,
        )?;
        let size_mb = fetcher.content_length(&url).unwrap_or(0) as f64 / (1024.0 * 1024.0);
        tracing::info!(%url, dest = %paths.packed.display(), size_mb = %format!("{size_mb:.1}"), "downloading dictionary");

        let _guard = AssetLock::acquire(&paths.lock).map_err(|e| DictionaryError::io(&paths.lock, e))?;
        if !paths.packed.exists() {
            fetcher.download(&url, &paths.packed)?;
        }
        Ok(())
    }

    fn expected_checksum(&self, dir: &Path, file: &str) -> Option<String> {
        if let Some(c) = self.config.checksums.get(file) {
            return Some(c.clone());
        }
        let table = dir.join(CHECKSUMS_FILE);
        let text = std::fs::read_to_string(&table).ok()?;
        match serde_json::from_str::<HashMap<String, String>>(&text) {
            Ok(mut map) => map.remove(file),
            Err(e) => {
                tracing::warn!(path = %table.display(), error = %e, "unreadable checksum table");
                None
            }
        }
    }
}

/// Delete both copies of a damaged asset so the next load starts over.
fn discard(paths: &AssetPaths, reason: String) -> DictionaryError {
    tracing::warn!(file = %paths.file, %reason, "damaged dictionary asset; deleting");
    remove_quietly(&paths.raw);
    remove_quietly(&paths.packed);
    DictionaryError::DictionaryUnavailable {
        asset: paths.file.clone(),
        reason,
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to delete asset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn offline(dir: &Path) -> DictionaryStore {
        StoreConfig::builder()
            .data_dir(dir)
            .allow_network(false)
            .build()
    }

    #[test]
    fn registry_resolution() {
        let store = offline(Path::new("/nonexistent"));
        assert_eq!(store.resolve("pt_BR"), Resolution::Resolved("pt_br".into()));
        assert_eq!(store.resolve("pt-PT"), Resolution::Resolved("pt".into()));
        assert_eq!(store.resolve("GU_in"), Resolution::Resolved("gu_in".into()));
        assert_eq!(store.resolve("xx"), Resolution::Unsupported);
        assert!(matches!(
            store.load("xx"),
            Err(DictionaryError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn data_dir_precedence() {
        let env = |var: &str| (var == "GLOTTA_DICT_DIR").then(|| "/tmp/dicts".to_owned());
        let dir = data_dir_from(None, env, None).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/dicts"));
        let dir = data_dir_from(Some(Path::new("/x")), env, None).unwrap();
        assert_eq!(dir, PathBuf::from("/x"));
        let dir = data_dir_from(None, |_| None, Some(PathBuf::from("/home/u/.local/share"))).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.local/share/glotta"));
        assert!(matches!(
            data_dir_from(None, |_| None, None),
            Err(DictionaryError::NoDataDir)
        ));
    }

    #[test]
    fn explicit_remote_base_wins() {
        let cfg = StoreConfig::builder().remote_base("https://dicts.example/v1/");
        assert_eq!(
            cfg.resolved_remote_base().as_deref(),
            Some("https://dicts.example/v1/")
        );
    }

    #[test]
    fn missing_asset_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let err = offline(dir.path()).load("en").unwrap_err();
        assert!(matches!(err, DictionaryError::DictionaryMissing(p) if p.ends_with("en.fst.zst")));
    }

    #[test]
    fn loads_in_memory_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_dictionary(dir.path(), "en", &["hello", "world"]);
        let store = offline(dir.path());
        let a = store.load("en_US").unwrap();
        assert!(a.contains("hello"));
        assert!(!a.is_mapped());
        assert!(store.is_cached("en"));
        let b = store.load("en").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.cached_languages(), ["en"]);
        assert!(!dir.path().join("en.fst").exists());
    }

    #[test]
    fn mmap_materializes_raw_trie() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_dictionary(dir.path(), "it", &["ciao"]);
        let store = StoreConfig::builder()
            .data_dir(dir.path())
            .allow_network(false)
            .use_mmap(true)
            .build();
        let d = store.load("it").unwrap();
        assert!(d.is_mapped());
        assert!(d.contains("ciao"));
        assert!(dir.path().join("it.fst").exists());

        // A second store picks up the raw file directly.
        let again = offline(dir.path()).load("it").unwrap();
        assert!(again.contains("ciao"));
    }

    #[test]
    fn corrupted_asset_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.fst.zst");
        std::fs::write(&path, b"<html>not found</html>").unwrap();
        let err = offline(dir.path()).load("de").unwrap_err();
        assert!(matches!(err, DictionaryError::DictionaryUnavailable { .. }));
        assert!(!path.exists());
    }

    fn truncated_english(dir: &Path) -> PathBuf {
        let path = fixtures::write_dictionary(dir, "en", &["hello", "world", "again"]);
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        path
    }

    #[test]
    fn truncated_asset_is_unavailable_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let path = truncated_english(dir.path());
        assert!(codec::is_zstd_file(&path));
        let err = offline(dir.path()).load("en").unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::DictionaryUnavailable { ref asset, .. } if asset == "en.fst.zst"
        ));
        assert!(!path.exists());
        assert!(!dir.path().join("en.fst").exists());
    }

    #[test]
    fn truncated_asset_leaves_no_raw_file_for_mmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = truncated_english(dir.path());
        let store = StoreConfig::builder()
            .data_dir(dir.path())
            .allow_network(false)
            .use_mmap(true)
            .build();
        let err = store.load("en").unwrap_err();
        assert!(matches!(err, DictionaryError::DictionaryUnavailable { .. }));
        assert!(!path.exists());
        assert!(!dir.path().join("en.fst").exists());
        assert!(!store.is_cached("en"));
    }

    #[test]
    fn corrupt_trie_body_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.fst.zst");
        let packed = zstd::encode_all(&b"definitely not an fst"[..], 3).unwrap();
        std::fs::write(&path, packed).unwrap();
        let err = offline(dir.path()).load("en").unwrap_err();
        assert!(matches!(err, DictionaryError::DictionaryUnavailable { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_raw_trie_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("en.fst");
        std::fs::write(&raw, b"garbage bytes").unwrap();
        let err = offline(dir.path()).load("en").unwrap_err();
        assert!(matches!(err, DictionaryError::DictionaryUnavailable { .. }));
        assert!(!raw.exists());
    }

    #[test]
    fn checksum_mismatch_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_dictionary(dir.path(), "fr", &["bonjour"]);
        std::fs::write(
            dir.path().join(CHECKSUMS_FILE),
            r#"{"fr.fst.zst": "00000000"}"#,
        )
        .unwrap();
        let err = offline(dir.path()).load("fr").unwrap_err();
        assert!(matches!(err, DictionaryError::DictionaryUnavailable { .. }));
        assert!(!dir.path().join("fr.fst.zst").exists());
    }

    #[test]
    fn matching_checksum_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_dictionary(dir.path(), "fr", &["bonjour"]);
        let crc = codec::crc32_file(&path).unwrap();
        let store = StoreConfig::builder()
            .data_dir(dir.path())
            .allow_network(false)
            .checksum("fr.fst.zst", crc)
            .build();
        assert!(store.load("fr").unwrap().contains("bonjour"));
    }

    #[test]
    fn extra_registration() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_dictionary(dir.path(), "la", &["salve"]);
        let store = StoreConfig::builder()
            .data_dir(dir.path())
            .allow_network(false)
            .register_asset("la", "la")
            .build();
        assert!(store.load("la").unwrap().contains("salve"));
    }
}
