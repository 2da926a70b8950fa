//! Immutable fst tries over heap or memory-mapped bytes.

use fst::{Map, Set};
use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::Path;

/// Backing storage of a trie.
pub enum TrieBytes {
    Heap(Vec<u8>),
    Mapped(Mmap),
}

impl AsRef<[u8]> for TrieBytes {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        match self {
            TrieBytes::Heap(v) => v,
            TrieBytes::Mapped(m) => m,
        }
    }
}

impl TrieBytes {
    /// Memory-map `path` read-only.
    pub fn map(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        // SAFETY: asset files are written once through an atomic rename and
        // never modified in place afterwards.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(TrieBytes::Mapped(mmap))
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        Ok(TrieBytes::Heap(std::fs::read(path)?))
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, TrieBytes::Mapped(_))
    }
}

impl std::fmt::Debug for TrieBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrieBytes::Heap(v) => write!(f, "Heap({} bytes)", v.len()),
            TrieBytes::Mapped(m) => write!(f, "Mapped({} bytes)", m.len()),
        }
    }
}

/// Membership-only word trie.
pub struct WordTrie {
    set: Set<TrieBytes>,
}

impl WordTrie {
    pub fn new(bytes: TrieBytes) -> Result<Self, fst::Error> {
        Ok(Self {
            set: Set::new(bytes)?,
        })
    }

    /// Build from arbitrary (unsorted, possibly duplicated) words.
    pub fn from_words<I, S>(words: I) -> Result<Self, fst::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys: Vec<String> = words.into_iter().map(|w| w.as_ref().to_owned()).collect();
        keys.sort_unstable();
        keys.dedup();
        let set = Set::from_iter(keys)?;
        Self::new(TrieBytes::Heap(set.into_fst().into_inner()))
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        !key.is_empty() && self.set.contains(key)
    }

    /// Longest non-empty key that is a prefix of `text`.
    pub fn longest_prefix<'t>(&self, text: &'t str) -> Option<&'t str> {
        let fst = self.set.as_fst();
        let mut node = fst.root();
        let mut best = None;
        for (i, &b) in text.as_bytes().iter().enumerate() {
            let Some(t) = node.find_input(b) else {
                break;
            };
            node = fst.node(node.transition(t).addr);
            if node.is_final() && text.is_char_boundary(i + 1) {
                best = Some(i + 1);
            }
        }
        best.map(|end| &text[..end])
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_mapped(&self) -> bool {
        self.set.as_fst().as_inner().is_mapped()
    }
}

impl std::fmt::Debug for WordTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordTrie")
            .field("len", &self.len())
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

/// Trie from key to a small integer value (quality byte or signature weight).
pub struct ValueTrie {
    map: Map<TrieBytes>,
}

impl ValueTrie {
    pub fn new(bytes: TrieBytes) -> Result<Self, fst::Error> {
        Ok(Self {
            map: Map::new(bytes)?,
        })
    }

    /// Build from `(key, value)` pairs in any order; later duplicates win.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, fst::Error>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: AsRef<[u8]>,
    {
        let mut entries: Vec<(Vec<u8>, u64)> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_vec(), v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|later, earlier| {
            if later.0 == earlier.0 {
                earlier.1 = later.1;
                true
            } else {
                false
            }
        });
        let map = Map::from_iter(entries)?;
        Self::new(TrieBytes::Heap(map.into_fst().into_inner()))
    }

    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for ValueTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueTrie").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_and_longest_prefix() {
        let trie = WordTrie::from_words(["東京", "東京都", "都", "hello"]).unwrap();
        assert!(trie.contains("東京"));
        assert!(!trie.contains("東"));
        assert!(!trie.contains(""));
        assert_eq!(trie.longest_prefix("東京都に住む"), Some("東京都"));
        assert_eq!(trie.longest_prefix("東京に"), Some("東京"));
        assert_eq!(trie.longest_prefix("大阪"), None);
        assert_eq!(trie.longest_prefix("helloworld"), Some("hello"));
        assert_eq!(trie.len(), 4);
    }

    #[test]
    fn value_trie_keeps_last_duplicate() {
        let trie = ValueTrie::from_pairs([("b", 2u64), ("a", 1), ("b", 3)]).unwrap();
        assert_eq!(trie.get(b"a"), Some(1));
        assert_eq!(trie.get(b"b"), Some(3));
        assert_eq!(trie.get(b"c"), None);
    }

    #[test]
    fn mapped_bytes_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.fst");
        let set = Set::from_iter(["alpha", "beta"]).unwrap();
        std::fs::write(&path, set.as_fst().as_bytes()).unwrap();
        let trie = WordTrie::new(TrieBytes::map(&path).unwrap()).unwrap();
        assert!(trie.is_mapped());
        assert!(trie.contains("beta"));
    }
}
