//! zstd container handling and integrity checks for downloaded assets.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tempfile::NamedTempFile;

/// zstd frame magic number.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

#[inline]
pub fn has_zstd_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZSTD_MAGIC)
}

/// True when the first four bytes of `path` are the zstd magic. Unreadable
/// files are reported as not zstd.
pub fn is_zstd_file(path: &Path) -> bool {
    let mut head = [0u8; 4];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut head))
        .is_ok()
        && head == ZSTD_MAGIC
}

pub fn decompress_bytes(src: &[u8]) -> io::Result<Vec<u8>> {
    zstd::decode_all(src)
}

/// Stream-decompress `src` into `dst`. The output is written to a temporary
/// file beside `dst`, synced, then renamed over it. A damaged stream is
/// reported as [`io::ErrorKind::InvalidData`] and leaves `dst` untouched.
pub fn decompress_to_file(src: &Path, dst: &Path) -> io::Result<()> {
    let dir = dst.parent().unwrap_or_else(|| Path::new("."));
    let input = BufReader::new(File::open(src)?);
    let mut tmp = NamedTempFile::new_in(dir)?;
    zstd::stream::copy_decode(input, tmp.as_file_mut())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    tmp.as_file().sync_all()?;
    tmp.persist(dst).map_err(|e| e.error)?;
    Ok(())
}

/// Read a file that may or may not be zstd-compressed. Compression is
/// detected by magic, or assumed for a `.zst` suffix.
pub fn read_maybe_compressed(path: &Path) -> io::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    let suffixed = path.extension().is_some_and(|e| e == "zst");
    if has_zstd_magic(&bytes) || suffixed {
        return decompress_bytes(&bytes);
    }
    Ok(bytes)
}

/// Lowercase hex CRC-32 of a file's contents.
pub fn crc32_file(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:08x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_detection() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.zst");
        std::fs::write(&good, zstd::encode_all(&b"payload"[..], 3).unwrap()).unwrap();
        assert!(is_zstd_file(&good));

        let bad = dir.path().join("b.zst");
        std::fs::write(&bad, b"<html>").unwrap();
        assert!(!is_zstd_file(&bad));
        assert!(!is_zstd_file(&dir.path().join("missing")));
    }

    #[test]
    fn decompress_to_memory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("w.fst.zst");
        std::fs::write(&src, zstd::encode_all(&b"hello trie"[..], 3).unwrap()).unwrap();

        let bytes = std::fs::read(&src).unwrap();
        assert_eq!(decompress_bytes(&bytes).unwrap(), b"hello trie");

        let dst = dir.path().join("w.fst");
        decompress_to_file(&src, &dst).unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"hello trie");
    }

    #[test]
    fn plain_and_compressed_documents() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("a.json");
        std::fs::write(&plain, b"{}").unwrap();
        assert_eq!(read_maybe_compressed(&plain).unwrap(), b"{}");

        let packed = dir.path().join("b.json");
        std::fs::write(&packed, zstd::encode_all(&b"[1]"[..], 3).unwrap()).unwrap();
        assert_eq!(read_maybe_compressed(&packed).unwrap(), b"[1]");
    }

    #[test]
    fn crc_matches_one_shot_hash() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("x");
        std::fs::write(&p, b"123456789").unwrap();
        assert_eq!(crc32_file(&p).unwrap(), "cbf43926");
        assert_eq!(
            crc32_file(&p).unwrap(),
            format!("{:08x}", crc32fast::hash(b"123456789"))
        );
    }
}
