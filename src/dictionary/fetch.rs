//! Blocking download of dictionary assets with bounded retries.

use super::DictionaryError;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

pub struct Fetcher {
    client: reqwest::blocking::Client,
    head_timeout: Duration,
    attempts: u32,
    chunk_size: usize,
}

impl Fetcher {
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        head_timeout: Duration,
        attempts: u32,
        chunk_size: usize,
    ) -> Result<Self, DictionaryError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|source| DictionaryError::Download {
                url: String::new(),
                source,
            })?;
        Ok(Self {
            client,
            head_timeout,
            attempts: attempts.max(1),
            chunk_size: chunk_size.max(1),
        })
    }

    /// Advertised size of the remote asset, if the server reports one.
    pub fn content_length(&self, url: &str) -> Option<u64> {
        let response = self
            .client
            .head(url)
            .timeout(self.head_timeout)
            .send()
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.content_length()
    }

    /// Download `url` to `dst`. Each attempt streams into a fresh temp file
    /// next to `dst` and only a complete body is renamed into place.
    pub fn download(&self, url: &str, dst: &Path) -> Result<(), DictionaryError> {
        let mut last = String::new();
        for attempt in 1..=self.attempts {
            match self.try_once(url, dst) {
                Ok(bytes) => {
                    tracing::info!(url, bytes, path = %dst.display(), "download complete");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(url, attempt, attempts = self.attempts, error = %e, "download failed");
                    last = e.to_string();
                }
            }
        }
        Err(DictionaryError::DictionaryUnavailable {
            asset: url.to_owned(),
            reason: last,
        })
    }

    fn try_once(&self, url: &str, dst: &Path) -> Result<u64, DictionaryError> {
        let download_err = |source| DictionaryError::Download {
            url: url.to_owned(),
            source,
        };
        let dir = dst.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| DictionaryError::io(dir, e))?;

        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(download_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DictionaryError::io(dir, e))?;
        let mut buf = vec![0u8; self.chunk_size];
        let mut written = 0u64;
        loop {
            let n = response
                .read(&mut buf)
                .map_err(|e| DictionaryError::io(dst, e))?;
            if n == 0 {
                break;
            }
            tmp.write_all(&buf[..n])
                .map_err(|e| DictionaryError::io(tmp.path(), e))?;
            written += n as u64;
        }
        if let Some(total) = response.content_length()
            && total != written
        {
            return Err(DictionaryError::DictionaryUnavailable {
                asset: url.to_owned(),
                reason: format!("truncated body: {written} of {total} bytes"),
            });
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| DictionaryError::io(tmp.path(), e))?;
        tmp.persist(dst)
            .map_err(|e| DictionaryError::io(dst, e.error))?;
        Ok(written)
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("attempts", &self.attempts)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}
