// SPDX-License-Identifier: MIT

//! Test fakes, gated behind the `test-support` feature so production builds
//! never link them in.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::UrlError;
use crate::url::{Url, UrlBackend};

/// In-memory [`UrlBackend`] fake: files live in a `HashMap` keyed by the
/// URL's display string, directories are tracked by prefix. Lets compiler
/// and executor tests exercise put/get/exists/remove_dir without touching a
/// real filesystem or shelling out to `s3cmd`/`hadoop`/`curl`.
#[derive(Default)]
pub struct InMemoryUrlBackend {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryUrlBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file directly, bypassing `put`, for test setup.
    pub fn seed(&self, url: &Url, contents: impl Into<Vec<u8>>) {
        self.files
            .lock()
            .insert(url.to_display().to_string(), contents.into());
    }

    pub fn read(&self, url: &Url) -> Option<Vec<u8>> {
        self.files.lock().get(url.to_display()).cloned()
    }
}

#[async_trait::async_trait]
impl UrlBackend for InMemoryUrlBackend {
    async fn exists(&self, url: &Url) -> Result<bool, UrlError> {
        let key = url.to_display();
        let files = self.files.lock();
        Ok(files.contains_key(key) || files.keys().any(|k| k.starts_with(&format!("{key}/"))))
    }

    async fn is_dir(&self, url: &Url) -> Result<bool, UrlError> {
        let key = format!("{}/", url.to_display());
        Ok(self.files.lock().keys().any(|k| k.starts_with(&key)))
    }

    async fn put(&self, local: &std::path::Path, url: &Url) -> Result<(), UrlError> {
        let contents = std::fs::read(local)
            .map_err(|_| UrlError::NotFound(local.display().to_string()))?;
        self.files
            .lock()
            .insert(url.to_display().to_string(), contents);
        Ok(())
    }

    async fn get(&self, url: &Url, dest_dir: &std::path::Path) -> Result<(), UrlError> {
        let contents = self
            .files
            .lock()
            .get(url.to_display())
            .cloned()
            .ok_or_else(|| UrlError::NotFound(url.to_display().to_string()))?;
        std::fs::create_dir_all(dest_dir).map_err(|e| UrlError::Transport {
            url: url.to_display().to_string(),
            source: Box::new(e),
        })?;
        std::fs::write(dest_dir.join(url.basename()), contents).map_err(|e| {
            UrlError::Transport {
                url: url.to_display().to_string(),
                source: Box::new(e),
            }
        })
    }

    async fn remove_dir(&self, url: &Url) -> Result<(), UrlError> {
        let prefix = format!("{}/", url.to_display());
        self.files
            .lock()
            .retain(|k, _| k != url.to_display() && !k.starts_with(&prefix));
        Ok(())
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
