// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines how raw asset bytes are obtained.

use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A source of raw bytes addressed by location.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Returns the full contents at `location`.
    async fn fetch(&self, location: &str) -> anyhow::Result<Vec<u8>>;
}

/// Fetches locations as paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemFetcher {
    root: PathBuf,
}

impl FileSystemFetcher {
    /// Creates a fetcher reading below `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl AssetFetcher for FileSystemFetcher {
    async fn fetch(&self, location: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.root.join(location.trim_start_matches("./"));
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display()))
    }
}

/// Serves locations from memory and counts the fetches it answers.
///
/// Clones share the same contents and counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fetches: Arc<AtomicUsize>,
}

impl MemoryFetcher {
    /// Creates an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` at `location`, replacing previous contents.
    pub fn insert(&self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.into(), bytes.into());
    }

    /// Builder-style [`MemoryFetcher::insert`].
    pub fn with_file(self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }

    /// Number of successful fetches so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetFetcher for MemoryFetcher {
    async fn fetch(&self, location: &str) -> anyhow::Result<Vec<u8>> {
        let key = location.trim_start_matches("./");
        let bytes = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        match bytes {
            Some(bytes) => {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                Ok(bytes)
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no file at '{location}'"),
            ))
            .context("Memory fetch failed"),
        }
    }
}

/// Resolves `uri` against `base`, the directory part of the referencing asset.
///
/// Absolute paths and URIs with a scheme are returned unchanged.
pub fn join_location(base: &str, uri: &str) -> String {
    if uri.starts_with('/') || uri.contains("://") || base.is_empty() || base == "./" {
        return uri.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{uri}")
    } else {
        format!("{base}/{uri}")
    }
}
