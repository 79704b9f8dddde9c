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

//! A process-wide, write-once cache of loaded assets keyed by location.

use armature_core::asset::{Asset, AssetHandle, LoadError};
use armature_core::scene::ParsedAsset;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::sync::OnceCell;

type Slot<A> = Arc<OnceCell<Result<AssetHandle<A>, LoadError>>>;

/// A cache mapping a location to the in-flight or completed load of that location.
///
/// The slot for a key is inserted before the load starts, so concurrent requesters
/// of the same key wait on the same load instead of starting their own. Entries are
/// never evicted or overwritten, and failed loads are kept: a later request for the
/// same key observes the same error.
pub struct AssetCache<A: Asset> {
    entries: Mutex<HashMap<String, Slot<A>>>,
}

static GLOBAL: OnceLock<Arc<AssetCache<ParsedAsset>>> = OnceLock::new();

impl AssetCache<ParsedAsset> {
    /// Returns the process-wide scene cache, created empty on first use.
    pub fn global() -> Arc<Self> {
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }
}

impl<A: Asset> AssetCache<A> {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the asset stored under `key`, running `load` only if no load for that key
    /// was ever started.
    ///
    /// If the future driving the first load is dropped before completion, the next
    /// waiter runs its own `load`.
    pub async fn fetch_or_load<F, Fut>(&self, key: &str, load: F) -> Result<AssetHandle<A>, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<A>>,
    {
        let slot = {
            let mut entries = self.lock();
            match entries.get(key) {
                Some(slot) => {
                    if slot.initialized() {
                        log::trace!("Asset cache hit for '{key}'.");
                    } else {
                        log::trace!("Asset cache hit for '{key}' (load in flight).");
                    }
                    slot.clone()
                }
                None => {
                    log::debug!("Asset cache miss for '{key}', starting load.");
                    let slot = Slot::<A>::default();
                    entries.insert(key.to_string(), slot.clone());
                    slot
                }
            }
        };

        slot.get_or_init(|| async move {
            match load().await {
                Ok(asset) => Ok(AssetHandle::new(asset)),
                Err(e) => {
                    let error = fold_error(key, &e);
                    log::error!("Loading '{key}' failed: {e:#}");
                    Err(error)
                }
            }
        })
        .await
        .clone()
    }

    /// Returns `true` if a load for `key` was ever started.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of keys ever requested.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was ever requested.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot<A>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Asset> Default for AssetCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

fn fold_error(key: &str, error: &anyhow::Error) -> LoadError {
    let not_found = error.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    });
    if not_found {
        LoadError::NotFound {
            location: key.to_string(),
        }
    } else {
        LoadError::Failed {
            location: key.to_string(),
            reason: format!("{error:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, PartialEq)]
    struct Blob(u32);
    impl Asset for Blob {}

    async fn slow_load(counter: &AtomicUsize, value: u32) -> anyhow::Result<Blob> {
        counter.fetch_add(1, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        Ok(Blob(value))
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_load() {
        // --- 1. SETUP ---
        let cache = AssetCache::<Blob>::new();
        let counter = AtomicUsize::new(0);

        // --- 2. ACTION ---
        let (a, b) = tokio::join!(
            cache.fetch_or_load("models/avatar.glb", || slow_load(&counter, 1)),
            cache.fetch_or_load("models/avatar.glb", || slow_load(&counter, 2)),
        );

        // --- 3. ASSERTIONS ---
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(AssetHandle::ptr_eq(&a, &b));
        assert_eq!(*a, Blob(1));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_load_separately() {
        let cache = AssetCache::<Blob>::new();
        let counter = AtomicUsize::new(0);

        let a = cache.fetch_or_load("a.glb", || slow_load(&counter, 1)).await;
        let b = cache.fetch_or_load("b.glb", || slow_load(&counter, 2)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(*a.unwrap(), Blob(1));
        assert_eq!(*b.unwrap(), Blob(2));
    }

    #[tokio::test]
    async fn test_failures_are_retained() {
        // --- 1. SETUP ---
        let cache = AssetCache::<Blob>::new();
        let counter = AtomicUsize::new(0);

        // --- 2. ACTION ---
        let first = cache
            .fetch_or_load("broken.glb", || async {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(anyhow::anyhow!("unexpected end of buffer"))
            })
            .await;
        let second = cache
            .fetch_or_load("broken.glb", || slow_load(&counter, 7))
            .await;

        // --- 3. ASSERTIONS ---
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        let expected = LoadError::Failed {
            location: "broken.glb".to_string(),
            reason: "unexpected end of buffer".to_string(),
        };
        assert_eq!(first.unwrap_err(), expected);
        assert_eq!(second.unwrap_err(), expected);
    }

    #[tokio::test]
    async fn test_missing_files_are_reported_as_not_found() {
        let cache = AssetCache::<Blob>::new();
        let result = cache
            .fetch_or_load("missing.glb", || async {
                let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
                Err(anyhow::Error::new(io).context("reading missing.glb"))
            })
            .await;

        assert_eq!(
            result.unwrap_err(),
            LoadError::NotFound {
                location: "missing.glb".to_string()
            }
        );
    }
}
