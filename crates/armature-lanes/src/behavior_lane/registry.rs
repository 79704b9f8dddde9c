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

use super::Inflator;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

static GLOBAL: OnceLock<Arc<BehaviorRegistry>> = OnceLock::new();

/// What a recognized metadata key maps to.
#[derive(Clone)]
pub struct BehaviorBinding {
    /// The host behavior configured by this key.
    pub behavior_name: String,
    /// A custom inflator. `None` selects [`default_inflator`](super::default_inflator).
    pub inflator: Option<Inflator>,
}

impl BehaviorBinding {
    /// Binds a key to `behavior_name` with the default inflator.
    pub fn new(behavior_name: impl Into<String>) -> Self {
        Self {
            behavior_name: behavior_name.into(),
            inflator: None,
        }
    }

    /// Replaces the default inflator with `inflator`.
    pub fn with_inflator(mut self, inflator: Inflator) -> Self {
        self.inflator = Some(inflator);
        self
    }
}

impl fmt::Debug for BehaviorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorBinding")
            .field("behavior_name", &self.behavior_name)
            .field("custom_inflator", &self.inflator.is_some())
            .finish()
    }
}

/// Maps metadata keys to [`BehaviorBinding`]s.
///
/// Can be mutated at any time; a lookup sees the bindings registered before it.
#[derive(Debug, Default)]
pub struct BehaviorRegistry {
    bindings: RwLock<HashMap<String, BehaviorBinding>>,
}

impl BehaviorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry. Empty until something registers into it.
    pub fn global() -> Arc<Self> {
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Registers `binding` under `key`, replacing any previous binding.
    pub fn register(&self, key: impl Into<String>, binding: BehaviorBinding) {
        let key = key.into();
        log::debug!(
            "Registering behavior key '{key}' -> '{}'.",
            binding.behavior_name
        );
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, binding);
    }

    /// Returns the binding for `key`, or `None` if the key is not recognized.
    pub fn lookup(&self, key: &str) -> Option<BehaviorBinding> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no key is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
