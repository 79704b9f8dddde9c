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

use serde::{Deserialize, Serialize};
use std::fmt;

/// The material encoding a loader should prefer when an asset offers more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaterialTechnique {
    /// Physically based metallic/roughness materials.
    #[default]
    #[serde(rename = "pbrMetallicRoughness")]
    PbrMetallicRoughness,
    /// Unlit materials, used where the asset declares `KHR_materials_unlit`.
    #[serde(rename = "KHR_materials_unlit")]
    Unlit,
}

impl MaterialTechnique {
    /// Returns `true` if unlit materials should be used where available.
    pub fn prefers_unlit(self) -> bool {
        matches!(self, MaterialTechnique::Unlit)
    }
}

/// Everything a loader lane needs to fetch and parse one source.
///
/// A request is built once a source has been resolved to a direct location and does
/// not change while the load is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// The direct location of the asset, relative to the fetcher's root or absolute.
    pub location: String,
    /// The path external resources (buffers, images) are resolved against.
    pub base_path: String,
    /// The preferred material encoding.
    pub technique: MaterialTechnique,
}

impl LoadRequest {
    /// Creates a request whose base path is derived from the location.
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        let base_path = extract_url_base(&location);
        Self {
            location,
            base_path,
            technique: MaterialTechnique::default(),
        }
    }

    /// Overrides the base path. Empty or missing values keep the derived one.
    pub fn with_base_path(mut self, base_path: Option<&str>) -> Self {
        if let Some(base) = base_path.filter(|b| !b.is_empty()) {
            self.base_path = base.to_string();
        }
        self
    }

    /// Sets the preferred material encoding.
    pub fn with_technique(mut self, technique: MaterialTechnique) -> Self {
        self.technique = technique;
        self
    }
}

/// Returns everything up to and including the last `/` of `location`, or `./` when
/// the location has no directory part.
///
/// # Examples
///
/// ```
/// use armature_core::asset::extract_url_base;
/// assert_eq!(extract_url_base("models/avatar.glb"), "models/");
/// assert_eq!(extract_url_base("avatar.glb"), "./");
/// ```
pub fn extract_url_base(location: &str) -> String {
    match location.rfind('/') {
        Some(idx) => location[..=idx].to_string(),
        None => "./".to_string(),
    }
}

/// An error produced while fetching or parsing an asset.
///
/// The error is `Clone` because a failed load is kept by the cache and handed to
/// every later requester of the same source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The asset (or one of its external resources) does not exist.
    NotFound {
        /// The location that was requested.
        location: String,
    },
    /// The asset was fetched but could not be turned into a scene.
    Failed {
        /// The location that was requested.
        location: String,
        /// A human-readable description of the underlying failure.
        reason: String,
    },
}

impl LoadError {
    /// The location the failed load was for.
    pub fn location(&self) -> &str {
        match self {
            LoadError::NotFound { location } | LoadError::Failed { location, .. } => location,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound { location } => write!(f, "Asset not found: {location}"),
            LoadError::Failed { location, reason } => {
                write!(f, "Failed to load asset '{location}': {reason}")
            }
        }
    }
}

impl std::error::Error for LoadError {}
