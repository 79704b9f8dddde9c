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

use armature_core::asset::MaterialTechnique;
use serde::{Deserialize, Serialize};

/// The attributes a host entity configures its model loader with.
///
/// Deserializes from the host attribute map, e.g.
/// `{ "src": "#avatar", "inflate": true }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelLoaderConfig {
    /// A direct location or a `#id` reference. Empty or absent clears the model.
    pub src: Option<String>,
    /// Base for resources referenced by the model. Derived from the source when absent.
    pub base_path: Option<String>,
    /// Whether addressable nodes are wrapped in entities.
    pub inflate: bool,
    /// The preferred material technique.
    pub technique: MaterialTechnique,
}

impl ModelLoaderConfig {
    /// A configuration loading `src` with default settings.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::default()
        }
    }

    /// Builder-style setter for `inflate`.
    pub fn with_inflate(mut self, inflate: bool) -> Self {
        self.inflate = inflate;
        self
    }

    /// The configured source, trimmed, or `None` if empty.
    pub fn source(&self) -> Option<&str> {
        self.src.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_from_attributes() {
        let config: ModelLoaderConfig = serde_json::from_value(json!({
            "src": "#avatar",
            "basePath": "cdn/",
            "inflate": true,
            "technique": "KHR_materials_unlit",
        }))
        .unwrap();

        assert_eq!(config.source(), Some("#avatar"));
        assert_eq!(config.base_path.as_deref(), Some("cdn/"));
        assert!(config.inflate);
        assert_eq!(config.technique, MaterialTechnique::Unlit);
    }

    #[test]
    fn test_defaults() {
        let config: ModelLoaderConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, ModelLoaderConfig::default());
        assert!(!config.inflate);
        assert_eq!(config.technique, MaterialTechnique::PbrMetallicRoughness);
    }

    #[test]
    fn test_blank_source_is_none() {
        assert_eq!(ModelLoaderConfig::new("  ").source(), None);
        assert_eq!(ModelLoaderConfig::new(" a.glb ").source(), Some("a.glb"));
    }
}
