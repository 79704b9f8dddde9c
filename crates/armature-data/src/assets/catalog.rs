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

use crate::markup::MarkupNode;
use std::collections::HashMap;

/// The markup tag declaring a catalog entry.
pub const ASSET_ITEM_TAG: &str = "asset-item";

/// Resolves `#id` references to direct asset locations.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    items: HashMap<String, String>,
}

impl AssetCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from `asset-item` declarations carrying `id` and `src`
    /// attributes. Declarations are searched recursively.
    pub fn from_markup(nodes: &[MarkupNode]) -> Self {
        let mut catalog = Self::new();
        for node in nodes {
            catalog.collect(node);
        }
        catalog
    }

    fn collect(&mut self, node: &MarkupNode) {
        if node.tag == ASSET_ITEM_TAG {
            match (node.attribute_str("id"), node.attribute_str("src")) {
                (Some(id), Some(src)) => self.insert(id, src),
                _ => log::warn!("Ignoring an asset item without both 'id' and 'src'."),
            }
        }
        for child in &node.children {
            self.collect(child);
        }
    }

    /// Registers `id` as an alias of `location`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, location: impl Into<String>) {
        self.items.insert(id.into(), location.into());
    }

    /// Builder-style [`AssetCatalog::insert`].
    pub fn with_item(mut self, id: impl Into<String>, location: impl Into<String>) -> Self {
        self.insert(id, location);
        self
    }

    /// Returns `true` if `source` is a reference rather than a direct location.
    pub fn is_reference(source: &str) -> bool {
        source.starts_with('#')
    }

    /// Resolves a source to a direct location.
    ///
    /// Direct locations are returned unchanged; references return `None` when the
    /// catalog has no matching entry.
    pub fn resolve(&self, source: &str) -> Option<String> {
        match source.strip_prefix('#') {
            Some(id) => self.items.get(id).cloned(),
            None => Some(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution() {
        let catalog = AssetCatalog::new().with_item("asset-item", "models/avatar.glb");

        assert_eq!(
            catalog.resolve("#asset-item").as_deref(),
            Some("models/avatar.glb")
        );
        assert_eq!(catalog.resolve("#missing"), None);
        assert_eq!(catalog.resolve("props/chair.glb").as_deref(), Some("props/chair.glb"));
    }

    #[test]
    fn test_from_markup() {
        let assets = MarkupNode::new("assets")
            .with_child(
                MarkupNode::new(ASSET_ITEM_TAG)
                    .with_attribute("id", "avatar")
                    .with_attribute("src", "models/avatar.glb"),
            )
            .with_child(MarkupNode::new(ASSET_ITEM_TAG).with_attribute("id", "orphan"));

        let catalog = AssetCatalog::from_markup(&[assets]);
        assert_eq!(catalog.resolve("#avatar").as_deref(), Some("models/avatar.glb"));
        assert_eq!(catalog.resolve("#orphan"), None);
    }
}
