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

use super::MarkupNode;
use crate::ecs::sanitize_name;

/// The markup tag declaring a template.
pub const TEMPLATE_TAG: &str = "template";
/// The attribute naming the node a template targets.
pub const TEMPLATE_NAME_ATTRIBUTE: &str = "data-name";

/// A named markup fragment to merge into the entity inflated for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The target node name, as declared.
    pub name: String,
    /// The fragment root. Its attributes are merged into the target entity and its
    /// children are instantiated under it.
    pub fragment: MarkupNode,
}

/// The templates declared for one host entity, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the `template` elements among `nodes` (not recursively).
    ///
    /// A template needs a `data-name` attribute; its first child is the fragment.
    /// Incomplete declarations are skipped.
    pub fn from_markup(nodes: &[MarkupNode]) -> Self {
        let mut set = Self::new();
        for node in nodes.iter().filter(|n| n.tag == TEMPLATE_TAG) {
            let Some(name) = node.attribute_str(TEMPLATE_NAME_ATTRIBUTE) else {
                log::warn!("Ignoring a template without a '{TEMPLATE_NAME_ATTRIBUTE}' attribute.");
                continue;
            };
            let Some(fragment) = node.children.first() else {
                log::warn!("Ignoring empty template '{name}'.");
                continue;
            };
            set.insert(name, fragment.clone());
        }
        set
    }

    /// Adds a template.
    pub fn insert(&mut self, name: impl Into<String>, fragment: MarkupNode) {
        self.templates.push(Template {
            name: name.into(),
            fragment,
        });
    }

    /// Returns `true` if some template targets a node named `node_name`.
    ///
    /// Names are compared in their sanitized form, the form entity classes use.
    pub fn matches(&self, node_name: &str) -> bool {
        let wanted = sanitize_name(node_name);
        !wanted.is_empty() && self.templates.iter().any(|t| sanitize_name(&t.name) == wanted)
    }

    /// Iterates the templates in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if no template is declared.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<'a> IntoIterator for &'a TemplateSet {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_markup() {
        let declared = vec![
            MarkupNode::new(TEMPLATE_TAG)
                .with_attribute(TEMPLATE_NAME_ATTRIBUTE, "Hand_L")
                .with_child(MarkupNode::new("entity").with_attribute("grabbable", true)),
            MarkupNode::new(TEMPLATE_TAG).with_attribute(TEMPLATE_NAME_ATTRIBUTE, "Empty"),
            MarkupNode::new(TEMPLATE_TAG).with_child(MarkupNode::new("entity")),
            MarkupNode::new("asset-item"),
        ];

        let set = TemplateSet::from_markup(&declared);
        assert_eq!(set.len(), 1);
        let template = set.iter().next().unwrap();
        assert_eq!(template.name, "Hand_L");
        assert_eq!(template.fragment.tag, "entity");
    }

    #[test]
    fn test_matches_compares_sanitized_names() {
        let mut set = TemplateSet::new();
        set.insert("Hand_L", MarkupNode::new("entity"));

        assert!(set.matches("Hand_L"));
        assert!(set.matches("Hand_L "));
        assert!(!set.matches(""));
        assert!(!set.matches("Hand_R"));
    }
}
