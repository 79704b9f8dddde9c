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

//! Binding of declared markup templates onto inflated entities.

use armature_core::{
    ecs::EntityId,
    lane::{Lane, LaneKind},
};
use armature_data::{
    ecs::{sanitize_name, World, WorldError},
    markup::{MarkupNode, Template},
};
use serde_json::Value;

/// The attribute whose tokens are added as classes.
pub const CLASS_ATTRIBUTE: &str = "class";
/// The identity attribute, never overwritten once set.
pub const ID_ATTRIBUTE: &str = "id";

/// Merges a template into every inflated entity it targets.
///
/// Binding must run once the targets are connected to the live tree; disconnected
/// targets are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateLane;

impl TemplateLane {
    /// Creates a new template lane.
    pub fn new() -> Self {
        Self
    }

    /// Binds `template` to `root` and its descendants whose class is the sanitized
    /// template name. Returns the number of entities bound.
    ///
    /// The fragment root attributes are merged into each target: `class` tokens are
    /// added, `id` is only set when absent, and every other attribute overwrites the
    /// target's. The fragment children are instantiated as new entities under each
    /// target.
    pub fn bind(
        &self,
        world: &mut World,
        root: EntityId,
        template: &Template,
    ) -> Result<usize, WorldError> {
        let class = sanitize_name(&template.name);
        if class.is_empty() {
            return Ok(0);
        }

        let mut targets = world.descendants_with_class(root, &class);
        if world.has_class(root, &class) {
            targets.insert(0, root);
        }

        let mut bound = 0;
        for target in targets {
            if !world.is_connected(target) {
                log::warn!(
                    "Skipping template '{}' on disconnected entity {target}.",
                    template.name
                );
                continue;
            }
            merge_attributes(world, target, &template.fragment)?;
            for child in &template.fragment.children {
                let entity = instantiate(world, child)?;
                world.append_child(target, entity)?;
            }
            bound += 1;
        }

        log::debug!("Template '{}' bound to {bound} entities.", template.name);
        Ok(bound)
    }
}

fn merge_attributes(world: &mut World, target: EntityId, node: &MarkupNode) -> Result<(), WorldError> {
    for (key, value) in &node.attributes {
        match key.as_str() {
            CLASS_ATTRIBUTE => {
                for token in class_tokens(value) {
                    world.add_class(target, token)?;
                }
            }
            ID_ATTRIBUTE if world.attribute(target, ID_ATTRIBUTE).is_some() => {}
            _ => world.set_attribute(target, key.as_str(), value.clone())?,
        }
    }
    Ok(())
}

fn class_tokens(value: &Value) -> impl Iterator<Item = &str> {
    value.as_str().unwrap_or_default().split_whitespace()
}

/// Spawns `node` and its children as a detached entity subtree.
fn instantiate(world: &mut World, node: &MarkupNode) -> Result<EntityId, WorldError> {
    let entity = world.spawn(node.tag.as_str());
    merge_attributes(world, entity, node)?;
    for child in &node.children {
        let child_entity = instantiate(world, child)?;
        world.append_child(entity, child_entity)?;
    }
    Ok(entity)
}

impl Lane for TemplateLane {
    fn strategy_name(&self) -> &'static str {
        "TemplateBind"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Template
    }
}
