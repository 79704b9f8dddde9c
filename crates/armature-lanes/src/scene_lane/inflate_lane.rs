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

//! Inflation of a cloned scene tree into host entities.

use crate::behavior_lane::{default_inflator, BehaviorRegistry, InflateError};
use armature_core::{
    ecs::EntityId,
    lane::{Lane, LaneKind},
    scene::{NodeId, SceneGraph, Transform},
};
use armature_data::{
    ecs::{sanitize_name, EntityTransform, World},
    markup::TemplateSet,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Wraps the addressable nodes of a scene tree in host entities.
///
/// A node is addressable when it carries behavior metadata, when a template targets
/// its name, or when one of its descendants is addressable. Other nodes stay plain
/// scene children of the closest wrapped ancestor.
///
/// Each wrapper entity takes over the node's placement: the node transform moves to
/// the entity attributes (rotation in degrees, YXZ order), the node is reset to the
/// identity transform and unlinked from its scene parent, and becomes the entity's
/// visual object. Clips attached to the node move to the wrapper entity.
#[derive(Debug, Clone)]
pub struct InflateLane {
    registry: Arc<BehaviorRegistry>,
}

impl Default for InflateLane {
    fn default() -> Self {
        Self::new(BehaviorRegistry::global())
    }
}

/// Node state captured before the entity is created.
struct Snapshot {
    name: String,
    tag: &'static str,
    transform: Transform,
    metadata: Option<Map<String, Value>>,
}

impl InflateLane {
    /// Creates a lane resolving behavior keys through `registry`.
    pub fn new(registry: Arc<BehaviorRegistry>) -> Self {
        Self { registry }
    }

    /// Inflates the subtree rooted at `root`.
    ///
    /// Returns the entity wrapping `root`, or `None` if no node of the subtree needed
    /// one. Created entities are detached from the rest of the world. On error every
    /// entity created by this call is despawned; the scene graph is left partially
    /// rewritten and should be discarded.
    pub fn inflate(
        &self,
        world: &mut World,
        graph: &mut SceneGraph,
        root: NodeId,
        templates: &TemplateSet,
        context_path: &str,
    ) -> Result<Option<EntityId>, InflateError> {
        let mut spawned = Vec::new();
        let result = self.inflate_node(world, graph, root, templates, context_path, &mut spawned);
        if let Err(e) = &result {
            log::debug!("Rolling back {} entities after: {e}", spawned.len());
            for id in spawned.into_iter().rev() {
                world.despawn(id);
            }
        }
        result
    }

    fn inflate_node(
        &self,
        world: &mut World,
        graph: &mut SceneGraph,
        node: NodeId,
        templates: &TemplateSet,
        context_path: &str,
        spawned: &mut Vec<EntityId>,
    ) -> Result<Option<EntityId>, InflateError> {
        // Children first; inflating a child unlinks it, so walk a copy of the list.
        let children = graph[node].children().to_vec();
        let mut child_entities = Vec::new();
        for child in children {
            if let Some(entity) =
                self.inflate_node(world, graph, child, templates, context_path, spawned)?
            {
                child_entities.push(entity);
            }
        }

        let snapshot = {
            let scene_node = &graph[node];
            let needs_entity = scene_node.metadata.is_some()
                || templates.matches(&scene_node.name)
                || !child_entities.is_empty();
            if !needs_entity {
                return Ok(None);
            }
            Snapshot {
                name: scene_node.name.clone(),
                tag: scene_node.kind.tag(),
                transform: scene_node.transform,
                metadata: scene_node.metadata.clone(),
            }
        };

        let entity = world.spawn(snapshot.name.as_str());
        spawned.push(entity);
        for child in child_entities {
            world.append_child(entity, child)?;
        }

        let class = match sanitize_name(&snapshot.name) {
            class if class.is_empty() => Uuid::new_v4().to_string(),
            class => class,
        };
        world.add_class(entity, &class)?;
        world.set_transform(entity, EntityTransform::from_node(&snapshot.transform))?;

        let clips = {
            let scene_node = &mut graph[node];
            scene_node.transform = Transform::IDENTITY;
            std::mem::take(&mut scene_node.animations)
        };
        graph.detach(node);
        world.set_object(entity, snapshot.tag, graph.node_ref(node))?;
        world.push_animations(entity, clips)?;

        if let Some(metadata) = &snapshot.metadata {
            self.apply_behaviors(world, entity, &snapshot.name, metadata, context_path)?;
        }

        log::trace!("Inflated node '{}' into entity {entity}.", snapshot.name);
        Ok(Some(entity))
    }

    fn apply_behaviors(
        &self,
        world: &mut World,
        entity: EntityId,
        node_name: &str,
        metadata: &Map<String, Value>,
        context_path: &str,
    ) -> Result<(), InflateError> {
        for (key, config) in metadata {
            let Some(binding) = self.registry.lookup(key) else {
                log::debug!("Ignoring unrecognized behavior key '{key}' on node '{node_name}'.");
                continue;
            };
            if world.behavior(&binding.behavior_name).is_none() {
                return Err(InflateError::UnknownBehavior {
                    behavior: binding.behavior_name,
                    node: node_name.to_string(),
                });
            }
            match &binding.inflator {
                Some(inflator) => {
                    inflator(world, entity, &binding.behavior_name, config, context_path)?
                }
                None => default_inflator(world, entity, &binding.behavior_name, config, context_path)?,
            }
        }
        Ok(())
    }
}

impl Lane for InflateLane {
    fn strategy_name(&self) -> &'static str {
        "TreeInflate"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Scene
    }
}
