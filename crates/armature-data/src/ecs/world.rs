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

use super::entity_store::{EntityRecord, EntityStore};
use super::{
    BehaviorSchema, EntityObject, EntityTransform, ObjectTarget, WorldError, POSITION_ATTRIBUTE,
    ROTATION_ATTRIBUTE, SCALE_ATTRIBUTE,
};
use armature_core::ecs::EntityId;
use armature_core::event::{EntityEvent, EventBus, ModelEvent};
use armature_core::scene::AnimationClip;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The host entity tree.
///
/// Entities are addressable nodes carrying a name, classes, an attribute map, an
/// optional visual object and animation clips. An entity is *connected* when it is a
/// root spawned with [`World::spawn_connected`] or a descendant of one; detached
/// subtrees are disconnected.
///
/// The world also holds the schemas of the behaviors the host supports and the bus
/// entity events are emitted on.
#[derive(Debug, Default)]
pub struct World {
    store: EntityStore,
    behaviors: HashMap<String, BehaviorSchema>,
    events: EventBus<EntityEvent>,
}

impl World {
    /// Creates an empty world with no registered behaviors.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Lifecycle ---

    /// Spawns a detached, disconnected entity.
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        self.store.create_entity(EntityRecord {
            name: name.into(),
            ..EntityRecord::default()
        })
    }

    /// Spawns a root entity that is part of the live tree.
    pub fn spawn_connected(&mut self, name: impl Into<String>) -> EntityId {
        self.store.create_entity(EntityRecord {
            name: name.into(),
            connected: true,
            ..EntityRecord::default()
        })
    }

    /// Despawns `id` and all of its descendants, unlinking it from its parent.
    ///
    /// Returns `false` if the entity was not alive.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(record) = self.store.remove(current) {
                stack.extend(record.children);
            }
        }
        true
    }

    /// Returns `true` if `id` refers to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.store.get(id).is_some()
    }

    /// Returns `true` if the entity is part of the live tree.
    pub fn is_connected(&self, id: EntityId) -> bool {
        self.store.get(id).is_some_and(|r| r.connected)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.store.alive_count()
    }

    /// Returns `true` if no entity is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Identity ---

    /// The entity's name.
    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.store.get(id).map(|r| r.name.as_str())
    }

    /// The entity's classes, in insertion order.
    pub fn classes(&self, id: EntityId) -> &[String] {
        self.store
            .get(id)
            .map(|r| r.classes.as_slice())
            .unwrap_or_default()
    }

    /// Returns `true` if the entity carries `class`.
    pub fn has_class(&self, id: EntityId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    /// Adds a class. Adding a class twice is a no-op.
    pub fn add_class(&mut self, id: EntityId, class: &str) -> Result<(), WorldError> {
        let record = self.record_mut(id)?;
        if !class.is_empty() && !record.classes.iter().any(|c| c == class) {
            record.classes.push(class.to_string());
        }
        Ok(())
    }

    // --- Attributes ---

    /// Sets an attribute, replacing any previous value under the same key.
    pub fn set_attribute(
        &mut self,
        id: EntityId,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), WorldError> {
        self.record_mut(id)?.attributes.insert(key.into(), value);
        Ok(())
    }

    /// Returns an attribute value.
    pub fn attribute(&self, id: EntityId, key: &str) -> Option<&Value> {
        self.store.get(id).and_then(|r| r.attributes.get(key))
    }

    /// Returns every attribute of the entity.
    pub fn attributes(&self, id: EntityId) -> Option<&Map<String, Value>> {
        self.store.get(id).map(|r| &r.attributes)
    }

    /// Writes the `position`, `rotation` and `scale` attributes.
    pub fn set_transform(
        &mut self,
        id: EntityId,
        transform: EntityTransform,
    ) -> Result<(), WorldError> {
        let record = self.record_mut(id)?;
        for (key, value) in transform.to_attributes() {
            record.attributes.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Reads the `position`, `rotation` and `scale` attributes. Missing or malformed
    /// attributes read as the identity.
    pub fn transform(&self, id: EntityId) -> Option<EntityTransform> {
        let record = self.store.get(id)?;
        Some(EntityTransform::from_attributes(
            record.attributes.get(POSITION_ATTRIBUTE),
            record.attributes.get(ROTATION_ATTRIBUTE),
            record.attributes.get(SCALE_ATTRIBUTE),
        ))
    }

    // --- Hierarchy ---

    /// Appends `child` as the last child of `parent`, unlinking it from any previous
    /// parent. The child subtree takes the connection state of `parent`.
    pub fn append_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), WorldError> {
        let connected = self.record(parent)?.connected;
        self.record(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(WorldError::HierarchyCycle { parent, child });
        }

        self.detach(child)?;
        self.record_mut(child)?.parent = Some(parent);
        self.record_mut(parent)?.children.push(child);
        self.set_connected(child, connected);
        Ok(())
    }

    /// Unlinks `child` from its parent and disconnects its subtree.
    pub fn detach(&mut self, child: EntityId) -> Result<(), WorldError> {
        self.record_mut(child)?;
        self.unlink(child);
        Ok(())
    }

    /// Unlinks a live `child` from its parent, if it has one.
    fn unlink(&mut self, child: EntityId) {
        let Some(parent) = self.store.get_mut(child).and_then(|r| r.parent.take()) else {
            return;
        };
        if let Some(record) = self.store.get_mut(parent) {
            record.children.retain(|c| *c != child);
        }
        self.set_connected(child, false);
    }

    /// The entity's parent.
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.store.get(id).and_then(|r| r.parent)
    }

    /// The entity's children, in order.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.store
            .get(id)
            .map(|r| r.children.as_slice())
            .unwrap_or_default()
    }

    /// Every strict descendant of `root`, in depth-first pre-order.
    pub fn descendants(&self, root: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Every strict descendant of `root` carrying `class`.
    pub fn descendants_with_class(&self, root: EntityId, class: &str) -> Vec<EntityId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    fn set_connected(&mut self, root: EntityId, connected: bool) {
        let mut subtree = self.descendants(root);
        subtree.push(root);
        for id in subtree {
            if let Some(record) = self.store.get_mut(id) {
                record.connected = connected;
            }
        }
    }

    // --- Visual object ---

    /// Sets the entity's visual object, replacing any previous one.
    pub fn set_object(
        &mut self,
        id: EntityId,
        slot: impl Into<String>,
        target: impl Into<ObjectTarget>,
    ) -> Result<(), WorldError> {
        self.record_mut(id)?.object = Some(EntityObject {
            slot: slot.into(),
            target: target.into(),
        });
        Ok(())
    }

    /// The entity's visual object.
    pub fn object(&self, id: EntityId) -> Option<&EntityObject> {
        self.store.get(id).and_then(|r| r.object.as_ref())
    }

    /// Removes and returns the entity's visual object.
    pub fn clear_object(&mut self, id: EntityId) -> Result<Option<EntityObject>, WorldError> {
        Ok(self.record_mut(id)?.object.take())
    }

    // --- Animations ---

    /// Appends animation clips to the entity.
    pub fn push_animations(
        &mut self,
        id: EntityId,
        clips: impl IntoIterator<Item = AnimationClip>,
    ) -> Result<(), WorldError> {
        self.record_mut(id)?.animations.extend(clips);
        Ok(())
    }

    /// The entity's animation clips.
    pub fn animations(&self, id: EntityId) -> &[AnimationClip] {
        self.store
            .get(id)
            .map(|r| r.animations.as_slice())
            .unwrap_or_default()
    }

    // --- Behaviors ---

    /// Declares a behavior the host supports.
    pub fn register_behavior(&mut self, name: impl Into<String>, schema: BehaviorSchema) {
        self.behaviors.insert(name.into(), schema);
    }

    /// Looks up a supported behavior.
    pub fn behavior(&self, name: &str) -> Option<BehaviorSchema> {
        self.behaviors.get(name).copied()
    }

    // --- Events ---

    /// Emits an event from `target` to every subscriber.
    pub fn emit(&self, target: EntityId, event: ModelEvent) {
        log::debug!("Entity {target} emits '{}'.", event.name());
        self.events.publish(EntityEvent { target, event });
    }

    /// Subscribes to every event emitted in this world.
    pub fn subscribe(&self) -> flume::Receiver<EntityEvent> {
        self.events.subscribe()
    }

    // --- Internal ---

    fn record(&self, id: EntityId) -> Result<&EntityRecord, WorldError> {
        self.store.get(id).ok_or(WorldError::EntityNotFound(id))
    }

    fn record_mut(&mut self, id: EntityId) -> Result<&mut EntityRecord, WorldError> {
        self.store.get_mut(id).ok_or(WorldError::EntityNotFound(id))
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &EntityStore {
        &self.store
    }
}
