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

//! Internal entity storage and ID management.

use super::EntityObject;
use armature_core::ecs::EntityId;
use armature_core::scene::AnimationClip;
use serde_json::{Map, Value};

/// Everything the world knows about one live entity.
#[derive(Debug, Default)]
pub(crate) struct EntityRecord {
    pub(crate) name: String,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: Map<String, Value>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) object: Option<EntityObject>,
    pub(crate) animations: Vec<AnimationClip>,
    pub(crate) connected: bool,
}

/// Internal manager for entity slots and records.
///
/// Despawned indices are recycled through a free list; the generation of a slot is
/// incremented on reuse so stale ids never resolve.
#[derive(Debug, Default)]
pub(crate) struct EntityStore {
    /// Every slot ever created, with the id currently owning it and its record if alive.
    pub(crate) entities: Vec<(EntityId, Option<EntityRecord>)>,
    /// Indices available for reuse.
    pub(crate) freed_entities: Vec<u32>,
}

impl EntityStore {
    /// Allocates a new or recycled `EntityId` holding `record`.
    pub fn create_entity(&mut self, record: EntityRecord) -> EntityId {
        if let Some(index) = self.freed_entities.pop() {
            let (id_slot, record_slot) = &mut self.entities[index as usize];
            id_slot.generation += 1;
            *record_slot = Some(record);
            *id_slot
        } else {
            let new_id = EntityId {
                index: self.entities.len() as u32,
                generation: 0,
            };
            self.entities.push((new_id, Some(record)));
            new_id
        }
    }

    /// Returns the record of a live entity.
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities
            .get(id.index as usize)
            .and_then(|(slot_id, record)| {
                if slot_id.generation == id.generation {
                    record.as_ref()
                } else {
                    None
                }
            })
    }

    /// Returns the record of a live entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.entities
            .get_mut(id.index as usize)
            .and_then(|(slot_id, record)| {
                if slot_id.generation == id.generation {
                    record.as_mut()
                } else {
                    None
                }
            })
    }

    /// Frees the slot of a live entity and returns its record.
    pub fn remove(&mut self, id: EntityId) -> Option<EntityRecord> {
        let (slot_id, record) = self.entities.get_mut(id.index as usize)?;
        if slot_id.generation != id.generation {
            return None;
        }
        let removed = record.take()?;
        self.freed_entities.push(id.index);
        Some(removed)
    }

    /// Number of live entities.
    pub fn alive_count(&self) -> usize {
        self.entities.iter().filter(|(_, r)| r.is_some()).count()
    }
}
