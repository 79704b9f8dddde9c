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

use armature_core::ecs::EntityId;
use std::fmt;

/// An error returned by [`World`](super::World) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The entity was never spawned or has been despawned.
    EntityNotFound(EntityId),
    /// Appending `child` under `parent` would make an entity its own ancestor.
    HierarchyCycle {
        /// The requested parent.
        parent: EntityId,
        /// The requested child.
        child: EntityId,
    },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::EntityNotFound(id) => write!(f, "Entity {id} does not exist"),
            WorldError::HierarchyCycle { parent, child } => {
                write!(f, "Cannot append entity {child} under its own descendant {parent}")
            }
        }
    }
}

impl std::error::Error for WorldError {}
