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

use std::fmt;

use crate::ecs::EntityId;
use crate::scene::NodeRef;

/// The format of a loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// glTF 2.0, JSON or binary.
    Gltf,
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFormat::Gltf => write!(f, "gltf"),
        }
    }
}

/// Lifecycle events of a model loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A model was loaded and attached.
    Loaded {
        /// The format of the model.
        format: ModelFormat,
        /// The root of the attached copy.
        model: NodeRef,
    },
    /// A load attempt failed.
    Error {
        /// The format of the model.
        format: ModelFormat,
        /// The source that was requested, before resolution.
        requested: String,
    },
}

impl ModelEvent {
    /// The event name seen by listeners: `model-loaded` or `model-error`.
    pub fn name(&self) -> &'static str {
        match self {
            ModelEvent::Loaded { .. } => "model-loaded",
            ModelEvent::Error { .. } => "model-error",
        }
    }
}

/// An event emitted by a host entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEvent {
    /// The entity that emitted the event.
    pub target: EntityId,
    /// The payload.
    pub event: ModelEvent,
}
