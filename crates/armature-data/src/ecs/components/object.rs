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
use armature_core::scene::NodeRef;

/// The slot name under which a model loader stores its host's visual object.
pub const MESH_SLOT: &str = "mesh";

/// What an entity presents visually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectTarget {
    /// A scene node.
    Node(NodeRef),
    /// The placement group of another entity (its transform and object).
    Entity(EntityId),
}

impl From<NodeRef> for ObjectTarget {
    fn from(node: NodeRef) -> Self {
        ObjectTarget::Node(node)
    }
}

/// The visual object of an entity, tagged with the slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityObject {
    /// The slot name, usually the structural type of the node.
    pub slot: String,
    /// The object.
    pub target: ObjectTarget,
}

impl EntityObject {
    /// The scene node, if the object is one.
    pub fn node(&self) -> Option<NodeRef> {
        match self.target {
            ObjectTarget::Node(node) => Some(node),
            ObjectTarget::Entity(_) => None,
        }
    }
}
