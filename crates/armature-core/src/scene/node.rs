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

//! Defines the node type stored in a [`SceneGraph`](super::SceneGraph).

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{AnimationClip, NodeId, SharedMaterial};
use crate::math::{Mat4, Quaternion, Vec3, EPSILON};

/// A node's position, rotation, and scale relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The translation (position) of the node.
    pub translation: Vec3,
    /// The rotation of the node, represented as a quaternion.
    pub rotation: Quaternion,
    /// The scale of the node.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: no translation, rotation, or scaling.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a new `Transform` with a given translation, rotation, and scale.
    pub fn new(translation: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Returns `true` if this transform is the identity within [`EPSILON`].
    pub fn is_identity(&self) -> bool {
        let t = self.translation.length_squared() < EPSILON;
        let s = (self.scale - Vec3::ONE).length_squared() < EPSILON;
        t && s && self.rotation.same_rotation(Quaternion::IDENTITY, EPSILON)
    }
}

impl Default for Transform {
    /// Returns the identity `Transform`.
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The structural type of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A node rendering geometry with a material.
    Mesh,
    /// A mesh deformed by a skeleton.
    SkinnedMesh,
    /// A joint of a skeleton.
    Bone,
    /// A node only used to group children.
    Group,
    /// Anything else (empties, cameras, lights).
    Other,
}

impl NodeKind {
    /// The lower-case tag used when a node of this kind is stored in an entity's object
    /// slot.
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Mesh => "mesh",
            NodeKind::SkinnedMesh => "skinnedmesh",
            NodeKind::Bone => "bone",
            NodeKind::Group => "group",
            NodeKind::Other => "object3d",
        }
    }
}

/// Immutable vertex data. Shared by reference between every copy of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices, if the primitive is indexed.
    pub indices: Option<Vec<u32>>,
}

/// The renderable part of a mesh node.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// The vertex data.
    pub geometry: Arc<Geometry>,
    /// The material. Shared between copies unless explicitly duplicated.
    pub material: SharedMaterial,
}

/// The skeletal binding of a skinned mesh.
///
/// `bones[i]` is deformed by `inverse_bind_matrices[i]`; the order is significant.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    /// The bone nodes, in joint order.
    pub bones: Vec<NodeId>,
    /// One inverse bind matrix per bone.
    pub inverse_bind_matrices: Vec<Mat4>,
}

/// A node of a [`SceneGraph`](super::SceneGraph).
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// The node name. May be empty and is not unique in source data.
    pub name: String,
    /// The structural type.
    pub kind: NodeKind,
    /// The local transform.
    pub transform: Transform,
    /// The renderable part, for mesh and skinned mesh nodes.
    pub mesh: Option<MeshData>,
    /// The skeletal binding, for skinned mesh nodes.
    pub skin: Option<Skeleton>,
    /// Author-supplied behavior map (behavior key -> configuration).
    pub metadata: Option<Map<String, Value>>,
    /// Animation clips attached to this node.
    pub animations: Vec<AnimationClip>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl SceneNode {
    /// Creates a detached node with an identity transform.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::IDENTITY,
            mesh: None,
            skin: None,
            metadata: None,
            animations: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style setter for the local transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder-style setter for the mesh data.
    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Builder-style setter for the metadata.
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The parent node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The ordered children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_detection() {
        assert!(Transform::default().is_identity());

        let moved = Transform::new(Vec3::new(0.0, 1.0, 0.0), Quaternion::IDENTITY, Vec3::ONE);
        assert!(!moved.is_identity());

        let flipped = Transform {
            rotation: -Quaternion::IDENTITY,
            ..Transform::IDENTITY
        };
        assert!(flipped.is_identity());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(NodeKind::SkinnedMesh.tag(), "skinnedmesh");
        assert_eq!(NodeKind::Other.tag(), "object3d");
    }
}
