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

//! Structural cloning of parsed scenes, rebinding skeletons by node name.

use armature_core::{
    lane::{Lane, LaneKind},
    scene::{ClonedAsset, NodeId, NodeKind, ParsedAsset, SceneGraph, Skeleton},
};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while cloning a parsed scene.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CloneError {
    /// The parsed asset has no scene to clone.
    #[error("asset has no scene")]
    NoScene,
    /// A skeleton references a bone that is not part of the cloned tree.
    #[error("skinned mesh '{mesh}' references bone '{bone}' missing from the cloned tree")]
    MissingBone {
        /// The skinned mesh name.
        mesh: String,
        /// The missing bone name.
        bone: String,
    },
    /// A recorded skinned mesh has no counterpart in the cloned tree.
    #[error("skinned mesh '{mesh}' is missing from the cloned tree")]
    MissingSkinnedMesh {
        /// The skinned mesh name.
        mesh: String,
    },
}

/// Produces independent copies of the default scene of a [`ParsedAsset`].
///
/// Geometry is shared between the source and every copy. Materials are shared too,
/// except on skinned meshes, which get their own duplicate so that per-instance changes
/// stay local. Every copied skeleton points at the copied bones, in the source order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CloneLane;

impl CloneLane {
    /// Creates a new clone lane.
    pub fn new() -> Self {
        Self
    }

    /// Copies the default scene of `asset` into a fresh graph.
    pub fn clone_asset(&self, asset: &ParsedAsset) -> Result<ClonedAsset, CloneError> {
        let source = &asset.graph;
        let root = asset.scene.ok_or(CloneError::NoScene)?;

        // Pass 1: effective names and skinned meshes of the source tree.
        let order = source.descendants(root);
        let mut names: HashMap<NodeId, String> = HashMap::with_capacity(order.len());
        let mut skinned = Vec::new();
        for &id in &order {
            let node = &source[id];
            let name = if node.name.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                node.name.clone()
            };
            names.insert(id, name);
            if node.skin.is_some() {
                skinned.push(id);
            }
        }

        // Pass 2: structural copy. Skeletons are rebuilt below.
        let mut graph = SceneGraph::new();
        let mut copies: HashMap<NodeId, NodeId> = HashMap::with_capacity(order.len());
        for &id in &order {
            let mut node = source[id].clone();
            node.skin = None;
            if let Some(name) = names.get(&id) {
                node.name = name.clone();
            }
            let copy = match source[id].parent().and_then(|p| copies.get(&p)) {
                Some(&parent) if id != root => graph.add_child(parent, node),
                _ => graph.add(node),
            };
            copies.insert(id, copy);
        }
        let cloned_root = copies.get(&root).copied().ok_or(CloneError::NoScene)?;

        // Pass 3: index the copy by name. Duplicate names: last write wins.
        let mut bones: HashMap<&str, NodeId> = HashMap::new();
        let mut meshes: HashMap<&str, NodeId> = HashMap::new();
        for id in graph.descendants(cloned_root) {
            let node = &graph[id];
            if node.kind == NodeKind::Bone {
                bones.insert(node.name.as_str(), id);
            }
            if node.kind == NodeKind::SkinnedMesh {
                meshes.insert(node.name.as_str(), id);
            }
        }

        // Pass 4: rebind each skinned mesh to the copied bones.
        let mut rebinds = Vec::with_capacity(skinned.len());
        for id in skinned {
            let mesh_name = names.get(&id).cloned().unwrap_or_default();
            let Some(skeleton) = source[id].skin.as_ref() else {
                continue;
            };
            let target = *meshes
                .get(mesh_name.as_str())
                .ok_or_else(|| CloneError::MissingSkinnedMesh {
                    mesh: mesh_name.clone(),
                })?;

            let mut ordered = Vec::with_capacity(skeleton.bones.len());
            for bone in &skeleton.bones {
                let bone_name = names
                    .get(bone)
                    .cloned()
                    .or_else(|| source.get(*bone).map(|n| n.name.clone()))
                    .unwrap_or_default();
                let copy = bones.get(bone_name.as_str()).copied().ok_or_else(|| {
                    CloneError::MissingBone {
                        mesh: mesh_name.clone(),
                        bone: bone_name.clone(),
                    }
                })?;
                ordered.push(copy);
            }

            rebinds.push((
                target,
                Skeleton {
                    bones: ordered,
                    inverse_bind_matrices: skeleton.inverse_bind_matrices.clone(),
                },
            ));
        }

        for (target, skeleton) in rebinds {
            let node = &mut graph[target];
            node.skin = Some(skeleton);
            if let Some(mesh) = node.mesh.as_mut() {
                mesh.material = mesh.material.duplicate();
            }
        }

        log::debug!(
            "Cloned {} nodes, rebound {} skinned meshes.",
            graph.len(),
            graph
                .descendants(cloned_root)
                .iter()
                .filter(|id| graph[**id].skin.is_some())
                .count()
        );

        Ok(ClonedAsset {
            graph,
            root: cloned_root,
        })
    }
}

impl Lane for CloneLane {
    fn strategy_name(&self) -> &'static str {
        "StructuralClone"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::math::{Mat4, Vec3, Quaternion};
    use armature_core::scene::{Geometry, Material, MeshData, SceneNode, SharedMaterial, Transform};
    use std::sync::Arc;

    fn translation(y: f32) -> Mat4 {
        Mat4::from_cols_array_2d([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, y, 0.0, 1.0],
        ])
    }

    /// Scene > Armature > (Hips > Head), Body(skinned on [Hips, Head]), unnamed group.
    fn rigged_asset() -> ParsedAsset {
        let mut graph = SceneGraph::new();
        let scene = graph.add(SceneNode::new("Scene", NodeKind::Group));
        let armature = graph.add_child(scene, SceneNode::new("Armature", NodeKind::Group));
        let hips = graph.add_child(
            armature,
            SceneNode::new("Hips", NodeKind::Bone).with_transform(Transform::new(
                Vec3::new(0.0, 1.0, 0.0),
                Quaternion::IDENTITY,
                Vec3::ONE,
            )),
        );
        let head = graph.add_child(hips, SceneNode::new("Head", NodeKind::Bone));
        let mesh = MeshData {
            geometry: Arc::new(Geometry {
                positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                indices: None,
            }),
            material: SharedMaterial::new(Material::default()),
        };
        let body = graph.add_child(
            armature,
            SceneNode::new("Body", NodeKind::SkinnedMesh).with_mesh(mesh),
        );
        graph[body].skin = Some(Skeleton {
            bones: vec![hips, head],
            inverse_bind_matrices: vec![translation(-1.0), translation(-1.5)],
        });
        graph.add_child(scene, SceneNode::new("", NodeKind::Group));

        ParsedAsset {
            graph,
            scene: Some(scene),
            scenes: vec![scene],
            animations: Vec::new(),
        }
    }

    #[test]
    fn test_clone_rebinds_bones_in_source_order() {
        // --- 1. SETUP ---
        let asset = rigged_asset();
        let lane = CloneLane::new();

        // --- 2. ACTION ---
        let cloned = lane.clone_asset(&asset).unwrap();

        // --- 3. ASSERTIONS ---
        let body = cloned.graph.find_by_name(cloned.root, "Body").unwrap();
        let skeleton = cloned.graph[body].skin.as_ref().unwrap();
        let bone_names: Vec<&str> = skeleton
            .bones
            .iter()
            .map(|b| cloned.graph[*b].name.as_str())
            .collect();
        assert_eq!(bone_names, vec!["Hips", "Head"]);
        assert_eq!(skeleton.inverse_bind_matrices, vec![translation(-1.0), translation(-1.5)]);

        let hips = cloned.graph.find_by_name(cloned.root, "Hips").unwrap();
        assert_eq!(skeleton.bones[0], hips);
        assert!(cloned.graph.is_ancestor(cloned.root, hips));
    }

    #[test]
    fn test_clones_are_independent() {
        let asset = rigged_asset();
        let lane = CloneLane::new();
        let first = lane.clone_asset(&asset).unwrap();
        let second = lane.clone_asset(&asset).unwrap();

        let source_body = asset.graph.find_by_name(asset.scene.unwrap(), "Body").unwrap();
        let first_body = first.graph.find_by_name(first.root, "Body").unwrap();
        let second_body = second.graph.find_by_name(second.root, "Body").unwrap();
        let source_mesh = asset.graph[source_body].mesh.as_ref().unwrap();
        let first_mesh = first.graph[first_body].mesh.as_ref().unwrap();
        let second_mesh = second.graph[second_body].mesh.as_ref().unwrap();

        first_mesh.material.write().unlit = true;
        first_mesh.material.write().base_color = [1.0, 0.0, 0.0, 1.0];

        assert!(!source_mesh.material.read().unlit);
        assert!(!second_mesh.material.read().unlit);
        assert_eq!(second_mesh.material.read().base_color, [1.0; 4]);
        assert!(Arc::ptr_eq(&source_mesh.geometry, &first_mesh.geometry));
        assert_ne!(first.graph.id(), second.graph.id());
    }

    #[test]
    fn test_unnamed_nodes_get_synthetic_names() {
        let asset = rigged_asset();
        let cloned = CloneLane::new().clone_asset(&asset).unwrap();

        assert_eq!(cloned.graph.len(), asset.graph.len());
        for id in cloned.graph.descendants(cloned.root) {
            assert!(!cloned.graph[id].name.is_empty());
        }
    }

    #[test]
    fn test_bone_outside_the_scene_is_an_error() {
        // --- 1. SETUP ---
        let mut asset = rigged_asset();
        let orphan = asset.graph.add(SceneNode::new("Orphan", NodeKind::Bone));
        let body = asset.graph.find_by_name(asset.scene.unwrap(), "Body").unwrap();
        if let Some(skin) = asset.graph[body].skin.as_mut() {
            skin.bones.push(orphan);
            skin.inverse_bind_matrices.push(Mat4::IDENTITY);
        }

        // --- 2. ACTION ---
        let result = CloneLane::new().clone_asset(&asset);

        // --- 3. ASSERTIONS ---
        assert_eq!(
            result.unwrap_err(),
            CloneError::MissingBone {
                mesh: "Body".to_string(),
                bone: "Orphan".to_string(),
            }
        );
    }

    #[test]
    fn test_asset_without_scene() {
        let asset = ParsedAsset {
            graph: SceneGraph::new(),
            scene: None,
            scenes: Vec::new(),
            animations: Vec::new(),
        };
        assert_eq!(
            CloneLane::new().clone_asset(&asset).unwrap_err(),
            CloneError::NoScene
        );
    }
}
