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

//! glTF 2.0 scene loader lane, supporting GLB chunks, data URIs and external buffers.

use super::{join_location, AssetFetcher, SceneLoaderLane};
use anyhow::{anyhow, bail, Context, Result};
use armature_core::{
    asset::{LoadRequest, MaterialTechnique},
    lane::{Lane, LaneKind},
    math::{Mat4, Quaternion, Vec3},
    scene::{
        AnimationClip, AnimationTrack, Geometry, Material, MeshData, NodeId, NodeKind,
        ParsedAsset, SceneGraph, SceneNode, SharedMaterial, Skeleton, TrackProperty, Transform,
    },
};
use async_trait::async_trait;
use base64::Engine;
use gltf::animation::util::ReadOutputs;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// The node extras key holding the behavior map of a node.
pub const COMPONENTS_EXTRAS_KEY: &str = "components";

/// Lane for loading glTF scenes, configured with the fetcher that provides bytes.
#[derive(Clone)]
pub struct GltfLoaderLane {
    fetcher: Arc<dyn AssetFetcher>,
}

impl GltfLoaderLane {
    /// Creates a new glTF loader lane reading through `fetcher`.
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self { fetcher }
    }

    async fn load_buffer_data(&self, gltf: &gltf::Gltf, base_path: &str) -> Result<Vec<Vec<u8>>> {
        let sources: Vec<Option<String>> = gltf
            .buffers()
            .map(|buffer| match buffer.source() {
                gltf::buffer::Source::Bin => None,
                gltf::buffer::Source::Uri(uri) => Some(uri.to_string()),
            })
            .collect();

        let mut buffer_data = Vec::with_capacity(sources.len());
        for source in sources {
            match source {
                None => match gltf.blob.as_deref() {
                    Some(blob) => buffer_data.push(blob.to_vec()),
                    None => bail!("GLB file references binary chunk but it is missing"),
                },
                Some(uri) if uri.starts_with("data:") => {
                    buffer_data.push(decode_data_uri(&uri)?);
                }
                Some(uri) => {
                    let location = join_location(base_path, &uri);
                    let bytes = self
                        .fetcher
                        .fetch(&location)
                        .await
                        .with_context(|| format!("Failed to load external buffer '{location}'"))?;
                    buffer_data.push(bytes);
                }
            }
        }
        Ok(buffer_data)
    }
}

impl Lane for GltfLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "GltfLoader"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Asset
    }
}

#[async_trait]
impl SceneLoaderLane for GltfLoaderLane {
    async fn load(&self, request: &LoadRequest) -> Result<ParsedAsset> {
        let bytes = self.fetcher.fetch(&request.location).await?;
        let gltf = gltf::Gltf::from_slice(&bytes)
            .with_context(|| format!("Failed to parse glTF file '{}'", request.location))?;
        let buffers = self.load_buffer_data(&gltf, &request.base_path).await?;

        let parsed = SceneBuilder::new(&gltf.document, &buffers, request.technique).build()?;
        log::debug!(
            "Parsed '{}': {} nodes, {} scenes, {} animations.",
            request.location,
            parsed.graph.len(),
            parsed.scenes.len(),
            parsed.animations.len()
        );
        Ok(parsed)
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (header, data) = uri
        .split_once(',')
        .ok_or_else(|| anyhow!("Malformed data URI"))?;
    match header {
        "data:application/octet-stream;base64" | "data:application/gltf-buffer;base64" => {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .context("Invalid base64 in data URI")
        }
        _ => bail!("Unsupported data URI format: {header}"),
    }
}

/// Builds the scene graph of one glTF document.
struct SceneBuilder<'a> {
    document: &'a gltf::Document,
    buffers: &'a [Vec<u8>],
    technique: MaterialTechnique,
    graph: SceneGraph,
    node_ids: Vec<NodeId>,
    meshes: HashMap<usize, Option<MeshData>>,
    materials: HashMap<Option<usize>, SharedMaterial>,
}

impl<'a> SceneBuilder<'a> {
    fn new(
        document: &'a gltf::Document,
        buffers: &'a [Vec<u8>],
        technique: MaterialTechnique,
    ) -> Self {
        Self {
            document,
            buffers,
            technique,
            graph: SceneGraph::new(),
            node_ids: Vec::new(),
            meshes: HashMap::new(),
            materials: HashMap::new(),
        }
    }

    fn build(mut self) -> Result<ParsedAsset> {
        let document = self.document;
        let joints: HashSet<usize> = document
            .skins()
            .flat_map(|skin| skin.joints().map(|j| j.index()))
            .collect();

        // Nodes first, in document order, so glTF indices map onto `node_ids`.
        for node in document.nodes() {
            let scene_node = self.build_node(&node, joints.contains(&node.index()));
            let id = self.graph.add(scene_node);
            self.node_ids.push(id);
        }
        for node in document.nodes() {
            let parent = self.node_ids[node.index()];
            for child in node.children() {
                self.graph.attach(parent, self.node_ids[child.index()]);
            }
        }

        // Skeletons reference other nodes, so they are bound once every node exists.
        for node in document.nodes() {
            if let (Some(skin), Some(_)) = (node.skin(), node.mesh()) {
                let skeleton = self.build_skeleton(&skin)?;
                self.graph[self.node_ids[node.index()]].skin = Some(skeleton);
            }
        }

        let mut scenes = Vec::new();
        for scene in document.scenes() {
            let root = self
                .graph
                .add(SceneNode::new(scene.name().unwrap_or_default(), NodeKind::Group));
            for node in scene.nodes() {
                let mut id = self.node_ids[node.index()];
                // Already placed by an earlier scene or a parent node.
                if self.graph[id].parent().is_some() {
                    log::debug!(
                        "Node {} is shared by several scenes, copying it into scene {}.",
                        node.index(),
                        scene.index()
                    );
                    id = self.graph.copy_subtree(id);
                }
                self.graph.attach(root, id);
            }
            scenes.push(root);
        }
        let scene = document
            .default_scene()
            .and_then(|s| scenes.get(s.index()).copied())
            .or_else(|| scenes.first().copied());

        let animations = self.build_animations();

        Ok(ParsedAsset {
            graph: self.graph,
            scene,
            scenes,
            animations,
        })
    }

    fn build_node(&mut self, node: &gltf::Node<'_>, is_joint: bool) -> SceneNode {
        let (translation, rotation, scale) = node.transform().decomposed();
        let mesh = node.mesh().and_then(|m| self.mesh_data(&m));

        let kind = if is_joint {
            NodeKind::Bone
        } else if mesh.is_some() && node.skin().is_some() {
            NodeKind::SkinnedMesh
        } else if mesh.is_some() {
            NodeKind::Mesh
        } else if node.children().next().is_some() {
            NodeKind::Group
        } else {
            NodeKind::Other
        };

        // Unnamed nodes get a synthetic name once, shared by animation tracks and every clone.
        let name = match node.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        let mut scene_node = SceneNode::new(name, kind).with_transform(
            Transform::new(
                Vec3::from_array(translation),
                Quaternion::from_array(rotation),
                Vec3::from_array(scale),
            ),
        );
        scene_node.mesh = mesh;
        scene_node.metadata = node_metadata(node);
        scene_node
    }

    fn mesh_data(&mut self, mesh: &gltf::Mesh<'_>) -> Option<MeshData> {
        if let Some(cached) = self.meshes.get(&mesh.index()) {
            return cached.clone();
        }

        let mut primitives = mesh.primitives();
        let data = match primitives.next() {
            Some(primitive) => {
                let buffers = self.buffers;
                let reader = primitive.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
                let geometry = Geometry {
                    positions: reader
                        .read_positions()
                        .map(|iter| iter.collect())
                        .unwrap_or_default(),
                    indices: reader.read_indices().map(|iter| iter.into_u32().collect()),
                };
                Some(MeshData {
                    geometry: Arc::new(geometry),
                    material: self.material(&primitive.material()),
                })
            }
            None => None,
        };
        if primitives.next().is_some() {
            log::debug!(
                "Mesh '{}' has several primitives, only the first one is kept.",
                mesh.name().unwrap_or_default()
            );
        }

        self.meshes.insert(mesh.index(), data.clone());
        data
    }

    fn material(&mut self, material: &gltf::Material<'_>) -> SharedMaterial {
        let unlit = self.technique.prefers_unlit() && material.unlit();
        self.materials
            .entry(material.index())
            .or_insert_with(|| {
                SharedMaterial::new(Material {
                    name: material.name().map(str::to_string),
                    base_color: material.pbr_metallic_roughness().base_color_factor(),
                    unlit,
                })
            })
            .clone()
    }

    fn build_skeleton(&self, skin: &gltf::Skin<'_>) -> Result<Skeleton> {
        let bones: Vec<NodeId> = skin.joints().map(|j| self.node_ids[j.index()]).collect();
        let buffers = self.buffers;
        let reader = skin.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
        let inverse_bind_matrices: Vec<Mat4> = match reader.read_inverse_bind_matrices() {
            Some(iter) => iter.map(Mat4::from_cols_array_2d).collect(),
            None => vec![Mat4::IDENTITY; bones.len()],
        };
        if inverse_bind_matrices.len() != bones.len() {
            bail!(
                "Skin {} has {} joints but {} inverse bind matrices",
                skin.index(),
                bones.len(),
                inverse_bind_matrices.len()
            );
        }
        Ok(Skeleton {
            bones,
            inverse_bind_matrices,
        })
    }

    fn build_animations(&self) -> Vec<AnimationClip> {
        let buffers = self.buffers;
        self.document
            .animations()
            .map(|animation| {
                let mut tracks = Vec::new();
                for channel in animation.channels() {
                    let target = channel.target();
                    let reader = channel.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
                    let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs())
                    else {
                        continue;
                    };
                    let (property, values): (TrackProperty, Vec<f32>) = match outputs {
                        ReadOutputs::Translations(it) => {
                            (TrackProperty::Translation, it.flatten().collect())
                        }
                        ReadOutputs::Rotations(it) => {
                            (TrackProperty::Rotation, it.into_f32().flatten().collect())
                        }
                        ReadOutputs::Scales(it) => (TrackProperty::Scale, it.flatten().collect()),
                        ReadOutputs::MorphTargetWeights(it) => {
                            (TrackProperty::Weights, it.into_f32().collect())
                        }
                    };
                    tracks.push(AnimationTrack {
                        target: self.graph[self.node_ids[target.node().index()]].name.clone(),
                        property,
                        times: inputs.collect::<Vec<f32>>().into(),
                        values: values.into(),
                    });
                }
                AnimationClip::new(animation.name().unwrap_or_default(), tracks)
            })
            .collect()
    }
}

fn node_metadata(node: &gltf::Node<'_>) -> Option<Map<String, Value>> {
    let raw = node.extras().as_ref()?;
    match serde_json::from_str::<Value>(raw.get()) {
        Ok(Value::Object(mut extras)) => match extras.remove(COMPONENTS_EXTRAS_KEY) {
            Some(Value::Object(components)) => Some(components),
            Some(_) => {
                log::warn!(
                    "Ignoring non-object '{COMPONENTS_EXTRAS_KEY}' extras on node '{}'.",
                    node.name().unwrap_or_default()
                );
                None
            }
            None => None,
        },
        Ok(_) => None,
        Err(e) => {
            log::warn!(
                "Ignoring malformed extras on node '{}': {e}",
                node.name().unwrap_or_default()
            );
            None
        }
    }
}
