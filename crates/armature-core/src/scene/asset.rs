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

use super::{AnimationClip, NodeId, SceneGraph};
use crate::asset::Asset;

/// The result of parsing an asset bundle.
///
/// Stored in the asset cache and shared read-only by every requester. Anything that
/// needs to pose, re-parent or recolor the tree works on a [`ClonedAsset`].
#[derive(Debug)]
pub struct ParsedAsset {
    /// All nodes of all scenes.
    pub graph: SceneGraph,
    /// The root of the default scene.
    pub scene: Option<NodeId>,
    /// The roots of every scene, including the default one.
    pub scenes: Vec<NodeId>,
    /// The animation clips of the bundle.
    pub animations: Vec<AnimationClip>,
}

impl Asset for ParsedAsset {}

/// An independent, mutable copy of the default scene of a [`ParsedAsset`].
#[derive(Debug)]
pub struct ClonedAsset {
    /// The copied nodes.
    pub graph: SceneGraph,
    /// The copy of the default scene root.
    pub root: NodeId,
}
