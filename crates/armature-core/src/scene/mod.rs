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

//! Scene graph primitives: the tree a loader produces and the pipeline copies,
//! inflates and attaches.

mod animation;
mod asset;
mod graph;
mod material;
mod node;

pub use self::animation::{AnimationClip, AnimationTrack, TrackProperty};
pub use self::asset::{ClonedAsset, ParsedAsset};
pub use self::graph::{GraphId, NodeId, NodeRef, SceneGraph};
pub use self::material::{Material, SharedMaterial};
pub use self::node::{Geometry, MeshData, NodeKind, SceneNode, Skeleton, Transform};
