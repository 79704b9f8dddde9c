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

//! # Armature Lanes
//!
//! The pipeline stages of model loading, each a [`Lane`](armature_core::lane::Lane):
//! parsing glTF into scenes, cloning scenes per instance, inflating nodes into host
//! entities, and binding declared templates onto them.

#![warn(missing_docs)]

pub mod asset_lane;
pub mod behavior_lane;
pub mod scene_lane;
