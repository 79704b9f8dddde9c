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

use armature_core::asset::LoadError;
use armature_data::ecs::WorldError;
use armature_lanes::behavior_lane::InflateError;
use armature_lanes::scene_lane::CloneError;
use thiserror::Error;

/// Why a model request failed. Every variant is terminal for that request only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A `#id` reference names no asset item.
    #[error("asset item '{reference}' not found")]
    Resolution {
        /// The reference as requested.
        reference: String,
    },
    /// Fetching or parsing failed.
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    /// The parsed scene could not be cloned.
    #[error("clone failed: {0}")]
    Clone(#[from] CloneError),
    /// Inflation was misconfigured.
    #[error("inflation failed: {0}")]
    Inflation(#[from] InflateError),
    /// The host world rejected an operation.
    #[error("host error: {0}")]
    Host(#[from] WorldError),
}
