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

//! # Lane Abstraction
//!
//! A **Lane** is one stage of the model pipeline, implemented as a swappable
//! strategy. Agents hold lanes and sequence them.
//!
//! The system uses a two-level trait hierarchy:
//!
//! 1. **`Lane`** (this trait): identity and classification, shared by every lane.
//! 2. **Stage-specific traits or inherent methods**: the actual work. For example
//!    `SceneLoaderLane: Lane` turns a load request into a parsed scene.

use std::fmt;

/// Classification of lane types, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Fetching and parsing raw asset bytes.
    Asset,
    /// Transforming scene graphs (cloning, inflating into entities).
    Scene,
    /// Merging declared markup into entities.
    Template,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Asset => write!(f, "Asset"),
            LaneKind::Scene => write!(f, "Scene"),
            LaneKind::Template => write!(f, "Template"),
        }
    }
}

/// The base trait shared by every lane.
pub trait Lane: Send + Sync {
    /// A short, unique name for this strategy, used in logs.
    fn strategy_name(&self) -> &'static str;

    /// The stage this lane belongs to.
    fn lane_kind(&self) -> LaneKind;
}
