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

use armature_data::ecs::WorldError;
use thiserror::Error;

/// Errors raised while inflating a scene tree into entities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InflateError {
    /// A recognized behavior key points at a behavior the host does not support.
    #[error("Inflator failed on node '{node}': behavior '{behavior}' does not exist")]
    UnknownBehavior {
        /// The host behavior name.
        behavior: String,
        /// The name of the node being inflated.
        node: String,
    },
    /// The host world rejected an operation.
    #[error(transparent)]
    Host(#[from] WorldError),
}
