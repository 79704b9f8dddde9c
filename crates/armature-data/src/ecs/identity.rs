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

//! Derivation of entity identities from scene node names.

/// Reduces a node name to the characters allowed in an entity class: ASCII letters,
/// digits, `_` and `-`. Everything else is dropped.
///
/// # Examples
///
/// ```
/// use armature_data::ecs::sanitize_name;
/// assert_eq!(sanitize_name("Hand_L"), "Hand_L");
/// assert_eq!(sanitize_name("mixamorig:Head.001"), "mixamorigHead001");
/// ```
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
