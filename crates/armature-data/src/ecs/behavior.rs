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

/// What the host knows about a behavior that can be attached to entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehaviorSchema {
    /// Whether an entity can carry several independent instances of the behavior.
    /// Instances are stored under `<name>__<index>` attribute keys.
    pub multiple: bool,
}

impl BehaviorSchema {
    /// A behavior with at most one instance per entity.
    pub const SINGLE: Self = Self { multiple: false };
    /// A behavior with any number of instances per entity.
    pub const MULTIPLE: Self = Self { multiple: true };

    /// The attribute key of instance `index` of behavior `name`.
    pub fn instance_key(name: &str, index: usize) -> String {
        format!("{name}__{index}")
    }
}
