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

//! The host entity system the model pipeline inflates into.
//!
//! The primary entry point is the [`World`] struct, usually shared between tasks as
//! a [`SharedWorld`].

mod behavior;
mod components;
mod entity_store;
mod error;
mod identity;
mod shared;
mod world;

pub use armature_core::ecs::EntityId;
pub use behavior::BehaviorSchema;
pub use components::*;
pub use error::WorldError;
pub use identity::sanitize_name;
pub use shared::SharedWorld;
pub use world::World;

#[cfg(test)]
mod tests;
