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

//! Provides the foundational traits and primitive types for the asset system.
//!
//! This module defines the "common language" for all asset-related operations:
//! - The [`Asset`] trait: A marker for all types that can be treated as assets.
//! - [`AssetHandle`]: the shared, read-only pointer the cache hands out.
//! - [`LoadRequest`]: what a loader needs to know to fetch and parse one source.
//!
//! It has no knowledge of how assets are fetched, parsed or stored.

mod handle;
mod request;

pub use handle::*;
pub use request::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce that an asset can be shared between the tasks waiting on
/// the same cache entry and kept for the lifetime of the process.
///
/// # Examples
///
/// ```
/// use armature_core::asset::Asset;
///
/// struct Texture {
///     // ... fields
/// }
///
/// impl Asset for Texture {}
/// ```
pub trait Asset: Send + Sync + 'static {}
