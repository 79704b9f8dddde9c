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

use armature_core::asset::LoadRequest;
use armature_core::lane::Lane;
use armature_core::scene::ParsedAsset;
use async_trait::async_trait;

/// A lane that turns a load request into a parsed scene.
///
/// This is the "Data Plane" of asset loading: implementors fetch the bytes of the
/// requested location and any resources it references, then decode them into a
/// [`ParsedAsset`]. Deduplication is not their concern; callers go through the
/// asset cache.
#[async_trait]
pub trait SceneLoaderLane: Lane {
    /// Fetches and parses the asset described by `request`.
    async fn load(&self, request: &LoadRequest) -> anyhow::Result<ParsedAsset>;
}
