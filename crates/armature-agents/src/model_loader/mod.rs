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

//! The model loader agent of a host entity.
//!
//! A loader resolves its source, fetches the parsed scene through the shared asset
//! cache, clones it, optionally inflates it into entities, binds the host's
//! templates, and swaps the result in place of the previous one.

mod config;
mod error;
mod loader;

pub use config::ModelLoaderConfig;
pub use error::ModelError;
pub use loader::{LoadOutcome, LoaderPhase, ModelLoader};
