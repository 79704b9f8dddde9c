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

//! The behavior-inflator registry consulted while inflating scene nodes.
//!
//! Node metadata maps a behavior key to its configuration. A key is *recognized* when
//! it has a [`BehaviorBinding`] in the [`BehaviorRegistry`]; the binding names the host
//! behavior to configure and, optionally, a custom [`Inflator`]. Without one,
//! [`default_inflator`] writes the configuration as attributes.

mod error;
mod inflator;
mod registry;

pub use error::InflateError;
pub use inflator::{default_inflator, Inflator};
pub use registry::{BehaviorBinding, BehaviorRegistry};
