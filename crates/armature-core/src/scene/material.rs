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

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Surface parameters of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// The material name, if the source declared one.
    pub name: Option<String>,
    /// Linear RGBA base color factor.
    pub base_color: [f32; 4],
    /// Whether the material is rendered without lighting.
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            unlit: false,
        }
    }
}

/// A material that can be shared between several meshes and mutated in place.
///
/// Cloning a `SharedMaterial` shares it; [`SharedMaterial::duplicate`] makes an
/// independent copy.
#[derive(Debug, Clone)]
pub struct SharedMaterial(Arc<RwLock<Material>>);

impl SharedMaterial {
    /// Wraps a material.
    pub fn new(material: Material) -> Self {
        Self(Arc::new(RwLock::new(material)))
    }

    /// Returns a new, independent material with the same parameters.
    pub fn duplicate(&self) -> Self {
        Self::new(self.read().clone())
    }

    /// Locks the material for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Material> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the material for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Material> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both values refer to the same material.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl From<Material> for SharedMaterial {
    fn from(material: Material) -> Self {
        Self::new(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_independent() {
        let original = SharedMaterial::new(Material::default());
        let shared = original.clone();
        let copy = original.duplicate();

        copy.write().unlit = true;
        shared.write().base_color = [1.0, 0.0, 0.0, 1.0];

        assert!(!original.read().unlit);
        assert_eq!(original.read().base_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(copy.read().base_color, [1.0, 1.0, 1.0, 1.0]);
        assert!(SharedMaterial::ptr_eq(&original, &shared));
        assert!(!SharedMaterial::ptr_eq(&original, &copy));
    }
}
