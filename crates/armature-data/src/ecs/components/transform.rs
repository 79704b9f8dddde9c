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

use armature_core::math::{degrees_to_radians, radians_to_degrees, EulerOrder, Quaternion, Vec3};
use armature_core::scene::Transform;
use serde_json::Value;

/// The attribute key of an entity's position.
pub const POSITION_ATTRIBUTE: &str = "position";
/// The attribute key of an entity's rotation.
pub const ROTATION_ATTRIBUTE: &str = "rotation";
/// The attribute key of an entity's scale.
pub const SCALE_ATTRIBUTE: &str = "scale";

/// The placement of an entity relative to its parent, as exposed through its
/// `position`, `rotation` and `scale` attributes.
///
/// Rotation is expressed as Euler angles in **degrees**, applied in `YXZ` order.
/// Each attribute is stored as an `{ "x", "y", "z" }` object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTransform {
    /// The translation.
    pub position: Vec3,
    /// `YXZ` Euler angles in degrees.
    pub rotation: Vec3,
    /// The scale.
    pub scale: Vec3,
}

impl EntityTransform {
    /// The rotation order of the `rotation` attribute.
    pub const ROTATION_ORDER: EulerOrder = EulerOrder::Yxz;

    /// Converts a node transform into entity attribute values.
    pub fn from_node(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            rotation: transform
                .rotation
                .to_euler(Self::ROTATION_ORDER)
                .map(radians_to_degrees),
            scale: transform.scale,
        }
    }

    /// Converts the attribute values back into a node transform.
    pub fn to_node(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: Quaternion::from_euler(
                Self::ROTATION_ORDER,
                self.rotation.map(degrees_to_radians),
            ),
            scale: self.scale,
        }
    }

    pub(crate) fn to_attributes(self) -> [(&'static str, Value); 3] {
        [
            (POSITION_ATTRIBUTE, vec3_value(self.position)),
            (ROTATION_ATTRIBUTE, vec3_value(self.rotation)),
            (SCALE_ATTRIBUTE, vec3_value(self.scale)),
        ]
    }

    pub(crate) fn from_attributes(
        position: Option<&Value>,
        rotation: Option<&Value>,
        scale: Option<&Value>,
    ) -> Self {
        Self {
            position: position.and_then(parse_vec3).unwrap_or(Vec3::ZERO),
            rotation: rotation.and_then(parse_vec3).unwrap_or(Vec3::ZERO),
            scale: scale.and_then(parse_vec3).unwrap_or(Vec3::ONE),
        }
    }
}

impl Default for EntityTransform {
    fn default() -> Self {
        Self::from_node(&Transform::IDENTITY)
    }
}

fn vec3_value(v: Vec3) -> Value {
    serde_json::json!({ "x": v.x, "y": v.y, "z": v.z })
}

fn parse_vec3(value: &Value) -> Option<Vec3> {
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quarter_turn_about_y() {
        let node = Transform {
            rotation: Quaternion::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2),
            ..Transform::IDENTITY
        };
        let entity = EntityTransform::from_node(&node);
        assert_relative_eq!(entity.rotation.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(entity.rotation.y, 90.0, epsilon = 1e-3);
        assert_relative_eq!(entity.rotation.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_attribute_round_trip() {
        let entity = EntityTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(10.0, 20.0, 30.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let [(_, p), (_, r), (_, s)] = entity.to_attributes();
        let back = EntityTransform::from_attributes(Some(&p), Some(&r), Some(&s));
        assert_eq!(back, entity);
    }

    #[test]
    fn test_missing_attributes_default_to_identity() {
        let back = EntityTransform::from_attributes(None, None, None);
        assert_eq!(back.scale, Vec3::ONE);
        assert!(back.to_node().is_identity());
    }
}
