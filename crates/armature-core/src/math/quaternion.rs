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

//! Provides a Quaternion type for representing 3D rotations, with Euler conversions.

use serde::{Deserialize, Serialize};

use super::{Vec3, EPSILON};
use std::ops::{Mul, Neg};

/// The order in which Euler angles are applied.
///
/// Only the orders the engine actually exchanges are listed. Scene nodes keep
/// quaternions; entity rotation attributes are `YXZ` Euler angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EulerOrder {
    /// Rotate around X, then Y, then Z (intrinsic).
    #[default]
    Xyz,
    /// Rotate around Y, then X, then Z (intrinsic). The entity attribute convention.
    Yxz,
}

/// Represents a quaternion for 3D rotations.
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the "vector" part
/// and `w` is the "scalar" part. For representing rotations, it should be a "unit
/// quaternion" where `x² + y² + z² + w² = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion from a `[x, y, z, w]` array, the layout used by glTF.
    #[inline]
    pub fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Creates a quaternion representing a rotation around a given axis by a given angle.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let normalized_axis = axis.normalize();
        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        Self {
            x: normalized_axis.x * s,
            y: normalized_axis.y * s,
            z: normalized_axis.z * s,
            w: c,
        }
    }

    /// Creates a quaternion from Euler angles in radians applied in the given order.
    pub fn from_euler(order: EulerOrder, angles: Vec3) -> Self {
        let (s1, c1) = (angles.x * 0.5).sin_cos();
        let (s2, c2) = (angles.y * 0.5).sin_cos();
        let (s3, c3) = (angles.z * 0.5).sin_cos();

        match order {
            EulerOrder::Xyz => Self {
                x: s1 * c2 * c3 + c1 * s2 * s3,
                y: c1 * s2 * c3 - s1 * c2 * s3,
                z: c1 * c2 * s3 + s1 * s2 * c3,
                w: c1 * c2 * c3 - s1 * s2 * s3,
            },
            EulerOrder::Yxz => Self {
                x: s1 * c2 * c3 + c1 * s2 * s3,
                y: c1 * s2 * c3 - s1 * c2 * s3,
                z: c1 * c2 * s3 - s1 * s2 * c3,
                w: c1 * c2 * c3 + s1 * s2 * s3,
            },
        }
    }

    /// Decomposes the rotation into Euler angles in radians for the given order.
    ///
    /// The returned vector always holds the X, Y and Z angles in its `x`, `y` and `z`
    /// components, whatever the order. Near the gimbal-lock singularity the third
    /// angle is folded into the second and reported as zero.
    pub fn to_euler(&self, order: EulerOrder) -> Vec3 {
        let q = self.normalize();
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);

        // Row-major elements of the equivalent rotation matrix.
        let m11 = 1.0 - 2.0 * (y * y + z * z);
        let m12 = 2.0 * (x * y - w * z);
        let m13 = 2.0 * (x * z + w * y);
        let m21 = 2.0 * (x * y + w * z);
        let m22 = 1.0 - 2.0 * (x * x + z * z);
        let m23 = 2.0 * (y * z - w * x);
        let m31 = 2.0 * (x * z - w * y);
        let m32 = 2.0 * (y * z + w * x);
        let m33 = 1.0 - 2.0 * (x * x + y * y);

        const SINGULAR: f32 = 0.999_999_9;

        match order {
            EulerOrder::Xyz => {
                let ey = m13.clamp(-1.0, 1.0).asin();
                if m13.abs() < SINGULAR {
                    Vec3::new((-m23).atan2(m33), ey, (-m12).atan2(m11))
                } else {
                    Vec3::new(m32.atan2(m22), ey, 0.0)
                }
            }
            EulerOrder::Yxz => {
                let ex = (-m23.clamp(-1.0, 1.0)).asin();
                if m23.abs() < SINGULAR {
                    Vec3::new(ex, m13.atan2(m33), m21.atan2(m22))
                } else {
                    Vec3::new(ex, (-m31).atan2(m11), 0.0)
                }
            }
        }
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Calculates the length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a normalized version of the quaternion with a length of 1.
    /// If the quaternion has a near-zero magnitude, it returns the identity quaternion.
    pub fn normalize(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            let inv_mag = 1.0 / mag_sq.sqrt();
            Self {
                x: self.x * inv_mag,
                y: self.y * inv_mag,
                z: self.z * inv_mag,
                w: self.w * inv_mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Returns `true` if both quaternions describe the same rotation within `epsilon`.
    ///
    /// `q` and `-q` are the same rotation, so the comparison uses the absolute dot product.
    #[inline]
    pub fn same_rotation(&self, other: Self, epsilon: f32) -> bool {
        (self.normalize().dot(other.normalize()).abs() - 1.0).abs() < epsilon
    }
}

impl Default for Quaternion {
    /// Returns the identity quaternion, representing no rotation.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl Neg for Quaternion {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
