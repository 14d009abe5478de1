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

//! Provides a unit quaternion for body orientation.

use serde::{Deserialize, Serialize};

use super::vector::Vec3;

/// A rotation quaternion (`x`, `y`, `z` imaginary parts, `w` real part).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar part.
    pub w: f32,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components. The caller is responsible for normalization.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a rotation of `angle` radians around `axis`.
    ///
    /// A zero-length axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize();
        if axis == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Creates a rotation of `yaw` radians around the world +Y axis.
    #[inline]
    pub fn from_yaw(yaw: f32) -> Self {
        Self::from_axis_angle(Vec3::Y, yaw)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FRAC_PI_2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_yaw_quarter_turn_is_half_angle_about_y() {
        let q = Quat::from_yaw(FRAC_PI_2);
        let half = FRAC_PI_2 * 0.5;
        assert_abs_diff_eq!(q.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.y, half.sin(), epsilon = 1e-6);
        assert_abs_diff_eq!(q.z, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.w, half.cos(), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_axis_yields_identity() {
        assert_eq!(Quat::from_axis_angle(Vec3::ZERO, 1.0), Quat::IDENTITY);
        assert_eq!(Quat::from_yaw(0.0), Quat::IDENTITY);
    }
}
