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

//! Provides the small set of mathematics primitives the sandbox needs.
//!
//! Vectors, a rotation quaternion, a linear color and the ray/plane pair used
//! to turn pointer positions into world-space points.

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, TAU};

pub mod color;
pub mod geometry;
pub mod quaternion;
pub mod vector;

pub use self::color::LinearRgba;
pub use self::geometry::{Plane, Ray};
pub use self::quaternion::Quat;
pub use self::vector::{Vec2, Vec3};

/// Clamps a floating-point value to the `[0.0, 1.0]` range. NaN maps to `0.0`.
#[inline]
pub fn saturate(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
