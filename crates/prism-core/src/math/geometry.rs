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

//! Ray and plane primitives for pointer picking.

use serde::{Deserialize, Serialize};

use super::vector::Vec3;
use super::EPSILON;

/// A half-line starting at `origin` and extending along `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Start point of the ray.
    pub origin: Vec3,
    /// Unit-length direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Returns the point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersects the ray with a plane.
    ///
    /// Returns `None` when the ray is parallel to the plane or the hit lies
    /// behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < EPSILON {
            return None;
        }
        let t = (plane.distance - plane.normal.dot(self.origin)) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}

/// An infinite plane `{ p | normal · p = distance }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal of the plane.
    pub normal: Vec3,
    /// Signed distance from the world origin along `normal`.
    pub distance: f32,
}

impl Plane {
    /// Creates a horizontal plane at the given height, facing +Y.
    #[inline]
    pub const fn horizontal(height: f32) -> Self {
        Self {
            normal: Vec3::Y,
            distance: height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_ground_from_above() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 1.0));
        let hit = ray.intersect_plane(&Plane::horizontal(0.0)).unwrap();
        assert!(hit.y.abs() < 1e-4);
        assert!((hit.z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_parallel_or_away_misses() {
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(parallel.intersect_plane(&Plane::horizontal(0.0)).is_none());

        let away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(away.intersect_plane(&Plane::horizontal(0.0)).is_none());
    }

    #[test]
    fn test_horizontal_plane_height() {
        let ray = Ray::new(Vec3::new(2.0, 5.0, 2.0), -Vec3::Y);
        let hit = ray.intersect_plane(&Plane::horizontal(1.5)).unwrap();
        assert!((hit.y - 1.5).abs() < 1e-5);
        assert_eq!((hit.x, hit.z), (2.0, 2.0));
    }
}
