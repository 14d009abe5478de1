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

//! Screen-to-world ray construction.

use crate::config::CameraConfig;
use prism_core::math::{Ray, Vec2, Vec3};
use prism_core::platform::Viewport;

/// A pinhole camera used only to unproject pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye position.
    pub position: Vec3,
    /// Point looked at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl PerspectiveCamera {
    /// Creates a camera.
    pub fn new(position: Vec3, target: Vec3, fov_y: f32) -> Self {
        Self {
            position,
            target,
            fov_y,
        }
    }

    /// Builds the ray from the eye through a screen point.
    ///
    /// `screen` is in logical pixels with the origin at the top-left corner.
    pub fn screen_ray(&self, screen: Vec2, viewport: &Viewport) -> Ray {
        let width = viewport.width.max(1.0);
        let height = viewport.height.max(1.0);
        let ndc_x = 2.0 * screen.x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / height;

        let forward = (self.target - self.position).normalize();
        let mut right = forward.cross(Vec3::Y).normalize();
        if right == Vec3::ZERO {
            // Looking straight up or down.
            right = Vec3::X;
        }
        let up = right.cross(forward);

        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * viewport.aspect();
        let direction = forward + right * (ndc_x * half_w) + up * (ndc_y * half_h);
        Ray::new(self.position, direction)
    }
}

impl From<&CameraConfig> for PerspectiveCamera {
    fn from(config: &CameraConfig) -> Self {
        Self::new(
            config.position,
            config.target,
            config.fov_y_degrees.to_radians(),
        )
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}
