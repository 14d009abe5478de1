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

//! Global gravity mode.

use prism_core::math::Vec3;
use prism_core::physics::STANDARD_GRAVITY;
use serde::{Deserialize, Serialize};

/// Whether gravity is on and which way it pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityMode {
    /// Gravity is applied at all.
    pub enabled: bool,
    /// Gravity pulls up instead of down.
    pub inverted: bool,
}

impl GravityMode {
    /// Normal downward gravity.
    pub const NORMAL: Self = Self {
        enabled: true,
        inverted: false,
    };

    /// The gravity vector this mode applies.
    pub fn vector(self) -> Vec3 {
        match (self.enabled, self.inverted) {
            (false, _) => Vec3::ZERO,
            (true, false) => Vec3::new(0.0, -STANDARD_GRAVITY, 0.0),
            (true, true) => Vec3::new(0.0, STANDARD_GRAVITY, 0.0),
        }
    }

    /// Flips `enabled`.
    pub fn toggled(self) -> Self {
        Self {
            enabled: !self.enabled,
            ..self
        }
    }

    /// Flips `inverted`.
    pub fn anti_toggled(self) -> Self {
        Self {
            inverted: !self.inverted,
            ..self
        }
    }
}

impl Default for GravityMode {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_vectors() {
        assert_eq!(GravityMode::NORMAL.vector().y, -STANDARD_GRAVITY);
        assert_eq!(GravityMode::NORMAL.anti_toggled().vector().y, STANDARD_GRAVITY);
        assert_eq!(GravityMode::NORMAL.toggled().vector(), Vec3::ZERO);
        // Inverting while disabled is remembered for when gravity comes back.
        let mode = GravityMode::NORMAL.toggled().anti_toggled().toggled();
        assert_eq!(mode.vector().y, STANDARD_GRAVITY);
    }
}
