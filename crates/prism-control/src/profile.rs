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

//! Device classification.

use prism_core::platform::{EnvironmentReading, Viewport};
use serde::{Deserialize, Serialize};

/// Viewports narrower than this are phones.
pub const MOBILE_MAX_WIDTH: f32 = 768.0;
/// Viewports narrower than this (and not phones) are tablets.
pub const TABLET_MAX_WIDTH: f32 = 1024.0;
/// Phones below this pixel ratio are treated as low-end.
pub const LOW_PIXEL_RATIO: f32 = 2.0;
/// Hosts with this many logical cores or fewer are treated as low-end.
pub const WEAK_CORE_COUNT: u32 = 2;

/// Coarse device-capability classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum GpuTier {
    /// Weak GPU, or missing capabilities.
    Low,
    /// Mid-range GPU.
    Medium,
    /// Desktop-class GPU.
    High,
}

/// Immutable snapshot of what the host can do. Replaced wholesale on change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Phone-sized viewport.
    pub mobile: bool,
    /// Tablet-sized viewport.
    pub tablet: bool,
    /// Estimated GPU capability.
    pub gpu_tier: GpuTier,
    /// Device pixel ratio.
    pub pixel_ratio: f32,
    /// Whether the host reports touch input.
    pub touch: bool,
    /// Whether a graphics context is usable at all. When `false` the caller
    /// is expected not to start the sandbox.
    pub graphics_context: bool,
    /// Viewport the profile was computed from.
    pub viewport: Viewport,
}

impl DeviceProfile {
    /// Classifies a raw environment reading. Deterministic and total.
    pub fn classify(reading: &EnvironmentReading) -> Self {
        let width = reading.viewport.width;
        let pixel_ratio = reading.viewport.pixel_ratio;
        let mobile = width < MOBILE_MAX_WIDTH;
        let tablet = !mobile && width < TABLET_MAX_WIDTH;
        let low_density_phone = mobile && pixel_ratio < LOW_PIXEL_RATIO;

        let mut gpu_tier = GpuTier::High;
        if low_density_phone {
            gpu_tier = GpuTier::Low;
        } else if tablet {
            gpu_tier = GpuTier::Medium;
        }

        let weak_cores = reading
            .logical_cores
            .is_some_and(|cores| cores <= WEAK_CORE_COUNT);
        if !reading.advanced_graphics_context || weak_cores || low_density_phone {
            gpu_tier = GpuTier::Low;
        }

        Self {
            mobile,
            tablet,
            gpu_tier,
            pixel_ratio,
            touch: reading.touch,
            graphics_context: reading.graphics_context,
            viewport: reading.viewport,
        }
    }

    /// A desktop profile with a high-tier GPU at the given viewport.
    pub fn desktop(viewport: Viewport) -> Self {
        Self::classify(&EnvironmentReading {
            viewport,
            ..Default::default()
        })
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::desktop(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(width: f32, pixel_ratio: f32) -> EnvironmentReading {
        EnvironmentReading {
            viewport: Viewport::new(width, 800.0, pixel_ratio),
            ..Default::default()
        }
    }

    #[test]
    fn test_desktop_is_high_tier() {
        let p = DeviceProfile::classify(&reading(1440.0, 1.0));
        assert!(!p.mobile && !p.tablet);
        assert_eq!(p.gpu_tier, GpuTier::High);
    }

    #[test]
    fn test_width_breakpoints() {
        assert!(DeviceProfile::classify(&reading(767.0, 3.0)).mobile);
        let at_768 = DeviceProfile::classify(&reading(768.0, 2.0));
        assert!(!at_768.mobile && at_768.tablet);
        let at_1024 = DeviceProfile::classify(&reading(1024.0, 2.0));
        assert!(!at_1024.mobile && !at_1024.tablet);
    }

    #[test]
    fn test_tablet_is_medium_tier() {
        assert_eq!(
            DeviceProfile::classify(&reading(900.0, 2.0)).gpu_tier,
            GpuTier::Medium
        );
    }

    #[test]
    fn test_phone_tier_depends_on_pixel_ratio() {
        assert_eq!(
            DeviceProfile::classify(&reading(390.0, 1.5)).gpu_tier,
            GpuTier::Low
        );
        assert_eq!(
            DeviceProfile::classify(&reading(390.0, 3.0)).gpu_tier,
            GpuTier::High
        );
    }

    #[test]
    fn test_hard_overrides_force_low_tier() {
        let mut no_advanced = reading(1440.0, 2.0);
        no_advanced.advanced_graphics_context = false;
        assert_eq!(DeviceProfile::classify(&no_advanced).gpu_tier, GpuTier::Low);

        let mut two_cores = reading(900.0, 2.0);
        two_cores.logical_cores = Some(2);
        assert_eq!(DeviceProfile::classify(&two_cores).gpu_tier, GpuTier::Low);

        let mut four_cores = reading(1440.0, 2.0);
        four_cores.logical_cores = Some(4);
        assert_eq!(DeviceProfile::classify(&four_cores).gpu_tier, GpuTier::High);
    }

    #[test]
    fn test_missing_graphics_context_is_reported_not_raised() {
        let mut none = reading(1440.0, 1.0);
        none.graphics_context = false;
        none.advanced_graphics_context = false;
        let p = DeviceProfile::classify(&none);
        assert!(!p.graphics_context);
        assert_eq!(p.gpu_tier, GpuTier::Low);
    }
}
