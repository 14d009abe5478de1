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

//! The adaptive quality loop.
//!
//! `QualityController` owns the mutable [`QualityState`]. A profile change
//! re-derives the bounds and budgets; frame-rate signals move the resolution
//! multiplier one step at a time once they have been sustained long enough.

use crate::analysis::{FrameRateConfig, FrameRateMonitor, FrameSignal};
use crate::profile::{DeviceProfile, GpuTier};
use serde::{Deserialize, Serialize};

/// Multiplier change per sustained signal unless configured otherwise.
const DEFAULT_STEP: f32 = 0.5;

/// Shadow rendering budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowTier {
    /// No shadow casting.
    Off,
    /// Small shadow map.
    Low,
    /// Full-size shadow map.
    High,
}

impl ShadowTier {
    /// Edge length of the shadow map in texels, `0` when shadows are off.
    pub fn shadow_map_size(self) -> u32 {
        match self {
            ShadowTier::Off => 0,
            ShadowTier::Low => 1024,
            ShadowTier::High => 2048,
        }
    }
}

/// Post-processing and decorative effects budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectTier {
    /// Only what is required to draw the scene.
    Minimal,
    /// Cheap effects only.
    Reduced,
    /// Everything enabled.
    Full,
}

/// Inclusive range the resolution multiplier is kept in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionBounds {
    /// Lowest multiplier reachable through decline steps.
    pub floor: f32,
    /// Highest multiplier reachable through incline steps.
    pub ceiling: f32,
}

impl ResolutionBounds {
    /// Creates bounds, swapping the values if given out of order.
    pub fn new(floor: f32, ceiling: f32) -> Self {
        if floor <= ceiling {
            Self { floor, ceiling }
        } else {
            Self {
                floor: ceiling,
                ceiling: floor,
            }
        }
    }

    /// Selects the bounds for `profile`. Tablets share the desktop bounds.
    pub fn for_profile(profile: &DeviceProfile, config: &QualityConfig) -> Self {
        if profile.mobile {
            config.mobile_bounds
        } else {
            config.desktop_bounds
        }
    }

    /// Clamps `value` into the range.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.floor, self.ceiling)
    }

    /// Returns `true` if `value` lies within the range.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.floor && value <= self.ceiling
    }
}

/// Tuning for the [`QualityController`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Multiplier change per sustained signal.
    pub step: f32,
    /// Consecutive signals of one direction required before stepping.
    pub sustain_count: u32,
    /// Multiplier forced by a fallback signal, regardless of the floor.
    pub fallback_multiplier: f32,
    /// Bounds for desktops and tablets.
    pub desktop_bounds: ResolutionBounds,
    /// Bounds for phones.
    pub mobile_bounds: ResolutionBounds,
    /// Object cap on phones.
    pub mobile_object_cap: usize,
    /// Object cap on tablets.
    pub tablet_object_cap: usize,
    /// Object cap everywhere else.
    pub desktop_object_cap: usize,
    /// Frame-rate analysis thresholds.
    pub frame_rate: FrameRateConfig,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            sustain_count: 3,
            fallback_multiplier: 0.5,
            desktop_bounds: ResolutionBounds::new(1.0, 2.0),
            mobile_bounds: ResolutionBounds::new(0.75, 1.5),
            mobile_object_cap: 30,
            tablet_object_cap: 40,
            desktop_object_cap: 60,
            frame_rate: FrameRateConfig::default(),
        }
    }
}

impl QualityConfig {
    /// Object cap for `profile`.
    pub fn object_cap(&self, profile: &DeviceProfile) -> usize {
        if profile.mobile {
            self.mobile_object_cap
        } else if profile.tablet {
            self.tablet_object_cap
        } else {
            self.desktop_object_cap
        }
    }
}

/// The derived quality budgets currently in force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityState {
    /// Rendering pixel-density scale factor.
    pub resolution_multiplier: f32,
    /// Maximum number of live objects.
    pub object_cap: usize,
    /// Shadow budget.
    pub shadow_tier: ShadowTier,
    /// Effects budget.
    pub effect_tier: EffectTier,
    /// Set by a fallback signal, cleared by the next incline step or profile change.
    pub fallback_active: bool,
}

/// Closed-loop controller deriving [`QualityState`] from a [`DeviceProfile`]
/// and frame-rate feedback.
#[derive(Debug, Clone)]
pub struct QualityController {
    config: QualityConfig,
    profile: DeviceProfile,
    bounds: ResolutionBounds,
    state: QualityState,
    monitor: FrameRateMonitor,
    decline_streak: u32,
    incline_streak: u32,
}

impl QualityController {
    /// Creates a controller for `profile`. The multiplier starts at the
    /// device pixel ratio clamped into the profile's bounds.
    pub fn new(profile: DeviceProfile, config: QualityConfig) -> Self {
        let bounds = ResolutionBounds::for_profile(&profile, &config);
        let (shadow_tier, effect_tier) = tiers_for(profile.gpu_tier, false);
        let state = QualityState {
            resolution_multiplier: bounds.clamp(profile.pixel_ratio),
            object_cap: config.object_cap(&profile),
            shadow_tier,
            effect_tier,
            fallback_active: false,
        };
        let monitor = FrameRateMonitor::new(config.frame_rate.clone());
        log::info!(
            "QualityController: multiplier {:.2} in [{:.2}, {:.2}], object cap {}",
            state.resolution_multiplier,
            bounds.floor,
            bounds.ceiling,
            state.object_cap
        );
        Self {
            config,
            profile,
            bounds,
            state,
            monitor,
            decline_streak: 0,
            incline_streak: 0,
        }
    }

    /// Re-derives bounds and budgets from a new profile.
    ///
    /// The multiplier is kept and re-clamped rather than reset, and any
    /// active fallback is cleared.
    pub fn apply_profile(&mut self, profile: DeviceProfile) -> QualityState {
        self.profile = profile;
        self.bounds = ResolutionBounds::for_profile(&profile, &self.config);
        self.state.resolution_multiplier = self.bounds.clamp(self.state.resolution_multiplier);
        self.state.object_cap = self.config.object_cap(&profile);
        self.state.fallback_active = false;
        self.refresh_tiers();
        self.decline_streak = 0;
        self.incline_streak = 0;
        // Samples taken under the old profile must not steer the new one.
        self.monitor.reset();
        log::info!(
            "QualityController: profile applied (gpu={:?}), multiplier {:.2}, cap {}",
            profile.gpu_tier,
            self.state.resolution_multiplier,
            self.state.object_cap
        );
        self.state
    }

    /// Feeds one frame-rate signal. Returns `true` if the state changed.
    pub fn apply_signal(&mut self, signal: FrameSignal) -> bool {
        let before = self.state;
        match signal {
            FrameSignal::Decline => {
                self.incline_streak = 0;
                self.decline_streak += 1;
                if self.decline_streak >= self.config.sustain_count {
                    self.decline_streak = 0;
                    self.step_down();
                }
            }
            FrameSignal::Incline => {
                self.decline_streak = 0;
                self.incline_streak += 1;
                if self.incline_streak >= self.config.sustain_count {
                    self.incline_streak = 0;
                    self.step_up();
                }
            }
            FrameSignal::Steady => {
                self.decline_streak = 0;
                self.incline_streak = 0;
            }
            FrameSignal::Fallback => {
                self.decline_streak = 0;
                self.incline_streak = 0;
                self.state.resolution_multiplier = self.config.fallback_multiplier;
                self.state.fallback_active = true;
                self.refresh_tiers();
                log::warn!(
                    "QualityController: fallback engaged, multiplier forced to {:.2}",
                    self.state.resolution_multiplier
                );
            }
        }
        self.state != before
    }

    /// Records a frame duration in seconds and applies any resulting signal.
    pub fn record_frame(&mut self, dt_seconds: f32) -> Option<FrameSignal> {
        let signal = self.monitor.record_frame(dt_seconds)?;
        self.apply_signal(signal);
        Some(signal)
    }

    fn step_down(&mut self) {
        let current = self.state.resolution_multiplier;
        // Below the floor only after a fallback; a decline must not lift it back up.
        if current <= self.bounds.floor {
            return;
        }
        let next = self.bounds.clamp(current - self.step_size());
        log::info!("QualityController: sustained decline, multiplier {:.2} -> {:.2}", current, next);
        self.state.resolution_multiplier = next;
    }

    fn step_up(&mut self) {
        let current = self.state.resolution_multiplier;
        if current >= self.bounds.ceiling {
            return;
        }
        let next = self.bounds.clamp(current + self.step_size());
        log::info!("QualityController: sustained incline, multiplier {:.2} -> {:.2}", current, next);
        self.state.resolution_multiplier = next;
        if self.state.fallback_active {
            self.state.fallback_active = false;
            self.refresh_tiers();
        }
    }

    /// The configured step, or the default when it is not a positive number.
    fn step_size(&self) -> f32 {
        if self.config.step.is_finite() && self.config.step > 0.0 {
            self.config.step
        } else {
            DEFAULT_STEP
        }
    }

    fn refresh_tiers(&mut self) {
        let (shadow, effect) = tiers_for(self.profile.gpu_tier, self.state.fallback_active);
        self.state.shadow_tier = shadow;
        self.state.effect_tier = effect;
    }

    /// Current quality budgets.
    pub fn state(&self) -> QualityState {
        self.state
    }

    /// Bounds of the active profile.
    pub fn bounds(&self) -> ResolutionBounds {
        self.bounds
    }

    /// Profile the budgets are derived from.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Measured frame rate.
    pub fn frame_rate(&self) -> f32 {
        self.monitor.frame_rate()
    }
}

fn tiers_for(gpu: GpuTier, fallback: bool) -> (ShadowTier, EffectTier) {
    if fallback {
        return (ShadowTier::Off, EffectTier::Minimal);
    }
    match gpu {
        GpuTier::High => (ShadowTier::High, EffectTier::Full),
        GpuTier::Medium => (ShadowTier::Low, EffectTier::Reduced),
        GpuTier::Low => (ShadowTier::Off, EffectTier::Minimal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::platform::{EnvironmentReading, Viewport};

    fn profile(width: f32, pixel_ratio: f32) -> DeviceProfile {
        DeviceProfile::classify(&EnvironmentReading {
            viewport: Viewport::new(width, 800.0, pixel_ratio),
            ..Default::default()
        })
    }

    fn controller(width: f32, pixel_ratio: f32) -> QualityController {
        QualityController::new(profile(width, pixel_ratio), QualityConfig::default())
    }

    #[test]
    fn test_initial_state_follows_profile() {
        let desktop = controller(1440.0, 2.0).state();
        assert_eq!(desktop.resolution_multiplier, 2.0);
        assert_eq!(desktop.object_cap, 60);
        assert_eq!(desktop.shadow_tier, ShadowTier::High);

        let tablet = controller(900.0, 2.0);
        assert_eq!(tablet.state().object_cap, 40);
        assert_eq!(tablet.bounds(), ResolutionBounds::new(1.0, 2.0));
        assert_eq!(tablet.state().effect_tier, EffectTier::Reduced);

        let phone = controller(390.0, 3.0);
        assert_eq!(phone.state().object_cap, 30);
        assert_eq!(phone.state().resolution_multiplier, 1.5);
    }

    #[test]
    fn test_decline_needs_sustained_signals() {
        let mut qc = controller(1440.0, 2.0);
        assert!(!qc.apply_signal(FrameSignal::Decline));
        assert!(!qc.apply_signal(FrameSignal::Decline));
        assert!(qc.apply_signal(FrameSignal::Decline));
        assert_eq!(qc.state().resolution_multiplier, 1.5);
    }

    #[test]
    fn test_steady_breaks_the_streak() {
        let mut qc = controller(1440.0, 2.0);
        qc.apply_signal(FrameSignal::Decline);
        qc.apply_signal(FrameSignal::Decline);
        qc.apply_signal(FrameSignal::Steady);
        qc.apply_signal(FrameSignal::Decline);
        assert_eq!(qc.state().resolution_multiplier, 2.0);
    }

    #[test]
    fn test_multiplier_stays_within_bounds() {
        for (width, dpr) in [(1440.0, 1.0), (900.0, 2.0), (390.0, 3.0), (390.0, 1.0)] {
            let mut qc = controller(width, dpr);
            let bounds = qc.bounds();
            for _ in 0..50 {
                qc.apply_signal(FrameSignal::Decline);
                assert!(bounds.contains(qc.state().resolution_multiplier));
            }
            assert_eq!(qc.state().resolution_multiplier, bounds.floor);
            for _ in 0..50 {
                qc.apply_signal(FrameSignal::Incline);
                assert!(bounds.contains(qc.state().resolution_multiplier));
            }
            assert_eq!(qc.state().resolution_multiplier, bounds.ceiling);
        }
    }

    #[test]
    fn test_invalid_step_keeps_multiplier_in_bounds() {
        for step in [-0.5, 0.0, f32::NAN, f32::INFINITY, 10.0] {
            let config = QualityConfig {
                step,
                sustain_count: 1,
                ..Default::default()
            };
            let mut qc = QualityController::new(profile(1440.0, 1.5), config);
            let bounds = qc.bounds();
            for signal in [FrameSignal::Decline, FrameSignal::Incline] {
                for _ in 0..10 {
                    qc.apply_signal(signal);
                    let multiplier = qc.state().resolution_multiplier;
                    assert!(bounds.contains(multiplier), "step {step}: {multiplier}");
                }
            }
            assert_eq!(qc.state().resolution_multiplier, bounds.ceiling);
        }
    }

    #[test]
    fn test_profile_change_discards_old_frame_samples() {
        let mut qc = controller(1440.0, 2.0);
        // 29 slow frames: one short of a complete decline window.
        for _ in 0..29 {
            qc.record_frame(1.0 / 10.0);
        }
        qc.apply_profile(profile(1440.0, 2.0));
        assert_eq!(qc.frame_rate(), 0.0);
        let signals: Vec<FrameSignal> = (0..30).filter_map(|_| qc.record_frame(1.0 / 60.0)).collect();
        assert_eq!(signals, vec![FrameSignal::Incline]);
        assert_eq!(qc.state().resolution_multiplier, 2.0);
    }

    #[test]
    fn test_fallback_overrides_floor() {
        let mut qc = controller(1440.0, 2.0);
        assert!(qc.apply_signal(FrameSignal::Fallback));
        let state = qc.state();
        assert_eq!(state.resolution_multiplier, 0.5);
        assert!(state.fallback_active);
        assert_eq!(state.shadow_tier, ShadowTier::Off);
        assert_eq!(state.effect_tier, EffectTier::Minimal);

        for _ in 0..9 {
            qc.apply_signal(FrameSignal::Decline);
        }
        assert_eq!(qc.state().resolution_multiplier, 0.5);
    }

    #[test]
    fn test_incline_recovers_from_fallback() {
        let mut qc = controller(1440.0, 2.0);
        qc.apply_signal(FrameSignal::Fallback);
        for _ in 0..3 {
            qc.apply_signal(FrameSignal::Incline);
        }
        let state = qc.state();
        assert_eq!(state.resolution_multiplier, 1.0);
        assert!(!state.fallback_active);
        assert_eq!(state.shadow_tier, ShadowTier::High);
    }

    #[test]
    fn test_profile_change_reclamps_and_recaps() {
        let mut qc = controller(1440.0, 2.0);
        let state = qc.apply_profile(profile(390.0, 3.0));
        assert_eq!(state.resolution_multiplier, 1.5);
        assert_eq!(state.object_cap, 30);
    }

    #[test]
    fn test_record_frame_drives_the_loop() {
        let mut qc = controller(1440.0, 2.0);
        let mut signals = 0;
        for _ in 0..90 {
            if qc.record_frame(1.0 / 30.0).is_some() {
                signals += 1;
            }
        }
        assert_eq!(signals, 3);
        assert_eq!(qc.state().resolution_multiplier, 1.5);
        assert!((qc.frame_rate() - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_shadow_map_sizes() {
        assert_eq!(ShadowTier::Off.shadow_map_size(), 0);
        assert_eq!(ShadowTier::Low.shadow_map_size(), 1024);
        assert_eq!(ShadowTier::High.shadow_map_size(), 2048);
    }
}
