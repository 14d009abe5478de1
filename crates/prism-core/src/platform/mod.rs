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

//! Provides abstractions over the host the sandbox runs in.
//!
//! The host (browser, window system) is only observed through
//! [`EnvironmentProbe`]; nothing here talks to a concrete platform.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// Size of the drawable area in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Creates a viewport.
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Width over height, `1.0` for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// A raw reading of the host's capabilities, before any classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    /// Current viewport.
    pub viewport: Viewport,
    /// Whether the host reports touch input.
    pub touch: bool,
    /// Whether any graphics context could be created.
    pub graphics_context: bool,
    /// Whether the secondary/advanced graphics context (e.g. WebGL2) is available.
    pub advanced_graphics_context: bool,
    /// Number of logical CPU cores, when the host exposes it.
    pub logical_cores: Option<u32>,
}

impl Default for EnvironmentReading {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            touch: false,
            graphics_context: true,
            advanced_graphics_context: true,
            logical_cores: None,
        }
    }
}

/// Trait for observing the capabilities of the host platform.
pub trait EnvironmentProbe {
    /// Returns the current environment reading.
    fn read(&self) -> EnvironmentReading;
}

/// An [`EnvironmentProbe`] backed by a shared, externally updated reading.
///
/// The host writes new readings through a cloned handle (e.g. from its resize
/// callback) and the profiler reads them on its own schedule.
#[derive(Debug, Clone, Default)]
pub struct SharedProbe {
    reading: Arc<Mutex<EnvironmentReading>>,
}

impl SharedProbe {
    /// Creates a probe holding `reading`.
    pub fn new(reading: EnvironmentReading) -> Self {
        Self {
            reading: Arc::new(Mutex::new(reading)),
        }
    }

    /// Replaces the stored reading.
    pub fn set(&self, reading: EnvironmentReading) {
        *self.reading.lock().unwrap_or_else(PoisonError::into_inner) = reading;
    }

    /// Replaces only the viewport of the stored reading.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.reading
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .viewport = viewport;
    }
}

impl EnvironmentProbe for SharedProbe {
    fn read(&self) -> EnvironmentReading {
        // Every write is a single copy, so a poisoned reading is never torn.
        *self.reading.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_probe_sees_updates_through_clones() {
        let probe = SharedProbe::new(EnvironmentReading::default());
        let host_side = probe.clone();
        host_side.set_viewport(Viewport::new(375.0, 812.0, 3.0));
        assert_eq!(probe.read().viewport.width, 375.0);
        assert_eq!(probe.read().viewport.pixel_ratio, 3.0);
    }

    #[test]
    fn test_poisoned_lock_keeps_last_reading_and_accepts_writes() {
        let probe = SharedProbe::new(EnvironmentReading::default());
        probe.set_viewport(Viewport::new(390.0, 844.0, 3.0));

        let host_side = probe.clone();
        let outcome = std::thread::spawn(move || {
            let _guard = host_side.reading.lock().unwrap();
            panic!("host callback failed while holding the reading");
        })
        .join();
        assert!(outcome.is_err());
        assert!(probe.reading.is_poisoned());

        assert_eq!(probe.read().viewport, Viewport::new(390.0, 844.0, 3.0));

        probe.set(EnvironmentReading {
            touch: true,
            ..EnvironmentReading::default()
        });
        assert!(probe.read().touch);
        probe.set_viewport(Viewport::new(1024.0, 768.0, 2.0));
        assert_eq!(probe.read().viewport.width, 1024.0);
        assert!(probe.read().touch);
    }

    #[test]
    fn test_degenerate_viewport_aspect() {
        assert_eq!(Viewport::new(0.0, 0.0, 1.0).aspect(), 1.0);
        assert_eq!(Viewport::new(200.0, 100.0, 1.0).aspect(), 2.0);
    }
}
