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

//! Environment probing for native hosts.

use prism_core::platform::{EnvironmentProbe, EnvironmentReading, SharedProbe, Viewport};
use sysinfo::System;
use winit::dpi::PhysicalSize;

/// An [`EnvironmentProbe`] for a native window.
///
/// The logical core count comes from `sysinfo` once at construction. The
/// viewport is pushed by the window's resize and scale-factor callbacks
/// through [`HostProbe::update_window`]; clones share the same reading.
#[derive(Debug, Clone)]
pub struct HostProbe {
    shared: SharedProbe,
}

impl HostProbe {
    /// Creates a probe for a window of `viewport`.
    pub fn new(viewport: Viewport, touch: bool) -> Self {
        let logical_cores = logical_core_count();
        log::debug!("HostProbe: {:?} logical cores detected", logical_cores);
        Self {
            shared: SharedProbe::new(EnvironmentReading {
                viewport,
                touch,
                graphics_context: true,
                advanced_graphics_context: true,
                logical_cores,
            }),
        }
    }

    /// Records a new window size and scale factor.
    pub fn update_window(&self, size: PhysicalSize<u32>, scale_factor: f64) {
        self.shared.set_viewport(viewport_from_physical(size, scale_factor));
    }

    /// Records whether an advanced graphics context could be created.
    pub fn set_graphics_support(&self, graphics_context: bool, advanced: bool) {
        let mut reading = self.shared.read();
        reading.graphics_context = graphics_context;
        reading.advanced_graphics_context = advanced;
        self.shared.set(reading);
    }
}

impl EnvironmentProbe for HostProbe {
    fn read(&self) -> EnvironmentReading {
        self.shared.read()
    }
}

/// Converts a physical window size to a logical [`Viewport`].
pub fn viewport_from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let logical = size.to_logical::<f64>(scale);
    Viewport::new(logical.width as f32, logical.height as f32, scale as f32)
}

fn logical_core_count() -> Option<u32> {
    let mut system = System::new();
    system.refresh_cpu_all();
    match system.cpus().len() {
        0 => None,
        n => u32::try_from(n).ok(),
    }
}
