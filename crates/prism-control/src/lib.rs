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

//! # Prism Control
//!
//! The closed loops that size the sandbox to the device it runs on:
//!
//! - [`DeviceProfiler`] classifies the host once at start-up and again after
//!   debounced viewport changes.
//! - [`QualityController`] turns that profile plus a running frame-rate
//!   signal into a resolution multiplier and resource budgets.

#![warn(missing_docs)]

pub mod analysis;
pub mod metrics;
pub mod profile;
pub mod profiler;
pub mod quality;

pub use analysis::{FrameRateConfig, FrameRateMonitor, FrameSignal};
pub use profile::{DeviceProfile, GpuTier};
pub use profiler::{DeviceProfiler, ProfilerConfig};
pub use quality::{
    EffectTier, QualityConfig, QualityController, QualityState, ResolutionBounds, ShadowTier,
};
