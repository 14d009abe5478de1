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

//! Read models handed to the UI and renderer.

use crate::gravity::GravityMode;
use crate::object::{ObjectId, ShapeKind};
use prism_control::{EffectTier, ShadowTier};
use prism_core::math::{LinearRgba, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One object as the renderer should draw it this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderObject {
    /// Object id.
    pub id: ObjectId,
    /// Shape kind.
    pub shape: ShapeKind,
    /// Uniform scale.
    pub scale: f32,
    /// Per-axis proportions.
    pub proportions: Vec3,
    /// Live position.
    pub position: Vec3,
    /// Live rotation.
    pub rotation: Quat,
    /// Speed-tinted colour.
    pub color: LinearRgba,
}

/// Snapshot of everything the UI displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SandboxStatus {
    /// Live objects.
    pub object_count: usize,
    /// Current object cap.
    pub object_cap: usize,
    /// Measured frames per second.
    pub frame_rate: f32,
    /// Gravity mode.
    pub gravity: GravityMode,
    /// Rendering resolution multiplier.
    pub resolution_multiplier: f32,
    /// Shadow budget.
    pub shadow_tier: ShadowTier,
    /// Effects budget.
    pub effect_tier: EffectTier,
    /// Whether an object is being dragged.
    pub dragging: bool,
}
