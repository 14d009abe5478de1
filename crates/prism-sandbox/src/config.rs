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

//! Sandbox configuration.
//!
//! Every field has a default, so `{}` is a valid configuration file and a
//! partial file only overrides what it names.

use crate::error::ConfigError;
use crate::object::ShapeKind;
use prism_control::{ProfilerConfig, QualityConfig};
use prism_core::input::GestureConfig;
use prism_core::math::{LinearRgba, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration of a [`Sandbox`](crate::Sandbox).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Object pool settings.
    pub store: StoreConfig,
    /// Pointer interaction settings.
    pub interaction: InteractionConfig,
    /// Adaptive quality settings.
    pub quality: QualityConfig,
    /// Device profiler settings.
    pub profiler: ProfilerConfig,
    /// Preset layout settings.
    pub presets: PresetConfig,
    /// Camera used to turn pointer positions into rays.
    pub camera: CameraConfig,
}

impl SandboxConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded sandbox configuration from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Inclusive range a shape's scale is sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    /// Smallest sampled scale.
    pub min: f32,
    /// Largest sampled scale.
    pub max: f32,
}

impl ScaleRange {
    /// Creates a range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Settings of the [`ObjectStore`](crate::ObjectStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Point random spawns are jittered around.
    pub spawn_origin: Vec3,
    /// Half-width of the X/Z jitter.
    pub spawn_jitter_xz: f32,
    /// Height of the upward Y jitter.
    pub spawn_jitter_y: f32,
    /// Scale range for spheres.
    pub sphere_scale: ScaleRange,
    /// Scale range for boxes.
    pub box_scale: ScaleRange,
    /// Scale range for cylinders.
    pub cylinder_scale: ScaleRange,
    /// Scale substituted for non-positive or non-finite requests.
    pub fallback_scale: f32,
    /// Density of spawned bodies.
    pub density: f32,
    /// Palette colours as `#rrggbb` strings.
    pub palette: Vec<String>,
    /// Colour fast objects blend toward.
    pub hot_color: String,
    /// Speed at which an object is drawn fully in `hot_color`.
    pub hot_speed: f32,
    /// Seed for cosmetic sampling; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            spawn_origin: Vec3::new(0.0, 5.0, 0.0),
            spawn_jitter_xz: 1.5,
            spawn_jitter_y: 2.0,
            sphere_scale: ScaleRange::new(0.3, 0.6),
            box_scale: ScaleRange::new(0.4, 0.8),
            cylinder_scale: ScaleRange::new(0.3, 0.6),
            fallback_scale: 0.5,
            density: 1.0,
            palette: ["#ff6b6b", "#4ecdc4", "#ffe66d", "#a78bfa", "#f97316", "#38bdf8"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hot_color: "#ff3d00".to_string(),
            hot_speed: 12.0,
            seed: None,
        }
    }
}

impl StoreConfig {
    /// Default scale range of a shape kind.
    pub fn scale_range(&self, shape: ShapeKind) -> ScaleRange {
        match shape {
            ShapeKind::Sphere => self.sphere_scale,
            ShapeKind::Box => self.box_scale,
            ShapeKind::Cylinder => self.cylinder_scale,
        }
    }

    /// Parsed palette. Invalid entries are skipped; white if none parse.
    pub fn palette_colors(&self) -> Vec<LinearRgba> {
        let colors: Vec<LinearRgba> = self
            .palette
            .iter()
            .filter_map(|hex| {
                let parsed = LinearRgba::from_hex(hex);
                if parsed.is_none() {
                    log::warn!("Ignoring invalid palette colour '{}'", hex);
                }
                parsed
            })
            .collect();
        if colors.is_empty() {
            vec![LinearRgba::WHITE]
        } else {
            colors
        }
    }

    /// Parsed hot colour, red when invalid.
    pub fn hot_color(&self) -> LinearRgba {
        LinearRgba::from_hex(&self.hot_color).unwrap_or(LinearRgba::rgb(1.0, 0.0, 0.0))
    }
}

/// Settings of the [`InteractionController`](crate::InteractionController).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Screen-to-world scale applied to the release velocity.
    pub impulse_scale: f32,
    /// Multiplier applied to the release impulse.
    pub force_multiplier: f32,
    /// Floor of the drag duration divisor, in seconds.
    pub min_elapsed_s: f32,
    /// Height of the horizontal plane dragged objects follow.
    pub drag_plane_height: f32,
    /// Lowest height a dragged object can be moved to.
    pub min_drag_height: f32,
    /// Height of the ground plane used by double activation.
    pub ground_height: f32,
    /// Distance above the ground at which double activation spawns.
    pub spawn_lift: f32,
    /// Maximum ray length when picking objects.
    pub pick_distance: f32,
    /// Whether to synthesise double activations from pointer-downs.
    pub detect_double_activation: bool,
    /// Thresholds for double-activation detection.
    pub gesture: GestureConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            impulse_scale: 0.1,
            force_multiplier: 3.0,
            min_elapsed_s: 0.01,
            drag_plane_height: 1.0,
            min_drag_height: 0.5,
            ground_height: 0.0,
            spawn_lift: 1.0,
            pick_distance: 100.0,
            detect_double_activation: true,
            gesture: GestureConfig::default(),
        }
    }
}

/// Domino arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DominoLayout {
    /// A straight line along +X.
    Straight,
    /// A sine wave along +X.
    Curved,
}

/// Tunables for the preset generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    /// Number of dominoes.
    pub domino_count: usize,
    /// Distance between domino centres along X.
    pub domino_spacing: f32,
    /// Straight or curved line.
    pub domino_layout: DominoLayout,
    /// Number of jenga layers.
    pub jenga_layers: usize,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            domino_count: 16,
            domino_spacing: 0.55,
            domino_layout: DominoLayout::Straight,
            jenga_layers: 10,
        }
    }
}

/// Perspective camera placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position.
    pub position: Vec3,
    /// Point looked at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 6.0, 12.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov_y_degrees: 50.0,
        }
    }
}
