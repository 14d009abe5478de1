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

//! Deterministic preset layouts.
//!
//! Generators are pure: the same name and configuration always yield the
//! same shapes, positions, proportions and velocities. Only cosmetic
//! attributes (colour) are left to the store.

use crate::config::{DominoLayout, PresetConfig};
use crate::error::ParsePresetError;
use crate::object::{ShapeKind, SpawnRequest};
use prism_core::math::{Vec3, FRAC_PI_2, TAU};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Bowling ──────────────────────────────────────────────────────────
const PIN_SPACING: f32 = 0.6;
const HEAD_PIN_Z: f32 = -3.0;
const PIN_SCALE: f32 = 0.6;
const PIN_PROPORTIONS: Vec3 = Vec3::new(0.35, 1.0, 0.35);
const BALL_SCALE: f32 = 1.0;
const BALL_POSITION: Vec3 = Vec3::new(0.0, 0.5, 4.0);
const BALL_VELOCITY: Vec3 = Vec3::new(0.0, 0.0, -8.0);

// ── Dominoes ─────────────────────────────────────────────────────────
const DOMINO_PROPORTIONS: Vec3 = Vec3::new(0.2, 1.0, 0.5);
const DOMINO_CURVE_AMPLITUDE: f32 = 1.0;
const KNOCKER_SCALE: f32 = 0.4;
const KNOCKER_HEIGHT: f32 = 0.9;
const KNOCKER_SPEED: f32 = 4.0;

// ── Jenga ────────────────────────────────────────────────────────────
const BLOCKS_PER_LAYER: usize = 3;
const JENGA_PROPORTIONS: Vec3 = Vec3::new(1.5, 0.3, 0.5);

/// Named preset arrangements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    /// Ten pins in 4-3-2-1 rows and a rolling ball.
    Bowling,
    /// A line of thin boxes and a ball to knock them over.
    Dominoes,
    /// Layers of three blocks with alternating orientation.
    Jenga,
    /// Nothing.
    Clear,
}

impl PresetName {
    /// Every preset, in a stable order.
    pub const ALL: [PresetName; 4] = [
        PresetName::Bowling,
        PresetName::Dominoes,
        PresetName::Jenga,
        PresetName::Clear,
    ];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            PresetName::Bowling => "bowling",
            PresetName::Dominoes => "dominoes",
            PresetName::Jenga => "jenga",
            PresetName::Clear => "clear",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bowling" => Ok(PresetName::Bowling),
            "dominoes" | "domino" => Ok(PresetName::Dominoes),
            "jenga" => Ok(PresetName::Jenga),
            "clear" => Ok(PresetName::Clear),
            _ => Err(ParsePresetError(s.to_string())),
        }
    }
}

/// Produces the layout of `name`.
pub fn generate(name: PresetName, config: &PresetConfig) -> Vec<SpawnRequest> {
    match name {
        PresetName::Bowling => bowling(),
        PresetName::Dominoes => dominoes(
            config.domino_count,
            config.domino_spacing,
            config.domino_layout,
        ),
        PresetName::Jenga => jenga(config.jenga_layers),
        PresetName::Clear => Vec::new(),
    }
}

/// Ten pins in rows of 1-2-3-4 moving away from the ball, then the ball.
///
/// The head pin stands at `z = -3`; the ball starts at `z = 4` rolling toward it.
pub fn bowling() -> Vec<SpawnRequest> {
    let pin_half_height = PIN_SCALE * PIN_PROPORTIONS.y * 0.5;
    let mut layout = Vec::with_capacity(11);
    for row in 0..4 {
        let z = HEAD_PIN_Z - row as f32 * PIN_SPACING;
        for pin in 0..=row {
            let x = (pin as f32 - row as f32 * 0.5) * PIN_SPACING;
            layout.push(
                SpawnRequest::new(ShapeKind::Cylinder)
                    .at(Vec3::new(x, pin_half_height, z))
                    .with_scale(PIN_SCALE)
                    .with_proportions(PIN_PROPORTIONS),
            );
        }
    }
    layout.push(
        SpawnRequest::new(ShapeKind::Sphere)
            .at(BALL_POSITION)
            .with_scale(BALL_SCALE)
            .with_velocity(BALL_VELOCITY),
    );
    layout
}

/// `count` dominoes centred on the origin along +X, followed by a knocking ball.
pub fn dominoes(count: usize, spacing: f32, layout: DominoLayout) -> Vec<SpawnRequest> {
    if count == 0 {
        return Vec::new();
    }
    let half_height = DOMINO_PROPORTIONS.y * 0.5;
    let start_x = -(count as f32 - 1.0) * spacing * 0.5;
    let span = (count as f32 - 1.0).max(1.0) * spacing;

    let curve = |x: f32| -> (f32, f32) {
        match layout {
            DominoLayout::Straight => (0.0, 0.0),
            DominoLayout::Curved => {
                let phase = (x - start_x) / span * TAU;
                let z = DOMINO_CURVE_AMPLITUDE * phase.sin();
                let slope = DOMINO_CURVE_AMPLITUDE * TAU / span * phase.cos();
                (z, -slope.atan())
            }
        }
    };

    let mut requests: Vec<SpawnRequest> = (0..count)
        .map(|i| {
            let x = start_x + i as f32 * spacing;
            let (z, yaw) = curve(x);
            SpawnRequest::new(ShapeKind::Box)
                .at(Vec3::new(x, half_height, z))
                .with_scale(1.0)
                .with_proportions(DOMINO_PROPORTIONS)
                .with_yaw(yaw)
        })
        .collect();

    let (first_z, _) = curve(start_x);
    requests.push(
        SpawnRequest::new(ShapeKind::Sphere)
            .at(Vec3::new(start_x - spacing, KNOCKER_HEIGHT, first_z))
            .with_scale(KNOCKER_SCALE)
            .with_velocity(Vec3::new(KNOCKER_SPEED, 0.0, 0.0)),
    );
    requests
}

/// `layers` layers of three blocks, rotated a quarter turn every other layer.
pub fn jenga(layers: usize) -> Vec<SpawnRequest> {
    let block_height = JENGA_PROPORTIONS.y;
    let block_depth = JENGA_PROPORTIONS.z;
    let mut requests = Vec::with_capacity(layers * BLOCKS_PER_LAYER);
    for layer in 0..layers {
        let y = block_height * (layer as f32 + 0.5);
        let rotated = layer % 2 == 1;
        for slot in 0..BLOCKS_PER_LAYER {
            let offset = (slot as f32 - 1.0) * block_depth;
            let (position, yaw) = if rotated {
                (Vec3::new(offset, y, 0.0), FRAC_PI_2)
            } else {
                (Vec3::new(0.0, y, offset), 0.0)
            };
            requests.push(
                SpawnRequest::new(ShapeKind::Box)
                    .at(position)
                    .with_scale(1.0)
                    .with_proportions(JENGA_PROPORTIONS)
                    .with_yaw(yaw),
            );
        }
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_preset_names_parse() {
        for name in PresetName::ALL {
            assert_eq!(name.as_str().parse::<PresetName>(), Ok(name));
        }
        assert_eq!("  Bowling".parse::<PresetName>(), Ok(PresetName::Bowling));
        assert_eq!(
            "pinball".parse::<PresetName>(),
            Err(ParsePresetError("pinball".into()))
        );
    }

    #[test]
    fn test_bowling_layout() {
        let layout = bowling();
        assert_eq!(layout.len(), 11);

        let pins: Vec<_> = layout
            .iter()
            .filter(|r| r.shape == ShapeKind::Cylinder)
            .collect();
        assert_eq!(pins.len(), 10);

        let head = pins[0].position.unwrap();
        assert_abs_diff_eq!(head, Vec3::new(0.0, 0.3, -3.0), epsilon = 1e-5);

        // Rows of 1, 2, 3, 4 pins.
        let mut row_sizes = [0usize; 4];
        for pin in &pins {
            let z = pin.position.unwrap().z;
            let row = ((HEAD_PIN_Z - z) / PIN_SPACING).round() as usize;
            row_sizes[row] += 1;
        }
        assert_eq!(row_sizes, [1, 2, 3, 4]);

        let ball = layout.last().unwrap();
        assert_eq!(ball.shape, ShapeKind::Sphere);
        assert_eq!(ball.position, Some(Vec3::new(0.0, 0.5, 4.0)));
        assert_eq!(ball.velocity, Some(Vec3::new(0.0, 0.0, -8.0)));
    }

    #[test]
    fn test_presets_are_deterministic() {
        let config = PresetConfig::default();
        for name in PresetName::ALL {
            assert_eq!(generate(name, &config), generate(name, &config));
        }
    }

    #[test]
    fn test_straight_dominoes_are_evenly_spaced() {
        let layout = dominoes(16, 0.55, DominoLayout::Straight);
        assert_eq!(layout.len(), 17);
        let xs: Vec<f32> = layout[..16].iter().map(|r| r.position.unwrap().x).collect();
        for pair in xs.windows(2) {
            assert_abs_diff_eq!(pair[1] - pair[0], 0.55, epsilon = 1e-4);
        }
        assert_abs_diff_eq!(xs[0] + xs[15], 0.0, epsilon = 1e-4);
        assert!(layout[..16].iter().all(|r| r.position.unwrap().z == 0.0));
        assert_eq!(layout[16].shape, ShapeKind::Sphere);
    }

    #[test]
    fn test_curved_dominoes_leave_the_axis() {
        let layout = dominoes(16, 0.55, DominoLayout::Curved);
        assert!(layout[..16]
            .iter()
            .any(|r| r.position.unwrap().z.abs() > 0.5));
        assert!(layout[..16].iter().any(|r| r.yaw != 0.0));
    }

    #[test]
    fn test_jenga_alternates_orientation() {
        let layout = jenga(10);
        assert_eq!(layout.len(), 30);
        assert_eq!(layout[0].yaw, 0.0);
        assert_eq!(layout[3].yaw, FRAC_PI_2);
        assert_abs_diff_eq!(layout[29].position.unwrap().y, 2.85, epsilon = 1e-4);
    }

    #[test]
    fn test_clear_is_empty() {
        assert!(generate(PresetName::Clear, &PresetConfig::default()).is_empty());
        assert!(dominoes(0, 0.55, DominoLayout::Straight).is_empty());
    }
}
