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

//! Double-activation detection for hosts that only report single presses.

use super::PointerEvent;
use crate::math::Vec2;
use serde::{Deserialize, Serialize};

/// Thresholds for recognising a double activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum time between the two presses, in seconds.
    pub max_interval: f64,
    /// Maximum distance between the two presses, in logical pixels.
    pub max_distance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            max_interval: 0.3,
            max_distance: 8.0,
        }
    }
}

/// Watches pointer-downs and synthesises [`PointerEvent::DoubleActivate`].
#[derive(Debug, Default)]
pub struct GestureTracker {
    config: GestureConfig,
    last_down: Option<(Vec2, f64)>,
}

impl GestureTracker {
    /// Creates a tracker with the given thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_down: None,
        }
    }

    /// Feeds an event; returns a double activation when this press completes one.
    ///
    /// A recognised pair is consumed so a third quick press starts a new pair.
    pub fn observe(&mut self, event: &PointerEvent) -> Option<PointerEvent> {
        let PointerEvent::Down {
            position,
            timestamp,
        } = *event
        else {
            return None;
        };

        if let Some((last_pos, last_time)) = self.last_down.take() {
            let interval = timestamp - last_time;
            if (0.0..=self.config.max_interval).contains(&interval)
                && last_pos.distance(position) <= self.config.max_distance
            {
                return Some(PointerEvent::DoubleActivate {
                    position,
                    timestamp,
                });
            }
        }
        self.last_down = Some((position, timestamp));
        None
    }
}
