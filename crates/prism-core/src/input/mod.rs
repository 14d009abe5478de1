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

//! Backend-agnostic pointer input.
//!
//! Hosts translate their native events (mouse, touch, pen) into
//! [`PointerEvent`]s. Coordinates are logical pixels with the origin at the
//! top-left of the viewport; timestamps are seconds on a monotonic clock.

mod gesture;

pub use gesture::{GestureConfig, GestureTracker};

use crate::math::Vec2;

/// An engine-internal representation of a pointer input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The primary pointer was pressed.
    Down {
        /// Screen position of the press.
        position: Vec2,
        /// Event time in seconds.
        timestamp: f64,
    },
    /// The pointer moved.
    Move {
        /// New screen position.
        position: Vec2,
        /// Event time in seconds.
        timestamp: f64,
    },
    /// The primary pointer was released.
    Up {
        /// Screen position of the release.
        position: Vec2,
        /// Event time in seconds.
        timestamp: f64,
    },
    /// A double-click / double-tap.
    DoubleActivate {
        /// Screen position of the second activation.
        position: Vec2,
        /// Event time in seconds.
        timestamp: f64,
    },
}

impl PointerEvent {
    /// Screen position carried by the event.
    pub fn position(&self) -> Vec2 {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::DoubleActivate { position, .. } => position,
        }
    }

    /// Timestamp carried by the event, in seconds.
    pub fn timestamp(&self) -> f64 {
        match *self {
            PointerEvent::Down { timestamp, .. }
            | PointerEvent::Move { timestamp, .. }
            | PointerEvent::Up { timestamp, .. }
            | PointerEvent::DoubleActivate { timestamp, .. } => timestamp,
        }
    }
}
