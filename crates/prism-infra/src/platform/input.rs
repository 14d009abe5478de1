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

//! Provides translation from a concrete windowing backend (`winit`) to pointer events.
//!
//! `winit` reports button presses without a position and physical rather than
//! logical coordinates, so the adapter keeps a small [`CursorState`] between
//! events. Touch input is folded into the same stream; only the first finger
//! down drives the pointer.

use prism_core::input::PointerEvent;
use prism_core::math::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

/// What the adapter remembers between window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    /// Last known cursor position in logical pixels.
    pub position: Vec2,
    /// Physical pixels per logical pixel.
    pub scale_factor: f64,
    /// Id of the touch currently acting as the pointer.
    pub active_touch: Option<u64>,
}

impl CursorState {
    /// Creates a state for a window with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            position: Vec2::ZERO,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
            active_touch: None,
        }
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Translates a `winit::event::WindowEvent` into a [`PointerEvent`].
///
/// Only the left mouse button and the primary touch produce pointer events.
/// Scale-factor changes update `cursor` and produce nothing; every other
/// event is ignored. `timestamp` is the host's monotonic clock in seconds.
pub fn translate_winit_input(
    event: &WindowEvent,
    cursor: &mut CursorState,
    timestamp: f64,
) -> Option<PointerEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            cursor.position = to_logical(*position, cursor.scale_factor);
            Some(PointerEvent::Move {
                position: cursor.position,
                timestamp,
            })
        }
        WindowEvent::MouseInput { state, button, .. } => {
            map_button(*state, *button, cursor.position, timestamp)
        }
        WindowEvent::Touch(touch) => translate_touch(touch, cursor, timestamp),
        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
            if *scale_factor > 0.0 {
                cursor.scale_factor = *scale_factor;
            }
            None
        }
        _ => None,
    }
}

fn translate_touch(touch: &Touch, cursor: &mut CursorState, timestamp: f64) -> Option<PointerEvent> {
    let position = to_logical(touch.location, cursor.scale_factor);
    let (event, active) = map_touch(touch.phase, touch.id, cursor.active_touch, position, timestamp)?;
    cursor.active_touch = active;
    cursor.position = position;
    Some(event)
}

// --- Private Helper Functions ---

/// (Internal) Converts a physical position to logical pixels.
fn to_logical(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical = position.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

/// (Internal) Maps a mouse button transition to a pointer event.
fn map_button(
    state: ElementState,
    button: MouseButton,
    position: Vec2,
    timestamp: f64,
) -> Option<PointerEvent> {
    if button != MouseButton::Left {
        return None;
    }
    Some(match state {
        ElementState::Pressed => PointerEvent::Down {
            position,
            timestamp,
        },
        ElementState::Released => PointerEvent::Up {
            position,
            timestamp,
        },
    })
}

/// (Internal) Maps a touch phase to a pointer event and the new active touch id.
fn map_touch(
    phase: TouchPhase,
    id: u64,
    active: Option<u64>,
    position: Vec2,
    timestamp: f64,
) -> Option<(PointerEvent, Option<u64>)> {
    match (phase, active) {
        (TouchPhase::Started, None) => Some((
            PointerEvent::Down {
                position,
                timestamp,
            },
            Some(id),
        )),
        (TouchPhase::Moved, Some(current)) if current == id => Some((
            PointerEvent::Move {
                position,
                timestamp,
            },
            active,
        )),
        (TouchPhase::Ended | TouchPhase::Cancelled, Some(current)) if current == id => Some((
            PointerEvent::Up {
                position,
                timestamp,
            },
            None,
        )),
        _ => None,
    }
}

// --- Unit Tests for Input Translation ---
#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_to_logical_divides_by_scale_factor() {
        let p = to_logical(PhysicalPosition::new(200.0, 100.0), 2.0);
        assert_eq!(p, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_only_left_button_is_a_pointer() {
        let at = Vec2::new(4.0, 5.0);
        assert_eq!(
            map_button(ElementState::Pressed, MouseButton::Left, at, 1.0),
            Some(PointerEvent::Down {
                position: at,
                timestamp: 1.0
            })
        );
        assert_eq!(
            map_button(ElementState::Released, MouseButton::Left, at, 2.0),
            Some(PointerEvent::Up {
                position: at,
                timestamp: 2.0
            })
        );
        assert!(map_button(ElementState::Pressed, MouseButton::Right, at, 1.0).is_none());
    }

    #[test]
    fn test_primary_touch_drives_pointer() {
        let at = Vec2::new(1.0, 1.0);
        let (down, active) = map_touch(TouchPhase::Started, 3, None, at, 0.0).unwrap();
        assert!(matches!(down, PointerEvent::Down { .. }));
        assert_eq!(active, Some(3));

        // A second finger is ignored while the first is down.
        assert!(map_touch(TouchPhase::Started, 4, active, at, 0.1).is_none());
        assert!(map_touch(TouchPhase::Moved, 4, active, at, 0.1).is_none());

        let (moved, still) = map_touch(TouchPhase::Moved, 3, active, at, 0.2).unwrap();
        assert!(matches!(moved, PointerEvent::Move { .. }));
        assert_eq!(still, Some(3));

        let (up, cleared) = map_touch(TouchPhase::Cancelled, 3, active, at, 0.3).unwrap();
        assert!(matches!(up, PointerEvent::Up { .. }));
        assert_eq!(cleared, None);
    }

    #[test]
    fn test_non_pointer_events_are_ignored() {
        let mut cursor = CursorState::default();
        let resized = WindowEvent::Resized(PhysicalSize::new(800, 600));
        assert!(translate_winit_input(&resized, &mut cursor, 0.0).is_none());
        assert!(translate_winit_input(&WindowEvent::Focused(true), &mut cursor, 0.0).is_none());
    }

    #[test]
    fn test_cursor_state_rejects_bad_scale() {
        assert_eq!(CursorState::new(0.0).scale_factor, 1.0);
        assert_eq!(CursorState::new(1.5).scale_factor, 1.5);
    }
}
