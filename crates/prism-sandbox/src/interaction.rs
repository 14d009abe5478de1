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

//! Pointer-driven drag, throw and double-activation spawning.
//!
//! The controller is a two-state machine. All drag bookkeeping lives in a
//! single [`InteractionState`] value that only the transitions below mutate:
//!
//! ```text
//!  Idle ──down on object──▶ Dragging ──move──▶ Dragging
//!   ▲                          │
//!   └──── up / cancel / dangling body ───┘
//! ```

use crate::config::InteractionConfig;
use crate::object::ObjectId;
use crate::store::ObjectStore;
use prism_core::math::{Plane, Ray, Vec2, Vec3};
use prism_core::physics::{BodyType, PhysicsProvider, RigidBodyHandle};
use prism_core::platform::Viewport;

/// The single active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Object being dragged.
    pub object: ObjectId,
    /// Body backing the object.
    pub body: RigidBodyHandle,
    /// Screen position of the pointer-down.
    pub start_position: Vec2,
    /// Timestamp of the pointer-down, in seconds.
    pub start_time: f64,
    /// Where the body should be moved on the next frame.
    pub target: Option<Vec3>,
}

/// State of the interaction machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Exactly one object is under the pointer's control.
    Dragging(DragSession),
}

/// Turns pointer input and ray casts into drag/throw commands.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    config: InteractionConfig,
}

impl InteractionController {
    /// Creates an idle controller.
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            config,
        }
    }

    /// Current state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Returns `true` while a drag is active.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    /// The dragged object, if any.
    pub fn dragged_object(&self) -> Option<ObjectId> {
        match self.state {
            InteractionState::Dragging(session) => Some(session.object),
            InteractionState::Idle => None,
        }
    }

    /// Interaction settings.
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Idle → Dragging when `ray` hits a live object.
    ///
    /// A press while a drag is active, or one that hits nothing pickable, is a
    /// no-op. The picked body becomes kinematic.
    pub fn pointer_down(
        &mut self,
        physics: &mut dyn PhysicsProvider,
        store: &ObjectStore,
        ray: &Ray,
        position: Vec2,
        timestamp: f64,
    ) -> Option<ObjectId> {
        if self.is_dragging() {
            return None;
        }
        let hit = physics.cast_ray(ray, self.config.pick_distance)?;
        let object = store.find_by_body(hit.body)?;
        let session = DragSession {
            object: object.id,
            body: object.body,
            start_position: position,
            start_time: timestamp,
            target: None,
        };
        physics.set_body_type(session.body, BodyType::KinematicPositionBased);
        log::debug!("Drag started on {}", session.object);
        self.state = InteractionState::Dragging(session);
        Some(session.object)
    }

    /// Updates the drag target from a ray through the pointer.
    ///
    /// The target is the ray's hit on the drag plane, held above the minimum
    /// drag height. Returns the new target.
    pub fn pointer_move(
        &mut self,
        physics: &dyn PhysicsProvider,
        store: &ObjectStore,
        ray: &Ray,
    ) -> Option<Vec3> {
        if !self.ensure_live(physics, store) {
            return None;
        }
        let plane = Plane::horizontal(self.config.drag_plane_height);
        let mut point = ray.intersect_plane(&plane)?;
        point.y = point.y.max(self.config.min_drag_height);
        if let InteractionState::Dragging(session) = &mut self.state {
            session.target = Some(point);
        }
        Some(point)
    }

    /// Pushes the pending drag target to the physics engine. Called once per frame.
    ///
    /// Ends the drag silently if its object disappeared since the last frame.
    pub fn apply_frame(&mut self, physics: &mut dyn PhysicsProvider, store: &ObjectStore) {
        if !self.ensure_live(physics, store) {
            return;
        }
        if let InteractionState::Dragging(session) = self.state {
            if let Some(target) = session.target {
                physics.set_next_kinematic_translation(session.body, target);
            }
        }
    }

    /// Dragging → Idle, throwing the object.
    ///
    /// The body becomes dynamic again and receives the release impulse, which
    /// adds to whatever momentum it already has. Returns the applied impulse,
    /// or `None` if there was no live drag.
    pub fn pointer_up(
        &mut self,
        physics: &mut dyn PhysicsProvider,
        store: &ObjectStore,
        position: Vec2,
        timestamp: f64,
        viewport: &Viewport,
    ) -> Option<Vec3> {
        if !self.ensure_live(physics, store) {
            return None;
        }
        let InteractionState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let elapsed = (timestamp - session.start_time) as f32;
        let impulse = self.release_impulse(session.start_position, position, elapsed, viewport);
        physics.set_body_type(session.body, BodyType::Dynamic);
        physics.apply_impulse(session.body, impulse, true);
        log::debug!("Released {} with impulse {:?}", session.object, impulse);
        Some(impulse)
    }

    /// Any state → Idle without an impulse. Returns `true` if a drag was active.
    ///
    /// A still-existing body is handed back to the simulation as dynamic.
    pub fn cancel(&mut self, physics: &mut dyn PhysicsProvider) -> bool {
        match std::mem::take(&mut self.state) {
            InteractionState::Dragging(session) => {
                if physics.contains_body(session.body) {
                    physics.set_body_type(session.body, BodyType::Dynamic);
                }
                log::debug!("Drag on {} cancelled", session.object);
                true
            }
            InteractionState::Idle => false,
        }
    }

    /// Spawns a random shape where `ray` meets the ground, lifted by the spawn lift.
    ///
    /// Independent of the drag machine. Returns `None` if the ray misses the ground.
    pub fn double_activate(
        &self,
        physics: &mut dyn PhysicsProvider,
        store: &mut ObjectStore,
        ray: &Ray,
    ) -> Option<ObjectId> {
        let ground = Plane::horizontal(self.config.ground_height);
        let hit = ray.intersect_plane(&ground)?;
        let position = hit + Vec3::Y * self.config.spawn_lift;
        let id = store.spawn_random_shape(physics, Some(position));
        log::debug!("Double activation spawned {} at {:?}", id, position);
        Some(id)
    }

    /// Release impulse for a drag from `start` to `end` lasting `elapsed` seconds.
    ///
    /// `speed = |end - start| / max(elapsed, min_elapsed_s)`; each screen axis is
    /// normalised by the viewport size, scaled by `speed`, the impulse scale and
    /// the force multiplier. Screen Y grows downward, world Y upward.
    pub fn release_impulse(&self, start: Vec2, end: Vec2, elapsed: f32, viewport: &Viewport) -> Vec3 {
        let delta = end - start;
        let floor = if self.config.min_elapsed_s.is_finite() {
            self.config.min_elapsed_s.max(f32::EPSILON)
        } else {
            f32::EPSILON
        };
        let elapsed = if elapsed.is_finite() {
            elapsed.max(floor)
        } else {
            floor
        };
        let speed = delta.length() / elapsed;
        let gain = speed * self.config.impulse_scale * self.config.force_multiplier;
        let width = viewport.width.max(1.0);
        let height = viewport.height.max(1.0);
        Vec3::new(delta.x / width * gain, -delta.y / height * gain, 0.0)
    }

    /// Ends a drag whose object or body no longer exists. Returns `true` if a
    /// live drag remains.
    fn ensure_live(&mut self, physics: &dyn PhysicsProvider, store: &ObjectStore) -> bool {
        let InteractionState::Dragging(session) = self.state else {
            return false;
        };
        if store.contains(session.object) && physics.contains_body(session.body) {
            return true;
        }
        log::debug!("Drag target {} vanished, ending drag", session.object);
        self.state = InteractionState::Idle;
        false
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}
