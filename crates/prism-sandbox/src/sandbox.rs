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

//! The sandbox orchestrator.

use crate::camera::PerspectiveCamera;
use crate::command::{CommandSender, SandboxCommand};
use crate::config::SandboxConfig;
use crate::gravity::GravityMode;
use crate::interaction::InteractionController;
use crate::object::{ObjectId, ShapeKind, SpawnRequest};
use crate::presets::PresetName;
use crate::store::ObjectStore;
use crate::view::{RenderObject, SandboxStatus};
use prism_control::{DeviceProfile, FrameSignal, QualityController, QualityState};
use prism_core::event::EventBus;
use prism_core::input::{GestureTracker, PointerEvent};
use prism_core::math::{LinearRgba, Vec2};
use prism_core::physics::PhysicsProvider;
use prism_core::platform::Viewport;

/// Owns the object pool, the interaction machine and the quality loop, and
/// drives them against a physics provider once per frame.
///
/// Everything runs on the caller's thread. Commands from other parts of the
/// application arrive through [`CommandSender`] and are applied at the start
/// of the next [`frame`](Self::frame).
pub struct Sandbox<P: PhysicsProvider> {
    physics: P,
    store: ObjectStore,
    interaction: InteractionController,
    quality: QualityController,
    camera: PerspectiveCamera,
    viewport: Viewport,
    gravity: GravityMode,
    commands: EventBus<SandboxCommand>,
    gestures: GestureTracker,
    hot_color: LinearRgba,
    config: SandboxConfig,
}

impl<P: PhysicsProvider> Sandbox<P> {
    /// Creates an empty sandbox sized for `profile`.
    pub fn new(mut physics: P, profile: DeviceProfile, config: SandboxConfig) -> Self {
        let quality = QualityController::new(profile, config.quality.clone());
        let store = ObjectStore::new(quality.state().object_cap, config.store.clone());
        let gravity = GravityMode::default();
        physics.set_gravity(gravity.vector());
        log::info!(
            "Sandbox ready: {}x{} viewport, object cap {}",
            profile.viewport.width,
            profile.viewport.height,
            store.capacity()
        );
        Self {
            physics,
            store,
            interaction: InteractionController::new(config.interaction.clone()),
            quality,
            camera: PerspectiveCamera::from(&config.camera),
            viewport: profile.viewport,
            gravity,
            commands: EventBus::new(),
            gestures: GestureTracker::new(config.interaction.gesture),
            hot_color: config.store.hot_color(),
            config,
        }
    }

    /// A handle for posting commands from elsewhere in the application.
    pub fn command_sender(&self) -> CommandSender {
        CommandSender::new(self.commands.sender())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Applies a command immediately.
    pub fn apply(&mut self, command: SandboxCommand) {
        log::trace!("Applying {:?}", command);
        match command {
            SandboxCommand::Spawn(shape) => {
                self.spawn(shape);
            }
            SandboxCommand::Reset => self.reset(),
            SandboxCommand::LoadPreset(name) => {
                self.load_preset(name);
            }
            SandboxCommand::ToggleGravity => {
                self.toggle_gravity();
            }
            SandboxCommand::ToggleAntiGravity => {
                self.toggle_anti_gravity();
            }
        }
    }

    /// Spawns one object of `shape` at a random point above the spawn origin.
    pub fn spawn(&mut self, shape: ShapeKind) -> ObjectId {
        self.spawn_request(SpawnRequest::new(shape))
    }

    /// Spawns an object from a full request.
    pub fn spawn_request(&mut self, request: SpawnRequest) -> ObjectId {
        self.store.spawn(&mut self.physics, request)
    }

    /// Removes every object and ends any drag. Safe to call at any time.
    pub fn reset(&mut self) {
        self.interaction.cancel(&mut self.physics);
        self.store.reset(&mut self.physics);
    }

    /// Replaces the contents with a preset. Returns the resulting object count.
    pub fn load_preset(&mut self, name: PresetName) -> usize {
        self.interaction.cancel(&mut self.physics);
        self.store
            .load_preset(&mut self.physics, name, &self.config.presets)
    }

    /// Turns gravity on or off.
    pub fn toggle_gravity(&mut self) -> GravityMode {
        self.set_gravity(self.gravity.toggled())
    }

    /// Flips gravity direction.
    pub fn toggle_anti_gravity(&mut self) -> GravityMode {
        self.set_gravity(self.gravity.anti_toggled())
    }

    fn set_gravity(&mut self, mode: GravityMode) -> GravityMode {
        self.gravity = mode;
        self.physics.set_gravity(mode.vector());
        log::info!(
            "Gravity {} ({})",
            if mode.enabled { "on" } else { "off" },
            if mode.inverted { "inverted" } else { "normal" }
        );
        mode
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Routes one pointer event through the interaction machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                timestamp,
            } => {
                // A press during a drag is ignored entirely, gestures included.
                if self.interaction.is_dragging() {
                    return;
                }
                let ray = self.camera.screen_ray(position, &self.viewport);
                self.interaction.pointer_down(
                    &mut self.physics,
                    &self.store,
                    &ray,
                    position,
                    timestamp,
                );
                if self.config.interaction.detect_double_activation {
                    if let Some(double) = self.gestures.observe(&event) {
                        self.double_activate(double.position());
                    }
                }
            }
            PointerEvent::Move { position, .. } => {
                let ray = self.camera.screen_ray(position, &self.viewport);
                self.interaction
                    .pointer_move(&self.physics, &self.store, &ray);
            }
            PointerEvent::Up {
                position,
                timestamp,
            } => {
                self.interaction.pointer_up(
                    &mut self.physics,
                    &self.store,
                    position,
                    timestamp,
                    &self.viewport,
                );
            }
            PointerEvent::DoubleActivate { position, .. } => {
                if !self.interaction.is_dragging() {
                    self.double_activate(position);
                }
            }
        }
    }

    fn double_activate(&mut self, position: Vec2) -> Option<ObjectId> {
        let ray = self.camera.screen_ray(position, &self.viewport);
        self.interaction
            .double_activate(&mut self.physics, &mut self.store, &ray)
    }

    // ── Environment ──────────────────────────────────────────────────

    /// Re-derives the quality budgets from a new device profile.
    ///
    /// A lower object cap evicts the oldest objects right away. An in-flight
    /// drag is left alone unless its object was among them.
    pub fn apply_profile(&mut self, profile: DeviceProfile) {
        let state = self.quality.apply_profile(profile);
        self.viewport = profile.viewport;
        self.store.set_capacity(&mut self.physics, state.object_cap);
    }

    /// Updates the viewport used for ray casting and release impulses.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Replaces the camera.
    pub fn set_camera(&mut self, camera: PerspectiveCamera) {
        self.camera = camera;
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Runs one frame: applies queued commands, feeds the quality loop, moves
    /// the dragged body and steps the physics.
    ///
    /// Returns the frame-rate signal emitted this frame, if any.
    pub fn frame(&mut self, dt: f32) -> Option<FrameSignal> {
        for command in self.commands.drain() {
            self.apply(command);
        }

        let signal = self.quality.record_frame(dt);
        let cap = self.quality.state().object_cap;
        if cap != self.store.capacity() {
            self.store.set_capacity(&mut self.physics, cap);
        }

        self.interaction.apply_frame(&mut self.physics, &self.store);
        if dt.is_finite() && dt > 0.0 {
            self.physics.step(dt);
        }
        signal
    }

    // ── Read models ──────────────────────────────────────────────────

    /// What the UI displays.
    pub fn status(&self) -> SandboxStatus {
        let quality = self.quality.state();
        SandboxStatus {
            object_count: self.store.len(),
            object_cap: self.store.capacity(),
            frame_rate: self.quality.frame_rate(),
            gravity: self.gravity,
            resolution_multiplier: quality.resolution_multiplier,
            shadow_tier: quality.shadow_tier,
            effect_tier: quality.effect_tier,
            dragging: self.interaction.is_dragging(),
        }
    }

    /// Every live object with its current transform and display colour.
    pub fn render_objects(&self) -> Vec<RenderObject> {
        let hot_speed = self.store.config().hot_speed;
        self.store
            .iter()
            .filter_map(|object| {
                let (position, rotation) = self.physics.body_transform(object.body)?;
                let speed = self
                    .physics
                    .linear_velocity(object.body)
                    .map(|v| v.length())
                    .unwrap_or(0.0);
                Some(RenderObject {
                    id: object.id,
                    shape: object.shape,
                    scale: object.scale,
                    proportions: object.proportions,
                    position,
                    rotation,
                    color: object.display_color(speed, self.hot_color, hot_speed),
                })
            })
            .collect()
    }

    /// The object pool.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// The interaction machine.
    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    /// Current quality budgets.
    pub fn quality(&self) -> QualityState {
        self.quality.state()
    }

    /// Current gravity mode.
    pub fn gravity(&self) -> GravityMode {
        self.gravity
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Camera used for ray casting.
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// The physics provider.
    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Mutable access to the physics provider.
    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    /// Active configuration.
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubPhysics;
    use prism_core::math::Vec3;
    use prism_core::platform::{EnvironmentReading, Viewport};

    fn sandbox() -> Sandbox<StubPhysics> {
        let mut config = SandboxConfig::default();
        config.store.seed = Some(9);
        Sandbox::new(StubPhysics::default(), DeviceProfile::default(), config)
    }

    fn down(x: f32, y: f32, t: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Vec2::new(x, y),
            timestamp: t,
        }
    }

    /// A sphere sitting where the default camera's centre ray passes.
    fn spawn_under_cursor(sb: &mut Sandbox<StubPhysics>) -> ObjectId {
        sb.spawn_request(
            SpawnRequest::new(ShapeKind::Sphere)
                .at(Vec3::new(0.0, 1.0, 0.0))
                .with_scale(0.5),
        )
    }

    #[test]
    fn test_new_sandbox_sets_gravity_and_cap() {
        let sb = sandbox();
        assert_eq!(sb.physics().gravity.y, -9.81);
        assert_eq!(sb.status().object_cap, 60);
        assert_eq!(sb.status().object_count, 0);
    }

    #[test]
    fn test_queued_commands_apply_on_next_frame() {
        let mut sb = sandbox();
        let sender = sb.command_sender();
        sender.spawn(ShapeKind::Sphere);
        sender.spawn(ShapeKind::Box);
        sender.toggle_anti_gravity();
        assert_eq!(sb.store().len(), 0);

        sb.frame(1.0 / 60.0);
        assert_eq!(sb.store().len(), 2);
        assert!(sb.gravity().inverted);
        assert_eq!(sb.physics().gravity.y, 9.81);
    }

    #[test]
    fn test_gravity_toggle_disables_gravity() {
        let mut sb = sandbox();
        sb.apply(SandboxCommand::ToggleGravity);
        assert_eq!(sb.physics().gravity, Vec3::ZERO);
        assert!(!sb.status().gravity.enabled);
    }

    #[test]
    fn test_drag_and_throw_through_pointer_events() {
        let mut sb = sandbox();
        let id = spawn_under_cursor(&mut sb);

        sb.handle_pointer(down(640.0, 360.0, 0.0));
        assert_eq!(sb.interaction().dragged_object(), Some(id));
        assert!(sb.status().dragging);

        sb.handle_pointer(PointerEvent::Move {
            position: Vec2::new(900.0, 360.0),
            timestamp: 0.2,
        });
        sb.frame(1.0 / 60.0);
        let moved = sb.render_objects()[0].position;
        assert!(moved.x > 0.5);

        sb.handle_pointer(PointerEvent::Up {
            position: Vec2::new(900.0, 360.0),
            timestamp: 0.5,
        });
        assert!(!sb.status().dragging);
        let (_, impulse) = sb.physics().impulses[0];
        assert!(impulse.x > 0.0);
    }

    #[test]
    fn test_press_during_drag_leaves_store_and_drag_untouched() {
        let mut sb = sandbox();
        let id = spawn_under_cursor(&mut sb);
        sb.handle_pointer(down(640.0, 360.0, 0.0));
        assert_eq!(sb.interaction().dragged_object(), Some(id));
        let ids = sb.store().ids();
        let state = *sb.interaction().state();

        // Close enough in time and space to count as a double activation.
        sb.handle_pointer(down(642.0, 361.0, 0.1));
        assert_eq!(sb.store().ids(), ids);
        assert_eq!(*sb.interaction().state(), state);
        assert_eq!(sb.physics().body_count(), 1);

        sb.handle_pointer(PointerEvent::DoubleActivate {
            position: Vec2::new(640.0, 500.0),
            timestamp: 0.2,
        });
        assert_eq!(sb.store().ids(), ids);
        assert_eq!(*sb.interaction().state(), state);
    }

    #[test]
    fn test_reset_mid_drag_returns_to_idle() {
        let mut sb = sandbox();
        spawn_under_cursor(&mut sb);
        sb.handle_pointer(down(640.0, 360.0, 0.0));
        assert!(sb.status().dragging);

        sb.reset();
        assert!(!sb.status().dragging);
        assert_eq!(sb.status().object_count, 0);
        sb.reset();
        assert!(!sb.status().dragging);
        assert_eq!(sb.physics().body_count(), 0);
    }

    #[test]
    fn test_double_activation_spawns_on_ground() {
        let mut sb = sandbox();
        sb.handle_pointer(down(640.0, 500.0, 1.0));
        assert_eq!(sb.store().len(), 0);
        sb.handle_pointer(down(642.0, 501.0, 1.2));
        assert_eq!(sb.store().len(), 1);
        let spawned = sb.store().iter().next().unwrap();
        assert!((spawned.spawn_position.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_profile_shrink_evicts_dragged_object_silently() {
        let mut sb = sandbox();
        let dragged = spawn_under_cursor(&mut sb);
        for _ in 0..35 {
            sb.spawn(ShapeKind::Box);
        }
        sb.handle_pointer(down(640.0, 360.0, 0.0));
        assert_eq!(sb.interaction().dragged_object(), Some(dragged));

        let phone = DeviceProfile::classify(&EnvironmentReading {
            viewport: Viewport::new(390.0, 844.0, 3.0),
            ..Default::default()
        });
        sb.apply_profile(phone);
        assert_eq!(sb.status().object_count, 30);
        assert!(!sb.store().contains(dragged));

        sb.frame(1.0 / 60.0);
        assert!(!sb.status().dragging);
        assert!(sb.physics().impulses.is_empty());
    }

    #[test]
    fn test_render_objects_follow_physics() {
        let mut sb = sandbox();
        let id = sb.spawn_request(
            SpawnRequest::new(ShapeKind::Box)
                .at(Vec3::new(0.0, 5.0, 0.0))
                .with_velocity(Vec3::new(0.0, 0.0, 20.0)),
        );
        sb.frame(0.1);
        let objects = sb.render_objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id, id);
        assert!(objects[0].position.y < 5.0);
        // Faster than the hot speed: fully tinted.
        let (color, hot) = (objects[0].color, sb.config().store.hot_color());
        assert!((color.r - hot.r).abs() < 1e-5);
        assert!((color.g - hot.g).abs() < 1e-5);
        assert!((color.b - hot.b).abs() < 1e-5);
    }

    #[test]
    fn test_preset_command_replaces_contents() {
        let mut sb = sandbox();
        for _ in 0..15 {
            sb.spawn(ShapeKind::Sphere);
        }
        sb.apply(SandboxCommand::LoadPreset(PresetName::Bowling));
        assert_eq!(sb.status().object_count, 11);
        sb.apply(SandboxCommand::LoadPreset(PresetName::Clear));
        assert_eq!(sb.status().object_count, 0);
    }
}
