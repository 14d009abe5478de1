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

//! # Physics Abstractions
//!
//! The contract the sandbox relies on from a rigid-body engine. Collision
//! resolution and integration live entirely behind [`PhysicsProvider`].

use serde::{Deserialize, Serialize};

use crate::math::{Quat, Ray, Vec3};

/// Standard gravity magnitude in m/s².
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Opaque handle to a rigid body in the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RigidBodyHandle(pub u64);

/// Defines the type of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Responds to gravity, collisions and impulses.
    Dynamic,
    /// Teleported to an externally supplied translation every step; ignores forces.
    KinematicPositionBased,
}

/// Collider geometry attached to a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Box with half-extents.
    Box(Vec3),
    /// Sphere with radius.
    Sphere(f32),
    /// Y-aligned cylinder with half-height and radius.
    Cylinder {
        /// Half of the cylinder height.
        half_height: f32,
        /// Cylinder radius.
        radius: f32,
    },
}

/// Description for creating a rigid body together with its collider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    /// Initial position.
    pub position: Vec3,
    /// Initial rotation.
    pub rotation: Quat,
    /// Initial linear velocity.
    pub linear_velocity: Vec3,
    /// Body type at creation.
    pub body_type: BodyType,
    /// Collider geometry.
    pub shape: ColliderShape,
    /// Material density in kg/m³ (dynamic only).
    pub density: f32,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            body_type: BodyType::Dynamic,
            shape: ColliderShape::Sphere(0.5),
            density: 1.0,
        }
    }
}

/// Result of a successful ray cast against the bodies of the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The body owning the collider that was hit.
    pub body: RigidBodyHandle,
    /// Distance along the ray to the hit.
    pub toi: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Interface contract for any physics engine implementation (e.g., Rapier).
///
/// Every method taking a handle must tolerate handles of bodies that no
/// longer exist: setters become no-ops and getters return `None`.
pub trait PhysicsProvider {
    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Sets the global gravity vector and wakes sleeping bodies.
    fn set_gravity(&mut self, gravity: Vec3);

    /// Adds a rigid body and its collider to the simulation.
    fn add_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle;

    /// Removes a rigid body and its attached colliders.
    fn remove_body(&mut self, handle: RigidBodyHandle);

    /// Returns `true` if the body is still part of the simulation.
    fn contains_body(&self, handle: RigidBodyHandle) -> bool;

    /// Switches a body between dynamic and kinematic control.
    fn set_body_type(&mut self, handle: RigidBodyHandle, body_type: BodyType);

    /// Sets the translation a kinematic body reaches at the end of the next step.
    fn set_next_kinematic_translation(&mut self, handle: RigidBodyHandle, position: Vec3);

    /// Applies an instantaneous impulse at the center of mass. It adds to the
    /// existing momentum rather than replacing the velocity.
    fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3, wake: bool);

    /// Current linear velocity of a body.
    fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3>;

    /// Current position and rotation of a body.
    fn body_transform(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)>;

    /// Casts a ray against every collider, returning the closest hit within `max_toi`.
    fn cast_ray(&self, ray: &Ray, max_toi: f32) -> Option<RaycastHit>;
}
