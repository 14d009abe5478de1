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

//! In-memory physics provider for unit tests.

use prism_core::math::{Quat, Ray, Vec3};
use prism_core::physics::{
    BodyType, ColliderShape, PhysicsProvider, RaycastHit, RigidBodyDesc, RigidBodyHandle,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct StubBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub body_type: BodyType,
    pub shape: ColliderShape,
    pub next_translation: Option<Vec3>,
}

impl StubBody {
    fn bounding_radius(&self) -> f32 {
        match self.shape {
            ColliderShape::Sphere(r) => r,
            ColliderShape::Box(half) => half.length(),
            ColliderShape::Cylinder {
                half_height,
                radius,
            } => (half_height * half_height + radius * radius).sqrt(),
        }
    }
}

/// Unit-mass bodies, explicit Euler, bounding-sphere ray casts.
#[derive(Debug, Default)]
pub struct StubPhysics {
    bodies: BTreeMap<u64, StubBody>,
    next: u64,
    pub gravity: Vec3,
    pub impulses: Vec<(RigidBodyHandle, Vec3)>,
}

impl StubPhysics {
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&StubBody> {
        self.bodies.get(&handle.0)
    }
}

impl PhysicsProvider for StubPhysics {
    fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            match body.body_type {
                BodyType::KinematicPositionBased => {
                    if let Some(target) = body.next_translation.take() {
                        body.velocity = (target - body.position) / dt.max(1e-6);
                        body.position = target;
                    }
                }
                BodyType::Dynamic => {
                    body.velocity += self.gravity * dt;
                    body.position += body.velocity * dt;
                }
            }
        }
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    fn add_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle {
        self.next += 1;
        self.bodies.insert(
            self.next,
            StubBody {
                position: desc.position,
                rotation: desc.rotation,
                velocity: desc.linear_velocity,
                body_type: desc.body_type,
                shape: desc.shape,
                next_translation: None,
            },
        );
        RigidBodyHandle(self.next)
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(&handle.0);
    }

    fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains_key(&handle.0)
    }

    fn set_body_type(&mut self, handle: RigidBodyHandle, body_type: BodyType) {
        if let Some(body) = self.bodies.get_mut(&handle.0) {
            body.body_type = body_type;
            if body_type == BodyType::KinematicPositionBased {
                body.velocity = Vec3::ZERO;
            }
        }
    }

    fn set_next_kinematic_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle.0) {
            body.next_translation = Some(position);
        }
    }

    fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3, _wake: bool) {
        if let Some(body) = self.bodies.get_mut(&handle.0) {
            if body.body_type == BodyType::Dynamic {
                body.velocity += impulse;
            }
            self.impulses.push((handle, impulse));
        }
    }

    fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(&handle.0).map(|b| b.velocity)
    }

    fn body_transform(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies.get(&handle.0).map(|b| (b.position, b.rotation))
    }

    fn cast_ray(&self, ray: &Ray, max_toi: f32) -> Option<RaycastHit> {
        self.bodies
            .iter()
            .filter_map(|(&id, body)| {
                let to_center = body.position - ray.origin;
                let along = to_center.dot(ray.direction);
                let closest_sq = to_center.length_squared() - along * along;
                let radius = body.bounding_radius();
                if along < 0.0 || closest_sq > radius * radius {
                    return None;
                }
                let toi = along - (radius * radius - closest_sq).sqrt();
                (toi <= max_toi).then(|| RaycastHit {
                    body: RigidBodyHandle(id),
                    toi,
                    point: ray.at(toi),
                })
            })
            .min_by(|a, b| a.toi.total_cmp(&b.toi))
    }
}
