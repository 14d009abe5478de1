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

//! Rapier implementation of the physics provider.

mod conversions;

use conversions::*;
use prism_core::math::{Quat, Ray, Vec3};
use prism_core::physics::{
    BodyType, ColliderShape, PhysicsProvider, RaycastHit, RigidBodyDesc, RigidBodyHandle,
    STANDARD_GRAVITY,
};
use rapier3d::prelude::*;

/// Half-extent of the ground slab on X and Z.
const GROUND_HALF_EXTENT: Real = 50.0;
/// Half-thickness of the ground slab.
const GROUND_HALF_THICKNESS: Real = 0.1;

/// Implementation of the `PhysicsProvider` trait using the Rapier3D physics engine.
pub struct RapierPhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl Default for RapierPhysicsWorld {
    fn default() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -STANDARD_GRAVITY, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }
}

impl RapierPhysicsWorld {
    /// Creates an empty world with standard downward gravity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world with a static ground slab whose top face sits at `height`.
    ///
    /// The ground has no body, so ray casts never report it as a pickable hit.
    pub fn with_ground(height: f32) -> Self {
        let mut world = Self::default();
        let ground = ColliderBuilder::cuboid(
            GROUND_HALF_EXTENT,
            GROUND_HALF_THICKNESS,
            GROUND_HALF_EXTENT,
        )
        .translation(vector![0.0, height - GROUND_HALF_THICKNESS, 0.0])
        .build();
        world.collider_set.insert(ground);
        world.refresh_queries();
        log::debug!("Rapier world created with ground at y = {height}");
        world
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Current gravity vector.
    pub fn gravity(&self) -> Vec3 {
        from_rapier_vec(&self.gravity)
    }

    /// Whether the body is currently asleep.
    pub fn is_sleeping(&self, handle: RigidBodyHandle) -> Option<bool> {
        self.rigid_body_set
            .get(to_rapier_body_handle(handle))
            .map(|rb| rb.is_sleeping())
    }

    fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    fn build_collider(shape: ColliderShape, density: f32) -> Collider {
        let builder = match shape {
            ColliderShape::Box(half) => ColliderBuilder::cuboid(half.x, half.y, half.z),
            ColliderShape::Sphere(radius) => ColliderBuilder::ball(radius),
            ColliderShape::Cylinder {
                half_height,
                radius,
            } => ColliderBuilder::cylinder(half_height, radius),
        };
        builder.density(density.max(f32::EPSILON)).build()
    }
}

impl PhysicsProvider for RapierPhysicsWorld {
    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_rapier_vec(gravity);
        for (_, body) in self.rigid_body_set.iter_mut() {
            if body.is_dynamic() {
                body.wake_up(true);
            }
        }
    }

    fn add_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle {
        let builder = match desc.body_type {
            BodyType::Dynamic => RigidBodyBuilder::dynamic(),
            BodyType::KinematicPositionBased => RigidBodyBuilder::kinematic_position_based(),
        };
        let rigid_body = builder
            .translation(to_rapier_vec(desc.position))
            .rotation(to_rapier_quat(desc.rotation).scaled_axis())
            .linvel(to_rapier_vec(desc.linear_velocity))
            .ccd_enabled(true)
            .build();

        let handle = self.rigid_body_set.insert(rigid_body);
        let collider = Self::build_collider(desc.shape, desc.density);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.refresh_queries();
        to_body_handle(handle)
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        let removed = self.rigid_body_set.remove(
            to_rapier_body_handle(handle),
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        if removed.is_some() {
            self.refresh_queries();
        }
    }

    fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(to_rapier_body_handle(handle))
    }

    fn set_body_type(&mut self, handle: RigidBodyHandle, body_type: BodyType) {
        if let Some(rb) = self.rigid_body_set.get_mut(to_rapier_body_handle(handle)) {
            let rb_type = match body_type {
                BodyType::Dynamic => RigidBodyType::Dynamic,
                BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
            };
            rb.set_body_type(rb_type, true);
            if body_type == BodyType::Dynamic {
                // Impulses applied before the next step need the dynamic mass.
                rb.recompute_mass_properties_from_colliders(&self.collider_set);
            }
        }
    }

    fn set_next_kinematic_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(to_rapier_body_handle(handle)) {
            rb.set_next_kinematic_translation(to_rapier_vec(position));
        }
    }

    fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3, wake: bool) {
        if let Some(rb) = self.rigid_body_set.get_mut(to_rapier_body_handle(handle)) {
            rb.apply_impulse(to_rapier_vec(impulse), wake);
        }
    }

    fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(to_rapier_body_handle(handle))
            .map(|rb| from_rapier_vec(rb.linvel()))
    }

    fn body_transform(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.rigid_body_set
            .get(to_rapier_body_handle(handle))
            .map(|rb| (from_rapier_vec(rb.translation()), from_rapier_quat(rb.rotation())))
    }

    fn cast_ray(&self, ray: &Ray, max_toi: f32) -> Option<RaycastHit> {
        let rapier_ray = rapier3d::geometry::Ray::new(
            to_rapier_point(ray.origin),
            to_rapier_vec(ray.direction),
        );
        let only_bodies = |_handle: ColliderHandle, collider: &Collider| collider.parent().is_some();
        let filter = QueryFilter::default().predicate(&only_bodies);
        let (collider_handle, toi) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &rapier_ray,
            max_toi,
            true,
            filter,
        )?;
        let body = self.collider_set.get(collider_handle)?.parent()?;
        Some(RaycastHit {
            body: to_body_handle(body),
            toi,
            point: from_rapier_point(&rapier_ray.point_at(toi)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ball(position: Vec3) -> RigidBodyDesc {
        RigidBodyDesc {
            position,
            shape: ColliderShape::Sphere(0.5),
            ..Default::default()
        }
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = RapierPhysicsWorld::new();
        let handle = world.add_body(ball(Vec3::new(0.0, 10.0, 0.0)));
        for _ in 0..30 {
            world.step(1.0 / 60.0);
        }
        let (position, _) = world.body_transform(handle).unwrap();
        assert!(position.y < 10.0);
        assert!(world.linear_velocity(handle).unwrap().y < 0.0);
    }

    #[test]
    fn test_removed_handles_are_tolerated() {
        let mut world = RapierPhysicsWorld::new();
        let handle = world.add_body(ball(Vec3::ZERO));
        world.remove_body(handle);
        assert!(!world.contains_body(handle));
        assert!(world.body_transform(handle).is_none());
        world.apply_impulse(handle, Vec3::X, true);
        world.set_body_type(handle, BodyType::Dynamic);
        world.remove_body(handle);

        // The freed slot is reused with a new generation; the old handle stays dead.
        let fresh = world.add_body(ball(Vec3::ZERO));
        assert_ne!(fresh, handle);
        assert!(!world.contains_body(handle));
    }

    #[test]
    fn test_kinematic_body_follows_target_and_ignores_gravity() {
        let mut world = RapierPhysicsWorld::new();
        let handle = world.add_body(ball(Vec3::new(0.0, 2.0, 0.0)));
        world.set_body_type(handle, BodyType::KinematicPositionBased);
        world.set_next_kinematic_translation(handle, Vec3::new(1.0, 2.0, 0.0));
        world.step(1.0 / 60.0);
        let (position, _) = world.body_transform(handle).unwrap();
        assert_abs_diff_eq!(position, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-4);
        world.step(1.0 / 60.0);
        let (position, _) = world.body_transform(handle).unwrap();
        assert_abs_diff_eq!(position.y, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_impulse_adds_to_momentum() {
        let mut world = RapierPhysicsWorld::new();
        world.set_gravity(Vec3::ZERO);
        let handle = world.add_body(RigidBodyDesc {
            linear_velocity: Vec3::new(2.0, 0.0, 0.0),
            ..ball(Vec3::ZERO)
        });
        world.step(1.0 / 60.0);
        world.apply_impulse(handle, Vec3::new(0.0, 0.0, 1.0), true);
        let v = world.linear_velocity(handle).unwrap();
        assert_abs_diff_eq!(v.x, 2.0, epsilon = 1e-4);
        assert!(v.z > 0.0);
    }

    #[test]
    fn test_ray_hits_bodies_but_not_ground() {
        let mut world = RapierPhysicsWorld::with_ground(0.0);
        let handle = world.add_body(ball(Vec3::new(0.0, 2.0, 0.0)));
        let down = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = world.cast_ray(&down, 100.0).unwrap();
        assert_eq!(hit.body, handle);
        assert_abs_diff_eq!(hit.toi, 7.5, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.point, Vec3::new(0.0, 2.5, 0.0), epsilon = 1e-3);

        let beside = Ray::new(Vec3::new(5.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(world.cast_ray(&beside, 100.0).is_none());
        assert!(world.cast_ray(&down, 5.0).is_none());
    }

    #[test]
    fn test_ground_supports_bodies() {
        let mut world = RapierPhysicsWorld::with_ground(0.0);
        let handle = world.add_body(ball(Vec3::new(0.0, 2.0, 0.0)));
        for _ in 0..240 {
            world.step(1.0 / 60.0);
        }
        let (position, _) = world.body_transform(handle).unwrap();
        assert!(position.y > 0.3 && position.y < 0.7);

        world.set_gravity(Vec3::new(0.0, STANDARD_GRAVITY, 0.0));
        assert_eq!(world.is_sleeping(handle), Some(false));
        assert_eq!(world.gravity().y, STANDARD_GRAVITY);
    }
}
