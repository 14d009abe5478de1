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

//! The bounded object pool.
//!
//! Objects live in a FIFO ring (`VecDeque`): new objects are pushed at the
//! back and eviction pops the front, so the oldest surviving object always
//! goes first. The count never exceeds the capacity, not even transiently:
//! eviction happens before the insert that would overflow.

use crate::config::{PresetConfig, StoreConfig};
use crate::object::{ObjectId, ObservableCount, PhysicsObject, ShapeKind, SpawnRequest};
use crate::presets::{self, PresetName};
use prism_core::math::{LinearRgba, Quat, Vec3};
use prism_core::physics::{BodyType, PhysicsProvider, RigidBodyDesc, RigidBodyHandle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Owns the creation descriptors of every live object.
#[derive(Debug)]
pub struct ObjectStore {
    objects: VecDeque<PhysicsObject>,
    capacity: usize,
    next_id: u64,
    config: StoreConfig,
    palette: Vec<LinearRgba>,
    rng: StdRng,
    count: ObservableCount,
}

impl ObjectStore {
    /// Creates an empty store holding at most `capacity` objects (at least one).
    pub fn new(capacity: usize, config: StoreConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let palette = config.palette_colors();
        Self {
            objects: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            next_id: 1,
            config,
            palette,
            rng,
            count: ObservableCount::default(),
        }
    }

    /// Creates an object and its physics body, evicting the oldest object first
    /// if the store is full.
    pub fn spawn(&mut self, physics: &mut dyn PhysicsProvider, request: SpawnRequest) -> ObjectId {
        if self.objects.len() >= self.capacity {
            self.evict_oldest(physics);
        }

        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let scale = self.resolve_scale(request.shape, request.scale);
        let proportions = sanitize_proportions(request.proportions);
        let position = match request.position {
            Some(p) if p.is_finite() => p,
            _ => self.random_spawn_position(),
        };
        let velocity = request.velocity.filter(Vec3::is_finite);
        let yaw = if request.yaw.is_finite() { request.yaw } else { 0.0 };
        let color = self.palette[self.rng.gen_range(0..self.palette.len())];

        let mut object = PhysicsObject {
            id,
            shape: request.shape,
            spawn_position: position,
            scale,
            proportions,
            yaw,
            color,
            initial_velocity: velocity,
            body: RigidBodyHandle(0),
        };
        object.body = physics.add_body(RigidBodyDesc {
            position,
            rotation: Quat::from_yaw(yaw),
            linear_velocity: velocity.unwrap_or(Vec3::ZERO),
            body_type: BodyType::Dynamic,
            shape: object.collider_shape(),
            density: self.config.density,
        });

        log::trace!("Spawned {} {} at {:?}", object.shape, id, position);
        self.objects.push_back(object);
        self.sync_count();
        id
    }

    /// Spawns a shape of a randomly chosen kind.
    pub fn spawn_random_shape(
        &mut self,
        physics: &mut dyn PhysicsProvider,
        position: Option<Vec3>,
    ) -> ObjectId {
        let shape = self.random_shape();
        let mut request = SpawnRequest::new(shape);
        request.position = position;
        self.spawn(physics, request)
    }

    /// Removes the oldest surviving object.
    pub fn evict_oldest(&mut self, physics: &mut dyn PhysicsProvider) -> Option<PhysicsObject> {
        let evicted = self.objects.pop_front()?;
        physics.remove_body(evicted.body);
        log::debug!("Evicted {} {} (capacity {})", evicted.shape, evicted.id, self.capacity);
        self.sync_count();
        Some(evicted)
    }

    /// Changes the capacity, evicting the oldest objects immediately if the
    /// store holds more than the new cap. Returns the evicted ids.
    pub fn set_capacity(&mut self, physics: &mut dyn PhysicsProvider, capacity: usize) -> Vec<ObjectId> {
        let capacity = capacity.max(1);
        if capacity != self.capacity {
            log::debug!("Object capacity {} -> {}", self.capacity, capacity);
        }
        self.capacity = capacity;
        let mut evicted = Vec::new();
        while self.objects.len() > self.capacity {
            match self.evict_oldest(physics) {
                Some(object) => evicted.push(object.id),
                None => break,
            }
        }
        evicted
    }

    /// Removes every object. Returns how many were removed.
    pub fn reset(&mut self, physics: &mut dyn PhysicsProvider) -> usize {
        let removed = self.objects.len();
        for object in self.objects.drain(..) {
            physics.remove_body(object.body);
        }
        self.sync_count();
        if removed > 0 {
            log::debug!("Store reset, {} objects removed", removed);
        }
        removed
    }

    /// Clears the store and inserts the layout of `name`.
    ///
    /// Layouts larger than the capacity are trimmed through the normal FIFO path.
    /// Returns the resulting object count.
    pub fn load_preset(
        &mut self,
        physics: &mut dyn PhysicsProvider,
        name: PresetName,
        config: &PresetConfig,
    ) -> usize {
        self.reset(physics);
        let layout = presets::generate(name, config);
        let requested = layout.len();
        for request in layout {
            self.spawn(physics, request);
        }
        log::info!(
            "Loaded preset '{}' ({} of {} objects)",
            name,
            self.objects.len(),
            requested
        );
        self.objects.len()
    }

    /// Picks a shape kind uniformly.
    pub fn random_shape(&mut self) -> ShapeKind {
        ShapeKind::ALL[self.rng.gen_range(0..ShapeKind::ALL.len())]
    }

    /// A random point around the configured spawn origin.
    pub fn random_spawn_position(&mut self) -> Vec3 {
        let jitter_xz = self.config.spawn_jitter_xz.abs();
        let jitter_y = self.config.spawn_jitter_y.abs();
        let offset = Vec3::new(
            sample(&mut self.rng, -jitter_xz, jitter_xz),
            sample(&mut self.rng, 0.0, jitter_y),
            sample(&mut self.rng, -jitter_xz, jitter_xz),
        );
        self.config.spawn_origin + offset
    }

    fn resolve_scale(&mut self, shape: ShapeKind, requested: Option<f32>) -> f32 {
        match requested {
            Some(scale) if scale.is_finite() && scale > 0.0 => scale,
            Some(_) => self.config.fallback_scale,
            None => {
                let range = self.config.scale_range(shape);
                let sampled = sample(&mut self.rng, range.min, range.max);
                if sampled.is_finite() && sampled > 0.0 {
                    sampled
                } else {
                    self.config.fallback_scale
                }
            }
        }
    }

    fn sync_count(&self) {
        self.count.set(self.objects.len());
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Current capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `id` is still live.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a live object by id.
    pub fn get(&self, id: ObjectId) -> Option<&PhysicsObject> {
        // Ids increase front to back.
        self.objects
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .and_then(|index| self.objects.get(index))
    }

    /// Looks up the object backed by `body`.
    pub fn find_by_body(&self, body: RigidBodyHandle) -> Option<&PhysicsObject> {
        self.objects.iter().find(|o| o.body == body)
    }

    /// Live objects from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &PhysicsObject> {
        self.objects.iter()
    }

    /// Ids of live objects from oldest to newest.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    /// A handle observers can poll for the current count.
    pub fn observable_count(&self) -> ObservableCount {
        self.count.clone()
    }

    /// Store settings.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

fn sample(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn sanitize_proportions(p: Vec3) -> Vec3 {
    let axis = |v: f32| if v.is_finite() && v > 0.0 { v } else { 1.0 };
    Vec3::new(axis(p.x), axis(p.y), axis(p.z))
}
