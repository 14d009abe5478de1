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

//! Object descriptors owned by the [`ObjectStore`](crate::ObjectStore).

use crate::error::ParseShapeError;
use prism_core::math::{LinearRgba, Vec3};
use prism_core::physics::{ColliderShape, RigidBodyHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shape kinds the sandbox can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// A ball.
    Sphere,
    /// A cuboid.
    Box,
    /// An upright cylinder.
    Cylinder,
}

impl ShapeKind {
    /// Every shape kind, in a stable order.
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Sphere, ShapeKind::Box, ShapeKind::Cylinder];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Box => "box",
            ShapeKind::Cylinder => "cylinder",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ParseShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sphere" | "ball" => Ok(ShapeKind::Sphere),
            "box" | "cube" => Ok(ShapeKind::Box),
            "cylinder" => Ok(ShapeKind::Cylinder),
            _ => Err(ParseShapeError(s.to_string())),
        }
    }
}

/// Unique, monotonically increasing object identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to create an object. Unset fields are sampled by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    /// Shape to create.
    pub shape: ShapeKind,
    /// Spawn position; a jittered point above the spawn origin when `None`.
    pub position: Option<Vec3>,
    /// Initial linear velocity.
    pub velocity: Option<Vec3>,
    /// Uniform scale; sampled from the kind's default range when `None`.
    pub scale: Option<f32>,
    /// Per-axis proportions multiplied by the scale.
    pub proportions: Vec3,
    /// Rotation about +Y in radians.
    pub yaw: f32,
}

impl SpawnRequest {
    /// A request for `shape` with everything else left to the store.
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            position: None,
            velocity: None,
            scale: None,
            proportions: Vec3::ONE,
            yaw: 0.0,
        }
    }

    /// Sets the spawn position.
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the initial velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Sets the uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the per-axis proportions.
    pub fn with_proportions(mut self, proportions: Vec3) -> Self {
        self.proportions = proportions;
        self
    }

    /// Sets the yaw.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }
}

/// The creation descriptor of a live object.
///
/// The physics engine owns the live transform and velocity; this record is
/// never updated after creation. `body` is the back-reference used to map
/// ray-cast hits to objects.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsObject {
    /// Unique id.
    pub id: ObjectId,
    /// Shape kind.
    pub shape: ShapeKind,
    /// Position at creation.
    pub spawn_position: Vec3,
    /// Positive uniform scale.
    pub scale: f32,
    /// Per-axis proportions, positive.
    pub proportions: Vec3,
    /// Rotation about +Y at creation.
    pub yaw: f32,
    /// Palette colour sampled at creation.
    pub color: LinearRgba,
    /// Initial velocity, if any.
    pub initial_velocity: Option<Vec3>,
    /// Body backing this object in the physics engine.
    pub body: RigidBodyHandle,
}

impl PhysicsObject {
    /// Size of the object's bounding box: `scale * proportions`.
    pub fn extents(&self) -> Vec3 {
        self.proportions * self.scale
    }

    /// Collider matching the object's bounding box.
    pub fn collider_shape(&self) -> ColliderShape {
        collider_for(self.shape, self.extents())
    }

    /// Colour to draw with given the object's live speed.
    ///
    /// Blends the palette colour toward `hot` and saturates at `hot_speed`.
    pub fn display_color(&self, speed: f32, hot: LinearRgba, hot_speed: f32) -> LinearRgba {
        if !speed.is_finite() || hot_speed <= 0.0 {
            return self.color;
        }
        LinearRgba::lerp(self.color, hot, speed / hot_speed)
    }
}

/// Collider for a shape fitted into a box of the given full `extents`.
///
/// Spheres use the X extent as diameter; cylinders use X as diameter and Y as height.
pub fn collider_for(shape: ShapeKind, extents: Vec3) -> ColliderShape {
    match shape {
        ShapeKind::Sphere => ColliderShape::Sphere(extents.x * 0.5),
        ShapeKind::Box => ColliderShape::Box(extents * 0.5),
        ShapeKind::Cylinder => ColliderShape::Cylinder {
            half_height: extents.y * 0.5,
            radius: extents.x * 0.5,
        },
    }
}

/// A cloneable, read-only view of the store's object count.
///
/// Updated synchronously by every store mutation, so observers on other
/// threads never see a count above the cap.
#[derive(Debug, Clone, Default)]
pub struct ObservableCount(Arc<AtomicUsize>);

impl ObservableCount {
    /// Current object count.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, value: usize) {
        self.0.store(value, Ordering::Release);
    }
}
