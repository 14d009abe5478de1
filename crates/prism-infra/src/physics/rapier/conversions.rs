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

//! Conversions between Prism math types and rapier's nalgebra types.

use prism_core::math::{Quat, Vec3};
use prism_core::physics::RigidBodyHandle;
use rapier3d::na::{Point3, Quaternion, UnitQuaternion, Vector3};
use rapier3d::prelude::Real;

pub fn to_rapier_vec(v: Vec3) -> Vector3<Real> {
    Vector3::new(v.x, v.y, v.z)
}

pub fn to_rapier_point(v: Vec3) -> Point3<Real> {
    Point3::new(v.x, v.y, v.z)
}

pub fn to_rapier_quat(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn from_rapier_vec(v: &Vector3<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn from_rapier_point(p: &Point3<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub fn from_rapier_quat(q: &UnitQuaternion<Real>) -> Quat {
    Quat::new(q.i, q.j, q.k, q.w)
}

/// Packs index and generation so a stale handle never aliases a reused slot.
pub fn to_body_handle(handle: rapier3d::dynamics::RigidBodyHandle) -> RigidBodyHandle {
    let (index, generation) = handle.into_raw_parts();
    RigidBodyHandle(((generation as u64) << 32) | index as u64)
}

pub fn to_rapier_body_handle(handle: RigidBodyHandle) -> rapier3d::dynamics::RigidBodyHandle {
    let index = (handle.0 & 0xFFFF_FFFF) as u32;
    let generation = (handle.0 >> 32) as u32;
    rapier3d::dynamics::RigidBodyHandle::from_raw_parts(index, generation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_handle_round_trip_keeps_generation() {
        let raw = rapier3d::dynamics::RigidBodyHandle::from_raw_parts(7, 3);
        let ours = to_body_handle(raw);
        assert_eq!(ours.0, (3u64 << 32) | 7);
        assert_eq!(to_rapier_body_handle(ours), raw);
    }

    #[test]
    fn test_quat_component_order() {
        let q = Quat::from_yaw(0.7);
        let back = from_rapier_quat(&to_rapier_quat(q));
        assert!((back.w - q.w).abs() < 1e-6 && (back.y - q.y).abs() < 1e-6);
    }
}
