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

//! # Prism Sandbox
//!
//! The interactive core of the physics sandbox: a bounded pool of simulated
//! objects that users spawn, drag, throw and reset.
//!
//! - [`ObjectStore`] owns the objects and evicts the oldest when full.
//! - [`presets`] builds the deterministic bowling, dominoes and jenga layouts.
//! - [`InteractionController`] is the drag/throw state machine.
//! - [`Sandbox`] ties them to a [`PhysicsProvider`](prism_core::physics::PhysicsProvider)
//!   and the quality loop from `prism-control`, and exposes the command channel
//!   and read models.

#![warn(missing_docs)]

pub mod camera;
pub mod command;
pub mod config;
pub mod error;
pub mod gravity;
pub mod interaction;
pub mod object;
pub mod presets;
pub mod sandbox;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use camera::PerspectiveCamera;
pub use command::{CommandSender, SandboxCommand};
pub use config::{
    CameraConfig, DominoLayout, InteractionConfig, PresetConfig, SandboxConfig, ScaleRange,
    StoreConfig,
};
pub use error::{ConfigError, ParsePresetError, ParseShapeError};
pub use gravity::GravityMode;
pub use interaction::{DragSession, InteractionController, InteractionState};
pub use object::{ObjectId, ObservableCount, PhysicsObject, ShapeKind, SpawnRequest};
pub use presets::PresetName;
pub use sandbox::Sandbox;
pub use store::ObjectStore;
pub use view::{RenderObject, SandboxStatus};
