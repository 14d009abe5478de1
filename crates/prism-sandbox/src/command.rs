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

//! The command surface.
//!
//! UI code never reaches into the sandbox. It holds a [`CommandSender`] and
//! posts [`SandboxCommand`]s, which the sandbox drains once per frame.

use crate::object::ShapeKind;
use crate::presets::PresetName;
use serde::{Deserialize, Serialize};

/// The externally triggerable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SandboxCommand {
    /// Spawn one object of the given kind at a random point above the origin.
    Spawn(ShapeKind),
    /// Remove every object and cancel any drag.
    Reset,
    /// Replace the contents with a preset.
    LoadPreset(PresetName),
    /// Turn gravity on or off.
    ToggleGravity,
    /// Flip gravity direction.
    ToggleAntiGravity,
}

/// A cloneable handle for posting commands to a [`Sandbox`](crate::Sandbox).
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: flume::Sender<SandboxCommand>,
}

impl CommandSender {
    pub(crate) fn new(tx: flume::Sender<SandboxCommand>) -> Self {
        Self { tx }
    }

    /// Posts a command. Returns `false` if the sandbox is gone.
    pub fn send(&self, command: SandboxCommand) -> bool {
        match self.tx.send(command) {
            Ok(()) => true,
            Err(_) => {
                log::debug!("Dropping {:?}: sandbox no longer running", command);
                false
            }
        }
    }

    /// Posts [`SandboxCommand::Spawn`].
    pub fn spawn(&self, shape: ShapeKind) -> bool {
        self.send(SandboxCommand::Spawn(shape))
    }

    /// Posts [`SandboxCommand::Reset`].
    pub fn reset(&self) -> bool {
        self.send(SandboxCommand::Reset)
    }

    /// Posts [`SandboxCommand::LoadPreset`].
    pub fn load_preset(&self, name: PresetName) -> bool {
        self.send(SandboxCommand::LoadPreset(name))
    }

    /// Posts [`SandboxCommand::ToggleGravity`].
    pub fn toggle_gravity(&self) -> bool {
        self.send(SandboxCommand::ToggleGravity)
    }

    /// Posts [`SandboxCommand::ToggleAntiGravity`].
    pub fn toggle_anti_gravity(&self) -> bool {
        self.send(SandboxCommand::ToggleAntiGravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::event::EventBus;

    #[test]
    fn test_commands_arrive_in_order() {
        let bus = EventBus::<SandboxCommand>::new();
        let sender = CommandSender::new(bus.sender());
        assert!(sender.spawn(ShapeKind::Box));
        assert!(sender.load_preset(PresetName::Jenga));
        assert!(sender.toggle_gravity());
        assert_eq!(
            bus.drain(),
            vec![
                SandboxCommand::Spawn(ShapeKind::Box),
                SandboxCommand::LoadPreset(PresetName::Jenga),
                SandboxCommand::ToggleGravity,
            ]
        );
    }

    #[test]
    fn test_send_after_drop_reports_failure() {
        let bus = EventBus::<SandboxCommand>::new();
        let sender = CommandSender::new(bus.sender());
        drop(bus);
        assert!(!sender.reset());
    }
}
