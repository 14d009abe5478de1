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

//! Error types for the few fallible edges of the sandbox.
//!
//! Runtime operations never fail; only loading configuration and parsing
//! user-supplied names can.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a [`SandboxConfig`](crate::SandboxConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration was not valid JSON or did not match the schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A preset name that does not match any known preset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown preset '{0}' (expected one of: bowling, dominoes, jenga, clear)")]
pub struct ParsePresetError(pub String);

/// A shape name that does not match any known shape kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown shape '{0}' (expected one of: sphere, box, cylinder)")]
pub struct ParseShapeError(pub String);
