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

//! Error types shared across the host contracts.

use std::path::PathBuf;

/// The active plugin has no usable resource directory.
///
/// The host resolves the directory when it loads a plugin but only reports
/// this error if the plugin actually asks for its path, so the value is
/// cached and cloned out on every request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourcePathError {
    /// None of the candidate directories exists.
    #[error("no resource directory found for plugin '{plugin}' (searched: {searched:?})")]
    NotFound {
        /// Name of the plugin that requested its path.
        plugin: String,
        /// Directories that were probed, in search order.
        searched: Vec<PathBuf>,
    },
    /// No plugin is loaded yet.
    #[error("resource path unavailable: no plugin is loaded")]
    NoActivePlugin,
}

/// Failure reported by a graphics context.
#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    /// The presentation surface could not be acquired for this frame.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// Framebuffer contents could not be read back.
    #[error("framebuffer readback failed: {0}")]
    Readback(String),
    /// The context was asked to do something outside an active frame.
    #[error("no frame in progress")]
    NoFrameInProgress,
    /// A captured frame could not be encoded or written.
    #[error("failed to encode {path:?}: {reason}")]
    Encode {
        /// Destination file.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },
}

/// Failure reported by a sampler service.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    /// The sampler was started while already running.
    #[error("sampler is already running")]
    AlreadyRunning,
    /// The sampler was stopped while not running.
    #[error("sampler is not running")]
    NotRunning,
    /// The sampling backend failed.
    #[error("sampler backend error: {0}")]
    Backend(String),
}

/// Failure raised by a plugin factory or callback.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The plugin could not be constructed.
    #[error("plugin '{name}' failed to initialize: {reason}")]
    Creation {
        /// Name of the plugin.
        name: String,
        /// Human-readable cause.
        reason: String,
    },
    /// The plugin needed its resource directory and there is none.
    #[error(transparent)]
    Resources(#[from] ResourcePathError),
}
