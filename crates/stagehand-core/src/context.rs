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

//! The capability set the host exposes to a loaded plugin.

use std::path::Path;

use crate::camera::SharedCamera;
use crate::error::ResourcePathError;
use crate::input::{Key, MouseButton};

/// A normalized 2D gaze point, both components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazePoint {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl GazePoint {
    /// The screen center, used whenever no gaze stream is available.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Creates a gaze point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Default for GazePoint {
    fn default() -> Self {
        Self::CENTER
    }
}

/// What a plugin may ask of the host while it is loaded.
///
/// Every method takes `&self`: plugins receive a shared reference on each
/// callback and the host keeps the few mutable bits behind interior
/// mutability.
pub trait PluginHost {
    /// Returns the current framebuffer size in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Returns `true` while `key` is held down.
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Returns `true` while `button` is held down.
    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool;

    /// Returns the pointer position in framebuffer space.
    fn mouse_position(&self) -> (f64, f64);

    /// Returns the plugin's private resource directory.
    ///
    /// The lookup happened when the plugin was loaded; a failure is reported
    /// here, on request, and never earlier.
    fn resources_path(&self) -> Result<&Path, ResourcePathError>;

    /// Lets the host drive `camera` without owning it.
    fn register_camera(&self, camera: &SharedCamera);

    /// Forgets the registered camera.
    fn remove_camera(&self);

    /// Asks the platform to resize the window.
    fn set_window_size(&self, width: u32, height: u32);

    /// Publishes the plugin's current gaze point for recording.
    fn push_gaze_point(&self, point: GazePoint);

    /// Returns the gaze point the host is replaying, or the last pushed one.
    fn pull_gaze_point(&self) -> GazePoint;

    /// Returns `true` while the host records interaction traces.
    fn record_gaze_point(&self) -> bool;

    /// Returns `true` while a benchmark replays a recorded gaze stream.
    fn replay_gaze_point(&self) -> bool;
}
