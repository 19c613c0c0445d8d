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

//! The host-side state behind the plugin capability set.

use std::cell::Cell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use stagehand_core::input::{Key, KeyAction, Mods, MouseButton, MouseButtonAction};
use stagehand_core::{
    CameraSlot, CoordinateMapper, GazePoint, PluginHost, ResourcePathError, SharedCamera,
};

/// Input, geometry and gaze state shared with the active plugin.
#[derive(Debug)]
pub struct HostContext {
    mapper: CoordinateMapper,
    pressed_keys: HashSet<Key>,
    pressed_buttons: HashSet<MouseButton>,
    live_mods: Mods,
    mouse: (f64, f64),
    resources: Result<PathBuf, ResourcePathError>,
    camera: CameraSlot,
    gaze: Cell<GazePoint>,
    recording: bool,
    replaying_gaze: bool,
    window_size_request: Cell<Option<(u32, u32)>>,
}

impl HostContext {
    /// Creates a context for a window of the given sizes.
    pub fn new(window_size: (u32, u32), framebuffer_size: (u32, u32)) -> Self {
        Self {
            mapper: CoordinateMapper::new(window_size, framebuffer_size),
            pressed_keys: HashSet::new(),
            pressed_buttons: HashSet::new(),
            live_mods: Mods::NONE,
            mouse: (0.0, 0.0),
            resources: Err(ResourcePathError::NoActivePlugin),
            camera: CameraSlot::new(),
            gaze: Cell::new(GazePoint::CENTER),
            recording: false,
            replaying_gaze: false,
            window_size_request: Cell::new(None),
        }
    }

    /// The window/framebuffer coordinate mapper.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub(crate) fn mapper_mut(&mut self) -> &mut CoordinateMapper {
        &mut self.mapper
    }

    /// The non-owning camera registration.
    pub fn camera(&self) -> &CameraSlot {
        &self.camera
    }

    /// Modifiers currently held, as last reported by the platform.
    pub fn live_mods(&self) -> Mods {
        self.live_mods
    }

    pub(crate) fn set_live_mods(&mut self, mods: Mods) {
        self.live_mods = mods;
    }

    pub(crate) fn note_key(&mut self, key: Key, action: KeyAction) {
        match action {
            KeyAction::Press | KeyAction::Repeat => {
                self.pressed_keys.insert(key);
            }
            KeyAction::Release => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    pub(crate) fn note_mouse_button(&mut self, button: MouseButton, action: MouseButtonAction) {
        match action {
            MouseButtonAction::Press => {
                self.pressed_buttons.insert(button);
            }
            MouseButtonAction::Release => {
                self.pressed_buttons.remove(&button);
            }
        }
    }

    pub(crate) fn set_mouse_position(&mut self, x: f64, y: f64) {
        self.mouse = (x, y);
    }

    pub(crate) fn set_resources(&mut self, resources: Result<PathBuf, ResourcePathError>) {
        self.resources = resources;
    }

    /// The gaze point currently published to plugins.
    pub fn gaze(&self) -> GazePoint {
        self.gaze.get()
    }

    pub(crate) fn set_gaze(&self, point: GazePoint) {
        self.gaze.set(point);
    }

    pub(crate) fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub(crate) fn set_replaying_gaze(&mut self, replaying: bool) {
        self.replaying_gaze = replaying;
    }

    /// Takes the most recent window resize request made by a plugin.
    pub(crate) fn take_window_size_request(&self) -> Option<(u32, u32)> {
        self.window_size_request.take()
    }
}

impl PluginHost for HostContext {
    fn framebuffer_size(&self) -> (u32, u32) {
        self.mapper.framebuffer_size()
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    fn mouse_position(&self) -> (f64, f64) {
        self.mouse
    }

    fn resources_path(&self) -> Result<&Path, ResourcePathError> {
        match &self.resources {
            Ok(path) => Ok(path.as_path()),
            Err(err) => Err(err.clone()),
        }
    }

    fn register_camera(&self, camera: &SharedCamera) {
        self.camera.register(camera);
    }

    fn remove_camera(&self) {
        self.camera.remove();
    }

    fn set_window_size(&self, width: u32, height: u32) {
        self.window_size_request.set(Some((width, height)));
    }

    fn push_gaze_point(&self, point: GazePoint) {
        if self.recording {
            self.gaze.set(point);
        }
    }

    fn pull_gaze_point(&self) -> GazePoint {
        self.gaze.get()
    }

    fn record_gaze_point(&self) -> bool {
        self.recording
    }

    fn replay_gaze_point(&self) -> bool {
        self.replaying_gaze
    }
}
