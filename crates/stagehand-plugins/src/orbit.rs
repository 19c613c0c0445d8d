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

//! An orbit camera demo.
//!
//! The plugin owns an [`OrbitCamera`] registered with the host, so drags and
//! scrolls (live or replayed) move it. The frame is cleared to a colour that
//! encodes the camera pose, tinted by the current gaze point.

use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

use stagehand_core::input::{Key, KeyAction, Mods};
use stagehand_core::platform::{Color, FrameTarget};
use stagehand_core::{
    register_plugin, CameraControl, CameraControlMode, GazePoint, PluginError, PluginHost,
    RenderPlugin, SharedCamera,
};

const MIN_DISTANCE: f64 = 0.5;
const MAX_DISTANCE: f64 = 50.0;
const PITCH_LIMIT: f64 = FRAC_PI_2 - 0.01;
const SCROLL_ZOOM: f64 = 0.9;

/// A camera orbiting a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Rotation around the vertical axis, in radians.
    pub yaw: f64,
    /// Elevation, in radians.
    pub pitch: f64,
    /// Distance to the target.
    pub distance: f64,
    /// Target offset in the view plane.
    pub pan: (f64, f64),
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
            pan: (0.0, 0.0),
        }
    }
}

impl OrbitCamera {
    fn zoom(&mut self, factor: f64) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Colour encoding the pose.
    pub fn color(&self) -> Color {
        let depth = (self.distance - MIN_DISTANCE) / (MAX_DISTANCE - MIN_DISTANCE);
        Color::rgb(
            0.5 + 0.5 * self.yaw.cos(),
            0.5 + 0.5 * (self.pitch / FRAC_PI_2),
            1.0 - depth,
        )
    }
}

impl CameraControl for OrbitCamera {
    fn mouse_move_control(
        &mut self,
        mode: CameraControlMode,
        old_x: f64,
        old_y: f64,
        new_x: f64,
        new_y: f64,
    ) {
        let (dx, dy) = (new_x - old_x, new_y - old_y);
        match mode {
            CameraControlMode::Left => {
                self.yaw = (self.yaw - dx * PI).rem_euclid(2.0 * PI);
                self.pitch = (self.pitch + dy * FRAC_PI_2).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
            CameraControlMode::Middle => {
                self.pan.0 -= dx * self.distance * 0.5;
                self.pan.1 -= dy * self.distance * 0.5;
            }
            CameraControlMode::Right => self.zoom((-dy).exp()),
            CameraControlMode::None => {}
        }
    }

    fn mouse_scroll_control(&mut self, _x_offset: f64, y_offset: f64) {
        self.zoom(SCROLL_ZOOM.powf(y_offset));
    }
}

/// Orbit camera demo plugin.
pub struct OrbitPlugin {
    camera: Rc<RefCell<OrbitCamera>>,
    // Keeps the registration alive; the host only holds a weak handle.
    _shared: SharedCamera,
}

impl OrbitPlugin {
    /// Plugin factory: creates the camera and registers it with the host.
    pub fn create(host: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
        let camera = Rc::new(RefCell::new(OrbitCamera::default()));
        let shared: SharedCamera = camera.clone();
        host.register_camera(&shared);
        Ok(Box::new(Self {
            camera,
            _shared: shared,
        }))
    }

    /// A copy of the current camera pose.
    pub fn camera(&self) -> OrbitCamera {
        self.camera.borrow().clone()
    }
}

fn pointer_gaze(host: &dyn PluginHost) -> GazePoint {
    let (width, height) = host.framebuffer_size();
    if width == 0 || height == 0 {
        return GazePoint::CENTER;
    }
    let (x, y) = host.mouse_position();
    GazePoint::new(
        (x / f64::from(width)).clamp(0.0, 1.0) as f32,
        (y / f64::from(height)).clamp(0.0, 1.0) as f32,
    )
}

impl RenderPlugin for OrbitPlugin {
    fn render(&mut self, host: &dyn PluginHost, target: &mut dyn FrameTarget) {
        if host.record_gaze_point() {
            host.push_gaze_point(pointer_gaze(host));
        }
        let gaze = host.pull_gaze_point();
        let base = self.camera.borrow().color();
        let tint = 0.25 * f64::from(gaze.x - 0.5);
        target.clear(Color::rgb(
            (base.r + tint).clamp(0.0, 1.0),
            base.g,
            (base.b - tint).clamp(0.0, 1.0),
        ));
    }

    fn keyboard(&mut self, _host: &dyn PluginHost, key: Key, action: KeyAction, mods: Mods) {
        if key == Key::R && action == KeyAction::Press && mods.none() {
            log::info!("Orbit camera reset.");
            *self.camera.borrow_mut() = OrbitCamera::default();
        }
    }
}

register_plugin!(OrbitPlugin, priority = 20, path = "orbitplugin", OrbitPlugin::create);
