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

//! Camera control contract between the host and camera-owning plugins.
//!
//! A plugin owns its camera and lends the host a non-owning handle through a
//! [`CameraSlot`]. The host drives the camera with normalized drag and scroll
//! deltas and never extends its lifetime.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Which mouse button currently drives camera manipulation.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraControlMode {
    /// No button is driving the camera.
    #[default]
    None = 0,
    /// Dragging with the left button.
    Left = 1,
    /// Dragging with the middle button.
    Middle = 2,
    /// Dragging with the right button.
    Right = 3,
}

impl CameraControlMode {
    /// Returns the stable numeric tag used in trace files.
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Decodes a numeric tag, returning `None` for unknown values.
    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            1 => Some(Self::Left),
            2 => Some(Self::Middle),
            3 => Some(Self::Right),
            _ => None,
        }
    }
}

/// A camera that reacts to normalized pointer input.
pub trait CameraControl {
    /// Applies a drag from `(old_x, old_y)` to `(new_x, new_y)`, both in
    /// normalized device coordinates, performed with `mode`.
    fn mouse_move_control(
        &mut self,
        mode: CameraControlMode,
        old_x: f64,
        old_y: f64,
        new_x: f64,
        new_y: f64,
    );

    /// Applies a scroll of `(x_offset, y_offset)` wheel units.
    fn mouse_scroll_control(&mut self, x_offset: f64, y_offset: f64);
}

/// Shared ownership of a camera, as held by the plugin that created it.
pub type SharedCamera = Rc<RefCell<dyn CameraControl>>;

/// Non-owning registration point for the active camera.
///
/// Registering and removing are idempotent. Every use upgrades the weak
/// handle first; a camera that was dropped by its owner is skipped silently.
#[derive(Default)]
pub struct CameraSlot {
    camera: RefCell<Option<Weak<RefCell<dyn CameraControl>>>>,
}

impl CameraSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `camera`, replacing any previous registration.
    pub fn register(&self, camera: &SharedCamera) {
        *self.camera.borrow_mut() = Some(Rc::downgrade(camera));
    }

    /// Forgets the registered camera, if any.
    pub fn remove(&self) {
        self.camera.borrow_mut().take();
    }

    /// Returns `true` if a camera is registered and still alive.
    pub fn is_alive(&self) -> bool {
        self.camera
            .borrow()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Runs `f` against the live camera.
    ///
    /// Returns `false` without calling `f` when no camera is registered, the
    /// camera was dropped, or the camera is currently borrowed by its owner.
    pub fn with_camera(&self, f: impl FnOnce(&mut dyn CameraControl)) -> bool {
        let Some(camera) = self.camera.borrow().as_ref().and_then(Weak::upgrade) else {
            return false;
        };
        let Ok(mut camera) = camera.try_borrow_mut() else {
            log::warn!("Camera is busy; skipping camera control update.");
            return false;
        };
        f(&mut *camera);
        true
    }
}

impl std::fmt::Debug for CameraSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSlot")
            .field("alive", &self.is_alive())
            .finish()
    }
}
