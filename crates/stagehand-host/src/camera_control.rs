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

//! Which mouse button, if any, drives the registered camera.

use stagehand_core::input::{Mods, MouseButton, MouseButtonAction};
use stagehand_core::{CameraControlMode, CameraSlot, CoordinateMapper};

use crate::recorder::TraceEntry;

/// A drag that was delivered to the camera, in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDelta {
    /// Button driving the drag.
    pub mode: CameraControlMode,
    /// Start of the move.
    pub old: (f64, f64),
    /// End of the move.
    pub new: (f64, f64),
}

/// Camera manipulation state machine.
///
/// A press without modifiers selects the matching mode; any release, or a
/// press with a modifier held, returns to [`CameraControlMode::None`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CameraControlStateMachine {
    mode: CameraControlMode,
}

impl CameraControlStateMachine {
    /// Creates the machine in [`CameraControlMode::None`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The current mode.
    pub fn mode(&self) -> CameraControlMode {
        self.mode
    }

    /// Applies a mouse button transition.
    pub fn on_mouse_button(&mut self, button: MouseButton, action: MouseButtonAction, mods: Mods) {
        self.mode = match (action, mods.none(), button) {
            (MouseButtonAction::Press, true, MouseButton::Left) => CameraControlMode::Left,
            (MouseButtonAction::Press, true, MouseButton::Middle) => CameraControlMode::Middle,
            (MouseButtonAction::Press, true, MouseButton::Right) => CameraControlMode::Right,
            _ => CameraControlMode::None,
        };
    }

    /// Forwards a pointer move from `old` to `new` (framebuffer space) to the
    /// camera while a drag mode is active.
    ///
    /// Returns the delivered delta, or `None` if no drag is active or no live
    /// camera is registered.
    pub fn drag(
        &self,
        camera: &CameraSlot,
        mapper: &CoordinateMapper,
        old: (f64, f64),
        new: (f64, f64),
    ) -> Option<DragDelta> {
        if self.mode == CameraControlMode::None {
            return None;
        }
        let delta = DragDelta {
            mode: self.mode,
            old: mapper.to_normalized_device_coords(old.0, old.1),
            new: mapper.to_normalized_device_coords(new.0, new.1),
        };
        camera
            .with_camera(|cam| {
                cam.mouse_move_control(delta.mode, delta.old.0, delta.old.1, delta.new.0, delta.new.1)
            })
            .then_some(delta)
    }

    /// Forwards a scroll to the camera unless a modifier is held.
    ///
    /// Returns `true` if the camera received it.
    pub fn scroll(&self, camera: &CameraSlot, live_mods: Mods, x_offset: f64, y_offset: f64) -> bool {
        if live_mods.any() {
            return false;
        }
        camera.with_camera(|cam| cam.mouse_scroll_control(x_offset, y_offset))
    }

    /// Replays one recorded trace entry as a drag followed by a scroll.
    pub fn apply_trace(&self, camera: &CameraSlot, entry: &TraceEntry) -> bool {
        camera.with_camera(|cam| {
            cam.mouse_move_control(entry.mode, entry.old_x, entry.old_y, entry.new_x, entry.new_y);
            cam.mouse_scroll_control(entry.x_offset, entry.y_offset);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingCamera;
    use stagehand_core::SharedCamera;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(machine: &mut CameraControlStateMachine, button: MouseButton, mods: Mods) {
        machine.on_mouse_button(button, MouseButtonAction::Press, mods);
    }

    #[test]
    fn press_without_modifiers_selects_mode() {
        let mut machine = CameraControlStateMachine::new();
        press(&mut machine, MouseButton::Left, Mods::NONE);
        assert_eq!(machine.mode(), CameraControlMode::Left);
        press(&mut machine, MouseButton::Right, Mods::NONE);
        assert_eq!(machine.mode(), CameraControlMode::Right);
        press(&mut machine, MouseButton::Middle, Mods::NONE);
        assert_eq!(machine.mode(), CameraControlMode::Middle);
    }

    #[test]
    fn press_with_modifier_stays_none() {
        let mut machine = CameraControlStateMachine::new();
        press(&mut machine, MouseButton::Left, Mods::SHIFT);
        assert_eq!(machine.mode(), CameraControlMode::None);
    }

    #[test]
    fn any_release_returns_to_none() {
        let mut machine = CameraControlStateMachine::new();
        press(&mut machine, MouseButton::Left, Mods::NONE);
        machine.on_mouse_button(MouseButton::Right, MouseButtonAction::Release, Mods::NONE);
        assert_eq!(machine.mode(), CameraControlMode::None);
    }

    #[test]
    fn other_buttons_do_not_drive_the_camera() {
        let mut machine = CameraControlStateMachine::new();
        press(&mut machine, MouseButton::Back, Mods::NONE);
        assert_eq!(machine.mode(), CameraControlMode::None);
    }

    #[test]
    fn drag_reaches_live_camera_in_ndc() {
        let camera = Rc::new(RefCell::new(RecordingCamera::default()));
        let shared: SharedCamera = camera.clone();
        let slot = CameraSlot::new();
        slot.register(&shared);
        let mapper = CoordinateMapper::new((100, 100), (100, 100));

        let mut machine = CameraControlStateMachine::new();
        assert!(machine.drag(&slot, &mapper, (0.0, 0.0), (50.0, 50.0)).is_none());

        press(&mut machine, MouseButton::Left, Mods::NONE);
        let delta = machine
            .drag(&slot, &mapper, (0.0, 0.0), (50.0, 50.0))
            .expect("camera is registered");
        assert_eq!(delta.old, (-1.0, 1.0));
        assert_eq!(delta.new, (0.0, 0.0));
        assert_eq!(camera.borrow().moves.len(), 1);
    }

    #[test]
    fn drag_without_camera_is_a_no_op() {
        let slot = CameraSlot::new();
        let mapper = CoordinateMapper::new((100, 100), (100, 100));
        let mut machine = CameraControlStateMachine::new();
        press(&mut machine, MouseButton::Left, Mods::NONE);
        assert!(machine.drag(&slot, &mapper, (0.0, 0.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn scroll_with_modifier_is_reserved() {
        let camera = Rc::new(RefCell::new(RecordingCamera::default()));
        let shared: SharedCamera = camera.clone();
        let slot = CameraSlot::new();
        slot.register(&shared);
        let machine = CameraControlStateMachine::new();

        assert!(!machine.scroll(&slot, Mods::CONTROL, 0.0, 1.0));
        assert!(machine.scroll(&slot, Mods::NONE, 0.0, 1.0));
        assert_eq!(camera.borrow().scrolls, vec![(0.0, 1.0)]);
    }
}
