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

//! Routing of platform events to the host state and the active plugin.
//!
//! Framebuffer resizes always reach the plugin. Every other event is withheld
//! from the plugin while the UI layer claims the matching kind of focus.

use std::collections::VecDeque;

use stagehand_core::input::{fix_keyboard_mods, KeyAction};
use stagehand_core::platform::{PlatformEvent, UiFocus};
use stagehand_core::PluginHost;

use crate::camera_control::CameraControlStateMachine;
use crate::commands::{HostCommand, HotkeyMap};
use crate::context::HostContext;
use crate::lifecycle::PluginManager;
use crate::recorder::Recorder;

/// What the host loop must do after an event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing beyond the dispatch itself.
    Handled,
    /// Redraw once outside the frame counter.
    Refresh,
    /// Close the window.
    Close,
}

/// The host state an event may touch.
pub struct DispatchTargets<'a> {
    /// Input and geometry state.
    pub context: &'a mut HostContext,
    /// The active plugin.
    pub plugins: &'a mut PluginManager,
    /// Camera manipulation state.
    pub camera: &'a mut CameraControlStateMachine,
    /// Trace recorder.
    pub recorder: &'a mut Recorder,
    /// Focus signal of the UI layer.
    pub ui: &'a dyn UiFocus,
    /// Commands triggered by hotkeys.
    pub commands: &'a mut VecDeque<HostCommand>,
}

/// Normalizes and routes [`PlatformEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct InputDispatcher {
    hotkeys: HotkeyMap,
}

impl InputDispatcher {
    /// Creates a dispatcher with the given key bindings.
    pub fn new(hotkeys: HotkeyMap) -> Self {
        Self { hotkeys }
    }

    /// The key bindings.
    pub fn hotkeys(&self) -> &HotkeyMap {
        &self.hotkeys
    }

    /// Mutable access to the key bindings.
    pub fn hotkeys_mut(&mut self) -> &mut HotkeyMap {
        &mut self.hotkeys
    }

    /// Routes one event.
    pub fn dispatch(&self, event: PlatformEvent, t: &mut DispatchTargets<'_>) -> DispatchOutcome {
        match event {
            PlatformEvent::WindowResized { width, height } => {
                t.context.mapper_mut().set_window_size(width, height);
            }
            PlatformEvent::FramebufferResized { width, height } => {
                t.context.mapper_mut().set_framebuffer_size(width, height);
                t.plugins.resize(t.context, width, height);
            }
            PlatformEvent::Key { key, action, mods } => {
                let mods = fix_keyboard_mods(mods, key, action);
                t.context.set_live_mods(mods);
                t.context.note_key(key, action);
                if t.ui.wants_keyboard() {
                    return DispatchOutcome::Handled;
                }
                if let Some(command) = self.hotkeys.command_for(key) {
                    if action == KeyAction::Press {
                        log::debug!("Hotkey {key:?} -> {command:?}");
                        t.commands.push_back(command.clone());
                    }
                    return DispatchOutcome::Handled;
                }
                let context: &HostContext = t.context;
                t.plugins
                    .with_active(|plugin| plugin.keyboard(context, key, action, mods));
            }
            PlatformEvent::Char { codepoint } => {
                if !t.ui.wants_text_input() {
                    let context: &HostContext = t.context;
                    t.plugins
                        .with_active(|plugin| plugin.char_input(context, codepoint));
                }
            }
            PlatformEvent::MouseButton {
                button,
                action,
                mods,
            } => {
                t.context.note_mouse_button(button, action);
                t.camera.on_mouse_button(button, action, mods);
                if !t.ui.wants_pointer() {
                    let context: &HostContext = t.context;
                    t.plugins
                        .with_active(|plugin| plugin.mouse_button(context, button, action, mods));
                }
            }
            PlatformEvent::MouseMoved { x, y } => {
                let new = t.context.mapper().to_framebuffer_space(x, y);
                if !t.ui.wants_pointer() && t.plugins.has_active() {
                    let old = t.context.mouse_position();
                    if let Some(delta) =
                        t.camera
                            .drag(t.context.camera(), t.context.mapper(), old, new)
                    {
                        t.recorder.note_drag(&delta);
                    }
                    let context: &HostContext = t.context;
                    t.plugins
                        .with_active(|plugin| plugin.mouse_move(context, new.0, new.1));
                }
                t.context.set_mouse_position(new.0, new.1);
            }
            PlatformEvent::MouseScrolled { x_offset, y_offset } => {
                if !t.ui.wants_pointer() && t.plugins.has_active() {
                    if t.camera.scroll(
                        t.context.camera(),
                        t.context.live_mods(),
                        x_offset,
                        y_offset,
                    ) {
                        t.recorder.note_scroll(x_offset, y_offset);
                    }
                    let context: &HostContext = t.context;
                    t.plugins
                        .with_active(|plugin| plugin.mouse_scroll(context, x_offset, y_offset));
                }
            }
            PlatformEvent::ModifiersChanged(mods) => t.context.set_live_mods(mods),
            PlatformEvent::RefreshRequested => return DispatchOutcome::Refresh,
            PlatformEvent::CloseRequested => return DispatchOutcome::Close,
        }
        DispatchOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TraceConfig;
    use crate::testing::{self, FakeTarget, FixedFocus, InputEvent, RecordingCamera};
    use stagehand_core::input::{Key, Mods, MouseButton, MouseButtonAction};
    use stagehand_core::{CameraControlMode, SharedCamera};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        context: HostContext,
        plugins: PluginManager,
        camera: CameraControlStateMachine,
        recorder: Recorder,
        commands: VecDeque<HostCommand>,
        dispatcher: InputDispatcher,
    }

    impl Fixture {
        fn new() -> Self {
            let mut context = HostContext::new((100, 100), (200, 200));
            let mut plugins = PluginManager::new(testing::input_catalog(), Vec::new(), 0);
            plugins.render_tick(&mut context, &mut FakeTarget::new(200, 200));
            testing::take_input_log();
            Self {
                context,
                plugins,
                camera: CameraControlStateMachine::new(),
                recorder: Recorder::new(&TraceConfig::default()),
                commands: VecDeque::new(),
                dispatcher: InputDispatcher::default(),
            }
        }

        fn send(&mut self, event: PlatformEvent, ui: &dyn UiFocus) -> DispatchOutcome {
            let mut targets = DispatchTargets {
                context: &mut self.context,
                plugins: &mut self.plugins,
                camera: &mut self.camera,
                recorder: &mut self.recorder,
                ui,
                commands: &mut self.commands,
            };
            self.dispatcher.dispatch(event, &mut targets)
        }
    }

    #[test]
    fn pointer_is_scaled_to_framebuffer_space() {
        let mut fx = Fixture::new();
        fx.send(PlatformEvent::MouseMoved { x: 10.0, y: 20.0 }, &FixedFocus::NONE);
        assert_eq!(fx.context.mouse_position(), (20.0, 40.0));
        assert_eq!(testing::take_input_log(), vec![InputEvent::MouseMove(20.0, 40.0)]);
    }

    #[test]
    fn ui_focus_withholds_input_but_not_resize() {
        let mut fx = Fixture::new();
        let ui = FixedFocus::ALL;
        fx.send(
            PlatformEvent::Key {
                key: Key::A,
                action: KeyAction::Press,
                mods: Mods::NONE,
            },
            &ui,
        );
        fx.send(PlatformEvent::Char { codepoint: 'a' }, &ui);
        fx.send(
            PlatformEvent::MouseButton {
                button: MouseButton::Left,
                action: MouseButtonAction::Press,
                mods: Mods::NONE,
            },
            &ui,
        );
        fx.send(PlatformEvent::MouseMoved { x: 1.0, y: 1.0 }, &ui);
        fx.send(PlatformEvent::MouseScrolled { x_offset: 0.0, y_offset: 1.0 }, &ui);
        fx.send(PlatformEvent::FramebufferResized { width: 300, height: 150 }, &ui);

        assert_eq!(testing::take_input_log(), vec![InputEvent::Resize(300, 150)]);
        assert_eq!(fx.context.framebuffer_size(), (300, 150));
        assert!(fx.context.is_key_pressed(Key::A));
    }

    #[test]
    fn key_mods_are_fixed_up_before_forwarding() {
        let mut fx = Fixture::new();
        fx.send(
            PlatformEvent::Key {
                key: Key::LeftShift,
                action: KeyAction::Press,
                mods: Mods::NONE,
            },
            &FixedFocus::NONE,
        );
        assert_eq!(
            testing::take_input_log(),
            vec![InputEvent::Key(Key::LeftShift, KeyAction::Press, Mods::SHIFT)]
        );
        assert_eq!(fx.context.live_mods(), Mods::SHIFT);
    }

    #[test]
    fn hotkeys_become_commands_and_are_not_forwarded() {
        let mut fx = Fixture::new();
        for action in [KeyAction::Press, KeyAction::Release] {
            fx.send(
                PlatformEvent::Key {
                    key: Key::F5,
                    action,
                    mods: Mods::NONE,
                },
                &FixedFocus::NONE,
            );
        }
        assert_eq!(fx.commands, [HostCommand::ToggleRecording]);
        assert!(testing::take_input_log().is_empty());
    }

    #[test]
    fn drag_uses_previous_pointer_position_and_is_recorded() {
        let mut fx = Fixture::new();
        let camera = Rc::new(RefCell::new(RecordingCamera::default()));
        let shared: SharedCamera = camera.clone();
        fx.context.register_camera(&shared);
        fx.recorder.start_recording();

        fx.send(PlatformEvent::MouseMoved { x: 0.0, y: 0.0 }, &FixedFocus::NONE);
        fx.send(
            PlatformEvent::MouseButton {
                button: MouseButton::Left,
                action: MouseButtonAction::Press,
                mods: Mods::NONE,
            },
            &FixedFocus::NONE,
        );
        fx.send(PlatformEvent::MouseMoved { x: 50.0, y: 50.0 }, &FixedFocus::NONE);
        fx.recorder.capture_tick(fx.context.gaze());

        assert_eq!(
            camera.borrow().moves,
            vec![(CameraControlMode::Left, -1.0, 1.0, 0.0, 0.0)]
        );
        let entry = fx.recorder.entries()[0];
        assert_eq!(entry.mode, CameraControlMode::Left);
        assert_eq!((entry.new_x, entry.new_y), (0.0, 0.0));
    }

    #[test]
    fn scroll_with_live_modifier_skips_camera_but_reaches_plugin() {
        let mut fx = Fixture::new();
        let camera = Rc::new(RefCell::new(RecordingCamera::default()));
        let shared: SharedCamera = camera.clone();
        fx.context.register_camera(&shared);

        fx.send(PlatformEvent::ModifiersChanged(Mods::ALT), &FixedFocus::NONE);
        fx.send(PlatformEvent::MouseScrolled { x_offset: 0.0, y_offset: 2.0 }, &FixedFocus::NONE);
        assert!(camera.borrow().scrolls.is_empty());
        assert_eq!(testing::take_input_log(), vec![InputEvent::Scroll(0.0, 2.0)]);
    }

    #[test]
    fn refresh_and_close_are_reported() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.send(PlatformEvent::RefreshRequested, &FixedFocus::NONE),
            DispatchOutcome::Refresh
        );
        assert_eq!(
            fx.send(PlatformEvent::CloseRequested, &FixedFocus::NONE),
            DispatchOutcome::Close
        );
    }
}
