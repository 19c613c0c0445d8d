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

//! Translation from `winit` window events to the host's [`PlatformEvent`]s.
//!
//! Positions reported in physical pixels are converted to window units here;
//! the host scales them back to framebuffer space itself.

use stagehand_core::input::{Key, KeyAction, Mods, MouseButton, MouseButtonAction};
use stagehand_core::platform::PlatformEvent;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Stateful translator for the events of one window.
#[derive(Debug, Clone)]
pub struct EventTranslator {
    scale_factor: f64,
    mods: Mods,
}

impl EventTranslator {
    /// Creates a translator for a window with the given scale factor.
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            mods: Mods::NONE,
        }
    }

    /// Current display scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Last modifier state reported by the platform.
    pub fn mods(&self) -> Mods {
        self.mods
    }

    /// Translates `event` and appends the result to `out`.
    ///
    /// One native event may yield zero, one or several host events.
    pub fn translate_into(&mut self, event: &WindowEvent, out: &mut Vec<PlatformEvent>) {
        match event {
            WindowEvent::Resized(size) => {
                let logical = size.to_logical::<u32>(self.scale_factor);
                out.push(PlatformEvent::WindowResized {
                    width: logical.width,
                    height: logical.height,
                });
                out.push(PlatformEvent::FramebufferResized {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.mods = map_modifiers(modifiers.state());
                out.push(PlatformEvent::ModifiersChanged(self.mods));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => map_key(code),
                    PhysicalKey::Unidentified(_) => Key::Unknown,
                };
                let action = map_key_action(event.state, event.repeat);
                out.push(PlatformEvent::Key {
                    key,
                    action,
                    mods: self.mods,
                });
                if event.state == ElementState::Pressed {
                    if let Some(text) = &event.text {
                        out.extend(
                            text.chars()
                                .filter(|c| !c.is_control())
                                .map(|codepoint| PlatformEvent::Char { codepoint }),
                        );
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                out.push(PlatformEvent::MouseButton {
                    button: map_mouse_button(*button),
                    action: match state {
                        ElementState::Pressed => MouseButtonAction::Press,
                        ElementState::Released => MouseButtonAction::Release,
                    },
                    mods: self.mods,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(self.scale_factor);
                out.push(PlatformEvent::MouseMoved {
                    x: logical.x,
                    y: logical.y,
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (x_offset, y_offset) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (f64::from(*x), f64::from(*y)),
                    MouseScrollDelta::PixelDelta(pos) => (pos.x, pos.y),
                };
                if x_offset != 0.0 || y_offset != 0.0 {
                    out.push(PlatformEvent::MouseScrolled { x_offset, y_offset });
                }
            }
            WindowEvent::RedrawRequested => out.push(PlatformEvent::RefreshRequested),
            WindowEvent::CloseRequested => out.push(PlatformEvent::CloseRequested),
            _ => {}
        }
    }
}

fn map_key_action(state: ElementState, repeat: bool) -> KeyAction {
    match (state, repeat) {
        (ElementState::Released, _) => KeyAction::Release,
        (ElementState::Pressed, true) => KeyAction::Repeat,
        (ElementState::Pressed, false) => KeyAction::Press,
    }
}

/// Maps a `winit` modifier state to [`Mods`].
pub fn map_modifiers(state: ModifiersState) -> Mods {
    let mut mods = Mods::NONE;
    mods.set(Mods::SHIFT, state.shift_key());
    mods.set(Mods::CONTROL, state.control_key());
    mods.set(Mods::ALT, state.alt_key());
    mods.set(Mods::SUPER, state.super_key());
    mods
}

/// Maps a `winit` mouse button to [`MouseButton`].
pub fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

/// Maps a physical key code to [`Key`]; unsupported codes become
/// [`Key::Unknown`].
pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::ControlRight => Key::RightControl,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperLeft => Key::LeftSuper,
        KeyCode::SuperRight => Key::RightSuper,
        _ => Key::Unknown,
    }
}
