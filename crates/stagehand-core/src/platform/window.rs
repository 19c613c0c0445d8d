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

use crate::input::{Key, KeyAction, Mods, MouseButton, MouseButtonAction};

/// A normalized window-system event.
///
/// Backends translate their native events into this enum and hand them to the
/// host in batches from [`HostWindow::poll_events`]; nothing is delivered
/// through callbacks outside the host's tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    /// The window changed size, in window units.
    WindowResized {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// The drawable surface changed size, in pixels.
    FramebufferResized {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// A keyboard key changed state.
    Key {
        /// The key.
        key: Key,
        /// What happened to it.
        action: KeyAction,
        /// Modifiers as reported by the platform (not yet fixed up).
        mods: Mods,
    },
    /// A character was typed.
    Char {
        /// The Unicode scalar value.
        codepoint: char,
    },
    /// A mouse button changed state.
    MouseButton {
        /// The button.
        button: MouseButton,
        /// What happened to it.
        action: MouseButtonAction,
        /// Modifiers held at the time.
        mods: Mods,
    },
    /// The pointer moved, in window units.
    MouseMoved {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// The wheel or touchpad scrolled.
    MouseScrolled {
        /// Horizontal offset.
        x_offset: f64,
        /// Vertical offset.
        y_offset: f64,
    },
    /// The live modifier state changed without a key event.
    ModifiersChanged(Mods),
    /// The window contents were damaged and must be redrawn.
    RefreshRequested,
    /// The user asked to close the window.
    CloseRequested,
}

/// A trait that abstracts the native window owned by the host.
///
/// Any windowing backend (winit, SDL2, GLFW, ...) can implement this trait to
/// host Stagehand plugins.
pub trait HostWindow {
    /// Processes pending native events without blocking and returns them.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Returns the window size in window units.
    fn window_size(&self) -> (u32, u32);

    /// Returns the drawable surface size in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Replaces the window title.
    fn set_title(&mut self, title: &str);

    /// Asks the window system to resize the window.
    fn request_size(&mut self, width: u32, height: u32);

    /// Returns `true` once the window was asked to close.
    fn should_close(&self) -> bool;

    /// Flags the window for closing at the end of the current tick.
    fn set_should_close(&mut self);
}
