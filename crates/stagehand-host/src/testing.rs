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

//! Fakes for the host's collaborators, shared by the unit tests.

use std::cell::RefCell;

use stagehand_core::input::{Key, KeyAction, Mods};
use stagehand_core::platform::{Color, FrameTarget, UiFocus};
use stagehand_core::{
    CameraControl, CameraControlMode, PluginCatalog, PluginDescriptor, PluginError, PluginHost,
    RenderPlugin,
};

/// Camera that logs every control call.
#[derive(Debug, Default)]
pub struct RecordingCamera {
    pub moves: Vec<(CameraControlMode, f64, f64, f64, f64)>,
    pub scrolls: Vec<(f64, f64)>,
}

impl CameraControl for RecordingCamera {
    fn mouse_move_control(&mut self, mode: CameraControlMode, ox: f64, oy: f64, nx: f64, ny: f64) {
        self.moves.push((mode, ox, oy, nx, ny));
    }

    fn mouse_scroll_control(&mut self, x_offset: f64, y_offset: f64) {
        self.scrolls.push((x_offset, y_offset));
    }
}

/// Frame target that counts clears.
#[derive(Debug)]
pub struct FakeTarget {
    pub width: u32,
    pub height: u32,
    pub clears: usize,
}

impl FakeTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clears: 0,
        }
    }
}

impl FrameTarget for FakeTarget {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, _color: Color) {
        self.clears += 1;
    }
}

/// UI focus with fixed answers.
#[derive(Debug, Clone, Copy)]
pub struct FixedFocus {
    pub keyboard: bool,
    pub text: bool,
    pub pointer: bool,
}

impl FixedFocus {
    pub const NONE: Self = Self {
        keyboard: false,
        text: false,
        pointer: false,
    };
    pub const ALL: Self = Self {
        keyboard: true,
        text: true,
        pointer: true,
    };
}

impl UiFocus for FixedFocus {
    fn wants_keyboard(&self) -> bool {
        self.keyboard
    }

    fn wants_text_input(&self) -> bool {
        self.text
    }

    fn wants_pointer(&self) -> bool {
        self.pointer
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Created(&'static str),
    Resized(&'static str, u32, u32),
    Rendered(&'static str),
    Dropped(&'static str),
}

thread_local! {
    static LIFECYCLE_LOG: RefCell<Vec<LifecycleEvent>> = const { RefCell::new(Vec::new()) };
    static INPUT_LOG: RefCell<Vec<InputEvent>> = const { RefCell::new(Vec::new()) };
}

pub fn take_lifecycle_log() -> Vec<LifecycleEvent> {
    LIFECYCLE_LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

fn log_lifecycle(event: LifecycleEvent) {
    LIFECYCLE_LOG.with(|log| log.borrow_mut().push(event));
}

struct LifecyclePlugin {
    name: &'static str,
}

impl LifecyclePlugin {
    fn boxed(name: &'static str) -> Box<dyn RenderPlugin> {
        log_lifecycle(LifecycleEvent::Created(name));
        Box::new(Self { name })
    }
}

impl RenderPlugin for LifecyclePlugin {
    fn resize(&mut self, _: &dyn PluginHost, width: u32, height: u32) {
        log_lifecycle(LifecycleEvent::Resized(self.name, width, height));
    }

    fn render(&mut self, _: &dyn PluginHost, _: &mut dyn FrameTarget) {
        log_lifecycle(LifecycleEvent::Rendered(self.name));
    }
}

impl Drop for LifecyclePlugin {
    fn drop(&mut self) {
        log_lifecycle(LifecycleEvent::Dropped(self.name));
    }
}

fn create_alpha(_: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
    Ok(LifecyclePlugin::boxed("alpha"))
}

fn create_beta(_: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
    Ok(LifecyclePlugin::boxed("beta"))
}

fn create_broken(_: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
    Err(PluginError::Creation {
        name: "broken".to_owned(),
        reason: "always fails".to_owned(),
    })
}

/// Two plugins that log their lifecycle: `alpha` then `beta`.
pub fn lifecycle_catalog() -> PluginCatalog {
    PluginCatalog::from_descriptors(vec![
        PluginDescriptor::new("alpha", 1, "alpha", create_alpha),
        PluginDescriptor::new("beta", 2, "beta", create_beta),
    ])
}

/// One plugin whose factory always fails.
pub fn failing_catalog() -> PluginCatalog {
    PluginCatalog::from_descriptors(vec![PluginDescriptor::new(
        "broken", 1, "broken", create_broken,
    )])
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Resize(u32, u32),
    Key(Key, KeyAction, Mods),
    Char(char),
    Button,
    MouseMove(f64, f64),
    Scroll(f64, f64),
}

pub fn take_input_log() -> Vec<InputEvent> {
    INPUT_LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

fn log_input(event: InputEvent) {
    INPUT_LOG.with(|log| log.borrow_mut().push(event));
}

struct InputPlugin;

impl RenderPlugin for InputPlugin {
    fn resize(&mut self, _: &dyn PluginHost, width: u32, height: u32) {
        log_input(InputEvent::Resize(width, height));
    }

    fn render(&mut self, _: &dyn PluginHost, _: &mut dyn FrameTarget) {}

    fn keyboard(&mut self, _: &dyn PluginHost, key: Key, action: KeyAction, mods: Mods) {
        log_input(InputEvent::Key(key, action, mods));
    }

    fn char_input(&mut self, _: &dyn PluginHost, codepoint: char) {
        log_input(InputEvent::Char(codepoint));
    }

    fn mouse_button(
        &mut self,
        _: &dyn PluginHost,
        _: stagehand_core::input::MouseButton,
        _: stagehand_core::input::MouseButtonAction,
        _: Mods,
    ) {
        log_input(InputEvent::Button);
    }

    fn mouse_move(&mut self, _: &dyn PluginHost, x: f64, y: f64) {
        log_input(InputEvent::MouseMove(x, y));
    }

    fn mouse_scroll(&mut self, _: &dyn PluginHost, x_offset: f64, y_offset: f64) {
        log_input(InputEvent::Scroll(x_offset, y_offset));
    }
}

fn create_input(_: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
    Ok(Box::new(InputPlugin))
}

/// One plugin that logs every input callback.
pub fn input_catalog() -> PluginCatalog {
    PluginCatalog::from_descriptors(vec![PluginDescriptor::new(
        "input", 1, "input", create_input,
    )])
}
