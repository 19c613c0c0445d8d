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

//! Rendering plugins and their static registry.
//!
//! Plugins are trusted, linked-in code. Each plugin crate submits a
//! [`PluginDescriptor`] with [`register_plugin!`](crate::register_plugin);
//! the host enumerates them through a [`PluginCatalog`] built once at
//! startup and never mutated afterwards.

use crate::context::PluginHost;
use crate::error::PluginError;
use crate::input::{Key, KeyAction, Mods, MouseButton, MouseButtonAction};
use crate::platform::FrameTarget;

/// A self-contained rendering module selectable at runtime.
///
/// Only [`render`](Self::render) is mandatory; input callbacks default to
/// no-ops.
pub trait RenderPlugin {
    /// Called with the real framebuffer size before the first `render` and
    /// after every framebuffer resize.
    fn resize(&mut self, host: &dyn PluginHost, width: u32, height: u32) {
        let _ = (host, width, height);
    }

    /// Draws one frame into `target`.
    fn render(&mut self, host: &dyn PluginHost, target: &mut dyn FrameTarget);

    /// A keyboard key changed state.
    fn keyboard(&mut self, host: &dyn PluginHost, key: Key, action: KeyAction, mods: Mods) {
        let _ = (host, key, action, mods);
    }

    /// A character was typed.
    fn char_input(&mut self, host: &dyn PluginHost, codepoint: char) {
        let _ = (host, codepoint);
    }

    /// A mouse button changed state.
    fn mouse_button(
        &mut self,
        host: &dyn PluginHost,
        button: MouseButton,
        action: MouseButtonAction,
        mods: Mods,
    ) {
        let _ = (host, button, action, mods);
    }

    /// The pointer moved, in framebuffer space.
    fn mouse_move(&mut self, host: &dyn PluginHost, x: f64, y: f64) {
        let _ = (host, x, y);
    }

    /// The wheel scrolled.
    fn mouse_scroll(&mut self, host: &dyn PluginHost, x_offset: f64, y_offset: f64) {
        let _ = (host, x_offset, y_offset);
    }
}

/// Constructs a plugin instance against the host capability set.
pub type PluginFactory = fn(&dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError>;

/// Registry entry describing one plugin.
#[derive(Debug, Clone, Copy)]
pub struct PluginDescriptor {
    name: &'static str,
    priority: i32,
    path: &'static str,
    factory: PluginFactory,
}

impl PluginDescriptor {
    /// Creates a descriptor. `path` names the plugin's resource directory,
    /// relative to the host's resource roots.
    pub const fn new(
        name: &'static str,
        priority: i32,
        path: &'static str,
        factory: PluginFactory,
    ) -> Self {
        Self {
            name,
            priority,
            path,
            factory,
        }
    }

    /// The unique display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sort key; lower comes first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The resource directory name.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Builds a new instance.
    pub fn create(&self, host: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
        (self.factory)(host)
    }
}

inventory::collect!(PluginDescriptor);

/// Registers a plugin type with the static registry.
///
/// ```ignore
/// register_plugin!(ExamplePlugin, priority = 10, path = "exampleplugin", ExamplePlugin::create);
/// ```
#[macro_export]
macro_rules! register_plugin {
    ($name:ident, priority = $priority:expr, path = $path:expr, $factory:expr) => {
        $crate::inventory::submit! {
            $crate::plugin::PluginDescriptor::new(stringify!($name), $priority, $path, $factory)
        }
    };
}

/// Read-only, ordered view of the available plugins.
#[derive(Debug, Clone, Default)]
pub struct PluginCatalog {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginCatalog {
    /// Collects every descriptor submitted to the static registry.
    ///
    /// Link order is not stable, so ties in priority are broken by name.
    pub fn from_registry() -> Self {
        let mut descriptors: Vec<PluginDescriptor> =
            inventory::iter::<PluginDescriptor>.into_iter().copied().collect();
        descriptors.sort_by(|a, b| a.name.cmp(b.name));
        Self::from_descriptors(descriptors)
    }

    /// Builds a catalog from explicit descriptors, ordered by ascending
    /// priority and then by the given order.
    pub fn from_descriptors(mut descriptors: Vec<PluginDescriptor>) -> Self {
        descriptors.sort_by_key(|d| d.priority);
        Self { descriptors }
    }

    /// Returns `true` if no plugin is available.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns the descriptor at `index`.
    pub fn get(&self, index: usize) -> Option<&PluginDescriptor> {
        self.descriptors.get(index)
    }

    /// Iterates descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the index of the plugin called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.name == name)
    }
}
