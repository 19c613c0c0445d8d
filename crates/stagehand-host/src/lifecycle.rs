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

//! Ownership and hot-swapping of the active plugin.
//!
//! Exactly one plugin instance is alive at a time. A selection change only
//! marks the swap; it happens at the start of the next render tick, where the
//! old instance is dropped before the new one is constructed.

use std::path::PathBuf;

use stagehand_core::platform::{Color, FrameTarget};
use stagehand_core::{PluginCatalog, PluginDescriptor, RenderPlugin, ResourcePathError};

use crate::context::HostContext;

/// Background the target is cleared to before the plugin draws.
const CLEAR_COLOR: Color = Color::BLACK;

/// Finds the resource directory of `descriptor` under `roots`.
///
/// Roots are probed in order; the first existing directory wins.
pub fn find_resources_path(
    roots: &[PathBuf],
    descriptor: &PluginDescriptor,
) -> Result<PathBuf, ResourcePathError> {
    let searched: Vec<PathBuf> = roots.iter().map(|root| root.join(descriptor.path())).collect();
    searched
        .iter()
        .find(|candidate| candidate.is_dir())
        .cloned()
        .ok_or_else(|| ResourcePathError::NotFound {
            plugin: descriptor.name().to_owned(),
            searched,
        })
}

/// Owns the active plugin instance.
pub struct PluginManager {
    catalog: PluginCatalog,
    resource_roots: Vec<PathBuf>,
    selected: usize,
    loaded: Option<usize>,
    instance: Option<Box<dyn RenderPlugin>>,
}

impl PluginManager {
    /// Creates a manager that selects `initial` on its first tick.
    pub fn new(catalog: PluginCatalog, resource_roots: Vec<PathBuf>, initial: usize) -> Self {
        Self {
            catalog,
            resource_roots,
            selected: initial,
            loaded: None,
            instance: None,
        }
    }

    /// The available plugins.
    pub fn catalog(&self) -> &PluginCatalog {
        &self.catalog
    }

    /// Index of the pending selection.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Index of the plugin loaded last, whether or not it constructed.
    pub fn loaded(&self) -> Option<usize> {
        self.loaded
    }

    /// Name of the loaded plugin.
    pub fn active_name(&self) -> Option<&'static str> {
        self.instance
            .as_ref()
            .and(self.loaded)
            .and_then(|index| self.catalog.get(index))
            .map(PluginDescriptor::name)
    }

    /// Marks `index` for loading on the next tick. Out-of-range indices are
    /// ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.catalog.len() {
            log::warn!("Ignoring selection of plugin #{index}: only {} available.", self.catalog.len());
            return false;
        }
        self.selected = index;
        true
    }

    /// Selects the next plugin, wrapping around.
    pub fn select_next(&mut self) {
        if !self.catalog.is_empty() {
            self.selected = (self.selected + 1) % self.catalog.len();
        }
    }

    /// Selects the previous plugin, wrapping around.
    pub fn select_previous(&mut self) {
        if !self.catalog.is_empty() {
            let len = self.catalog.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Runs `f` against the active instance, if any.
    pub fn with_active(&mut self, f: impl FnOnce(&mut dyn RenderPlugin)) {
        if let Some(plugin) = self.instance.as_deref_mut() {
            f(plugin);
        }
    }

    /// Whether a plugin instance is alive.
    pub fn has_active(&self) -> bool {
        self.instance.is_some()
    }

    /// Forwards a framebuffer resize to the active instance.
    pub fn resize(&mut self, context: &HostContext, width: u32, height: u32) {
        self.with_active(|plugin| plugin.resize(context, width, height));
    }

    /// Performs a pending swap, then renders the active instance.
    pub fn render_tick(&mut self, context: &mut HostContext, target: &mut dyn FrameTarget) {
        if self.loaded != Some(self.selected) {
            self.swap(context);
        }
        target.clear(CLEAR_COLOR);
        let context: &HostContext = context;
        self.with_active(|plugin| plugin.render(context, target));
    }

    fn swap(&mut self, context: &mut HostContext) {
        let previous = self.active_name();
        self.unload(context);
        self.loaded = Some(self.selected);

        let Some(descriptor) = self.catalog.get(self.selected).copied() else {
            return;
        };
        log::info!(
            "Switching plugin: {} -> {}",
            previous.unwrap_or("<none>"),
            descriptor.name()
        );

        let resources = find_resources_path(&self.resource_roots, &descriptor);
        if let Err(err) = &resources {
            log::debug!("{err}");
        }
        context.set_resources(resources);

        let context: &HostContext = context;
        match descriptor.create(context) {
            Ok(mut plugin) => {
                let (width, height) = context.mapper().framebuffer_size();
                plugin.resize(context, width, height);
                self.instance = Some(plugin);
            }
            Err(err) => log::error!("Failed to load plugin '{}': {err}", descriptor.name()),
        }
    }

    /// Drops the active instance and forgets its camera.
    pub fn unload(&mut self, context: &HostContext) {
        if self.instance.take().is_some() {
            context.camera().remove();
        }
    }

    /// Resource directory probe roots.
    pub fn resource_roots(&self) -> &[PathBuf] {
        &self.resource_roots
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("plugins", &self.catalog.len())
            .field("selected", &self.selected)
            .field("loaded", &self.loaded)
            .field("active", &self.active_name())
            .finish()
    }
}
