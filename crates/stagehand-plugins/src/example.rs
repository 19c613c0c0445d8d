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

//! A plugin that clears the screen to gray.

use stagehand_core::platform::{Color, FrameTarget};
use stagehand_core::{register_plugin, PluginError, PluginHost, RenderPlugin};

/// Clear colour of the example plugin.
pub const GRAY: Color = Color::rgb(0.2, 0.2, 0.2);

/// Gray screen.
#[derive(Debug, Default)]
pub struct ExamplePlugin;

impl ExamplePlugin {
    /// Plugin factory.
    pub fn create(_host: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
        Ok(Box::new(Self))
    }
}

impl RenderPlugin for ExamplePlugin {
    fn render(&mut self, _host: &dyn PluginHost, target: &mut dyn FrameTarget) {
        target.clear(GRAY);
    }
}

register_plugin!(ExamplePlugin, priority = 10, path = "exampleplugin", ExamplePlugin::create);
