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

//! # Stagehand Core
//!
//! Foundational crate containing the traits, core types and interface
//! contracts shared by the Stagehand host, its backends and its plugins.

#![warn(missing_docs)]

pub mod camera;
pub mod context;
pub mod coords;
pub mod error;
pub mod input;
pub mod platform;
pub mod plugin;
pub mod telemetry;
pub mod utils;

#[doc(hidden)]
pub use inventory;

pub use camera::{CameraControl, CameraControlMode, CameraSlot, SharedCamera};
pub use context::{GazePoint, PluginHost};
pub use coords::CoordinateMapper;
pub use error::{GraphicsError, PluginError, ResourcePathError, SamplerError};
pub use plugin::{PluginCatalog, PluginDescriptor, RenderPlugin};
pub use utils::timer::Stopwatch;
