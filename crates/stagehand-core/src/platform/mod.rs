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

//! Provides abstractions over platform-specific functionalities.
//!
//! This module contains the traits the host consumes from its external
//! collaborators: the window (with its event source), the graphics context the
//! plugins draw into, the image encoder used for screenshots and the UI layer
//! that may claim input focus.

pub mod graphics;
pub mod ui;
pub mod window;

pub use graphics::{Color, FrameCapture, FrameTarget, GraphicsContext, ScreenshotWriter};
pub use ui::{NoUi, UiFocus};
pub use window::{HostWindow, PlatformEvent};
