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

//! Graphics context contract.
//!
//! The context is the single mutable resource shared by every plugin. The host
//! brackets each frame with [`GraphicsContext::begin_frame`] and
//! [`GraphicsContext::end_frame`]; plugins only see the [`FrameTarget`] in
//! between.

use std::path::Path;

use crate::error::GraphicsError;

/// An RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Creates an opaque colour.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Colour contents of the framebuffer read back after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCapture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    pub rgba: Vec<u8>,
}

/// The surface a plugin draws into during `render`.
pub trait FrameTarget {
    /// Returns the drawable size in pixels.
    fn size(&self) -> (u32, u32);

    /// Clears the whole target to `color`.
    fn clear(&mut self, color: Color);
}

/// A native graphics context bound to the host window.
pub trait GraphicsContext {
    /// Adapts the drawable surface to a new framebuffer size.
    fn resize(&mut self, width: u32, height: u32);

    /// Starts a new frame. Must be paired with [`end_frame`](Self::end_frame).
    fn begin_frame(&mut self) -> Result<(), GraphicsError>;

    /// Returns the target of the frame in progress.
    fn target(&mut self) -> &mut dyn FrameTarget;

    /// Submits the work recorded for the current frame.
    fn end_frame(&mut self) -> Result<(), GraphicsError>;

    /// Reads the colour contents of the submitted, not yet presented frame.
    fn read_pixels(&mut self) -> Result<FrameCapture, GraphicsError>;

    /// Presents the submitted frame.
    fn present(&mut self);
}

/// Encodes captured frames to image files.
pub trait ScreenshotWriter {
    /// Writes `capture` as a PNG file at `path`.
    fn write_png(&mut self, path: &Path, capture: &FrameCapture) -> Result<(), GraphicsError>;
}
