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

//! PNG encoding of captured frames through the `image` crate.

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use stagehand_core::platform::{FrameCapture, ScreenshotWriter};
use stagehand_core::GraphicsError;

/// Writes captures as RGBA PNG files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngWriter;

impl ScreenshotWriter for PngWriter {
    fn write_png(&mut self, path: &Path, capture: &FrameCapture) -> Result<(), GraphicsError> {
        let encode_error = |reason: String| GraphicsError::Encode {
            path: path.to_path_buf(),
            reason,
        };
        let image = RgbaImage::from_raw(capture.width, capture.height, capture.rgba.clone())
            .ok_or_else(|| {
                encode_error(format!(
                    "{} bytes do not cover a {}x{} RGBA image",
                    capture.rgba.len(),
                    capture.width,
                    capture.height
                ))
            })?;
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| encode_error(e.to_string()))
    }
}
