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

//! Conversions between window space, framebuffer space and normalized device
//! coordinates.
//!
//! Plugins work exclusively in framebuffer pixels. Window systems report the
//! pointer in window units, which differ from framebuffer pixels under DPI
//! scaling, so every pointer position passes through [`CoordinateMapper`].

/// Maps pointer positions between the coordinate systems the host deals with.
///
/// The mapper only holds the latest window and framebuffer sizes. All
/// conversions are pure functions of those two sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinateMapper {
    window_size: (u32, u32),
    framebuffer_size: (u32, u32),
}

impl CoordinateMapper {
    /// Creates a mapper for the given window and framebuffer sizes.
    pub fn new(window_size: (u32, u32), framebuffer_size: (u32, u32)) -> Self {
        Self {
            window_size,
            framebuffer_size,
        }
    }

    /// Updates the cached window size (window units).
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Updates the cached framebuffer size (pixels).
    pub fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        self.framebuffer_size = (width, height);
    }

    /// Returns the cached window size.
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Returns the cached framebuffer size.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer_size
    }

    /// Scales a window-space position into framebuffer space.
    ///
    /// An axis whose window extent is zero is passed through unscaled until a
    /// valid size is known.
    pub fn to_framebuffer_space(&self, window_x: f64, window_y: f64) -> (f64, f64) {
        (
            scale_axis(window_x, self.window_size.0, self.framebuffer_size.0),
            scale_axis(window_y, self.window_size.1, self.framebuffer_size.1),
        )
    }

    /// Maps a framebuffer position to normalized device coordinates.
    ///
    /// `[0, width]` maps to `[-1, 1]` left to right and `[0, height]` maps to
    /// `[1, -1]` top to bottom. A zero framebuffer extent yields `0.0` on that
    /// axis.
    pub fn to_normalized_device_coords(&self, fb_x: f64, fb_y: f64) -> (f64, f64) {
        let (width, height) = self.framebuffer_size;
        let ndc_x = if width == 0 {
            0.0
        } else {
            2.0 * fb_x / f64::from(width) - 1.0
        };
        let ndc_y = if height == 0 {
            0.0
        } else {
            1.0 - 2.0 * fb_y / f64::from(height)
        };
        (ndc_x, ndc_y)
    }
}

fn scale_axis(value: f64, window_extent: u32, framebuffer_extent: u32) -> f64 {
    if window_extent == 0 {
        return value;
    }
    value * f64::from(framebuffer_extent) / f64::from(window_extent)
}
