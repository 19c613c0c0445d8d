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

use stagehand_core::platform::{Color, FrameTarget};

/// The frame target handed to plugins.
///
/// Drawing is recorded, not executed: the context encodes the clear when the
/// frame is ended.
#[derive(Debug, Clone, PartialEq)]
pub struct WgpuFrameTarget {
    size: (u32, u32),
    clear_color: Option<Color>,
}

impl WgpuFrameTarget {
    pub(crate) fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            clear_color: None,
        }
    }

    /// Starts recording a new frame of `size`.
    pub(crate) fn reset(&mut self, size: (u32, u32)) {
        self.size = size;
        self.clear_color = None;
    }

    /// The clear recorded for this frame, black if none was.
    pub fn clear_color(&self) -> Color {
        self.clear_color.unwrap_or(Color::BLACK)
    }
}

impl FrameTarget for WgpuFrameTarget {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = Some(color);
    }
}

pub(crate) fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_clear_wins_and_reset_forgets_it() {
        let mut target = WgpuFrameTarget::new((4, 4));
        assert_eq!(target.clear_color(), Color::BLACK);
        target.clear(Color::rgb(0.2, 0.2, 0.2));
        target.clear(Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(target.clear_color(), Color::rgb(1.0, 0.0, 0.0));

        target.reset((8, 2));
        assert_eq!(target.size(), (8, 2));
        assert_eq!(target.clear_color(), Color::BLACK);
    }
}
