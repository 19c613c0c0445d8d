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

use std::time::{Duration, Instant};

/// Rolling frame-rate counter.
///
/// Frames are counted between reports; a report is produced at most once per
/// [`FrameClock::REPORT_INTERVAL`].
#[derive(Debug, Clone)]
pub struct FrameClock {
    window_start: Instant,
    frames: u32,
    fps: f64,
}

impl FrameClock {
    /// Minimum time between two rate reports.
    pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates a clock whose first window starts now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose first window starts at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Counts one frame. Returns the new rate once a full interval elapsed.
    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    /// Counts one frame finishing at `now`.
    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Self::REPORT_INTERVAL {
            return None;
        }
        self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    /// The last reported rate.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Formats the last reported rate for display.
    pub fn fps_string(&self) -> String {
        format!("{:.1} fps", self.fps)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
