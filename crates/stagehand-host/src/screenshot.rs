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

use std::collections::VecDeque;
use std::path::PathBuf;

/// What the host must do after a frame was checked for screenshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotAction {
    /// Nothing scheduled for this frame.
    Skip,
    /// Capture the framebuffer to `path`; close the window afterwards if
    /// `quit` is set.
    Capture {
        /// Destination file.
        path: PathBuf,
        /// This was the last scheduled capture and auto-quit is enabled.
        quit: bool,
    },
}

/// Captures the framebuffer at pre-sorted frame numbers.
#[derive(Debug, Clone)]
pub struct ScreenshotScheduler {
    queue: VecDeque<u64>,
    prefix: String,
    auto_quit: bool,
}

impl ScreenshotScheduler {
    /// Creates a scheduler from an ascending, deduplicated list of frames
    /// (see [`HostConfig::normalized`](crate::config::HostConfig::normalized)).
    pub fn new(frames: &[u32], prefix: &str, auto_quit: bool) -> Self {
        Self {
            queue: frames.iter().map(|&f| u64::from(f)).collect(),
            prefix: prefix.to_owned(),
            auto_quit,
        }
    }

    /// Frames still scheduled.
    pub fn pending(&self) -> impl Iterator<Item = u64> + '_ {
        self.queue.iter().copied()
    }

    /// Checks `frame` against the queue, popping it on a match.
    pub fn on_frame(&mut self, frame: u64) -> ScreenshotAction {
        if self.queue.front() != Some(&frame) {
            return ScreenshotAction::Skip;
        }
        self.queue.pop_front();
        ScreenshotAction::Capture {
            path: self.filename(frame),
            quit: self.auto_quit && self.queue.is_empty(),
        }
    }

    /// File name for a capture at `frame`.
    pub fn filename(&self, frame: u64) -> PathBuf {
        PathBuf::from(format!("{}.{frame:05}.png", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostConfig;

    #[test]
    fn captures_exactly_at_scheduled_frames() {
        let config = HostConfig {
            screenshot_frames: vec![5, 3, 3, 1],
            auto_quit: true,
            ..Default::default()
        }
        .normalized();
        let mut scheduler = ScreenshotScheduler::new(
            &config.screenshot_frames,
            config.screenshot_prefix(),
            config.auto_quit,
        );
        assert_eq!(scheduler.pending().collect::<Vec<_>>(), vec![1, 3, 5]);

        let mut captured = Vec::new();
        let mut quits = 0;
        for frame in 1..=8 {
            if let ScreenshotAction::Capture { path, quit } = scheduler.on_frame(frame) {
                captured.push((frame, path));
                if quit {
                    assert_eq!(frame, 5);
                    quits += 1;
                }
            }
        }
        assert_eq!(quits, 1);
        assert_eq!(
            captured,
            vec![
                (1, PathBuf::from("screenshot.00001.png")),
                (3, PathBuf::from("screenshot.00003.png")),
                (5, PathBuf::from("screenshot.00005.png")),
            ]
        );
    }

    #[test]
    fn without_auto_quit_never_quits() {
        let mut scheduler = ScreenshotScheduler::new(&[2], "shot", false);
        assert_eq!(scheduler.on_frame(1), ScreenshotAction::Skip);
        assert_eq!(
            scheduler.on_frame(2),
            ScreenshotAction::Capture {
                path: PathBuf::from("shot.00002.png"),
                quit: false
            }
        );
    }
}
