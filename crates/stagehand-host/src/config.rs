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

//! Startup configuration of the host.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Initial window parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Base window title; the frame rate is appended at runtime.
    pub title: String,
    /// Requested width in window units.
    pub width: u32,
    /// Requested height in window units.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stagehand".to_owned(),
            width: 1280,
            height: 800,
        }
    }
}

/// Benchmark parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Frames rendered when no replay trace is loaded.
    pub frame_count: u32,
    /// Sampler period in milliseconds.
    pub sample_interval_ms: u32,
    /// Per-frame wall-clock budget when the frame cap is enabled.
    pub frame_cap_ms: u32,
    /// Whether the frame cap applies.
    pub use_frame_cap: bool,
    /// Destination of the sample table.
    pub output_path: PathBuf,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            frame_count: 100,
            sample_interval_ms: 10,
            frame_cap_ms: 30,
            use_frame_cap: false,
            output_path: PathBuf::from("./pwr.csv"),
        }
    }
}

/// Locations of the interaction trace files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Camera-control trace.
    pub camera_path: PathBuf,
    /// Gaze trace.
    pub gaze_path: PathBuf,
    /// Whether replays publish the recorded gaze stream to plugins.
    pub replay_gaze: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            camera_path: PathBuf::from("./cam.path"),
            gaze_path: PathBuf::from("./eye.path"),
            replay_gaze: false,
        }
    }
}

/// Everything the host needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Name of the plugin selected at startup. Unknown names select the first.
    pub default_plugin_name: String,
    /// Frame numbers at which a screenshot is taken.
    pub screenshot_frames: Vec<u32>,
    /// Screenshot file prefix; `screenshot` when empty.
    pub screenshot_filename: String,
    /// Close the window after the last scheduled screenshot.
    pub auto_quit: bool,
    /// Directories searched, in order, for plugin resource directories.
    pub resource_roots: Vec<PathBuf>,
    /// Initial window parameters.
    pub window: WindowConfig,
    /// Benchmark parameters.
    pub benchmark: BenchmarkConfig,
    /// Trace file locations.
    pub trace: TraceConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            default_plugin_name: String::new(),
            screenshot_frames: Vec::new(),
            screenshot_filename: String::new(),
            auto_quit: false,
            resource_roots: vec![PathBuf::from("resources")],
            window: WindowConfig::default(),
            benchmark: BenchmarkConfig::default(),
            trace: TraceConfig::default(),
        }
    }
}

impl HostConfig {
    /// Sorts and deduplicates the screenshot frames and drops frame numbers
    /// below 1.
    pub fn normalized(mut self) -> Self {
        self.screenshot_frames.retain(|&frame| frame >= 1);
        self.screenshot_frames.sort_unstable();
        self.screenshot_frames.dedup();
        self
    }

    /// Returns the screenshot prefix, falling back to `screenshot`.
    pub fn screenshot_prefix(&self) -> &str {
        if self.screenshot_filename.is_empty() {
            "screenshot"
        } else {
            &self.screenshot_filename
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_sorts_dedups_and_drops_zero() {
        let config = HostConfig {
            screenshot_frames: vec![5, 3, 0, 3, 1],
            ..Default::default()
        }
        .normalized();
        assert_eq!(config.screenshot_frames, vec![1, 3, 5]);
    }

    #[test]
    fn empty_filename_falls_back_to_screenshot() {
        let mut config = HostConfig::default();
        assert_eq!(config.screenshot_prefix(), "screenshot");
        config.screenshot_filename = "run".to_owned();
        assert_eq!(config.screenshot_prefix(), "run");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: HostConfig = serde_json::from_str(
            r#"{ "auto_quit": true, "benchmark": { "frame_count": 500 } }"#,
        )
        .unwrap();
        assert!(config.auto_quit);
        assert_eq!(config.benchmark.frame_count, 500);
        assert_eq!(config.benchmark.sample_interval_ms, 10);
        assert_eq!(config.trace.camera_path, PathBuf::from("./cam.path"));
        assert_eq!(config.window.width, 1280);
    }
}
