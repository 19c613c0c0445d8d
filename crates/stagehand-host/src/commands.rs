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

//! Host controls, issued by hotkeys or by an embedding UI.

use std::collections::HashMap;
use std::path::PathBuf;

use stagehand_core::input::Key;

/// A request to change host state, applied at the start of the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Select the plugin at this catalog index.
    SelectPlugin(usize),
    /// Select the next plugin, wrapping around.
    NextPlugin,
    /// Select the previous plugin, wrapping around.
    PreviousPlugin,
    /// Start or stop recording an interaction trace.
    ToggleRecording,
    /// Arm or disarm replay of the trace on disk.
    ToggleReplay,
    /// Publish the recorded gaze stream to plugins during replay.
    ToggleGazeReplay,
    /// Enable or disable the benchmark frame cap.
    ToggleFrameCap,
    /// Set the frame cap budget in milliseconds.
    SetFrameCap(u32),
    /// Set the number of frames rendered by a benchmark without replay.
    SetFrameCount(u32),
    /// Set the benchmark output table path.
    SetOutputPath(PathBuf),
    /// Set the camera trace path.
    SetCameraTracePath(PathBuf),
    /// Set the gaze trace path.
    SetGazeTracePath(PathBuf),
    /// Resize the window.
    SetWindowSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Run a benchmark.
    StartBenchmark,
    /// Close the window.
    Quit,
}

/// Key bindings for host commands.
///
/// Presses of a bound key are consumed by the host and never reach the
/// plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct HotkeyMap {
    bindings: HashMap<Key, HostCommand>,
}

impl HotkeyMap {
    /// Creates a map without bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Binds `key` to `command`, replacing any previous binding.
    pub fn bind(&mut self, key: Key, command: HostCommand) -> &mut Self {
        self.bindings.insert(key, command);
        self
    }

    /// Removes the binding of `key`.
    pub fn unbind(&mut self, key: Key) {
        self.bindings.remove(&key);
    }

    /// Returns the command bound to `key`.
    pub fn command_for(&self, key: Key) -> Option<&HostCommand> {
        self.bindings.get(&key)
    }
}

impl Default for HotkeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Key::F1, HostCommand::NextPlugin)
            .bind(Key::F2, HostCommand::PreviousPlugin)
            .bind(Key::F5, HostCommand::ToggleRecording)
            .bind(Key::F6, HostCommand::ToggleReplay)
            .bind(Key::F7, HostCommand::ToggleGazeReplay)
            .bind(Key::F8, HostCommand::ToggleFrameCap)
            .bind(Key::F9, HostCommand::StartBenchmark);
        map
    }
}
