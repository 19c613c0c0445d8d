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

/// Focus signal exposed by an immediate-mode UI layered over the plugin.
///
/// The host queries it once per event. While the UI claims a class of input,
/// those events are never forwarded to the plugin.
pub trait UiFocus {
    /// The UI consumes keyboard events.
    fn wants_keyboard(&self) -> bool;

    /// The UI consumes text input.
    fn wants_text_input(&self) -> bool;

    /// The UI consumes pointer events.
    fn wants_pointer(&self) -> bool;
}

/// A UI layer that never claims focus.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUi;

impl UiFocus for NoUi {
    fn wants_keyboard(&self) -> bool {
        false
    }

    fn wants_text_input(&self) -> bool {
        false
    }

    fn wants_pointer(&self) -> bool {
        false
    }
}
