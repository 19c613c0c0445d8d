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

//! Demo plugins linked into the Stagehand host.
//!
//! Every plugin registers itself with the static registry at link time; the
//! host discovers them through [`PluginCatalog::from_registry`].
//!
//! [`PluginCatalog::from_registry`]: stagehand_core::PluginCatalog::from_registry

pub mod example;
pub mod orbit;

pub use example::ExamplePlugin;
pub use orbit::{OrbitCamera, OrbitPlugin};

/// Forces this crate to be linked so its registrations are visible.
///
/// Binaries that never name a plugin type must call this once.
#[inline(never)]
pub fn ensure_linked() {
    log::trace!("stagehand-plugins linked");
}

#[cfg(test)]
mod tests {
    use stagehand_core::PluginCatalog;

    #[test]
    fn plugins_are_registered_in_priority_order() {
        let catalog = PluginCatalog::from_registry();
        let names: Vec<_> = catalog.iter().map(|d| d.name()).collect();
        let example = names.iter().position(|&n| n == "ExamplePlugin");
        let orbit = names.iter().position(|&n| n == "OrbitPlugin");
        assert!(example.is_some() && orbit.is_some());
        assert!(example < orbit);
        assert_eq!(catalog.get(catalog.position("OrbitPlugin").unwrap()).unwrap().path(), "orbitplugin");
    }
}
