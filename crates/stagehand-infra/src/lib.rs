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

//! # Stagehand Infra
//!
//! Concrete backends for the contracts defined in `stagehand-core`: a
//! `winit` window driven by an explicit poll step, a `wgpu` graphics
//! context with framebuffer readback, a PNG screenshot writer and, behind the
//! `sampler` feature, a `sysinfo` sampler service.

pub mod graphics;
pub mod platform;
pub mod screenshot;
#[cfg(feature = "sampler")]
pub mod telemetry;

pub use graphics::wgpu::WgpuGraphicsContext;
pub use platform::lease::PlatformLease;
pub use platform::window::{WindowSettings, WinitWindow};
pub use screenshot::PngWriter;
#[cfg(feature = "sampler")]
pub use telemetry::SysinfoSampler;
