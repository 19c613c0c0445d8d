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

//! Stagehand host binary.
//!
//! Usage: `stagehand [config.json]`. Without a configuration file every
//! setting keeps its default.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use stagehand_core::telemetry::SamplerService;
use stagehand_core::PluginCatalog;
use stagehand_host::{Host, HostConfig};
use stagehand_infra::{PngWriter, WgpuGraphicsContext, WindowSettings, WinitWindow};

fn load_config(path: Option<&Path>) -> Result<HostConfig> {
    let Some(path) = path else {
        return Ok(HostConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(feature = "sampler")]
fn sampler(config: &HostConfig) -> Option<Box<dyn SamplerService>> {
    let interval = std::time::Duration::from_millis(u64::from(config.benchmark.sample_interval_ms.max(1)));
    stagehand_infra::SysinfoSampler::new(interval).map(|s| Box::new(s) as Box<dyn SamplerService>)
}

#[cfg(not(feature = "sampler"))]
fn sampler(_config: &HostConfig) -> Option<Box<dyn SamplerService>> {
    log::info!("Built without sampler support; benchmarks run unsampled.");
    None
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let config_path = std::env::args_os().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;

    stagehand_plugins::ensure_linked();
    let catalog = PluginCatalog::from_registry();

    let window = WinitWindow::open(&WindowSettings {
        title: config.window.title.clone(),
        width: config.window.width,
        height: config.window.height,
    })?;
    let graphics = WgpuGraphicsContext::new(window.handle())?;
    let sampler = sampler(&config);

    let mut host = Host::new(config, catalog, window, graphics, Box::new(PngWriter))?
        .with_sampler(sampler);
    host.run()?;
    Ok(())
}
