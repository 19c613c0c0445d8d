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

//! sysinfo-based implementation of the [`SamplerService`] trait.
//!
//! Each logical CPU is exposed as one sensor reporting its utilisation in
//! percent. Sampling runs on a dedicated thread that wakes up every sampling
//! interval until it is told to stop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{RecvTimeoutError, Sender};
use stagehand_core::telemetry::{Sample, SampleConsumer, SamplerService, SensorDescriptor};
use stagehand_core::SamplerError;
use sysinfo::System;

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// A sampler reporting per-CPU utilisation.
pub struct SysinfoSampler {
    sensors: Vec<SensorDescriptor>,
    interval: Duration,
    worker: Option<Worker>,
}

impl SysinfoSampler {
    /// Creates a sampler polling every `interval`.
    ///
    /// Returns `None` when the platform is unsupported or exposes no CPU,
    /// in which case benchmarks run unsampled.
    pub fn new(interval: Duration) -> Option<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            log::warn!("sysinfo does not support this platform; sampling disabled.");
            return None;
        }
        let mut system = System::new();
        system.refresh_cpu_all();
        let sensors: Vec<_> = system
            .cpus()
            .iter()
            .enumerate()
            .map(|(index, cpu)| {
                SensorDescriptor::new(cpu.name(), format!("CPU {index}"), cpu.brand())
            })
            .collect();
        if sensors.is_empty() {
            log::warn!("No CPU reported by sysinfo; sampling disabled.");
            return None;
        }
        log::info!("Sampler ready with {} CPU sensors.", sensors.len());
        Some(Self {
            sensors,
            interval,
            worker: None,
        })
    }

    /// The sampling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` while the sampling thread runs.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_micros() as u64)
}

fn sample_loop(
    sensors: Vec<SensorDescriptor>,
    interval: Duration,
    stop_rx: crossbeam_channel::Receiver<()>,
    consumer: Arc<dyn SampleConsumer>,
) {
    let mut system = System::new();
    system.refresh_cpu_all();
    let mut batch = Vec::with_capacity(sensors.len());
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        system.refresh_cpu_usage();
        let timestamp = now_micros();
        batch.clear();
        batch.extend(
            system
                .cpus()
                .iter()
                .take(sensors.len())
                .enumerate()
                .map(|(source, cpu)| Sample {
                    source,
                    timestamp,
                    value: cpu.cpu_usage(),
                }),
        );
        consumer.consume(&batch, &sensors);
    }
    log::debug!("Sampler thread finished.");
}

impl SamplerService for SysinfoSampler {
    fn sensors(&self) -> &[SensorDescriptor] {
        &self.sensors
    }

    fn is_available(&self) -> bool {
        !self.sensors.is_empty()
    }

    fn start(&mut self, consumer: Arc<dyn SampleConsumer>) -> Result<(), SamplerError> {
        if self.worker.is_some() {
            return Err(SamplerError::AlreadyRunning);
        }
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let sensors = self.sensors.clone();
        let interval = self.interval;
        let handle = thread::Builder::new()
            .name("stagehand-sampler".to_owned())
            .spawn(move || sample_loop(sensors, interval, stop_rx, consumer))
            .map_err(|e| SamplerError::Backend(e.to_string()))?;
        self.worker = Some(Worker { stop_tx, handle });
        log::info!("Sampler started ({} ms interval).", self.interval.as_millis());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SamplerError> {
        let worker = self.worker.take().ok_or(SamplerError::NotRunning)?;
        let _ = worker.stop_tx.send(());
        worker
            .handle
            .join()
            .map_err(|_| SamplerError::Backend("sampler thread panicked".to_owned()))?;
        log::info!("Sampler stopped.");
        Ok(())
    }
}

impl Drop for SysinfoSampler {
    fn drop(&mut self) {
        if self.worker.is_some() {
            if let Err(err) = self.stop() {
                log::warn!("Failed to stop the sampler on drop: {err}");
            }
        }
    }
}
