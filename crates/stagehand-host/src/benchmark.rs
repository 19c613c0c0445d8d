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

//! Benchmark bookkeeping: sample sink, buffer sizing and frame pacing.
//!
//! The frame loop itself lives in [`Host`](crate::Host) since every
//! iteration is a full host tick.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use stagehand_core::telemetry::{Sample, SampleConsumer, SensorDescriptor};

use crate::config::BenchmarkConfig;
use crate::error::BenchmarkError;

/// Frame time assumed when sizing sample buffers.
pub const ASSUMED_MS_PER_FRAME: u32 = 2;

/// Delimiter of the sample table.
pub const CSV_DELIMITER: char = ';';

/// Estimates how many samples each sensor produces over `frame_count`
/// frames.
pub fn expected_samples(frame_count: u32, sample_interval_ms: u32) -> usize {
    let total_ms = u64::from(frame_count) * u64::from(ASSUMED_MS_PER_FRAME);
    (total_ms / u64::from(sample_interval_ms.max(1))) as usize
}

/// Per-sensor `(timestamp, value)` series.
pub type SensorBuffers = Vec<Vec<(u64, f32)>>;

struct SinkState {
    writer: BufWriter<File>,
    buffers: SensorBuffers,
    write_error: Option<std::io::Error>,
}

/// Receives samples during a run: appends them to the output table and to
/// per-sensor buffers.
pub struct BenchmarkSink {
    path: PathBuf,
    reserved: usize,
    state: Mutex<SinkState>,
}

impl BenchmarkSink {
    /// Creates the output table at `path` and reserves `reserved` samples
    /// per sensor.
    pub fn create(path: &Path, sensor_count: usize, reserved: usize) -> Result<Self, BenchmarkError> {
        let output_error = |source| BenchmarkError::Output {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(output_error)?);
        writeln!(
            writer,
            "id{d}label{d}name{d}timestamp{d}value",
            d = CSV_DELIMITER
        )
        .map_err(output_error)?;
        let buffers = (0..sensor_count)
            .map(|_| Vec::with_capacity(reserved))
            .collect();
        Ok(Self {
            path: path.to_path_buf(),
            reserved,
            state: Mutex::new(SinkState {
                writer,
                buffers,
                write_error: None,
            }),
        })
    }

    /// Capacity reserved per sensor.
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Flushes the table and takes the per-sensor buffers.
    ///
    /// Must only be called after the sampler was stopped.
    pub fn finish(&self) -> Result<SensorBuffers, BenchmarkError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let output_error = |source| BenchmarkError::Output {
            path: self.path.clone(),
            source,
        };
        if let Some(err) = state.write_error.take() {
            return Err(output_error(err));
        }
        state.writer.flush().map_err(output_error)?;
        Ok(std::mem::take(&mut state.buffers))
    }
}

impl SampleConsumer for BenchmarkSink {
    fn consume(&self, samples: &[Sample], sensors: &[SensorDescriptor]) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let SinkState {
            writer,
            buffers,
            write_error,
        } = &mut *state;
        for sample in samples {
            if let Some(buffer) = buffers.get_mut(sample.source) {
                buffer.push((sample.timestamp, sample.value));
            }
            if write_error.is_some() {
                continue;
            }
            let Some(sensor) = sensors.get(sample.source) else {
                continue;
            };
            if let Err(err) = writeln!(
                writer,
                "{id}{d}{label}{d}{name}{d}{ts}{d}{value}",
                id = sensor.id,
                label = sensor.label,
                name = sensor.name,
                ts = sample.timestamp,
                value = sample.value,
                d = CSV_DELIMITER
            ) {
                *write_error = Some(err);
            }
        }
    }
}

impl std::fmt::Debug for BenchmarkSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkSink")
            .field("path", &self.path)
            .field("reserved", &self.reserved)
            .finish()
    }
}

/// Returns `true` if any buffer reached the reserved capacity.
pub fn exceeded_reservation(buffers: &SensorBuffers, reserved: usize) -> bool {
    buffers.iter().any(|buffer| buffer.len() >= reserved)
}

/// Sleeps until each iteration used its wall-clock budget.
///
/// Late iterations are not compensated.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    budget: Option<Duration>,
    iteration_start: Instant,
}

impl FramePacer {
    /// Creates a pacer. A zero or absent budget never sleeps.
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            budget: budget.filter(|b| !b.is_zero()),
            iteration_start: Instant::now(),
        }
    }

    /// The per-iteration budget.
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Blocks until the current iteration's budget is used, then starts the
    /// next iteration.
    pub fn wait(&mut self) {
        let Some(budget) = self.budget else {
            return;
        };
        let deadline = self.iteration_start + budget;
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        self.iteration_start = Instant::now();
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    /// Iterations rendered.
    pub frames: usize,
    /// Wall-clock duration of the frame loop.
    pub elapsed: Duration,
    /// Capacity reserved per sensor.
    pub reserved_samples: usize,
    /// Samples collected per sensor.
    pub samples_per_sensor: Vec<usize>,
    /// Whether any sensor reached the reserved capacity.
    pub exceeded_reservation: bool,
}

/// Benchmark parameters and trigger state.
#[derive(Debug, Clone)]
pub struct BenchmarkOrchestrator {
    config: BenchmarkConfig,
    requested: bool,
    running: bool,
    last_report: Option<BenchmarkReport>,
}

impl BenchmarkOrchestrator {
    /// Creates an idle orchestrator.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            config,
            requested: false,
            running: false,
            last_report: None,
        }
    }

    /// The current parameters.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Mutable access to the parameters.
    pub fn config_mut(&mut self) -> &mut BenchmarkConfig {
        &mut self.config
    }

    /// Asks for a run at the next tick.
    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Consumes a pending request.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Sample buffer capacity reserved per sensor for the next run.
    pub fn expected_samples(&self) -> usize {
        expected_samples(self.config.frame_count, self.config.sample_interval_ms)
    }

    /// Number of iterations: the replay length if one is armed, otherwise the
    /// configured frame count.
    pub fn iterations(&self, replay_len: Option<usize>) -> usize {
        replay_len.unwrap_or(self.config.frame_count as usize)
    }

    /// A pacer honoring the frame cap settings.
    pub fn pacer(&self) -> FramePacer {
        let budget = self
            .config
            .use_frame_cap
            .then(|| Duration::from_millis(u64::from(self.config.frame_cap_ms)));
        FramePacer::new(budget)
    }

    /// Records the report of the last successful run.
    pub(crate) fn set_report(&mut self, report: BenchmarkReport) {
        self.last_report = Some(report);
    }

    /// The report of the last successful run.
    pub fn last_report(&self) -> Option<&BenchmarkReport> {
        self.last_report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn expected_samples_assumes_two_ms_per_frame() {
        assert_eq!(expected_samples(100, 10), 20);
        assert_eq!(expected_samples(1, 10), 0);
        assert_eq!(expected_samples(100, 0), 200);
    }

    #[test]
    fn sink_reserves_per_sensor_and_writes_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pwr.csv");
        let sensors = vec![
            SensorDescriptor::new("cpu0", "CPU0", "cpu0 usage"),
            SensorDescriptor::new("cpu1", "CPU1", "cpu1 usage"),
        ];
        let sink = BenchmarkSink::create(&path, sensors.len(), 20).unwrap();
        sink.consume(
            &[
                Sample { source: 0, timestamp: 1000, value: 0.5 },
                Sample { source: 1, timestamp: 1000, value: 0.25 },
            ],
            &sensors,
        );
        let buffers = sink.finish().unwrap();

        assert_eq!(buffers.len(), 2);
        assert!(buffers.iter().all(|b| b.capacity() >= 20));
        assert_eq!(buffers[0], vec![(1000, 0.5)]);

        let table = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(
            lines,
            [
                "id;label;name;timestamp;value",
                "cpu0;CPU0;cpu0 usage;1000;0.5",
                "cpu1;CPU1;cpu1 usage;1000;0.25",
            ]
        );
    }

    #[test]
    fn reservation_overflow_is_detected() {
        let buffers: SensorBuffers = vec![vec![(0, 0.0); 2], vec![(0, 0.0); 5]];
        assert!(exceeded_reservation(&buffers, 5));
        assert!(!exceeded_reservation(&buffers, 6));
    }

    #[test]
    fn pacer_sleeps_up_to_budget() {
        let mut pacer = FramePacer::new(Some(Duration::from_millis(20)));
        let start = Instant::now();
        pacer.wait();
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn zero_budget_never_sleeps() {
        assert!(FramePacer::new(Some(Duration::ZERO)).budget().is_none());
    }

    #[test]
    fn iterations_prefer_replay_length() {
        let orchestrator = BenchmarkOrchestrator::new(BenchmarkConfig::default());
        assert_eq!(orchestrator.iterations(None), 100);
        assert_eq!(orchestrator.iterations(Some(7)), 7);
        assert_eq!(orchestrator.expected_samples(), 20);
    }
}
