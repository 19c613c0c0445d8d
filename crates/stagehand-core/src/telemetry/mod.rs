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

//! Contracts for the external sensor sampler driven during benchmarks.
//!
//! A sampler runs on its own thread(s) between [`SamplerService::start`] and
//! [`SamplerService::stop`] and delivers batches of [`Sample`]s to a
//! [`SampleConsumer`]. The host never reads the consumer's accumulated state
//! until `stop` has returned.

use std::sync::Arc;

use crate::error::SamplerError;

/// Static description of one sensor exposed by a sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDescriptor {
    /// Stable sensor identifier.
    pub id: String,
    /// Short display label.
    pub label: String,
    /// Human-readable name.
    pub name: String,
}

impl SensorDescriptor {
    /// Creates a descriptor.
    pub fn new(id: impl Into<String>, label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            name: name.into(),
        }
    }
}

/// A single timestamped sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Index of the emitting sensor in [`SamplerService::sensors`].
    pub source: usize,
    /// Microseconds since the UNIX epoch.
    pub timestamp: u64,
    /// The reading.
    pub value: f32,
}

/// Receives sample batches from the sampler thread.
pub trait SampleConsumer: Send + Sync {
    /// Handles one batch. `sensors` is the sampler's full sensor table.
    fn consume(&self, samples: &[Sample], sensors: &[SensorDescriptor]);
}

/// An optional, externally threaded sampling service.
pub trait SamplerService {
    /// Returns the sensors this sampler reports, in source-index order.
    fn sensors(&self) -> &[SensorDescriptor];

    /// Returns `true` if the backend can actually produce samples.
    fn is_available(&self) -> bool;

    /// Starts delivering samples to `consumer`.
    fn start(&mut self, consumer: Arc<dyn SampleConsumer>) -> Result<(), SamplerError>;

    /// Stops sampling. Once this returns no further batch is delivered.
    fn stop(&mut self) -> Result<(), SamplerError>;
}
