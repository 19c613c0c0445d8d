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

//! Host error types.

use std::path::PathBuf;

use stagehand_core::SamplerError;

/// Failure reading or writing an interaction trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The file could not be read or written.
    #[error("trace file {path:?}: {source}")]
    Io {
        /// The trace file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Replay was requested but no camera trace exists.
    #[error("camera trace {0:?} does not exist")]
    MissingCameraTrace(PathBuf),
    /// A record carries an unknown camera-control mode.
    #[error("camera trace record {index} has invalid mode tag {tag}")]
    InvalidMode {
        /// Zero-based record index.
        index: usize,
        /// The offending tag.
        tag: u32,
    },
}

/// Failure during a benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    /// The sample table could not be created or written.
    #[error("benchmark output {path:?}: {source}")]
    Output {
        /// The output file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The sampler refused to start or stop.
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

/// Errors surfaced by the host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The plugin catalog is empty.
    #[error("no plugins found")]
    NoPlugins,
    /// `run` was called re-entrantly.
    #[error("host is already running")]
    AlreadyRunning,
}

/// A `Result` alias with [`HostError`] as the default error.
pub type Result<T, E = HostError> = std::result::Result<T, E>;
