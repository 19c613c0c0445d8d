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

//! Recording and replay of per-frame camera and gaze traces.
//!
//! Both traces are flat arrays of fixed-size, native-endian records without a
//! header; the record count is the file size divided by the record size. A
//! gaze trace is only trusted if it holds exactly as many records as the
//! camera trace.

use std::fs;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use stagehand_core::{CameraControlMode, GazePoint};

use crate::camera_control::DragDelta;
use crate::config::TraceConfig;
use crate::error::TraceError;

/// Initial capacity reserved when a recording starts.
const RECORD_RESERVE: usize = 100_000;

/// One frame of recorded camera control.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraceEntry {
    /// Button that drove the last drag of the frame.
    pub mode: CameraControlMode,
    /// Drag start, horizontal.
    pub old_x: f64,
    /// Drag start, vertical.
    pub old_y: f64,
    /// Drag end, horizontal.
    pub new_x: f64,
    /// Drag end, vertical.
    pub new_y: f64,
    /// Scroll offset, horizontal.
    pub x_offset: f64,
    /// Scroll offset, vertical.
    pub y_offset: f64,
}

/// On-disk layout of a [`TraceEntry`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct TraceRecord {
    mode: u32,
    _padding: u32,
    old_x: f64,
    old_y: f64,
    new_x: f64,
    new_y: f64,
    x_offset: f64,
    y_offset: f64,
}

/// On-disk layout of a [`GazePoint`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct GazeRecord {
    x: f32,
    y: f32,
}

/// Size in bytes of one camera-trace record.
pub const TRACE_RECORD_SIZE: usize = std::mem::size_of::<TraceRecord>();

/// Size in bytes of one gaze-trace record.
pub const GAZE_RECORD_SIZE: usize = std::mem::size_of::<GazeRecord>();

impl From<&TraceEntry> for TraceRecord {
    fn from(entry: &TraceEntry) -> Self {
        Self {
            mode: entry.mode.tag(),
            _padding: 0,
            old_x: entry.old_x,
            old_y: entry.old_y,
            new_x: entry.new_x,
            new_y: entry.new_y,
            x_offset: entry.x_offset,
            y_offset: entry.y_offset,
        }
    }
}

/// Writes `entries` as a camera trace.
pub fn save_camera_trace(path: &Path, entries: &[TraceEntry]) -> Result<(), TraceError> {
    let records: Vec<TraceRecord> = entries.iter().map(TraceRecord::from).collect();
    write_records(path, bytemuck::cast_slice(&records))
}

/// Writes `points` as a gaze trace.
pub fn save_gaze_trace(path: &Path, points: &[GazePoint]) -> Result<(), TraceError> {
    let records: Vec<GazeRecord> = points
        .iter()
        .map(|p| GazeRecord { x: p.x, y: p.y })
        .collect();
    write_records(path, bytemuck::cast_slice(&records))
}

/// Reads a camera trace. Trailing bytes that do not form a full record are
/// ignored.
pub fn load_camera_trace(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let bytes = read_records(path)?;
    bytes
        .chunks_exact(TRACE_RECORD_SIZE)
        .enumerate()
        .map(|(index, chunk)| {
            let record: TraceRecord = bytemuck::pod_read_unaligned(chunk);
            let mode = CameraControlMode::from_tag(record.mode).ok_or(TraceError::InvalidMode {
                index,
                tag: record.mode,
            })?;
            Ok(TraceEntry {
                mode,
                old_x: record.old_x,
                old_y: record.old_y,
                new_x: record.new_x,
                new_y: record.new_y,
                x_offset: record.x_offset,
                y_offset: record.y_offset,
            })
        })
        .collect()
}

/// Reads a gaze trace.
pub fn load_gaze_trace(path: &Path) -> Result<Vec<GazePoint>, TraceError> {
    let bytes = read_records(path)?;
    Ok(bytes
        .chunks_exact(GAZE_RECORD_SIZE)
        .map(|chunk| {
            let record: GazeRecord = bytemuck::pod_read_unaligned(chunk);
            GazePoint::new(record.x, record.y)
        })
        .collect())
}

fn write_records(path: &Path, bytes: &[u8]) -> Result<(), TraceError> {
    fs::write(path, bytes).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_records(path: &Path) -> Result<Vec<u8>, TraceError> {
    fs::read(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Outcome of arming a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayLoad {
    /// Number of camera records loaded.
    pub entries: usize,
    /// Whether a synchronized gaze stream was accepted.
    pub gaze_accepted: bool,
}

/// Record and replay state.
///
/// Recording and replaying are independent toggles; callers must not enable
/// both at once.
#[derive(Debug)]
pub struct Recorder {
    camera_path: PathBuf,
    gaze_path: PathBuf,
    recording: bool,
    replaying: bool,
    current: TraceEntry,
    entries: Vec<TraceEntry>,
    gaze: Vec<GazePoint>,
}

impl Recorder {
    /// Creates an idle recorder using the given trace locations.
    pub fn new(paths: &TraceConfig) -> Self {
        Self {
            camera_path: paths.camera_path.clone(),
            gaze_path: paths.gaze_path.clone(),
            recording: false,
            replaying: false,
            current: TraceEntry::default(),
            entries: Vec::new(),
            gaze: Vec::new(),
        }
    }

    /// Whether a recording is in progress.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Whether a replay is armed.
    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Camera trace location.
    pub fn camera_path(&self) -> &Path {
        &self.camera_path
    }

    /// Gaze trace location.
    pub fn gaze_path(&self) -> &Path {
        &self.gaze_path
    }

    /// Changes the camera trace location.
    pub fn set_camera_path(&mut self, path: PathBuf) {
        self.camera_path = path;
    }

    /// Changes the gaze trace location.
    pub fn set_gaze_path(&mut self, path: PathBuf) {
        self.gaze_path = path;
    }

    /// The camera entries recorded or loaded.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// The gaze stream recorded or loaded; empty if none was accepted.
    pub fn gaze(&self) -> &[GazePoint] {
        &self.gaze
    }

    /// Clears both buffers and starts recording.
    pub fn start_recording(&mut self) {
        self.entries.clear();
        self.entries.reserve(RECORD_RESERVE);
        self.gaze.clear();
        self.gaze.reserve(RECORD_RESERVE);
        self.current = TraceEntry::default();
        self.recording = true;
        log::info!("Recording interaction trace.");
    }

    /// Stops recording and writes both traces to disk.
    pub fn stop_recording(&mut self) -> Result<(), TraceError> {
        self.recording = false;
        save_camera_trace(&self.camera_path, &self.entries)?;
        save_gaze_trace(&self.gaze_path, &self.gaze)?;
        log::info!(
            "Recorded {} frames to {:?} and {:?}.",
            self.entries.len(),
            self.camera_path,
            self.gaze_path
        );
        Ok(())
    }

    /// Notes a drag delivered to the camera during the current tick.
    pub fn note_drag(&mut self, delta: &DragDelta) {
        if !self.recording {
            return;
        }
        self.current.mode = delta.mode;
        (self.current.old_x, self.current.old_y) = delta.old;
        (self.current.new_x, self.current.new_y) = delta.new;
    }

    /// Notes a scroll delivered to the camera during the current tick.
    pub fn note_scroll(&mut self, x_offset: f64, y_offset: f64) {
        if !self.recording {
            return;
        }
        self.current.x_offset = x_offset;
        self.current.y_offset = y_offset;
    }

    /// Appends this tick's entry and gaze point, then resets the per-tick
    /// deltas so the next entry only reflects new input.
    pub fn capture_tick(&mut self, gaze: GazePoint) {
        if !self.recording {
            return;
        }
        self.entries.push(self.current);
        self.gaze.push(gaze);
        self.current.new_x = self.current.old_x;
        self.current.new_y = self.current.old_y;
        self.current.x_offset = 0.0;
        self.current.y_offset = 0.0;
    }

    /// Loads the traces from disk and arms replay.
    ///
    /// Without a camera trace, replay stays disarmed and an error is
    /// returned. A gaze trace whose length differs from the camera trace is
    /// discarded as a whole.
    pub fn start_replay(&mut self) -> Result<ReplayLoad, TraceError> {
        self.replaying = false;
        if !self.camera_path.exists() {
            self.gaze.clear();
            return Err(TraceError::MissingCameraTrace(self.camera_path.clone()));
        }
        self.entries = load_camera_trace(&self.camera_path)?;
        self.gaze.clear();
        if self.gaze_path.exists() {
            match load_gaze_trace(&self.gaze_path) {
                Ok(gaze) if gaze.len() == self.entries.len() => self.gaze = gaze,
                Ok(gaze) => log::warn!(
                    "Gaze trace has {} records but camera trace has {}; using the default gaze point.",
                    gaze.len(),
                    self.entries.len()
                ),
                Err(err) => log::warn!("Ignoring gaze trace: {err}"),
            }
        }
        self.replaying = true;
        let load = ReplayLoad {
            entries: self.entries.len(),
            gaze_accepted: !self.gaze.is_empty(),
        };
        log::info!(
            "Replay armed with {} frames (gaze {}).",
            load.entries,
            if load.gaze_accepted { "accepted" } else { "discarded" }
        );
        Ok(load)
    }

    /// Disarms replay.
    pub fn stop_replay(&mut self) {
        self.replaying = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> TraceConfig {
        TraceConfig {
            camera_path: dir.join("cam.path"),
            gaze_path: dir.join("eye.path"),
            replay_gaze: false,
        }
    }

    fn drag(mode: CameraControlMode, x: f64) -> DragDelta {
        DragDelta {
            mode,
            old: (x, 0.0),
            new: (x + 0.1, 0.0),
        }
    }

    #[test]
    fn record_layout_matches_file_format() {
        assert_eq!(TRACE_RECORD_SIZE, 56);
        assert_eq!(GAZE_RECORD_SIZE, 8);
    }

    #[test]
    fn capture_resets_deltas_but_keeps_position() {
        let dir = tempdir().unwrap();
        let mut recorder = Recorder::new(&config_in(dir.path()));
        recorder.start_recording();
        recorder.note_drag(&drag(CameraControlMode::Left, 0.2));
        recorder.note_scroll(0.0, 2.0);
        recorder.capture_tick(GazePoint::CENTER);
        recorder.capture_tick(GazePoint::CENTER);

        let [first, second] = recorder.entries() else {
            panic!("expected two entries");
        };
        assert_eq!(first.new_x, 0.2 + 0.1);
        assert_eq!(first.y_offset, 2.0);
        assert_eq!(second.mode, CameraControlMode::Left);
        assert_eq!(second.old_x, 0.2);
        assert_eq!(second.new_x, second.old_x);
        assert_eq!(second.y_offset, 0.0);
    }

    #[test]
    fn notes_are_ignored_while_not_recording() {
        let dir = tempdir().unwrap();
        let mut recorder = Recorder::new(&config_in(dir.path()));
        recorder.note_drag(&drag(CameraControlMode::Left, 0.2));
        recorder.capture_tick(GazePoint::CENTER);
        assert!(recorder.entries().is_empty());
    }

    #[test]
    fn saved_files_have_fixed_record_length() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let mut recorder = Recorder::new(&config);
        recorder.start_recording();
        for i in 0..3 {
            recorder.note_drag(&drag(CameraControlMode::Right, f64::from(i)));
            recorder.capture_tick(GazePoint::new(0.1, 0.9));
        }
        recorder.stop_recording().unwrap();

        assert_eq!(
            fs::metadata(&config.camera_path).unwrap().len(),
            3 * TRACE_RECORD_SIZE as u64
        );
        assert_eq!(
            fs::metadata(&config.gaze_path).unwrap().len(),
            3 * GAZE_RECORD_SIZE as u64
        );
    }

    #[test]
    fn replay_reloads_what_was_recorded() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let mut recorder = Recorder::new(&config);
        recorder.start_recording();
        for i in 0..4 {
            recorder.note_drag(&drag(CameraControlMode::Middle, f64::from(i) / 10.0));
            recorder.note_scroll(1.0, -1.0);
            recorder.capture_tick(GazePoint::new(0.25, 0.75));
        }
        let recorded = recorder.entries().to_vec();
        recorder.stop_recording().unwrap();

        let load = recorder.start_replay().unwrap();
        assert_eq!(load, ReplayLoad { entries: 4, gaze_accepted: true });
        assert_eq!(recorder.entries(), recorded.as_slice());
        assert!(recorder.gaze().iter().all(|g| *g == GazePoint::new(0.25, 0.75)));
    }

    #[test]
    fn mismatched_gaze_trace_is_discarded() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        save_camera_trace(&config.camera_path, &[TraceEntry::default(); 3]).unwrap();
        save_gaze_trace(&config.gaze_path, &[GazePoint::new(0.0, 0.0); 2]).unwrap();

        let mut recorder = Recorder::new(&config);
        let load = recorder.start_replay().unwrap();
        assert_eq!(load, ReplayLoad { entries: 3, gaze_accepted: false });
        assert!(recorder.gaze().is_empty());
        assert!(recorder.is_replaying());
    }

    #[test]
    fn replay_without_camera_trace_is_refused() {
        let dir = tempdir().unwrap();
        let mut recorder = Recorder::new(&config_in(dir.path()));
        let err = recorder.start_replay().unwrap_err();
        assert!(matches!(err, TraceError::MissingCameraTrace(_)));
        assert!(!recorder.is_replaying());
    }

    #[test]
    fn invalid_mode_tag_is_rejected() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let mut bytes = vec![0u8; TRACE_RECORD_SIZE];
        bytes[..4].copy_from_slice(&7u32.to_ne_bytes());
        fs::write(&config.camera_path, bytes).unwrap();

        let mut recorder = Recorder::new(&config);
        let err = recorder.start_replay().unwrap_err();
        assert!(matches!(err, TraceError::InvalidMode { index: 0, tag: 7 }));
        assert!(!recorder.is_replaying());
    }

    #[test]
    fn partial_trailing_record_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cam.path");
        save_camera_trace(&path, &[TraceEntry::default(); 2]).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[0u8; 10]);
        fs::write(&path, bytes).unwrap();
        assert_eq!(load_camera_trace(&path).unwrap().len(), 2);
    }
}
