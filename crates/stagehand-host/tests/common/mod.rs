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

//! Fakes for the host's external collaborators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use stagehand_core::input::{Key, KeyAction, Mods};
use stagehand_core::platform::{
    Color, FrameCapture, FrameTarget, GraphicsContext, HostWindow, PlatformEvent,
    ScreenshotWriter,
};
use stagehand_core::telemetry::{Sample, SampleConsumer, SamplerService, SensorDescriptor};
use stagehand_core::{
    CameraControl, CameraControlMode, GazePoint, GraphicsError, PluginCatalog, PluginDescriptor,
    PluginError, PluginHost, RenderPlugin, SamplerError, SharedCamera,
};

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static CAMERA_MOVES: RefCell<Vec<(CameraControlMode, f64, f64, f64, f64)>> = const { RefCell::new(Vec::new()) };
    static CAMERA_SCROLLS: RefCell<Vec<(f64, f64)>> = const { RefCell::new(Vec::new()) };
    static GAZE_SEEN: RefCell<Vec<(GazePoint, bool)>> = const { RefCell::new(Vec::new()) };
}

/// Appends to the per-test event log.
pub fn log_event(event: impl Into<String>) {
    EVENTS.with(|log| log.borrow_mut().push(event.into()));
}

/// Drains the per-test event log.
pub fn take_events() -> Vec<String> {
    EVENTS.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

pub fn take_camera_moves() -> Vec<(CameraControlMode, f64, f64, f64, f64)> {
    CAMERA_MOVES.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

pub fn take_camera_scrolls() -> Vec<(f64, f64)> {
    CAMERA_SCROLLS.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

pub fn take_gaze_seen() -> Vec<(GazePoint, bool)> {
    GAZE_SEEN.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

/// Window that replays a script of event batches, one batch per poll, and
/// asks to close once the script is exhausted.
#[derive(Debug, Default)]
pub struct FakeWindow {
    pub script: VecDeque<Vec<PlatformEvent>>,
    pub polls: usize,
    pub close_requests: usize,
    pub closed: bool,
    pub titles: Vec<String>,
    pub size_requests: Vec<(u32, u32)>,
    pub window_size: (u32, u32),
    pub framebuffer_size: (u32, u32),
}

impl FakeWindow {
    pub fn new(script: Vec<Vec<PlatformEvent>>) -> Self {
        Self {
            script: script.into(),
            window_size: (640, 400),
            framebuffer_size: (1280, 800),
            ..Default::default()
        }
    }

    /// A window that stays open until something closes it.
    pub fn open_for(polls: usize) -> Self {
        Self::new(vec![Vec::new(); polls])
    }
}

impl HostWindow for FakeWindow {
    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.polls += 1;
        match self.script.pop_front() {
            Some(batch) => batch,
            None => {
                self.closed = true;
                Vec::new()
            }
        }
    }

    fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer_size
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_owned());
    }

    fn request_size(&mut self, width: u32, height: u32) {
        self.size_requests.push((width, height));
    }

    fn should_close(&self) -> bool {
        self.closed
    }

    fn set_should_close(&mut self) {
        self.close_requests += 1;
        self.closed = true;
    }
}

#[derive(Debug)]
pub struct FakeTarget {
    pub size: (u32, u32),
}

impl FrameTarget for FakeTarget {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self, _color: Color) {}
}

/// Graphics context that counts frames and logs its own drop.
#[derive(Debug)]
pub struct FakeGraphics {
    pub target: FakeTarget,
    pub frames_begun: usize,
    pub presents: usize,
    pub resizes: Vec<(u32, u32)>,
}

impl FakeGraphics {
    pub fn new() -> Self {
        Self {
            target: FakeTarget { size: (1280, 800) },
            frames_begun: 0,
            presents: 0,
            resizes: Vec::new(),
        }
    }
}

impl GraphicsContext for FakeGraphics {
    fn resize(&mut self, width: u32, height: u32) {
        self.target.size = (width, height);
        self.resizes.push((width, height));
    }

    fn begin_frame(&mut self) -> Result<(), GraphicsError> {
        self.frames_begun += 1;
        Ok(())
    }

    fn target(&mut self) -> &mut dyn FrameTarget {
        &mut self.target
    }

    fn end_frame(&mut self) -> Result<(), GraphicsError> {
        Ok(())
    }

    fn read_pixels(&mut self) -> Result<FrameCapture, GraphicsError> {
        let (width, height) = self.target.size;
        Ok(FrameCapture {
            width,
            height,
            rgba: vec![0; (width * height * 4) as usize],
        })
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}

impl Drop for FakeGraphics {
    fn drop(&mut self) {
        log_event("graphics dropped");
    }
}

/// Screenshot writer that records destination paths.
#[derive(Debug, Clone, Default)]
pub struct FakeWriter {
    pub written: Rc<RefCell<Vec<PathBuf>>>,
}

impl ScreenshotWriter for FakeWriter {
    fn write_png(&mut self, path: &Path, _capture: &FrameCapture) -> Result<(), GraphicsError> {
        self.written.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Sampler that delivers one sample per sensor on start and on stop.
#[derive(Default)]
pub struct FakeSampler {
    pub sensors: Vec<SensorDescriptor>,
    pub fail_start: bool,
    pub consumer: Option<Arc<dyn SampleConsumer>>,
    pub starts: Rc<RefCell<usize>>,
    pub stops: Rc<RefCell<usize>>,
}

impl FakeSampler {
    pub fn with_sensors(count: usize) -> Self {
        Self {
            sensors: (0..count)
                .map(|i| SensorDescriptor::new(format!("s{i}"), format!("S{i}"), format!("sensor {i}")))
                .collect(),
            ..Default::default()
        }
    }

    fn deliver(&self, timestamp: u64) {
        if let Some(consumer) = &self.consumer {
            let samples: Vec<Sample> = (0..self.sensors.len())
                .map(|source| Sample {
                    source,
                    timestamp,
                    value: 1.5,
                })
                .collect();
            consumer.consume(&samples, &self.sensors);
        }
    }
}

impl SamplerService for FakeSampler {
    fn sensors(&self) -> &[SensorDescriptor] {
        &self.sensors
    }

    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, consumer: Arc<dyn SampleConsumer>) -> Result<(), SamplerError> {
        if self.fail_start {
            return Err(SamplerError::Backend("no sensors attached".to_owned()));
        }
        *self.starts.borrow_mut() += 1;
        self.consumer = Some(consumer);
        self.deliver(1);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SamplerError> {
        self.deliver(2);
        self.consumer = None;
        *self.stops.borrow_mut() += 1;
        Ok(())
    }
}

/// Logs its lifecycle to the event log.
struct LoggingPlugin {
    name: &'static str,
}

impl RenderPlugin for LoggingPlugin {
    fn resize(&mut self, _: &dyn PluginHost, width: u32, height: u32) {
        log_event(format!("{} resize {width}x{height}", self.name));
    }

    fn render(&mut self, _: &dyn PluginHost, _: &mut dyn FrameTarget) {
        log_event(format!("{} render", self.name));
    }

    fn keyboard(&mut self, _: &dyn PluginHost, key: Key, action: KeyAction, _: Mods) {
        log_event(format!("{} key {key:?} {action:?}", self.name));
    }
}

impl Drop for LoggingPlugin {
    fn drop(&mut self) {
        log_event(format!("{} dropped", self.name));
    }
}

fn create_first(host: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
    log_event("first created");
    host.set_window_size(800, 600);
    Ok(Box::new(LoggingPlugin { name: "first" }))
}

fn create_second(_: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
    log_event("second created");
    Ok(Box::new(LoggingPlugin { name: "second" }))
}

pub fn logging_catalog() -> PluginCatalog {
    PluginCatalog::from_descriptors(vec![
        PluginDescriptor::new("first", 10, "first", create_first),
        PluginDescriptor::new("second", 20, "second", create_second),
    ])
}

struct LoggedCamera;

impl CameraControl for LoggedCamera {
    fn mouse_move_control(&mut self, mode: CameraControlMode, ox: f64, oy: f64, nx: f64, ny: f64) {
        CAMERA_MOVES.with(|log| log.borrow_mut().push((mode, ox, oy, nx, ny)));
    }

    fn mouse_scroll_control(&mut self, x_offset: f64, y_offset: f64) {
        CAMERA_SCROLLS.with(|log| log.borrow_mut().push((x_offset, y_offset)));
    }
}

/// Owns a camera registered with the host and reports the gaze it sees.
struct CameraPlugin {
    _camera: SharedCamera,
}

impl RenderPlugin for CameraPlugin {
    fn render(&mut self, host: &dyn PluginHost, _: &mut dyn FrameTarget) {
        let seen = (host.pull_gaze_point(), host.replay_gaze_point());
        GAZE_SEEN.with(|log| log.borrow_mut().push(seen));
    }
}

fn create_camera(host: &dyn PluginHost) -> Result<Box<dyn RenderPlugin>, PluginError> {
    let camera: SharedCamera = Rc::new(RefCell::new(LoggedCamera));
    host.register_camera(&camera);
    Ok(Box::new(CameraPlugin { _camera: camera }))
}

pub fn camera_catalog() -> PluginCatalog {
    PluginCatalog::from_descriptors(vec![PluginDescriptor::new(
        "camera", 10, "camera", create_camera,
    )])
}

pub fn key_press(key: Key) -> PlatformEvent {
    PlatformEvent::Key {
        key,
        action: KeyAction::Press,
        mods: Mods::NONE,
    }
}
