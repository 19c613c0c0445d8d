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

//! # Stagehand Host
//!
//! The host runtime: owns the window and graphics context, routes input,
//! hot-swaps rendering plugins, records and replays interaction traces and
//! runs power-instrumented benchmarks.
//!
//! Everything runs on one thread in strict frame order. The only concurrent
//! collaborator is the optional [`SamplerService`], which is started and
//! stopped around a benchmark run.

#![warn(missing_docs)]

pub mod benchmark;
pub mod camera_control;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod frame_clock;
pub mod lifecycle;
pub mod recorder;
pub mod screenshot;

#[cfg(test)]
mod testing;

use std::collections::VecDeque;
use std::sync::Arc;

use stagehand_core::platform::{
    GraphicsContext, HostWindow, NoUi, PlatformEvent, ScreenshotWriter, UiFocus,
};
use stagehand_core::telemetry::SamplerService;
use stagehand_core::{GazePoint, PluginCatalog, Stopwatch};

pub use benchmark::{BenchmarkOrchestrator, BenchmarkReport, BenchmarkSink};
pub use camera_control::CameraControlStateMachine;
pub use commands::{HostCommand, HotkeyMap};
pub use config::HostConfig;
pub use context::HostContext;
pub use dispatcher::{DispatchOutcome, InputDispatcher};
pub use error::{BenchmarkError, HostError, Result, TraceError};
pub use frame_clock::FrameClock;
pub use lifecycle::PluginManager;
pub use recorder::{Recorder, TraceEntry};
pub use screenshot::{ScreenshotAction, ScreenshotScheduler};

use crate::dispatcher::DispatchTargets;

/// The host application.
///
/// Field order matters: plugin state is declared, and therefore dropped,
/// before the graphics context and the window.
pub struct Host<W: HostWindow, G: GraphicsContext> {
    plugins: PluginManager,
    context: HostContext,
    dispatcher: InputDispatcher,
    camera: CameraControlStateMachine,
    recorder: Recorder,
    benchmark: BenchmarkOrchestrator,
    screenshots: ScreenshotScheduler,
    clock: FrameClock,
    commands: VecDeque<HostCommand>,
    title: String,
    frame_number: u64,
    running: bool,
    replay_gaze: bool,
    ui: Box<dyn UiFocus>,
    sampler: Option<Box<dyn SamplerService>>,
    screenshot_writer: Box<dyn ScreenshotWriter>,
    graphics: G,
    window: W,
}

impl<W: HostWindow, G: GraphicsContext> Host<W, G> {
    /// Creates a host over an open window and its graphics context.
    ///
    /// Fails if `catalog` is empty.
    pub fn new(
        config: HostConfig,
        catalog: PluginCatalog,
        window: W,
        graphics: G,
        screenshot_writer: Box<dyn ScreenshotWriter>,
    ) -> Result<Self> {
        if catalog.is_empty() {
            return Err(HostError::NoPlugins);
        }
        let config = config.normalized();

        let initial = if config.default_plugin_name.is_empty() {
            0
        } else {
            catalog.position(&config.default_plugin_name).unwrap_or_else(|| {
                log::warn!(
                    "Default plugin '{}' not found; starting with the first plugin.",
                    config.default_plugin_name
                );
                0
            })
        };
        let names: Vec<_> = catalog.iter().map(|d| d.name()).collect();
        log::info!("Available plugins: {}", names.join(", "));

        let context = HostContext::new(window.window_size(), window.framebuffer_size());
        Ok(Self {
            plugins: PluginManager::new(catalog, config.resource_roots.clone(), initial),
            context,
            dispatcher: InputDispatcher::default(),
            camera: CameraControlStateMachine::new(),
            recorder: Recorder::new(&config.trace),
            benchmark: BenchmarkOrchestrator::new(config.benchmark.clone()),
            screenshots: ScreenshotScheduler::new(
                &config.screenshot_frames,
                config.screenshot_prefix(),
                config.auto_quit,
            ),
            clock: FrameClock::new(),
            commands: VecDeque::new(),
            title: config.window.title.clone(),
            frame_number: 0,
            running: false,
            replay_gaze: config.trace.replay_gaze,
            ui: Box::new(NoUi),
            sampler: None,
            screenshot_writer,
            graphics,
            window,
        })
    }

    /// Attaches the sampler used during benchmarks.
    pub fn with_sampler(mut self, sampler: Option<Box<dyn SamplerService>>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Attaches a UI layer that may claim input focus.
    pub fn with_ui(mut self, ui: Box<dyn UiFocus>) -> Self {
        self.ui = ui;
        self
    }

    /// Replaces the hotkey bindings.
    pub fn with_hotkeys(mut self, hotkeys: HotkeyMap) -> Self {
        self.dispatcher = InputDispatcher::new(hotkeys);
        self
    }

    /// Queues a command for the next tick.
    pub fn submit(&mut self, command: HostCommand) {
        self.commands.push_back(command);
    }

    /// Runs the main loop until the window is asked to close.
    pub fn run(&mut self) -> Result<()> {
        if self.running {
            return Err(HostError::AlreadyRunning);
        }
        self.running = true;
        while !self.window.should_close() {
            self.apply_commands();
            self.recorder.capture_tick(self.context.gaze());
            if self.benchmark.take_request() {
                self.run_benchmark();
            }
            self.run_frame();
        }
        self.running = false;
        log::info!("Main loop finished after {} frames.", self.frame_number);
        Ok(())
    }

    /// Renders, captures and presents one frame, then processes pending
    /// events.
    fn run_frame(&mut self) {
        self.frame_number += 1;
        if self.clock.tick().is_some() {
            let title = format!("{} [ {} ]", self.title, self.clock.fps_string());
            self.window.set_title(&title);
        }
        self.draw();
        self.screenshot();
        self.graphics.present();
        self.poll_events();
    }

    fn draw(&mut self) {
        if let Err(err) = self.graphics.begin_frame() {
            log::warn!("Skipping frame {}: {err}", self.frame_number);
            return;
        }
        self.plugins
            .render_tick(&mut self.context, self.graphics.target());
        if let Err(err) = self.graphics.end_frame() {
            log::warn!("Failed to submit frame {}: {err}", self.frame_number);
        }
        if let Some((width, height)) = self.context.take_window_size_request() {
            self.window.request_size(width, height);
        }
    }

    fn screenshot(&mut self) {
        let ScreenshotAction::Capture { path, quit } = self.screenshots.on_frame(self.frame_number)
        else {
            return;
        };
        let written = self
            .graphics
            .read_pixels()
            .and_then(|capture| self.screenshot_writer.write_png(&path, &capture));
        match written {
            Ok(()) => log::info!("Screenshot written to {}", path.display()),
            Err(err) => log::error!("Screenshot at frame {} failed: {err}", self.frame_number),
        }
        if quit {
            log::info!("Last screenshot taken; closing.");
            self.window.set_should_close();
        }
    }

    fn poll_events(&mut self) {
        for event in self.window.poll_events() {
            if let PlatformEvent::FramebufferResized { width, height } = event {
                self.graphics.resize(width, height);
            }
            let mut targets = DispatchTargets {
                context: &mut self.context,
                plugins: &mut self.plugins,
                camera: &mut self.camera,
                recorder: &mut self.recorder,
                ui: self.ui.as_ref(),
                commands: &mut self.commands,
            };
            match self.dispatcher.dispatch(event, &mut targets) {
                DispatchOutcome::Handled => {}
                DispatchOutcome::Refresh => self.refresh(),
                DispatchOutcome::Close => self.window.set_should_close(),
            }
        }
    }

    /// Redraws without advancing the frame counter.
    fn refresh(&mut self) {
        self.draw();
        self.graphics.present();
    }

    fn apply_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::SelectPlugin(index) => {
                self.plugins.select(index);
            }
            HostCommand::NextPlugin => self.plugins.select_next(),
            HostCommand::PreviousPlugin => self.plugins.select_previous(),
            HostCommand::ToggleRecording => self.toggle_recording(),
            HostCommand::ToggleReplay => self.toggle_replay(),
            HostCommand::ToggleGazeReplay => {
                self.replay_gaze = !self.replay_gaze;
                log::info!("Gaze replay {}.", on_off(self.replay_gaze));
            }
            HostCommand::ToggleFrameCap => {
                let config = self.benchmark.config_mut();
                config.use_frame_cap = !config.use_frame_cap;
                log::info!("Frame cap {}.", on_off(config.use_frame_cap));
            }
            HostCommand::SetFrameCap(ms) => self.benchmark.config_mut().frame_cap_ms = ms,
            HostCommand::SetFrameCount(frames) => {
                self.benchmark.config_mut().frame_count = frames.max(1)
            }
            HostCommand::SetOutputPath(path) => self.benchmark.config_mut().output_path = path,
            HostCommand::SetCameraTracePath(path) => self.recorder.set_camera_path(path),
            HostCommand::SetGazeTracePath(path) => self.recorder.set_gaze_path(path),
            HostCommand::SetWindowSize { width, height } => {
                self.window.request_size(width, height)
            }
            HostCommand::StartBenchmark => {
                log::info!(
                    "Benchmark requested; reserving for {} samples.",
                    self.benchmark.expected_samples()
                );
                self.benchmark.request();
            }
            HostCommand::Quit => self.window.set_should_close(),
        }
    }

    fn toggle_recording(&mut self) {
        if self.recorder.is_recording() {
            if let Err(err) = self.recorder.stop_recording() {
                log::error!("Failed to save interaction trace: {err}");
            }
        } else if self.recorder.is_replaying() {
            log::warn!("Cannot record while a replay is armed.");
        } else {
            self.context.set_gaze(GazePoint::CENTER);
            self.recorder.start_recording();
        }
        self.context.set_recording(self.recorder.is_recording());
    }

    fn toggle_replay(&mut self) {
        if self.recorder.is_replaying() {
            self.recorder.stop_replay();
            log::info!("Replay disarmed.");
            return;
        }
        if self.recorder.is_recording() {
            log::warn!("Cannot replay while recording.");
            return;
        }
        match self.recorder.start_replay() {
            Ok(load) if !load.gaze_accepted => self.context.set_gaze(GazePoint::CENTER),
            Ok(_) => {}
            Err(err) => {
                log::warn!("Replay refused: {err}");
                self.context.set_gaze(GazePoint::CENTER);
            }
        }
    }

    fn run_benchmark(&mut self) {
        log::info!("Benchmark started.");
        self.benchmark.set_running(true);
        self.context.set_replaying_gaze(self.replay_gaze);

        let result = self.try_run_benchmark();

        self.benchmark.set_running(false);
        self.context.set_replaying_gaze(false);
        self.recorder.stop_replay();
        self.commands
            .retain(|command| !matches!(command, HostCommand::StartBenchmark));

        match result {
            Ok(report) => {
                log::info!(
                    "Benchmark finished: {} frames in {} ms.",
                    report.frames,
                    report.elapsed.as_millis()
                );
                if report.exceeded_reservation {
                    log::warn!(
                        "Sample buffers exceeded the {} reserved samples.",
                        report.reserved_samples
                    );
                }
                self.benchmark.set_report(report);
            }
            Err(err) => log::error!("Benchmark failed: {err}"),
        }
    }

    fn try_run_benchmark(&mut self) -> std::result::Result<BenchmarkReport, BenchmarkError> {
        let reserved = self.benchmark.expected_samples();
        let sensor_count = self.sampler.as_ref().map_or(0, |s| s.sensors().len());
        let sink = Arc::new(BenchmarkSink::create(
            &self.benchmark.config().output_path,
            sensor_count,
            reserved,
        )?);

        let sampler = self.sampler.as_mut().filter(|s| s.is_available());
        let sampling = match sampler {
            Some(sampler) => {
                sampler.start(sink.clone())?;
                true
            }
            None => {
                log::warn!("No sampler available; benchmark runs unsampled.");
                false
            }
        };

        let stopwatch = Stopwatch::new();
        let frames = self.benchmark_frames();
        let elapsed = stopwatch.elapsed();

        if sampling {
            if let Some(sampler) = self.sampler.as_mut() {
                sampler.stop()?;
            }
        }

        let buffers = sink.finish()?;
        Ok(BenchmarkReport {
            frames,
            elapsed,
            reserved_samples: reserved,
            samples_per_sensor: buffers.iter().map(Vec::len).collect(),
            exceeded_reservation: benchmark::exceeded_reservation(&buffers, reserved),
        })
    }

    /// Runs the benchmark iterations, applying the armed replay if any.
    fn benchmark_frames(&mut self) -> usize {
        let replaying = self.recorder.is_replaying();
        let iterations = self
            .benchmark
            .iterations(replaying.then(|| self.recorder.entries().len()));
        let mut pacer = self.benchmark.pacer();
        for index in 0..iterations {
            if replaying {
                if let Some(gaze) = self.recorder.gaze().get(index) {
                    self.context.set_gaze(*gaze);
                }
                let entry = self.recorder.entries()[index];
                self.camera.apply_trace(self.context.camera(), &entry);
            }
            self.run_frame();
            pacer.wait();
        }
        iterations
    }

    /// The frame number of the last rendered frame.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// The plugin manager.
    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    /// The plugin-facing state.
    pub fn context(&self) -> &HostContext {
        &self.context
    }

    /// The trace recorder.
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// The benchmark orchestrator.
    pub fn benchmark(&self) -> &BenchmarkOrchestrator {
        &self.benchmark
    }

    /// The window.
    pub fn window(&self) -> &W {
        &self.window
    }

    /// The graphics context.
    pub fn graphics(&self) -> &G {
        &self.graphics
    }
}

impl<W: HostWindow, G: GraphicsContext> Drop for Host<W, G> {
    fn drop(&mut self) {
        self.context.camera().remove();
        self.plugins.unload(&self.context);
        log::debug!("Host shut down; plugin released before the graphics context.");
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}
