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

//! A `winit`-based implementation of the [`HostWindow`] trait.
//!
//! `winit` normally owns the main loop and drives the application through
//! callbacks. Here the event loop is pumped explicitly, once per host tick,
//! and translated events are buffered until the host collects them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use stagehand_core::platform::{HostWindow, PlatformEvent};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use super::input::EventTranslator;
use super::lease::PlatformLease;

/// Pumps allowed for the platform to deliver the initial `resumed` event.
const OPEN_ATTEMPTS: usize = 50;
const OPEN_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Initial window parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    /// Window title.
    pub title: String,
    /// Inner width in window units.
    pub width: u32,
    /// Inner height in window units.
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Stagehand".to_owned(),
            width: 1280,
            height: 800,
        }
    }
}

/// Receives `winit` callbacks during a pump and buffers their outcome.
struct WindowApp {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    translator: EventTranslator,
    pending: Vec<PlatformEvent>,
    creation_error: Option<OsError>,
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                log::info!("Winit window created successfully (id: {:?}).", window.id());
                self.translator = EventTranslator::new(window.scale_factor());
                self.window = Some(Arc::new(window));
            }
            Err(err) => self.creation_error = Some(err),
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        self.translator.translate_into(&event, &mut self.pending);
    }
}

/// The host window, backed by `winit`.
pub struct WinitWindow {
    window: Arc<Window>,
    app: WindowApp,
    event_loop: EventLoop<()>,
    close_requested: bool,
    _lease: PlatformLease,
}

impl WinitWindow {
    /// Opens a window and waits until the platform has created it.
    ///
    /// # Errors
    /// Fails if the event loop cannot be created (including a second event
    /// loop in the same process) or the platform refuses the window.
    pub fn open(settings: &WindowSettings) -> Result<Self> {
        let lease = PlatformLease::acquire();
        log::info!(
            "Building window with title: '{}' and size: {}x{}",
            settings.title,
            settings.width,
            settings.height
        );

        let mut event_loop = EventLoop::new().context("failed to create the event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = WindowApp {
            attributes: Window::default_attributes()
                .with_title(settings.title.clone())
                .with_inner_size(LogicalSize::new(settings.width, settings.height))
                .with_visible(true),
            window: None,
            translator: EventTranslator::new(1.0),
            pending: Vec::new(),
            creation_error: None,
        };

        for _ in 0..OPEN_ATTEMPTS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(OPEN_PUMP_TIMEOUT), &mut app)
            {
                bail!("event loop exited with code {code} before the window opened");
            }
            if let Some(err) = app.creation_error.take() {
                bail!("failed to create the window: {err}");
            }
            if let Some(window) = app.window.clone() {
                return Ok(Self {
                    window,
                    app,
                    event_loop,
                    close_requested: false,
                    _lease: lease,
                });
            }
        }
        bail!("the platform did not create a window after {OPEN_ATTEMPTS} pumps")
    }

    /// A shared handle on the native window, for surface creation.
    pub fn handle(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }
}

impl HostWindow for WinitWindow {
    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app)
        {
            log::info!("Event loop exited with code {code}.");
            self.close_requested = true;
        }
        std::mem::take(&mut self.app.pending)
    }

    fn window_size(&self) -> (u32, u32) {
        let size = self
            .window
            .inner_size()
            .to_logical::<u32>(self.window.scale_factor());
        (size.width, size.height)
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn request_size(&mut self, width: u32, height: u32) {
        // An immediately applied resize produces no `Resized` event.
        if let Some(size) = self
            .window
            .request_inner_size(LogicalSize::new(width, height))
        {
            self.app.translator.translate_into(
                &WindowEvent::Resized(size),
                &mut self.app.pending,
            );
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn set_should_close(&mut self) {
        self.close_requested = true;
    }
}
