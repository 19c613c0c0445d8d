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

use std::sync::{mpsc, Arc};

use anyhow::{anyhow, Result};
use stagehand_core::platform::{FrameCapture, FrameTarget, GraphicsContext};
use stagehand_core::GraphicsError;
use winit::window::Window;

use super::readback;
use super::target::{to_wgpu_color, WgpuFrameTarget};

/// The frame between `begin_frame` and `present`.
struct Frame {
    texture: wgpu::SurfaceTexture,
}

/// Holds the WGPU state bound to the host window's surface.
pub struct WgpuGraphicsContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    readback_supported: bool,
    target: WgpuFrameTarget,
    frame: Option<Frame>,
}

impl WgpuGraphicsContext {
    /// Initializes a context for `window`, blocking until the device is ready.
    pub fn new(window: Arc<Window>) -> Result<Self> {
        pollster::block_on(Self::new_async(window))
    }

    async fn new_async(window: Arc<Window>) -> Result<Self> {
        log::info!("Initializing WGPU graphics context...");
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let surface = instance
            .create_surface(window)
            .map_err(|e| anyhow!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("No suitable graphics adapter: {e}"))?;
        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Stagehand Logical Device"),
                ..Default::default()
            })
            .await
            .map_err(|e| anyhow!("Failed to create logical device: {e}"))?;

        device.on_uncaptured_error(Arc::new(|e| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let readback_supported = surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC);
        if !readback_supported {
            log::warn!("Surface does not support copies; screenshots are unavailable.");
        }
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if readback_supported {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let surface_config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            // Fifo is guaranteed to be supported.
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Self {
            surface,
            device,
            queue,
            target: WgpuFrameTarget::new((surface_config.width, surface_config.height)),
            surface_config,
            readback_supported,
            frame: None,
        })
    }

    /// Size of the configured surface.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn acquire(&mut self) -> Result<wgpu::SurfaceTexture, GraphicsError> {
        match self.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture)
            | wgpu::CurrentSurfaceTexture::Suboptimal(texture) => Ok(texture),
            e @ (wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                log::warn!("Swapchain surface lost or outdated ({e:?}); reconfiguring.");
                self.surface.configure(&self.device, &self.surface_config);
                match self.surface.get_current_texture() {
                    wgpu::CurrentSurfaceTexture::Success(texture)
                    | wgpu::CurrentSurfaceTexture::Suboptimal(texture) => Ok(texture),
                    e => Err(GraphicsError::SurfaceUnavailable(format!("{e:?}"))),
                }
            }
            e => Err(GraphicsError::SurfaceUnavailable(format!("{e:?}"))),
        }
    }

    fn frame(&self) -> Result<&Frame, GraphicsError> {
        self.frame.as_ref().ok_or(GraphicsError::NoFrameInProgress)
    }
}

impl GraphicsContext for WgpuGraphicsContext {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize request to zero dimensions: {width}x{height}");
            return;
        }
        log::debug!("Resizing surface configuration to {width}x{height}");
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn begin_frame(&mut self) -> Result<(), GraphicsError> {
        self.frame = None;
        let texture = self.acquire()?;
        self.target.reset(self.size());
        self.frame = Some(Frame { texture });
        Ok(())
    }

    fn target(&mut self) -> &mut dyn FrameTarget {
        &mut self.target
    }

    fn end_frame(&mut self) -> Result<(), GraphicsError> {
        let frame = self.frame()?;
        let view = frame
            .texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stagehand Frame Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stagehand Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(self.target.clear_color())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn read_pixels(&mut self) -> Result<FrameCapture, GraphicsError> {
        if !self.readback_supported {
            return Err(GraphicsError::Readback(
                "surface does not support copies".to_owned(),
            ));
        }
        let texture = &self.frame()?.texture.texture;
        let (width, height) = (texture.width(), texture.height());
        let padded_row = readback::padded_bytes_per_row(width);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Stagehand Readback Buffer"),
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stagehand Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| GraphicsError::Readback(format!("{e:?}")))?;
        rx.recv()
            .map_err(|e| GraphicsError::Readback(e.to_string()))?
            .map_err(|e| GraphicsError::Readback(format!("{e:?}")))?;

        let rgba = {
            let mapped = slice.get_mapped_range();
            readback::unpad_rows(
                &mapped,
                padded_row,
                width,
                height,
                readback::is_bgra(self.surface_config.format),
            )
        };
        buffer.unmap();

        Ok(FrameCapture {
            width,
            height,
            rgba,
        })
    }

    fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.texture.present();
        }
    }
}
