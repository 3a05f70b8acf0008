use anyhow::{Context, Result};

use crate::render::{RenderTarget, SurfaceCtx};

use super::GpuErrorSink;

/// Window-less device for offscreen rendering and tests.
///
/// Built on wgpu's no-op backend: every call is validated by wgpu-core exactly
/// as on a real driver, but nothing reaches a GPU. Validation failures land in
/// the error sink like they would for a windowed [`Gpu`](super::Gpu).
pub struct HeadlessGpu {
    _instance: wgpu::Instance,
    device: wgpu::Device,
    queue: wgpu::Queue,
    errors: GpuErrorSink,
}

impl HeadlessGpu {
    /// Creates a device on the no-op backend. Blocks until the device is ready.
    pub fn noop() -> Result<Self> {
        pollster::block_on(Self::new_noop())
    }

    async fn new_noop() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::NOOP,
            backend_options: wgpu::BackendOptions {
                noop: wgpu::NoopBackendOptions { enable: true },
                ..Default::default()
            },
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .context("no-op adapter unavailable")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("fuchsia-engine headless device"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .context("failed to create headless device/queue")?;

        let errors = GpuErrorSink::install(&device);

        Ok(Self {
            _instance: instance,
            device,
            queue,
            errors,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn errors(&self) -> &GpuErrorSink {
        &self.errors
    }

    /// Surface context for a target of `format` at scale factor 1.
    pub fn surface_ctx(&self, format: wgpu::TextureFormat) -> SurfaceCtx<'_> {
        SurfaceCtx::new(&self.device, &self.queue, &self.errors, format, 1.0)
    }

    /// Allocates a color texture usable as a render target.
    pub fn create_target(
        &self,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> OffscreenTarget {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("fuchsia offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        OffscreenTarget { texture, view }
    }
}

/// Color texture rendered to by a [`HeadlessGpu`].
pub struct OffscreenTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl OffscreenTarget {
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    pub fn render_target(&self) -> RenderTarget<'_> {
        RenderTarget::new(&self.view, self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_device_reports_validation_errors_to_the_sink() {
        let gpu = HeadlessGpu::noop().expect("no-op backend");
        assert!(gpu.errors().is_clear());

        // MAP_READ and MAP_WRITE together are rejected by validation.
        let _buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("invalid usage"),
            size: 16,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::MAP_WRITE,
            mapped_at_creation: false,
        });

        assert!(gpu.errors().check().is_err());
        assert!(gpu.errors().check().is_ok());
    }

    #[test]
    fn offscreen_target_has_requested_size() {
        let gpu = HeadlessGpu::noop().expect("no-op backend");
        let target = gpu.create_target(64, 32, wgpu::TextureFormat::Rgba8UnormSrgb);
        assert_eq!(target.size(), (64, 32));
        assert_eq!(target.render_target().size, (64, 32));
        assert!(gpu.errors().is_clear());
    }
}
