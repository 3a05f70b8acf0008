use crate::device::GpuErrorSink;

/// Device-side context handed to render surface callbacks.
pub struct SurfaceCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Pending driver errors; surfaces call `errors.check()` after their work.
    pub errors: &'a GpuErrorSink,
    /// Format of every target the surface will be asked to draw into.
    pub target_format: wgpu::TextureFormat,
    pub scale_factor: f32,
}

impl<'a> SurfaceCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        errors: &'a GpuErrorSink,
        target_format: wgpu::TextureFormat,
        scale_factor: f32,
    ) -> Self {
        Self {
            device,
            queue,
            errors,
            target_format,
            scale_factor,
        }
    }
}

/// Color target for one frame.
pub struct RenderTarget<'a> {
    pub color_view: &'a wgpu::TextureView,
    /// Physical size in pixels.
    pub size: (u32, u32),
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(color_view: &'a wgpu::TextureView, size: (u32, u32)) -> Self {
        Self { color_view, size }
    }
}
