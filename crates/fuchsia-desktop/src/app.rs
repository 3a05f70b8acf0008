use fuchsia_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use fuchsia_engine::device::Gpu;
use fuchsia_engine::render::{SurfaceCtx, SurfaceHost};

use crate::controls::TriangleControl;

/// Single-window app whose client area is one [`TriangleControl`].
pub struct TriangleApp {
    triangle: SurfaceHost<TriangleControl>,
}

impl TriangleApp {
    pub fn new() -> Self {
        Self {
            triangle: SurfaceHost::new(TriangleControl::new()),
        }
    }

    /// Tears the triangle down while the window's device is still alive.
    fn release(&mut self, ctx: &SurfaceCtx<'_>) {
        self.triangle.release(ctx);
    }
}

impl App for TriangleApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        ctx.render_surface(&mut self.triangle)
    }

    fn on_window_destroyed(&mut self, window: WindowCtx<'_>, gpu: &Gpu<'_>) {
        self.release(&gpu.surface_ctx(window.scale_factor()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuchsia_engine::coords::Rect;
    use fuchsia_engine::device::HeadlessGpu;
    use fuchsia_engine::render::SurfaceState;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    #[test]
    fn window_teardown_deinitializes_a_drawn_triangle() {
        let gpu = HeadlessGpu::noop().expect("no-op backend");
        let ctx = gpu.surface_ctx(FORMAT);
        let out = gpu.create_target(32, 32, FORMAT);
        let mut app = TriangleApp::new();

        app.triangle
            .render(&ctx, &out.render_target(), Rect::new(0.0, 0.0, 32.0, 32.0))
            .expect("render");
        assert!(app.triangle.surface().resources().is_some());

        app.release(&ctx);

        assert_eq!(app.triangle.state(), SurfaceState::Released);
        assert!(app.triangle.surface().resources().is_none());
        assert!(!app.triangle.surface().is_bound());
        assert!(gpu.errors().is_clear());

        // Frames arriving after teardown are skipped.
        let late = app
            .triangle
            .render(&ctx, &out.render_target(), Rect::new(0.0, 0.0, 32.0, 32.0));
        assert_eq!(late, Ok(None));
    }

    #[test]
    fn window_teardown_before_first_frame_releases_nothing() {
        let gpu = HeadlessGpu::noop().expect("no-op backend");
        let ctx = gpu.surface_ctx(FORMAT);
        let mut app = TriangleApp::new();

        app.release(&ctx);

        assert_eq!(app.triangle.state(), SurfaceState::Released);
        assert!(app.triangle.surface().resources().is_none());
        assert!(gpu.errors().is_clear());
    }
}
