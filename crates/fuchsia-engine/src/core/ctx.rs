use winit::window::{Window, WindowId};

use crate::coords::{Rect, Viewport};
use crate::device::{Gpu, GpuError, SurfaceErrorAction};
use crate::render::{FrameReport, RenderSurface, RenderTarget, SurfaceHost};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size.
    pub fn logical_size(&self) -> Viewport {
        let phys  = self.window.inner_size();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(self.window.scale_factor());
        Viewport::new(logi.width as f32, logi.height as f32)
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    /// Bounds of a widget filling the whole client area.
    pub fn bounds(&self) -> Rect {
        Rect::from_viewport(self.logical_size())
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window:  WindowCtx<'a>,
    pub gpu:     &'a mut Gpu<'w>,
    pub time:    FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Renders `host` over the full window, then presents the frame.
    ///
    /// A GPU error raised by the surface ends rendering for the session:
    /// it is logged and `AppControl::Exit` is returned.
    pub fn render_surface<S: RenderSurface>(&mut self, host: &mut SurfaceHost<S>) -> AppControl {
        let bounds = self.window.bounds();
        let scale_factor = self.window.scale_factor();

        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("surface lost beyond recovery");
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let result = {
            let ctx = self.gpu.surface_ctx(scale_factor);
            let target = RenderTarget::new(&frame.view, frame.size());
            host.render(&ctx, &target, bounds)
        };

        self.window.window.pre_present_notify();
        self.gpu.present(frame);

        frame_control(result, self.time)
    }
}

/// Maps the outcome of a surface render to the runtime's next step.
///
/// Any `GpuError` ends the session; a skipped frame (failed or released host)
/// keeps the loop running.
pub fn frame_control(
    result: Result<Option<FrameReport>, GpuError>,
    time: FrameTime,
) -> AppControl {
    match result {
        Ok(Some(report)) => {
            log::trace!(
                "frame {} (+{:.3}s): {} draw(s), {} vertices, viewport {:?}",
                time.frame_index,
                time.dt,
                report.draws.len(),
                report.vertex_count(),
                report.viewport
            );
            AppControl::Continue
        }
        Ok(None) => AppControl::Continue,
        Err(err) => {
            log::error!("render surface failed, rendering stopped: {err}");
            AppControl::Exit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ColorRgba;
    use crate::render::DrawCall;

    const TIME: FrameTime = FrameTime { dt: 0.016, frame_index: 7 };

    fn drawn_frame() -> FrameReport {
        FrameReport {
            clear: ColorRgba::black(),
            viewport: None,
            draws: vec![DrawCall::vertices(3)],
        }
    }

    #[test]
    fn drawn_frame_continues() {
        assert_eq!(frame_control(Ok(Some(drawn_frame())), TIME), AppControl::Continue);
    }

    #[test]
    fn skipped_frame_continues() {
        assert_eq!(frame_control(Ok(None), TIME), AppControl::Continue);
    }

    #[test]
    fn driver_error_ends_the_session() {
        let err = GpuError::Driver {
            count: 2,
            first: "invalid pipeline".to_string(),
        };
        assert_eq!(frame_control(Err(err), TIME), AppControl::Exit);
    }

    #[test]
    fn uninitialized_surface_ends_the_session() {
        assert_eq!(frame_control(Err(GpuError::NotInitialized), TIME), AppControl::Exit);
    }
}
