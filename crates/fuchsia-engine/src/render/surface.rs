use crate::coords::Rect;
use crate::device::GpuError;

use super::{FrameReport, RenderTarget, SurfaceCtx};

/// A widget that draws its own contents with wgpu.
///
/// All callbacks run on the event-loop thread that owns the device.
///
/// # Implementing a render surface
///
/// ```rust,ignore
/// struct Clear;
///
/// impl RenderSurface for Clear {
///     fn on_init(&mut self, _ctx: &SurfaceCtx<'_>) -> Result<(), GpuError> { Ok(()) }
///
///     fn on_render(
///         &mut self,
///         ctx: &SurfaceCtx<'_>,
///         target: &RenderTarget<'_>,
///         bounds: Rect,
///     ) -> Result<FrameReport, GpuError> {
///         /* record + submit a clear pass into target.color_view */
///         ctx.errors.check()?;
///         Ok(report)
///     }
///
///     fn on_deinit(&mut self, _ctx: &SurfaceCtx<'_>) {}
/// }
/// ```
pub trait RenderSurface {
    /// Creates GPU resources. Called once, before the first render.
    fn on_init(&mut self, ctx: &SurfaceCtx<'_>) -> Result<(), GpuError>;

    /// Draws into `target` within `bounds` (logical pixels).
    ///
    /// The surface submits its own command buffers so it can check for driver
    /// errors before returning.
    fn on_render(
        &mut self,
        ctx: &SurfaceCtx<'_>,
        target: &RenderTarget<'_>,
        bounds: Rect,
    ) -> Result<FrameReport, GpuError>;

    /// Releases every resource created by `on_init`.
    ///
    /// Called once, and only if `on_init` ran (even when it failed).
    fn on_deinit(&mut self, ctx: &SurfaceCtx<'_>);
}

/// Lifecycle position of a hosted surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceState {
    /// `on_init` has not run yet.
    Uninitialized,
    /// Initialized; renders are forwarded.
    Ready,
    /// Init or a render failed; no further renders for this session.
    Failed,
    /// `release` ran; terminal.
    Released,
}

/// Owns a [`RenderSurface`] and enforces its callback pairing.
pub struct SurfaceHost<S> {
    surface: S,
    state: SurfaceState,
    init_called: bool,
}

impl<S: RenderSurface> SurfaceHost<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: SurfaceState::Uninitialized,
            init_called: false,
        }
    }

    #[inline]
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Initializes the surface on first use, then forwards one render.
    ///
    /// Returns `Ok(None)` once the surface has failed or been released. The
    /// first error moves the host to [`SurfaceState::Failed`].
    pub fn render(
        &mut self,
        ctx: &SurfaceCtx<'_>,
        target: &RenderTarget<'_>,
        bounds: Rect,
    ) -> Result<Option<FrameReport>, GpuError> {
        match self.state {
            SurfaceState::Failed | SurfaceState::Released => return Ok(None),
            SurfaceState::Uninitialized => {
                self.init_called = true;
                if let Err(err) = self.surface.on_init(ctx) {
                    self.state = SurfaceState::Failed;
                    return Err(err);
                }
                self.state = SurfaceState::Ready;
            }
            SurfaceState::Ready => {}
        }

        match self.surface.on_render(ctx, target, bounds) {
            Ok(report) => Ok(Some(report)),
            Err(err) => {
                self.state = SurfaceState::Failed;
                Err(err)
            }
        }
    }

    /// Runs `on_deinit` if `on_init` ran and the host was not released yet.
    pub fn release(&mut self, ctx: &SurfaceCtx<'_>) {
        if self.state == SurfaceState::Released {
            return;
        }
        if self.init_called {
            self.surface.on_deinit(ctx);
        }
        self.state = SurfaceState::Released;
    }
}
