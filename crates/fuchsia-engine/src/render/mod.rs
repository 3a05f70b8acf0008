//! Custom rendering extension point.
//!
//! A [`RenderSurface`] issues its own wgpu calls into the window's color target.
//! It owns every GPU resource it creates; [`SurfaceHost`] pairs its lifecycle
//! callbacks so resources are acquired once and released once.
//!
//! Convention:
//! - widget bounds are logical pixels (top-left origin, +Y down)
//! - surfaces convert bounds to a physical viewport before drawing

mod ctx;
mod report;
mod surface;

pub use ctx::{RenderTarget, SurfaceCtx};
pub use report::{DrawCall, FrameReport};
pub use surface::{RenderSurface, SurfaceHost, SurfaceState};
