//! GPU device + surface management.
//!
//! This module is responsible for:
//! - selecting the platform rendering backend (GL over EGL or ANGLE)
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - recording driver errors so render surfaces can check them explicitly

mod error;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;

pub use error::{GpuError, GpuErrorSink, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::{HeadlessGpu, OffscreenTarget};
pub use init::{GpuInit, RenderingMode};
