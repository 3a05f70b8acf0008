//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! applications, and the per-frame context through which render surfaces are
//! driven.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{frame_control, FrameCtx, WindowCtx};
