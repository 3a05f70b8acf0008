//! Fuchsia engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the render-surface
//! extension point used by applications to issue their own draw calls.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
