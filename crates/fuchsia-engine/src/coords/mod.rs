//! Coordinate and geometry types shared by the runtime and render surfaces.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Render surfaces convert widget bounds to physical pixels with [`Rect::to_physical`].

mod color;
mod pixel_rect;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use pixel_rect::PixelRect;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
