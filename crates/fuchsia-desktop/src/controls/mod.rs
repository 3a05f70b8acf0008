//! Render surfaces hosted by the desktop app.

pub mod triangle;

pub use triangle::TriangleControl;
