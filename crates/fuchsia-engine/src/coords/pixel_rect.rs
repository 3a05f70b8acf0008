/// Axis-aligned rectangle in physical pixels, as consumed by
/// `wgpu::RenderPass::set_viewport`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Full-extent rect for a target of `size` physical pixels.
    #[inline]
    pub const fn from_size(size: (u32, u32)) -> Self {
        Self::new(0, 0, size.0, size.1)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}
