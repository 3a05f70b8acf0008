use std::ops::Range;

use crate::coords::{ColorRgba, PixelRect};

/// A non-indexed draw issued by a render surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl DrawCall {
    /// Single-instance draw of `vertex_count` vertices starting at vertex 0.
    #[inline]
    pub const fn vertices(vertex_count: u32) -> Self {
        Self {
            first_vertex: 0,
            vertex_count,
            instance_count: 1,
        }
    }

    #[inline]
    pub fn vertex_range(&self) -> Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }

    #[inline]
    pub fn instance_range(&self) -> Range<u32> {
        0..self.instance_count
    }
}

/// What a surface did during one render callback.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Color the target was cleared to.
    pub clear: ColorRgba,
    /// Physical viewport, `None` when the bounds had no visible area.
    pub viewport: Option<PixelRect>,
    pub draws: Vec<DrawCall>,
}

impl FrameReport {
    pub fn vertex_count(&self) -> u32 {
        self.draws.iter().map(|d| d.vertex_count * d.instance_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_draw_ranges() {
        let call = DrawCall::vertices(3);
        assert_eq!(call.vertex_range(), 0..3);
        assert_eq!(call.instance_range(), 0..1);
    }

    #[test]
    fn report_counts_vertices_across_draws() {
        let report = FrameReport {
            clear: ColorRgba::black(),
            viewport: None,
            draws: vec![DrawCall::vertices(3), DrawCall::vertices(6)],
        };
        assert_eq!(report.vertex_count(), 9);
    }
}
