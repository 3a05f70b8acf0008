use super::{PixelRect, Vec2, Viewport};

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rect covering the whole viewport, anchored at the origin.
    #[inline]
    pub const fn from_viewport(viewport: Viewport) -> Self {
        Self::new(0.0, 0.0, viewport.width, viewport.height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Converts logical bounds to a physical pixel rect clamped to a target of
    /// `target` physical pixels.
    ///
    /// Returns `None` when the clamped area is empty or the rect is not finite;
    /// callers should skip drawing in that case.
    pub fn to_physical(self, scale: f32, target: (u32, u32)) -> Option<PixelRect> {
        if !self.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return None;
        }

        let (tw, th) = target;
        let r = self.normalized();
        if r.is_empty() {
            return None;
        }
        let min = r.origin * scale;
        let max = Vec2::new(r.origin.x + r.size.x, r.origin.y + r.size.y) * scale;

        let x  = (min.x.max(0.0).round() as u32).min(tw);
        let y  = (min.y.max(0.0).round() as u32).min(th);
        let x2 = (max.x.max(0.0).round() as u32).min(tw);
        let y2 = (max.y.max(0.0).round() as u32).min(th);

        let px = PixelRect::new(x, y, x2.saturating_sub(x), y2.saturating_sub(y));
        if px.is_empty() { None } else { Some(px) }
    }
}
