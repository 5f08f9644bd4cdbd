use super::Rect;

/// Viewport size in logical pixels.
///
/// Renderers treat this as the coordinate basis for converting logical px
/// positions to NDC in shaders. Backends report their canvas size from it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Size in physical pixels for the given scale factor, at least 1×1.
    #[inline]
    pub fn physical_size(self, scale_factor: f32) -> (u32, u32) {
        let w = (self.width * scale_factor).round().max(1.0) as u32;
        let h = (self.height * scale_factor).round().max(1.0) as u32;
        (w, h)
    }
}
