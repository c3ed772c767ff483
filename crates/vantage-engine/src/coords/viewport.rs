/// Render-surface size in device pixels.
///
/// Cached by the renderer and refreshed from resize notifications; the
/// projection model reads it every frame.
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
    pub fn half_width(self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_height(self) -> f32 {
        self.height / 2.0
    }
}
