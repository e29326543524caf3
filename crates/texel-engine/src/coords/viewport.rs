use winit::dpi::PhysicalSize;

/// Drawable size in physical pixels.
///
/// Projections derive their aspect ratio from this, so a zero-height
/// (minimized) viewport reports an aspect of 1.
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
    pub fn from_physical(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_800_by_600() {
        assert!((Viewport::new(800.0, 600.0).aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn minimized_viewport_has_unit_aspect() {
        assert_eq!(Viewport::new(800.0, 0.0).aspect(), 1.0);
        assert!(!Viewport::from_physical(PhysicalSize::new(0, 0)).is_valid());
    }
}
