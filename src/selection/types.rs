//! Shared types for fill selections.

/// Default color tolerance used by the bindings and `FillParams::new`.
pub const DEFAULT_TOLERANCE: f32 = 32.0;

/// Value written into result masks for selected pixels.
pub const SELECTED: u8 = 255;

/// Inclusive, axis-aligned bounding box in image coordinates.
///
/// After growth the box may extend past the image edges; treat it as a
/// safe superset of the selected pixels rather than a tight fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Bounds {
    /// Bounds covering a single pixel.
    pub fn point(x: i32, y: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x,
            y2: y,
        }
    }

    /// Widen the box to include `(x, y)`.
    #[inline]
    pub fn include(&mut self, x: i32, y: i32) {
        self.x1 = self.x1.min(x);
        self.y1 = self.y1.min(y);
        self.x2 = self.x2.max(x);
        self.y2 = self.y2.max(y);
    }

    /// Box grown by `amount` in all four directions, without clamping to
    /// an image. Saturates at the `i32` range.
    pub fn expand(&self, amount: u32) -> Self {
        let shift = |v: i32, by: i64| (v as i64 + by).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        let a = amount as i64;
        Self {
            x1: shift(self.x1, -a),
            y1: shift(self.y1, -a),
            x2: shift(self.x2, a),
            y2: shift(self.y2, a),
        }
    }

    /// Box intersected with a `width` x `height` image.
    pub fn clamp_to(&self, width: usize, height: usize) -> Self {
        let max_x = width as i32 - 1;
        let max_y = height as i32 - 1;
        Self {
            x1: self.x1.clamp(0, max_x),
            y1: self.y1.clamp(0, max_y),
            x2: self.x2.clamp(0, max_x),
            y2: self.y2.clamp(0, max_y),
        }
    }

    pub fn width(&self) -> u32 {
        span(self.x1, self.x2)
    }

    pub fn height(&self) -> u32 {
        span(self.y1, self.y2)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Convert to `(x, y, width, height)`.
    pub fn to_xywh(&self) -> (i32, i32, u32, u32) {
        (self.x1, self.y1, self.width(), self.height())
    }
}

/// Inclusive extent of `lo..=hi`, saturating at `u32::MAX`.
fn span(lo: i32, hi: i32) -> u32 {
    (hi as i64 - lo as i64 + 1).clamp(0, u32::MAX as i64) as u32
}

/// Parameters of a single fill job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillParams {
    pub width: usize,
    pub height: usize,
    /// Seed X; fractional values are rounded to the nearest pixel.
    pub x: f64,
    /// Seed Y; fractional values are rounded to the nearest pixel.
    pub y: f64,
    /// Per-channel distance allowed between a pixel and the seed color.
    pub tolerance: f32,
    /// Dilation radius applied to the result mask, in pixels.
    pub grow: u32,
    /// Restrict the fill to pixels 4-connected to the seed.
    pub contiguous: bool,
}

impl FillParams {
    /// Contiguous fill at `(x, y)` with the default tolerance and no growth.
    pub fn new(width: usize, height: usize, x: f64, y: f64) -> Self {
        Self {
            width,
            height,
            x,
            y,
            tolerance: DEFAULT_TOLERANCE,
            grow: 0,
            contiguous: true,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_grow(mut self, grow: u32) -> Self {
        self.grow = grow;
        self
    }

    pub fn with_contiguous(mut self, contiguous: bool) -> Self {
        self.contiguous = contiguous;
        self
    }

    /// Number of pixels in the image, or `None` if it overflows `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

/// Fill result: a `{0, 255}` mask the size of the image plus its bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillResult {
    /// Selection mask (255 = selected, 0 = not selected)
    pub mask: Vec<u8>,
    pub bounds: Bounds,
}

impl FillResult {
    /// Number of selected pixels in the mask.
    pub fn selected_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v == SELECTED).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.mask.iter().any(|&v| v == SELECTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_include_and_size() {
        let mut b = Bounds::point(4, 4);
        b.include(2, 7);
        b.include(6, 3);
        assert_eq!(b, Bounds { x1: 2, y1: 3, x2: 6, y2: 7 });
        assert_eq!(b.to_xywh(), (2, 3, 5, 5));
        assert!(b.contains(6, 7));
        assert!(!b.contains(7, 7));
    }

    #[test]
    fn test_bounds_expand_is_unclamped() {
        let b = Bounds::point(0, 1).expand(3);
        assert_eq!(b, Bounds { x1: -3, y1: -2, x2: 3, y2: 4 });
        assert_eq!(b.clamp_to(10, 2), Bounds { x1: 0, y1: 0, x2: 3, y2: 1 });
    }

    #[test]
    fn test_bounds_expand_saturates() {
        let b = Bounds::point(5, 5).expand(u32::MAX);
        assert_eq!(b, Bounds { x1: i32::MIN, y1: i32::MIN, x2: i32::MAX, y2: i32::MAX });
        assert_eq!(b.width(), u32::MAX);
        assert_eq!(b.to_xywh(), (i32::MIN, i32::MIN, u32::MAX, u32::MAX));
    }

    #[test]
    fn test_params_builder() {
        let p = FillParams::new(8, 4, 1.5, 2.0)
            .with_tolerance(5.0)
            .with_grow(2)
            .with_contiguous(false);
        assert_eq!(p.pixel_count(), Some(32));
        assert_eq!(FillParams::new(usize::MAX, 2, 0.0, 0.0).pixel_count(), None);
        assert_eq!(p.tolerance, 5.0);
        assert_eq!(p.grow, 2);
        assert!(!p.contiguous);
    }
}
