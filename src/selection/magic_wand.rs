//! Magic wand selection using flood fill.
//!
//! Selects pixels whose color lies within a tolerance of the seed pixel,
//! either the 4-connected region around the seed (contiguous) or every
//! matching pixel in the image.

use crate::error::FillError;
use crate::selection::grow::grow_mask;
use crate::selection::types::{Bounds, FillParams, FillResult, SELECTED};

/// Run a fill job: select, then grow the selection if requested.
///
/// # Arguments
/// * `pixels` - RGBA image data (4 bytes per pixel, row-major)
/// * `constraint` - Optional mask; pixels where it is 0 are never selected
/// * `params` - Image size, seed, tolerance, growth and connectivity
///
/// # Returns
/// Selection mask (0/255) with the bounds of the selected pixels
pub fn flood_fill(
    pixels: &[u8],
    constraint: Option<&[u8]>,
    params: &FillParams,
) -> Result<FillResult, FillError> {
    let (seed_x, seed_y) = validate(pixels, constraint, params)?;

    let mut result = select_region(
        pixels,
        constraint,
        params.width,
        params.height,
        seed_x,
        seed_y,
        params.tolerance,
        params.contiguous,
    );

    if params.grow > 0 {
        result.bounds = grow_mask(
            &mut result.mask,
            params.width,
            params.height,
            result.bounds,
            params.grow,
        );
    }

    Ok(result)
}

/// Check a job's inputs and return the rounded seed pixel.
pub fn validate(
    pixels: &[u8],
    constraint: Option<&[u8]>,
    params: &FillParams,
) -> Result<(usize, usize), FillError> {
    let too_large = || FillError::ImageTooLarge {
        width: params.width,
        height: params.height,
    };
    let area = params.pixel_count().ok_or_else(too_large)?;
    if area == 0 {
        return Err(FillError::EmptyImage);
    }
    let expected = area.checked_mul(4).ok_or_else(too_large)?;
    if pixels.len() != expected {
        return Err(FillError::BufferLength {
            expected,
            actual: pixels.len(),
        });
    }
    if let Some(mask) = constraint {
        if mask.len() != area {
            return Err(FillError::MaskLength {
                expected: area,
                actual: mask.len(),
            });
        }
    }
    if params.tolerance.is_nan() || params.tolerance < 0.0 {
        return Err(FillError::InvalidTolerance(params.tolerance));
    }
    resolve_seed(params.x, params.y, params.width, params.height)
}

/// Round seed coordinates to the nearest pixel (halves round up).
pub fn resolve_seed(
    x: f64,
    y: f64,
    width: usize,
    height: usize,
) -> Result<(usize, usize), FillError> {
    let rx = (x + 0.5).floor();
    let ry = (y + 0.5).floor();

    let in_range = |v: f64, limit: usize| v >= 0.0 && v < limit as f64;
    if !in_range(rx, width) || !in_range(ry, height) {
        return Err(FillError::SeedOutOfBounds {
            x,
            y,
            width,
            height,
        });
    }

    Ok((rx as usize, ry as usize))
}

/// Check if a color matches the reference color within tolerance.
///
/// Every channel must satisfy `(c - ref)^2 <= tolerance^2`.
pub fn color_matches(color: [u8; 4], reference: [u8; 4], tolerance: f32) -> bool {
    ColorMatcher::new(reference, tolerance).matches(color)
}

#[derive(Debug, Clone, Copy)]
struct ColorMatcher {
    target: [u8; 4],
    packed: u32,
    tolerance_sq: f32,
    exact: bool,
}

impl ColorMatcher {
    fn new(target: [u8; 4], tolerance: f32) -> Self {
        Self {
            target,
            packed: u32::from_ne_bytes(target),
            tolerance_sq: tolerance * tolerance,
            exact: tolerance == 0.0,
        }
    }

    #[inline]
    fn matches(&self, color: [u8; 4]) -> bool {
        if u32::from_ne_bytes(color) == self.packed {
            return true;
        }
        if self.exact {
            return false;
        }
        color.iter().zip(self.target.iter()).all(|(&c, &t)| {
            let d = c as f32 - t as f32;
            d * d <= self.tolerance_sq
        })
    }
}

#[inline(always)]
fn pixel_at(pixels: &[u8], idx: usize) -> [u8; 4] {
    let o = idx * 4;
    [pixels[o], pixels[o + 1], pixels[o + 2], pixels[o + 3]]
}

/// Selection without growth. Inputs must already be validated.
#[allow(clippy::too_many_arguments)]
fn select_region(
    pixels: &[u8],
    constraint: Option<&[u8]>,
    width: usize,
    height: usize,
    seed_x: usize,
    seed_y: usize,
    tolerance: f32,
    contiguous: bool,
) -> FillResult {
    let mut mask = vec![0u8; width * height];
    let seed_idx = seed_y * width + seed_x;
    let matcher = ColorMatcher::new(pixel_at(pixels, seed_idx), tolerance);
    let mut bounds = Bounds::point(seed_x as i32, seed_y as i32);

    let eligible = |idx: usize| {
        constraint.map_or(true, |m| m[idx] != 0) && matcher.matches(pixel_at(pixels, idx))
    };

    if contiguous {
        if !eligible(seed_idx) {
            return FillResult { mask, bounds };
        }

        // Explicit stack of flat indices; the mask doubles as the visited set.
        let mut stack: Vec<usize> = Vec::with_capacity(4096);
        mask[seed_idx] = SELECTED;
        stack.push(seed_idx);

        while let Some(idx) = stack.pop() {
            let x = idx % width;
            let y = idx / width;
            bounds.include(x as i32, y as i32);

            // Left
            if x > 0 {
                let ni = idx - 1;
                if mask[ni] == 0 && eligible(ni) {
                    mask[ni] = SELECTED;
                    stack.push(ni);
                }
            }
            // Right
            if x + 1 < width {
                let ni = idx + 1;
                if mask[ni] == 0 && eligible(ni) {
                    mask[ni] = SELECTED;
                    stack.push(ni);
                }
            }
            // Up
            if y > 0 {
                let ni = idx - width;
                if mask[ni] == 0 && eligible(ni) {
                    mask[ni] = SELECTED;
                    stack.push(ni);
                }
            }
            // Down
            if y + 1 < height {
                let ni = idx + width;
                if mask[ni] == 0 && eligible(ni) {
                    mask[ni] = SELECTED;
                    stack.push(ni);
                }
            }
        }
    } else {
        // Non-contiguous - select all matching pixels in the image
        for y in 0..height {
            let row = y * width;
            for x in 0..width {
                if eligible(row + x) {
                    mask[row + x] = SELECTED;
                    bounds.include(x as i32, y as i32);
                }
            }
        }
    }

    FillResult { mask, bounds }
}
