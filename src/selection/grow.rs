//! Selection growth (mask dilation).
//!
//! Expands a fill mask outward by a fixed number of pixels in a single pass
//! over the selection bounds. Boundary pixels push rectangles of `grow`
//! pixels outward along each open side, and square blocks out of each convex
//! corner, instead of repeating a 1-pixel dilation `grow` times.

use rayon::prelude::*;

use crate::selection::types::{Bounds, SELECTED};

/// Scratch value for pixels added during the growth pass.
///
/// Lies outside `{0, 255}` so pixels added earlier in the pass are never
/// taken for original selection by pixels visited later.
const GROW_MARK: u8 = 128;

/// Neighbour offsets, clockwise from north.
const NEIGHBOURS: [(i32, i32); 8] = [
    (0, -1),  // 0: north
    (1, -1),  // 1: north-east
    (1, 0),   // 2: east
    (1, 1),   // 3: south-east
    (0, 1),   // 4: south
    (-1, 1),  // 5: south-west
    (-1, 0),  // 6: west
    (-1, -1), // 7: north-west
];

/// Grow the selection in `mask` by `grow` pixels.
///
/// # Arguments
/// * `mask` - Selection mask (255 = selected), modified in place
/// * `width` - Mask width
/// * `height` - Mask height
/// * `bounds` - Bounds of the selected pixels; only this box is scanned
/// * `grow` - Growth radius in pixels
///
/// # Returns
/// `bounds` widened by `grow` on every side. The result is not clamped to
/// the image and may be looser than the grown selection.
pub fn grow_mask(mask: &mut [u8], width: usize, height: usize, bounds: Bounds, grow: u32) -> Bounds {
    if grow == 0 || width == 0 || height == 0 {
        return bounds;
    }

    // Any radius past the longer side already reaches every pixel.
    let reach = (grow as usize).min(width.max(height));
    let g = reach as i32;
    let scan = bounds.clamp_to(width, height);

    for y in scan.y1..=scan.y2 {
        for x in scan.x1..=scan.x2 {
            if !is_original(mask, width, height, x, y) {
                continue;
            }

            let mut open = [false; 8];
            for (i, &(dx, dy)) in NEIGHBOURS.iter().enumerate() {
                open[i] = !is_original(mask, width, height, x + dx, y + dy);
            }

            // Sides
            if open[0] {
                mark_rect(mask, width, height, x, y - g, x, y - 1);
            }
            if open[2] {
                mark_rect(mask, width, height, x + 1, y, x + g, y);
            }
            if open[4] {
                mark_rect(mask, width, height, x, y + 1, x, y + g);
            }
            if open[6] {
                mark_rect(mask, width, height, x - g, y, x - 1, y);
            }

            // Convex corners need the diagonal and both sides around it open
            if open[0] && open[1] && open[2] {
                mark_rect(mask, width, height, x + 1, y - g, x + g, y - 1);
            }
            if open[2] && open[3] && open[4] {
                mark_rect(mask, width, height, x + 1, y + 1, x + g, y + g);
            }
            if open[4] && open[5] && open[6] {
                mark_rect(mask, width, height, x - g, y + 1, x - 1, y + g);
            }
            if open[6] && open[7] && open[0] {
                mark_rect(mask, width, height, x - g, y - g, x - 1, y - 1);
            }
        }
    }

    let expanded = bounds.expand(grow);
    let work = expanded.clamp_to(width, height);
    let (x1, x2) = (work.x1 as usize, work.x2 as usize);

    mask.par_chunks_mut(width)
        .skip(work.y1 as usize)
        .take(work.height() as usize)
        .for_each(|row| {
            for v in &mut row[x1..=x2] {
                if *v == GROW_MARK {
                    *v = SELECTED;
                }
            }
        });

    expanded
}

/// Selected before this growth pass (out-of-image counts as unselected).
#[inline]
fn is_original(mask: &[u8], width: usize, height: usize, x: i32, y: i32) -> bool {
    x >= 0
        && y >= 0
        && (x as usize) < width
        && (y as usize) < height
        && mask[y as usize * width + x as usize] == SELECTED
}

/// Mark unselected pixels in the inclusive rectangle, clamped to the image.
fn mark_rect(mask: &mut [u8], width: usize, height: usize, x1: i32, y1: i32, x2: i32, y2: i32) {
    let x1 = x1.max(0);
    let y1 = y1.max(0);
    let x2 = x2.min(width as i32 - 1);
    let y2 = y2.min(height as i32 - 1);
    if x1 > x2 || y1 > y2 {
        return;
    }

    for y in y1 as usize..=y2 as usize {
        let row = &mut mask[y * width..(y + 1) * width];
        for v in &mut row[x1 as usize..=x2 as usize] {
            if *v == 0 {
                *v = GROW_MARK;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(mask: &[u8]) -> usize {
        mask.iter().filter(|&&v| v == SELECTED).count()
    }

    fn single_pixel(width: usize, height: usize, x: usize, y: usize) -> (Vec<u8>, Bounds) {
        let mut mask = vec![0u8; width * height];
        mask[y * width + x] = SELECTED;
        (mask, Bounds::point(x as i32, y as i32))
    }

    #[test]
    fn test_single_pixel_grows_to_square() {
        let (mut mask, bounds) = single_pixel(10, 10, 5, 5);
        let grown = grow_mask(&mut mask, 10, 10, bounds, 2);

        assert_eq!(grown, Bounds { x1: 3, y1: 3, x2: 7, y2: 7 });
        assert_eq!(count(&mask), 25);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (3..=7).contains(&x) && (3..=7).contains(&y);
                assert_eq!(mask[y * 10 + x] == SELECTED, inside, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_grow_zero_is_noop() {
        let (mut mask, bounds) = single_pixel(10, 10, 5, 5);
        let before = mask.clone();
        assert_eq!(grow_mask(&mut mask, 10, 10, bounds, 0), bounds);
        assert_eq!(mask, before);
    }

    #[test]
    fn test_huge_grow_covers_image_and_saturates_bounds() {
        for grow in [u32::MAX, 3_000_000_000, i32::MAX as u32] {
            let (mut mask, bounds) = single_pixel(10, 10, 5, 5);
            let grown = grow_mask(&mut mask, 10, 10, bounds, grow);

            assert_eq!(count(&mask), 100, "grow {grow}");
            assert!(grown.x1 <= grown.x2 && grown.y1 <= grown.y2);
            assert!(grown.contains(0, 0) && grown.contains(9, 9));
            assert_eq!(grown, bounds.expand(grow));
        }

        let (mut mask, bounds) = single_pixel(10, 10, 5, 5);
        let grown = grow_mask(&mut mask, 10, 10, bounds, i32::MAX as u32);
        assert_eq!(grown.x2, i32::MAX);
        assert_eq!(grown.x1, 5 - i32::MAX);
    }

    #[test]
    fn test_grow_clamps_to_image_but_bounds_do_not() {
        let (mut mask, bounds) = single_pixel(6, 6, 0, 0);
        let grown = grow_mask(&mut mask, 6, 6, bounds, 2);

        assert_eq!(grown, Bounds { x1: -2, y1: -2, x2: 2, y2: 2 });
        assert_eq!(count(&mask), 9);
    }

    #[test]
    fn test_line_grows_to_rectangle() {
        let mut mask = vec![0u8; 10 * 10];
        for x in 2..=7 {
            mask[5 * 10 + x] = SELECTED;
        }
        let bounds = Bounds { x1: 2, y1: 5, x2: 7, y2: 5 };
        grow_mask(&mut mask, 10, 10, bounds, 1);

        assert_eq!(count(&mask), 24);
        for y in 4..=6 {
            for x in 1..=8 {
                assert_eq!(mask[y * 10 + x], SELECTED);
            }
        }
    }

    #[test]
    fn test_grow_leaves_no_scratch_values() {
        let mut mask = vec![0u8; 20 * 20];
        for &(x, y) in &[(3, 3), (4, 3), (10, 12), (15, 4), (15, 5), (16, 5)] {
            mask[y * 20 + x] = SELECTED;
        }
        let bounds = Bounds { x1: 3, y1: 3, x2: 16, y2: 12 };
        grow_mask(&mut mask, 20, 20, bounds, 3);

        assert!(mask.iter().all(|&v| v == 0 || v == SELECTED));
    }

    #[test]
    fn test_grow_is_monotonic() {
        // L-shaped selection
        let mut base = vec![0u8; 24 * 24];
        for i in 8..16 {
            base[i * 24 + 8] = SELECTED;
            base[15 * 24 + i] = SELECTED;
        }
        let bounds = Bounds { x1: 8, y1: 8, x2: 15, y2: 15 };

        let mut previous = base.clone();
        for g in 1..6 {
            let mut mask = base.clone();
            grow_mask(&mut mask, 24, 24, bounds, g);
            for (i, (&now, &before)) in mask.iter().zip(previous.iter()).enumerate() {
                assert!(before != SELECTED || now == SELECTED, "grow {g} lost pixel {i}");
            }
            assert!(count(&mask) > count(&previous));
            previous = mask;
        }
    }
}
