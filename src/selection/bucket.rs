//! Paint bucket: write a solid color through a fill mask.

use crate::error::FillError;
use crate::selection::types::{FillResult, SELECTED};

/// Paint `color` into every pixel selected by `fill`.
///
/// Only the part of `fill.bounds` inside the image is visited, so grown
/// bounds that overhang the edges are safe to pass through unchanged.
///
/// # Arguments
/// * `pixels` - RGBA image data (4 bytes per pixel), modified in place
/// * `width` - Image width
/// * `height` - Image height
/// * `fill` - Result of a fill over the same image
/// * `color` - RGBA color to paint
///
/// # Returns
/// Number of pixels painted
pub fn paint_bucket(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    fill: &FillResult,
    color: [u8; 4],
) -> Result<usize, FillError> {
    let too_large = || FillError::ImageTooLarge { width, height };
    let area = width.checked_mul(height).ok_or_else(too_large)?;
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
    if fill.mask.len() != area {
        return Err(FillError::MaskLength {
            expected: area,
            actual: fill.mask.len(),
        });
    }

    let b = fill.bounds.clamp_to(width, height);
    let mut painted = 0;
    for y in b.y1 as usize..=b.y2 as usize {
        for x in b.x1 as usize..=b.x2 as usize {
            let idx = y * width + x;
            if fill.mask[idx] == SELECTED {
                pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color);
                painted += 1;
            }
        }
    }

    Ok(painted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::magic_wand::flood_fill;
    use crate::selection::types::FillParams;

    #[test]
    fn test_bucket_fills_region_only() {
        // 4x1: two white then two black
        let mut image = [[255u8, 255, 255, 255], [255, 255, 255, 255], [0, 0, 0, 255], [0, 0, 0, 255]].concat();
        let params = FillParams::new(4, 1, 0.0, 0.0).with_tolerance(0.0);
        let fill = flood_fill(&image, None, &params).unwrap();

        let painted = paint_bucket(&mut image, 4, 1, &fill, [10, 20, 30, 40]).unwrap();

        assert_eq!(painted, 2);
        assert_eq!(&image[..8], &[10, 20, 30, 40, 10, 20, 30, 40]);
        assert_eq!(&image[8..], &[0, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_bucket_with_grown_bounds_past_edge() {
        let mut image = vec![0u8; 3 * 3 * 4];
        let params = FillParams::new(3, 3, 0.0, 0.0).with_tolerance(0.0).with_grow(4);
        let fill = flood_fill(&image, None, &params).unwrap();
        assert!(fill.bounds.x1 < 0);

        let painted = paint_bucket(&mut image, 3, 3, &fill, [1, 1, 1, 1]).unwrap();
        assert_eq!(painted, 9);
        assert!(image.iter().all(|&v| v == 1));
    }

    #[test]
    fn test_bucket_rejects_mismatched_mask() {
        let mut image = vec![0u8; 16];
        let params = FillParams::new(2, 2, 0.0, 0.0);
        let mut fill = flood_fill(&image, None, &params).unwrap();
        fill.mask.pop();

        assert_eq!(
            paint_bucket(&mut image, 2, 2, &fill, [0; 4]),
            Err(FillError::MaskLength { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn test_bucket_rejects_oversized_dimensions() {
        let mut image = vec![0u8; 16];
        let fill = flood_fill(&image, None, &FillParams::new(2, 2, 0.0, 0.0)).unwrap();

        assert_eq!(
            paint_bucket(&mut image, usize::MAX, 3, &fill, [0; 4]),
            Err(FillError::ImageTooLarge { width: usize::MAX, height: 3 })
        );
    }
}
