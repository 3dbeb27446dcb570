//! Pixel sources that fills can sample from.
//!
//! A source is whatever the host samples a fill from (a single layer or a
//! composited image); it only has to hand back RGBA rectangles.

use ndarray::{Array3, ArrayView3};

use crate::error::FillError;
use crate::selection::magic_wand::flood_fill;
use crate::selection::types::{FillParams, FillResult};

/// Readable RGBA raster.
pub trait PixelSource {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (usize, usize);

    /// Channels per pixel in the underlying storage. Fills need at least one.
    fn channels(&self) -> usize {
        4
    }

    /// Read a rectangle as flat RGBA bytes, row-major.
    ///
    /// The rectangle must lie inside the source.
    fn read_region(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<u8>;

    /// Read the whole source.
    fn read_all(&self) -> Vec<u8> {
        let (width, height) = self.dimensions();
        self.read_region(0, 0, width, height)
    }
}

impl PixelSource for ArrayView3<'_, u8> {
    fn dimensions(&self) -> (usize, usize) {
        let (height, width, _) = self.dim();
        (width, height)
    }

    fn channels(&self) -> usize {
        self.dim().2
    }

    fn read_region(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<u8> {
        let channels = self.dim().2;
        if channels == 0 {
            return vec![0; width * height * 4];
        }
        let mut out = Vec::with_capacity(width * height * 4);
        for row in y..y + height {
            for col in x..x + width {
                let at = |c: usize| self[[row, col, c]];
                let rgba = match channels {
                    1 => [at(0), at(0), at(0), 255],
                    2 => [at(0), at(0), at(0), at(1)],
                    3 => [at(0), at(1), at(2), 255],
                    _ => [at(0), at(1), at(2), at(3)],
                };
                out.extend_from_slice(&rgba);
            }
        }
        out
    }
}

impl PixelSource for Array3<u8> {
    fn dimensions(&self) -> (usize, usize) {
        self.view().dimensions()
    }

    fn channels(&self) -> usize {
        self.dim().2
    }

    fn read_region(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<u8> {
        self.view().read_region(x, y, width, height)
    }
}

/// Fill against a pixel source.
///
/// `params.width`/`params.height` are taken from the source.
pub fn flood_fill_source<S: PixelSource + ?Sized>(
    source: &S,
    constraint: Option<&[u8]>,
    params: &FillParams,
) -> Result<FillResult, FillError> {
    check_channels(source)?;
    let (width, height) = source.dimensions();
    let params = FillParams {
        width,
        height,
        ..*params
    };
    flood_fill(&source.read_all(), constraint, &params)
}

/// Reject sources without any channel data.
pub fn check_channels<S: PixelSource + ?Sized>(source: &S) -> Result<(), FillError> {
    match source.channels() {
        0 => Err(FillError::UnsupportedChannels(0)),
        _ => Ok(()),
    }
}
