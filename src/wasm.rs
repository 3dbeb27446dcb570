//! WebAssembly exports for ImageStag fills.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Threads are
//! not available to the module, so fills run on the calling thread; hosts
//! that want them off the main thread load the module inside a Web Worker.

use wasm_bindgen::prelude::*;

use crate::selection::bucket::paint_bucket;
use crate::selection::magic_wand::flood_fill;
use crate::selection::types::{FillParams, FillResult};

/// Fill result handed to JavaScript.
#[wasm_bindgen]
pub struct WasmFillResult {
    mask: Vec<u8>,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

#[wasm_bindgen]
impl WasmFillResult {
    /// Selection mask (255 = selected), one byte per pixel
    #[wasm_bindgen(getter)]
    pub fn mask(&self) -> Vec<u8> {
        self.mask.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn x1(&self) -> i32 {
        self.x1
    }

    #[wasm_bindgen(getter)]
    pub fn y1(&self) -> i32 {
        self.y1
    }

    #[wasm_bindgen(getter)]
    pub fn x2(&self) -> i32 {
        self.x2
    }

    #[wasm_bindgen(getter)]
    pub fn y2(&self) -> i32 {
        self.y2
    }
}

impl From<FillResult> for WasmFillResult {
    fn from(result: FillResult) -> Self {
        let b = result.bounds;
        Self {
            mask: result.mask,
            x1: b.x1,
            y1: b.y1,
            x2: b.x2,
            y2: b.y2,
        }
    }
}

fn params(
    width: usize,
    height: usize,
    x: f64,
    y: f64,
    tolerance: f32,
    grow: u32,
    contiguous: bool,
) -> FillParams {
    FillParams::new(width, height, x, y)
        .with_tolerance(tolerance)
        .with_grow(grow)
        .with_contiguous(contiguous)
}

/// Magic wand / flood fill selection.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `mask` - Optional constraint mask (length = width * height), 0 = excluded
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `x`, `y` - Seed position; rounded to the nearest pixel
/// * `tolerance` - Per-channel tolerance (0-255)
/// * `grow` - Growth radius in pixels
/// * `contiguous` - Only select pixels connected to the seed
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn flood_fill_wasm(
    data: &[u8],
    mask: Option<Vec<u8>>,
    width: usize,
    height: usize,
    x: f64,
    y: f64,
    tolerance: f32,
    grow: u32,
    contiguous: bool,
) -> Result<WasmFillResult, JsValue> {
    let params = params(width, height, x, y, tolerance, grow, contiguous);
    flood_fill(data, mask.as_deref(), &params)
        .map(WasmFillResult::from)
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Paint bucket fill, modifying `data` in place.
///
/// # Returns
/// Number of pixels painted
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn paint_bucket_wasm(
    data: &mut [u8],
    width: usize,
    height: usize,
    x: f64,
    y: f64,
    tolerance: f32,
    contiguous: bool,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
) -> Result<usize, JsValue> {
    let params = params(width, height, x, y, tolerance, 0, contiguous);
    let fill = flood_fill(data, None, &params).map_err(|err| JsValue::from_str(&err.to_string()))?;
    paint_bucket(data, width, height, &fill, [r, g, b, a]).map_err(|err| JsValue::from_str(&err.to_string()))
}
