//! ImageStag Fill
//!
//! Flood fill engine for magic wand selections and paint bucket fills,
//! with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Fills read flat RGBA `u8` buffers (row-major, 4 bytes per pixel) and
//! produce a selection mask of one byte per pixel:
//! - **255**: selected
//! - **0**: not selected
//!
//! An optional constraint mask of the same shape restricts which pixels may
//! be selected (0 = excluded), e.g. an existing selection.
//!
//! ## Execution
//! [`selection::flood_fill`] runs on the calling thread.
//! [`dispatch::FillDispatcher`] moves the same work to a background worker
//! and falls back to the calling thread when no worker can be used.

pub mod dispatch;
pub mod error;
pub mod logging;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use dispatch::{ChannelState, DispatchConfig, FillDispatcher};
pub use error::{DispatchError, FillError};
pub use selection::{flood_fill, Bounds, FillParams, FillResult};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::Array2;
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2, PyReadonlyArray3, PyReadwriteArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::dispatch::{DispatchConfig, FillDispatcher};
    use crate::selection::bucket;
    use crate::selection::source::flood_fill_source;
    use crate::selection::types::{FillParams, FillResult, DEFAULT_TOLERANCE};

    type PyFill<'py> = (Bound<'py, PyArray2<u8>>, (i32, i32, i32, i32));

    fn value_error(err: impl std::fmt::Display) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn fill_params(x: f64, y: f64, tolerance: f32, grow: u32, contiguous: bool) -> FillParams {
        // Width/height come from the image array
        FillParams::new(0, 0, x, y)
            .with_tolerance(tolerance)
            .with_grow(grow)
            .with_contiguous(contiguous)
    }

    fn constraint_vec(mask: Option<PyReadonlyArray2<'_, u8>>) -> Option<Vec<u8>> {
        mask.map(|m| m.as_array().iter().copied().collect())
    }

    fn into_py<'py>(py: Python<'py>, height: usize, width: usize, result: FillResult) -> PyResult<PyFill<'py>> {
        let b = result.bounds;
        let mask = Array2::from_shape_vec((height, width), result.mask).map_err(value_error)?;
        Ok((mask.into_pyarray(py), (b.x1, b.y1, b.x2, b.y2)))
    }

    // ========================================================================
    // Magic Wand
    // ========================================================================

    /// Magic wand selection on an RGBA (or gray/RGB) u8 image.
    ///
    /// Returns `(mask, (x1, y1, x2, y2))` where mask is (height, width) u8
    /// with 255 for selected pixels. Bounds are inclusive and may extend
    /// past the image when `grow` > 0.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, tolerance=DEFAULT_TOLERANCE, grow=0, contiguous=true, mask=None))]
    #[allow(clippy::too_many_arguments)]
    pub fn flood_fill<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x: f64,
        y: f64,
        tolerance: f32,
        grow: u32,
        contiguous: bool,
        mask: Option<PyReadonlyArray2<'py, u8>>,
    ) -> PyResult<PyFill<'py>> {
        let view = image.as_array();
        let (height, width, _) = view.dim();
        let constraint = constraint_vec(mask);
        let params = fill_params(x, y, tolerance, grow, contiguous);

        let result = flood_fill_source(&view, constraint.as_deref(), &params).map_err(value_error)?;
        into_py(py, height, width, result)
    }

    // ========================================================================
    // Paint Bucket
    // ========================================================================

    /// Paint bucket fill on an RGBA u8 image, in place.
    ///
    /// Returns the number of pixels painted.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, color, tolerance=DEFAULT_TOLERANCE, contiguous=true))]
    pub fn paint_bucket<'py>(
        mut image: PyReadwriteArray3<'py, u8>,
        x: f64,
        y: f64,
        color: (u8, u8, u8, u8),
        tolerance: f32,
        contiguous: bool,
    ) -> PyResult<usize> {
        let mut view = image.as_array_mut();
        let (height, width, channels) = view.dim();
        if channels != 4 {
            return Err(PyValueError::new_err("paint_bucket requires an RGBA image"));
        }
        let pixels = view
            .as_slice_mut()
            .ok_or_else(|| PyValueError::new_err("image must be C-contiguous"))?;

        let params = FillParams { width, height, ..fill_params(x, y, tolerance, 0, contiguous) };
        let fill = crate::selection::flood_fill(pixels, None, &params).map_err(value_error)?;
        bucket::paint_bucket(pixels, width, height, &fill, [color.0, color.1, color.2, color.3])
            .map_err(value_error)
    }

    // ========================================================================
    // Background Worker
    // ========================================================================

    /// Runs fills on a background worker thread, releasing the GIL while
    /// waiting. Falls back to the calling thread if no worker is available.
    #[pyclass]
    pub struct FillWorker {
        dispatcher: FillDispatcher,
    }

    #[pymethods]
    impl FillWorker {
        #[new]
        #[pyo3(signature = (background=true))]
        fn new(background: bool) -> Self {
            let config = DispatchConfig::from_env();
            let config = if background { config } else { config.with_background(false) };
            Self {
                dispatcher: FillDispatcher::new(config),
            }
        }

        #[pyo3(signature = (image, x, y, tolerance=DEFAULT_TOLERANCE, grow=0, contiguous=true, mask=None))]
        #[allow(clippy::too_many_arguments)]
        fn fill<'py>(
            &self,
            py: Python<'py>,
            image: PyReadonlyArray3<'py, u8>,
            x: f64,
            y: f64,
            tolerance: f32,
            grow: u32,
            contiguous: bool,
            mask: Option<PyReadonlyArray2<'py, u8>>,
        ) -> PyResult<PyFill<'py>> {
            let view = image.as_array();
            let (height, width, _) = view.dim();
            let constraint = constraint_vec(mask);
            let params = fill_params(x, y, tolerance, grow, contiguous);

            let pending = self.dispatcher.submit_source(&view, constraint.as_deref(), params);
            let result = py
                .allow_threads(|| futures::executor::block_on(pending))
                .map_err(value_error)?;
            into_py(py, height, width, result)
        }

        fn is_background_available(&self) -> bool {
            self.dispatcher.is_background_available()
        }

        fn teardown(&self) {
            self.dispatcher.teardown();
        }
    }

    // ========================================================================
    // Module Definition
    // ========================================================================

    #[pymodule]
    pub fn imagestag_fill(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(flood_fill, m)?)?;
        m.add_function(wrap_pyfunction!(paint_bucket, m)?)?;
        m.add_class::<FillWorker>()?;
        Ok(())
    }
}
