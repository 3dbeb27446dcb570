//! Selection algorithms for image editing.
//!
//! This module provides the fill engine behind magic wand selections and
//! paint bucket fills:
//! - **Magic wand**: Seed-based color/tolerance selection, contiguous or global
//! - **Grow**: Single-pass dilation of a fill mask
//! - **Bucket**: Painting a color through a fill mask
//!
//! Masks are row-major `u8` buffers, one byte per pixel, 255 = selected.

pub mod bucket;
pub mod grow;
pub mod magic_wand;
pub mod source;
pub mod types;

pub use bucket::paint_bucket;
pub use grow::grow_mask;
pub use magic_wand::{color_matches, flood_fill};
pub use source::{flood_fill_source, PixelSource};
pub use types::{Bounds, FillParams, FillResult};
