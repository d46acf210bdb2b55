//! The pure-Rust image engine the pipeline drives.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image::ImageReader`, `save_with_format` |
//! | **Blur, resize, flips, grayscale, invert** | `image::DynamicImage` |
//! | **Median, arbitrary rotation** | `imageproc` |
//! | **Hue / saturation / brightness** | HSV math in `calculations` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and colour math (unit testable)
//! - **Parameters**: Data structures describing engine operations
//! - **Backend**: [`ImageEngine`] trait + [`EngineError`]
//! - **Rust engine**: [`RustEngine`] and file load/save helpers

pub mod backend;
mod calculations;
mod params;
pub mod rust_engine;

pub use backend::{EngineError, ImageEngine};
pub use calculations::calculate_resize_dimensions;
pub use params::{BlurAmount, ChromaSubsampling, Kernel, Modulation, ResizeParams};
pub use rust_engine::{RustEngine, load_image, save_image, supported_extensions};
