//! Pure Rust engine: `image` plus `imageproc`, no system libraries.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | Encode (JPEG, PNG, TIFF, WebP) | `image::DynamicImage::save_with_format` |
//! | Default blur | `image::DynamicImage::filter3x3` (3x3 box) |
//! | Gaussian blur | `image::DynamicImage::blur` |
//! | Modulate | per-pixel HSV math in [`calculations`](super::calculations) |
//! | Median | `imageproc::filter::median_filter` |
//! | Resize | `image::DynamicImage::resize_exact` / `resize_to_fill` |
//! | Rotate (quarter turns) | `image::DynamicImage::rotate90/180/270` |
//! | Rotate (other angles) | `imageproc::geometric_transformations::rotate_about_center` |
//! | Flip / flop | `image::DynamicImage::flipv` / `fliph` |
//! | Grayscale / invert | `image::DynamicImage::grayscale` / `invert` |
//!
//! ## Kernel mapping
//!
//! The `image` crate ships fewer resampling filters than the kernel names
//! accepted on the query string, so `mitchell` resamples with Catmull-Rom
//! (both are cubic BC-splines) and `lanczos2` with Lanczos3.

use super::backend::{EngineError, ImageEngine};
use super::calculations::{median_radius, modulate_rgb, normalize_degrees};
use super::params::{BlurAmount, Kernel, Modulation, ResizeParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use std::path::Path;

/// Extensions with decoders and encoders compiled in.
const FORMATS: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

const BOX_3X3: [f32; 9] = [1.0 / 9.0; 9];

/// Largest resize target, in pixels (100 megapixels).
pub const MAX_PIXELS: u64 = 100_000_000;

/// Longest side of `image`, at least 1.
fn longest_side(image: &DynamicImage) -> u32 {
    image.width().max(image.height()).max(1)
}

/// Returns the image file extensions the engine can read and write.
pub fn supported_extensions() -> Vec<&'static str> {
    FORMATS.iter().map(|(ext, _)| *ext).collect()
}

fn format_for(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension()?.to_str()?;
    FORMATS
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|(_, fmt)| *fmt)
}

/// Load and decode an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, EngineError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            EngineError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save an image, inferring the format from the path's extension.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<(), EngineError> {
    let format = format_for(path).ok_or_else(|| {
        EngineError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        )
    })?;

    // JPEG has no alpha channel.
    if format == ImageFormat::Jpeg && image.color().has_alpha() {
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        return Ok(rgb.save_with_format(path, format)?);
    }
    Ok(image.save_with_format(path, format)?)
}

fn filter_for(kernel: Kernel) -> FilterType {
    match kernel {
        Kernel::Nearest => FilterType::Nearest,
        Kernel::Cubic | Kernel::Mitchell => FilterType::CatmullRom,
        Kernel::Lanczos2 | Kernel::Lanczos3 => FilterType::Lanczos3,
    }
}

/// Pure Rust engine using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustEngine;

impl RustEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageEngine for RustEngine {
    fn blur(&self, image: DynamicImage, amount: BlurAmount) -> Result<DynamicImage, EngineError> {
        match amount {
            BlurAmount::Default => Ok(image.filter3x3(&BOX_3X3)),
            BlurAmount::Sigma(sigma) if sigma > 0.0 && sigma.is_finite() => {
                // Cap so the kernel is no wider than the image.
                let sigma = sigma.min(longest_side(&image) as f32 / 3.0);
                Ok(image.blur(sigma))
            }
            BlurAmount::Sigma(sigma) => Err(EngineError::ProcessingFailed(format!(
                "Invalid blur sigma: {sigma}"
            ))),
        }
    }

    fn modulate(
        &self,
        image: DynamicImage,
        modulation: Modulation,
    ) -> Result<DynamicImage, EngineError> {
        if modulation.is_identity() {
            return Ok(image);
        }
        let mut rgba = image.into_rgba8();
        for pixel in rgba.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let [r, g, b] = modulate_rgb(
                [r, g, b],
                modulation.hue,
                modulation.saturation,
                modulation.brightness,
            );
            *pixel = Rgba([r, g, b, a]);
        }
        Ok(DynamicImage::ImageRgba8(rgba))
    }

    fn median(&self, image: DynamicImage, size: u32) -> Result<DynamicImage, EngineError> {
        if size == 0 {
            return Err(EngineError::ProcessingFailed(
                "Median window size must be positive".into(),
            ));
        }
        let radius = median_radius(size).min(longest_side(&image));
        let rgba = image.into_rgba8();
        Ok(DynamicImage::ImageRgba8(imageproc::filter::median_filter(
            &rgba, radius, radius,
        )))
    }

    fn resize(
        &self,
        image: DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, EngineError> {
        if params.width == 0 || params.height == 0 {
            return Err(EngineError::ProcessingFailed(format!(
                "Invalid resize target {}x{}",
                params.width, params.height
            )));
        }
        let pixels = u64::from(params.width).checked_mul(u64::from(params.height));
        if pixels.is_none_or(|p| p > MAX_PIXELS) {
            return Err(EngineError::ProcessingFailed(format!(
                "Resize target {}x{} exceeds {MAX_PIXELS} pixels",
                params.width, params.height
            )));
        }
        let filter = filter_for(params.kernel);
        if params.crop {
            Ok(image.resize_to_fill(params.width, params.height, filter))
        } else {
            Ok(image.resize_exact(params.width, params.height, filter))
        }
    }

    fn rotate(&self, image: DynamicImage, degrees: f32) -> Result<DynamicImage, EngineError> {
        if !degrees.is_finite() {
            return Err(EngineError::ProcessingFailed(format!(
                "Invalid rotation: {degrees}"
            )));
        }
        let normalized = normalize_degrees(degrees);
        if normalized == 0.0 {
            return Ok(image);
        }
        if normalized == 90.0 {
            return Ok(image.rotate90());
        }
        if normalized == 180.0 {
            return Ok(image.rotate180());
        }
        if normalized == 270.0 {
            return Ok(image.rotate270());
        }

        let rgba = image.into_rgba8();
        let rotated = rotate_about_center(
            &rgba,
            normalized.to_radians(),
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        );
        Ok(DynamicImage::ImageRgba8(rotated))
    }

    fn flip(&self, image: DynamicImage) -> Result<DynamicImage, EngineError> {
        Ok(image.flipv())
    }

    fn flop(&self, image: DynamicImage) -> Result<DynamicImage, EngineError> {
        Ok(image.fliph())
    }

    fn grayscale(&self, image: DynamicImage) -> Result<DynamicImage, EngineError> {
        Ok(image.grayscale())
    }

    fn invert(&self, mut image: DynamicImage) -> Result<DynamicImage, EngineError> {
        image.invert();
        Ok(image)
    }
}
