//! Pure calculation functions for dimensions and colour math.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate resize target dimensions.
///
/// # Arguments
/// * `source` - Current image dimensions (width, height)
/// * `width` - Requested width, if any
/// * `height` - Requested height, if any
///
/// # Returns
/// * `(width, height)` - With one side requested, the other follows the
///   source aspect ratio (never below 1px). With both, they are used as is.
///   With neither, the source dimensions are returned.
///
/// # Examples
/// ```
/// # use querypix::engine::calculate_resize_dimensions;
/// assert_eq!(calculate_resize_dimensions((800, 600), Some(400), None), (400, 300));
/// assert_eq!(calculate_resize_dimensions((800, 600), None, Some(150)), (200, 150));
/// assert_eq!(calculate_resize_dimensions((800, 600), Some(100), Some(100)), (100, 100));
/// ```
pub fn calculate_resize_dimensions(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let (src_w, src_h) = source;

    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let h = (src_h as f64 * w as f64 / src_w.max(1) as f64).round() as u32;
            (w, h.max(1))
        }
        (None, Some(h)) => {
            let w = (src_w as f64 * h as f64 / src_h.max(1) as f64).round() as u32;
            (w.max(1), h)
        }
        (None, None) => source,
    }
}

/// Normalise an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let d = degrees % 360.0;
    if d < 0.0 { d + 360.0 } else { d }
}

/// Convert 8-bit RGB to HSV with `h` in degrees and `s`, `v` in `[0, 1]`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> (f32, f32, f32) {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    (normalize_degrees(h), s, max)
}

/// Convert HSV back to 8-bit RGB. Out-of-range `s`/`v` are clamped.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = normalize_degrees(h);
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}

/// Apply a hue rotation and saturation/brightness multipliers to one pixel.
pub fn modulate_rgb(rgb: [u8; 3], hue: f32, saturation: f32, brightness: f32) -> [u8; 3] {
    let (h, s, v) = rgb_to_hsv(rgb);
    hsv_to_rgb(h + hue, s * saturation, v * brightness)
}

/// Median window radius for a square window of `size` pixels.
pub fn median_radius(size: u32) -> u32 {
    size / 2
}
