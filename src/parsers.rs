//! Option parsers: raw query value → validated typed value.
//!
//! Every parser takes `Option<&str>` (absent or raw) and returns `Option<T>`.
//! Parsers never fail: malformed input is `None`, exactly like absence, so a
//! bad parameter can only ever remove its own operation from the pipeline.
//!
//! | Family | Parser | Absent | `""` | `"true"` | Invalid |
//! |---|---|---|---|---|---|
//! | Intensity (blur) | [`parse_intensity`] | `None` | default | default | `None` |
//! | Signed (hue, rotate) | [`parse_signed`] | `None` | `None` | `None` | `None` |
//! | Ratio (saturation, brightness) | [`parse_ratio`] | `None` | `None` | `None` | `None` |
//! | Window (median, decimal or `0x` hex) | [`parse_window`] | `None` | `None` | `None` | `None` |
//! | Dimension (width, height) | [`parse_dimension`] | `None` | `None` | `None` | `None` |
//! | Flag (flip, grayscale, …) | [`parse_flag`] | `None` | `true` | `true` | `None` |
//! | Enumerated (kernel, subsampling) | [`parse_kernel`], [`parse_subsampling`] | `None` | `None` | `None` | `None` |

use crate::engine::{BlurAmount, ChromaSubsampling, Kernel};

const ENABLE_KEYWORD: &str = "true";

/// Parse a finite float, rejecting NaN and infinities.
fn parse_finite(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Blur-style intensity.
///
/// `""` and `"true"` enable the engine default. Otherwise the value is a
/// sigma; anything that is not a strictly positive number is dropped.
pub fn parse_intensity(raw: Option<&str>) -> Option<BlurAmount> {
    let raw = raw?;
    if raw.is_empty() || raw == ENABLE_KEYWORD {
        return Some(BlurAmount::Default);
    }
    parse_finite(raw)
        .filter(|sigma| *sigma > 0.0)
        .map(BlurAmount::Sigma)
}

/// Signed amount such as hue degrees or a rotation angle. Negative is fine.
pub fn parse_signed(raw: Option<&str>) -> Option<f32> {
    raw.filter(|r| !r.is_empty()).and_then(parse_finite)
}

/// Non-negative multiplier such as saturation or brightness.
pub fn parse_ratio(raw: Option<&str>) -> Option<f32> {
    parse_signed(raw).filter(|v| *v >= 0.0)
}

/// Median window size.
///
/// Lenient like an integer prefix parse: leading digits are taken and the
/// rest ignored (`"3.7"` → 3, `"5px"` → 5). A `0x` prefix switches to hex
/// (`"0x10"` → 16). Zero is treated as absent.
pub fn parse_window(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim_start();
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    let hex = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"));

    let size = match hex {
        Some(rest) => {
            let digits = rest.split(|c: char| !c.is_ascii_hexdigit()).next()?;
            u32::from_str_radix(digits, 16).ok()?
        }
        None => {
            let digits = unsigned.split(|c: char| !c.is_ascii_digit()).next()?;
            digits.parse::<u32>().ok()?
        }
    };
    Some(size).filter(|size| *size > 0)
}

/// Positive pixel dimension. The whole value must be an integer.
pub fn parse_dimension(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Boolean switch: present as `""` or `"true"` turns it on.
pub fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw? {
        "" | ENABLE_KEYWORD => Some(true),
        _ => None,
    }
}

/// Resampling kernel, one of [`Kernel::ALL`] by exact name.
pub fn parse_kernel(raw: Option<&str>) -> Option<Kernel> {
    Kernel::from_name(raw?)
}

/// Chroma subsampling, `4:2:0` or `4:4:4`.
pub fn parse_subsampling(raw: Option<&str>) -> Option<ChromaSubsampling> {
    ChromaSubsampling::from_name(raw?)
}
