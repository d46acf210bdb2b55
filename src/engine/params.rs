//! Parameter types for engine operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the transform factories (which validate raw query
//! values into these types) and the [`backend`](super::backend) (which does
//! the actual pixel work). This separation allows swapping engines (e.g. a
//! recording mock in tests) without changing transform logic.
//!
//! ## Types
//!
//! - [`BlurAmount`]: engine default blur, or a Gaussian sigma.
//! - [`Modulation`]: hue rotation plus saturation/brightness multipliers.
//! - [`Kernel`]: resampling kernel name, one of a fixed set.
//! - [`ChromaSubsampling`]: encoder hint recorded in the metadata.
//! - [`ResizeParams`]: target dimensions, kernel and crop behaviour.

use serde::{Serialize, Serializer};
use std::fmt;

/// Blur strength.
///
/// `Default` is the engine's mild fixed blur (a 3x3 box filter), requested
/// with `blur` / `blur=true`. `Sigma` is a Gaussian blur of the given
/// standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlurAmount {
    Default,
    Sigma(f32),
}

impl Serialize for BlurAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlurAmount::Default => serializer.serialize_bool(true),
            BlurAmount::Sigma(sigma) => serializer.serialize_f32(*sigma),
        }
    }
}

/// Hue/saturation/brightness adjustment applied in a single engine call.
///
/// `hue` is a rotation in degrees; `saturation` and `brightness` are
/// multipliers where `1.0` leaves the channel unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Default for Modulation {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 1.0,
            brightness: 1.0,
        }
    }
}

impl Modulation {
    /// True when applying this modulation would not change any pixel.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Resampling kernel used by resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    Nearest,
    Cubic,
    Mitchell,
    Lanczos2,
    #[default]
    Lanczos3,
}

impl Kernel {
    /// Every recognised kernel, in documentation order.
    pub const ALL: [Kernel; 5] = [
        Kernel::Nearest,
        Kernel::Cubic,
        Kernel::Mitchell,
        Kernel::Lanczos2,
        Kernel::Lanczos3,
    ];

    /// The query-string name of the kernel.
    pub fn as_str(self) -> &'static str {
        match self {
            Kernel::Nearest => "nearest",
            Kernel::Cubic => "cubic",
            Kernel::Mitchell => "mitchell",
            Kernel::Lanczos2 => "lanczos2",
            Kernel::Lanczos3 => "lanczos3",
        }
    }

    /// Exact, case-sensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chroma subsampling hint for the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChromaSubsampling {
    #[serde(rename = "4:2:0")]
    Yuv420,
    #[serde(rename = "4:4:4")]
    Yuv444,
}

impl ChromaSubsampling {
    pub const ALL: [ChromaSubsampling; 2] = [ChromaSubsampling::Yuv420, ChromaSubsampling::Yuv444];

    pub fn as_str(self) -> &'static str {
        match self {
            ChromaSubsampling::Yuv420 => "4:2:0",
            ChromaSubsampling::Yuv444 => "4:4:4",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a resize operation.
///
/// When `crop` is set the image is scaled to cover `width`x`height` and
/// center-cropped to exactly those dimensions; otherwise it is scaled to
/// them directly (callers compute aspect-preserving dimensions up front).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub kernel: Kernel,
    pub crop: bool,
}
