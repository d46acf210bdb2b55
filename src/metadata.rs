//! Per-image metadata side-channel.
//!
//! Every pipeline run owns exactly one [`Metadata`] record. It travels next to
//! the image (by `&mut`, never hidden inside the image handle) and collects
//! the decisions transforms make, so that:
//!
//! - **later transforms** can observe earlier ones (a resize that names no
//!   kernel reuses the kernel an earlier stage recorded), and
//! - **the encoder** downstream can finish its own decisions (chroma
//!   subsampling hint, chosen kernel, final dimensions).
//!
//! ## Write discipline
//!
//! A transform records its derived value *before* it calls the engine. Fields
//! are only ever set or overwritten, never cleared, until the final image
//! leaves the pipeline.
//!
//! ## Serialization
//!
//! The record serializes to a flat JSON object with unset fields omitted, so
//! an untouched record is `{}`.

use crate::engine::{BlurAmount, ChromaSubsampling, Kernel};
use serde::Serialize;

/// Decisions recorded by transforms for later stages and the encoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<BlurAmount>,
    /// Hue rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// Resampling kernel chosen for resize operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel: Option<Kernel>,
    /// Median filter window size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroma_subsampling: Option<ChromaSubsampling>,
    /// Clockwise rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub flip: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub flop: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub grayscale: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub invert: bool,
    /// Output width after the last resize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Output height after the last resize.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with the chroma subsampling of the decoded source.
    pub fn with_chroma_subsampling(subsampling: ChromaSubsampling) -> Self {
        Self {
            chroma_subsampling: Some(subsampling),
            ..Self::default()
        }
    }

    /// True when no transform has recorded anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_empty() {
        assert!(Metadata::new().is_empty());
    }

    #[test]
    fn empty_record_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&Metadata::new()).unwrap(), "{}");
    }

    #[test]
    fn set_fields_serialize_camel_case() {
        let meta = Metadata {
            kernel: Some(Kernel::Cubic),
            median: Some(3),
            chroma_subsampling: Some(ChromaSubsampling::Yuv444),
            flip: true,
            ..Metadata::default()
        };
        let json: serde_json::Value = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["kernel"], "cubic");
        assert_eq!(json["median"], 3);
        assert_eq!(json["chromaSubsampling"], "4:4:4");
        assert_eq!(json["flip"], true);
        assert!(json.get("flop").is_none());
    }

    #[test]
    fn seeded_record_is_not_empty() {
        let meta = Metadata::with_chroma_subsampling(ChromaSubsampling::Yuv420);
        assert!(!meta.is_empty());
        assert_eq!(meta.chroma_subsampling, Some(ChromaSubsampling::Yuv420));
    }
}
