//! # querypix
//!
//! Query-string driven image transforms. A request such as
//! `?width=400&median=3&hue=90&blur` becomes an ordered list of bound
//! operations that run one after another against an image engine.
//!
//! # Architecture: Parse, Plan, Apply
//!
//! ```text
//! 1. Parse   "?w=400&blur"      →  TransformConfig   (flat key → raw value)
//! 2. Plan    TransformConfig    →  [ImageTransform]  (factories + parsers)
//! 3. Apply   [ImageTransform]   →  TransformResult   (image + Metadata)
//! ```
//!
//! Planning never fails. Every factory reads its keys, validates them with a
//! [`parsers`] rule and either produces one transform or nothing at all, so a
//! malformed value can only remove its own operation. Applying is strictly
//! sequential; the only errors are the ones the engine reports.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`query`] | `SearchParams` (multi-value, ordered) and the flat `TransformConfig` |
//! | [`parsers`] | Raw value → typed value rules shared by every factory |
//! | [`context`] | `FactoryContext`: alias-aware parameter lookup and the logging sink |
//! | [`transforms`] | One factory per operation, plus transform options (`get_kernel`, …) |
//! | [`metadata`] | Per-image record of decisions, shared by later transforms and the encoder |
//! | [`pipeline`] | Sequential executor, configured `Pipeline` and parallel batches |
//! | [`engine`] | `ImageEngine` trait and the pure-Rust implementation |
//! | [`config`] | `querypix.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Describe, Don't Execute
//!
//! Factories only *describe* work: a transform is a closure over already
//! validated values. The [`engine::ImageEngine`] trait does the pixels. Tests
//! swap in a recording engine and assert on the exact operation sequence
//! without decoding a single file.
//!
//! ## Metadata Beside the Image
//!
//! Decisions such as the chosen kernel or final dimensions travel in an
//! explicit [`metadata::Metadata`] record passed by `&mut`, never attached to
//! the image itself. Later transforms read it; the encoder reads it last.
//!
//! ## Pure-Rust Imaging
//!
//! The engine uses the `image` crate for decoding, encoding and resampling
//! and `imageproc` for the median filter and arbitrary-angle rotation. No
//! system libraries are required.

pub mod config;
pub mod context;
pub mod engine;
pub mod metadata;
pub mod output;
pub mod parsers;
pub mod pipeline;
pub mod query;
pub mod transforms;

#[cfg(test)]
pub(crate) mod test_helpers;
