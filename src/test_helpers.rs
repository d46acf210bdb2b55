//! Shared test utilities for the querypix test suite.
//!
//! Provides an owned factory context, a config builder, and a helper that
//! runs a single transform against a [`MockEngine`].
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let test = TestContext::new();
//! let transform = blur(&config(&[("blur", "5")]), &test.ctx()).unwrap();
//! let (ops, metadata) = run_on_mock(transform);
//! assert_eq!(metadata.blur, Some(BlurAmount::Sigma(5.0)));
//! ```

use crate::context::{FactoryContext, MemoryLogger, ParamAliases};
use crate::engine::backend::tests::{MockEngine, RecordedOp};
use crate::metadata::Metadata;
use crate::query::{SearchParams, TransformConfig};
use crate::transforms::ImageTransform;
use image::DynamicImage;

/// Owns everything a [`FactoryContext`] borrows.
pub struct TestContext {
    pub params: SearchParams,
    pub aliases: ParamAliases,
    pub logger: MemoryLogger,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            params: SearchParams::new(),
            aliases: ParamAliases::builtin(),
            logger: MemoryLogger::new(),
        }
    }

    pub fn ctx(&self) -> FactoryContext<'_> {
        FactoryContext::new(&self.params, &self.aliases, &self.logger)
    }
}

/// Build a config from literal pairs.
pub fn config(pairs: &[(&str, &str)]) -> TransformConfig {
    pairs.iter().copied().collect()
}

/// A small opaque test image.
pub fn test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::new_rgb8(width, height)
}

/// Apply one transform to a 16x8 image on a mock engine.
///
/// Returns the recorded engine operations and the resulting metadata.
pub fn run_on_mock(transform: ImageTransform) -> (Vec<RecordedOp>, Metadata) {
    let engine = MockEngine::new();
    let mut metadata = Metadata::new();
    transform
        .apply(test_image(16, 8), &mut metadata, &engine)
        .unwrap();
    (engine.get_operations(), metadata)
}
