//! Image engine trait and shared error type.
//!
//! The [`ImageEngine`] trait is the contract the pipeline consumes from the
//! pixel engine: every named operation takes the image by value and returns
//! the resulting image, or an [`EngineError`] that aborts the pipeline.
//!
//! The production implementation is
//! [`RustEngine`](super::rust_engine::RustEngine), built on the `image` and
//! `imageproc` crates.

use super::params::{BlurAmount, Modulation, ResizeParams};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Operations every engine must support.
///
/// Operations are synchronous: a call returns once the work is complete,
/// which is what lets the pipeline guarantee strict ordering.
pub trait ImageEngine: Sync {
    /// Blur with the engine default or a Gaussian sigma.
    fn blur(&self, image: DynamicImage, amount: BlurAmount) -> Result<DynamicImage, EngineError>;

    /// Rotate hue and scale saturation/brightness in one pass.
    fn modulate(
        &self,
        image: DynamicImage,
        modulation: Modulation,
    ) -> Result<DynamicImage, EngineError>;

    /// Median filter with a square window of `size` pixels.
    fn median(&self, image: DynamicImage, size: u32) -> Result<DynamicImage, EngineError>;

    fn resize(
        &self,
        image: DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, EngineError>;

    /// Rotate clockwise by `degrees`.
    fn rotate(&self, image: DynamicImage, degrees: f32) -> Result<DynamicImage, EngineError>;

    /// Mirror vertically (top becomes bottom).
    fn flip(&self, image: DynamicImage) -> Result<DynamicImage, EngineError>;

    /// Mirror horizontally (left becomes right).
    fn flop(&self, image: DynamicImage) -> Result<DynamicImage, EngineError>;

    fn grayscale(&self, image: DynamicImage) -> Result<DynamicImage, EngineError>;

    fn invert(&self, image: DynamicImage) -> Result<DynamicImage, EngineError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::engine::params::Kernel;
    use std::sync::Mutex;

    /// Mock engine that records operations without touching pixels.
    ///
    /// Resize returns a blank image of the requested size so dimension
    /// chaining can be asserted. `fail_on` makes the named operation error.
    #[derive(Default)]
    pub struct MockEngine {
        pub operations: Mutex<Vec<RecordedOp>>,
        pub fail_on: Option<&'static str>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Blur(BlurAmount),
        Modulate(Modulation),
        Median(u32),
        Resize {
            width: u32,
            height: u32,
            kernel: Kernel,
            crop: bool,
        },
        Rotate(f32),
        Flip,
        Flop,
        Grayscale,
        Invert,
    }

    impl RecordedOp {
        fn name(&self) -> &'static str {
            match self {
                RecordedOp::Blur(_) => "blur",
                RecordedOp::Modulate(_) => "modulate",
                RecordedOp::Median(_) => "median",
                RecordedOp::Resize { .. } => "resize",
                RecordedOp::Rotate(_) => "rotate",
                RecordedOp::Flip => "flip",
                RecordedOp::Flop => "flop",
                RecordedOp::Grayscale => "grayscale",
                RecordedOp::Invert => "invert",
            }
        }
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(op: &'static str) -> Self {
            Self {
                operations: Mutex::new(Vec::new()),
                fail_on: Some(op),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) -> Result<(), EngineError> {
            let name = op.name();
            self.operations.lock().unwrap().push(op);
            if self.fail_on == Some(name) {
                return Err(EngineError::ProcessingFailed(format!("mock {name} failure")));
            }
            Ok(())
        }
    }

    impl ImageEngine for MockEngine {
        fn blur(
            &self,
            image: DynamicImage,
            amount: BlurAmount,
        ) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Blur(amount))?;
            Ok(image)
        }

        fn modulate(
            &self,
            image: DynamicImage,
            modulation: Modulation,
        ) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Modulate(modulation))?;
            Ok(image)
        }

        fn median(&self, image: DynamicImage, size: u32) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Median(size))?;
            Ok(image)
        }

        fn resize(
            &self,
            _image: DynamicImage,
            params: &ResizeParams,
        ) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Resize {
                width: params.width,
                height: params.height,
                kernel: params.kernel,
                crop: params.crop,
            })?;
            Ok(DynamicImage::new_rgba8(params.width, params.height))
        }

        fn rotate(&self, image: DynamicImage, degrees: f32) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Rotate(degrees))?;
            Ok(image)
        }

        fn flip(&self, image: DynamicImage) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Flip)?;
            Ok(image)
        }

        fn flop(&self, image: DynamicImage) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Flop)?;
            Ok(image)
        }

        fn grayscale(&self, image: DynamicImage) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Grayscale)?;
            Ok(image)
        }

        fn invert(&self, image: DynamicImage) -> Result<DynamicImage, EngineError> {
            self.record(RecordedOp::Invert)?;
            Ok(image)
        }
    }

    #[test]
    fn mock_records_blur() {
        let engine = MockEngine::new();
        engine
            .blur(DynamicImage::new_rgb8(4, 4), BlurAmount::Sigma(2.0))
            .unwrap();

        let ops = engine.get_operations();
        assert_eq!(ops, vec![RecordedOp::Blur(BlurAmount::Sigma(2.0))]);
    }

    #[test]
    fn mock_resize_returns_target_dimensions() {
        let engine = MockEngine::new();
        let out = engine
            .resize(
                DynamicImage::new_rgb8(40, 20),
                &ResizeParams {
                    width: 10,
                    height: 5,
                    kernel: Kernel::Cubic,
                    crop: false,
                },
            )
            .unwrap();

        assert_eq!((out.width(), out.height()), (10, 5));
        assert!(matches!(
            &engine.get_operations()[0],
            RecordedOp::Resize {
                width: 10,
                height: 5,
                kernel: Kernel::Cubic,
                crop: false,
            }
        ));
    }

    #[test]
    fn mock_fails_on_requested_operation() {
        let engine = MockEngine::failing_on("median");
        let result = engine.median(DynamicImage::new_rgb8(4, 4), 3);
        assert!(matches!(result, Err(EngineError::ProcessingFailed(_))));
        assert_eq!(engine.get_operations(), vec![RecordedOp::Median(3)]);
    }
}
