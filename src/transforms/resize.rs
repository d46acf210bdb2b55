//! Resize: `width` / `height` (aliases `w` / `h`) with an optional `kernel`.
//!
//! One dimension keeps the aspect ratio of the image as it arrives at this
//! stage; both dimensions cover the box and center-crop to it. Dimensions are
//! computed when the transform runs, so an earlier rotate is accounted for.

use super::ImageTransform;
use super::kernel::effective_kernel;
use crate::context::FactoryContext;
use crate::engine::{ResizeParams, calculate_resize_dimensions};
use crate::parsers::{parse_dimension, parse_kernel};
use crate::query::TransformConfig;

pub fn resize(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw_width = ctx.use_param(config, "width");
    let raw_height = ctx.use_param(config, "height");
    let width = parse_dimension(raw_width);
    let height = parse_dimension(raw_height);

    if width.is_none() {
        ctx.ignore_invalid("width", raw_width);
    }
    if height.is_none() {
        ctx.ignore_invalid("height", raw_height);
    }
    if width.is_none() && height.is_none() {
        return None;
    }

    let raw_kernel = ctx.use_param(config, "kernel");
    let kernel = parse_kernel(raw_kernel);
    if kernel.is_none() {
        ctx.ignore_invalid("kernel", raw_kernel);
    }

    Some(ImageTransform::new("resize", move |image, metadata, engine| {
        let kernel = effective_kernel(kernel, metadata);
        let (target_width, target_height) =
            calculate_resize_dimensions((image.width(), image.height()), width, height);
        metadata.width = Some(target_width);
        metadata.height = Some(target_height);

        engine.resize(
            image,
            &ResizeParams {
                width: target_width,
                height: target_height,
                kernel,
                crop: width.is_some() && height.is_some(),
            },
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Kernel;
    use crate::engine::backend::tests::{MockEngine, RecordedOp};
    use crate::metadata::Metadata;
    use crate::test_helpers::{TestContext, config, run_on_mock, test_image};

    #[test]
    fn missing() {
        let test = TestContext::new();
        assert!(resize(&config(&[]), &test.ctx()).is_none());
    }

    #[test]
    fn kernel_alone_is_not_a_resize() {
        let test = TestContext::new();
        assert!(resize(&config(&[("kernel", "cubic")]), &test.ctx()).is_none());
    }

    #[test]
    fn invalid_dimensions_are_absent() {
        let test = TestContext::new();
        assert!(resize(&config(&[("width", "wide"), ("height", "0")]), &test.ctx()).is_none());
    }

    #[test]
    fn width_only_keeps_aspect() {
        let test = TestContext::new();
        let transform = resize(&config(&[("width", "8")]), &test.ctx()).unwrap();
        let (ops, metadata) = run_on_mock(transform);

        assert_eq!(
            ops,
            vec![RecordedOp::Resize {
                width: 8,
                height: 4,
                kernel: Kernel::Lanczos3,
                crop: false,
            }]
        );
        assert_eq!((metadata.width, metadata.height), (Some(8), Some(4)));
        assert_eq!(metadata.kernel, None);
    }

    #[test]
    fn short_aliases_and_both_dimensions_crop() {
        let test = TestContext::new();
        let transform = resize(&config(&[("w", "5"), ("h", "5"), ("kernel", "nearest")]), &test.ctx())
            .unwrap();
        let (ops, metadata) = run_on_mock(transform);

        assert_eq!(
            ops,
            vec![RecordedOp::Resize {
                width: 5,
                height: 5,
                kernel: Kernel::Nearest,
                crop: true,
            }]
        );
        assert_eq!(metadata.kernel, Some(Kernel::Nearest));
    }

    #[test]
    fn invalid_kernel_falls_back_without_dropping_resize() {
        let test = TestContext::new();
        let transform = resize(&config(&[("height", "4"), ("kernel", "bogus")]), &test.ctx())
            .unwrap();
        let (ops, _) = run_on_mock(transform);
        assert!(matches!(
            ops.as_slice(),
            [RecordedOp::Resize {
                width: 8,
                height: 4,
                kernel: Kernel::Lanczos3,
                ..
            }]
        ));
    }

    #[test]
    fn reuses_kernel_recorded_earlier() {
        let test = TestContext::new();
        let transform = resize(&config(&[("width", "4")]), &test.ctx()).unwrap();
        let engine = MockEngine::new();
        let mut metadata = Metadata {
            kernel: Some(Kernel::Mitchell),
            ..Metadata::default()
        };

        transform
            .apply(test_image(16, 8), &mut metadata, &engine)
            .unwrap();

        assert!(matches!(
            engine.get_operations().as_slice(),
            [RecordedOp::Resize {
                kernel: Kernel::Mitchell,
                ..
            }]
        ));
    }
}
