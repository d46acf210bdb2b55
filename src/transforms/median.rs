//! Median filter: `median=<window size>`.

use super::ImageTransform;
use crate::context::FactoryContext;
use crate::parsers::parse_window;
use crate::query::TransformConfig;

pub fn median(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw = ctx.use_param(config, "median");
    let Some(size) = parse_window(raw) else {
        ctx.ignore_invalid("median", raw);
        return None;
    };

    Some(ImageTransform::new("median", move |image, metadata, engine| {
        metadata.median = Some(size);
        engine.median(image, size)
    }))
}
