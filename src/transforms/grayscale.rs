//! Grayscale: `grayscale` / `grayscale=true`.

use super::ImageTransform;
use crate::context::FactoryContext;
use crate::parsers::parse_flag;
use crate::query::TransformConfig;

pub fn grayscale(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw = ctx.use_param(config, "grayscale");
    if parse_flag(raw).is_none() {
        ctx.ignore_invalid("grayscale", raw);
        return None;
    }

    Some(ImageTransform::new("grayscale", |image, metadata, engine| {
        metadata.grayscale = true;
        engine.grayscale(image)
    }))
}
