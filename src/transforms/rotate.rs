//! Rotate: `rotate=<degrees>`, clockwise, negative for counter-clockwise.

use super::ImageTransform;
use crate::context::FactoryContext;
use crate::parsers::parse_signed;
use crate::query::TransformConfig;

pub fn rotate(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw = ctx.use_param(config, "rotate");
    let Some(degrees) = parse_signed(raw) else {
        ctx.ignore_invalid("rotate", raw);
        return None;
    };

    Some(ImageTransform::new("rotate", move |image, metadata, engine| {
        metadata.rotate = Some(degrees);
        engine.rotate(image, degrees)
    }))
}
