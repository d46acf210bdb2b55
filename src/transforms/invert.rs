use super::ImageTransform;
use crate::context::FactoryContext;
use crate::parsers::parse_flag;
use crate::query::TransformConfig;

pub fn invert(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw = ctx.use_param(config, "invert");
    if parse_flag(raw).is_none() {
        ctx.ignore_invalid("invert", raw);
        return None;
    }

    Some(ImageTransform::new("invert", |image, metadata, engine| {
        metadata.invert = true;
        engine.invert(image)
    }))
}
