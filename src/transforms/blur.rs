//! Blur: `blur`, `blur=true` or `blur=<sigma>`.

use super::ImageTransform;
use crate::context::FactoryContext;
use crate::parsers::parse_intensity;
use crate::query::TransformConfig;

pub fn blur(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw = ctx.use_param(config, "blur");
    let Some(amount) = parse_intensity(raw) else {
        ctx.ignore_invalid("blur", raw);
        return None;
    };

    Some(ImageTransform::new("blur", move |image, metadata, engine| {
        metadata.blur = Some(amount);
        engine.blur(image, amount)
    }))
}
