//! Mirroring: `flip` (vertical) and `flop` (horizontal).

use super::ImageTransform;
use crate::context::FactoryContext;
use crate::parsers::parse_flag;
use crate::query::TransformConfig;

pub fn flip(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw = ctx.use_param(config, "flip");
    if parse_flag(raw).is_none() {
        ctx.ignore_invalid("flip", raw);
        return None;
    }

    Some(ImageTransform::new("flip", |image, metadata, engine| {
        metadata.flip = true;
        engine.flip(image)
    }))
}

pub fn flop(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw = ctx.use_param(config, "flop");
    if parse_flag(raw).is_none() {
        ctx.ignore_invalid("flop", raw);
        return None;
    }

    Some(ImageTransform::new("flop", |image, metadata, engine| {
        metadata.flop = true;
        engine.flop(image)
    }))
}
