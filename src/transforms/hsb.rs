//! Hue, saturation and brightness, applied together in one engine call.
//!
//! Each of the three keys is optional and validated independently. The
//! transform exists when at least one of them is valid; missing components
//! leave their channel untouched.

use super::ImageTransform;
use crate::context::FactoryContext;
use crate::engine::Modulation;
use crate::parsers::{parse_ratio, parse_signed};
use crate::query::TransformConfig;

pub fn hsb(config: &TransformConfig, ctx: &FactoryContext<'_>) -> Option<ImageTransform> {
    let raw_hue = ctx.use_param(config, "hue");
    let raw_saturation = ctx.use_param(config, "saturation");
    let raw_brightness = ctx.use_param(config, "brightness");

    let hue = parse_signed(raw_hue);
    let saturation = parse_ratio(raw_saturation);
    let brightness = parse_ratio(raw_brightness);

    if hue.is_none() {
        ctx.ignore_invalid("hue", raw_hue);
    }
    if saturation.is_none() {
        ctx.ignore_invalid("saturation", raw_saturation);
    }
    if brightness.is_none() {
        ctx.ignore_invalid("brightness", raw_brightness);
    }

    if hue.is_none() && saturation.is_none() && brightness.is_none() {
        return None;
    }

    let identity = Modulation::default();
    let modulation = Modulation {
        hue: hue.unwrap_or(identity.hue),
        saturation: saturation.unwrap_or(identity.saturation),
        brightness: brightness.unwrap_or(identity.brightness),
    };

    Some(ImageTransform::new("hsb", move |image, metadata, engine| {
        if hue.is_some() {
            metadata.hue = hue;
        }
        if saturation.is_some() {
            metadata.saturation = saturation;
        }
        if brightness.is_some() {
            metadata.brightness = brightness;
        }
        engine.modulate(image, modulation)
    }))
}
