//! Transform factories and option helpers.
//!
//! A factory turns the request's [`TransformConfig`] into at most one bound
//! operation:
//!
//! ```text
//! factory(config, ctx) -> Option<ImageTransform>
//! ```
//!
//! `None` means "not requested or not valid" and simply leaves the operation
//! out of the pipeline. `Some` carries a closure whose parameters have
//! already passed their [`parsers`](crate::parsers) rule; when applied it
//! records its decision in the [`Metadata`] and then calls the engine.
//!
//! Transform *options* ([`get_kernel`], [`get_chroma_subsampling`]) are the
//! synchronous cousins: they validate, write the metadata record and return
//! the value directly, for callers that need the answer before a transform
//! runs.
//!
//! | Factory | Keys | Engine call |
//! |---|---|---|
//! | [`resize`] | `width` `height` `kernel` | `resize` |
//! | [`rotate`] | `rotate` | `rotate` |
//! | [`flip`] / [`flop`] | `flip` / `flop` | `flip` / `flop` |
//! | [`median`] | `median` | `median` |
//! | [`blur`] | `blur` | `blur` |
//! | [`hsb`] | `hue` `saturation` `brightness` | `modulate` |
//! | [`grayscale`] | `grayscale` | `grayscale` |
//! | [`invert`] | `invert` | `invert` |

mod blur;
mod flip;
mod grayscale;
mod hsb;
mod invert;
mod kernel;
mod median;
mod resize;
mod rotate;
mod subsampling;

pub use blur::blur;
pub use flip::{flip, flop};
pub use grayscale::grayscale;
pub use hsb::hsb;
pub use invert::invert;
pub use kernel::{KERNEL_VALUES, effective_kernel, get_kernel};
pub use median::median;
pub use resize::resize;
pub use rotate::rotate;
pub use subsampling::get_chroma_subsampling;

use crate::context::FactoryContext;
use crate::engine::{EngineError, ImageEngine};
use crate::metadata::Metadata;
use crate::query::TransformConfig;
use image::DynamicImage;
use std::fmt;

type ApplyFn = dyn FnOnce(DynamicImage, &mut Metadata, &dyn ImageEngine) -> Result<DynamicImage, EngineError>
    + Send;

/// An operation bound to validated parameters, consumed once by the pipeline.
pub struct ImageTransform {
    name: &'static str,
    apply: Box<ApplyFn>,
}

impl ImageTransform {
    pub fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: FnOnce(DynamicImage, &mut Metadata, &dyn ImageEngine) -> Result<DynamicImage, EngineError>
            + Send
            + 'static,
    {
        Self {
            name,
            apply: Box::new(apply),
        }
    }

    /// Name of the factory that produced this transform.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(
        self,
        image: DynamicImage,
        metadata: &mut Metadata,
        engine: &dyn ImageEngine,
    ) -> Result<DynamicImage, EngineError> {
        (self.apply)(image, metadata, engine)
    }
}

impl fmt::Debug for ImageTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// `factory(config, ctx) -> Option<ImageTransform>`.
pub type TransformFactory = fn(&TransformConfig, &FactoryContext<'_>) -> Option<ImageTransform>;

/// `option(config, metadata) -> Option<T>`, recording the value it returns.
pub type TransformOption<T> = fn(&TransformConfig, &mut Metadata) -> Option<T>;

/// A factory and the name it is enabled by in configuration.
#[derive(Clone, Copy)]
pub struct NamedFactory {
    pub name: &'static str,
    pub factory: TransformFactory,
}

impl fmt::Debug for NamedFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NamedFactory").field(&self.name).finish()
    }
}

/// Every built-in factory, in the order their transforms are applied.
///
/// Geometry first so the pixel filters run on the final canvas.
pub const BUILTIN_FACTORIES: &[NamedFactory] = &[
    NamedFactory {
        name: "resize",
        factory: resize,
    },
    NamedFactory {
        name: "rotate",
        factory: rotate,
    },
    NamedFactory {
        name: "flip",
        factory: flip,
    },
    NamedFactory {
        name: "flop",
        factory: flop,
    },
    NamedFactory {
        name: "median",
        factory: median,
    },
    NamedFactory {
        name: "blur",
        factory: blur,
    },
    NamedFactory {
        name: "hsb",
        factory: hsb,
    },
    NamedFactory {
        name: "grayscale",
        factory: grayscale,
    },
    NamedFactory {
        name: "invert",
        factory: invert,
    },
];

/// Look up a built-in factory by name.
pub fn builtin_factory(name: &str) -> Option<NamedFactory> {
    BUILTIN_FACTORIES.iter().find(|f| f.name == name).copied()
}

/// Run every factory in order and keep the transforms that were produced.
pub fn generate_transforms(
    factories: &[NamedFactory],
    config: &TransformConfig,
    ctx: &FactoryContext<'_>,
) -> Vec<ImageTransform> {
    factories
        .iter()
        .filter_map(|named| (named.factory)(config, ctx))
        .collect()
}
