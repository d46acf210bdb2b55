//! Pipeline executor.
//!
//! ```text
//! query string ─▶ TransformConfig ─▶ factories ─▶ [ImageTransform] ─▶ apply_transforms
//!                                                                      │
//!                                  image + Metadata::default() ────────┘
//!                                                                      ▼
//!                                                        TransformResult { image, metadata }
//! ```
//!
//! ## Ordering
//!
//! Transforms run strictly in list order. Each receives the image the
//! previous one returned and the same `&mut Metadata`, so a later transform
//! sees everything earlier ones recorded. A step finishes before the next
//! one starts; there is never more than one operation in flight for an image.
//!
//! ## Failure
//!
//! The executor does no validation of its own. The first engine error aborts
//! the run and is returned unchanged; remaining transforms are dropped.
//!
//! ## Batches
//!
//! [`Pipeline::process_batch`] runs many independent requests in parallel
//! using [rayon](https://docs.rs/rayon). Each request has its own image and
//! metadata; nothing mutable is shared between them.

use crate::config::{ConfigError, PipelineConfig};
use crate::context::{FactoryContext, Logger, ParamAliases};
use crate::engine::{EngineError, ImageEngine};
use crate::metadata::Metadata;
use crate::query::{SearchParams, TransformConfig};
use crate::transforms::{
    BUILTIN_FACTORIES, ImageTransform, NamedFactory, builtin_factory, generate_transforms,
    get_chroma_subsampling,
};
use image::DynamicImage;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Final image plus everything transforms recorded along the way.
#[derive(Debug)]
pub struct TransformResult {
    pub image: DynamicImage,
    pub metadata: Metadata,
}

/// Apply `transforms` in order, starting from an empty metadata record.
pub fn apply_transforms(
    transforms: Vec<ImageTransform>,
    image: DynamicImage,
    engine: &dyn ImageEngine,
) -> Result<TransformResult, EngineError> {
    apply_transforms_with(transforms, image, Metadata::new(), engine)
}

/// Apply `transforms` in order on top of an already seeded metadata record.
pub fn apply_transforms_with(
    transforms: Vec<ImageTransform>,
    image: DynamicImage,
    mut metadata: Metadata,
    engine: &dyn ImageEngine,
) -> Result<TransformResult, EngineError> {
    let mut image = image;
    for transform in transforms {
        log::debug!(target: "querypix", "applying {}", transform.name());
        image = transform.apply(image, &mut metadata, engine)?;
    }
    Ok(TransformResult { image, metadata })
}

/// A configured set of factories, alias rules and parameter defaults.
#[derive(Debug, Clone)]
pub struct Pipeline {
    factories: Vec<NamedFactory>,
    aliases: ParamAliases,
    defaults: BTreeMap<String, String>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Every built-in factory, built-in aliases, no defaults.
    pub fn new() -> Self {
        Self {
            factories: BUILTIN_FACTORIES.to_vec(),
            aliases: ParamAliases::builtin(),
            defaults: BTreeMap::new(),
        }
    }

    /// Build from a validated configuration file.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let factories = config
            .pipeline
            .enabled
            .iter()
            .map(|name| {
                builtin_factory(name).ok_or_else(|| {
                    ConfigError::Validation(format!("unknown transform `{name}`"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut aliases = ParamAliases::empty();
        aliases.override_with(&config.aliases);

        Ok(Self {
            factories,
            aliases,
            defaults: config.defaults.clone(),
        })
    }

    pub fn factories(&self) -> &[NamedFactory] {
        &self.factories
    }

    pub fn aliases(&self) -> &ParamAliases {
        &self.aliases
    }

    /// Request config with configured defaults filled in under the query.
    ///
    /// A default is dropped when the query sets its key under any spelling,
    /// canonical or alias.
    pub fn config_for(&self, params: &SearchParams) -> TransformConfig {
        let mut config = TransformConfig::new();
        for (key, value) in &self.defaults {
            if self.query_sets(params, key) {
                continue;
            }
            config.insert(key.as_str(), value.as_str());
        }
        for (key, value) in params.iter() {
            config.insert(key, value);
        }
        config
    }

    fn query_sets(&self, params: &SearchParams, canonical: &str) -> bool {
        params.get(canonical).is_some()
            || self
                .aliases
                .aliases_for(canonical)
                .iter()
                .any(|alias| params.get(&alias.key).is_some())
    }

    /// The transforms a request would run, in order.
    pub fn plan(&self, params: &SearchParams, logger: &dyn Logger) -> Vec<ImageTransform> {
        let config = self.config_for(params);
        let ctx = FactoryContext::new(params, &self.aliases, logger);
        generate_transforms(&self.factories, &config, &ctx)
    }

    /// Plan and run one request.
    ///
    /// Transform options that only feed the encoder (chroma subsampling) are
    /// resolved first and seed the metadata record.
    pub fn run(
        &self,
        params: &SearchParams,
        image: DynamicImage,
        engine: &dyn ImageEngine,
        logger: &dyn Logger,
    ) -> Result<TransformResult, EngineError> {
        let config = self.config_for(params);
        let ctx = FactoryContext::new(params, &self.aliases, logger);

        let mut metadata = Metadata::new();
        get_chroma_subsampling(&config, &mut metadata);

        let transforms = generate_transforms(&self.factories, &config, &ctx);
        apply_transforms_with(transforms, image, metadata, engine)
    }

    /// Run independent requests in parallel. Results keep input order.
    pub fn process_batch(
        &self,
        requests: Vec<(SearchParams, DynamicImage)>,
        engine: &dyn ImageEngine,
        logger: &dyn Logger,
    ) -> Vec<Result<TransformResult, EngineError>> {
        requests
            .into_par_iter()
            .map(|(params, image)| self.run(&params, image, engine, logger))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MemoryLogger;
    use crate::engine::backend::tests::{MockEngine, RecordedOp};
    use crate::engine::{BlurAmount, ChromaSubsampling, Kernel};
    use crate::test_helpers::{TestContext, config, test_image};
    use crate::transforms::{blur, median};

    #[test]
    fn empty_list_returns_original_and_empty_metadata() {
        let engine = MockEngine::new();
        let original = test_image(7, 3);

        let result = apply_transforms(Vec::new(), original.clone(), &engine).unwrap();

        assert_eq!(result.image, original);
        assert!(result.metadata.is_empty());
        assert!(engine.get_operations().is_empty());
    }

    #[test]
    fn applies_in_declared_order() {
        let test = TestContext::new();
        let ctx = test.ctx();
        let engine = MockEngine::new();
        let transforms = vec![
            median(&config(&[("median", "3")]), &ctx).unwrap(),
            blur(&config(&[("blur", "2")]), &ctx).unwrap(),
        ];

        let result = apply_transforms(transforms, test_image(4, 4), &engine).unwrap();

        assert_eq!(
            engine.get_operations(),
            vec![RecordedOp::Median(3), RecordedOp::Blur(BlurAmount::Sigma(2.0))]
        );
        assert_eq!(result.metadata.median, Some(3));
        assert_eq!(result.metadata.blur, Some(BlurAmount::Sigma(2.0)));
    }

    /// A writes the kernel; B copies whatever kernel it sees into `median`.
    fn writer() -> ImageTransform {
        ImageTransform::new("writer", |image, metadata, _| {
            metadata.kernel = Some(Kernel::Nearest);
            Ok(image)
        })
    }

    fn reader() -> ImageTransform {
        ImageTransform::new("reader", |image, metadata, _| {
            metadata.median = Some(if metadata.kernel.is_some() { 1 } else { 0 });
            Ok(image)
        })
    }

    #[test]
    fn later_transform_sees_earlier_metadata() {
        let engine = MockEngine::new();
        let result = apply_transforms(vec![writer(), reader()], test_image(2, 2), &engine).unwrap();
        assert_eq!(result.metadata.median, Some(1));
    }

    #[test]
    fn reversing_order_changes_result() {
        let engine = MockEngine::new();
        let result = apply_transforms(vec![reader(), writer()], test_image(2, 2), &engine).unwrap();
        assert_eq!(result.metadata.median, Some(0));
    }

    #[test]
    fn image_is_threaded_between_steps() {
        let engine = MockEngine::new();
        let grow = |w: u32| {
            ImageTransform::new("grow", move |image, _, _| {
                assert_eq!(image.width() + 1, w);
                Ok(DynamicImage::new_rgb8(w, 1))
            })
        };
        let result =
            apply_transforms(vec![grow(2), grow(3), grow(4)], test_image(1, 1), &engine).unwrap();
        assert_eq!(result.image.width(), 4);
    }

    #[test]
    fn engine_failure_aborts_remaining_steps() {
        let test = TestContext::new();
        let ctx = test.ctx();
        let engine = MockEngine::failing_on("median");
        let transforms = vec![
            blur(&config(&[("blur", "")]), &ctx).unwrap(),
            median(&config(&[("median", "3")]), &ctx).unwrap(),
            blur(&config(&[("blur", "9")]), &ctx).unwrap(),
        ];

        let result = apply_transforms(transforms, test_image(4, 4), &engine);

        assert!(matches!(result, Err(EngineError::ProcessingFailed(_))));
        assert_eq!(
            engine.get_operations(),
            vec![RecordedOp::Blur(BlurAmount::Default), RecordedOp::Median(3)]
        );
    }

    #[test]
    fn seeded_metadata_survives_run() {
        let engine = MockEngine::new();
        let seeded = Metadata::with_chroma_subsampling(ChromaSubsampling::Yuv444);
        let result =
            apply_transforms_with(vec![writer()], test_image(2, 2), seeded, &engine).unwrap();
        assert_eq!(result.metadata.chroma_subsampling, Some(ChromaSubsampling::Yuv444));
        assert_eq!(result.metadata.kernel, Some(Kernel::Nearest));
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    #[test]
    fn run_invalid_only_query_applies_nothing() {
        let pipeline = Pipeline::new();
        let engine = MockEngine::new();
        let logger = MemoryLogger::new();
        let params = SearchParams::parse("blur=nope&hue=&median=0&kernel=bogus");

        let result = pipeline
            .run(&params, test_image(3, 3), &engine, &logger)
            .unwrap();

        assert!(engine.get_operations().is_empty());
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn run_records_subsampling_hint() {
        let pipeline = Pipeline::new();
        let engine = MockEngine::new();
        let params = SearchParams::parse("subsampling=4%3A2%3A0&grayscale");

        let result = pipeline
            .run(&params, test_image(3, 3), &engine, &MemoryLogger::new())
            .unwrap();

        assert_eq!(result.metadata.chroma_subsampling, Some(ChromaSubsampling::Yuv420));
        assert_eq!(engine.get_operations(), vec![RecordedOp::Grayscale]);
    }

    #[test]
    fn defaults_fill_in_but_query_wins() {
        let mut config = PipelineConfig::default();
        config.defaults.insert("kernel".into(), "nearest".into());
        config.defaults.insert("blur".into(), "1".into());
        let pipeline = Pipeline::from_config(&config).unwrap();

        let cfg = pipeline.config_for(&SearchParams::parse("blur=4&width=10"));
        assert_eq!(cfg.get("blur"), Some("4"));
        assert_eq!(cfg.get("kernel"), Some("nearest"));
    }

    #[test]
    fn aliased_query_key_beats_default() {
        let mut config = PipelineConfig::default();
        config.defaults.insert("width".into(), "100".into());
        config.defaults.insert("kernel".into(), "mitchell".into());
        let pipeline = Pipeline::from_config(&config).unwrap();
        let engine = MockEngine::new();
        let logger = MemoryLogger::new();

        let result = pipeline
            .run(
                &SearchParams::parse("w=4&resample=nearest"),
                test_image(16, 8),
                &engine,
                &logger,
            )
            .unwrap();

        assert_eq!(result.metadata.width, Some(4));
        assert_eq!(result.metadata.kernel, Some(Kernel::Nearest));
        assert_eq!(
            engine.get_operations(),
            vec![RecordedOp::Resize {
                width: 4,
                height: 2,
                kernel: Kernel::Nearest,
                crop: false,
            }]
        );
        let warnings = logger.messages(crate::context::LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("`resample`"));
    }

    #[test]
    fn default_applies_when_no_spelling_present() {
        let mut config = PipelineConfig::default();
        config.defaults.insert("width".into(), "100".into());
        let pipeline = Pipeline::from_config(&config).unwrap();

        let cfg = pipeline.config_for(&SearchParams::parse("h=4"));
        assert_eq!(cfg.get("width"), Some("100"));
        assert_eq!(cfg.get("h"), Some("4"));
    }

    #[test]
    fn from_config_limits_factories() {
        let mut config = PipelineConfig::default();
        config.pipeline.enabled = vec!["blur".into()];
        let pipeline = Pipeline::from_config(&config).unwrap();

        let planned = pipeline.plan(&SearchParams::parse("blur&median=3"), &MemoryLogger::new());
        let names: Vec<_> = planned.iter().map(ImageTransform::name).collect();
        assert_eq!(names, vec!["blur"]);
    }

    #[test]
    fn from_config_rejects_unknown_transform() {
        let mut config = PipelineConfig::default();
        config.pipeline.enabled = vec!["sharpen".into()];
        assert!(matches!(
            Pipeline::from_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn batch_keeps_input_order_and_isolates_metadata() {
        let pipeline = Pipeline::new();
        let engine = MockEngine::new();
        let requests = vec![
            (SearchParams::parse("median=3"), test_image(2, 2)),
            (SearchParams::parse("median=5"), test_image(2, 2)),
            (SearchParams::parse(""), test_image(2, 2)),
        ];

        let results = pipeline.process_batch(requests, &engine, &MemoryLogger::new());

        let medians: Vec<_> = results
            .into_iter()
            .map(|r| r.unwrap().metadata.median)
            .collect();
        assert_eq!(medians, vec![Some(3), Some(5), None]);
    }
}
