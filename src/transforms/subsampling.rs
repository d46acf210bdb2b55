//! Chroma subsampling hint: `subsampling=4:2:0` or `subsampling=4:4:4`.
//!
//! Nothing in the pipeline changes pixels for this option; it is recorded so
//! the encoder can pick it up from the metadata.

use crate::engine::ChromaSubsampling;
use crate::metadata::Metadata;
use crate::parsers::parse_subsampling;
use crate::query::TransformConfig;

pub fn get_chroma_subsampling(
    config: &TransformConfig,
    metadata: &mut Metadata,
) -> Option<ChromaSubsampling> {
    let subsampling = parse_subsampling(config.get("subsampling"))?;
    metadata.chroma_subsampling = Some(subsampling);
    Some(subsampling)
}
