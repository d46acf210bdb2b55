//! Resampling kernel option.
//!
//! Not a pipeline transform: the kernel must be known when a resize is
//! configured, so callers ask for it directly and get the answer back while
//! the choice is also recorded in the metadata for later stages and the
//! encoder.

use crate::engine::Kernel;
use crate::metadata::Metadata;
use crate::parsers::parse_kernel;
use crate::query::TransformConfig;

/// Names accepted by the `kernel` parameter.
pub const KERNEL_VALUES: [&str; 5] = ["nearest", "cubic", "mitchell", "lanczos2", "lanczos3"];

/// Validate `kernel` and record it. Invalid or absent leaves `metadata` alone.
///
/// Only the canonical `kernel` key is read. Options get no
/// [`FactoryContext`](crate::context::FactoryContext), so aliases such as
/// `resample` are honoured by [`resize`](super::resize) but not here.
pub fn get_kernel(config: &TransformConfig, metadata: &mut Metadata) -> Option<Kernel> {
    let kernel = parse_kernel(config.get("kernel"))?;
    metadata.kernel = Some(kernel);
    Some(kernel)
}

/// The kernel a resize should use.
///
/// A requested kernel is recorded and used. Otherwise the kernel an earlier
/// stage recorded is reused, falling back to [`Kernel::default`].
pub fn effective_kernel(requested: Option<Kernel>, metadata: &mut Metadata) -> Kernel {
    if let Some(kernel) = requested {
        metadata.kernel = Some(kernel);
    }
    metadata.kernel.unwrap_or_default()
}
