//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Plan (2 transforms)
//! 001 resize
//! 002 median
//! ```
//!
//! ## Apply / Batch
//!
//! ```text
//! photo.jpg → out/photo.jpg (400x300)
//!     width: 400
//!     median: 3
//!     kernel: mitchell
//! ```
//!
//! A failed batch entry prints its error on the indented line instead.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::engine::BlurAmount;
use crate::metadata::Metadata;
use crate::pipeline::TransformResult;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// One `key: value` line per recorded decision, in pipeline order.
pub fn format_metadata(metadata: &Metadata) -> Vec<String> {
    let mut fields: Vec<(&str, String)> = Vec::new();

    if let Some(w) = metadata.width {
        fields.push(("width", w.to_string()));
    }
    if let Some(h) = metadata.height {
        fields.push(("height", h.to_string()));
    }
    if let Some(k) = metadata.kernel {
        fields.push(("kernel", k.to_string()));
    }
    if let Some(r) = metadata.rotate {
        fields.push(("rotate", r.to_string()));
    }
    if metadata.flip {
        fields.push(("flip", "true".into()));
    }
    if metadata.flop {
        fields.push(("flop", "true".into()));
    }
    if let Some(m) = metadata.median {
        fields.push(("median", m.to_string()));
    }
    match metadata.blur {
        Some(BlurAmount::Default) => fields.push(("blur", "default".into())),
        Some(BlurAmount::Sigma(s)) => fields.push(("blur", s.to_string())),
        None => {}
    }
    if let Some(h) = metadata.hue {
        fields.push(("hue", h.to_string()));
    }
    if let Some(s) = metadata.saturation {
        fields.push(("saturation", s.to_string()));
    }
    if let Some(b) = metadata.brightness {
        fields.push(("brightness", b.to_string()));
    }
    if metadata.grayscale {
        fields.push(("grayscale", "true".into()));
    }
    if metadata.invert {
        fields.push(("invert", "true".into()));
    }
    if let Some(c) = metadata.chroma_subsampling {
        fields.push(("subsampling", c.to_string()));
    }

    fields
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect()
}

/// Format the transforms a query would run.
pub fn format_plan(names: &[&str]) -> Vec<String> {
    if names.is_empty() {
        return vec!["Plan: no transforms, image passes through unchanged".to_string()];
    }
    let mut lines = vec![format!("Plan ({})", plural(names.len(), "transform"))];
    lines.extend(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{} {}", format_index(i + 1), name)),
    );
    lines
}

pub fn print_plan(names: &[&str]) {
    for line in format_plan(names) {
        println!("{}", line);
    }
}

/// Format one processed image: header plus its metadata.
pub fn format_result(input: &Path, output: &Path, result: &TransformResult) -> Vec<String> {
    let mut lines = vec![format!(
        "{} → {} ({}x{})",
        input.display(),
        output.display(),
        result.image.width(),
        result.image.height()
    )];
    lines.extend(
        format_metadata(&result.metadata)
            .into_iter()
            .map(|line| format!("{}{}", indent(1), line)),
    );
    lines
}

pub fn print_result(input: &Path, output: &Path, result: &TransformResult) {
    for line in format_result(input, output, result) {
        println!("{}", line);
    }
}

/// Format a failed entry of a batch run.
pub fn format_failure(input: &Path, error: &dyn std::fmt::Display) -> Vec<String> {
    vec![
        format!("{} → failed", input.display()),
        format!("{}{}", indent(1), error),
    ]
}

pub fn print_failure(input: &Path, error: &dyn std::fmt::Display) {
    for line in format_failure(input, error) {
        println!("{}", line);
    }
}

/// Closing line of a batch run.
pub fn format_batch_summary(succeeded: usize, failed: usize) -> String {
    if failed == 0 {
        format!("Processed {}", plural(succeeded, "image"))
    } else {
        format!(
            "Processed {}, {} failed",
            plural(succeeded, "image"),
            failed
        )
    }
}
