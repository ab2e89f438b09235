//! Layout recovery pipeline
//!
//! Raw model text flows through three stages:
//! - extract: recover a JSON value from noisy text (the only fallible stage)
//! - normalize: coerce it into the canonical layout schema
//! - sanitize: snap, clamp and floor-rest object positions
//!
//! Each run is a pure function of its inputs and holds no shared state.

mod extract;
mod normalize;
mod sanitize;

pub use extract::{extract, extract_with_strategy, Strategy};
pub use normalize::normalize;
pub use sanitize::{
    sanitize, sanitize_with_manifest, snap, SanitizeOptions, DEFAULT_SNAP_INCREMENT,
};

use crate::error::Result;
use crate::layout::LayoutResult;
use crate::manifest::Manifest;

/// Run the full pipeline over raw model output.
pub fn run(raw: &str, manifest: &Manifest, options: &SanitizeOptions) -> Result<LayoutResult> {
    let (value, strategy) = extract_with_strategy(raw)?;
    let layout = normalize(&value, manifest, &options.room_fallback);
    let layout = sanitize_with_manifest(layout, options, manifest);

    tracing::info!(
        strategy = strategy.as_str(),
        objects = layout.len(),
        "layout recovered"
    );
    Ok(layout)
}

/// Reusable pipeline bound to one set of sanitization options
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: SanitizeOptions,
}

impl Pipeline {
    pub fn new(options: SanitizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SanitizeOptions {
        &self.options
    }

    pub fn run(&self, raw: &str, manifest: &Manifest) -> Result<LayoutResult> {
        run(raw, manifest, &self.options)
    }
}
