//! Furnish - Generated Room Layout Recovery
//!
//! Turns free-form text from a generative model into a validated,
//! geometrically consistent furnished room.
//!
//! # Architecture
//!
//! The pipeline runs three stages, left to right:
//! - Extract: recover JSON from prose, code fences or bare payloads
//! - Normalize: unify legacy field shapes into the canonical schema
//! - Sanitize: snap to grid, clamp to room bounds, rest on the floor
//!
//! Only extraction can fail. The asset manifest is passed in explicitly so
//! runs are deterministic and safe to execute in parallel.

pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{FurnishError, Result};
pub use layout::{LayoutResult, PlacedObject, Room};
pub use manifest::{AssetManifestEntry, Manifest};
pub use pipeline::{Pipeline, SanitizeOptions};
