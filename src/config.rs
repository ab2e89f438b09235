//! Runtime configuration
//!
//! Values come from `FURNISH_*` environment variables with built-in
//! defaults. Bad values are ignored with a warning rather than failing.

use std::env;

use serde::{Deserialize, Serialize};

use crate::layout::Room;
use crate::manifest::{Manifest, DEFAULT_ASSETS_ROOT};
use crate::pipeline::{SanitizeOptions, DEFAULT_SNAP_INCREMENT};

pub const ENV_SNAP_INCREMENT: &str = "FURNISH_SNAP_INCREMENT";
pub const ENV_ROOM_WIDTH: &str = "FURNISH_ROOM_WIDTH_M";
pub const ENV_ROOM_DEPTH: &str = "FURNISH_ROOM_DEPTH_M";
pub const ENV_ROOM_HEIGHT: &str = "FURNISH_ROOM_HEIGHT_M";
pub const ENV_ASSETS_ROOT: &str = "FURNISH_ASSETS_ROOT";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Placement grid in meters
    pub snap_increment: f64,

    /// Room substituted when the model gives none
    pub room_fallback: Room,

    /// Prefix every catalog asset path starts with
    pub assets_root: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            snap_increment: DEFAULT_SNAP_INCREMENT,
            room_fallback: Room::default(),
            assets_root: DEFAULT_ASSETS_ROOT.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for key in [
            ENV_SNAP_INCREMENT,
            ENV_ROOM_WIDTH,
            ENV_ROOM_DEPTH,
            ENV_ROOM_HEIGHT,
        ] {
            let Some(raw) = lookup(key) else {
                continue;
            };
            match raw.trim().parse::<f64>() {
                Ok(v) => config.override_with(key, Some(v)),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring invalid configuration value")
                }
            }
        }
        if let Some(root) = lookup(ENV_ASSETS_ROOT).filter(|r| !r.trim().is_empty()) {
            config.assets_root = root;
        }

        config
    }

    /// Replace the numeric setting named by `key` (one of the `ENV_*` names)
    /// when `value` is a positive finite number; anything else is ignored.
    pub fn override_with(&mut self, key: &str, value: Option<f64>) {
        let Some(v) = value else {
            return;
        };
        if !(v.is_finite() && v > 0.0) {
            tracing::warn!(key, value = v, "ignoring invalid configuration value");
            return;
        }

        match key {
            ENV_SNAP_INCREMENT => self.snap_increment = v,
            ENV_ROOM_WIDTH => self.room_fallback.width_m = v,
            ENV_ROOM_DEPTH => self.room_fallback.depth_m = v,
            ENV_ROOM_HEIGHT => self.room_fallback.height_m = v,
            _ => tracing::warn!(key, "unknown configuration key"),
        }
    }

    pub fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions::new(self.snap_increment, self.room_fallback.clone())
    }

    /// Apply the configured assets root to a loaded manifest
    pub fn apply_to(&self, manifest: Manifest) -> Manifest {
        manifest.with_assets_root(self.assets_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = PipelineConfig::from_lookup(|_| None);
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.snap_increment, 0.1);
        assert_eq!(config.assets_root, "/assets/");
    }

    #[test]
    fn test_values_read_from_lookup() {
        let config = PipelineConfig::from_lookup(lookup(&[
            (ENV_SNAP_INCREMENT, "0.05"),
            (ENV_ROOM_WIDTH, "6"),
            (ENV_ROOM_DEPTH, " 5.5 "),
            (ENV_ROOM_HEIGHT, "3"),
            (ENV_ASSETS_ROOT, "/static/assets/"),
        ]));

        assert_eq!(config.snap_increment, 0.05);
        assert_eq!(config.room_fallback, Room::new(6.0, 5.5, 3.0));
        assert_eq!(config.assets_root, "/static/assets/");
        assert_eq!(config.sanitize_options().increment(), 0.05);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let config = PipelineConfig::from_lookup(lookup(&[
            (ENV_SNAP_INCREMENT, "-1"),
            (ENV_ROOM_WIDTH, "wide"),
            (ENV_ROOM_DEPTH, "inf"),
            (ENV_ASSETS_ROOT, "  "),
        ]));
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_override_with_rejects_invalid_values() {
        let mut config = PipelineConfig::default();
        config.override_with(ENV_ROOM_WIDTH, Some(-3.0));
        config.override_with(ENV_ROOM_DEPTH, Some(0.0));
        config.override_with(ENV_SNAP_INCREMENT, Some(f64::NAN));
        config.override_with(ENV_ROOM_HEIGHT, Some(f64::INFINITY));
        config.override_with(ENV_ROOM_WIDTH, None);
        assert_eq!(config, PipelineConfig::default());

        config.override_with(ENV_ROOM_HEIGHT, Some(3.2));
        assert_eq!(config.room_fallback.height_m, 3.2);
        assert!(config.room_fallback.is_valid());
    }

    #[test]
    fn test_apply_to_manifest() {
        let config = PipelineConfig {
            assets_root: "/cdn/".to_string(),
            ..Default::default()
        };
        let manifest = config.apply_to(Manifest::new());
        assert!(manifest.is_asset_path("/cdn/chair.glb"));
        assert!(!manifest.is_asset_path("/assets/chair.glb"));
    }
}
