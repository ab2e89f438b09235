//! Asset manifest
//!
//! Read-only snapshot of the asset catalog, passed explicitly into
//! normalization so every pipeline run is deterministic and independent.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FurnishError, Result};
use crate::layout::{Size, Vec3};

/// Scheme prefix of catalog model references
pub const GLTF_PREFIX: &str = "gltf:";

/// Default prefix shared by every catalog asset path
pub const DEFAULT_ASSETS_ROOT: &str = "/assets/";

/// Format a manifest key as a catalog model reference
pub fn catalog_reference(key: &str) -> String {
    format!("{GLTF_PREFIX}{key}")
}

/// A single catalog asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetManifestEntry {
    /// Path of the asset file, starting with the assets root
    pub path: String,

    #[serde(default, alias = "width", skip_serializing_if = "Option::is_none")]
    pub width_m: Option<f64>,

    #[serde(default, alias = "depth", skip_serializing_if = "Option::is_none")]
    pub depth_m: Option<f64>,

    #[serde(default, alias = "height", skip_serializing_if = "Option::is_none")]
    pub height_m: Option<f64>,

    /// Named attachment points relative to the asset origin
    #[serde(default)]
    pub anchors: BTreeMap<String, Vec3>,
}

impl AssetManifestEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            width_m: None,
            depth_m: None,
            height_m: None,
            anchors: BTreeMap::new(),
        }
    }

    pub fn with_dimensions(mut self, width_m: f64, depth_m: f64, height_m: f64) -> Self {
        self.width_m = Some(width_m);
        self.depth_m = Some(depth_m);
        self.height_m = Some(height_m);
        self
    }

    pub fn with_anchor(mut self, name: impl Into<String>, offset: Vec3) -> Self {
        self.anchors.insert(name.into(), offset);
        self
    }

    /// Declared dimensions as an object size; non-positive values count as unknown.
    pub fn declared_size(&self) -> Size {
        Size {
            w: self.width_m,
            d: self.depth_m,
            h: self.height_m,
        }
        .known()
    }
}

/// Catalog snapshot keyed by asset key
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    assets_root: String,
    entries: BTreeMap<String, AssetManifestEntry>,
}

impl Manifest {
    /// Create an empty manifest with the default assets root
    pub fn new() -> Self {
        Self {
            assets_root: DEFAULT_ASSETS_ROOT.to_string(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with_assets_root(mut self, assets_root: impl Into<String>) -> Self {
        self.assets_root = assets_root.into();
        self
    }

    pub fn assets_root(&self) -> &str {
        &self.assets_root
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: AssetManifestEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&AssetManifestEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` lives under the catalog's assets root
    pub fn is_asset_path(&self, path: &str) -> bool {
        path.starts_with(&self.assets_root)
    }

    /// Reverse lookup: key of the first entry (in key order) declaring `path`
    pub fn key_for_path(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.path == path)
            .map(|(key, _)| key.as_str())
    }

    /// Entry named by a `gltf:<key>` reference
    pub fn resolve_reference(&self, reference: &str) -> Option<&AssetManifestEntry> {
        reference
            .strip_prefix(GLTF_PREFIX)
            .and_then(|key| self.entries.get(key))
    }

    /// Offset of a named anchor on an asset
    pub fn anchor(&self, key: &str, name: &str) -> Option<Vec3> {
        self.entries.get(key)?.anchors.get(name).copied()
    }

    /// Parse a manifest from a JSON object mapping keys to entries.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let map = value.as_object().ok_or_else(|| FurnishError::InvalidManifest {
            reason: "top-level value must be an object".to_string(),
        })?;

        let mut manifest = Self::new();
        for (key, raw) in map {
            let entry: AssetManifestEntry =
                serde_json::from_value(raw.clone()).map_err(|e| FurnishError::InvalidManifest {
                    reason: format!("entry '{key}': {e}"),
                })?;
            manifest.insert(key.clone(), entry);
        }

        tracing::debug!(entries = manifest.len(), "parsed asset manifest");
        Ok(manifest)
    }

    /// Load a manifest file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FurnishError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| FurnishError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_json_str(&content)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_manifest() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.insert(
            "chair",
            AssetManifestEntry::new("/assets/models/chair.glb")
                .with_dimensions(0.5, 0.5, 0.9)
                .with_anchor("seat", Vec3::new(0.0, 0.45, 0.0)),
        );
        manifest.insert(
            "table",
            AssetManifestEntry::new("/assets/models/table.glb").with_dimensions(1.2, 0.8, 0.75),
        );
        manifest
    }

    #[test]
    fn test_catalog_reference() {
        assert_eq!(catalog_reference("chair"), "gltf:chair");
    }

    #[test]
    fn test_key_for_path() {
        let manifest = sample_manifest();
        assert_eq!(manifest.key_for_path("/assets/models/table.glb"), Some("table"));
        assert_eq!(manifest.key_for_path("/assets/models/bed.glb"), None);
    }

    #[test]
    fn test_resolve_reference() {
        let manifest = sample_manifest();
        let chair = manifest.resolve_reference("gltf:chair").unwrap();
        assert_eq!(chair.height_m, Some(0.9));
        assert!(manifest.resolve_reference("chair").is_none());
        assert!(manifest.resolve_reference("gltf:sofa").is_none());
    }

    #[test]
    fn test_anchor_lookup() {
        let manifest = sample_manifest();
        assert_eq!(manifest.anchor("chair", "seat"), Some(Vec3::new(0.0, 0.45, 0.0)));
        assert_eq!(manifest.anchor("chair", "back"), None);
        assert_eq!(manifest.anchor("table", "seat"), None);
    }

    #[test]
    fn test_declared_size_ignores_non_positive() {
        let mut entry = AssetManifestEntry::new("/assets/rug.glb").with_dimensions(2.0, 3.0, 0.0);
        entry.depth_m = Some(f64::NAN);
        let size = entry.declared_size();
        assert_eq!(size.w, Some(2.0));
        assert_eq!(size.d, None);
        assert_eq!(size.h, None);
    }

    #[test]
    fn test_from_json_accepts_short_dimension_names() {
        let manifest = Manifest::from_json_str(
            r#"{"lamp": {"path": "/assets/lamp.glb", "width": 0.3, "depth": 0.3, "height": 1.5,
                         "anchors": {"top": {"x": 0, "y": 1.5, "z": 0}}}}"#,
        )
        .unwrap();
        let lamp = manifest.get("lamp").unwrap();
        assert_eq!(lamp.declared_size(), Size::new(0.3, 0.3, 1.5));
        assert_eq!(manifest.anchor("lamp", "top"), Some(Vec3::new(0.0, 1.5, 0.0)));
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        let err = Manifest::from_json_str("[1, 2]").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MANIFEST");

        let err = Manifest::from_json_str(r#"{"chair": {"width": 1.0}}"#).unwrap_err();
        assert!(err.to_string().contains("chair"));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"bed": {{"path": "/assets/bed.glb"}}}}"#).unwrap();

        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.key_for_path("/assets/bed.glb"), Some("bed"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Manifest::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, FurnishError::FileNotFound { .. }));
    }
}
