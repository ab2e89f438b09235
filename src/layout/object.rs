//! Placed objects and their geometry

use serde::{Deserialize, Serialize};

/// Point or offset in meters (x right, y up, z forward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation in degrees. An absent axis means "not requested", which is
/// distinct from an explicit zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Rotation {
    /// Yaw-only rotation
    pub fn about_y(degrees: f64) -> Self {
        Self {
            x: None,
            y: Some(degrees),
            z: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

/// Bounding size in meters. Each member may be unknown independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

impl Size {
    pub fn new(w: f64, d: f64, h: f64) -> Self {
        Self {
            w: Some(w),
            d: Some(d),
            h: Some(h),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_none() && self.d.is_none() && self.h.is_none()
    }

    /// Fill unknown members from `other`; stated members win.
    pub fn or(self, other: Size) -> Size {
        Size {
            w: self.w.or(other.w),
            d: self.d.or(other.d),
            h: self.h.or(other.h),
        }
    }

    /// Drop members that are not positive finite lengths.
    pub fn known(self) -> Size {
        let known = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
        Size {
            w: known(self.w),
            d: known(self.d),
            h: known(self.h),
        }
    }

    pub fn half_width(&self) -> f64 {
        self.w.map_or(0.0, |w| w / 2.0)
    }

    pub fn half_depth(&self) -> f64 {
        self.d.map_or(0.0, |d| d / 2.0)
    }
}

/// An object placed in the room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Unique within a layout
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// `gltf:<key>` catalog reference; absent means a procedural primitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default)]
    pub position_m: Vec3,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<Rotation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_m: Option<Size>,

    /// Identifier of the object this one is anchored to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_position_m: Option<Vec3>,
}

impl PlacedObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position_m = Vec3::new(x, y, z);
        self
    }

    pub fn with_size(mut self, w: f64, d: f64, h: f64) -> Self {
        self.size_m = Some(Size::new(w, d, h));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn is_parented(&self) -> bool {
        self.parent.is_some()
    }
}
