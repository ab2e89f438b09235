//! Room envelope

use serde::{Deserialize, Serialize};

/// Room dimensions in meters, origin at the floor center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub width_m: f64,
    pub depth_m: f64,
    pub height_m: f64,

    /// Opaque cosmetic pass-through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_material: Option<String>,

    /// Opaque cosmetic pass-through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_color: Option<String>,
}

impl Room {
    pub fn new(width_m: f64, depth_m: f64, height_m: f64) -> Self {
        Self {
            width_m,
            depth_m,
            height_m,
            floor_material: None,
            wall_color: None,
        }
    }

    /// All three dimensions are positive finite numbers
    pub fn is_valid(&self) -> bool {
        [self.width_m, self.depth_m, self.height_m]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn half_width(&self) -> f64 {
        self.width_m / 2.0
    }

    pub fn half_depth(&self) -> f64 {
        self.depth_m / 2.0
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(4.0, 4.0, 2.7)
    }
}
