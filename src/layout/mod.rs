//! Canonical layout model
//!
//! Every stage after text recovery works on these types only. Their serde
//! representation is the canonical wire shape handed back to callers.

mod object;
mod room;

pub use object::{PlacedObject, Rotation, Size, Vec3};
pub use room::Room;

use serde::{Deserialize, Serialize};

/// A furnished room: envelope, ordered objects and the model's rationale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Room envelope (absent only before sanitization resolves a fallback)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,

    /// Placed objects in the order the model listed them
    #[serde(default)]
    pub objects: Vec<PlacedObject>,

    /// Free-text explanation from the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl LayoutResult {
    pub fn new(room: Room) -> Self {
        Self {
            room: Some(room),
            objects: Vec::new(),
            rationale: None,
        }
    }

    /// Look up an object by identifier
    pub fn object(&self, id: &str) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Serialize to the canonical JSON value
    pub fn to_value(&self) -> serde_json::Value {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
