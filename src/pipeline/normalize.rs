//! Schema normalization
//!
//! Coerces a loosely shaped JSON value into the canonical layout model.
//! This stage is total: malformed or missing fields are defaulted, never
//! rejected. Canonical field names take precedence; legacy variants are
//! only consulted when the canonical field is absent.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::layout::{LayoutResult, PlacedObject, Room, Rotation, Size, Vec3};
use crate::manifest::{catalog_reference, Manifest};

type Object = Map<String, Value>;

/// Normalize a recovered JSON value into a canonical layout.
pub fn normalize(value: &Value, manifest: &Manifest, room_fallback: &Room) -> LayoutResult {
    let Some(root) = value.as_object() else {
        tracing::debug!("top-level value is not an object; using fallback room");
        return LayoutResult::new(room_fallback.clone());
    };

    let room = match root.get("room").and_then(coerce_room) {
        Some(room) => room,
        None => {
            tracing::debug!("room missing or malformed; using fallback room");
            room_fallback.clone()
        }
    };

    let mut used_ids = HashSet::new();
    let objects = root
        .get("objects")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match item.as_object() {
                    Some(obj) => Some(normalize_object(index + 1, obj, manifest)),
                    None => {
                        tracing::debug!(position = index + 1, "skipping non-object entry");
                        None
                    }
                })
                .map(|mut object| {
                    object.id = unique_id(object.id, &mut used_ids);
                    object
                })
                .collect()
        })
        .unwrap_or_default();

    LayoutResult {
        room: Some(room),
        objects,
        rationale: string_field(root, "rationale"),
    }
}

fn normalize_object(position: usize, obj: &Object, manifest: &Manifest) -> PlacedObject {
    let id = obj
        .get("id")
        .and_then(coerce_identifier)
        .unwrap_or_else(|| format!("obj_{position}"));

    PlacedObject {
        id,
        object_type: string_field(obj, "type"),
        label: string_field(obj, "label"),
        model: model_reference(obj, manifest),
        position_m: first_present(obj, &["position_m", "position"])
            .and_then(coerce_vec3)
            .unwrap_or_default(),
        rotation_deg: first_present(obj, &["rotation_deg", "rotation"]).and_then(coerce_rotation),
        size_m: first_present(obj, &["size_m", "size"]).and_then(coerce_size),
        parent: string_field(obj, "parent"),
        anchor: string_field(obj, "anchor"),
        relative_position_m: first_present(obj, &["relative_position_m", "relative_position"])
            .and_then(coerce_vec3),
    }
}

fn coerce_room(value: &Value) -> Option<Room> {
    let obj = value.as_object()?;
    let dimension = |key: &str| obj.get(key).and_then(coerce_number);

    let room = Room {
        width_m: dimension("width_m")?,
        depth_m: dimension("depth_m")?,
        height_m: dimension("height_m")?,
        floor_material: string_field(obj, "floor_material"),
        wall_color: string_field(obj, "wall_color"),
    };
    room.is_valid().then_some(room)
}

/// Resolve the catalog reference: canonical `model`, then a legacy model id,
/// then a reverse lookup of an asset path.
fn model_reference(obj: &Object, manifest: &Manifest) -> Option<String> {
    if let Some(model) = string_field(obj, "model").filter(|m| !m.is_empty()) {
        return Some(model);
    }

    let legacy_id = ["model_id", "modelId"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str));
    if let Some(key) = legacy_id.and_then(|id| id.rsplit(':').next()) {
        if !key.is_empty() {
            tracing::debug!(key, "coerced legacy model id");
            return Some(catalog_reference(key));
        }
    }

    let path = obj
        .get("path")
        .and_then(Value::as_str)
        .filter(|p| manifest.is_asset_path(p))?;
    let key = manifest.key_for_path(path)?;
    tracing::debug!(path, key, "resolved asset path through manifest");
    Some(catalog_reference(key))
}

fn coerce_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Later duplicates get `_2`, `_3`, ... appended.
fn unique_id(id: String, used: &mut HashSet<String>) -> String {
    if used.insert(id.clone()) {
        return id;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{id}_{n}");
        if used.insert(candidate.clone()) {
            tracing::debug!(original = %id, renamed = %candidate, "renamed duplicate identifier");
            return candidate;
        }
        n += 1;
    }
}

fn first_present<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

fn string_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Numbers, or strings holding a number. Non-finite results are rejected.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// `[x, y, z]` or `{x, y, z}`; unusable members become 0.
fn coerce_vec3(value: &Value) -> Option<Vec3> {
    let [x, y, z] = components(value, ["x", "y", "z"])?;
    let or_zero = |c: Option<&Value>| c.and_then(coerce_number).unwrap_or(0.0);
    Some(Vec3::new(or_zero(x), or_zero(y), or_zero(z)))
}

/// A bare number is a yaw; otherwise `[x, y, z]` or `{x, y, z}` with
/// unusable members left absent.
fn coerce_rotation(value: &Value) -> Option<Rotation> {
    if let Some(yaw) = value.as_f64().filter(|v| v.is_finite()) {
        return Some(Rotation::about_y(yaw));
    }

    let [x, y, z] = components(value, ["x", "y", "z"])?;
    let axis = |c: Option<&Value>| c.and_then(coerce_number);
    let rotation = Rotation {
        x: axis(x),
        y: axis(y),
        z: axis(z),
    };
    (!rotation.is_empty()).then_some(rotation)
}

fn coerce_size(value: &Value) -> Option<Size> {
    let size = match value {
        Value::Object(obj) => {
            let member = |keys: [&str; 3]| first_present(obj, &keys).and_then(positive);
            Size {
                w: member(["w", "width", "width_m"]),
                d: member(["d", "depth", "depth_m"]),
                h: member(["h", "height", "height_m"]),
            }
        }
        _ => {
            let [w, d, h] = components(value, ["w", "d", "h"])?;
            Size {
                w: w.and_then(positive),
                d: d.and_then(positive),
                h: h.and_then(positive),
            }
        }
    };
    (!size.is_empty()).then_some(size)
}

fn positive(value: &Value) -> Option<f64> {
    coerce_number(value).filter(|v| *v > 0.0)
}

/// Split a 3-element array or a keyed object into its three members.
fn components<'a>(value: &'a Value, keys: [&str; 3]) -> Option<[Option<&'a Value>; 3]> {
    match value {
        Value::Array(items) if items.len() == 3 => {
            Some([items.first(), items.get(1), items.get(2)])
        }
        Value::Object(obj) => Some(keys.map(|key| obj.get(key))),
        _ => None,
    }
}
