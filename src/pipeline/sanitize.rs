//! Geometry sanitization
//!
//! Snaps every object to the placement grid, keeps its footprint inside the
//! room and rests unparented objects on the floor. Objects are handled
//! independently; overlapping objects are left overlapping.
//!
//! Clamp bounds and the floor height are themselves pulled onto the grid
//! (inward for walls, upward for the floor) so that every output coordinate
//! is a grid point and a second pass changes nothing.

use crate::layout::{LayoutResult, PlacedObject, Room, Size};
use crate::manifest::Manifest;

/// Default placement grid in meters
pub const DEFAULT_SNAP_INCREMENT: f64 = 0.1;

/// Tolerance when deciding which grid cell a bound falls into
const GRID_EPSILON: f64 = 1e-9;

/// Options bundle for [`sanitize`]
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizeOptions {
    /// Grid increment in meters
    pub snap_increment: f64,

    /// Room used when the layout carries no usable room
    pub room_fallback: Room,
}

impl SanitizeOptions {
    pub fn new(snap_increment: f64, room_fallback: Room) -> Self {
        Self {
            snap_increment,
            room_fallback,
        }
    }

    /// Effective grid increment; invalid values fall back to the default grid.
    pub fn increment(&self) -> f64 {
        if self.snap_increment.is_finite() && self.snap_increment > 0.0 {
            self.snap_increment
        } else {
            DEFAULT_SNAP_INCREMENT
        }
    }
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_INCREMENT, Room::default())
    }
}

/// Round `value` to the nearest multiple of `increment`. Values too large
/// to express in grid steps are returned unchanged.
pub fn snap(value: f64, increment: f64) -> f64 {
    to_grid(value, increment, f64::round)
}

/// Sanitize using only the sizes objects state themselves.
pub fn sanitize(layout: LayoutResult, options: &SanitizeOptions) -> LayoutResult {
    sanitize_objects(layout, options, None)
}

/// Sanitize, letting catalog objects inherit unstated size members from
/// their manifest entry.
pub fn sanitize_with_manifest(
    layout: LayoutResult,
    options: &SanitizeOptions,
    manifest: &Manifest,
) -> LayoutResult {
    sanitize_objects(layout, options, Some(manifest))
}

fn sanitize_objects(
    mut layout: LayoutResult,
    options: &SanitizeOptions,
    manifest: Option<&Manifest>,
) -> LayoutResult {
    let room = match layout.room.take().filter(Room::is_valid) {
        Some(room) => room,
        None => {
            tracing::debug!("layout has no usable room; using fallback room");
            options.room_fallback.clone()
        }
    };
    let step = options.increment();

    for object in &mut layout.objects {
        let size = effective_size(object, manifest);
        sanitize_object(object, &size, &room, step);
    }

    layout.room = Some(room);
    layout
}

fn effective_size(object: &PlacedObject, manifest: Option<&Manifest>) -> Size {
    let stated = object.size_m.unwrap_or_default().known();
    let declared = manifest
        .zip(object.model.as_deref())
        .and_then(|(manifest, model)| manifest.resolve_reference(model))
        .map(|entry| entry.declared_size())
        .unwrap_or_default();
    stated.or(declared)
}

fn sanitize_object(object: &mut PlacedObject, size: &Size, room: &Room, step: f64) {
    let original = object.position_m;

    let x = snap(finite_or_zero(original.x), step);
    let y = snap(finite_or_zero(original.y), step);
    let z = snap(finite_or_zero(original.z), step);

    let x = clamp_to_room(x, room.half_width(), size.half_width(), step);
    let z = clamp_to_room(z, room.half_depth(), size.half_depth(), step);

    let y = match size.h {
        Some(h) if !object.is_parented() => y.max(grid_ceil(h / 2.0, step)),
        _ => y,
    };

    object.position_m.x = x;
    object.position_m.y = y;
    object.position_m.z = z;

    if object.position_m != original {
        tracing::debug!(
            id = %object.id,
            from = ?(original.x, original.y, original.z),
            to = ?(x, y, z),
            "corrected object position"
        );
    }
}

/// `max(lower, min(upper, value))` where the bounds are the wall limits
/// `-half_room + half_object` and `half_room - half_object` pulled inward
/// onto the grid, so 1.55 on a 0.1 grid becomes 1.5. When the object is
/// wider than the room the range is inverted and the lower bound wins.
fn clamp_to_room(value: f64, half_room: f64, half_object: f64, step: f64) -> f64 {
    let lower = grid_ceil(-half_room + half_object, step);
    let upper = grid_floor(half_room - half_object, step);
    lower.max(upper.min(value))
}

fn grid_floor(value: f64, step: f64) -> f64 {
    to_grid(value, step, |q| (q + GRID_EPSILON).floor())
}

fn grid_ceil(value: f64, step: f64) -> f64 {
    to_grid(value, step, |q| (q - GRID_EPSILON).ceil())
}

/// Apply `round` in grid-step units. Falls back to `value` when the step
/// count overflows.
fn to_grid(value: f64, step: f64, round: impl Fn(f64) -> f64) -> f64 {
    let gridded = round(value / step) * step;
    if gridded.is_finite() {
        positive_zero(gridded)
    } else {
        value
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
