//! Line-of-sight sensing

use glam::Vec3;
use skirmish_physics::ColliderRegistry;

/// What an agent knows about its target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub distance: f32,
    pub visible: bool,
}

/// Ray from `eye` toward `target` through the collider registry.
///
/// The target counts as visible when nothing is hit, or when the first hit
/// lies within `tolerance` of the target distance (the target's own cover).
pub fn has_line_of_sight(
    registry: &ColliderRegistry,
    eye: Vec3,
    target: Vec3,
    tolerance: f32,
) -> bool {
    let to_target = target - eye;
    let distance = to_target.length();
    if distance <= f32::EPSILON {
        return true;
    }

    match registry.raycast(eye, to_target, distance) {
        Some(hit) => hit.distance >= distance - tolerance,
        None => true,
    }
}

/// Distance from `position` plus visibility from `position + chest_height`
pub fn sense(
    registry: &ColliderRegistry,
    position: Vec3,
    chest_height: f32,
    target: Vec3,
    tolerance: f32,
) -> Sighting {
    let eye = position + Vec3::Y * chest_height;
    Sighting {
        distance: position.distance(target),
        visible: has_line_of_sight(registry, eye, target, tolerance),
    }
}
