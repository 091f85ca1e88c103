//! Physics queries (overlap, raycasting, pushout)

use crate::aabb::{ray_aabb, Aabb, Ray};
use crate::collider::{ColliderHandle, ColliderKind};
use crate::config::PhysicsConfig;
use crate::registry::ColliderRegistry;
use glam::Vec3;

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Kind tag of the collider
    pub kind: ColliderKind,
    /// Hit point in world space
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

/// Result of a pushout resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pushout {
    /// Corrected position
    pub position: Vec3,
    /// Velocity with the pushed axes zeroed
    pub velocity: Vec3,
    /// Whether any collider was penetrated
    pub collided: bool,
}

/// Sign where zero stays zero
#[inline]
fn sign_or_zero(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl ColliderRegistry {
    /// True if `bounds` touches any registered collider
    pub fn query_overlap(&self, bounds: &Aabb) -> bool {
        self.iter().any(|(_, c)| bounds.intersects(c.bounds()))
    }

    /// Push `position` out of every collider the `body` box penetrates.
    ///
    /// Each collider is handled on its own against the box as given, in
    /// registration order. The shift goes along whichever of X or Z overlaps
    /// less, towards the side the body center is on, and the velocity on that
    /// axis is zeroed. Y is never corrected here.
    pub fn resolve_pushout(&self, body: &Aabb, position: Vec3, velocity: Vec3) -> Pushout {
        let mut position = position;
        let mut velocity = velocity;
        let mut collided = false;

        let body_center = body.center();
        let body_size = body.size();

        for (handle, collider) in self.iter() {
            let bounds = collider.bounds();
            if !body.overlaps(bounds) {
                continue;
            }
            collided = true;

            let direction = body_center - bounds.center();
            let size = bounds.size();
            let overlap_x = (body_size.x + size.x) * 0.5 - direction.x.abs();
            let overlap_z = (body_size.z + size.z) * 0.5 - direction.z.abs();

            if overlap_x < overlap_z {
                position.x += sign_or_zero(direction.x) * overlap_x;
                velocity.x = 0.0;
            } else {
                position.z += sign_or_zero(direction.z) * overlap_z;
                velocity.z = 0.0;
            }
            log::trace!(
                "Pushout from {:?} ({:?}): overlap x {:.3} z {:.3}",
                handle,
                collider.kind(),
                overlap_x,
                overlap_z
            );
        }

        Pushout {
            position,
            velocity,
            collided,
        }
    }

    /// Nearest hit among all registered bounds within `max_distance`
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(origin, direction);
        if ray.direction == Vec3::ZERO {
            return None;
        }

        let mut nearest: Option<RaycastHit> = None;
        for (handle, collider) in self.iter() {
            let Some(distance) = ray_aabb(&ray, collider.bounds()) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if nearest.map_or(true, |n| distance < n.distance) {
                nearest = Some(RaycastHit {
                    collider: handle,
                    kind: collider.kind(),
                    point: ray.at(distance),
                    distance,
                });
            }
        }
        nearest
    }

    /// Short downward probe from just above `feet`
    pub fn check_grounded(&self, feet: Vec3, config: &PhysicsConfig) -> Option<RaycastHit> {
        let origin = feet + Vec3::Y * config.ground_probe_offset;
        self.raycast(origin, Vec3::NEG_Y, config.ground_probe_length)
    }
}
