//! Axis-aligned bounding boxes and rays

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty (inverted) AABB
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Body box of a standing combatant: `radius` around `feet` horizontally,
    /// `height` upward.
    #[inline]
    pub fn from_feet(feet: Vec3, radius: f32, height: f32) -> Self {
        Self {
            min: Vec3::new(feet.x - radius, feet.y, feet.z - radius),
            max: Vec3::new(feet.x + radius, feet.y + height, feet.z + radius),
        }
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if the AABB is valid (min <= max)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Check if a point is inside, boundary included
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Inclusive intersection test. Boxes that only touch count.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Strict intersection test. Touching faces are not a penetration.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Grow to include a point
    #[inline]
    pub fn expand_to_include(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Smallest box enclosing both
    #[inline]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Move by an offset
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A ray with normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray. The direction is normalized; a zero direction stays zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t`
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray-AABB intersection using the slab method.
///
/// Returns the distance to the first intersection in front of the origin, or
/// `Some(0.0)` when the origin is already inside the box.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    if !aabb.is_valid() {
        return None;
    }
    if aabb.contains_point(ray.origin) {
        return Some(0.0);
    }

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if dir.abs() < f32::EPSILON {
            // Parallel to this slab
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t1 = (lo - origin) * inv;
        let mut t2 = (hi - origin) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        tmin = tmin.max(t1);
        tmax = tmax.min(t2);
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 || tmin < 0.0 {
        None
    } else {
        Some(tmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_intersects_is_inclusive() {
        let a = unit_box();
        let touching = unit_box().translated(Vec3::new(2.0, 0.0, 0.0));
        assert!(a.intersects(&touching));
        assert!(!a.overlaps(&touching));

        let apart = unit_box().translated(Vec3::new(2.1, 0.0, 0.0));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_from_feet() {
        let body = Aabb::from_feet(Vec3::new(1.0, 0.0, 2.0), 0.5, 1.8);
        assert_eq!(body.min, Vec3::new(0.5, 0.0, 1.5));
        assert_eq!(body.max, Vec3::new(1.5, 1.8, 2.5));
        assert_relative_eq!(body.center().y, 0.9);
    }

    #[test]
    fn test_expand() {
        let aabb = Aabb::EMPTY
            .expand_to_include(Vec3::new(1.0, 2.0, 3.0))
            .expand_to_include(Vec3::new(-1.0, 0.0, 5.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 5.0));
        assert!(!Aabb::EMPTY.is_valid());
    }

    #[test]
    fn test_ray_hits_front_face() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let t = ray_aabb(&ray, &unit_box()).unwrap();
        assert_relative_eq!(t, 4.0);
        assert_relative_eq!(ray.at(t).x, -1.0);
    }

    #[test]
    fn test_ray_misses_and_behind() {
        let miss = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(ray_aabb(&miss, &unit_box()).is_none());

        let behind = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        assert!(ray_aabb(&behind, &unit_box()).is_none());
    }

    #[test]
    fn test_ray_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_aabb(&ray, &unit_box()), Some(0.0));
    }

    #[test]
    fn test_ray_axis_parallel_on_face() {
        // Downward probe onto a flat top face
        let ground = Aabb::new(Vec3::new(-10.0, -0.5, -10.0), Vec3::new(10.0, 0.0, 10.0));
        let ray = Ray::new(Vec3::new(0.0, 0.1, 0.0), Vec3::NEG_Y);
        assert_relative_eq!(ray_aabb(&ray, &ground).unwrap(), 0.1, epsilon = 1e-6);
    }
}
