//! World geometry and collider handles

use crate::aabb::Aabb;
use glam::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(pub(crate) u32);

impl ColliderHandle {
    /// Create from a raw index
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Descriptive tag of a collider. Not used by any query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColliderKind {
    Ground,
    #[default]
    Box,
    Building,
    Wall,
    Crate,
    Vehicle,
    Pole,
}

/// Geometry supplied by the world builder.
///
/// The registry never builds geometry itself. It only asks for the current
/// world-space bounds, at registration and whenever a refresh is requested.
pub trait Geometry: Send + Sync {
    /// Current axis-aligned bounds in world space
    fn compute_bounds(&self) -> Aabb;
}

/// A box that never moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticBox {
    /// Center in world space
    pub center: Vec3,
    /// Full extents (width, height, depth)
    pub size: Vec3,
}

impl StaticBox {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Box resting on the floor: `size` with its base at `base.y`
    pub fn on_floor(base: Vec3, size: Vec3) -> Self {
        Self {
            center: Vec3::new(base.x, base.y + size.y * 0.5, base.z),
            size,
        }
    }
}

impl Geometry for StaticBox {
    fn compute_bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.size * 0.5)
    }
}

/// A box that can be repositioned between ticks
#[derive(Debug)]
pub struct DynamicBox {
    center: RwLock<Vec3>,
    size: Vec3,
}

impl DynamicBox {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center: RwLock::new(center),
            size,
        }
    }

    /// Current center
    pub fn position(&self) -> Vec3 {
        *self.center.read()
    }

    /// Move to a new center. Registered bounds go stale until refreshed.
    pub fn set_position(&self, center: Vec3) {
        *self.center.write() = center;
    }

    /// Move by an offset
    pub fn translate(&self, offset: Vec3) {
        *self.center.write() += offset;
    }
}

impl Geometry for DynamicBox {
    fn compute_bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position(), self.size * 0.5)
    }
}

/// Several boxes moved together, such as a vehicle body and cabin.
///
/// Bounds are the union of every part at the current origin.
#[derive(Debug)]
pub struct CompoundGeometry {
    origin: RwLock<Vec3>,
    parts: Vec<StaticBox>,
}

impl CompoundGeometry {
    /// Create from parts expressed relative to `origin`
    pub fn new(origin: Vec3, parts: Vec<StaticBox>) -> Self {
        Self {
            origin: RwLock::new(origin),
            parts,
        }
    }

    pub fn origin(&self) -> Vec3 {
        *self.origin.read()
    }

    pub fn set_origin(&self, origin: Vec3) {
        *self.origin.write() = origin;
    }

    pub fn parts(&self) -> &[StaticBox] {
        &self.parts
    }
}

impl Geometry for CompoundGeometry {
    fn compute_bounds(&self) -> Aabb {
        let origin = self.origin();
        self.parts.iter().fold(Aabb::EMPTY, |acc, part| {
            acc.union(&part.compute_bounds().translated(origin))
        })
    }
}
