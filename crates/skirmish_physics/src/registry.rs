//! Collider registry

use crate::aabb::Aabb;
use crate::collider::{ColliderHandle, ColliderKind, Geometry};
use crate::error::{PhysicsError, Result};
use std::sync::Arc;

/// A registered piece of world geometry
pub struct Collider {
    geometry: Arc<dyn Geometry>,
    kind: ColliderKind,
    bounds: Aabb,
}

impl Collider {
    /// Bounds as of the last registration or refresh
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn kind(&self) -> ColliderKind {
        self.kind
    }

    pub fn geometry(&self) -> &Arc<dyn Geometry> {
        &self.geometry
    }

    /// Recompute bounds from the geometry's current transform
    pub fn update_bounds(&mut self) {
        self.bounds = self.geometry.compute_bounds();
    }
}

impl std::fmt::Debug for Collider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collider")
            .field("kind", &self.kind)
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// Owns every collider of the current level.
///
/// Handles are indices in registration order, which is also the order the
/// pushout resolver visits colliders in.
#[derive(Debug, Default)]
pub struct ColliderRegistry {
    colliders: Vec<Collider>,
}

impl ColliderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register geometry and capture its current bounds
    pub fn add_collider(&mut self, geometry: Arc<dyn Geometry>, kind: ColliderKind) -> ColliderHandle {
        let bounds = geometry.compute_bounds();
        let handle = ColliderHandle(self.colliders.len() as u32);
        log::debug!(
            "Added {:?} collider {:?} size {:?}",
            kind,
            handle,
            bounds.size()
        );
        self.colliders.push(Collider {
            geometry,
            kind,
            bounds,
        });
        handle
    }

    /// Recompute the bounds of one collider after its geometry moved
    pub fn refresh_bounds(&mut self, handle: ColliderHandle) -> Result<()> {
        let collider = self
            .colliders
            .get_mut(handle.0 as usize)
            .ok_or(PhysicsError::ColliderNotFound(handle))?;
        collider.update_bounds();
        Ok(())
    }

    /// Refresh every collider
    pub fn refresh_all(&mut self) {
        for collider in &mut self.colliders {
            collider.update_bounds();
        }
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle.0 as usize)
    }

    /// Stored bounds of a collider
    pub fn bounds(&self, handle: ColliderHandle) -> Option<Aabb> {
        self.get(handle).map(|c| c.bounds)
    }

    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.colliders
            .iter()
            .enumerate()
            .map(|(i, c)| (ColliderHandle(i as u32), c))
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Remove everything (level rebuild). Old handles become invalid.
    pub fn clear(&mut self) {
        log::debug!("Cleared {} colliders", self.colliders.len());
        self.colliders.clear();
    }
}
