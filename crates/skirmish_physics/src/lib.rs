//! Skirmish Physics - Simplified AABB Collision
//!
//! This crate provides the spatial side of the Skirmish combat core. It is not a
//! rigid-body engine: world geometry is reduced to axis-aligned boxes and moving
//! combatants are pushed out of them along the shallowest horizontal axis.
//!
//! # Features
//!
//! - Collider registry for static and dynamic world geometry
//! - Overlap queries and nearest-hit raycasting
//! - Shallow-axis pushout resolution
//! - Gravity, ground probing and idle deceleration for combatants
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │          ColliderRegistry            │
//! │  ┌────────────┐   ┌───────────────┐  │
//! │  │  Colliders │   │    Queries    │  │
//! │  │ (geometry, │   │ overlap, ray, │  │
//! │  │   bounds)  │   │    pushout    │  │
//! │  └────────────┘   └───────────────┘  │
//! └──────────────────────────────────────┘
//!                   │
//!                   ▼
//!          ┌─────────────────┐
//!          │  MovementBody   │
//!          │ (gravity, feet, │
//!          │   pushout)      │
//!          └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use skirmish_physics::prelude::*;
//! use std::sync::Arc;
//!
//! let mut registry = ColliderRegistry::new();
//! registry.add_collider(
//!     Arc::new(StaticBox::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(2.0, 2.0, 2.0))),
//!     ColliderKind::Crate,
//! );
//!
//! let mut body = MovementBody::new(Vec3::new(0.0, 1.7, 0.0));
//! body.step(&registry, &PhysicsConfig::default(), Some(Vec3::Z * 5.0), Footing::standing(), 0.016);
//! ```

pub mod aabb;
pub mod collider;
pub mod config;
pub mod error;
pub mod movement;
pub mod query;
pub mod registry;

pub mod prelude {
    pub use crate::aabb::{ray_aabb, Aabb, Ray};
    pub use crate::collider::{
        ColliderHandle, ColliderKind, CompoundGeometry, DynamicBox, Geometry, StaticBox,
    };
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::movement::{Footing, MoveReport, MovementBody};
    pub use crate::query::{Pushout, RaycastHit};
    pub use crate::registry::{Collider, ColliderRegistry};
    pub use glam::Vec3;
}

pub use prelude::*;
