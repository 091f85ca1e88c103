//! Town arena: the stock world for all three levels
//!
//! Buildings, walls, crates and street-light poles are static boxes. Parked
//! cars are compound geometry that a collaborator may move between ticks;
//! their handles are kept so the registry bounds can be refreshed.
//!
//! Any prop whose footprint comes within `clearance` of an enemy spawn or a
//! player spawn is left out, so nobody starts inside a collider.

use crate::error::Result;
use crate::level::{spawn_points, WorldBuilder};
use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_physics::{
    Aabb, ColliderHandle, ColliderKind, ColliderRegistry, CompoundGeometry, Geometry, StaticBox,
};
use std::f32::consts::{FRAC_PI_4, TAU};
use std::sync::Arc;

/// Side of the square ground slab
pub const GROUND_SIZE: f32 = 200.0;
const CRATE_SIZE: f32 = 1.5;
const POLE_SIZE: Vec3 = Vec3::new(0.2, 6.0, 0.2);

/// Car parts in local space: (center, size). Body, roof, then four wheels.
const CAR_PARTS: [([f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.8, 0.0], [2.0, 1.2, 4.0]),
    ([0.0, 1.6, -0.3], [1.8, 0.8, 2.0]),
    ([-0.9, 0.3, 1.3], [0.3, 0.6, 0.6]),
    ([0.9, 0.3, 1.3], [0.3, 0.6, 0.6]),
    ([-0.9, 0.3, -1.3], [0.3, 0.6, 0.6]),
    ([0.9, 0.3, -1.3], [0.3, 0.6, 0.6]),
];

/// (floor position, size)
type BoxSpec = ([f32; 3], [f32; 3]);
/// (floor position, yaw in eighths of a turn)
type CarSpec = ([f32; 3], f32);

struct Layout {
    buildings: &'static [BoxSpec],
    walls: &'static [BoxSpec],
    crates: &'static [[f32; 3]],
    cars: &'static [CarSpec],
    lights: &'static [[f32; 3]],
    /// Randomly strewn crates and cars, as (crates, cars)
    scatter: Option<(usize, usize)>,
}

/// Small town: wide streets, low buildings
const SMALL_TOWN: Layout = Layout {
    buildings: &[
        ([15.0, 0.0, 30.0], [10.0, 6.0, 8.0]),
        ([-15.0, 0.0, 30.0], [10.0, 6.0, 8.0]),
        ([0.0, 0.0, 35.0], [8.0, 5.0, 6.0]),
        ([18.0, 0.0, -25.0], [8.0, 5.0, 8.0]),
        ([-18.0, 0.0, -25.0], [8.0, 5.0, 8.0]),
        ([0.0, 0.0, -30.0], [10.0, 6.0, 10.0]),
        ([30.0, 0.0, 10.0], [8.0, 7.0, 8.0]),
        ([30.0, 0.0, -10.0], [8.0, 7.0, 8.0]),
        ([-30.0, 0.0, 10.0], [8.0, 7.0, 8.0]),
        ([-30.0, 0.0, -10.0], [8.0, 7.0, 8.0]),
    ],
    walls: &[
        ([0.0, 0.0, 15.0], [12.0, 2.0, 0.5]),
        ([15.0, 0.0, 0.0], [0.5, 2.0, 12.0]),
        ([-15.0, 0.0, 0.0], [0.5, 2.0, 12.0]),
    ],
    crates: &[
        [5.0, 0.0, 5.0],
        [-5.0, 0.0, 5.0],
        [5.0, 0.0, -5.0],
        [-5.0, 0.0, -5.0],
    ],
    cars: &[
        ([10.0, 0.0, 20.0], 0.0),
        ([-10.0, 0.0, 20.0], 4.0),
        ([20.0, 0.0, 0.0], 2.0),
        ([-20.0, 0.0, -15.0], -1.0),
    ],
    lights: &[
        [12.0, 0.0, 12.0],
        [-12.0, 0.0, 12.0],
        [12.0, 0.0, -12.0],
        [-12.0, 0.0, -12.0],
    ],
    scatter: None,
};

/// Downtown: tall blocks around a central tower
const DOWNTOWN: Layout = Layout {
    buildings: &[
        ([0.0, 0.0, 0.0], [12.0, 25.0, 12.0]),
        ([20.0, 0.0, 0.0], [10.0, 22.0, 10.0]),
        ([-20.0, 0.0, 0.0], [10.0, 22.0, 10.0]),
        ([0.0, 0.0, 20.0], [10.0, 20.0, 10.0]),
        ([0.0, 0.0, -20.0], [10.0, 20.0, 10.0]),
        ([35.0, 0.0, 35.0], [14.0, 28.0, 14.0]),
        ([-35.0, 0.0, 35.0], [14.0, 28.0, 14.0]),
        ([35.0, 0.0, -35.0], [14.0, 28.0, 14.0]),
        ([-35.0, 0.0, -35.0], [14.0, 28.0, 14.0]),
        ([40.0, 0.0, 15.0], [12.0, 15.0, 10.0]),
        ([-40.0, 0.0, 15.0], [12.0, 15.0, 10.0]),
        ([40.0, 0.0, -15.0], [12.0, 15.0, 10.0]),
        ([-40.0, 0.0, -15.0], [12.0, 15.0, 10.0]),
        ([15.0, 0.0, 40.0], [10.0, 15.0, 12.0]),
        ([-15.0, 0.0, 40.0], [10.0, 15.0, 12.0]),
        ([15.0, 0.0, -40.0], [10.0, 15.0, 12.0]),
        ([-15.0, 0.0, -40.0], [10.0, 15.0, 12.0]),
    ],
    walls: &[
        ([10.0, 0.0, 10.0], [8.0, 3.0, 0.5]),
        ([-10.0, 0.0, 10.0], [8.0, 3.0, 0.5]),
        ([10.0, 0.0, -10.0], [8.0, 3.0, 0.5]),
        ([-10.0, 0.0, -10.0], [8.0, 3.0, 0.5]),
        ([25.0, 0.0, 25.0], [10.0, 3.0, 0.5]),
        ([-25.0, 0.0, -25.0], [10.0, 3.0, 0.5]),
    ],
    crates: &[
        [8.0, 0.0, 8.0],
        [-8.0, 0.0, 8.0],
        [8.0, 0.0, -8.0],
        [-8.0, 0.0, -8.0],
        [28.0, 0.0, 0.0],
        [-28.0, 0.0, 0.0],
        [0.0, 0.0, 28.0],
        [0.0, 0.0, -28.0],
    ],
    cars: &[
        ([12.0, 0.0, 0.0], 0.0),
        ([-12.0, 0.0, 0.0], 4.0),
        ([0.0, 0.0, 12.0], 2.0),
        ([0.0, 0.0, -12.0], -2.0),
        ([25.0, 0.0, 25.0], 1.0),
        ([-25.0, 0.0, 25.0], -1.0),
        ([25.0, 0.0, -25.0], 3.0),
        ([-25.0, 0.0, -25.0], -3.0),
    ],
    lights: &[
        [15.0, 0.0, 15.0],
        [-15.0, 0.0, 15.0],
        [15.0, 0.0, -15.0],
        [-15.0, 0.0, -15.0],
        [30.0, 0.0, 30.0],
        [-30.0, 0.0, 30.0],
        [30.0, 0.0, -30.0],
        [-30.0, 0.0, -30.0],
    ],
    scatter: None,
};

/// Old city: dense irregular blocks, narrow alleys, strewn obstacles
const OLD_CITY: Layout = Layout {
    buildings: &[
        ([8.0, 0.0, 25.0], [8.0, 12.0, 12.0]),
        ([-10.0, 0.0, 28.0], [10.0, 14.0, 8.0]),
        ([22.0, 0.0, 30.0], [6.0, 10.0, 10.0]),
        ([-25.0, 0.0, 22.0], [12.0, 16.0, 6.0]),
        ([5.0, 0.0, 42.0], [8.0, 11.0, 8.0]),
        ([-18.0, 0.0, 45.0], [10.0, 13.0, 10.0]),
        ([12.0, 0.0, -22.0], [10.0, 15.0, 8.0]),
        ([-8.0, 0.0, -28.0], [8.0, 12.0, 12.0]),
        ([28.0, 0.0, -25.0], [6.0, 14.0, 10.0]),
        ([-22.0, 0.0, -30.0], [12.0, 10.0, 8.0]),
        ([8.0, 0.0, -45.0], [10.0, 16.0, 6.0]),
        ([-15.0, 0.0, -42.0], [8.0, 13.0, 10.0]),
        ([35.0, 0.0, 8.0], [8.0, 14.0, 10.0]),
        ([42.0, 0.0, -5.0], [10.0, 12.0, 8.0]),
        ([38.0, 0.0, 20.0], [6.0, 16.0, 12.0]),
        ([50.0, 0.0, 12.0], [12.0, 11.0, 8.0]),
        ([45.0, 0.0, -18.0], [8.0, 15.0, 10.0]),
        ([-35.0, 0.0, 5.0], [10.0, 13.0, 8.0]),
        ([-42.0, 0.0, -8.0], [8.0, 14.0, 10.0]),
        ([-38.0, 0.0, 18.0], [12.0, 12.0, 6.0]),
        ([-48.0, 0.0, -15.0], [8.0, 16.0, 10.0]),
        ([-45.0, 0.0, 25.0], [10.0, 11.0, 8.0]),
        ([5.0, 0.0, 5.0], [6.0, 8.0, 8.0]),
        ([-8.0, 0.0, 8.0], [8.0, 10.0, 6.0]),
        ([12.0, 0.0, -5.0], [6.0, 12.0, 10.0]),
        ([-5.0, 0.0, -10.0], [10.0, 9.0, 8.0]),
        ([18.0, 0.0, 10.0], [8.0, 14.0, 6.0]),
        ([-15.0, 0.0, -2.0], [6.0, 11.0, 8.0]),
    ],
    walls: &[
        ([15.0, 0.0, 15.0], [6.0, 3.0, 0.5]),
        ([-15.0, 0.0, 15.0], [6.0, 3.0, 0.5]),
        ([15.0, 0.0, -15.0], [6.0, 3.0, 0.5]),
        ([-15.0, 0.0, -15.0], [6.0, 3.0, 0.5]),
        ([25.0, 0.0, 0.0], [0.5, 3.0, 8.0]),
        ([-25.0, 0.0, 0.0], [0.5, 3.0, 8.0]),
        ([0.0, 0.0, 25.0], [8.0, 3.0, 0.5]),
        ([0.0, 0.0, -25.0], [8.0, 3.0, 0.5]),
        ([32.0, 0.0, 32.0], [10.0, 3.0, 0.5]),
        ([-32.0, 0.0, 32.0], [10.0, 3.0, 0.5]),
        ([32.0, 0.0, -32.0], [10.0, 3.0, 0.5]),
        ([-32.0, 0.0, -32.0], [10.0, 3.0, 0.5]),
    ],
    crates: &[],
    cars: &[],
    lights: &[
        [20.0, 0.0, 20.0],
        [-20.0, 0.0, 20.0],
        [20.0, 0.0, -20.0],
        [-20.0, 0.0, -20.0],
        [35.0, 0.0, 0.0],
        [-35.0, 0.0, 0.0],
        [0.0, 0.0, 35.0],
        [0.0, 0.0, -35.0],
    ],
    scatter: Some((20, 12)),
};

fn layout(level: u32) -> &'static Layout {
    match level {
        2 => &DOWNTOWN,
        3 => &OLD_CITY,
        _ => &SMALL_TOWN,
    }
}

/// Car parts for a yaw, as world-aligned boxes around the car origin
fn car_parts(yaw: f32) -> Vec<StaticBox> {
    let rotation = Quat::from_rotation_y(yaw);
    let (sin, cos) = yaw.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());

    CAR_PARTS
        .iter()
        .map(|(center, size)| {
            let size = Vec3::from_array(*size);
            let extents = Vec3::new(
                cos * size.x + sin * size.z,
                size.y,
                sin * size.x + cos * size.z,
            );
            StaticBox::new(rotation * Vec3::from_array(*center), extents)
        })
        .collect()
}

/// A parked car registered with the world
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub geometry: Arc<CompoundGeometry>,
    pub handle: ColliderHandle,
}

/// Stock world builder
#[derive(Debug, Clone)]
pub struct TownArena {
    seed: u64,
    clearance: f32,
    /// Player start and respawn points that must stay free
    clear_points: Vec<Vec3>,
    vehicles: Vec<Vehicle>,
}

impl TownArena {
    /// `seed` drives the strewn obstacles of the old city
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            clearance: 1.0,
            clear_points: vec![Vec3::ZERO, Vec3::new(-50.0, 0.0, -50.0)],
            vehicles: Vec::new(),
        }
    }

    /// Replace the player spawn points kept free of props
    pub fn with_clear_points(mut self, points: Vec<Vec3>) -> Self {
        self.clear_points = points;
        self
    }

    pub fn with_clearance(mut self, clearance: f32) -> Self {
        self.clearance = clearance;
        self
    }

    /// Cars registered by the last build
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Move a car and refresh its registered bounds
    pub fn move_vehicle(
        &self,
        index: usize,
        origin: Vec3,
        registry: &mut ColliderRegistry,
    ) -> Result<bool> {
        let Some(vehicle) = self.vehicles.get(index) else {
            log::warn!("No vehicle {}", index);
            return Ok(false);
        };
        vehicle.geometry.set_origin(origin);
        registry.refresh_bounds(vehicle.handle)?;
        Ok(true)
    }

    fn blocks_spawn(&self, bounds: &Aabb, spawns: &[Vec3]) -> bool {
        let margin = self.clearance;
        spawns
            .iter()
            .chain(self.clear_points.iter())
            .any(|p| {
                p.x > bounds.min.x - margin
                    && p.x < bounds.max.x + margin
                    && p.z > bounds.min.z - margin
                    && p.z < bounds.max.z + margin
            })
    }

    fn place(
        &self,
        registry: &mut ColliderRegistry,
        geometry: Arc<dyn Geometry>,
        kind: ColliderKind,
        spawns: &[Vec3],
    ) -> Option<ColliderHandle> {
        let bounds = geometry.compute_bounds();
        if self.blocks_spawn(&bounds, spawns) {
            log::debug!("Skipping {:?} at {:?}: blocks a spawn", kind, bounds.center());
            return None;
        }
        Some(registry.add_collider(geometry, kind))
    }

    fn place_car(
        &mut self,
        registry: &mut ColliderRegistry,
        origin: Vec3,
        yaw: f32,
        spawns: &[Vec3],
    ) {
        let geometry = Arc::new(CompoundGeometry::new(origin, car_parts(yaw)));
        if let Some(handle) = self.place(registry, geometry.clone(), ColliderKind::Vehicle, spawns) {
            self.vehicles.push(Vehicle { geometry, handle });
        }
    }
}

impl WorldBuilder for TownArena {
    fn build(&mut self, level: u32, registry: &mut ColliderRegistry) -> Result<()> {
        let layout = layout(level);
        let spawns = spawn_points(level).unwrap_or_default();
        self.vehicles.clear();

        registry.add_collider(
            Arc::new(StaticBox::new(
                Vec3::new(0.0, -0.5, 0.0),
                Vec3::new(GROUND_SIZE, 1.0, GROUND_SIZE),
            )),
            ColliderKind::Ground,
        );

        for (base, size) in layout.buildings {
            let geometry = StaticBox::on_floor(Vec3::from_array(*base), Vec3::from_array(*size));
            self.place(registry, Arc::new(geometry), ColliderKind::Building, &spawns);
        }
        for (base, size) in layout.walls {
            let geometry = StaticBox::on_floor(Vec3::from_array(*base), Vec3::from_array(*size));
            self.place(registry, Arc::new(geometry), ColliderKind::Wall, &spawns);
        }
        for base in layout.crates {
            let geometry = StaticBox::on_floor(Vec3::from_array(*base), Vec3::splat(CRATE_SIZE));
            self.place(registry, Arc::new(geometry), ColliderKind::Crate, &spawns);
        }
        for (base, eighths) in layout.cars {
            self.place_car(registry, Vec3::from_array(*base), eighths * FRAC_PI_4, &spawns);
        }

        if let Some((crates, cars)) = layout.scatter {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(u64::from(level)));
            for i in 0..crates {
                let angle = i as f32 / crates as f32 * TAU;
                let radius = 15.0 + rng.gen::<f32>() * 25.0;
                let base = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
                let geometry = StaticBox::on_floor(base, Vec3::splat(CRATE_SIZE));
                self.place(registry, Arc::new(geometry), ColliderKind::Crate, &spawns);
            }
            for i in 0..cars {
                let angle = i as f32 / cars as f32 * TAU;
                let radius = 10.0 + rng.gen::<f32>() * 30.0;
                let base = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
                let yaw = rng.gen::<f32>() * TAU;
                self.place_car(registry, base, yaw, &spawns);
            }
        }

        for base in layout.lights {
            let geometry = StaticBox::on_floor(Vec3::from_array(*base), POLE_SIZE);
            self.place(registry, Arc::new(geometry), ColliderKind::Pole, &spawns);
        }

        log::info!(
            "Built arena for level {}: {} colliders, {} vehicles",
            level,
            registry.len(),
            self.vehicles.len()
        );
        Ok(())
    }
}

/// Just the ground slab
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround;

impl WorldBuilder for FlatGround {
    fn build(&mut self, _level: u32, registry: &mut ColliderRegistry) -> Result<()> {
        registry.add_collider(
            Arc::new(StaticBox::new(
                Vec3::new(0.0, -0.5, 0.0),
                Vec3::new(GROUND_SIZE, 1.0, GROUND_SIZE),
            )),
            ColliderKind::Ground,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn built(level: u32) -> (TownArena, ColliderRegistry) {
        let mut arena = TownArena::new(7);
        let mut registry = ColliderRegistry::new();
        arena.build(level, &mut registry).unwrap();
        (arena, registry)
    }

    #[test]
    fn test_car_bounds_follow_yaw() {
        let straight = CompoundGeometry::new(Vec3::ZERO, car_parts(0.0)).compute_bounds();
        assert_relative_eq!(straight.min.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(straight.max.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(straight.max.z, 2.0, epsilon = 1e-5);
        assert_relative_eq!(straight.max.x, 1.05, epsilon = 1e-5);

        // A quarter turn swaps the footprint
        let turned = CompoundGeometry::new(Vec3::ZERO, car_parts(std::f32::consts::FRAC_PI_2))
            .compute_bounds();
        assert_relative_eq!(turned.max.x, 2.0, epsilon = 1e-4);
        assert_relative_eq!(turned.max.z, 1.05, epsilon = 1e-4);
    }

    #[test]
    fn test_spawns_start_clear() {
        let config = skirmish_physics::PhysicsConfig::default();
        for level in 1..=3 {
            let (_, registry) = built(level);
            let mut points = spawn_points(level).unwrap();
            points.push(Vec3::ZERO);
            points.push(Vec3::new(-50.0, 0.0, -50.0));

            for feet in points {
                let body = Aabb::from_feet(feet, config.body_radius, config.body_height);
                let pushout = registry.resolve_pushout(&body, feet, Vec3::ZERO);
                assert!(!pushout.collided, "level {} spawn {:?} is blocked", level, feet);
            }
        }
    }

    #[test]
    fn test_small_town_layout() {
        let (arena, registry) = built(1);
        let walls: Vec<_> = registry
            .iter()
            .filter(|(_, c)| c.kind() == ColliderKind::Wall)
            .map(|(_, c)| *c.bounds())
            .collect();
        assert_eq!(walls.len(), 3);
        assert!(walls.iter().any(|b| {
            (b.center() - Vec3::new(0.0, 1.0, 15.0)).length() < 1e-4
                && (b.size() - Vec3::new(12.0, 2.0, 0.5)).length() < 1e-4
        }));
        assert!(!arena.vehicles().is_empty());

        let ground = registry
            .iter()
            .find(|(_, c)| c.kind() == ColliderKind::Ground)
            .map(|(_, c)| *c.bounds())
            .unwrap();
        assert_eq!(ground.max.y, 0.0);
    }

    #[test]
    fn test_downtown_keeps_center_clear() {
        let (_, registry) = built(2);
        let center = Aabb::from_feet(Vec3::ZERO, 0.5, 1.8);
        assert!(!registry.query_overlap(&center));
        // The towers around it still stand
        assert!(registry
            .iter()
            .any(|(_, c)| c.kind() == ColliderKind::Building && c.bounds().max.y > 20.0));
    }

    #[test]
    fn test_old_city_is_deterministic() {
        let (_, first) = built(3);
        let (_, second) = built(3);
        assert_eq!(first.len(), second.len());
        for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
            assert_eq!(a.bounds(), b.bounds());
        }
    }

    #[test]
    fn test_moving_a_vehicle_refreshes_bounds() {
        let (arena, mut registry) = built(1);
        let vehicle = arena.vehicles()[0].clone();
        let before = registry.bounds(vehicle.handle).unwrap();

        assert!(arena
            .move_vehicle(0, vehicle.geometry.origin() + Vec3::X * 3.0, &mut registry)
            .unwrap());
        let after = registry.bounds(vehicle.handle).unwrap();
        assert_relative_eq!(after.min.x - before.min.x, 3.0, epsilon = 1e-4);

        assert!(!arena.move_vehicle(99, Vec3::ZERO, &mut registry).unwrap());
    }

    #[test]
    fn test_flat_ground() {
        let mut registry = ColliderRegistry::new();
        FlatGround.build(1, &mut registry).unwrap();
        assert_eq!(registry.len(), 1);
    }
}
