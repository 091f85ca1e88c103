//! Level spawn tables and the world-building seam

use crate::error::Result;
use glam::Vec3;
use skirmish_physics::ColliderRegistry;

/// Highest level with a spawn table
pub const MAX_LEVEL: u32 = 3;

/// Enemy spawns on the floor. Each level uses a prefix of this table.
const SPAWN_POINTS: [[f32; 3]; 18] = [
    // Level 1
    [20.0, 0.0, 20.0],
    [-20.0, 0.0, 25.0],
    [25.0, 0.0, -15.0],
    [-22.0, 0.0, -18.0],
    [15.0, 0.0, 30.0],
    // Level 2
    [30.0, 0.0, 20.0],
    [-25.0, 0.0, 30.0],
    [40.0, 0.0, -15.0],
    [-30.0, 0.0, -20.0],
    [15.0, 0.0, 35.0],
    // Level 3
    [50.0, 0.0, 40.0],
    [-45.0, 0.0, 45.0],
    [45.0, 0.0, -45.0],
    [-40.0, 0.0, -50.0],
    [60.0, 0.0, 10.0],
    [-55.0, 0.0, 20.0],
    [35.0, 0.0, -55.0],
    [-35.0, 0.0, 55.0],
];

const ENEMIES_PER_LEVEL: [usize; MAX_LEVEL as usize] = [5, 10, 18];

/// Number of enemies on `level`, if it exists
pub fn enemy_count(level: u32) -> Option<usize> {
    let index = level.checked_sub(1)? as usize;
    ENEMIES_PER_LEVEL.get(index).copied()
}

/// Enemy spawn points for `level` (1-based)
pub fn spawn_points(level: u32) -> Option<Vec<Vec3>> {
    let count = enemy_count(level)?;
    Some(SPAWN_POINTS[..count].iter().map(|p| Vec3::from_array(*p)).collect())
}

/// Populates the collider registry when a level is built.
///
/// The registry is cleared before `build` is called.
pub trait WorldBuilder {
    fn build(&mut self, level: u32, registry: &mut ColliderRegistry) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_counts() {
        assert_eq!(enemy_count(0), None);
        assert_eq!(enemy_count(1), Some(5));
        assert_eq!(enemy_count(2), Some(10));
        assert_eq!(enemy_count(3), Some(18));
        assert_eq!(enemy_count(4), None);
    }

    #[test]
    fn test_levels_extend_each_other() {
        let one = spawn_points(1).unwrap();
        let three = spawn_points(3).unwrap();
        assert_eq!(one[..], three[..5]);
        assert_eq!(three[17], Vec3::new(-35.0, 0.0, 55.0));
        assert!(three.iter().all(|p| p.y == 0.0));
    }
}
