//! Movement targets: patrol routes, engagement positions and cover

use glam::{Quat, Vec3};
use rand::Rng;

/// Flatten onto the XZ plane and normalize
fn flat_direction(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// `count` points evenly spaced on a circle of `radius` around `center`, at floor level
pub fn patrol_route(center: Vec3, radius: f32, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            Vec3::new(
                center.x + angle.cos() * radius,
                0.0,
                center.z + angle.sin() * radius,
            )
        })
        .collect()
}

/// Where to stand to engage `target` from `own`.
///
/// Closes to `ideal_range` when farther, backs off by 30% of it when closer
/// than half of it, and otherwise swings to a flank rotated by
/// `±flank_angle` around the target.
pub fn tactical_position<R: Rng + ?Sized>(
    own: Vec3,
    target: Vec3,
    ideal_range: f32,
    flank_angle: f32,
    rng: &mut R,
) -> Vec3 {
    let to_target = Vec3::new(target.x - own.x, 0.0, target.z - own.z);
    let distance = to_target.length();
    let direction = to_target.normalize_or_zero();
    let ground_target = Vec3::new(target.x, own.y, target.z);

    if distance > ideal_range {
        return ground_target - direction * ideal_range;
    }
    if distance < ideal_range * 0.5 {
        return own - direction * (ideal_range * 0.3);
    }

    let angle = if rng.gen_bool(0.5) {
        flank_angle
    } else {
        -flank_angle
    };
    let flanked = Quat::from_rotation_y(angle) * direction;
    ground_target - flanked * ideal_range
}

/// Cover `distance` away, diagonally off the line from `threat`, left or right at random
pub fn nearest_cover<R: Rng + ?Sized>(own: Vec3, threat: Vec3, distance: f32, rng: &mut R) -> Vec3 {
    let away = flat_direction(own - threat);
    let perpendicular = Vec3::new(-away.z, 0.0, away.x);
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let direction = (away + perpendicular * side).normalize_or_zero();
    own + direction * distance
}

/// Cover straight away from `threat`
pub fn cover_away_from(own: Vec3, threat: Vec3, distance: f32) -> Vec3 {
    own + flat_direction(own - threat) * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_patrol_route() {
        let route = patrol_route(Vec3::new(20.0, 0.0, 20.0), 10.0, 4);
        assert_eq!(route.len(), 4);
        assert_relative_eq!(route[0].x, 30.0);
        assert_relative_eq!(route[1].z, 30.0, epsilon = 1e-4);
        assert_relative_eq!(route[2].x, 10.0, epsilon = 1e-4);
        assert!(route.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_tactical_closes_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let own = Vec3::ZERO;
        let target = Vec3::new(0.0, 1.7, 40.0);
        let pos = tactical_position(own, target, 17.5, std::f32::consts::FRAC_PI_3, &mut rng);
        assert_relative_eq!(pos.z, 22.5, epsilon = 1e-4);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_tactical_backs_off() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let own = Vec3::ZERO;
        let target = Vec3::new(0.0, 0.0, 5.0);
        let pos = tactical_position(own, target, 17.5, std::f32::consts::FRAC_PI_3, &mut rng);
        assert_relative_eq!(pos.z, -5.25, epsilon = 1e-4);
    }

    #[test]
    fn test_tactical_flanks_at_ideal_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let own = Vec3::ZERO;
        let target = Vec3::new(0.0, 0.0, 12.0);
        let pos = tactical_position(own, target, 17.5, std::f32::consts::FRAC_PI_3, &mut rng);
        assert_relative_eq!(pos.distance(target), 17.5, epsilon = 1e-3);
        assert!(pos.x.abs() > 1.0);
    }

    #[test]
    fn test_cover_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let own = Vec3::ZERO;
        let threat = Vec3::new(0.0, 1.7, 10.0);

        let near = nearest_cover(own, threat, 10.0, &mut rng);
        assert_relative_eq!(near.length(), 10.0, epsilon = 1e-4);
        assert!(near.z < 0.0);
        assert_relative_eq!(near.x.abs(), near.z.abs(), epsilon = 1e-4);

        let away = cover_away_from(own, threat, 15.0);
        assert_relative_eq!(away.z, -15.0, epsilon = 1e-4);
        assert_eq!(away.y, 0.0);
    }
}
