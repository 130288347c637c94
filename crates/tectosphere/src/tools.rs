use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Short, human-typeable seed for a fresh world.
pub fn generate_seed8() -> u64 {
    let mut rng = rand::rng();
    rng.random_range(0..100_000_000)
}

/// The generator every stochastic world operation is threaded through.
pub fn world_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(splitmix64(seed))
}

pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Uniformly distributed direction, by rejection sampling the unit ball.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let length_squared = candidate.length_squared();
        if length_squared > 1e-6 && length_squared <= 1.0 {
            return candidate / length_squared.sqrt();
        }
    }
}

/// Angle in radians between two directions from the sphere center.
pub fn great_circle_distance(a: Vec3, b: Vec3) -> f32 {
    a.normalize_or_zero()
        .dot(b.normalize_or_zero())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Removes the component of `v` along the unit vector `normal`.
pub fn project_onto_tangent(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn same_seed_gives_same_stream() {
        let mut a = world_rng(7);
        let mut b = world_rng(7);
        let xs: Vec<u32> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn random_unit_vectors_are_normalized() {
        let mut rng = world_rng(3);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn great_circle_distance_of_known_pairs() {
        assert!(great_circle_distance(Vec3::X, Vec3::X).abs() < 1e-3);
        assert!((great_circle_distance(Vec3::X, Vec3::Y) - FRAC_PI_2).abs() < 1e-5);
        assert!((great_circle_distance(Vec3::X, -Vec3::X) - PI).abs() < 1e-5);
    }

    #[test]
    fn tangent_projection_is_perpendicular() {
        let normal = Vec3::Y;
        let tangent = project_onto_tangent(Vec3::new(1.0, 0.5, 0.0), normal);
        assert!(tangent.dot(normal).abs() < 1e-6);
        assert!((tangent - Vec3::X).length() < 1e-6);
    }
}
