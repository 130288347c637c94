use crate::config::KinematicsConfig;
use crate::constants::DEBUG_COLORS;
use crate::tools::{project_onto_tangent, random_unit_vector};
use glam::Vec3;
use rand::Rng;

/// One partition of the sphere's vertices together with its rigid motion.
///
/// Motion is the sum of two small rotations: `spin` about the plate's own
/// center and `drift` about an arbitrary pivot in the same hemisphere.
#[derive(Debug, Clone)]
pub struct Plate {
    pub id: usize,
    /// Seed vertex index
    pub seed: u32,
    /// Unit vector through the seed vertex; the spin axis
    pub center: Vec3,
    /// Radians per step about `center`
    pub spin_rate: f32,
    /// Unit vector; the drift axis
    pub pivot: Vec3,
    /// Radians per step about `pivot`
    pub drift_rate: f32,
    pub elevation: f32,
    pub thickness: f32,
    pub debug_color: [f32; 4],
    tiles: Vec<u32>,
    border_tiles: Vec<u32>,
}

impl Plate {
    /// Seeds a plate on `seed` and samples its kinematics. The generator is
    /// advanced in a fixed order: spin, pivot, drift, elevation, thickness.
    pub fn new<R: Rng + ?Sized>(
        id: usize,
        seed: u32,
        center: Vec3,
        kinematics: &KinematicsConfig,
        rng: &mut R,
    ) -> Self {
        let center = center.normalize();
        let max_rotation = kinematics.max_rotation();

        let spin_rate = sample_symmetric(rng, max_rotation);
        let mut pivot = random_unit_vector(rng);
        if pivot.dot(center) < 0.0 {
            pivot = -pivot;
        }
        let drift_rate = sample_symmetric(rng, max_rotation);
        let elevation = sample_range(rng, kinematics.elevation_min, kinematics.elevation_max);
        let thickness = sample_range(rng, kinematics.thickness_min, kinematics.thickness_max);

        Self {
            id,
            seed,
            center,
            spin_rate,
            pivot,
            drift_rate,
            elevation,
            thickness,
            debug_color: DEBUG_COLORS[id % DEBUG_COLORS.len()],
            tiles: vec![seed],
            border_tiles: vec![seed],
        }
    }

    /// Every vertex the plate has claimed, in claim order.
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Current frontier: during growth the ring claimed last, afterwards the
    /// tiles touching another plate.
    pub fn border_tiles(&self) -> &[u32] {
        &self.border_tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Expands the plate by `rings` one-ring steps, claiming every unclaimed
    /// neighbour of the frontier. Returns how many vertices were claimed.
    pub fn grow(
        &mut self,
        rings: usize,
        neighbours: &[Vec<u32>],
        owners: &mut [Option<usize>],
    ) -> usize {
        let mut claimed = 0;
        for _ in 0..rings {
            let mut frontier = Vec::new();
            for &tile in &self.border_tiles {
                for &neighbour in &neighbours[tile as usize] {
                    let owner = &mut owners[neighbour as usize];
                    if owner.is_none() {
                        *owner = Some(self.id);
                        frontier.push(neighbour);
                    }
                }
            }
            claimed += frontier.len();
            self.tiles.extend_from_slice(&frontier);
            self.border_tiles = frontier;
        }
        claimed
    }

    /// Recomputes the frontier as the tiles with at least one neighbour
    /// owned by a different plate.
    pub fn calculate_border_tiles(&mut self, neighbours: &[Vec<u32>], owners: &[Option<usize>]) {
        self.border_tiles = self
            .tiles
            .iter()
            .copied()
            .filter(|&tile| {
                neighbours[tile as usize]
                    .iter()
                    .any(|&n| owners[n as usize] != Some(self.id))
            })
            .collect();
    }

    /// Tangential velocity at `position` from the spin about `center`.
    pub fn calculate_spin(&self, position: Vec3) -> Vec3 {
        rotation_velocity(self.center, self.spin_rate, position)
    }

    /// Tangential velocity at `position` from the drift about `pivot`.
    pub fn calculate_drift(&self, position: Vec3) -> Vec3 {
        rotation_velocity(self.pivot, self.drift_rate, position)
    }

    pub fn calculate_motion(&self, position: Vec3) -> Vec3 {
        self.calculate_spin(position) + self.calculate_drift(position)
    }
}

/// Velocity of a point on the unit sphere under a rotation by `angle` about
/// `axis`: the axis projected onto the tangent plane, turned a quarter about
/// the surface normal and scaled by `tan(angle)`.
fn rotation_velocity(axis: Vec3, angle: f32, position: Vec3) -> Vec3 {
    let normal = position.normalize_or_zero();
    let axis_tangent = project_onto_tangent(axis, normal);
    axis_tangent.cross(normal) * angle.tan()
}

fn sample_symmetric<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    rng.random_range(-max..=max)
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}
