use super::Plates;
use crate::geometry::Geometry;
use crate::mesh::Vertex;
use crate::tools::project_onto_tangent;
use glam::Vec3;

/// Relative plate motion at a corner, resolved against the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stress {
    /// Closing speed across the boundary; negative when the plates separate
    pub pressure: f32,
    /// Sliding speed along the boundary
    pub shear: f32,
}

impl Stress {
    pub fn magnitude(&self) -> f32 {
        self.pressure.hypot(self.shear)
    }
}

impl Plates {
    /// Resolves the plates' combined spin and drift velocities at every
    /// corner into pressure and shear. Triple junctions average the three
    /// plate pairs.
    pub fn calculate_stresses<V: Vertex>(&mut self, geometry: &Geometry<V>) {
        let topology = geometry.topology();
        let plates = &self.plates;
        let owners = &self.owners;

        for corner in self.corners.values_mut() {
            let centroid = topology.centroid(corner.centroid);
            let position = centroid.position;

            // Mean position of the corner's triangle vertices on each plate
            let side = |plate: usize| -> Vec3 {
                let (sum, count) = centroid
                    .faces
                    .iter()
                    .filter(|&&vertex| owners[vertex as usize] == Some(plate))
                    .fold((Vec3::ZERO, 0u32), |(sum, count), &vertex| {
                        (sum + geometry.position(vertex), count + 1)
                    });
                sum / count.max(1) as f32
            };
            let velocity = |plate: usize| plates[plate].calculate_motion(position);
            let stress_between = |a: usize, b: usize| {
                pair_stress(position, side(a), side(b), velocity(a), velocity(b))
            };

            corner.stress = match corner.plates[..] {
                [a, b] => stress_between(a, b),
                [a, b, c] => {
                    let pairs = [stress_between(a, b), stress_between(b, c), stress_between(a, c)];
                    Stress {
                        pressure: pairs.iter().map(|s| s.pressure).sum::<f32>() / 3.0,
                        shear: pairs.iter().map(|s| s.shear).sum::<f32>() / 3.0,
                    }
                }
                _ => Stress::default(),
            };
        }
    }
}

/// Stress between two plates meeting at `position`.
///
/// The boundary normal points from the first plate's side toward the second
/// plate's side, so a first plate moving into the second gives positive
/// pressure. Shear is measured along the boundary tangent.
pub fn pair_stress(
    position: Vec3,
    first_side: Vec3,
    second_side: Vec3,
    first_velocity: Vec3,
    second_velocity: Vec3,
) -> Stress {
    let up = position.normalize_or_zero();
    let normal = project_onto_tangent(second_side - first_side, up).normalize_or_zero();
    if normal == Vec3::ZERO {
        return Stress::default();
    }
    let tangent = normal.cross(up);
    let relative = first_velocity - second_velocity;
    Stress {
        pressure: relative.dot(normal),
        shear: relative.dot(tangent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryConfig, KinematicsConfig};
    use crate::factory::GeometryFactory;
    use crate::mesh::SphereVertex;
    use crate::tools::world_rng;
    use rstest::rstest;

    // Corner on +X, first plate toward -Z, second toward +Z.
    const POSITION: Vec3 = Vec3::X;
    const FIRST: Vec3 = Vec3::new(0.99, 0.0, -0.1);
    const SECOND: Vec3 = Vec3::new(0.99, 0.0, 0.1);

    #[rstest]
    #[case(Vec3::new(0.0, 0.0, 0.02), Vec3::new(0.0, 0.0, -0.02), 0.04, 0.0)] // head-on
    #[case(Vec3::new(0.0, 0.0, -0.02), Vec3::new(0.0, 0.0, 0.02), -0.04, 0.0)] // apart
    #[case(Vec3::new(0.0, 0.01, 0.0), Vec3::new(0.0, -0.01, 0.0), 0.0, 0.02)] // sliding
    #[case(Vec3::ZERO, Vec3::ZERO, 0.0, 0.0)] // still
    fn pressure_and_shear_components(
        #[case] first_velocity: Vec3,
        #[case] second_velocity: Vec3,
        #[case] pressure: f32,
        #[case] shear: f32,
    ) {
        let stress = pair_stress(POSITION, FIRST, SECOND, first_velocity, second_velocity);
        assert!((stress.pressure - pressure).abs() < 1e-6, "pressure {}", stress.pressure);
        assert!((stress.shear.abs() - shear).abs() < 1e-6, "shear {}", stress.shear);
    }

    #[test]
    fn swapping_plates_keeps_the_stress() {
        let v1 = Vec3::new(0.0, 0.013, 0.02);
        let v2 = Vec3::new(0.0, -0.004, -0.01);
        let forward = pair_stress(POSITION, FIRST, SECOND, v1, v2);
        let backward = pair_stress(POSITION, SECOND, FIRST, v2, v1);
        assert!((forward.pressure - backward.pressure).abs() < 1e-6);
        assert!((forward.shear - backward.shear).abs() < 1e-6);
    }

    #[test]
    fn coincident_sides_give_no_stress() {
        let stress = pair_stress(POSITION, FIRST, FIRST, Vec3::Z, -Vec3::Z);
        assert_eq!(stress, Stress::default());
    }

    #[test]
    fn motionless_plates_have_zero_stress_everywhere() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(2);
        let kinematics = KinematicsConfig {
            max_rotation_degrees: 0.0,
            ..KinematicsConfig::default()
        };
        let mut plates = Plates::new(5, kinematics, BoundaryConfig::default());
        plates.create_plates(&geometry, &mut world_rng(6));

        assert!(!plates.corners().is_empty());
        for corner in plates.corners().values() {
            assert_eq!(corner.stress.magnitude(), 0.0);
        }
    }
}
