//! Boundary classification and the elevation field derived from it.

use super::{BoundaryKind, Plates, Stress};
use crate::config::BoundaryConfig;
use crate::geometry::Geometry;
use crate::mesh::Vertex;
use crate::tools::great_circle_distance;

/// For every plate, its border corners with their great-circle distance to the
/// plate center, nearest first.
///
/// Only centroids that are border corners of the plate are recorded. Interior
/// centroids and corners of other plates have no entry, so this is not a
/// distance map over every [`Centroid`](crate::topology::Centroid); it holds
/// exactly what the interior elevation falloff searches.
#[derive(Debug, Clone, Default)]
pub struct PlateDistances {
    by_plate: Vec<Vec<(u32, f32)>>,
}

impl PlateDistances {
    pub fn corners(&self, plate: usize) -> &[(u32, f32)] {
        self.by_plate.get(plate).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_plate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_plate.is_empty()
    }

    /// Nearest corner of `plate` to a point lying `from_center` radians from
    /// the plate center. `distance_to` measures the true distance to a
    /// corner; the center distances bound it from below, so the scan walks
    /// outward from `from_center` and stops once no closer corner can exist.
    pub fn nearest(
        &self,
        plate: usize,
        from_center: f32,
        mut distance_to: impl FnMut(u32) -> f32,
    ) -> Option<(u32, f32)> {
        let corners = self.corners(plate);
        let split = corners.partition_point(|&(_, distance)| distance < from_center);
        let (mut down, mut up) = (split, split);
        let mut best: Option<(u32, f32)> = None;

        loop {
            let bound = best.map_or(f32::INFINITY, |(_, distance)| distance);
            let below = down
                .checked_sub(1)
                .filter(|&index| from_center - corners[index].1 < bound);
            let above = (up < corners.len() && corners[up].1 - from_center < bound).then_some(up);
            if below.is_none() && above.is_none() {
                break;
            }
            for index in below.into_iter().chain(above) {
                let corner = corners[index].0;
                let distance = distance_to(corner);
                if best.is_none_or(|(_, nearest)| distance < nearest) {
                    best = Some((corner, distance));
                }
            }
            if below.is_some() {
                down -= 1;
            }
            if above.is_some() {
                up += 1;
            }
        }
        best
    }
}

/// Kind and elevation of a corner between two plates. `stress` must be
/// measured from the first plate toward the second.
pub fn classify_corner(
    stress: Stress,
    first_elevation: f32,
    second_elevation: f32,
    config: &BoundaryConfig,
) -> (BoundaryKind, f32) {
    let average = (first_elevation + second_elevation) / 2.0;
    let highest = first_elevation.max(second_elevation);
    let pressure = stress.pressure;
    let shear = stress.shear.abs();

    if pressure.abs() < config.dormant_threshold && shear < config.dormant_threshold {
        return (BoundaryKind::Dormant, average);
    }
    if shear > pressure.abs() * config.shear_dominance {
        return (
            BoundaryKind::Shearing,
            average + shear * config.stress_scale / 8.0,
        );
    }
    if pressure > 0.0 {
        if first_elevation > 0.0 && second_elevation > 0.0 {
            return (
                BoundaryKind::Colliding,
                highest + pressure * config.stress_scale,
            );
        }
        let kind = if first_elevation < second_elevation {
            BoundaryKind::Subducting
        } else {
            BoundaryKind::Superducting
        };
        return (kind, highest + pressure * config.stress_scale / 2.0);
    }
    (
        BoundaryKind::Diverging,
        highest + pressure * config.stress_scale / 4.0,
    )
}

impl Plates {
    /// Classifies every two-plate corner and assigns each corner its
    /// elevation. Triple junctions stay unclassified and take the highest
    /// plate elevation under net pressure, the average otherwise.
    pub fn calculate_border_elevations(&mut self) {
        let plates = &self.plates;
        let config = &self.boundary_config;

        for corner in self.corners.values_mut() {
            let elevations: Vec<f32> = corner.plates.iter().map(|&p| plates[p].elevation).collect();
            match elevations[..] {
                [first, second] => {
                    let (kind, elevation) = classify_corner(corner.stress, first, second, config);
                    corner.kind = Some(kind);
                    corner.elevation = elevation;
                }
                _ => {
                    corner.kind = None;
                    corner.elevation = if corner.stress.pressure > 0.0 {
                        elevations.iter().copied().fold(f32::MIN, f32::max)
                    } else {
                        elevations.iter().sum::<f32>() / elevations.len().max(1) as f32
                    };
                }
            }
        }

        log::debug!(
            "Classified {} corners ({} triple junctions)",
            self.corners.len(),
            self.corners.values().filter(|c| c.is_triple_junction()).count()
        );
    }

    /// Fills the per-vertex elevation field. Border tiles average the corners
    /// around them; interior tiles fade from their plate's base elevation
    /// toward the nearest corner of the same plate, with a quadratic falloff
    /// over `interior_falloff` radians.
    pub fn calculate_tile_elevations<V: Vertex>(&mut self, geometry: &Geometry<V>) {
        let topology = geometry.topology();

        let mut by_plate: Vec<Vec<(u32, f32)>> = vec![Vec::new(); self.plates.len()];
        for corner in self.corners.values() {
            let position = topology.centroid(corner.centroid).position;
            for &plate in &corner.plates {
                let distance = great_circle_distance(self.plates[plate].center, position);
                by_plate[plate].push((corner.centroid, distance));
            }
        }
        for corners in &mut by_plate {
            corners.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        self.distances = PlateDistances { by_plate };

        let falloff = self.boundary_config.interior_falloff;
        let mut elevations = vec![0.0; geometry.vertex_count()];
        let mut on_border = vec![false; geometry.vertex_count()];
        for plate in &self.plates {
            for &tile in plate.border_tiles() {
                on_border[tile as usize] = true;
            }
        }

        for plate in &self.plates {
            for &tile in plate.tiles() {
                let position = geometry.position(tile);
                elevations[tile as usize] = if on_border[tile as usize] {
                    let touching: Vec<f32> = topology
                        .vertex_triangles(tile)
                        .iter()
                        .filter_map(|triangle| self.corners.get(triangle))
                        .map(|corner| corner.elevation)
                        .collect();
                    if touching.is_empty() {
                        plate.elevation
                    } else {
                        touching.iter().sum::<f32>() / touching.len() as f32
                    }
                } else {
                    let from_center = great_circle_distance(plate.center, position);
                    let nearest = self.distances.nearest(plate.id, from_center, |corner| {
                        great_circle_distance(position, topology.centroid(corner).position)
                    });
                    match nearest {
                        Some((corner, distance)) if falloff > 0.0 => {
                            let weight = (1.0 - distance / falloff).max(0.0).powi(2);
                            let target = self.corners[&corner].elevation;
                            plate.elevation + (target - plate.elevation) * weight
                        }
                        _ => plate.elevation,
                    }
                };
            }
        }
        self.tile_elevations = elevations;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KinematicsConfig;
    use crate::factory::GeometryFactory;
    use crate::mesh::SphereVertex;
    use crate::tools::world_rng;
    use rstest::rstest;
    use std::collections::BTreeSet;

    #[test]
    fn distances_cover_only_border_corners_of_each_plate() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(2);
        let mut plates = Plates::new(5, KinematicsConfig::default(), BoundaryConfig::default());
        plates.create_plates(&geometry, &mut world_rng(19));

        let distances = plates.distances();
        assert_eq!(distances.len(), plates.len());
        let recorded: BTreeSet<u32> = (0..plates.len())
            .flat_map(|plate| distances.corners(plate).iter().map(|&(centroid, _)| centroid))
            .collect();
        assert!(recorded.iter().eq(plates.corners().keys()));
        assert!(recorded.len() < geometry.topology().centroids().len());

        for plate in 0..plates.len() {
            let corners = distances.corners(plate);
            assert!(corners.windows(2).all(|pair| pair[0].1 <= pair[1].1));
            for &(centroid, _) in corners {
                let corner = &plates.corners()[&centroid];
                assert!(corner.plates.contains(&plate));
            }
        }
    }

    fn stress(pressure: f32, shear: f32) -> Stress {
        Stress { pressure, shear }
    }

    #[test]
    fn still_corner_is_dormant_at_the_mean_elevation() {
        let (kind, elevation) = classify_corner(stress(0.0, 0.0), 0.4, -0.2, &BoundaryConfig::default());
        assert_eq!(kind, BoundaryKind::Dormant);
        assert!((elevation - 0.1).abs() < 1e-6);
    }

    #[rstest]
    #[case(stress(0.05, 0.0), 0.3, 0.5, BoundaryKind::Colliding)]
    #[case(stress(0.05, 0.01), -0.3, 0.5, BoundaryKind::Subducting)]
    #[case(stress(0.05, 0.01), 0.5, -0.3, BoundaryKind::Superducting)]
    #[case(stress(-0.05, 0.0), 0.3, 0.5, BoundaryKind::Diverging)]
    #[case(stress(0.01, -0.05), 0.3, 0.5, BoundaryKind::Shearing)]
    #[case(stress(0.001, -0.002), 0.3, 0.5, BoundaryKind::Dormant)]
    fn corner_kinds(
        #[case] stress: Stress,
        #[case] first: f32,
        #[case] second: f32,
        #[case] expected: BoundaryKind,
    ) {
        let (kind, _) = classify_corner(stress, first, second, &BoundaryConfig::default());
        assert_eq!(kind, expected);
    }

    #[test]
    fn collision_raises_and_divergence_lowers() {
        let config = BoundaryConfig::default();
        let (_, collision) = classify_corner(stress(0.05, 0.0), 0.3, 0.5, &config);
        let (_, rift) = classify_corner(stress(-0.05, 0.0), 0.3, 0.5, &config);
        assert!((collision - (0.5 + 0.05 * config.stress_scale)).abs() < 1e-6);
        assert!((rift - (0.5 - 0.05 * config.stress_scale / 4.0)).abs() < 1e-6);
    }

    #[test]
    fn nearest_corner_matches_a_full_scan() {
        let distances = PlateDistances {
            by_plate: vec![vec![(10, 0.1), (11, 0.2), (12, 0.35), (13, 0.5), (14, 0.9)]],
        };
        // Stand-in true distances, never below the center-distance difference
        let truth = |corner: u32| match corner {
            10 => 0.45,
            11 => 0.3,
            12 => 0.4,
            13 => 0.2,
            _ => 0.7,
        };

        assert_eq!(distances.nearest(0, 0.4, truth), Some((13, 0.2)));
        assert_eq!(distances.nearest(1, 0.4, truth), None);
    }

    #[test]
    fn elevation_field_covers_every_tile() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(3);
        let mut plates = Plates::new(6, KinematicsConfig::default(), BoundaryConfig::default());
        plates.create_plates(&geometry, &mut world_rng(21));

        assert_eq!(plates.distances().len(), 6);
        for plate in plates.plates() {
            let corners = plates.distances().corners(plate.id);
            assert!(!corners.is_empty());
            assert!(corners.windows(2).all(|pair| pair[0].1 <= pair[1].1));
        }
        assert!(plates.tile_elevations().iter().all(|e| e.is_finite()));
    }

    #[test]
    fn deep_interior_keeps_the_plate_elevation() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(3);
        let config = BoundaryConfig {
            interior_falloff: 0.0,
            ..BoundaryConfig::default()
        };
        let mut plates = Plates::new(3, KinematicsConfig::default(), config);
        plates.create_plates(&geometry, &mut world_rng(8));

        for plate in plates.plates() {
            for &tile in plate.tiles() {
                if !plate.border_tiles().contains(&tile) {
                    assert_eq!(plates.tile_elevations()[tile as usize], plate.elevation);
                }
            }
        }
    }
}
