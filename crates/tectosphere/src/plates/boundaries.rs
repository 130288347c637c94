//! Plate border and corner extraction
//!
//! A border is a primal edge whose endpoints belong to different plates. Its
//! two flanking triangle centroids are the border's corners. A corner is shared
//! by every border edge of its triangle, so it sees two plates or, at a triple
//! junction, three.

use super::{Plates, Stress};
use crate::geometry::Geometry;
use crate::mesh::Vertex;
use crate::topology::EdgeKey;

/// How two plates interact at a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoundaryKind {
    /// Both plates push into each other and neither dives under (red)
    Colliding,
    /// The corner's first plate dives under the second (orange)
    Subducting,
    /// The corner's second plate dives under the first (yellow)
    Superducting,
    /// Plates pull apart (blue)
    Diverging,
    /// Plates slide past each other (green)
    Shearing,
    /// No significant relative motion (gray)
    Dormant,
}

impl BoundaryKind {
    pub const ALL: [BoundaryKind; 6] = [
        BoundaryKind::Colliding,
        BoundaryKind::Subducting,
        BoundaryKind::Superducting,
        BoundaryKind::Diverging,
        BoundaryKind::Shearing,
        BoundaryKind::Dormant,
    ];

    pub fn color(&self) -> [f32; 4] {
        match self {
            BoundaryKind::Colliding => [1.0, 0.0, 0.0, 1.0],
            BoundaryKind::Subducting => [1.0, 0.5, 0.0, 1.0],
            BoundaryKind::Superducting => [1.0, 1.0, 0.0, 1.0],
            BoundaryKind::Diverging => [0.0, 0.5, 1.0, 1.0],
            BoundaryKind::Shearing => [0.0, 1.0, 0.3, 1.0],
            BoundaryKind::Dormant => [0.6, 0.6, 0.6, 1.0],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoundaryKind::Colliding => "colliding",
            BoundaryKind::Subducting => "subducting",
            BoundaryKind::Superducting => "superducting",
            BoundaryKind::Diverging => "diverging",
            BoundaryKind::Shearing => "shearing",
            BoundaryKind::Dormant => "dormant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    /// Plate of the edge's smaller vertex index
    pub plate0: usize,
    pub plate1: usize,
    /// Centroid indices flanking the edge
    pub corner1: u32,
    pub corner2: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorderCorner {
    pub centroid: u32,
    /// Border edges passing through this corner
    pub borders: Vec<EdgeKey>,
    /// Distinct plates meeting here, ascending
    pub plates: Vec<usize>,
    pub stress: Stress,
    /// `None` at triple junctions
    pub kind: Option<BoundaryKind>,
    pub elevation: f32,
}

impl BorderCorner {
    fn new(centroid: u32) -> Self {
        Self {
            centroid,
            borders: Vec::with_capacity(3),
            plates: Vec::with_capacity(3),
            stress: Stress::default(),
            kind: None,
            elevation: 0.0,
        }
    }

    pub fn is_triple_junction(&self) -> bool {
        self.plates.len() == 3
    }
}

impl Plates {
    /// Recomputes every plate's frontier, then records a border for each
    /// frontier edge that crosses into another plate and attaches it to the
    /// two corners flanking it.
    ///
    /// # Panics
    /// If fewer border edges than half the border tiles are found, which
    /// means the topology and the partition disagree. A frontier facing
    /// only unclaimed vertices is such a disagreement.
    pub fn calculate_plate_boundaries<V: Vertex>(&mut self, geometry: &Geometry<V>) {
        let topology = geometry.topology();
        let neighbours = topology.vertex_neighbours();

        self.borders.clear();
        self.corners.clear();

        let mut border_tiles = 0;
        for plate in &mut self.plates {
            plate.calculate_border_tiles(neighbours, &self.owners);
            border_tiles += plate.border_tiles().len();
        }

        for plate in &self.plates {
            for &tile in plate.border_tiles() {
                for &neighbour in &neighbours[tile as usize] {
                    let Some(other) = self.owners[neighbour as usize] else {
                        continue;
                    };
                    if other == plate.id {
                        continue;
                    }
                    let key = EdgeKey::new(tile, neighbour);
                    if self.borders.contains_key(&key) {
                        continue;
                    }
                    let Some(edge) = topology.edge(tile, neighbour) else {
                        continue;
                    };
                    let (low, _) = key.vertices();
                    let (plate0, plate1) = if low == tile {
                        (plate.id, other)
                    } else {
                        (other, plate.id)
                    };
                    self.borders.insert(
                        key,
                        Border {
                            plate0,
                            plate1,
                            corner1: edge.triangles[0],
                            corner2: edge.triangles[1],
                        },
                    );
                }
            }
        }

        assert!(
            self.borders.len() * 2 >= border_tiles,
            "found {} border edges for {} border tiles; topology and plate partition disagree",
            self.borders.len(),
            border_tiles
        );

        for (key, border) in &self.borders {
            for centroid in [border.corner1, border.corner2] {
                let corner = self
                    .corners
                    .entry(centroid)
                    .or_insert_with(|| BorderCorner::new(centroid));
                corner.borders.push(*key);
            }
        }

        for corner in self.corners.values_mut() {
            let mut plates: Vec<usize> = topology
                .centroid(corner.centroid)
                .faces
                .iter()
                .filter_map(|&vertex| self.owners[vertex as usize])
                .collect();
            plates.sort_unstable();
            plates.dedup();
            debug_assert!(
                (2..=3).contains(&plates.len()),
                "corner {} touches {} plates",
                corner.centroid,
                plates.len()
            );
            corner.plates = plates;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{BoundaryConfig, KinematicsConfig};
    use crate::factory::GeometryFactory;
    use crate::mesh::SphereVertex;
    use crate::plates::Plates;
    use crate::tools::world_rng;

    #[test]
    fn four_plates_on_a_42_vertex_sphere() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(1);
        assert_eq!(geometry.vertex_count(), 42);
        let mut plates = Plates::new(4, KinematicsConfig::default(), BoundaryConfig::default());

        plates.create_plates(&geometry, &mut world_rng(31));

        assert!(plates.is_complete());
        assert!(!plates.borders().is_empty());
        for (key, border) in plates.borders() {
            let (a, b) = key.vertices();
            assert_eq!(plates.owner(a), Some(border.plate0));
            assert_eq!(plates.owner(b), Some(border.plate1));
            assert_ne!(border.plate0, border.plate1);
        }
    }

    #[test]
    fn every_corner_meets_two_or_three_plates() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(3);
        let mut plates = Plates::new(8, KinematicsConfig::default(), BoundaryConfig::default());
        plates.create_plates(&geometry, &mut world_rng(77));

        let topology = geometry.topology();
        for (index, corner) in plates.corners() {
            assert_eq!(*index, corner.centroid);
            assert!((2..=3).contains(&corner.plates.len()));
            assert!((1..=3).contains(&corner.borders.len()));
            if corner.is_triple_junction() {
                assert_eq!(corner.borders.len(), 3);
                assert!(corner.kind.is_none());
            } else {
                assert_eq!(corner.borders.len(), 2);
                assert!(corner.kind.is_some());
            }
            for key in &corner.borders {
                let (a, b) = key.vertices();
                let faces = topology.centroid(corner.centroid).faces;
                assert!(faces.contains(&a) && faces.contains(&b));
            }
        }
    }

    #[test]
    fn border_tiles_are_the_border_edge_endpoints() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(2);
        let mut plates = Plates::new(6, KinematicsConfig::default(), BoundaryConfig::default());
        plates.create_plates(&geometry, &mut world_rng(3));

        let mut endpoints: Vec<u32> = plates
            .borders()
            .keys()
            .flat_map(|key| {
                let (a, b) = key.vertices();
                [a, b]
            })
            .collect();
        endpoints.sort_unstable();
        endpoints.dedup();

        let mut tiles: Vec<u32> = plates
            .plates()
            .iter()
            .flat_map(|plate| plate.border_tiles().iter().copied())
            .collect();
        tiles.sort_unstable();

        assert_eq!(endpoints, tiles);
    }

    #[test]
    #[should_panic(expected = "topology and plate partition disagree")]
    fn a_frontier_without_border_edges_is_rejected() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(1);
        let mut plates = Plates::new(1, KinematicsConfig::default(), BoundaryConfig::default());
        plates.seed(&geometry, &mut world_rng(5));
        assert_eq!(plates.claimed(), 1);

        // The lone seed is a border tile whose neighbours belong to no plate
        plates.calculate_plate_boundaries(&geometry);
    }
}
