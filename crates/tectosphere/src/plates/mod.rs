//! Flood-fill partitioning of the sphere into plates, and everything derived
//! from the partition: borders, corners, stress and elevation.

mod boundaries;
mod elevation;
mod stress;

pub use boundaries::{Border, BorderCorner, BoundaryKind};
pub use elevation::PlateDistances;
pub use stress::Stress;

use crate::config::{BoundaryConfig, KinematicsConfig};
use crate::geometry::Geometry;
use crate::mesh::Vertex;
use crate::plate::Plate;
use crate::topology::EdgeKey;
use rand::Rng;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Plates {
    requested: usize,
    kinematics: KinematicsConfig,
    boundary_config: BoundaryConfig,
    plates: Vec<Plate>,
    /// Owning plate of every vertex
    owners: Vec<Option<usize>>,
    claimed: usize,
    borders: BTreeMap<EdgeKey, Border>,
    corners: BTreeMap<u32, BorderCorner>,
    distances: PlateDistances,
    tile_elevations: Vec<f32>,
}

impl Plates {
    pub fn new(
        plate_count: usize,
        kinematics: KinematicsConfig,
        boundary_config: BoundaryConfig,
    ) -> Self {
        Self {
            requested: plate_count,
            kinematics,
            boundary_config,
            plates: Vec::new(),
            owners: Vec::new(),
            claimed: 0,
            borders: BTreeMap::new(),
            corners: BTreeMap::new(),
            distances: PlateDistances::default(),
            tile_elevations: Vec::new(),
        }
    }

    /// Seeds, grows to completion and derives borders, stress and elevation.
    pub fn create_plates<V: Vertex, R: Rng + ?Sized>(
        &mut self,
        geometry: &Geometry<V>,
        rng: &mut R,
    ) {
        self.seed(geometry, rng);
        let mut rounds = 0;
        while !self.is_complete() {
            rounds += 1;
            if self.grow_once(geometry) == 0 {
                break;
            }
        }
        log::debug!("Flood fill finished after {rounds} rounds");
        self.finalize(geometry);
    }

    /// Drops all plates and places one seed per plate on distinct random
    /// vertices, sampling each plate's kinematics right after its seed.
    pub fn seed<V: Vertex, R: Rng + ?Sized>(&mut self, geometry: &Geometry<V>, rng: &mut R) {
        let vertex_count = geometry.vertex_count();
        let count = self.requested.min(vertex_count);
        if count < self.requested {
            log::warn!(
                "Requested {} plates but the mesh only has {} vertices",
                self.requested,
                vertex_count
            );
        }

        self.plates.clear();
        self.borders.clear();
        self.corners.clear();
        self.distances = PlateDistances::default();
        self.tile_elevations.clear();
        self.owners = vec![None; vertex_count];
        self.claimed = 0;

        for id in 0..count {
            let seed = loop {
                let candidate = rng.random_range(0..vertex_count as u32);
                if self.owners[candidate as usize].is_none() {
                    break candidate;
                }
            };
            self.owners[seed as usize] = Some(id);
            self.claimed += 1;
            let center = geometry.position(seed);
            self.plates
                .push(Plate::new(id, seed, center, &self.kinematics, rng));
        }
    }

    /// One round-robin growth round; every plate expands by one ring.
    /// Returns the number of vertices claimed this round.
    pub fn grow_once<V: Vertex>(&mut self, geometry: &Geometry<V>) -> usize {
        let neighbours = geometry.topology().vertex_neighbours();
        let mut grown = 0;
        for plate in &mut self.plates {
            grown += plate.grow(1, neighbours, &mut self.owners);
        }
        self.claimed += grown;
        log::trace!("Growth round claimed {grown} vertices ({} of {})", self.claimed, self.owners.len());
        grown
    }

    pub fn is_complete(&self) -> bool {
        !self.owners.is_empty() && self.claimed == self.owners.len()
    }

    /// Checks the partition and derives borders, stress and elevation.
    ///
    /// # Panics
    /// If any vertex is still unclaimed; that only happens on a disconnected mesh.
    pub fn finalize<V: Vertex>(&mut self, geometry: &Geometry<V>) {
        if let Some(vertex) = self.owners.iter().position(Option::is_none) {
            panic!(
                "vertex {vertex} was not claimed by any of {} plates; the mesh is disconnected",
                self.plates.len()
            );
        }
        self.calculate_plate_boundaries(geometry);
        self.calculate_stresses(geometry);
        self.calculate_border_elevations();
        self.calculate_tile_elevations(geometry);

        log::info!(
            "{} plates, {} border edges, {} corners",
            self.plates.len(),
            self.borders.len(),
            self.corners.len()
        );
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn plate(&self, id: usize) -> &Plate {
        &self.plates[id]
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }

    pub fn owner(&self, vertex: u32) -> Option<usize> {
        self.owners.get(vertex as usize).copied().flatten()
    }

    pub fn owners(&self) -> &[Option<usize>] {
        &self.owners
    }

    pub fn claimed(&self) -> usize {
        self.claimed
    }

    pub fn borders(&self) -> &BTreeMap<EdgeKey, Border> {
        &self.borders
    }

    pub fn corners(&self) -> &BTreeMap<u32, BorderCorner> {
        &self.corners
    }

    pub fn distances(&self) -> &PlateDistances {
        &self.distances
    }

    /// Elevation of every vertex; empty until the plates are finalized.
    pub fn tile_elevations(&self) -> &[f32] {
        &self.tile_elevations
    }

    pub fn boundary_config(&self) -> &BoundaryConfig {
        &self.boundary_config
    }
}
