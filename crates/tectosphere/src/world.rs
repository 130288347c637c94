use crate::config::{MAX_SUBDIVISION_LEVEL, WorldConfig};
use crate::debug_geometry::{self, DebugLines, Motion, PlateArrow};
use crate::factory::GeometryFactory;
use crate::geometry::Geometry;
use crate::mesh::{ColorVertex, SphereVertex};
use crate::mesh_data::{ElevationColors, MeshData, PlateColors, ViewMode};
use crate::plates::{BoundaryKind, Plates};
use crate::tools::world_rng;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use std::collections::BTreeMap;

/// Owns the primal sphere, its plates and the generator every stochastic step
/// draws from. A world is always rebuilt from seed and configuration; the
/// same seed and the same sequence of calls reproduce it exactly.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    rng: StdRng,
    geometry: Geometry<SphereVertex>,
    plates: Plates,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        let plates = Plates::new(
            config.world.plate_count,
            config.kinematics.clone(),
            config.boundaries.clone(),
        );
        let mut world = Self {
            rng: world_rng(config.world.seed),
            geometry: Geometry::default(),
            plates,
            config,
        };
        world.build();
        world
    }

    /// Rebuilds everything from scratch with a new seed.
    pub fn reset(&mut self, seed: u64) {
        self.config.world.seed = seed;
        self.rng = world_rng(seed);
        self.build();
    }

    fn build(&mut self) {
        let mut level = self.config.world.subdivision_level;
        if level > MAX_SUBDIVISION_LEVEL {
            warn!("Subdivision level {level} clamped to {MAX_SUBDIVISION_LEVEL}");
            level = MAX_SUBDIVISION_LEVEL;
        }
        info!(
            "Building world: seed {}, level {}, {} plates",
            self.config.world.seed, level, self.config.world.plate_count
        );

        self.geometry = GeometryFactory::icosphere(level);
        for pass in 0..self.config.distortion.passes {
            let flips = self
                .geometry
                .tweak_triangles(self.config.distortion.tweak_ratio, &mut self.rng);
            let shift = self
                .geometry
                .relax_triangles(self.config.distortion.relax_multiplier);
            debug!("Distortion pass {pass}: {flips} flips, total shift {shift:.4}");
        }
        self.geometry.refresh_sphere_attributes();
        self.plates.create_plates(&self.geometry, &mut self.rng);
    }

    /// One relaxation pass. Returns the total vertex displacement.
    pub fn relax_once(&mut self) -> f32 {
        let shift = self
            .geometry
            .relax_triangles(self.config.distortion.relax_multiplier);
        info!("Relaxed: total shift {shift:.4}");
        self.after_geometry_edit();
        shift
    }

    /// One tweak pass. Returns the number of flipped edges.
    pub fn tweak_once(&mut self) -> usize {
        let flips = self
            .geometry
            .tweak_triangles(self.config.distortion.tweak_ratio, &mut self.rng);
        info!("Tweaked: {flips} edges flipped");
        self.after_geometry_edit();
        flips
    }

    /// `passes` rounds of tweak followed by relax.
    pub fn distort(&mut self, passes: usize) {
        let mut flips = 0;
        for _ in 0..passes {
            flips += self
                .geometry
                .tweak_triangles(self.config.distortion.tweak_ratio, &mut self.rng);
            self.geometry
                .relax_triangles(self.config.distortion.relax_multiplier);
        }
        info!("Distorted: {passes} passes, {flips} edges flipped");
        self.after_geometry_edit();
    }

    /// Relaxes until the mean displacement of a pass falls below the
    /// convergence threshold. Returns the number of passes run.
    pub fn settle(&mut self) -> usize {
        if self.config.distortion.settle_passes == 0 {
            debug!("Settling skipped, no passes configured");
            return 0;
        }
        let limit = self.config.distortion.convergence_threshold * self.geometry.ideal_edge_length();
        let vertex_count = self.geometry.vertex_count().max(1) as f32;
        let mut passes = 0;
        let mut mean = f32::INFINITY;
        while passes < self.config.distortion.settle_passes {
            passes += 1;
            mean = self
                .geometry
                .relax_triangles(self.config.distortion.relax_multiplier)
                / vertex_count;
            if mean < limit {
                break;
            }
        }
        if mean >= limit {
            warn!("Settling stopped after {passes} passes with mean shift {mean:.5}");
        } else {
            info!("Settled after {passes} passes");
        }
        self.after_geometry_edit();
        passes
    }

    /// Drops the plates and floods the current sphere with new ones.
    pub fn recreate_plates(&mut self) {
        info!("Recreating {} plates", self.config.world.plate_count);
        self.plates.create_plates(&self.geometry, &mut self.rng);
    }

    /// Advances the flood fill by one ring. Seeds new plates first if the
    /// previous partition is already complete. Returns the vertices claimed.
    pub fn grow_plates_once(&mut self) -> usize {
        if self.plates.is_empty() || self.plates.is_complete() {
            self.plates.seed(&self.geometry, &mut self.rng);
            info!("Seeded {} plates", self.plates.len());
            if self.plates.is_complete() {
                self.plates.finalize(&self.geometry);
            }
            return self.plates.claimed();
        }
        let grown = self.plates.grow_once(&self.geometry);
        info!(
            "Plates grew by {grown} vertices ({} of {})",
            self.plates.claimed(),
            self.geometry.vertex_count()
        );
        if self.plates.is_complete() || grown == 0 {
            self.plates.finalize(&self.geometry);
        }
        grown
    }

    fn after_geometry_edit(&mut self) {
        self.geometry.refresh_sphere_attributes();
        if self.plates.is_complete() {
            self.plates.finalize(&self.geometry);
        }
    }

    /// Dual mesh with one flat-colored tile per vertex.
    pub fn generate_dual(&self, view_mode: ViewMode) -> Geometry<ColorVertex> {
        match view_mode {
            ViewMode::Plates => self.geometry.generate_dual(&PlateColors::new(&self.plates)),
            ViewMode::Elevation => self
                .geometry
                .generate_dual(&ElevationColors::new(self.plates.tile_elevations())),
        }
    }

    pub fn mesh_data(&self, view_mode: ViewMode) -> MeshData {
        MeshData::from_geometry(&self.generate_dual(view_mode))
    }

    pub fn boundary_lines(&self) -> DebugLines {
        debug_geometry::boundary_lines(&self.geometry, &self.plates)
    }

    pub fn motion_lines(&self, motion: Motion, scale: f32) -> DebugLines {
        debug_geometry::motion_lines(&self.geometry, &self.plates, motion, scale)
    }

    pub fn plate_arrows(&self) -> Vec<PlateArrow> {
        debug_geometry::plate_arrows(&self.geometry, &self.plates)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.world.seed
    }

    pub fn geometry(&self) -> &Geometry<SphereVertex> {
        &self.geometry
    }

    pub fn plates(&self) -> &Plates {
        &self.plates
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats::collect(self)
    }
}

/// Summary numbers for reporting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldStats {
    pub seed: u64,
    pub vertices: usize,
    pub triangles: usize,
    pub edges: usize,
    pub min_degree: u32,
    pub max_degree: u32,
    pub plates: usize,
    pub claimed: usize,
    pub smallest_plate: usize,
    pub largest_plate: usize,
    pub borders: usize,
    pub corners: usize,
    pub triple_junctions: usize,
    pub kinds: BTreeMap<BoundaryKind, usize>,
    pub elevation_min: f32,
    pub elevation_max: f32,
}

impl WorldStats {
    fn collect(world: &World) -> Self {
        let topology = world.geometry.topology();
        let degrees = topology.vertex_degrees();
        let plates = &world.plates;
        let sizes = plates.plates().iter().map(|plate| plate.len());

        let mut kinds = BTreeMap::new();
        for kind in plates.corners().values().filter_map(|corner| corner.kind) {
            *kinds.entry(kind).or_insert(0) += 1;
        }
        let elevations = plates.tile_elevations();

        WorldStats {
            seed: world.seed(),
            vertices: world.geometry.vertex_count(),
            triangles: world.geometry.triangle_count(),
            edges: topology.edge_count(),
            min_degree: degrees.iter().copied().min().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            plates: plates.len(),
            claimed: plates.claimed(),
            smallest_plate: sizes.clone().min().unwrap_or(0),
            largest_plate: sizes.max().unwrap_or(0),
            borders: plates.borders().len(),
            corners: plates.corners().len(),
            triple_junctions: plates
                .corners()
                .values()
                .filter(|corner| corner.is_triple_junction())
                .count(),
            kinds,
            elevation_min: elevations.iter().copied().reduce(f32::min).unwrap_or(0.0),
            elevation_max: elevations.iter().copied().reduce(f32::max).unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> WorldConfig {
        let mut config = WorldConfig::default();
        config.world.seed = seed;
        config.world.subdivision_level = 2;
        config.world.plate_count = 6;
        config.distortion.passes = 2;
        config
    }

    #[test]
    fn same_seed_same_world() {
        let a = World::new(small_config(11));
        let b = World::new(small_config(11));

        let positions = |world: &World| world.geometry().mesh().positions().collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.plates().owners(), b.plates().owners());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn reset_rebuilds_from_the_new_seed() {
        let mut world = World::new(small_config(1));
        world.reset(2);

        let fresh = World::new(small_config(2));
        assert_eq!(world.seed(), 2);
        assert_eq!(world.plates().owners(), fresh.plates().owners());
    }

    #[test]
    fn geometry_edits_keep_the_partition_and_unit_sphere() {
        let mut world = World::new(small_config(3));
        world.tweak_once();
        world.relax_once();
        world.distort(2);

        let stats = world.stats();
        assert_eq!(stats.claimed, stats.vertices);
        assert!(stats.borders > 0);
        assert!(stats.min_degree >= 5 && stats.max_degree <= 7);
        for position in world.geometry().mesh().positions() {
            assert!((position.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn settle_is_bounded() {
        let mut world = World::new(small_config(4));
        let passes = world.settle();
        assert!((1..=world.config().distortion.settle_passes).contains(&passes));
    }

    #[test]
    fn settle_with_no_passes_leaves_the_sphere_alone() {
        let mut config = small_config(4);
        config.distortion.settle_passes = 0;
        let mut world = World::new(config);
        let before: Vec<_> = world.geometry().mesh().positions().collect();
        let stats = world.stats();

        assert_eq!(world.settle(), 0);

        let after: Vec<_> = world.geometry().mesh().positions().collect();
        assert_eq!(before, after);
        assert_eq!(world.stats(), stats);
    }

    #[test]
    fn growth_can_be_animated_ring_by_ring() {
        let mut world = World::new(small_config(5));
        let seeded = world.grow_plates_once();
        assert_eq!(seeded, 6);
        assert!(!world.plates().is_complete());
        assert!(world.plates().borders().is_empty());

        let mut rounds = 0;
        while !world.plates().is_complete() {
            assert!(world.grow_plates_once() > 0);
            rounds += 1;
        }
        assert!(rounds > 0);
        assert!(!world.plates().borders().is_empty());
        assert_eq!(world.plates().tile_elevations().len(), world.geometry().vertex_count());
    }

    #[test]
    fn both_view_modes_build_the_same_dual() {
        let world = World::new(small_config(6));
        let plates = world.mesh_data(ViewMode::Plates);
        let elevation = world.mesh_data(ViewMode::Elevation);

        assert_eq!(plates.triangle_count(), world.stats().edges * 2);
        assert_eq!(plates.positions, elevation.positions);
        assert_ne!(plates.colors, elevation.colors);
    }

    #[test]
    fn stats_count_every_classified_corner() {
        let world = World::new(small_config(7));
        let stats = world.stats();
        let classified: usize = stats.kinds.values().sum();
        assert_eq!(classified + stats.triple_junctions, stats.corners);
        assert!(stats.elevation_min <= stats.elevation_max);
        assert_eq!(world.boundary_lines().len(), stats.borders);
        assert!(world.plate_arrows().len() <= stats.plates);
    }
}
