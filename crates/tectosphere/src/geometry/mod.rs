//! A mesh, its triangle list and the lazily derived topology, plus the
//! operations that reshape them.

mod dual;
mod relax;
mod subdivide;
mod tweak;

pub use dual::VertexColorProvider;

use crate::constants::UNIT_SPHERE_AREA;
use crate::mesh::{HasNormal, HasUv, Indices, Mesh, Vertex};
use crate::topology::{EdgeKey, Topology, TopologyCache};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[derive(Debug, Clone, Default)]
pub struct Geometry<V> {
    mesh: Mesh<V>,
    indices: Indices,
    topology: TopologyCache,
}

impl<V: Vertex> Geometry<V> {
    pub fn new(mesh: Mesh<V>, indices: Indices) -> Self {
        debug_assert!(
            indices.required_vertex_count() <= mesh.len(),
            "triangle references a vertex past the end of the mesh"
        );
        Self {
            mesh,
            indices,
            topology: TopologyCache::default(),
        }
    }

    pub fn mesh(&self) -> &Mesh<V> {
        &self.mesh
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.triangle_count()
    }

    /// Builds the topology on first access after an edit.
    pub fn topology(&self) -> &Topology {
        self.topology.get_or_generate(&self.mesh, &self.indices)
    }

    /// Drops the cached topology. Called after every structural or positional edit.
    pub fn regenerate(&mut self) {
        self.topology.invalidate();
    }

    pub fn position(&self, vertex: u32) -> Vec3 {
        self.mesh.position(vertex)
    }

    pub fn triangle_vertices(&self, triangle: u32) -> [u32; 3] {
        self.indices.triangle(triangle)
    }

    pub fn triangle_corners(&self, triangle: u32) -> [Vec3; 3] {
        self.indices.triangle(triangle).map(|v| self.mesh.position(v))
    }

    /// Straight average of the three corners, not projected onto the sphere.
    pub fn triangle_centroid(&self, triangle: u32) -> Vec3 {
        let [a, b, c] = self.triangle_corners(triangle);
        (a + b + c) / 3.0
    }

    /// Planar area of the triangle.
    pub fn triangle_area(&self, triangle: u32) -> f32 {
        let [a, b, c] = self.triangle_corners(triangle);
        (b - a).cross(c - a).length() * 0.5
    }

    /// True if any interior angle exceeds 90 degrees.
    pub fn is_obtuse(&self, triangle: u32) -> bool {
        let [a, b, c] = self.triangle_corners(triangle);
        (b - a).dot(c - a) < 0.0 || (a - b).dot(c - b) < 0.0 || (a - c).dot(b - c) < 0.0
    }

    /// The vertex of `triangle` that is neither `a` nor `b`.
    pub fn opposite_vertex(&self, triangle: u32, a: u32, b: u32) -> Option<u32> {
        self.indices
            .triangle(triangle)
            .into_iter()
            .find(|&v| v != a && v != b)
    }

    pub fn edge_length(&self, key: EdgeKey) -> f32 {
        let (a, b) = key.vertices();
        self.mesh.position(a).distance(self.mesh.position(b))
    }

    /// Triangle-degree of a vertex (number of triangles using it).
    pub fn vertex_degree(&self, vertex: u32) -> u32 {
        self.topology().vertex_degree(vertex)
    }

    /// Edge length of an equilateral triangle whose area is the unit sphere's
    /// surface split evenly across the current triangle count.
    pub fn ideal_edge_length(&self) -> f32 {
        let triangles = self.triangle_count().max(1) as f32;
        let ideal_area = UNIT_SPHERE_AREA / triangles;
        (4.0 * ideal_area / 3f32.sqrt()).sqrt()
    }

    /// Checks that every triangle winds counter-clockwise seen from outside.
    pub fn is_outward_facing(&self) -> bool {
        (0..self.triangle_count() as u32).all(|triangle| {
            let [a, b, c] = self.triangle_corners(triangle);
            (b - a).cross(c - a).dot(a + b + c) > 0.0
        })
    }
}

impl<V: Vertex + HasNormal + HasUv> Geometry<V> {
    /// Recomputes normals (radial) and equirectangular UVs from positions.
    pub fn refresh_sphere_attributes(&mut self) {
        for index in 0..self.mesh.len() as u32 {
            let direction = self.mesh.position(index).normalize_or_zero();
            self.mesh.set_normal(index, direction);
            self.mesh.set_uv(index, spherical_uv(direction));
        }
    }
}

pub fn spherical_uv(direction: Vec3) -> Vec2 {
    Vec2::new(
        0.5 + direction.z.atan2(direction.x) / TAU,
        0.5 - direction.y.clamp(-1.0, 1.0).asin() / PI,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::SphereVertex;

    fn right_triangle() -> Geometry<SphereVertex> {
        Geometry::new(
            Mesh::from_positions([Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(2.0, 2.0, 0.0)]),
            Indices::from_triangles([[0, 1, 2], [1, 3, 2]]),
        )
    }

    #[test]
    fn triangle_queries() {
        let geometry = right_triangle();
        assert_eq!(geometry.triangle_vertices(1), [1, 3, 2]);
        assert!((geometry.triangle_area(0) - 0.5).abs() < 1e-6);
        assert_eq!(geometry.opposite_vertex(1, 1, 2), Some(3));
        assert!((geometry.triangle_centroid(0) - Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).length() < 1e-6);
        assert!((geometry.edge_length(EdgeKey::new(1, 2)) - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn obtuse_detection() {
        let geometry = Geometry::<SphereVertex>::new(
            Mesh::from_positions([Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), Vec3::new(2.0, 0.5, 0.0)]),
            Indices::from_triangles([[0, 1, 2]]),
        );
        assert!(geometry.is_obtuse(0));
        assert!(!right_triangle().is_obtuse(1));
    }

    #[test]
    fn topology_is_rebuilt_after_regenerate() {
        let mut geometry = right_triangle();
        assert_eq!(geometry.topology().edge_count(), 5);
        assert_eq!(geometry.vertex_degree(1), 2);
        geometry.regenerate();
        assert_eq!(geometry.topology().edge_count(), 5);
    }

    #[test]
    fn ideal_edge_length_tiles_the_sphere() {
        let geometry = right_triangle();
        let edge = geometry.ideal_edge_length();
        let area = 3f32.sqrt() / 4.0 * edge * edge;
        assert!((area * 2.0 - UNIT_SPHERE_AREA).abs() < 1e-4);
    }

    #[test]
    fn spherical_uv_stays_in_unit_square() {
        for direction in [Vec3::X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::new(-1.0, 0.0, -0.0)] {
            let uv = spherical_uv(direction);
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y), "{uv:?}");
        }
    }
}
