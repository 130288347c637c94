use crate::geometry::Geometry;
use crate::mesh::{Indices, Mesh, Vertex};
use glam::Vec3;

/// Counter-clockwise seen from outside, for the vertex order of
/// [`icosahedron_vertices`].
const ICOSAHEDRON_TRIANGLES: [[u32; 3]; 20] = [
    // around vertex 0
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    // adjacent band
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    // around vertex 3
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    // adjacent band
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

pub struct GeometryFactory;

impl GeometryFactory {
    /// Regular icosahedron inscribed in the unit sphere.
    pub fn icosahedron<V: Vertex>() -> Geometry<V> {
        Geometry::new(
            Mesh::from_positions(icosahedron_vertices()),
            Indices::from_triangles(ICOSAHEDRON_TRIANGLES),
        )
    }

    /// Icosahedron subdivided `level` times.
    pub fn icosphere<V: Vertex>(level: u32) -> Geometry<V> {
        let mut geometry = Self::icosahedron();
        geometry.subdivide(level);
        geometry
    }
}

/// Corners of three mutually orthogonal golden rectangles, normalized.
fn icosahedron_vertices() -> [Vec3; 12] {
    let phi = (1.0 + 5f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
    .map(Vec3::normalize)
}
