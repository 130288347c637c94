use super::Geometry;
use crate::mesh::{Indices, Mesh, Vertex};
use crate::topology::EdgeKey;
use std::collections::HashMap;

impl<V: Vertex> Geometry<V> {
    /// Splits every triangle into four, `level` times. New vertices sit on
    /// edge midpoints pushed back onto the unit sphere and are shared by both
    /// triangles of the edge.
    pub fn subdivide(&mut self, level: u32) {
        for _ in 0..level {
            self.subdivide_once();
        }
        log::debug!(
            "Subdivided {} levels: {} vertices, {} triangles",
            level,
            self.vertex_count(),
            self.triangle_count()
        );
    }

    fn subdivide_once(&mut self) {
        let mut vertices = self.mesh.vertices().to_vec();
        let mut triangles = Vec::with_capacity(self.indices.triangle_count() * 4);
        let mut midpoints: HashMap<EdgeKey, u32> = HashMap::new();

        let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<V>| -> u32 {
            *midpoints.entry(EdgeKey::new(a, b)).or_insert_with(|| {
                let position = (vertices[a as usize].position() + vertices[b as usize].position())
                    .normalize();
                vertices.push(V::from_position(position));
                (vertices.len() - 1) as u32
            })
        };

        for [a, b, c] in self.indices.triangles() {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);

            triangles.push([a, ab, ca]);
            triangles.push([ab, b, bc]);
            triangles.push([ca, bc, c]);
            triangles.push([ab, bc, ca]);
        }

        self.mesh = Mesh::new(vertices);
        self.indices = Indices::from_triangles(triangles);
        self.regenerate();
    }
}
