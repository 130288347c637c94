use super::Geometry;
use crate::mesh::{ColorVertex, Indices, Mesh, Vertex};
use glam::{Vec3, Vec4};

/// Supplies the color of a primal vertex (one dual tile).
pub trait VertexColorProvider {
    fn vertex_color(&self, vertex: u32) -> Vec4;
}

impl<F: Fn(u32) -> Vec4> VertexColorProvider for F {
    fn vertex_color(&self, vertex: u32) -> Vec4 {
        self(vertex)
    }
}

impl<V: Vertex> Geometry<V> {
    /// Builds the dual (one polygonal tile per primal vertex, corners at
    /// triangle centroids) as a flat-shaded triangle mesh.
    ///
    /// Every undirected edge contributes two triangles, one per endpoint, each
    /// fanning from the endpoint to the two centroids flanking the edge. Each
    /// triangle owns its three vertices so tiles can be colored independently.
    pub fn generate_dual(&self, colors: &impl VertexColorProvider) -> Geometry<ColorVertex> {
        let topology = self.topology();
        let centroids = topology.centroids();

        let mut vertices = Vec::with_capacity(topology.edge_count() * 6);
        let mut triangles = Vec::with_capacity(topology.edge_count() * 2);

        for (key, edge) in topology.edges() {
            if !edge.is_manifold() {
                continue;
            }
            let (v1, v2) = key.vertices();
            let [t1, t2] = edge.triangles;

            // Centroid of the triangle where v1 -> v2 runs along the winding
            // lies to the left of that direction seen from outside.
            let (left, right) = if runs_forward(self.indices.triangle(t1), v1, v2) {
                (t1, t2)
            } else {
                (t2, t1)
            };
            let left = centroids[left as usize].position;
            let right = centroids[right as usize].position;

            for (tile, first, second) in [(v1, right, left), (v2, left, right)] {
                let center = self.mesh.position(tile);
                let normal = center.normalize_or_zero();
                let color = colors.vertex_color(tile);
                let base = vertices.len() as u32;
                for position in [center, first, second] {
                    vertices.push(dual_vertex(position, normal, color));
                }
                triangles.push([base, base + 1, base + 2]);
            }
        }

        Geometry::new(Mesh::new(vertices), Indices::from_triangles(triangles))
    }
}

fn dual_vertex(position: Vec3, normal: Vec3, color: Vec4) -> ColorVertex {
    ColorVertex {
        position,
        normal,
        color,
    }
}

/// True if `from` is immediately followed by `to` in the triangle's winding.
fn runs_forward(triangle: [u32; 3], from: u32, to: u32) -> bool {
    (0..3).any(|i| triangle[i] == from && triangle[(i + 1) % 3] == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::GeometryFactory;
    use crate::mesh::{HasColor, SphereVertex};
    use crate::tools::world_rng;

    fn gray(_: u32) -> Vec4 {
        Vec4::splat(0.5)
    }

    #[test]
    fn runs_forward_wraps_around() {
        assert!(runs_forward([1, 2, 3], 3, 1));
        assert!(!runs_forward([1, 2, 3], 1, 3));
    }

    #[test]
    fn dual_has_two_triangles_per_edge() {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(2);
        let edges = geometry.topology().edge_count();

        let dual = geometry.generate_dual(&gray);

        assert_eq!(dual.triangle_count(), edges * 2);
        assert_eq!(dual.vertex_count(), edges * 6);
    }

    #[test]
    fn dual_faces_outward_after_flips() {
        let mut geometry = GeometryFactory::icosphere::<SphereVertex>(3);
        let mut rng = world_rng(21);
        geometry.tweak_triangles(0.25, &mut rng);
        geometry.relax_triangles(0.5);

        let dual = geometry.generate_dual(&gray);

        assert!(dual.is_outward_facing());
    }

    #[test]
    fn tiles_take_their_vertex_color() {
        let geometry = GeometryFactory::icosahedron::<SphereVertex>();
        let by_index = |vertex: u32| Vec4::new(vertex as f32, 0.0, 0.0, 1.0);

        let dual = geometry.generate_dual(&by_index);

        for triangle in dual.indices().triangles() {
            let center = dual.mesh().vertex(triangle[0]);
            let tile = geometry
                .mesh()
                .positions()
                .position(|p| p.distance(center.position) < 1e-6)
                .unwrap();
            for vertex in triangle {
                assert_eq!(dual.mesh().vertex(vertex).color().x, tile as f32);
            }
        }
    }
}
