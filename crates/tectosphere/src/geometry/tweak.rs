use super::Geometry;
use crate::constants::{
    MAX_FLIP_LENGTH_RATIO, MAX_FLIP_OPPOSITE_DEGREE, MIN_FLIP_LENGTH_RATIO, MIN_FLIP_SHARED_DEGREE,
};
use crate::mesh::Vertex;
use crate::topology::{Edge, EdgeKey};
use rand::Rng;
use std::collections::HashSet;

/// A flip that passed every precondition, ready to be written.
struct Flip {
    triangles: [u32; 2],
    shared: [u32; 2],
    opposite: [u32; 2],
}

impl<V: Vertex> Geometry<V> {
    /// Flips the diagonal of randomly chosen quads to break up the regular
    /// icosahedral pattern. Returns the number of edges flipped.
    ///
    /// `ratio * edge_count` candidates are drawn. Every candidate is judged
    /// against the topology as it was before the call, except for vertex
    /// degrees and edge existence, which are kept current as flips land. A
    /// triangle touched by one flip is not touched again in the same call.
    pub fn tweak_triangles<R: Rng + ?Sized>(&mut self, ratio: f32, rng: &mut R) -> usize {
        let (flips, edge_count) = {
            let topology = self.topology();
            let edges: Vec<(EdgeKey, Edge)> =
                topology.edges().iter().map(|(key, edge)| (*key, *edge)).collect();
            if edges.is_empty() {
                return 0;
            }

            let mut degrees = topology.vertex_degrees().to_vec();
            let mut live_edges: HashSet<EdgeKey> = edges.iter().map(|(key, _)| *key).collect();
            let mut visited: HashSet<u32> = HashSet::new();
            let mut flips = Vec::new();

            let candidates = (ratio.clamp(0.0, 1.0) * edges.len() as f32) as usize;
            for _ in 0..candidates {
                let (key, edge) = edges[rng.random_range(0..edges.len())];
                if !edge.is_manifold()
                    || visited.contains(&edge.triangles[0])
                    || visited.contains(&edge.triangles[1])
                {
                    continue;
                }
                let Some(flip) = self.plan_flip(key, &edge, &degrees, &live_edges) else {
                    continue;
                };

                for vertex in flip.shared {
                    degrees[vertex as usize] -= 1;
                }
                for vertex in flip.opposite {
                    degrees[vertex as usize] += 1;
                }
                live_edges.remove(&key);
                live_edges.insert(EdgeKey::new(flip.opposite[0], flip.opposite[1]));
                visited.extend(flip.triangles);
                flips.push(flip);
            }
            (flips, edges.len())
        };

        for flip in &flips {
            let [a, b] = flip.shared;
            let [c, d] = flip.opposite;
            self.indices.set_triangle(flip.triangles[0], [a, d, c]);
            self.indices.set_triangle(flip.triangles[1], [d, b, c]);
        }
        self.regenerate();

        log::debug!("Flipped {} of {} edges", flips.len(), edge_count);
        flips.len()
    }

    /// Orients the quad around `key` and checks every flip precondition.
    ///
    /// With the first triangle wound (a, b, c), the second is (b, a, d) and
    /// the flip produces (a, d, c) and (d, b, c).
    fn plan_flip(
        &self,
        key: EdgeKey,
        edge: &Edge,
        degrees: &[u32],
        live_edges: &HashSet<EdgeKey>,
    ) -> Option<Flip> {
        let [t1, t2] = edge.triangles;
        let (a, b) = oriented_edge(self.indices.triangle(t1), key)?;
        let c = self.opposite_vertex(t1, a, b)?;
        let d = self.opposite_vertex(t2, a, b)?;
        if c == d || live_edges.contains(&EdgeKey::new(c, d)) {
            return None;
        }

        if self.is_obtuse(t1) || self.is_obtuse(t2) {
            return None;
        }

        if degrees[a as usize] < MIN_FLIP_SHARED_DEGREE
            || degrees[b as usize] < MIN_FLIP_SHARED_DEGREE
            || degrees[c as usize] > MAX_FLIP_OPPOSITE_DEGREE
            || degrees[d as usize] > MAX_FLIP_OPPOSITE_DEGREE
        {
            return None;
        }

        let old_length = self.position(a).distance(self.position(b));
        let new_length = self.position(c).distance(self.position(d));
        if old_length <= f32::EPSILON {
            return None;
        }
        let ratio = new_length / old_length;
        if !(MIN_FLIP_LENGTH_RATIO..=MAX_FLIP_LENGTH_RATIO).contains(&ratio) {
            return None;
        }

        Some(Flip {
            triangles: [t1, t2],
            shared: [a, b],
            opposite: [c, d],
        })
    }
}

/// Returns the edge's endpoints in the order they appear walking the
/// triangle's winding.
fn oriented_edge(triangle: [u32; 3], key: EdgeKey) -> Option<(u32, u32)> {
    let (p, q) = key.vertices();
    (0..3).find_map(|i| {
        let from = triangle[i];
        let to = triangle[(i + 1) % 3];
        if (from == p && to == q) || (from == q && to == p) {
            Some((from, to))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::GeometryFactory;
    use crate::mesh::SphereVertex;
    use crate::tools::world_rng;

    #[test]
    fn oriented_edge_follows_winding() {
        assert_eq!(oriented_edge([4, 7, 9], EdgeKey::new(4, 7)), Some((4, 7)));
        assert_eq!(oriented_edge([4, 7, 9], EdgeKey::new(9, 4)), Some((9, 4)));
        assert_eq!(oriented_edge([4, 7, 9], EdgeKey::new(4, 8)), None);
    }

    #[test]
    fn tweak_flips_some_edges_and_keeps_a_closed_surface() {
        let mut geometry = GeometryFactory::icosphere::<SphereVertex>(3);
        let edges = geometry.topology().edge_count();
        let mut rng = world_rng(11);

        let flipped = geometry.tweak_triangles(0.25, &mut rng);

        assert!(flipped > 0);
        assert!(geometry.topology().is_closed_manifold());
        assert_eq!(geometry.topology().edge_count(), edges);
        assert!(geometry.is_outward_facing());
    }

    #[test]
    fn repeated_tweaks_keep_degrees_near_hexagonal() {
        let mut geometry = GeometryFactory::icosphere::<SphereVertex>(3);
        let apexes: Vec<u32> = (0..12).collect();
        let mut rng = world_rng(5);

        for _ in 0..6 {
            geometry.tweak_triangles(0.25, &mut rng);
        }

        let topology = geometry.topology();
        for (vertex, &degree) in topology.vertex_degrees().iter().enumerate() {
            assert!((5..=7).contains(&degree), "vertex {vertex} has degree {degree}");
        }
        for apex in apexes {
            assert!(topology.vertex_degree(apex) >= 5);
        }
    }

    #[test]
    fn zero_ratio_changes_nothing() {
        let mut geometry = GeometryFactory::icosphere::<SphereVertex>(2);
        let before = geometry.indices().clone();
        let mut rng = world_rng(1);
        assert_eq!(geometry.tweak_triangles(0.0, &mut rng), 0);
        assert_eq!(geometry.indices(), &before);
    }

    #[test]
    fn same_seed_flips_the_same_edges() {
        let mut a = GeometryFactory::icosphere::<SphereVertex>(3);
        let mut b = GeometryFactory::icosphere::<SphereVertex>(3);
        a.tweak_triangles(0.25, &mut world_rng(99));
        b.tweak_triangles(0.25, &mut world_rng(99));
        assert_eq!(a.indices(), b.indices());
    }
}
