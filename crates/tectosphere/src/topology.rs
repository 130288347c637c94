//! Derived graph views over a triangle mesh: undirected edges, per-triangle
//! centroids (the dual vertices) and their adjacency, and per-vertex
//! neighbours.
//!
//! A [`Topology`] is a snapshot. Mesh edits never patch it; they drop it via
//! [`TopologyCache::invalidate`] and the next reader rebuilds it.

use crate::mesh::{Indices, Mesh, Vertex};
use glam::Vec3;
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// Canonical identity of an undirected edge: smaller vertex index in the high
/// 32 bits, larger one in the low 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(u64);

impl EdgeKey {
    pub fn new(a: u32, b: u32) -> Self {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Self(((low as u64) << 32) | high as u64)
    }

    /// Both endpoints, smaller index first.
    pub fn vertices(self) -> (u32, u32) {
        ((self.0 >> 32) as u32, self.0 as u32)
    }

    pub fn contains(self, vertex: u32) -> bool {
        let (a, b) = self.vertices();
        a == vertex || b == vertex
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The triangles sharing one edge. `count` is how many triangles referenced
/// the edge during the scan; a closed 2-manifold always has exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub triangles: [u32; 2],
    pub count: u8,
}

impl Edge {
    pub fn is_manifold(&self) -> bool {
        self.count == 2
    }

    /// The triangle on the other side of `triangle`.
    pub fn other(&self, triangle: u32) -> u32 {
        if self.triangles[0] == triangle {
            self.triangles[1]
        } else {
            self.triangles[0]
        }
    }
}

/// One dual vertex, generated from one primal triangle. Its index equals the
/// generating triangle's index.
#[derive(Debug, Clone, PartialEq)]
pub struct Centroid {
    pub position: Vec3,
    /// Vertex indices of the generating triangle
    pub faces: [u32; 3],
    /// Centroids across edges (faces[0],faces[1]), (faces[1],faces[2]), (faces[2],faces[0])
    pub neighbours: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Topology {
    edges: BTreeMap<EdgeKey, Edge>,
    centroids: Vec<Centroid>,
    vertex_degrees: Vec<u32>,
    vertex_neighbours: Vec<Vec<u32>>,
    vertex_triangles: Vec<Vec<u32>>,
}

impl Topology {
    pub fn generate<V: Vertex>(mesh: &Mesh<V>, indices: &Indices) -> Self {
        let (edges, vertex_degrees) = Self::generate_edges(mesh.len(), indices);
        let mut centroids = Self::generate_centroids(mesh, indices);

        for (triangle, centroid) in centroids.iter_mut().enumerate() {
            let [a, b, c] = centroid.faces;
            for (from, to) in [(a, b), (b, c), (c, a)] {
                if let Some(edge) = edges.get(&EdgeKey::new(from, to)) {
                    if edge.is_manifold() {
                        centroid.neighbours.push(edge.other(triangle as u32));
                    }
                }
            }
        }

        let mut vertex_neighbours = vec![Vec::with_capacity(6); mesh.len()];
        let mut vertex_triangles = vec![Vec::with_capacity(6); mesh.len()];
        for (triangle, [a, b, c]) in indices.triangles().enumerate() {
            for (vertex, others) in [(a, [b, c]), (b, [c, a]), (c, [a, b])] {
                vertex_triangles[vertex as usize].push(triangle as u32);
                let neighbours: &mut Vec<u32> = &mut vertex_neighbours[vertex as usize];
                for other in others {
                    if !neighbours.contains(&other) {
                        neighbours.push(other);
                    }
                }
            }
        }

        Self {
            edges,
            centroids,
            vertex_degrees,
            vertex_neighbours,
            vertex_triangles,
        }
    }

    /// Single pass over all triangles building the edge map and the
    /// triangle-degree of every vertex.
    pub fn generate_edges(
        vertex_count: usize,
        indices: &Indices,
    ) -> (BTreeMap<EdgeKey, Edge>, Vec<u32>) {
        let mut edges: BTreeMap<EdgeKey, Edge> = BTreeMap::new();
        let mut degrees = vec![0u32; vertex_count];

        for (triangle, [a, b, c]) in indices.triangles().enumerate() {
            let triangle = triangle as u32;
            for (from, to) in [(a, b), (b, c), (c, a)] {
                degrees[from as usize] += 1;
                edges
                    .entry(EdgeKey::new(from, to))
                    .and_modify(|edge| {
                        if edge.count < 2 {
                            edge.triangles[edge.count as usize] = triangle;
                        }
                        edge.count = edge.count.saturating_add(1);
                    })
                    .or_insert(Edge {
                        triangles: [triangle, triangle],
                        count: 1,
                    });
            }
        }

        (edges, degrees)
    }

    pub fn generate_centroids<V: Vertex>(mesh: &Mesh<V>, indices: &Indices) -> Vec<Centroid> {
        indices
            .triangles()
            .map(|faces| {
                let [a, b, c] = faces.map(|vertex| mesh.position(vertex));
                Centroid {
                    position: ((a + b + c) / 3.0).normalize_or_zero(),
                    faces,
                    neighbours: Vec::with_capacity(3),
                }
            })
            .collect()
    }

    pub fn edges(&self) -> &BTreeMap<EdgeKey, Edge> {
        &self.edges
    }

    pub fn edge(&self, a: u32, b: u32) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    pub fn centroid(&self, index: u32) -> &Centroid {
        &self.centroids[index as usize]
    }

    /// Number of triangles using each vertex.
    pub fn vertex_degrees(&self) -> &[u32] {
        &self.vertex_degrees
    }

    pub fn vertex_degree(&self, vertex: u32) -> u32 {
        self.vertex_degrees[vertex as usize]
    }

    pub fn vertex_neighbours(&self) -> &[Vec<u32>] {
        &self.vertex_neighbours
    }

    pub fn neighbours(&self, vertex: u32) -> &[u32] {
        &self.vertex_neighbours[vertex as usize]
    }

    /// Triangles (equivalently, centroids) around a vertex.
    pub fn vertex_triangles(&self, vertex: u32) -> &[u32] {
        &self.vertex_triangles[vertex as usize]
    }

    pub fn is_closed_manifold(&self) -> bool {
        self.edges.values().all(Edge::is_manifold)
    }
}

/// Lazily built topology. An empty cell is the dirty state.
#[derive(Debug, Clone, Default)]
pub struct TopologyCache {
    cell: OnceCell<Topology>,
}

impl TopologyCache {
    pub fn get_or_generate<V: Vertex>(&self, mesh: &Mesh<V>, indices: &Indices) -> &Topology {
        self.cell.get_or_init(|| Topology::generate(mesh, indices))
    }

    /// Marks the cache dirty; the old snapshot is dropped, nothing is rebuilt.
    pub fn invalidate(&mut self) {
        self.cell.take();
    }

    pub fn is_dirty(&self) -> bool {
        self.cell.get().is_none()
    }
}
