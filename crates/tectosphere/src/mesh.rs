//! Vertex storage and triangle index lists.
//!
//! Vertex formats opt into attributes through the capability traits below, so a
//! mesh only exposes the accessors its vertex type actually carries.

use glam::{Vec2, Vec3, Vec4};
use std::ops::Index;

/// Every vertex format has a position and can be created from one.
pub trait Vertex: Copy + Default {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);

    fn from_position(position: Vec3) -> Self {
        let mut vertex = Self::default();
        vertex.set_position(position);
        vertex
    }
}

pub trait HasNormal {
    fn normal(&self) -> Vec3;
    fn set_normal(&mut self, normal: Vec3);
}

pub trait HasUv {
    fn uv(&self) -> Vec2;
    fn set_uv(&mut self, uv: Vec2);
}

pub trait HasColor {
    fn color(&self) -> Vec4;
    fn set_color(&mut self, color: Vec4);
}

/// Primal sphere vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SphereVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Dual mesh vertex, colored per tile.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec4,
}

/// Unlit debug line vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineVertex {
    pub position: Vec3,
    pub color: Vec4,
}

macro_rules! impl_vertex {
    ($ty:ty) => {
        impl Vertex for $ty {
            fn position(&self) -> Vec3 {
                self.position
            }

            fn set_position(&mut self, position: Vec3) {
                self.position = position;
            }
        }
    };
}

impl_vertex!(SphereVertex);
impl_vertex!(ColorVertex);
impl_vertex!(LineVertex);

impl HasNormal for SphereVertex {
    fn normal(&self) -> Vec3 {
        self.normal
    }

    fn set_normal(&mut self, normal: Vec3) {
        self.normal = normal;
    }
}

impl HasUv for SphereVertex {
    fn uv(&self) -> Vec2 {
        self.uv
    }

    fn set_uv(&mut self, uv: Vec2) {
        self.uv = uv;
    }
}

impl HasNormal for ColorVertex {
    fn normal(&self) -> Vec3 {
        self.normal
    }

    fn set_normal(&mut self, normal: Vec3) {
        self.normal = normal;
    }
}

impl HasColor for ColorVertex {
    fn color(&self) -> Vec4 {
        self.color
    }

    fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }
}

impl HasColor for LineVertex {
    fn color(&self) -> Vec4 {
        self.color
    }

    fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }
}

/// Fixed-size vertex array. The count never changes after construction;
/// structural edits build a new mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh<V> {
    vertices: Vec<V>,
}

impl<V: Vertex> Mesh<V> {
    pub fn new(vertices: Vec<V>) -> Self {
        Self { vertices }
    }

    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self::new(positions.into_iter().map(V::from_position).collect())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn vertex(&self, index: u32) -> &V {
        &self.vertices[index as usize]
    }

    pub fn vertex_mut(&mut self, index: u32) -> &mut V {
        &mut self.vertices[index as usize]
    }

    pub fn position(&self, index: u32) -> Vec3 {
        self.vertices[index as usize].position()
    }

    pub fn set_position(&mut self, index: u32, position: Vec3) {
        self.vertices[index as usize].set_position(position);
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(Vertex::position)
    }
}

impl<V: Vertex + HasNormal> Mesh<V> {
    pub fn normal(&self, index: u32) -> Vec3 {
        self.vertices[index as usize].normal()
    }

    pub fn set_normal(&mut self, index: u32, normal: Vec3) {
        self.vertices[index as usize].set_normal(normal);
    }
}

impl<V: Vertex + HasUv> Mesh<V> {
    pub fn uv(&self, index: u32) -> Vec2 {
        self.vertices[index as usize].uv()
    }

    pub fn set_uv(&mut self, index: u32, uv: Vec2) {
        self.vertices[index as usize].set_uv(uv);
    }
}

impl<V: Vertex + HasColor> Mesh<V> {
    pub fn color(&self, index: u32) -> Vec4 {
        self.vertices[index as usize].color()
    }

    pub fn set_color(&mut self, index: u32, color: Vec4) {
        self.vertices[index as usize].set_color(color);
    }
}

/// Triangle list; each consecutive triple is one counter-clockwise triangle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indices(Vec<u32>);

impl Indices {
    pub fn new(indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0, "index count must be a multiple of 3");
        Self(indices)
    }

    pub fn from_triangles(triangles: impl IntoIterator<Item = [u32; 3]>) -> Self {
        Self(triangles.into_iter().flatten().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn triangle_count(&self) -> usize {
        self.0.len() / 3
    }

    pub fn triangle(&self, triangle: u32) -> [u32; 3] {
        let base = triangle as usize * 3;
        [self.0[base], self.0[base + 1], self.0[base + 2]]
    }

    pub fn set_triangle(&mut self, triangle: u32, vertices: [u32; 3]) {
        let base = triangle as usize * 3;
        self.0[base..base + 3].copy_from_slice(&vertices);
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.0.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Largest referenced vertex index plus one.
    pub fn required_vertex_count(&self) -> usize {
        self.0.iter().max().map_or(0, |&max| max as usize + 1)
    }
}

impl Index<usize> for Indices {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_accessors_read_back() {
        let mut mesh: Mesh<ColorVertex> = Mesh::from_positions([Vec3::X, Vec3::Y]);
        mesh.set_color(1, Vec4::new(0.5, 0.25, 1.0, 1.0));
        mesh.set_normal(0, Vec3::Z);

        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.position(1), Vec3::Y);
        assert_eq!(mesh.color(1), Vec4::new(0.5, 0.25, 1.0, 1.0));
        assert_eq!(mesh.normal(0), Vec3::Z);
    }

    #[test]
    fn set_position_only_touches_one_vertex() {
        let mut mesh: Mesh<SphereVertex> = Mesh::from_positions([Vec3::X, Vec3::Y, Vec3::Z]);
        mesh.set_position(1, Vec3::NEG_Y);
        let positions: Vec<Vec3> = mesh.positions().collect();
        assert_eq!(positions, vec![Vec3::X, Vec3::NEG_Y, Vec3::Z]);
    }

    #[test]
    fn triangles_are_read_and_written_in_triples() {
        let mut indices = Indices::from_triangles([[0, 1, 2], [2, 1, 3]]);
        assert_eq!(indices.triangle_count(), 2);
        assert_eq!(indices.triangle(1), [2, 1, 3]);

        indices.set_triangle(1, [3, 2, 1]);
        assert_eq!(indices.as_slice(), &[0, 1, 2, 3, 2, 1]);
        assert_eq!(indices.required_vertex_count(), 4);

        let cloned = indices.clone();
        assert_eq!(cloned, indices);
    }
}
