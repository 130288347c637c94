use crate::geometry::{Geometry, VertexColorProvider};
use crate::mesh::{HasColor, HasNormal, Vertex};
use crate::plates::Plates;
use glam::Vec4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Plates,
    Elevation,
}

impl ViewMode {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Plates => "plates",
            ViewMode::Elevation => "elevation",
        }
    }
}

/// Color used for vertices no plate has claimed yet
const UNCLAIMED_COLOR: Vec4 = Vec4::new(0.3, 0.3, 0.3, 1.0);

/// Colors each tile with its plate's debug color.
pub struct PlateColors<'a> {
    plates: &'a Plates,
}

impl<'a> PlateColors<'a> {
    pub fn new(plates: &'a Plates) -> Self {
        Self { plates }
    }
}

impl VertexColorProvider for PlateColors<'_> {
    fn vertex_color(&self, vertex: u32) -> Vec4 {
        self.plates
            .owner(vertex)
            .map_or(UNCLAIMED_COLOR, |id| Vec4::from(self.plates.plate(id).debug_color))
    }
}

/// Colors each tile from its elevation: blues below sea level, then sand,
/// green, brown and snow.
pub struct ElevationColors<'a> {
    elevations: &'a [f32],
}

impl<'a> ElevationColors<'a> {
    pub fn new(elevations: &'a [f32]) -> Self {
        Self { elevations }
    }
}

impl VertexColorProvider for ElevationColors<'_> {
    fn vertex_color(&self, vertex: u32) -> Vec4 {
        match self.elevations.get(vertex as usize) {
            Some(&elevation) => Vec4::from(elevation_color(elevation)),
            None => UNCLAIMED_COLOR,
        }
    }
}

/// Gradient over elevation, with sea level at 0.
pub fn elevation_color(elevation: f32) -> [f32; 4] {
    if elevation < 0.0 {
        // Deep ocean to shallow water
        let depth = (-elevation).clamp(0.0, 1.0);
        [
            0.1 - depth * 0.08,
            0.45 - depth * 0.3,
            0.8 - depth * 0.35,
            1.0,
        ]
    } else if elevation < 0.05 {
        // Shoreline sand
        [0.85, 0.78, 0.5, 1.0]
    } else if elevation < 0.6 {
        // Lowland green darkening toward the hills
        let factor = ((elevation - 0.05) / 0.55).clamp(0.0, 1.0);
        [
            0.25 + factor * 0.2,
            0.6 - factor * 0.25,
            0.2 - factor * 0.05,
            1.0,
        ]
    } else if elevation < 1.2 {
        // Mountain brown
        let factor = ((elevation - 0.6) / 0.6).clamp(0.0, 1.0);
        [
            0.45 + factor * 0.1,
            0.35 + factor * 0.05,
            0.15 + factor * 0.1,
            1.0,
        ]
    } else {
        [0.95, 0.95, 1.0, 1.0]
    }
}

/// Raw mesh data that can be used by any rendering engine
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Flattens a colored geometry, such as a dual mesh, into plain arrays.
    pub fn from_geometry<V: Vertex + HasNormal + HasColor>(geometry: &Geometry<V>) -> Self {
        let vertices = geometry.mesh().vertices();
        MeshData {
            positions: vertices.iter().map(|v| v.position().to_array()).collect(),
            normals: vertices.iter().map(|v| v.normal().to_array()).collect(),
            colors: vertices.iter().map(|v| v.color().to_array()).collect(),
            indices: geometry.indices().as_slice().to_vec(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
