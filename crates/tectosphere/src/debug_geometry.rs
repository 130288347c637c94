//! Line and arrow builders for visualizing plate borders and plate motion.
//! All of them read the current state and return fresh data.

use crate::constants::DEBUG_LINE_LIFT;
use crate::geometry::Geometry;
use crate::mesh::{LineVertex, Mesh, Vertex};
use crate::plate::Plate;
use crate::plates::{BoundaryKind, Plates};
use crate::tools::project_onto_tangent;
use glam::{Quat, Vec3, Vec4};

/// Arrow length relative to the unit sphere radius
const ARROW_SCALE: f32 = 0.2;

/// Line-list mesh: each segment joins two vertices of `mesh`.
#[derive(Debug, Clone, Default)]
pub struct DebugLines {
    pub mesh: Mesh<LineVertex>,
    pub segments: Vec<[u32; 2]>,
}

impl DebugLines {
    fn from_segments(lines: Vec<(Vec3, Vec3, Vec4)>) -> Self {
        let mut vertices = Vec::with_capacity(lines.len() * 2);
        let mut segments = Vec::with_capacity(lines.len());
        for (start, end, color) in lines {
            let base = vertices.len() as u32;
            vertices.push(LineVertex {
                position: start,
                color,
            });
            vertices.push(LineVertex {
                position: end,
                color,
            });
            segments.push([base, base + 1]);
        }
        Self {
            mesh: Mesh::new(vertices),
            segments,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flattened vertex indices, two per segment.
    pub fn indices(&self) -> Vec<u32> {
        self.segments.iter().flatten().copied().collect()
    }

    pub fn segment(&self, index: usize) -> (Vec3, Vec3) {
        let [a, b] = self.segments[index];
        (self.mesh.position(a), self.mesh.position(b))
    }
}

/// Which part of a plate's velocity field to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Spin,
    Drift,
    Combined,
}

impl Motion {
    fn velocity(self, plate: &Plate, position: Vec3) -> Vec3 {
        match self {
            Motion::Spin => plate.calculate_spin(position),
            Motion::Drift => plate.calculate_drift(position),
            Motion::Combined => plate.calculate_motion(position),
        }
    }
}

/// One segment per border edge, joining its two corners slightly above the
/// surface and colored by the corners' boundary kind.
pub fn boundary_lines<V: Vertex>(geometry: &Geometry<V>, plates: &Plates) -> DebugLines {
    let topology = geometry.topology();
    let kind_of = |centroid: u32| plates.corners().get(&centroid).and_then(|corner| corner.kind);

    let lines = plates
        .borders()
        .values()
        .map(|border| {
            let kind = kind_of(border.corner1)
                .or_else(|| kind_of(border.corner2))
                .unwrap_or(BoundaryKind::Dormant);
            (
                topology.centroid(border.corner1).position * DEBUG_LINE_LIFT,
                topology.centroid(border.corner2).position * DEBUG_LINE_LIFT,
                Vec4::from(kind.color()),
            )
        })
        .collect();
    DebugLines::from_segments(lines)
}

/// One segment per vertex from its position along its plate's velocity,
/// scaled by `scale` and colored with the plate's debug color.
pub fn motion_lines<V: Vertex>(
    geometry: &Geometry<V>,
    plates: &Plates,
    motion: Motion,
    scale: f32,
) -> DebugLines {
    let mut lines = Vec::with_capacity(geometry.vertex_count());
    for plate in plates.plates() {
        let color = Vec4::from(plate.debug_color);
        for &tile in plate.tiles() {
            let start = geometry.position(tile) * DEBUG_LINE_LIFT;
            let velocity = motion.velocity(plate, geometry.position(tile));
            lines.push((start, start + velocity * scale, color));
        }
    }
    DebugLines::from_segments(lines)
}

/// Data needed to render an arrow representing a plate's movement
#[derive(Debug, Clone)]
pub struct PlateArrow {
    pub plate: usize,
    /// Mean tile position, lifted above the surface
    pub position: Vec3,
    /// Rotates +Z onto the plate's direction of motion
    pub rotation: Quat,
    pub scale: f32,
}

/// One arrow per moving plate; plates without tiles or motion are skipped.
pub fn plate_arrows<V: Vertex>(geometry: &Geometry<V>, plates: &Plates) -> Vec<PlateArrow> {
    plates
        .plates()
        .iter()
        .filter_map(|plate| plate_arrow(geometry, plate))
        .collect()
}

fn plate_arrow<V: Vertex>(geometry: &Geometry<V>, plate: &Plate) -> Option<PlateArrow> {
    if plate.is_empty() {
        return None;
    }
    let sum: Vec3 = plate.tiles().iter().map(|&tile| geometry.position(tile)).sum();
    let surface_normal = sum.try_normalize()?;

    let velocity = plate.calculate_motion(surface_normal);
    let direction = project_onto_tangent(velocity, surface_normal).try_normalize()?;

    Some(PlateArrow {
        plate: plate.id,
        position: surface_normal * DEBUG_LINE_LIFT,
        rotation: Quat::from_rotation_arc(Vec3::Z, direction),
        scale: ARROW_SCALE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryConfig, KinematicsConfig};
    use crate::factory::GeometryFactory;
    use crate::mesh::SphereVertex;
    use crate::tools::world_rng;

    fn world(plate_count: usize, kinematics: KinematicsConfig) -> (Geometry<SphereVertex>, Plates) {
        let geometry = GeometryFactory::icosphere::<SphereVertex>(2);
        let mut plates = Plates::new(plate_count, kinematics, BoundaryConfig::default());
        plates.create_plates(&geometry, &mut world_rng(5));
        (geometry, plates)
    }

    #[test]
    fn one_lifted_segment_per_border() {
        let (geometry, plates) = world(5, KinematicsConfig::default());

        let lines = boundary_lines(&geometry, &plates);

        assert_eq!(lines.len(), plates.borders().len());
        assert_eq!(lines.indices().len(), lines.len() * 2);
        for index in 0..lines.len() {
            let (start, end) = lines.segment(index);
            assert!((start.length() - DEBUG_LINE_LIFT).abs() < 1e-4);
            assert!((end.length() - DEBUG_LINE_LIFT).abs() < 1e-4);
        }
    }

    #[test]
    fn motion_lines_are_tangent() {
        let (geometry, plates) = world(4, KinematicsConfig::default());

        for motion in [Motion::Spin, Motion::Drift, Motion::Combined] {
            let lines = motion_lines(&geometry, &plates, motion, 5.0);
            assert_eq!(lines.len(), geometry.vertex_count());
            for index in 0..lines.len() {
                let (start, end) = lines.segment(index);
                assert!((end - start).dot(start.normalize()).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn arrows_point_along_the_motion() {
        let (geometry, plates) = world(4, KinematicsConfig::default());

        let arrows = plate_arrows(&geometry, &plates);

        assert!(!arrows.is_empty());
        for arrow in &arrows {
            let plate = plates.plate(arrow.plate);
            let normal = arrow.position.normalize();
            let expected = project_onto_tangent(plate.calculate_motion(normal), normal).normalize();
            assert!((arrow.rotation * Vec3::Z).dot(expected) > 0.999);
        }
    }

    #[test]
    fn still_plates_have_no_arrows() {
        let kinematics = KinematicsConfig {
            max_rotation_degrees: 0.0,
            ..KinematicsConfig::default()
        };
        let (geometry, plates) = world(4, kinematics);
        assert!(plate_arrows(&geometry, &plates).is_empty());
    }
}
