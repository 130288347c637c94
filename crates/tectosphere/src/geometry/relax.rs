use super::Geometry;
use crate::constants::{
    EDGE_CLAMP_SWEEPS, IDEAL_CENTROID_FACTOR, MAX_EDGE_LENGTH_FACTOR, MIN_EDGE_LENGTH_FACTOR,
};
use crate::mesh::Vertex;
use crate::tools::project_onto_tangent;
use glam::Vec3;
use std::f32::consts::PI;

impl<V: Vertex> Geometry<V> {
    /// One centroidal smoothing pass. Returns the summed distance all
    /// vertices moved, which callers use as a convergence signal.
    ///
    /// Each vertex is pulled toward (or pushed from) the centroids of its
    /// triangles until its centroid distance matches that of an ideal
    /// equilateral triangle. The shift is kept tangent to the sphere and edges
    /// are clamped to [0.8, 1.2] of the ideal length by repeated sweeps.
    /// Vertices whose incident edges would rotate in place are damped.
    pub fn relax_triangles(&mut self, multiplier: f32) -> f32 {
        let (new_positions, total_shift) = {
            let topology = self.topology();
            let old_positions: Vec<Vec3> = self.mesh.positions().collect();

            let ideal_edge = self.ideal_edge_length();
            let ideal_distance = ideal_edge * 3f32.sqrt() / 3.0 * IDEAL_CENTROID_FACTOR;

            let mut shifts = vec![Vec3::ZERO; old_positions.len()];
            for corners in self.indices.triangles() {
                let centroid = corners
                    .iter()
                    .map(|&v| old_positions[v as usize])
                    .sum::<Vec3>()
                    / 3.0;
                for vertex in corners {
                    let to_centroid = centroid - old_positions[vertex as usize];
                    let distance = to_centroid.length();
                    if distance <= f32::EPSILON {
                        continue;
                    }
                    shifts[vertex as usize] +=
                        to_centroid * ((distance - ideal_distance) / distance) * multiplier;
                }
            }

            let mut shifted: Vec<Vec3> = old_positions
                .iter()
                .zip(&shifts)
                .map(|(&position, &shift)| {
                    let tangent = project_onto_tangent(shift, position);
                    (position + tangent).normalize_or(position)
                })
                .collect();

            let edges: Vec<(usize, usize)> = topology
                .edges()
                .keys()
                .map(|key| {
                    let (a, b) = key.vertices();
                    (a as usize, b as usize)
                })
                .collect();
            let min_length = ideal_edge * MIN_EDGE_LENGTH_FACTOR;
            let max_length = ideal_edge * MAX_EDGE_LENGTH_FACTOR;
            let mut sweeps = 0;
            for _ in 0..EDGE_CLAMP_SWEEPS {
                sweeps += 1;
                let violations = clamp_edge_lengths(&mut shifted, &edges, min_length, max_length);
                for (position, &old) in shifted.iter_mut().zip(&old_positions) {
                    *position = position.normalize_or(old);
                }
                if violations == 0 {
                    break;
                }
            }
            log::trace!("Edge clamping ran {sweeps} sweeps");

            let mut rotation = vec![0.0f32; old_positions.len()];
            for key in topology.edges().keys() {
                let (a, b) = key.vertices();
                let (a, b) = (a as usize, b as usize);
                let before = (old_positions[b] - old_positions[a]).normalize_or_zero();
                let after = (shifted[b] - shifted[a]).normalize_or_zero();
                let amount = before.dot(after).clamp(-1.0, 1.0).acos() / PI;
                rotation[a] = rotation[a].max(amount);
                rotation[b] = rotation[b].max(amount);
            }

            let mut total_shift = 0.0;
            let new_positions: Vec<Vec3> = old_positions
                .iter()
                .enumerate()
                .map(|(vertex, &old)| {
                    let weight = 1.0 - rotation[vertex].clamp(0.0, 1.0).sqrt();
                    let target = shifted[vertex].normalize_or(old);
                    let position = old.lerp(target, weight).normalize_or(target);
                    total_shift += position.distance(old);
                    position
                })
                .collect();

            (new_positions, total_shift)
        };

        for (vertex, position) in new_positions.into_iter().enumerate() {
            self.mesh.set_position(vertex as u32, position);
        }
        self.regenerate();

        log::trace!("Relaxation moved vertices by {total_shift:.5} in total");
        total_shift
    }
}

/// One clamping sweep over `edges`. Every edge outside `[min, max]` asks
/// both endpoints to move along the edge until it sits at the violated
/// bound; all requests are measured against the positions at the start of
/// the sweep and each vertex moves by the average of its requests. Returns
/// the number of violating edges.
fn clamp_edge_lengths(
    positions: &mut [Vec3],
    edges: &[(usize, usize)],
    min: f32,
    max: f32,
) -> usize {
    let mut corrections = vec![Vec3::ZERO; positions.len()];
    let mut requests = vec![0u32; positions.len()];
    let mut violations = 0;

    for &(a, b) in edges {
        let span = positions[b] - positions[a];
        let length = span.length();
        if length <= f32::EPSILON {
            continue;
        }
        let bound = if length < min {
            min
        } else if length > max {
            max
        } else {
            continue;
        };
        violations += 1;
        // Each endpoint covers half of the length change
        let step = span / length * ((length - bound) * 0.5);
        corrections[a] += step;
        corrections[b] -= step;
        requests[a] += 1;
        requests[b] += 1;
    }

    for ((position, correction), &count) in
        positions.iter_mut().zip(&corrections).zip(&requests)
    {
        if count > 0 {
            *position += *correction / count as f32;
        }
    }
    violations
}
