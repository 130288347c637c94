/// Surface area of the unit sphere
pub const UNIT_SPHERE_AREA: f32 = 4.0 * std::f32::consts::PI;

// Edge flip limits. A shared vertex loses one triangle and an opposite vertex
// gains one, so these keep every vertex within one step of hexagonal.
pub const MIN_FLIP_SHARED_DEGREE: u32 = 6;
pub const MAX_FLIP_OPPOSITE_DEGREE: u32 = 6;
pub const MIN_FLIP_LENGTH_RATIO: f32 = 0.5;
pub const MAX_FLIP_LENGTH_RATIO: f32 = 2.0;

// Relaxation
pub const IDEAL_CENTROID_FACTOR: f32 = 0.9;
pub const MIN_EDGE_LENGTH_FACTOR: f32 = 0.8;
pub const MAX_EDGE_LENGTH_FACTOR: f32 = 1.2;
/// Upper bound on edge clamping sweeps within one relaxation pass
pub const EDGE_CLAMP_SWEEPS: usize = 16;

/// Lift applied to debug lines so they are not hidden by the surface
pub const DEBUG_LINE_LIFT: f32 = 1.01;

pub const DEBUG_COLORS: &[[f32; 4]] = &[
    [1.0, 0.0, 0.0, 1.0], // red
    [0.0, 1.0, 0.0, 1.0], // green
    [0.0, 0.0, 1.0, 1.0], // blue
    [1.0, 1.0, 0.0, 1.0], // yellow
    [1.0, 0.0, 1.0, 1.0], // magenta
    [0.0, 1.0, 1.0, 1.0], // cyan
    [1.0, 0.5, 0.0, 1.0], // orange
    [0.5, 0.0, 1.0, 1.0], // violet
    [0.0, 0.5, 1.0, 1.0], // sky blue
    [0.5, 1.0, 0.0, 1.0], // lime
    [0.6, 0.3, 0.1, 1.0], // brown
    [1.0, 0.6, 0.7, 1.0], // pink
    [0.0, 0.5, 0.5, 1.0], // teal
    [0.5, 0.5, 0.0, 1.0], // olive
    [0.3, 0.0, 0.5, 1.0], // indigo
    [0.7, 0.7, 0.7, 1.0], // grey
    [0.5, 0.0, 0.0, 1.0], // maroon
    [0.0, 0.3, 0.0, 1.0], // forest
    [1.0, 0.85, 0.6, 1.0], // sand
    [0.2, 0.2, 0.2, 1.0], // charcoal
];
