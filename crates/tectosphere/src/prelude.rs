pub use crate::config::{
    BoundaryConfig, DistortionConfig, GenerationConfig, KinematicsConfig, WorldConfig,
};
pub use crate::debug_geometry::{DebugLines, Motion, PlateArrow};
pub use crate::error::{ConfigError, ConfigResult};
pub use crate::factory::GeometryFactory;
pub use crate::geometry::{Geometry, VertexColorProvider};
pub use crate::mesh::{
    ColorVertex, HasColor, HasNormal, HasUv, Indices, LineVertex, Mesh, SphereVertex, Vertex,
};
pub use crate::mesh_data::{ElevationColors, MeshData, PlateColors, ViewMode};
pub use crate::plate::Plate;
pub use crate::plates::{Border, BorderCorner, BoundaryKind, Plates, Stress};
pub use crate::topology::{EdgeKey, Topology};
pub use crate::world::{World, WorldStats};
