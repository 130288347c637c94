pub mod config;
pub mod constants;
pub mod debug_geometry;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod mesh;
pub mod mesh_data;
pub mod plate;
pub mod plates;
pub mod prelude;
pub mod tools;
pub mod topology;
pub mod world;

pub use config::WorldConfig;
pub use error::{ConfigError, ConfigResult};
pub use world::{World, WorldStats};
