use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Deepest subdivision level accepted; level 7 is already ~164k vertices.
pub const MAX_SUBDIVISION_LEVEL: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub world: GenerationConfig,
    pub distortion: DistortionConfig,
    pub kinematics: KinematicsConfig,
    pub boundaries: BoundaryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub seed: u64,
    pub subdivision_level: u32,
    pub plate_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionConfig {
    /// Fraction of edges picked as flip candidates per tweak pass
    pub tweak_ratio: f32,
    /// Tweak + relax passes performed when the world is built
    pub passes: usize,
    pub relax_multiplier: f32,
    /// Upper bound on the relax passes run by `World::settle`
    pub settle_passes: usize,
    /// Settling stops once the mean vertex displacement of a pass drops below
    /// this fraction of the ideal edge length
    pub convergence_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsConfig {
    pub max_rotation_degrees: f32,
    pub elevation_min: f32,
    pub elevation_max: f32,
    pub thickness_min: f32,
    pub thickness_max: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Converts stress (relative tangential speed) into elevation units
    pub stress_scale: f32,
    /// Below this magnitude both pressure and shear count as zero
    pub dormant_threshold: f32,
    /// Shear wins the classification when |shear| > |pressure| * shear_dominance
    pub shear_dominance: f32,
    /// Great-circle distance (radians) over which border elevation fades into the plate
    pub interior_falloff: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world: GenerationConfig::default(),
            distortion: DistortionConfig::default(),
            kinematics: KinematicsConfig::default(),
            boundaries: BoundaryConfig::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            subdivision_level: 4,
            plate_count: 20,
        }
    }
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            tweak_ratio: 0.25,
            passes: 6,
            relax_multiplier: 0.5,
            settle_passes: 20,
            convergence_threshold: 0.05,
        }
    }
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            max_rotation_degrees: 3.0,
            elevation_min: -1.0,
            elevation_max: 1.0,
            thickness_min: 0.5,
            thickness_max: 1.5,
        }
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            stress_scale: 10.0,
            dormant_threshold: 0.005,
            shear_dominance: 1.5,
            interior_falloff: 0.3,
        }
    }
}

impl WorldConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: WorldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.world.subdivision_level > MAX_SUBDIVISION_LEVEL {
            return Err(ConfigError::Invalid(format!(
                "subdivision_level {} exceeds the maximum of {}",
                self.world.subdivision_level, MAX_SUBDIVISION_LEVEL
            )));
        }
        if self.world.plate_count == 0 {
            return Err(ConfigError::Invalid("plate_count must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.distortion.tweak_ratio) {
            return Err(ConfigError::Invalid(format!(
                "tweak_ratio {} must be within [0, 1]",
                self.distortion.tweak_ratio
            )));
        }
        if self.kinematics.elevation_min > self.kinematics.elevation_max {
            return Err(ConfigError::Invalid(
                "elevation_min must not exceed elevation_max".into(),
            ));
        }
        if self.kinematics.thickness_min > self.kinematics.thickness_max {
            return Err(ConfigError::Invalid(
                "thickness_min must not exceed thickness_max".into(),
            ));
        }
        if self.kinematics.max_rotation_degrees < 0.0 {
            return Err(ConfigError::Invalid(
                "max_rotation_degrees must not be negative".into(),
            ));
        }
        Ok(())
    }
}

impl KinematicsConfig {
    /// Maximum rotation per step, in radians
    pub fn max_rotation(&self) -> f32 {
        self.max_rotation_degrees.to_radians()
    }

    pub fn elevation_range(&self) -> Range<f32> {
        self.elevation_min..self.elevation_max
    }

    pub fn thickness_range(&self) -> Range<f32> {
        self.thickness_min..self.thickness_max
    }
}
