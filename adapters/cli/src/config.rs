use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glam::Vec3;
use maze_episode_core::MazeGeometry;
use maze_episode_persistence::{DEFAULT_LOGS_DIR, DEFAULT_MAZES_DIR};
use serde::Deserialize;

/// Settings loaded from the optional TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) geometry: GeometryConfig,
    pub(crate) storage: StorageConfig,
}

/// Spatial layout of generated mazes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GeometryConfig {
    pub(crate) cell_size: f32,
    pub(crate) origin: [f32; 3],
}

impl Default for GeometryConfig {
    fn default() -> Self {
        let geometry = MazeGeometry::default();
        Self {
            cell_size: geometry.cell_size(),
            origin: geometry.origin().to_array(),
        }
    }
}

/// Locations of the files written per episode.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StorageConfig {
    pub(crate) mazes_dir: PathBuf,
    pub(crate) logs_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mazes_dir: PathBuf::from(DEFAULT_MAZES_DIR),
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
        }
    }
}

impl CliConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Validated geometry described by the configuration.
    pub(crate) fn maze_geometry(&self) -> Result<MazeGeometry> {
        MazeGeometry::new(
            self.geometry.cell_size,
            Vec3::from_array(self.geometry.origin),
        )
        .context("invalid maze geometry")
    }
}
