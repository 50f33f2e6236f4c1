use std::{
    fs, io,
    path::{Path, PathBuf},
};

use glam::Vec3;
use maze_episode_core::{CoordinateMapper, EpisodeId, WallView};
use thiserror::Error;
use tracing::{error, info};

use crate::record::{CaptureError, MazeRecord, RecordError};

/// Directory used for maze records when no other location is configured.
pub const DEFAULT_MAZES_DIR: &str = "MLAGTEST/Mazes";

/// Failures raised while saving a maze record.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The maze could not be captured into a record.
    #[error("maze for episode {episode} rejected")]
    Rejected {
        /// Episode whose save was refused.
        episode: u64,
        /// Validation failure that caused the rejection.
        #[source]
        source: CaptureError,
    },
    /// The storage directory could not be created.
    #[error("failed to create maze directory {}", path.display())]
    CreateDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The record could not be encoded as JSON.
    #[error("failed to encode maze record for episode {episode}")]
    Encode {
        /// Episode whose record failed to encode.
        episode: u64,
        /// Underlying serialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// The encoded record could not be written.
    #[error("failed to write maze record {}", path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Failures raised while loading a maze record.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The record file could not be read.
    #[error("failed to read maze record {}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The record file did not contain a valid JSON record.
    #[error("failed to parse maze record {}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// The record parsed but describes an impossible maze.
    #[error("maze record {} is malformed", path.display())]
    Invalid {
        /// File holding the malformed record.
        path: PathBuf,
        /// Structural problem found in the record.
        #[source]
        source: RecordError,
    },
}

/// File-backed store writing one pretty-printed JSON record per episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeStore {
    base_dir: PathBuf,
}

impl MazeStore {
    /// Creates a store rooted at `base_dir`; the directory is created lazily.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory holding the records.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Location of the record written for `episode`.
    #[must_use]
    pub fn record_path(&self, episode: EpisodeId) -> PathBuf {
        self.base_dir
            .join(format!("maze_episode_{}.json", episode.get()))
    }

    /// Persists the maze in `view` along with the agent and target spawn cells.
    ///
    /// Exactly coincident positions and non-square layouts are rejected
    /// without touching the disk.
    /// An existing record for the same episode is overwritten.
    pub fn save(
        &self,
        view: WallView<'_>,
        mapper: &CoordinateMapper,
        agent: Vec3,
        target: Vec3,
        episode: EpisodeId,
    ) -> Result<PathBuf, SaveError> {
        let record = MazeRecord::capture(view, mapper, agent, target).map_err(|source| {
            error!(episode = episode.get(), %agent, %target, "refusing to save maze: {source}");
            SaveError::Rejected {
                episode: episode.get(),
                source,
            }
        })?;

        fs::create_dir_all(&self.base_dir).map_err(|source| SaveError::CreateDirectory {
            path: self.base_dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(&record).map_err(|source| SaveError::Encode {
            episode: episode.get(),
            source,
        })?;

        let path = self.record_path(episode);
        fs::write(&path, json).map_err(|source| SaveError::Write {
            path: path.clone(),
            source,
        })?;

        info!(
            episode = episode.get(),
            path = %path.display(),
            "maze saved"
        );
        Ok(path)
    }

    /// Reads and validates the record stored for `episode`.
    pub fn load(&self, episode: EpisodeId) -> Result<MazeRecord, LoadError> {
        let path = self.record_path(episode);
        let contents = fs::read_to_string(&path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
        let record: MazeRecord =
            serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
                path: path.clone(),
                source,
            })?;
        record
            .validate()
            .map_err(|source| LoadError::Invalid { path, source })?;
        Ok(record)
    }
}

impl Default for MazeStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAZES_DIR)
    }
}
