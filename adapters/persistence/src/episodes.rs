use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    num::ParseIntError,
    path::{Path, PathBuf},
};

use maze_episode_core::EpisodeId;
use thiserror::Error;
use tracing::debug;

/// Directory used for episode bookkeeping when no other location is configured.
pub const DEFAULT_LOGS_DIR: &str = "MLAGTEST/Logs";
/// File name of the global episode counter inside the logs directory.
pub const COUNTER_FILE_NAME: &str = "global_episode_counter.txt";
/// File name of the episode metrics log inside the logs directory.
pub const EPISODE_LOG_FILE_NAME: &str = "episode_data.csv";
/// Header row written once at the top of a fresh episode log.
pub const EPISODE_LOG_HEADER: &str =
    "episode_id,total_reward,success,time_to_goal,visited_cells_count,distance_traveled,maze_size";

/// Failures raised by the episode counter.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The stored counter could not be read.
    #[error("failed to read episode counter {}", path.display())]
    Read {
        /// Location of the counter.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The stored counter could not be written.
    #[error("failed to write episode counter {}", path.display())]
    Write {
        /// Location of the counter.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The stored counter does not hold an integer.
    #[error("episode counter contains `{contents}`")]
    Parse {
        /// Raw contents of the counter.
        contents: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
    /// The counter cannot be incremented any further.
    #[error("episode counter exhausted")]
    Exhausted,
}

/// Failures raised while appending to the episode log.
#[derive(Debug, Error)]
#[error("failed to append to episode log {}", path.display())]
pub struct LogError {
    /// Location of the log.
    pub path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    pub source: io::Error,
}

/// Backing store for the persisted episode counter.
pub trait CounterStorage {
    /// Returns the stored contents, or `None` when no counter exists yet.
    fn load(&mut self) -> Result<Option<String>, CounterError>;

    /// Replaces the stored contents.
    fn store(&mut self, contents: &str) -> Result<(), CounterError>;
}

/// Counter storage backed by a single text file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileCounterStorage {
    path: PathBuf,
}

impl FileCounterStorage {
    /// Creates storage for the counter file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates storage for the conventional counter file inside `logs_dir`.
    #[must_use]
    pub fn in_dir(logs_dir: impl AsRef<Path>) -> Self {
        Self::new(logs_dir.as_ref().join(COUNTER_FILE_NAME))
    }

    /// Location of the counter file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CounterStorage for FileCounterStorage {
    fn load(&mut self) -> Result<Option<String>, CounterError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CounterError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn store(&mut self, contents: &str) -> Result<(), CounterError> {
        let write = |path: &Path| -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)
        };
        write(&self.path).map_err(|source| CounterError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory counter storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryCounterStorage {
    contents: Option<String>,
}

impl MemoryCounterStorage {
    /// Creates storage preloaded with `contents`.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    /// Currently stored contents.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl CounterStorage for MemoryCounterStorage {
    fn load(&mut self) -> Result<Option<String>, CounterError> {
        Ok(self.contents.clone())
    }

    fn store(&mut self, contents: &str) -> Result<(), CounterError> {
        self.contents = Some(contents.to_owned());
        Ok(())
    }
}

/// Monotonic episode counter shared across runs through its storage.
#[derive(Debug)]
pub struct EpisodeCounter<S> {
    storage: S,
}

impl<S: CounterStorage> EpisodeCounter<S> {
    /// Wraps `storage` in a counter.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Allocates the next episode id and persists it.
    ///
    /// A missing counter yields episode `1`.
    pub fn next_episode(&mut self) -> Result<EpisodeId, CounterError> {
        let next = match self.storage.load()? {
            None => 1,
            Some(contents) => {
                let current =
                    contents
                        .trim()
                        .parse::<u64>()
                        .map_err(|source| CounterError::Parse {
                            contents: contents.clone(),
                            source,
                        })?;
                current.checked_add(1).ok_or(CounterError::Exhausted)?
            }
        };
        self.storage.store(&next.to_string())?;
        Ok(EpisodeId::new(next))
    }

    /// Borrows the underlying storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Summary of a completed traversal episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeMetrics {
    /// Episode the metrics belong to.
    pub episode: EpisodeId,
    /// Reward accumulated by the agent.
    pub total_reward: f32,
    /// Whether the agent reached the target.
    pub success: bool,
    /// Number of decision steps taken; reported as the time to goal.
    pub step_count: u64,
    /// Number of distinct cells the agent entered.
    pub visited_cells: u32,
    /// Spatial distance the agent travelled.
    pub distance_traveled: f32,
    /// Number of cells along each side of the maze.
    pub maze_size: u32,
}

impl EpisodeMetrics {
    /// Reports whether the episode carries enough activity to be logged.
    #[must_use]
    pub const fn is_loggable(&self) -> bool {
        self.step_count > 1 && self.visited_cells > 0
    }

    /// Formats the metrics as a single CSV row without a trailing newline.
    #[must_use]
    pub fn csv_row(&self) -> String {
        format!(
            "{},{:.3},{},{},{},{:.3},{}",
            self.episode.get(),
            self.total_reward,
            u8::from(self.success),
            self.step_count,
            self.visited_cells,
            self.distance_traveled,
            self.maze_size
        )
    }
}

/// Append-only CSV log of episode metrics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeLog {
    path: PathBuf,
}

impl EpisodeLog {
    /// Creates a log writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a log at the conventional file inside `logs_dir`.
    #[must_use]
    pub fn in_dir(logs_dir: impl AsRef<Path>) -> Self {
        Self::new(logs_dir.as_ref().join(EPISODE_LOG_FILE_NAME))
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `metrics`, writing the header first when the file is new.
    ///
    /// Returns `false` without touching the file when the episode is not
    /// loggable.
    pub fn append(&self, metrics: &EpisodeMetrics) -> Result<bool, LogError> {
        if !metrics.is_loggable() {
            debug!(
                episode = metrics.episode.get(),
                "skipping episode without activity"
            );
            return Ok(false);
        }

        self.write_row(&metrics.csv_row())
            .map_err(|source| LogError {
                path: self.path.clone(),
                source,
            })?;
        Ok(true)
    }

    fn write_row(&self, row: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if fresh {
            writeln!(file, "{EPISODE_LOG_HEADER}")?;
        }
        writeln!(file, "{row}")
    }
}
