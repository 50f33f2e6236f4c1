#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! File-backed persistence for carved mazes and episode bookkeeping.
//!
//! [`MazeStore`] writes one pretty-printed JSON [`MazeRecord`] per episode.
//! [`EpisodeCounter`] hands out monotonically increasing episode ids through
//! an injected [`CounterStorage`], and [`EpisodeLog`] appends per-episode
//! metrics to a CSV file.
//!
//! The `maze-episode` binary only generates mazes, so it never writes the
//! episode log. The log belongs to the agent runner that traverses each maze
//! and reports its metrics when the episode ends.

mod episodes;
mod record;
mod store;

pub use episodes::{
    CounterError, CounterStorage, EpisodeCounter, EpisodeLog, EpisodeMetrics, FileCounterStorage,
    LogError, MemoryCounterStorage, COUNTER_FILE_NAME, DEFAULT_LOGS_DIR, EPISODE_LOG_FILE_NAME,
    EPISODE_LOG_HEADER,
};
pub use record::{CaptureError, CellRecord, MazeRecord, RecordError};
pub use store::{LoadError, MazeStore, SaveError, DEFAULT_MAZES_DIR};
