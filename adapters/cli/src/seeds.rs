use maze_episode_core::EpisodeId;
use sha2::{Digest, Sha256};

pub(crate) const CARVE_STREAM: &str = "carve";
pub(crate) const SPAWN_STREAM: &str = "spawn";

/// Derives the seed of a single episode from the run's global seed.
pub(crate) fn episode_seed(global_seed: u64, episode: EpisodeId) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(episode.get().to_le_bytes());
    finalize_seed(hasher)
}

/// Splits an episode seed into an independent named stream.
pub(crate) fn stream_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
