#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs maze generation episodes.

mod ascii;
mod config;
mod seeds;
mod spawn;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use maze_episode_core::{Command, Event};
use maze_episode_persistence::{EpisodeCounter, FileCounterStorage, MazeStore};
use maze_episode_system_wall_layout::WallLayout;
use maze_episode_world::{self as world, query, World, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

/// Generates, persists and optionally prints one maze per episode.
#[derive(Debug, Parser)]
#[command(name = "maze-episode", version, about)]
struct Args {
    /// Number of cells along each side of the maze.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(3..=31))]
    size: u32,

    /// Number of episodes to run.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    episodes: u32,

    /// Global seed; a random one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file with geometry and storage settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving the maze records.
    #[arg(long)]
    mazes_dir: Option<PathBuf>,

    /// Directory holding the global episode counter and the agent's episode log.
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    /// Prints each maze as ASCII art.
    #[arg(long)]
    print: bool,
}

/// Entry point for the maze episode command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => CliConfig::from_path(path)?,
        None => CliConfig::default(),
    };
    if let Some(dir) = &args.mazes_dir {
        config.storage.mazes_dir = dir.clone();
    }
    if let Some(dir) = &args.logs_dir {
        config.storage.logs_dir = dir.clone();
    }

    run(&args, &config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args, config: &CliConfig) -> Result<()> {
    let geometry = config.maze_geometry()?;
    let global_seed = args.seed.unwrap_or_else(rand::random);
    info!(
        global_seed,
        size = args.size,
        episodes = args.episodes,
        "starting maze episodes"
    );

    let mut world = World::with_config(WorldConfig {
        geometry,
        seed: global_seed,
    });
    let store = MazeStore::new(&config.storage.mazes_dir);
    let mut counter = EpisodeCounter::new(FileCounterStorage::in_dir(&config.storage.logs_dir));
    let mut layout = WallLayout::new();
    let mut events = Vec::new();

    for _ in 0..args.episodes {
        let episode = counter
            .next_episode()
            .context("failed to allocate an episode id")?;
        let seed = seeds::episode_seed(global_seed, episode);

        let mut spawn_rng =
            ChaCha8Rng::seed_from_u64(seeds::stream_seed(seed, seeds::SPAWN_STREAM));
        let (agent, target) = spawn::select_spawns(args.size, &mut spawn_rng)
            .with_context(|| format!("maze size {} offers fewer than two spawns", args.size))?;

        events.clear();
        world::apply(
            &mut world,
            Command::SeedGenerator {
                seed: seeds::stream_seed(seed, seeds::CARVE_STREAM),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::GenerateMaze {
                size: args.size,
                agent,
                target,
            },
            &mut events,
        );
        if let Some(Event::GenerationRejected { size, reason }) = events
            .iter()
            .find(|event| matches!(event, Event::GenerationRejected { .. }))
        {
            bail!("world rejected maze of size {size}: {reason:?}");
        }
        layout.handle(&events);

        let mapper = query::mapper(&world).context("world holds no generated maze")?;
        let path = store
            .save(query::wall_view(&world), mapper, agent, target, episode)
            .with_context(|| format!("failed to save maze for episode {}", episode.get()))?;

        let path_length = query::passage_distance(&world, agent, target);
        info!(
            episode = episode.get(),
            seed,
            %agent,
            %target,
            ?path_length,
            record = %path.display(),
            "episode ready"
        );
        debug!(
            episode = episode.get(),
            standing_walls = layout.standing_count(),
            floor_scale = %WallLayout::floor_scale(mapper),
            "wall layout updated"
        );

        if args.print {
            println!("episode {}", episode.get());
            print!(
                "{}",
                ascii::render_maze(
                    &layout,
                    mapper.world_to_grid(agent),
                    mapper.world_to_grid(target)
                )
            );
        }
    }

    Ok(())
}
