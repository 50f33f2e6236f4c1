#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze state management.
//!
//! The [`World`] owns the grid of the most recently generated maze together
//! with the coordinate mapper for its size. Adapters mutate it exclusively
//! through [`apply`] and read it back through the [`query`] module.

mod carver;
mod grid;
mod navigation;

use glam::Vec3;
use maze_episode_core::{Command, CoordinateMapper, Event, GenerationError, MazeGeometry};
use tracing::{debug, warn};

pub use carver::MazeCarver;
pub use grid::GridModel;

const GENERATOR_SEED: u64 = 0x6d61_7a65_c0ff_ee01;

/// Agent and target spawned closer than this are reported as a warning.
pub const PROXIMITY_WARNING_DISTANCE: f32 = 0.1;

/// Configuration applied when a world is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Cell spacing and origin used for generated mazes.
    pub geometry: MazeGeometry,
    /// Initial seed of the carver's random stream.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            geometry: MazeGeometry::default(),
            seed: GENERATOR_SEED,
        }
    }
}

/// Represents the authoritative maze state.
#[derive(Debug)]
pub struct World {
    geometry: MazeGeometry,
    grid: GridModel,
    mapper: Option<CoordinateMapper>,
    carver: MazeCarver,
}

impl World {
    /// Creates an empty world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates an empty world using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            geometry: config.geometry,
            grid: GridModel::default(),
            mapper: None,
            carver: MazeCarver::from_seed(config.seed),
        }
    }

    fn generate(&mut self, size: u32, agent: Vec3, target: Vec3, out_events: &mut Vec<Event>) {
        let mapper = match CoordinateMapper::new(size, size, self.geometry) {
            Ok(mapper) => mapper,
            Err(error) => {
                warn!(size, %error, "rejected maze generation request");
                out_events.push(Event::GenerationRejected {
                    size,
                    reason: GenerationError::EmptyGrid,
                });
                return;
            }
        };

        let separation = agent.distance(target);
        if separation < PROXIMITY_WARNING_DISTANCE {
            warn!(?agent, ?target, separation, "agent and target too close");
        }

        self.grid = GridModel::new(size, size);
        self.mapper = Some(mapper);
        out_events.push(Event::GridInitialized {
            width: size,
            height: size,
        });

        let start = mapper.world_to_grid(agent);
        let passages = self.carver.carve(&mut self.grid, start, out_events);
        debug!(size, ?start, passages, "maze carved");

        out_events.push(Event::MazeGenerated {
            size,
            start,
            passages,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGeometry { geometry } => {
            world.geometry = geometry;
        }
        Command::SeedGenerator { seed } => {
            world.carver.reseed(seed);
        }
        Command::GenerateMaze {
            size,
            agent,
            target,
        } => world.generate(size, agent, target, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec3;
    use maze_episode_core::{CellCoord, CoordinateMapper, MazeGeometry, WallView};

    use super::{navigation::PassageField, GridModel, World};

    /// Provides read-only access to the current grid; empty before the first maze.
    #[must_use]
    pub fn grid(world: &World) -> &GridModel {
        &world.grid
    }

    /// Captures a read-only view of the current wall flags.
    #[must_use]
    pub fn wall_view(world: &World) -> WallView<'_> {
        world.grid.view()
    }

    /// Coordinate mapper matching the current maze, if one was generated.
    #[must_use]
    pub fn mapper(world: &World) -> Option<&CoordinateMapper> {
        world.mapper.as_ref()
    }

    /// Geometry that the next generation request will use.
    #[must_use]
    pub fn geometry(world: &World) -> MazeGeometry {
        world.geometry
    }

    /// Side length of the current maze, if one was generated.
    #[must_use]
    pub fn maze_size(world: &World) -> Option<u32> {
        world.mapper.map(|mapper| mapper.width())
    }

    /// Translates a live spatial position into a cell of the current maze.
    #[must_use]
    pub fn world_to_grid(world: &World, position: Vec3) -> Option<CellCoord> {
        world.mapper.map(|mapper| mapper.world_to_grid(position))
    }

    /// Number of passage steps separating the cells containing `from` and `to`.
    #[must_use]
    pub fn passage_distance(world: &World, from: Vec3, to: Vec3) -> Option<u32> {
        let mapper = world.mapper?;
        let field = PassageField::build(world.grid.view(), mapper.world_to_grid(from));
        field.distance(mapper.world_to_grid(to))
    }

    /// Number of cells reachable from the cell containing `position`.
    #[must_use]
    pub fn reachable_cells(world: &World, position: Vec3) -> usize {
        world.mapper.map_or(0, |mapper| {
            PassageField::build(world.grid.view(), mapper.world_to_grid(position))
                .reachable_count()
        })
    }
}
