#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze episode engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired generation requests, the world executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems to react to deterministically. Read access to the carved walls goes
//! through the borrowed [`WallView`].

pub mod mapping;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use mapping::{CoordinateMapper, GeometryError, MazeGeometry, BOUNDARY_EPSILON};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the spatial geometry used by subsequent generation requests.
    ConfigureGeometry {
        /// Cell spacing and origin applied to the next generated maze.
        geometry: MazeGeometry,
    },
    /// Reseeds the random source driving the maze carver.
    SeedGenerator {
        /// Seed fed into the carver's random number generator.
        seed: u64,
    },
    /// Requests a freshly carved square maze.
    GenerateMaze {
        /// Number of cells along each side of the maze.
        size: u32,
        /// Spatial position of the agent; selects the carving start cell.
        agent: Vec3,
        /// Spatial position of the target.
        target: Vec3,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that the previous grid was discarded and a closed grid allocated.
    GridInitialized {
        /// Number of cell columns in the new grid.
        width: u32,
        /// Number of cell rows in the new grid.
        height: u32,
    },
    /// Confirms that the wall between two adjacent cells was removed.
    WallRemoved {
        /// Cell whose wall was removed.
        cell: CellCoord,
        /// Side of `cell` that no longer carries a wall.
        side: Side,
        /// Adjacent cell that lost the opposite wall.
        neighbor: CellCoord,
    },
    /// Confirms that carving finished and the maze is ready for persistence.
    MazeGenerated {
        /// Number of cells along each side of the maze.
        size: u32,
        /// Cell the carver started from.
        start: CellCoord,
        /// Number of passages carved, always `size * size - 1`.
        passages: u32,
    },
    /// Reports that a generation request was rejected before any mutation.
    GenerationRejected {
        /// Size provided in the rejected request.
        size: u32,
        /// Specific reason the request failed.
        reason: GenerationError,
    },
}

/// Reasons a generation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationError {
    /// The requested maze would contain no cells.
    EmptyGrid,
}

/// Identifier of a single generation-and-traversal episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpisodeId(u64);

impl EpisodeId {
    /// Creates a new episode identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Location of a single maze cell expressed as `x` and `y` indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based index along the horizontal axis.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based index along the vertical axis.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the coordinate adjacent through `side`.
    ///
    /// Only underflow below zero is detected; callers check the upper grid
    /// bounds themselves.
    #[must_use]
    pub fn step(self, side: Side) -> Option<CellCoord> {
        match side {
            Side::Top => self.y.checked_add(1).map(|y| CellCoord::new(self.x, y)),
            Side::Right => self.x.checked_add(1).map(|x| CellCoord::new(x, self.y)),
            Side::Bottom => self.y.checked_sub(1).map(|y| CellCoord::new(self.x, y)),
            Side::Left => self.x.checked_sub(1).map(|x| CellCoord::new(x, self.y)),
        }
    }
}

/// One of the four walls bounding a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Wall facing increasing `y`.
    Top,
    /// Wall facing increasing `x`.
    Right,
    /// Wall facing decreasing `y`.
    Bottom,
    /// Wall facing decreasing `x`.
    Left,
}

impl Side {
    /// All sides in carving candidate order: up, right, down, left.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Side of the neighbouring cell that shares this wall.
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// Presence flags for the four walls of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallFlags {
    /// Wall facing increasing `y` is present.
    pub top: bool,
    /// Wall facing decreasing `y` is present.
    pub bottom: bool,
    /// Wall facing decreasing `x` is present.
    pub left: bool,
    /// Wall facing increasing `x` is present.
    pub right: bool,
}

impl WallFlags {
    /// Cell enclosed on all four sides.
    pub const CLOSED: WallFlags = WallFlags {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    /// Reports whether the wall on `side` is present.
    #[must_use]
    pub const fn has(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Marks the wall on `side` as absent.
    pub fn clear(&mut self, side: Side) {
        match side {
            Side::Top => self.top = false,
            Side::Right => self.right = false,
            Side::Bottom => self.bottom = false,
            Side::Left => self.left = false,
        }
    }
}

impl Default for WallFlags {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// Read-only view into the dense wall grid.
///
/// Cells are stored with `x` as the outer and `y` as the inner index, which is
/// also the order persisted maze records list them in.
#[derive(Clone, Copy, Debug)]
pub struct WallView<'a> {
    cells: &'a [WallFlags],
    width: u32,
    height: u32,
}

impl<'a> WallView<'a> {
    /// Captures a new wall view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [WallFlags], width: u32, height: u32) -> Self {
        Self {
            cells,
            width,
            height,
        }
    }

    /// Returns the wall flags stored for `cell`, if it lies within the grid.
    #[must_use]
    pub fn walls(&self, cell: CellCoord) -> Option<WallFlags> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether `cell` has a wall on `side`; cells outside the grid are solid.
    #[must_use]
    pub fn has_wall(&self, cell: CellCoord, side: Side) -> bool {
        self.walls(cell).map_or(true, |walls| walls.has(side))
    }

    /// Iterates every cell with its walls, `x` outer and `y` inner.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, WallFlags)> + 'a {
        let height = self.height;
        self.cells.iter().enumerate().map(move |(index, walls)| {
            let index = index as u32;
            (CellCoord::new(index / height, index % height), *walls)
        })
    }

    /// Provides the dimensions of the underlying grid as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() < self.width && cell.y() < self.height {
            let x = usize::try_from(cell.x()).ok()?;
            let y = usize::try_from(cell.y()).ok()?;
            let height = usize::try_from(self.height).ok()?;
            Some(x * height + y)
        } else {
            None
        }
    }
}
