use glam::Vec3;
use maze_episode_core::{CellCoord, CoordinateMapper, Side, WallFlags, WallView};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted description of a carved maze and the episode's spawn cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeRecord {
    /// Number of cells along each side of the maze.
    pub maze_size: u32,
    /// Cell containing the agent's spawn position.
    pub agent_start: CellCoord,
    /// Cell containing the target's spawn position.
    pub target: CellCoord,
    /// Wall flags for every cell, `x` outer and `y` inner.
    pub cells: Vec<CellRecord>,
}

/// Wall flags of a single cell encoded as `0`/`1` integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Column of the cell.
    pub x: u32,
    /// Row of the cell.
    pub y: u32,
    /// `1` when the wall facing increasing `y` is present.
    pub top: u8,
    /// `1` when the wall facing decreasing `y` is present.
    pub bottom: u8,
    /// `1` when the wall facing decreasing `x` is present.
    pub left: u8,
    /// `1` when the wall facing increasing `x` is present.
    pub right: u8,
}

impl CellRecord {
    fn capture(cell: CellCoord, walls: WallFlags) -> Self {
        Self {
            x: cell.x(),
            y: cell.y(),
            top: u8::from(walls.top),
            bottom: u8::from(walls.bottom),
            left: u8::from(walls.left),
            right: u8::from(walls.right),
        }
    }

    /// Coordinate of the cell described by the record.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }

    /// Decodes the wall flags, returning `None` when any flag is not `0` or `1`.
    #[must_use]
    pub fn walls(&self) -> Option<WallFlags> {
        let flag = |value: u8| match value {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        };
        Some(WallFlags {
            top: flag(self.top)?,
            bottom: flag(self.bottom)?,
            left: flag(self.left)?,
            right: flag(self.right)?,
        })
    }
}

/// Reasons a maze cannot be captured into a record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    /// Agent and target occupy exactly the same position.
    #[error("agent and target share the same position {position}")]
    CoincidentPositions {
        /// Position shared by both spawns.
        position: Vec3,
    },
    /// The wall grid and coordinate mapper describe different layouts.
    #[error("wall grid is {grid:?} but coordinate mapper expects {mapper:?}")]
    LayoutMismatch {
        /// Dimensions of the wall grid.
        grid: (u32, u32),
        /// Dimensions the mapper was built for.
        mapper: (u32, u32),
    },
    /// The layout is rectangular while records describe square mazes only.
    #[error("maze layout {width}x{height} is not square")]
    NotSquare {
        /// Number of cell columns.
        width: u32,
        /// Number of cell rows.
        height: u32,
    },
}

/// Structural problems detected in a loaded record.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// The record describes a maze without cells.
    #[error("maze size must be at least 1")]
    EmptyMaze,
    /// The number of cell entries does not match the maze size.
    #[error("expected {expected} cells but found {actual}")]
    CellCount {
        /// Cells required by the declared maze size.
        expected: usize,
        /// Cells present in the record.
        actual: usize,
    },
    /// A cell entry appears out of `x`-outer, `y`-inner order.
    #[error("cell entry {index} should describe {expected:?}")]
    OutOfOrder {
        /// Position of the offending entry.
        index: usize,
        /// Coordinate expected at that position.
        expected: CellCoord,
    },
    /// A wall flag holds a value other than `0` or `1`.
    #[error("cell {cell:?} carries a wall flag other than 0 or 1")]
    InvalidFlag {
        /// Cell holding the invalid flag.
        cell: CellCoord,
    },
    /// A wall on the outer boundary is missing.
    #[error("boundary wall {side:?} of cell {cell:?} is open")]
    OpenBoundary {
        /// Cell on the boundary.
        cell: CellCoord,
        /// Side facing outside the maze.
        side: Side,
    },
    /// Two adjacent cells disagree about their shared wall.
    #[error("cells {cell:?} and {neighbor:?} disagree about their shared wall")]
    AsymmetricWall {
        /// Cell whose wall was inspected.
        cell: CellCoord,
        /// Adjacent cell sharing the wall.
        neighbor: CellCoord,
    },
    /// A spawn cell lies outside the maze.
    #[error("spawn cell {cell:?} lies outside the maze")]
    SpawnOutOfBounds {
        /// Offending spawn cell.
        cell: CellCoord,
    },
}

impl MazeRecord {
    /// Captures the walls of `view` together with the spawn cells of `agent` and `target`.
    ///
    /// Only exactly equal positions are refused; nearby positions mapping to
    /// the same cell are accepted.
    pub fn capture(
        view: WallView<'_>,
        mapper: &CoordinateMapper,
        agent: Vec3,
        target: Vec3,
    ) -> Result<Self, CaptureError> {
        if agent == target {
            return Err(CaptureError::CoincidentPositions { position: agent });
        }

        let grid = view.dimensions();
        let expected = (mapper.width(), mapper.height());
        if grid != expected {
            return Err(CaptureError::LayoutMismatch {
                grid,
                mapper: expected,
            });
        }
        if mapper.width() != mapper.height() {
            return Err(CaptureError::NotSquare {
                width: mapper.width(),
                height: mapper.height(),
            });
        }

        Ok(Self {
            maze_size: mapper.width(),
            agent_start: mapper.world_to_grid(agent),
            target: mapper.world_to_grid(target),
            cells: view
                .iter()
                .map(|(cell, walls)| CellRecord::capture(cell, walls))
                .collect(),
        })
    }

    /// Checks the record describes a complete, symmetric, enclosed maze.
    pub fn validate(&self) -> Result<(), RecordError> {
        let size = self.maze_size;
        if size == 0 {
            return Err(RecordError::EmptyMaze);
        }

        let expected = (size as usize) * (size as usize);
        if self.cells.len() != expected {
            return Err(RecordError::CellCount {
                expected,
                actual: self.cells.len(),
            });
        }

        let mut walls = Vec::with_capacity(expected);
        for (index, record) in self.cells.iter().enumerate() {
            let position = index as u32;
            let cell = CellCoord::new(position / size, position % size);
            if record.cell() != cell {
                return Err(RecordError::OutOfOrder {
                    index,
                    expected: cell,
                });
            }
            walls.push(record.walls().ok_or(RecordError::InvalidFlag { cell })?);
        }

        let view = WallView::new(&walls, size, size);
        for (cell, flags) in view.iter() {
            for side in [Side::Top, Side::Right] {
                check_shared_wall(&view, cell, flags, side)?;
            }
            for side in [Side::Bottom, Side::Left] {
                if cell.step(side).is_none() && !flags.has(side) {
                    return Err(RecordError::OpenBoundary { cell, side });
                }
            }
        }

        for spawn in [self.agent_start, self.target] {
            if spawn.x() >= size || spawn.y() >= size {
                return Err(RecordError::SpawnOutOfBounds { cell: spawn });
            }
        }

        Ok(())
    }
}

fn check_shared_wall(
    view: &WallView<'_>,
    cell: CellCoord,
    flags: WallFlags,
    side: Side,
) -> Result<(), RecordError> {
    let neighbor = cell.step(side).filter(|next| view.walls(*next).is_some());
    match neighbor {
        Some(neighbor) => {
            if flags.has(side) != view.has_wall(neighbor, side.opposite()) {
                return Err(RecordError::AsymmetricWall { cell, neighbor });
            }
        }
        None => {
            if !flags.has(side) {
                return Err(RecordError::OpenBoundary { cell, side });
            }
        }
    }
    Ok(())
}
