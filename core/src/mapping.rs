//! Conversion between continuous spatial positions and discrete maze cells.
//!
//! The maze lies in the horizontal `x`/`z` plane and is centred on the
//! configured origin. Grid `x` follows world `x`, grid `y` follows world `z`,
//! and the vertical world axis is ignored.

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::CellCoord;

/// Tolerance added before flooring so positions on a cell boundary resolve to
/// the higher-index cell.
pub const BOUNDARY_EPSILON: f32 = 0.001;

const DEFAULT_CELL_SIZE: f32 = 2.0;

/// Errors raised while validating maze geometry.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// Cell spacing must be finite and strictly positive.
    #[error("cell size {0} must be finite and greater than zero")]
    InvalidCellSize(f32),
    /// The origin contained a NaN or infinite component.
    #[error("maze origin must be finite")]
    NonFiniteOrigin,
    /// The grid would contain no cells.
    #[error("maze grid {width}x{height} contains no cells")]
    EmptyGrid {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}

/// Spatial layout shared by every maze size: cell spacing and centre point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazeGeometry {
    cell_size: f32,
    origin: Vec3,
}

impl MazeGeometry {
    /// Validates and creates a geometry description.
    pub fn new(cell_size: f32, origin: Vec3) -> Result<Self, GeometryError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GeometryError::InvalidCellSize(cell_size));
        }
        if !origin.is_finite() {
            return Err(GeometryError::NonFiniteOrigin);
        }
        Ok(Self { cell_size, origin })
    }

    /// Distance between neighbouring cell centres in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space point the maze is centred on.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }
}

impl Default for MazeGeometry {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            origin: Vec3::ZERO,
        }
    }
}

/// Bidirectional mapping between world positions and cells of one grid size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    width: u32,
    height: u32,
    geometry: MazeGeometry,
}

impl CoordinateMapper {
    /// Creates a mapper for a `width` x `height` grid.
    pub fn new(width: u32, height: u32, geometry: MazeGeometry) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            geometry,
        })
    }

    /// Number of cell columns covered by the mapper.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows covered by the mapper.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Geometry the mapper was built from.
    #[must_use]
    pub const fn geometry(&self) -> MazeGeometry {
        self.geometry
    }

    /// Total size of the maze floor in world units along `x` and `z`.
    #[must_use]
    pub fn footprint(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.geometry.cell_size,
            self.height as f32 * self.geometry.cell_size,
        )
    }

    /// Resolves the cell containing `position`.
    ///
    /// Never fails: positions outside the footprint clamp to the nearest edge
    /// cell independently on each axis.
    #[must_use]
    pub fn world_to_grid(&self, position: Vec3) -> CellCoord {
        let local = position - self.geometry.origin;
        CellCoord::new(
            axis_index(local.x, self.width, self.geometry.cell_size),
            axis_index(local.z, self.height, self.geometry.cell_size),
        )
    }

    /// Centre of `cell` in world space, at the origin's vertical coordinate.
    #[must_use]
    pub fn grid_to_world(&self, cell: CellCoord) -> Vec3 {
        let cell_size = self.geometry.cell_size;
        let first = self.first_center_offset();
        self.geometry.origin
            + Vec3::new(
                first.x + cell.x() as f32 * cell_size,
                0.0,
                first.y + cell.y() as f32 * cell_size,
            )
    }

    fn first_center_offset(&self) -> Vec2 {
        let cell_size = self.geometry.cell_size;
        Vec2::new(
            -((self.width - 1) as f32 * cell_size) / 2.0,
            -((self.height - 1) as f32 * cell_size) / 2.0,
        )
    }
}

fn axis_index(local: f32, cells: u32, cell_size: f32) -> u32 {
    let last = cells - 1;
    let extent = last as f32 * cell_size;
    let scaled = ((local + extent / 2.0 + cell_size / 2.0 + BOUNDARY_EPSILON) / cell_size).floor();

    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= last as f32 {
        last
    } else {
        scaled as u32
    }
}
