//! Mutable cell grid tracking wall presence and carving progress.

use maze_episode_core::{CellCoord, Side, WallFlags, WallView};

/// Dense `width` x `height` grid of cells, stored `x` outer and `y` inner.
///
/// Wall removal always clears the shared wall from both adjacent cells, so the
/// two sides of an internal wall can never disagree. Boundary walls have no
/// neighbour and are never removed.
#[derive(Clone, Debug, Default)]
pub struct GridModel {
    width: u32,
    height: u32,
    walls: Vec<WallFlags>,
    visited: Vec<bool>,
}

impl GridModel {
    /// Allocates a closed grid with every cell unvisited.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut grid = Self::default();
        grid.initialize(width, height);
        grid
    }

    /// Discards all cells and allocates a fresh closed grid.
    pub fn initialize(&mut self, width: u32, height: u32) {
        let cell_count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(width, height)| width.checked_mul(height))
            .unwrap_or(0);

        self.width = width;
        self.height = height;
        self.walls = vec![WallFlags::CLOSED; cell_count];
        self.visited = vec![false; cell_count];
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }

    /// Returns the in-bounds cell adjacent to `cell` through `side`.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, side: Side) -> Option<CellCoord> {
        if !self.in_bounds(cell) {
            return None;
        }
        cell.step(side).filter(|neighbor| self.in_bounds(*neighbor))
    }

    /// Reports whether `cell` has a wall on `side`. Cells outside the grid are solid.
    #[must_use]
    pub fn has_wall(&self, cell: CellCoord, side: Side) -> bool {
        self.index(cell)
            .map_or(true, |index| self.walls[index].has(side))
    }

    /// Removes the wall on `side` of `cell` together with the neighbour's facing wall.
    ///
    /// Returns the neighbour that now shares a passage with `cell`, or `None`
    /// when nothing changed because the wall borders the outside or is already
    /// open.
    pub fn remove_wall(&mut self, cell: CellCoord, side: Side) -> Option<CellCoord> {
        let neighbor = self.neighbor(cell, side)?;
        let index = self.index(cell)?;
        let neighbor_index = self.index(neighbor)?;

        if !self.walls[index].has(side) {
            return None;
        }

        self.walls[index].clear(side);
        self.walls[neighbor_index].clear(side.opposite());
        Some(neighbor)
    }

    /// Reports whether the carver already entered `cell`.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.index(cell).map_or(false, |index| self.visited[index])
    }

    pub(crate) fn mark_visited(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.visited[index] = true;
        }
    }

    /// Counts the internal walls that have been removed.
    ///
    /// Each passage is counted once, from the cell on its lower-index side.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.view()
            .iter()
            .map(|(cell, walls)| {
                [Side::Top, Side::Right]
                    .into_iter()
                    .filter(|side| !walls.has(*side) && self.neighbor(cell, *side).is_some())
                    .count()
            })
            .sum()
    }

    /// Captures a read-only view of the wall flags.
    #[must_use]
    pub fn view(&self) -> WallView<'_> {
        WallView::new(&self.walls, self.width, self.height)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        let height = usize::try_from(self.height).ok()?;
        x.checked_mul(height)?.checked_add(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_closed_and_unvisited() {
        let grid = GridModel::new(3, 2);

        for (cell, walls) in grid.view().iter() {
            assert_eq!(walls, WallFlags::CLOSED);
            assert!(!grid.is_visited(cell));
        }
        assert_eq!(grid.view().iter().count(), 6);
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn remove_wall_clears_both_sides() {
        let mut grid = GridModel::new(3, 3);
        let cell = CellCoord::new(1, 1);

        assert_eq!(grid.remove_wall(cell, Side::Top), Some(CellCoord::new(1, 2)));
        assert!(!grid.has_wall(cell, Side::Top));
        assert!(!grid.has_wall(CellCoord::new(1, 2), Side::Bottom));

        assert_eq!(grid.remove_wall(cell, Side::Left), Some(CellCoord::new(0, 1)));
        assert!(!grid.has_wall(CellCoord::new(0, 1), Side::Right));
        assert_eq!(grid.passage_count(), 2);
    }

    #[test]
    fn boundary_walls_are_permanent() {
        let mut grid = GridModel::new(2, 2);

        assert_eq!(grid.remove_wall(CellCoord::new(0, 0), Side::Left), None);
        assert_eq!(grid.remove_wall(CellCoord::new(1, 1), Side::Top), None);
        assert!(grid.has_wall(CellCoord::new(0, 0), Side::Left));
        assert!(grid.has_wall(CellCoord::new(1, 1), Side::Top));
    }

    #[test]
    fn removing_an_open_wall_reports_no_change() {
        let mut grid = GridModel::new(2, 1);

        assert!(grid.remove_wall(CellCoord::new(0, 0), Side::Right).is_some());
        assert_eq!(grid.remove_wall(CellCoord::new(1, 0), Side::Left), None);
        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn outside_cells_are_solid_and_never_visited() {
        let mut grid = GridModel::new(2, 2);
        let outside = CellCoord::new(2, 0);

        grid.mark_visited(outside);
        assert!(!grid.in_bounds(outside));
        assert!(!grid.is_visited(outside));
        assert!(grid.has_wall(outside, Side::Left));
        assert_eq!(grid.remove_wall(outside, Side::Left), None);
        assert!(grid.has_wall(CellCoord::new(1, 0), Side::Right));
    }

    #[test]
    fn initialize_discards_previous_state() {
        let mut grid = GridModel::new(2, 2);
        let _ = grid.remove_wall(CellCoord::new(0, 0), Side::Top);
        grid.mark_visited(CellCoord::new(0, 0));

        grid.initialize(4, 3);

        assert_eq!((grid.width(), grid.height()), (4, 3));
        assert_eq!(grid.passage_count(), 0);
        assert!(!grid.is_visited(CellCoord::new(0, 0)));
        assert!(grid.has_wall(CellCoord::new(0, 0), Side::Top));
    }
}
