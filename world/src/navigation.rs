//! Passage distance field used by world queries.

use std::collections::VecDeque;

use maze_episode_core::{CellCoord, Side, WallView};

/// Breadth-first step counts from a source cell through open walls.
///
/// Distances are stored `x` outer and `y` inner like the wall grid. Cells that
/// cannot be reached keep `u32::MAX`.
#[derive(Clone, Debug, Default)]
pub(crate) struct PassageField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl PassageField {
    /// Floods the carved passages outward from `source`.
    pub(crate) fn build(view: WallView<'_>, source: CellCoord) -> Self {
        let (width, height) = view.dimensions();
        let cell_count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(width, height)| width.checked_mul(height))
            .unwrap_or(0);

        let mut field = Self {
            width,
            height,
            distances: vec![u32::MAX; cell_count],
        };

        let Some(source_index) = field.index(source) else {
            return field;
        };
        field.distances[source_index] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = field.index(cell) else {
                continue;
            };
            let next_distance = field.distances[current_index].saturating_add(1);

            for side in Side::ALL {
                if view.has_wall(cell, side) {
                    continue;
                }
                let Some(neighbor) = cell.step(side) else {
                    continue;
                };
                let Some(neighbor_index) = field.index(neighbor) else {
                    continue;
                };
                if field.distances[neighbor_index] <= next_distance {
                    continue;
                }

                field.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        field
    }

    /// Steps needed to reach `cell`, if it is connected to the source.
    #[must_use]
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u32> {
        let index = self.index(cell)?;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    /// Number of cells connected to the source, the source included.
    #[must_use]
    pub(crate) fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != u32::MAX)
            .count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() >= self.width || cell.y() >= self.height {
            return None;
        }
        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        let height = usize::try_from(self.height).ok()?;
        x.checked_mul(height)?.checked_add(y)
    }
}
