//! Randomized depth-first maze carving.

use maze_episode_core::{CellCoord, Event, Side};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::GridModel;

/// Recursive backtracker that turns a closed grid into a perfect maze.
///
/// The traversal keeps an explicit stack of frames instead of recursing, so
/// the depth of a single corridor is bounded only by memory. Each frame draws
/// its shuffled direction order when its cell is entered, which consumes the
/// random stream in the same order as the recursive formulation would.
#[derive(Clone, Debug)]
pub struct MazeCarver {
    rng: ChaCha8Rng,
    stack: Vec<Frame>,
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: CellCoord,
    order: [Side; 4],
    next: usize,
}

impl MazeCarver {
    /// Creates a carver whose random stream is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            stack: Vec::new(),
        }
    }

    /// Restarts the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Carves a spanning tree of passages through `grid` starting at `start`.
    ///
    /// Every removed wall is reported through `out_events`. Returns the number
    /// of passages carved; a start cell outside the grid carves nothing.
    pub fn carve(
        &mut self,
        grid: &mut GridModel,
        start: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> u32 {
        if !grid.in_bounds(start) {
            return 0;
        }

        self.stack.clear();
        grid.mark_visited(start);
        self.enter(start);

        let mut passages = 0;
        loop {
            let Some(frame) = self.stack.last_mut() else {
                break;
            };
            let Some(&side) = frame.order.get(frame.next) else {
                let _ = self.stack.pop();
                continue;
            };
            frame.next += 1;
            let cell = frame.cell;

            let Some(neighbor) = grid.neighbor(cell, side) else {
                continue;
            };
            if grid.is_visited(neighbor) {
                continue;
            }
            if grid.remove_wall(cell, side).is_none() {
                continue;
            }

            grid.mark_visited(neighbor);
            out_events.push(Event::WallRemoved {
                cell,
                side,
                neighbor,
            });
            passages += 1;
            self.enter(neighbor);
        }

        passages
    }

    fn enter(&mut self, cell: CellCoord) {
        let mut order = Side::ALL;
        order.shuffle(&mut self.rng);
        self.stack.push(Frame {
            cell,
            order,
            next: 0,
        });
    }
}
