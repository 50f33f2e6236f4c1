#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that tracks which wall segments a renderer should keep alive.
//!
//! The system never touches the world. It replays [`Event::GridInitialized`]
//! and [`Event::WallRemoved`] notifications into a set of standing segments
//! and derives their world-space placement from the active
//! [`CoordinateMapper`].

use std::collections::BTreeSet;

use glam::Vec3;
use maze_episode_core::{CellCoord, CoordinateMapper, Event, Side};

/// Side length of the unscaled floor plane in world units.
const FLOOR_PLANE_SPAN: f32 = 10.0;

/// Axis a wall segment extends along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Segment spans the `x` axis; used for top and bottom walls.
    AlongX,
    /// Segment spans the `z` axis; used for left and right walls.
    AlongZ,
}

/// Placement of a single standing wall segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Cell the segment belongs to.
    pub cell: CellCoord,
    /// Side of the cell the segment closes.
    pub side: Side,
    /// Centre of the segment in world space.
    pub center: Vec3,
    /// Axis the segment extends along.
    pub orientation: Orientation,
}

/// Event-driven mirror of the wall segments still standing.
#[derive(Debug, Default)]
pub struct WallLayout {
    dimensions: Option<(u32, u32)>,
    standing: BTreeSet<(CellCoord, Side)>,
}

impl WallLayout {
    /// Creates an empty layout that waits for a grid to be initialized.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and updates the standing segment set.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GridInitialized { width, height } => self.rebuild(*width, *height),
                Event::WallRemoved {
                    cell,
                    side,
                    neighbor,
                } => {
                    let _ = self.standing.remove(&(*cell, *side));
                    let _ = self.standing.remove(&(*neighbor, side.opposite()));
                }
                _ => {}
            }
        }
    }

    /// Grid dimensions announced by the most recent initialization.
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Number of segments still standing.
    #[must_use]
    pub fn standing_count(&self) -> usize {
        self.standing.len()
    }

    /// Reports whether the segment on `side` of `cell` is still standing.
    #[must_use]
    pub fn is_standing(&self, cell: CellCoord, side: Side) -> bool {
        self.standing.contains(&(cell, side))
    }

    /// Places every standing segment in world space, ordered by cell then side.
    pub fn segments<'a>(
        &'a self,
        mapper: &'a CoordinateMapper,
    ) -> impl Iterator<Item = WallSegment> + 'a {
        let half = mapper.geometry().cell_size() / 2.0;
        self.standing.iter().map(move |&(cell, side)| {
            let center = mapper.grid_to_world(cell);
            let (offset, orientation) = match side {
                Side::Top => (Vec3::new(0.0, 0.0, half), Orientation::AlongX),
                Side::Bottom => (Vec3::new(0.0, 0.0, -half), Orientation::AlongX),
                Side::Right => (Vec3::new(half, 0.0, 0.0), Orientation::AlongZ),
                Side::Left => (Vec3::new(-half, 0.0, 0.0), Orientation::AlongZ),
            };
            WallSegment {
                cell,
                side,
                center: center + offset,
                orientation,
            }
        })
    }

    /// Scale applied to a unit floor plane so it covers the maze footprint.
    #[must_use]
    pub fn floor_scale(mapper: &CoordinateMapper) -> Vec3 {
        let footprint = mapper.footprint();
        Vec3::new(
            footprint.x / FLOOR_PLANE_SPAN,
            1.0,
            footprint.y / FLOOR_PLANE_SPAN,
        )
    }

    fn rebuild(&mut self, width: u32, height: u32) {
        self.standing.clear();
        self.dimensions = Some((width, height));
        for x in 0..width {
            for y in 0..height {
                for side in Side::ALL {
                    let _ = self.standing.insert((CellCoord::new(x, y), side));
                }
            }
        }
    }
}
