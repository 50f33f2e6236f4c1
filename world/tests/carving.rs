use std::collections::VecDeque;

use maze_episode_core::{CellCoord, Event, Side, WallFlags};
use maze_episode_world::{GridModel, MazeCarver};
use proptest::prelude::*;

fn carve(size: u32, seed: u64, start: CellCoord) -> GridModel {
    let mut grid = GridModel::new(size, size);
    let mut events = Vec::new();
    let _ = MazeCarver::from_seed(seed).carve(&mut grid, start, &mut events);
    grid
}

fn open_pairs(grid: &GridModel) -> usize {
    let mut pairs = 0;
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let cell = CellCoord::new(x, y);
            if x + 1 < grid.width() && !grid.has_wall(cell, Side::Right) {
                pairs += 1;
            }
            if y + 1 < grid.height() && !grid.has_wall(cell, Side::Top) {
                pairs += 1;
            }
        }
    }
    pairs
}

fn reachable_from_origin(grid: &GridModel) -> usize {
    let mut seen = vec![false; (grid.width() * grid.height()) as usize];
    let index = |cell: CellCoord| (cell.x() * grid.height() + cell.y()) as usize;
    let mut queue = VecDeque::from([CellCoord::new(0, 0)]);
    seen[0] = true;
    let mut count = 1;

    while let Some(cell) = queue.pop_front() {
        for side in Side::ALL {
            if grid.has_wall(cell, side) {
                continue;
            }
            let neighbor = cell.step(side).expect("open walls always lead inside");
            assert!(grid.in_bounds(neighbor), "boundary wall opened at {cell:?}");
            if !seen[index(neighbor)] {
                seen[index(neighbor)] = true;
                count += 1;
                queue.push_back(neighbor);
            }
        }
    }

    count
}

fn assert_symmetric(grid: &GridModel) {
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let cell = CellCoord::new(x, y);
            for side in Side::ALL {
                match grid.neighbor(cell, side) {
                    Some(neighbor) => assert_eq!(
                        grid.has_wall(cell, side),
                        grid.has_wall(neighbor, side.opposite()),
                        "asymmetric wall between {cell:?} and {neighbor:?}"
                    ),
                    None => assert!(grid.has_wall(cell, side), "boundary open at {cell:?}"),
                }
            }
        }
    }
}

fn assert_spanning_tree(grid: &GridModel) {
    let cells = (grid.width() * grid.height()) as usize;
    assert_eq!(open_pairs(grid), cells - 1, "passage count must form a tree");
    assert_eq!(reachable_from_origin(grid), cells, "maze must be connected");
}

#[test]
fn every_supported_size_yields_a_spanning_tree() {
    for size in 1..=31 {
        let grid = carve(size, u64::from(size) * 7919, CellCoord::new(size / 2, 0));
        assert_spanning_tree(&grid);
        assert_symmetric(&grid);
    }
}

fn walls(top: bool, bottom: bool, left: bool, right: bool) -> WallFlags {
    WallFlags {
        top,
        bottom,
        left,
        right,
    }
}

fn removed(cell: (u32, u32), side: Side, neighbor: (u32, u32)) -> Event {
    Event::WallRemoved {
        cell: CellCoord::new(cell.0, cell.1),
        side,
        neighbor: CellCoord::new(neighbor.0, neighbor.1),
    }
}

#[test]
fn three_by_three_from_centre_has_eight_passages() {
    let first = carve(3, 2024, CellCoord::new(1, 1));
    let second = carve(3, 2024, CellCoord::new(1, 1));

    assert_spanning_tree(&first);
    assert_eq!(open_pairs(&first), 8);
    assert_eq!(
        first.view().iter().collect::<Vec<_>>(),
        second.view().iter().collect::<Vec<_>>(),
        "fixed seed must reproduce the same walls"
    );
}

#[test]
fn seed_2024_carves_the_recorded_three_by_three_maze() {
    let mut grid = GridModel::new(3, 3);
    let mut events = Vec::new();
    let passages =
        MazeCarver::from_seed(2024).carve(&mut grid, CellCoord::new(1, 1), &mut events);

    assert_eq!(passages, 8);
    assert_eq!(
        events,
        vec![
            removed((1, 1), Side::Bottom, (1, 0)),
            removed((1, 0), Side::Left, (0, 0)),
            removed((0, 0), Side::Top, (0, 1)),
            removed((0, 1), Side::Top, (0, 2)),
            removed((0, 2), Side::Right, (1, 2)),
            removed((1, 2), Side::Right, (2, 2)),
            removed((2, 2), Side::Bottom, (2, 1)),
            removed((2, 1), Side::Bottom, (2, 0)),
        ]
    );

    let expected = vec![
        (CellCoord::new(0, 0), walls(false, true, true, false)),
        (CellCoord::new(0, 1), walls(false, false, true, true)),
        (CellCoord::new(0, 2), walls(true, false, true, false)),
        (CellCoord::new(1, 0), walls(false, true, false, true)),
        (CellCoord::new(1, 1), walls(true, false, true, true)),
        (CellCoord::new(1, 2), walls(true, true, false, false)),
        (CellCoord::new(2, 0), walls(false, true, true, true)),
        (CellCoord::new(2, 1), walls(false, false, true, true)),
        (CellCoord::new(2, 2), walls(true, false, false, true)),
    ];
    assert_eq!(grid.view().iter().collect::<Vec<_>>(), expected);
}

#[test]
fn long_corridors_do_not_exhaust_the_stack() {
    let grid = carve(200, 1, CellCoord::new(0, 0));
    assert_eq!(open_pairs(&grid), 200 * 200 - 1);
}

#[test]
fn rectangular_grids_are_supported() {
    let mut grid = GridModel::new(7, 2);
    let mut events = Vec::new();
    let passages = MazeCarver::from_seed(3).carve(&mut grid, CellCoord::new(6, 1), &mut events);

    assert_eq!(passages, 13);
    assert_spanning_tree(&grid);
    assert_symmetric(&grid);
}

proptest! {
    #[test]
    fn prop_carving_always_produces_a_perfect_maze(
        size in 1u32..=31,
        seed in any::<u64>(),
        start_x in any::<u32>(),
        start_y in any::<u32>(),
    ) {
        let start = CellCoord::new(start_x % size, start_y % size);
        let grid = carve(size, seed, start);

        let cells = (size * size) as usize;
        prop_assert_eq!(open_pairs(&grid), cells - 1);
        prop_assert_eq!(reachable_from_origin(&grid), cells);
        assert_symmetric(&grid);
    }

    #[test]
    fn prop_fixed_seed_is_reproducible(size in 1u32..=16, seed in any::<u64>()) {
        let start = CellCoord::new(0, size - 1);
        let first = carve(size, seed, start);
        let second = carve(size, seed, start);

        prop_assert_eq!(
            first.view().iter().collect::<Vec<_>>(),
            second.view().iter().collect::<Vec<_>>()
        );
    }
}
