use maze_episode_core::{CellCoord, Side};
use maze_episode_system_wall_layout::WallLayout;

/// Renders the standing walls as ASCII art, highest row first.
///
/// `A` marks the agent, `T` the target and `@` a cell holding both.
pub(crate) fn render_maze(layout: &WallLayout, agent: CellCoord, target: CellCoord) -> String {
    let Some((width, height)) = layout
        .dimensions()
        .filter(|&(width, height)| width > 0 && height > 0)
    else {
        return String::new();
    };

    let mut out = String::new();
    for y in (0..height).rev() {
        for x in 0..width {
            out.push('+');
            out.push_str(horizontal(layout, CellCoord::new(x, y), Side::Top));
        }
        out.push_str("+\n");

        for x in 0..width {
            let cell = CellCoord::new(x, y);
            out.push(if layout.is_standing(cell, Side::Left) {
                '|'
            } else {
                ' '
            });
            out.push_str(match (cell == agent, cell == target) {
                (true, true) => " @ ",
                (true, false) => " A ",
                (false, true) => " T ",
                (false, false) => "   ",
            });
        }
        let last = CellCoord::new(width - 1, y);
        out.push(if layout.is_standing(last, Side::Right) {
            '|'
        } else {
            ' '
        });
        out.push('\n');
    }

    for x in 0..width {
        out.push('+');
        out.push_str(horizontal(layout, CellCoord::new(x, 0), Side::Bottom));
    }
    out.push_str("+\n");
    out
}

fn horizontal(layout: &WallLayout, cell: CellCoord, side: Side) -> &'static str {
    if layout.is_standing(cell, side) {
        "---"
    } else {
        "   "
    }
}
