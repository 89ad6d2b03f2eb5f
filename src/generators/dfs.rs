use rand::Rng;

use crate::{
    maze::{Coord, Grid},
    render::{MazeEvent, Renderer},
};

/// Carves a perfect maze into `grid` with a randomized depth-first search, starting at the
/// entrance. The search keeps its own stack, so grid size is not limited by the call stack.
///
/// Every cell ends up visited. Returns the number of wall pairs removed, which is always
/// `grid.len() - 1` for a non-empty grid.
pub fn randomized_dfs<R: Renderer>(grid: &mut Grid, rng: &mut impl Rng, renderer: &mut R) -> usize {
    let Some(start) = grid.entrance() else {
        return 0;
    };

    grid[start].visited = true;
    // The stack holds the current carving path, from the entrance to the cell being extended
    let mut stack: Vec<Coord> = vec![start];
    let mut carved = 0;

    while let Some(&cell) = stack.last() {
        let neighbors = grid
            .neighbors(cell)
            .filter(|&(_, c)| !grid[c].visited)
            .map(|(_, c)| c)
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            // Dead end, backtrack to the previous cell on the path
            stack.pop();
            renderer.render(MazeEvent::DeadEnd { coord: cell });
            renderer.render(MazeEvent::Pulse);
            continue;
        }

        let neighbor = neighbors[rng.random_range(0..neighbors.len())];
        grid.remove_wall_between(cell, neighbor);
        grid[neighbor].visited = true;
        stack.push(neighbor);
        carved += 1;

        renderer.render(MazeEvent::CellState {
            coord: cell,
            cell: grid[cell],
        });
        renderer.render(MazeEvent::CellState {
            coord: neighbor,
            cell: grid[neighbor],
        });
        renderer.render(MazeEvent::Carve {
            from: cell,
            to: neighbor,
        });
        renderer.render(MazeEvent::Pulse);
    }

    carved
}
