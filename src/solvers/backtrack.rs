use super::Solution;
use crate::{
    maze::{Coord, Direction, Grid},
    render::{MazeEvent, Renderer},
};

/// A cell on the search path together with the next direction still to be tried from it.
struct Frame {
    coord: Coord,
    /// Index into [`Direction::ALL`]
    next: usize,
}

/// Depth-first search from the entrance to the exit, trying left, right, up and down in that
/// order and only stepping through open walls into unvisited cells.
///
/// Cells stay visited after a dead end, so no cell is entered twice. The search keeps an
/// explicit stack of frames; the sequence of forward and backtrack moves is exactly that of the
/// recursive formulation.
pub fn solve_backtracking<R: Renderer>(grid: &mut Grid, renderer: &mut R) -> Option<Solution> {
    let (start, goal) = match (grid.entrance(), grid.exit()) {
        (Some(start), Some(goal)) => (start, goal),
        _ => return None,
    };

    let mut forward_moves = 0;
    let mut backtracks = 0;

    grid[start].visited = true;
    if start == goal {
        return Some(Solution {
            path: vec![start],
            forward_moves,
            backtracks,
        });
    }

    let mut stack = vec![Frame {
        coord: start,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let current = frame.coord;
        let candidate = (frame.next..Direction::ALL.len()).find(|&i| {
            let direction = Direction::ALL[i];
            grid.is_open(current, direction) && !grid[direction.step(current)].visited
        });

        match candidate {
            Some(i) => {
                // Resume from the following direction once this branch comes back
                frame.next = i + 1;
                let next = Direction::ALL[i].step(current);
                renderer.render(MazeEvent::Move {
                    from: current,
                    to: next,
                    backtrack: false,
                });
                renderer.render(MazeEvent::Pulse);
                forward_moves += 1;

                grid[next].visited = true;
                if next == goal {
                    let mut path = stack.iter().map(|f| f.coord).collect::<Vec<_>>();
                    path.push(next);
                    return Some(Solution {
                        path,
                        forward_moves,
                        backtracks,
                    });
                }
                stack.push(Frame {
                    coord: next,
                    next: 0,
                });
            }
            None => {
                // Every direction from here is exhausted, undo the move that led here
                stack.pop();
                if let Some(parent) = stack.last() {
                    renderer.render(MazeEvent::Move {
                        from: parent.coord,
                        to: current,
                        backtrack: true,
                    });
                    renderer.render(MazeEvent::Pulse);
                    backtracks += 1;
                }
            }
        }
    }

    None
}
