mod backtrack;

pub use backtrack::solve_backtracking;

use crate::{
    maze::{Coord, Grid},
    render::{NoopRenderer, Renderer},
};

/// A path found from the entrance to the exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Cells from the entrance to the exit, both included
    pub path: Vec<Coord>,
    /// Number of steps taken into unvisited cells
    pub forward_moves: usize,
    /// Number of steps undone after running into a dead end
    pub backtracks: usize,
}

/// Finds the way from the entrance to the exit of a grid.
///
/// The solver only reads walls and only writes visited flags. Each search starts by clearing
/// every visited flag, so a grid can be solved any number of times.
#[derive(Default)]
pub struct Solver<R = NoopRenderer> {
    renderer: R,
}

impl Solver {
    pub fn new() -> Self {
        Solver::default()
    }
}

impl<R: Renderer> Solver<R> {
    pub fn with_renderer(renderer: R) -> Self {
        Solver { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Searches for a path and returns it, or `None` if the exit cannot be reached.
    /// Visited flags left over from an earlier pass are cleared first.
    pub fn find_path(&mut self, grid: &mut Grid) -> Option<Solution> {
        grid.reset_visited();
        let solution = solve_backtracking(grid, &mut self.renderer);
        match &solution {
            Some(s) => tracing::debug!(
                "[solve] path of {} cells found after {} moves and {} backtracks",
                s.path.len(),
                s.forward_moves,
                s.backtracks
            ),
            None => tracing::debug!("[solve] no path from entrance to exit"),
        }
        solution
    }

    /// Returns whether the exit can be reached from the entrance.
    pub fn solve(&mut self, grid: &mut Grid) -> bool {
        self.find_path(grid).is_some()
    }
}

/// Solve a maze in place without observing the steps.
pub fn solve_maze(grid: &mut Grid) -> bool {
    Solver::new().solve(grid)
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::{
        generators::{Generator, generate_maze},
        maze::Direction,
        render::MazeEvent,
    };

    fn is_valid_path(grid: &Grid, path: &[Coord]) -> bool {
        path.first() == grid.entrance().as_ref()
            && path.last() == grid.exit().as_ref()
            && path.windows(2).all(|w| {
                Direction::between(w[0], w[1]).is_some_and(|d| grid.is_open(w[0], d))
            })
    }

    #[test]
    fn test_generated_maze_is_solvable() {
        for (cols, rows) in [(10, 10), (12, 10), (10, 12), (1, 5), (5, 1), (30, 20)] {
            let mut grid = Grid::new(cols, rows).unwrap();
            generate_maze(&mut grid, Some(99));
            let solution = Solver::new().find_path(&mut grid).unwrap();
            assert!(is_valid_path(&grid, &solution.path));
            assert_eq!(
                solution.path.len(),
                solution.forward_moves - solution.backtracks + 1
            );
        }
    }

    #[test]
    fn test_unbroken_grid_has_no_path() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(!solve_maze(&mut grid));
        // Only the entrance could be reached
        assert!(grid[(0, 0)].visited);
        assert_eq!(grid.iter().filter(|(_, c)| c.visited).count(), 1);
    }

    #[test]
    fn test_entrance_and_exit_breaks_alone_do_not_connect() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.break_entrance_and_exit();
        let mut log: Vec<MazeEvent> = Vec::new();
        assert!(!Solver::with_renderer(&mut log).solve(&mut grid));
        assert!(log.is_empty());
    }

    #[test]
    fn test_single_cell_solves_without_moving() {
        let mut grid = Grid::new(1, 1).unwrap();
        generate_maze(&mut grid, Some(3));
        let mut solver = Solver::with_renderer(Vec::<MazeEvent>::new());
        let solution = solver.find_path(&mut grid).unwrap();
        assert_eq!(solution.path, vec![(0, 0)]);
        assert_eq!(solution.forward_moves, 0);
        assert!(solver.renderer().is_empty());
    }

    #[test]
    fn test_two_by_one_takes_a_single_step() {
        let mut grid = Grid::new(2, 1).unwrap();
        generate_maze(&mut grid, Some(17));
        let mut solver = Solver::with_renderer(Vec::<MazeEvent>::new());
        let solution = solver.find_path(&mut grid).unwrap();
        assert_eq!(solution.path, vec![(0, 0), (1, 0)]);
        assert_eq!(solution.forward_moves, 1);
        assert_eq!(solution.backtracks, 0);
        assert_eq!(
            solver.into_renderer(),
            vec![
                MazeEvent::Move {
                    from: (0, 0),
                    to: (1, 0),
                    backtrack: false,
                },
                MazeEvent::Pulse,
            ]
        );
    }

    #[test]
    fn test_empty_grid() {
        let mut grid = Grid::new(0, 0).unwrap();
        assert!(!solve_maze(&mut grid));
    }

    #[test]
    fn test_solving_twice_finds_the_same_path() {
        let mut grid = Grid::new(6, 6).unwrap();
        generate_maze(&mut grid, Some(6));
        let first = Solver::new().find_path(&mut grid);
        assert!(first.is_some());
        // Visited flags from the first pass must not block the second
        assert_eq!(Solver::new().find_path(&mut grid), first);
    }

    #[test]
    fn test_stale_visited_flags_are_ignored() {
        let mut grid = Grid::new(5, 4).unwrap();
        generate_maze(&mut grid, Some(12));
        for (col, row) in [(0, 0), (1, 1), (4, 3), (2, 0)] {
            grid[(col, row)].visited = true;
        }
        assert!(solve_maze(&mut grid));
    }

    #[test]
    fn test_renderer_does_not_change_the_search() {
        let mut grid = Grid::new(14, 11).unwrap();
        generate_maze(&mut grid, Some(58));

        let mut unwatched = grid.clone();
        let plain = Solver::new().find_path(&mut unwatched);

        let mut watched = grid.clone();
        let mut solver = Solver::with_renderer(Vec::<MazeEvent>::new());
        let observed = solver.find_path(&mut watched);

        assert!(plain.is_some());
        assert_eq!(plain, observed);
        assert!(!solver.renderer().is_empty());
        assert!(
            unwatched
                .iter()
                .zip(watched.iter())
                .all(|((_, a), (_, b))| a == b)
        );
    }

    #[test]
    fn test_huge_maze_does_not_overflow_the_stack() {
        // A single row forces a search path as long as the grid
        let mut grid = Grid::new(200_000, 1).unwrap();
        generate_maze(&mut grid, Some(1));
        let solution = Solver::new().find_path(&mut grid).unwrap();
        assert_eq!(solution.path.len(), 200_000);
        assert_eq!(solution.backtracks, 0);
    }

    #[test]
    fn test_same_seed_same_search() {
        let run = || {
            let mut grid = Grid::new(12, 9).unwrap();
            Generator::new(Some(31)).generate(&mut grid);
            let mut solver = Solver::with_renderer(Vec::<MazeEvent>::new());
            solver.solve(&mut grid);
            solver.into_renderer()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn prop_generated_mazes_are_always_solved() {
        fn prop(cols: u8, rows: u8, seed: u64) -> bool {
            let (cols, rows) = (cols as i64 % 30 + 1, rows as i64 % 30 + 1);
            let mut grid = Grid::new(cols, rows).unwrap();
            generate_maze(&mut grid, Some(seed));
            match Solver::new().find_path(&mut grid) {
                Some(solution) => is_valid_path(&grid, &solution.path),
                None => false,
            }
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }
}
