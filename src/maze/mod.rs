pub mod cell;
pub mod grid;

pub use cell::{Bounds, Cell, Walls};
pub use grid::{Grid, GridError, Layout};

/// A cell position as `(col, row)`.
pub type Coord = (usize, usize);

/// The four sides of a cell, and the four ways to step out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Every direction, in the order the solver tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The coordinate one step away in this direction.
    ///
    /// NOTE: This is overflow-safe. Stepping left or up from index 0 wraps to `usize::MAX`,
    /// and stepping right or down from `usize::MAX` saturates there. Neither can be inside a
    /// grid, since the largest possible index is `usize::MAX - 1`, so a bounds check filters
    /// them out.
    pub fn step(self, (col, row): Coord) -> Coord {
        match self {
            Direction::Left => (col.wrapping_sub(1), row),
            Direction::Right => (col.saturating_add(1), row),
            Direction::Up => (col, row.wrapping_sub(1)),
            Direction::Down => (col, row.saturating_add(1)),
        }
    }

    /// The direction leading from `from` to the adjacent cell `to`, if they are adjacent.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.step(from) == to && from != to)
    }
}
