use crate::maze::Direction;

/// The four wall flags of a cell. `true` means the wall is standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Walls {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Walls {
    /// All four walls standing.
    pub const CLOSED: Walls = Walls {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    /// No walls at all.
    pub const OPEN: Walls = Walls {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    /// Checks whether the wall on the given side is standing.
    pub fn has(&self, side: Direction) -> bool {
        match side {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.top,
            Direction::Down => self.bottom,
        }
    }

    pub fn set(&mut self, side: Direction, standing: bool) {
        match side {
            Direction::Left => self.left = standing,
            Direction::Right => self.right = standing,
            Direction::Up => self.top = standing,
            Direction::Down => self.bottom = standing,
        }
    }

    /// Knocks down the wall on the given side.
    /// Returns `true` if a wall was removed, `false` if there was none.
    pub fn remove(&mut self, side: Direction) -> bool {
        let was_standing = self.has(side);
        self.set(side, false);
        was_standing
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::CLOSED
    }
}

/// Bounding box of a cell in the renderer's coordinate space.
/// The core never reads it; it is handed through to whoever draws the maze.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One position of the maze grid.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cell {
    pub walls: Walls,
    /// Scratch flag shared by generation and solving. Reset between the two phases.
    pub visited: bool,
    /// Assigned once when the grid is built.
    pub bounds: Bounds,
}

impl Cell {
    /// A fully walled, unvisited cell occupying `bounds`.
    pub fn new(bounds: Bounds) -> Self {
        Cell {
            walls: Walls::CLOSED,
            visited: false,
            bounds,
        }
    }

    pub fn has_wall(&self, side: Direction) -> bool {
        self.walls.has(side)
    }
}
