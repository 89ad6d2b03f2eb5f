use std::fmt;

use thiserror::Error;

use super::{
    Coord, Direction,
    cell::{Bounds, Cell},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must not be negative (got {cols}x{rows})")]
    NegativeDimensions { cols: i64, rows: i64 },
    #[error("a {cols}x{rows} grid has too many cells to allocate")]
    TooManyCells { cols: i64, rows: i64 },
}

/// Where the grid sits in the renderer's coordinate space and how big each cell is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub origin: (f64, f64),
    pub cell_size: (f64, f64),
}

impl Layout {
    pub const DEFAULT_CELL_SIZE: f64 = 10.0;

    fn bounds_of(&self, col: usize, row: usize) -> Bounds {
        let (w, h) = self.cell_size;
        let x1 = self.origin.0 + col as f64 * w;
        let y1 = self.origin.1 + row as f64 * h;
        Bounds {
            x1,
            y1,
            x2: x1 + w,
            y2: y1 + h,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            origin: (0.0, 0.0),
            cell_size: (Layout::DEFAULT_CELL_SIZE, Layout::DEFAULT_CELL_SIZE),
        }
    }
}

/// A `num_cols` x `num_rows` array of cells addressed by `(col, row)`.
/// Columns are the outer axis of the storage.
#[derive(Clone)]
pub struct Grid {
    cells: Box<[Cell]>,
    num_cols: usize,
    num_rows: usize,
    layout: Layout,
}

impl Grid {
    /// Creates a grid of fully walled, unvisited cells with the default layout.
    /// Zero in either dimension gives an empty grid.
    pub fn new(num_cols: i64, num_rows: i64) -> Result<Self, GridError> {
        Grid::with_layout(num_cols, num_rows, Layout::default())
    }

    /// Checks requested dimensions without allocating anything.
    /// Returns them as `(cols, rows)` if a grid of that size can be built.
    pub fn dimensions(num_cols: i64, num_rows: i64) -> Result<(usize, usize), GridError> {
        if num_cols < 0 || num_rows < 0 {
            return Err(GridError::NegativeDimensions {
                cols: num_cols,
                rows: num_rows,
            });
        }
        let too_many = || GridError::TooManyCells {
            cols: num_cols,
            rows: num_rows,
        };
        let cols = usize::try_from(num_cols).map_err(|_| too_many())?;
        let rows = usize::try_from(num_rows).map_err(|_| too_many())?;
        cols.checked_mul(rows)
            .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<Cell>())
            .ok_or_else(too_many)?;
        Ok((cols, rows))
    }

    pub fn with_layout(num_cols: i64, num_rows: i64, layout: Layout) -> Result<Self, GridError> {
        let (cols, rows) = Grid::dimensions(num_cols, num_rows)?;
        let total = cols * rows;

        let mut cells = Vec::with_capacity(total);
        for col in 0..cols {
            for row in 0..rows {
                cells.push(Cell::new(layout.bounds_of(col, row)));
            }
        }

        Ok(Grid {
            cells: cells.into_boxed_slice(),
            num_cols: cols,
            num_rows: rows,
            layout,
        })
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Checks if the grid has no cells (zero columns or zero rows).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The entrance cell, always `(0, 0)`.
    pub fn entrance(&self) -> Option<Coord> {
        (!self.is_empty()).then_some((0, 0))
    }

    /// The exit cell, always the bottom-right corner.
    pub fn exit(&self) -> Option<Coord> {
        (!self.is_empty()).then(|| (self.num_cols - 1, self.num_rows - 1))
    }

    /// Checks if the given coordinate is within the bounds of the grid.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.num_cols && coord.1 < self.num_rows
    }

    fn ravel_index(&self, col: usize, row: usize) -> usize {
        col * self.num_rows + row
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        self.is_in_bounds((col, row))
            .then(|| &self.cells[self.ravel_index(col, row)])
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        if self.is_in_bounds((col, row)) {
            let idx = self.ravel_index(col, row);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Mutable access to a cell.
    ///
    /// # Panics
    /// If `(col, row)` is outside the grid.
    pub fn cell_at(&mut self, col: usize, row: usize) -> &mut Cell {
        let (num_cols, num_rows) = (self.num_cols, self.num_rows);
        match self.get_mut(col, row) {
            Some(cell) => cell,
            None => panic!(
                "cell index ({}, {}) out of bounds for a {}x{} grid",
                col, row, num_cols, num_rows
            ),
        }
    }

    /// Iterates over all cells with their coordinates, column by column.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        let num_rows = self.num_rows;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| ((idx / num_rows, idx % num_rows), cell))
    }

    /// Clears the visited flag on every cell.
    pub fn reset_visited(&mut self) {
        self.cells.iter_mut().for_each(|cell| cell.visited = false);
    }

    /// Opens the top wall of the entrance and the bottom wall of the exit.
    /// Does nothing on an empty grid.
    pub fn break_entrance_and_exit(&mut self) {
        if let (Some(entrance), Some(exit)) = (self.entrance(), self.exit()) {
            self[entrance].walls.top = false;
            self[exit].walls.bottom = false;
        }
    }

    /// In-bounds cells one step away, in the order left, right, up, down.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        let in_bounds = self.is_in_bounds(coord);
        Direction::ALL
            .into_iter()
            .filter(move |_| in_bounds)
            .map(move |direction| (direction, direction.step(coord)))
            .filter(move |&(_, c)| self.is_in_bounds(c))
    }

    /// Clears the wall pair between two adjacent cells: `a`'s side facing `b` and `b`'s side
    /// facing `a`. Returns `true` if any wall was standing.
    ///
    /// # Panics
    /// * If either coordinate is out of bounds
    /// * If the cells are not adjacent
    pub fn remove_wall_between(&mut self, a: Coord, b: Coord) -> bool {
        let direction = match Direction::between(a, b) {
            Some(direction) => direction,
            None => panic!("cells {:?} and {:?} are not adjacent", a, b),
        };
        let removed_a = self.cell_at(a.0, a.1).walls.remove(direction);
        let removed_b = self.cell_at(b.0, b.1).walls.remove(direction.opposite());
        removed_a || removed_b
    }

    /// Checks if a passage connects `from` to its neighbor on the given side.
    pub fn is_open(&self, from: Coord, side: Direction) -> bool {
        let to = side.step(from);
        match (self.get(from.0, from.1), self.get(to.0, to.1)) {
            (Some(cell), Some(_)) => !cell.has_wall(side),
            _ => false,
        }
    }

    /// Draws the walls as text. Cells listed in `path` are marked with `**`.
    pub fn to_ascii(&self, path: &[Coord]) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut on_path = vec![false; self.len()];
        for &(col, row) in path.iter().filter(|&&c| self.is_in_bounds(c)) {
            on_path[self.ravel_index(col, row)] = true;
        }

        let mut out = String::new();
        for row in 0..self.num_rows {
            // Top edge of this row
            for col in 0..self.num_cols {
                out.push('+');
                out.push_str(if self[(col, row)].walls.top { "--" } else { "  " });
            }
            out.push_str("+\n");

            // Cell interiors with their left walls, then the right wall of the last column
            for col in 0..self.num_cols {
                let cell = &self[(col, row)];
                out.push(if cell.walls.left { '|' } else { ' ' });
                out.push_str(if on_path[self.ravel_index(col, row)] {
                    "**"
                } else {
                    "  "
                });
            }
            let last = &self[(self.num_cols - 1, row)];
            out.push(if last.walls.right { '|' } else { ' ' });
            out.push('\n');
        }

        for col in 0..self.num_cols {
            out.push('+');
            let bottom = self[(col, self.num_rows - 1)].walls.bottom;
            out.push_str(if bottom { "--" } else { "  " });
        }
        out.push_str("+\n");
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ascii(&[]))
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        match self.get(index.0, index.1) {
            Some(cell) => cell,
            None => panic!(
                "cell index {:?} out of bounds for a {}x{} grid",
                index, self.num_cols, self.num_rows
            ),
        }
    }
}

impl std::ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        self.cell_at(index.0, index.1)
    }
}
