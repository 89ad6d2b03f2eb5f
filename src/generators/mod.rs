use rand::{SeedableRng, rngs::StdRng};

mod dfs;

pub use dfs::randomized_dfs;

use crate::{
    maze::Grid,
    render::{MazeEvent, NoopRenderer, Renderer},
};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Turns a fully walled grid into a perfect maze.
///
/// Each generator owns its random source, so two generators built with the same seed carve
/// identical mazes on grids of the same size.
pub struct Generator<R = NoopRenderer> {
    rng: StdRng,
    renderer: R,
}

impl Generator {
    pub fn new(seed: Option<u64>) -> Self {
        Generator::with_renderer(seed, NoopRenderer)
    }
}

impl<R: Renderer> Generator<R> {
    pub fn with_renderer(seed: Option<u64>, renderer: R) -> Self {
        Generator {
            rng: get_rng(seed),
            renderer,
        }
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Draws the grid, opens the entrance and exit, carves the passages and finally clears the
    /// visited flags so the solver starts from a clean slate. An empty grid is left untouched.
    pub fn generate(&mut self, grid: &mut Grid) {
        if grid.is_empty() {
            tracing::debug!("[generate] empty grid, nothing to carve");
            return;
        }

        for (coord, cell) in grid.iter() {
            self.renderer.render(MazeEvent::CellState { coord, cell: *cell });
        }
        self.renderer.render(MazeEvent::Pulse);

        grid.break_entrance_and_exit();
        for coord in [grid.entrance(), grid.exit()].into_iter().flatten() {
            self.renderer.render(MazeEvent::CellState {
                coord,
                cell: grid[coord],
            });
        }
        self.renderer.render(MazeEvent::Pulse);

        let carved = randomized_dfs(grid, &mut self.rng, &mut self.renderer);
        grid.reset_visited();

        tracing::debug!(
            "[generate] carved {} passages in a {}x{} grid",
            carved,
            grid.num_cols(),
            grid.num_rows()
        );
    }
}

/// Generate a maze in place without observing the steps.
pub fn generate_maze(grid: &mut Grid, seed: Option<u64>) {
    Generator::new(seed).generate(grid);
}
