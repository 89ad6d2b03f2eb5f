use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, TryRecvError},
    },
    time::Duration,
};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::{UserAction, glyph::Glyph},
    maze::{Cell, Coord},
    render::MazeEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    /// Every event was drawn
    Completed,
    /// The user cancelled the animation
    Cancelled,
    /// The terminal cannot fit the maze
    TooSmall,
}

/// Draws maze events on a terminal lattice of `(2 * cols + 1) x (2 * rows + 1)` glyphs.
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Maze dimensions in cells (cols, rows)
    dims: (usize, usize),
    /// Time to wait after each pulse
    step_delay: Duration,
}

impl<W: Write> TerminalRenderer<W> {
    pub const MIN_STEP_DELAY: Duration = Duration::from_micros(100);
    pub const MAX_STEP_DELAY: Duration = Duration::from_secs(1);

    pub fn new(out: W, dims: (usize, usize), step_delay: Duration) -> Self {
        Self {
            out,
            dims,
            step_delay,
        }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Size of the drawing in terminal columns and rows, including the status line.
    pub fn required_size(dims: (usize, usize)) -> (usize, usize) {
        let (cols, rows) = dims;
        ((2 * cols + 1) * Glyph::WIDTH as usize, 2 * rows + 2)
    }

    pub fn fits(dims: (usize, usize), term_size: (u16, u16)) -> bool {
        let (width, height) = TerminalRenderer::<W>::required_size(dims);
        width <= term_size.0 as usize && height <= term_size.1 as usize
    }

    pub fn speed_up(&mut self) {
        self.step_delay = (self.step_delay / 2).max(Self::MIN_STEP_DELAY);
    }

    pub fn slow_down(&mut self) {
        self.step_delay = (self.step_delay * 2).min(Self::MAX_STEP_DELAY);
    }

    fn put(&mut self, lattice: (usize, usize), glyph: Glyph) -> std::io::Result<()> {
        // Lattice positions fit in u16 once the terminal size check has passed
        let x = (lattice.0 * Glyph::WIDTH as usize) as u16;
        let y = lattice.1 as u16;
        queue!(self.out, cursor::MoveTo(x, y), style::Print(glyph))
    }

    fn put_interior(&mut self, coord: Coord, glyph: Glyph) -> std::io::Result<()> {
        self.put((2 * coord.0 + 1, 2 * coord.1 + 1), glyph)
    }

    /// The lattice position of the wall between two adjacent cells.
    fn passage(from: Coord, to: Coord) -> (usize, usize) {
        (from.0 + to.0 + 1, from.1 + to.1 + 1)
    }

    fn draw_cell(&mut self, coord: Coord, cell: &Cell) -> std::io::Result<()> {
        let (x, y) = (2 * coord.0 + 1, 2 * coord.1 + 1);
        let wall = |standing| if standing { Glyph::Wall } else { Glyph::Empty };
        let walls = cell.walls;
        for corner in [(x - 1, y - 1), (x + 1, y - 1), (x - 1, y + 1), (x + 1, y + 1)] {
            self.put(corner, Glyph::Wall)?;
        }
        self.put((x, y - 1), wall(walls.top))?;
        self.put((x, y + 1), wall(walls.bottom))?;
        self.put((x - 1, y), wall(walls.left))?;
        self.put((x + 1, y), wall(walls.right))?;
        let interior = if cell.visited {
            Glyph::Empty
        } else {
            Glyph::Unvisited
        };
        self.put((x, y), interior)
    }

    /// Draw a single event. Pulses flush the output and wait for the step delay.
    pub fn draw_event(&mut self, event: &MazeEvent) -> std::io::Result<()> {
        match *event {
            MazeEvent::CellState { coord, cell } => self.draw_cell(coord, &cell)?,
            MazeEvent::Carve { from, to } => {
                self.put_interior(from, Glyph::Empty)?;
                self.put_interior(to, Glyph::Carving)?;
            }
            MazeEvent::DeadEnd { coord } => self.put_interior(coord, Glyph::Empty)?,
            MazeEvent::Move {
                from,
                to,
                backtrack,
            } => {
                let glyph = if backtrack {
                    Glyph::Backtracked
                } else {
                    Glyph::Route
                };
                if !backtrack {
                    self.put_interior(from, Glyph::Route)?;
                }
                self.put(Self::passage(from, to), glyph)?;
                self.put_interior(to, glyph)?;
            }
            MazeEvent::Pulse => {
                self.out.flush()?;
                if !self.step_delay.is_zero() {
                    std::thread::sleep(self.step_delay);
                }
            }
        }
        Ok(())
    }

    /// Print a line of text right below the maze.
    pub fn status(&mut self, text: &str, color: Color) -> std::io::Result<()> {
        let (_, height) = TerminalRenderer::<W>::required_size(self.dims);
        queue!(
            self.out,
            cursor::MoveTo(0, (height - 1) as u16),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(text.with(color).attribute(Attribute::Bold)),
        )?;
        self.out.flush()
    }

    /// Block until the user resumes or cancels. Returns `false` on cancel.
    fn wait_for_resume(&mut self, actions: &Receiver<UserAction>) -> std::io::Result<bool> {
        self.status("Paused. Enter to resume, Esc to exit.", Color::Yellow)?;
        loop {
            match actions.recv() {
                // Input thread is gone, nothing can resume us except carrying on
                Err(_) => return Ok(true),
                Ok(UserAction::Resume) => {
                    self.status("", Color::Reset)?;
                    return Ok(true);
                }
                Ok(UserAction::Cancel) => return Ok(false),
                Ok(UserAction::SpeedUp) => self.speed_up(),
                Ok(UserAction::SlowDown) => self.slow_down(),
                Ok(UserAction::Pause) => {}
            }
        }
    }

    /// Render loop: draw events as they arrive until the compute side hangs up or the user
    /// cancels.
    pub fn render(
        &mut self,
        events: Receiver<MazeEvent>,
        actions: Receiver<UserAction>,
        cancel: &AtomicBool,
        term_size: (u16, u16),
    ) -> std::io::Result<RendererStatus> {
        if !TerminalRenderer::<W>::fits(self.dims, term_size) {
            return Ok(RendererStatus::TooSmall);
        }
        queue!(self.out, terminal::Clear(ClearType::All), cursor::Hide)?;
        self.out.flush()?;

        loop {
            match actions.try_recv() {
                Ok(action) => {
                    tracing::debug!("[render] user action: {:?}", action);
                    match action {
                        UserAction::Pause => {
                            if !self.wait_for_resume(&actions)? {
                                return Ok(RendererStatus::Cancelled);
                            }
                        }
                        UserAction::Cancel => return Ok(RendererStatus::Cancelled),
                        UserAction::SpeedUp => self.speed_up(),
                        UserAction::SlowDown => self.slow_down(),
                        UserAction::Resume => {}
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }

            match events.recv() {
                // Compute side finished and dropped its sender
                Err(_) => break,
                Ok(event) => {
                    if cancel.load(Ordering::Relaxed) {
                        return Ok(RendererStatus::Cancelled);
                    }
                    self.draw_event(&event)?;
                }
            }
        }
        self.out.flush()?;
        Ok(RendererStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generators::Generator, maze::Grid, render::Renderer, solvers::Solver};

    #[test]
    fn test_required_size() {
        type R = TerminalRenderer<Vec<u8>>;
        assert_eq!(R::required_size((3, 2)), (14, 6));
        assert!(R::fits((3, 2), (14, 6)));
        assert!(!R::fits((3, 2), (13, 6)));
        assert!(!R::fits((3, 2), (14, 5)));
    }

    #[test]
    fn test_speed_limits() {
        let mut renderer = TerminalRenderer::new(Vec::new(), (2, 2), Duration::from_millis(1));
        for _ in 0..20 {
            renderer.speed_up();
        }
        assert_eq!(renderer.step_delay(), TerminalRenderer::<Vec<u8>>::MIN_STEP_DELAY);
        for _ in 0..40 {
            renderer.slow_down();
        }
        assert_eq!(renderer.step_delay(), TerminalRenderer::<Vec<u8>>::MAX_STEP_DELAY);
    }

    #[test]
    fn test_passage_position() {
        type R = TerminalRenderer<Vec<u8>>;
        assert_eq!(R::passage((0, 0), (1, 0)), (2, 1));
        assert_eq!(R::passage((2, 3), (2, 2)), (5, 6));
    }

    #[test]
    fn test_render_until_hang_up() {
        let (mut tx, rx) = std::sync::mpsc::channel::<MazeEvent>();
        let (_action_tx, action_rx) = std::sync::mpsc::channel::<UserAction>();
        let mut grid = Grid::new(4, 3).unwrap();
        Generator::with_renderer(Some(2), &mut tx).generate(&mut grid);
        Solver::with_renderer(&mut tx).solve(&mut grid);
        tx.render(MazeEvent::Pulse);
        drop(tx);

        let mut renderer = TerminalRenderer::new(Vec::new(), (4, 3), Duration::ZERO);
        let cancel = AtomicBool::new(false);
        let status = renderer.render(rx, action_rx, &cancel, (80, 24)).unwrap();
        assert_eq!(status, RendererStatus::Completed);
        assert!(!renderer.out.is_empty());
    }

    #[test]
    fn test_render_too_small() {
        let (_tx, rx) = std::sync::mpsc::channel::<MazeEvent>();
        let (_action_tx, action_rx) = std::sync::mpsc::channel::<UserAction>();
        let mut renderer = TerminalRenderer::new(Vec::new(), (50, 50), Duration::ZERO);
        let cancel = AtomicBool::new(false);
        let status = renderer.render(rx, action_rx, &cancel, (80, 24)).unwrap();
        assert_eq!(status, RendererStatus::TooSmall);
        assert!(renderer.out.is_empty());
    }

    #[test]
    fn test_render_cancelled() {
        let (tx, rx) = std::sync::mpsc::channel::<MazeEvent>();
        let (action_tx, action_rx) = std::sync::mpsc::channel::<UserAction>();
        tx.send(MazeEvent::Pulse).unwrap();
        action_tx.send(UserAction::Cancel).unwrap();
        let mut renderer = TerminalRenderer::new(Vec::new(), (2, 2), Duration::ZERO);
        let cancel = AtomicBool::new(false);
        let status = renderer.render(rx, action_rx, &cancel, (80, 24)).unwrap();
        assert_eq!(status, RendererStatus::Cancelled);
    }

    #[test]
    fn test_pause_then_resume() {
        let (tx, rx) = std::sync::mpsc::channel::<MazeEvent>();
        let (action_tx, action_rx) = std::sync::mpsc::channel::<UserAction>();
        action_tx.send(UserAction::Pause).unwrap();
        action_tx.send(UserAction::SpeedUp).unwrap();
        action_tx.send(UserAction::Resume).unwrap();
        tx.send(MazeEvent::Pulse).unwrap();
        drop(tx);
        let mut renderer = TerminalRenderer::new(Vec::new(), (2, 2), Duration::from_millis(2));
        let cancel = AtomicBool::new(false);
        let status = renderer.render(rx, action_rx, &cancel, (80, 24)).unwrap();
        assert_eq!(status, RendererStatus::Completed);
        assert_eq!(renderer.step_delay(), Duration::from_millis(1));
    }
}
