mod glyph;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
    },
    time::{Duration, Instant},
};

use anyhow::Context;
use crossterm::{
    ExecutableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use renderer::{RendererStatus, TerminalRenderer};

use crate::{
    config::{Config, Mode},
    generators::Generator,
    maze::{Grid, GridError},
    render::{MazeEvent, NoopRenderer, Renderer},
    solvers::{Solution, Solver},
};

/// Requests from the keyboard to the render thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Pause the animation
    Pause,
    /// Resume the animation
    Resume,
    /// Halve the step delay
    SpeedUp,
    /// Double the step delay
    SlowDown,
    /// Stop drawing
    Cancel,
}

/// What a finished run produced.
pub struct Outcome {
    pub grid: Grid,
    pub solution: Option<Solution>,
}

pub struct App {
    config: Config,
    /// How often the input thread checks whether rendering has finished
    input_poll_timeout: Duration,
}

impl App {
    /// Maximum number of maze events buffered between the compute and render threads
    const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;

    pub fn new(config: Config) -> Self {
        Self {
            config,
            input_poll_timeout: Duration::from_millis(100),
        }
    }

    /// Build the grid, carve it and solve it, reporting every step to `renderer`.
    pub fn compute<R: Renderer>(config: &Config, mut renderer: R) -> Result<Outcome, GridError> {
        let mut grid = Grid::with_layout(config.cols, config.rows, config.layout)?;
        Generator::with_renderer(config.seed, &mut renderer).generate(&mut grid);
        let solution = Solver::with_renderer(&mut renderer).find_path(&mut grid);
        Ok(Outcome { grid, solution })
    }

    /// Run in the configured mode.
    pub fn run(&self) -> anyhow::Result<()> {
        self.config.validate().context("invalid configuration")?;
        match self.config.mode {
            Mode::Headless => {
                let mut stdout = std::io::stdout();
                self.run_headless(&mut stdout)?;
                Ok(())
            }
            Mode::Animate => self.run_animated(),
        }
    }

    /// Generate and solve at full speed, then write the result to `out`.
    pub fn run_headless<W: Write>(&self, out: &mut W) -> anyhow::Result<Outcome> {
        let started = Instant::now();
        let outcome =
            App::compute(&self.config, NoopRenderer).context("failed to build the grid")?;
        tracing::info!(
            "[headless] {}x{} maze generated and solved in {:?}",
            self.config.cols,
            self.config.rows,
            started.elapsed()
        );

        if self.config.print {
            let path = outcome
                .solution
                .as_ref()
                .map(|s| s.path.as_slice())
                .unwrap_or_default();
            write!(out, "{}", outcome.grid.to_ascii(path))?;
        }
        match &outcome.solution {
            Some(solution) => writeln!(
                out,
                "Path found! {} cells, {} moves, {} backtracks.",
                solution.path.len(),
                solution.forward_moves,
                solution.backtracks
            )?,
            None => writeln!(out, "No path found.")?,
        }
        Ok(outcome)
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn run_animated(&self) -> anyhow::Result<()> {
        // Fail on bad dimensions or a small terminal before allocating the grid
        let dims = Grid::dimensions(self.config.cols, self.config.rows)
            .context("failed to build the grid")?;
        let term_size = terminal::size().context("failed to read the terminal size")?;
        if let Some(message) = App::terminal_too_small(dims, term_size) {
            tracing::info!("{}", message);
            println!("{}", message);
            return Ok(());
        }

        let mut stdout = std::io::stdout();
        App::setup_terminal(&mut stdout).context("failed to set up the terminal")?;
        let result = self.animate(&mut stdout, dims, term_size);
        App::restore_terminal(&mut stdout).context("failed to restore the terminal")?;

        if let Some(summary) = result? {
            println!("{}", summary);
        }
        Ok(())
    }

    /// Spawn the compute, render and input threads and wait for them.
    /// Returns a summary line to print once the terminal is restored.
    fn animate(
        &self,
        stdout: &mut Stdout,
        dims: (usize, usize),
        term_size: (u16, u16),
    ) -> anyhow::Result<Option<String>> {
        // Set by the input thread on Esc, read by the render thread
        let render_cancel = Arc::new(AtomicBool::new(false));
        // Set by the main thread once rendering is over, tells the input thread to stop
        let render_done = Arc::new(AtomicBool::new(false));

        let (event_tx, event_rx) =
            std::sync::mpsc::sync_channel::<MazeEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);
        let (action_tx, action_rx) = std::sync::mpsc::channel::<UserAction>();

        let config = self.config.clone();
        let compute_thread_handle = std::thread::spawn(move || App::compute(&config, event_tx));

        let step_delay = self.config.step_delay;
        let render_cancel_for_render = render_cancel.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let mut renderer = TerminalRenderer::new(std::io::stdout(), dims, step_delay);
            let status = renderer.render(event_rx, action_rx, &render_cancel_for_render, term_size);
            (renderer, status)
        });

        let input_poll_timeout = self.input_poll_timeout;
        let render_cancel_for_input = render_cancel.clone();
        let render_done_for_input = render_done.clone();
        let input_thread_handle = std::thread::spawn(move || {
            App::listen_to_user_input(
                action_tx,
                input_poll_timeout,
                &render_done_for_input,
                &render_cancel_for_input,
            )
        });

        let (mut renderer, status) = render_thread_handle
            .join()
            .map_err(|_| anyhow::anyhow!("render thread panicked"))?;
        render_done.store(true, Ordering::Relaxed);
        let status = status.context("failed to draw the maze")?;

        // The render thread has dropped the receiver, so the compute thread cannot block
        let outcome = compute_thread_handle
            .join()
            .map_err(|_| anyhow::anyhow!("compute thread panicked"))?
            .context("failed to build the grid")?;
        input_thread_handle
            .join()
            .map_err(|_| anyhow::anyhow!("input thread panicked"))?
            .context("failed to read keyboard input")?;

        match status {
            RendererStatus::Cancelled => {
                tracing::info!("Rendering was cancelled by user.");
                Ok(None)
            }
            RendererStatus::TooSmall => Ok(App::terminal_too_small(dims, term_size)),
            RendererStatus::Completed => {
                let msg = match &outcome.solution {
                    Some(solution) => format!(
                        "Path found! {} cells, {} moves, {} backtracks. ",
                        solution.path.len(),
                        solution.forward_moves,
                        solution.backtracks
                    ),
                    None => "No path found. ".to_string(),
                };
                renderer.status(&msg, Color::Green)?;
                stdout.execute(style::PrintStyledContent(
                    "Press Esc to exit..."
                        .with(Color::Blue)
                        .attribute(Attribute::Bold),
                ))?;
                App::wait_for_esc()?;
                Ok(Some(msg.trim_end().to_string()))
            }
        }
    }

    /// Explains why a maze of `dims` cells cannot be drawn in a terminal of `term_size`.
    /// Returns `None` when it fits.
    fn terminal_too_small(dims: (usize, usize), term_size: (u16, u16)) -> Option<String> {
        if TerminalRenderer::<Stdout>::fits(dims, term_size) {
            return None;
        }
        let (width, height) = TerminalRenderer::<Stdout>::required_size(dims);
        Some(format!(
            "Terminal size is too small ({}x{}) to draw a {}x{} maze, which needs {}x{}.",
            term_size.0, term_size.1, dims.0, dims.1, width, height
        ))
    }

    /// Listen for key presses and translate them into user actions for the render thread.
    /// This function runs in a separate thread, and is the only place where user input is read
    fn listen_to_user_input(
        action_tx: Sender<UserAction>,
        event_poll_timeout: Duration,
        render_done: &AtomicBool,
        render_cancel: &AtomicBool,
    ) -> std::io::Result<()> {
        let mut is_paused = false;
        loop {
            if render_done.load(Ordering::Relaxed) || render_cancel.load(Ordering::Relaxed) {
                return Ok(());
            }

            // Poll with a timeout so the flags above are checked regularly
            if !event::poll(event_poll_timeout)? {
                continue;
            }

            let action = match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    match key_event.code {
                        KeyCode::Esc => {
                            tracing::debug!("[input loop] Esc key pressed, cancelling");
                            render_cancel.store(true, Ordering::Relaxed);
                            UserAction::Cancel
                        }
                        KeyCode::Enter | KeyCode::Char(' ') => {
                            is_paused = !is_paused;
                            if is_paused {
                                UserAction::Pause
                            } else {
                                UserAction::Resume
                            }
                        }
                        KeyCode::Up => UserAction::SpeedUp,
                        KeyCode::Down => UserAction::SlowDown,
                        _ => continue,
                    }
                }
                _ => continue,
            };

            let is_cancel = action == UserAction::Cancel;
            if action_tx.send(action).is_err() || is_cancel {
                // Render thread has exited, or the user asked it to
                return Ok(());
            }
        }
    }

    /// Wait for the user to press the Esc key
    /// This function blocks until Esc is pressed
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Profiling mode: generate and solve repeatedly without drawing anything.
    /// Returns the total time spent.
    pub fn profile(&self, iterations: usize) -> anyhow::Result<Duration> {
        let mut total = Duration::ZERO;
        for i in 0..iterations {
            let config = Config {
                // Vary the maze between iterations while keeping the run reproducible
                seed: self.config.seed.map(|s| s.wrapping_add(i as u64)),
                ..self.config.clone()
            };
            let started = Instant::now();
            let outcome =
                App::compute(&config, NoopRenderer).context("failed to build the grid")?;
            let elapsed = started.elapsed();
            total += elapsed;
            tracing::info!(
                "[profile] iteration {}: solved={} in {:?}",
                i,
                outcome.solution.is_some(),
                elapsed
            );
        }
        tracing::info!(
            "[profile] {} iterations of {}x{} took {:?}",
            iterations,
            self.config.cols,
            self.config.rows,
            total
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless(cols: i64, rows: i64, seed: u64, print: bool) -> Config {
        Config {
            cols,
            rows,
            seed: Some(seed),
            mode: Mode::Headless,
            print,
            ..Config::default()
        }
    }

    #[test]
    fn test_compute_solves_generated_maze() {
        let outcome = App::compute(&headless(15, 9, 3, false), NoopRenderer).unwrap();
        assert!(outcome.solution.is_some());
        assert_eq!(outcome.grid.len(), 15 * 9);
    }

    #[test]
    fn test_compute_rejects_negative_dimensions() {
        assert!(matches!(
            App::compute(&headless(-3, 9, 3, false), NoopRenderer),
            Err(GridError::NegativeDimensions { .. })
        ));
    }

    #[test]
    fn test_compute_reports_to_renderer() {
        let mut log: Vec<MazeEvent> = Vec::new();
        App::compute(&headless(5, 5, 8, false), &mut log).unwrap();
        assert!(log.iter().any(|e| matches!(e, MazeEvent::Carve { .. })));
        assert!(log.iter().any(|e| matches!(e, MazeEvent::Move { .. })));
    }

    #[test]
    fn test_headless_output() {
        let app = App::new(headless(2, 1, 10, true));
        let mut out = Vec::new();
        let outcome = app.run_headless(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "+  +--+\n|** **|\n+--+  +\nPath found! 2 cells, 1 moves, 0 backtracks.\n"
        );
        assert_eq!(outcome.solution.map(|s| s.path), Some(vec![(0, 0), (1, 0)]));
    }

    #[test]
    fn test_headless_empty_grid() {
        let app = App::new(headless(0, 0, 1, true));
        let mut out = Vec::new();
        app.run_headless(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No path found.\n");
    }

    #[test]
    fn test_terminal_too_small() {
        // Checked from the dimensions alone, so no grid of this size is ever built
        let dims = Grid::dimensions(16_000, 30_000).unwrap();
        let message = App::terminal_too_small(dims, (200, 60)).unwrap();
        assert!(message.starts_with("Terminal size is too small (200x60)"));
        assert!(message.contains("16000x30000 maze, which needs 64002x60002"));
        assert_eq!(App::terminal_too_small((4, 3), (80, 24)), None);
        assert_eq!(App::terminal_too_small((4, 3), (18, 8)), None);
        assert!(App::terminal_too_small((4, 3), (17, 8)).is_some());
    }

    #[test]
    fn test_profile_runs_every_iteration() {
        let app = App::new(headless(10, 10, 1, false));
        assert!(app.profile(3).is_ok());
    }
}
