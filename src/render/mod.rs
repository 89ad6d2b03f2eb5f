//! Step notifications emitted by the generator and the solver.
//!
//! The algorithms only ever push events into a [`Renderer`]. Nothing a renderer does can change
//! their outcome, so [`NoopRenderer`] gives the same maze and the same path as a full terminal
//! animation.

use std::sync::mpsc::{Sender, SyncSender};

use crate::maze::{Cell, Coord};

/// A single observable step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MazeEvent {
    /// The wall configuration of a cell changed (or is being drawn for the first time).
    CellState { coord: Coord, cell: Cell },
    /// Generation cleared the wall pair between `from` and `to` and moved into `to`.
    Carve { from: Coord, to: Coord },
    /// Generation found no unvisited neighbor around `coord` and popped it.
    DeadEnd { coord: Coord },
    /// The solver stepped from `from` into `to`, or undid that step when `backtrack` is set.
    Move {
        from: Coord,
        to: Coord,
        backtrack: bool,
    },
    /// End of an algorithmic step. Renderers refresh or pace themselves here.
    Pulse,
}

impl MazeEvent {
    pub fn is_pulse(&self) -> bool {
        matches!(self, MazeEvent::Pulse)
    }
}

/// Receives step notifications.
pub trait Renderer {
    fn render(&mut self, event: MazeEvent);
}

/// The renderer used when nobody is watching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&mut self, _event: MazeEvent) {}
}

/// Records every event in order.
impl Renderer for Vec<MazeEvent> {
    fn render(&mut self, event: MazeEvent) {
        self.push(event);
    }
}

/// Forwards events to a render thread. Once the receiver hangs up the events are dropped, so
/// generation and solving still run to completion.
impl Renderer for Sender<MazeEvent> {
    fn render(&mut self, event: MazeEvent) {
        let _ = self.send(event);
    }
}

/// Like the [`Sender`] impl, but blocks while the channel buffer is full, which keeps the
/// compute side from racing ahead of the animation.
impl Renderer for SyncSender<MazeEvent> {
    fn render(&mut self, event: MazeEvent) {
        let _ = self.send(event);
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, event: MazeEvent) {
        (**self).render(event);
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, event: MazeEvent) {
        (**self).render(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_keeps_order() {
        let mut log: Vec<MazeEvent> = Vec::new();
        log.render(MazeEvent::DeadEnd { coord: (1, 1) });
        log.render(MazeEvent::Pulse);
        assert_eq!(
            log,
            vec![MazeEvent::DeadEnd { coord: (1, 1) }, MazeEvent::Pulse]
        );
        assert!(log[1].is_pulse());
    }

    #[test]
    fn test_renderer_through_mut_ref() {
        fn feed<R: Renderer>(mut renderer: R) {
            renderer.render(MazeEvent::Pulse);
        }
        let mut log: Vec<MazeEvent> = Vec::new();
        feed(&mut log);
        feed(&mut log);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_channel_renderer_survives_hang_up() {
        let (mut tx, rx) = std::sync::mpsc::channel::<MazeEvent>();
        tx.render(MazeEvent::Pulse);
        assert_eq!(rx.recv().ok(), Some(MazeEvent::Pulse));
        drop(rx);
        // Must not panic
        tx.render(MazeEvent::Pulse);
    }

    #[test]
    fn test_sync_channel_renderer() {
        let (mut tx, rx) = std::sync::mpsc::sync_channel::<MazeEvent>(4);
        tx.render(MazeEvent::DeadEnd { coord: (0, 0) });
        assert_eq!(rx.try_recv().ok(), Some(MazeEvent::DeadEnd { coord: (0, 0) }));
        drop(rx);
        tx.render(MazeEvent::Pulse);
    }

    #[test]
    fn test_boxed_renderer() {
        let mut boxed: Box<dyn Renderer> = Box::new(NoopRenderer);
        boxed.render(MazeEvent::Pulse);
    }
}
