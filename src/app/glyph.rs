use crossterm::style::{Color, Stylize};

use std::fmt;

/// What occupies one position of the terminal lattice.
///
/// The lattice has `2n + 1` positions per axis for `n` cells: odd positions hold cell interiors,
/// even positions hold walls and the corners between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// A standing wall or a corner post
    Wall,
    /// An open passage or a carved cell
    Empty,
    /// A cell not reached by generation yet
    Unvisited,
    /// The cell generation is currently extending from
    Carving,
    /// Part of the solver's current path
    Route,
    /// Explored by the solver and abandoned
    Backtracked,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "██".with(Color::White),
            Glyph::Empty => "  ".with(Color::Reset),
            Glyph::Unvisited => "░░".with(Color::DarkGrey),
            Glyph::Carving => "▓▓".with(Color::Magenta),
            Glyph::Route => "██".with(Color::Yellow),
            Glyph::Backtracked => "··".with(Color::Blue),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
