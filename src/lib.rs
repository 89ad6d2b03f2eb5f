//! Perfect maze generation and solving.
//!
//! A [`maze::Grid`] is carved into a perfect maze by [`generators::Generator`] (randomized
//! depth-first search) and then searched by [`solvers::Solver`] (backtracking depth-first
//! search). Both report their steps to an optional [`render::Renderer`].

pub mod app;
pub mod config;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod render;
pub mod solvers;
