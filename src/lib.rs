//! **labyrinth** generates square grid mazes with a randomised depth first walk and finds a route
//! between an entry and an exit cell by walking the carved passages.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod labyrinth;
pub mod pathing;
pub mod units;
pub mod utils;

pub use crate::labyrinth::{Labyrinth, LabyrinthConfig, LabyrinthConfigBuilder};
