//! `Error`, `ErrorKind`, `Result` and `ResultExt` for the whole crate, created by `error_chain!`.
//!
//! Every kind but `NoPathToExit` is a broken precondition on the caller's side. `NoPathToExit`
//! means the grid is not a perfect maze anymore, which generation never produces.

#![allow(deprecated)] // error_chain still implements `Error::description`

use crate::cells::CellCoordinate;
use error_chain::error_chain;

error_chain! {
    errors {
        InvalidGridSize(size: usize) {
            description("invalid grid size")
            display("invalid grid size {}, a grid needs at least one cell per side", size)
        }

        InvalidCoordinate(coord: CellCoordinate, dimension: usize) {
            description("coordinate outside of the grid")
            display("coordinate {} is outside of the {}x{} grid", coord, dimension, dimension)
        }

        NonAdjacentCells(a: CellCoordinate, b: CellCoordinate) {
            description("cells are not adjacent")
            display("cells {} and {} do not share a wall", a, b)
        }

        GridAlreadyCarved(passages: usize) {
            description("grid already carved")
            display("the grid already has {} passages, generation needs every wall raised", passages)
        }

        NoPathToExit(entry: CellCoordinate, exit: CellCoordinate) {
            description("no path to the exit")
            display("every route from {} was exhausted without reaching {}", entry, exit)
        }

        NotBuilt {
            description("labyrinth not built")
            display("the labyrinth has no grid, build it first")
        }
    }
}
