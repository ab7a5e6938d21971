use error_chain::bail;
use log::{debug, trace};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::cells::CellCoordinate;
use crate::errors::*;
use crate::grid::Grid;

/// Apply the recursive backtracker maze generation algorithm to a grid, starting at `start`.
///
/// A random walk carves passages towards unvisited neighbours only. When the walk gets stuck it
/// backs up along its own history until it finds a cell with an unvisited neighbour, and stops
/// once the history is exhausted. As a wall is only ever broken towards a cell that nothing has
/// reached yet, no loop can be formed: the result is a perfect maze with exactly one path between
/// any two cells, i.e. a spanning tree of `size - 1` passages.
///
/// The grid must have all its walls raised, `GridAlreadyCarved` is returned if any passage
/// exists. Any `visited` marks left over from a previous run
/// are cleared first.
pub fn recursive_backtracker<R>(grid: &mut Grid, start: CellCoordinate, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    grid.check_coordinate(start)?;
    let passages = grid.passages_count();
    if passages != 0 {
        bail!(ErrorKind::GridAlreadyCarved(passages));
    }
    grid.reset_visited();
    debug!("Carving a {0}x{0} maze from {1}", grid.dimension(), start);

    // The walk history, separate from anything the solver keeps later on.
    let mut history: Vec<CellCoordinate> = Vec::with_capacity(grid.size());
    let mut current = start;
    let mut carved = 0usize;

    // A lone cell never gets a neighbour to carve towards but has still been reached.
    grid.set_visited(start, true)?;

    loop {
        let neighbours = grid.neighbours_unvisited(current);

        if let Some(&next) = neighbours.choose(&mut *rng) {
            grid.break_wall_between(current, next)?;
            grid.set_visited(current, true)?;
            grid.set_visited(next, true)?;
            carved += 1;
            trace!("carved {} -> {}", current, next);

            history.push(current);
            current = next;
        } else if let Some(previous) = history.pop() {
            current = previous;
        } else {
            break;
        }
    }

    debug!("Carved {} passages over {} cells", carved, grid.size());
    Ok(())
}
