use error_chain::bail;
use log::{debug, trace};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::cells::CellCoordinate;
use crate::errors::*;
use crate::grid::{self, Grid};
use crate::utils::{self, FnvHashSet};

/// The outcome of a successful `resolve`.
#[derive(Debug, Clone)]
pub struct Solution {
    route: Vec<CellCoordinate>,
    dead_ends: FnvHashSet<CellCoordinate>,
}

impl Solution {
    /// Cells from the entry to the exit, both included. A single cell when entry and exit are
    /// the same.
    #[inline]
    pub fn route(&self) -> &[CellCoordinate] {
        &self.route
    }

    #[inline]
    pub fn entry(&self) -> CellCoordinate {
        self.route[0]
    }

    #[inline]
    pub fn exit(&self) -> CellCoordinate {
        self.route[self.route.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.route.len()
    }

    /// Cells found to lead nowhere while searching. Informational only.
    #[inline]
    pub fn dead_ends(&self) -> &FnvHashSet<CellCoordinate> {
        &self.dead_ends
    }

    pub fn is_on_route(&self, coord: CellCoordinate) -> bool {
        self.route.contains(&coord)
    }
}

/// Find a route from `entry` to `exit` by walking the carved passages depth first.
///
/// At each step one of the reachable neighbours that is neither on the current path nor a known
/// dead end is picked at random. When there is none the current cell is either the exit, which
/// ends the search, or a dead end: it is excluded for the rest of the search and the walk steps
/// back to the previous cell of the path.
///
/// Every cell of the route but the exit ends up with the direction towards its successor.
/// Directions left over from a previous solve are cleared first, walls are never touched.
///
/// Returns `NoPathToExit` if the search runs out of cells before reaching the exit, which can only
/// happen when the grid is not a perfect maze.
pub fn resolve<R>(grid: &mut Grid,
                  entry: CellCoordinate,
                  exit: CellCoordinate,
                  rng: &mut R)
                  -> Result<Solution>
    where R: Rng + ?Sized
{
    grid.check_coordinate(entry)?;
    grid.check_coordinate(exit)?;
    grid.clear_directions();

    let mut path: Vec<CellCoordinate> = Vec::new();
    // Membership of `path`, kept alongside it for constant time lookups.
    let mut on_path = utils::fnv_hashset(grid.size());
    let mut nogo = utils::fnv_hashset(grid.size());
    let mut current = entry;

    loop {
        let candidates = grid.open_neighbours(current, &on_path, &nogo);

        match candidates.choose(&mut *rng) {
            Some(&next) => {
                path.push(current);
                on_path.insert(current);
                grid.set_direction(current, Some(grid::direction_from(current, next)))?;
                trace!("advancing {} -> {}", current, next);
                current = next;
            }
            None if current == exit => break,
            None => {
                grid.set_direction(current, None)?;
                nogo.insert(current);

                current = match path.pop() {
                    Some(previous) => {
                        on_path.remove(&previous);
                        previous
                    }
                    None => bail!(ErrorKind::NoPathToExit(entry, exit)),
                };
                trace!("dead end, backtracking to {}", current);
            }
        }
    }

    // The walk may have wandered past the exit before coming back to it.
    grid.set_direction(exit, None)?;
    path.push(exit);

    debug!("Resolved a route of {} cells from {} to {}, {} dead ends excluded",
           path.len(), entry, exit, nogo.len());

    Ok(Solution {
        route: path,
        dead_ends: nogo,
    })
}
