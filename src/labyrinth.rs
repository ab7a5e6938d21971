//! The host facing side of the crate: one `Labyrinth` owns a grid, the random source shared by
//! generation and solving, the entry and exit choices and the last solution.

use error_chain::bail;
use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use crate::cells::{CellCoordinate, Marker};
use crate::errors::*;
use crate::generators;
use crate::grid::Grid;
use crate::pathing::{self, Solution};
use crate::units::GridSize;

/// What to build. Anything left unset is picked at random when building.
#[derive(Eq, PartialEq, Clone, Debug, Default)]
pub struct LabyrinthConfig {
    pub size: GridSize,
    /// Cell where carving begins.
    pub start: Option<CellCoordinate>,
    /// Defaults to the start cell.
    pub entry: Option<CellCoordinate>,
    pub exit: Option<CellCoordinate>,
    /// Fixed seed for reproducible mazes and routes.
    pub seed: Option<u64>,
}

#[derive(Debug, Default)]
pub struct LabyrinthConfigBuilder {
    config: LabyrinthConfig,
}

impl LabyrinthConfigBuilder {
    pub fn new() -> LabyrinthConfigBuilder {
        LabyrinthConfigBuilder::default()
    }
    pub fn size(mut self, size: usize) -> LabyrinthConfigBuilder {
        self.config.size = GridSize(size);
        self
    }
    pub fn start(mut self, start: Option<CellCoordinate>) -> LabyrinthConfigBuilder {
        self.config.start = start;
        self
    }
    pub fn entry(mut self, entry: Option<CellCoordinate>) -> LabyrinthConfigBuilder {
        self.config.entry = entry;
        self
    }
    pub fn exit(mut self, exit: Option<CellCoordinate>) -> LabyrinthConfigBuilder {
        self.config.exit = exit;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> LabyrinthConfigBuilder {
        self.config.seed = seed;
        self
    }
    pub fn build(self) -> LabyrinthConfig {
        self.config
    }
}

pub struct Labyrinth {
    config: LabyrinthConfig,
    rng: StdRng,
    grid: Option<Grid>,
    start: Option<CellCoordinate>,
    entry: Option<CellCoordinate>,
    exit: Option<CellCoordinate>,
    solution: Option<Solution>,
}

impl Labyrinth {
    pub fn new(config: LabyrinthConfig) -> Labyrinth {
        Labyrinth {
            rng: seeded_rng(config.seed),
            config,
            grid: None,
            start: None,
            entry: None,
            exit: None,
            solution: None,
        }
    }

    /// Allocate the grid, carve the maze and place the entry and exit.
    ///
    /// Any previous grid is discarded first. A configured coordinate outside of the grid fails with
    /// `InvalidCoordinate` and leaves the labyrinth empty.
    pub fn build(&mut self) -> Result<&Grid> {
        self.reset();

        let mut grid = Grid::new(self.config.size)?;
        for coord in [self.config.start, self.config.entry, self.config.exit].iter().flatten() {
            grid.check_coordinate(*coord)?;
        }

        let start = match self.config.start {
            Some(start) => start,
            None => grid.random_cell(&mut self.rng),
        };
        generators::recursive_backtracker(&mut grid, start, &mut self.rng)?;

        let entry = self.config.entry.unwrap_or(start);
        let exit = match self.config.exit {
            Some(exit) => exit,
            None => grid.random_cell(&mut self.rng),
        };
        info!("Built a {0}x{0} labyrinth from {1}, entry {2}, exit {3}",
              grid.dimension(), start, entry, exit);

        reassign_markers(&mut grid, None, Some(entry), Some(exit))?;

        self.start = Some(start);
        self.entry = Some(entry);
        self.exit = Some(exit);
        Ok(self.grid.get_or_insert(grid))
    }

    /// Build, falling back on the default configuration when the requested size or one of the
    /// requested coordinates is unusable. Only the seed survives the fallback, and the random
    /// source restarts from it.
    ///
    /// Returns the error that caused the fallback, `None` when the configuration was used as is.
    pub fn build_or_default(&mut self) -> Result<Option<Error>> {
        let rejected = match self.build() {
            Ok(_) => return Ok(None),
            Err(e) => e,
        };
        match *rejected.kind() {
            ErrorKind::InvalidCoordinate(..) | ErrorKind::InvalidGridSize(..) => (),
            _ => return Err(rejected),
        }

        warn!("{}, regenerating with the default settings", rejected);
        let seed = self.config.seed;
        self.config = LabyrinthConfigBuilder::new().seed(seed).build();
        self.rng = seeded_rng(seed);
        self.build()?;
        Ok(Some(rejected))
    }

    /// Discard the grid along with the start, entry, exit and solution. The configuration is kept
    /// so that the next `build` follows it again.
    pub fn reset(&mut self) {
        self.grid = None;
        self.start = None;
        self.entry = None;
        self.exit = None;
        self.solution = None;
    }

    /// Move the entry. Before the first build this only records the choice for `build`.
    /// Any current solution is dropped.
    pub fn set_entry(&mut self, entry: CellCoordinate) -> Result<()> {
        self.check_configured_coordinate(entry)?;
        self.config.entry = Some(entry);

        if let Some(grid) = self.grid.as_mut() {
            let previous = self.entry.replace(entry);
            reassign_markers(grid, previous, self.entry, self.exit)?;
            grid.clear_directions();
            self.solution = None;
        }
        Ok(())
    }

    /// Move the exit. Before the first build this only records the choice for `build`.
    /// Any current solution is dropped.
    pub fn set_exit(&mut self, exit: CellCoordinate) -> Result<()> {
        self.check_configured_coordinate(exit)?;
        self.config.exit = Some(exit);

        if let Some(grid) = self.grid.as_mut() {
            let previous = self.exit.replace(exit);
            reassign_markers(grid, previous, self.entry, self.exit)?;
            grid.clear_directions();
            self.solution = None;
        }
        Ok(())
    }

    /// Find a route from the entry to the exit, replacing any previous one.
    pub fn resolve(&mut self) -> Result<&Solution> {
        self.solution = None;

        let grid = self.grid.as_mut().ok_or_else(|| Error::from(ErrorKind::NotBuilt))?;
        let (entry, exit) = match (self.entry, self.exit) {
            (Some(entry), Some(exit)) => (entry, exit),
            _ => bail!(ErrorKind::NotBuilt),
        };

        let solution = pathing::resolve(grid, entry, exit, &mut self.rng)?;
        info!("Resolved the labyrinth in {} cells", solution.len());
        Ok(self.solution.get_or_insert(solution))
    }

    #[inline]
    pub fn config(&self) -> &LabyrinthConfig {
        &self.config
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.config.size
    }

    #[inline]
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    #[inline]
    pub fn start(&self) -> Option<CellCoordinate> {
        self.start
    }

    #[inline]
    pub fn entry(&self) -> Option<CellCoordinate> {
        self.entry
    }

    #[inline]
    pub fn exit(&self) -> Option<CellCoordinate> {
        self.exit
    }

    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn check_configured_coordinate(&self, coord: CellCoordinate) -> Result<()> {
        let GridSize(dimension) = self.config.size;
        if (coord.x as usize) < dimension && (coord.y as usize) < dimension {
            Ok(())
        } else {
            bail!(ErrorKind::InvalidCoordinate(coord, dimension))
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Revert the cell that lost a marker to neutral, then mark the current entry and exit.
/// The exit marker wins when both share a cell.
fn reassign_markers(grid: &mut Grid,
                    previous: Option<CellCoordinate>,
                    entry: Option<CellCoordinate>,
                    exit: Option<CellCoordinate>)
                    -> Result<()> {
    if let Some(previous) = previous {
        grid.set_marker(previous, Marker::Neutral)?;
    }
    if let Some(entry) = entry {
        grid.set_marker(entry, Marker::Entry)?;
    }
    if let Some(exit) = exit {
        grid.set_marker(exit, Marker::Exit)?;
    }
    debug!("Markers placed, entry {:?}, exit {:?}", entry, exit);
    Ok(())
}


#[cfg(test)]
mod tests {

    use super::*;

    fn gc(x: u32, y: u32) -> CellCoordinate {
        CellCoordinate::new(x, y)
    }

    fn seeded(size: usize, seed: u64) -> LabyrinthConfigBuilder {
        LabyrinthConfigBuilder::new().size(size).seed(Some(seed))
    }

    fn marker_at(labyrinth: &Labyrinth, coord: CellCoordinate) -> Marker {
        labyrinth.grid().and_then(|g| g.cell(coord)).map(|cell| cell.marker()).unwrap()
    }

    #[test]
    fn default_config() {
        let config = LabyrinthConfig::default();
        assert_eq!(config.size, GridSize(10));
        assert_eq!(config.start, None);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn entry_defaults_to_the_start() {
        let mut labyrinth = Labyrinth::new(seeded(6, 1).start(Some(gc(2, 3))).build());
        assert!(labyrinth.grid().is_none());

        let passages = labyrinth.build().unwrap().passages_count();
        assert_eq!(passages, 35);
        assert_eq!(labyrinth.start(), Some(gc(2, 3)));
        assert_eq!(labyrinth.entry(), Some(gc(2, 3)));
        assert!(labyrinth.exit().is_some());
        assert!(labyrinth.grid().unwrap().all_visited());
    }

    #[test]
    fn markers_follow_the_entry_and_exit() {
        let config = seeded(5, 7).entry(Some(gc(0, 0))).exit(Some(gc(4, 4))).build();
        let mut labyrinth = Labyrinth::new(config);
        labyrinth.build().unwrap();
        assert_eq!(marker_at(&labyrinth, gc(0, 0)), Marker::Entry);
        assert_eq!(marker_at(&labyrinth, gc(4, 4)), Marker::Exit);

        labyrinth.set_entry(gc(1, 0)).unwrap();
        assert_eq!(marker_at(&labyrinth, gc(0, 0)), Marker::Neutral);
        assert_eq!(marker_at(&labyrinth, gc(1, 0)), Marker::Entry);

        labyrinth.set_exit(gc(3, 2)).unwrap();
        assert_eq!(marker_at(&labyrinth, gc(4, 4)), Marker::Neutral);
        assert_eq!(marker_at(&labyrinth, gc(3, 2)), Marker::Exit);

        let marked = labyrinth.grid().unwrap().cells()
                              .filter(|cell| cell.marker() != Marker::Neutral)
                              .count();
        assert_eq!(marked, 2);
    }

    #[test]
    fn shared_cell_keeps_the_entry_once_the_exit_moves_away() {
        let config = seeded(4, 3).entry(Some(gc(1, 1))).exit(Some(gc(1, 1))).build();
        let mut labyrinth = Labyrinth::new(config);
        labyrinth.build().unwrap();
        assert_eq!(marker_at(&labyrinth, gc(1, 1)), Marker::Exit);

        labyrinth.set_exit(gc(3, 3)).unwrap();
        assert_eq!(marker_at(&labyrinth, gc(1, 1)), Marker::Entry);
        assert_eq!(marker_at(&labyrinth, gc(3, 3)), Marker::Exit);
    }

    #[test]
    fn moving_a_marker_keeps_the_maze() {
        let mut labyrinth = Labyrinth::new(seeded(8, 21).build());
        labyrinth.build().unwrap();
        let passages = labyrinth.grid().unwrap().iter_passages().collect::<Vec<_>>();
        labyrinth.resolve().unwrap();

        labyrinth.set_entry(gc(7, 0)).unwrap();
        assert!(labyrinth.solution().is_none());
        let grid = labyrinth.grid().unwrap();
        assert_eq!(grid.iter_passages().collect::<Vec<_>>(), passages);
        assert!(grid.cells().all(|cell| cell.direction().is_none()));
    }

    #[test]
    fn coordinates_outside_the_grid_are_rejected() {
        let mut labyrinth = Labyrinth::new(seeded(4, 0).exit(Some(gc(4, 0))).build());
        match labyrinth.build() {
            Err(Error(ErrorKind::InvalidCoordinate(coord, 4), _)) => assert_eq!(coord, gc(4, 0)),
            other => panic!("expected an invalid coordinate error, got {:?}", other.map(|_| ())),
        }
        assert!(labyrinth.grid().is_none());
        assert!(labyrinth.set_entry(gc(0, 9)).is_err());
        assert_eq!(labyrinth.config().entry, None);
    }

    #[test]
    fn unusable_config_falls_back_on_the_defaults() {
        let requested = seeded(4, 13).start(Some(gc(1, 1))).exit(Some(gc(9, 9))).build();
        let mut labyrinth = Labyrinth::new(requested);
        match labyrinth.build_or_default() {
            Ok(Some(Error(ErrorKind::InvalidCoordinate(coord, 4), _))) => assert_eq!(coord, gc(9, 9)),
            other => panic!("expected a fallback on the exit, got {:?}", other),
        }
        let fallback = LabyrinthConfigBuilder::new().seed(Some(13)).build();
        assert_eq!(labyrinth.config(), &fallback);
        assert_eq!(labyrinth.grid().map(|g| g.dimension()), Some(10));

        // Same maze as asking for the defaults directly
        let mut direct = Labyrinth::new(fallback);
        direct.build().unwrap();
        assert_eq!(labyrinth.start(), direct.start());
        assert_eq!(labyrinth.exit(), direct.exit());
        assert_eq!(labyrinth.grid().unwrap().iter_passages().collect::<Vec<_>>(),
                   direct.grid().unwrap().iter_passages().collect::<Vec<_>>());
    }

    #[test]
    fn zero_size_falls_back_on_the_defaults() {
        let mut labyrinth = Labyrinth::new(seeded(0, 2).build());
        match labyrinth.build_or_default() {
            Ok(Some(Error(ErrorKind::InvalidGridSize(0), _))) => (),
            other => panic!("expected a fallback on the size, got {:?}", other),
        }
        assert_eq!(labyrinth.size(), GridSize(10));
        assert!(labyrinth.grid().unwrap().all_visited());
    }

    #[test]
    fn usable_config_is_kept() {
        let config = seeded(5, 4).entry(Some(gc(0, 4))).build();
        let mut labyrinth = Labyrinth::new(config.clone());
        assert!(labyrinth.build_or_default().unwrap().is_none());
        assert_eq!(labyrinth.config(), &config);
        assert_eq!(labyrinth.entry(), Some(gc(0, 4)));
    }

    #[test]
    fn resolving_before_building_fails() {
        let mut labyrinth = Labyrinth::new(seeded(3, 0).build());
        match labyrinth.resolve() {
            Err(Error(ErrorKind::NotBuilt, _)) => (),
            other => panic!("expected a not built error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn resolve_reaches_the_exit() {
        let config = seeded(10, 5).entry(Some(gc(0, 0))).exit(Some(gc(9, 9))).build();
        let mut labyrinth = Labyrinth::new(config);
        labyrinth.build().unwrap();

        let route = labyrinth.resolve().unwrap().route().to_vec();
        assert_eq!(route.first(), Some(&gc(0, 0)));
        assert_eq!(route.last(), Some(&gc(9, 9)));
        let grid = labyrinth.grid().unwrap();
        assert!(route.windows(2).all(|step| grid.is_linked(step[0], step[1])));
        assert_eq!(labyrinth.solution().map(|s| s.len()), Some(route.len()));
    }

    #[test]
    fn reset_clears_everything_but_the_config() {
        let config = seeded(5, 8).start(Some(gc(1, 1))).build();
        let mut labyrinth = Labyrinth::new(config.clone());
        labyrinth.build().unwrap();
        labyrinth.resolve().unwrap();

        labyrinth.reset();
        assert!(labyrinth.grid().is_none());
        assert!(labyrinth.solution().is_none());
        assert_eq!(labyrinth.entry(), None);
        assert_eq!(labyrinth.exit(), None);
        assert_eq!(labyrinth.config(), &config);
    }

    #[test]
    fn same_seed_same_labyrinth() {
        let build = || {
            let mut labyrinth = Labyrinth::new(seeded(12, 77).build());
            labyrinth.build().unwrap();
            let route = labyrinth.resolve().unwrap().route().to_vec();
            let passages = labyrinth.grid().unwrap().iter_passages().collect::<Vec<_>>();
            (labyrinth.start(), labyrinth.exit(), passages, route)
        };
        assert_eq!(build(), build());
    }
}
