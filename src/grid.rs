use crate::cells::{self, Cell, CellCoordinate, CoordinateSmallVec, Direction, Marker};
use crate::errors::*;
use crate::units::GridSize;
use crate::utils::FnvHashSet;

use error_chain::bail;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use std::fmt;
use std::slice;

// The sides pointing towards increasing x and y, so each boundary is only seen once.
static FORWARD_DIRECTIONS: [Direction; 2] = [Direction::Left, Direction::Up];

/// A square grid of cells, stored in row major order.
#[derive(Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    dimension: usize,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: dimension: {:?}, passages: {:?}",
               self.dimension, self.passages_count())
    }
}

/// Direction to follow to go from `a` to `b`.
///
/// Any horizontal difference wins over a vertical one, and `Down` is only returned when the
/// coordinates differ by nothing but `a.y > b.y` (or do not differ at all).
pub fn direction_from(a: CellCoordinate, b: CellCoordinate) -> Direction {
    if a.x < b.x {
        Direction::Left
    } else if a.x > b.x {
        Direction::Right
    } else if a.y < b.y {
        Direction::Up
    } else {
        Direction::Down
    }
}

impl Grid {
    /// Allocate `size * size` cells with every wall raised.
    pub fn new(size: GridSize) -> Result<Grid> {
        let GridSize(dimension) = size;
        if dimension == 0 || dimension > u32::max_value() as usize {
            bail!(ErrorKind::InvalidGridSize(dimension));
        }
        let cells_count = dimension.checked_mul(dimension)
            .ok_or_else(|| Error::from(ErrorKind::InvalidGridSize(dimension)))?;

        let cells = CellIter::new(dimension).map(Cell::new).collect::<Vec<_>>();
        debug_assert_eq!(cells.len(), cells_count);

        Ok(Grid {
            cells,
            dimension,
        })
    }

    /// Number of cells along one side.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Total number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cell(&self, coord: CellCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    pub fn cells(&self) -> slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimension)
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> CellCoordinate {
        let dim = self.dimension as u32;
        CellCoordinate::new(rng.gen_range(0..dim), rng.gen_range(0..dim))
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellCoordinate) -> bool {
        (coord.x as usize) < self.dimension && (coord.y as usize) < self.dimension
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: CellCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.dimension + coord.x as usize)
        } else {
            None
        }
    }

    pub fn check_coordinate(&self, coord: CellCoordinate) -> Result<()> {
        if self.is_valid_coordinate(coord) {
            Ok(())
        } else {
            bail!(ErrorKind::InvalidCoordinate(coord, self.dimension))
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: CellCoordinate,
                                  direction: Direction)
                                  -> Option<CellCoordinate> {
        cells::offset_coordinate(coord, direction, self.dimension)
    }

    /// Cells that are Up, Down, Right or Left of a particular cell, but not necessarily
    /// reachable through a broken wall.
    pub fn neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        Direction::ALL.iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Adjacent cells that generation has not visited yet.
    pub fn neighbours_unvisited(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        Direction::ALL.iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .filter(|neighbour| self.cell(*neighbour).map_or(false, |cell| !cell.visited()))
            .collect()
    }

    /// Adjacent cells behind a broken wall, leaving out those already on the path or known to
    /// be dead ends.
    pub fn open_neighbours(&self,
                           coord: CellCoordinate,
                           path: &FnvHashSet<CellCoordinate>,
                           nogo: &FnvHashSet<CellCoordinate>)
                           -> CoordinateSmallVec {
        Direction::ALL.iter()
            .filter(|dir| !self.is_wall_raised(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .filter(|neighbour| !path.contains(neighbour) && !nogo.contains(neighbour))
            .collect()
    }

    /// Carve a passage between two adjacent cells, opening the boundary on both sides.
    pub fn break_wall_between(&mut self, a: CellCoordinate, b: CellCoordinate) -> Result<()> {
        let a_index = self.index_or_err(a)?;
        let b_index = self.index_or_err(b)?;

        let (dx, dy) = ((a.x as i64 - b.x as i64).abs(), (a.y as i64 - b.y as i64).abs());
        if dx + dy != 1 {
            bail!(ErrorKind::NonAdjacentCells(a, b));
        }

        let facing = direction_from(a, b);
        self.cells[a_index].break_wall(facing);
        self.cells[b_index].break_wall(facing.opposite());
        Ok(())
    }

    /// Is the wall on the `dir` side of the cell still standing?
    /// Cells outside of the grid are treated as solid.
    #[inline]
    pub fn is_wall_raised(&self, coord: CellCoordinate, dir: Direction) -> bool {
        self.cell(coord).map_or(true, |cell| cell.is_wall_raised(dir))
    }

    /// Are two cells adjacent and joined by a passage?
    pub fn is_linked(&self, a: CellCoordinate, b: CellCoordinate) -> bool {
        Direction::ALL.iter()
            .any(|dir| self.neighbour_at_direction(a, *dir) == Some(b) &&
                       !self.is_wall_raised(a, *dir))
    }

    /// Every carved passage, once, as a pair of coordinates.
    pub fn iter_passages(&self) -> impl Iterator<Item = (CellCoordinate, CellCoordinate)> + '_ {
        self.iter().flat_map(move |coord| {
            FORWARD_DIRECTIONS.iter().filter_map(move |dir| {
                if self.is_wall_raised(coord, *dir) {
                    None
                } else {
                    self.neighbour_at_direction(coord, *dir).map(|neighbour| (coord, neighbour))
                }
            })
        })
    }

    #[inline]
    pub fn passages_count(&self) -> usize {
        self.iter_passages().count()
    }

    /// The carved passages as an undirected graph. Node indices follow `grid_coordinate_to_index`.
    pub fn passage_graph(&self) -> UnGraph<CellCoordinate, ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.size());
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_passages() {
            if let (Some(a_index), Some(b_index)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }

    pub fn all_visited(&self) -> bool {
        self.cells.iter().all(Cell::visited)
    }

    pub fn reset_visited(&mut self) {
        for cell in &mut self.cells {
            cell.set_visited(false);
        }
    }

    pub fn clear_directions(&mut self) {
        for cell in &mut self.cells {
            cell.set_direction(None);
        }
    }

    pub(crate) fn set_visited(&mut self, coord: CellCoordinate, visited: bool) -> Result<()> {
        let index = self.index_or_err(coord)?;
        self.cells[index].set_visited(visited);
        Ok(())
    }

    pub(crate) fn set_direction(&mut self,
                                coord: CellCoordinate,
                                direction: Option<Direction>)
                                -> Result<()> {
        let index = self.index_or_err(coord)?;
        self.cells[index].set_direction(direction);
        Ok(())
    }

    pub(crate) fn set_marker(&mut self, coord: CellCoordinate, marker: Marker) -> Result<()> {
        let index = self.index_or_err(coord)?;
        self.cells[index].set_marker(marker);
        Ok(())
    }

    fn index_or_err(&self, coord: CellCoordinate) -> Result<usize> {
        self.grid_coordinate_to_index(coord)
            .ok_or_else(|| ErrorKind::InvalidCoordinate(coord, self.dimension).into())
    }

    fn render_cell_body(&self, cell: &Cell) -> String {
        match (cell.marker(), cell.direction()) {
            (Marker::Entry, _) => String::from(" S "),
            (Marker::Exit, _) => String::from(" E "),
            (Marker::Neutral, Some(dir)) => format!(" {} ", dir.arrow()),
            (Marker::Neutral, None) => String::from("   "),
        }
    }
}

/// Text view of the maze, as seen with `Up` at the top of the screen and `Left` on its left:
/// the last row is printed first and every row runs from the last column to the first.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const CORNER: &str = "+";
        const WALL_LR_3: &str = "---";
        const WALL_UD: &str = "|";
        const OPEN_3: &str = "   ";
        const OPEN: &str = " ";

        let dim = self.dimension as u32;
        let mut output = String::new();

        for y in (0..dim).rev() {
            let mut top_section = String::new();
            let mut middle_section = String::new();

            for x in (0..dim).rev() {
                let coord = CellCoordinate::new(x, y);
                let cell = &self.cells[y as usize * self.dimension + x as usize];

                top_section.push_str(CORNER);
                top_section.push_str(if cell.is_wall_raised(Direction::Up) { WALL_LR_3 } else { OPEN_3 });

                middle_section.push_str(if cell.is_wall_raised(Direction::Left) { WALL_UD } else { OPEN });
                middle_section.push_str(&self.render_cell_body(cell));

                if x == 0 {
                    top_section.push_str(CORNER);
                    middle_section.push_str(if self.is_wall_raised(coord, Direction::Right) { WALL_UD } else { OPEN });
                }
            }

            output.push_str(&top_section);
            output.push('\n');
            output.push_str(&middle_section);
            output.push('\n');
        }

        // The southern boundary is the down wall of the first row
        for x in (0..dim).rev() {
            output.push_str(CORNER);
            let down_raised = self.is_wall_raised(CellCoordinate::new(x, 0), Direction::Down);
            output.push_str(if down_raised { WALL_LR_3 } else { OPEN_3 });
        }
        output.push_str(CORNER);
        output.push('\n');

        write!(f, "{}", output)
    }
}

/// Row major iteration over the coordinates of a square grid.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    dimension_size: usize,
    cells_count: usize,
}

impl CellIter {
    fn new(dimension_size: usize) -> CellIter {
        CellIter {
            current_cell_number: 0,
            dimension_size,
            cells_count: dimension_size * dimension_size,
        }
    }
}

impl Iterator for CellIter {
    type Item = CellCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let y = self.current_cell_number / self.dimension_size;
            let x = self.current_cell_number - (y * self.dimension_size);
            self.current_cell_number += 1;
            Some(CellCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a Grid {
    type Item = CellCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
