use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellCoordinate {
    pub x: u32,
    pub y: u32,
}

impl CellCoordinate {
    pub fn new(x: u32, y: u32) -> CellCoordinate {
        CellCoordinate { x, y }
    }
}

impl From<(u32, u32)> for CellCoordinate {
    fn from(x_y_pair: (u32, u32)) -> CellCoordinate {
        CellCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub type CoordinateSmallVec = SmallVec<[CellCoordinate; 4]>;

/// The four sides of a cell.
///
/// `Up` faces `y + 1`, `Down` faces `y - 1`, `Left` faces `x + 1` and `Right` faces `x - 1`.
/// The horizontal pair reads mirrored compared to a screen where x grows to the right: the maze is
/// seen from the other side, so x grows to the left.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which neighbouring cells are listed by every grid query.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Right, Direction::Left];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        }
    }
}

/// Creates a new coordinate offset 1 cell away in the given direction.
/// Returns None if the coordinate would fall outside a grid with `dimension` cells per side.
pub fn offset_coordinate(coord: CellCoordinate,
                         dir: Direction,
                         dimension: usize)
                         -> Option<CellCoordinate> {
    let (x, y) = (coord.x as usize, coord.y as usize);
    if x >= dimension || y >= dimension {
        return None;
    }

    match dir {
        Direction::Up => {
            if y + 1 < dimension {
                Some(CellCoordinate { y: coord.y + 1, ..coord })
            } else {
                None
            }
        }
        Direction::Down => {
            if y > 0 {
                Some(CellCoordinate { y: coord.y - 1, ..coord })
            } else {
                None
            }
        }
        Direction::Left => {
            if x + 1 < dimension {
                Some(CellCoordinate { x: coord.x + 1, ..coord })
            } else {
                None
            }
        }
        Direction::Right => {
            if x > 0 {
                Some(CellCoordinate { x: coord.x - 1, ..coord })
            } else {
                None
            }
        }
    }
}

/// Entry and exit are exclusive of one another and of the neutral state.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Marker {
    Neutral,
    Entry,
    Exit,
}

impl Default for Marker {
    fn default() -> Marker {
        Marker::Neutral
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Walls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for Walls {
    fn default() -> Walls {
        Walls {
            up: true,
            down: true,
            left: true,
            right: true,
        }
    }
}

impl Walls {
    #[inline]
    pub fn is_raised(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn raised_count(&self) -> usize {
        Direction::ALL.iter().filter(|dir| self.is_raised(**dir)).count()
    }

    fn break_wall(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.up = false,
            Direction::Down => self.down = false,
            Direction::Left => self.left = false,
            Direction::Right => self.right = false,
        }
    }
}

/// One position on the grid.
///
/// Cells are only mutated through the `Grid` that owns them, which keeps shared walls consistent
/// on both sides of a boundary.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Cell {
    coordinate: CellCoordinate,
    walls: Walls,
    visited: bool,
    direction: Option<Direction>,
    marker: Marker,
}

impl Cell {
    pub fn new(coordinate: CellCoordinate) -> Cell {
        Cell {
            coordinate,
            walls: Walls::default(),
            visited: false,
            direction: None,
            marker: Marker::Neutral,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> CellCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn walls(&self) -> Walls {
        self.walls
    }

    #[inline]
    pub fn is_wall_raised(&self, dir: Direction) -> bool {
        self.walls.is_raised(dir)
    }

    #[inline]
    pub fn visited(&self) -> bool {
        self.visited
    }

    /// The way to the next cell of a resolved route, unset off the route and on the exit.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    #[inline]
    pub fn marker(&self) -> Marker {
        self.marker
    }

    pub(crate) fn break_wall(&mut self, dir: Direction) {
        self.walls.break_wall(dir);
    }

    pub(crate) fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    pub(crate) fn set_direction(&mut self, direction: Option<Direction>) {
        self.direction = direction;
    }

    pub(crate) fn set_marker(&mut self, marker: Marker) {
        self.marker = marker;
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn new_cell_has_all_walls_raised() {
        let cell = Cell::new(CellCoordinate::new(3, 4));
        assert_eq!(cell.coordinate(), CellCoordinate::new(3, 4));
        assert_eq!(cell.walls().raised_count(), 4);
        for dir in Direction::ALL.iter() {
            assert!(cell.is_wall_raised(*dir));
        }
        assert!(!cell.visited());
        assert_eq!(cell.direction(), None);
        assert_eq!(cell.marker(), Marker::Neutral);
    }

    #[test]
    fn breaking_one_wall_leaves_the_others() {
        let mut cell = Cell::new(CellCoordinate::new(0, 0));
        cell.break_wall(Direction::Left);
        assert!(!cell.is_wall_raised(Direction::Left));
        assert!(cell.is_wall_raised(Direction::Right));
        assert!(cell.is_wall_raised(Direction::Up));
        assert!(cell.is_wall_raised(Direction::Down));
        assert_eq!(cell.walls().raised_count(), 3);
    }

    #[test]
    fn opposites() {
        for dir in Direction::ALL.iter() {
            assert_ne!(dir.opposite(), *dir);
            assert_eq!(dir.opposite().opposite(), *dir);
        }
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
    }

    #[test]
    fn offsets_within_bounds() {
        let gc = |x, y| CellCoordinate::new(x, y);
        let check_offset = |coord, dir, expected| {
            assert_eq!(offset_coordinate(coord, dir, 2), expected);
        };
        check_offset(gc(0, 0), Direction::Up, Some(gc(0, 1)));
        check_offset(gc(0, 0), Direction::Down, None);
        check_offset(gc(0, 0), Direction::Left, Some(gc(1, 0)));
        check_offset(gc(0, 0), Direction::Right, None);

        check_offset(gc(1, 1), Direction::Up, None);
        check_offset(gc(1, 1), Direction::Down, Some(gc(1, 0)));
        check_offset(gc(1, 1), Direction::Left, None);
        check_offset(gc(1, 1), Direction::Right, Some(gc(0, 1)));

        // Already outside the grid
        check_offset(gc(5, 0), Direction::Right, None);
    }

    #[test]
    fn coordinate_display() {
        assert_eq!(format!("{}", CellCoordinate::from((2, 7))), "(2, 7)");
    }
}
