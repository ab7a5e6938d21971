/// Side length of a square grid, counted in cells.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct GridSize(pub usize);

impl Default for GridSize {
    fn default() -> GridSize {
        GridSize(10)
    }
}
