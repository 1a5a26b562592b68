use crate::{pos, Pos};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    active: bool,
}

impl Cell {
    pub fn active() -> Self {
        Self { active: true }
    }

    pub fn inactive() -> Self {
        Self { active: false }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggled(&self) -> Self {
        Self {
            active: !self.active,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell { active: false }
    }
}

/// A dense rectangular board of cells, stored row-major (index = y * width + x).
///
/// Cells outside `0..width * height` do not exist; the board wraps toroidally
/// instead, see [`torus::adjacent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-dead board of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        let cells = vec![Cell::inactive(); width * height];
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn pos_of(&self, index: usize) -> Pos {
        let x = (index % self.width) as i32;
        let y = (index / self.width) as i32;
        pos!(x, y)
    }

    pub fn index_of(&self, pos: Pos) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }

    pub fn get(&self, index: usize) -> Cell {
        self.cells[index].clone()
    }

    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Flips one cell between dead and alive. Out-of-range indices are
    /// ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = cell.toggled();
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

pub use torus::adjacent;
mod torus;

#[test]
fn test_toggle_flips_exactly_one_cell() {
    let mut grid = Grid::new(4, 3);
    grid.toggle(5);
    for index in 0..grid.len() {
        assert_eq!(grid.get(index).is_active(), index == 5);
    }
    grid.toggle(5);
    assert_eq!(grid, Grid::new(4, 3));
}

#[test]
fn test_toggle_out_of_range_is_noop() {
    let mut grid = Grid::new(4, 3);
    grid.toggle(12);
    grid.toggle(usize::MAX);
    assert_eq!(grid, Grid::new(4, 3));
}

#[test]
fn test_pos_index_roundtrip() {
    let grid = Grid::new(5, 4);
    for index in 0..grid.len() {
        assert_eq!(grid.index_of(grid.pos_of(index)), index);
    }
    assert_eq!(grid.pos_of(7), pos!(2, 1));
}
