use crate::{Grid, Pos};

fn axis_adjacent(a: i32, b: i32, len: i32) -> bool {
    let d = (a - b).abs();
    d <= 1 || d == len - 1
}

/// Toroidal adjacency between two cells of a `width` x `height` board: the
/// cells are distinct and, on each axis, within distance 1 counting the wrap
/// between coordinate 0 and the far edge.
///
/// On boards narrower than 3 the wrap neighbor and the direct neighbor can be
/// the same index; the predicate is over indices, so such a neighbor counts
/// once.
pub fn adjacent(a: Pos, b: Pos, width: usize, height: usize) -> bool {
    a != b && axis_adjacent(a.x, b.x, width as i32) && axis_adjacent(a.y, b.y, height as i32)
}

impl Grid {
    /// Counts live cells adjacent to `index` by scanning every other index
    /// against the adjacency predicate.
    pub fn neighbor_count(&self, index: usize) -> usize {
        let pos = self.pos_of(index);
        (0..self.len())
            .filter(|&other| adjacent(pos, self.pos_of(other), self.width(), self.height()))
            .filter(|&other| self.get(other).is_active())
            .count()
    }
}

#[cfg(test)]
use crate::{pos, Cell};

#[test]
fn test_adjacent_is_symmetric() {
    let grid = Grid::new(4, 3);
    for a in 0..grid.len() {
        for b in 0..grid.len() {
            assert_eq!(
                adjacent(grid.pos_of(a), grid.pos_of(b), 4, 3),
                adjacent(grid.pos_of(b), grid.pos_of(a), 4, 3),
            );
        }
    }
}

#[test]
fn test_never_adjacent_to_self() {
    let grid = Grid::new(4, 3);
    for index in 0..grid.len() {
        assert!(!adjacent(grid.pos_of(index), grid.pos_of(index), 4, 3));
    }
}

#[test]
fn test_corners_wrap() {
    assert!(adjacent(pos!(0, 0), pos!(4, 4), 5, 5));
    assert!(adjacent(pos!(0, 2), pos!(4, 2), 5, 5));
    assert!(adjacent(pos!(2, 0), pos!(2, 4), 5, 5));
    assert!(!adjacent(pos!(0, 0), pos!(3, 3), 5, 5));
}

#[cfg(test)]
fn saturated(width: usize, height: usize) -> Grid {
    let mut grid = Grid::new(width, height);
    for index in 0..grid.len() {
        grid.set(index, Cell::active());
    }
    grid
}

#[test]
fn test_three_by_three_torus_is_fully_connected() {
    let grid = saturated(3, 3);
    for index in 0..grid.len() {
        assert_eq!(grid.neighbor_count(index), 8);
    }
}

#[test]
fn test_narrow_boards_count_coinciding_neighbors_once() {
    // on a single column, only the two vertical neighbors remain
    let column = saturated(1, 5);
    for index in 0..column.len() {
        assert_eq!(column.neighbor_count(index), 2);
    }

    // on a 2x2 board every cell touches the three others, each once
    let square = saturated(2, 2);
    for index in 0..square.len() {
        assert_eq!(square.neighbor_count(index), 3);
    }
}
