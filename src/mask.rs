//! Playability mask over the square grid.
//!
//! A mask marks which cells of the N×N board are legally playable for one
//! game instance. It is produced once by an archetype generator at reset and
//! never mutated afterwards; the next reset replaces it wholesale.

/// The 4 undirected line directions, in tie-break order: horizontal,
/// vertical, diagonal down-right, diagonal down-left.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Number of aligned marks required to win.
pub const LINE_SIZE: usize = 4;

/// Steps `dist` cells from `(row, col)` along `dir`, returning `None` when
/// the destination falls outside the `size`×`size` board.
pub(crate) fn step(
    size: usize,
    row: usize,
    col: usize,
    (dr, dc): (isize, isize),
    dist: usize,
) -> Option<(usize, usize)> {
    let r = row as isize + dr * dist as isize;
    let c = col as isize + dc * dist as isize;
    if r < 0 || c < 0 || r >= size as isize || c >= size as isize {
        None
    } else {
        Some((r as usize, c as usize))
    }
}

/// Boolean playability grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    size: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Creates an all-void mask.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Creates a fully playable mask.
    pub fn filled(size: usize) -> Self {
        Self {
            size,
            cells: vec![true; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true when `(row, col)` is in bounds and playable.
    pub fn is_playable(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, playable: bool) {
        self.cells[row * self.size + col] = playable;
    }

    /// Counts potential four-in-a-row lines the mask admits.
    ///
    /// For every playable cell and each of the 4 positive directions, the
    /// line counts when the 3 further cells are all in-bounds and playable.
    /// Marks on the grid are ignored; this is pure topology. The count is
    /// both the acceptance oracle for procedural generation and the
    /// "paths validated" statistic surfaced in snapshots.
    pub fn count_potential_paths(&self) -> usize {
        let mut paths = 0;
        for row in 0..self.size {
            for col in 0..self.size {
                if !self.is_playable(row, col) {
                    continue;
                }
                for dir in DIRECTIONS {
                    let open = (1..LINE_SIZE).all(|i| {
                        step(self.size, row, col, dir, i)
                            .is_some_and(|(r, c)| self.is_playable(r, c))
                    });
                    if open {
                        paths += 1;
                    }
                }
            }
        }
        paths
    }
}
