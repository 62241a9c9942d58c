//! Board state: a mark grid layered over a playability mask.
//!
//! The grid stores one optional mark per cell in row-major order, the way a
//! flat board buffer keeps indexing cheap. Cells outside the mask can never
//! hold a mark; the controller validates every placement before it reaches
//! [`Board::place`].

use std::fmt;

use crate::mask::{step, Mask, DIRECTIONS, LINE_SIZE};

/// One of the two players.
///
/// `Blue` always opens; `Red` is driven by the heuristic opponent when the
/// AI is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Blue,
    Red,
}

impl Player {
    /// The opposing player.
    pub fn other(self) -> Player {
        match self {
            Player::Blue => Player::Red,
            Player::Red => Player::Blue,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Blue => write!(f, "Blue"),
            Player::Red => write!(f, "Red"),
        }
    }
}

/// The exact four coordinates of a completed run, in discovery order.
pub type WinningLine = [(usize, usize); 4];

/// Mark grid over an immutable playability mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    mask: Mask,
    grid: Vec<Option<Player>>,
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size() {
            for col in 0..self.size() {
                let symbol = match self.cell(row, col) {
                    Some(Player::Blue) => "X",
                    Some(Player::Red) => "O",
                    None if self.mask.is_playable(row, col) => ".",
                    None => " ",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Board {
    /// Board dimension of the reference instance.
    pub const DEFAULT_SIZE: usize = 12;

    /// Creates an empty board over the given mask.
    pub fn new(mask: Mask) -> Self {
        let cells = mask.size() * mask.size();
        Self {
            mask,
            grid: vec![None; cells],
        }
    }

    pub fn size(&self) -> usize {
        self.mask.size()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// The mark at `(row, col)`, if any. Out-of-bounds reads are `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        if row < self.size() && col < self.size() {
            self.grid[row * self.size() + col]
        } else {
            None
        }
    }

    /// True when `(row, col)` is playable and unoccupied.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.mask.is_playable(row, col) && self.cell(row, col).is_none()
    }

    /// True while at least one playable cell remains unoccupied.
    pub fn has_open_cell(&self) -> bool {
        (0..self.size()).any(|row| (0..self.size()).any(|col| self.is_open(row, col)))
    }

    /// Raw grid cells in row-major order, for snapshots.
    pub fn cells(&self) -> &[Option<Player>] {
        &self.grid
    }

    pub(crate) fn place(&mut self, row: usize, col: usize, player: Player) {
        debug_assert!(self.is_open(row, col), "placement must be validated first");
        let size = self.size();
        self.grid[row * size + col] = Some(player);
    }

    /// Checks whether the mark just placed at `(row, col)` completes a run
    /// of four, returning the exact four coordinates when it does.
    ///
    /// Each direction is scanned in the fixed [`DIRECTIONS`] order, which
    /// establishes the tie-break when several lines complete at once: the
    /// run grows forward up to 3 steps, then backward up to 3 steps, and
    /// the first direction reaching four reports its first four
    /// coordinates in that discovery order.
    pub fn check_win(&self, row: usize, col: usize, player: Player) -> Option<WinningLine> {
        let size = self.size();
        for (dr, dc) in DIRECTIONS {
            let mut line = vec![(row, col)];
            for i in 1..LINE_SIZE {
                match step(size, row, col, (dr, dc), i) {
                    Some((r, c)) if self.cell(r, c) == Some(player) => line.push((r, c)),
                    _ => break,
                }
            }
            for i in 1..LINE_SIZE {
                match step(size, row, col, (-dr, -dc), i) {
                    Some((r, c)) if self.cell(r, c) == Some(player) => line.push((r, c)),
                    _ => break,
                }
            }
            if line.len() >= LINE_SIZE {
                return Some([line[0], line[1], line[2], line[3]]);
            }
        }
        None
    }
}
