//! Bingo board and drawn-number set
//!
//! Numbers live in `1..=NUMBER_MAX`. The board is a row-major 5x5 grid of
//! distinct numbers; the drawn set is a bitset over the same range.

use std::fmt;

use rand::Rng;

/// Side length of the board
pub const BOARD_SIZE: usize = 5;
/// Cells on the board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
/// Highest number that can be drawn (lowest is 1)
pub const NUMBER_MAX: u8 = 70;

/// A 5x5 bingo board, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [u8; CELL_COUNT],
}

impl Board {
    /// Sample 25 distinct numbers uniformly from `1..=NUMBER_MAX`
    ///
    /// Each cell takes a random entry out of the remaining candidate pool, so
    /// uniqueness holds by construction.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pool: Vec<u8> = (1..=NUMBER_MAX).collect();
        let mut cells = [0u8; CELL_COUNT];
        for cell in &mut cells {
            let index = rng.random_range(0..pool.len());
            *cell = pool.swap_remove(index);
        }
        Self { cells }
    }

    /// Build a board from explicit cells
    ///
    /// Returns `None` unless all 25 values are distinct and in range.
    pub fn from_cells(cells: [u8; CELL_COUNT]) -> Option<Self> {
        let mut seen = DrawnSet::new();
        for &n in &cells {
            if !seen.insert(n) {
                return None;
            }
        }
        Some(Self { cells })
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> u8 {
        self.cells[row * BOARD_SIZE + col]
    }

    pub fn cells(&self) -> &[u8; CELL_COUNT] {
        &self.cells
    }

    pub fn contains(&self, number: u8) -> bool {
        self.cells.contains(&number)
    }

    /// Row-major index of a number, if it is on the board
    pub fn position(&self, number: u8) -> Option<usize> {
        self.cells.iter().position(|&n| n == number)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(BOARD_SIZE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|n| format!("{:>2}", n)).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Set of drawn numbers (bit `n` set means `n` was drawn)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawnSet {
    bits: u128,
}

impl DrawnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a number; returns false if it was already present or out of range
    pub fn insert(&mut self, number: u8) -> bool {
        if !(1..=NUMBER_MAX).contains(&number) || self.contains(number) {
            return false;
        }
        self.bits |= 1u128 << number;
        true
    }

    #[inline]
    pub fn contains(&self, number: u8) -> bool {
        number <= NUMBER_MAX && self.bits & (1u128 << number) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Drawn numbers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=NUMBER_MAX).filter(|&n| self.contains(n))
    }

    /// Numbers in range that are not in the set
    pub fn remaining(&self) -> Vec<u8> {
        (1..=NUMBER_MAX).filter(|&n| !self.contains(n)).collect()
    }
}

impl FromIterator<u8> for DrawnSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = DrawnSet::new();
        for n in iter {
            set.insert(n);
        }
        set
    }
}
