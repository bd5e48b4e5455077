//! Dynamic-programming tables for the alignment algorithms.
//!
//! Tables are stored as flat row-major vectors of (m+1) x (n+1) cells, where
//! row 0 and column 0 hold the boundary values.

use serde::{Deserialize, Serialize};

use crate::models::AlignError;

/// Default ceiling on (m+1)*(n+1) for a single DP table.
pub const DEFAULT_MAX_CELLS: usize = 100_000_000;

/// Default ceiling on m*n for the step recorder, which keeps one full table
/// snapshot per step.
pub const DEFAULT_MAX_STEP_CELLS: usize = 2_500;

/// Backtrack direction recorded for an LCS cell.
///
/// Discriminants match the integer codes used when a table is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Direction {
    /// Boundary cell, never consulted
    #[default]
    None = 0,
    /// Score came from the cell above
    Up = 1,
    /// Score came from the cell to the left
    Left = 2,
    /// Diagonal predecessor + 1 on a match
    DiagonalMatch = 3,
    /// Same score as the diagonal predecessor
    DiagonalTie = 4,
}

impl Direction {
    /// Display glyph pointing at the predecessor cell.
    pub fn arrow(self) -> char {
        match self {
            Direction::None => ' ',
            Direction::Up => '↑',
            Direction::Left => '←',
            Direction::DiagonalMatch => '↖',
            Direction::DiagonalTie => '⇖',
        }
    }
}

/// A dense (rows x cols) grid of copyable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<V> {
    rows: usize,
    cols: usize,
    cells: Vec<V>,
}

impl<V: Copy + Default> Grid<V> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![V::default(); rows * cols],
        }
    }
}

impl<V: Copy> Grid<V> {
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> V {
        self.cells[i * self.cols + j]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: V) {
        self.cells[i * self.cols + j] = value;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow one row.
    pub fn row(&self, i: usize) -> &[V] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    /// Nested-vector view, row by row.
    pub fn to_rows(&self) -> Vec<Vec<V>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }
}

pub type ScoreTable = Grid<u32>;
pub type DirectionTable = Grid<Direction>;

/// Score and backtrack tables produced by the LCS fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcsTable {
    pub scores: ScoreTable,
    pub directions: DirectionTable,
}

impl LcsTable {
    /// Zero-filled tables for sequences of length m and n.
    pub fn new(m: usize, n: usize) -> Self {
        Self {
            scores: Grid::new(m + 1, n + 1),
            directions: Grid::new(m + 1, n + 1),
        }
    }

    /// Score of the bottom-right cell: the LCS length.
    pub fn final_score(&self) -> u32 {
        self.scores.get(self.scores.rows() - 1, self.scores.cols() - 1)
    }
}

/// Fail with `ResourceExhaustion` if an (m+1) x (n+1) table exceeds `max_cells`.
pub fn check_table_size(m: usize, n: usize, max_cells: usize) -> Result<usize, AlignError> {
    let cells = m
        .checked_add(1)
        .zip(n.checked_add(1))
        .and_then(|(rows, cols)| rows.checked_mul(cols))
        .unwrap_or(usize::MAX);
    if cells > max_cells {
        return Err(AlignError::ResourceExhaustion {
            cells,
            limit: max_cells,
        });
    }
    Ok(cells)
}

/// Choose the backtrack direction for a filled cell.
///
/// Order matters: a tie with the diagonal predecessor wins over up, up over
/// left, and only then is the cell credited as a diagonal match.
#[inline(always)]
pub fn choose_direction(value: u32, top: u32, left: u32, diagonal: u32) -> Direction {
    if value == diagonal {
        Direction::DiagonalTie
    } else if value == top {
        Direction::Up
    } else if value == left {
        Direction::Left
    } else {
        Direction::DiagonalMatch
    }
}

/// Fill cell (i, j) of an LCS table, returning (top, left, diagonal + match).
#[inline(always)]
pub fn fill_lcs_cell(table: &mut LcsTable, i: usize, j: usize, is_match: bool) -> (u32, u32, u32) {
    let top = table.scores.get(i - 1, j);
    let left = table.scores.get(i, j - 1);
    let diagonal = table.scores.get(i - 1, j - 1);
    let from_diagonal = diagonal + u32::from(is_match);

    let value = top.max(left).max(from_diagonal);
    table.scores.set(i, j, value);
    table
        .directions
        .set(i, j, choose_direction(value, top, left, diagonal));

    (top, left, from_diagonal)
}

/// Build the LCS score and backtrack tables.
pub fn build_lcs_table<T: PartialEq>(a: &[T], b: &[T]) -> LcsTable {
    let m = a.len();
    let n = b.len();
    let mut table = LcsTable::new(m, n);

    for i in 1..=m {
        let unit_a = &a[i - 1];
        for j in 1..=n {
            fill_lcs_cell(&mut table, i, j, *unit_a == b[j - 1]);
        }
    }

    table
}

/// Build the Levenshtein distance table (boundaries i and j).
pub fn build_edit_table<T: PartialEq>(a: &[T], b: &[T]) -> ScoreTable {
    let m = a.len();
    let n = b.len();
    let mut dp: ScoreTable = Grid::new(m + 1, n + 1);

    for i in 0..=m {
        dp.set(i, 0, i as u32);
    }
    for j in 0..=n {
        dp.set(0, j, j as u32);
    }

    for i in 1..=m {
        for j in 1..=n {
            let value = if a[i - 1] == b[j - 1] {
                dp.get(i - 1, j - 1)
            } else {
                1 + dp
                    .get(i - 1, j) // deletion
                    .min(dp.get(i, j - 1)) // insertion
                    .min(dp.get(i - 1, j - 1)) // substitution
            };
            dp.set(i, j, value);
        }
    }

    dp
}
