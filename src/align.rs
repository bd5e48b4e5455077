//! Global alignments of two sequences: LCS, Levenshtein, character-by-character.
//!
//! Every function here returns an `Alignment` whose `first`, `second` and
//! `codes` vectors have the same length and read left to right.

use crate::models::{AlignCode, AlignError, Alignment, LevenshteinResult, Token};
use crate::table::{
    build_edit_table, build_lcs_table, check_table_size, Direction, DirectionTable,
    DEFAULT_MAX_CELLS,
};

/// One move of the LCS backtrack walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Consume a unit of A only
    Up,
    /// Consume a unit of B only
    Left,
    /// Consume one unit of each, counted as a match
    DiagonalMatch,
    /// Consume one unit of each without credit
    DiagonalTie,
}

impl Move {
    /// Cell reached from (i, j) by this move.
    #[inline(always)]
    pub fn apply(self, i: usize, j: usize) -> (usize, usize) {
        match self {
            Move::Up => (i - 1, j),
            Move::Left => (i, j - 1),
            Move::DiagonalMatch | Move::DiagonalTie => (i - 1, j - 1),
        }
    }
}

/// Decide the move out of cell (i, j).
///
/// On a boundary (exactly one of i, j is zero) the only legal move is forced
/// regardless of table content. Returns `None` at the origin.
#[inline(always)]
pub fn next_move(directions: &DirectionTable, i: usize, j: usize) -> Option<Move> {
    match (i, j) {
        (0, 0) => None,
        (_, 0) => Some(Move::Up),
        (0, _) => Some(Move::Left),
        _ => Some(match directions.get(i, j) {
            Direction::Up => Move::Up,
            Direction::Left => Move::Left,
            Direction::DiagonalMatch => Move::DiagonalMatch,
            // Inner cells are always filled, so None never occurs here.
            Direction::DiagonalTie | Direction::None => Move::DiagonalTie,
        }),
    }
}

/// Walk a filled backtrack table from (start_i, start_j) to the origin.
///
/// Runs iteratively with an accumulator so long inputs cannot exhaust the
/// stack. The walk produces positions back to front; the result is reversed
/// before returning.
pub fn backtrack<T: Token>(
    directions: &DirectionTable,
    a: &[T],
    b: &[T],
    start_i: usize,
    start_j: usize,
) -> Alignment<T> {
    let mut alignment = Alignment::with_capacity(start_i + start_j);
    let mut i = start_i;
    let mut j = start_j;

    while let Some(step) = next_move(directions, i, j) {
        match step {
            Move::Up => {
                alignment.push(Some(a[i - 1].clone()), None, AlignCode::GapInSecond);
            }
            Move::Left => {
                alignment.push(None, Some(b[j - 1].clone()), AlignCode::GapInFirst);
            }
            Move::DiagonalMatch => {
                let unit = a[i - 1].clone();
                alignment.push(Some(unit.clone()), Some(unit), AlignCode::Match);
            }
            Move::DiagonalTie => {
                alignment.push(
                    Some(a[i - 1].clone()),
                    Some(b[j - 1].clone()),
                    AlignCode::Mismatch,
                );
            }
        }
        (i, j) = step.apply(i, j);
    }

    alignment.reverse();
    alignment
}

/// Longest common subsequence alignment.
///
/// The LCS itself is `alignment.common_units()`.
pub fn compute_lcs<T: Token>(a: &[T], b: &[T]) -> Result<Alignment<T>, AlignError> {
    compute_lcs_with_limit(a, b, DEFAULT_MAX_CELLS)
}

/// LCS alignment with an explicit table-size ceiling.
pub fn compute_lcs_with_limit<T: Token>(
    a: &[T],
    b: &[T],
    max_cells: usize,
) -> Result<Alignment<T>, AlignError> {
    check_table_size(a.len(), b.len(), max_cells)?;
    let table = build_lcs_table(a, b);
    Ok(backtrack(&table.directions, a, b, a.len(), b.len()))
}

/// Levenshtein distance plus an edit alignment.
pub fn compute_levenshtein<T: Token>(a: &[T], b: &[T]) -> Result<LevenshteinResult<T>, AlignError> {
    compute_levenshtein_with_limit(a, b, DEFAULT_MAX_CELLS)
}

/// Levenshtein distance with an explicit table-size ceiling.
///
/// No direction table is stored; the walk re-derives each move from the
/// scores, preferring an exact match, then substitution, then deletion, then
/// insertion.
pub fn compute_levenshtein_with_limit<T: Token>(
    a: &[T],
    b: &[T],
    max_cells: usize,
) -> Result<LevenshteinResult<T>, AlignError> {
    check_table_size(a.len(), b.len(), max_cells)?;
    let m = a.len();
    let n = b.len();
    let dp = build_edit_table(a, b);

    let mut alignment = Alignment::with_capacity(m + n);
    let mut i = m;
    let mut j = n;

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            alignment.push(Some(a[i - 1].clone()), Some(b[j - 1].clone()), AlignCode::Match);
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && dp.get(i, j) == dp.get(i - 1, j - 1) + 1 {
            alignment.push(Some(a[i - 1].clone()), Some(b[j - 1].clone()), AlignCode::Mismatch);
            i -= 1;
            j -= 1;
        } else if i > 0 && (j == 0 || dp.get(i, j) == dp.get(i - 1, j) + 1) {
            alignment.push(Some(a[i - 1].clone()), None, AlignCode::GapInSecond);
            i -= 1;
        } else {
            alignment.push(None, Some(b[j - 1].clone()), AlignCode::GapInFirst);
            j -= 1;
        }
    }
    alignment.reverse();

    let distance = dp.get(m, n) as usize;
    let similarity = edit_similarity(distance, m, n);

    Ok(LevenshteinResult {
        alignment,
        distance,
        similarity,
    })
}

/// `(1 - distance / max(m, n)) * 100`, or 100 when both inputs are empty.
#[inline]
pub fn edit_similarity(distance: usize, m: usize, n: usize) -> f64 {
    let longest = m.max(n);
    if longest == 0 {
        return 100.0;
    }
    (1.0 - distance as f64 / longest as f64) * 100.0
}

/// Position-by-position comparison tolerating different lengths.
///
/// Positions past the end of the shorter input are gaps, never a placeholder
/// unit that could compare equal to real content.
pub fn compute_char_by_char<T: Token>(a: &[T], b: &[T]) -> Alignment<T> {
    let len = a.len().max(b.len());
    let mut alignment = Alignment::with_capacity(len);

    for k in 0..len {
        match (a.get(k), b.get(k)) {
            (Some(x), Some(y)) if x == y => {
                alignment.push(Some(x.clone()), Some(y.clone()), AlignCode::Match)
            }
            (Some(x), Some(y)) => {
                alignment.push(Some(x.clone()), Some(y.clone()), AlignCode::Mismatch)
            }
            (Some(x), None) => alignment.push(Some(x.clone()), None, AlignCode::GapInSecond),
            (None, Some(y)) => alignment.push(None, Some(y.clone()), AlignCode::GapInFirst),
            (None, None) => break,
        }
    }

    alignment
}

/// Comparison string: each matching unit, or `X` where the inputs differ.
pub fn comparison_units<T: Token>(alignment: &Alignment<T>) -> Vec<String> {
    alignment
        .first
        .iter()
        .zip(&alignment.codes)
        .map(|(unit, &code)| match (unit, code) {
            (Some(u), AlignCode::Match) => u.to_string(),
            _ => "X".to_string(),
        })
        .collect()
}
