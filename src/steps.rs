//! Instrumented LCS that records one snapshot per computation step.
//!
//! The fill phase emits an `init` step, one `compute` step per cell in
//! row-major order (i outer, j inner, both from 1) and a `complete` step. The
//! backtrack phase emits `backtrack-start`, one `backtrack` step per move from
//! (m, n) toward the origin, and `backtrack-complete`.
//!
//! Each step owns a full copy of the tables as they stood at that instant, so
//! later writes never alter an earlier step.

use crate::align::{backtrack, next_move, Move};
use crate::models::{
    render_units, AlignError, Cell, FillCandidates, Step, StepKind, StepTrace, Token,
};
use crate::table::{fill_lcs_cell, LcsTable, DEFAULT_MAX_STEP_CELLS};

/// Record the LCS fill and backtrack of `a` against `b`.
pub fn compute_lcs_with_steps<T: Token>(a: &[T], b: &[T]) -> Result<StepTrace<T>, AlignError> {
    compute_lcs_with_steps_with_limit(a, b, DEFAULT_MAX_STEP_CELLS)
}

/// Step recording with an explicit ceiling on m*n.
pub fn compute_lcs_with_steps_with_limit<T: Token>(
    a: &[T],
    b: &[T],
    max_step_cells: usize,
) -> Result<StepTrace<T>, AlignError> {
    let cells = a.len().checked_mul(b.len()).unwrap_or(usize::MAX);
    if cells > max_step_cells {
        return Err(AlignError::ResourceExhaustion {
            cells,
            limit: max_step_cells,
        });
    }

    let (fill_steps, table) = record_fill(a, b);
    let backtrack_steps = record_backtrack(&table, a, b);
    let final_alignment = backtrack(&table.directions, a, b, a.len(), b.len());

    Ok(StepTrace {
        fill_steps,
        backtrack_steps,
        final_score: table.final_score(),
        final_alignment,
    })
}

fn blank_step<T>(kind: StepKind, cell: Cell, table: &LcsTable, explanation: String) -> Step<T> {
    Step {
        kind,
        cell,
        units: None,
        candidates: None,
        next: None,
        matched: None,
        path: Vec::new(),
        lcs_units: Vec::new(),
        table: table.clone(),
        explanation,
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fill the table cell by cell, snapshotting after every write.
fn record_fill<T: Token>(a: &[T], b: &[T]) -> (Vec<Step<T>>, LcsTable) {
    let m = a.len();
    let n = b.len();
    let mut table = LcsTable::new(m, n);
    let mut steps = Vec::with_capacity(m * n + 2);
    let units = capitalized(T::UNIT_NAME);

    steps.push(blank_step(
        StepKind::Init,
        Cell::new(0, 0),
        &table,
        "Initialize DP table with zeros. The table has dimensions (m+1) × (n+1) where m and n \
         are the lengths of the two strings."
            .to_string(),
    ));

    for i in 1..=m {
        for j in 1..=n {
            let unit_a = &a[i - 1];
            let unit_b = &b[j - 1];
            let is_match = unit_a == unit_b;
            let (from_top, from_left, from_diagonal) = fill_lcs_cell(&mut table, i, j, is_match);
            let value = table.scores.get(i, j);

            let mut explanation = format!(
                "Computing cell [{},{}] for {}s '{}' (String 1) and '{}' (String 2).\n",
                i,
                j,
                T::UNIT_NAME,
                unit_a,
                unit_b
            );
            if is_match {
                explanation.push_str(&format!(
                    "✓ {}s MATCH! Take diagonal value + 1: {}\n",
                    units, from_diagonal
                ));
            } else {
                explanation.push_str(&format!("✗ {}s DON'T match.\n", units));
                explanation.push_str(&format!("  - From top [{},{}]: {}\n", i - 1, j, from_top));
                explanation.push_str(&format!("  - From left [{},{}]: {}\n", i, j - 1, from_left));
                explanation.push_str(&format!(
                    "  - From diagonal [{},{}]: {}\n",
                    i - 1,
                    j - 1,
                    from_diagonal
                ));
            }
            explanation.push_str(&format!(
                "Result: max({}, {}, {}) = {}",
                from_top, from_left, from_diagonal, value
            ));

            let mut step: Step<T> = blank_step(StepKind::Compute, Cell::new(i, j), &table, explanation);
            step.units = Some((unit_a.clone(), unit_b.clone()));
            step.candidates = Some(FillCandidates {
                from_top,
                from_left,
                from_diagonal,
                is_match,
                value,
            });
            steps.push(step);
        }
    }

    steps.push(blank_step(
        StepKind::Complete,
        Cell::new(m, n),
        &table,
        format!(
            "DP table filling complete! The LCS length is {} (bottom-right cell). Now we can \
             backtrack to find the actual subsequence.",
            table.final_score()
        ),
    ));

    (steps, table)
}

/// Walk the filled table from (m, n), snapshotting after every move.
fn record_backtrack<T: Token>(table: &LcsTable, a: &[T], b: &[T]) -> Vec<Step<T>> {
    let mut i = a.len();
    let mut j = b.len();
    let mut path: Vec<Cell> = Vec::with_capacity(i + j + 1);
    let mut lcs_units: Vec<T> = Vec::new();
    let mut steps = Vec::with_capacity(i + j + 2);

    steps.push(blank_step(
        StepKind::BacktrackStart,
        Cell::new(i, j),
        table,
        format!(
            "Starting backtracking from cell [{},{}] (value: {}). The DP table is fully \
             populated. Now we'll trace back through it to find which {}s form the LCS.",
            i,
            j,
            table.scores.get(i, j),
            T::UNIT_NAME
        ),
    ));

    while let Some(step_move) = next_move(&table.directions, i, j) {
        let here = Cell::new(i, j);
        path.push(here);

        let (next_i, next_j) = step_move.apply(i, j);
        let mut matched = None;
        let mut explanation = format!("At cell {} (value: {}). ", here, table.scores.get(i, j));

        if j == 0 {
            explanation.push_str(&format!("On column boundary - move up to [{},{}].", next_i, next_j));
        } else if i == 0 {
            explanation.push_str(&format!(
                "On row boundary - move left to [{},{}].",
                next_i, next_j
            ));
        } else {
            match step_move {
                Move::Up => explanation.push_str(&format!(
                    "Value came from above. Move UP to [{},{}].",
                    next_i, next_j
                )),
                Move::Left => explanation.push_str(&format!(
                    "Value came from left. Move LEFT to [{},{}].",
                    next_i, next_j
                )),
                Move::DiagonalMatch => {
                    let unit = a[i - 1].clone();
                    lcs_units.insert(0, unit.clone());
                    explanation.push_str(&format!(
                        "✓ MATCH! {} '{}' is part of the LCS! Move diagonally to [{},{}].\n\
                         LCS so far (reading backwards): {}",
                        capitalized(T::UNIT_NAME),
                        unit,
                        next_i,
                        next_j,
                        render_units(lcs_units.iter().map(Some))
                    ));
                    matched = Some(unit);
                }
                Move::DiagonalTie => explanation.push_str(&format!(
                    "{}s don't match (value same as diagonal). Move diagonally to [{},{}].",
                    capitalized(T::UNIT_NAME),
                    next_i,
                    next_j
                )),
            }
        }

        let mut step: Step<T> = blank_step(StepKind::Backtrack, here, table, explanation);
        step.next = Some(Cell::new(next_i, next_j));
        step.matched = matched;
        step.path = path.clone();
        step.lcs_units = lcs_units.clone();
        steps.push(step);

        i = next_i;
        j = next_j;
    }

    path.push(Cell::new(0, 0));
    let mut last: Step<T> = blank_step(
        StepKind::BacktrackComplete,
        Cell::new(0, 0),
        table,
        format!(
            "Backtracking complete! The LCS is: \"{}\"\n\nThe highlighted path shows the cells \
             we visited. The matched cells show where {}s matched and contributed to the LCS.",
            render_units(lcs_units.iter().map(Some)),
            T::UNIT_NAME
        ),
    );
    last.path = path;
    last.lcs_units = lcs_units;
    steps.push(last);

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::compute_lcs;
    use crate::table::Direction;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_fill_step_count() {
        let a = chars("AGGTAB");
        let b = chars("GXTXAYB");
        let trace = compute_lcs_with_steps(&a, &b).unwrap();

        assert_eq!(trace.fill_steps.len(), 1 + a.len() * b.len() + 1);
        assert_eq!(trace.fill_steps[0].kind, StepKind::Init);
        assert_eq!(trace.fill_steps.last().unwrap().kind, StepKind::Complete);
        assert_eq!(trace.final_score, 4);
    }

    #[test]
    fn test_fill_order_is_row_major() {
        let trace = compute_lcs_with_steps(&chars("abc"), &chars("ab")).unwrap();
        let cells: Vec<(usize, usize)> = trace
            .fill_steps
            .iter()
            .filter(|s| s.kind == StepKind::Compute)
            .map(|s| (s.cell.i, s.cell.j))
            .collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]);
    }

    #[test]
    fn test_backtrack_step_count_matches_path() {
        let a = chars("AGGTAB");
        let b = chars("GXTXAYB");
        let trace = compute_lcs_with_steps(&a, &b).unwrap();
        let moves = trace.final_alignment.len();

        assert_eq!(trace.backtrack_steps.len(), moves + 2);
        assert_eq!(trace.backtrack_steps[0].kind, StepKind::BacktrackStart);
        assert_eq!(trace.backtrack_steps[0].cell, Cell::new(6, 7));

        let last = trace.backtrack_steps.last().unwrap();
        assert_eq!(last.kind, StepKind::BacktrackComplete);
        assert_eq!(last.lcs_units, chars("GTAB"));
        assert_eq!(last.path.len(), moves + 1);
        assert_eq!(*last.path.last().unwrap(), Cell::new(0, 0));
        assert!(last.explanation.contains("\"GTAB\""));
    }

    #[test]
    fn test_snapshots_are_independent() {
        let trace = compute_lcs_with_steps(&chars("AB"), &chars("AB")).unwrap();
        let init = &trace.fill_steps[0];
        assert!(init.table.scores.to_rows().iter().flatten().all(|&v| v == 0));

        // first compute step sees only cell [1,1] written
        let first = &trace.fill_steps[1];
        assert_eq!(first.table.scores.get(1, 1), 1);
        assert_eq!(first.table.scores.get(2, 2), 0);
        assert_eq!(first.table.directions.get(1, 1), Direction::DiagonalMatch);

        let complete = trace.fill_steps.last().unwrap();
        assert_eq!(complete.table.scores.get(2, 2), 2);
    }

    #[test]
    fn test_compute_step_candidates() {
        let trace = compute_lcs_with_steps(&chars("AB"), &chars("AC")).unwrap();
        let step = &trace.fill_steps[4]; // cell [2,2]: 'B' vs 'C'
        assert_eq!(step.cell, Cell::new(2, 2));
        assert_eq!(step.units, Some(('B', 'C')));

        let candidates = step.candidates.unwrap();
        assert!(!candidates.is_match);
        assert_eq!(candidates.from_top, 1);
        assert_eq!(candidates.from_left, 1);
        assert_eq!(candidates.from_diagonal, 1);
        assert_eq!(candidates.value, 1);
        assert!(step.explanation.contains("DON'T match"));
        assert!(step.explanation.ends_with("Result: max(1, 1, 1) = 1"));
    }

    #[test]
    fn test_backtrack_lcs_prepended() {
        let trace = compute_lcs_with_steps(&chars("ABC"), &chars("ABC")).unwrap();
        let found: Vec<Vec<char>> = trace
            .backtrack_steps
            .iter()
            .filter(|s| s.kind == StepKind::Backtrack)
            .map(|s| s.lcs_units.clone())
            .collect();
        assert_eq!(found, vec![chars("C"), chars("BC"), chars("ABC")]);
        assert_eq!(trace.backtrack_steps[1].matched, Some('C'));
        assert_eq!(trace.backtrack_steps[1].next, Some(Cell::new(2, 2)));
    }

    #[test]
    fn test_boundary_moves_are_narrated() {
        let trace = compute_lcs_with_steps(&chars("AB"), &chars("")).unwrap();
        assert_eq!(trace.fill_steps.len(), 2);
        let moves: Vec<&Step<char>> = trace
            .backtrack_steps
            .iter()
            .filter(|s| s.kind == StepKind::Backtrack)
            .collect();
        assert_eq!(moves.len(), 2);
        assert!(moves[0].explanation.contains("On column boundary - move up"));

        // empty first input walks along row 0
        let trace = compute_lcs_with_steps(&chars(""), &chars("AB")).unwrap();
        let moves: Vec<&Step<char>> = trace
            .backtrack_steps
            .iter()
            .filter(|s| s.kind == StepKind::Backtrack)
            .collect();
        assert_eq!(moves.len(), 2);
        assert!(moves
            .iter()
            .all(|s| s.explanation.contains("On row boundary - move left")));
    }

    #[test]
    fn test_final_alignment_matches_plain_lcs() {
        let a = chars("ABCBDAB");
        let b = chars("BDCABA");
        let trace = compute_lcs_with_steps(&a, &b).unwrap();
        assert_eq!(trace.final_alignment, compute_lcs(&a, &b).unwrap());
    }

    #[test]
    fn test_step_ceiling() {
        let a = chars("abcdef");
        let result = compute_lcs_with_steps_with_limit(&a, &a, 35);
        assert!(matches!(
            result,
            Err(AlignError::ResourceExhaustion { cells: 36, limit: 35 })
        ));
    }

    #[test]
    fn test_line_units_explanations() {
        let a: Vec<String> = vec!["alpha".into(), "beta".into()];
        let b: Vec<String> = vec!["alpha".into()];
        let trace = compute_lcs_with_steps(&a, &b).unwrap();
        assert!(trace.fill_steps[1].explanation.contains("for lines 'alpha'"));
        assert!(trace.fill_steps[1].explanation.contains("Lines MATCH!"));
    }
}
