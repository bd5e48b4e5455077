//! Data structures shared by every alignment algorithm.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::table::LcsTable;

/// Gap placeholder used when an alignment is rendered as text.
pub const GAP: &str = "-";

/// Separator used between whole-line units when rendering (line-by-line mode).
pub const LINE_SEPARATOR: &str = "↵\n";

/// Errors raised at the boundary of an algorithm call.
#[derive(Error, Debug)]
pub enum AlignError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Hamming distance requires sequences of equal length (got {first} and {second})")]
    LengthMismatch { first: usize, second: usize },
    #[error("DP table of {cells} cells exceeds the limit of {limit}")]
    ResourceExhaustion { cells: usize, limit: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-position classification code.
///
/// The integer values are part of the external contract: exporters and
/// statistics consumers read them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum AlignCode {
    /// Both units present but different
    Mismatch = 0,
    /// Unit present only in the first sequence
    GapInSecond = 1,
    /// Unit present only in the second sequence
    GapInFirst = 2,
    /// Same unit in both sequences
    Match = 3,
    /// Position inside the longest common substring
    SubstringMarker = 5,
}

impl AlignCode {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Human-readable name, as used in CSV and text exports.
    pub fn label(self) -> &'static str {
        match self {
            AlignCode::Mismatch => "Mismatch",
            AlignCode::GapInSecond => "Gap in String 2",
            AlignCode::GapInFirst => "Gap in String 1",
            AlignCode::Match => "Match",
            AlignCode::SubstringMarker => "Common Substring",
        }
    }
}

impl From<AlignCode> for u8 {
    fn from(code: AlignCode) -> Self {
        code.value()
    }
}

impl TryFrom<u8> for AlignCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AlignCode::Mismatch),
            1 => Ok(AlignCode::GapInSecond),
            2 => Ok(AlignCode::GapInFirst),
            3 => Ok(AlignCode::Match),
            5 => Ok(AlignCode::SubstringMarker),
            other => Err(format!("unknown alignment code {}", other)),
        }
    }
}

/// An atomic unit of a sequence: a character, or a whole line in line mode.
pub trait Token: Clone + PartialEq + fmt::Display {
    /// Text placed between consecutive units when rendering.
    const SEPARATOR: &'static str;
    /// Singular noun for a unit, used in step explanations.
    const UNIT_NAME: &'static str;
}

impl Token for char {
    const SEPARATOR: &'static str = "";
    const UNIT_NAME: &'static str = "character";
}

impl Token for String {
    const SEPARATOR: &'static str = LINE_SEPARATOR;
    const UNIT_NAME: &'static str = "line";
}

/// Render a run of possibly-absent units, writing `-` for every gap.
pub fn render_units<'a, T, I>(units: I) -> String
where
    T: Token + 'a,
    I: IntoIterator<Item = Option<&'a T>>,
{
    units
        .into_iter()
        .map(|unit| match unit {
            Some(u) => u.to_string(),
            None => GAP.to_string(),
        })
        .collect::<Vec<_>>()
        .join(T::SEPARATOR)
}

/// Two equal-length aligned sequences plus one code per position.
///
/// `None` marks a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment<T> {
    pub first: Vec<Option<T>>,
    pub second: Vec<Option<T>>,
    pub codes: Vec<AlignCode>,
}

impl<T> Default for Alignment<T> {
    fn default() -> Self {
        Self {
            first: Vec::new(),
            second: Vec::new(),
            codes: Vec::new(),
        }
    }
}

impl<T: Token> Alignment<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            first: Vec::with_capacity(capacity),
            second: Vec::with_capacity(capacity),
            codes: Vec::with_capacity(capacity),
        }
    }

    /// Append one aligned position.
    pub fn push(&mut self, first: Option<T>, second: Option<T>, code: AlignCode) {
        self.first.push(first);
        self.second.push(second);
        self.codes.push(code);
    }

    /// Reverse in place (used after a backward walk).
    pub fn reverse(&mut self) {
        self.first.reverse();
        self.second.reverse();
        self.codes.reverse();
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Units at positions coded as `Match`, in order.
    ///
    /// For an LCS alignment this is the common subsequence itself.
    pub fn common_units(&self) -> Vec<T> {
        self.first
            .iter()
            .zip(&self.codes)
            .filter(|(_, code)| **code == AlignCode::Match)
            .filter_map(|(unit, _)| unit.clone())
            .collect()
    }

    /// Number of positions coded as `Match`.
    pub fn match_count(&self) -> usize {
        self.codes.iter().filter(|&&c| c == AlignCode::Match).count()
    }

    pub fn first_text(&self) -> String {
        render_units(self.first.iter().map(Option::as_ref))
    }

    pub fn second_text(&self) -> String {
        render_units(self.second.iter().map(Option::as_ref))
    }

    pub fn stats(&self) -> AlignmentStats {
        AlignmentStats::from_codes(&self.codes)
    }
}

/// Counts of each classification code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub matches: usize,
    pub mismatches: usize,
    pub gaps_in_first: usize,  // only in String 2
    pub gaps_in_second: usize, // only in String 1
    pub substring_positions: usize,
}

impl AlignmentStats {
    pub fn from_codes(codes: &[AlignCode]) -> Self {
        let mut stats = Self::default();
        for code in codes {
            match code {
                AlignCode::Match => stats.matches += 1,
                AlignCode::Mismatch => stats.mismatches += 1,
                AlignCode::GapInFirst => stats.gaps_in_first += 1,
                AlignCode::GapInSecond => stats.gaps_in_second += 1,
                AlignCode::SubstringMarker => stats.substring_positions += 1,
            }
        }
        stats
    }
}

/// Levenshtein edit distance with its edit alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevenshteinResult<T> {
    pub alignment: Alignment<T>,
    pub distance: usize,
    pub similarity: f64, // percent
}

/// Hamming distance over (possibly truncated) equal-length inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HammingResult<T> {
    pub alignment: Alignment<T>,
    pub distance: usize,
    pub similarity: f64,
    pub truncated: bool,
    pub truncated_length: usize, // 0 unless truncated
    pub original_lengths: (usize, usize),
}

/// Longest common substring, located independently in both inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstringResult<T> {
    pub codes_a: Vec<AlignCode>,
    pub codes_b: Vec<AlignCode>,
    pub substring: Vec<T>,
    pub start_in_a: usize,
    pub start_in_b: usize,
    pub length: usize,
    pub similarity: f64,
}

// ============================================================================
// Step recorder types
// ============================================================================

/// Phase tag of a recorded step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Init,
    Compute,
    Complete,
    BacktrackStart,
    Backtrack,
    BacktrackComplete,
}

/// Table coordinates, 0-based with row/column 0 as the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub i: usize,
    pub j: usize,
}

impl Cell {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.i, self.j)
    }
}

/// The three predecessor values weighed while filling one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillCandidates {
    pub from_top: u32,
    pub from_left: u32,
    pub from_diagonal: u32, // diagonal + 1 on a match
    pub is_match: bool,
    pub value: u32,
}

/// One immutable snapshot of the LCS computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<T> {
    pub kind: StepKind,
    pub cell: Cell,
    pub units: Option<(T, T)>,               // compute steps: (unit of A, unit of B)
    pub candidates: Option<FillCandidates>,  // compute steps only
    pub next: Option<Cell>,                  // backtrack moves only
    pub matched: Option<T>,                  // backtrack move that found an LCS unit
    pub path: Vec<Cell>,                     // backtrack phase: cells visited so far
    pub lcs_units: Vec<T>,                   // backtrack phase: LCS found so far
    pub table: LcsTable,
    pub explanation: String,
}

/// Both step lists plus the final outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTrace<T> {
    pub fill_steps: Vec<Step<T>>,
    pub backtrack_steps: Vec<Step<T>>,
    pub final_score: u32,
    pub final_alignment: Alignment<T>,
}

// ============================================================================
// Parameters and reports
// ============================================================================

/// Algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Longest common subsequence (default)
    #[default]
    Lcs,
    /// Levenshtein edit distance
    Levenshtein,
    /// Hamming distance
    Hamming,
    /// Longest common contiguous run
    Substring,
    /// Position-wise comparison
    CharCompare,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Lcs,
        Algorithm::Levenshtein,
        Algorithm::Hamming,
        Algorithm::Substring,
        Algorithm::CharCompare,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Lcs => "Longest Common Subsequence",
            Algorithm::Levenshtein => "Levenshtein Distance",
            Algorithm::Hamming => "Hamming Distance",
            Algorithm::Substring => "Longest Common Substring",
            Algorithm::CharCompare => "Comparison Result",
        }
    }

    pub fn alignment_title(self) -> &'static str {
        match self {
            Algorithm::Lcs => "Alignment",
            Algorithm::Levenshtein => "Edit Alignment",
            Algorithm::Hamming => "Character Comparison",
            Algorithm::Substring => "Substring Location",
            Algorithm::CharCompare => "Position Comparison",
        }
    }
}

/// Text normalization applied before any algorithm sees the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    pub ignore_case: bool,
    pub ignore_whitespace: bool,
    pub ignore_punctuation: bool,
    pub ignore_numbers: bool,
    pub collapse_whitespace: bool,
    pub line_by_line: bool, // each line is one unit
}

/// Comparison parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareParams {
    pub algorithm: Algorithm,
    pub preprocess: PreprocessOptions,
    pub hamming_truncate: bool,
    pub max_cells: usize,      // ceiling on (m+1)*(n+1) for plain DP tables
    pub max_step_cells: usize, // ceiling on m*n for the step recorder
}

impl Default for CompareParams {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Lcs,
            preprocess: PreprocessOptions::default(),
            hamming_truncate: true,
            max_cells: crate::table::DEFAULT_MAX_CELLS,
            max_step_cells: crate::table::DEFAULT_MAX_STEP_CELLS,
        }
    }
}

/// Raw inputs and their processed sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInputs {
    pub first: String,
    pub second: String,
    pub first_units: usize,  // after preprocessing
    pub second_units: usize,
}

/// One aligned position, rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPosition {
    pub first: String,
    pub second: String,
    pub code: AlignCode,
}

/// Hamming truncation details
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HammingInfo {
    pub truncated: bool,
    pub truncated_length: usize,
    pub original_lengths: (usize, usize),
}

/// Where the longest common substring sits in each input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstringInfo {
    pub start_in_first: usize,
    pub start_in_second: usize,
    pub length: usize,
}

/// Algorithm-independent result of comparing two texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub version: String,
    pub algorithm: Algorithm,
    pub parameters: CompareParams,
    pub inputs: ReportInputs,
    pub result: String,
    pub lcs_length: Option<usize>,
    pub distance: Option<usize>,
    pub similarity: Option<f64>,
    pub first: String,
    pub second: String,
    pub codes: Vec<AlignCode>,
    pub codes_second: Option<Vec<AlignCode>>, // substring only: codes for the second input
    pub positions: Vec<ReportPosition>,
    pub stats: AlignmentStats,
    pub hamming: Option<HammingInfo>,
    pub substring: Option<SubstringInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values_are_stable() {
        assert_eq!(AlignCode::Mismatch.value(), 0);
        assert_eq!(AlignCode::GapInSecond.value(), 1);
        assert_eq!(AlignCode::GapInFirst.value(), 2);
        assert_eq!(AlignCode::Match.value(), 3);
        assert_eq!(AlignCode::SubstringMarker.value(), 5);
        assert!(AlignCode::try_from(4).is_err());
    }

    #[test]
    fn test_codes_serialize_as_integers() {
        let codes = vec![AlignCode::Match, AlignCode::GapInFirst, AlignCode::SubstringMarker];
        let json = serde_json::to_string(&codes).unwrap();
        assert_eq!(json, "[3,2,5]");

        let back: Vec<AlignCode> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, codes);
    }

    #[test]
    fn test_render_char_alignment() {
        let mut alignment = Alignment::with_capacity(3);
        alignment.push(Some('A'), Some('A'), AlignCode::Match);
        alignment.push(Some('B'), Some('B'), AlignCode::Match);
        alignment.push(None, Some('C'), AlignCode::GapInFirst);

        assert_eq!(alignment.first_text(), "AB-");
        assert_eq!(alignment.second_text(), "ABC");
        assert_eq!(alignment.common_units(), vec!['A', 'B']);
    }

    #[test]
    fn test_render_line_alignment() {
        let mut alignment: Alignment<String> = Alignment::default();
        alignment.push(Some("one".into()), Some("one".into()), AlignCode::Match);
        alignment.push(Some("two".into()), None, AlignCode::GapInSecond);

        assert_eq!(alignment.first_text(), "one↵\ntwo");
        assert_eq!(alignment.second_text(), "one↵\n-");
    }

    #[test]
    fn test_stats_from_codes() {
        let stats = AlignmentStats::from_codes(&[
            AlignCode::Match,
            AlignCode::Match,
            AlignCode::Mismatch,
            AlignCode::GapInFirst,
            AlignCode::GapInSecond,
            AlignCode::GapInSecond,
        ]);
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.gaps_in_first, 1);
        assert_eq!(stats.gaps_in_second, 2);
        assert_eq!(stats.substring_positions, 0);
    }

    #[test]
    fn test_default_params() {
        let params = CompareParams::default();
        assert_eq!(params.algorithm, Algorithm::Lcs);
        assert!(params.hamming_truncate);
        assert!(!params.preprocess.line_by_line);
    }
}
