//! LCS Align Library
//!
//! Pairwise alignment of two texts: longest common subsequence, Levenshtein
//! edit distance, Hamming distance, longest common substring and
//! position-by-position comparison. Every algorithm works on characters or,
//! in line mode, on whole lines, and reports one classification code per
//! aligned position.
//!
//! # Example
//!
//! ```
//! use lcs_align::prelude::*;
//!
//! let a: Vec<char> = "AGGTAB".chars().collect();
//! let b: Vec<char> = "GXTXAYB".chars().collect();
//!
//! let alignment = compute_lcs(&a, &b).unwrap();
//! assert_eq!(alignment.first_text(), "AGGT-A-B");
//! assert_eq!(alignment.second_text(), "-GXTXAYB");
//! assert_eq!(alignment.common_units().iter().collect::<String>(), "GTAB");
//! ```
//!
//! # Step Trace Example
//!
//! ```
//! use lcs_align::prelude::*;
//!
//! let a: Vec<char> = "ABC".chars().collect();
//! let b: Vec<char> = "AC".chars().collect();
//!
//! // One snapshot per filled cell, plus init and complete
//! let trace = compute_lcs_with_steps(&a, &b).unwrap();
//! assert_eq!(trace.fill_steps.len(), 2 + a.len() * b.len());
//!
//! for step in &trace.backtrack_steps {
//!     println!("{}", step.explanation);
//! }
//! ```
//!
//! # Report Example
//!
//! ```
//! use lcs_align::prelude::*;
//!
//! let params = CompareParams {
//!     algorithm: Algorithm::Levenshtein,
//!     ..Default::default()
//! };
//! let report = compare_texts("kitten", "sitting", &params, false).unwrap();
//! assert_eq!(report.distance, Some(3));
//! ```

pub mod align;
pub mod compare;
pub mod distance;
pub mod models;
pub mod output;
pub mod preprocess;
pub mod steps;
pub mod table;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::align::{
        comparison_units, compute_char_by_char, compute_lcs, compute_lcs_with_limit,
        compute_levenshtein, compute_levenshtein_with_limit,
    };
    pub use crate::compare::{compare_texts, resolve_inputs};
    pub use crate::distance::{
        compute_hamming, compute_longest_common_substring,
        compute_longest_common_substring_with_limit,
    };
    pub use crate::models::{
        AlignCode, AlignError, Algorithm, Alignment, AlignmentStats, Cell, CompareParams,
        ComparisonReport, HammingResult, LevenshteinResult, PreprocessOptions, Step, StepKind,
        StepTrace, SubstringResult, Token,
    };
    pub use crate::output::{
        format_position, format_step, print_positions, print_summary, render_table, write_csv,
        write_csv_file, write_json, write_json_file, write_steps_json, write_steps_json_file,
        write_text_report, write_text_report_file, OutputError,
    };
    pub use crate::preprocess::{preprocess, preset, Preset, Tokens, PRESETS};
    pub use crate::steps::{compute_lcs_with_steps, compute_lcs_with_steps_with_limit};
    pub use crate::table::{Direction, LcsTable, DEFAULT_MAX_CELLS, DEFAULT_MAX_STEP_CELLS};
}

// Re-export commonly used types at the crate root
pub use models::{AlignCode, AlignError, Algorithm, Alignment, CompareParams, ComparisonReport};
