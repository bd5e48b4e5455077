//! Comparison orchestration.
//!
//! This module runs the full pipeline for one pair of texts: input
//! resolution, preprocessing, the selected algorithm, and rendering of the
//! outcome into a serializable `ComparisonReport`.

use std::fs;
use std::path::Path;

use crate::align::{
    comparison_units, compute_char_by_char, compute_lcs_with_limit,
    compute_levenshtein_with_limit,
};
use crate::distance::{compute_hamming, compute_longest_common_substring_with_limit};
use crate::models::*;
use crate::preprocess::{preprocess, preset, Tokens};

/// Resolve both inputs from explicit text, files, or a named preset.
///
/// A preset fills both inputs at once. Otherwise each input comes from its
/// text, then its file; an input with neither is `InvalidInput`.
pub fn resolve_inputs(
    first_text: Option<String>,
    first_file: Option<&Path>,
    second_text: Option<String>,
    second_file: Option<&Path>,
    preset_name: Option<&str>,
) -> Result<(String, String), AlignError> {
    if let Some(name) = preset_name {
        let found = preset(name)
            .ok_or_else(|| AlignError::InvalidInput(format!("unknown preset '{}'", name)))?;
        return Ok((
            first_text.unwrap_or_else(|| found.first.to_string()),
            second_text.unwrap_or_else(|| found.second.to_string()),
        ));
    }

    let first = resolve_one(first_text, first_file, "first")?;
    let second = resolve_one(second_text, second_file, "second")?;
    Ok((first, second))
}

fn resolve_one(text: Option<String>, file: Option<&Path>, which: &str) -> Result<String, AlignError> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(fs::read_to_string(path)?),
        (None, None) => Err(AlignError::InvalidInput(format!(
            "missing {which} input: pass --{which}, --{which}-file or --preset"
        ))),
    }
}

/// Algorithm-specific part of a report.
struct Outcome {
    result: String,
    lcs_length: Option<usize>,
    distance: Option<usize>,
    similarity: Option<f64>,
    first: String,
    second: String,
    codes: Vec<AlignCode>,
    codes_second: Option<Vec<AlignCode>>,
    positions: Vec<ReportPosition>,
    stats: AlignmentStats,
    hamming: Option<HammingInfo>,
    substring: Option<SubstringInfo>,
}

impl Outcome {
    fn from_alignment<T: Token>(alignment: &Alignment<T>, result: String) -> Self {
        let positions = alignment
            .first
            .iter()
            .zip(&alignment.second)
            .zip(&alignment.codes)
            .map(|((x, y), &code)| ReportPosition {
                first: render_unit(x.as_ref()),
                second: render_unit(y.as_ref()),
                code,
            })
            .collect();

        Self {
            result,
            lcs_length: None,
            distance: None,
            similarity: None,
            first: alignment.first_text(),
            second: alignment.second_text(),
            codes: alignment.codes.clone(),
            codes_second: None,
            positions,
            stats: alignment.stats(),
            hamming: None,
            substring: None,
        }
    }
}

fn render_unit<T: Token>(unit: Option<&T>) -> String {
    match unit {
        Some(u) => u.to_string(),
        None => GAP.to_string(),
    }
}

/// Compare two raw texts with the configured algorithm.
pub fn compare_texts(
    first: &str,
    second: &str,
    params: &CompareParams,
    show_progress: bool,
) -> Result<ComparisonReport, AlignError> {
    let options = &params.preprocess;

    let tokens = preprocess(first, second, options);
    let (first_units, second_units) = tokens.lens();
    if show_progress {
        let unit = if options.line_by_line { "line" } else { "character" };
        eprintln!("Comparing {first_units} and {second_units} {unit} units");
    }

    let outcome = match tokens {
        Tokens::Lines(a, b) => run_algorithm(&a, &b, params, show_progress)?,
        Tokens::Chars(a, b) => run_algorithm(&a, &b, params, show_progress)?,
    };

    Ok(ComparisonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        algorithm: params.algorithm,
        parameters: params.clone(),
        inputs: ReportInputs {
            first: first.to_string(),
            second: second.to_string(),
            first_units,
            second_units,
        },
        result: outcome.result,
        lcs_length: outcome.lcs_length,
        distance: outcome.distance,
        similarity: outcome.similarity,
        first: outcome.first,
        second: outcome.second,
        codes: outcome.codes,
        codes_second: outcome.codes_second,
        positions: outcome.positions,
        stats: outcome.stats,
        hamming: outcome.hamming,
        substring: outcome.substring,
    })
}

fn run_algorithm<T: Token>(
    a: &[T],
    b: &[T],
    params: &CompareParams,
    show_progress: bool,
) -> Result<Outcome, AlignError> {
    if show_progress {
        eprintln!("Running {}...", params.algorithm.label());
    }

    let outcome = match params.algorithm {
        Algorithm::Lcs => {
            let alignment = compute_lcs_with_limit(a, b, params.max_cells)?;
            let common = alignment.common_units();
            let mut outcome =
                Outcome::from_alignment(&alignment, render_units(common.iter().map(Some)));
            outcome.lcs_length = Some(common.len());
            outcome
        }
        Algorithm::Levenshtein => {
            let lev = compute_levenshtein_with_limit(a, b, params.max_cells)?;
            let mut outcome = Outcome::from_alignment(&lev.alignment, lev.distance.to_string());
            outcome.distance = Some(lev.distance);
            outcome.similarity = Some(lev.similarity);
            outcome
        }
        Algorithm::Hamming => {
            let ham = compute_hamming(a, b, params.hamming_truncate)?;
            if ham.truncated && show_progress {
                eprintln!(
                    "  Lengths differ ({} vs {}); compared the first {} units",
                    ham.original_lengths.0, ham.original_lengths.1, ham.truncated_length
                );
            }
            let mut outcome = Outcome::from_alignment(&ham.alignment, ham.distance.to_string());
            outcome.distance = Some(ham.distance);
            outcome.similarity = Some(ham.similarity);
            outcome.hamming = Some(HammingInfo {
                truncated: ham.truncated,
                truncated_length: ham.truncated_length,
                original_lengths: ham.original_lengths,
            });
            outcome
        }
        Algorithm::Substring => substring_outcome(a, b, params.max_cells)?,
        Algorithm::CharCompare => {
            let alignment = compute_char_by_char(a, b);
            let result = comparison_units(&alignment).join(T::SEPARATOR);
            Outcome::from_alignment(&alignment, result)
        }
    };

    if show_progress {
        eprintln!(
            "  {} matches, {} mismatches, {} gaps",
            outcome.stats.matches,
            outcome.stats.mismatches,
            outcome.stats.gaps_in_first + outcome.stats.gaps_in_second
        );
    }

    Ok(outcome)
}

/// Substring reports keep both inputs unaligned, one code vector each.
///
/// Row k of `positions` pairs unit k of each input; a side past its end is
/// empty and the row carries the code of the first input where present.
fn substring_outcome<T: Token>(a: &[T], b: &[T], max_cells: usize) -> Result<Outcome, AlignError> {
    let sub = compute_longest_common_substring_with_limit(a, b, max_cells)?;
    let stats = AlignmentStats::from_codes(&sub.codes_a);

    let positions = (0..a.len().max(b.len()))
        .map(|k| ReportPosition {
            first: a.get(k).map(ToString::to_string).unwrap_or_default(),
            second: b.get(k).map(ToString::to_string).unwrap_or_default(),
            code: sub
                .codes_a
                .get(k)
                .or_else(|| sub.codes_b.get(k))
                .copied()
                .unwrap_or(AlignCode::Mismatch),
        })
        .collect();

    Ok(Outcome {
        result: render_units(sub.substring.iter().map(Some)),
        lcs_length: None,
        distance: None,
        similarity: Some(sub.similarity),
        first: render_units(a.iter().map(Some)),
        second: render_units(b.iter().map(Some)),
        codes: sub.codes_a,
        codes_second: Some(sub.codes_b),
        positions,
        stats,
        hamming: None,
        substring: Some(SubstringInfo {
            start_in_first: sub.start_in_a,
            start_in_second: sub.start_in_b,
            length: sub.length,
        }),
    })
}
