//! Output formatting for comparison reports and step traces (JSON, CSV, text).

use crate::models::{
    AlignCode, Algorithm, ComparisonReport, ReportPosition, Step, StepKind, StepTrace, Token,
};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

const RULE: &str = "═══════════════════════════════════════════════════════";
const THIN_RULE: &str = "-----------------------------------------------------------";

/// Write a comparison report as JSON.
pub fn write_json<W: Write>(report: &ComparisonReport, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(report)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a comparison report as JSON to a file.
pub fn write_json_file(report: &ComparisonReport, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(report, &mut file)
}

/// Write a recorded step trace as JSON.
pub fn write_steps_json<T: Serialize, W: Write>(
    trace: &StepTrace<T>,
    writer: &mut W,
) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(trace)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write a recorded step trace as JSON to a file.
pub fn write_steps_json_file<T: Serialize>(
    trace: &StepTrace<T>,
    path: &Path,
) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_steps_json(trace, &mut file)
}

/// Quote a CSV field, doubling embedded quotes.
fn csv_field(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Write a report as CSV, one row per position.
///
/// Aligned reports get `position,first,second,code,kind,is_match`. Substring
/// reports leave the inputs unaligned, so each input gets its own rows under
/// `sequence,position,unit,code,kind`.
pub fn write_csv<W: Write>(report: &ComparisonReport, writer: &mut W) -> Result<(), OutputError> {
    if let Some(codes_second) = &report.codes_second {
        writeln!(writer, "sequence,position,unit,code,kind")?;
        let sequences = [(1, &report.codes, true), (2, codes_second, false)];
        for (sequence, codes, is_first) in sequences {
            for (k, code) in codes.iter().enumerate() {
                let unit = report
                    .positions
                    .get(k)
                    .map(|p| if is_first { p.first.as_str() } else { p.second.as_str() })
                    .unwrap_or("");
                writeln!(
                    writer,
                    "{},{},{},{},{}",
                    sequence,
                    k + 1,
                    csv_field(unit),
                    code.value(),
                    csv_field(code.label())
                )?;
            }
        }
        return Ok(());
    }

    writeln!(writer, "position,first,second,code,kind,is_match")?;
    for (k, position) in report.positions.iter().enumerate() {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            k + 1,
            csv_field(&position.first),
            csv_field(&position.second),
            position.code.value(),
            csv_field(position.code.label()),
            if position.code == AlignCode::Match {
                "Yes"
            } else {
                "No"
            }
        )?;
    }

    Ok(())
}

/// Write a report as CSV to a file.
pub fn write_csv_file(report: &ComparisonReport, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(report, &mut file)
}

/// Write a plain-text report: inputs, result, alignment and legend.
pub fn write_text_report<W: Write>(
    report: &ComparisonReport,
    writer: &mut W,
) -> Result<(), OutputError> {
    let unit_name = if report.parameters.preprocess.line_by_line {
        "lines"
    } else {
        "characters"
    };

    writeln!(writer, "{}", RULE)?;
    writeln!(writer, "  {} RESULTS", report.algorithm.label().to_uppercase())?;
    writeln!(writer, "{}", RULE)?;
    writeln!(writer)?;
    writeln!(writer, "Version: {}", report.version)?;
    writeln!(writer)?;

    writeln!(writer, "{}", THIN_RULE)?;
    writeln!(writer, "INPUT STRINGS")?;
    writeln!(writer, "{}", THIN_RULE)?;
    writeln!(writer)?;
    writeln!(
        writer,
        "String 1 ({} {}):\n{}",
        report.inputs.first_units, unit_name, report.inputs.first
    )?;
    writeln!(writer)?;
    writeln!(
        writer,
        "String 2 ({} {}):\n{}",
        report.inputs.second_units, unit_name, report.inputs.second
    )?;
    writeln!(writer)?;

    writeln!(writer, "{}", THIN_RULE)?;
    writeln!(writer, "RESULT")?;
    writeln!(writer, "{}", THIN_RULE)?;
    writeln!(writer)?;
    for line in result_lines(report) {
        writeln!(writer, "{}", line)?;
    }
    writeln!(writer)?;

    writeln!(writer, "{}", THIN_RULE)?;
    writeln!(writer, "{}", report.algorithm.alignment_title().to_uppercase())?;
    writeln!(writer, "{}", THIN_RULE)?;
    writeln!(writer)?;
    writeln!(writer, "String 1: {}", report.first)?;
    writeln!(writer, "String 2: {}", report.second)?;
    writeln!(writer)?;
    writeln!(writer, "Legend:")?;
    writeln!(writer, "  3 Match (same unit in both)")?;
    writeln!(writer, "  1 Gap in String 2 (unit only in String 1)")?;
    writeln!(writer, "  2 Gap in String 1 (unit only in String 2)")?;
    writeln!(writer, "  0 Mismatch (different units at the same position)")?;
    if report.algorithm == Algorithm::Substring {
        writeln!(writer, "  5 Inside the common substring")?;
    }
    writeln!(writer)?;
    writeln!(writer, "{}", RULE)?;

    Ok(())
}

/// Write a plain-text report to a file.
pub fn write_text_report_file(report: &ComparisonReport, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_text_report(report, &mut file)
}

/// Algorithm-specific result lines shared by the text report and summary.
fn result_lines(report: &ComparisonReport) -> Vec<String> {
    let mut lines = Vec::new();
    let shown = if report.result.is_empty() {
        "(empty)"
    } else {
        report.result.as_str()
    };

    match report.algorithm {
        Algorithm::Lcs => {
            lines.push(format!("LCS: {}", shown));
            lines.push(format!("Length: {}", report.lcs_length.unwrap_or(0)));
        }
        Algorithm::Levenshtein | Algorithm::Hamming => {
            lines.push(format!("Distance: {}", report.distance.unwrap_or(0)));
        }
        Algorithm::Substring => {
            lines.push(format!("Substring: {}", shown));
            if let Some(info) = &report.substring {
                lines.push(format!("Length: {}", info.length));
                lines.push(format!(
                    "Starts at: {} (String 1), {} (String 2)",
                    info.start_in_first, info.start_in_second
                ));
            }
        }
        Algorithm::CharCompare => {
            lines.push(format!("Comparison: {}", shown));
        }
    }

    if let Some(similarity) = report.similarity {
        lines.push(format!("Similarity: {:.1}%", similarity));
    }
    if let Some(info) = &report.hamming {
        if info.truncated {
            lines.push(format!(
                "Truncated to {} units (original lengths {} and {})",
                info.truncated_length, info.original_lengths.0, info.original_lengths.1
            ));
        }
    }

    lines
}

/// Write a summary report to stdout.
pub fn print_summary(report: &ComparisonReport) {
    println!("\n=== {} ===", report.algorithm.label());
    println!("Version: {}", report.version);
    println!();
    println!("String 1: {} units", report.inputs.first_units);
    println!("String 2: {} units", report.inputs.second_units);
    println!();
    println!("Results:");
    for line in result_lines(report) {
        println!("  {}", line);
    }
    println!();
    println!("Statistics:");
    println!("  Matches: {}", report.stats.matches);
    println!("  Mismatches: {}", report.stats.mismatches);
    println!("  Gaps in String 1: {}", report.stats.gaps_in_first);
    println!("  Gaps in String 2: {}", report.stats.gaps_in_second);
    if report.stats.substring_positions > 0 {
        println!("  Substring positions: {}", report.stats.substring_positions);
    }
}

/// Format one aligned position as a human-readable row.
pub fn format_position(index: usize, position: &ReportPosition) -> String {
    format!(
        "{:>5}  {:<12} {:<12} {} ({})",
        index + 1,
        truncate_text(&position.first, 12),
        truncate_text(&position.second, 12),
        position.code.value(),
        position.code.label()
    )
}

/// Print aligned positions in a human-readable format.
pub fn print_positions(positions: &[ReportPosition], limit: Option<usize>) {
    let to_print = match limit {
        Some(n) => &positions[..n.min(positions.len())],
        None => positions,
    };

    for (k, position) in to_print.iter().enumerate() {
        println!("{}", format_position(k, position));
    }

    if let Some(n) = limit {
        if positions.len() > n {
            println!("... and {} more positions", positions.len() - n);
        }
    }
}

/// Truncate text to a maximum length, adding ellipsis if needed.
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn kind_label(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Init => "init",
        StepKind::Compute => "compute",
        StepKind::Complete => "complete",
        StepKind::BacktrackStart => "backtrack start",
        StepKind::Backtrack => "backtrack",
        StepKind::BacktrackComplete => "backtrack complete",
    }
}

/// Heading plus explanation for one step.
pub fn format_step<T>(step: &Step<T>, index: usize, total: usize) -> String {
    format!(
        "Step {}/{} ({}) at {}\n{}",
        index + 1,
        total,
        kind_label(step.kind),
        step.cell,
        step.explanation
    )
}

/// Render the DP table captured by a step as ASCII.
///
/// Each cell shows its score and backtrack arrow. The step's current cell is
/// bracketed and cells on the backtrack path so far are starred.
pub fn render_table<T: Token>(step: &Step<T>, a: &[T], b: &[T]) -> String {
    const LABEL_LEN: usize = 6;

    let scores = &step.table.scores;
    let directions = &step.table.directions;
    let path: HashSet<(usize, usize)> = step.path.iter().map(|c| (c.i, c.j)).collect();

    let label = |unit: Option<&T>| match unit {
        Some(u) => truncate_text(&u.to_string(), LABEL_LEN),
        None => "ε".to_string(),
    };

    let mut grid: Vec<Vec<String>> = Vec::with_capacity(scores.rows() + 1);
    let mut header = vec![String::new(), label(None)];
    header.extend(b.iter().map(|u| label(Some(u))));
    grid.push(header);

    for i in 0..scores.rows() {
        let mut row = vec![label(if i == 0 { None } else { a.get(i - 1) })];
        for j in 0..scores.cols() {
            let arrow = directions.get(i, j).arrow();
            let body = format!("{}{}", scores.get(i, j), arrow).trim_end().to_string();
            let cell = if step.cell.i == i && step.cell.j == j {
                format!("[{}]", body)
            } else if path.contains(&(i, j)) {
                format!("*{}", body)
            } else {
                body
            };
            row.push(cell);
        }
        grid.push(row);
    }

    let width = grid
        .iter()
        .flatten()
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(1)
        + 1;

    grid.iter()
        .map(|row| {
            row.iter()
                .map(|cell| format!("{:>width$}", cell, width = width))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_texts;
    use crate::models::CompareParams;
    use crate::steps::compute_lcs_with_steps;

    fn report(algorithm: Algorithm, a: &str, b: &str) -> ComparisonReport {
        let params = CompareParams {
            algorithm,
            ..Default::default()
        };
        compare_texts(a, b, &params, false).unwrap()
    }

    #[test]
    fn test_write_csv() {
        let report = report(Algorithm::Lcs, "AGGTAB", "GXTXAYB");
        let mut output = Vec::new();
        write_csv(&report, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "position,first,second,code,kind,is_match");
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[1], "1,\"A\",\"-\",1,\"Gap in String 2\",No");
        assert_eq!(lines[2], "2,\"G\",\"G\",3,\"Match\",Yes");
    }

    #[test]
    fn test_write_csv_escapes_quotes() {
        let report = report(Algorithm::CharCompare, "\"", "\"");
        let mut output = Vec::new();
        write_csv(&report, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.contains("1,\"\"\"\",\"\"\"\",3,\"Match\",Yes"));
    }

    #[test]
    fn test_write_csv_substring_rows() {
        let report = report(Algorithm::Substring, "abc", "zbcx");
        let mut output = Vec::new();
        write_csv(&report, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "sequence,position,unit,code,kind");
        assert_eq!(lines.len(), 1 + 3 + 4);
        assert_eq!(lines[2], "1,2,\"b\",5,\"Common Substring\"");
        assert_eq!(lines[4], "2,1,\"z\",0,\"Mismatch\"");
    }

    #[test]
    fn test_write_csv_empty() {
        let report = report(Algorithm::Lcs, "", "");
        let mut output = Vec::new();
        write_csv(&report, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_write_json() {
        let report = report(Algorithm::Levenshtein, "flaw", "lawn");
        let mut output = Vec::new();
        write_json(&report, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["algorithm"], "levenshtein");
        assert_eq!(value["distance"], 2);
        assert_eq!(value["codes"][0], 1);
        assert_eq!(value["stats"]["gaps_in_first"], 1);
    }

    #[test]
    fn test_write_steps_json() {
        let a: Vec<char> = "AB".chars().collect();
        let trace = compute_lcs_with_steps(&a, &a).unwrap();
        let mut output = Vec::new();
        write_steps_json(&trace, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["fill_steps"].as_array().unwrap().len(), 6);
        assert_eq!(value["fill_steps"][0]["kind"], "init");
        assert_eq!(value["backtrack_steps"][0]["kind"], "backtrack-start");
        assert_eq!(value["final_score"], 2);
    }

    #[test]
    fn test_write_text_report() {
        let report = report(Algorithm::Lcs, "ABCDEF", "ACDEBF");
        let mut output = Vec::new();
        write_text_report(&report, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("LONGEST COMMON SUBSEQUENCE RESULTS"));
        assert!(text.contains("LCS: ACDEF"));
        assert!(text.contains("Length: 5"));
        assert!(text.contains("String 1: ABCDE-F"));
        assert!(text.contains("String 1 (6 characters):"));
    }

    #[test]
    fn test_text_report_empty_result() {
        let report = report(Algorithm::Substring, "abc", "xyz");
        let mut output = Vec::new();
        write_text_report(&report, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Substring: (empty)"));
        assert!(text.contains("Similarity: 0.0%"));
    }

    #[test]
    fn test_format_position() {
        let report = report(Algorithm::Lcs, "AB", "AB");
        let row = format_position(0, &report.positions[0]);
        assert!(row.contains("3 (Match)"));
        assert!(row.trim_start().starts_with('1'));
    }

    #[test]
    fn test_render_table_marks_current_cell() {
        let a: Vec<char> = "AB".chars().collect();
        let b: Vec<char> = "A".chars().collect();
        let trace = compute_lcs_with_steps(&a, &b).unwrap();
        let complete = trace.fill_steps.last().unwrap();

        let rendered = render_table(complete, &a, &b);
        assert_eq!(rendered.lines().count(), a.len() + 2);
        assert!(rendered.contains("[1↑]"));
        assert!(rendered.contains("1↖"));
        assert!(rendered.contains('ε'));
    }

    #[test]
    fn test_render_table_marks_path() {
        let a: Vec<char> = "AB".chars().collect();
        let trace = compute_lcs_with_steps(&a, &a).unwrap();
        let last = trace.backtrack_steps.last().unwrap();

        let rendered = render_table(last, &a, &a);
        assert!(rendered.contains("*2↖"));
        assert!(rendered.contains("*1↖"));
        assert!(rendered.contains("[0]"));
    }

    #[test]
    fn test_render_table_tie_arrow() {
        let a: Vec<char> = "A".chars().collect();
        let b: Vec<char> = "B".chars().collect();
        let trace = compute_lcs_with_steps(&a, &b).unwrap();
        let complete = trace.fill_steps.last().unwrap();

        let rendered = render_table(complete, &a, &b);
        assert!(rendered.contains("0⇖"));
        assert!(!rendered.contains('↘'));
    }

    #[test]
    fn test_format_step() {
        let a: Vec<char> = "A".chars().collect();
        let trace = compute_lcs_with_steps(&a, &a).unwrap();
        let text = format_step(&trace.fill_steps[1], 1, 3);
        assert!(text.starts_with("Step 2/3 (compute) at [1,1]"));
        assert!(text.contains("MATCH"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 12), "short");
        assert_eq!(truncate_text("a much longer line", 8), "a muc...");
    }
}
