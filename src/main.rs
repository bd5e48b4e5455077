//! LCS Align command-line tool
//!
//! Compares two texts with one of five alignment algorithms and narrates the
//! LCS dynamic-programming computation step by step.

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

mod align;
mod compare;
mod distance;
mod models;
mod output;
mod preprocess;
mod steps;
mod table;

use compare::{compare_texts, resolve_inputs};
use models::{Algorithm, CompareParams, PreprocessOptions, Step, Token};
use output::{
    format_step, print_positions, print_summary, render_table, write_csv_file, write_json_file,
    write_steps_json_file, write_text_report_file,
};
use preprocess::{Tokens, PRESETS};
use steps::compute_lcs_with_steps_with_limit;

#[derive(Parser)]
#[command(name = "lcs-align")]
#[command(about = "Align two texts and visualize the LCS dynamic-programming table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for comparison reports
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON report
    Json,
    /// One CSV row per aligned position
    Csv,
    /// Plain-text report with legend
    Text,
}

/// Algorithm selection (CLI version, mirrors models::Algorithm)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliAlgorithm {
    /// Longest common subsequence (default)
    Lcs,
    /// Levenshtein edit distance
    Levenshtein,
    /// Hamming distance
    Hamming,
    /// Longest common substring
    Substring,
    /// Position-by-position comparison
    CharCompare,
}

impl From<CliAlgorithm> for Algorithm {
    fn from(algorithm: CliAlgorithm) -> Self {
        match algorithm {
            CliAlgorithm::Lcs => Algorithm::Lcs,
            CliAlgorithm::Levenshtein => Algorithm::Levenshtein,
            CliAlgorithm::Hamming => Algorithm::Hamming,
            CliAlgorithm::Substring => Algorithm::Substring,
            CliAlgorithm::CharCompare => Algorithm::CharCompare,
        }
    }
}

/// Which phase of the LCS computation to narrate
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Phase {
    /// Table filling only
    Fill,
    /// Backtracking only
    Backtrack,
    /// Both phases
    Both,
}

/// Playback speed
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Speed {
    /// 1000 ms per step
    Slow,
    /// 500 ms per step
    Normal,
    /// 200 ms per step
    Fast,
}

impl Speed {
    fn delay(self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(1000),
            Speed::Normal => Duration::from_millis(500),
            Speed::Fast => Duration::from_millis(200),
        }
    }
}

/// Where the two inputs come from
#[derive(Args)]
struct InputArgs {
    /// First text
    #[arg(long)]
    first: Option<String>,

    /// Second text
    #[arg(long)]
    second: Option<String>,

    /// Read the first text from a file
    #[arg(long)]
    first_file: Option<PathBuf>,

    /// Read the second text from a file
    #[arg(long)]
    second_file: Option<PathBuf>,

    /// Use a built-in example (see `presets`)
    #[arg(long)]
    preset: Option<String>,
}

impl InputArgs {
    fn resolve(self) -> Result<(String, String), models::AlignError> {
        resolve_inputs(
            self.first,
            self.first_file.as_deref(),
            self.second,
            self.second_file.as_deref(),
            self.preset.as_deref(),
        )
    }
}

/// Text normalization applied before comparing
#[derive(Args)]
struct PreprocessArgs {
    /// Lowercase both inputs
    #[arg(long)]
    ignore_case: bool,

    /// Drop whitespace (trim each line in line mode)
    #[arg(long)]
    ignore_whitespace: bool,

    /// Drop ASCII punctuation
    #[arg(long)]
    ignore_punctuation: bool,

    /// Drop ASCII digits
    #[arg(long)]
    ignore_numbers: bool,

    /// Collapse whitespace runs to a single space
    #[arg(long)]
    collapse_whitespace: bool,

    /// Treat each line as one unit
    #[arg(long)]
    line_by_line: bool,
}

impl From<PreprocessArgs> for PreprocessOptions {
    fn from(args: PreprocessArgs) -> Self {
        PreprocessOptions {
            ignore_case: args.ignore_case,
            ignore_whitespace: args.ignore_whitespace,
            ignore_punctuation: args.ignore_punctuation,
            ignore_numbers: args.ignore_numbers,
            collapse_whitespace: args.collapse_whitespace,
            line_by_line: args.line_by_line,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two texts
    ///
    /// Parameters default to CompareParams::default(); override any of them
    /// explicitly.
    Compare {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        preprocess: PreprocessArgs,

        /// Algorithm [default: lcs]
        #[arg(long, value_enum)]
        algorithm: Option<CliAlgorithm>,

        /// Fail on unequal lengths instead of truncating (Hamming only)
        #[arg(long)]
        no_truncate: bool,

        /// Ceiling on DP table cells [default: 100000000]
        #[arg(long)]
        max_cells: Option<usize>,

        /// Output file path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,

        /// Print first N aligned positions to console
        #[arg(long)]
        show_positions: Option<usize>,
    },

    /// Narrate the LCS table fill and backtrack step by step
    Visualize {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        preprocess: PreprocessArgs,

        /// Phase to narrate
        #[arg(long, value_enum, default_value = "both")]
        phase: Phase,

        /// Animate the steps with a delay between them
        #[arg(long)]
        play: bool,

        /// Playback speed
        #[arg(long, value_enum, default_value = "normal")]
        speed: Speed,

        /// Write the full step trace as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Ceiling on m*n for step recording [default: 2500]
        #[arg(long)]
        max_step_cells: Option<usize>,

        /// Omit the DP table under each step
        #[arg(long)]
        no_tables: bool,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// List built-in example inputs
    Presets,

    /// Benchmark the alignment algorithms
    Benchmark {
        /// Number of iterations per algorithm
        #[arg(long, default_value = "100")]
        iterations: usize,

        /// Sequence size
        #[arg(long, default_value = "500")]
        size: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            inputs,
            preprocess,
            algorithm,
            no_truncate,
            max_cells,
            output,
            format,
            quiet,
            show_positions,
        } => {
            let (first, second) = inputs.resolve()?;

            // Start with library defaults
            let defaults = CompareParams::default();

            // Build params by overlaying user-specified values onto defaults
            let params = CompareParams {
                algorithm: algorithm.map(Algorithm::from).unwrap_or(defaults.algorithm),
                preprocess: preprocess.into(),
                hamming_truncate: !no_truncate && defaults.hamming_truncate,
                max_cells: max_cells.unwrap_or(defaults.max_cells),
                max_step_cells: defaults.max_step_cells,
            };

            let report = compare_texts(&first, &second, &params, !quiet)?;

            if let Some(path) = &output {
                match format {
                    OutputFormat::Json => write_json_file(&report, path)?,
                    OutputFormat::Csv => write_csv_file(&report, path)?,
                    OutputFormat::Text => write_text_report_file(&report, path)?,
                }
            }

            if !quiet {
                print_summary(&report);
                if let Some(path) = &output {
                    eprintln!("\nOutput: {}", path.display());
                }
            }

            if let Some(limit) = show_positions {
                println!("\n=== Positions ===");
                print_positions(&report.positions, Some(limit));
            }
        }

        Commands::Visualize {
            inputs,
            preprocess,
            phase,
            play,
            speed,
            output,
            max_step_cells,
            no_tables,
            quiet,
        } => {
            let (first, second) = inputs.resolve()?;
            let options: PreprocessOptions = preprocess.into();
            let settings = Playback {
                phase,
                delay: play.then(|| speed.delay()),
                output,
                max_step_cells: max_step_cells.unwrap_or(CompareParams::default().max_step_cells),
                show_tables: !no_tables,
                quiet,
            };

            match crate::preprocess::preprocess(&first, &second, &options) {
                Tokens::Lines(a, b) => run_visualization(&a, &b, &settings)?,
                Tokens::Chars(a, b) => run_visualization(&a, &b, &settings)?,
            }
        }

        Commands::Presets => {
            println!("=== Presets ===");
            for preset in &PRESETS {
                println!("{}:", preset.name);
                println!("  String 1: {}", preset.first);
                println!("  String 2: {}", preset.second);
            }
        }

        Commands::Benchmark { iterations, size } => {
            run_benchmark(iterations, size);
        }
    }

    Ok(())
}

/// Visualization settings resolved from the command line.
struct Playback {
    phase: Phase,
    delay: Option<Duration>,
    output: Option<PathBuf>,
    max_step_cells: usize,
    show_tables: bool,
    quiet: bool,
}

/// Record the LCS steps for `a` and `b`, then narrate or animate them.
fn run_visualization<T: Token + Serialize>(
    a: &[T],
    b: &[T],
    settings: &Playback,
) -> Result<(), Box<dyn std::error::Error>> {
    if !settings.quiet {
        eprintln!("Recording steps for {} x {} units...", a.len(), b.len());
    }
    let trace = compute_lcs_with_steps_with_limit(a, b, settings.max_step_cells)?;

    if let Some(path) = &settings.output {
        write_steps_json_file(&trace, path)?;
        if !settings.quiet {
            eprintln!("Step trace: {}", path.display());
        }
    }

    let mut selected: Vec<&Step<T>> = Vec::new();
    if settings.phase != Phase::Backtrack {
        selected.extend(&trace.fill_steps);
    }
    if settings.phase != Phase::Fill {
        selected.extend(&trace.backtrack_steps);
    }
    let total = selected.len();

    let render = |index: usize, step: &Step<T>| {
        let mut text = format_step(step, index, total);
        if settings.show_tables {
            text.push_str("\n\n");
            text.push_str(&render_table(step, a, b));
        }
        text.push('\n');
        text
    };

    match settings.delay {
        Some(delay) => {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] step {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            for (index, &step) in selected.iter().enumerate() {
                pb.println(render(index, step));
                pb.inc(1);
                thread::sleep(delay);
            }
            pb.finish_with_message("done");
        }
        None => {
            for (index, &step) in selected.iter().enumerate() {
                println!("{}", render(index, step));
            }
        }
    }

    println!("=== Result ===");
    println!("LCS length: {}", trace.final_score);
    println!("String 1: {}", trace.final_alignment.first_text());
    println!("String 2: {}", trace.final_alignment.second_text());

    Ok(())
}

/// Run alignment benchmark to measure performance.
fn run_benchmark(iterations: usize, size: usize) {
    use std::time::Instant;

    println!("=== Alignment Benchmark ===");
    println!("Iterations: {}", iterations);
    println!("Sequence size: {}", size);

    // 70% of positions shared, as in typical near-duplicate text
    let seq_a: Vec<char> = (0..size)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let seq_b: Vec<char> = seq_a
        .iter()
        .enumerate()
        .map(|(i, &c)| if i % 10 < 7 { c } else { '#' })
        .collect();

    for algorithm in Algorithm::ALL {
        let params = CompareParams {
            algorithm,
            ..Default::default()
        };

        println!("\n{}:", algorithm.label());
        let start = Instant::now();
        for _ in 0..iterations {
            let _ = run_once(&seq_a, &seq_b, &params);
        }
        let elapsed = start.elapsed();
        let per_run = elapsed.as_secs_f64() / iterations.max(1) as f64;
        println!("  Total time: {:.3}s", elapsed.as_secs_f64());
        println!("  Per comparison: {:.3}ms", per_run * 1000.0);
        if per_run > 0.0 {
            println!("  Comparisons/sec: {:.0}", 1.0 / per_run);
        }
    }
}

/// One benchmark iteration, without preprocessing or report rendering.
fn run_once(a: &[char], b: &[char], params: &CompareParams) -> Result<usize, models::AlignError> {
    Ok(match params.algorithm {
        Algorithm::Lcs => align::compute_lcs_with_limit(a, b, params.max_cells)?.match_count(),
        Algorithm::Levenshtein => {
            align::compute_levenshtein_with_limit(a, b, params.max_cells)?.distance
        }
        Algorithm::Hamming => distance::compute_hamming(a, b, params.hamming_truncate)?.distance,
        Algorithm::Substring => {
            distance::compute_longest_common_substring_with_limit(a, b, params.max_cells)?.length
        }
        Algorithm::CharCompare => align::compute_char_by_char(a, b).match_count(),
    })
}
