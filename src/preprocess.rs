//! Text normalization and tokenization.
//!
//! Raw input text becomes either a sequence of characters or, in line-by-line
//! mode, a sequence of whole lines that the algorithms treat as atomic units.

use crate::models::PreprocessOptions;

/// A named pair of example inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub first: &'static str,
    pub second: &'static str,
}

/// Built-in example inputs.
pub const PRESETS: [Preset; 4] = [
    Preset {
        name: "dna",
        first: "AGGTAB",
        second: "GXTXAYB",
    },
    Preset {
        name: "code",
        first: "function calculateSum(a, b) { return a + b; }",
        second: "function computeSum(x, y) { return x + y; }",
    },
    Preset {
        name: "natural",
        first: "The quick brown fox jumps over the lazy dog",
        second: "The lazy dog was jumped over by a quick brown fox",
    },
    Preset {
        name: "short",
        first: "ABCDEF",
        second: "ACDEBF",
    },
];

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Both inputs after preprocessing, tokenized in the same mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokens {
    Chars(Vec<char>, Vec<char>),
    Lines(Vec<String>, Vec<String>),
}

impl Tokens {
    /// Unit counts of the first and second input.
    pub fn lens(&self) -> (usize, usize) {
        match self {
            Tokens::Chars(a, b) => (a.len(), b.len()),
            Tokens::Lines(a, b) => (a.len(), b.len()),
        }
    }
}

/// Normalize both texts and split them into units.
///
/// Character mode applies, in order: lowercase, drop all whitespace, drop
/// ASCII punctuation, drop ASCII digits, collapse whitespace runs and trim.
/// Line mode splits on `\n` (a preceding `\r` is dropped) and applies to each
/// line: lowercase, trim, drop punctuation, drop digits, collapse whitespace
/// runs without trimming.
pub fn preprocess(first: &str, second: &str, options: &PreprocessOptions) -> Tokens {
    if options.line_by_line {
        Tokens::Lines(line_units(first, options), line_units(second, options))
    } else {
        Tokens::Chars(char_units(first, options), char_units(second, options))
    }
}

/// Character-mode units of `text`, ignoring `line_by_line`.
pub fn char_units(text: &str, options: &PreprocessOptions) -> Vec<char> {
    normalize_chars(text, options).chars().collect()
}

/// Line-mode units of `text`, ignoring `line_by_line`.
pub fn line_units(text: &str, options: &PreprocessOptions) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| normalize_line(line, options))
        .collect()
}

fn normalize_chars(text: &str, options: &PreprocessOptions) -> String {
    let mut processed = if options.ignore_case {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    if options.ignore_whitespace {
        processed.retain(|c| !c.is_whitespace());
    }
    strip_classes(&mut processed, options);
    if options.collapse_whitespace {
        processed = collapse_whitespace(&processed).trim().to_string();
    }

    processed
}

fn normalize_line(line: &str, options: &PreprocessOptions) -> String {
    let mut processed = if options.ignore_case {
        line.to_lowercase()
    } else {
        line.to_string()
    };

    if options.ignore_whitespace {
        processed = processed.trim().to_string();
    }
    strip_classes(&mut processed, options);
    if options.collapse_whitespace {
        processed = collapse_whitespace(&processed);
    }

    processed
}

fn strip_classes(text: &mut String, options: &PreprocessOptions) {
    if options.ignore_punctuation {
        text.retain(|c| !c.is_ascii_punctuation());
    }
    if options.ignore_numbers {
        text.retain(|c| !c.is_ascii_digit());
    }
}

/// Replace every run of whitespace with a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars_of(text: &str, options: &PreprocessOptions) -> String {
        char_units(text, options).into_iter().collect()
    }

    fn lines_of(text: &str, options: &PreprocessOptions) -> Vec<String> {
        line_units(text, options)
    }

    #[test]
    fn test_default_is_identity() {
        let text = "Hello,  World 42!";
        let result = chars_of(text, &PreprocessOptions::default());
        assert_eq!(result, text);
    }

    #[test]
    fn test_ignore_case_and_whitespace() {
        let options = PreprocessOptions {
            ignore_case: true,
            ignore_whitespace: true,
            ..Default::default()
        };
        assert_eq!(chars_of("The Quick\tFox\n", &options), "thequickfox");
    }

    #[test]
    fn test_ignore_punctuation_and_numbers() {
        let options = PreprocessOptions {
            ignore_punctuation: true,
            ignore_numbers: true,
            ..Default::default()
        };
        assert_eq!(
            chars_of("sum(a1, b2) = {c3};", &options),
            "suma b  c"
        );
    }

    #[test]
    fn test_collapse_whitespace_trims_in_char_mode() {
        let options = PreprocessOptions {
            collapse_whitespace: true,
            ..Default::default()
        };
        assert_eq!(chars_of("  a   b \t c  ", &options), "a b c");
    }

    #[test]
    fn test_unicode_units() {
        let tokens = preprocess("café", "cafe", &PreprocessOptions::default());
        assert_eq!(tokens.lens(), (4, 4));
    }

    #[test]
    fn test_line_mode_splits_lines() {
        let options = PreprocessOptions {
            line_by_line: true,
            ..Default::default()
        };
        let lines = lines_of("one\r\ntwo\nthree", &options);
        assert_eq!(lines, vec!["one", "two", "three"]);

        // a trailing newline yields an empty last line
        let lines = lines_of("one\n", &options);
        assert_eq!(lines, vec!["one", ""]);
    }

    #[test]
    fn test_line_mode_normalizes_each_line() {
        let options = PreprocessOptions {
            line_by_line: true,
            ignore_case: true,
            ignore_whitespace: true,
            collapse_whitespace: true,
            ..Default::default()
        };
        let lines = lines_of("  Let X  =  1;\n\tRETURN x ", &options);
        assert_eq!(lines, vec!["let x = 1;", "return x"]);
    }

    #[test]
    fn test_line_mode_collapse_keeps_edges() {
        let options = PreprocessOptions {
            line_by_line: true,
            collapse_whitespace: true,
            ..Default::default()
        };
        let lines = lines_of("   indented   line", &options);
        assert_eq!(lines, vec![" indented line"]);
    }

    #[test]
    fn test_pair_follows_line_mode() {
        let mut options = PreprocessOptions::default();
        let tokens = preprocess("ab\ncd", "ab", &options);
        assert!(matches!(tokens, Tokens::Chars(..)));
        assert_eq!(tokens.lens(), (5, 2));

        options.line_by_line = true;
        let tokens = preprocess("ab\ncd", "ab", &options);
        assert_eq!(
            tokens,
            Tokens::Lines(vec!["ab".into(), "cd".into()], vec!["ab".into()])
        );
    }

    #[test]
    fn test_presets() {
        let dna = preset("dna").unwrap();
        assert_eq!(dna.first, "AGGTAB");
        assert_eq!(dna.second, "GXTXAYB");
        assert_eq!(preset("short").unwrap().second, "ACDEBF");
        assert!(preset("protein").is_none());
        assert_eq!(PRESETS.len(), 4);
    }
}
