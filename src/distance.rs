//! Hamming distance and longest common substring.

use crate::models::{AlignCode, AlignError, Alignment, HammingResult, SubstringResult, Token};
use crate::table::{check_table_size, ScoreTable, DEFAULT_MAX_CELLS};

/// Hamming distance between two sequences.
///
/// With `truncate` set, unequal inputs are cut to the shorter length and the
/// result records the original lengths. Without it, unequal inputs fail with
/// `LengthMismatch`.
pub fn compute_hamming<T: Token>(
    a: &[T],
    b: &[T],
    truncate: bool,
) -> Result<HammingResult<T>, AlignError> {
    let original_lengths = (a.len(), b.len());
    let mut truncated = false;
    let mut truncated_length = 0;

    let len = if a.len() != b.len() {
        if !truncate {
            return Err(AlignError::LengthMismatch {
                first: a.len(),
                second: b.len(),
            });
        }
        truncated = true;
        truncated_length = a.len().min(b.len());
        truncated_length
    } else {
        a.len()
    };

    let mut alignment = Alignment::with_capacity(len);
    let mut distance = 0;
    for (x, y) in a[..len].iter().zip(&b[..len]) {
        if x == y {
            alignment.push(Some(x.clone()), Some(y.clone()), AlignCode::Match);
        } else {
            alignment.push(Some(x.clone()), Some(y.clone()), AlignCode::Mismatch);
            distance += 1;
        }
    }

    let similarity = if len > 0 {
        (len - distance) as f64 / len as f64 * 100.0
    } else {
        100.0
    };

    Ok(HammingResult {
        alignment,
        distance,
        similarity,
        truncated,
        truncated_length,
        original_lengths,
    })
}

/// Longest common contiguous run of units.
pub fn compute_longest_common_substring<T: Token>(
    a: &[T],
    b: &[T],
) -> Result<SubstringResult<T>, AlignError> {
    compute_longest_common_substring_with_limit(a, b, DEFAULT_MAX_CELLS)
}

/// Longest common substring with an explicit table-size ceiling.
///
/// The first run reaching the maximum length in row-major order wins. Each
/// input gets its own code vector: `SubstringMarker` inside the run,
/// `Mismatch` elsewhere.
pub fn compute_longest_common_substring_with_limit<T: Token>(
    a: &[T],
    b: &[T],
    max_cells: usize,
) -> Result<SubstringResult<T>, AlignError> {
    check_table_size(a.len(), b.len(), max_cells)?;
    let m = a.len();
    let n = b.len();
    let mut dp = ScoreTable::new(m + 1, n + 1);

    let mut max_len = 0u32;
    let mut end_a = 0usize;
    let mut end_b = 0usize;

    for i in 1..=m {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                let run = dp.get(i - 1, j - 1) + 1;
                dp.set(i, j, run);
                if run > max_len {
                    max_len = run;
                    end_a = i;
                    end_b = j;
                }
            }
        }
    }

    let length = max_len as usize;
    let start_in_a = end_a - length;
    let start_in_b = end_b - length;

    let span_codes = |len: usize, start: usize| -> Vec<AlignCode> {
        (0..len)
            .map(|k| {
                if k >= start && k < start + length {
                    AlignCode::SubstringMarker
                } else {
                    AlignCode::Mismatch
                }
            })
            .collect()
    };

    let similarity = if length > 0 {
        length as f64 / m.max(n) as f64 * 100.0
    } else {
        0.0
    };

    Ok(SubstringResult {
        codes_a: span_codes(m, start_in_a),
        codes_b: span_codes(n, start_in_b),
        substring: a[start_in_a..end_a].to_vec(),
        start_in_a,
        start_in_b,
        length,
        similarity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_hamming_equal_lengths() {
        let result = compute_hamming(&chars("karolin"), &chars("kathrin"), false).unwrap();
        assert_eq!(result.distance, 3);
        assert!(!result.truncated);
        assert_eq!(result.truncated_length, 0);
        assert!((result.similarity - 4.0 / 7.0 * 100.0).abs() < 1e-9);
        assert_eq!(result.alignment.first_text(), "karolin");
        assert_eq!(result.alignment.second_text(), "kathrin");
    }

    #[test]
    fn test_hamming_truncates() {
        let result = compute_hamming(&chars("abcdef"), &chars("abx"), true).unwrap();
        assert!(result.truncated);
        assert_eq!(result.truncated_length, 3);
        assert_eq!(result.original_lengths, (6, 3));
        assert_eq!(result.distance, 1);
        assert_eq!(result.alignment.len(), 3);
    }

    #[test]
    fn test_hamming_length_mismatch() {
        let result = compute_hamming(&chars("abc"), &chars("ab"), false);
        assert!(matches!(
            result,
            Err(AlignError::LengthMismatch { first: 3, second: 2 })
        ));

        // truncation never fails
        assert!(compute_hamming(&chars("abc"), &chars(""), true).is_ok());
    }

    #[test]
    fn test_hamming_empty() {
        let empty: Vec<char> = Vec::new();
        let result = compute_hamming(&empty, &empty, false).unwrap();
        assert_eq!(result.distance, 0);
        assert_eq!(result.similarity, 100.0);
    }

    #[test]
    fn test_substring_offsets() {
        let a = chars("ABABC");
        let b = chars("BABCA");
        let result = compute_longest_common_substring(&a, &b).unwrap();

        assert_eq!(result.substring, chars("BABC"));
        assert_eq!(result.length, 4);
        assert_eq!(result.start_in_a, 1);
        assert_eq!(result.start_in_b, 0);
        assert_eq!(&a[result.start_in_a..result.start_in_a + 4], &result.substring[..]);
        assert_eq!(&b[result.start_in_b..result.start_in_b + 4], &result.substring[..]);
        assert!((result.similarity - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_substring_codes_per_input() {
        let result = compute_longest_common_substring(&chars("abcdxyz"), &chars("xyzabcd")).unwrap();
        assert_eq!(result.substring, chars("abcd"));
        assert_eq!(result.start_in_a, 0);
        assert_eq!(result.start_in_b, 3);

        let marker = AlignCode::SubstringMarker;
        let other = AlignCode::Mismatch;
        assert_eq!(result.codes_a, vec![marker, marker, marker, marker, other, other, other]);
        assert_eq!(result.codes_b, vec![other, other, other, marker, marker, marker, marker]);
    }

    #[test]
    fn test_substring_none_found() {
        let result = compute_longest_common_substring(&chars("abc"), &chars("xyz")).unwrap();
        assert!(result.substring.is_empty());
        assert_eq!(result.length, 0);
        assert_eq!(result.similarity, 0.0);
        assert!(result.codes_a.iter().all(|&c| c == AlignCode::Mismatch));

        let empty: Vec<char> = Vec::new();
        let result = compute_longest_common_substring(&empty, &empty).unwrap();
        assert_eq!(result.length, 0);
        assert!(result.codes_a.is_empty());
    }

    #[test]
    fn test_substring_first_maximum_wins() {
        let result = compute_longest_common_substring(&chars("hello world"), &chars("yellow")).unwrap();
        assert_eq!(result.substring, chars("ello"));
        assert_eq!(result.start_in_a, 1);
        assert_eq!(result.start_in_b, 1);
    }

    #[test]
    fn test_substring_resource_ceiling() {
        let result = compute_longest_common_substring_with_limit(&chars("ab"), &chars("ab"), 8);
        assert!(matches!(result, Err(AlignError::ResourceExhaustion { .. })));
    }
}
