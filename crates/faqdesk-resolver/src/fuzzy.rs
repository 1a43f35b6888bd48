// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partial-ratio string similarity.
//!
//! The shorter string is aligned against every window of the longer one and
//! the best Indel similarity wins, so a short query that appears (nearly)
//! verbatim inside a long question scores close to 100. Windows are the
//! full-length slides plus the partial prefix and suffix overhangs at both
//! ends. Scores are in `0.0..=100.0`.

use std::collections::HashSet;

/// Partial-ratio similarity of `a` and `b`, in `0.0..=100.0`.
///
/// Two empty strings score 100; one empty string scores 0. When both have
/// the same length, both alignment directions are tried.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 100.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    if a.len() < b.len() {
        best_alignment(&a, &b)
    } else if a.len() > b.len() {
        best_alignment(&b, &a)
    } else {
        let forward = best_alignment(&a, &b);
        if forward >= 100.0 {
            forward
        } else {
            forward.max(best_alignment(&b, &a))
        }
    }
}

/// Best score of `short` against the windows of `long` (`short.len() <= long.len()`).
fn best_alignment(short: &[char], long: &[char]) -> f64 {
    let m = short.len();
    let n = long.len();
    let in_short: HashSet<char> = short.iter().copied().collect();

    // Windows that neither start nor end on a shared character cannot beat
    // their neighbours, so only aligned ones are scored.
    let prefixes = (1..m)
        .filter(|&i| in_short.contains(&long[i - 1]))
        .map(|i| &long[..i]);
    let full = (0..=n - m)
        .filter(|&start| in_short.contains(&long[start + m - 1]))
        .map(|start| &long[start..start + m]);
    let suffixes = (n - m + 1..n)
        .filter(|&start| in_short.contains(&long[start]))
        .map(|start| &long[start..]);

    let mut best = 0.0_f64;
    for window in prefixes.chain(full).chain(suffixes) {
        let score = indel_ratio(short, window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Indel similarity: `200 * LCS / (|a| + |b|)`.
fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Length of the longest common subsequence, single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}
