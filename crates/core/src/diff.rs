//! LCS-based token diffing.
//!
//! Two token sequences are aligned with the classic longest-common-subsequence
//! dynamic program and the alignment is reported as an ordered list of
//! [`DiffOp`]s. All bookkeeping (symbol table, DP table) lives for a single
//! call only.
//!
//! # Example
//!
//! ```rust
//! use rendergap_core::diff::{DiffOp, diff_tokens};
//! use rendergap_core::TokenMode;
//!
//! let ops = diff_tokens("the cat sat", "the black cat sat", TokenMode::Word);
//! assert_eq!(ops[1], DiffOp::Add("black".to_string()));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenize::{TokenMode, tokenize};

/// DP tables larger than this many cells are still computed, but logged.
pub const SOFT_CELL_LIMIT: usize = 50_000_000;

/// Kind of a diff operation, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Same,
    Add,
    Delete,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Same => f.write_str("same"),
            DiffKind::Add => f.write_str("add"),
            DiffKind::Delete => f.write_str("delete"),
        }
    }
}

/// A single aligned token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum DiffOp {
    /// Token present in both sequences at its aligned position.
    Same(String),
    /// Token present only in the second (final) sequence.
    Add(String),
    /// Token present only in the first (initial) sequence.
    Delete(String),
}

impl DiffOp {
    pub fn kind(&self) -> DiffKind {
        match self {
            DiffOp::Same(_) => DiffKind::Same,
            DiffOp::Add(_) => DiffKind::Add,
            DiffOp::Delete(_) => DiffKind::Delete,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DiffOp::Same(text) | DiffOp::Add(text) | DiffOp::Delete(text) => text,
        }
    }
}

/// Tallies of a diff, without the operations themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffStats {
    pub same: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    /// Count operation kinds in `operations`.
    pub fn from_operations(operations: &[DiffOp]) -> Self {
        operations.iter().fold(Self::default(), |mut stats, op| {
            match op.kind() {
                DiffKind::Same => stats.same += 1,
                DiffKind::Add => stats.added += 1,
                DiffKind::Delete => stats.removed += 1,
            }
            stats
        })
    }

    /// Tallies implied by an LCS of length `lcs` between sequences of
    /// `initial_len` and `rendered_len` tokens; no operation list needed.
    pub fn from_lcs(lcs: usize, initial_len: usize, rendered_len: usize) -> Self {
        Self {
            same: lcs,
            added: rendered_len.saturating_sub(lcs),
            removed: initial_len.saturating_sub(lcs),
        }
    }

    /// Human-readable one-liner, e.g. `Added: 3 • Removed: 1 • Same: 12`.
    pub fn summary(&self) -> String {
        format!("Added: {} • Removed: {} • Same: {}", self.added, self.removed, self.same)
    }
}

/// Aggregate view over a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Ordered alignment operations.
    pub operations: Vec<DiffOp>,
    /// Number of `Same` operations.
    pub same: usize,
    /// Number of `Add` operations.
    pub added: usize,
    /// Number of `Delete` operations.
    pub removed: usize,
    /// `Added: A • Removed: R • Same: S`
    pub summary: String,
    /// Token count of the initial text.
    pub total_initial: usize,
    /// Token count of the final text.
    pub total_final: usize,
}

impl DiffReport {
    pub fn stats(&self) -> DiffStats {
        DiffStats { same: self.same, added: self.added, removed: self.removed }
    }
}

/// Per-comparison mapping from token text to a dense integer id.
///
/// Built fresh for every comparison and dropped with it.
struct SymbolTable<'a> {
    ids: HashMap<&'a str, u32>,
}

impl<'a> SymbolTable<'a> {
    fn new() -> Self {
        Self { ids: HashMap::new() }
    }

    fn intern(&mut self, token: &'a str) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(token).or_insert(next)
    }

    fn encode<S: AsRef<str>>(&mut self, tokens: &'a [S]) -> Vec<u32> {
        tokens.iter().map(|t| self.intern(t.as_ref())).collect()
    }
}

/// Full `(m + 1) x (n + 1)` LCS length table, stored row-major.
struct LcsTable {
    cells: Vec<u32>,
    width: usize,
}

impl LcsTable {
    fn build(a: &[u32], b: &[u32]) -> Self {
        let width = b.len() + 1;
        let cell_count = (a.len() + 1) * width;
        if cell_count > SOFT_CELL_LIMIT {
            tracing::warn!(
                initial = a.len(),
                rendered = b.len(),
                cells = cell_count,
                "diff table exceeds soft limit; consider truncating input"
            );
        }

        let mut cells = vec![0u32; cell_count];
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                cells[i * width + j] = if a[i - 1] == b[j - 1] {
                    cells[(i - 1) * width + (j - 1)] + 1
                } else {
                    cells[(i - 1) * width + j].max(cells[i * width + (j - 1)])
                };
            }
        }

        Self { cells, width }
    }

    fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.width + j]
    }
}

/// Align two already tokenized sequences.
///
/// On ties the backtrace steps toward a `Delete` before an `Add`, which makes
/// the operation order fully deterministic.
pub fn diff_sequences<S: AsRef<str>>(initial: &[S], rendered: &[S]) -> Vec<DiffOp> {
    let mut symbols = SymbolTable::new();
    let a = symbols.encode(initial);
    let b = symbols.encode(rendered);
    let table = LcsTable::build(&a, &b);

    let mut operations = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (a.len(), b.len());

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            operations.push(DiffOp::Same(initial[i - 1].as_ref().to_string()));
            i -= 1;
            j -= 1;
        } else if i > 0 && (j == 0 || table.get(i - 1, j) >= table.get(i, j - 1)) {
            operations.push(DiffOp::Delete(initial[i - 1].as_ref().to_string()));
            i -= 1;
        } else {
            operations.push(DiffOp::Add(rendered[j - 1].as_ref().to_string()));
            j -= 1;
        }
    }

    operations.reverse();
    operations
}

/// Length of the longest common subsequence, using two rolling rows.
pub fn lcs_length<S: AsRef<str>>(initial: &[S], rendered: &[S]) -> usize {
    let mut symbols = SymbolTable::new();
    let a = symbols.encode(initial);
    let b = symbols.encode(rendered);
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for x in long.iter() {
        for (j, y) in short.iter().enumerate() {
            curr[j + 1] = if x == y { prev[j] + 1 } else { prev[j + 1].max(curr[j]) };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Tokenize both texts and align them.
pub fn diff_tokens(text1: &str, text2: &str, mode: TokenMode) -> Vec<DiffOp> {
    let initial = tokenize(text1, mode);
    let rendered = tokenize(text2, mode);
    diff_sequences(&initial, &rendered)
}

/// Diff two texts and tally the result.
pub fn generate_diff_report(text1: &str, text2: &str, mode: TokenMode) -> DiffReport {
    let initial = tokenize(text1, mode);
    let rendered = tokenize(text2, mode);
    let operations = diff_sequences(&initial, &rendered);
    let stats = DiffStats::from_operations(&operations);

    tracing::debug!(
        %mode,
        initial = initial.len(),
        rendered = rendered.len(),
        same = stats.same,
        added = stats.added,
        removed = stats.removed,
        "diff report generated"
    );

    DiffReport {
        operations,
        same: stats.same,
        added: stats.added,
        removed: stats.removed,
        summary: stats.summary(),
        total_initial: initial.len(),
        total_final: rendered.len(),
    }
}

/// Similarity on a 0–100 scale from an LCS length and the two sequence lengths.
///
/// An LCS covering both sequences means they are identical (this includes two
/// empty sequences) and scores 100; an empty LCS scores 0. Otherwise the score
/// is `2 * lcs / (initial + rendered) * 100`, rounded to one decimal.
pub fn similarity_from_lcs(lcs: usize, initial_len: usize, rendered_len: usize) -> f64 {
    if lcs == initial_len && lcs == rendered_len {
        return 100.0;
    }
    if lcs == 0 {
        return 0.0;
    }

    let ratio = 2.0 * lcs as f64 / (initial_len + rendered_len) as f64;
    ((ratio * 100.0 * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

/// Similarity of two token sequences. Symmetric in its arguments.
pub fn sequence_similarity<S: AsRef<str>>(initial: &[S], rendered: &[S]) -> f64 {
    similarity_from_lcs(lcs_length(initial, rendered), initial.len(), rendered.len())
}

/// Tokenize both texts and compute their similarity.
///
/// # Example
///
/// ```rust
/// use rendergap_core::{TokenMode, calculate_similarity};
///
/// assert_eq!(calculate_similarity("Hello world", "Hello world", TokenMode::Word), 100.0);
/// assert_eq!(calculate_similarity("Hello world", "Goodbye universe", TokenMode::Word), 0.0);
/// ```
pub fn calculate_similarity(text1: &str, text2: &str, mode: TokenMode) -> f64 {
    sequence_similarity(&tokenize(text1, mode), &tokenize(text2, mode))
}
