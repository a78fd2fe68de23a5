//! Content-difference metrics.
//!
//! Turns two plain texts (typically the crawler's view of a page and the
//! rendered view) into the numbers used for visibility auditing: content
//! gain, missing words, citation readability and similarity.
//!
//! # Example
//!
//! ```rust
//! use rendergap_core::analyze_content_difference;
//!
//! let metrics = analyze_content_difference("Hello world", "Hello brave new world");
//! assert_eq!(metrics.content_gain, 2.0);
//! assert_eq!(metrics.missing_words, 2);
//! assert_eq!(metrics.citation_readability, 50.0);
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::diff::{DiffOp, DiffStats, diff_sequences, lcs_length, similarity_from_lcs};
use crate::score::{ScoringPolicy, VisibilityScore, generate_visibility_score_with_policy};
use crate::tokenize::{TokenMode, tokenize};

/// Word counts of both sides of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub initial: usize,
    pub rendered: usize,
    /// `rendered - initial`; negative when rendering removes words.
    pub difference: i64,
}

/// Metrics derived from comparing an initial and a rendered text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMetrics {
    /// Rendered word count divided by initial word count (1 when initial is empty).
    pub content_gain: f64,
    /// Absolute difference between the two word counts.
    pub missing_words: usize,
    /// How much of the rendered volume the initial text already carries, 0–100.
    pub citation_readability: f64,
    /// Word-level LCS similarity, 0–100.
    pub similarity: f64,
    pub word_count: WordCount,
    pub word_diff: DiffStats,
    pub line_diff: DiffStats,
}

/// Ratio of rendered to initial token count; `1.0` when there is no initial content.
pub fn content_gain(initial_count: usize, rendered_count: usize) -> f64 {
    if initial_count > 0 { rendered_count as f64 / initial_count as f64 } else { 1.0 }
}

/// Share of the rendered volume that the initial volume represents, capped at 100.
///
/// An empty rendered side leaves nothing to compare against, so the initial
/// side counts as fully visible.
pub fn citation_readability(initial_count: usize, rendered_count: usize) -> f64 {
    if rendered_count == 0 {
        return 100.0;
    }
    (initial_count as f64 / rendered_count as f64 * 100.0).min(100.0)
}

/// Both sides of a comparison at one granularity.
struct TokenPair {
    initial: Vec<String>,
    rendered: Vec<String>,
}

impl TokenPair {
    fn new(initial: &str, rendered: &str, mode: TokenMode) -> Self {
        Self { initial: tokenize(initial, mode), rendered: tokenize(rendered, mode) }
    }

    /// Tallies from the LCS length alone, in linear memory.
    fn stats(&self) -> DiffStats {
        DiffStats::from_lcs(lcs_length(&self.initial, &self.rendered), self.initial.len(), self.rendered.len())
    }

    fn operations(&self) -> Vec<DiffOp> {
        diff_sequences(&self.initial, &self.rendered)
    }
}

/// Compare two plain texts and derive all content metrics.
///
/// Both texts must already be free of markup. No diff table is built, so
/// memory stays linear in the input size.
pub fn analyze_content_difference(initial: &str, rendered: &str) -> ContentMetrics {
    let started = Instant::now();
    let words = TokenPair::new(initial, rendered, TokenMode::Word);
    let lines = TokenPair::new(initial, rendered, TokenMode::Line);

    build_metrics(&words, words.stats(), lines.stats(), started)
}

/// [`analyze_content_difference`] plus the full diff at `mode` granularity.
///
/// Each text is tokenized once; the operations and the matching `*_diff`
/// tallies come from the same alignment.
pub fn analyze_content_difference_with_operations(
    initial: &str, rendered: &str, mode: TokenMode,
) -> (ContentMetrics, Vec<DiffOp>) {
    let started = Instant::now();
    let words = TokenPair::new(initial, rendered, TokenMode::Word);
    let lines = TokenPair::new(initial, rendered, TokenMode::Line);

    let (operations, word_diff, line_diff) = match mode {
        TokenMode::Word => {
            let operations = words.operations();
            let word_diff = DiffStats::from_operations(&operations);
            (operations, word_diff, lines.stats())
        }
        TokenMode::Line => {
            let operations = lines.operations();
            let line_diff = DiffStats::from_operations(&operations);
            (operations, words.stats(), line_diff)
        }
    };

    (build_metrics(&words, word_diff, line_diff, started), operations)
}

fn build_metrics(words: &TokenPair, word_diff: DiffStats, line_diff: DiffStats, started: Instant) -> ContentMetrics {
    let initial_count = words.initial.len();
    let rendered_count = words.rendered.len();

    // `same` is exactly the word-level LCS length.
    let similarity = similarity_from_lcs(word_diff.same, initial_count, rendered_count);

    let metrics = ContentMetrics {
        content_gain: content_gain(initial_count, rendered_count),
        missing_words: initial_count.abs_diff(rendered_count),
        citation_readability: citation_readability(initial_count, rendered_count),
        similarity,
        word_count: WordCount {
            initial: initial_count,
            rendered: rendered_count,
            difference: rendered_count as i64 - initial_count as i64,
        },
        word_diff,
        line_diff,
    };

    tracing::debug!(
        initial_words = initial_count,
        rendered_words = rendered_count,
        similarity = metrics.similarity,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "content difference analyzed"
    );

    metrics
}

/// Metrics and score for one filtering scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub metrics: ContentMetrics,
    pub score: VisibilityScore,
}

impl ScenarioResult {
    pub fn analyze(initial: &str, rendered: &str, policy: &ScoringPolicy) -> Self {
        let metrics = analyze_content_difference(initial, rendered);
        let score = generate_visibility_score_with_policy(&metrics, policy);
        Self { metrics, score }
    }
}

/// Side-by-side results with and without navigation/footer regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub with_navigation: ScenarioResult,
    pub without_navigation: ScenarioResult,
}

/// Run the full analysis twice: once on texts that keep navigation and
/// footer regions, once on texts where they were filtered out upstream.
pub fn analyze_both_scenarios(
    initial_with_nav: &str, initial_without_nav: &str, rendered_with_nav: &str, rendered_without_nav: &str,
) -> ScenarioComparison {
    analyze_both_scenarios_with_policy(
        initial_with_nav,
        initial_without_nav,
        rendered_with_nav,
        rendered_without_nav,
        &ScoringPolicy::default(),
    )
}

/// [`analyze_both_scenarios`] with a custom scoring policy.
pub fn analyze_both_scenarios_with_policy(
    initial_with_nav: &str, initial_without_nav: &str, rendered_with_nav: &str, rendered_without_nav: &str,
    policy: &ScoringPolicy,
) -> ScenarioComparison {
    ScenarioComparison {
        with_navigation: ScenarioResult::analyze(initial_with_nav, rendered_with_nav, policy),
        without_navigation: ScenarioResult::analyze(initial_without_nav, rendered_without_nav, policy),
    }
}
