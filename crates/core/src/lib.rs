//! Rendering-gap analysis: how much of a page's rendered text is already
//! present in the HTML a crawler receives.
//!
//! The engine tokenizes two texts, aligns them with a longest-common-subsequence
//! diff, and derives content metrics, a weighted visibility score and
//! recommendations. The [`Auditor`] facade adds an HTML visible-text filter in
//! front of the engine.
//!
//! # Example
//!
//! ```rust
//! use rendergap_core::{TokenMode, audit_text, calculate_similarity};
//!
//! let report = audit_text("Loading...", "Loading... Our spring catalogue is here");
//! assert!(report.metrics.content_gain > 1.0);
//! assert_eq!(calculate_similarity("a b c", "a b c", TokenMode::Word), 100.0);
//! ```

pub mod audit;
pub mod diff;
pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod formatters;
pub mod metrics;
pub mod recommend;
pub mod score;
pub mod tokenize;

pub use audit::{AuditConfig, AuditConfigBuilder, AuditReport, Auditor, audit_html, audit_text};
pub use diff::{
    DiffKind, DiffOp, DiffReport, DiffStats, calculate_similarity, diff_sequences, diff_tokens, generate_diff_report,
    lcs_length,
};
pub use error::{RendergapError, Result};
pub use extract::{ExtractOptions, extract_visible_text};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, fetch_file, fetch_source, fetch_stdin, fetch_url};
pub use formatters::{
    JsonConfig, JsonFormatter, TextConfig, TextFormatter, format_count, format_percent, generate_html_diff,
    report_to_json, report_to_text, scenarios_to_json, scenarios_to_text,
};
pub use metrics::{
    ContentMetrics, ScenarioComparison, ScenarioResult, WordCount, analyze_both_scenarios, analyze_content_difference,
    analyze_content_difference_with_operations,
};
pub use recommend::{Recommendation, RecommendationKind, RecommendationThresholds, Severity, generate_recommendations};
pub use score::{
    ScoreBreakdown, ScoringPolicy, ScoringPolicyBuilder, VisibilityCategory, VisibilityScore, generate_visibility_score,
    generate_visibility_score_with_policy,
};
pub use tokenize::{TokenMode, count_lines, count_words, normalize_text, tokenize};
