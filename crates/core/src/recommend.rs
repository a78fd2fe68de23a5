//! Rule-based recommendations over [`ContentMetrics`].
//!
//! Rules are independent: every rule whose condition holds contributes one
//! recommendation, in the order of [`RULES`].

use serde::{Deserialize, Serialize};

use crate::metrics::ContentMetrics;

/// Which rule produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ServerSideRendering,
    HeavyClientSideContent,
    LargeContentGap,
    LowSimilarity,
    GoodVisibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub severity: Severity,
    pub message: String,
}

/// Cutoffs used by the recommendation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    /// Readability below this suggests server-side rendering (default: 50.0).
    pub low_readability: f64,
    /// Gain above this flags heavy client-side loading (default: 3.0).
    pub heavy_gain: f64,
    /// More missing words than this flags a large gap (default: 1000).
    pub large_gap: usize,
    /// Similarity below this flags diverging content (default: 50.0).
    pub low_similarity: f64,
    /// Readability at or above this, together with a small gain, is acknowledged (default: 90.0).
    pub good_readability: f64,
    /// Largest gain still considered small (default: 1.2).
    pub good_max_gain: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            low_readability: 50.0,
            heavy_gain: 3.0,
            large_gap: 1000,
            low_similarity: 50.0,
            good_readability: 90.0,
            good_max_gain: 1.2,
        }
    }
}

struct Rule {
    kind: RecommendationKind,
    severity: Severity,
    applies: fn(&ContentMetrics, &RecommendationThresholds) -> bool,
    message: fn(&ContentMetrics) -> String,
}

/// Rule table, in evaluation order.
const RULES: &[Rule] = &[
    Rule {
        kind: RecommendationKind::ServerSideRendering,
        severity: Severity::Critical,
        applies: |m, t| m.citation_readability < t.low_readability,
        message: |m| {
            format!(
                "Only {:.1}% of the rendered content is present in the initial HTML. \
                 Consider server-side rendering or pre-rendering the main content.",
                m.citation_readability
            )
        },
    },
    Rule {
        kind: RecommendationKind::HeavyClientSideContent,
        severity: Severity::Warning,
        applies: |m, t| m.content_gain > t.heavy_gain,
        message: |m| {
            format!(
                "Rendering multiplies the text by {:.1}x. Most content is loaded client-side; \
                 crawlers that do not execute JavaScript will miss it.",
                m.content_gain
            )
        },
    },
    Rule {
        kind: RecommendationKind::LargeContentGap,
        severity: Severity::Warning,
        applies: |m, t| m.missing_words > t.large_gap,
        message: |m| {
            format!(
                "{} words differ between the initial and rendered content. \
                 Move key copy into the server response.",
                m.missing_words
            )
        },
    },
    Rule {
        kind: RecommendationKind::LowSimilarity,
        severity: Severity::Info,
        applies: |m, t| {
            m.similarity < t.low_similarity && m.word_count.initial > 0 && m.word_count.rendered > 0
        },
        message: |m| {
            format!(
                "The initial and rendered texts are only {:.1}% similar. \
                 Check that the server response is not a placeholder or a different page.",
                m.similarity
            )
        },
    },
    Rule {
        kind: RecommendationKind::GoodVisibility,
        severity: Severity::Positive,
        applies: |m, t| m.citation_readability >= t.good_readability && m.content_gain <= t.good_max_gain,
        message: |_| "Content is visible without JavaScript. No rendering changes needed.".to_string(),
    },
];

/// Recommendations for `metrics` with default thresholds.
pub fn generate_recommendations(metrics: &ContentMetrics) -> Vec<Recommendation> {
    generate_recommendations_with(metrics, &RecommendationThresholds::default())
}

/// Recommendations for `metrics` with custom thresholds.
pub fn generate_recommendations_with(
    metrics: &ContentMetrics, thresholds: &RecommendationThresholds,
) -> Vec<Recommendation> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(metrics, thresholds))
        .map(|rule| Recommendation { kind: rule.kind, severity: rule.severity, message: (rule.message)(metrics) })
        .collect()
}
