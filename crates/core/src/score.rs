//! Visibility scoring.
//!
//! Folds citation readability, similarity and a gain penalty into a single
//! 0–100 score and maps it onto a [`VisibilityCategory`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::ContentMetrics;

/// Weight of citation readability in the composite score.
pub const READABILITY_WEIGHT: f64 = 0.5;
/// Weight of similarity in the composite score.
pub const SIMILARITY_WEIGHT: f64 = 0.3;
/// Weight of normalized content gain in the composite score.
pub const GAIN_WEIGHT: f64 = 0.2;
/// Points deducted from the gain component per unit of gain above 1x.
pub const GAIN_PENALTY_SLOPE: f64 = 50.0;
/// Lowest score in the `excellent` category.
pub const EXCELLENT_THRESHOLD: u8 = 90;
/// Lowest score in the `good` category.
pub const GOOD_THRESHOLD: u8 = 70;
/// Lowest score in the `fair` category.
pub const FAIR_THRESHOLD: u8 = 50;

/// Qualitative visibility band, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityCategory {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl VisibilityCategory {
    pub fn label(&self) -> &'static str {
        match self {
            VisibilityCategory::Poor => "poor",
            VisibilityCategory::Fair => "fair",
            VisibilityCategory::Good => "good",
            VisibilityCategory::Excellent => "excellent",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VisibilityCategory::Excellent => "Excellent - content is almost fully visible before rendering",
            VisibilityCategory::Good => "Good - most content is visible before rendering",
            VisibilityCategory::Fair => "Fair - a significant share of content depends on client-side rendering",
            VisibilityCategory::Poor => "Poor - most content only appears after client-side rendering",
        }
    }
}

impl fmt::Display for VisibilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weights, gain slope and category cutoffs for the composite score.
///
/// # Example
///
/// ```rust
/// use rendergap_core::ScoringPolicy;
///
/// let policy = ScoringPolicy::builder()
///     .readability_weight(0.6)
///     .similarity_weight(0.2)
///     .excellent_threshold(95)
///     .build();
/// assert_eq!(policy.gain_weight, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Weight of citation readability (default: 0.5).
    pub readability_weight: f64,
    /// Weight of similarity (default: 0.3).
    pub similarity_weight: f64,
    /// Weight of normalized gain (default: 0.2).
    pub gain_weight: f64,
    /// Penalty per unit of gain above 1x (default: 50.0).
    pub gain_penalty_slope: f64,
    /// Inclusive lower bound for `excellent` (default: 90).
    pub excellent_threshold: u8,
    /// Inclusive lower bound for `good` (default: 70).
    pub good_threshold: u8,
    /// Inclusive lower bound for `fair` (default: 50).
    pub fair_threshold: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            readability_weight: READABILITY_WEIGHT,
            similarity_weight: SIMILARITY_WEIGHT,
            gain_weight: GAIN_WEIGHT,
            gain_penalty_slope: GAIN_PENALTY_SLOPE,
            excellent_threshold: EXCELLENT_THRESHOLD,
            good_threshold: GOOD_THRESHOLD,
            fair_threshold: FAIR_THRESHOLD,
        }
    }
}

impl ScoringPolicy {
    pub fn builder() -> ScoringPolicyBuilder {
        ScoringPolicyBuilder::new()
    }

    /// Map a content gain ratio onto 0–100: 1x scores 100, each extra unit
    /// of gain costs `gain_penalty_slope` points.
    pub fn normalized_gain(&self, content_gain: f64) -> f64 {
        (100.0 - (content_gain - 1.0) * self.gain_penalty_slope).clamp(0.0, 100.0)
    }

    pub fn categorize(&self, score: u8) -> VisibilityCategory {
        if score >= self.excellent_threshold {
            VisibilityCategory::Excellent
        } else if score >= self.good_threshold {
            VisibilityCategory::Good
        } else if score >= self.fair_threshold {
            VisibilityCategory::Fair
        } else {
            VisibilityCategory::Poor
        }
    }
}

/// Builder for ScoringPolicy.
pub struct ScoringPolicyBuilder {
    policy: ScoringPolicy,
}

impl ScoringPolicyBuilder {
    pub fn new() -> Self {
        Self { policy: ScoringPolicy::default() }
    }

    pub fn readability_weight(mut self, value: f64) -> Self {
        self.policy.readability_weight = value;
        self
    }

    pub fn similarity_weight(mut self, value: f64) -> Self {
        self.policy.similarity_weight = value;
        self
    }

    pub fn gain_weight(mut self, value: f64) -> Self {
        self.policy.gain_weight = value;
        self
    }

    pub fn gain_penalty_slope(mut self, value: f64) -> Self {
        self.policy.gain_penalty_slope = value;
        self
    }

    pub fn excellent_threshold(mut self, value: u8) -> Self {
        self.policy.excellent_threshold = value;
        self
    }

    pub fn good_threshold(mut self, value: u8) -> Self {
        self.policy.good_threshold = value;
        self
    }

    pub fn fair_threshold(mut self, value: u8) -> Self {
        self.policy.fair_threshold = value;
        self
    }

    pub fn build(self) -> ScoringPolicy {
        self.policy
    }
}

impl Default for ScoringPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The three weighted inputs of a visibility score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub citation_readability: f64,
    pub similarity: f64,
    pub normalized_gain: f64,
}

/// Composite 0–100 visibility score with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityScore {
    pub score: u8,
    pub category: VisibilityCategory,
    pub description: String,
    pub breakdown: ScoreBreakdown,
}

/// Score metrics with the default policy.
///
/// # Example
///
/// ```rust
/// use rendergap_core::{VisibilityCategory, analyze_content_difference, generate_visibility_score};
///
/// let text = "Every word is already in the server response.";
/// let score = generate_visibility_score(&analyze_content_difference(text, text));
/// assert_eq!(score.score, 100);
/// assert_eq!(score.category, VisibilityCategory::Excellent);
/// ```
pub fn generate_visibility_score(metrics: &ContentMetrics) -> VisibilityScore {
    generate_visibility_score_with_policy(metrics, &ScoringPolicy::default())
}

/// Score metrics with a custom policy.
pub fn generate_visibility_score_with_policy(metrics: &ContentMetrics, policy: &ScoringPolicy) -> VisibilityScore {
    let breakdown = ScoreBreakdown {
        citation_readability: metrics.citation_readability.clamp(0.0, 100.0),
        similarity: metrics.similarity.clamp(0.0, 100.0),
        normalized_gain: policy.normalized_gain(metrics.content_gain),
    };

    let weighted = policy.readability_weight * breakdown.citation_readability
        + policy.similarity_weight * breakdown.similarity
        + policy.gain_weight * breakdown.normalized_gain;
    let score = weighted.round().clamp(0.0, 100.0) as u8;
    let category = policy.categorize(score);

    VisibilityScore { score, category, description: category.description().to_string(), breakdown }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffStats;
    use crate::metrics::WordCount;
    use rstest::rstest;

    fn metrics(citation_readability: f64, similarity: f64, content_gain: f64) -> ContentMetrics {
        ContentMetrics {
            content_gain,
            missing_words: 0,
            citation_readability,
            similarity,
            word_count: WordCount { initial: 0, rendered: 0, difference: 0 },
            word_diff: DiffStats::default(),
            line_diff: DiffStats::default(),
        }
    }

    #[test]
    fn test_scoring_policy_default() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.readability_weight, 0.5);
        assert_eq!(policy.similarity_weight, 0.3);
        assert_eq!(policy.gain_weight, 0.2);
        assert_eq!(policy.gain_penalty_slope, 50.0);
        assert_eq!(policy.excellent_threshold, 90);
        assert_eq!(policy.good_threshold, 70);
        assert_eq!(policy.fair_threshold, 50);
    }

    #[test]
    fn test_scoring_policy_builder() {
        let policy = ScoringPolicy::builder()
            .readability_weight(0.4)
            .similarity_weight(0.4)
            .gain_weight(0.2)
            .gain_penalty_slope(25.0)
            .excellent_threshold(95)
            .good_threshold(80)
            .fair_threshold(60)
            .build();

        assert_eq!(policy.readability_weight, 0.4);
        assert_eq!(policy.similarity_weight, 0.4);
        assert_eq!(policy.gain_penalty_slope, 25.0);
        assert_eq!(policy.categorize(94), VisibilityCategory::Good);
        assert_eq!(policy.categorize(59), VisibilityCategory::Poor);
    }

    #[rstest]
    #[case(1.0, 100.0)]
    #[case(0.5, 100.0)]
    #[case(1.5, 75.0)]
    #[case(2.0, 50.0)]
    #[case(3.0, 0.0)]
    #[case(7.5, 0.0)]
    fn test_normalized_gain(#[case] gain: f64, #[case] expected: f64) {
        assert_eq!(ScoringPolicy::default().normalized_gain(gain), expected);
    }

    #[rstest]
    #[case(100, VisibilityCategory::Excellent)]
    #[case(90, VisibilityCategory::Excellent)]
    #[case(89, VisibilityCategory::Good)]
    #[case(70, VisibilityCategory::Good)]
    #[case(69, VisibilityCategory::Fair)]
    #[case(50, VisibilityCategory::Fair)]
    #[case(49, VisibilityCategory::Poor)]
    #[case(0, VisibilityCategory::Poor)]
    fn test_categorize(#[case] score: u8, #[case] expected: VisibilityCategory) {
        assert_eq!(ScoringPolicy::default().categorize(score), expected);
    }

    #[test]
    fn test_category_ordering() {
        assert!(VisibilityCategory::Poor < VisibilityCategory::Fair);
        assert!(VisibilityCategory::Fair < VisibilityCategory::Good);
        assert!(VisibilityCategory::Good < VisibilityCategory::Excellent);
    }

    #[test]
    fn test_perfect_score() {
        let score = generate_visibility_score(&metrics(100.0, 100.0, 1.0));
        assert_eq!(score.score, 100);
        assert_eq!(score.category, VisibilityCategory::Excellent);
        assert_eq!(score.description, VisibilityCategory::Excellent.description());
        assert_eq!(score.breakdown.normalized_gain, 100.0);
    }

    #[test]
    fn test_weighted_score() {
        // 0.5 * 50 + 0.3 * 40 + 0.2 * 50 = 47
        let score = generate_visibility_score(&metrics(50.0, 40.0, 2.0));
        assert_eq!(score.score, 47);
        assert_eq!(score.category, VisibilityCategory::Poor);
    }

    #[test]
    fn test_score_rounds_half_up() {
        // 0.5 * 81 + 0.3 * 100 + 0.2 * 100 = 90.5
        let score = generate_visibility_score(&metrics(81.0, 100.0, 1.0));
        assert_eq!(score.score, 91);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let score = generate_visibility_score(&metrics(250.0, -10.0, 1.0));
        assert_eq!(score.breakdown.citation_readability, 100.0);
        assert_eq!(score.breakdown.similarity, 0.0);
        assert_eq!(score.score, 70);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ScoringPolicy::builder()
            .readability_weight(1.0)
            .similarity_weight(0.0)
            .gain_weight(0.0)
            .build();
        let score = generate_visibility_score_with_policy(&metrics(64.0, 0.0, 9.0), &policy);
        assert_eq!(score.score, 64);
        assert_eq!(score.category, VisibilityCategory::Fair);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&VisibilityCategory::Excellent).unwrap(), "\"excellent\"");
    }
}
