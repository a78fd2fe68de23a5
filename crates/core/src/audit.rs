//! Comparison API.
//!
//! The [`Auditor`] ties the HTML filter, the metrics, the visibility score and
//! the recommendation rules together. Use [`audit_text`] or [`audit_html`]
//! for one-off comparisons with default settings.
//!
//! # Example
//!
//! ```rust
//! use rendergap_core::{AuditConfig, Auditor, TokenMode};
//!
//! let config = AuditConfig::builder()
//!     .ignore_nav_footer(true)
//!     .include_operations(true)
//!     .diff_mode(TokenMode::Word)
//!     .build();
//! let auditor = Auditor::with_config(config);
//!
//! let initial = "<html><body><nav>Menu</nav><div id='app'>Loading</div></body></html>";
//! let rendered = "<html><body><nav>Menu</nav><div id='app'>Fresh products every day</div></body></html>";
//! let report = auditor.compare_html(initial, rendered).unwrap();
//!
//! assert_eq!(report.metrics.word_count.initial, 1);
//! assert_eq!(report.metrics.word_count.rendered, 4);
//! assert!(report.operations.is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::diff::DiffOp;
use crate::extract::{ExtractOptions, extract_visible_text};
use crate::metrics::{
    ContentMetrics, ScenarioComparison, analyze_both_scenarios_with_policy, analyze_content_difference,
    analyze_content_difference_with_operations,
};
use crate::recommend::{Recommendation, generate_recommendations};
use crate::score::{ScoringPolicy, VisibilityScore, generate_visibility_score_with_policy};
use crate::tokenize::TokenMode;

/// Configuration for the [`Auditor`].
///
/// # Example
///
/// ```rust
/// use rendergap_core::{AuditConfig, TokenMode};
///
/// let config = AuditConfig::builder()
///     .ignore_nav_footer(true)
///     .diff_mode(TokenMode::Line)
///     .build();
/// assert!(config.ignore_nav_footer);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    /// Drop navigation and footer regions before comparing HTML (default: false).
    pub ignore_nav_footer: bool,

    /// Granularity of the operations attached to a report (default: word).
    pub diff_mode: TokenMode,

    /// Weights and category cutoffs for the visibility score.
    pub policy: ScoringPolicy,

    /// Attach the full diff operation list to each report (default: false).
    pub include_operations: bool,
}

impl AuditConfig {
    /// Creates a new builder for AuditConfig.
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::new()
    }

    fn extract_options(&self, ignore_nav_footer: bool) -> ExtractOptions {
        ExtractOptions { ignore_nav_footer, ..Default::default() }
    }
}

/// Builder for AuditConfig.
pub struct AuditConfigBuilder {
    config: AuditConfig,
}

impl AuditConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: AuditConfig::default() }
    }

    /// Sets whether navigation and footer regions are ignored.
    pub fn ignore_nav_footer(mut self, value: bool) -> Self {
        self.config.ignore_nav_footer = value;
        self
    }

    /// Sets the diff granularity.
    pub fn diff_mode(mut self, value: TokenMode) -> Self {
        self.config.diff_mode = value;
        self
    }

    /// Sets the scoring policy.
    pub fn policy(mut self, value: ScoringPolicy) -> Self {
        self.config.policy = value;
        self
    }

    /// Sets whether diff operations are attached to reports.
    pub fn include_operations(mut self, value: bool) -> Self {
        self.config.include_operations = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> AuditConfig {
        self.config
    }
}

impl Default for AuditConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of comparing one initial text against one rendered text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub metrics: ContentMetrics,
    pub score: VisibilityScore,
    pub recommendations: Vec<Recommendation>,
    /// Diff granularity used for `operations`.
    pub diff_mode: TokenMode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operations: Option<Vec<DiffOp>>,
}

/// Main entry point for comparisons.
pub struct Auditor {
    config: AuditConfig,
}

impl Auditor {
    /// Creates an Auditor with default settings.
    pub fn new() -> Self {
        Self { config: AuditConfig::default() }
    }

    /// Creates an Auditor with a custom configuration.
    pub fn with_config(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Compares two plain texts.
    ///
    /// ```rust
    /// use rendergap_core::Auditor;
    ///
    /// let report = Auditor::new().compare_text("same words", "same words");
    /// assert_eq!(report.score.score, 100);
    /// ```
    pub fn compare_text(&self, initial: &str, rendered: &str) -> AuditReport {
        let (metrics, operations) = if self.config.include_operations {
            let (metrics, operations) =
                analyze_content_difference_with_operations(initial, rendered, self.config.diff_mode);
            (metrics, Some(operations))
        } else {
            (analyze_content_difference(initial, rendered), None)
        };
        let score = generate_visibility_score_with_policy(&metrics, &self.config.policy);
        let recommendations = generate_recommendations(&metrics);

        tracing::debug!(
            score = score.score,
            category = %score.category,
            recommendations = recommendations.len(),
            "comparison complete"
        );

        AuditReport { metrics, score, recommendations, diff_mode: self.config.diff_mode, operations }
    }

    /// Filters both documents down to visible text and compares them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RendergapError::HtmlParseError`] if the HTML rewriter fails.
    pub fn compare_html(&self, initial_html: &str, rendered_html: &str) -> Result<AuditReport> {
        let options = self.config.extract_options(self.config.ignore_nav_footer);
        let initial = extract_visible_text(initial_html, &options)?;
        let rendered = extract_visible_text(rendered_html, &options)?;
        Ok(self.compare_text(&initial, &rendered))
    }

    /// Compares two documents twice: with navigation and footer regions kept,
    /// and with them removed. The `ignore_nav_footer` setting is not consulted.
    pub fn compare_html_both_scenarios(&self, initial_html: &str, rendered_html: &str) -> Result<ScenarioComparison> {
        let with_nav = self.config.extract_options(false);
        let without_nav = self.config.extract_options(true);

        let initial_with_nav = extract_visible_text(initial_html, &with_nav)?;
        let initial_without_nav = extract_visible_text(initial_html, &without_nav)?;
        let rendered_with_nav = extract_visible_text(rendered_html, &with_nav)?;
        let rendered_without_nav = extract_visible_text(rendered_html, &without_nav)?;

        Ok(analyze_both_scenarios_with_policy(
            &initial_with_nav,
            &initial_without_nav,
            &rendered_with_nav,
            &rendered_without_nav,
            &self.config.policy,
        ))
    }

    /// Compares two plain texts that were filtered twice upstream.
    pub fn compare_text_both_scenarios(
        &self, initial_with_nav: &str, initial_without_nav: &str, rendered_with_nav: &str, rendered_without_nav: &str,
    ) -> ScenarioComparison {
        analyze_both_scenarios_with_policy(
            initial_with_nav,
            initial_without_nav,
            rendered_with_nav,
            rendered_without_nav,
            &self.config.policy,
        )
    }
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two plain texts with default settings.
pub fn audit_text(initial: &str, rendered: &str) -> AuditReport {
    Auditor::new().compare_text(initial, rendered)
}

/// Compare two HTML documents with default settings.
pub fn audit_html(initial_html: &str, rendered_html: &str) -> Result<AuditReport> {
    Auditor::new().compare_html(initial_html, rendered_html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::RecommendationKind;
    use crate::score::VisibilityCategory;

    const INITIAL_HTML: &str = r#"
        <html><body>
            <header>Acme Shop</header>
            <nav><a href="/">Home</a> <a href="/cart">Cart</a></nav>
            <div id="root"><p>Loading products</p></div>
            <footer>Acme Inc 2024</footer>
            <script src="/bundle.js"></script>
        </body></html>
    "#;

    const RENDERED_HTML: &str = r#"
        <html><body>
            <header>Acme Shop</header>
            <nav><a href="/">Home</a> <a href="/cart">Cart</a></nav>
            <div id="root">
                <h1>Products</h1>
                <p>Blue kettle with a wooden handle</p>
                <p>Cast iron pan for every kitchen</p>
            </div>
            <footer>Acme Inc 2024</footer>
        </body></html>
    "#;

    #[test]
    fn test_compare_text_identical() {
        let report = audit_text("All content is here.", "All content is here.");
        assert_eq!(report.score.score, 100);
        assert_eq!(report.score.category, VisibilityCategory::Excellent);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].kind, RecommendationKind::GoodVisibility);
        assert!(report.operations.is_none());
    }

    #[test]
    fn test_include_operations_uses_diff_mode() {
        let config = AuditConfig::builder().include_operations(true).diff_mode(TokenMode::Line).build();
        let report = Auditor::with_config(config).compare_text("one\ntwo", "one\nthree");

        let operations = report.operations.unwrap();
        assert_eq!(report.diff_mode, TokenMode::Line);
        assert_eq!(operations[0], DiffOp::Same("one".to_string()));
        assert_eq!(operations.len(), 3);
    }

    #[test]
    fn test_include_operations_keeps_metrics() {
        let initial = "Loading the catalogue";
        let rendered = "Loading the spring catalogue with twelve products";
        let config = AuditConfig::builder().include_operations(true).build();
        let with_operations = Auditor::with_config(config).compare_text(initial, rendered);
        let plain = audit_text(initial, rendered);

        assert_eq!(with_operations.metrics, plain.metrics);
        assert_eq!(with_operations.score, plain.score);
        assert_eq!(
            with_operations.operations.as_deref().map(crate::diff::DiffStats::from_operations),
            Some(plain.metrics.word_diff)
        );
    }

    #[test]
    fn test_compare_html_ignore_nav_footer() {
        let keep = audit_html(INITIAL_HTML, RENDERED_HTML).unwrap();
        let config = AuditConfig::builder().ignore_nav_footer(true).build();
        let ignore = Auditor::with_config(config).compare_html(INITIAL_HTML, RENDERED_HTML).unwrap();

        assert_eq!(ignore.metrics.word_count.initial, 2);
        assert!(keep.metrics.word_count.initial > ignore.metrics.word_count.initial);
        assert!(ignore.metrics.citation_readability < keep.metrics.citation_readability);
    }

    #[test]
    fn test_compare_html_both_scenarios() {
        let comparison = Auditor::new().compare_html_both_scenarios(INITIAL_HTML, RENDERED_HTML).unwrap();
        let with_nav = &comparison.with_navigation.metrics;
        let without_nav = &comparison.without_navigation.metrics;

        assert_eq!(without_nav.word_count.initial, 2);
        assert_eq!(with_nav.word_count.initial - without_nav.word_count.initial, 7);
        assert_eq!(with_nav.missing_words, without_nav.missing_words);
    }

    #[test]
    fn test_custom_policy_applies() {
        let policy = ScoringPolicy::builder().excellent_threshold(101).build();
        let config = AuditConfig::builder().policy(policy).build();
        let report = Auditor::with_config(config).compare_text("a b", "a b");
        assert_eq!(report.score.score, 100);
        assert_eq!(report.score.category, VisibilityCategory::Good);
    }

    #[test]
    fn test_report_serializes_without_operations() {
        let report = audit_text("a", "a b");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("operations").is_none());
        assert_eq!(json["diff_mode"], "word");
        assert_eq!(json["score"]["category"], "fair");
    }
}
