use std::fmt::Write as _;

use crate::audit::AuditReport;
use crate::metrics::{ContentMetrics, ScenarioComparison, ScenarioResult};
use crate::score::VisibilityScore;

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap recommendation messages at this width (0 = no wrapping)
    pub line_width: usize,

    /// Include the weighted score inputs
    pub include_breakdown: bool,
}

/// Plain text formatter for comparison reports
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn report(&self, report: &AuditReport) -> String {
        report_to_text(report, &self.config)
    }

    pub fn scenarios(&self, comparison: &ScenarioComparison) -> String {
        scenarios_to_text(comparison, &self.config)
    }
}

/// Compact count: `999`, `1.2K`, `1.5M`.
pub fn format_count(count: usize) -> String {
    match count {
        0..1_000 => count.to_string(),
        1_000..1_000_000 => format!("{:.1}K", count as f64 / 1_000.0),
        _ => format!("{:.1}M", count as f64 / 1_000_000.0),
    }
}

/// A 0–100 value with one decimal and a percent sign.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn format_signed(value: i64) -> String {
    let magnitude = format_count(value.unsigned_abs() as usize);
    match value.signum() {
        1 => format!("+{magnitude}"),
        -1 => format!("-{magnitude}"),
        _ => magnitude,
    }
}

/// Render a full comparison report
pub fn report_to_text(report: &AuditReport, config: &TextConfig) -> String {
    let mut output = String::new();

    write_score(&mut output, &report.score, config);
    output.push('\n');
    write_metrics(&mut output, &report.metrics);

    if !report.recommendations.is_empty() {
        output.push_str("\nRecommendations\n");
        for recommendation in &report.recommendations {
            let label = format!("  [{:?}] ", recommendation.severity).to_lowercase();
            let message = if config.line_width > label.len() {
                wrap_words(&recommendation.message, config.line_width - label.len(), label.len())
            } else {
                recommendation.message.clone()
            };
            let _ = writeln!(output, "{label}{message}");
        }
    }

    output.trim_end().to_string()
}

/// Render a both-scenarios comparison
pub fn scenarios_to_text(comparison: &ScenarioComparison, config: &TextConfig) -> String {
    let mut output = String::new();

    write_scenario(&mut output, "With navigation and footer", &comparison.with_navigation, config);
    output.push('\n');
    write_scenario(&mut output, "Without navigation and footer", &comparison.without_navigation, config);

    let delta =
        i64::from(comparison.without_navigation.score.score) - i64::from(comparison.with_navigation.score.score);
    let _ = writeln!(output, "\nScore change without navigation: {}", format_signed(delta));

    output.trim_end().to_string()
}

fn write_scenario(output: &mut String, title: &str, scenario: &ScenarioResult, config: &TextConfig) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&"=".repeat(title.len()));
    output.push('\n');
    write_score(output, &scenario.score, config);
    write_metrics(output, &scenario.metrics);
}

fn write_score(output: &mut String, score: &VisibilityScore, config: &TextConfig) {
    let _ = writeln!(output, "Visibility score: {}/100 ({})", score.score, score.category);
    let _ = writeln!(output, "{}", score.description);

    if config.include_breakdown {
        let breakdown = &score.breakdown;
        let _ = writeln!(
            output,
            "  readability {} | similarity {} | gain {}",
            format_percent(breakdown.citation_readability),
            format_percent(breakdown.similarity),
            format_percent(breakdown.normalized_gain)
        );
    }
}

fn write_metrics(output: &mut String, metrics: &ContentMetrics) {
    let words = &metrics.word_count;
    let _ = writeln!(
        output,
        "Words: {} initial, {} rendered ({})",
        format_count(words.initial),
        format_count(words.rendered),
        format_signed(words.difference)
    );
    let _ = writeln!(output, "Content gain: {:.2}x", metrics.content_gain);
    let _ = writeln!(output, "Missing words: {}", format_count(metrics.missing_words));
    let _ = writeln!(output, "Citation readability: {}", format_percent(metrics.citation_readability));
    let _ = writeln!(output, "Similarity: {}", format_percent(metrics.similarity));
    let _ = writeln!(output, "Word diff: {}", metrics.word_diff.summary());
    let _ = writeln!(output, "Line diff: {}", metrics.line_diff.summary());
}

/// Wrap words to `width`, indenting continuation lines by `indent` spaces
fn wrap_words(text: &str, width: usize, indent: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line = Vec::new();
    let mut current_length = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join(&format!("\n{}", " ".repeat(indent)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::audit_text;
    use crate::metrics::analyze_both_scenarios;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1_000, "1.0K")]
    #[case(1_234, "1.2K")]
    #[case(45_678, "45.7K")]
    #[case(1_500_000, "1.5M")]
    fn test_format_count(#[case] count: usize, #[case] expected: &str) {
        assert_eq!(format_count(count), expected);
    }

    #[rstest]
    #[case(100.0, "100.0%")]
    #[case(66.66, "66.7%")]
    #[case(0.0, "0.0%")]
    fn test_format_percent(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_percent(value), expected);
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(0), "0");
        assert_eq!(format_signed(12), "+12");
        assert_eq!(format_signed(-2_500), "-2.5K");
    }

    #[test]
    fn test_report_to_text() {
        let report = audit_text("Loading", "Welcome to the store. Browse our full catalogue of products today.");
        let text = report_to_text(&report, &TextConfig::default());

        assert!(text.starts_with("Visibility score: "));
        assert!(text.contains("Words: 1 initial, 11 rendered (+10)"));
        assert!(text.contains("Content gain: 11.00x"));
        assert!(text.contains("Citation readability: 9.1%"));
        assert!(text.contains("Word diff: Added: 11 • Removed: 1 • Same: 0"));
        assert!(text.contains("Recommendations"));
        assert!(text.contains("[critical]"));
        assert!(!text.contains("readability 9.1% |"));
    }

    #[test]
    fn test_report_to_text_with_breakdown() {
        let report = audit_text("same text", "same text");
        let config = TextConfig { include_breakdown: true, ..Default::default() };
        let text = report_to_text(&report, &config);
        assert!(text.contains("readability 100.0% | similarity 100.0% | gain 100.0%"));
        assert!(text.contains("[positive]"));
    }

    #[test]
    fn test_recommendation_wrapping() {
        let report = audit_text("Loading", "Welcome to the store. Browse our full catalogue of products today.");
        let config = TextConfig { line_width: 40, ..Default::default() };
        let text = report_to_text(&report, &config);

        let recommendations = text.split("Recommendations\n").nth(1).unwrap();
        for line in recommendations.lines() {
            assert!(line.chars().count() <= 40, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_scenarios_to_text() {
        let comparison = analyze_both_scenarios("Menu Body", "Body", "Menu Body more", "Body more");
        let text = scenarios_to_text(&comparison, &TextConfig::default());

        assert!(text.starts_with("With navigation and footer\n=========================="));
        assert!(text.contains("Without navigation and footer"));
        assert!(text.contains("Score change without navigation:"));
    }

    #[test]
    fn test_wrap_words_indent() {
        assert_eq!(wrap_words("one two three", 7, 2), "one two\n  three");
        assert_eq!(wrap_words("", 10, 2), "");
    }
}
