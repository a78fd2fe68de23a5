use serde::Serialize;

use crate::Result;
use crate::audit::AuditReport;
use crate::metrics::ScenarioComparison;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Top-level envelope for a both-scenarios run
#[derive(Debug, Clone, Serialize)]
struct ScenariosOutput<'a> {
    #[serde(flatten)]
    comparison: &'a ScenarioComparison,
    /// Score change from dropping navigation and footer regions
    score_delta: i16,
}

fn to_json<T: Serialize>(value: &T, config: &JsonConfig) -> Result<String> {
    if config.pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Serialize a single comparison report
pub fn report_to_json(report: &AuditReport, config: &JsonConfig) -> Result<String> {
    to_json(report, config)
}

/// Serialize a both-scenarios comparison, with the score delta between them
pub fn scenarios_to_json(comparison: &ScenarioComparison, config: &JsonConfig) -> Result<String> {
    let score_delta =
        i16::from(comparison.without_navigation.score.score) - i16::from(comparison.with_navigation.score.score);
    to_json(&ScenariosOutput { comparison, score_delta }, config)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn report(&self, report: &AuditReport) -> Result<String> {
        report_to_json(report, &self.config)
    }

    pub fn scenarios(&self, comparison: &ScenarioComparison) -> Result<String> {
        scenarios_to_json(comparison, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditConfig, Auditor};
    use crate::metrics::analyze_both_scenarios;

    #[test]
    fn test_report_to_json_compact() {
        let report = Auditor::new().compare_text("Hello world", "Hello brave new world");
        let json = report_to_json(&report, &JsonConfig::default()).unwrap();

        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metrics"]["content_gain"], 2.0);
        assert_eq!(value["metrics"]["citation_readability"], 50.0);
        assert_eq!(value["metrics"]["word_count"]["initial"], 2);
        assert_eq!(value["metrics"]["word_count"]["difference"], 2);
        assert!(value["score"]["score"].is_u64());
        assert!(value["recommendations"].is_array());
    }

    #[test]
    fn test_report_to_json_pretty_with_operations() {
        let config = AuditConfig::builder().include_operations(true).build();
        let report = Auditor::with_config(config).compare_text("a b", "a c");
        let json = report_to_json(&report, &JsonConfig { pretty: true }).unwrap();

        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let operations = value["operations"].as_array().unwrap();
        assert_eq!(operations[0]["kind"], "same");
        assert_eq!(operations[0]["text"], "a");
        assert_eq!(operations.len(), 3);
    }

    #[test]
    fn test_scenarios_to_json() {
        let comparison = analyze_both_scenarios("Menu Body", "Body", "Menu Body more", "Body more");
        let json = scenarios_to_json(&comparison, &JsonConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["with_navigation"]["metrics"].is_object());
        assert!(value["without_navigation"]["score"].is_object());
        let expected = i64::from(comparison.without_navigation.score.score)
            - i64::from(comparison.with_navigation.score.score);
        assert_eq!(value["score_delta"], expected);
    }

    #[test]
    fn test_json_formatter() {
        let formatter = JsonFormatter::new(JsonConfig { pretty: true });
        let report = Auditor::new().compare_text("x", "x");
        assert!(formatter.report(&report).unwrap().contains("\"excellent\""));
    }
}
