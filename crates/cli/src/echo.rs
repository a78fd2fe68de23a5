use std::time::Duration;

use owo_colors::OwoColorize;
use rendergap_core::{AuditReport, VisibilityCategory, format_percent};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "rendergap".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Compare what crawlers see with what users see\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print a comparison summary, colored by visibility category
pub fn print_report_details(report: &AuditReport) {
    let score = format!("{}/100 ({})", report.score.score, report.score.category);
    let score = match report.score.category {
        VisibilityCategory::Excellent => score.bright_green().to_string(),
        VisibilityCategory::Good => score.green().to_string(),
        VisibilityCategory::Fair => score.bright_yellow().to_string(),
        VisibilityCategory::Poor => score.bright_red().to_string(),
    };

    eprintln!("  {} {}", "Score:".dimmed(), score);
    eprintln!(
        "  {} {}",
        "Readability:".dimmed(),
        format_percent(report.metrics.citation_readability).bright_white()
    );
    eprintln!(
        "  {} {}",
        "Similarity:".dimmed(),
        format_percent(report.metrics.similarity).bright_white()
    );
    eprintln!(
        "  {} {}\n",
        "Recommendations:".dimmed(),
        report.recommendations.len().to_string().bright_white()
    );
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(String, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!(
        "  {} {:>8.2}ms\n",
        format!("{}:", "Total").bold().dimmed(),
        total.as_secs_f64() * 1000.0
    );
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
