mod echo;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use rendergap_core::fetch::is_remote;
use rendergap_core::{
    AuditConfig, Auditor, FetchConfig, JsonConfig, TextConfig, TokenMode, fetch_source, generate_html_diff,
    report_to_json, report_to_text, scenarios_to_json, scenarios_to_text,
};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TOTAL_STEPS: usize = 4;

/// Exit code when the visibility score is below `--fail-under`
const EXIT_BELOW_THRESHOLD: u8 = 2;

/// Output format for comparison results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Diff,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "diff" | "html" => Ok(Self::Diff),
            _ => Err(format!("Invalid format: {}. Valid options: text, json, diff", s)),
        }
    }
}

/// Compare the raw HTML a crawler receives with the rendered page
#[derive(Parser, Debug)]
#[command(name = "rendergap")]
#[command(author = "rendergap contributors")]
#[command(version)]
#[command(about = "Measure how much page content is visible without JavaScript", long_about = None)]
struct Args {
    /// Initial (raw) page: URL, local file, or "-" for stdin
    #[arg(value_name = "INITIAL")]
    initial: String,

    /// Rendered page: URL, local file, or "-" for stdin
    #[arg(value_name = "FINAL")]
    rendered: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json, diff)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Diff granularity (word, line)
    #[arg(short, long, default_value = "word", value_name = "MODE")]
    mode: TokenMode,

    /// Inputs are plain text; skip HTML filtering
    #[arg(long)]
    plain: bool,

    /// Drop navigation, header, footer and aside regions before comparing
    #[arg(long)]
    ignore_nav_footer: bool,

    /// Report results with and without navigation/footer regions
    #[arg(long, conflicts_with_all = ["plain", "ignore_nav_footer"])]
    both_scenarios: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show the weighted inputs of the visibility score (text only)
    #[arg(long)]
    breakdown: bool,

    /// Wrap recommendation text at this width (0 = no wrapping)
    #[arg(long, default_value = "0", value_name = "COLS")]
    width: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Exit with status 2 if the visibility score is below SCORE
    #[arg(long, value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    fail_under: Option<u8>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "rendergap_core=debug,rendergap=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn load_input(
    source: &str, label: &str, step: usize, config: &FetchConfig, verbose: bool,
) -> anyhow::Result<String> {
    if verbose {
        let origin = if source == "-" {
            "stdin".to_string()
        } else if is_remote(source) {
            source.bright_white().underline().to_string()
        } else {
            source.bright_white().to_string()
        };
        echo::print_step(step, TOTAL_STEPS, &format!("Reading {} page from {}", label, origin));
    }

    let content = fetch_source(source, config)
        .await
        .with_context(|| format!("Failed to read {} input: {}", label, source))?;

    if verbose {
        eprintln!("  {} {}\n", "Size:".dimmed(), echo::format_size(content.len()).bright_white());
    }

    Ok(content)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.initial == "-" && args.rendered == "-" {
        anyhow::bail!("Only one input can be read from stdin");
    }
    if args.both_scenarios && args.format == OutputFormat::Diff {
        anyhow::bail!("--both-scenarios supports the text and json formats only");
    }

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let started = Instant::now();
    let mut timings: Vec<(String, Duration)> = Vec::new();

    let mut fetch_config = FetchConfig { timeout: args.timeout, ..Default::default() };
    if let Some(user_agent) = &args.user_agent {
        fetch_config.user_agent = user_agent.clone();
    }

    let stage = Instant::now();
    let initial = load_input(&args.initial, "initial", 1, &fetch_config, args.verbose).await?;
    let rendered = load_input(&args.rendered, "rendered", 2, &fetch_config, args.verbose).await?;
    timings.push(("Load".to_string(), stage.elapsed()));
    tracing::debug!(initial_bytes = initial.len(), rendered_bytes = rendered.len(), plain = args.plain, "inputs loaded");

    if args.verbose {
        let what = if args.plain { "Comparing plain text" } else { "Filtering HTML and comparing visible text" };
        echo::print_step(3, TOTAL_STEPS, what);
    }

    let config = AuditConfig::builder()
        .ignore_nav_footer(args.ignore_nav_footer)
        .diff_mode(args.mode)
        .include_operations(args.format == OutputFormat::Diff)
        .build();
    let auditor = Auditor::with_config(config);
    let json_config = JsonConfig { pretty: args.pretty };
    let text_config = TextConfig { line_width: args.width, include_breakdown: args.breakdown };

    let stage = Instant::now();
    let (output, score) = if args.both_scenarios {
        let comparison = auditor
            .compare_html_both_scenarios(&initial, &rendered)
            .context("Failed to filter HTML")?;
        let score = comparison.with_navigation.score.score.min(comparison.without_navigation.score.score);

        let output = match args.format {
            OutputFormat::Json => scenarios_to_json(&comparison, &json_config).context("Failed to serialize report")?,
            _ => scenarios_to_text(&comparison, &text_config),
        };
        (output, score)
    } else {
        let report = if args.plain {
            auditor.compare_text(&initial, &rendered)
        } else {
            auditor.compare_html(&initial, &rendered).context("Failed to filter HTML")?
        };

        if report.metrics.word_count.initial == 0 {
            echo::print_warning("The initial page has no visible text");
        }
        if args.verbose {
            echo::print_report_details(&report);
        }

        let output = match args.format {
            OutputFormat::Text => report_to_text(&report, &text_config),
            OutputFormat::Json => report_to_json(&report, &json_config).context("Failed to serialize report")?,
            OutputFormat::Diff => generate_html_diff(report.operations.as_deref().unwrap_or_default(), args.mode),
        };
        (output, report.score.score)
    };
    timings.push(("Compare".to_string(), stage.elapsed()));

    if args.verbose {
        echo::print_step(4, TOTAL_STEPS, "Writing output");
        eprintln!("  {} {}\n", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
    }

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", output))
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output),
    }

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    if let Some(threshold) = args.fail_under
        && score < threshold
    {
        echo::print_error(&format!("Visibility score {} is below the required {}", score, threshold));
        return Ok(ExitCode::from(EXIT_BELOW_THRESHOLD));
    }

    Ok(ExitCode::SUCCESS)
}
