pub mod html;
pub mod json;
pub mod text;

pub use html::{escape_html, generate_html_diff};
pub use json::{JsonConfig, JsonFormatter, report_to_json, scenarios_to_json};
pub use text::{TextConfig, TextFormatter, format_count, format_percent, report_to_text, scenarios_to_text};
