//! Visible-text extraction from HTML.
//!
//! This is the filter that sits in front of the comparison engine: it strips
//! scripts, styles, media and hidden elements (and optionally navigation and
//! footer regions) from a document and returns the remaining text, one block
//! element per line.
//!
//! # Example
//!
//! ```rust
//! use rendergap_core::{ExtractOptions, extract_visible_text};
//!
//! let html = r#"<nav>Home</nav><p>Hello <b>world</b></p><script>track()</script>"#;
//! let options = ExtractOptions { ignore_nav_footer: true, ..Default::default() };
//! assert_eq!(extract_visible_text(html, &options).unwrap(), "Hello world");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::{RendergapError, Result};

/// Elements that never contribute visible text.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Embedded media and graphics.
const MEDIA_TAGS: &[&str] = &[
    "iframe", "svg", "canvas", "img", "picture", "video", "audio", "object", "embed",
];

/// Page chrome removed when navigation and footer regions are ignored.
const NAV_FOOTER_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    "aside",
    r#"[role="navigation"]"#,
    r#"[role="banner"]"#,
    r#"[role="contentinfo"]"#,
];

/// Elements whose text starts on a new line.
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("hidden style pattern is a valid regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

/// Options for the HTML filter.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Drop `nav`, `header`, `footer`, `aside` and landmark roles (default: false).
    pub ignore_nav_footer: bool,
    /// Drop images, video, iframes and other embedded media (default: true).
    pub remove_media: bool,
    /// Drop elements hidden by the `hidden` attribute or inline styles (default: true).
    pub remove_hidden: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { ignore_nav_footer: false, remove_media: true, remove_hidden: true }
    }
}

impl ExtractOptions {
    fn removed_selectors(&self) -> Vec<&'static str> {
        let mut selectors = NON_CONTENT_TAGS.to_vec();
        if self.remove_media {
            selectors.extend_from_slice(MEDIA_TAGS);
        }
        if self.ignore_nav_footer {
            selectors.extend_from_slice(NAV_FOOTER_SELECTORS);
        }
        if self.remove_hidden {
            selectors.push("[hidden]");
        }
        selectors
    }
}

/// Remove every element that cannot contribute visible text.
pub fn strip_non_content(html: &str, options: &ExtractOptions) -> Result<String> {
    let mut handlers: Vec<_> = options
        .removed_selectors()
        .into_iter()
        .map(|selector| {
            lol_html::element!(selector, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    if options.remove_hidden {
        handlers.push(lol_html::element!("[style]", |el| {
            if let Some(style) = el.get_attribute("style")
                && HIDDEN_STYLE.is_match(&style)
            {
                el.remove();
            }
            Ok(())
        }));
    }

    handlers.push(lol_html::comments!("*", |c| {
        c.remove();
        Ok(())
    }));

    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings { element_content_handlers: handlers, ..Default::default() },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| RendergapError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| RendergapError::HtmlParseError(e.to_string()))?;

    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Collect the text of a document, breaking lines at block boundaries.
///
/// Whitespace inside a block is collapsed to single spaces; empty lines are
/// dropped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut output = String::new();
    let mut current_block = None;

    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        if text.trim().is_empty() {
            output.push(' ');
            continue;
        }

        let block = node
            .ancestors()
            .find(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| BLOCK_ELEMENTS.contains(&el.name()))
            })
            .map(|ancestor| ancestor.id());

        if block != current_block {
            output.push('\n');
            current_block = block;
        }
        output.push_str(&WHITESPACE.replace_all(text, " "));
    }

    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Filter `html` and return its visible text.
pub fn extract_visible_text(html: &str, options: &ExtractOptions) -> Result<String> {
    let stripped = strip_non_content(html, options)?;
    let text = html_to_text(&stripped);

    tracing::debug!(
        html_bytes = html.len(),
        text_bytes = text.len(),
        ignore_nav_footer = options.ignore_nav_footer,
        "visible text extracted"
    );

    Ok(text)
}
