//! Text normalization and tokenization.
//!
//! Turns plain text into ordered sequences of comparison units. Word mode runs
//! a normalization pipeline (line endings, URL shielding, punctuation spacing,
//! whitespace collapse) before splitting; line mode only trims lines.
//!
//! # Example
//!
//! ```rust
//! use rendergap_core::tokenize::{TokenMode, tokenize};
//!
//! let tokens = tokenize("Visit https://example.com/a,b for info!", TokenMode::Word);
//! assert_eq!(tokens, vec!["Visit", "https://example.com/a,b", "for", "info!"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::RendergapError;

/// Granularity of comparison units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    /// Whitespace-separated words after normalization.
    #[default]
    Word,
    /// Non-empty trimmed lines.
    Line,
}

impl TokenMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenMode::Word => "word",
            TokenMode::Line => "line",
        }
    }
}

impl fmt::Display for TokenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenMode {
    type Err = RendergapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "line" => Ok(Self::Line),
            _ => Err(RendergapError::InvalidMode(s.to_string())),
        }
    }
}

/// URL-like substrings: `scheme://...`, `www.` hosts, `user@host.tld` and bare `domain.tld/path`.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:[a-z][a-z0-9+.\-]*://[^\s<>]+|www\.[a-z0-9\-]+(?:\.[a-z0-9\-]+)+[^\s<>]*|[a-z0-9._%+\-]+@[a-z0-9\-]+(?:\.[a-z0-9\-]+)*\.[a-z]{2,}|[a-z0-9\-]+(?:\.[a-z0-9\-]+)*\.[a-z]{2,}/[^\s<>]*)",
    )
    .expect("URL pattern is a valid regex")
});

static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:!?])").expect("punctuation pattern is a valid regex"));

/// Sentence end glued to a capitalized word. Dotted runs such as `example.com`,
/// `Node.js`, `e.g.` or `U.S.A` do not match.
static MISSING_SPACE_AFTER_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])(\p{Lu}\p{Ll})").expect("punctuation pattern is a valid regex"));

static MISSING_SPACE_AFTER_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,;:])(\p{L})").expect("punctuation pattern is a valid regex"));

/// Unicode private-use ranges that placeholders are drawn from.
const PRIVATE_USE_RANGES: [(u32, u32); 3] = [(0xE000, 0xF8FF), (0xF0000, 0xFFFFD), (0x100000, 0x10FFFD)];

/// Characters that end a sentence rather than a URL.
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];

fn is_private_use(c: char) -> bool {
    let cp = c as u32;
    PRIVATE_USE_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Strip sentence punctuation and unbalanced closing brackets from a URL match.
fn trim_url_match(candidate: &str) -> &str {
    let mut url = candidate;
    while let Some(last) = url.chars().last() {
        let strip = if URL_TRAILING_PUNCTUATION.contains(&last) {
            true
        } else if last == ')' {
            url.matches('(').count() < url.matches(')').count()
        } else if last == ']' {
            url.matches('[').count() < url.matches(']').count()
        } else {
            false
        };

        if !strip {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

/// Reversible substitution of URLs by single private-use code points.
///
/// Code points already present in the input are never handed out, so a
/// placeholder can only ever map back to the URL it replaced.
#[derive(Debug, Default)]
struct UrlShield {
    urls: HashMap<char, String>,
}

impl UrlShield {
    fn protect(text: &str) -> (String, Self) {
        let mut shield = Self::default();
        if !URL_PATTERN.is_match(text) {
            return (text.to_string(), shield);
        }

        let reserved: HashSet<char> = text.chars().filter(|c| is_private_use(*c)).collect();
        let mut placeholders = PRIVATE_USE_RANGES
            .into_iter()
            .flat_map(|(lo, hi)| lo..=hi)
            .filter_map(char::from_u32)
            .filter(move |c| !reserved.contains(c));

        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        let mut exhausted = false;

        for found in URL_PATTERN.find_iter(text) {
            let url = trim_url_match(found.as_str());
            output.push_str(&text[last..found.start()]);

            match placeholders.next() {
                Some(placeholder) => {
                    shield.urls.insert(placeholder, url.to_string());
                    output.push(placeholder);
                }
                None => {
                    if !exhausted {
                        tracing::warn!("private-use placeholders exhausted; remaining URLs are not shielded");
                        exhausted = true;
                    }
                    output.push_str(url);
                }
            }

            output.push_str(&found.as_str()[url.len()..]);
            last = found.end();
        }
        output.push_str(&text[last..]);

        (output, shield)
    }

    fn restore(&self, text: &str) -> String {
        if self.urls.is_empty() {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len());
        for c in text.chars() {
            match self.urls.get(&c) {
                Some(url) => output.push_str(url),
                None => output.push(c),
            }
        }
        output
    }
}

/// Convert CRLF and lone CR line endings to LF.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn normalize_punctuation(text: &str) -> String {
    let tightened = SPACE_BEFORE_PUNCTUATION.replace_all(text, "$1");
    let sentences = MISSING_SPACE_AFTER_SENTENCE.replace_all(&tightened, "$1 $2");
    MISSING_SPACE_AFTER_CLAUSE
        .replace_all(&sentences, "$1 $2")
        .into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes text for word-level comparison.
///
/// Applies line-ending standardization, URL shielding, punctuation spacing and
/// whitespace collapse. URLs come back exactly as they appeared in the input.
///
/// # Example
///
/// ```rust
/// use rendergap_core::tokenize::normalize_text;
///
/// assert_eq!(normalize_text("Hello ,world.How   are you ?"), "Hello, world. How are you?");
/// ```
pub fn normalize_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let text = normalize_line_endings(text);
    let (shielded, shield) = UrlShield::protect(&text);
    let text = normalize_punctuation(&shielded);
    let text = collapse_whitespace(&text);
    shield.restore(&text)
}

/// Splits text into an ordered sequence of comparison units.
///
/// Never fails: empty or blank input yields an empty sequence.
pub fn tokenize(text: &str, mode: TokenMode) -> Vec<String> {
    match mode {
        TokenMode::Word => normalize_text(text).split_whitespace().map(String::from).collect(),
        TokenMode::Line => normalize_line_endings(text)
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
    }
}

/// Number of word tokens in `text`.
pub fn count_words(text: &str) -> usize {
    tokenize(text, TokenMode::Word).len()
}

/// Number of non-empty lines in `text`.
pub fn count_lines(text: &str) -> usize {
    tokenize(text, TokenMode::Line).len()
}
