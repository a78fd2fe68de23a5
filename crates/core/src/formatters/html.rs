use crate::diff::DiffOp;
use crate::tokenize::TokenMode;

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render diff operations as an HTML fragment.
///
/// Unchanged tokens are emitted as escaped text, additions are wrapped in
/// `<ins class="diff-add">` and deletions in `<del class="diff-delete">`.
/// Tokens are joined with a space in word mode and a newline in line mode;
/// operation order is preserved.
///
/// # Example
///
/// ```rust
/// use rendergap_core::{TokenMode, diff_tokens, generate_html_diff};
///
/// let operations = diff_tokens("fish & chips", "fish & <b>peas</b>", TokenMode::Word);
/// let html = generate_html_diff(&operations, TokenMode::Word);
/// assert_eq!(
///     html,
///     "fish &amp; <ins class=\"diff-add\">&lt;b&gt;peas&lt;/b&gt;</ins> <del class=\"diff-delete\">chips</del>"
/// );
/// ```
pub fn generate_html_diff(operations: &[DiffOp], mode: TokenMode) -> String {
    let separator = match mode {
        TokenMode::Word => " ",
        TokenMode::Line => "\n",
    };

    operations
        .iter()
        .map(|op| match op {
            DiffOp::Same(text) => escape_html(text),
            DiffOp::Add(text) => format!(r#"<ins class="diff-add">{}</ins>"#, escape_html(text)),
            DiffOp::Delete(text) => format!(r#"<del class="diff-delete">{}</del>"#, escape_html(text)),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_tokens;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_empty_operations() {
        assert_eq!(generate_html_diff(&[], TokenMode::Word), "");
    }

    #[test]
    fn test_word_mode_markup() {
        let operations = vec![
            DiffOp::Same("Hello".to_string()),
            DiffOp::Add("brave".to_string()),
            DiffOp::Delete("old".to_string()),
        ];
        assert_eq!(
            generate_html_diff(&operations, TokenMode::Word),
            r#"Hello <ins class="diff-add">brave</ins> <del class="diff-delete">old</del>"#
        );
    }

    #[test]
    fn test_line_mode_joins_with_newlines() {
        let operations = diff_tokens("Title\nOld body", "Title\nNew body", TokenMode::Line);
        let html = generate_html_diff(&operations, TokenMode::Line);
        assert_eq!(
            html,
            "Title\n<ins class=\"diff-add\">New body</ins>\n<del class=\"diff-delete\">Old body</del>"
        );
    }

    #[test]
    fn test_tag_count_matches_operations() {
        let operations = diff_tokens("a b c d", "a x c y z", TokenMode::Word);
        let html = generate_html_diff(&operations, TokenMode::Word);
        let added = operations.iter().filter(|op| matches!(op, DiffOp::Add(_))).count();
        let removed = operations.iter().filter(|op| matches!(op, DiffOp::Delete(_))).count();
        assert_eq!(html.matches("<ins ").count(), added);
        assert_eq!(html.matches("<del ").count(), removed);
    }
}
