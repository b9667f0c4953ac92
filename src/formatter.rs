use regex::Regex;
use std::sync::OnceLock;

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<!--[\s\S]*?-->").unwrap())
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Format a single generated HTML document with all transformations
pub fn format_html(content: &str) -> String {
    let mut result = remove_html_comments(content);
    result = trim_trailing_whitespace(&result);

    // Clean up multiple consecutive blank lines
    result = blank_lines_re().replace_all(&result, "\n\n").to_string();

    let mut result = result.trim_end().to_string();
    result.push('\n');
    result
}

/// Remove HTML comments, which can leak in through data-table descriptions
fn remove_html_comments(content: &str) -> String {
    comment_re().replace_all(content, "").to_string()
}

fn trim_trailing_whitespace(content: &str) -> String {
    content
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_html_comments() {
        let input = "Hello <!-- comment\nspanning --> World";
        let output = remove_html_comments(input);
        assert_eq!(output, "Hello  World");
    }

    #[test]
    fn test_collapse_blank_lines() {
        let output = format_html("<p>a</p>   \n\n\n\n<p>b</p>");
        assert_eq!(output, "<p>a</p>\n\n<p>b</p>\n");
    }

    #[test]
    fn test_already_formatted_is_stable() {
        let once = format_html("<html>\n<body>\n</body>\n</html>\n");
        assert_eq!(format_html(&once), once);
    }
}
