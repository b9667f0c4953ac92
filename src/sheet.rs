use crate::constants::HEADER_RULES;
use std::collections::HashMap;
use std::mem::take;

/// One data row keyed by normalized header name
pub type CsvRecord = HashMap<String, String>;

/// Parse published-sheet CSV text into records.
///
/// The first line is the header row. Rows whose fields are all blank are
/// skipped, and rows shorter than the header get empty strings for the
/// missing columns. Quoted fields may not span lines.
pub fn parse_csv(text: &str) -> Vec<CsvRecord> {
    let mut lines = text.trim().lines();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = parse_csv_line(header_line)
        .iter()
        .map(|h| normalize_header(h))
        .collect();

    lines
        .map(parse_csv_line)
        .filter(|values| values.iter().any(|v| !v.trim().is_empty()))
        .map(|values| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = values.get(idx).map(|v| v.trim()).unwrap_or("");
                    (header.clone(), value.to_string())
                })
                .collect()
        })
        .collect()
}

/// Split a single CSV line on commas outside double quotes.
/// `""` inside a quoted span is a literal quote.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(take(&mut field)),
            _ => field.push(ch),
        }
    }
    fields.push(field);

    fields
}

/// Map a free-text column label to its canonical key.
///
/// Labels that match no rule are lower-cased with whitespace runs replaced
/// by `_`.
pub fn normalize_header(header: &str) -> String {
    let label = header.trim().to_lowercase();

    for &(key, needles) in HEADER_RULES {
        if needles.iter().any(|needle| label.contains(needle)) {
            return key.to_string();
        }
        let special = match key {
            "years" => label == "years",
            "is_co_chair" => label.contains("co-chair") && !label.contains("years"),
            _ => false,
        };
        if special {
            return key.to_string();
        }
    }

    label.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_comma_kept_intact() {
        assert_eq!(parse_csv_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(
            parse_csv_line(r#""say ""hi""",x"#),
            vec![r#"say "hi""#, "x"]
        );
    }

    #[test]
    fn test_trailing_empty_field() {
        assert_eq!(parse_csv_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_full_name_header() {
        assert_eq!(normalize_header("Full Name"), "full_name");
        assert_eq!(normalize_header("  FULL NAME (first + last) "), "full_name");
        assert_eq!(normalize_header("your full name"), "full_name");
    }

    #[test]
    fn test_header_rules() {
        assert_eq!(normalize_header("Years in IEEE P&W"), "years");
        assert_eq!(normalize_header("Years"), "years");
        assert_eq!(normalize_header("Committee Sub-Teams"), "subteam");
        assert_eq!(normalize_header("Years of Co-Chair"), "co_chair_years");
        assert_eq!(normalize_header("Are you a Co-Chair?"), "is_co_chair");
        assert_eq!(normalize_header("Co-Chair"), "is_co_chair");
        assert_eq!(normalize_header("GitHub Profile Link"), "github");
        assert_eq!(normalize_header("Tell us what you enjoy"), "pw_statement");
        assert_eq!(normalize_header("Graduating Semester"), "graduating_semester");
    }

    #[test]
    fn test_unknown_header_fallback() {
        assert_eq!(normalize_header("Favorite   Tool"), "favorite_tool");
        assert_eq!(normalize_header("Major"), "major");
    }

    #[test]
    fn test_parse_csv_rows() {
        let csv = "Full Name,Nickname,Years in IEEE P&W\n\
                   Ada Lovelace,Ada,\"2024, 2025\"\n\
                   Alan Turing,,2025\n";
        let rows = parse_csv(csv);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["full_name"], "Ada Lovelace");
        assert_eq!(rows[0]["years"], "2024, 2025");
        assert_eq!(rows[1]["nickname"], "");
    }

    #[test]
    fn test_blank_rows_excluded() {
        let csv = "Full Name,Email\n , \nGrace,grace@example.com\n,\n";
        let rows = parse_csv(csv);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["full_name"], "Grace");
    }

    #[test]
    fn test_ragged_row_padded() {
        let rows = parse_csv("Full Name,Nickname,Email\nLinus\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["nickname"], "");
        assert_eq!(rows[0]["email"], "");
    }

    #[test]
    fn test_header_only_or_empty() {
        assert!(parse_csv("Full Name,Email").is_empty());
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\n\n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = parse_csv("Full Name,Email\r\nGrace,g@example.com\r\n");
        assert_eq!(rows[0]["email"], "g@example.com");
    }
}
