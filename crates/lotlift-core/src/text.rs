//! Small text primitives shared by the extraction and replay layers.

/// Collapse runs of whitespace to single spaces and trim the ends.
///
/// Idempotent: applying it twice yields the same string.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only the ASCII digits of a string.
#[must_use]
pub fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Parse an integer out of noisy text by stripping every non-digit first.
///
/// Handles thousands separators ("48,254" parses to 48254) and leading
/// currency symbols. Returns `None` when no digits remain or the digit
/// run overflows.
#[must_use]
pub fn parse_number(text: &str) -> Option<u32> {
    let d = digits(text);
    if d.is_empty() {
        return None;
    }
    d.parse().ok()
}

/// Render an integer with comma thousands separators ("23,991").
#[must_use]
pub fn group_thousands(n: u32) -> String {
    let raw = n.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Title-case every word: first character uppercased, the rest lowercased.
#[must_use]
pub fn title_case(text: &str) -> String {
    collapse_whitespace(text)
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>()
                    + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  2018   Chevrolet\n\tEquinox "), "2018 Chevrolet Equinox");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_collapse_whitespace_idempotent() {
        let once = collapse_whitespace(" a  b \n c ");
        assert_eq!(collapse_whitespace(&once), once);
    }

    #[test]
    fn test_parse_number_thousands_separator() {
        assert_eq!(parse_number("48,254"), Some(48_254));
        assert_eq!(parse_number("48,254 miles"), Some(48_254));
        assert_eq!(parse_number("$23,991"), Some(23_991));
    }

    #[test]
    fn test_parse_number_plain() {
        assert_eq!(parse_number("2018"), Some(2018));
        assert_eq!(parse_number("0"), Some(0));
    }

    #[test]
    fn test_parse_number_non_numeric() {
        assert_eq!(parse_number("unknown"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(23_991), "23,991");
        assert_eq!(group_thousands(48_254), "48,254");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000_000), "1,000,000");
        assert_eq!(group_thousands(0), "0");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("JET BLACK"), "Jet Black");
        assert_eq!(title_case("mosaic black metallic"), "Mosaic Black Metallic");
        assert_eq!(title_case(""), "");
    }
}
