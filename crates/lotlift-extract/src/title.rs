//! Listing-title decomposition into year, make, model, and trim.
//!
//! Dealer titles mix sale-status prefixes, drivetrain suffixes, and
//! multi-word manufacturer names ("2019 Used Alfa Romeo Stelvio Ti AWD
//! SUV"). Parsing anchors on the four-digit year, resolves the make
//! against a known multi-word list, then accumulates model words until a
//! recognized trim token starts the trim.

use lotlift_core::text::collapse_whitespace;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Makes whose names span multiple title words.
const MULTI_WORD_MAKES: &[&str] = &[
    "Alfa Romeo",
    "Aston Martin",
    "Land Rover",
    "Rolls-Royce",
    "Mercedes-Benz",
    "Lucid",
];

/// Words that mark the start of a trim designation rather than more of
/// the model name.
const TRIM_TOKENS: &[&str] = &[
    "l", "le", "se", "xle", "xse", "sport", "limited", "platinum", "touring", "base", "premium",
    "premier", "plus", "essence", "preferred", "ultimate", "xl", "xlr", "sr", "sr5", "sv", "sl",
    "s", "lx", "ex", "xlt", "gt", "awd", "fwd", "rwd", "4wd", "4x4", "awdrive", "all-wheel",
];

const MODEL_MAX_LEN: usize = 18;

fn trim_tokens() -> &'static HashSet<&'static str> {
    static TOKENS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    TOKENS.get_or_init(|| TRIM_TOKENS.iter().copied().collect())
}

fn sale_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:used|new|certified|cpo|pre[-\s]*owned)\b[\s:]*").expect("valid regex")
    })
}

fn year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid regex"))
}

fn style_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\s+(?:Front Wheel Drive|All Wheel Drive|AWD|4WD|RWD|FWD)\s+(?:SUV|Sedan|Coupe|Truck|Van|Wagon|Hatchback)\s*$",
        )
        .expect("valid regex")
    })
}

fn drivetrain_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:awd|fwd|rwd|4wd|4x4|quattro|xdrive|4matic)$").expect("valid regex")
    })
}

/// Fields recovered from a listing title. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleParse {
    /// Model year.
    pub year: Option<u16>,
    /// Manufacturer name as written in the title.
    pub make: Option<String>,
    /// Model name, possibly multiple words.
    pub model: Option<String>,
    /// Trim designation, when the title carries one.
    pub trim: Option<String>,
}

/// Split a raw listing title into its vehicle identity fields.
#[must_use]
pub fn parse_title(raw: &str) -> TitleParse {
    let mut title = collapse_whitespace(raw);
    loop {
        let stripped = sale_prefix().replace(&title, "").to_string();
        if stripped == title {
            break;
        }
        title = stripped;
    }

    let mut parsed = TitleParse::default();
    let Some(year_match) = year_pattern().find(&title) else {
        return parsed;
    };
    parsed.year = year_match.as_str().parse().ok();

    let after = title[year_match.end()..].trim();
    let rest = if after.is_empty() {
        title[..year_match.start()].trim().to_string()
    } else {
        after.to_string()
    };
    let rest = style_suffix().replace(&rest, "").to_string();
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.is_empty() {
        return parsed;
    }

    let make_len = matched_make_len(&tokens);
    parsed.make = Some(tokens[..make_len].join(" "));

    let mut model_words: Vec<&str> = Vec::new();
    let mut trim_words: Vec<&str> = Vec::new();
    for (i, word) in tokens[make_len..].iter().copied().enumerate() {
        if !trim_words.is_empty() {
            trim_words.push(word);
            continue;
        }
        // The first word after the make is always model.
        if i > 0 && (is_trim_word(word) || model_words.join(" ").len() >= MODEL_MAX_LEN) {
            trim_words.push(word);
        } else {
            model_words.push(word);
        }
    }

    if !model_words.is_empty() {
        parsed.model = Some(model_words.join(" "));
    }
    if !trim_words.is_empty() {
        parsed.trim = Some(trim_words.join(" "));
    }
    parsed
}

fn matched_make_len(tokens: &[&str]) -> usize {
    for make in MULTI_WORD_MAKES {
        let words: Vec<&str> = make.split_whitespace().collect();
        if words.len() > tokens.len() {
            continue;
        }
        let matches = words
            .iter()
            .zip(tokens)
            .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if matches {
            return words.len();
        }
    }
    1
}

fn is_trim_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    if trim_tokens().contains(lower.as_str()) {
        return true;
    }
    if drivetrain_token().is_match(word) {
        return true;
    }
    // Short all-caps designations (LT, SXT, RS-3) read as trims.
    word.len() >= 2
        && word == word.to_uppercase()
        && word
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}
