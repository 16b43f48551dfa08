//! Canonicalization of free-form vehicle color phrases.
//!
//! Dealer sites describe paint with marketing names ("Mosaic Black
//! Metallic", "Summit White"); marketplace forms expect one of a small
//! fixed palette. A single ordered rule table maps phrases to canonical
//! names; rule order matters because specific shades (charcoal) must win
//! over the broader families (grey, silver) they would otherwise fall
//! into.

use crate::text::{collapse_whitespace, title_case};
use regex::Regex;
use std::sync::OnceLock;

struct ColorRule {
    pattern: &'static str,
    /// Veto pattern: the rule only fires when this does NOT match.
    unless: Option<&'static str>,
    label: &'static str,
}

/// Ordered first-match-wins table. Synonyms cover the paint-name
/// vocabulary seen on dealer listings.
const RULES: &[ColorRule] = &[
    ColorRule { pattern: r"black|ebony|onyx|midnight|jet", unless: None, label: "Black" },
    // Dark greys land on Charcoal, so it must precede the silver/grey rules
    ColorRule { pattern: r"charcoal|gunmetal|dark\s*gr[ae]y", unless: None, label: "Charcoal" },
    ColorRule { pattern: r"silver|platinum|metallic|slate|graphite|titanium", unless: None, label: "Silver" },
    ColorRule { pattern: r"gr[ae]y|pewter", unless: None, label: "Grey" },
    // Red precedes white so "Salsa Red Pearl" stays red
    ColorRule { pattern: r"red|crimson|cherry|ruby|scarlet|cardinal|salsa", unless: None, label: "Red" },
    ColorRule { pattern: r"burgundy|maroon|wine", unless: None, label: "Burgundy" },
    ColorRule { pattern: r"white|ivory|alabaster|snow|cream|arctic", unless: None, label: "White" },
    // Bare "pearl" reads as white unless it qualifies another color
    ColorRule {
        pattern: r"\bpearl\b",
        unless: Some(r"\bpearl\s*(red|blue|black)\b"),
        label: "White",
    },
    ColorRule { pattern: r"off\s*white|eggshell|vanilla", unless: None, label: "Offwhite" },
    ColorRule { pattern: r"blue|navy|indigo|cobalt|azure|sapphire|steel", unless: None, label: "Blue" },
    ColorRule { pattern: r"teal|turquoise|aqua|cyan", unless: None, label: "Turquoise" },
    ColorRule { pattern: r"brown|bronze|mocha|cocoa|coffee|chocolate|espresso|mahogany", unless: None, label: "Brown" },
    ColorRule { pattern: r"\btan\b|sand|khaki|linen|camel", unless: None, label: "Tan" },
    ColorRule { pattern: r"beige|champagne|cashmere|bisque", unless: None, label: "Beige" },
    ColorRule { pattern: r"green|emerald|olive|forest|sage|jade", unless: None, label: "Green" },
    ColorRule { pattern: r"gold|amber", unless: None, label: "Gold" },
    ColorRule { pattern: r"yellow|lemon|canary|citrus", unless: None, label: "Yellow" },
    ColorRule { pattern: r"orange|copper|tangerine|sunset|flame", unless: None, label: "Orange" },
    ColorRule { pattern: r"purple|plum|violet|amethyst|lavender", unless: None, label: "Purple" },
    ColorRule { pattern: r"pink|rose|blush|magenta", unless: None, label: "Pink" },
];

fn compiled_rules() -> &'static Vec<(Regex, Option<Regex>, &'static str)> {
    static COMPILED: OnceLock<Vec<(Regex, Option<Regex>, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| {
                (
                    Regex::new(rule.pattern).expect("valid color pattern"),
                    rule.unless
                        .map(|p| Regex::new(p).expect("valid color veto pattern")),
                    rule.label,
                )
            })
            .collect()
    })
}

/// Map a raw color phrase onto the canonical palette.
///
/// Matching is case-insensitive and first-match-wins. An unrecognized
/// phrase passes through title-cased; empty input yields `None`.
#[must_use]
pub fn canonicalize_color(raw: &str) -> Option<String> {
    let cleaned = collapse_whitespace(raw);
    if cleaned.is_empty() {
        return None;
    }
    let lower = cleaned.to_lowercase();

    for (pattern, unless, label) in compiled_rules() {
        if pattern.is_match(&lower) {
            if let Some(veto) = unless {
                if veto.is_match(&lower) {
                    continue;
                }
            }
            return Some((*label).to_string());
        }
    }

    Some(title_case(&cleaned))
}
