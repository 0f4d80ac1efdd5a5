//! Boilerplate removal for extracted job-description text.

use std::sync::LazyLock;

use regex::Regex;

/// Icon-font ligature names that leak into text extraction.
pub const ICON_TOKENS: &[&str] = &[
    "expand_more",
    "expand_less",
    "person_outline",
    "location_on",
    "attach_money",
    "keyboard_arrow_down",
    "keyboard_arrow_up",
];

/// Navigation and legal link labels.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "Skip to main content",
    "Sign in",
    "Sign up",
    "Apply now",
    "Save job",
    "Share job",
    "Cookie policy",
    "Privacy policy",
    "Terms of service",
    "Terms and conditions",
];

static ICON_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = ICON_TOKENS.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).expect("valid icon token pattern")
});

// Words may be separated by any whitespace run, since collapsing happens last.
static PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = BOILERPLATE_PHRASES
        .iter()
        .map(|phrase| phrase.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("valid boilerplate pattern")
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Strip icon tokens and boilerplate phrases, then collapse whitespace.
pub fn clean(text: &str) -> String {
    let text = ICON_RE.replace_all(text, "");
    let text = PHRASE_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}
