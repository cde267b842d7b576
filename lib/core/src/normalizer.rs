//! Role text normalization: case-folding, punctuation stripping and
//! noise-word removal, producing the canonical matching key used by both
//! the role mapper and the semantic search path.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Role qualifiers that carry no signal for skill matching.
static NOISE_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "senior",
        "junior",
        "lead",
        "staff",
        "principal",
        "associate",
        "intern",
        "trainee",
        "specialist",
        "consultant",
        "analyst",
        "architect",
        "manager",
        "head",
        "chief",
        "vp",
        "director",
        "engineer",
        "developer",
        "software",
    ]
    .into_iter()
    .collect()
});

/// Lowercase, strip special characters and collapse whitespace.
/// Keeps `-`, `+`, `#` and `.` so terms like "c++", "c#" and ".net" survive.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            'a'..='z' | '0'..='9' | '-' | '+' | '#' | '.' => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a raw role string into its matching key.
///
/// Lowercases, tokenizes on whitespace/punctuation, drops noise words and
/// rejoins with single spaces. An empty result is valid: a role made up
/// entirely of qualifiers (e.g. "Senior Developer") normalizes to "".
pub fn normalize_role(role: &str) -> String {
    normalize_text(role)
        .split_whitespace()
        .filter(|word| !NOISE_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
