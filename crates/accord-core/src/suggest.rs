//! Parses the LLM's free-text settlement reply into discrete suggestions.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\d+\.\s*").unwrap()
});
static BULLET: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[-•]\s*").unwrap()
});

/// Minimum surviving candidates before the fixed fallback set kicks in.
const MIN_SUGGESTIONS: usize = 2;

/// Candidates this short are treated as noise (stray markers, headings).
const MIN_SUGGESTION_CHARS: usize = 10;

/// Split the raw reply into an ordered list of suggestion strings.
///
/// A line is a candidate if it looks like a numbered, bulleted, or
/// bold-titled list entry. Markers are stripped, short remnants dropped.
/// If fewer than two candidates survive, the whole set is replaced by a
/// fixed fallback list; its payment entry interpolates 70% of `amount`
/// when one is present and non-zero.
pub fn parse_suggestions(raw: &str, amount: Option<f64>) -> Vec<String> {
    let mut suggestions = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        let is_candidate = NUMBERED.is_match(line)
            || line.starts_with('-')
            || line.starts_with('•')
            || line.starts_with("**");
        if !is_candidate {
            continue;
        }
        let stripped = NUMBERED.replace(line, "");
        let stripped = BULLET.replace(&stripped, "");
        let stripped = stripped.trim();
        if stripped.chars().count() > MIN_SUGGESTION_CHARS {
            suggestions.push(stripped.to_string());
        }
    }

    if suggestions.len() < MIN_SUGGESTIONS {
        return fallback_suggestions(amount);
    }
    suggestions
}

fn fallback_suggestions(amount: Option<f64>) -> Vec<String> {
    let partial = match amount {
        Some(a) if a != 0.0 => (a * 0.7).to_string(),
        _ => "the disputed amount".to_string(),
    };
    vec![
        "Mediated Settlement: Both parties engage in formal mediation to reach a mutually acceptable resolution".to_string(),
        format!("Partial Payment: Structured payment plan for {partial}"),
        "Alternative Resolution: Non-monetary compensation or service-based settlement".to_string(),
        "Legal Documentation: Create formal agreement outlining resolution terms and future obligations".to_string(),
    ]
}
