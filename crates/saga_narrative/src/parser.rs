//! Response contract parser.
//!
//! The model is asked for
//!
//! ```text
//! RESPONSE: <narrative>
//! CHOICES:
//! 1. <choice>
//! 2. <choice>
//! 3. <choice>
//! 4. <choice>
//! ```
//!
//! Replies that stray from this shape are not errors. Each field falls back
//! to a fixed default on its own, so parsing always yields a valid
//! [`StoryResponse`].

use regex::Regex;
use saga_core::{CHOICE_COUNT, StoryResponse};
use std::sync::LazyLock;
use tracing::warn;

/// Narrative used when the reply carries none.
pub const DEFAULT_NARRATIVE: &str = "The story continues with an unexpected twist...";

/// Choices used when the reply carries fewer than four.
pub const DEFAULT_CHOICES: [&str; CHOICE_COUNT] = [
    "Continue exploring",
    "Investigate further",
    "Take a different approach",
    "Follow your instincts",
];

static RESPONSE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)RESPONSE:").expect("valid regex"));
// Only at the start of a line, so prose such as "weigh your choices:" stays
// part of the narrative.
static CHOICES_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*CHOICES:").expect("valid regex"));
static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("valid regex"));

/// Extract a story turn from a raw model reply.
///
/// Total: `None`, empty or garbled input yields the defaults. Fewer than four
/// numbered choices replaces the whole set with [`DEFAULT_CHOICES`]; extra
/// choices past the fourth are dropped.
///
/// # Examples
///
/// ```
/// use saga_narrative::parse_response;
///
/// let turn = parse_response(Some("RESPONSE: Foo\nCHOICES:\n1. A\n2. B\n3. C\n4. D"));
/// assert_eq!(turn.narrative(), "Foo");
/// assert_eq!(turn.choices(), &["A", "B", "C", "D"].map(String::from));
/// ```
pub fn parse_response(raw: Option<&str>) -> StoryResponse {
    let text = raw.unwrap_or_default();

    let narrative_start = RESPONSE_MARKER.find(text).map(|m| m.end());
    let choices_marker = CHOICES_MARKER.find_at(text, narrative_start.unwrap_or(0));

    let narrative = narrative_start
        .map(|start| {
            let end = choices_marker.map_or(text.len(), |m| m.start());
            text[start..end].trim()
        })
        .filter(|narrative| !narrative.is_empty());

    let narrative = match narrative {
        Some(narrative) => narrative.to_string(),
        None => {
            warn!(reply_len = text.len(), "No narrative in model reply, using default");
            DEFAULT_NARRATIVE.to_string()
        }
    };

    let choices = choices_marker
        .map(|m| extract_choices(&text[m.end()..]))
        .unwrap_or_default();

    let choices = match <[String; CHOICE_COUNT]>::try_from(choices) {
        Ok(choices) => choices,
        Err(found) => {
            warn!(found = found.len(), "Too few choices in model reply, using defaults");
            DEFAULT_CHOICES.map(String::from)
        }
    };

    StoryResponse::new(narrative, choices)
}

/// Numbered lines after the `CHOICES:` marker, prefix stripped, at most four.
fn extract_choices(section: &str) -> Vec<String> {
    section
        .lines()
        .filter_map(|line| NUMBERED_LINE.captures(line.trim()))
        .filter_map(|caps| caps.get(1))
        .map(|choice| choice.as_str().trim())
        .filter(|choice| !choice.is_empty())
        .take(CHOICE_COUNT)
        .map(String::from)
        .collect()
}
