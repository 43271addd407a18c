//! The structured result of one story turn.

use serde::{Deserialize, Serialize};

/// Number of choices offered to the player on every turn.
pub const CHOICE_COUNT: usize = 4;

/// One turn of the story as shown to the player.
///
/// The fixed-size array makes "exactly four choices" a property of the type,
/// so no caller can observe a turn with fewer.
///
/// # Examples
///
/// ```
/// use saga_core::StoryResponse;
///
/// let turn = StoryResponse::new(
///     "The lantern flickers.",
///     ["Relight it", "Keep walking", "Call out", "Turn back"].map(String::from),
/// );
///
/// assert_eq!(turn.narrative(), "The lantern flickers.");
/// assert_eq!(turn.choices().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryResponse {
    narrative: String,
    choices: [String; CHOICE_COUNT],
}

impl StoryResponse {
    /// Create a story turn from a narrative and four choices.
    pub fn new(narrative: impl Into<String>, choices: [String; CHOICE_COUNT]) -> Self {
        Self {
            narrative: narrative.into(),
            choices,
        }
    }

    /// The narrative text.
    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    /// The four choices, in presentation order.
    pub fn choices(&self) -> &[String; CHOICE_COUNT] {
        &self.choices
    }
}
