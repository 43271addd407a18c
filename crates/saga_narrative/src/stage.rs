//! Stage director: what the story should accomplish at each turn.

use derive_getters::Getters;
use saga_error::{NarrativeError, NarrativeErrorKind};
use serde::{Deserialize, Serialize};

/// Exact text every choice must carry on the closing turn.
pub const CLOSING_CHOICE: &str = "Thank you!";

/// Number of reference directives that precede the conclusion.
const STAGE_SLOTS: u32 = 9;

/// Narrative phase of a turn.
///
/// Variants are declared in the order they first occur in a story, so the
/// derived ordering never decreases from one turn to the next. Foreshadowing
/// is planted at turn 3, before the development turns it pays off in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoryStage {
    /// Characters and setting
    Setup,
    /// Plant a detail for later
    Foreshadow,
    /// Rising action and dilemmas
    Development,
    /// Action scene reaching the climax
    ClimaxBuild,
    /// Climax revealed, fates settled
    Resolution,
    /// Moral and farewell
    Conclusion,
}

/// Story shape selected when a session is created.
///
/// # Examples
///
/// ```
/// use saga_narrative::StoryKind;
///
/// let kind = StoryKind::default();
/// assert_eq!(kind.max_turns(), 10);
/// assert_eq!(kind.sentences_per_response(), 7);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoryKind {
    /// Ten-turn short story
    #[default]
    Short,
}

impl StoryKind {
    /// Number of player choices before the story concludes.
    pub fn max_turns(self) -> u32 {
        match self {
            StoryKind::Short => 10,
        }
    }

    /// Upper bound on sentences per narrative response.
    pub fn sentences_per_response(self) -> u32 {
        match self {
            StoryKind::Short => 7,
        }
    }
}

/// The directive for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Getters)]
pub struct StageInstruction {
    /// Turn ordinal, 1-based
    turn: u32,
    /// Narrative phase
    stage: StoryStage,
    /// Instruction text embedded in the user message
    action: String,
    /// Final turn: every choice must read [`CLOSING_CHOICE`]
    closing: bool,
}

/// Resolve the directive for `turn` of a story lasting `max_turns`.
///
/// The nine reference directives are spread proportionally over turns
/// `1..max_turns`; turn `max_turns` always concludes. With ten turns each
/// turn gets its own directive.
///
/// # Errors
///
/// `InvalidInput` for turn 0 or a zero-length story, `SessionTerminated`
/// for turns past the end.
///
/// # Examples
///
/// ```
/// use saga_narrative::{directive_for, StoryStage};
///
/// let third = directive_for(3, 10).unwrap();
/// assert_eq!(*third.stage(), StoryStage::Foreshadow);
///
/// let last = directive_for(10, 10).unwrap();
/// assert!(*last.closing());
/// assert!(last.action().contains("Thank you!"));
///
/// assert!(directive_for(11, 10).is_err());
/// ```
pub fn directive_for(turn: u32, max_turns: u32) -> Result<StageInstruction, NarrativeError> {
    if max_turns == 0 {
        return Err(NarrativeError::new(NarrativeErrorKind::InvalidInput(
            "story must last at least one turn".to_string(),
        )));
    }
    if turn == 0 {
        return Err(NarrativeError::new(NarrativeErrorKind::InvalidInput(
            "turns are numbered from 1".to_string(),
        )));
    }
    if turn > max_turns {
        return Err(NarrativeError::new(NarrativeErrorKind::SessionTerminated {
            max_turns,
        }));
    }

    if turn == max_turns {
        return Ok(StageInstruction {
            turn,
            stage: StoryStage::Conclusion,
            action: format!(
                "Conclude the story with a thought-provoking moral. \
                 All four choices in the response must read exactly \"{}\".",
                CLOSING_CHOICE
            ),
            closing: true,
        });
    }

    let anchor = |target| anchor_turn(target, max_turns);
    let (stage, action) = match slot(turn, max_turns) {
        1 => (
            StoryStage::Setup,
            "Introduce at most 3 characters by naming them, and explore the \
             environment in which the theme is set."
                .to_string(),
        ),
        2 => (
            StoryStage::Setup,
            format!(
                "Develop the characters that were introduced in the response to \
                 MESSAGE NUMBER {}.",
                anchor(1)
            ),
        ),
        3 => (
            StoryStage::Foreshadow,
            "Introduce a subtle detail that will be used later in the story as \
             foreshadowing. Do not explicitly mention that it is foreshadowing."
                .to_string(),
        ),
        4 => (
            StoryStage::Development,
            "Set a premise for a climax that will be revealed later in the story. \
             Do not explicitly mention that it is a climax."
                .to_string(),
        ),
        5 => (
            StoryStage::Development,
            "Create a thought-provoking dilemma for the characters in the story.".to_string(),
        ),
        6 => (
            StoryStage::Development,
            "Direct the story to an action-packed scene.".to_string(),
        ),
        7 => (
            StoryStage::ClimaxBuild,
            format!(
                "Conclude the action scene created in the response to MESSAGE NUMBER {} \
                 by reaching the climax that was set in the response to MESSAGE NUMBER {}.",
                anchor(6),
                anchor(4)
            ),
        ),
        8 => (
            StoryStage::Resolution,
            format!(
                "Reveal the climax by connecting it with the foreshadowing detail that \
                 was dropped in the response to MESSAGE NUMBER {}.",
                anchor(3)
            ),
        ),
        _ => (
            StoryStage::Resolution,
            "Conclude the fate of the characters appropriately.".to_string(),
        ),
    };

    Ok(StageInstruction {
        turn,
        stage,
        action,
        closing: false,
    })
}

/// Reference directive (1..=9) for a non-final turn.
fn slot(turn: u32, max_turns: u32) -> u32 {
    (turn - 1) * STAGE_SLOTS / (max_turns - 1) + 1
}

/// Turn a back-reference to `target` should name.
///
/// The first turn that received `target`, or when short stories skip it, the
/// last turn before it.
fn anchor_turn(target: u32, max_turns: u32) -> u32 {
    let turns = 1..max_turns;
    turns
        .clone()
        .find(|&t| slot(t, max_turns) == target)
        .or_else(|| turns.rev().find(|&t| slot(t, max_turns) < target))
        .unwrap_or(1)
}
