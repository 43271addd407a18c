//! Prompt composition: system role, per-turn messages and replay order.

use crate::{ConversationHistory, StageInstruction, StoryKind, Theme};
use saga_core::Message;
use tracing::debug;

/// User message for the opening call of every session.
pub const INTRO_MESSAGE: &str = "Please start the adventure!";

/// Output grammar the model is told to follow.
pub const RESPONSE_FORMAT: &str = "RESPONSE: [Your narrative here]
CHOICES:
1. [First choice]
2. [Second choice]
3. [Third choice]
4. [Fourth choice]";

/// Theme used when the model is asked to invent one and answers with nothing.
pub const FALLBACK_THEME: &str = "a medieval adventure";

fn persona(kind: StoryKind) -> String {
    format!(
        "You are a creative storyteller creating interactive adventures. \
         Generate engaging, immersive responses that continue the story based on \
         the user's choices. Keep responses elaborate (without crossing {} sentences) \
         and always provide 4 new choices for the player. Do NOT use complex vocabulary.",
        kind.sentences_per_response()
    )
}

/// System role text for a new session.
///
/// Persona, then the theme verbatim, then the response grammar verbatim.
///
/// # Examples
///
/// ```
/// use saga_narrative::{build_system_role, StoryKind, Theme, RESPONSE_FORMAT};
///
/// let theme = Theme::new("a haunted lighthouse").unwrap();
/// let role = build_system_role(&theme, StoryKind::Short);
///
/// assert!(role.contains("a haunted lighthouse"));
/// assert!(role.contains(RESPONSE_FORMAT));
/// assert!(role.contains("7 sentences"));
/// ```
pub fn build_system_role(theme: &Theme, kind: StoryKind) -> String {
    format!(
        "{}\n\nThe theme of the story is as follows:\n{}\n\n\
         Format your response exactly like this:\n{}",
        persona(kind),
        theme,
        RESPONSE_FORMAT
    )
}

/// Per-turn user message carrying the turn ordinal, the player's choice and
/// the stage directive.
pub fn build_user_message(choice: &str, instruction: &StageInstruction) -> String {
    format!(
        "MESSAGE NUMBER: {}\nTHE CHOICE: {}\nACTION: {}",
        instruction.turn(),
        choice,
        instruction.action()
    )
}

/// Exact message payload for one model call.
///
/// System role first, every history entry as a (user, assistant) pair in
/// original order, then `new_message` as the final user message.
pub fn build_message_sequence(
    system_role: &str,
    history: &ConversationHistory,
    new_message: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(Message::system(system_role));
    for entry in history {
        messages.push(Message::user(entry.prompt().as_str()));
        messages.push(Message::assistant(entry.reply().as_str()));
    }
    messages.push(Message::user(new_message));

    debug!(
        message_count = messages.len(),
        replayed = history.len(),
        "Composed message sequence"
    );
    messages
}

/// Messages asking the model to invent a story theme.
pub fn build_theme_request() -> Vec<Message> {
    vec![
        Message::system(
            "You suggest settings for short interactive adventure stories. \
             Reply with a single short phrase describing the theme and nothing else.",
        ),
        Message::user("Suggest a theme for a medieval adventure."),
    ]
}
