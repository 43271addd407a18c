//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a message in a conversation.
///
/// # Examples
///
/// ```
/// use saga_core::Role;
///
/// let user_role = Role::User;
/// let assistant_role = Role::Assistant;
/// assert_ne!(user_role, assistant_role);
///
/// // Display uses the wire name
/// assert_eq!(format!("{}", Role::System), "system");
/// ```
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
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Storyteller instructions, sent once at the head of every request
    #[display("system")]
    System,
    /// Player-side prompts
    #[display("user")]
    User,
    /// Model replies replayed from history
    #[display("assistant")]
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
