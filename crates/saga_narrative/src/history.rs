//! Replayable conversation log for one session.

use derive_getters::Getters;
use serde::Serialize;

/// One completed exchange with the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Getters)]
pub struct HistoryEntry {
    /// The user message exactly as sent
    prompt: String,
    /// The raw model reply, before parsing
    reply: String,
}

impl HistoryEntry {
    /// Create an entry.
    pub fn new(prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            reply: reply.into(),
        }
    }
}

/// Append-only, ordered log of (prompt, reply) pairs.
///
/// The whole log is replayed on every model call, so request size grows with
/// each turn. Growth is bounded by the story's maximum turn count (eleven
/// entries for a ten-turn story: the opening plus one per choice); nothing is
/// ever truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed exchange.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Number of completed exchanges, the opening included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been exchanged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they happened.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent exchange.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Iterate in the order the exchanges happened.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
