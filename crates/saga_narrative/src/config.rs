//! Narrative settings chosen when a session is created.

use crate::StoryKind;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What `start` does with an empty theme.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemePolicy {
    /// Fail with an invalid-input error
    #[default]
    Reject,
    /// Ask the model to invent a theme
    Generate,
}

/// Settings shared by every session of a registry.
///
/// Deserializes from the `[narrative]` configuration table.
///
/// # Examples
///
/// ```
/// use saga_narrative::{NarrativeConfig, StoryKind, ThemePolicy};
///
/// let config = NarrativeConfig::builder()
///     .theme_policy(ThemePolicy::Generate)
///     .build()
///     .unwrap();
///
/// assert_eq!(*config.kind(), StoryKind::Short);
/// assert_eq!(config.max_turns(), 10);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Getters, Builder,
)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Story shape and length
    kind: StoryKind,
    /// Handling of empty themes
    theme_policy: ThemePolicy,
}

impl NarrativeConfig {
    /// Start building a configuration.
    pub fn builder() -> NarrativeConfigBuilder {
        NarrativeConfigBuilder::default()
    }

    /// Turns before the story concludes.
    pub fn max_turns(&self) -> u32 {
        self.kind.max_turns()
    }
}
