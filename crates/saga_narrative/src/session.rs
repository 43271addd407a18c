//! A single narrative session and its lifecycle.

use crate::{
    ConversationHistory, FALLBACK_THEME, HistoryEntry, INTRO_MESSAGE, NarrativeConfig,
    ThemePolicy, build_message_sequence, build_system_role, build_theme_request,
    build_user_message, directive_for, parse_response,
};
use saga_core::{GenerateRequest, Message, StoryResponse};
use saga_error::{GatewayErrorKind, NarrativeError, NarrativeErrorKind, SagaResult};
use saga_interface::SagaDriver;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Caller-supplied key addressing one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a caller-supplied identifier.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the identifier is blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, NarrativeError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::InvalidInput(
                "session id must not be empty".to_string(),
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Story theme: trimmed, non-empty, fixed for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(transparent)]
pub struct Theme(String);

impl Theme {
    /// Validate a theme.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the theme is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NarrativeError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::InvalidInput(
                "theme must not be empty".to_string(),
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The theme text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle position of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    /// Created, `start` not yet succeeded
    #[default]
    Uninitialized,
    /// Accepting choices
    Active,
    /// Final turn played
    Concluded,
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Session key
    pub session_id: SessionId,
    /// Lifecycle position
    pub state: SessionState,
    /// Choices accepted so far
    pub turn: u32,
    /// Choices before the story concludes
    pub max_turns: u32,
    /// Theme, once started
    pub theme: Option<Theme>,
    /// Completed model exchanges, the opening included
    pub history_len: usize,
}

/// One interactive story.
///
/// Owns its theme, turn counter, history and system role. A failed model
/// call leaves all of them untouched, so retrying a turn sends exactly the
/// same messages again. Resetting means discarding the session and creating
/// a new one; nothing is cleared in place.
#[derive(Debug, Clone)]
pub struct NarrativeSession {
    id: SessionId,
    config: NarrativeConfig,
    state: SessionState,
    theme: Option<Theme>,
    system_role: String,
    turn: u32,
    history: ConversationHistory,
}

impl NarrativeSession {
    /// Create an uninitialized session.
    pub fn new(id: SessionId, config: NarrativeConfig) -> Self {
        Self {
            id,
            config,
            state: SessionState::Uninitialized,
            theme: None,
            system_role: String::new(),
            turn: 0,
            history: ConversationHistory::new(),
        }
    }

    /// Session key.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Lifecycle position.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Theme, once started.
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Choices accepted so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Choices before the story concludes.
    pub fn max_turns(&self) -> u32 {
        self.config.max_turns()
    }

    /// Completed exchanges.
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// System role sent at the head of every request; empty until started.
    pub fn system_role(&self) -> &str {
        &self.system_role
    }

    /// Read-only view for observers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            state: self.state,
            turn: self.turn,
            max_turns: self.max_turns(),
            theme: self.theme.clone(),
            history_len: self.history.len(),
        }
    }

    /// Open the story and produce its first turn.
    ///
    /// Builds the system role from the theme and sends the opening message
    /// with no history. The turn counter stays at 0.
    ///
    /// # Errors
    ///
    /// - `SessionAlreadyStarted` unless the session is uninitialized
    /// - `InvalidInput` for a blank theme under [`ThemePolicy::Reject`]
    /// - gateway errors from the model call, with the session unchanged
    #[instrument(skip(self, driver, theme), fields(session = %self.id, provider = driver.provider_name()))]
    pub async fn start<D>(&mut self, driver: &D, theme: &str) -> SagaResult<StoryResponse>
    where
        D: SagaDriver + ?Sized,
    {
        if self.state != SessionState::Uninitialized {
            Err(NarrativeError::new(NarrativeErrorKind::SessionAlreadyStarted(
                self.id.to_string(),
            )))?
        }

        let theme = match (Theme::new(theme), self.config.theme_policy()) {
            (Ok(theme), _) => theme,
            (Err(_), ThemePolicy::Generate) => generate_theme(driver).await?,
            (Err(e), ThemePolicy::Reject) => Err(e)?,
        };

        let system_role = build_system_role(&theme, *self.config.kind());
        let messages = build_message_sequence(&system_role, &self.history, INTRO_MESSAGE);
        let reply = request_completion(driver, messages).await?;
        let story = parse_response(Some(&reply));

        self.history.push(HistoryEntry::new(INTRO_MESSAGE, reply));
        self.system_role = system_role;
        self.state = SessionState::Active;
        info!(theme = %theme, "Session started");
        self.theme = Some(theme);

        Ok(story)
    }

    /// Apply the player's choice and produce the next turn.
    ///
    /// History append and turn increment happen together, only after the
    /// model call succeeds. Playing the final turn concludes the session.
    ///
    /// # Errors
    ///
    /// - `SessionNotStarted` before a successful `start`
    /// - `SessionTerminated` once the final turn has been played
    /// - `InvalidInput` for a blank choice
    /// - gateway errors from the model call, with the session unchanged
    #[instrument(skip(self, driver, choice), fields(session = %self.id, turn = self.turn + 1))]
    pub async fn advance<D>(&mut self, driver: &D, choice: &str) -> SagaResult<StoryResponse>
    where
        D: SagaDriver + ?Sized,
    {
        match self.state {
            SessionState::Uninitialized => Err(NarrativeError::new(
                NarrativeErrorKind::SessionNotStarted(self.id.to_string()),
            ))?,
            SessionState::Concluded => Err(NarrativeError::new(
                NarrativeErrorKind::SessionTerminated {
                    max_turns: self.max_turns(),
                },
            ))?,
            SessionState::Active => {}
        }

        if choice.trim().is_empty() {
            Err(NarrativeError::new(NarrativeErrorKind::InvalidInput(
                "choice must not be empty".to_string(),
            )))?
        }

        let next_turn = self.turn + 1;
        let instruction = directive_for(next_turn, self.max_turns())?;
        debug!(stage = %instruction.stage(), closing = *instruction.closing(), "Resolved directive");

        let prompt = build_user_message(choice, &instruction);
        let messages = build_message_sequence(&self.system_role, &self.history, &prompt);
        let reply = request_completion(driver, messages).await?;
        let story = parse_response(Some(&reply));

        self.history.push(HistoryEntry::new(prompt, reply));
        self.turn = next_turn;
        if *instruction.closing() {
            self.state = SessionState::Concluded;
            info!(turns = self.turn, "Session concluded");
        }

        Ok(story)
    }
}

async fn request_completion<D>(driver: &D, messages: Vec<Message>) -> SagaResult<String>
where
    D: SagaDriver + ?Sized,
{
    let request = GenerateRequest::builder()
        .messages(messages)
        .build()
        .map_err(|e| NarrativeError::new(NarrativeErrorKind::MessageAssembly(e.to_string())))?;

    Ok(driver.generate(&request).await?.into_text())
}

/// Ask the model for a theme, falling back when it answers with nothing usable.
///
/// An empty completion counts as nothing usable; other gateway errors
/// propagate.
async fn generate_theme<D>(driver: &D) -> SagaResult<Theme>
where
    D: SagaDriver + ?Sized,
{
    let reply = match request_completion(driver, build_theme_request()).await {
        Ok(reply) => reply,
        Err(e) if e.gateway_kind() == Some(&GatewayErrorKind::EmptyCompletion) => {
            debug!("Model returned no theme");
            String::new()
        }
        Err(e) => return Err(e),
    };
    let candidate = reply
        .lines()
        .map(|line| line.trim().trim_matches(|c| c == '"' || c == '\''))
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let theme = match Theme::new(candidate) {
        Ok(theme) => theme,
        Err(_) => Theme(FALLBACK_THEME.to_string()),
    };
    info!(theme = %theme, "Generated theme");
    Ok(theme)
}
