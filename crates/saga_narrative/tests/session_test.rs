//! Narrative session lifecycle against the scripted mock driver.

use saga_core::Role;
use saga_error::{GatewayErrorKind, NarrativeErrorKind};
use saga_interface::{MockDriver, MockResponse};
use saga_narrative::{
    CLOSING_CHOICE, DEFAULT_CHOICES, FALLBACK_THEME, INTRO_MESSAGE, NarrativeConfig,
    NarrativeSession, SessionId, SessionState, ThemePolicy,
};

fn reply(turn: u32) -> String {
    format!(
        "RESPONSE: Scene {turn}.\nCHOICES:\n1. Left {turn}\n2. Right {turn}\n3. Up {turn}\n4. Down {turn}"
    )
}

fn session() -> NarrativeSession {
    NarrativeSession::new(SessionId::new("test").unwrap(), NarrativeConfig::default())
}

#[tokio::test]
async fn test_start_sends_role_and_intro_only() {
    let driver = MockDriver::new_success(reply(0));
    let mut session = session();

    let story = session.start(&driver, "a haunted lighthouse").await.unwrap();

    assert_eq!(story.narrative(), "Scene 0.");
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.turn(), 0);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.theme().unwrap().as_str(), "a haunted lighthouse");

    let request = driver.last_request().unwrap();
    let messages = request.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert!(messages[0].content.contains("a haunted lighthouse"));
    assert_eq!(messages[1].content, INTRO_MESSAGE);
}

#[tokio::test]
async fn test_history_grows_one_entry_per_turn() {
    let driver = MockDriver::new_responder(|req| {
        let turn = (req.messages().len() as u32 - 2) / 2;
        MockResponse::Success(reply(turn))
    });
    let mut session = session();
    session.start(&driver, "desert caravan").await.unwrap();

    for k in 1..=5 {
        let story = session.advance(&driver, "Left").await.unwrap();
        assert_eq!(story.narrative(), format!("Scene {}.", k));
        assert_eq!(session.turn(), k);
        assert_eq!(session.history().len(), k as usize + 1);
    }

    let request = driver.last_request().unwrap();
    let messages = request.messages();
    // system + 5 replayed pairs + new message
    assert_eq!(messages.len(), 1 + 5 * 2 + 1);
    assert_eq!(messages[1].content, INTRO_MESSAGE);
    assert_eq!(messages[2].role, Role::Assistant);
    assert!(messages.last().unwrap().content.starts_with("MESSAGE NUMBER: 5\n"));
}

#[tokio::test]
async fn test_story_concludes_and_terminates() {
    let driver = MockDriver::new_success(reply(1));
    let mut session = session();
    session.start(&driver, "space opera").await.unwrap();

    for _ in 1..=10 {
        session.advance(&driver, "onward").await.unwrap();
    }

    assert_eq!(session.state(), SessionState::Concluded);
    assert_eq!(session.turn(), 10);
    assert_eq!(session.history().len(), 11);

    let closing_prompt = driver.last_request().unwrap().messages().last().unwrap().content.clone();
    assert!(closing_prompt.starts_with("MESSAGE NUMBER: 10\n"));
    assert!(closing_prompt.contains(CLOSING_CHOICE));

    let calls = driver.call_count();
    let err = session.advance(&driver, "more").await.unwrap_err();
    assert_eq!(
        err.narrative_kind(),
        Some(&NarrativeErrorKind::SessionTerminated { max_turns: 10 })
    );
    assert_eq!(driver.call_count(), calls);
    assert_eq!(session.history().len(), 11);
}

#[tokio::test]
async fn test_gateway_failure_leaves_session_unchanged() {
    let driver = MockDriver::new_sequence(vec![
        MockResponse::Success(reply(0)),
        MockResponse::Success(reply(1)),
        MockResponse::Error(GatewayErrorKind::Timeout("60s".to_string())),
        MockResponse::Success(reply(2)),
    ]);
    let mut session = session();
    session.start(&driver, "jungle temple").await.unwrap();
    session.advance(&driver, "Enter").await.unwrap();

    let err = session.advance(&driver, "Climb").await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(session.turn(), 1);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.state(), SessionState::Active);

    let story = session.advance(&driver, "Climb").await.unwrap();
    assert_eq!(story.narrative(), "Scene 2.");
    assert_eq!(session.turn(), 2);

    let requests = driver.requests();
    assert_eq!(requests[2], requests[3], "retry must resend identical messages");
}

#[tokio::test]
async fn test_failed_start_stays_uninitialized() {
    let driver = MockDriver::new_error(GatewayErrorKind::Http("connection refused".to_string()));
    let mut session = session();

    let err = session.start(&driver, "pirates").await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(session.state(), SessionState::Uninitialized);
    assert!(session.history().is_empty());
    assert!(session.theme().is_none());
    assert!(session.system_role().is_empty());
}

#[tokio::test]
async fn test_malformed_reply_yields_defaults_and_is_recorded() {
    let driver = MockDriver::new_success("I refuse to follow the format.");
    let mut session = session();

    let story = session.start(&driver, "noir detective").await.unwrap();

    assert_eq!(story.choices(), &DEFAULT_CHOICES.map(String::from));
    assert_eq!(
        session.history().last().unwrap().reply(),
        "I refuse to follow the format."
    );
}

#[tokio::test]
async fn test_input_validation() {
    let driver = MockDriver::new_success(reply(0));
    let mut session = session();

    let err = session.advance(&driver, "Left").await.unwrap_err();
    assert!(matches!(
        err.narrative_kind(),
        Some(NarrativeErrorKind::SessionNotStarted(_))
    ));

    let err = session.start(&driver, "   ").await.unwrap_err();
    assert!(matches!(
        err.narrative_kind(),
        Some(NarrativeErrorKind::InvalidInput(_))
    ));
    assert_eq!(driver.call_count(), 0);

    session.start(&driver, "glacier").await.unwrap();
    let err = session.advance(&driver, "").await.unwrap_err();
    assert!(matches!(
        err.narrative_kind(),
        Some(NarrativeErrorKind::InvalidInput(_))
    ));

    let err = session.start(&driver, "again").await.unwrap_err();
    assert!(matches!(
        err.narrative_kind(),
        Some(NarrativeErrorKind::SessionAlreadyStarted(_))
    ));
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_generated_theme_policy() {
    let config = NarrativeConfig::builder()
        .theme_policy(ThemePolicy::Generate)
        .build()
        .unwrap();

    let driver = MockDriver::new_sequence(vec![
        MockResponse::Success("\"The Sunken Crown\"\n".to_string()),
        MockResponse::Success(reply(0)),
    ]);
    let mut session = NarrativeSession::new(SessionId::generate(), config);
    session.start(&driver, "").await.unwrap();
    assert_eq!(session.theme().unwrap().as_str(), "The Sunken Crown");
    assert!(session.system_role().contains("The Sunken Crown"));

    let driver = MockDriver::new_sequence(vec![
        MockResponse::Success("   ".to_string()),
        MockResponse::Success(reply(0)),
    ]);
    let mut session = NarrativeSession::new(SessionId::generate(), config);
    session.start(&driver, "  ").await.unwrap();
    assert_eq!(session.theme().unwrap().as_str(), FALLBACK_THEME);
}

#[tokio::test]
async fn test_generated_theme_falls_back_on_empty_completion() {
    let config = NarrativeConfig::builder()
        .theme_policy(ThemePolicy::Generate)
        .build()
        .unwrap();

    let driver = MockDriver::new_sequence(vec![
        MockResponse::Error(GatewayErrorKind::EmptyCompletion),
        MockResponse::Success(reply(0)),
    ]);
    let mut session = NarrativeSession::new(SessionId::generate(), config);
    session.start(&driver, "").await.unwrap();
    assert_eq!(session.theme().unwrap().as_str(), FALLBACK_THEME);

    let driver = MockDriver::new_error(GatewayErrorKind::Timeout("60s".to_string()));
    let mut session = NarrativeSession::new(SessionId::generate(), config);
    let err = session.start(&driver, "").await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(session.state(), SessionState::Uninitialized);
}
