//! `play` command handler: a story in the terminal.

use saga::{
    CHOICE_COUNT, Health, NarrativeErrorKind, SagaConfig, SessionId, SessionRegistry,
    SessionState, StoryResponse, build_registry,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Input = Lines<BufReader<Stdin>>;

/// Play one story, reading choices from stdin.
///
/// A number picks one of the offered choices, any other text is sent as a
/// free-form choice, and `q` or end of input quits.
pub async fn run_play(
    config: SagaConfig,
    theme: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = build_registry(&config)?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let id = SessionId::generate();

    let Some(mut story) = open_story(&registry, &id, theme, &mut input).await? else {
        return Ok(());
    };

    loop {
        render(&story);

        let Some(line) = prompt(&mut input, "Your choice (1-4, or q to quit): ").await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        let Some(choice) = resolve_choice(line, &story) else {
            println!("Pick a number between 1 and {}.", CHOICE_COUNT);
            continue;
        };

        match registry.advance(&id, &choice).await {
            Ok(next) => story = next,
            Err(e) if e.is_retryable() => {
                eprintln!("{}\nThe storyteller stumbled; try that choice again.", e.kind());
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        let concluded = registry
            .snapshot(&id)
            .await
            .is_some_and(|s| s.state == SessionState::Concluded);
        if concluded {
            println!("\n{}\n\n~ The End ~", story.narrative());
            break;
        }
    }

    registry.reset(&id).await;
    Ok(())
}

/// Ask for a theme until the story starts, or input ends.
async fn open_story(
    registry: &SessionRegistry<dyn Health>,
    id: &SessionId,
    mut theme: Option<String>,
    input: &mut Input,
) -> Result<Option<StoryResponse>, Box<dyn std::error::Error>> {
    loop {
        let requested = match theme.take() {
            Some(theme) => theme,
            None => match prompt(input, "Describe your adventure: ").await? {
                Some(line) => line,
                None => return Ok(None),
            },
        };

        match registry.start(id.clone(), &requested).await {
            Ok(story) => return Ok(Some(story)),
            Err(e) if matches!(e.narrative_kind(), Some(NarrativeErrorKind::InvalidInput(_))) => {
                eprintln!("{}", e.kind());
            }
            Err(e) if e.is_retryable() => {
                eprintln!("{}\nCould not start the story; try again.", e.kind());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    input.next_line().await
}

fn render(story: &StoryResponse) {
    println!("\n{}\n", story.narrative());
    for (i, choice) in story.choices().iter().enumerate() {
        println!("  {}. {}", i + 1, choice);
    }
    println!();
}

/// A numbered pick maps to that choice; other text passes through.
fn resolve_choice(line: &str, story: &StoryResponse) -> Option<String> {
    if line.is_empty() {
        return None;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=CHOICE_COUNT).contains(&n) => Some(story.choices()[n - 1].clone()),
        Ok(_) => None,
        Err(_) => Some(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> StoryResponse {
        StoryResponse::new(
            "A fork in the road.",
            [
                "Left".to_string(),
                "Right".to_string(),
                "Wait".to_string(),
                "Camp".to_string(),
            ],
        )
    }

    #[test]
    fn test_numbered_choice() {
        assert_eq!(resolve_choice("2", &story()).as_deref(), Some("Right"));
        assert_eq!(resolve_choice("4", &story()).as_deref(), Some("Camp"));
    }

    #[test]
    fn test_out_of_range_number() {
        assert!(resolve_choice("0", &story()).is_none());
        assert!(resolve_choice("5", &story()).is_none());
        assert!(resolve_choice("", &story()).is_none());
    }

    #[test]
    fn test_free_text_choice() {
        assert_eq!(
            resolve_choice("climb the tree", &story()).as_deref(),
            Some("climb the tree")
        );
    }
}
