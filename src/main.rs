//! quizkit · terminal quiz runner
//!
//! Loads one quiz through the normalizer and plays it on stdin/stdout.
//!
//! Important env variables:
//!   QUIZ_ID              : play a stored, published quiz (e.g. "1")
//!   QUIZ_TOPIC           : topic for a generated quiz (with QUIZ_DIFFICULTY)
//!   QUIZ_DIFFICULTY      : easy | medium | hard
//!   DATABASE_URL         : use PostgreSQL instead of the in-memory store
//!   QUIZKIT_CONFIG_PATH  : TOML with prompts and an optional quiz bank
//!   OPENAI_API_KEY       : enables generation
//!   OPENAI_BASE_URL      : default "https://api.openai.com/v1"
//!   OPENAI_MODEL         : default "gpt-4o"
//!   OPENAI_TIMEOUT_SECS  : default 20
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"
//!
//! Keys: a choice number selects, Enter or "s" submits, "n" continues, "q" quits.
//! A JSON command such as {"type":"select","choiceId":111} is accepted too.

use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use quizkit::config::QuizRequest;
use quizkit::state::AppState;
use quizkit::{telemetry, QuizError, SessionCommand, SessionEngine, SessionState, Verdict};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let request = QuizRequest::from_env()?;
  let state = AppState::from_env().await?;

  println!("Loading quiz...");
  // Ctrl-C drops the pending load; no session is ever built from it.
  let loaded = tokio::select! {
    res = state.request_quiz(&request) => res,
    _ = tokio::signal::ctrl_c() => {
      warn!(target: "quizkit", "Quiz load cancelled");
      return Ok(ExitCode::from(130));
    }
  };

  let quiz = match loaded {
    Ok(quiz) => quiz,
    Err(e) => {
      error!(target: "quizkit", error = %e, "Quiz load failed");
      eprintln!("{}", user_message(&e));
      return Ok(ExitCode::FAILURE);
    }
  };

  let mut session = SessionEngine::new(quiz);
  play(&mut session).await?;
  Ok(ExitCode::SUCCESS)
}

/// Short, user-facing text per error kind.
fn user_message(e: &QuizError) -> &'static str {
  match e {
    QuizError::NotFound(_) => "That quiz is not available.",
    QuizError::EmptyQuiz => "This quiz has no questions yet.",
    QuizError::GeneratorUnavailable => "Quiz generation is not configured (set OPENAI_API_KEY).",
    QuizError::MalformedGeneration(_) | QuizError::InvalidQuizShape(_) | QuizError::Generation(_) => {
      "Failed to generate quiz. Please try again."
    }
    QuizError::Store(_) => "Could not reach the quiz store. Please try again.",
  }
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
  Quit,
  Command(SessionCommand),
}

fn parse_input(line: &str, session: &SessionEngine) -> Option<Input> {
  let line = line.trim();
  match line {
    "q" | "quit" => return Some(Input::Quit),
    "" | "s" => return Some(Input::Command(SessionCommand::Submit)),
    "n" => return Some(Input::Command(SessionCommand::Advance)),
    _ => {}
  }
  if line.starts_with('{') {
    return serde_json::from_str(line).ok().map(Input::Command);
  }
  let n: usize = line.parse().ok()?;
  let choice = session.current_question().choices.get(n.checked_sub(1)?)?;
  Some(Input::Command(SessionCommand::Select { choice_id: choice.choice_id.clone() }))
}

async fn play(session: &mut SessionEngine) -> std::io::Result<()> {
  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  println!("\n{}", session.quiz().title());
  if !session.quiz().description().is_empty() {
    println!("{}", session.quiz().description());
  }
  render(session);

  while session.state() != SessionState::Complete {
    let Some(line) = lines.next_line().await? else { break };
    match parse_input(&line, session) {
      Some(Input::Quit) => break,
      Some(Input::Command(cmd)) => {
        if session.apply(&cmd) {
          render(session);
        }
      }
      None => println!("Type a choice number, Enter to submit, n for next, q to quit."),
    }
  }

  match session.summary() {
    Some(summary) => {
      println!("\nQuiz complete! Score: {}/{} ({}%)", summary.score, summary.question_count, summary.percent());
      info!(target: "quizkit", session_id = %session.session_id(), score = summary.score, "Quiz finished");
    }
    None => println!("\nLeft the quiz at question {} of {}.", session.current_index() + 1, session.question_count()),
  }
  Ok(())
}

fn render(session: &SessionEngine) {
  let state = session.state();
  if state == SessionState::Complete {
    return;
  }
  let q = session.current_question();
  let feedback = session.feedback();

  if state == SessionState::Answering && session.selected_choice_id().is_none() {
    println!("\nQuestion {} of {}", session.current_index() + 1, session.question_count());
    println!("{}", q.prompt);
  }

  for (i, c) in q.choices.iter().enumerate() {
    let selected = session.selected_choice_id() == Some(&c.choice_id);
    let mark = match (feedback, c.is_correct, selected) {
      (Some(_), true, _) => "✓",
      (Some(Verdict::Incorrect), false, true) => "✗",
      (_, _, true) => ">",
      _ => " ",
    };
    println!(" {mark} {}. {}", i + 1, c.label);
  }

  match feedback {
    Some(verdict) => {
      println!("{}", if verdict == Verdict::Correct { "✓ Correct!" } else { "✗ Incorrect" });
      match session.explanation() {
        Some(text) if !text.trim().is_empty() => println!("{text}"),
        _ => println!("No explanation available."),
      }
      let next = if session.current_index() + 1 < session.question_count() { "next question" } else { "finish" };
      println!("Press n for {next}. Score: {}", session.score());
    }
    None if session.selected_choice_id().is_some() => println!("Press Enter to submit."),
    None => {}
  }
}
