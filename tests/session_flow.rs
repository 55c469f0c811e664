//! A full session over the seeded quiz, driven by wire-format commands.

use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};

use quizkit::normalizer::quiz_from_record_with_rng;
use quizkit::seeds::seed_quizzes;
use quizkit::{Id, SessionCommand, SessionEngine, SessionState, SessionSummary, Verdict};

fn seeded_session() -> SessionEngine {
  let mut rng = StdRng::seed_from_u64(42);
  let quiz = quiz_from_record_with_rng(seed_quizzes().remove(0), &mut rng).unwrap();
  SessionEngine::new(quiz)
}

fn command(raw: &str) -> SessionCommand {
  serde_json::from_str(raw).unwrap()
}

#[test]
fn plays_seed_quiz_with_one_miss() {
  let mut s = seeded_session();
  assert_eq!(s.question_count(), 3);

  // Q11: right answer.
  assert!(s.apply(&command(r#"{"type":"select","choiceId":111}"#)));
  assert!(s.apply(&command(r#"{"type":"submit"}"#)));
  assert_eq!(s.feedback(), Some(Verdict::Correct));
  assert!(s.apply(&command(r#"{"type":"advance"}"#)));

  // Q12: wrong answer, empty incorrect explanation.
  assert_eq!(s.current_question().question_id, Id::Int(12));
  assert!(s.select(&Id::Int(122)));
  assert!(s.submit());
  assert_eq!(s.feedback(), Some(Verdict::Incorrect));
  assert_eq!(s.explanation(), Some(""));
  assert!(s.advance());

  // Q13: right answer, then finish.
  assert!(s.select(&Id::Int(131)));
  assert!(s.submit());
  assert!(!s.submit());
  assert!(s.advance());

  assert_eq!(s.state(), SessionState::Complete);
  assert_eq!(s.summary(), Some(SessionSummary { score: 2, question_count: 3 }));
  assert_eq!(s.summary().map(|x| x.percent()), Some(66));
}

#[test]
fn choice_from_another_question_is_ignored() {
  let mut s = seeded_session();
  assert!(!s.select(&Id::Int(121)));
  assert!(!s.apply(&SessionCommand::Advance));
  assert_eq!(s.state(), SessionState::Answering);
  assert_eq!(s.view().selected_choice_id, None);
}
