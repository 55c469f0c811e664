//! Domain models: identifiers, difficulty, and the validated quiz structure.
//!
//! `Quiz` can only be built through `Quiz::new`, which drops inactive questions
//! and enforces the choice invariants. Holding a `Quiz` means holding a valid one.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, ShapeViolation, UnknownDifficulty};

/// Opaque identifier. Stores key rows by integer, generators hand out strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
  Int(i64),
  Text(String),
}

impl Id {
  /// Canonical decimals become `Int`; anything else, "007" and "+5" included, stays `Text`.
  pub fn from_input(s: &str) -> Self {
    let s = s.trim();
    match s.parse::<i64>() {
      Ok(n) if n.to_string() == s => Id::Int(n),
      _ => Id::Text(s.to_string()),
    }
  }

  pub fn is_blank(&self) -> bool {
    matches!(self, Id::Text(s) if s.trim().is_empty())
  }
}

impl fmt::Display for Id {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Id::Int(n) => write!(f, "{n}"),
      Id::Text(s) => f.write_str(s),
    }
  }
}

impl From<i64> for Id {
  fn from(n: i64) -> Self { Id::Int(n) }
}
impl From<&str> for Id {
  fn from(s: &str) -> Self { Id::Text(s.to_string()) }
}
impl From<String> for Id {
  fn from(s: String) -> Self { Id::Text(s) }
}

impl FromStr for Id {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Id::from_input(s)) }
}

/// Difficulty requested from the generation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Difficulty {
  type Err = UnknownDifficulty;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Ok(Self::Easy),
      "medium" => Ok(Self::Medium),
      "hard" => Ok(Self::Hard),
      _ => Err(UnknownDifficulty(s.to_string())),
    }
  }
}

/// One selectable answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
  pub choice_id: Id,
  pub label: String,
  pub is_correct: bool,
}

/// A prompt with its answer choices and explanations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub question_id: Id,
  pub prompt: String,
  #[serde(default)] pub explanation_if_correct: String,
  #[serde(default)] pub explanation_if_incorrect: String,
  pub is_active: bool,
  pub choices: Vec<Choice>,
}

impl Question {
  pub fn correct_choice(&self) -> Option<&Choice> {
    self.choices.iter().find(|c| c.is_correct)
  }

  pub fn choice(&self, choice_id: &Id) -> Option<&Choice> {
    self.choices.iter().find(|c| &c.choice_id == choice_id)
  }

  /// At least two choices, exactly one correct, unique ids, nothing blank.
  pub fn check(&self) -> Result<(), ShapeViolation> {
    let question = || self.question_id.clone();

    if self.prompt.trim().is_empty() {
      return Err(ShapeViolation::EmptyPrompt { question: question() });
    }
    if self.choices.len() < 2 {
      return Err(ShapeViolation::TooFewChoices { question: question(), found: self.choices.len() });
    }

    let mut seen = HashSet::new();
    for c in &self.choices {
      if !seen.insert(&c.choice_id) {
        return Err(ShapeViolation::DuplicateChoiceId { question: question(), choice: c.choice_id.clone() });
      }
      if c.label.trim().is_empty() {
        return Err(ShapeViolation::EmptyLabel { question: question(), choice: c.choice_id.clone() });
      }
    }

    let correct = self.choices.iter().filter(|c| c.is_correct).count();
    if correct != 1 {
      return Err(ShapeViolation::CorrectCount { question: question(), found: correct });
    }
    Ok(())
  }
}

/// Canonical, validated quiz.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Quiz {
  quiz_id: Id,
  title: String,
  description: String,
  questions: Vec<Question>,
}

impl Quiz {
  /// Filters to active questions, then validates everything that is left.
  pub fn new(
    quiz_id: Id,
    title: impl Into<String>,
    description: impl Into<String>,
    questions: Vec<Question>,
  ) -> Result<Self, QuizError> {
    let title = title.into();
    if quiz_id.is_blank() {
      return Err(ShapeViolation::MissingQuizId.into());
    }
    if title.trim().is_empty() {
      return Err(ShapeViolation::MissingTitle.into());
    }

    let questions: Vec<Question> = questions.into_iter().filter(|q| q.is_active).collect();
    if questions.is_empty() {
      return Err(QuizError::EmptyQuiz);
    }
    for q in &questions {
      q.check()?;
    }

    Ok(Self { quiz_id, title, description: description.into(), questions })
  }

  pub fn quiz_id(&self) -> &Id { &self.quiz_id }
  pub fn title(&self) -> &str { &self.title }
  pub fn description(&self) -> &str { &self.description }
  pub fn questions(&self) -> &[Question] { &self.questions }
  pub fn question_count(&self) -> usize { self.questions.len() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn choice(id: i64, label: &str, is_correct: bool) -> Choice {
    Choice { choice_id: Id::Int(id), label: label.into(), is_correct }
  }

  fn question(id: i64, active: bool, choices: Vec<Choice>) -> Question {
    Question {
      question_id: Id::Int(id),
      prompt: format!("Question {id}?"),
      explanation_if_correct: String::new(),
      explanation_if_incorrect: String::new(),
      is_active: active,
      choices,
    }
  }

  fn good(id: i64, active: bool) -> Question {
    question(id, active, vec![choice(1, "yes", true), choice(2, "no", false)])
  }

  #[test]
  fn id_parses_digits_as_int() {
    assert_eq!("42".parse::<Id>().unwrap(), Id::Int(42));
    assert_eq!(" abc-1 ".parse::<Id>().unwrap(), Id::Text("abc-1".into()));
    assert_eq!("-3".parse::<Id>().unwrap(), Id::Int(-3));
  }

  #[test]
  fn id_keeps_non_canonical_numbers_as_text() {
    assert_eq!(Id::from_input("007"), Id::Text("007".into()));
    assert_eq!(Id::from_input("+5"), Id::Text("+5".into()));
    assert_eq!(Id::from_input("0"), Id::Int(0));
  }

  #[test]
  fn id_deserializes_from_number_or_string() {
    let ids: Vec<Id> = serde_json::from_str(r#"[7, "x"]"#).unwrap();
    assert_eq!(ids, vec![Id::Int(7), Id::Text("x".into())]);
  }

  #[test]
  fn difficulty_parses_case_insensitively() {
    assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
    assert_eq!("extreme".parse::<Difficulty>(), Err(UnknownDifficulty("extreme".into())));
  }

  #[test]
  fn quiz_new_drops_inactive_questions() {
    let quiz = Quiz::new(Id::Int(1), "Title", "", vec![good(1, true), good(2, false), good(3, true)]).unwrap();
    let ids: Vec<&Id> = quiz.questions().iter().map(|q| &q.question_id).collect();
    assert_eq!(ids, vec![&Id::Int(1), &Id::Int(3)]);
  }

  #[test]
  fn quiz_new_rejects_all_inactive() {
    let err = Quiz::new(Id::Int(1), "Title", "", vec![good(1, false)]).unwrap_err();
    assert!(matches!(err, QuizError::EmptyQuiz));
  }

  #[test]
  fn quiz_new_ignores_broken_inactive_questions() {
    let broken = question(2, false, vec![choice(1, "only", true)]);
    assert!(Quiz::new(Id::Int(1), "Title", "", vec![good(1, true), broken]).is_ok());
  }

  #[test]
  fn quiz_new_rejects_blank_title_and_id() {
    let err = Quiz::new(Id::Int(1), "  ", "", vec![good(1, true)]).unwrap_err();
    assert!(matches!(err, QuizError::InvalidQuizShape(ShapeViolation::MissingTitle)));
    let err = Quiz::new(Id::Text(String::new()), "T", "", vec![good(1, true)]).unwrap_err();
    assert!(matches!(err, QuizError::InvalidQuizShape(ShapeViolation::MissingQuizId)));
  }

  #[test]
  fn question_check_catches_each_defect() {
    let one = question(1, true, vec![choice(1, "a", true)]);
    assert_eq!(one.check(), Err(ShapeViolation::TooFewChoices { question: Id::Int(1), found: 1 }));

    let none = question(1, true, vec![choice(1, "a", false), choice(2, "b", false)]);
    assert_eq!(none.check(), Err(ShapeViolation::CorrectCount { question: Id::Int(1), found: 0 }));

    let two = question(1, true, vec![choice(1, "a", true), choice(2, "b", true)]);
    assert_eq!(two.check(), Err(ShapeViolation::CorrectCount { question: Id::Int(1), found: 2 }));

    let dup = question(1, true, vec![choice(1, "a", true), choice(1, "b", false)]);
    assert_eq!(dup.check(), Err(ShapeViolation::DuplicateChoiceId { question: Id::Int(1), choice: Id::Int(1) }));

    let blank = question(1, true, vec![choice(1, "a", true), choice(2, " ", false)]);
    assert_eq!(blank.check(), Err(ShapeViolation::EmptyLabel { question: Id::Int(1), choice: Id::Int(2) }));

    let mut no_prompt = good(1, true);
    no_prompt.prompt.clear();
    assert_eq!(no_prompt.check(), Err(ShapeViolation::EmptyPrompt { question: Id::Int(1) }));
  }

  #[test]
  fn question_lookup_helpers() {
    let q = good(1, true);
    assert_eq!(q.correct_choice().map(|c| &c.label), Some(&"yes".to_string()));
    assert!(q.choice(&Id::Int(2)).is_some());
    assert!(q.choice(&Id::Int(9)).is_none());
  }
}
