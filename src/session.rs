//! Quiz session state machine.
//!
//! ```text
//!   Answering --submit--> Feedback --advance--> Answering (next question)
//!                                   \--advance--> Complete   (after the last one)
//! ```
//!
//! Calls that are illegal in the current state are silent no-ops that return
//! `false`. A double tap on Submit must not crash a screen or double count.
//! Pure in-memory transitions: no I/O, no errors.

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Id, Question, Quiz};
use crate::protocol::{SessionCommand, SessionSummary, SessionView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
  Answering,
  Feedback,
  Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  Correct,
  Incorrect,
}

/// Single-owner progress through one quiz.
#[derive(Debug)]
pub struct SessionEngine {
  session_id: Uuid,
  quiz: Quiz,
  current_index: usize,
  selected: Option<Id>,
  feedback: Option<Verdict>,
  score: u32,
  complete: bool,
}

impl SessionEngine {
  pub fn new(quiz: Quiz) -> Self {
    let session_id = Uuid::new_v4();
    info!(target: "session", %session_id, quiz_id = %quiz.quiz_id(), questions = quiz.question_count(), "Session started");
    Self {
      session_id,
      quiz,
      current_index: 0,
      selected: None,
      feedback: None,
      score: 0,
      complete: false,
    }
  }

  pub fn session_id(&self) -> Uuid { self.session_id }
  pub fn quiz(&self) -> &Quiz { &self.quiz }
  pub fn current_index(&self) -> usize { self.current_index }
  pub fn question_count(&self) -> usize { self.quiz.question_count() }
  pub fn selected_choice_id(&self) -> Option<&Id> { self.selected.as_ref() }
  pub fn feedback(&self) -> Option<Verdict> { self.feedback }
  pub fn score(&self) -> u32 { self.score }

  pub fn state(&self) -> SessionState {
    if self.complete {
      SessionState::Complete
    } else if self.feedback.is_some() {
      SessionState::Feedback
    } else {
      SessionState::Answering
    }
  }

  /// The question at `current_index`. After completion this stays on the last one.
  pub fn current_question(&self) -> &Question {
    &self.quiz.questions()[self.current_index]
  }

  fn is_last(&self) -> bool {
    self.current_index + 1 >= self.question_count()
  }

  /// Pick a choice on the current question. Ids that do not belong to it are ignored.
  pub fn select(&mut self, choice_id: &Id) -> bool {
    if self.state() != SessionState::Answering {
      debug!(target: "session", session_id = %self.session_id, state = ?self.state(), "select ignored");
      return false;
    }
    if self.current_question().choice(choice_id).is_none() {
      debug!(target: "session", session_id = %self.session_id, %choice_id, "select ignored: unknown choice");
      return false;
    }
    self.selected = Some(choice_id.clone());
    true
  }

  /// Lock the selection and score it.
  pub fn submit(&mut self) -> bool {
    if self.state() != SessionState::Answering {
      debug!(target: "session", session_id = %self.session_id, state = ?self.state(), "submit ignored");
      return false;
    }
    let Some(selected) = &self.selected else {
      debug!(target: "session", session_id = %self.session_id, "submit ignored: nothing selected");
      return false;
    };

    // A stale id scores as incorrect rather than failing.
    let correct = self
      .current_question()
      .choice(selected)
      .map_or(false, |c| c.is_correct);

    let verdict = if correct { Verdict::Correct } else { Verdict::Incorrect };
    if correct {
      self.score += 1;
    }
    self.feedback = Some(verdict);
    debug!(target: "session", session_id = %self.session_id, index = self.current_index, ?verdict, score = self.score, "Answer submitted");
    true
  }

  /// Move past the feedback to the next question, or finish.
  pub fn advance(&mut self) -> bool {
    if self.state() != SessionState::Feedback {
      debug!(target: "session", session_id = %self.session_id, state = ?self.state(), "advance ignored");
      return false;
    }

    self.selected = None;
    self.feedback = None;
    if self.is_last() {
      self.complete = true;
      info!(target: "session", session_id = %self.session_id, score = self.score, questions = self.question_count(), "Session complete");
    } else {
      self.current_index += 1;
    }
    true
  }

  pub fn apply(&mut self, command: &SessionCommand) -> bool {
    match command {
      SessionCommand::Select { choice_id } => self.select(choice_id),
      SessionCommand::Submit => self.submit(),
      SessionCommand::Advance => self.advance(),
    }
  }

  /// Explanation matching the verdict, only while feedback is showing.
  pub fn explanation(&self) -> Option<&str> {
    let q = self.current_question();
    match self.feedback? {
      Verdict::Correct => Some(q.explanation_if_correct.as_str()),
      Verdict::Incorrect => Some(q.explanation_if_incorrect.as_str()),
    }
  }

  pub fn summary(&self) -> Option<SessionSummary> {
    self.complete.then(|| SessionSummary { score: self.score, question_count: self.question_count() })
  }

  pub fn view(&self) -> SessionView {
    SessionView {
      session_id: self.session_id,
      state: self.state(),
      current_index: self.current_index,
      question_count: self.question_count(),
      selected_choice_id: self.selected.clone(),
      feedback: self.feedback,
      explanation: self.explanation().map(str::to_string),
      score: self.score,
    }
  }
}
