//! Public structs the presentation layer exchanges with a session (serde ready).
//! Keep this small and stable so drivers and the engine can evolve independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Id;
use crate::session::{SessionState, Verdict};

/// Inputs a presentation layer can send to a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    Select {
        #[serde(rename = "choiceId")]
        choice_id: Id,
    },
    Submit,
    Advance,
}

/// Snapshot of a session for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub state: SessionState,
    pub current_index: usize,
    pub question_count: usize,
    pub selected_choice_id: Option<Id>,
    pub feedback: Option<Verdict>,
    /// Present only while feedback is shown; may be an empty string.
    pub explanation: Option<String>,
    pub score: u32,
}

/// Final result, available once the session is complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub score: u32,
    pub question_count: usize,
}

impl SessionSummary {
    /// Whole-number percentage, rounded down.
    pub fn percent(&self) -> u32 {
        if self.question_count == 0 {
            return 0;
        }
        (self.score as usize * 100 / self.question_count) as u32
    }
}
