//! Built-in quizzes that keep the app usable without a database or config.

use crate::domain::Id;
use crate::store::{ChoiceRecord, QuestionRecord, QuizRecord};

fn choice(id: i64, label: &str, is_correct: bool) -> ChoiceRecord {
  ChoiceRecord { choice_id: Id::Int(id), label: label.into(), is_correct }
}

fn question(
  id: i64,
  prompt: &str,
  explanation_true: &str,
  explanation_false: &str,
  is_active: bool,
  choices: Vec<ChoiceRecord>,
) -> QuestionRecord {
  QuestionRecord {
    question_id: Id::Int(id),
    prompt: prompt.into(),
    explanation_true: explanation_true.into(),
    explanation_false: explanation_false.into(),
    is_active,
    choices,
  }
}

/// Quiz `1` is published with three active questions and one retired draft.
/// Quiz `2` is unpublished and must never be served.
pub fn seed_quizzes() -> Vec<QuizRecord> {
  vec![
    QuizRecord {
      quiz_id: Id::Int(1),
      title: "Elden Theory".into(),
      description: "Lore of the Lands Between.".into(),
      is_published: true,
      questions: vec![
        question(
          11,
          "Who shattered the Elden Ring?",
          "Queen Marika shattered the Ring, starting the Shattering.",
          "It was Queen Marika, the Eternal Queen.",
          true,
          vec![
            choice(111, "Queen Marika", true),
            choice(112, "Godfrey, First Elden Lord", false),
            choice(113, "Ranni the Witch", false),
          ],
        ),
        question(
          12,
          "What is the great golden tree at the heart of the Lands Between called?",
          "The Erdtree, symbol of the Golden Order.",
          "",
          true,
          vec![
            choice(121, "The Erdtree", true),
            choice(122, "The Haligtree", false),
            choice(123, "The Scarlet Tree", false),
          ],
        ),
        question(
          13,
          "Which demigod holds the stars in place?",
          "Starscourge Radahn halted the stars with gravity sorcery.",
          "Radahn, the Starscourge, holds the stars still.",
          true,
          vec![
            choice(131, "Starscourge Radahn", true),
            choice(132, "Godrick the Grafted", false),
            choice(133, "Rykard, Lord of Blasphemy", false),
          ],
        ),
        question(
          14,
          "Draft: which site of grace comes first?",
          "",
          "",
          false,
          vec![choice(141, "The First Step", true)],
        ),
      ],
    },
    QuizRecord {
      quiz_id: Id::Int(2),
      title: "Lands Between Geography".into(),
      description: "Work in progress.".into(),
      is_published: false,
      questions: vec![question(
        21,
        "Where is Stormveil Castle?",
        "",
        "",
        true,
        vec![choice(211, "Limgrave", true), choice(212, "Caelid", false)],
      )],
    },
  ]
}
