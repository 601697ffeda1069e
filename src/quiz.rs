//! Quiz data and local scoring.

use crate::error::LabError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Choice {
  pub id: u32,
  pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: u32,
  #[serde(alias = "text")]
  pub question: String,
  pub choices: Vec<Choice>,
  pub correct_choice_id: u32,
  /// Subject key, used by the timed subject game.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subject: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
  pub id: u32,
  pub title: String,
  #[serde(default)]
  pub method_id: Option<u32>,
  pub questions: Vec<Question>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuizFile {
  Many(Vec<Quiz>),
  One(Quiz),
}

/// Reads a quiz file holding either a single quiz or a list of them.
pub fn load_quizzes(path: &Path) -> Result<Vec<Quiz>, LabError> {
  let raw = std::fs::read_to_string(path)?;
  parse_quizzes(&raw)
}

pub fn parse_quizzes(raw: &str) -> Result<Vec<Quiz>, LabError> {
  Ok(match serde_json::from_str(raw)? {
    QuizFile::Many(quizzes) => quizzes,
    QuizFile::One(quiz) => vec![quiz],
  })
}

/// Picked choice per question id.
pub type Answers = HashMap<u32, u32>;

/// Parses `QUESTION=CHOICE`.
pub fn parse_answer(raw: &str) -> Result<(u32, u32), LabError> {
  let invalid = || LabError::InvalidAnswer(raw.to_string());
  let (question, choice) = raw.split_once('=').ok_or_else(invalid)?;
  let question = question.trim().parse().map_err(|_| invalid())?;
  let choice = choice.trim().parse().map_err(|_| invalid())?;
  Ok((question, choice))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
  pub score: u32,
  pub total: u32,
  pub percent: u32,
}

/// Rounded percentage, 0 when there is nothing to score.
pub fn percent(score: u32, total: u32) -> u32 {
  if total == 0 {
    return 0;
  }
  (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

impl Quiz {
  /// Fails on answers to questions this quiz does not have.
  pub fn check(&self, answers: &Answers) -> Result<(), LabError> {
    for question_id in answers.keys() {
      if !self.questions.iter().any(|q| q.id == *question_id) {
        return Err(LabError::UnknownQuestion(*question_id));
      }
    }
    Ok(())
  }

  /// One point per correctly answered question. Choice id 0 means
  /// unanswered.
  pub fn score(&self, answers: &Answers) -> QuizScore {
    let total = self.questions.len() as u32;
    let score = self
      .questions
      .iter()
      .filter(|q| {
        let picked = answers.get(&q.id).copied().unwrap_or(0);
        picked != 0 && picked == q.correct_choice_id
      })
      .count() as u32;
    QuizScore {
      score,
      total,
      percent: percent(score, total),
    }
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
  Success,
  Warn,
  Danger,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
  Excellent,
  Good,
  Satisfactory,
  TryAgain,
  /// Timed game only: 70..90 percent.
  Fair,
  /// Timed game only: below 70 percent.
  Beginner,
}

impl Grade {
  /// Grade for a method quiz.
  pub fn for_quiz(percent: u32) -> Grade {
    match percent {
      90.. => Grade::Excellent,
      70..=89 => Grade::Good,
      50..=69 => Grade::Satisfactory,
      _ => Grade::TryAgain,
    }
  }

  /// Grade for the timed subject game, which has a coarser scale.
  pub fn for_game(percent: u32) -> Grade {
    match percent {
      90.. => Grade::Excellent,
      70..=89 => Grade::Fair,
      _ => Grade::Beginner,
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Grade::Excellent => "Excellent",
      Grade::Good => "Good",
      Grade::Satisfactory => "Satisfactory",
      Grade::TryAgain => "Try again",
      Grade::Fair => "Good",
      Grade::Beginner => "Beginner",
    }
  }

  pub fn style(self) -> Style {
    match self {
      Grade::Excellent | Grade::Good => Style::Success,
      Grade::Satisfactory | Grade::Fair => Style::Warn,
      Grade::TryAgain | Grade::Beginner => Style::Danger,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const QUIZ: &str = r#"{
    "id": 3,
    "title": "Kinematics basics",
    "methodId": 7,
    "questions": [
      {"id": 1, "question": "Unit of velocity?", "choices": [{"id": 1, "text": "m/s"}, {"id": 2, "text": "m"}], "correctChoiceId": 1},
      {"id": 2, "text": "F = ?", "choices": [{"id": 1, "text": "ma"}, {"id": 2, "text": "mv"}], "correctChoiceId": 1},
      {"id": 3, "question": "P = ?", "choices": [{"id": 1, "text": "F*S"}, {"id": 2, "text": "F/S"}], "correctChoiceId": 2}
    ]
  }"#;

  fn quiz() -> Quiz {
    parse_quizzes(QUIZ).unwrap().remove(0)
  }

  #[test]
  fn test_parse_single_and_list() {
    let quiz = quiz();
    assert_eq!(quiz.method_id, Some(7));
    assert_eq!(quiz.questions[1].question, "F = ?");
    let list = parse_quizzes(&format!("[{QUIZ}, {QUIZ}]")).unwrap();
    assert_eq!(list.len(), 2);
    assert!(parse_quizzes("{\"id\": 1}").is_err());
  }

  #[test]
  fn test_score_counts_correct_answers() {
    let quiz = quiz();
    let answers: Answers = [(1, 1), (2, 2), (3, 2)].into_iter().collect();
    let score = quiz.score(&answers);
    assert_eq!(score, QuizScore { score: 2, total: 3, percent: 67 });
  }

  #[test]
  fn test_unanswered_and_zero_score_nothing() {
    let quiz = quiz();
    let answers: Answers = [(1, 0)].into_iter().collect();
    assert_eq!(quiz.score(&answers).score, 0);
    assert_eq!(quiz.score(&Answers::new()).percent, 0);
  }

  #[test]
  fn test_empty_quiz_is_zero_percent() {
    let empty = Quiz {
      id: 1,
      title: "empty".into(),
      method_id: None,
      questions: Vec::new(),
    };
    assert_eq!(empty.score(&Answers::new()), QuizScore { score: 0, total: 0, percent: 0 });
  }

  #[test]
  fn test_check_rejects_unknown_question() {
    let quiz = quiz();
    let answers: Answers = [(9, 1)].into_iter().collect();
    assert!(matches!(quiz.check(&answers), Err(LabError::UnknownQuestion(9))));
  }

  #[test]
  fn test_parse_answer() {
    assert_eq!(parse_answer("2=3").ok(), Some((2, 3)));
    assert_eq!(parse_answer(" 2 = 3 ").ok(), Some((2, 3)));
    assert!(parse_answer("2").is_err());
    assert!(parse_answer("a=1").is_err());
  }

  #[test]
  fn test_quiz_grade_thresholds() {
    assert_eq!(Grade::for_quiz(100), Grade::Excellent);
    assert_eq!(Grade::for_quiz(90), Grade::Excellent);
    assert_eq!(Grade::for_quiz(89), Grade::Good);
    assert_eq!(Grade::for_quiz(70), Grade::Good);
    assert_eq!(Grade::for_quiz(50), Grade::Satisfactory);
    assert_eq!(Grade::for_quiz(49), Grade::TryAgain);
    assert_eq!(Grade::for_quiz(49).style(), Style::Danger);
  }

  #[test]
  fn test_game_grade_thresholds() {
    assert_eq!(Grade::for_game(95), Grade::Excellent);
    assert_eq!(Grade::for_game(70).style(), Style::Warn);
    assert_eq!(Grade::for_game(60), Grade::Beginner);
  }
}
