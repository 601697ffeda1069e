//! Timed subject quiz. Faster correct answers earn more points.

use crate::error::LabError;
use crate::quiz::{percent, Grade, Question};
use crate::store::now_millis;
use log::debug;
use rand::seq::SliceRandom;
use rand::{rngs::SmallRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Points for any correct answer, before the time bonus.
pub const BASE_POINTS: u32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
}

impl Difficulty {
  pub fn seconds_per_question(self) -> u32 {
    match self {
      Difficulty::Easy => 25,
      Difficulty::Medium => 20,
    }
  }

  /// School grades the question set is written for.
  pub fn grades(self) -> &'static str {
    match self {
      Difficulty::Easy => "5-6",
      Difficulty::Medium => "7-9",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
  pub subject: String,
  pub level: Difficulty,
  pub total_questions: u32,
  pub score: u32,
  /// Best possible score
  pub total: u32,
  pub percent: u32,
  pub grade: Grade,
  pub finished_at: u64,
}

pub fn load_questions(path: &Path) -> Result<Vec<Question>, LabError> {
  let raw = std::fs::read_to_string(path)?;
  Ok(serde_json::from_str(&raw)?)
}

pub struct GameSession {
  subject: String,
  difficulty: Difficulty,
  questions: Vec<Question>,
  index: usize,
  score: u32,
  finished: bool,
}

impl GameSession {
  /// Starts a game over the questions of one subject from `pool`.
  pub fn new(subject: &str, difficulty: Difficulty, pool: &[Question]) -> Result<Self, LabError> {
    let subject = subject.to_lowercase();
    let questions: Vec<Question> = pool
      .iter()
      .filter(|q| q.subject.as_deref() == Some(subject.as_str()))
      .cloned()
      .collect();
    if questions.is_empty() {
      return Err(LabError::UnknownSubject(subject));
    }
    debug!("{} game on {subject}: {} questions", difficulty.grades(), questions.len());
    Ok(Self {
      subject,
      difficulty,
      questions,
      index: 0,
      score: 0,
      finished: false,
    })
  }

  /// Reorders the questions reproducibly for a given seed.
  pub fn shuffle(&mut self, seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    self.questions.shuffle(&mut rng);
  }

  pub fn difficulty(&self) -> Difficulty {
    self.difficulty
  }

  pub fn current(&self) -> Option<&Question> {
    if self.finished {
      None
    } else {
      self.questions.get(self.index)
    }
  }

  /// 1-based position of the current question and the question count.
  pub fn progress(&self) -> (usize, usize) {
    (self.index + 1, self.questions.len())
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  pub fn is_finished(&self) -> bool {
    self.finished
  }

  /// Answers the current question with `time_left` seconds remaining on its
  /// timer and moves on. Returns whether the answer was right, or `None`
  /// once the game is over.
  pub fn answer(&mut self, choice: u32, time_left: i64) -> Option<bool> {
    let correct = self.current()?.correct_choice_id == choice;
    if correct {
      let max = i64::from(self.difficulty.seconds_per_question());
      self.score += BASE_POINTS + time_left.clamp(0, max) as u32;
    }
    self.advance();
    Some(correct)
  }

  /// The timer ran out: no points, next question.
  pub fn timeout(&mut self) {
    if !self.finished {
      self.advance();
    }
  }

  fn advance(&mut self) {
    if self.index + 1 >= self.questions.len() {
      self.finished = true;
    } else {
      self.index += 1;
    }
  }

  pub fn max_score(&self) -> u32 {
    self.questions.len() as u32 * (BASE_POINTS + self.difficulty.seconds_per_question())
  }

  pub fn result(&self) -> Option<GameResult> {
    if !self.finished {
      return None;
    }
    let total = self.max_score();
    let percent = percent(self.score, total);
    Some(GameResult {
      subject: self.subject.clone(),
      level: self.difficulty,
      total_questions: self.questions.len() as u32,
      score: self.score,
      total,
      percent,
      grade: Grade::for_game(percent),
      finished_at: now_millis(),
    })
  }
}
