//! Learner data kept on this machine only: profile, quiz results,
//! reflections and the last timed game. One JSON document on disk.

use crate::error::LabError;
use crate::game::GameResult;
use crate::quiz::{Grade, Quiz, QuizScore};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_millis() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or(0)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub first_name: String,
  pub last_name: String,
  /// Class, group or school, optional
  #[serde(default)]
  pub org: String,
}

impl Profile {
  pub fn new(first_name: &str, last_name: &str, org: &str) -> Self {
    Self {
      first_name: first_name.trim().to_string(),
      last_name: last_name.trim().to_string(),
      org: org.trim().to_string(),
    }
  }

  pub fn is_complete(&self) -> bool {
    !self.first_name.is_empty() && !self.last_name.is_empty()
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
  pub quiz_id: u32,
  pub quiz_title: String,
  pub method_id: Option<u32>,
  pub student: String,
  pub org: String,
  #[serde(flatten)]
  pub score: QuizScore,
  pub level: Grade,
  pub saved_at: u64,
}

impl QuizRecord {
  pub fn new(quiz: &Quiz, profile: &Profile, score: QuizScore) -> Self {
    Self {
      quiz_id: quiz.id,
      quiz_title: quiz.title.clone(),
      method_id: quiz.method_id,
      student: profile.full_name(),
      org: profile.org.clone(),
      score,
      level: Grade::for_quiz(score.percent),
      saved_at: 0,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
  pub method_id: Option<u32>,
  #[serde(default)]
  pub method_title: String,
  pub student: String,
  #[serde(default)]
  pub org: String,
  pub text: String,
  pub created_at: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreData {
  #[serde(default)]
  profile: Option<Profile>,
  #[serde(default)]
  quiz_results: BTreeMap<String, QuizRecord>,
  #[serde(default)]
  reflections: Vec<Reflection>,
  #[serde(default)]
  last_game: Option<GameResult>,
}

pub struct Store {
  path: PathBuf,
  data: StoreData,
}

impl Store {
  /// Opens the store at `path`. A missing file is an empty store; so is an
  /// unreadable one, which gets overwritten on the next save.
  pub fn open(path: &Path) -> Self {
    let data = match fs::read_to_string(path) {
      Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!("ignoring corrupt store {}: {err}", path.display());
        StoreData::default()
      }),
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        debug!("starting empty store at {}", path.display());
        StoreData::default()
      }
      Err(err) => {
        warn!("ignoring unreadable store {}: {err}", path.display());
        StoreData::default()
      }
    };
    Self {
      path: path.to_path_buf(),
      data,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn save(&self) -> Result<(), LabError> {
    if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
      fs::create_dir_all(dir)?;
    }
    let tmp = self.path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(&self.data)?)?;
    fs::rename(&tmp, &self.path)?;
    Ok(())
  }

  pub fn profile(&self) -> Option<&Profile> {
    self.data.profile.as_ref()
  }

  pub fn set_profile(&mut self, profile: Profile) -> Result<(), LabError> {
    if !profile.is_complete() {
      return Err(LabError::MissingProfile);
    }
    self.data.profile = Some(profile);
    self.save()
  }

  /// True once a profile with both names has been saved.
  pub fn require_profile(&self) -> bool {
    self.profile().is_some_and(Profile::is_complete)
  }

  fn complete_profile(&self) -> Result<&Profile, LabError> {
    self
      .profile()
      .filter(|p| p.is_complete())
      .ok_or(LabError::MissingProfile)
  }

  pub fn quiz_results(&self) -> &BTreeMap<String, QuizRecord> {
    &self.data.quiz_results
  }

  /// Saved quiz results, most recent first.
  pub fn quiz_history(&self) -> Vec<&QuizRecord> {
    let mut records: Vec<&QuizRecord> = self.data.quiz_results.values().collect();
    records.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(a.quiz_id.cmp(&b.quiz_id)));
    records
  }

  /// Scores and records a quiz attempt for the current profile. A later
  /// attempt replaces the earlier one.
  pub fn record_quiz(&mut self, quiz: &Quiz, score: QuizScore) -> Result<QuizRecord, LabError> {
    let mut record = QuizRecord::new(quiz, self.complete_profile()?, score);
    record.saved_at = now_millis();
    self
      .data
      .quiz_results
      .insert(quiz.id.to_string(), record.clone());
    self.save()?;
    Ok(record)
  }

  /// Newest first.
  pub fn reflections(&self) -> &[Reflection] {
    &self.data.reflections
  }

  pub fn add_reflection(
    &mut self,
    method_id: Option<u32>,
    method_title: &str,
    text: &str,
  ) -> Result<&Reflection, LabError> {
    let text = text.trim();
    if text.is_empty() {
      return Err(LabError::EmptyReflection);
    }
    let profile = self.complete_profile()?;
    let reflection = Reflection {
      method_id,
      method_title: method_title.to_string(),
      student: profile.full_name(),
      org: profile.org.clone(),
      text: text.to_string(),
      created_at: now_millis(),
    };
    self.data.reflections.insert(0, reflection);
    self.save()?;
    Ok(&self.data.reflections[0])
  }

  pub fn last_game(&self) -> Option<&GameResult> {
    self.data.last_game.as_ref()
  }

  pub fn set_last_game(&mut self, result: GameResult) -> Result<(), LabError> {
    self.data.last_game = Some(result);
    self.save()
  }

  /// Forgets the profile, quiz results and reflections.
  pub fn clear_all(&mut self) -> Result<(), LabError> {
    self.data.profile = None;
    self.data.quiz_results.clear();
    self.data.reflections.clear();
    self.save()
  }
}
