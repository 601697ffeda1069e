use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum LabError {
  UnknownLab(String),
  InvalidParam { name: &'static str, value: f64 },
  UnknownQuestion(u32),
  InvalidAnswer(String),
  UnknownSubject(String),
  UnknownMethod(u32),
  MissingProfile,
  EmptyReflection,
  Io(std::io::Error),
  Json(serde_json::Error),
}

impl Display for LabError {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      LabError::UnknownLab(key) => write!(f, "No lab registered under {key}"),
      LabError::InvalidParam { name, value } => {
        write!(f, "Invalid value for {name}: {value}")
      }
      LabError::UnknownQuestion(id) => write!(f, "Quiz has no question with id {id}"),
      LabError::InvalidAnswer(raw) => {
        write!(f, "Expected an answer as QUESTION=CHOICE, got {raw:?}")
      }
      LabError::UnknownSubject(name) => write!(f, "No questions for subject {name}"),
      LabError::UnknownMethod(id) => write!(f, "No method with id {id} in the catalog"),
      LabError::MissingProfile => write!(f, "Set a profile with first and last name first"),
      LabError::EmptyReflection => write!(f, "Reflection text is empty"),
      LabError::Io(err) => write!(f, "Storage I/O failed: {err}"),
      LabError::Json(err) => write!(f, "Malformed JSON: {err}"),
    }
  }
}

impl Error for LabError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      LabError::Io(err) => Some(err),
      LabError::Json(err) => Some(err),
      _ => None,
    }
  }
}

impl From<std::io::Error> for LabError {
  fn from(err: std::io::Error) -> Self {
    LabError::Io(err)
  }
}

impl From<serde_json::Error> for LabError {
  fn from(err: serde_json::Error) -> Self {
    LabError::Json(err)
  }
}

/// Rejects NaN and infinities coming in from the command line.
pub fn finite(name: &'static str, value: f64) -> Result<f64, LabError> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(LabError::InvalidParam { name, value })
  }
}

pub fn positive(name: &'static str, value: f64) -> Result<f64, LabError> {
  if finite(name, value)? > 0.0 {
    Ok(value)
  } else {
    Err(LabError::InvalidParam { name, value })
  }
}

/// Like [`finite`] but also rejects values below zero.
pub fn non_negative(name: &'static str, value: f64) -> Result<f64, LabError> {
  if finite(name, value)? < 0.0 {
    Err(LabError::InvalidParam { name, value })
  } else {
    Ok(value)
  }
}
