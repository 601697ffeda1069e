//! Catalog of teaching methods. Each method may have one mini-quiz, linked
//! through the quiz's `methodId`.

use crate::error::LabError;
use crate::quiz::Quiz;
use crate::store::Reflection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
  pub id: u32,
  pub title: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub difficulty: String,
  #[serde(default)]
  pub estimated_minutes: u32,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub steps: Vec<String>,
  /// Assessment criteria
  #[serde(default)]
  pub assessment: Vec<String>,
  #[serde(default)]
  pub reflection_prompts: Vec<String>,
}

impl Method {
  /// The mini-quiz attached to this method, if any.
  pub fn quiz<'a>(&self, quizzes: &'a [Quiz]) -> Option<&'a Quiz> {
    quizzes.iter().find(|q| q.method_id == Some(self.id))
  }
}

pub fn load_methods(path: &Path) -> Result<Vec<Method>, LabError> {
  let raw = std::fs::read_to_string(path)?;
  parse_methods(&raw)
}

pub fn parse_methods(raw: &str) -> Result<Vec<Method>, LabError> {
  Ok(serde_json::from_str(raw)?)
}

pub fn find(methods: &[Method], id: u32) -> Result<&Method, LabError> {
  methods
    .iter()
    .find(|m| m.id == id)
    .ok_or(LabError::UnknownMethod(id))
}

/// Method titles by id, for labelling saved reflections.
pub fn titles(methods: &[Method]) -> HashMap<u32, &str> {
  methods.iter().map(|m| (m.id, m.title.as_str())).collect()
}

/// Heading for a reflection: the catalog title when the method is still
/// known, else the title saved with the reflection.
pub fn reflection_heading<'a>(reflection: &'a Reflection, titles: &HashMap<u32, &'a str>) -> &'a str {
  reflection
    .method_id
    .and_then(|id| titles.get(&id).copied())
    .or(Some(reflection.method_title.as_str()).filter(|t| !t.is_empty()))
    .unwrap_or("Method")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quiz::parse_quizzes;

  const METHODS: &str = r#"[
    {
      "id": 1,
      "title": "Cluster",
      "category": "Brainstorm",
      "difficulty": "easy",
      "estimatedMinutes": 15,
      "tags": ["group", "ideas"],
      "description": "Map ideas around a core term.",
      "steps": ["Write the term", "Branch out"],
      "assessment": ["Coverage"],
      "reflectionPrompts": ["What was new?"]
    },
    {"id": 2, "title": "Jigsaw"}
  ]"#;

  fn reflection(method_id: Option<u32>, method_title: &str) -> Reflection {
    Reflection {
      method_id,
      method_title: method_title.into(),
      student: "Aziz Karimov".into(),
      org: String::new(),
      text: "note".into(),
      created_at: 1,
    }
  }

  #[test]
  fn test_parse_full_and_sparse_methods() {
    let methods = parse_methods(METHODS).unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].estimated_minutes, 15);
    assert_eq!(methods[0].reflection_prompts, vec!["What was new?"]);
    assert!(methods[1].steps.is_empty());
    assert!(parse_methods("{\"id\": 1}").is_err());
  }

  #[test]
  fn test_quiz_lookup_by_method_id() {
    let methods = parse_methods(METHODS).unwrap();
    let quizzes = parse_quizzes(
      r#"[
        {"id": 7, "title": "Cluster check", "methodId": 1, "questions": []},
        {"id": 8, "title": "Loose", "questions": []}
      ]"#,
    )
    .unwrap();
    assert_eq!(methods[0].quiz(&quizzes).map(|q| q.id), Some(7));
    assert!(methods[1].quiz(&quizzes).is_none());
  }

  #[test]
  fn test_find_unknown_method() {
    let methods = parse_methods(METHODS).unwrap();
    assert_eq!(find(&methods, 2).map(|m| m.title.as_str()).ok(), Some("Jigsaw"));
    assert!(matches!(find(&methods, 5), Err(LabError::UnknownMethod(5))));
  }

  #[test]
  fn test_reflection_heading_prefers_catalog() {
    let methods = parse_methods(METHODS).unwrap();
    let titles = titles(&methods);
    let renamed = reflection(Some(1), "Old name");
    assert_eq!(reflection_heading(&renamed, &titles), "Cluster");
    let removed = reflection(Some(9), "Fishbone");
    assert_eq!(reflection_heading(&removed, &titles), "Fishbone");
    let bare = reflection(None, "");
    assert_eq!(reflection_heading(&bare, &titles), "Method");
  }
}
