use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::preferences::{Goal, Level};

/// Generate a fresh opaque identifier for a plan, day or exercise
pub fn new_id() -> String {
  Uuid::new_v4().to_string()
}

/// Current time as epoch milliseconds (the `createdAt` unit)
pub fn now_millis() -> i64 {
  Utc::now().timestamp_millis()
}

/// One movement prescription within a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  #[serde(rename = "nome")]
  pub name: String,
  #[serde(rename = "series")]
  pub sets: String,
  pub reps: String,
  #[serde(rename = "descanso")]
  pub rest: String,
  #[serde(rename = "dicas")]
  pub tips: String,
  #[serde(rename = "alternativa", default, skip_serializing_if = "Option::is_none")]
  pub alternative: Option<String>,
}

/// One training session: a muscle-group focus and an ordered exercise list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDay {
  pub id: String,
  #[serde(rename = "nome")]
  pub name: String,
  #[serde(rename = "musculos")]
  pub muscles: Vec<String>,
  #[serde(rename = "exercicios")]
  pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
  pub fn find_exercise(&self, exercise_id: &str) -> Option<&Exercise> {
    self.exercises.iter().find(|e| e.id == exercise_id)
  }
}

/// A full multi-day program; the unit that gets persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
  pub id: String,
  #[serde(rename = "nomePersonalizado")]
  pub custom_name: String,
  #[serde(rename = "modelo")]
  pub models: Vec<String>,
  #[serde(rename = "objetivo")]
  pub goal: Goal,
  #[serde(rename = "nivel")]
  pub level: Level,
  #[serde(rename = "dias")]
  pub days: Vec<WorkoutDay>,
  #[serde(rename = "createdAt")]
  pub created_at: i64,
}

impl WorkoutPlan {
  pub fn find_day(&self, day_id: &str) -> Option<&WorkoutDay> {
    self.days.iter().find(|d| d.id == day_id)
  }

  /// Default display name for a freshly generated plan, e.g. "Hipertrofia - ABC + Full Body"
  pub fn default_name(goal: Goal, models: &[String]) -> String {
    format!("{} - {}", goal, models.join(" + "))
  }
}
