//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database and store setup/teardown
//! - Mock data factories
//! - Canned generation-service responses

use serde_json::json;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::AppState;
use crate::models::{new_id, now_millis, Exercise, Goal, Level, UserPreferences, WorkoutDay, WorkoutPlan};
use crate::storage::{LocalStorage, PlanStore};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// In-memory database plus a plan store on top of it
pub async fn setup_test_store() -> (SqlitePool, PlanStore) {
  let pool = setup_test_db().await;
  let store = PlanStore::new(LocalStorage::new(pool.clone()));
  (pool, store)
}

/// Application state over an in-memory database.
/// With `api_base` set, generation is pointed at that server with a test key.
pub async fn setup_test_state(api_base: Option<String>) -> AppState {
  let pool = setup_test_db().await;
  let config = match api_base {
    Some(base) => Config {
      gemini_api_key: Some("test-key".to_string()),
      gemini_model: "gemini-test".to_string(),
      gemini_api_base: base,
      ..Config::default()
    },
    None => Config::default(),
  };
  AppState::new(pool, config)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_exercise(name: &str) -> Exercise {
  Exercise {
    id: new_id(),
    name: name.to_string(),
    sets: "4".to_string(),
    reps: "8-12".to_string(),
    rest: "90s".to_string(),
    tips: "Controle a fase excêntrica".to_string(),
    alternative: Some(format!("{} na máquina", name)),
  }
}

pub fn mock_day(name: &str, exercise_count: usize) -> WorkoutDay {
  WorkoutDay {
    id: new_id(),
    name: name.to_string(),
    muscles: vec!["Peito".to_string(), "Tríceps".to_string()],
    exercises: (0..exercise_count)
      .map(|i| mock_exercise(&format!("Exercício {}", i + 1)))
      .collect(),
  }
}

pub fn mock_plan(name: &str, day_count: usize, exercises_per_day: usize) -> WorkoutPlan {
  WorkoutPlan {
    id: new_id(),
    custom_name: name.to_string(),
    models: vec!["ABC".to_string()],
    goal: Goal::Hypertrophy,
    level: Level::Intermediate,
    days: (0..day_count)
      .map(|i| mock_day(&format!("Treino {}", (b'A' + i as u8) as char), exercises_per_day))
      .collect(),
    created_at: now_millis(),
  }
}

pub fn mock_preferences() -> UserPreferences {
  UserPreferences {
    models: vec!["ABC".to_string()],
    ..Default::default()
  }
}

/// ---------------------------------------------------------------------------
/// Generation Service Responses
/// ---------------------------------------------------------------------------

/// Plan JSON as the model returns it; the echoed goal/level deliberately
/// differ from `mock_preferences`
pub fn mock_generated_plan_json() -> String {
  json!({
    "modelo": ["ABC"],
    "objetivo": "Força e hipertrofia",
    "nivel": "Intermediario",
    "dias": [
      {
        "nome": "Treino A",
        "musculos": ["Peito", "Tríceps"],
        "exercicios": [
          {
            "nome": "Supino Reto",
            "series": "4",
            "reps": "8-10",
            "descanso": "90s",
            "dicas": "Escápulas retraídas",
            "alternativa": "Supino com Halteres"
          },
          {
            "nome": "Tríceps Corda",
            "series": "3",
            "reps": "12",
            "descanso": "60s",
            "dicas": "Cotovelos fixos",
            "alternativa": null
          }
        ]
      },
      {
        "nome": "Treino B",
        "musculos": ["Costas", "Bíceps"],
        "exercicios": [
          {
            "nome": "Remada Curvada",
            "series": "4",
            "reps": "8-10",
            "descanso": "90s",
            "dicas": "Coluna neutra"
          }
        ]
      }
    ]
  })
  .to_string()
}

pub fn mock_generated_day_json() -> String {
  json!({
    "nome": "Treino A - Variação",
    "musculos": ["Peito", "Tríceps"],
    "exercicios": [
      {
        "nome": "Supino Inclinado",
        "series": "4",
        "reps": "10",
        "descanso": "90s",
        "dicas": "Banco a 30 graus"
      },
      {
        "nome": "Mergulho",
        "series": "3",
        "reps": "até a falha",
        "descanso": "60s",
        "dicas": "Tronco levemente inclinado",
        "alternativa": "Tríceps Testa"
      }
    ]
  })
  .to_string()
}

/// Wrap candidate text in a `generateContent` response body
pub fn gemini_text_body(text: &str) -> String {
  json!({
    "candidates": [{
      "content": { "role": "model", "parts": [{ "text": text }] },
      "finishReason": "STOP"
    }],
    "usageMetadata": {
      "promptTokenCount": 120,
      "candidatesTokenCount": 480,
      "totalTokenCount": 600
    }
  })
  .to_string()
}

pub fn gemini_error_body(message: &str) -> String {
  json!({
    "error": { "code": 400, "message": message, "status": "INVALID_ARGUMENT" }
  })
  .to_string()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let count: i64 = sqlx::query_scalar(
      "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'local_storage'",
    )
    .fetch_one(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(count, 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_plan_has_requested_shape() {
    let plan = mock_plan("P", 3, 2);
    assert_eq!(plan.days.len(), 3);
    assert_eq!(plan.days[2].name, "Treino C");
    assert!(plan.days.iter().all(|d| d.exercises.len() == 2));
  }
}
