//! Local plan persistence
//!
//! `LocalStorage` is a plain string key/value store over one SQLite table
//! (one database file per origin). `PlanStore` keeps every saved plan as a
//! single JSON array under a fixed key and only ever reads or writes the
//! whole collection.
//!
//! Reads never fail: a missing or unparsable value is an empty collection,
//! and a single entry that does not decode is skipped rather than failing the
//! whole list.

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::{new_id, now_millis, WorkoutPlan};

/// Key under which the serialized plan list lives
pub const PLANS_KEY: &str = "ai_workout_builder_plans";

/// Suffix appended to the name of a duplicated plan
pub const COPY_MARKER: &str = " (Cópia)";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Serialization error: {0}")]
  Serialize(#[from] serde_json::Error),
}

impl Serialize for StorageError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Local Storage
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct LocalStorage {
  db: SqlitePool,
}

impl LocalStorage {
  pub fn new(db: SqlitePool) -> Self {
    Self { db }
  }

  pub async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.db)
      .await?;

    Ok(value)
  }

  pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
    sqlx::query(
      r#"
      INSERT INTO local_storage (key, value, updated_at)
      VALUES (?1, ?2, CURRENT_TIMESTAMP)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(value)
    .execute(&self.db)
    .await?;

    Ok(())
  }

  pub async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
    sqlx::query("DELETE FROM local_storage WHERE key = ?1")
      .bind(key)
      .execute(&self.db)
      .await?;

    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Plan Store
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PlanStore {
  storage: LocalStorage,
}

impl PlanStore {
  pub fn new(storage: LocalStorage) -> Self {
    Self { storage }
  }

  /// Raw stored entries; anything but a JSON array reads as empty
  async fn entries(&self) -> Vec<serde_json::Value> {
    let raw = match self.storage.get_item(PLANS_KEY).await {
      Ok(Some(raw)) => raw,
      Ok(None) => return Vec::new(),
      Err(e) => {
        tracing::warn!(error = %e, "Failed to read saved plans, treating as empty");
        return Vec::new();
      }
    };

    match serde_json::from_str(&raw) {
      Ok(entries) => entries,
      Err(e) => {
        tracing::warn!(error = %e, "Saved plans are unreadable, treating as empty");
        Vec::new()
      }
    }
  }

  /// All stored plans, in stored order
  ///
  /// Entries that no longer decode as a plan are skipped here but kept in
  /// storage, so later writes do not discard them.
  pub async fn list(&self) -> Vec<WorkoutPlan> {
    self
      .entries()
      .await
      .into_iter()
      .enumerate()
      .filter_map(|(index, entry)| match serde_json::from_value(entry) {
        Ok(plan) => Some(plan),
        Err(e) => {
          tracing::warn!(index, error = %e, "Skipping unreadable saved plan");
          None
        }
      })
      .collect()
  }

  async fn write_all(&self, entries: &[serde_json::Value]) -> Result<(), StorageError> {
    let json = serde_json::to_string(entries)?;
    self.storage.set_item(PLANS_KEY, &json).await
  }

  /// Replace the plan with the same id in place, or insert it at the front
  pub async fn save(&self, plan: &WorkoutPlan) -> Result<(), StorageError> {
    let mut entries = self.entries().await;
    let value = serde_json::to_value(plan)?;

    match entries.iter_mut().find(|e| entry_id(e) == Some(plan.id.as_str())) {
      Some(existing) => *existing = value,
      None => entries.insert(0, value),
    }

    self.write_all(&entries).await?;
    tracing::debug!(plan_id = %plan.id, count = entries.len(), "Plan saved");
    Ok(())
  }

  pub async fn get(&self, id: &str) -> Option<WorkoutPlan> {
    self.list().await.into_iter().find(|p| p.id == id)
  }

  /// Remove the plan if present; deleting an unknown id is a no-op
  pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
    let mut entries = self.entries().await;
    let before = entries.len();
    entries.retain(|e| entry_id(e) != Some(id));

    if entries.len() == before {
      return Ok(());
    }

    self.write_all(&entries).await?;
    tracing::debug!(plan_id = %id, "Plan deleted");
    Ok(())
  }

  /// Save a copy of the plan under a new id, name and creation time
  pub async fn duplicate(&self, id: &str) -> Result<Option<WorkoutPlan>, StorageError> {
    let Some(original) = self.get(id).await else {
      return Ok(None);
    };

    let copy = WorkoutPlan {
      id: new_id(),
      custom_name: format!("{}{}", original.custom_name, COPY_MARKER),
      // Strictly later than the original, even within the same millisecond
      created_at: now_millis().max(original.created_at + 1),
      ..original
    };

    self.save(&copy).await?;
    tracing::debug!(source_id = %id, plan_id = %copy.id, "Plan duplicated");
    Ok(Some(copy))
  }
}

fn entry_id(entry: &serde_json::Value) -> Option<&str> {
  entry.get("id").and_then(serde_json::Value::as_str)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
