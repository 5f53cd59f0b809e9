//! Command-level error type

use serde::Serialize;

use crate::llm::GenerationError;
use crate::models::ValidationError;
use crate::session::RegenerateError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("Invalid preferences: {0}")]
  Validation(#[from] ValidationError),

  #[error("Failed to generate workout: {0}")]
  Generation(#[from] GenerationError),

  #[error("Storage error: {0}")]
  Storage(#[from] StorageError),

  #[error("Not found: {0}")]
  NotFound(String),
}

impl From<RegenerateError> for AppError {
  fn from(err: RegenerateError) -> Self {
    match err {
      RegenerateError::UnknownDay(id) => AppError::NotFound(format!("day {}", id)),
      RegenerateError::Generation(e) => AppError::Generation(e),
      RegenerateError::Storage(e) => AppError::Storage(e),
    }
  }
}

impl Serialize for AppError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
