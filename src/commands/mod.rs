pub mod editing;
pub mod generation;

use crate::db::AppState;
use crate::error::AppError;
use crate::models::WorkoutPlan;

pub async fn list_workouts(state: &AppState) -> Vec<WorkoutPlan> {
  state.store.list().await
}

pub async fn get_workout(state: &AppState, id: &str) -> Result<WorkoutPlan, AppError> {
  state
    .store
    .get(id)
    .await
    .ok_or_else(|| AppError::NotFound(format!("workout {}", id)))
}

pub async fn save_workout(state: &AppState, plan: &WorkoutPlan) -> Result<(), AppError> {
  state.store.save(plan).await?;
  Ok(())
}

pub async fn delete_workout(state: &AppState, id: &str) -> Result<(), AppError> {
  state.store.delete(id).await?;
  Ok(())
}

pub async fn duplicate_workout(state: &AppState, id: &str) -> Result<WorkoutPlan, AppError> {
  state
    .store
    .duplicate(id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("workout {}", id)))
}
