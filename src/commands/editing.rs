//! Commands for viewing and editing an open plan

use crate::db::AppState;
use crate::edits::PlanEdit;
use crate::error::AppError;
use crate::session::CurrentWorkout;

/// Open a saved plan for editing
pub async fn open_workout(state: &AppState, id: &str) -> Result<CurrentWorkout, AppError> {
  CurrentWorkout::open(&state.store, id)
    .await
    .ok_or_else(|| AppError::NotFound(format!("workout {}", id)))
}

pub async fn edit_workout(
  state: &AppState,
  session: &mut CurrentWorkout,
  edit: &PlanEdit,
) -> Result<(), AppError> {
  session.apply(&state.store, edit).await?;
  Ok(())
}

/// Explicit save of the open plan (turns a draft into a saved plan)
pub async fn save_current_workout(
  state: &AppState,
  session: &mut CurrentWorkout,
) -> Result<(), AppError> {
  session.commit(&state.store).await?;
  Ok(())
}
