//! Commands that talk to the generation service

use crate::db::AppState;
use crate::error::AppError;
use crate::llm::GeminiClient;
use crate::models::UserPreferences;
use crate::session::CurrentWorkout;

/// Generate a new plan as an unsaved draft.
///
/// Preferences are validated before any request is made.
pub async fn generate_workout(
  state: &AppState,
  prefs: &UserPreferences,
) -> Result<CurrentWorkout, AppError> {
  prefs.validate()?;

  let client = GeminiClient::from_config(&state.config)?;
  let generated = client.generate_plan(prefs).await.map_err(|e| {
    tracing::error!(error = %e, "Workout generation failed");
    e
  })?;

  let plan = generated.into_plan();
  tracing::info!(plan_id = %plan.id, days = plan.days.len(), "Workout generated");

  Ok(CurrentWorkout::draft(plan, Some(prefs.clone())))
}

/// Regenerate one day of the open plan in place
pub async fn regenerate_workout_day(
  state: &AppState,
  session: &mut CurrentWorkout,
  day_id: &str,
) -> Result<(), AppError> {
  let client = GeminiClient::from_config(&state.config)?;
  session
    .regenerate_day(&client, &state.store, day_id)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, day_id = %day_id, "Day regeneration failed");
      AppError::from(e)
    })
}
