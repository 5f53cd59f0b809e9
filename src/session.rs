//! The plan currently open for viewing and editing
//!
//! A session is either a `Draft` (freshly generated, lives only here) or
//! `Persisted` (has a store row that is rewritten after every edit). The mode
//! is fixed when the session is built; `commit` is the only way from one to
//! the other.

use serde::Serialize;

use crate::edits::PlanEdit;
use crate::llm::{GeminiClient, GenerationError};
use crate::models::{Equipment, Frequency, Restrictions, UserPreferences, WorkoutPlan};
use crate::storage::{PlanStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
  Draft,
  Persisted,
}

#[derive(Debug, thiserror::Error)]
pub enum RegenerateError {
  #[error("Unknown day: {0}")]
  UnknownDay(String),

  #[error(transparent)]
  Generation(#[from] GenerationError),

  #[error(transparent)]
  Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentWorkout {
  plan: WorkoutPlan,
  mode: SessionMode,
  /// Preferences the plan was generated from, when known
  #[serde(skip)]
  preferences: Option<UserPreferences>,
}

impl CurrentWorkout {
  /// A freshly generated plan that has not been saved
  pub fn draft(plan: WorkoutPlan, preferences: Option<UserPreferences>) -> Self {
    Self {
      plan,
      mode: SessionMode::Draft,
      preferences,
    }
  }

  /// Open a stored plan; edits will be written back immediately
  pub async fn open(store: &PlanStore, id: &str) -> Option<Self> {
    let plan = store.get(id).await?;
    Some(Self {
      plan,
      mode: SessionMode::Persisted,
      preferences: None,
    })
  }

  pub fn plan(&self) -> &WorkoutPlan {
    &self.plan
  }

  pub fn mode(&self) -> SessionMode {
    self.mode
  }

  /// Apply an edit, mirroring it to the store when persisted.
  ///
  /// The in-memory plan is only replaced once the store write succeeded.
  pub async fn apply(&mut self, store: &PlanStore, edit: &PlanEdit) -> Result<(), StorageError> {
    let next = edit.apply(&self.plan);

    if self.mode == SessionMode::Persisted {
      store.save(&next).await?;
    }

    self.plan = next;
    Ok(())
  }

  /// Save a draft and switch to persisted mode; re-saves if already persisted
  pub async fn commit(&mut self, store: &PlanStore) -> Result<(), StorageError> {
    store.save(&self.plan).await?;
    if self.mode == SessionMode::Draft {
      tracing::info!(plan_id = %self.plan.id, "Draft plan saved");
    }
    self.mode = SessionMode::Persisted;
    Ok(())
  }

  /// Preferences used to regenerate a day.
  ///
  /// Stored plans do not record equipment, frequency or restrictions, so for
  /// them those fall back to defaults (restrictions to `Nenhuma`).
  pub fn regeneration_preferences(&self) -> UserPreferences {
    match &self.preferences {
      Some(prefs) => prefs.clone(),
      None => UserPreferences {
        models: self.plan.models.clone(),
        goal: self.plan.goal,
        level: self.plan.level,
        equipment: Equipment::FullGym,
        frequency: Frequency::Four,
        restrictions: Restrictions::default(),
      },
    }
  }

  /// Replace one day with a freshly generated one, in place.
  ///
  /// On any failure the session is left untouched.
  pub async fn regenerate_day(
    &mut self,
    client: &GeminiClient,
    store: &PlanStore,
    day_id: &str,
  ) -> Result<(), RegenerateError> {
    let day = self
      .plan
      .find_day(day_id)
      .ok_or_else(|| RegenerateError::UnknownDay(day_id.to_string()))?;

    let new_day = client
      .regenerate_day(day, &self.regeneration_preferences())
      .await?;

    let edit = PlanEdit::ReplaceDay {
      day_id: day_id.to_string(),
      day: new_day,
    };
    self.apply(store, &edit).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::edits::Direction;
  use crate::models::{Goal, Level};
  use crate::test_utils::{
    gemini_text_body, mock_generated_day_json, mock_plan, mock_preferences, setup_test_store,
    teardown_test_db,
  };

  #[tokio::test]
  async fn test_draft_edits_do_not_touch_store() {
    let (pool, store) = setup_test_store().await;
    let mut session = CurrentWorkout::draft(mock_plan("Rascunho", 1, 2), None);

    session
      .apply(&store, &PlanEdit::Rename { name: "Novo".into() })
      .await
      .unwrap();

    assert_eq!(session.plan().custom_name, "Novo");
    assert_eq!(session.mode(), SessionMode::Draft);
    assert!(store.list().await.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_persisted_edits_are_mirrored() {
    let (pool, store) = setup_test_store().await;
    let plan = mock_plan("Salvo", 1, 3);
    store.save(&plan).await.unwrap();

    let mut session = CurrentWorkout::open(&store, &plan.id).await.unwrap();
    assert_eq!(session.mode(), SessionMode::Persisted);

    let day_id = plan.days[0].id.clone();
    session
      .apply(
        &store,
        &PlanEdit::MoveExercise {
          day_id: day_id.clone(),
          index: 0,
          direction: Direction::Down,
        },
      )
      .await
      .unwrap();
    session
      .apply(
        &store,
        &PlanEdit::RemoveExercise {
          day_id,
          exercise_id: plan.days[0].exercises[2].id.clone(),
        },
      )
      .await
      .unwrap();

    let stored = store.get(&plan.id).await.unwrap();
    assert_eq!(&stored, session.plan());
    assert_eq!(stored.days[0].exercises.len(), 2);
    assert_eq!(stored.days[0].exercises[0].id, plan.days[0].exercises[1].id);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_open_unknown_plan_is_none() {
    let (pool, store) = setup_test_store().await;
    assert!(CurrentWorkout::open(&store, "missing").await.is_none());
    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_commit_moves_draft_to_persisted() {
    let (pool, store) = setup_test_store().await;
    let plan = mock_plan("Rascunho", 1, 1);
    let mut session = CurrentWorkout::draft(plan.clone(), None);

    session.commit(&store).await.unwrap();
    assert_eq!(session.mode(), SessionMode::Persisted);
    assert_eq!(store.get(&plan.id).await, Some(plan.clone()));

    session
      .apply(&store, &PlanEdit::Rename { name: "Depois".into() })
      .await
      .unwrap();
    assert_eq!(store.get(&plan.id).await.unwrap().custom_name, "Depois");

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_regeneration_preferences_fall_back_for_stored_plans() {
    let mut plan = mock_plan("P", 1, 1);
    plan.goal = Goal::Endurance;
    plan.level = Level::Beginner;

    let prefs = CurrentWorkout::draft(plan.clone(), None).regeneration_preferences();
    assert_eq!(prefs.goal, Goal::Endurance);
    assert_eq!(prefs.level, Level::Beginner);
    assert!(prefs.restrictions.is_none());

    let mut original = mock_preferences();
    original.toggle_restriction("Joelho");
    let prefs = CurrentWorkout::draft(plan, Some(original.clone())).regeneration_preferences();
    assert_eq!(prefs, original);
  }

  #[tokio::test]
  async fn test_regenerate_day_splices_in_place() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", mockito::Matcher::Any)
      .with_status(200)
      .with_body(gemini_text_body(&mock_generated_day_json()))
      .create_async()
      .await;
    let client = GeminiClient::new("k", "gemini-test", server.url());

    let (pool, store) = setup_test_store().await;
    let plan = mock_plan("Salvo", 3, 2);
    store.save(&plan).await.unwrap();
    let mut session = CurrentWorkout::open(&store, &plan.id).await.unwrap();

    let day_id = plan.days[1].id.clone();
    session.regenerate_day(&client, &store, &day_id).await.unwrap();

    let days = &session.plan().days;
    assert_eq!(days[1].id, day_id);
    assert_eq!(days[1].name, "Treino A - Variação");
    assert_eq!(days[0], plan.days[0]);
    assert_eq!(days[2], plan.days[2]);
    assert_eq!(&store.get(&plan.id).await.unwrap(), session.plan());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_failed_regeneration_leaves_session_unchanged() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", mockito::Matcher::Any)
      .with_status(200)
      .with_body(gemini_text_body(r#"{"nome": "sem exercicios"}"#))
      .create_async()
      .await;
    let client = GeminiClient::new("k", "gemini-test", server.url());

    let (pool, store) = setup_test_store().await;
    let plan = mock_plan("Salvo", 2, 2);
    store.save(&plan).await.unwrap();
    let mut session = CurrentWorkout::open(&store, &plan.id).await.unwrap();

    let result = session.regenerate_day(&client, &store, &plan.days[0].id).await;
    assert!(matches!(result, Err(RegenerateError::Generation(_))));
    assert_eq!(session.plan(), &plan);
    assert_eq!(store.get(&plan.id).await, Some(plan.clone()));

    let result = session.regenerate_day(&client, &store, "missing").await;
    assert!(matches!(result, Err(RegenerateError::UnknownDay(_))));

    teardown_test_db(pool).await;
  }
}
