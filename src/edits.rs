//! Plan mutations
//!
//! Every function here takes the current plan by reference and returns the
//! edited plan. Unknown day or exercise ids leave the plan unchanged.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, WorkoutDay, WorkoutPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  /// Towards the start of the day
  Up,
  /// Towards the end of the day
  Down,
}

impl std::str::FromStr for Direction {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "up" => Ok(Self::Up),
      "down" => Ok(Self::Down),
      _ => Err(format!("Unknown direction: {}", s)),
    }
  }
}

/// Apply `f` to the day with `day_id`, leaving every other day untouched
fn map_day<F>(plan: &WorkoutPlan, day_id: &str, f: F) -> WorkoutPlan
where
  F: FnOnce(&WorkoutDay) -> WorkoutDay,
{
  let mut next = plan.clone();
  if let Some(day) = next.days.iter_mut().find(|d| d.id == day_id) {
    *day = f(day);
  }
  next
}

pub fn rename(plan: &WorkoutPlan, name: &str) -> WorkoutPlan {
  WorkoutPlan {
    custom_name: name.to_string(),
    ..plan.clone()
  }
}

/// Replace every field of an exercise, keeping its id and position
pub fn replace_exercise(
  plan: &WorkoutPlan,
  day_id: &str,
  exercise_id: &str,
  exercise: &Exercise,
) -> WorkoutPlan {
  map_day(plan, day_id, |day| {
    let mut day = day.clone();
    if let Some(slot) = day.exercises.iter_mut().find(|e| e.id == exercise_id) {
      *slot = Exercise {
        id: slot.id.clone(),
        ..exercise.clone()
      };
    }
    day
  })
}

pub fn remove_exercise(plan: &WorkoutPlan, day_id: &str, exercise_id: &str) -> WorkoutPlan {
  map_day(plan, day_id, |day| {
    let mut day = day.clone();
    day.exercises.retain(|e| e.id != exercise_id);
    day
  })
}

/// Swap the exercise at `index` with its neighbour.
///
/// Moving the first exercise up, the last one down, or an index past the
/// end is a no-op.
pub fn move_exercise(
  plan: &WorkoutPlan,
  day_id: &str,
  index: usize,
  direction: Direction,
) -> WorkoutPlan {
  map_day(plan, day_id, |day| {
    let mut day = day.clone();
    let target = match direction {
      Direction::Up => index.checked_sub(1),
      Direction::Down => index.checked_add(1),
    };

    if let Some(target) = target {
      if index < day.exercises.len() && target < day.exercises.len() {
        day.exercises.swap(index, target);
      }
    }
    day
  })
}

/// Replace a day's content, keeping its id and position in the plan
pub fn replace_day(plan: &WorkoutPlan, day_id: &str, day: &WorkoutDay) -> WorkoutPlan {
  map_day(plan, day_id, |existing| WorkoutDay {
    id: existing.id.clone(),
    ..day.clone()
  })
}

/// ---------------------------------------------------------------------------
/// Edit values
/// ---------------------------------------------------------------------------

/// One user edit, carried as a value between the UI and the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanEdit {
  Rename {
    name: String,
  },
  ReplaceExercise {
    day_id: String,
    exercise_id: String,
    exercise: Exercise,
  },
  RemoveExercise {
    day_id: String,
    exercise_id: String,
  },
  MoveExercise {
    day_id: String,
    index: usize,
    direction: Direction,
  },
  ReplaceDay {
    day_id: String,
    day: WorkoutDay,
  },
}

impl PlanEdit {
  pub fn apply(&self, plan: &WorkoutPlan) -> WorkoutPlan {
    match self {
      PlanEdit::Rename { name } => rename(plan, name),
      PlanEdit::ReplaceExercise {
        day_id,
        exercise_id,
        exercise,
      } => replace_exercise(plan, day_id, exercise_id, exercise),
      PlanEdit::RemoveExercise {
        day_id,
        exercise_id,
      } => remove_exercise(plan, day_id, exercise_id),
      PlanEdit::MoveExercise {
        day_id,
        index,
        direction,
      } => move_exercise(plan, day_id, *index, *direction),
      PlanEdit::ReplaceDay { day_id, day } => replace_day(plan, day_id, day),
    }
  }
}
