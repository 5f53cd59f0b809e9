pub mod plan;
pub mod preferences;

pub use plan::{new_id, now_millis, Exercise, WorkoutDay, WorkoutPlan};
pub use preferences::{
  Equipment, Frequency, Goal, Level, Restrictions, UserPreferences, ValidationError,
  NO_RESTRICTION, RESTRICTION_OPTIONS, WORKOUT_MODELS,
};
