//! Workout Builder CLI
//!
//! Generates workout plans with Gemini and manages the locally saved ones.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use workout_builder::commands::{self, editing, generation};
use workout_builder::config::Config;
use workout_builder::db;
use workout_builder::edits::{Direction, PlanEdit};
use workout_builder::models::{Equipment, Frequency, Goal, Level, Restrictions, UserPreferences};
use workout_builder::AppState;

#[derive(Parser)]
#[command(name = "workout-builder", about = "AI workout plan builder")]
struct Cli {
  /// Database file (overrides WORKOUT_BUILDER_DB)
  #[arg(long, global = true)]
  database: Option<std::path::PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List saved plans
  List,
  /// Show one saved plan
  Show { id: String },
  /// Generate a new plan
  Generate {
    /// Split model, repeat for several (e.g. "ABC", "Full Body")
    #[arg(long = "model", required = true)]
    models: Vec<String>,
    #[arg(long, default_value = "hypertrophy")]
    goal: Goal,
    #[arg(long, default_value = "intermediate")]
    level: Level,
    #[arg(long, default_value = "full-gym")]
    equipment: Equipment,
    #[arg(long, default_value = "4")]
    frequency: Frequency,
    /// Physical restriction, repeat for several (e.g. "Joelho")
    #[arg(long = "restriction")]
    restrictions: Vec<String>,
    /// Save the generated plan instead of only printing it
    #[arg(long)]
    save: bool,
  },
  /// Rename a saved plan
  Rename { id: String, name: String },
  /// Delete a saved plan
  Delete { id: String },
  /// Save a copy of a saved plan
  Duplicate { id: String },
  /// Move an exercise one slot up or down within its day
  Move {
    id: String,
    day_id: String,
    index: usize,
    direction: Direction,
  },
  /// Remove an exercise from a day
  RemoveExercise {
    id: String,
    day_id: String,
    exercise_id: String,
  },
  /// Replace one day of a saved plan with a freshly generated one
  RegenerateDay { id: String, day_id: String },
}

fn init_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  init_logging();

  let cli = Cli::parse();
  let mut config = Config::from_env();
  if let Some(path) = cli.database {
    config.database_path = path;
  }

  let pool = db::initialize_db(&config.database_path).await?;
  let state = AppState::new(pool, config);

  let result = run(&state, cli.command).await;
  state.db.close().await;
  result
}

async fn run(state: &AppState, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
  match command {
    Commands::List => print_json(&commands::list_workouts(state).await)?,
    Commands::Show { id } => print_json(&commands::get_workout(state, &id).await?)?,
    Commands::Generate {
      models,
      goal,
      level,
      equipment,
      frequency,
      restrictions,
      save,
    } => {
      let mut prefs = UserPreferences {
        goal,
        level,
        equipment,
        frequency,
        restrictions: Restrictions::from_labels(&restrictions),
        ..Default::default()
      };
      for model in &models {
        if !prefs.models.contains(model) {
          prefs.toggle_model(model);
        }
      }

      let mut session = generation::generate_workout(state, &prefs).await?;
      if save {
        editing::save_current_workout(state, &mut session).await?;
      }
      print_json(&session)?;
    }
    Commands::Rename { id, name } => {
      let mut session = editing::open_workout(state, &id).await?;
      editing::edit_workout(state, &mut session, &PlanEdit::Rename { name }).await?;
      print_json(session.plan())?;
    }
    Commands::Delete { id } => commands::delete_workout(state, &id).await?,
    Commands::Duplicate { id } => print_json(&commands::duplicate_workout(state, &id).await?)?,
    Commands::Move {
      id,
      day_id,
      index,
      direction,
    } => {
      let mut session = editing::open_workout(state, &id).await?;
      let edit = PlanEdit::MoveExercise {
        day_id,
        index,
        direction,
      };
      editing::edit_workout(state, &mut session, &edit).await?;
      print_json(session.plan())?;
    }
    Commands::RemoveExercise {
      id,
      day_id,
      exercise_id,
    } => {
      let mut session = editing::open_workout(state, &id).await?;
      let edit = PlanEdit::RemoveExercise {
        day_id,
        exercise_id,
      };
      editing::edit_workout(state, &mut session, &edit).await?;
      print_json(session.plan())?;
    }
    Commands::RegenerateDay { id, day_id } => {
      let mut session = editing::open_workout(state, &id).await?;
      generation::regenerate_workout_day(state, &mut session, &day_id).await?;
      print_json(session.plan())?;
    }
  }

  Ok(())
}
