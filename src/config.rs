//! Runtime configuration loaded from the environment (and `.env` if present).

use std::env;
use std::path::PathBuf;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

const DB_FILE_NAME: &str = "workout-builder.db";

#[derive(Debug, Clone)]
pub struct Config {
  /// Generation service credential; only required when generating
  pub gemini_api_key: Option<String>,
  pub gemini_model: String,
  pub gemini_api_base: String,
  pub database_path: PathBuf,
}

impl Default for Config {
  /// Default config for testing only.
  fn default() -> Self {
    Self {
      gemini_api_key: None,
      gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
      gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
      database_path: PathBuf::from(DB_FILE_NAME),
    }
  }
}

impl Config {
  pub fn from_env() -> Self {
    dotenvy::dotenv().ok();

    let gemini_api_key = env::var("GEMINI_API_KEY")
      .or_else(|_| env::var("API_KEY"))
      .ok()
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty());

    Self {
      gemini_api_key,
      gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
      gemini_api_base: env::var("GEMINI_API_BASE")
        .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
      database_path: env::var("WORKOUT_BUILDER_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path()),
    }
  }
}

/// `<data dir>/workout-builder/workout-builder.db`, or the working directory
/// when the platform has no data dir
fn default_database_path() -> PathBuf {
  dirs::data_dir()
    .map(|d| d.join("workout-builder").join(DB_FILE_NAME))
    .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}
